use crossterm::event::KeyCode;
use std::{collections::VecDeque, sync::Mutex, time::Instant};

/// What the terminal reported, before key releases are worked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInput {
    Key(KeyCode),
    Wheel(i32),
    Quit,
}

/// A thread-safe buffer of terminal input and when it arrived.
/// Wrap it in an `std::sync::Arc` to share it between a producer and a consumer.
pub struct KeyBuffer {
    buffer: Mutex<VecDeque<(RawInput, Instant)>>,
}

impl KeyBuffer {
    pub fn new() -> KeyBuffer {
        KeyBuffer {
            buffer: Mutex::new(VecDeque::new()),
        }
    }

    /// Push new input to the buffer.
    pub fn push(&self, input: RawInput) {
        let mut guard = self.buffer.lock().unwrap();
        guard.push_back((input, Instant::now()));
    }

    /// Take everything in the buffer, oldest first.
    pub fn drain(&self) -> Vec<(RawInput, Instant)> {
        let mut guard = self.buffer.lock().unwrap();
        guard.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::{sync::Arc, thread};

    #[test]
    fn push_and_drain() {
        let kb = Arc::new(KeyBuffer::new());

        let kb_c1 = kb.clone();
        let input = RawInput::Key(KeyCode::Null);

        let producer = thread::spawn(move || {
            kb_c1.push(input)
        });

        producer.join().unwrap(); // Ensure the push has been done
        let output: Vec<_> = kb.drain().into_iter().map(|(i, _)| i).collect();
        assert_eq!(output, vec![input]);
        assert!(kb.drain().is_empty());
    }

    #[test]
    fn drain_keeps_order() {
        let kb = KeyBuffer::new();
        kb.push(RawInput::Key(KeyCode::Char('c')));
        kb.push(RawInput::Wheel(-1));
        kb.push(RawInput::Quit);
        let output: Vec<_> = kb.drain().into_iter().map(|(i, _)| i).collect();
        assert_eq!(output, vec![RawInput::Key(KeyCode::Char('c')), RawInput::Wheel(-1), RawInput::Quit]);
    }
}
