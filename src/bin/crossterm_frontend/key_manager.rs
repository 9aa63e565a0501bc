use super::key_buffer::{KeyBuffer, RawInput};
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use vcpu_editor::editor::hex_edit::hex_digit;
use vcpu_editor::editor::input::{joypad_bit, InputEvent};

/// A joypad key counts as released once the terminal stops repeating it.
const RELEASE_TIMEOUT: Duration = Duration::from_millis(250);
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A struct for managing keypresses that will automatically
/// start a thread that grabs terminal events.
///
/// Terminals only report presses, so releases are made up here. Joypad keys
/// are held until they have not repeated for a while, and every other key is
/// released right after it is pressed. A hex digit releases every held key
/// before it goes down, so digits typed on joypad keys stay in order.
pub struct KeyManager {
    stop: Arc<AtomicBool>,
    key_buffer: Arc<KeyBuffer>,
    event_listener: Option<JoinHandle<()>>,
    held: Vec<(KeyCode, Instant)>,
}

impl KeyManager {
    // Start event listener thread
    pub fn new() -> KeyManager {
        let stop = Arc::new(AtomicBool::new(false));
        let key_buffer = Arc::new(KeyBuffer::new());
        let event_listener = event_listener(stop.clone(), key_buffer.clone());
        KeyManager {
            stop,
            key_buffer,
            event_listener: Some(event_listener),
            held: Vec::new(),
        }
    }

    /// Get the events that happened since the last call.
    pub fn events(&mut self) -> Vec<InputEvent> {
        let raw = self.key_buffer.drain();
        release_keys(&mut self.held, raw, Instant::now())
    }
}

impl Drop for KeyManager {
    fn drop(&mut self) {
        // Tell the event listener to stop, and wait for it
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.event_listener.take() {
            let _ = handle.join();
        }
    }
}

/// Turn raw terminal input into key presses and releases.
fn release_keys(held: &mut Vec<(KeyCode, Instant)>, raw: Vec<(RawInput, Instant)>, now: Instant) -> Vec<InputEvent> {
    let mut events = Vec::new();
    for (input, timestamp) in raw {
        match input {
            RawInput::Key(code) => {
                let joypad = joypad_bit(code).is_some();
                let digit = hex_digit(code).is_some();
                if joypad && !digit {
                    if let Some(entry) = held.iter_mut().find(|(held_code, _)| *held_code == code) {
                        entry.1 = timestamp; // auto repeat
                        continue;
                    }
                }
                if digit {
                    // Digits are applied on release, one per press
                    events.extend(held.drain(..).map(|(held_code, _)| InputEvent::KeyUp(held_code)));
                }
                events.push(InputEvent::KeyDown(code));
                if joypad {
                    held.push((code, timestamp));
                } else {
                    events.push(InputEvent::KeyUp(code));
                }
            }
            RawInput::Wheel(y) => events.push(InputEvent::Wheel(y)),
            RawInput::Quit => events.push(InputEvent::Quit),
        }
    }

    held.retain(|(code, pressed)| {
        let released = now.duration_since(*pressed) >= RELEASE_TIMEOUT;
        if released {
            events.push(InputEvent::KeyUp(*code));
        }
        !released
    });
    events
}

fn to_raw_input(event: Event) -> Option<RawInput> {
    match event {
        Event::Key(KeyEvent { code: KeyCode::Char('c'), modifiers }) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(RawInput::Quit)
        }
        Event::Key(key_event) => Some(RawInput::Key(key_event.code)),
        Event::Mouse(MouseEvent::ScrollUp(..)) => Some(RawInput::Wheel(1)),
        Event::Mouse(MouseEvent::ScrollDown(..)) => Some(RawInput::Wheel(-1)),
        _ => None,
    }
}

/// Starts a thread that listens for terminal events and pushes them to the key buffer.
fn event_listener(stop: Arc<AtomicBool>, key_buffer: Arc<KeyBuffer>) -> JoinHandle<()> {
    thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            match poll(POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    log::error!("Could not poll terminal events: {:?}", e);
                    break;
                }
            }

            match read() {
                Ok(event) => {
                    log::trace!("Got event {:?}", event);
                    if let Some(input) = to_raw_input(event) {
                        key_buffer.push(input);
                    }
                }
                Err(e) => {
                    log::error!("Could not read terminal event: {:?}", e);
                    break;
                }
            }
        }
    })
}
