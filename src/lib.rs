/*!

The interactive front end of a virtual 8-bit computer: a hex memory editor,
a browser for vCPU program files and a single-step debugger that sits on top
of a running emulation.

# Crossterm Frontend

To try the editor on a simulated machine, run
`cargo run --release --bin crossterm_frontend -- --vcpu-dir <dir>`.
Arrow keys move the cursor, Enter arms hex editing, `l` opens the program
browser, F6 pauses the machine and F10 single-steps it.

# Library

The editor does not own the machine it edits. Everything it needs from the
host application is described by the traits in `editor::host`, and
`DummyHost` implements them all in memory.

```rust
use vcpu_editor::editor::Editor;
use vcpu_editor::editor::config::EditorConfig;
use vcpu_editor::editor::host::{DummyHost, Memory};
use vcpu_editor::editor::input::InputEvent;
use crossterm::event::KeyCode;

let mut editor = Editor::new(EditorConfig::default());
let mut host = DummyHost::new();

// Arm hex editing, then type 0xC3 into the cell under the cursor
for key in &[KeyCode::Enter, KeyCode::Char('c'), KeyCode::Char('3')] {
    editor.handle_event(InputEvent::KeyUp(*key), &mut host);
}
assert_eq!(host.read_byte(0x0200), 0xC3);
```

## Host loop

The host delivers its input events to `Editor::handle_event`, then calls
`Editor::tick` once per frame. The returned phase tells it whether the
machine may run this frame.

```rust
use vcpu_editor::editor::Editor;
use vcpu_editor::editor::config::EditorConfig;
use vcpu_editor::editor::debugger::DebugPhase;
use vcpu_editor::editor::host::DummyHost;
use vcpu_editor::editor::input::{InputEvent, DEBUG_KEY};

let mut editor = Editor::new(EditorConfig::default());
let mut host = DummyHost::new();

editor.handle_event(InputEvent::KeyUp(DEBUG_KEY), &mut host);
assert_eq!(editor.tick(&mut host), DebugPhase::Paused);
```
*/

pub mod editor;
