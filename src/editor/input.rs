//! Turning key and wheel events into joypad presses and editor commands.

use crate::editor::browser::{FileKind, FileSystem};
use crate::editor::config::*;
use crate::editor::hex_edit::{apply_hex_key, hex_digit};
use crate::editor::host::Host;
use crate::editor::state::EditorMode;
use crate::editor::Editor;
use crossterm::event::KeyCode;

pub const INPUT_RIGHT: u8 = 0x01;
pub const INPUT_LEFT: u8 = 0x02;
pub const INPUT_DOWN: u8 = 0x04;
pub const INPUT_UP: u8 = 0x08;
pub const INPUT_START: u8 = 0x10;
pub const INPUT_SELECT: u8 = 0x20;
pub const INPUT_B: u8 = 0x40;
pub const INPUT_A: u8 = 0x80;

/// Enters debug mode on release, and leaves it on the next release.
pub const DEBUG_KEY: KeyCode = KeyCode::F(6);
/// Runs the paused machine until the watched byte changes.
pub const STEP_KEY: KeyCode = KeyCode::F(10);

/// vCPU program counter and link register in zero page.
const VPC_ADDRESS: u16 = 0x0016;
const VLR_ADDRESS: u16 = 0x001a;

/// Something that happened to the keyboard or mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Positive values scroll up, negative values scroll down.
    Wheel(i32),
    Quit,
}

/// Requests the editor makes of the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    ResetCpu,
    Shutdown,
}

/// The joypad button a key is bound to.
pub fn joypad_bit(key: KeyCode) -> Option<u8> {
    match key {
        KeyCode::Char('d') => Some(INPUT_RIGHT),
        KeyCode::Char('a') => Some(INPUT_LEFT),
        KeyCode::Char('s') => Some(INPUT_DOWN),
        KeyCode::Char('w') => Some(INPUT_UP),
        KeyCode::Char(' ') => Some(INPUT_START),
        KeyCode::Char('z') => Some(INPUT_SELECT),
        KeyCode::Char('/') => Some(INPUT_B),
        KeyCode::Char('.') => Some(INPUT_A),
        _ => None,
    }
}

/// Editor commands, triggered when their key is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleBrowser,
    Activate,
    EnterDebug,
    CycleMemoryMode,
    /// Lowers the frame throttle, so the machine runs faster.
    ThrottleDown,
    ThrottleUp,
    ResetCpu,
    Quit,
    NextTrack,
    SaveHighScore,
    ExecuteAtCursor,
}

impl Command {
    pub fn from_key(key: KeyCode) -> Option<Command> {
        let command = match key {
            KeyCode::Char('l') => Command::ToggleBrowser,
            KeyCode::Enter => Command::Activate,
            KeyCode::Char('r') => Command::CycleMemoryMode,
            KeyCode::Char('=') => Command::ThrottleDown,
            KeyCode::Char('-') => Command::ThrottleUp,
            KeyCode::F(1) => Command::ResetCpu,
            KeyCode::F(3) => Command::NextTrack,
            KeyCode::F(4) => Command::SaveHighScore,
            KeyCode::F(5) => Command::ExecuteAtCursor,
            KeyCode::Esc => Command::Quit,
            key if key == DEBUG_KEY => Command::EnterDebug,
            _ => return None,
        };
        Some(command)
    }
}

impl<F: FileSystem> Editor<F> {
    /// Dispatch an event without the debugger's own key overrides.
    pub fn route<H: Host + ?Sized>(&mut self, event: InputEvent, host: &mut H) -> Option<Signal> {
        match event {
            InputEvent::KeyDown(key) => self.handle_key_down(key, host),
            InputEvent::KeyUp(key) => self.handle_key_up(key, host),
            InputEvent::Wheel(y) => {
                self.handle_wheel(y);
                None
            }
            InputEvent::Quit => Some(Signal::Shutdown),
        }
    }

    pub fn handle_wheel(&mut self, y: i32) {
        if y > 0 {
            if self.state.mode() == EditorMode::Load {
                self.browser.scroll_up(1);
            } else {
                self.state.shift_hex_base(-(GRID_W as i32));
            }
        } else if y < 0 {
            if self.state.mode() == EditorMode::Load {
                self.browser.scroll_down(1);
            } else {
                self.state.shift_hex_base(GRID_W as i32);
            }
        }
    }

    pub fn handle_key_down<H: Host + ?Sized>(&mut self, key: KeyCode, host: &mut H) -> Option<Signal> {
        if let Some(bit) = joypad_bit(key) {
            host.write_input_mask(host.read_input_mask() & !bit);
        }

        let limit_y = self.state.limit_y(self.browser.entries().len());
        match key {
            KeyCode::Right => self.state.move_right(),
            KeyCode::Left => self.state.move_left(),
            KeyCode::Down => self.state.move_down(limit_y),
            KeyCode::Up => self.state.move_up(limit_y),
            KeyCode::PageUp => {
                if self.state.mode() == EditorMode::Load {
                    self.browser.page_up();
                } else {
                    self.state.shift_hex_base(-((GRID_W * GRID_H) as i32));
                }
            }
            KeyCode::PageDown => {
                if self.state.mode() == EditorMode::Load {
                    self.browser.page_down();
                } else {
                    self.state.shift_hex_base((GRID_W * GRID_H) as i32);
                }
            }
            _ => {}
        }
        None
    }

    pub fn handle_key_up<H: Host + ?Sized>(&mut self, key: KeyCode, host: &mut H) -> Option<Signal> {
        if let Some(bit) = joypad_bit(key) {
            host.write_input_mask(host.read_input_mask() | bit);
        }

        let signal = match Command::from_key(key) {
            Some(command) => self.execute(command, host),
            None => None,
        };

        self.update_editor(key, host);
        signal
    }

    /// Feed a released key to the hex editor, if it is a hexadecimal digit.
    pub fn update_editor<H: Host + ?Sized>(&mut self, key: KeyCode, host: &mut H) {
        if let Some(digit) = hex_digit(key) {
            apply_hex_key(&mut self.state, host, digit);
        }
    }

    fn execute<H: Host + ?Sized>(&mut self, command: Command, host: &mut H) -> Option<Signal> {
        let paused = self.debugger.is_paused();
        match command {
            Command::ToggleBrowser => {
                if !paused {
                    self.state.set_cursor(0, 0);
                    let mode = match self.state.mode() {
                        EditorMode::Load => EditorMode::Hex,
                        _ => EditorMode::Load,
                    };
                    self.state.set_mode(mode);
                    log::info!("Switched to {:?} mode", mode);
                    if mode == EditorMode::Load {
                        self.browser.browse();
                    }
                }
            }
            Command::Activate => self.activate(host),
            Command::EnterDebug => {
                self.state.enter_debug();
                self.debugger.pause();
            }
            Command::CycleMemoryMode => {
                self.state.cycle_memory_mode();
                log::info!("Showing {:?}", self.state.memory_mode());
            }
            Command::ThrottleDown => {
                let throttle = host.frame_throttle().checked_sub(self.throttle_step()).unwrap_or_default();
                host.set_frame_throttle(throttle);
                log::debug!("Frame throttle {:?}", throttle);
            }
            Command::ThrottleUp => {
                let throttle = (host.frame_throttle() + self.throttle_step()).min(self.config.frame_interval);
                host.set_frame_throttle(throttle);
                log::debug!("Frame throttle {:?}", throttle);
            }
            Command::ResetCpu => {
                if !paused {
                    return Some(Signal::ResetCpu);
                }
            }
            Command::Quit => return Some(Signal::Shutdown),
            Command::NextTrack => host.advance_track(),
            Command::SaveHighScore => host.persist_high_score(),
            Command::ExecuteAtCursor => {
                if !paused {
                    self.execute_at_hex_base(host);
                }
            }
        }
        None
    }

    /// Five percent of the nominal frame interval.
    fn throttle_step(&self) -> std::time::Duration {
        self.config.frame_interval / 20
    }

    /// Point the vCPU at the hex view address. The vCPU advances its program
    /// counter before fetching, and only within the page.
    fn execute_at_hex_base<H: Host + ?Sized>(&mut self, host: &mut H) {
        let address = self.state.hex_base_address();
        let lo = (address as u8).wrapping_sub(2);
        let hi = (address >> 8) as u8;
        for base in [VPC_ADDRESS, VLR_ADDRESS].iter() {
            host.write_byte(*base, lo);
            host.write_byte(*base + 1, hi);
        }
        log::info!("Executing vCPU code at {:04x}", address);
    }

    fn activate<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.state.mode() != EditorMode::Load || self.state.on_address_row() {
            self.state.toggle_hex_edit();
            return;
        }

        let entry = match self.browser.entry(self.state.cursor_y() as usize) {
            Some(entry) => entry.clone(),
            None => return,
        };
        match entry.kind {
            FileKind::File => {
                let path = self.browser.path().join(&entry.name);
                log::info!("Uploading {:?}", path);
                host.request_upload(&path);
            }
            FileKind::Dir => {
                self.state.set_cursor(self.state.cursor_x(), 0);
                self.browser.navigate(&entry);
            }
        }
    }
}
