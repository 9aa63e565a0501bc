//! The capabilities the editor borrows from the application hosting it.
//!
//! The CPU, renderer, audio and loader all live outside this crate. The
//! editor only ever talks to them through these traits, and `DummyHost`
//! implements all of them in memory so the editor can run without any of
//! them.

use crate::editor::browser::FileEntry;
use crate::editor::config::*;
use crate::editor::debugger::DebugPhase;
use crate::editor::state::EditorState;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Memory and joypad register of the emulated machine.
pub trait Memory {
    fn read_byte(&self, address: u16) -> u8;
    fn write_byte(&mut self, address: u16, value: u8);
    /// The joypad register. Buttons are active low.
    fn read_input_mask(&self) -> u8;
    fn write_input_mask(&mut self, mask: u8);
}

pub trait Timing {
    fn frame_throttle(&self) -> Duration;
    fn set_frame_throttle(&mut self, throttle: Duration);
    /// Monotonic time since some fixed point.
    fn ticks(&self) -> Duration;
}

/// Everything the renderer needs to know about the editor.
#[derive(Debug, Clone)]
pub struct View<'a> {
    pub state: &'a EditorState,
    pub entries: &'a [FileEntry],
    pub scroll_index: usize,
    pub browser_path: PathBuf,
    pub phase: DebugPhase,
}

pub trait Display {
    fn refresh(&mut self, view: &View<'_>);
    fn present(&mut self, vsync: bool);
}

pub trait Audio {
    fn advance_track(&mut self);
}

pub trait Loader {
    fn request_upload(&mut self, path: &Path);
    fn persist_high_score(&mut self);
}

pub trait Diagnostics {
    fn flush_pending_log_messages(&mut self);
}

/// All capabilities at once.
pub trait Host: Memory + Timing + Display + Audio + Loader + Diagnostics {}

impl<T: Memory + Timing + Display + Audio + Loader + Diagnostics> Host for T {}

/// A host that keeps RAM in memory, runs on a manual clock and records
/// every request made of it.
#[derive(Debug, Clone)]
pub struct DummyHost {
    pub ram: Vec<u8>,
    pub input_mask: u8,
    pub throttle: Duration,
    pub now: Duration,
    pub refreshes: usize,
    pub presents: usize,
    pub tracks_advanced: usize,
    pub high_scores_saved: usize,
    pub log_flushes: usize,
    pub uploads: Vec<PathBuf>,
}

impl DummyHost {
    pub fn new() -> DummyHost {
        DummyHost {
            ram: vec![0; RAM_SIZE],
            input_mask: 0xFF,
            throttle: FRAME_INTERVAL,
            now: Duration::from_millis(0),
            refreshes: 0,
            presents: 0,
            tracks_advanced: 0,
            high_scores_saved: 0,
            log_flushes: 0,
            uploads: Vec::new(),
        }
    }

    /// Move the clock forward.
    pub fn advance(&mut self, elapsed: Duration) {
        self.now += elapsed;
    }
}

impl Default for DummyHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory for DummyHost {
    fn read_byte(&self, address: u16) -> u8 {
        self.ram[mask_ram(address) as usize]
    }
    fn write_byte(&mut self, address: u16, value: u8) {
        self.ram[mask_ram(address) as usize] = value;
    }
    fn read_input_mask(&self) -> u8 {
        self.input_mask
    }
    fn write_input_mask(&mut self, mask: u8) {
        self.input_mask = mask;
    }
}

impl Timing for DummyHost {
    fn frame_throttle(&self) -> Duration {
        self.throttle
    }
    fn set_frame_throttle(&mut self, throttle: Duration) {
        self.throttle = throttle;
    }
    fn ticks(&self) -> Duration {
        self.now
    }
}

impl Display for DummyHost {
    fn refresh(&mut self, _: &View<'_>) {
        self.refreshes += 1;
    }
    fn present(&mut self, _: bool) {
        self.presents += 1;
    }
}

impl Audio for DummyHost {
    fn advance_track(&mut self) {
        self.tracks_advanced += 1;
    }
}

impl Loader for DummyHost {
    fn request_upload(&mut self, path: &Path) {
        self.uploads.push(path.to_path_buf());
    }
    fn persist_high_score(&mut self) {
        self.high_scores_saved += 1;
    }
}

impl Diagnostics for DummyHost {
    fn flush_pending_log_messages(&mut self) {
        self.log_flushes += 1;
    }
}
