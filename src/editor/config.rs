use std::path::PathBuf;
use std::time::Duration;

/// Columns of memory cells in the hex grid.
pub const GRID_W: usize = 16;
/// Rows of memory cells in the hex grid, also the browser page size.
pub const GRID_H: usize = 16;
/// Size of the emulated RAM. Always a power of two.
pub const RAM_SIZE: usize = 0x8000;

pub const HEX_BASE_ADDRESS: u16 = 0x0200;
/// Lowest address a program may be loaded at.
pub const LOAD_BASE_ADDRESS: u16 = 0x0200;
pub const VARS_BASE_ADDRESS: u16 = 0x0030;
/// The vertical video counter, which changes on every scanline.
pub const VIDEO_Y_ADDRESS: u16 = 0x0009;

pub const SINGLE_STEP_STALL_TIME: Duration = Duration::from_millis(500);
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

pub const SOURCE_EXTENSION: &str = ".vasm";
pub const BINARY_EXTENSION: &str = ".gt1";

/// Runtime settings of the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Root of the program browser. The browser never leaves it.
    pub base_path: PathBuf,
    /// Address polled to detect that a single step did something.
    pub watch_address: u16,
    pub stall_timeout: Duration,
    /// Minimum time between two redraws while paused.
    pub frame_interval: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            base_path: PathBuf::from("./vCPU"),
            watch_address: VIDEO_Y_ADDRESS,
            stall_timeout: SINGLE_STEP_STALL_TIME,
            frame_interval: FRAME_INTERVAL,
        }
    }
}

/// Mask an address into RAM.
pub fn mask_ram(address: u16) -> u16 {
    address & (RAM_SIZE - 1) as u16
}
