use vcpu_editor::editor::config::{mask_ram, RAM_SIZE, VIDEO_Y_ADDRESS};

/// Scanlines per frame, counted by the video Y register.
const SCANLINES: u8 = 240;

/// A stand-in for the emulated machine. It has RAM and a joypad register,
/// and counts scanlines into the video Y register as it runs.
pub struct SimulatedMachine {
    ram: Vec<u8>,
    input_mask: u8,
}

impl SimulatedMachine {
    pub fn new() -> SimulatedMachine {
        SimulatedMachine {
            ram: vec![0; RAM_SIZE],
            input_mask: 0xFF,
        }
    }

    /// Copy an image into RAM starting at address zero.
    pub fn load(&mut self, image: &[u8]) {
        let len = image.len().min(self.ram.len());
        self.ram[..len].copy_from_slice(&image[..len]);
    }

    pub fn read_byte(&self, address: u16) -> u8 {
        self.ram[mask_ram(address) as usize]
    }

    pub fn write_byte(&mut self, address: u16, value: u8) {
        self.ram[mask_ram(address) as usize] = value;
    }

    pub fn input_mask(&self) -> u8 {
        self.input_mask
    }

    pub fn set_input_mask(&mut self, mask: u8) {
        self.input_mask = mask;
    }

    /// Run for one scanline.
    pub fn step(&mut self) {
        let y = self.read_byte(VIDEO_Y_ADDRESS);
        self.write_byte(VIDEO_Y_ADDRESS, y.wrapping_add(1) % SCANLINES);
    }

    pub fn reset(&mut self) {
        log::info!("Machine reset");
        self.write_byte(VIDEO_Y_ADDRESS, 0);
        self.input_mask = 0xFF;
    }
}
