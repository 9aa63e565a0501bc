//! Editing registers and memory one hexadecimal digit at a time.

use crate::editor::host::Memory;
use crate::editor::state::{EditorMode, EditorState, MemoryMode};
use crossterm::event::KeyCode;

/// Replace one nibble of a 16-bit value.
/// Digits are counted big-endian, so digit 0 is bits 12-15 and digit 3 is bits 0-3.
pub fn set_nibble_u16(value: u16, digit: u8, nibble: u8) -> u16 {
    let shift = 12 - 4 * (digit & 0x03) as u16;
    let mask = 0x000F << shift;
    (value & !mask) | ((nibble as u16 & 0x0F) << shift)
}

/// Replace one nibble of a byte. Digit 0 is the high nibble.
pub fn set_nibble_u8(value: u8, digit: u8, nibble: u8) -> u8 {
    let shift = 4 - 4 * (digit & 0x01);
    let mask = 0x0F << shift;
    (value & !mask) | ((nibble & 0x0F) << shift)
}

/// The value of a hexadecimal digit key, if it is one.
pub fn hex_digit(key: KeyCode) -> Option<u8> {
    match key {
        KeyCode::Char(c) => c.to_digit(16).map(|d| d as u8),
        _ => None,
    }
}

/// Write one nibble of whatever the cursor points at, then advance the digit.
///
/// On the address row, even columns edit the hex view address (or the load
/// address while browsing) and odd columns edit the variables address. In the
/// grid, the RAM cell under the cursor is edited. Nothing happens unless hex
/// editing is armed, and ROM cannot be edited.
pub fn apply_hex_key<M: Memory + ?Sized>(state: &mut EditorState, memory: &mut M, digit: u8) {
    if !state.hex_edit() {
        return;
    }

    if state.on_address_row() {
        let position = state.address_digit();
        if state.cursor_x() & 0x01 == 0 {
            if state.mode() != EditorMode::Load {
                let address = set_nibble_u16(state.hex_base_address(), position, digit);
                state.set_hex_base_address(address);
                log::debug!("Hex address is now {:04x}", state.hex_base_address());
            } else {
                let address = set_nibble_u16(state.load_base_address(), position, digit);
                state.set_load_base_address(address);
                log::debug!("Load address is now {:04x}", state.load_base_address());
            }
        } else {
            let address = set_nibble_u16(state.vars_base_address(), position, digit);
            state.set_vars_base_address(address);
            log::debug!("Vars address is now {:04x}", state.vars_base_address());
        }
        state.advance_address_digit();
    } else if state.memory_mode() == MemoryMode::Ram {
        let address = state.cursor_address();
        let value = set_nibble_u8(memory.read_byte(address), state.memory_digit(), digit);
        memory.write_byte(address, value);
        log::debug!("Wrote {:02x} to {:04x}", value, address);
        state.advance_memory_digit();
    }
}
