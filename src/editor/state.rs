//! The cursor, mode and address registers of the editor.

use crate::editor::config::*;

/// What the editor is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Hex,
    Load,
    Debug,
}

/// Which memory the hex grid shows. Only RAM can be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMode {
    Ram,
    Rom0,
    Rom1,
}

impl MemoryMode {
    const ALL: [MemoryMode; 3] = [MemoryMode::Ram, MemoryMode::Rom0, MemoryMode::Rom1];

    /// The next mode, wrapping around after the last one.
    pub fn next(self) -> MemoryMode {
        let index = MemoryMode::ALL.iter().position(|m| *m == self).unwrap_or(0);
        MemoryMode::ALL[(index + 1) % MemoryMode::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    cursor_x: i32,
    cursor_y: i32,
    mode: EditorMode,
    prev_mode: EditorMode,
    memory_mode: MemoryMode,
    hex_edit: bool,
    address_digit: u8,
    memory_digit: u8,
    hex_base_address: u16,
    load_base_address: u16,
    vars_base_address: u16,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    pub fn new() -> EditorState {
        EditorState {
            cursor_x: 0,
            cursor_y: 0,
            mode: EditorMode::Hex,
            prev_mode: EditorMode::Hex,
            memory_mode: MemoryMode::Ram,
            hex_edit: false,
            address_digit: 0,
            memory_digit: 0,
            hex_base_address: HEX_BASE_ADDRESS,
            load_base_address: LOAD_BASE_ADDRESS,
            vars_base_address: VARS_BASE_ADDRESS,
        }
    }

    pub fn cursor_x(&self) -> i32 {
        self.cursor_x
    }

    /// The cursor row, where -1 is the address row.
    pub fn cursor_y(&self) -> i32 {
        self.cursor_y
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn memory_mode(&self) -> MemoryMode {
        self.memory_mode
    }

    pub fn hex_edit(&self) -> bool {
        self.hex_edit
    }

    pub fn address_digit(&self) -> u8 {
        self.address_digit
    }

    pub fn memory_digit(&self) -> u8 {
        self.memory_digit
    }

    pub fn hex_base_address(&self) -> u16 {
        self.hex_base_address
    }

    pub fn load_base_address(&self) -> u16 {
        self.load_base_address
    }

    pub fn vars_base_address(&self) -> u16 {
        self.vars_base_address
    }

    pub fn on_address_row(&self) -> bool {
        self.cursor_y == -1
    }

    /// Number of selectable rows below the address row.
    pub fn limit_y(&self, entry_count: usize) -> i32 {
        match self.mode {
            EditorMode::Load => entry_count as i32,
            _ => GRID_H as i32,
        }
    }

    /// The RAM address under the cursor in the hex grid.
    pub fn cursor_address(&self) -> u16 {
        let offset = self.cursor_x + self.cursor_y * GRID_W as i32;
        mask_ram(self.hex_base_address.wrapping_add(offset as u16))
    }

    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
    }

    /// Switch to debug mode, remembering the mode to return to.
    /// Entering again while already debugging keeps the first remembered mode.
    /// A browser row below the grid is pulled back onto the last grid row.
    pub fn enter_debug(&mut self) {
        if self.mode != EditorMode::Debug {
            self.prev_mode = self.mode;
        }
        self.mode = EditorMode::Debug;
        self.cursor_y = self.cursor_y.min(GRID_H as i32 - 1);
    }

    /// Return to the mode that was active before debugging.
    pub fn leave_debug(&mut self) {
        self.mode = self.prev_mode;
    }

    pub fn cycle_memory_mode(&mut self) {
        self.memory_mode = self.memory_mode.next();
    }

    pub fn toggle_hex_edit(&mut self) {
        self.hex_edit = !self.hex_edit;
    }

    pub fn set_hex_base_address(&mut self, address: u16) {
        self.hex_base_address = mask_ram(address);
    }

    /// Set the load address, never going below the lowest load address.
    pub fn set_load_base_address(&mut self, address: u16) {
        self.load_base_address = address.max(LOAD_BASE_ADDRESS);
    }

    pub fn set_vars_base_address(&mut self, address: u16) {
        self.vars_base_address = address;
    }

    /// Shift the hex view by a signed number of bytes, wrapping within RAM.
    pub fn shift_hex_base(&mut self, delta: i32) {
        self.set_hex_base_address(self.hex_base_address.wrapping_add(delta as u16));
    }

    pub fn advance_address_digit(&mut self) {
        self.address_digit = (self.address_digit + 1) & 0x03;
    }

    pub fn advance_memory_digit(&mut self) {
        self.memory_digit = (self.memory_digit + 1) & 0x01;
    }

    pub fn reset_digits(&mut self) {
        self.address_digit = 0;
        self.memory_digit = 0;
    }

    pub fn move_right(&mut self) {
        self.cursor_x = if self.cursor_x + 1 >= GRID_W as i32 { 0 } else { self.cursor_x + 1 };
        self.reset_digits();
    }

    pub fn move_left(&mut self) {
        self.cursor_x = if self.cursor_x - 1 < 0 { GRID_W as i32 - 1 } else { self.cursor_x - 1 };
        self.reset_digits();
    }

    pub fn move_down(&mut self, limit_y: i32) {
        self.cursor_y = if self.cursor_y + 1 >= limit_y { 0 } else { self.cursor_y + 1 };
        self.reset_digits();
    }

    pub fn move_up(&mut self, limit_y: i32) {
        self.cursor_y = if self.cursor_y - 1 < -1 { limit_y - 1 } else { self.cursor_y - 1 };
        self.reset_digits();
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn memory_mode_cycles_through_all() {
        let mut mode = MemoryMode::Ram;
        mode = mode.next();
        assert_eq!(mode, MemoryMode::Rom0);
        mode = mode.next();
        assert_eq!(mode, MemoryMode::Rom1);
        mode = mode.next();
        assert_eq!(mode, MemoryMode::Ram);
    }

    #[test]
    fn cursor_wraps_horizontally() {
        let mut state = EditorState::new();
        state.move_left();
        assert_eq!(state.cursor_x(), GRID_W as i32 - 1);
        state.move_right();
        assert_eq!(state.cursor_x(), 0);
    }

    #[test]
    fn cursor_reaches_address_row_then_wraps_to_bottom() {
        let mut state = EditorState::new();
        let limit = state.limit_y(0);
        state.move_up(limit);
        assert!(state.on_address_row());
        state.move_up(limit);
        assert_eq!(state.cursor_y(), GRID_H as i32 - 1);
        state.move_down(limit);
        assert_eq!(state.cursor_y(), 0);
    }

    #[test]
    fn moving_resets_digits() {
        let mut state = EditorState::new();
        state.advance_address_digit();
        state.advance_memory_digit();
        state.move_right();
        assert_eq!(state.address_digit(), 0);
        assert_eq!(state.memory_digit(), 0);
    }

    #[test]
    fn limit_depends_on_mode() {
        let mut state = EditorState::new();
        assert_eq!(state.limit_y(3), GRID_H as i32);
        state.set_mode(EditorMode::Load);
        assert_eq!(state.limit_y(3), 3);
    }

    #[test]
    fn load_address_is_clamped() {
        let mut state = EditorState::new();
        state.set_load_base_address(0x0010);
        assert_eq!(state.load_base_address(), LOAD_BASE_ADDRESS);
        state.set_load_base_address(0x1234);
        assert_eq!(state.load_base_address(), 0x1234);
    }

    #[test]
    fn debug_remembers_first_mode() {
        let mut state = EditorState::new();
        state.set_mode(EditorMode::Load);
        state.enter_debug();
        state.enter_debug();
        assert_eq!(state.mode(), EditorMode::Debug);
        state.leave_debug();
        assert_eq!(state.mode(), EditorMode::Load);
    }

    #[test]
    fn debug_keeps_cursor_inside_grid() {
        let mut state = EditorState::new();
        state.set_mode(EditorMode::Load);
        state.set_cursor(3, 40);
        state.enter_debug();
        assert_eq!(state.cursor_y(), GRID_H as i32 - 1);
        let last_cell = HEX_BASE_ADDRESS + (GRID_W * GRID_H) as u16 - 1;
        assert!(state.cursor_address() <= last_cell);

        state.leave_debug();
        assert_eq!(state.mode(), EditorMode::Load);
        assert_eq!(state.cursor_y(), GRID_H as i32 - 1);
    }

    #[test]
    fn hex_base_shift_wraps_within_ram() {
        let mut state = EditorState::new();
        state.set_hex_base_address(0x0000);
        state.shift_hex_base(-(GRID_W as i32));
        assert_eq!(state.hex_base_address(), (RAM_SIZE - GRID_W) as u16);
    }
}
