use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{stdout, Stdout, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use vcpu_editor::editor::browser::{FileEntry, FileKind};
use vcpu_editor::editor::config::*;
use vcpu_editor::editor::host::{Audio, Diagnostics, Display, Loader, Memory, Timing, View};
use vcpu_editor::editor::state::{EditorMode, MemoryMode};

use super::machine::SimulatedMachine;

/// Column where the first memory cell of a row is drawn.
const GRID_LEFT: u16 = 7;

/// The terminal host: a simulated machine drawn with crossterm.
pub struct TerminalHost {
    stdout: Stdout,
    machine: SimulatedMachine,
    throttle: Duration,
    start: Instant,
    track: usize,
    last_upload: Option<PathBuf>,
}

impl TerminalHost {
    pub fn new(machine: SimulatedMachine) -> crossterm::Result<TerminalHost> {
        let mut stdout = stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        Ok(TerminalHost {
            stdout,
            machine,
            throttle: FRAME_INTERVAL,
            start: Instant::now(),
            track: 0,
            last_upload: None,
        })
    }

    pub fn machine_mut(&mut self) -> &mut SimulatedMachine {
        &mut self.machine
    }

    fn draw(&mut self, view: &View<'_>) -> crossterm::Result<()> {
        let state = view.state;
        queue!(self.stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

        let status = format!(
            "{:?} {:?} {:?}{}  hex {:04x}  load {:04x}  vars {:04x}",
            state.mode(),
            state.memory_mode(),
            view.phase,
            if state.hex_edit() { " EDIT" } else { "" },
            state.hex_base_address(),
            state.load_base_address(),
            state.vars_base_address(),
        );
        self.print_at(0, 0, &status, state.on_address_row())?;

        if state.mode() == EditorMode::Load {
            self.draw_browser(view)?;
        } else {
            self.draw_grid(view)?;
        }

        if let Some(path) = &self.last_upload {
            let line = format!("upload requested: {}", path.display());
            queue!(self.stdout, cursor::MoveTo(0, GRID_H as u16 + 2), Print(line))?;
        }
        Ok(())
    }

    fn draw_grid(&mut self, view: &View<'_>) -> crossterm::Result<()> {
        let state = view.state;
        for y in 0..GRID_H {
            let row_address = mask_ram(state.hex_base_address().wrapping_add((y * GRID_W) as u16));
            queue!(self.stdout, cursor::MoveTo(0, y as u16 + 1), Print(format!("{:04x}:", row_address)))?;
            for x in 0..GRID_W {
                let address = mask_ram(row_address.wrapping_add(x as u16));
                let value = match state.memory_mode() {
                    MemoryMode::Ram => self.machine.read_byte(address),
                    // The simulated machine has no ROM to show
                    MemoryMode::Rom0 | MemoryMode::Rom1 => 0,
                };
                let selected = state.cursor_x() == x as i32 && state.cursor_y() == y as i32;
                self.print_at(GRID_LEFT + 3 * x as u16, y as u16 + 1, &format!("{:02x}", value), selected)?;
            }
        }
        Ok(())
    }

    fn draw_browser(&mut self, view: &View<'_>) -> crossterm::Result<()> {
        let title = format!("{}", view.browser_path.display());
        queue!(self.stdout, cursor::MoveTo(0, 1), Print(title))?;
        for (row, (index, entry)) in visible_entries(view).enumerate() {
            let name = match entry.kind {
                FileKind::Dir => format!("{}/", entry.name),
                FileKind::File => entry.name.clone(),
            };
            let selected = view.state.cursor_y() == index as i32;
            self.print_at(2, row as u16 + 2, &name, selected)?;
        }
        Ok(())
    }

    fn print_at(&mut self, x: u16, y: u16, text: &str, selected: bool) -> crossterm::Result<()> {
        queue!(self.stdout, cursor::MoveTo(x, y))?;
        if selected {
            queue!(self.stdout, SetAttribute(Attribute::Reverse), Print(text), SetAttribute(Attribute::Reset))?;
        } else {
            queue!(self.stdout, Print(text))?;
        }
        Ok(())
    }
}

impl Drop for TerminalHost {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, DisableMouseCapture, LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

impl Memory for TerminalHost {
    fn read_byte(&self, address: u16) -> u8 {
        self.machine.read_byte(address)
    }
    fn write_byte(&mut self, address: u16, value: u8) {
        self.machine.write_byte(address, value)
    }
    fn read_input_mask(&self) -> u8 {
        self.machine.input_mask()
    }
    fn write_input_mask(&mut self, mask: u8) {
        self.machine.set_input_mask(mask)
    }
}

impl Timing for TerminalHost {
    fn frame_throttle(&self) -> Duration {
        self.throttle
    }
    fn set_frame_throttle(&mut self, throttle: Duration) {
        self.throttle = throttle;
    }
    fn ticks(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Display for TerminalHost {
    fn refresh(&mut self, view: &View<'_>) {
        if let Err(e) = self.draw(view) {
            log::error!("Could not draw editor: {:?}", e);
        }
    }

    fn present(&mut self, _vsync: bool) {
        if let Err(e) = self.stdout.flush() {
            log::error!("Could not present frame: {}", e);
        }
    }
}

impl Audio for TerminalHost {
    fn advance_track(&mut self) {
        self.track += 1;
        log::info!("Playing track {}", self.track);
    }
}

impl Loader for TerminalHost {
    fn request_upload(&mut self, path: &Path) {
        log::info!("Upload of {:?} requested", path);
        self.last_upload = Some(path.to_path_buf());
    }

    fn persist_high_score(&mut self) {
        log::info!("No high scores to persist on the simulated machine");
    }
}

impl Diagnostics for TerminalHost {
    fn flush_pending_log_messages(&mut self) {
        log::logger().flush();
    }
}

/// The browser entries in the window, with their index in the listing.
fn visible_entries<'a>(view: &View<'a>) -> impl Iterator<Item = (usize, &'a FileEntry)> {
    let entries: &'a [FileEntry] = view.entries;
    entries.iter().enumerate().skip(view.scroll_index).take(GRID_H)
}
