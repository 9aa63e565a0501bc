use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use structopt::StructOpt;

use vcpu_editor::editor::config::EditorConfig;
use vcpu_editor::editor::host::{Display, Timing};
use vcpu_editor::editor::input::Signal;
use vcpu_editor::editor::Editor;

mod crossterm_io;
mod key_buffer;
mod key_manager;
mod machine;
use crossterm_io::TerminalHost;
use key_manager::KeyManager;
use machine::SimulatedMachine;

/// How often input is polled while the machine is paused.
const PAUSED_POLL: Duration = Duration::from_millis(1);

/// The program options.
/// Logs go to stderr, so redirect it (`2> editor.log`) to keep the screen clean.
#[derive(StructOpt)]
struct Opt {
    /// Directory of vCPU programs to browse
    #[structopt(long, parse(from_os_str), default_value = "./vCPU")]
    vcpu_dir: PathBuf,

    /// Address watched when single stepping, in hexadecimal
    #[structopt(long, parse(try_from_str = parse_hex), default_value = "0009")]
    watch: u16,

    /// Give up single stepping after this many milliseconds
    #[structopt(long, default_value = "500")]
    stall_ms: u64,

    /// RAM image to start the machine with
    #[structopt(parse(from_os_str))]
    image: Option<PathBuf>,
}

impl Opt {
    fn config(&self) -> EditorConfig {
        EditorConfig {
            base_path: self.vcpu_dir.clone(),
            watch_address: self.watch,
            stall_timeout: Duration::from_millis(self.stall_ms),
            ..EditorConfig::default()
        }
    }
}

fn parse_hex(s: &str) -> Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(s.trim_start_matches("0x"), 16)
}

fn main() -> crossterm::Result<()> {

    pretty_env_logger::init();

    // Get configuration and prepare the machine
    let opt = Opt::from_args();
    let mut machine = SimulatedMachine::new();
    if let Some(image) = &opt.image {
        log::info!("Loading {:?}", image);
        machine.load(&std::fs::read(image)?);
    }

    let mut editor = Editor::new(opt.config());
    let mut key_manager = KeyManager::new();
    let mut host = TerminalHost::new(machine)?;

    'frames: loop {
        for event in key_manager.events() {
            match editor.handle_event(event, &mut host) {
                Some(Signal::Shutdown) => break 'frames,
                Some(Signal::ResetCpu) => host.machine_mut().reset(),
                None => {}
            }
        }

        // The editor draws by itself while paused
        if editor.tick(&mut host).runs_machine() {
            host.machine_mut().step();
            host.refresh(&editor.view());
            host.present(true);
            thread::sleep(host.frame_throttle());
        } else {
            thread::sleep(PAUSED_POLL);
        }
    }

    log::info!("Shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn parses_hex_addresses() {
        assert_eq!(parse_hex("0009"), Ok(0x0009));
        assert_eq!(parse_hex("0x01a0"), Ok(0x01A0));
        assert!(parse_hex("xyz").is_err());
    }
}
