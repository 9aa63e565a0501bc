//! Pausing the machine and stepping it until a watched byte changes.
//!
//! The stepper never blocks. The host calls `Editor::tick` once per frame and
//! runs the machine only while the phase is not `Paused`:
//!
//! - `Running`: the machine runs normally.
//! - `Paused`: the machine is frozen and the screen is redrawn at most once
//!   per frame interval.
//! - `Armed`: the machine runs until the byte at the watch address differs
//!   from the snapshot taken when arming, then pauses again. If that takes
//!   longer than the stall timeout the stepper gives up and keeps running.

use crate::editor::config::EditorConfig;
use crate::editor::host::{Memory, Timing};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugPhase {
    Running,
    Paused,
    Armed,
}

impl DebugPhase {
    /// Whether the host should advance the machine this frame.
    pub fn runs_machine(self) -> bool {
        self != DebugPhase::Paused
    }
}

#[derive(Debug, Clone)]
pub struct DebugStepper {
    phase: DebugPhase,
    armed_at: Duration,
    watch_address: u16,
    watch_snapshot: u8,
    stall_timeout: Duration,
    frame_interval: Duration,
    last_frame: Option<Duration>,
}

impl DebugStepper {
    pub fn new(config: &EditorConfig) -> DebugStepper {
        DebugStepper {
            phase: DebugPhase::Running,
            armed_at: Duration::from_millis(0),
            watch_address: config.watch_address,
            watch_snapshot: 0,
            stall_timeout: config.stall_timeout,
            frame_interval: config.frame_interval,
            last_frame: None,
        }
    }

    pub fn phase(&self) -> DebugPhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.phase == DebugPhase::Paused
    }

    pub fn watch_address(&self) -> u16 {
        self.watch_address
    }

    pub fn set_watch_address(&mut self, address: u16) {
        self.watch_address = address;
    }

    /// Freeze the machine.
    pub fn pause(&mut self) {
        self.phase = DebugPhase::Paused;
        self.last_frame = None;
        log::info!("Debugger paused");
    }

    /// Let the machine run until the watched byte changes.
    pub fn arm<H: Memory + Timing + ?Sized>(&mut self, host: &H) {
        self.phase = DebugPhase::Armed;
        self.armed_at = host.ticks();
        self.watch_snapshot = host.read_byte(self.watch_address);
        log::debug!(
            "Single step armed, watching {:04x} = {:02x}",
            self.watch_address,
            self.watch_snapshot
        );
    }

    /// Leave the debugger and let the machine run freely.
    pub fn exit(&mut self) {
        self.phase = DebugPhase::Running;
        self.last_frame = None;
        log::info!("Debugger exited");
    }

    /// Resolve a pending single step, either by pausing on a change of the
    /// watched byte or by giving up after the stall timeout.
    pub fn poll<H: Memory + Timing + ?Sized>(&mut self, host: &H) -> DebugPhase {
        if self.phase == DebugPhase::Armed {
            let elapsed = host.ticks().checked_sub(self.armed_at).unwrap_or_default();
            if elapsed > self.stall_timeout {
                log::error!(
                    "Single step stall for {} milliseconds : exiting debugger...",
                    elapsed.as_millis()
                );
                self.phase = DebugPhase::Running;
            } else if host.read_byte(self.watch_address) != self.watch_snapshot {
                self.pause();
            }
        }
        self.phase
    }

    /// Whether a paused redraw is due at `now`. Records the frame if it is.
    pub fn frame_due(&mut self, now: Duration) -> bool {
        if !self.is_paused() {
            return false;
        }
        let due = match self.last_frame {
            Some(last) => now.checked_sub(last).unwrap_or_default() > self.frame_interval,
            None => true,
        };
        if due {
            self.last_frame = Some(now);
        }
        due
    }
}
