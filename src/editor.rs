//! The hex editor, program browser and single-step debugger of the vCPU front end.

pub mod browser;
pub mod config;
pub mod debugger;
pub mod hex_edit;
pub mod host;
pub mod input;
pub mod state;

use browser::{DirectoryBrowser, FileSystem, OsFileSystem};
use config::{EditorConfig, GRID_H};
use debugger::{DebugPhase, DebugStepper};
use host::{Host, View};
use input::{InputEvent, Signal, DEBUG_KEY, STEP_KEY};
use state::EditorState;

pub struct Editor<F: FileSystem> {
    config: EditorConfig,
    state: EditorState,
    browser: DirectoryBrowser<F>,
    debugger: DebugStepper,
}

impl Editor<OsFileSystem> {
    /// Create an editor browsing the real file system.
    pub fn new(config: EditorConfig) -> Editor<OsFileSystem> {
        Editor::with_file_system(config, OsFileSystem)
    }
}

impl<F: FileSystem> Editor<F> {
    pub fn with_file_system(config: EditorConfig, file_system: F) -> Editor<F> {
        let browser = DirectoryBrowser::new(file_system, config.base_path.clone(), GRID_H);
        let debugger = DebugStepper::new(&config);
        Editor {
            config,
            state: EditorState::new(),
            browser,
            debugger,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn browser(&self) -> &DirectoryBrowser<F> {
        &self.browser
    }

    pub fn debugger(&self) -> &DebugStepper {
        &self.debugger
    }

    pub fn debugger_mut(&mut self) -> &mut DebugStepper {
        &mut self.debugger
    }

    pub fn view(&self) -> View<'_> {
        View {
            state: &self.state,
            entries: self.browser.entries(),
            scroll_index: self.browser.scroll_index(),
            browser_path: self.browser.path(),
            phase: self.debugger.phase(),
        }
    }

    /// Handle one input event. While paused, the step key arms a single
    /// step on press and the debug key leaves the debugger on release;
    /// everything else is routed as usual.
    pub fn handle_event<H: Host + ?Sized>(&mut self, event: InputEvent, host: &mut H) -> Option<Signal> {
        log::trace!("{:?} in {:?}", event, self.debugger.phase());
        if self.debugger.is_paused() {
            match event {
                InputEvent::KeyDown(key) if key == STEP_KEY => {
                    self.debugger.arm(&*host);
                    return None;
                }
                InputEvent::KeyUp(key) if key == DEBUG_KEY => {
                    self.debugger.exit();
                    self.state.leave_debug();
                    return None;
                }
                _ => {}
            }
        }
        self.route(event, host)
    }

    /// Advance the debugger by one host frame. Returns the phase the host
    /// should run in; the machine must not advance while it is `Paused`.
    pub fn tick<H: Host + ?Sized>(&mut self, host: &mut H) -> DebugPhase {
        host.flush_pending_log_messages();
        let phase = self.debugger.poll(&*host);
        if self.debugger.frame_due(host.ticks()) {
            host.refresh(&self.view());
            host.present(false);
        }
        phase
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::editor::browser::tests::FakeFileSystem;
    use crate::editor::config::VIDEO_Y_ADDRESS;
    use crate::editor::host::DummyHost;
    use crate::editor::state::EditorMode;
    use crossterm::event::KeyCode;
    use std::time::Duration;

    fn editor() -> Editor<FakeFileSystem> {
        Editor::with_file_system(EditorConfig::default(), FakeFileSystem::default())
    }

    #[test]
    fn debug_key_pauses_and_restores_mode() {
        let mut editor = editor();
        let mut host = DummyHost::new();
        editor.handle_event(InputEvent::KeyUp(KeyCode::Char('l')), &mut host);
        editor.handle_event(InputEvent::KeyUp(DEBUG_KEY), &mut host);
        assert_eq!(editor.state().mode(), EditorMode::Debug);
        assert_eq!(editor.tick(&mut host), DebugPhase::Paused);

        editor.handle_event(InputEvent::KeyUp(DEBUG_KEY), &mut host);
        assert_eq!(editor.state().mode(), EditorMode::Load);
        assert_eq!(editor.tick(&mut host), DebugPhase::Running);
    }

    #[test]
    fn step_key_only_arms_while_paused() {
        let mut editor = editor();
        let mut host = DummyHost::new();
        editor.handle_event(InputEvent::KeyDown(STEP_KEY), &mut host);
        assert_eq!(editor.debugger().phase(), DebugPhase::Running);

        editor.handle_event(InputEvent::KeyUp(DEBUG_KEY), &mut host);
        editor.handle_event(InputEvent::KeyDown(STEP_KEY), &mut host);
        assert_eq!(editor.debugger().phase(), DebugPhase::Armed);
    }

    #[test]
    fn paused_ticks_render_throttled() {
        let mut editor = editor();
        let mut host = DummyHost::new();
        editor.handle_event(InputEvent::KeyUp(DEBUG_KEY), &mut host);
        for _ in 0..10 {
            editor.tick(&mut host);
            host.advance(Duration::from_millis(5));
        }
        // 50ms at 60Hz is three frames
        assert_eq!(host.refreshes, 3);
        assert_eq!(host.presents, 3);
        assert_eq!(host.log_flushes, 10);
    }

    #[test]
    fn single_step_pauses_again_on_change() {
        let mut editor = editor();
        let mut host = DummyHost::new();
        editor.handle_event(InputEvent::KeyUp(DEBUG_KEY), &mut host);
        editor.handle_event(InputEvent::KeyDown(STEP_KEY), &mut host);
        assert!(editor.tick(&mut host).runs_machine());

        host.advance(Duration::from_millis(5));
        host.ram[VIDEO_Y_ADDRESS as usize] = 0x42;
        assert_eq!(editor.tick(&mut host), DebugPhase::Paused);
        assert_eq!(editor.state().mode(), EditorMode::Debug);
    }

    #[test]
    fn wheel_works_while_paused() {
        let mut editor = editor();
        let mut host = DummyHost::new();
        editor.handle_event(InputEvent::KeyUp(DEBUG_KEY), &mut host);
        editor.handle_event(InputEvent::Wheel(-1), &mut host);
        assert_eq!(editor.state().hex_base_address(), 0x0210);
    }
}
