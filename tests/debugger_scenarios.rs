use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, Once};
use std::time::Duration;

use crossterm::event::KeyCode;
use log::{Level, LevelFilter, Log, Metadata, Record};
use pretty_assertions::assert_eq;

use vcpu_editor::editor::config::{EditorConfig, VIDEO_Y_ADDRESS};
use vcpu_editor::editor::debugger::DebugPhase;
use vcpu_editor::editor::host::DummyHost;
use vcpu_editor::editor::input::{InputEvent, DEBUG_KEY, STEP_KEY};
use vcpu_editor::editor::state::EditorMode;
use vcpu_editor::editor::Editor;

/// A fresh directory under the system temp dir, removed on drop.
struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> TempDir {
        let path = std::env::temp_dir().join(format!("vcpu_editor_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).unwrap();
        TempDir(path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// Keeps every error logged by the library so tests can look for it.
struct ErrorLog {
    messages: Mutex<Vec<String>>,
}

impl Log for ErrorLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Error
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut messages) = self.messages.lock() {
                messages.push(record.args().to_string());
            }
        }
    }

    fn flush(&self) {}
}

static ERROR_LOG: ErrorLog = ErrorLog { messages: Mutex::new(Vec::new()) };
static INSTALL_LOGGER: Once = Once::new();

fn logged_errors() -> Vec<String> {
    INSTALL_LOGGER.call_once(|| {
        log::set_logger(&ERROR_LOG).unwrap();
        log::set_max_level(LevelFilter::Error);
    });
    ERROR_LOG.messages.lock().unwrap().clone()
}

fn paused_editor(config: EditorConfig, host: &mut DummyHost) -> Editor<vcpu_editor::editor::browser::OsFileSystem> {
    let mut editor = Editor::new(config);
    editor.handle_event(InputEvent::KeyUp(DEBUG_KEY), host);
    assert_eq!(editor.tick(host), DebugPhase::Paused);
    editor
}

#[test]
fn stalled_single_step_resumes_running() {
    let errors_before = logged_errors().len();
    let mut host = DummyHost::new();
    let mut editor = paused_editor(EditorConfig::default(), &mut host);

    editor.handle_event(InputEvent::KeyDown(STEP_KEY), &mut host);
    for _ in 0..50 {
        host.advance(Duration::from_millis(10));
        editor.tick(&mut host);
    }
    host.advance(Duration::from_millis(10));
    assert_eq!(editor.tick(&mut host), DebugPhase::Running);
    assert!(!editor.debugger().is_paused());

    let stalls = logged_errors()[errors_before..].iter().filter(|m| m.contains("Single step stall")).count();
    assert_eq!(stalls, 1);
}

#[test]
fn single_step_pauses_after_watch_changes() {
    let mut host = DummyHost::new();
    let mut editor = paused_editor(EditorConfig::default(), &mut host);

    editor.handle_event(InputEvent::KeyDown(STEP_KEY), &mut host);
    assert_eq!(editor.tick(&mut host), DebugPhase::Armed);
    host.advance(Duration::from_millis(5));
    host.ram[VIDEO_Y_ADDRESS as usize] += 1;
    assert_eq!(editor.tick(&mut host), DebugPhase::Paused);
}

#[test]
fn custom_watch_address_is_used() {
    let mut host = DummyHost::new();
    let config = EditorConfig { watch_address: 0x0100, ..EditorConfig::default() };
    let mut editor = paused_editor(config, &mut host);

    editor.handle_event(InputEvent::KeyDown(STEP_KEY), &mut host);
    host.ram[VIDEO_Y_ADDRESS as usize] = 9;
    assert_eq!(editor.tick(&mut host), DebugPhase::Armed);
    host.ram[0x0100] = 9;
    assert_eq!(editor.tick(&mut host), DebugPhase::Paused);
}

#[test]
fn leaving_debug_restores_hex_mode() {
    let mut host = DummyHost::new();
    let mut editor = paused_editor(EditorConfig::default(), &mut host);
    assert_eq!(editor.state().mode(), EditorMode::Debug);
    editor.handle_event(InputEvent::KeyUp(DEBUG_KEY), &mut host);
    assert_eq!(editor.state().mode(), EditorMode::Hex);
    assert_eq!(editor.tick(&mut host), DebugPhase::Running);
}

#[test]
fn browses_real_directory() {
    let dir = TempDir::new("browse");
    fs::create_dir(dir.0.join("demos")).unwrap();
    fs::write(dir.0.join("b.vasm"), b"").unwrap();
    fs::write(dir.0.join("a.gt1"), b"").unwrap();
    fs::write(dir.0.join("readme.txt"), b"").unwrap();
    fs::write(dir.0.join("demos").join("life.gt1"), b"").unwrap();

    let config = EditorConfig { base_path: dir.0.clone(), ..EditorConfig::default() };
    let mut editor = Editor::new(config);
    let mut host = DummyHost::new();
    editor.handle_event(InputEvent::KeyUp(KeyCode::Char('l')), &mut host);

    let names: Vec<_> = editor.browser().entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["demos", "a.gt1", "b.vasm"]);

    editor.handle_event(InputEvent::KeyUp(KeyCode::Enter), &mut host);
    let names: Vec<_> = editor.browser().entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["..", "life.gt1"]);

    editor.handle_event(InputEvent::KeyDown(KeyCode::Down), &mut host);
    editor.handle_event(InputEvent::KeyUp(KeyCode::Enter), &mut host);
    assert_eq!(host.uploads, vec![dir.0.join("demos").join("life.gt1")]);
}

#[test]
fn missing_directory_lists_nothing() {
    let config = EditorConfig { base_path: PathBuf::from("/definitely/not/here"), ..EditorConfig::default() };
    let mut editor = Editor::new(config);
    let mut host = DummyHost::new();
    editor.handle_event(InputEvent::KeyUp(KeyCode::Char('l')), &mut host);
    assert_eq!(editor.state().mode(), EditorMode::Load);
    assert!(editor.browser().entries().is_empty());

    // Nothing to select, so activating does nothing
    editor.handle_event(InputEvent::KeyUp(KeyCode::Enter), &mut host);
    assert!(host.uploads.is_empty());
}
