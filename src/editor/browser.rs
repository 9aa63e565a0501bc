//! Listing and navigating the directory of loadable vCPU programs.

use crate::editor::config::{BINARY_EXTENSION, SOURCE_EXTENSION};
use std::io;
use std::path::{Path, PathBuf};

const SELF_REFERENCE: &str = ".";
const PARENT_REFERENCE: &str = "..";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Dir,
    File,
}

/// One row of the program browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub kind: FileKind,
    pub name: String,
}

impl FileEntry {
    pub fn dir(name: &str) -> FileEntry {
        FileEntry { kind: FileKind::Dir, name: name.to_string() }
    }

    pub fn file(name: &str) -> FileEntry {
        FileEntry { kind: FileKind::File, name: name.to_string() }
    }

    pub fn is_parent(&self) -> bool {
        self.kind == FileKind::Dir && self.name == PARENT_REFERENCE
    }
}

/// A raw directory entry as the file system reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Something that can list a directory.
pub trait FileSystem {
    /// List every entry of `path`, including the self and parent references.
    fn list_directory(&self, path: &Path) -> io::Result<Vec<DirEntry>>;
}

/// The real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn list_directory(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        // `read_dir` leaves out the self and parent references, so add them back
        let mut entries = vec![
            DirEntry { name: SELF_REFERENCE.to_string(), is_dir: true },
            DirEntry { name: PARENT_REFERENCE.to_string(), is_dir: true },
        ];
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if !file_type.is_dir() && !file_type.is_file() {
                continue;
            }
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: file_type.is_dir(),
            });
        }
        Ok(entries)
    }
}

fn is_program(name: &str) -> bool {
    name.ends_with(SOURCE_EXTENSION) || name.ends_with(BINARY_EXTENSION)
}

/// The program browser, rooted at a fixed base directory.
pub struct DirectoryBrowser<F: FileSystem> {
    file_system: F,
    base_path: PathBuf,
    relative_path: PathBuf,
    entries: Vec<FileEntry>,
    scroll_index: usize,
    window_size: usize,
}

impl<F: FileSystem> DirectoryBrowser<F> {
    pub fn new(file_system: F, base_path: PathBuf, window_size: usize) -> DirectoryBrowser<F> {
        DirectoryBrowser {
            file_system,
            base_path,
            relative_path: PathBuf::new(),
            entries: Vec::new(),
            scroll_index: 0,
            window_size,
        }
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&FileEntry> {
        self.entries.get(index)
    }

    pub fn scroll_index(&self) -> usize {
        self.scroll_index
    }

    pub fn at_root(&self) -> bool {
        self.relative_path.as_os_str().is_empty()
    }

    /// The directory currently being shown.
    pub fn path(&self) -> PathBuf {
        if self.at_root() {
            self.base_path.clone()
        } else {
            self.base_path.join(&self.relative_path)
        }
    }

    /// List `path` as browser entries: directories first, then programs,
    /// each group sorted by name. A directory that cannot be read lists as empty.
    pub fn list(&self, path: &Path) -> Vec<FileEntry> {
        let raw = match self.file_system.list_directory(path) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Could not list {:?}: {}", path, e);
                return Vec::new();
            }
        };

        let at_root = path == self.base_path.as_path();
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in raw {
            if entry.is_dir {
                if entry.name != SELF_REFERENCE && !(at_root && entry.name == PARENT_REFERENCE) {
                    dirs.push(entry.name);
                }
            } else if is_program(&entry.name) {
                files.push(entry.name);
            }
        }
        dirs.sort();
        files.sort();

        dirs.iter()
            .map(|name| FileEntry::dir(name))
            .chain(files.iter().map(|name| FileEntry::file(name)))
            .collect()
    }

    /// Replace the entries with a fresh listing of the current directory.
    pub fn browse(&mut self) {
        let path = self.path();
        self.entries = self.list(&path);
        self.scroll_index = 0;
        log::info!("Browsing {:?}, {} entries", path, self.entries.len());
    }

    /// Enter a directory. The parent reference always leads back to the root.
    pub fn navigate(&mut self, entry: &FileEntry) {
        if entry.is_parent() {
            self.relative_path = PathBuf::new();
        } else {
            self.relative_path.push(&entry.name);
        }
        self.browse();
    }

    fn max_scroll(&self) -> usize {
        self.entries.len().saturating_sub(self.window_size)
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_index = (self.scroll_index + rows).min(self.max_scroll());
        log::debug!("Browser scrolled to {}", self.scroll_index);
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_index = self.scroll_index.saturating_sub(rows);
        log::debug!("Browser scrolled to {}", self.scroll_index);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.window_size);
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.window_size);
    }
}
