//! Directory listing behind the browse popup.
//!
//! The listing hints at `.csv`/`.json` the way a file dialog's `accept` filter
//! does: other files are hidden until the user turns on "show all files".

use std::path::{Path, PathBuf};

use super::file::{FileError, FileHandle};
use super::BROWSE_EXTENSION_HINT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserEntry {
    pub name: String,
    pub is_dir: bool,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DirectoryBrowser {
    pub path: PathBuf,
    pub entries: Vec<BrowserEntry>,
    pub selected: usize,
    pub show_all: bool,
}

impl DirectoryBrowser {
    pub fn new(path: PathBuf, show_all: bool) -> Self {
        let mut browser = Self {
            path,
            entries: Vec::new(),
            selected: 0,
            show_all,
        };
        browser.refresh();
        browser
    }

    /// Re-read the current directory
    pub fn refresh(&mut self) {
        self.entries.clear();

        // Parent entry unless at root
        if let Some(parent) = self.path.parent() {
            self.entries.push(BrowserEntry {
                name: "..".to_string(),
                is_dir: true,
                path: parent.to_path_buf(),
            });
        }

        match std::fs::read_dir(&self.path) {
            Ok(entries) => {
                let mut dirs: Vec<BrowserEntry> = Vec::new();
                let mut files: Vec<BrowserEntry> = Vec::new();

                for entry in entries.flatten() {
                    let path = entry.path();
                    let name = entry.file_name().to_string_lossy().to_string();

                    if name.starts_with('.') {
                        continue;
                    }

                    if path.is_dir() {
                        dirs.push(BrowserEntry { name, is_dir: true, path });
                    } else if self.show_all || matches_hint(&path) {
                        files.push(BrowserEntry { name, is_dir: false, path });
                    }
                }

                dirs.sort_by_key(|e| e.name.to_lowercase());
                files.sort_by_key(|e| e.name.to_lowercase());

                self.entries.extend(dirs);
                self.entries.extend(files);
            }
            Err(e) => tracing::warn!("Cannot list {}: {}", self.path.display(), e),
        }

        if self.selected >= self.entries.len() {
            self.selected = 0;
        }
    }

    pub fn move_down(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1) % self.entries.len();
        }
    }

    pub fn move_up(&mut self) {
        if !self.entries.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.entries.len() - 1);
        }
    }

    pub fn enter_dir(&mut self, path: PathBuf) {
        self.path = path;
        self.selected = 0;
        self.refresh();
    }

    pub fn go_up(&mut self) {
        if let Some(parent) = self.path.parent().map(Path::to_path_buf) {
            self.enter_dir(parent);
        }
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all = !self.show_all;
        self.refresh();
    }

    pub fn selected_entry(&self) -> Option<&BrowserEntry> {
        self.entries.get(self.selected)
    }

    /// Activate the highlighted entry.
    ///
    /// Directories are entered and yield `Ok(None)`; a file yields its handle.
    pub fn activate(&mut self) -> Result<Option<FileHandle>, FileError> {
        let Some(entry) = self.selected_entry().cloned() else {
            return Ok(None);
        };

        if entry.is_dir {
            self.enter_dir(entry.path);
            Ok(None)
        } else {
            FileHandle::from_path(&entry.path).map(Some)
        }
    }
}

fn matches_hint(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            BROWSE_EXTENSION_HINT
                .iter()
                .any(|hint| e.eq_ignore_ascii_case(hint))
        })
        .unwrap_or(false)
}
