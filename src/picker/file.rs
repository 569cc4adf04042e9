//! File handles produced by the drop and browse paths.

use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const MIME_JSON: &str = "application/json";
pub const MIME_CSV: &str = "text/csv";
const MIME_FALLBACK: &str = "application/octet-stream";

/// Declared type by extension (lowercase, no dot)
const EXTENSION_TYPES: &[(&str, &str)] = &[
    ("json", MIME_JSON),
    ("csv", MIME_CSV),
    ("tsv", "text/tab-separated-values"),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("html", "text/html"),
    ("xml", "application/xml"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("xls", "application/vnd.ms-excel"),
    ("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
];

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("{} is not a regular file", .0.display())]
    NotAFile(PathBuf),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single file offered to the picker.
///
/// Carries the attributes the summary shows (`name`, `size`) plus the declared
/// `mime_type` the drop path filters on. `path` is the content accessor handed to
/// the submit collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHandle {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub path: PathBuf,
}

impl FileHandle {
    /// Build a handle from a path on disk, declaring its type from the extension
    pub fn from_path(path: &Path) -> Result<Self, FileError> {
        let metadata = std::fs::metadata(path).map_err(|source| FileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if !metadata.is_file() {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Ok(Self {
            name,
            size: metadata.len(),
            mime_type: mime_type_for(path).to_string(),
            path: path.to_path_buf(),
        })
    }

    /// Handle for a dropped entry that is not a regular file (a folder)
    fn untyped(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Self {
            name,
            size: 0,
            mime_type: String::new(),
            path: path.to_path_buf(),
        }
    }

    /// Read the full file contents
    #[allow(dead_code)] // for submit handlers that upload the bytes
    pub fn read_bytes(&self) -> Result<Vec<u8>, FileError> {
        std::fs::read(&self.path).map_err(|source| FileError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Declared MIME type for a path, based on its extension only
pub fn mime_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return MIME_FALLBACK;
    };
    let ext = ext.to_ascii_lowercase();

    EXTENSION_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(MIME_FALLBACK)
}

/// Split a terminal drop payload into paths.
///
/// Terminals deliver a dropped file as pasted text: one or more paths separated
/// by whitespace, optionally quoted, with backslash-escaped spaces, or as
/// percent-encoded `file://` URLs.
pub fn parse_dropped_paths(payload: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = payload.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => quote = Some(c),
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                }
                c if c.is_whitespace() => push_token(&mut paths, &mut current),
                c => current.push(c),
            },
        }
    }
    push_token(&mut paths, &mut current);

    paths
}

fn push_token(paths: &mut Vec<PathBuf>, current: &mut String) {
    if current.is_empty() {
        return;
    }
    let token = std::mem::take(current);
    paths.push(decode_file_url(&token));
}

fn decode_file_url(token: &str) -> PathBuf {
    match token.strip_prefix("file://") {
        Some(rest) => {
            // file://host/path keeps only the path part
            let path = rest.find('/').map(|i| &rest[i..]).unwrap_or(rest);
            PathBuf::from(percent_decode_str(path).decode_utf8_lossy().into_owned())
        }
        None => PathBuf::from(token),
    }
}

/// Resolve a drop payload into the file it carries.
///
/// Only the first dropped item is looked at. A folder becomes a handle with no
/// declared type, so the drop rules reject it; a missing path carries nothing.
/// Later items are never consulted.
pub fn resolve_dropped(payload: &str) -> Vec<FileHandle> {
    let Some(first) = parse_dropped_paths(payload).into_iter().next() else {
        return Vec::new();
    };

    match FileHandle::from_path(&first) {
        Ok(handle) => vec![handle],
        Err(FileError::NotAFile(path)) => vec![FileHandle::untyped(&path)],
        Err(e) => {
            tracing::debug!("Dropped path carries no file: {}", e);
            Vec::new()
        }
    }
}
