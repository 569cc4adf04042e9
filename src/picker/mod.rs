//! Selection state for the drop/browse target.
//!
//! The picker is a two-state machine (`Empty` / `Selected`) plus a visual
//! drag-active flag. Every terminal event the UI cares about is translated into
//! a [`PickerEvent`] and fed through [`FilePicker::handle`], which performs no IO
//! and reports what happened as an [`Outcome`].

pub mod browser;
pub mod file;
pub mod format;

pub use file::{FileHandle, MIME_CSV, MIME_JSON};
pub use format::format_file_size;

/// Size cap advertised in the drop zone (100 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Types the drop path accepts
pub const ACCEPTED_MIME_TYPES: [&str; 2] = [MIME_JSON, MIME_CSV];

/// Extensions the browse popup lists unless "show all files" is on
pub const BROWSE_EXTENSION_HINT: [&str; 2] = ["csv", "json"];

/// Acceptance rules applied when a candidate file is offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerPolicy {
    pub accepted_types: Vec<String>,
    /// `None` leaves the advertised cap cosmetic
    pub max_file_size: Option<u64>,
    /// Apply the drop-path checks to browse choices as well
    pub strict_browse: bool,
}

impl Default for PickerPolicy {
    fn default() -> Self {
        Self {
            accepted_types: ACCEPTED_MIME_TYPES.iter().map(|t| t.to_string()).collect(),
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
            strict_browse: false,
        }
    }
}

impl PickerPolicy {
    /// Check a candidate against the type allow-list and the size cap
    pub fn check(&self, file: &FileHandle) -> Result<(), Rejection> {
        if !self.accepted_types.iter().any(|t| *t == file.mime_type) {
            return Err(Rejection::UnsupportedType {
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            });
        }

        if let Some(limit) = self.max_file_size {
            if file.size > limit {
                return Err(Rejection::TooLarge {
                    name: file.name.clone(),
                    size: file.size,
                    limit,
                });
            }
        }

        Ok(())
    }
}

/// Why an offered file did not become the selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("{name}: unsupported type {} (CSV or JSON only)", type_label(.mime_type))]
    UnsupportedType { name: String, mime_type: String },

    #[error("{name}: file too large ({}, max {})", size_label(.size), size_label(.limit))]
    TooLarge { name: String, size: u64, limit: u64 },
}

fn type_label(mime_type: &str) -> &str {
    if mime_type.is_empty() {
        "(none)"
    } else {
        mime_type
    }
}

fn size_label(bytes: &u64) -> String {
    format_file_size(*bytes)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Empty,
    Selected(FileHandle),
}

/// Input events, independent of the terminal event model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    DragEnter,
    DragOver,
    DragLeave,
    /// Files carried by a drop, in payload order
    Drop(Vec<FileHandle>),
    /// Files chosen through the browse path
    Browse(Vec<FileHandle>),
    Remove,
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Selected,
    Cleared,
    DragUpdated,
    Rejected(Rejection),
    /// Nothing to act on (no files, or the target is not mounted)
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct FilePicker {
    selection: Selection,
    drag_active: bool,
    policy: PickerPolicy,
}

impl FilePicker {
    pub fn new(policy: PickerPolicy) -> Self {
        Self {
            selection: Selection::Empty,
            drag_active: false,
            policy,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected(&self) -> Option<&FileHandle> {
        match &self.selection {
            Selection::Selected(file) => Some(file),
            Selection::Empty => None,
        }
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    /// Submit is enabled exactly when a file is held
    pub fn can_submit(&self) -> bool {
        self.selected().is_some()
    }

    /// Apply one event.
    ///
    /// While a file is selected the drop target is replaced by the summary view,
    /// so only `Remove` has any effect.
    pub fn handle(&mut self, event: PickerEvent) -> Outcome {
        if matches!(self.selection, Selection::Selected(_)) {
            return match event {
                PickerEvent::Remove => self.clear(),
                _ => Outcome::Ignored,
            };
        }

        match event {
            PickerEvent::DragEnter | PickerEvent::DragOver => {
                self.drag_active = true;
                Outcome::DragUpdated
            }
            PickerEvent::DragLeave => {
                self.drag_active = false;
                Outcome::DragUpdated
            }
            PickerEvent::Drop(files) => {
                self.drag_active = false;
                self.offer(files, true)
            }
            // No MIME or size filtering here unless strict_browse is set; the
            // browse popup only hints at .csv/.json
            PickerEvent::Browse(files) => {
                let filtered = self.policy.strict_browse;
                self.offer(files, filtered)
            }
            PickerEvent::Remove => Outcome::Ignored,
        }
    }

    fn offer(&mut self, files: Vec<FileHandle>, filtered: bool) -> Outcome {
        // Only the first file counts, the rest are dropped silently
        let Some(first) = files.into_iter().next() else {
            return Outcome::Ignored;
        };

        if filtered {
            if let Err(rejection) = self.policy.check(&first) {
                return Outcome::Rejected(rejection);
            }
        }

        self.selection = Selection::Selected(first);
        Outcome::Selected
    }

    fn clear(&mut self) -> Outcome {
        self.selection = Selection::Empty;
        self.drag_active = false;
        Outcome::Cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(name: &str, size: u64, mime_type: &str) -> FileHandle {
        FileHandle {
            name: name.to_string(),
            size,
            mime_type: mime_type.to_string(),
            path: PathBuf::from("/tmp").join(name),
        }
    }

    #[test]
    fn test_drop_accepts_csv_and_json() {
        for candidate in [file("a.csv", 10, MIME_CSV), file("b.json", 10, MIME_JSON)] {
            let mut picker = FilePicker::default();
            assert_eq!(picker.handle(PickerEvent::Drop(vec![candidate.clone()])), Outcome::Selected);
            assert_eq!(picker.selected(), Some(&candidate));
        }
    }

    #[test]
    fn test_drop_rejects_other_types() {
        let mut picker = FilePicker::default();
        let outcome = picker.handle(PickerEvent::Drop(vec![file("report.pdf", 10, "application/pdf")]));

        assert!(matches!(outcome, Outcome::Rejected(Rejection::UnsupportedType { .. })));
        assert_eq!(picker.selection(), &Selection::Empty);
        assert!(!picker.can_submit());
    }

    #[test]
    fn test_drop_type_match_is_exact() {
        let mut picker = FilePicker::default();
        let outcome = picker.handle(PickerEvent::Drop(vec![file("a.csv", 10, "text/csv; charset=utf-8")]));
        assert!(matches!(outcome, Outcome::Rejected(_)));
        assert_eq!(picker.selected(), None);
    }

    #[test]
    fn test_drop_only_considers_first_file() {
        let mut picker = FilePicker::default();
        let first = file("notes.txt", 10, "text/plain");
        let second = file("data.csv", 10, MIME_CSV);

        let outcome = picker.handle(PickerEvent::Drop(vec![first, second.clone()]));
        assert!(matches!(outcome, Outcome::Rejected(_)));
        assert_eq!(picker.selected(), None);

        let outcome = picker.handle(PickerEvent::Drop(vec![second.clone(), file("x.json", 1, MIME_JSON)]));
        assert_eq!(outcome, Outcome::Selected);
        assert_eq!(picker.selected(), Some(&second));
    }

    #[test]
    fn test_empty_drop_and_browse_are_ignored() {
        let mut picker = FilePicker::default();
        picker.handle(PickerEvent::DragEnter);
        assert_eq!(picker.handle(PickerEvent::Drop(Vec::new())), Outcome::Ignored);
        assert!(!picker.drag_active());
        assert_eq!(picker.handle(PickerEvent::Browse(Vec::new())), Outcome::Ignored);
        assert_eq!(picker.selection(), &Selection::Empty);
    }

    #[test]
    fn test_browse_accepts_any_type() {
        let mut picker = FilePicker::default();
        let pdf = file("report.pdf", 10, "application/pdf");

        assert_eq!(picker.handle(PickerEvent::Browse(vec![pdf.clone()])), Outcome::Selected);
        assert_eq!(picker.selected(), Some(&pdf));
    }

    #[test]
    fn test_browse_ignores_size_cap() {
        let mut picker = FilePicker::default();
        let big = file("huge.csv", DEFAULT_MAX_FILE_SIZE + 1, MIME_CSV);
        assert_eq!(picker.handle(PickerEvent::Browse(vec![big])), Outcome::Selected);
    }

    #[test]
    fn test_strict_browse_applies_drop_checks() {
        let mut picker = FilePicker::new(PickerPolicy {
            strict_browse: true,
            ..PickerPolicy::default()
        });
        let outcome = picker.handle(PickerEvent::Browse(vec![file("report.pdf", 10, "application/pdf")]));
        assert!(matches!(outcome, Outcome::Rejected(_)));
        assert_eq!(picker.selected(), None);
    }

    #[test]
    fn test_drop_enforces_size_cap() {
        let mut picker = FilePicker::default();
        let outcome = picker.handle(PickerEvent::Drop(vec![file("huge.csv", DEFAULT_MAX_FILE_SIZE + 1, MIME_CSV)]));

        assert_eq!(
            outcome,
            Outcome::Rejected(Rejection::TooLarge {
                name: "huge.csv".to_string(),
                size: DEFAULT_MAX_FILE_SIZE + 1,
                limit: DEFAULT_MAX_FILE_SIZE,
            })
        );
        assert_eq!(picker.selected(), None);

        // Exactly at the cap is fine
        let outcome = picker.handle(PickerEvent::Drop(vec![file("max.csv", DEFAULT_MAX_FILE_SIZE, MIME_CSV)]));
        assert_eq!(outcome, Outcome::Selected);
    }

    #[test]
    fn test_cosmetic_size_cap() {
        let mut picker = FilePicker::new(PickerPolicy {
            max_file_size: None,
            ..PickerPolicy::default()
        });
        let outcome = picker.handle(PickerEvent::Drop(vec![file("huge.csv", u64::MAX, MIME_CSV)]));
        assert_eq!(outcome, Outcome::Selected);
    }

    #[test]
    fn test_drag_flag_orderings() {
        let sequences: [&[PickerEvent]; 3] = [
            &[PickerEvent::DragEnter, PickerEvent::DragLeave],
            &[PickerEvent::DragEnter, PickerEvent::Drop(Vec::new())],
            &[PickerEvent::DragEnter, PickerEvent::DragOver, PickerEvent::DragLeave],
        ];

        for events in sequences {
            let mut picker = FilePicker::default();
            let (last, leading) = events.split_last().unwrap();
            for event in leading {
                picker.handle(event.clone());
                assert!(picker.drag_active(), "{:?} should set drag-active", event);
            }
            picker.handle(last.clone());
            assert!(!picker.drag_active(), "{:?} should clear drag-active", last);
        }
    }

    #[test]
    fn test_rejected_drop_clears_drag_flag() {
        let mut picker = FilePicker::default();
        picker.handle(PickerEvent::DragOver);
        picker.handle(PickerEvent::Drop(vec![file("a.exe", 1, "application/octet-stream")]));
        assert!(!picker.drag_active());
    }

    #[test]
    fn test_selected_target_stops_listening() {
        let mut picker = FilePicker::default();
        let csv = file("data.csv", 2048, MIME_CSV);
        picker.handle(PickerEvent::Drop(vec![csv.clone()]));

        assert_eq!(picker.handle(PickerEvent::DragEnter), Outcome::Ignored);
        assert!(!picker.drag_active());
        assert_eq!(
            picker.handle(PickerEvent::Drop(vec![file("other.json", 1, MIME_JSON)])),
            Outcome::Ignored
        );
        assert_eq!(
            picker.handle(PickerEvent::Browse(vec![file("other.json", 1, MIME_JSON)])),
            Outcome::Ignored
        );
        assert_eq!(picker.selected(), Some(&csv));
    }

    #[test]
    fn test_submit_enablement_follows_selection() {
        let mut picker = FilePicker::default();
        assert!(!picker.can_submit());

        picker.handle(PickerEvent::Drop(vec![file("data.csv", 2048, MIME_CSV)]));
        assert!(picker.can_submit());

        assert_eq!(picker.handle(PickerEvent::Remove), Outcome::Cleared);
        assert!(!picker.can_submit());
        assert!(!picker.drag_active());
        assert_eq!(picker.handle(PickerEvent::Remove), Outcome::Ignored);
    }

    #[test]
    fn test_rejection_messages() {
        let too_large = Rejection::TooLarge {
            name: "big.csv".to_string(),
            size: 150 * 1024 * 1024,
            limit: DEFAULT_MAX_FILE_SIZE,
        };
        assert_eq!(too_large.to_string(), "big.csv: file too large (150.0 MB, max 100.0 MB)");

        let unsupported = Rejection::UnsupportedType {
            name: "a.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
        };
        assert_eq!(unsupported.to_string(), "a.pdf: unsupported type application/pdf (CSV or JSON only)");

        let folder = Rejection::UnsupportedType {
            name: "folder".to_string(),
            mime_type: String::new(),
        };
        assert_eq!(folder.to_string(), "folder: unsupported type (none) (CSV or JSON only)");
    }
}
