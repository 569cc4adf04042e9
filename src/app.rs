use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use std::path::Path;
use std::time::Instant;

use crate::config::AppConfig;
use crate::picker::browser::DirectoryBrowser;
use crate::picker::file::resolve_dropped;
use crate::picker::{FileHandle, FilePicker, Outcome, PickerEvent};
use crate::submit::SubmitHandler;
use crate::ui;

/// Seconds a status message stays in the info line
const STATUS_SECONDS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Browser,
    Help,
}

pub struct App {
    pub popup: Popup,
    pub picker: FilePicker,
    pub browser: Option<DirectoryBrowser>,
    pub config: AppConfig,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    /// Last known terminal area, for mouse hit testing
    pub area: Rect,

    /// Left button went down on the empty drop zone and has not moved yet
    zone_press: bool,

    submitter: Box<dyn SubmitHandler>,
}

impl App {
    pub fn new(config: AppConfig, submitter: Box<dyn SubmitHandler>) -> Self {
        Self {
            popup: Popup::None,
            picker: FilePicker::new(config.policy()),
            browser: None,
            config,
            status_message: None,
            status_message_time: None,
            area: Rect::default(),
            zone_press: false,
            submitter,
        }
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    fn apply(&mut self, event: PickerEvent) -> Outcome {
        let outcome = self.picker.handle(event);
        tracing::debug!(?outcome, drag_active = self.picker.drag_active(), "Picker transition");

        if let Outcome::Rejected(ref rejection) = outcome {
            self.set_status(rejection.to_string());
        }
        outcome
    }

    /// Select a file through the browse path (also used for `--file`)
    pub fn choose_path(&mut self, path: &Path) -> Result<Outcome> {
        let file = FileHandle::from_path(path)
            .with_context(|| format!("Cannot open {}", path.display()))?;
        Ok(self.apply(PickerEvent::Browse(vec![file])))
    }

    /// A terminal file drop arrives as a bracketed paste
    pub fn handle_paste(&mut self, payload: &str) -> Outcome {
        if self.popup != Popup::None {
            return Outcome::Ignored;
        }

        self.apply(PickerEvent::DragEnter);
        let files = resolve_dropped(payload);
        self.apply(PickerEvent::Drop(files))
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Browser => self.handle_browser_key(key),
            Popup::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')) {
                    self.popup = Popup::None;
                }
                Ok(())
            }
            Popup::None => self.handle_normal_key(key).await,
        }
    }

    async fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            // Enter browses while empty, submits once a file is held
            KeyCode::Enter => {
                if self.picker.can_submit() {
                    self.submit().await?;
                } else {
                    self.start_browser();
                }
            }
            KeyCode::Char('b') | KeyCode::Char('o') => {
                if !self.picker.can_submit() {
                    self.start_browser();
                }
            }
            KeyCode::Char('s') => self.submit().await?,
            KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete | KeyCode::Backspace => {
                self.apply(PickerEvent::Remove);
            }
            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,
            _ => {}
        }
        Ok(())
    }

    pub async fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        if self.popup != Popup::None {
            return Ok(());
        }

        let regions = ui::regions(self.area);
        let at = Position::new(mouse.column, mouse.row);
        let has_file = self.picker.can_submit();

        match mouse.kind {
            MouseEventKind::Drag(_) => {
                self.zone_press = false;
                if regions.zone.contains(at) {
                    let event = if self.picker.drag_active() {
                        PickerEvent::DragOver
                    } else {
                        PickerEvent::DragEnter
                    };
                    self.apply(event);
                } else if self.picker.drag_active() {
                    self.apply(PickerEvent::DragLeave);
                }
            }
            MouseEventKind::Up(_) => {
                let clicked_zone = std::mem::take(&mut self.zone_press) && regions.zone.contains(at);
                // A mouse drag carries no files, so releasing it just leaves
                if self.picker.drag_active() {
                    self.apply(PickerEvent::DragLeave);
                } else if clicked_zone && !has_file {
                    self.start_browser();
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.zone_press = false;
                if regions.submit.contains(at) {
                    self.submit().await?;
                } else if has_file && regions.remove.contains(at) {
                    self.apply(PickerEvent::Remove);
                } else if !has_file && regions.zone.contains(at) {
                    // Browse on release, so a press can still turn into a drag
                    self.zone_press = true;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Hand the selected file to the submit collaborator
    pub async fn submit(&mut self) -> Result<()> {
        let Some(file) = self.picker.selected().cloned() else {
            return Ok(());
        };
        self.submitter.submit(&file).await
    }

    fn start_browser(&mut self) {
        let start = self
            .browser
            .as_ref()
            .map(|b| b.path.clone())
            .unwrap_or_else(|| self.config.browse_start());
        self.browser = Some(DirectoryBrowser::new(start, self.config.show_all_files));
        self.popup = Popup::Browser;
    }

    fn handle_browser_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(browser) = self.browser.as_mut() else {
            self.popup = Popup::None;
            return Ok(());
        };

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.popup = Popup::None,
            KeyCode::Char('j') | KeyCode::Down => browser.move_down(),
            KeyCode::Char('k') | KeyCode::Up => browser.move_up(),
            KeyCode::Backspace => browser.go_up(),
            KeyCode::Char('~') => {
                if let Some(home) = dirs::home_dir() {
                    browser.enter_dir(home);
                }
            }
            KeyCode::Char('a') => browser.toggle_show_all(),
            KeyCode::Enter | KeyCode::Char(' ') => match browser.activate() {
                Ok(Some(file)) => {
                    self.popup = Popup::None;
                    self.apply(PickerEvent::Browse(vec![file]));
                }
                Ok(None) => {}
                Err(e) => self.set_status(format!("Cannot read: {}", e)),
            },
            _ => {}
        }
        Ok(())
    }

    pub fn tick(&mut self) {
        // Clear status message after timeout
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_SECONDS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::{format_file_size, Selection, MIME_CSV};
    use crossterm::event::{KeyModifiers, MouseEventKind};
    use std::fs;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        submitted: Arc<Mutex<Vec<FileHandle>>>,
    }

    #[async_trait::async_trait]
    impl SubmitHandler for Recorder {
        async fn submit(&self, file: &FileHandle) -> Result<()> {
            self.submitted.lock().unwrap().push(file.clone());
            Ok(())
        }
    }

    fn app() -> (App, Recorder) {
        let recorder = Recorder::default();
        let mut app = App::new(AppConfig::default(), Box::new(recorder.clone()));
        app.area = Rect::new(0, 0, 80, 30);
        (app, recorder)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[tokio::test]
    async fn test_drop_submit_remove_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, vec![b'1'; 2048]).unwrap();
        let (mut app, recorder) = app();

        assert_eq!(app.handle_paste(&path.display().to_string()), Outcome::Selected);
        let selected = app.picker.selected().cloned().unwrap();
        assert_eq!(selected.name, "data.csv");
        assert_eq!(selected.mime_type, MIME_CSV);
        assert_eq!(format_file_size(selected.size), "2.0 KB");
        assert!(app.picker.can_submit());
        assert!(!app.picker.drag_active());

        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(recorder.submitted.lock().unwrap().as_slice(), &[selected]);

        app.handle_key(key(KeyCode::Char('d'))).await.unwrap();
        assert_eq!(app.picker.selection(), &Selection::Empty);
        assert!(!app.picker.can_submit());
    }

    #[tokio::test]
    async fn test_submit_without_file_does_nothing() {
        let (mut app, recorder) = app();
        app.submit().await.unwrap();
        app.handle_key(key(KeyCode::Char('s'))).await.unwrap();
        assert!(recorder.submitted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_rejected_drop_sets_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        fs::write(&path, b"%PDF").unwrap();
        let (mut app, _) = app();

        let outcome = app.handle_paste(&path.display().to_string());
        assert!(matches!(outcome, Outcome::Rejected(_)));
        assert_eq!(app.picker.selected(), None);
        assert!(app.status_message.as_deref().unwrap().contains("report.pdf"));
    }

    #[test]
    fn test_drop_with_folder_first_selects_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("folder");
        fs::create_dir(&folder).unwrap();
        let csv = dir.path().join("data.csv");
        fs::write(&csv, "a,b\n").unwrap();
        let (mut app, _) = app();

        let outcome = app.handle_paste(&format!("{} {}", folder.display(), csv.display()));
        assert!(matches!(outcome, Outcome::Rejected(_)));
        assert_eq!(app.picker.selected(), None);
    }

    #[test]
    fn test_drop_of_missing_path_is_ignored() {
        let (mut app, _) = app();
        assert_eq!(app.handle_paste("/definitely/not/here.csv"), Outcome::Ignored);
        assert_eq!(app.status_message, None);
    }

    #[test]
    fn test_choose_path_skips_type_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();
        let (mut app, _) = app();

        assert_eq!(app.choose_path(&path).unwrap(), Outcome::Selected);
        assert_eq!(app.picker.selected().unwrap().name, "notes.txt");
        assert!(app.choose_path(&dir.path().join("missing.csv")).is_err());
    }

    #[tokio::test]
    async fn test_browser_popup_selects_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("inventory.json"), "{}").unwrap();
        let (mut app, _) = app();
        app.config.start_dir = Some(dir.path().to_path_buf());

        app.handle_key(key(KeyCode::Char('b'))).await.unwrap();
        assert_eq!(app.popup, Popup::Browser);

        // ".." then "inventory.json"
        app.handle_key(key(KeyCode::Down)).await.unwrap();
        app.handle_key(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.picker.selected().unwrap().name, "inventory.json");
    }

    #[tokio::test]
    async fn test_mouse_drag_toggles_drag_flag() {
        let (mut app, _) = app();
        let zone = ui::regions(app.area).zone;
        let (x, y) = (zone.x + zone.width / 2, zone.y + zone.height / 2);

        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), x, y)).await.unwrap();
        assert!(app.picker.drag_active());
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), x, y)).await.unwrap();
        assert!(app.picker.drag_active());

        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 0, 0)).await.unwrap();
        assert!(!app.picker.drag_active());

        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), x, y)).await.unwrap();
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), x, y)).await.unwrap();
        assert!(!app.picker.drag_active());
    }

    #[tokio::test]
    async fn test_mouse_clicks_remove_and_submit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a,b\n").unwrap();
        let (mut app, recorder) = app();
        app.handle_paste(&path.display().to_string());

        let regions = ui::regions(app.area);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), regions.submit.x + 2, regions.submit.y + 1))
            .await
            .unwrap();
        assert_eq!(recorder.submitted.lock().unwrap().len(), 1);

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), regions.remove.x, regions.remove.y))
            .await
            .unwrap();
        assert_eq!(app.picker.selected(), None);

        // Clicking the empty zone opens the browser on release
        let (x, y) = (regions.zone.x + 2, regions.zone.y + 2);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x, y)).await.unwrap();
        assert_eq!(app.popup, Popup::None);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), x, y)).await.unwrap();
        assert_eq!(app.popup, Popup::Browser);
    }

    #[tokio::test]
    async fn test_drag_starting_inside_zone_sets_drag_flag() {
        let (mut app, _) = app();
        let zone = ui::regions(app.area).zone;
        let (x, y) = (zone.x + zone.width / 2, zone.y + zone.height / 2);

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x, y)).await.unwrap();
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), x + 1, y)).await.unwrap();
        assert_eq!(app.popup, Popup::None);
        assert!(app.picker.drag_active());

        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), x + 1, y)).await.unwrap();
        assert!(!app.picker.drag_active());
        assert_eq!(app.popup, Popup::None);
    }

    #[test]
    fn test_status_message_expires() {
        let (mut app, _) = app();
        app.set_status("hello");
        app.tick();
        assert!(app.status_message.is_some());

        app.status_message_time = Some(Instant::now() - std::time::Duration::from_secs(STATUS_SECONDS));
        app.tick();
        assert!(app.status_message.is_none());
    }
}
