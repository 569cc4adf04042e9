//! Submit collaborator boundary.
//!
//! The picker only hands the selected file over; upload transport and the
//! harmonization pipeline live behind [`SubmitHandler`].

use anyhow::Result;
use async_trait::async_trait;

use crate::picker::{format_file_size, FileHandle};

#[async_trait]
pub trait SubmitHandler: Send + Sync {
    async fn submit(&self, file: &FileHandle) -> Result<()>;
}

/// Stub processor: records the file and does nothing else
pub struct LoggingSubmitter {
    notifications: bool,
}

impl LoggingSubmitter {
    pub fn new(notifications: bool) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl SubmitHandler for LoggingSubmitter {
    async fn submit(&self, file: &FileHandle) -> Result<()> {
        tracing::info!(
            name = %file.name,
            size = file.size,
            mime_type = %file.mime_type,
            path = %file.path.display(),
            "Processing file"
        );

        if self.notifications {
            let body = format!("{} ({})", file.name, format_file_size(file.size));
            if let Err(e) = notify("Processing file", &body) {
                tracing::warn!("Notification failed: {}", e);
            }
        }

        Ok(())
    }
}

fn notify(summary: &str, body: &str) -> Result<()> {
    notify_rust::Notification::new()
        .appname("dropzone")
        .summary(summary)
        .body(body)
        .icon("document-send")
        .show()?;
    Ok(())
}
