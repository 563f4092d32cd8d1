//! Append-only CSV result log.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use sat_triage_core::{Decision, LOG_HEADER};

/// One line per decision. Writers are serialised so lines never interleave.
#[derive(Debug)]
pub struct ResultLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ResultLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the flattened decision, writing the header first if the file is new.
    pub async fn append(&self, filename: &str, decision: &Decision) -> std::io::Result<()> {
        let line = decision.log_line(filename);
        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let mut out = String::new();
        if file.metadata().await?.len() == 0 {
            out.push_str(LOG_HEADER);
            out.push('\n');
        }
        out.push_str(&line);
        out.push('\n');

        file.write_all(out.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
