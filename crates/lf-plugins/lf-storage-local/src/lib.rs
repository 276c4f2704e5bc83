//! # lf-storage-local
//! lost-found/crates/lf-plugins/lf-storage-local/src/lib.rs
//! Local implementations of `DocumentStore`.
//! Features: one JSON file per board, atomic replace on save, seeding on first load.

mod memory;

pub use memory::MemoryStore;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use lf_core::models::Document;
use lf_core::seed::{Seed, STORAGE_KEY};
use lf_core::traits::DocumentStore;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

pub struct JsonFileStore {
    /// Full path of the document (e.g., "./data/lf_app_db_v1.json")
    path: PathBuf,
    /// Content written when the file does not exist yet
    seed: Seed,
}

impl JsonFileStore {
    /// Stores the document as `<data_dir>/lf_app_db_v1.json`.
    pub fn new(data_dir: impl Into<PathBuf>, seed: Seed) -> Self {
        let path = data_dir.into().join(format!("{STORAGE_KEY}.json"));
        Self { path, seed }
    }

    pub fn at_path(path: impl Into<PathBuf>, seed: Seed) -> Self {
        Self { path: path.into(), seed }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling used for write-then-rename: "lf_app_db_v1.json.tmp"
    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    /// Reads and parses the file, seeding it if it is missing.
    /// A file that exists but does not parse is an error, never reseeded.
    async fn load(&self) -> anyhow::Result<Document> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let doc: Document = serde_json::from_str(&raw)
                    .with_context(|| format!("corrupt document at {}", self.path.display()))?;
                debug!(path = %self.path.display(), users = doc.users.len(), posts = doc.posts.len(), "document loaded");
                Ok(doc)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let doc = self.seed.build(Utc::now());
                self.save(&doc).await?;
                info!(path = %self.path.display(), "no document found, wrote default seed");
                Ok(doc)
            }
            Err(e) => Err(e).with_context(|| format!("failed to read {}", self.path.display())),
        }
    }

    /// Writes the full document to a temp file, fsyncs it, then renames it
    /// over the target.
    async fn save(&self, doc: &Document) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(doc)?;
        let tmp_path = self.tmp_path();

        let replaced = replace_with(&tmp_path, &self.path, json.as_bytes()).await;
        if replaced.is_err() {
            let _ = fs::remove_file(&tmp_path).await;
        }
        replaced?;

        debug!(path = %self.path.display(), bytes = json.len(), "document saved");
        Ok(())
    }
}

/// Writes `bytes` to `tmp_path`, fsyncs, then renames it onto `target`.
/// On error the temp file may be left behind for the caller to remove.
async fn replace_with(tmp_path: &Path, target: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let mut file = fs::File::create(tmp_path)
        .await
        .with_context(|| format!("failed to create {}", tmp_path.display()))?;
    file.write_all(bytes)
        .await
        .with_context(|| format!("failed to write {}", tmp_path.display()))?;
    file.sync_all().await?;
    drop(file);

    fs::rename(tmp_path, target)
        .await
        .with_context(|| format!("failed to replace {}", target.display()))
}
