use async_trait::async_trait;
use chrono::Utc;
use lf_core::models::Document;
use lf_core::seed::Seed;
use lf_core::traits::DocumentStore;
use tokio::sync::Mutex;

/// Keeps the document in process memory. Nothing survives a restart.
pub struct MemoryStore {
    doc: Mutex<Option<Document>>,
    seed: Seed,
}

impl MemoryStore {
    /// An empty store that seeds itself on first load.
    pub fn new(seed: Seed) -> Self {
        Self { doc: Mutex::new(None), seed }
    }

    /// A store that already holds `doc`.
    pub fn with_document(doc: Document) -> Self {
        Self { doc: Mutex::new(Some(doc)), seed: Seed::default() }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Seed::default())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self) -> anyhow::Result<Document> {
        let mut slot = self.doc.lock().await;
        let doc = slot.get_or_insert_with(|| self.seed.build(Utc::now()));
        Ok(doc.clone())
    }

    async fn save(&self, doc: &Document) -> anyhow::Result<()> {
        *self.doc.lock().await = Some(doc.clone());
        Ok(())
    }
}
