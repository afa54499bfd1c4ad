//! Persistence for the single resume document and the selected template id.
//!
//! Carried in `AppState` as `Arc<dyn ResumeStore>` so handlers never touch the
//! filesystem directly and tests can run against memory.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ResumeData;

pub mod file;
pub mod handlers;
pub mod memory;

pub use file::FileResumeStore;
#[cfg_attr(not(test), allow(unused_imports))]
pub use memory::MemoryResumeStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode resume data: {0}")]
    Encode(#[from] serde_json::Error),
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// `None` when nothing is stored, or when the stored document is unreadable.
    async fn load_resume(&self) -> Result<Option<ResumeData>, StoreError>;

    async fn save_resume(&self, data: &ResumeData) -> Result<(), StoreError>;

    /// Removes the document. Clearing an empty store is not an error.
    async fn clear_resume(&self) -> Result<(), StoreError>;

    async fn load_template(&self) -> Result<Option<String>, StoreError>;

    async fn save_template(&self, template_id: &str) -> Result<(), StoreError>;
}
