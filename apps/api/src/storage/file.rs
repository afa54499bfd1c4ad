use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use super::{ResumeStore, StoreError};
use crate::models::ResumeData;

const RESUME_FILE: &str = "resumeData.json";
const TEMPLATE_FILE: &str = "selectedTemplate";

/// Keeps one JSON document and one template id as files under `DATA_DIR`.
///
/// Writes land in a `.tmp` sibling first and are renamed into place, so a
/// reader never sees a half-written file. Concurrent read-modify-write from
/// different clients is last-writer-wins.
#[derive(Debug, Clone)]
pub struct FileResumeStore {
    dir: PathBuf,
}

impl FileResumeStore {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn resume_path(&self) -> PathBuf {
        self.dir.join(RESUME_FILE)
    }

    fn template_path(&self) -> PathBuf {
        self.dir.join(TEMPLATE_FILE)
    }
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

async fn remove_if_present(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path).await {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

#[async_trait]
impl ResumeStore for FileResumeStore {
    async fn load_resume(&self) -> Result<Option<ResumeData>, StoreError> {
        let path = self.resume_path();
        let Some(bytes) = read_optional(&path).await? else {
            return Ok(None);
        };

        match serde_json::from_slice(&bytes) {
            Ok(data) => Ok(Some(data)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "stored resume data is corrupt; ignoring");
                Ok(None)
            }
        }
    }

    async fn save_resume(&self, data: &ResumeData) -> Result<(), StoreError> {
        let json = serde_json::to_vec(data)?;
        write_atomic(&self.resume_path(), &json).await?;
        debug!(bytes = json.len(), "resume data saved");
        Ok(())
    }

    async fn clear_resume(&self) -> Result<(), StoreError> {
        remove_if_present(&self.resume_path()).await
    }

    async fn load_template(&self) -> Result<Option<String>, StoreError> {
        let bytes = read_optional(&self.template_path()).await?;
        Ok(bytes
            .map(|b| String::from_utf8_lossy(&b).trim().to_string())
            .filter(|id| !id.is_empty()))
    }

    async fn save_template(&self, template_id: &str) -> Result<(), StoreError> {
        write_atomic(&self.template_path(), template_id.trim().as_bytes()).await
    }
}
