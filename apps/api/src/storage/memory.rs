use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ResumeStore, StoreError};
use crate::models::ResumeData;

/// In-process store; state lives only as long as the value.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Default)]
pub struct MemoryResumeStore {
    resume: RwLock<Option<ResumeData>>,
    template: RwLock<Option<String>>,
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn load_resume(&self) -> Result<Option<ResumeData>, StoreError> {
        Ok(self.resume.read().await.clone())
    }

    async fn save_resume(&self, data: &ResumeData) -> Result<(), StoreError> {
        *self.resume.write().await = Some(data.clone());
        Ok(())
    }

    async fn clear_resume(&self) -> Result<(), StoreError> {
        *self.resume.write().await = None;
        Ok(())
    }

    async fn load_template(&self) -> Result<Option<String>, StoreError> {
        Ok(self.template.read().await.clone())
    }

    async fn save_template(&self, template_id: &str) -> Result<(), StoreError> {
        *self.template.write().await = Some(template_id.trim().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryResumeStore::default();
        let mut data = ResumeData::default();
        data.personal.title = "Engineer".to_string();

        store.save_resume(&data).await.unwrap();
        assert_eq!(store.load_resume().await.unwrap(), Some(data));
        store.clear_resume().await.unwrap();
        assert!(store.load_resume().await.unwrap().is_none());
    }
}
