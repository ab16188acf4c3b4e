use crate::domain::model::SpecLocation;
use crate::domain::ports::SpecSource;
use crate::utils::error::{AlarmError, Result};
use std::path::{Path, PathBuf};

/// 從本機目錄讀取 OpenAPI 文件，bucket 只用於日誌
#[derive(Debug, Clone)]
pub struct LocalSpecSource {
    base_path: PathBuf,
}

impl LocalSpecSource {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }
}

impl SpecSource for LocalSpecSource {
    async fn fetch_spec(&self, location: &SpecLocation) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(&location.key);
        tracing::debug!("Reading OpenAPI spec from {}", full_path.display());

        tokio::fs::read(&full_path)
            .await
            .map_err(|e| AlarmError::SpecUnavailable {
                location: full_path.display().to_string(),
                message: e.to_string(),
            })
    }
}
