use crate::domain::model::SpecLocation;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 取得 OpenAPI 文件原始內容 (S3 或本機檔案)
pub trait SpecSource: Send + Sync {
    fn fetch_spec(
        &self,
        location: &SpecLocation,
    ) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// 由 API Gateway id 解析出 metric dimension 使用的 ApiName
#[async_trait]
pub trait ApiNameResolver: Send + Sync {
    async fn resolve_api_name(&self, api_id: &str) -> Result<String>;
}
