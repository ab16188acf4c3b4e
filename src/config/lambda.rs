#[cfg(feature = "lambda")]
use crate::domain::model::SpecLocation;
#[cfg(feature = "lambda")]
use crate::domain::ports::{ApiNameResolver, SpecSource};
#[cfg(feature = "lambda")]
use crate::utils::error::{AlarmError, Result};
#[cfg(feature = "lambda")]
use async_trait::async_trait;
#[cfg(feature = "lambda")]
use aws_sdk_apigateway::Client as ApiGatewayClient;
#[cfg(feature = "lambda")]
use aws_sdk_s3::error::DisplayErrorContext;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;

#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct S3SpecSource {
    client: S3Client,
}

#[cfg(feature = "lambda")]
impl S3SpecSource {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "lambda")]
impl SpecSource for S3SpecSource {
    async fn fetch_spec(&self, location: &SpecLocation) -> Result<Vec<u8>> {
        tracing::info!("Reading OpenAPI spec from {}", location);

        let resp = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|e| AlarmError::SpecUnavailable {
                location: location.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| AlarmError::SpecUnavailable {
                location: location.to_string(),
                message: format!("Failed to collect S3 data: {}", e),
            })?;

        Ok(data.into_bytes().to_vec())
    }
}

#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct ApiGatewayNameResolver {
    client: ApiGatewayClient,
}

#[cfg(feature = "lambda")]
impl ApiGatewayNameResolver {
    pub fn new(client: ApiGatewayClient) -> Self {
        Self { client }
    }
}

#[cfg(feature = "lambda")]
#[async_trait]
impl ApiNameResolver for ApiGatewayNameResolver {
    async fn resolve_api_name(&self, api_id: &str) -> Result<String> {
        let response = self
            .client
            .get_rest_api()
            .rest_api_id(api_id)
            .send()
            .await
            .map_err(|e| AlarmError::ApiResolution {
                api_id: api_id.to_string(),
                message: aws_sdk_apigateway::error::DisplayErrorContext(&e).to_string(),
            })?;

        response
            .name()
            .map(str::to_string)
            .ok_or_else(|| AlarmError::ApiResolution {
                api_id: api_id.to_string(),
                message: "REST API has no name".to_string(),
            })
    }
}
