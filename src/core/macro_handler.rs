use crate::config::macro_params::InvocationParams;
use crate::core::engine::SegmentationEngine;
use crate::core::extract::parse_spec;
use crate::domain::ports::{ApiNameResolver, SpecSource};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// CloudFormation macro 呼叫內容
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroRequest {
    pub request_id: String,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default)]
    pub fragment: Option<Value>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub transform_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroResponse {
    pub request_id: String,
    pub status: MacroStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl MacroResponse {
    pub fn success(request_id: &str, fragment: Value) -> Self {
        Self {
            request_id: request_id.to_string(),
            status: MacroStatus::Success,
            fragment: Some(fragment),
            error_message: None,
        }
    }

    pub fn failure(request_id: &str, error_message: String) -> Self {
        Self {
            request_id: request_id.to_string(),
            status: MacroStatus::Failure,
            fragment: None,
            error_message: Some(error_message),
        }
    }
}

pub struct MacroHandler<S: SpecSource, R: ApiNameResolver> {
    spec_source: S,
    resolver: R,
}

impl<S: SpecSource, R: ApiNameResolver> MacroHandler<S, R> {
    pub fn new(spec_source: S, resolver: R) -> Self {
        Self {
            spec_source,
            resolver,
        }
    }

    /// 任何錯誤都轉成 failure 回應，不會回傳部分結果
    pub async fn handle(&self, request: MacroRequest) -> MacroResponse {
        tracing::info!("Handling macro request {}", request.request_id);

        match self.transform(&request).await {
            Ok(fragment) => {
                tracing::info!("✅ Macro request {} completed", request.request_id);
                MacroResponse::success(&request.request_id, fragment)
            }
            Err(e) => {
                tracing::error!(
                    "❌ Macro request {} failed: {} ({})",
                    request.request_id,
                    e,
                    e.recovery_suggestion()
                );
                MacroResponse::failure(&request.request_id, e.to_string())
            }
        }
    }

    async fn transform(&self, request: &MacroRequest) -> Result<Value> {
        let params = InvocationParams::from_params(&request.params)?;

        let api_name = self
            .resolver
            .resolve_api_name(&params.api_gateway_id)
            .await?;
        tracing::info!("Resolved API Gateway {} to {}", params.api_gateway_id, api_name);

        let config = params.transform_config(&api_name);
        config.validate()?;

        let data = self.spec_source.fetch_spec(&params.spec_location).await?;
        let document = parse_spec(&data)?;

        let generated = SegmentationEngine::new(config).generate(&document)?;
        generated.fragment(params.action)
    }
}
