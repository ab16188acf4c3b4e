use crate::config::settings::{AlarmSettings, TransformConfig};
use crate::domain::model::{Action, SpecLocation};
use crate::utils::error::{AlarmError, Result};
use serde_json::{Map, Value};
use std::str::FromStr;

const REQUIRED_PARAMS: &[&str] = &[
    "OpenApiBucketName",
    "OpenApiBucketKey",
    "ApiGatewayId",
    "PublicRestApiStage",
    "MicroServiceUniqueName",
    "IntendedUsage",
];

/// CloudFormation macro 的 params 解析結果
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationParams {
    pub action: Action,
    pub spec_location: SpecLocation,
    pub api_gateway_id: String,
    pub api_stage: String,
    pub microservice_name: String,
    pub intended_usage: String,
    pub notification_target_arn: Option<String>,
    pub alarm_on_4xx: bool,
    pub settings: AlarmSettings,
}

impl InvocationParams {
    pub fn from_params(params: &Map<String, Value>) -> Result<Self> {
        let missing: Vec<&str> = REQUIRED_PARAMS
            .iter()
            .copied()
            .filter(|name| string_param(params, name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(AlarmError::MissingRequiredParameter {
                field: missing.join(", "),
            });
        }

        let action = string_param(params, "Action")
            .unwrap_or_else(|| "Resources".to_string())
            .parse::<Action>()?;

        let defaults = AlarmSettings::default();
        let standard = &defaults.standard;
        let oncall = &defaults.oncall;

        let mut settings = AlarmSettings::default();
        settings.standard.threshold = number_param(params, "StandardApiErrorThreshold", standard.threshold)?;
        settings.standard.period = number_param(params, "StandardApiErrorPeriod", standard.period)?;
        settings.standard.stat = string_param(params, "StandardApiErrorStat").unwrap_or(standard.stat.clone());
        settings.standard.comparison_operator = string_param(params, "StandardApiErrorComparisonOperator")
            .unwrap_or(standard.comparison_operator.clone());
        settings.standard.treat_missing_data = string_param(params, "StandardApiErrorMissingData")
            .unwrap_or(standard.treat_missing_data.clone());
        settings.standard.datapoints_to_alarm =
            number_param(params, "StandardApiErrorDataPointsToAlarm", standard.datapoints_to_alarm)?;
        settings.standard.evaluation_periods =
            number_param(params, "StandardApiErrorEvaluationPeriods", standard.evaluation_periods)?;

        settings.oncall.count_threshold =
            number_param(params, "OncallApiErrorCountThreshold", oncall.count_threshold)?;
        settings.oncall.rate_threshold_5xx =
            number_param(params, "OncallApiError5xxThreshold", oncall.rate_threshold_5xx)?;
        settings.oncall.rate_threshold_4xx =
            number_param(params, "OncallApiError4xxThreshold", oncall.rate_threshold_4xx)?;
        settings.oncall.period = number_param(params, "OncallApiErrorPeriod", oncall.period)?;
        settings.oncall.stat = string_param(params, "OncallApiErrorStat").unwrap_or(oncall.stat.clone());
        settings.oncall.count_stat =
            string_param(params, "OncallApiErrorCountStat").unwrap_or(oncall.count_stat.clone());
        settings.oncall.comparison_operator = string_param(params, "OncallApiErrorComparisonOperator")
            .unwrap_or(oncall.comparison_operator.clone());
        settings.oncall.treat_missing_data = string_param(params, "OncallApiErrorMissingData")
            .unwrap_or(oncall.treat_missing_data.clone());
        settings.oncall.threshold = number_param(params, "OncallApiErrorThreshold", oncall.threshold)?;
        settings.oncall.datapoints_to_alarm_5xx =
            number_param(params, "OncallApiError5xxDataPointsToAlarm", oncall.datapoints_to_alarm_5xx)?;
        settings.oncall.evaluation_periods_5xx =
            number_param(params, "OncallApiError5xxEvaluationPeriods", oncall.evaluation_periods_5xx)?;
        settings.oncall.datapoints_to_alarm_4xx =
            number_param(params, "OncallApiError4xxDataPointsToAlarm", oncall.datapoints_to_alarm_4xx)?;
        settings.oncall.evaluation_periods_4xx =
            number_param(params, "OncallApiError4xxEvaluationPeriods", oncall.evaluation_periods_4xx)?;

        // 上面已確認必填欄位存在
        let required = |name: &str| string_param(params, name).unwrap_or_default();

        Ok(Self {
            action,
            spec_location: SpecLocation::new(
                &required("OpenApiBucketName"),
                &required("OpenApiBucketKey"),
            ),
            api_gateway_id: required("ApiGatewayId"),
            api_stage: required("PublicRestApiStage"),
            microservice_name: required("MicroServiceUniqueName"),
            intended_usage: required("IntendedUsage"),
            notification_target_arn: string_param(params, "AlarmSNSTopicArn"),
            alarm_on_4xx: string_param(params, "AlarmOn4xx")
                .map(|value| value.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            settings,
        })
    }

    /// 套上已解析的 API 名稱，組成轉換設定
    pub fn transform_config(&self, api_name: &str) -> TransformConfig {
        let mut config = TransformConfig::new(
            api_name,
            &self.api_stage,
            &self.microservice_name,
            &self.intended_usage,
        )
        .with_alarm_on_4xx(self.alarm_on_4xx)
        .with_settings(self.settings.clone());
        config.notification_target_arn = self.notification_target_arn.clone();
        config
    }
}

/// 參數可能是字串、數字或布林；空白字串視為未提供
fn string_param(params: &Map<String, Value>, name: &str) -> Option<String> {
    match params.get(name)? {
        Value::String(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        _ => None,
    }
}

fn number_param<T>(params: &Map<String, Value>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match string_param(params, name) {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|e| AlarmError::InvalidParameter {
            field: name.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_params() -> Map<String, Value> {
        let value = json!({
            "OpenApiBucketName": "pn-openapi",
            "OpenApiBucketKey": "delivery/openapi.yaml",
            "ApiGatewayId": "abc123",
            "PublicRestApiStage": "unique",
            "MicroServiceUniqueName": "pn-delivery",
            "IntendedUsage": "B2B"
        });
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_defaults_applied() {
        let params = InvocationParams::from_params(&base_params()).unwrap();

        assert_eq!(params.action, Action::Resources);
        assert_eq!(params.spec_location.to_string(), "s3://pn-openapi/delivery/openapi.yaml");
        assert!(!params.alarm_on_4xx);
        assert_eq!(params.notification_target_arn, None);
        assert_eq!(params.settings, AlarmSettings::default());
    }

    #[test]
    fn test_missing_required_parameters_are_all_reported() {
        let mut params = base_params();
        params.remove("OpenApiBucketName");
        params.insert("IntendedUsage".to_string(), json!("  "));

        let err = InvocationParams::from_params(&params).unwrap_err();
        match err {
            AlarmError::MissingRequiredParameter { field } => {
                assert_eq!(field, "OpenApiBucketName, IntendedUsage");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unsupported_action() {
        let mut params = base_params();
        params.insert("Action".to_string(), json!("Conditions"));

        assert!(matches!(
            InvocationParams::from_params(&params),
            Err(AlarmError::UnsupportedAction { .. })
        ));
    }

    #[test]
    fn test_string_and_numeric_overrides() {
        let mut params = base_params();
        params.insert("Action".to_string(), json!("outputs"));
        params.insert("AlarmOn4xx".to_string(), json!("TRUE"));
        params.insert("StandardApiErrorThreshold".to_string(), json!("3"));
        params.insert("OncallApiErrorCountThreshold".to_string(), json!(50));
        params.insert("OncallApiError5xxThreshold".to_string(), json!("0.25"));
        params.insert(
            "AlarmSNSTopicArn".to_string(),
            json!("arn:aws:sns:eu-south-1:123456789012:alarms"),
        );

        let params = InvocationParams::from_params(&params).unwrap();
        assert_eq!(params.action, Action::Outputs);
        assert!(params.alarm_on_4xx);
        assert_eq!(params.settings.standard.threshold, 3.0);
        assert_eq!(params.settings.oncall.count_threshold, 50);
        assert_eq!(params.settings.oncall.rate_threshold_5xx, 0.25);

        let config = params.transform_config("pn-delivery-api");
        assert_eq!(config.api.name, "pn-delivery-api");
        assert_eq!(config.api.stage, "unique");
        assert!(config.alarm_on_4xx);
        assert!(config.notification_target_arn.is_some());
    }

    #[test]
    fn test_non_finite_thresholds_fail_validation() {
        use crate::utils::validation::Validate;

        let cases = [
            ("StandardApiErrorThreshold", "inf", "standard.threshold"),
            ("OncallApiErrorThreshold", "-inf", "oncall.threshold"),
            ("OncallApiError5xxThreshold", "NaN", "oncall.rate_threshold_5xx"),
            ("OncallApiError4xxThreshold", "nan", "oncall.rate_threshold_4xx"),
        ];

        for (name, raw, expected_field) in cases {
            let mut params = base_params();
            params.insert(name.to_string(), json!(raw));

            let config = InvocationParams::from_params(&params)
                .unwrap()
                .transform_config("pn-delivery-api");
            match config.validate() {
                Err(AlarmError::InvalidParameter { field, .. }) => assert_eq!(field, expected_field),
                other => panic!("{} = {} should be rejected, got {:?}", name, raw, other),
            }
        }
    }

    #[test]
    fn test_negative_count_threshold_is_invalid_parameter() {
        let mut params = base_params();
        params.insert("OncallApiErrorCountThreshold".to_string(), json!(-5));

        assert!(matches!(
            InvocationParams::from_params(&params),
            Err(AlarmError::InvalidParameter { ref field, .. }) if field == "OncallApiErrorCountThreshold"
        ));
    }

    #[test]
    fn test_unparsable_number_is_invalid_parameter() {
        let mut params = base_params();
        params.insert("StandardApiErrorPeriod".to_string(), json!("one minute"));

        assert!(matches!(
            InvocationParams::from_params(&params),
            Err(AlarmError::InvalidParameter { ref field, .. }) if field == "StandardApiErrorPeriod"
        ));
    }
}
