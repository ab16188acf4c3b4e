use crate::domain::model::Severity;
use crate::domain::template::Evaluation;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_arn, validate_datapoints, validate_finite, validate_non_empty_string, validate_one_of,
    validate_period, validate_range, Validate, COMPARISON_OPERATORS, MISSING_DATA_POLICIES,
};
use serde::{Deserialize, Serialize};

/// Standard alarm：chunk 內任一 endpoint 錯誤數超過門檻即告警
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardAlarmSettings {
    pub threshold: f64,
    pub period: u32,
    pub stat: String,
    pub comparison_operator: String,
    pub treat_missing_data: String,
    pub datapoints_to_alarm: u32,
    pub evaluation_periods: u32,
}

impl Default for StandardAlarmSettings {
    fn default() -> Self {
        Self {
            threshold: 1.0,
            period: 60,
            stat: "Sum".to_string(),
            comparison_operator: "GreaterThanThreshold".to_string(),
            treat_missing_data: "notBreaching".to_string(),
            datapoints_to_alarm: 1,
            evaluation_periods: 5,
        }
    }
}

impl StandardAlarmSettings {
    pub fn evaluation(&self) -> Evaluation {
        Evaluation {
            evaluation_periods: self.evaluation_periods,
            datapoints_to_alarm: self.datapoints_to_alarm,
            threshold: self.threshold,
            comparison_operator: self.comparison_operator.clone(),
            treat_missing_data: self.treat_missing_data.clone(),
        }
    }
}

impl Validate for StandardAlarmSettings {
    fn validate(&self) -> Result<()> {
        validate_finite("standard.threshold", self.threshold)?;
        validate_period("standard.period", self.period)?;
        validate_non_empty_string("standard.stat", &self.stat)?;
        validate_one_of(
            "standard.comparison_operator",
            &self.comparison_operator,
            COMPARISON_OPERATORS,
        )?;
        validate_one_of(
            "standard.treat_missing_data",
            &self.treat_missing_data,
            MISSING_DATA_POLICIES,
        )?;
        validate_datapoints(
            "standard.datapoints_to_alarm",
            self.datapoints_to_alarm,
            self.evaluation_periods,
        )?;
        Ok(())
    }
}

/// On-call alarm：流量足夠 且 錯誤率偏高 才視為異常
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnCallAlarmSettings {
    /// 最低請求數
    pub count_threshold: u64,
    pub rate_threshold_5xx: f64,
    pub rate_threshold_4xx: f64,
    pub period: u32,
    pub stat: String,
    pub count_stat: String,
    pub comparison_operator: String,
    pub treat_missing_data: String,
    pub threshold: f64,
    pub datapoints_to_alarm_5xx: u32,
    pub evaluation_periods_5xx: u32,
    pub datapoints_to_alarm_4xx: u32,
    pub evaluation_periods_4xx: u32,
}

impl Default for OnCallAlarmSettings {
    fn default() -> Self {
        Self {
            count_threshold: 25,
            rate_threshold_5xx: 0.1,
            rate_threshold_4xx: 0.9,
            period: 300,
            stat: "Average".to_string(),
            count_stat: "Sum".to_string(),
            comparison_operator: "GreaterThanThreshold".to_string(),
            treat_missing_data: "notBreaching".to_string(),
            threshold: 0.0,
            datapoints_to_alarm_5xx: 4,
            evaluation_periods_5xx: 12,
            datapoints_to_alarm_4xx: 4,
            evaluation_periods_4xx: 12,
        }
    }
}

impl OnCallAlarmSettings {
    pub fn rate_threshold(&self, severity: Severity) -> f64 {
        match severity {
            Severity::FiveXx => self.rate_threshold_5xx,
            Severity::FourXx => self.rate_threshold_4xx,
        }
    }

    pub fn evaluation(&self, severity: Severity) -> Evaluation {
        let (evaluation_periods, datapoints_to_alarm) = match severity {
            Severity::FiveXx => (self.evaluation_periods_5xx, self.datapoints_to_alarm_5xx),
            Severity::FourXx => (self.evaluation_periods_4xx, self.datapoints_to_alarm_4xx),
        };
        Evaluation {
            evaluation_periods,
            datapoints_to_alarm,
            threshold: self.threshold,
            comparison_operator: self.comparison_operator.clone(),
            treat_missing_data: self.treat_missing_data.clone(),
        }
    }
}

impl Validate for OnCallAlarmSettings {
    fn validate(&self) -> Result<()> {
        validate_finite("oncall.threshold", self.threshold)?;
        validate_period("oncall.period", self.period)?;
        validate_non_empty_string("oncall.stat", &self.stat)?;
        validate_non_empty_string("oncall.count_stat", &self.count_stat)?;
        validate_range("oncall.rate_threshold_5xx", self.rate_threshold_5xx, 0.0, 1.0)?;
        validate_range("oncall.rate_threshold_4xx", self.rate_threshold_4xx, 0.0, 1.0)?;
        validate_one_of(
            "oncall.comparison_operator",
            &self.comparison_operator,
            COMPARISON_OPERATORS,
        )?;
        validate_one_of(
            "oncall.treat_missing_data",
            &self.treat_missing_data,
            MISSING_DATA_POLICIES,
        )?;
        validate_datapoints(
            "oncall.datapoints_to_alarm_5xx",
            self.datapoints_to_alarm_5xx,
            self.evaluation_periods_5xx,
        )?;
        validate_datapoints(
            "oncall.datapoints_to_alarm_4xx",
            self.datapoints_to_alarm_4xx,
            self.evaluation_periods_4xx,
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmSettings {
    pub standard: StandardAlarmSettings,
    pub oncall: OnCallAlarmSettings,
}

impl Validate for AlarmSettings {
    fn validate(&self) -> Result<()> {
        self.standard.validate()?;
        self.oncall.validate()
    }
}

/// metric dimension 指向的 API Gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTarget {
    pub name: String,
    pub stage: String,
}

/// 一次轉換所需的全部設定 (API 名稱已解析完成)
#[derive(Debug, Clone, PartialEq)]
pub struct TransformConfig {
    pub api: ApiTarget,
    pub microservice_name: String,
    pub intended_usage: String,
    pub alarm_on_4xx: bool,
    pub notification_target_arn: Option<String>,
    pub settings: AlarmSettings,
}

impl TransformConfig {
    pub fn new(api_name: &str, stage: &str, microservice_name: &str, intended_usage: &str) -> Self {
        Self {
            api: ApiTarget {
                name: api_name.to_string(),
                stage: stage.to_string(),
            },
            microservice_name: microservice_name.to_string(),
            intended_usage: intended_usage.to_string(),
            alarm_on_4xx: false,
            notification_target_arn: None,
            settings: AlarmSettings::default(),
        }
    }

    pub fn with_alarm_on_4xx(mut self, enabled: bool) -> Self {
        self.alarm_on_4xx = enabled;
        self
    }

    pub fn with_notification_target(mut self, arn: &str) -> Self {
        self.notification_target_arn = Some(arn.to_string());
        self
    }

    pub fn with_settings(mut self, settings: AlarmSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn severities(&self) -> Vec<Severity> {
        Severity::enabled(self.alarm_on_4xx)
    }
}

impl Validate for TransformConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("api.name", &self.api.name)?;
        validate_non_empty_string("api.stage", &self.api.stage)?;
        validate_non_empty_string("microservice_name", &self.microservice_name)?;
        validate_non_empty_string("intended_usage", &self.intended_usage)?;
        if let Some(arn) = &self.notification_target_arn {
            validate_arn("notification_target_arn", arn)?;
        }
        self.settings.validate()?;

        tracing::debug!("✅ Transform configuration validation passed");
        Ok(())
    }
}
