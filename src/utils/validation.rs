use crate::utils::error::{AlarmError, Result};
use regex::Regex;
use std::sync::OnceLock;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub const COMPARISON_OPERATORS: &[&str] = &[
    "GreaterThanOrEqualToThreshold",
    "GreaterThanThreshold",
    "LessThanThreshold",
    "LessThanOrEqualToThreshold",
];

pub const MISSING_DATA_POLICIES: &[&str] = &["breaching", "notBreaching", "ignore", "missing"];

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AlarmError::InvalidParameter {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u32, min_value: u32) -> Result<()> {
    if value < min_value {
        return Err(AlarmError::InvalidParameter {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN 與任何值比較都是 false
    if !(value >= min && value <= max) {
        return Err(AlarmError::InvalidParameter {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 拒絕 NaN 與無限大，CloudFormation 與 metric math 都無法表示
pub fn validate_finite(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(AlarmError::InvalidParameter {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(AlarmError::InvalidParameter {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Allowed values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

/// CloudWatch 的 period 只接受 10、30 或 60 的倍數
pub fn validate_period(field_name: &str, seconds: u32) -> Result<()> {
    if seconds == 10 || seconds == 30 || (seconds > 0 && seconds % 60 == 0) {
        return Ok(());
    }
    Err(AlarmError::InvalidParameter {
        field: field_name.to_string(),
        value: seconds.to_string(),
        reason: "Period must be 10, 30 or a multiple of 60 seconds".to_string(),
    })
}

pub fn validate_datapoints(
    field_name: &str,
    datapoints_to_alarm: u32,
    evaluation_periods: u32,
) -> Result<()> {
    validate_positive_number(field_name, datapoints_to_alarm, 1)?;
    if datapoints_to_alarm > evaluation_periods {
        return Err(AlarmError::InvalidParameter {
            field: field_name.to_string(),
            value: datapoints_to_alarm.to_string(),
            reason: format!(
                "Datapoints to alarm cannot exceed evaluation periods ({})",
                evaluation_periods
            ),
        });
    }
    Ok(())
}

fn arn_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^arn:aws[a-zA-Z-]*:[a-z0-9-]+:[a-z0-9-]*:\d{12}:.+$")
            .expect("static ARN pattern is valid")
    })
}

pub fn validate_arn(field_name: &str, arn: &str) -> Result<()> {
    if !arn_pattern().is_match(arn) {
        return Err(AlarmError::InvalidParameter {
            field: field_name.to_string(),
            value: arn.to_string(),
            reason: "Value is not a well-formed ARN".to_string(),
        });
    }
    Ok(())
}
