use crate::config::settings::AlarmSettings;
use crate::utils::error::{AlarmError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

impl AlarmSettings {
    /// 從 TOML 檔案載入 alarm 設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AlarmError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定，未填的欄位使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);
        let settings: AlarmSettings = toml::from_str(&processed_content)?;
        settings.validate()?;
        Ok(settings)
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static env var pattern is valid"))
}

/// 替換環境變數 (例如 ${ONCALL_COUNT_THRESHOLD})，找不到的變數保持原樣
fn substitute_env_vars(content: &str) -> String {
    env_var_pattern()
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_partial_settings() {
        let toml_content = r#"
[standard]
threshold = 5
evaluation_periods = 10
datapoints_to_alarm = 3

[oncall]
count_threshold = 100
rate_threshold_4xx = 0.5
"#;

        let settings = AlarmSettings::from_toml_str(toml_content).unwrap();

        assert_eq!(settings.standard.threshold, 5.0);
        assert_eq!(settings.standard.evaluation_periods, 10);
        assert_eq!(settings.standard.period, 60);
        assert_eq!(settings.oncall.count_threshold, 100);
        assert_eq!(settings.oncall.rate_threshold_4xx, 0.5);
        assert_eq!(settings.oncall.stat, "Average");
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = AlarmSettings::from_toml_str("").unwrap();
        assert_eq!(settings, AlarmSettings::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("API_ALARMS_TEST_COUNT_THRESHOLD", "75");

        let toml_content = r#"
[oncall]
count_threshold = ${API_ALARMS_TEST_COUNT_THRESHOLD}
"#;

        let settings = AlarmSettings::from_toml_str(toml_content).unwrap();
        assert_eq!(settings.oncall.count_threshold, 75);

        std::env::remove_var("API_ALARMS_TEST_COUNT_THRESHOLD");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let toml_content = r#"
[standard]
comparison_operator = "Sideways"
"#;
        assert!(AlarmSettings::from_toml_str(toml_content).is_err());
        assert!(matches!(
            AlarmSettings::from_toml_str("[standard]\nperiod = \"soon\""),
            Err(AlarmError::TomlError(_))
        ));
    }

    #[test]
    fn test_settings_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[standard]\nstat = \"Maximum\"\n")
            .unwrap();

        let settings = AlarmSettings::from_file(temp_file.path()).unwrap();
        assert_eq!(settings.standard.stat, "Maximum");
    }
}
