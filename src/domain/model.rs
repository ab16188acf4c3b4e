use crate::utils::error::AlarmError;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 一個 API 操作 (path + method)，以結構相等判斷重複
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub path: String,
    pub method: String,
    #[serde(rename = "operationId")]
    pub operation_id: String,
}

impl Endpoint {
    pub fn new(path: &str, method: &str, operation_id: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_uppercase(),
            operation_id: operation_id.to_string(),
        }
    }
}

/// subgroup -> endpoints，保留插入順序
pub type MonitoringGroups = IndexMap<String, Vec<Endpoint>>;

/// composite group -> subgroups，保留插入順序
pub type CompositeMappings = IndexMap<String, IndexSet<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "5xx")]
    FiveXx,
    #[serde(rename = "4xx")]
    FourXx,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::FiveXx => "5xx",
            Severity::FourXx => "4xx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::FiveXx => "5XX",
            Severity::FourXx => "4XX",
        }
    }

    /// API Gateway 的錯誤 metric 名稱
    pub fn metric_name(self) -> &'static str {
        match self {
            Severity::FiveXx => "5XXError",
            Severity::FourXx => "4XXError",
        }
    }

    /// 5xx 一定產生，4xx 需要開啟 AlarmOn4xx
    pub fn enabled(alarm_on_4xx: bool) -> Vec<Severity> {
        if alarm_on_4xx {
            vec![Severity::FiveXx, Severity::FourXx]
        } else {
            vec![Severity::FiveXx]
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Standard,
    OnCall,
}

impl Family {
    /// 每個 alarm 最多 10 個 metric query：standard 8+1，oncall 3*3+1
    pub fn chunk_size(self) -> usize {
        match self {
            Family::Standard => 8,
            Family::OnCall => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Family::Standard => "standard",
            Family::OnCall => "oncall",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedMethod,
    ExcludedBySentinel,
    MalformedMonitoringGroup(String),
    NoGroupingInformation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedOperation {
    pub path: String,
    pub method: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedGroups {
    pub monitoring_groups: MonitoringGroups,
    pub composite_mappings: CompositeMappings,
    pub skipped: Vec<SkippedOperation>,
}

impl ExtractedGroups {
    /// 找出目前擁有此 subgroup 的 composite group
    pub fn composite_of(&self, subgroup: &str) -> Option<&str> {
        self.composite_mappings
            .iter()
            .find(|(_, subgroups)| subgroups.contains(subgroup))
            .map(|(composite, _)| composite.as_str())
    }

    pub fn endpoint_count(&self) -> usize {
        self.monitoring_groups.values().map(Vec::len).sum()
    }
}

/// subgroup -> severity -> 依 chunk 順序排列的 alarm 顯示名稱
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlarmNameMap(IndexMap<String, IndexMap<Severity, Vec<String>>>);

impl AlarmNameMap {
    pub fn names(&self, subgroup: &str, severity: Severity) -> &[String] {
        self.0
            .get(subgroup)
            .and_then(|by_severity| by_severity.get(&severity))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, IndexMap<Severity, Vec<String>>)> for AlarmNameMap {
    fn from_iter<I: IntoIterator<Item = (String, IndexMap<Severity, Vec<String>>)>>(
        iter: I,
    ) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Resources,
    Outputs,
}

impl FromStr for Action {
    type Err = AlarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "resources" => Ok(Action::Resources),
            "outputs" => Ok(Action::Outputs),
            _ => Err(AlarmError::UnsupportedAction {
                action: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecLocation {
    pub bucket: String,
    pub key: String,
}

impl SpecLocation {
    pub fn new(bucket: &str, key: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

impl fmt::Display for SpecLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing_is_case_insensitive() {
        assert_eq!("Resources".parse::<Action>().unwrap(), Action::Resources);
        assert_eq!("OUTPUTS".parse::<Action>().unwrap(), Action::Outputs);
        assert!(matches!(
            "conditions".parse::<Action>(),
            Err(AlarmError::UnsupportedAction { .. })
        ));
    }

    #[test]
    fn test_enabled_severities() {
        assert_eq!(Severity::enabled(false), vec![Severity::FiveXx]);
        assert_eq!(
            Severity::enabled(true),
            vec![Severity::FiveXx, Severity::FourXx]
        );
    }

    #[test]
    fn test_endpoint_method_is_uppercased() {
        let endpoint = Endpoint::new("/users", "get", "listUsers");
        assert_eq!(endpoint.method, "GET");
    }

    #[test]
    fn test_alarm_name_map_missing_entries_are_empty() {
        let mut by_severity = IndexMap::new();
        by_severity.insert(Severity::FiveXx, vec!["alarm-a".to_string()]);
        let names: AlarmNameMap = vec![("orders-read".to_string(), by_severity)]
            .into_iter()
            .collect();

        assert_eq!(names.names("orders-read", Severity::FiveXx), ["alarm-a"]);
        assert!(names.names("orders-read", Severity::FourXx).is_empty());
        assert!(names.names("unknown", Severity::FiveXx).is_empty());
        assert_eq!(names.len(), 1);
    }
}
