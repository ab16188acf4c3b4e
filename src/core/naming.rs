//! 命名與分段規則。
//!
//! Base alarm 的 logical id、顯示名稱，以及 composite alarm 的 DependsOn
//! 都由這裡的函式產生。兩邊必須完全一致，否則 DependsOn 會指向不存在的資源。

use crate::config::settings::TransformConfig;
use crate::domain::model::{Endpoint, Family, Severity};
use std::collections::HashSet;

/// 只保留 ASCII 英數字 (CloudFormation logical id 的限制)
pub fn alphanumeric(value: &str) -> String {
    value.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// chunk 0 不加後綴，之後為 `-01`、`-02`...
pub fn chunk_suffix(index: usize) -> String {
    if index == 0 {
        String::new()
    } else {
        format!("-{:02}", index)
    }
}

pub fn chunk_group_name(subgroup: &str, index: usize) -> String {
    format!("{}{}", subgroup, chunk_suffix(index))
}

pub fn base_logical_id(family: Family, severity: Severity, subgroup: &str, index: usize) -> String {
    let prefix = match family {
        Family::Standard => "Standard",
        Family::OnCall => "oncall",
    };
    format!(
        "{}{}Alarm{}",
        prefix,
        severity.as_str(),
        alphanumeric(&chunk_group_name(subgroup, index))
    )
}

pub fn composite_logical_id(family: Family, severity: Severity, composite_group: &str) -> String {
    let prefix = match family {
        Family::Standard => "Composite",
        Family::OnCall => "oncallComposite",
    };
    format!(
        "{}{}Alarm{}",
        prefix,
        severity.as_str(),
        alphanumeric(composite_group)
    )
}

/// 顯示名稱需要 microservice 與 usage
#[derive(Debug, Clone, Copy)]
pub struct AlarmNaming<'a> {
    microservice_name: &'a str,
    intended_usage: &'a str,
}

impl<'a> AlarmNaming<'a> {
    pub fn new(microservice_name: &'a str, intended_usage: &'a str) -> Self {
        Self {
            microservice_name,
            intended_usage,
        }
    }

    pub fn from_config(config: &'a TransformConfig) -> Self {
        Self::new(&config.microservice_name, &config.intended_usage)
    }

    pub fn base_display_name(
        &self,
        family: Family,
        severity: Severity,
        subgroup: &str,
        index: usize,
    ) -> String {
        let prefix = match family {
            Family::Standard => "child",
            Family::OnCall => "childOC",
        };
        format!(
            "{}-{}-{}-{}-{}-ApiGwAlarm",
            prefix,
            self.microservice_name,
            self.intended_usage,
            chunk_group_name(subgroup, index),
            severity
        )
    }

    pub fn composite_display_name(
        &self,
        family: Family,
        severity: Severity,
        composite_group: &str,
    ) -> String {
        let name = format!(
            "{}-{}-{}-comp-{}-ApiGwAlarm",
            self.microservice_name, self.intended_usage, composite_group, severity
        );
        match family {
            Family::Standard => name,
            Family::OnCall => format!("oncall-{}", name),
        }
    }
}

/// 一個 subgroup 內依 family 大小切出的 endpoint 區段
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    pub subgroup: &'a str,
    pub index: usize,
    pub endpoints: &'a [Endpoint],
}

impl Chunk<'_> {
    pub fn group_name(&self) -> String {
        chunk_group_name(self.subgroup, self.index)
    }

    pub fn logical_id(&self, family: Family, severity: Severity) -> String {
        base_logical_id(family, severity, self.subgroup, self.index)
    }

    pub fn display_name(&self, naming: &AlarmNaming<'_>, family: Family, severity: Severity) -> String {
        naming.base_display_name(family, severity, self.subgroup, self.index)
    }
}

pub fn chunks<'a>(
    subgroup: &'a str,
    endpoints: &'a [Endpoint],
    family: Family,
) -> impl Iterator<Item = Chunk<'a>> {
    endpoints
        .chunks(family.chunk_size())
        .enumerate()
        .map(move |(index, endpoints)| Chunk {
            subgroup,
            index,
            endpoints,
        })
}

/// 每個 endpoint 的 metric id 片段：operationId → METHOD+path，同一 alarm 內重複時加上位置
pub fn metric_keys(endpoints: &[Endpoint]) -> Vec<String> {
    let mut seen = HashSet::new();
    endpoints
        .iter()
        .enumerate()
        .map(|(position, endpoint)| {
            let mut key = alphanumeric(&endpoint.operation_id);
            if key.is_empty() {
                key = alphanumeric(&format!("{}{}", endpoint.method, endpoint.path));
            }
            if key.is_empty() {
                key = "op".to_string();
            }
            if !seen.insert(key.clone()) {
                key = format!("{}_{}", key, position);
                seen.insert(key.clone());
            }
            key
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints(count: usize) -> Vec<Endpoint> {
        (0..count)
            .map(|i| Endpoint::new(&format!("/items/{}", i), "GET", &format!("getItem{}", i)))
            .collect()
    }

    #[test]
    fn test_chunk_suffix() {
        assert_eq!(chunk_suffix(0), "");
        assert_eq!(chunk_suffix(1), "-01");
        assert_eq!(chunk_suffix(12), "-12");
        assert_eq!(chunk_group_name("orders-read", 2), "orders-read-02");
    }

    #[test]
    fn test_logical_ids() {
        assert_eq!(
            base_logical_id(Family::Standard, Severity::FiveXx, "orders-read", 0),
            "Standard5xxAlarmordersread"
        );
        assert_eq!(
            base_logical_id(Family::OnCall, Severity::FourXx, "orders-read", 1),
            "oncall4xxAlarmordersread01"
        );
        assert_eq!(
            composite_logical_id(Family::Standard, Severity::FiveXx, "orders"),
            "Composite5xxAlarmorders"
        );
        assert_eq!(
            composite_logical_id(Family::OnCall, Severity::FiveXx, "noextension-Orders"),
            "oncallComposite5xxAlarmnoextensionOrders"
        );
    }

    #[test]
    fn test_display_names() {
        let naming = AlarmNaming::new("pn-delivery", "B2B");
        assert_eq!(
            naming.base_display_name(Family::Standard, Severity::FiveXx, "orders-read", 1),
            "child-pn-delivery-B2B-orders-read-01-5xx-ApiGwAlarm"
        );
        assert_eq!(
            naming.base_display_name(Family::OnCall, Severity::FourXx, "orders-read", 0),
            "childOC-pn-delivery-B2B-orders-read-4xx-ApiGwAlarm"
        );
        assert_eq!(
            naming.composite_display_name(Family::OnCall, Severity::FiveXx, "orders"),
            "oncall-pn-delivery-B2B-orders-comp-5xx-ApiGwAlarm"
        );
    }

    #[test]
    fn test_chunks_respect_family_size() {
        let items = endpoints(7);
        let standard: Vec<_> = chunks("g", &items, Family::Standard).collect();
        let oncall: Vec<_> = chunks("g", &items, Family::OnCall).collect();

        assert_eq!(standard.len(), 1);
        assert_eq!(oncall.len(), 3);
        assert_eq!(
            oncall.iter().map(|c| c.endpoints.len()).collect::<Vec<_>>(),
            vec![3, 3, 1]
        );
        assert_eq!(oncall[2].group_name(), "g-02");
    }

    #[test]
    fn test_metric_keys_are_unique() {
        let items = vec![
            Endpoint::new("/a", "GET", "get-item"),
            Endpoint::new("/b", "GET", "getitem"),
            Endpoint::new("/c/{id}", "POST", ""),
        ];
        assert_eq!(metric_keys(&items), vec!["getitem", "getitem_1", "POSTcid"]);
    }
}
