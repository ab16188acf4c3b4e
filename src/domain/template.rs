//! CloudFormation 片段的型別化表示。
//!
//! 所有資源在建構時驗證，序列化結果可直接放進 macro 回傳的 fragment。

use crate::domain::model::Endpoint;
use crate::utils::error::{AlarmError, Result};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashSet;

pub const API_GATEWAY_NAMESPACE: &str = "AWS/ApiGateway";

/// CloudWatch 每個 alarm 的 Metrics 上限
pub const MAX_METRICS_PER_ALARM: usize = 10;

pub type Resources = IndexMap<String, Resource>;
pub type Outputs = IndexMap<String, Output>;

/// CloudFormation intrinsic function 參照
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intrinsic {
    GetAtt { resource: String, attribute: String },
    /// `${AWS::StackName}-{suffix}`
    StackQualifiedName { suffix: String },
}

impl Intrinsic {
    pub fn arn_of(resource: &str) -> Self {
        Intrinsic::GetAtt {
            resource: resource.to_string(),
            attribute: "Arn".to_string(),
        }
    }

    pub fn stack_qualified(suffix: &str) -> Self {
        Intrinsic::StackQualifiedName {
            suffix: suffix.to_string(),
        }
    }
}

impl Serialize for Intrinsic {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Intrinsic::GetAtt {
                resource,
                attribute,
            } => map.serialize_entry("Fn::GetAtt", &[resource, attribute])?,
            Intrinsic::StackQualifiedName { suffix } => {
                map.serialize_entry("Fn::Sub", &format!("${{AWS::StackName}}-{}", suffix))?
            }
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Metric {
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: Vec<Dimension>,
}

impl Metric {
    /// API Gateway 單一 endpoint 的 metric (ApiName, Stage, Resource, Method)
    pub fn api_gateway(metric_name: &str, api_name: &str, stage: &str, endpoint: &Endpoint) -> Self {
        let dimension = |name: &str, value: &str| Dimension {
            name: name.to_string(),
            value: value.to_string(),
        };
        Self {
            namespace: API_GATEWAY_NAMESPACE.to_string(),
            metric_name: metric_name.to_string(),
            dimensions: vec![
                dimension("ApiName", api_name),
                dimension("Stage", stage),
                dimension("Resource", &endpoint.path),
                dimension("Method", &endpoint.method),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricStat {
    pub metric: Metric,
    pub period: u32,
    pub stat: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDataQuery {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_stat: Option<MetricStat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub return_data: bool,
}

impl MetricDataQuery {
    /// 原始 metric，只作為運算輸入
    pub fn metric(id: String, metric: Metric, period: u32, stat: &str) -> Self {
        Self {
            id,
            metric_stat: Some(MetricStat {
                metric,
                period,
                stat: stat.to_string(),
            }),
            expression: None,
            label: None,
            return_data: false,
        }
    }

    /// 中間運算式，不回傳
    pub fn expression(id: String, expression: String, label: String) -> Self {
        Self {
            id,
            metric_stat: None,
            expression: Some(expression),
            label: Some(label),
            return_data: false,
        }
    }

    /// alarm 實際評估的結果運算式
    pub fn result(id: &str, expression: String, label: String) -> Self {
        Self {
            return_data: true,
            ..Self::expression(id.to_string(), expression, label)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Evaluation {
    pub evaluation_periods: u32,
    pub datapoints_to_alarm: u32,
    pub threshold: f64,
    pub comparison_operator: String,
    pub treat_missing_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricAlarmProperties {
    alarm_name: String,
    alarm_description: String,
    metrics: Vec<MetricDataQuery>,
    #[serde(flatten)]
    evaluation: Evaluation,
}

impl MetricAlarmProperties {
    /// 驗證：metric 數量在上限內、id 不重複、恰好一個 ReturnData
    pub fn new(
        logical_id: &str,
        alarm_name: String,
        alarm_description: String,
        metrics: Vec<MetricDataQuery>,
        evaluation: Evaluation,
    ) -> Result<Self> {
        let invalid = |reason: String| AlarmError::InvalidAlarmDefinition {
            logical_id: logical_id.to_string(),
            reason,
        };

        if metrics.is_empty() || metrics.len() > MAX_METRICS_PER_ALARM {
            return Err(invalid(format!(
                "alarm must have between 1 and {} metrics, got {}",
                MAX_METRICS_PER_ALARM,
                metrics.len()
            )));
        }

        let returning = metrics.iter().filter(|m| m.return_data).count();
        if returning != 1 {
            return Err(invalid(format!(
                "exactly one metric must return data, got {}",
                returning
            )));
        }

        let mut ids = HashSet::new();
        if let Some(duplicate) = metrics.iter().find(|m| !ids.insert(m.id.clone())) {
            return Err(invalid(format!("duplicate metric id {}", duplicate.id)));
        }

        Ok(Self {
            alarm_name,
            alarm_description,
            metrics,
            evaluation,
        })
    }

    pub fn alarm_name(&self) -> &str {
        &self.alarm_name
    }

    pub fn alarm_description(&self) -> &str {
        &self.alarm_description
    }

    pub fn metrics(&self) -> &[MetricDataQuery] {
        &self.metrics
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn result_query(&self) -> Option<&MetricDataQuery> {
        self.metrics.iter().find(|m| m.return_data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompositeAlarmProperties {
    alarm_name: String,
    alarm_description: String,
    alarm_rule: String,
    actions_enabled: bool,
    alarm_actions: Vec<String>,
    #[serde(rename = "OKActions")]
    ok_actions: Vec<String>,
    insufficient_data_actions: Vec<String>,
}

impl CompositeAlarmProperties {
    /// 以 OR 串接所有子 alarm；通知目標同時用於 ALARM / OK / INSUFFICIENT_DATA
    pub fn new(
        logical_id: &str,
        alarm_name: String,
        alarm_description: String,
        child_alarm_names: &[String],
        notification_target: Option<&str>,
    ) -> Result<Self> {
        if child_alarm_names.is_empty() {
            return Err(AlarmError::InvalidAlarmDefinition {
                logical_id: logical_id.to_string(),
                reason: "composite alarm has no child alarms".to_string(),
            });
        }

        let actions: Vec<String> = notification_target.map(str::to_string).into_iter().collect();

        Ok(Self {
            alarm_name,
            alarm_description,
            alarm_rule: or_rule(child_alarm_names),
            actions_enabled: !actions.is_empty(),
            alarm_actions: actions.clone(),
            ok_actions: actions.clone(),
            insufficient_data_actions: actions,
        })
    }

    pub fn alarm_name(&self) -> &str {
        &self.alarm_name
    }

    pub fn alarm_rule(&self) -> &str {
        &self.alarm_rule
    }

    pub fn alarm_actions(&self) -> &[String] {
        &self.alarm_actions
    }

    pub fn ok_actions(&self) -> &[String] {
        &self.ok_actions
    }

    pub fn insufficient_data_actions(&self) -> &[String] {
        &self.insufficient_data_actions
    }

    pub fn actions_enabled(&self) -> bool {
        self.actions_enabled
    }
}

fn or_rule(child_alarm_names: &[String]) -> String {
    let atoms: Vec<String> = child_alarm_names
        .iter()
        .map(|name| format!("ALARM(\"{}\")", name))
        .collect();
    format!("({})", atoms.join(" OR "))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Type")]
pub enum Resource {
    #[serde(rename = "AWS::CloudWatch::Alarm")]
    MetricAlarm {
        #[serde(rename = "Properties")]
        properties: MetricAlarmProperties,
    },
    #[serde(rename = "AWS::CloudWatch::CompositeAlarm")]
    CompositeAlarm {
        #[serde(rename = "DependsOn")]
        depends_on: Vec<String>,
        #[serde(rename = "Properties")]
        properties: CompositeAlarmProperties,
    },
}

impl Resource {
    pub fn as_metric_alarm(&self) -> Option<&MetricAlarmProperties> {
        match self {
            Resource::MetricAlarm { properties } => Some(properties),
            Resource::CompositeAlarm { .. } => None,
        }
    }

    pub fn as_composite_alarm(&self) -> Option<(&[String], &CompositeAlarmProperties)> {
        match self {
            Resource::CompositeAlarm {
                depends_on,
                properties,
            } => Some((depends_on, properties)),
            Resource::MetricAlarm { .. } => None,
        }
    }
}

/// 加入資源；logical id 重複代表兩個群組清理後撞名，直接回報錯誤
pub fn insert_resource(resources: &mut Resources, logical_id: String, resource: Resource) -> Result<()> {
    if resources.contains_key(&logical_id) {
        return Err(AlarmError::InvalidAlarmDefinition {
            reason: "logical id is generated by more than one monitoring group".to_string(),
            logical_id,
        });
    }
    resources.insert(logical_id, resource);
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Export {
    pub name: Intrinsic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub description: String,
    pub value: Intrinsic,
    pub export: Export,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn evaluation() -> Evaluation {
        Evaluation {
            evaluation_periods: 5,
            datapoints_to_alarm: 1,
            threshold: 1.0,
            comparison_operator: "GreaterThanThreshold".to_string(),
            treat_missing_data: "notBreaching".to_string(),
        }
    }

    fn input(id: &str) -> MetricDataQuery {
        MetricDataQuery::expression(id.to_string(), "1".to_string(), id.to_string())
    }

    #[test]
    fn test_intrinsics_serialize_to_cloudformation_functions() {
        assert_eq!(
            serde_json::to_value(Intrinsic::arn_of("Composite5xxAlarmorders")).unwrap(),
            json!({"Fn::GetAtt": ["Composite5xxAlarmorders", "Arn"]})
        );
        assert_eq!(
            serde_json::to_value(Intrinsic::stack_qualified("Composite5xxAlarmorders")).unwrap(),
            json!({"Fn::Sub": "${AWS::StackName}-Composite5xxAlarmorders"})
        );
    }

    #[test]
    fn test_metric_alarm_requires_single_result() {
        let no_result = vec![input("a"), input("b")];
        assert!(MetricAlarmProperties::new("id", "n".into(), "d".into(), no_result, evaluation()).is_err());

        let two_results = vec![
            MetricDataQuery::result("a", "1".into(), "a".into()),
            MetricDataQuery::result("b", "1".into(), "b".into()),
        ];
        assert!(MetricAlarmProperties::new("id", "n".into(), "d".into(), two_results, evaluation()).is_err());
    }

    #[test]
    fn test_metric_alarm_rejects_too_many_metrics() {
        let mut metrics: Vec<MetricDataQuery> =
            (0..MAX_METRICS_PER_ALARM).map(|i| input(&format!("m{}", i))).collect();
        metrics.push(MetricDataQuery::result("r", "1".into(), "r".into()));

        let err = MetricAlarmProperties::new("TooBig", "n".into(), "d".into(), metrics, evaluation())
            .unwrap_err();
        assert!(matches!(err, AlarmError::InvalidAlarmDefinition { ref logical_id, .. } if logical_id == "TooBig"));
    }

    #[test]
    fn test_metric_alarm_rejects_duplicate_ids() {
        let metrics = vec![
            input("m_a"),
            input("m_a"),
            MetricDataQuery::result("r", "1".into(), "r".into()),
        ];
        assert!(MetricAlarmProperties::new("id", "n".into(), "d".into(), metrics, evaluation()).is_err());
    }

    #[test]
    fn test_composite_alarm_rule_and_actions() {
        let children = vec!["child-a".to_string(), "child-b".to_string()];
        let composite = CompositeAlarmProperties::new(
            "Composite5xxAlarmorders",
            "comp".into(),
            "desc".into(),
            &children,
            Some("arn:aws:sns:eu-south-1:123456789012:alarms"),
        )
        .unwrap();

        assert_eq!(
            composite.alarm_rule(),
            r#"(ALARM("child-a") OR ALARM("child-b"))"#
        );
        assert!(composite.actions_enabled());
        assert_eq!(composite.alarm_actions(), composite.ok_actions());
        assert_eq!(composite.ok_actions(), composite.insufficient_data_actions());
    }

    #[test]
    fn test_composite_alarm_without_target_disables_actions() {
        let children = vec!["child-a".to_string()];
        let composite =
            CompositeAlarmProperties::new("id", "comp".into(), "desc".into(), &children, None).unwrap();
        assert!(!composite.actions_enabled());
        assert!(composite.alarm_actions().is_empty());

        assert!(CompositeAlarmProperties::new("id", "comp".into(), "desc".into(), &[], None).is_err());
    }

    #[test]
    fn test_resource_serialization_shape() {
        let children = vec!["child-a".to_string()];
        let properties =
            CompositeAlarmProperties::new("id", "comp".into(), "desc".into(), &children, Some("arn")).unwrap();
        let resource = Resource::CompositeAlarm {
            depends_on: vec!["Standard5xxAlarmordersread".to_string()],
            properties,
        };

        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["Type"], "AWS::CloudWatch::CompositeAlarm");
        assert_eq!(value["DependsOn"], json!(["Standard5xxAlarmordersread"]));
        assert_eq!(value["Properties"]["OKActions"], json!(["arn"]));
        assert_eq!(value["Properties"]["ActionsEnabled"], json!(true));
    }

    #[test]
    fn test_insert_resource_rejects_collisions() {
        let children = vec!["child-a".to_string()];
        let properties =
            CompositeAlarmProperties::new("id", "comp".into(), "desc".into(), &children, None).unwrap();
        let resource = Resource::CompositeAlarm {
            depends_on: vec![],
            properties,
        };

        let mut resources = Resources::new();
        insert_resource(&mut resources, "Same".to_string(), resource.clone()).unwrap();
        assert!(insert_resource(&mut resources, "Same".to_string(), resource).is_err());
    }
}
