use crate::config::settings::TransformConfig;
use crate::core::naming::{self, AlarmNaming};
use crate::core::standard::BaseAlarms;
use crate::domain::model::{Endpoint, Family, MonitoringGroups, Severity};
use crate::domain::template::{
    insert_resource, Metric, MetricAlarmProperties, MetricDataQuery, Resource, Resources,
};
use crate::utils::error::Result;
use indexmap::IndexMap;

pub const RESULT_ID: &str = "error_condition";
pub const REQUEST_COUNT_METRIC: &str = "Count";

/// 每個 chunk 一個 alarm：任一 endpoint 同時達到流量門檻與錯誤率門檻即告警
pub fn create_oncall_alarms(
    groups: &MonitoringGroups,
    config: &TransformConfig,
) -> Result<BaseAlarms> {
    let naming = AlarmNaming::from_config(config);
    let mut resources = Resources::new();
    let mut names = Vec::with_capacity(groups.len());

    for (subgroup, endpoints) in groups {
        let mut by_severity = IndexMap::new();

        for severity in config.severities() {
            let mut alarm_names = Vec::new();

            for chunk in naming::chunks(subgroup, endpoints, Family::OnCall) {
                let logical_id = chunk.logical_id(Family::OnCall, severity);
                let alarm_name = chunk.display_name(&naming, Family::OnCall, severity);

                let properties = MetricAlarmProperties::new(
                    &logical_id,
                    alarm_name.clone(),
                    format!(
                        "On-call {} alarm for {} endpoints",
                        severity.label(),
                        chunk.group_name()
                    ),
                    condition_queries(chunk.endpoints, severity, config),
                    config.settings.oncall.evaluation(severity),
                )?;

                tracing::debug!(
                    "On-call alarm {} covers {} endpoints",
                    logical_id,
                    chunk.endpoints.len()
                );
                insert_resource(&mut resources, logical_id, Resource::MetricAlarm { properties })?;
                alarm_names.push(alarm_name);
            }

            by_severity.insert(severity, alarm_names);
        }

        names.push((subgroup.clone(), by_severity));
    }

    tracing::info!("Created {} on-call alarms", resources.len());
    Ok(BaseAlarms {
        resources,
        names: names.into_iter().collect(),
    })
}

/// 每個 endpoint 三個 query (錯誤、請求數、條件)，最後以 MAX 合併條件
fn condition_queries(
    endpoints: &[Endpoint],
    severity: Severity,
    config: &TransformConfig,
) -> Vec<MetricDataQuery> {
    let settings = &config.settings.oncall;
    let rate_threshold = settings.rate_threshold(severity);
    let mut queries = Vec::with_capacity(endpoints.len() * 3 + 1);
    let mut conditions = Vec::with_capacity(endpoints.len());

    for (i, (key, endpoint)) in naming::metric_keys(endpoints)
        .into_iter()
        .zip(endpoints)
        .enumerate()
    {
        let error_id = format!("error{}_{}", severity, key);
        let count_id = format!("count{}_{}", severity, key);
        let condition_id = format!("e_{}", key);

        let api_metric = |metric_name: &str| {
            Metric::api_gateway(metric_name, &config.api.name, &config.api.stage, endpoint)
        };

        let label = if endpoint.operation_id.is_empty() {
            format!("Operation {}", i)
        } else {
            endpoint.operation_id.clone()
        };
        let condition = format!(
            "((FILL({},0) > {}) * (FILL({},0) > {}))",
            count_id, settings.count_threshold, error_id, rate_threshold
        );

        queries.push(MetricDataQuery::metric(
            error_id,
            api_metric(severity.metric_name()),
            settings.period,
            &settings.stat,
        ));
        queries.push(MetricDataQuery::metric(
            count_id,
            api_metric(REQUEST_COUNT_METRIC),
            settings.period,
            &settings.count_stat,
        ));
        queries.push(MetricDataQuery::expression(condition_id.clone(), condition, label));
        conditions.push(condition_id);
    }

    queries.push(MetricDataQuery::result(
        RESULT_ID,
        format!("MAX([{}])", conditions.join(", ")),
        format!("{} Error Condition", severity.label()),
    ));
    queries
}
