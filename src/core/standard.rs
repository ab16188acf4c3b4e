use crate::config::settings::TransformConfig;
use crate::core::naming::{self, AlarmNaming};
use crate::domain::model::{AlarmNameMap, Family, MonitoringGroups, Severity};
use crate::domain::template::{
    insert_resource, Metric, MetricAlarmProperties, MetricDataQuery, Resource, Resources,
};
use crate::utils::error::Result;
use indexmap::IndexMap;

pub const RESULT_ID: &str = "max_errors";

/// 一個 family 的 base alarms 與其顯示名稱
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseAlarms {
    pub resources: Resources,
    pub names: AlarmNameMap,
}

/// 每個 chunk 一個 alarm：取 chunk 內錯誤數最高的 endpoint
pub fn create_standard_alarms(
    groups: &MonitoringGroups,
    config: &TransformConfig,
) -> Result<BaseAlarms> {
    let settings = &config.settings.standard;
    let naming = AlarmNaming::from_config(config);
    let mut resources = Resources::new();
    let mut names = Vec::with_capacity(groups.len());

    for (subgroup, endpoints) in groups {
        let mut by_severity = IndexMap::new();

        for severity in config.severities() {
            let mut alarm_names = Vec::new();

            for chunk in naming::chunks(subgroup, endpoints, Family::Standard) {
                let logical_id = chunk.logical_id(Family::Standard, severity);
                let alarm_name = chunk.display_name(&naming, Family::Standard, severity);

                let mut metrics: Vec<MetricDataQuery> = naming::metric_keys(chunk.endpoints)
                    .into_iter()
                    .zip(chunk.endpoints)
                    .map(|(key, endpoint)| {
                        let metric = Metric::api_gateway(
                            severity.metric_name(),
                            &config.api.name,
                            &config.api.stage,
                            endpoint,
                        );
                        MetricDataQuery::metric(format!("m_{}", key), metric, settings.period, &settings.stat)
                    })
                    .collect();
                metrics.push(max_errors(&metrics, severity));

                let properties = MetricAlarmProperties::new(
                    &logical_id,
                    alarm_name.clone(),
                    format!(
                        "Standard {} alarm for {} endpoints",
                        severity.label(),
                        chunk.group_name()
                    ),
                    metrics,
                    settings.evaluation(),
                )?;

                tracing::debug!(
                    "Standard alarm {} covers {} endpoints",
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

    tracing::info!("Created {} standard alarms", resources.len());
    Ok(BaseAlarms {
        resources,
        names: names.into_iter().collect(),
    })
}

fn max_errors(inputs: &[MetricDataQuery], severity: Severity) -> MetricDataQuery {
    let filled: Vec<String> = inputs
        .iter()
        .map(|query| format!("FILL({}, 0)", query.id))
        .collect();
    MetricDataQuery::result(
        RESULT_ID,
        format!("MAX([{}])", filled.join(",")),
        format!("Max {} Errors", severity.label()),
    )
}
