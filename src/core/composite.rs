use crate::config::settings::TransformConfig;
use crate::core::naming::{self, AlarmNaming};
use crate::domain::model::{AlarmNameMap, CompositeMappings, Family, Severity};
use crate::domain::template::{insert_resource, CompositeAlarmProperties, Resource, Resources};
use crate::utils::error::Result;

/// 每個 composite group × severity × family 一個 composite alarm，以 OR 串接所有 chunk alarm
pub fn create_composite_alarms(
    mappings: &CompositeMappings,
    standard_names: &AlarmNameMap,
    oncall_names: &AlarmNameMap,
    config: &TransformConfig,
) -> Result<Resources> {
    let naming = AlarmNaming::from_config(config);
    let mut resources = Resources::new();

    for (composite_group, subgroups) in mappings {
        for severity in config.severities() {
            for (family, names) in [
                (Family::Standard, standard_names),
                (Family::OnCall, oncall_names),
            ] {
                let (children, depends_on) = collect_children(subgroups, names, family, severity);
                if children.is_empty() {
                    tracing::warn!(
                        "No {} {} alarms found for composite group {}",
                        family,
                        severity,
                        composite_group
                    );
                    continue;
                }

                let logical_id = naming::composite_logical_id(family, severity, composite_group);
                let description = match family {
                    Family::Standard => format!(
                        "Composite {} alarm for {} group",
                        severity.label(),
                        composite_group
                    ),
                    Family::OnCall => format!(
                        "On-call composite {} alarm for {} group",
                        severity.label(),
                        composite_group
                    ),
                };

                let properties = CompositeAlarmProperties::new(
                    &logical_id,
                    naming.composite_display_name(family, severity, composite_group),
                    description,
                    &children,
                    config.notification_target_arn.as_deref(),
                )?;

                tracing::debug!(
                    "Composite alarm {} aggregates {} alarms",
                    logical_id,
                    children.len()
                );
                insert_resource(
                    &mut resources,
                    logical_id,
                    Resource::CompositeAlarm {
                        depends_on,
                        properties,
                    },
                )?;
            }
        }
    }

    tracing::info!("Created {} composite alarms", resources.len());
    Ok(resources)
}

/// 子 alarm 顯示名稱與對應的 logical id，依 subgroup 再依 chunk 排序
fn collect_children<'a>(
    subgroups: impl IntoIterator<Item = &'a String>,
    names: &AlarmNameMap,
    family: Family,
    severity: Severity,
) -> (Vec<String>, Vec<String>) {
    let mut children = Vec::new();
    let mut depends_on = Vec::new();

    for subgroup in subgroups {
        for (index, name) in names.names(subgroup, severity).iter().enumerate() {
            children.push(name.clone());
            depends_on.push(naming::base_logical_id(family, severity, subgroup, index));
        }
    }

    (children, depends_on)
}
