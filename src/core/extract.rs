use crate::domain::model::{Endpoint, ExtractedGroups, SkipReason, SkippedOperation};
use crate::utils::error::{AlarmError, Result};
use serde_yaml::Value;

pub const MONITORING_GROUP_EXTENSION: &str = "x-pagopa-monitoring-group";
pub const EXCLUDED_SENTINEL: &str = "<none>";
pub const GROUP_SEPARATOR: char = '-';
pub const NO_EXTENSION_PREFIX: &str = "noextension-";
pub const SUPPORTED_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH"];

/// 解析 YAML 或 JSON 格式的 OpenAPI 文件
pub fn parse_spec(data: &[u8]) -> Result<Value> {
    let document: Value = serde_yaml::from_slice(data)?;
    Ok(document)
}

/// 依 x-pagopa-monitoring-group (或第一個 tag) 將操作分到 subgroup 與 composite group
pub fn extract_monitoring_groups(document: &Value) -> Result<ExtractedGroups> {
    let root = document.as_mapping().ok_or(AlarmError::SpecNotAMapping)?;
    let mut groups = ExtractedGroups::default();

    let paths = match root.get("paths") {
        Some(Value::Mapping(paths)) => paths,
        None | Some(Value::Null) => {
            tracing::info!("OpenAPI spec has no paths, nothing to monitor");
            return Ok(groups);
        }
        Some(_) => {
            tracing::warn!("OpenAPI paths is not a mapping, nothing to monitor");
            return Ok(groups);
        }
    };

    for (path_key, path_item) in paths {
        let Some(path) = path_key.as_str() else {
            tracing::warn!("Skipping non-string path key {:?}", path_key);
            continue;
        };
        let Some(operations) = path_item.as_mapping() else {
            tracing::debug!("Skipping path {} without operations", path);
            continue;
        };

        for (method_key, operation) in operations {
            let method = method_key.as_str().unwrap_or_default().to_uppercase();

            let outcome = if SUPPORTED_METHODS.contains(&method.as_str()) {
                resolve_grouping(operation)
            } else {
                Err(SkipReason::UnsupportedMethod)
            };

            match outcome {
                Ok((composite, subgroup)) => {
                    let operation_id = operation
                        .get("operationId")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    assign(&mut groups, composite, subgroup, Endpoint::new(path, &method, operation_id));
                }
                Err(reason) => {
                    log_skip(path, &method, &reason);
                    groups.skipped.push(SkippedOperation {
                        path: path.to_string(),
                        method,
                        reason,
                    });
                }
            }
        }
    }

    if let Ok(structure) = serde_json::to_string_pretty(&groups.monitoring_groups) {
        tracing::debug!("Extracted monitoring groups: {}", structure);
    }
    tracing::info!(
        "Total monitoring groups: {}, Total composite groups: {}, Skipped operations: {}",
        groups.monitoring_groups.len(),
        groups.composite_mappings.len(),
        groups.skipped.len()
    );

    Ok(groups)
}

/// 回傳 (composite group, subgroup)
fn resolve_grouping(operation: &Value) -> std::result::Result<(String, String), SkipReason> {
    match operation.get(MONITORING_GROUP_EXTENSION) {
        Some(Value::String(group)) if group == EXCLUDED_SENTINEL => {
            Err(SkipReason::ExcludedBySentinel)
        }
        Some(Value::String(group)) if !group.is_empty() => match group.split_once(GROUP_SEPARATOR) {
            Some((composite, _)) => Ok((composite.to_string(), group.clone())),
            None => Err(SkipReason::MalformedMonitoringGroup(group.clone())),
        },
        None | Some(Value::Null) | Some(Value::String(_)) => first_tag(operation)
            .map(|tag| {
                let group = format!("{}{}", NO_EXTENSION_PREFIX, tag);
                (group.clone(), group)
            })
            .ok_or(SkipReason::NoGroupingInformation),
        Some(other) => Err(SkipReason::MalformedMonitoringGroup(render(other))),
    }
}

fn first_tag(operation: &Value) -> Option<&str> {
    operation
        .get("tags")
        .and_then(Value::as_sequence)
        .and_then(|tags| tags.first())
        .and_then(Value::as_str)
}

fn render(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|rendered| rendered.trim().to_string())
        .unwrap_or_else(|_| format!("{:?}", value))
}

/// 同一 subgroup 內重複的 endpoint 直接忽略；subgroup 只屬於第一個登記的 composite group
fn assign(groups: &mut ExtractedGroups, composite: String, subgroup: String, endpoint: Endpoint) {
    let owner = match groups.composite_of(&subgroup) {
        Some(existing) if existing != composite => {
            tracing::warn!(
                "Subgroup {} already belongs to composite group {}, ignoring {}",
                subgroup,
                existing,
                composite
            );
            existing.to_string()
        }
        _ => composite,
    };

    let endpoints = groups.monitoring_groups.entry(subgroup.clone()).or_default();
    if !endpoints.contains(&endpoint) {
        endpoints.push(endpoint);
    }
    groups
        .composite_mappings
        .entry(owner)
        .or_default()
        .insert(subgroup);
}

fn log_skip(path: &str, method: &str, reason: &SkipReason) {
    match reason {
        SkipReason::UnsupportedMethod => {
            tracing::debug!("Skipping method {} for path {}", method, path)
        }
        SkipReason::ExcludedBySentinel => tracing::info!(
            "{} is '{}' for {} {}, skipping operation",
            MONITORING_GROUP_EXTENSION,
            EXCLUDED_SENTINEL,
            path,
            method
        ),
        SkipReason::MalformedMonitoringGroup(value) => {
            tracing::warn!("Invalid monitoring group format: {} ({} {})", value, path, method)
        }
        SkipReason::NoGroupingInformation => tracing::warn!(
            "No {} or tags for {} {}, skipping operation",
            MONITORING_GROUP_EXTENSION,
            path,
            method
        ),
    }
}
