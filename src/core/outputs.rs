use crate::core::naming::alphanumeric;
use crate::domain::template::{Export, Intrinsic, Output, Outputs, Resources};

/// 為每個 composite alarm 匯出 ARN
pub fn create_outputs(resources: &Resources) -> Outputs {
    let outputs: Outputs = resources
        .iter()
        .filter(|(_, resource)| resource.as_composite_alarm().is_some())
        .map(|(logical_id, _)| {
            let key = alphanumeric(logical_id);
            let output = Output {
                description: format!("ARN of the alarm {}", logical_id),
                value: Intrinsic::arn_of(logical_id),
                export: Export {
                    name: Intrinsic::stack_qualified(&key),
                },
            };
            (key, output)
        })
        .collect();

    tracing::info!("Created {} outputs", outputs.len());
    outputs
}
