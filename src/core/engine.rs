use crate::config::settings::TransformConfig;
use crate::core::composite::create_composite_alarms;
use crate::core::extract::extract_monitoring_groups;
use crate::core::oncall::create_oncall_alarms;
use crate::core::outputs::create_outputs;
use crate::core::standard::{create_standard_alarms, BaseAlarms};
use crate::domain::model::{Action, ExtractedGroups};
use crate::domain::template::{Outputs, Resources};
use crate::utils::error::Result;

/// 一次轉換的完整結果
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedAlarms {
    pub groups: ExtractedGroups,
    pub standard: BaseAlarms,
    pub oncall: BaseAlarms,
    pub composites: Resources,
}

impl GeneratedAlarms {
    /// standard base → oncall base → composite
    pub fn resources(&self) -> Resources {
        self.standard
            .resources
            .iter()
            .chain(&self.oncall.resources)
            .chain(&self.composites)
            .map(|(id, resource)| (id.clone(), resource.clone()))
            .collect()
    }

    pub fn outputs(&self) -> Outputs {
        create_outputs(&self.composites)
    }

    pub fn fragment(&self, action: Action) -> Result<serde_json::Value> {
        let fragment = match action {
            Action::Resources => serde_json::to_value(self.resources())?,
            Action::Outputs => serde_json::to_value(self.outputs())?,
        };
        Ok(fragment)
    }
}

pub struct SegmentationEngine {
    config: TransformConfig,
}

impl SegmentationEngine {
    pub fn new(config: TransformConfig) -> Self {
        Self { config }
    }

    /// OpenAPI 文件 → monitoring groups → base alarms → composite alarms
    pub fn generate(&self, document: &serde_yaml::Value) -> Result<GeneratedAlarms> {
        tracing::info!(
            "🔄 Generating alarms for {} ({}) on API {}/{}",
            self.config.microservice_name,
            self.config.intended_usage,
            self.config.api.name,
            self.config.api.stage
        );

        let groups = extract_monitoring_groups(document)?;
        let standard = create_standard_alarms(&groups.monitoring_groups, &self.config)?;
        let oncall = create_oncall_alarms(&groups.monitoring_groups, &self.config)?;
        let composites = create_composite_alarms(
            &groups.composite_mappings,
            &standard.names,
            &oncall.names,
            &self.config,
        )?;

        let generated = GeneratedAlarms {
            groups,
            standard,
            oncall,
            composites,
        };

        tracing::info!(
            "✅ Generated {} resources ({} standard, {} on-call, {} composite)",
            generated.standard.resources.len()
                + generated.oncall.resources.len()
                + generated.composites.len(),
            generated.standard.resources.len(),
            generated.oncall.resources.len(),
            generated.composites.len()
        );
        Ok(generated)
    }
}
