pub mod cli;
pub mod lambda;
pub mod macro_params;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::settings::{AlarmSettings, TransformConfig};
#[cfg(feature = "cli")]
use crate::domain::model::{Action, SpecLocation};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "api-alarms")]
#[command(about = "Generate CloudWatch alarms from an OpenAPI spec with monitoring groups")]
pub struct CliConfig {
    #[arg(long, help = "Path to the OpenAPI spec (YAML or JSON)")]
    pub spec: String,

    #[arg(long, default_value = "resources", help = "resources | outputs")]
    pub action: String,

    #[arg(long, help = "API Gateway name used as the ApiName dimension")]
    pub api_name: String,

    #[arg(long, default_value = "unique")]
    pub stage: String,

    #[arg(long)]
    pub microservice_name: String,

    #[arg(long)]
    pub intended_usage: String,

    #[arg(long, help = "Also generate 4xx alarms")]
    pub alarm_on_4xx: bool,

    #[arg(long)]
    pub notification_target_arn: Option<String>,

    #[arg(long, help = "TOML file with [standard] and [oncall] alarm settings")]
    pub settings: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Print the fragment on a single line")]
    pub compact: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn action(&self) -> Result<Action> {
        self.action.parse()
    }

    pub fn spec_location(&self) -> SpecLocation {
        SpecLocation::new("local", &self.spec)
    }

    pub fn transform_config(&self) -> Result<TransformConfig> {
        let settings = match &self.settings {
            Some(path) => AlarmSettings::from_file(path)?,
            None => AlarmSettings::default(),
        };

        let mut config = TransformConfig::new(
            &self.api_name,
            &self.stage,
            &self.microservice_name,
            &self.intended_usage,
        )
        .with_alarm_on_4xx(self.alarm_on_4xx)
        .with_settings(settings);
        config.notification_target_arn = self.notification_target_arn.clone();
        Ok(config)
    }
}
