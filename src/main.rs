use api_alarms::core::extract::parse_spec;
use api_alarms::domain::ports::SpecSource;
use api_alarms::utils::error::{AlarmError, ErrorCategory};
use api_alarms::utils::{logger, validation::Validate};
use api_alarms::{CliConfig, LocalSpecSource, SegmentationEngine};
use clap::Parser;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌 (stderr)
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting api-alarms CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    match run(&config).await {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => {
            tracing::error!("❌ Alarm generation failed: {} (Category: {:?})", e, e.category());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());

            // 依錯誤類別決定退出碼
            let exit_code = match e.category() {
                ErrorCategory::Configuration => 2,
                ErrorCategory::Spec => 3,
                ErrorCategory::Generation => 4,
                ErrorCategory::Io => 5,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn run(config: &CliConfig) -> Result<String, AlarmError> {
    let action = config.action()?;
    let transform = config.transform_config()?;
    transform.validate()?;

    let source = LocalSpecSource::new(".");
    let data = source.fetch_spec(&config.spec_location()).await?;
    let document = parse_spec(&data)?;

    let generated = SegmentationEngine::new(transform).generate(&document)?;
    for skipped in &generated.groups.skipped {
        tracing::debug!("Skipped {} {}: {:?}", skipped.method, skipped.path, skipped.reason);
    }

    let fragment = generated.fragment(action)?;
    let rendered = if config.compact {
        serde_json::to_string(&fragment)?
    } else {
        serde_json::to_string_pretty(&fragment)?
    };
    Ok(rendered)
}
