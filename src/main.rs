use clap::Parser;
use std::path::Path;
use vaccine_pipeline::utils::{logger, validation::Validate};
use vaccine_pipeline::{CliConfig, LocalStorage, PipelineEngine, VaccinePipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose, Path::new(&config.log_file))?;

    tracing::info!("Starting vaccine-pipeline CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = VaccinePipeline::new(storage, config)?;
    let engine = PipelineEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(Some(output_path)) => {
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Vaccine data saved to: {}", output_path);
        }
        Ok(None) => {
            // Fetch failure: already logged, downstream steps skipped.
        }
        Err(e) => {
            tracing::error!(
                "❌ Pipeline failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                vaccine_pipeline::utils::error::ErrorSeverity::Low => 0,
                vaccine_pipeline::utils::error::ErrorSeverity::Medium => 2,
                vaccine_pipeline::utils::error::ErrorSeverity::High => 1,
                vaccine_pipeline::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                tracing::info!("✅ Vaccine pipeline completed.");
                std::process::exit(exit_code);
            }
        }
    }

    tracing::info!("✅ Vaccine pipeline completed.");
    Ok(())
}
