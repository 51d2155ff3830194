use anyhow::Context;
use bulk_bundle::adapters::draft::FileDraftStore;
use bulk_bundle::adapters::order_log::JsonOrderLog;
use bulk_bundle::domain::ports::{DraftStore, OrderSink};
use bulk_bundle::utils::{logger, validation::Validate};
use bulk_bundle::{BundleEngine, BundlePipeline, CliConfig, LocalStorage};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting bulk-bundle CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.into_run_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration resolution failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // Draft echo: keep the raw input around until the run succeeds.
    let draft = config.draft_file.clone().map(FileDraftStore::new);
    if let Some(store) = &draft {
        let raw = std::fs::read_to_string(&config.input)
            .with_context(|| format!("failed to read input file {}", config.input))?;
        store.save(&raw)?;
    }

    let order_log = config.order_log.clone().map(JsonOrderLog::new);

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = BundlePipeline::new(storage, config);
    let engine = BundleEngine::new(pipeline);

    match engine.run().await {
        Ok(output) => {
            if let Some(sink) = &order_log {
                if let Err(e) = sink.record_order(&output.kept, &output.stats).await {
                    tracing::warn!("Order record was not written: {}", e);
                }
            }
            if let Some(store) = &draft {
                if let Err(e) = store.clear() {
                    tracing::warn!("Draft file was not cleared: {}", e);
                }
            }

            println!("✅ Export completed successfully!");
            if !output.output_path.is_empty() {
                println!("📁 Output saved to: {}", output.output_path);
            }
            let stats = &output.stats;
            println!(
                "📊 {} kept ({} fixed, {} duplicate, {} skipped) — {:.2} GB in {} file(s)",
                stats.kept,
                stats.fixed,
                stats.duplicate,
                stats.skipped,
                stats.total_gb,
                output.files.len()
            );
            if stats.invalid > 0 {
                // The submit gate lives in the UI; surface the count it needs.
                println!(
                    "⚠️ {} invalid number(s) exported for review — correct them before submitting the order",
                    stats.invalid
                );
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Export run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                bulk_bundle::utils::error::ErrorSeverity::Low => 0,
                bulk_bundle::utils::error::ErrorSeverity::Medium => 2,
                bulk_bundle::utils::error::ErrorSeverity::High => 1,
                bulk_bundle::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
