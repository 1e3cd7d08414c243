use clap::Parser;
use json_ports::core::ConfigProvider;
use json_ports::utils::error::ErrorSeverity;
use json_ports::utils::monitor::ImportMonitor;
use json_ports::utils::{logger, validation::Validate};
use json_ports::{
    connect, migrate, CliConfig, FileImporter, ImportSummary, PortService, PortsError,
    ShutdownSignal, SqlitePortRepository, TomlConfig,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let result = match cli.config.clone() {
        Some(path) => match TomlConfig::from_file(&path) {
            Ok(mut config) => {
                cli.apply_overrides(&mut config);
                logger::init_logger(cli.verbose, config.json_logs());
                tracing::info!("📁 Loaded configuration from: {}", path);
                run(config).await
            }
            Err(e) => {
                logger::init_logger(cli.verbose, cli.json_logs);
                Err(e)
            }
        },
        None => {
            logger::init_logger(cli.verbose, cli.json_logs);
            run(cli.clone()).await
        }
    };

    match result {
        Ok(summary) => {
            println!(
                "✅ Imported {} ports ({} failed){}",
                summary.upserted,
                summary.failed,
                if summary.cancelled { ", stopped early" } else { "" }
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Port import failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

async fn run<C>(config: C) -> Result<ImportSummary, PortsError>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;
    tracing::info!("Starting json-ports import");

    // 建立資料庫連線並套用 schema
    let conn = connect(config.database_path())?;
    migrate(&conn)?;
    tracing::info!("🗄️  Database ready at {}", config.database_path());

    let service = PortService::new(SqlitePortRepository::new(conn));
    let shutdown = ShutdownSignal::new();
    let listener = shutdown.listen();

    let monitor = ImportMonitor::new(config.monitoring_enabled());
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }
    monitor.log_stats("Before import");

    let importer = FileImporter::with_shutdown(service, shutdown);
    let path = config.source_file().to_string();
    let summary = tokio::task::spawn_blocking(move || importer.upsert_ports(&path))
        .await
        .map_err(|e| PortsError::ProcessingError {
            message: format!("import task failed: {}", e),
        })??;

    listener.abort();
    monitor.log_stats("After import");
    monitor.log_final_stats();

    Ok(summary)
}
