use std::sync::Arc;

use crackmes_content::{ContentService, RepairMode};
use crackmes_core::storage::StorageConfig;
use crackmes_db::{PgStore, PoolSettings};
use crackmes_worker::config::WorkerConfig;
use crackmes_worker::{audit, repair};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = WorkerConfig::from_env();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "crackmes_worker=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Storage and database ---
    let storage = StorageConfig::from_env()
        .resolve()
        .expect("Failed to prepare artifact storage roots");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = crackmes_db::create_pool(&database_url, &PoolSettings::from_env())
        .await
        .expect("Failed to connect to database");
    crackmes_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database connection pool created");

    let content = ContentService::new(Arc::new(PgStore::new(pool)), Arc::new(storage));

    if config.audit_artifacts {
        if let Err(e) = audit::run(&content).await {
            tracing::error!(error = %e, "Artifact audit failed");
        }
    }

    let mode = if config.dry_run {
        RepairMode::DryRun
    } else {
        RepairMode::Apply
    };

    match config.repair_interval {
        None => match repair::run_once(&content, mode).await {
            Err(e) => {
                tracing::error!(error = %e, "Counter repair failed");
                std::process::exit(1);
            }
            // A dry run that finds drift exits non-zero so it can gate a
            // scheduled apply.
            Ok(report) if mode == RepairMode::DryRun && report.drifted > 0 => {
                tracing::warn!(
                    drifted = report.drifted,
                    "Drift found, rerun without REPAIR_DRY_RUN to fix"
                );
                std::process::exit(1);
            }
            Ok(_) => {}
        },
        Some(every) => {
            let cancel = CancellationToken::new();
            let handle = tokio::spawn(repair::run(content, every, mode, cancel.clone()));

            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            }
            cancel.cancel();
            let _ = handle.await;
        }
    }

    tracing::info!("Worker finished");
}
