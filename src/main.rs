use tracing::{error, info};

use vmapp::{AdminService, Config, Database};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = vmapp::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        if let Err(e) = vmapp::logging::init_console_only(&config.logging.level) {
            eprintln!("Failed to initialize console logging: {e}");
        }
    }

    info!("VMAPP - virtual mail hosting data model");

    let db = match Database::open_with_config(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    let admin = AdminService::new(&db).with_default_quota(config.users.default_quota_mb);
    info!("Default mailbox quota: {} MB", admin.default_quota_mb());

    match admin.domain_summaries().await {
        Ok(summaries) => {
            info!("{} domain(s) configured", summaries.len());
            for summary in summaries {
                info!(
                    domain = %summary.domain,
                    enabled = summary.is_enabled,
                    users = summary.total_users,
                    enabled_users = summary.enabled_users,
                    "domain"
                );
            }
        }
        Err(e) => error!("Failed to list domains: {e}"),
    }

    db.close().await;
}
