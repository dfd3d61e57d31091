use std::process::ExitCode;
use std::sync::Arc;
use clap::Parser;
use tracing::{error, info};
use kartbot::logging::init_logging;
use kartbot::server::{router, AppState};
use kartbot::sqlite_store::SqliteStatsStore;
use kartbot::{Config, Coordinator, KartbotError, MemoryStatsStore, StaticDirectory, StatsStore};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    init_logging(config.verbose);

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server stopped");
            eprintln!("kartbot-server: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: Config) -> Result<(), KartbotError> {
    let engine = config.engine()?;
    let teams = config.team_table()?;

    let store: Arc<dyn StatsStore> = match &config.db {
        Some(path) => Arc::new(SqliteStatsStore::open(path)?),
        None => {
            info!("no database configured, stats are kept in memory");
            Arc::new(MemoryStatsStore::new())
        }
    };

    let directory = Arc::new(StaticDirectory::new());
    let members = config.member_ids();
    if !members.is_empty() {
        directory.set_members(&config.channel, members);
    }

    let coordinator = Coordinator::new(engine, directory.clone(), Arc::new(teams), store, config.seed);
    let app = router(AppState {
        coordinator: Arc::new(coordinator),
        directory,
    });

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, "kartbot server listening");
    println!("Kartbot server listening on {}", config.bind);
    println!("\nAvailable endpoints:");
    println!("  GET  /                               - API info");
    println!("  POST /messages                       - Handle a chat message");
    println!("  PUT  /channels/{{channel}}/members     - Replace a channel roster");
    println!("  GET  /stats/{{member}}                 - Duel stats for a member");
    println!("  GET  /session                        - Current challenge session");

    axum::serve(listener, app).await?;
    Ok(())
}
