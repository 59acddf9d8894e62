#![warn(
    clippy::cognitive_complexity,
    clippy::missing_const_for_fn,
    clippy::option_if_let_else
)]

mod config;
mod discord;
mod errors;

use log::LevelFilter;
use log::{error, info};
use migrator::{migrate_channel, MigrationContext};
use simple_logger::SimpleLogger;
use time::UtcOffset;

use std::env;
use std::process;
use std::time::Instant;

use config::Config;
use discord::DiscordPlatform;

fn load_config() -> Config {
    let args: Vec<String> = env::args().skip(1).collect();
    match Config::from_env(&args) {
        Ok(config) => config,
        Err(why) => {
            error!("Failed to load config, exiting: {why}");
            process::exit(-1);
        }
    }
}

async fn resolve(platform: &DiscordPlatform, id: u64) -> migrator::structs::Channel {
    match platform.channel(id).await {
        Ok(channel) => channel,
        Err(why) => {
            error!("Failed to resolve channel {id}, exiting: {why}");
            process::exit(-1);
        }
    }
}

#[tokio::main]
async fn main() {
    let level = config::log_level();
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .with_module_level("migrate_bot", level)
        .with_module_level("migrator", level)
        .with_utc_offset(UtcOffset::UTC)
        .init()
        .unwrap();

    let config = load_config();
    let platform = DiscordPlatform::new(&config.token, config.page_failure_budget);

    let origin = resolve(&platform, config.source).await;
    let dest = resolve(&platform, config.destination).await;
    if !origin.accepts_migration() || origin.kind != dest.kind {
        error!(
            "Cannot migrate {} ({:?}) into {} ({:?})",
            origin.id, origin.kind, dest.id, dest.kind
        );
        process::exit(-1);
    }

    info!("migrating {} into {}", origin.name, dest.name);
    let started = Instant::now();
    let ctx = MigrationContext::new(&platform, &config.relay);
    let report = migrate_channel(&ctx, &origin, &dest).await;
    info!(
        "finished in {}: {report}",
        humantime::format_duration(started.elapsed())
    );
}
