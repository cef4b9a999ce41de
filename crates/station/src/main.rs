// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use station::client::receive_rooms;
use station::config::Config;
use station::room::RoomSource;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    if let Err(e) = config.validate() {
        eprintln!("error: {e}");
        std::process::exit(2);
    }

    init_tracing(&config);

    if let Err(e) = run(config).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    match config.log_format.as_str() {
        "json" => {
            fmt::fmt().with_env_filter(filter).json().init();
        }
        _ => {
            fmt::fmt().with_env_filter(filter).init();
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    // Ctrl-C cancels the feed; the client tears the connection down and
    // receive_rooms returns Ok.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, disconnecting");
                cancel.cancel();
            }
        });
    }

    info!(endpoint = %config.endpoint, "connecting to room feed");
    receive_rooms(config.feed_config(), cancel, |rooms| {
        for room in rooms {
            let source = match &room.source {
                RoomSource::Qq(name) => name.as_str(),
                RoomSource::Website(name) => name.as_str(),
                RoomSource::Unknown => "unknown",
            };
            println!(
                "{} {:8} {:?} [{}] {}",
                room.date_created.format("%H:%M:%S"),
                room.number,
                room.room_type,
                source,
                room.message,
            );
        }
    })
    .await?;

    info!("feed finished");
    Ok(())
}
