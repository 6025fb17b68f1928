//! Listens on the inbound link port and logs what a conference would hear.
//!
//! Reads the same environment (or `./.env`) as a full bridge. Useful for
//! checking that a link node reaches this host before wiring up a
//! conferencing connection.
use std::{process, sync::Arc};

use async_trait::async_trait;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use usrp_bridge::{Config, EncodedBatch, LinkReceiver, OpusFrameEncoder, PlaybackSink};

struct LogSink;

#[async_trait]
impl PlaybackSink for LogSink {
    async fn play(&self, batch: EncodedBatch) {
        info!("Batch of {} frames ({} bytes compressed).", batch.len(), batch.byte_len());
    }
}

#[tokio::main]
async fn main() {
    // A missing `.env` is fine: the variables may come from the environment.
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(why) => {
            error!("{}", why);
            process::exit(1);
        },
    };

    let encoder = match OpusFrameEncoder::new() {
        Ok(encoder) => encoder,
        Err(why) => {
            error!("{}", why);
            process::exit(1);
        },
    };

    let receiver = match LinkReceiver::bind(&config, encoder, Arc::new(LogSink)).await {
        Ok(receiver) => receiver,
        Err(why) => {
            error!("{}", why);
            process::exit(1);
        },
    };

    if let Err(why) = tokio::signal::ctrl_c().await {
        error!("Could not listen for Ctrl-C: {:?}", why);
    }

    receiver.disconnect();
    info!("Monitor stopped.");
}
