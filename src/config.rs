use crate::{
    constants::*,
    error::{Error, Result},
};
use std::{env, str::FromStr, time::Duration};

/// Configuration for both directions of a bridge.
///
/// Built either through [`from_env`], or from [`new`] followed by the chained
/// setters below.
///
/// [`from_env`]: #method.from_env
/// [`new`]: #method.new
#[derive(Clone, Debug)]
pub struct Config {
    /// Host of the link node receiving our outbound frames.
    pub target_host: String,
    /// Port of the link node receiving our outbound frames.
    pub target_port: u16,
    /// Local address to bind for inbound link traffic.
    pub bind_host: String,
    /// Local port to bind for inbound link traffic.
    pub local_port: u16,
    /// Promotes per-batch and per-flush logs from `debug` to `info`.
    pub verbose: bool,
    /// Time between receive-side batch flushes.
    pub flush_interval: Duration,
    /// Interleaved channel count of PCM handed to the transmit pipeline.
    pub source_channels: usize,
    /// First sequence number used on transmit.
    pub initial_sequence: u32,
    /// Talkgroup written into transmitted headers.
    pub talkgroup: u32,
    /// Memory slot written into transmitted headers.
    pub memory: u32,
}

impl Config {
    pub fn new(target_host: impl Into<String>, target_port: u16, local_port: u16) -> Self {
        Self {
            target_host: target_host.into(),
            target_port,
            bind_host: "0.0.0.0".into(),
            local_port,
            verbose: false,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            source_channels: DEFAULT_SOURCE_CHANNELS,
            initial_sequence: 0,
            talkgroup: 0,
            memory: 0,
        }
    }

    /// Reads the bridge configuration from the process environment.
    ///
    /// * `DMR_TARGET`: host of the link node (required).
    /// * `DMR_TARGET_RX_PORT`: port the link node listens on (required).
    /// * `DMR_TARGET_TX_PORT`: local port the link node sends to (required).
    /// * `VERBOSE`: verbose logging when `>= 1`.
    /// * `RX_FLUSH_INTERVAL_MS`: receive batch period.
    pub fn from_env() -> Result<Self> {
        let host = required("DMR_TARGET")?;
        let mut config = Self::new(
            host,
            parsed("DMR_TARGET_RX_PORT")?,
            parsed("DMR_TARGET_TX_PORT")?,
        );

        if let Some(level) = optional::<u8>("VERBOSE")? {
            config.verbose = level >= 1;
        }

        if let Some(ms) = optional::<u64>("RX_FLUSH_INTERVAL_MS")? {
            if ms == 0 {
                return Err(Error::Config {
                    key: "RX_FLUSH_INTERVAL_MS",
                    reason: "must be greater than zero".into(),
                });
            }
            config.flush_interval = Duration::from_millis(ms);
        }

        Ok(config)
    }

    pub fn bind_host(mut self, bind_host: impl Into<String>) -> Self {
        self.bind_host = bind_host.into();
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn flush_interval(mut self, flush_interval: Duration) -> Self {
        self.flush_interval = flush_interval;
        self
    }

    pub fn source_channels(mut self, source_channels: usize) -> Self {
        self.source_channels = source_channels;
        self
    }

    pub fn initial_sequence(mut self, initial_sequence: u32) -> Self {
        self.initial_sequence = initial_sequence;
        self
    }

    pub fn talkgroup(mut self, talkgroup: u32) -> Self {
        self.talkgroup = talkgroup;
        self
    }

    pub fn memory(mut self, memory: u32) -> Self {
        self.memory = memory;
        self
    }
}

fn required(key: &'static str) -> Result<String> {
    env::var(key).map_err(|e| Error::Config {
        key,
        reason: e.to_string(),
    })
}

fn parsed<T>(key: &'static str) -> Result<T>
where
    T: FromStr,
    T::Err: ToString,
{
    required(key)?.trim().parse().map_err(|e: T::Err| Error::Config {
        key,
        reason: e.to_string(),
    })
}

fn optional<T>(key: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: ToString,
{
    match env::var(key) {
        Ok(_) => parsed(key).map(Some),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(Error::Config {
            key,
            reason: e.to_string(),
        }),
    }
}
