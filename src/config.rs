//! Service configuration read from the environment.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DATASET_ENV: &str = "DIAGNOSIS_DATASET";
pub const ADDR_ENV: &str = "DIAGNOSIS_ADDR";
pub const PORT_ENV: &str = "DIAGNOSIS_PORT";

pub const DEFAULT_DATASET: &str = "data/disease_diagnosis.csv";
pub const DEFAULT_PORT: u16 = 5002;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// CSV dataset the model is trained from at startup
    pub dataset_path: PathBuf,
    /// Address the web form is served on
    pub listen: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            listen: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
        }
    }
}

impl Config {
    /// Reads `DIAGNOSIS_DATASET`, `DIAGNOSIS_ADDR` and `DIAGNOSIS_PORT`, falling
    /// back to the defaults for any that are unset.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(DATASET_ENV) {
            config.dataset_path = PathBuf::from(path);
        }
        if let Some(addr) = lookup(ADDR_ENV) {
            let ip: IpAddr = addr
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid {ADDR_ENV} {addr:?}: {e}"))?;
            config.listen.set_ip(ip);
        }
        if let Some(port) = lookup(PORT_ENV) {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid {PORT_ENV} {port:?}: {e}"))?;
            config.listen.set_port(port);
        }

        Ok(config)
    }
}
