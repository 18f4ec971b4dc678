use std::net::SocketAddr;

use anyhow::Context;

const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT").unwrap_or_else(|| "8080".to_string()).parse().context("PORT")?;

        let max_body_bytes: usize = match var("MAX_BODY_BYTES") {
            Some(raw) => raw.parse().context("MAX_BODY_BYTES")?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self { addr: format!("{host}:{port}").parse().context("HOST/PORT")?, max_body_bytes })
    }
}
