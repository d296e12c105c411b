use std::net::SocketAddr;

use anyhow::{Context, Result};

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Handler configuration, read from the environment at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Bucket the synthesized audio is uploaded to (`BUCKET_NAME`)
    pub bucket_name: String,
    /// `AWS_REGION`, defaulting to us-east-1
    pub region: String,
    /// Named AWS profile (`AWS_PROFILE`), if any
    pub profile: Option<String>,
    /// Listen address (`VOXORA_HANDLER_ADDR`)
    pub addr: SocketAddr,
}

impl HandlerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bucket_name = get("BUCKET_NAME").context("BUCKET_NAME must be set")?;
        let region = get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
        let profile = get("AWS_PROFILE");
        let addr = get("VOXORA_HANDLER_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse()
            .context("VOXORA_HANDLER_ADDR is not a valid socket address")?;

        Ok(Self {
            bucket_name,
            region,
            profile,
            addr,
        })
    }
}
