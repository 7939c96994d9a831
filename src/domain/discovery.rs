//! # Coordinator endpoint discovery.
//!
//! A [`DiscoveryOption`] produces candidate coordinator endpoints; the
//! reconnect loop walks the configured options in order and tries every
//! candidate each yields. [`StaticDiscovery`] covers the common case of a
//! fixed address list; DNS or multicast discovery plug in behind the same
//! trait.

use async_trait::async_trait;

use crate::domain::channel::CoordinatorEndpoint;
use crate::error::DiscoveryError;

/// One source of candidate coordinator endpoints.
#[async_trait]
pub trait DiscoveryOption: Send + Sync {
    /// Resolves the current candidate endpoints, best first.
    async fn discover(&self) -> Result<Vec<CoordinatorEndpoint>, DiscoveryError>;

    /// Returns the option name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Fixed list of configured endpoints.
pub struct StaticDiscovery {
    endpoints: Vec<CoordinatorEndpoint>,
}

impl StaticDiscovery {
    /// Creates a discovery option over a fixed endpoint list.
    pub fn new(endpoints: Vec<CoordinatorEndpoint>) -> Self {
        Self { endpoints }
    }
}

#[async_trait]
impl DiscoveryOption for StaticDiscovery {
    async fn discover(&self) -> Result<Vec<CoordinatorEndpoint>, DiscoveryError> {
        if self.endpoints.is_empty() {
            return Err(DiscoveryError::NoEndpoints);
        }
        Ok(self.endpoints.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_discovery_yields_configured_order() {
        let discovery = StaticDiscovery::new(vec![
            CoordinatorEndpoint::new("remote", "primary", 9999),
            CoordinatorEndpoint::new("remote", "backup", 9999),
        ]);
        let endpoints = discovery.discover().await.unwrap();
        assert_eq!(endpoints[0].host, "primary");
        assert_eq!(endpoints[1].host, "backup");
    }

    #[tokio::test]
    async fn empty_static_discovery_is_an_error() {
        let discovery = StaticDiscovery::new(Vec::new());
        assert!(matches!(
            discovery.discover().await,
            Err(DiscoveryError::NoEndpoints)
        ));
    }
}
