/// API Context - shared state for all API handlers
use mailrelay_core::services::{LettreConnector, TransportConnector};
use mailrelay_core::{DispatchPipeline, RelayConfig};
use std::sync::Arc;

/// Built once at startup and shared read-only by every request
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<RelayConfig>,
    pub pipeline: Arc<DispatchPipeline>,
}

impl ApiContext {
    pub fn new(config: RelayConfig, connector: Arc<dyn TransportConnector>) -> Arc<Self> {
        let pipeline = DispatchPipeline::new(&config, connector);
        Arc::new(Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        })
    }

    /// Context that relays through real SMTP servers
    pub fn with_smtp(config: RelayConfig) -> Arc<Self> {
        Self::new(config, Arc::new(LettreConnector))
    }
}
