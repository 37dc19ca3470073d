use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::{CountPolicy, RouteDispatcher};
use crate::observability::Metrics;
use crate::sections::SectionRegistry;
use crate::upstream::UpstreamClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<SectionRegistry>,
    pub dispatcher: RouteDispatcher,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        config: Config,
        registry: Arc<SectionRegistry>,
        upstream: Arc<dyn UpstreamClient>,
    ) -> Self {
        let counts = CountPolicy::from(&config.upstream);
        Self {
            dispatcher: RouteDispatcher::new(registry.clone(), upstream, counts),
            config: Arc::new(config),
            registry,
            metrics: Arc::new(Metrics::new()),
        }
    }
}
