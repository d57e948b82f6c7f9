use std::path::Path;
use std::sync::Arc;

use log::info;

use crate::client::{PositionClient, PositionSource};
use crate::config::Settings;
use crate::dashboard::{start_server, DashboardView};
use crate::errors::{Error, Result};

/// Loads settings once and drives a single dashboard session
pub struct DashboardRunner {
    config: Settings,
}

impl DashboardRunner {
    /// Create a new runner from a configuration file
    pub fn new(config_path: impl AsRef<Path>) -> Result<Self> {
        let path = config_path.as_ref();
        let path = path
            .to_str()
            .ok_or_else(|| Error::Config(format!("Config path is not UTF-8: {}", path.display())))?;
        let config = Settings::new(path)?;
        Ok(Self::from_settings(config))
    }

    pub fn from_settings(config: Settings) -> Self {
        Self { config }
    }

    pub fn settings(&self) -> &Settings {
        &self.config
    }

    /// Run the dashboard
    ///
    /// With the server enabled this serves the JSON API until shut down;
    /// otherwise it fetches one page and prints it.
    pub async fn run(self) -> Result<()> {
        // 1. Setup Logging
        if std::env::var("RUST_LOG").is_err() {
            std::env::set_var("RUST_LOG", &self.config.log.level);
        }
        env_logger::try_init().ok();

        info!("Starting DashboardRunner...");

        // 2. Setup Client
        let client = PositionClient::new(self.config.okx.clone())?;
        info!("Using OKX endpoint {}", client.base_url());

        let query = self.config.query.to_query();

        // 3. Serve or print once
        if self.config.server.enabled {
            let source: Arc<dyn PositionSource> = Arc::new(client);
            start_server(source, query, &self.config.server.host, self.config.server.port).await
        } else {
            info!("Fetching position history ({})...", query.request_path());
            let positions = client.positions_history(&query).await?;
            info!("Received {} positions", positions.len());

            let view = DashboardView::from_positions(&positions);
            println!("{}", view.render_text());
            Ok(())
        }
    }
}
