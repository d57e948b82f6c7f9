//! Position Dashboard Binary
//!
//! Fetches the account's closed positions from OKX and prints the dashboard
//! summary, or serves it as JSON when `[server] enabled = true`.
//!
//! ## Setup
//!
//! 1. Create `config.toml`:
//!    ```toml
//!    [okx]
//!    api_key = "..."
//!    secret_key = "..."
//!    passphrase = "..."
//!    ```
//!    Secrets can come from the environment instead, e.g.
//!    `APP_OKX__SECRET_KEY`, optionally via a `.env` file.
//!
//! 2. Run:
//!    ```bash
//!    cargo run --bin position_dashboard -- config.toml
//!    ```

use log::error;

use okx_positions::DashboardRunner;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let default_config = "config.toml".to_string();
    let config_path = args.get(1).unwrap_or(&default_config);
    if !std::path::Path::new(config_path).exists() {
        eprintln!(
            "Config file '{}' not found. Please create one.",
            config_path
        );
        std::process::exit(1);
    }

    let runner = match DashboardRunner::new(config_path) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runner.run().await {
        error!("Dashboard error: {}", e);
        eprintln!("Dashboard error: {}", e);
        std::process::exit(1);
    }
}
