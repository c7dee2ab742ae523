//! Comanda Server - restaurant point-of-sale core
//!
//! Single-process HTTP service covering the three pillars of floor
//! operation:
//!
//! - **Tables** (`api::tables`): dining table registry, checkout request
//!   and settlement
//! - **Order items** (`api::order_items`): per-item fulfillment lifecycle
//! - **Registers** (`api::registers`): cash session ledger with counted
//!   open/close balances
//!
//! # Module structure
//!
//! ```text
//! comanda-server/src/
//! ├── core/          # configuration, shared state, server loop
//! ├── auth/          # identity extraction (headers, upstream-delegated)
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # pool setup, migrations, repositories
//! ├── lifecycle/     # item transition rules, table status derivation
//! ├── money/         # decimal arithmetic for totals and balances
//! └── utils/         # errors, validation, time, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod lifecycle;
pub mod money;
pub mod utils;

pub use auth::CurrentUser;
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Load the environment, prepare the working directory and start logging.
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    if config.is_production() {
        init_logger_with_file(Some(&config.log_level), log_dir.to_str());
    } else {
        init_logger_with_file(Some(&config.log_level), None);
    }

    Ok(config)
}
