pub mod db_env;
pub mod env_flag;
pub mod health;
pub mod hostname;
pub mod logging;
pub mod static_assets;
pub mod tls_config;
pub mod webhook_config;
