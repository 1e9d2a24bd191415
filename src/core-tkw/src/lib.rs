pub mod automation;
pub mod common;

pub use automation::{AutomationClient, AutomationError};
pub use common::db_env::{get_database_url, get_db_pool};
pub use common::env_flag::env_flag;
pub use common::health::health_check;
pub use common::hostname::{HostPortError, get_api_base_url};
pub use common::logging::setup_logging;
pub use common::static_assets::get_static_dir;
pub use common::tls_config::{get_tls_config, is_tls_enabled};
pub use common::webhook_config::{WebhookConfig, WebhookConfigError, get_webhook_config, webhook_config};
