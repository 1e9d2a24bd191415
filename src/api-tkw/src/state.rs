use axum::extract::FromRef;
use core_tkw::AutomationClient;
use data_model_tkw::db::DbPool;
use url::Url;

/// Shared handles every route can extract from.
///
/// Handlers that only touch the store take `State<DbPool>`; the relay takes
/// `State<AutomationClient>`; submission needs all three.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub automation: AutomationClient,
    /// Where the automation system reports results, sent along with every dispatch.
    pub callback_url: Url,
}

impl AppState {
    pub fn new(pool: DbPool, automation: AutomationClient, callback_url: Url) -> Self {
        Self {
            pool,
            automation,
            callback_url,
        }
    }
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for AutomationClient {
    fn from_ref(state: &AppState) -> Self {
        state.automation.clone()
    }
}
