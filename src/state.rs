use std::sync::Arc;

use aws_config::BehaviorVersion;

use crate::config::AppConfig;
use crate::store::{DynamoStore, MemoryStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    /// Builds the shared state once at startup. The DynamoDB client is
    /// constructed here and reused for the life of the process, never per
    /// request.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let shared = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let client = aws_sdk_dynamodb::Client::new(&shared);
        let store =
            Arc::new(DynamoStore::new(client, config.table_name.clone())) as Arc<dyn UserStore>;
        Ok(Self { config, store })
    }

    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            table_name: "users-test".into(),
        });
        Self {
            config,
            store: Arc::new(MemoryStore::default()),
        }
    }
}
