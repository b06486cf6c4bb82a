use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// DynamoDB table holding one item per user record, keyed by `id`.
    pub table_name: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let table_name = std::env::var("DDB_TABLE_NAME").context("DDB_TABLE_NAME is not set")?;
        if table_name.trim().is_empty() {
            anyhow::bail!("DDB_TABLE_NAME is empty");
        }
        Ok(Self { table_name })
    }
}
