//! Persistence adapter: domain operations on user records mapped onto a
//! DynamoDB table, one item per record, partition key `id`.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use aws_sdk_dynamodb::{
    error::{ProvideErrorMetadata, SdkError},
    types::AttributeValue,
    Client,
};
use aws_smithy_types::error::display::DisplayErrorContext;
use axum::async_trait;
use tracing::warn;

use crate::error::StoreError;
use crate::users::codec;
use crate::users::dto::UserRecord;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Full-table scan. Fine only while the dataset stays small; a paginated
    /// variant would change the response contract and is out of scope.
    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError>;
    /// `Ok(None)` means the key is genuinely absent; store failures are `Err`.
    async fn get(&self, id: &str) -> Result<Option<UserRecord>, StoreError>;
    /// Full overwrite of any prior item at the same id.
    async fn put(&self, record: &UserRecord) -> Result<(), StoreError>;
    /// Deleting an absent id succeeds.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

const MAX_STORE_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Runs a store call, retrying transient failures with exponential backoff.
/// Retry exhaustion surfaces as [`StoreError::Unavailable`], never as an
/// empty success. Cancellation propagates through the awaited call.
async fn with_retry<T, Fut>(
    op: &'static str,
    mut call: impl FnMut() -> Fut,
) -> Result<T, StoreError>
where
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut attempt = 1;
    let mut delay = INITIAL_BACKOFF;
    loop {
        match call().await {
            Err(err) if err.is_retryable() => {
                if attempt >= MAX_STORE_ATTEMPTS {
                    return Err(StoreError::Unavailable {
                        op,
                        attempts: attempt,
                        detail: err.to_string(),
                    });
                }
                warn!(op, attempt, error = %err, "transient store failure, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
                delay *= 2;
            }
            other => return other,
        }
    }
}

fn classify<E>(op: &'static str, err: SdkError<E>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let detail = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            StoreError::Transient { op, detail }
        }
        SdkError::ServiceError(ctx) => match ctx.err().code() {
            Some(
                "ProvisionedThroughputExceededException"
                | "ThrottlingException"
                | "RequestLimitExceeded"
                | "InternalServerError"
                | "ServiceUnavailable",
            ) => StoreError::Transient { op, detail },
            _ => StoreError::Permanent { op, detail },
        },
        _ => StoreError::Permanent { op, detail },
    }
}

#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
    table: String,
}

impl DynamoStore {
    pub fn new(client: Client, table: String) -> Self {
        Self { client, table }
    }

    async fn list_once(&self) -> Result<Vec<UserRecord>, StoreError> {
        let mut records = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let page = self
                .client
                .scan()
                .table_name(&self.table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| classify("scan", e))?;
            for item in page.items.unwrap_or_default() {
                records.push(codec::decode(&item)?);
            }
            match page.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => return Ok(records),
            }
        }
    }

    async fn get_once(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let out = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| classify("get_item", e))?;
        out.item.as_ref().map(codec::decode).transpose()
    }

    async fn put_once(&self, record: &UserRecord) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(codec::encode(record)))
            .send()
            .await
            .map_err(|e| classify("put_item", e))?;
        Ok(())
    }

    async fn delete_once(&self, id: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| classify("delete_item", e))?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for DynamoStore {
    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        with_retry("scan", move || self.list_once()).await
    }

    async fn get(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        with_retry("get_item", move || self.get_once(id)).await
    }

    async fn put(&self, record: &UserRecord) -> Result<(), StoreError> {
        with_retry("put_item", move || self.put_once(record)).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        with_retry("delete_item", move || self.delete_once(id)).await
    }
}

/// In-memory store for tests, behind the same trait as [`DynamoStore`].
#[derive(Default)]
pub struct MemoryStore {
    records: std::sync::Mutex<HashMap<String, UserRecord>>,
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.get(id).cloned())
    }

    async fn put(&self, record: &UserRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn record(id: &str) -> UserRecord {
        UserRecord {
            id: id.into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            age: 30,
            weight: 65.5,
            smoker: false,
        }
    }

    #[tokio::test]
    async fn memory_store_upsert_overwrites() {
        let store = MemoryStore::default();
        store.put(&record("a")).await.unwrap();
        let mut replaced = record("a");
        replaced.age = 31;
        store.put(&replaced).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(replaced));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn memory_store_delete_is_idempotent() {
        let store = MemoryStore::default();
        store.put(&record("a")).await.unwrap();
        store.delete("a").await.unwrap();
        store.delete("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_recovers_from_transient_failures() {
        let calls = AtomicU32::new(0);
        let out = with_retry("get_item", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(StoreError::Transient {
                        op: "get_item",
                        detail: "throttled".into(),
                    })
                } else {
                    Ok(7u32)
                }
            }
        })
        .await;
        assert_eq!(out.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_exhaustion_is_reported_as_unavailable() {
        let calls = AtomicU32::new(0);
        let out: Result<(), StoreError> = with_retry("put_item", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(StoreError::Transient {
                    op: "put_item",
                    detail: "timeout".into(),
                })
            }
        })
        .await;
        assert!(matches!(
            out.unwrap_err(),
            StoreError::Unavailable { attempts: 3, .. }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_failure_is_not_retried() {
        let calls = AtomicU32::new(0);
        let out: Result<(), StoreError> = with_retry("put_item", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(StoreError::Permanent {
                    op: "put_item",
                    detail: "bad table".into(),
                })
            }
        })
        .await;
        assert!(matches!(out.unwrap_err(), StoreError::Permanent { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
