//! Usage quota: how many tailoring runs a client has left on its plan.
//!
//! Clients identify themselves with an `X-Client-Id` UUID header. Records are
//! kept by a pluggable [`UsageStore`]; `AppState` holds an `Arc<dyn UsageStore>`.

pub mod handlers;
pub mod store;

use std::fmt;

use async_trait::async_trait;
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

pub use store::{MemoryUsageStore, RedisUsageStore};

pub const CLIENT_ID_HEADER: &str = "x-client-id";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Starter,
    Pro,
}

impl Tier {
    /// Tailoring runs allowed before the client must buy a plan.
    pub fn limit(self) -> u32 {
        match self {
            Tier::Free => 2,
            Tier::Starter => 10,
            Tier::Pro => 50,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Free => f.write_str("free"),
            Tier::Starter => f.write_str("starter"),
            Tier::Pro => f.write_str("pro"),
        }
    }
}

/// Persisted per-client counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub uses: u32,
    pub tier: Tier,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UsageRecord {
    pub fn remaining(&self) -> u32 {
        self.tier.limit().saturating_sub(self.uses)
    }

    pub fn can_process(&self) -> bool {
        self.remaining() > 0
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

/// What the API reports back to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub tier: Tier,
    pub uses: u32,
    pub limit: u32,
    pub remaining: u32,
}

impl From<&UsageRecord> for UsageSnapshot {
    fn from(record: &UsageRecord) -> Self {
        Self {
            tier: record.tier,
            uses: record.uses,
            limit: record.tier.limit(),
            remaining: record.remaining(),
        }
    }
}

/// Storage backend for usage records. Unknown clients start on a fresh free record.
///
/// `try_reserve` and `release` must be atomic per client: the check against the
/// tier limit and the counter update happen under one lock or one server-side
/// script, so concurrent runs can never exceed the plan.
#[async_trait]
pub trait UsageStore: Send + Sync {
    async fn load(&self, client_id: Uuid) -> Result<UsageRecord, AppError>;

    async fn save(&self, client_id: Uuid, record: &UsageRecord) -> Result<(), AppError>;

    /// Charges one run up front. Fails with `QuotaExhausted` when none are left.
    async fn try_reserve(&self, client_id: Uuid) -> Result<UsageRecord, AppError>;

    /// Refunds a run taken by `try_reserve` whose tailoring did not complete.
    async fn release(&self, client_id: Uuid) -> Result<UsageRecord, AppError>;

    /// Switches the client to a paid tier and resets its counter.
    async fn apply_purchase(&self, client_id: Uuid, tier: Tier) -> Result<UsageRecord, AppError> {
        if tier == Tier::Free {
            return Err(AppError::Validation(
                "Only 'starter' or 'pro' can be purchased".to_string(),
            ));
        }
        let mut record = self.load(client_id).await?;
        record.tier = tier;
        record.uses = 0;
        record.touch();
        self.save(client_id, &record).await?;
        Ok(record)
    }
}

/// Reads and validates the `X-Client-Id` header.
pub fn client_id_from_headers(headers: &HeaderMap) -> Result<Uuid, AppError> {
    let raw = headers
        .get(CLIENT_ID_HEADER)
        .ok_or_else(|| AppError::Validation("Missing X-Client-Id header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Validation("X-Client-Id must be ASCII".to_string()))?;

    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::Validation("X-Client-Id must be a UUID".to_string()))
}
