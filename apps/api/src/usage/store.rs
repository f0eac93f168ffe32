use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use redis::{AsyncCommands, Script};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::usage::{Tier, UsageRecord, UsageStore};

const KEY_PREFIX: &str = "cvsnap:usage:";

/// Adjusts `uses` by `ARGV[5]` inside Redis so the limit check and the write
/// cannot interleave with another request. A reservation over the limit
/// leaves the record untouched. Replies `{applied, record_json}`.
///
/// ARGV: free, starter and pro limits, RFC 3339 timestamp, delta (+1 or -1).
const ADJUST_USES_LUA: &str = r#"
local record = nil
local raw = redis.call('GET', KEYS[1])
if raw then
  local ok, decoded = pcall(cjson.decode, raw)
  if ok and type(decoded) == 'table' then record = decoded end
end
if not record then record = {} end

local tier = record['tier']
local limit = tonumber(ARGV[1])
if tier == 'starter' then
  limit = tonumber(ARGV[2])
elseif tier == 'pro' then
  limit = tonumber(ARGV[3])
else
  tier = 'free'
end

local uses = tonumber(record['uses']) or 0
local delta = tonumber(ARGV[5])
if delta > 0 and uses >= limit then
  record['uses'] = uses
  record['tier'] = tier
  return {0, cjson.encode(record)}
end

record['uses'] = math.max(uses + delta, 0)
record['tier'] = tier
record['updated_at'] = ARGV[4]
local encoded = cjson.encode(record)
redis.call('SET', KEYS[1], encoded)
return {1, encoded}
"#;

fn record_key(client_id: Uuid) -> String {
    format!("{KEY_PREFIX}{client_id}")
}

/// Usage records stored as JSON strings under `cvsnap:usage:{client_id}`.
#[derive(Clone)]
pub struct RedisUsageStore {
    client: redis::Client,
    adjust_uses: Script,
}

impl RedisUsageStore {
    pub fn new(client: redis::Client) -> Self {
        Self {
            client,
            adjust_uses: Script::new(ADJUST_USES_LUA),
        }
    }

    /// Runs the adjustment script; `applied` is false when a reservation was refused.
    async fn adjust_uses(
        &self,
        client_id: Uuid,
        delta: i32,
    ) -> Result<(bool, UsageRecord), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let (applied, raw): (i64, String) = self
            .adjust_uses
            .key(record_key(client_id))
            .arg(Tier::Free.limit())
            .arg(Tier::Starter.limit())
            .arg(Tier::Pro.limit())
            .arg(Utc::now().to_rfc3339())
            .arg(delta)
            .invoke_async(&mut conn)
            .await?;

        let record = serde_json::from_str(&raw).map_err(|e| AppError::Internal(e.into()))?;
        Ok((applied == 1, record))
    }
}

#[async_trait]
impl UsageStore for RedisUsageStore {
    async fn load(&self, client_id: Uuid) -> Result<UsageRecord, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(record_key(client_id)).await?;

        let Some(raw) = raw else {
            return Ok(UsageRecord::default());
        };

        // Unreadable records reset to a fresh free plan.
        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(%client_id, "Discarding unreadable usage record: {e}");
            UsageRecord::default()
        }))
    }

    async fn save(&self, client_id: Uuid, record: &UsageRecord) -> Result<(), AppError> {
        let raw = serde_json::to_string(record).map_err(|e| AppError::Internal(e.into()))?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(record_key(client_id), raw).await?;
        debug!(%client_id, uses = record.uses, tier = %record.tier, "Saved usage record");
        Ok(())
    }

    async fn try_reserve(&self, client_id: Uuid) -> Result<UsageRecord, AppError> {
        match self.adjust_uses(client_id, 1).await? {
            (true, record) => {
                debug!(%client_id, uses = record.uses, "Reserved run");
                Ok(record)
            }
            (false, record) => Err(AppError::QuotaExhausted { tier: record.tier }),
        }
    }

    async fn release(&self, client_id: Uuid) -> Result<UsageRecord, AppError> {
        let (_, record) = self.adjust_uses(client_id, -1).await?;
        debug!(%client_id, uses = record.uses, "Released run");
        Ok(record)
    }
}

/// Process-local store, used when no Redis URL is configured. Counters are
/// lost on restart.
#[derive(Default)]
pub struct MemoryUsageStore {
    records: RwLock<HashMap<Uuid, UsageRecord>>,
}

#[async_trait]
impl UsageStore for MemoryUsageStore {
    async fn load(&self, client_id: Uuid) -> Result<UsageRecord, AppError> {
        Ok(self
            .records
            .read()
            .await
            .get(&client_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, client_id: Uuid, record: &UsageRecord) -> Result<(), AppError> {
        self.records.write().await.insert(client_id, record.clone());
        Ok(())
    }

    async fn try_reserve(&self, client_id: Uuid) -> Result<UsageRecord, AppError> {
        let mut records = self.records.write().await;
        let record = records.entry(client_id).or_default();
        if !record.can_process() {
            return Err(AppError::QuotaExhausted { tier: record.tier });
        }
        record.uses += 1;
        record.touch();
        Ok(record.clone())
    }

    async fn release(&self, client_id: Uuid) -> Result<UsageRecord, AppError> {
        let mut records = self.records.write().await;
        let record = records.entry(client_id).or_default();
        record.uses = record.uses.saturating_sub(1);
        record.touch();
        Ok(record.clone())
    }
}
