use crate::entities::config_entity as config;
use crate::error::AppResult;
use crate::models::{CatalogSnapshot, PrizeEntry};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::collections::HashMap;

/// Catalog size used when the `gift_count` key is absent.
pub const DEFAULT_GIFT_COUNT: i64 = 4;

/// Read-only view over the config table the catalog-editing bot flow owns.
/// Nothing is cached in-process: operators change odds, allotment and the
/// required channel without a restart.
#[derive(Clone)]
pub struct CatalogService {
    pool: DatabaseConnection,
}

impl CatalogService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Materializes the whole catalog from one SELECT, so a request never
    /// observes a half-edited configuration.
    pub async fn load(&self) -> AppResult<CatalogSnapshot> {
        let rows = config::Entity::find().all(&self.pool).await?;
        let entries: HashMap<String, String> =
            rows.into_iter().map(|m| (m.key, m.value)).collect();
        Ok(snapshot_from_entries(&entries))
    }
}

fn get_str(entries: &HashMap<String, String>, key: &str) -> Option<String> {
    entries.get(key).filter(|v| !v.is_empty()).cloned()
}

fn get_i64(entries: &HashMap<String, String>, key: &str, default: i64) -> i64 {
    entries
        .get(key)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

/// Missing or unparseable keys fall back to documented defaults: placeholder
/// name "Gift N", weight 1, empty sticker, allotment 0, no required channel.
fn snapshot_from_entries(entries: &HashMap<String, String>) -> CatalogSnapshot {
    let gift_count = get_i64(entries, "gift_count", DEFAULT_GIFT_COUNT).max(0);
    let prizes = (1..=gift_count)
        .map(|i| PrizeEntry {
            index: i as usize,
            name: get_str(entries, &format!("gift{i}_name")).unwrap_or_else(|| format!("Gift {i}")),
            weight: get_i64(entries, &format!("gift{i}_weight"), 1).max(0),
            sticker: entries
                .get(&format!("gift{i}_sticker"))
                .cloned()
                .unwrap_or_default(),
        })
        .collect();

    CatalogSnapshot {
        prizes,
        daily_free_spins: get_i64(entries, "daily_free_spins", 0).max(0),
        required_channel: entries
            .get("required_channel")
            .cloned()
            .unwrap_or_default(),
    }
}
