//! Status report for a cache data directory

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use questrelay_server::{CacheStore, FileCacheStore};
use std::path::Path;

/// Describe the schema and the entry under `key`, judged against `window`
pub async fn check_status(data_dir: &Path, key: &str, window: Duration) -> Result<String> {
    check_status_at(data_dir, key, window, Utc::now()).await
}

async fn check_status_at(
    data_dir: &Path,
    key: &str,
    window: Duration,
    now: DateTime<Utc>,
) -> Result<String> {
    if !data_dir.exists() {
        return Ok(format!(
            "Status: {:?} does not exist (run `questrelay-migrate provision`)",
            data_dir
        ));
    }

    let store = FileCacheStore::new(data_dir);

    let schema = match store.schema().await? {
        Some(marker) => format!("v{}", marker.version),
        None => "missing".to_string(),
    };

    let mut lines = vec![
        format!("Data directory: {:?}", data_dir),
        format!("Schema: {}", schema),
    ];

    match store.get(key).await? {
        Some(entry) => {
            let age = entry.age(now);
            lines.push(format!("Entry '{}': {} quest(s)", key, entry.data.len()));
            lines.push(format!("Updated at: {}", entry.updated_at.to_rfc3339()));
            lines.push(format!(
                "Age: {}m {}s ({})",
                age.num_minutes(),
                age.num_seconds() % 60,
                if entry.is_fresh(now, window) {
                    "fresh"
                } else {
                    "stale"
                }
            ));
        }
        None => lines.push(format!("Entry '{}': none", key)),
    }

    Ok(lines.join("\n"))
}
