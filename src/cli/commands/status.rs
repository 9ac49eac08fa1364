//! Implementation of the `promptgate status` command.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::StorageConfig;
use crate::infrastructure::storage::JsonFileDismissalStore;

#[derive(Args, Debug, Default)]
pub struct StatusArgs {}

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub storage_enabled: bool,
    pub path: String,
    pub has_seen_load_popup: bool,
    pub recorded_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        if !self.storage_enabled {
            return "Storage disabled: the load prompt shows on every visit.".to_string();
        }

        let mut lines = vec![format!("Store: {}", self.path)];
        if let Some(ref err) = self.error {
            lines.push(format!("Unreadable ({err}); sessions treat the load prompt as unseen."));
            return lines.join("\n");
        }
        if self.has_seen_load_popup {
            let when = self
                .recorded_at
                .map_or_else(|| "unknown time".to_string(), |t| t.to_rfc3339());
            lines.push(format!("Load prompt dismissed at {when}; it will not show again."));
        } else {
            lines.push("Load prompt not dismissed yet.".to_string());
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Inspect the dismissal store described by `storage`.
pub fn inspect(storage: &StorageConfig) -> StatusOutput {
    let mut status = StatusOutput {
        storage_enabled: storage.enabled,
        path: storage.path.clone(),
        has_seen_load_popup: false,
        recorded_at: None,
        error: None,
    };
    if !storage.enabled {
        return status;
    }

    match JsonFileDismissalStore::new(&storage.path).load_record() {
        Ok(Some(record)) => {
            status.has_seen_load_popup = record.has_seen_load_popup;
            status.recorded_at = record.recorded_at;
        }
        Ok(None) => {}
        Err(err) => status.error = Some(err.to_string()),
    }
    status
}

pub async fn execute(_args: StatusArgs, storage: &StorageConfig, json_mode: bool) -> Result<()> {
    let status = inspect(storage);
    output(&status, json_mode);
    Ok(())
}
