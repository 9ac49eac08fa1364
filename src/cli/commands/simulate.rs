//! Implementation of the `promptgate simulate` command.
//!
//! A script is a YAML document of timed host events:
//!
//! ```yaml
//! duration_ms: 90000
//! coordinator:
//!   exit_delay_ms: 500
//! steps:
//!   - at_ms: 1200
//!     type: scroll
//!     scroll_y: 400
//!     scroll_height: 2400
//!     viewport_height: 900
//!   - at_ms: 2500
//!     type: acknowledge
//!     trigger: load
//!   - at_ms: 4000
//!     type: pointer_leave
//!     client_y: -2
//! ```
//!
//! The session runs on a paused clock, so a 90 second script finishes
//! instantly.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::{sleep_until, Instant};

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{
    ActivityKind, Config, CoordinatorConfig, CoordinatorSnapshot, HostEvent, TriggerKind,
};
use crate::domain::ports::DismissalStore;
use crate::infrastructure::storage::{store_from_config, InMemoryDismissalStore};
use crate::services::{PromptEvent, TriggerCoordinator};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Path to the session script (YAML)
    pub script: PathBuf,

    /// Use a throwaway in-memory store instead of the configured one
    #[arg(long)]
    pub ephemeral: bool,

    /// Pretend the load prompt was dismissed on an earlier visit (implies --ephemeral)
    #[arg(long)]
    pub returning_visitor: bool,
}

/// A scripted page session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionScript {
    /// Overrides for the configured coordinator thresholds
    #[serde(default)]
    pub coordinator: Option<CoordinatorConfig>,

    /// How long to keep observing after start
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,

    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

const fn default_duration_ms() -> u64 {
    120_000
}

impl SessionScript {
    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).context("Failed to parse session script")
    }
}

/// One timed step of a script.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptStep {
    /// Milliseconds after session start
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: ScriptAction,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptAction {
    Scroll {
        scroll_y: f64,
        scroll_height: f64,
        viewport_height: f64,
    },
    PointerLeave {
        client_y: f64,
    },
    Activity {
        kind: ActivityKind,
    },
    /// The visitor closes a prompt
    Acknowledge {
        trigger: TriggerKind,
    },
}

impl ScriptAction {
    fn to_host_event(&self) -> Option<HostEvent> {
        match *self {
            Self::Scroll {
                scroll_y,
                scroll_height,
                viewport_height,
            } => Some(HostEvent::scroll(scroll_y, scroll_height, viewport_height)),
            Self::PointerLeave { client_y } => Some(HostEvent::pointer_leave(client_y)),
            Self::Activity { kind } => Some(HostEvent::activity(kind)),
            Self::Acknowledge { .. } => None,
        }
    }
}

/// Outcome of a simulated session.
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub duration_ms: u64,
    pub timeline: Vec<PromptEvent>,
    pub final_state: CoordinatorSnapshot,
}

impl CommandOutput for SimulationReport {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();

        if self.timeline.is_empty() {
            lines.push(format!("No prompts within {} ms.", self.duration_ms));
        } else {
            let mut table = Table::new();
            table
                .load_preset(presets::UTF8_FULL_CONDENSED)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    Cell::new("At (ms)").add_attribute(Attribute::Bold),
                    Cell::new("Prompt").add_attribute(Attribute::Bold),
                    Cell::new("Transition").add_attribute(Attribute::Bold),
                ]);
            for event in &self.timeline {
                table.add_row(vec![
                    Cell::new(event.elapsed_ms),
                    Cell::new(event.kind.as_str()),
                    Cell::new(event.transition.as_str()),
                ]);
            }
            lines.push(table.to_string());
        }

        let visible: Vec<&str> = self
            .final_state
            .visible()
            .iter()
            .map(TriggerKind::as_str)
            .collect();
        lines.push(format!(
            "\nAfter {} ms: committed={}, load shown={}, visible=[{}]",
            self.duration_ms,
            self.final_state.committed,
            self.final_state.load_prompt_shown,
            visible.join(", ")
        ));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Drive a coordinator through `script` on the current runtime's clock.
///
/// Host events are delivered at their `at_ms` offset; the session task gets
/// to handle each one before the next step runs.
pub async fn run_script(
    script: &SessionScript,
    config: CoordinatorConfig,
    store: Arc<dyn DismissalStore>,
) -> Result<SimulationReport> {
    let coordinator = TriggerCoordinator::new(config, store);
    let mut events = coordinator.subscribe();
    coordinator
        .start()
        .context("Failed to start prompt session")?;

    let origin = Instant::now();
    let mut steps: Vec<&ScriptStep> = script.steps.iter().collect();
    steps.sort_by_key(|step| step.at_ms);

    for step in steps {
        sleep_until(origin + Duration::from_millis(step.at_ms)).await;
        match step.action {
            ScriptAction::Acknowledge { trigger } => coordinator.acknowledge(trigger),
            ref action => {
                if let Some(event) = action.to_host_event() {
                    coordinator.notify(event);
                }
            }
        }
        tokio::task::yield_now().await;
    }

    sleep_until(origin + Duration::from_millis(script.duration_ms)).await;
    let final_state = coordinator.snapshot();
    coordinator.shutdown().await;

    let mut timeline = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => timeline.push(event),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "timeline lagged; events dropped");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }

    Ok(SimulationReport {
        duration_ms: script.duration_ms,
        timeline,
        final_state,
    })
}

pub async fn execute(args: SimulateArgs, config: &Config, json_mode: bool) -> Result<()> {
    let raw = tokio::fs::read_to_string(&args.script)
        .await
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let script = SessionScript::from_yaml(&raw)?;

    let store: Arc<dyn DismissalStore> = if args.returning_visitor {
        Arc::new(InMemoryDismissalStore::seen())
    } else if args.ephemeral {
        Arc::new(InMemoryDismissalStore::new())
    } else {
        store_from_config(&config.storage)
    };
    let coordinator_config = script
        .coordinator
        .clone()
        .unwrap_or_else(|| config.coordinator.clone());

    tracing::info!(
        script = %args.script.display(),
        steps = script.steps.len(),
        duration_ms = script.duration_ms,
        "simulating prompt session"
    );

    // Virtual time: timers fire as soon as the runtime is idle.
    tokio::time::pause();
    let report = run_script(&script, coordinator_config, store).await?;
    output(&report, json_mode);
    Ok(())
}
