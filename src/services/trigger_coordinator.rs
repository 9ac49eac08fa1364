//! Engagement prompt trigger coordinator.
//!
//! Observes four independent signal sources and decides which prompt, if
//! any, the page should show:
//!
//! - **Load**: fixed delay after `start()`, suppressed when the visitor
//!   dismissed it on an earlier visit.
//! - **Scroll**: scroll depth reaching the configured percentage.
//! - **Exit**: pointer leaving across the top edge, confirmed after a grace
//!   period.
//! - **Inactivity**: no pointer, key, scroll or touch activity for the
//!   configured timeout.
//!
//! Scroll, Exit and Inactivity compete for a single engagement slot per
//! session; Load is independent of it.
//!
//! `start()` spawns one session task that owns every timer and handles every
//! host signal in order, so observer callbacks never interleave. The
//! presentation layer reads visibility and acknowledges prompts from any
//! thread; that state sits behind a mutex. `shutdown()` ends the session task
//! and with it every pending timer.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::errors::{CoordinatorError, CoordinatorResult};
use crate::domain::models::{
    ActivityKind, CoordinatorConfig, CoordinatorSnapshot, CoordinatorState, FireOutcome,
    HostEvent, ScrollPosition, TriggerKind, LOAD_PROMPT_DELAY,
};
use crate::domain::ports::DismissalStore;
use crate::services::persisted_dismissal::PersistedDismissal;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// What happened to a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptTransition {
    /// The prompt became visible.
    Shown,
    /// The visitor closed the prompt.
    Dismissed,
    /// A pending confirmation was dropped before it could show.
    Abandoned,
}

impl PromptTransition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shown => "shown",
            Self::Dismissed => "dismissed",
            Self::Abandoned => "abandoned",
        }
    }
}

/// Notification published to subscribers on every visibility change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEvent {
    pub kind: TriggerKind,
    pub transition: PromptTransition,
    /// Milliseconds since the session started.
    pub elapsed_ms: u64,
}

/// State shared between the coordinator handle and its session task.
struct Shared {
    state: Mutex<CoordinatorState>,
    events: broadcast::Sender<PromptEvent>,
    started_at: OnceLock<Instant>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, CoordinatorState> {
        // Every critical section leaves the state consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, kind: TriggerKind, transition: PromptTransition) {
        let elapsed_ms = self.started_at.get().map_or(0, |start| {
            u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
        });
        // No subscribers is fine.
        let _ = self.events.send(PromptEvent {
            kind,
            transition,
            elapsed_ms,
        });
    }
}

struct SessionHandle {
    signals: mpsc::UnboundedSender<HostEvent>,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

enum Lifecycle {
    Idle,
    Running(SessionHandle),
    Ended,
}

/// Coordinates the four engagement triggers for one page session.
pub struct TriggerCoordinator {
    config: CoordinatorConfig,
    dismissal: PersistedDismissal,
    shared: Arc<Shared>,
    lifecycle: Mutex<Lifecycle>,
}

impl TriggerCoordinator {
    /// Create a coordinator. Nothing is observed until `start()`.
    pub fn new(config: CoordinatorConfig, store: Arc<dyn DismissalStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            dismissal: PersistedDismissal::new(store),
            shared: Arc::new(Shared {
                state: Mutex::new(CoordinatorState::new()),
                events,
                started_at: OnceLock::new(),
            }),
            lifecycle: Mutex::new(Lifecycle::Idle),
        }
    }

    /// Create with default thresholds.
    pub fn with_defaults(store: Arc<dyn DismissalStore>) -> Self {
        Self::new(CoordinatorConfig::default(), store)
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Begin observing.
    ///
    /// Reads the persisted dismissal once, arms the load timer (unless the
    /// load prompt was already dismissed) and the inactivity timer, and starts
    /// accepting host signals. Calling again while running is a no-op; a
    /// coordinator that has been shut down cannot be restarted.
    pub fn start(&self) -> CoordinatorResult<()> {
        let mut lifecycle = self.lifecycle();
        match *lifecycle {
            Lifecycle::Running(_) => {
                tracing::debug!("prompt session already running");
                return Ok(());
            }
            Lifecycle::Ended => return Err(CoordinatorError::SessionEnded),
            Lifecycle::Idle => {}
        }

        let runtime = Handle::try_current().map_err(|_| CoordinatorError::NoRuntime)?;

        let started_at = Instant::now();
        let _ = self.shared.started_at.set(started_at);

        let load_armed = !self.dismissal.has_seen_load_prompt();
        if !load_armed {
            self.shared.state().suppress(TriggerKind::Load);
        }

        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let session = SessionLoop {
            config: self.config.clone(),
            shared: Arc::clone(&self.shared),
            signals: signal_rx,
            shutdown: shutdown_rx,
            load_deadline: load_armed.then(|| started_at + LOAD_PROMPT_DELAY),
            idle_deadline: Some(started_at + self.config.inactivity_timeout()),
            exit_deadline: None,
        };

        let session_id = Uuid::new_v4();
        let span = tracing::info_span!("prompt_session", %session_id);
        let task = runtime.spawn(session.run(load_armed).instrument(span));

        *lifecycle = Lifecycle::Running(SessionHandle {
            signals: signal_tx,
            shutdown: shutdown_tx,
            task,
        });
        Ok(())
    }

    /// Whether a session task is currently observing.
    pub fn is_running(&self) -> bool {
        matches!(*self.lifecycle(), Lifecycle::Running(_))
    }

    /// Deliver a host event to the session. Dropped when not running.
    pub fn notify(&self, event: HostEvent) {
        let lifecycle = self.lifecycle();
        match &*lifecycle {
            Lifecycle::Running(handle) => {
                if handle.signals.send(event).is_err() {
                    tracing::debug!(?event, "prompt session gone; host event dropped");
                }
            }
            Lifecycle::Idle | Lifecycle::Ended => {
                tracing::trace!(?event, "prompt session not running; host event dropped");
            }
        }
    }

    pub fn scroll(&self, scroll_y: f64, scroll_height: f64, viewport_height: f64) {
        self.notify(HostEvent::scroll(scroll_y, scroll_height, viewport_height));
    }

    pub fn pointer_leave(&self, client_y: f64) {
        self.notify(HostEvent::pointer_leave(client_y));
    }

    pub fn activity(&self, kind: ActivityKind) {
        self.notify(HostEvent::activity(kind));
    }

    /// The visitor closed the prompt for `kind`.
    ///
    /// Hides only that prompt and never releases the engagement slot.
    /// Acknowledging Load always persists the dismissal.
    pub fn acknowledge(&self, kind: TriggerKind) {
        let changed = self.shared.state().acknowledge(kind);
        if changed {
            tracing::info!(trigger = %kind, "prompt dismissed");
            self.shared.emit(kind, PromptTransition::Dismissed);
        }
        if kind == TriggerKind::Load {
            self.dismissal.record_load_dismissed();
        }
    }

    pub fn is_visible(&self, kind: TriggerKind) -> bool {
        self.shared.state().is_visible(kind)
    }

    /// Whether a behavioral trigger has claimed the engagement slot.
    pub fn is_committed(&self) -> bool {
        self.shared.state().is_committed()
    }

    pub fn snapshot(&self) -> CoordinatorSnapshot {
        self.shared.state().snapshot()
    }

    /// Subscribe to visibility changes from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PromptEvent> {
        self.shared.events.subscribe()
    }

    /// Tear the session down and wait for it to finish.
    ///
    /// Cancels the load, inactivity and exit timers; no prompt becomes
    /// visible afterwards. Visible prompts stay visible until acknowledged.
    pub async fn shutdown(&self) {
        let handle = {
            let mut lifecycle = self.lifecycle();
            match std::mem::replace(&mut *lifecycle, Lifecycle::Ended) {
                Lifecycle::Running(handle) => handle,
                Lifecycle::Idle | Lifecycle::Ended => return,
            }
        };

        let _ = handle.shutdown.send(());
        drop(handle.signals);
        if let Err(err) = handle.task.await {
            if !err.is_cancelled() {
                tracing::warn!(error = %err, "prompt session task failed");
            }
        }
    }
}

impl Drop for TriggerCoordinator {
    fn drop(&mut self) {
        let lifecycle = self
            .lifecycle
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Lifecycle::Running(handle) = std::mem::replace(lifecycle, Lifecycle::Ended) {
            handle.task.abort();
        }
    }
}

impl std::fmt::Debug for TriggerCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerCoordinator")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .field("state", &self.snapshot())
            .finish()
    }
}

/// Session task: owns the timers and runs every observer callback.
struct SessionLoop {
    config: CoordinatorConfig,
    shared: Arc<Shared>,
    signals: mpsc::UnboundedReceiver<HostEvent>,
    shutdown: oneshot::Receiver<()>,
    load_deadline: Option<Instant>,
    idle_deadline: Option<Instant>,
    exit_deadline: Option<Instant>,
}

impl SessionLoop {
    async fn run(mut self, load_armed: bool) {
        tracing::info!(
            load_armed,
            scroll_threshold_percent = self.config.scroll_threshold_percent,
            inactivity_timeout_ms = self.config.inactivity_timeout_ms,
            exit_delay_ms = self.config.exit_delay_ms,
            "prompt session started"
        );

        loop {
            tokio::select! {
                biased;

                _ = &mut self.shutdown => break,

                signal = self.signals.recv() => match signal {
                    Some(event) => self.handle_event(event),
                    None => break,
                },

                () = sleep_until_opt(self.load_deadline) => self.on_load_elapsed(),

                () = sleep_until_opt(self.exit_deadline) => self.on_exit_confirmed(),

                () = sleep_until_opt(self.idle_deadline) => self.on_activity_idle(),
            }
        }

        self.teardown();
    }

    fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Scroll(position) => self.on_scroll(position),
            HostEvent::PointerLeave { .. } if event.is_exit_intent() => {
                self.on_pointer_leave_top();
            }
            HostEvent::PointerLeave { client_y } => {
                tracing::trace!(client_y, "pointer left below the top edge; ignored");
            }
            HostEvent::Activity { .. } => {}
        }

        if let Some(kind) = event.activity_kind() {
            self.on_activity(kind);
        }
    }

    fn on_load_elapsed(&mut self) {
        self.load_deadline = None;
        if self.shared.state().show_load() {
            tracing::info!(trigger = %TriggerKind::Load, "engagement prompt shown");
            self.shared.emit(TriggerKind::Load, PromptTransition::Shown);
        }
    }

    fn on_scroll(&mut self, position: ScrollPosition) {
        if self.shared.state().is_committed() {
            return;
        }
        let Some(ratio) = position.ratio_percent() else {
            tracing::trace!(?position, "page does not scroll; scroll ignored");
            return;
        };
        if ratio >= self.config.scroll_threshold_percent {
            tracing::debug!(ratio, "scroll threshold reached");
            self.fire(TriggerKind::Scroll);
        }
    }

    fn on_pointer_leave_top(&mut self) {
        if self.shared.state().begin_exit_confirmation() {
            tracing::debug!(exit_delay_ms = self.config.exit_delay_ms, "exit intent detected");
            self.exit_deadline = Some(Instant::now() + self.config.exit_delay());
        } else {
            tracing::debug!("exit intent ignored; slot taken or confirmation running");
        }
    }

    fn on_exit_confirmed(&mut self) {
        self.exit_deadline = None;
        self.fire(TriggerKind::Exit);
    }

    fn on_activity(&mut self, kind: ActivityKind) {
        if self.shared.state().is_committed() {
            self.idle_deadline = None;
            return;
        }
        tracing::trace!(activity = kind.as_str(), "idle countdown reset");
        self.idle_deadline = Some(Instant::now() + self.config.inactivity_timeout());
    }

    fn on_activity_idle(&mut self) {
        self.idle_deadline = None;
        self.fire(TriggerKind::Inactivity);
    }

    fn fire(&mut self, kind: TriggerKind) {
        let outcome = self.shared.state().fire_behavioral(kind);
        match outcome {
            FireOutcome::Fired { abandoned } => {
                tracing::info!(trigger = %kind, "engagement prompt shown");
                self.shared.emit(kind, PromptTransition::Shown);
                if let Some(lost) = abandoned {
                    tracing::debug!(trigger = %lost, winner = %kind, "pending confirmation abandoned");
                    self.shared.emit(lost, PromptTransition::Abandoned);
                }
                // Committed: nothing left to rearm.
                self.idle_deadline = None;
                self.exit_deadline = None;
            }
            FireOutcome::Ignored => {
                tracing::debug!(trigger = %kind, "engagement slot already taken; trigger ignored");
            }
        }
    }

    fn teardown(&mut self) {
        let abandoned = self.shared.state().abandon_pending();
        if let Some(kind) = abandoned {
            tracing::debug!(trigger = %kind, "pending confirmation cancelled by teardown");
            self.shared.emit(kind, PromptTransition::Abandoned);
        }
        tracing::info!("prompt session ended");
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
