//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels;
//! the refresh driver decides when the next request goes out.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, warn};

use coinboard_core::refresh::{RefreshDriver, TickDecision};
use coinboard_core::{DashboardView, DataError, Freshness, QueryParams};

use crate::worker::{WorkerCommand, WorkerResponse};

const ERROR_HISTORY_CAP: usize = 50;

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    /// Short label: `network`, `parse`, or `ui`.
    pub category: &'static str,
    pub message: String,
    pub context: String,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    ErrorHistory,
    /// Editing the name filter. Holds the filter to restore on Esc.
    Filter { original: String },
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,

    /// Controls as the user has set them.
    pub params: QueryParams,
    /// Last view the worker produced, possibly for older params.
    pub view: Option<DashboardView>,
    /// Most recent failure with nothing to show for it (cold start).
    pub last_error: Option<DataError>,

    pub driver: RefreshDriver,
    /// Next request should bypass the TTL.
    pub force_network: bool,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
    pub filter_input: String,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        params: QueryParams,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            running: true,
            params,
            view: None,
            last_error: None,
            driver: RefreshDriver::new(refresh_interval),
            force_network: false,
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            filter_input: String::new(),
        }
    }

    /// Consult the driver and send a refresh if one is due.
    ///
    /// Returns whether a request went out.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        match self.driver.poll(now) {
            TickDecision::Due => {
                let force = std::mem::take(&mut self.force_network);
                let cmd = WorkerCommand::Refresh {
                    params: self.params.clone(),
                    force,
                };
                if self.worker_tx.send(cmd).is_err() {
                    self.push_error("ui", "background worker stopped".into(), String::new());
                    self.running = false;
                    return false;
                }
                self.driver.begin(now);
                true
            }
            TickDecision::SkipInFlight | TickDecision::Wait(_) => false,
        }
    }

    /// Apply one worker response.
    pub fn handle_response(&mut self, resp: WorkerResponse) {
        self.driver.complete();
        match resp {
            WorkerResponse::ViewReady(view) => {
                let updated = view
                    .fetched_at
                    .with_timezone(&chrono::Local)
                    .format("%H:%M:%S")
                    .to_string();
                match &view.freshness {
                    Freshness::Stale { error } => {
                        self.record_error(error, format!("{}; showing data from {updated}", view.params.fetch_key()));
                        self.set_warning(format!("Refresh failed ({error}); showing data from {updated}"));
                    }
                    _ => {
                        self.set_status(format!(
                            "Showing {} of {} | updated {updated}",
                            view.entries.len(),
                            view.fetched_count
                        ));
                    }
                }
                self.last_error = None;
                self.view = Some(*view);
            }
            WorkerResponse::RefreshFailed { error } => {
                warn!(%error, "refresh failed with nothing cached");
                self.record_error(&error, format!("{} (nothing cached)", self.params.fetch_key()));
                self.last_error = Some(error);
            }
        }
    }

    /// The view to draw for the current controls.
    ///
    /// A view fetched for other fetch parameters is kept on screen while the
    /// new request is pending, but not once that request has failed.
    pub fn shown_view(&self) -> Option<&DashboardView> {
        let view = self.view.as_ref()?;
        if self.last_error.is_some() && view.params.fetch_key() != self.params.fetch_key() {
            return None;
        }
        Some(view)
    }

    /// Controls changed: re-render on the next tick.
    pub fn controls_changed(&mut self) {
        debug!(params = ?self.params, "controls changed");
        self.driver.force();
    }

    pub fn cycle_currency(&mut self) {
        self.params.currency = self.params.currency.next();
        self.controls_changed();
    }

    pub fn cycle_sort(&mut self) {
        self.params.sort_field = self.params.sort_field.next();
        self.controls_changed();
    }

    /// Step the result count, staying within bounds.
    pub fn adjust_count(&mut self, delta: i32) {
        let wanted = (self.params.count as i64 + delta as i64).max(0) as u32;
        let before = self.params.count;
        self.params = self.params.clone().with_count_clamped(wanted);
        if self.params.count != before {
            self.controls_changed();
        }
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.params.filter = filter.into();
        self.controls_changed();
    }

    /// Refetch now, ignoring the TTL.
    pub fn force_refresh(&mut self) {
        self.force_network = true;
        self.driver.force();
        self.set_status("Refreshing...");
    }

    fn record_error(&mut self, error: &DataError, context: String) {
        self.push_error(error.category(), error.to_string(), context);
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: &'static str, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
