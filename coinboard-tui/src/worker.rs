//! Background worker thread — owns the dashboard and all network I/O.
//!
//! The main thread sends `WorkerCommand`s over an `mpsc` channel and drains
//! `WorkerResponse`s without blocking. Commands are handled one at a time, so
//! fetches never overlap.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use coinboard_core::data::Clock;
use coinboard_core::{Dashboard, DashboardView, DataError, MarketDataProvider, QueryParams};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    /// Render `params`. `force` refetches even within TTL.
    Refresh { params: QueryParams, force: bool },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    ViewReady(Box<DashboardView>),
    RefreshFailed { error: DataError },
}

/// Spawn the background worker thread.
pub fn spawn_worker<P, C>(
    dashboard: Dashboard<P, C>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> std::io::Result<JoinHandle<()>>
where
    P: MarketDataProvider + 'static,
    C: Clock + 'static,
{
    thread::Builder::new()
        .name("coinboard-worker".into())
        .spawn(move || worker_loop(dashboard, rx, tx))
}

fn worker_loop<P: MarketDataProvider, C: Clock>(
    mut dashboard: Dashboard<P, C>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) {
    info!("worker started");
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Refresh { params, force }) => {
                let response = handle_refresh(&mut dashboard, &params, force);
                if tx.send(response).is_err() {
                    // UI is gone.
                    break;
                }
            }
        }
    }
    info!("worker stopped");
}

fn handle_refresh<P: MarketDataProvider, C: Clock>(
    dashboard: &mut Dashboard<P, C>,
    params: &QueryParams,
    force: bool,
) -> WorkerResponse {
    debug!(key = %params.fetch_key(), force, "refresh requested");
    let result = if force {
        dashboard.force_refresh(params)
    } else {
        dashboard.render(params)
    };
    match result {
        Ok(view) => WorkerResponse::ViewReady(Box::new(view)),
        Err(error) => WorkerResponse::RefreshFailed { error },
    }
}
