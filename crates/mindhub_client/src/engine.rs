use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use mindhub_logging::{hub_debug, hub_error};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{ApiRequest, ApiResponse, EngineEvent, FailureKind, FetchError, Ticket, Transport};

/// Cancellation scope tied to the lifetime of one view.
///
/// Dropping the scope (or calling [`ViewScope::cancel`]) cancels every
/// request submitted under it; their results never reach the event queue.
pub struct ViewScope {
    token: CancellationToken,
    _guard: DropGuard,
}

impl ViewScope {
    fn new(token: CancellationToken) -> Self {
        let guard = token.clone().drop_guard();
        Self {
            token,
            _guard: guard,
        }
    }

    /// A nested scope, cancelled with its parent or on its own.
    pub fn child(&self) -> ViewScope {
        ViewScope::new(self.token.child_token())
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

enum EngineCommand {
    Run {
        ticket: Ticket,
        requests: Vec<ApiRequest>,
        cancel: CancellationToken,
    },
    Stop,
}

/// Runs backend calls on a background tokio runtime and reports completions
/// through a channel the front end polls.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    event_rx: mpsc::Receiver<EngineEvent>,
    root: CancellationToken,
    next_ticket: AtomicU64,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl EngineHandle {
    pub fn new(transport: Arc<dyn Transport>) -> io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let worker_tx = event_tx.clone();
        let worker = thread::Builder::new()
            .name("mindhub-engine".to_string())
            .spawn(move || {
                while let Ok(EngineCommand::Run {
                    ticket,
                    requests,
                    cancel,
                }) = cmd_rx.recv()
                {
                    let transport = transport.clone();
                    let event_tx = worker_tx.clone();
                    runtime.spawn(async move {
                        run_ticket(transport.as_ref(), ticket, requests, cancel, event_tx).await;
                    });
                }
                hub_debug!("engine thread stopped");
            })?;

        Ok(Self {
            cmd_tx,
            event_tx,
            event_rx,
            root: CancellationToken::new(),
            next_ticket: AtomicU64::new(1),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Opens a scope for a new view.
    pub fn scope(&self) -> ViewScope {
        ViewScope::new(self.root.child_token())
    }

    /// Submits requests to run in order under `scope`.
    pub fn submit(&self, requests: Vec<ApiRequest>, scope: &ViewScope) -> Ticket {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let sent = self.cmd_tx.send(EngineCommand::Run {
            ticket,
            requests,
            cancel: scope.token.clone(),
        });
        if sent.is_err() {
            hub_error!("engine is not running, ticket {} rejected", ticket);
            let _ = self.event_tx.send(EngineEvent::Completed {
                ticket,
                result: Err(FetchError::new(
                    FailureKind::Network,
                    "request engine is not running",
                )),
            });
        }
        ticket
    }

    pub fn send(&self, request: ApiRequest, scope: &ViewScope) -> Ticket {
        self.submit(vec![request], scope)
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Cancels every scope handed out by this engine and stops its thread.
    /// Later submissions complete at once with a network error.
    pub fn shutdown(&self) {
        self.root.cancel();
        let _ = self.cmd_tx.send(EngineCommand::Stop);
        let worker = self.worker.lock().ok().and_then(|mut worker| worker.take());
        if let Some(worker) = worker {
            if worker.join().is_err() {
                hub_error!("engine thread panicked");
            }
        }
    }
}

async fn run_ticket(
    transport: &dyn Transport,
    ticket: Ticket,
    requests: Vec<ApiRequest>,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let result = tokio::select! {
        _ = cancel.cancelled() => None,
        result = run_in_order(transport, &requests) => Some(result),
    };
    match result {
        Some(result) if !cancel.is_cancelled() => {
            let _ = event_tx.send(EngineEvent::Completed { ticket, result });
        }
        _ => hub_debug!("ticket {} cancelled, result discarded", ticket),
    }
}

async fn run_in_order(
    transport: &dyn Transport,
    requests: &[ApiRequest],
) -> Result<ApiResponse, FetchError> {
    let mut last = None;
    for request in requests {
        last = Some(transport.send(request).await?);
    }
    last.ok_or_else(|| FetchError::new(FailureKind::InvalidUrl, "no request to send"))
}
