//! Shutdown coordination
//!
//! Signal handlers turn SIGINT/SIGTERM/SIGHUP/SIGQUIT (or Ctrl-C elsewhere)
//! into a broadcast and, optionally, into cancellation of a [`CancelToken`]
//! so in-flight store calls stop promptly. A second signal exits at once.

use crate::core::context::CancelToken;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Coordinates graceful shutdown across the application
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
    shutdown_requested: Arc<AtomicBool>,
    cancel: CancelToken,
}

impl ShutdownCoordinator {
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(8);
        let coordinator = Self {
            shutdown_tx,
            shutdown_requested: Arc::new(AtomicBool::new(false)),
            cancel: CancelToken::new(),
        };
        (coordinator, shutdown_rx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Token cancelled when shutdown is triggered
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn trigger_shutdown(&self) {
        request(&self.shutdown_requested, &self.shutdown_tx, &self.cancel);
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::Acquire)
    }

    /// Install signal handlers, then run `future_fn` with the coordinator
    pub async fn guard<F, Fut, R, E>(future_fn: F) -> Result<R, E>
    where
        F: FnOnce(Self) -> Fut,
        Fut: std::future::Future<Output = Result<R, E>>,
    {
        let (coordinator, _shutdown_rx) = Self::new();
        setup_signal_handlers(
            coordinator.shutdown_tx.clone(),
            coordinator.shutdown_requested.clone(),
            coordinator.cancel.clone(),
        );
        future_fn(coordinator).await
    }
}

fn request(requested: &AtomicBool, tx: &broadcast::Sender<()>, cancel: &CancelToken) {
    requested.store(true, Ordering::Release);
    cancel.cancel();
    let _ = tx.send(());
}

fn setup_signal_handlers(
    shutdown_tx: broadcast::Sender<()>,
    shutdown_requested: Arc<AtomicBool>,
    cancel: CancelToken,
) {
    let signal_count = Arc::new(AtomicUsize::new(0));

    #[cfg(unix)]
    {
        // Writing to a closed pipe (`sprinkler receive | head`) should end the process quietly
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }

        use tokio::signal::unix::{signal, SignalKind};
        let signals = [
            SignalKind::interrupt(),
            SignalKind::terminate(),
            SignalKind::hangup(),
            SignalKind::quit(),
        ];

        for kind in signals {
            let tx = shutdown_tx.clone();
            let requested = shutdown_requested.clone();
            let cancel = cancel.clone();
            let counter = signal_count.clone();

            tokio::spawn(async move {
                if let Ok(mut sig) = signal(kind) {
                    while sig.recv().await.is_some() {
                        on_signal(&counter, &requested, &tx, &cancel);
                    }
                }
            });
        }
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                on_signal(&signal_count, &shutdown_requested, &shutdown_tx, &cancel);
            }
        });
    }
}

fn on_signal(
    counter: &AtomicUsize,
    requested: &AtomicBool,
    tx: &broadcast::Sender<()>,
    cancel: &CancelToken,
) {
    let previous = counter.fetch_add(1, Ordering::AcqRel);
    if previous >= 1 {
        log::warn!("Second interrupt received; exiting");
        std::process::exit(130);
    }
    log::info!("Interrupt received; stopping after the current operation");
    request(requested, tx, cancel);
}
