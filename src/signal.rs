//! Ctrl+C handling for graceful shutdown.
//!
//! A single `Arc<AtomicBool>` is shared by the walker, the hasher and the
//! finder. Setting it makes every phase stop at its next check, and the scan
//! ends with [`FinderError::Interrupted`](crate::duplicates::FinderError).
//!
//! ```rust,no_run
//! use dupewise::duplicates::FinderConfig;
//! use dupewise::signal::install_handler;
//!
//! let handler = install_handler();
//! let config = FinderConfig::default().with_shutdown_flag(handler.flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once Ctrl+C was pressed or [`request_shutdown`](Self::request_shutdown) was called.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Manually request a shutdown.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clone of the flag for worker components.
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear the flag so the handler can serve another run.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C hook and return its handler.
///
/// The hook can only be registered once per process, so later calls (tests
/// calling `run_app` repeatedly) get the existing handler back with its flag
/// cleared. If registration fails the returned handler still works for
/// manual shutdown requests.
pub fn install_handler() -> ShutdownHandler {
    let handler = GLOBAL_HANDLER.get_or_init(|| {
        let handler = ShutdownHandler::new();
        let flag = handler.flag();

        let installed = ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\nInterrupted. Finishing current files...");
            let _ = stderr.flush();
            log::info!("Shutdown signal received");
        });

        if let Err(e) = installed {
            log::debug!("Ctrl+C handler not installed ({}), using unhooked handler", e);
        }
        handler
    });

    handler.reset();
    handler.clone()
}
