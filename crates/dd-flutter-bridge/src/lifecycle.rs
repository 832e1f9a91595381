// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One-time SDK initialization and ordered, blocking shutdown.
//
// The calling layer may be torn down and re-created while the process keeps
// running (a hot restart, or backing out of the first screen), so the
// configuration used for the first initialization is kept in a process-wide
// snapshot rather than in the plugin object.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use dd_flutter_core::error::{BridgeError, Result};
use dd_flutter_core::types::TrackingConsent;
use dd_flutter_core::Configuration;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::traits::SdkCore;

pub const MESSAGE_INVALID_REINITIALIZATION: &str = "🔥 Reinitializing the DatadogSDK with different options, even after a hot restart, is not \
     supported. Cold restart your application to change your current configuration.";

/// The encoded configuration of the first successful initialization.
#[derive(Debug, Default)]
pub struct ConfigurationSnapshot {
    previous: Mutex<Option<Map<String, Value>>>,
}

impl ConfigurationSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshot shared by every plugin in this process.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<ConfigurationSnapshot>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    pub fn get(&self) -> Option<Map<String, Value>> {
        self.previous
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Which branch an `initialize` call took. All of them are RPC successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The SDK Core was initialized with this configuration.
    Initialized,
    /// Already initialized with an identical configuration.
    AlreadyInitialized,
    /// Already initialized with a different configuration; ignored.
    ConflictingConfiguration,
    /// `clientToken` or `env` missing from the configuration; nothing done.
    InvalidConfiguration,
}

/// Guards SDK Core initialization and runs its shutdown.
pub struct LifecycleGuard {
    core: Arc<dyn SdkCore>,
    snapshot: Arc<ConfigurationSnapshot>,
    shutdown_thread_name: String,
}

impl LifecycleGuard {
    pub fn new(
        core: Arc<dyn SdkCore>,
        snapshot: Arc<ConfigurationSnapshot>,
        shutdown_thread_name: impl Into<String>,
    ) -> Self {
        Self {
            core,
            snapshot,
            shutdown_thread_name: shutdown_thread_name.into(),
        }
    }

    /// Initialize the SDK Core unless it already is.
    ///
    /// The check, the initialization and the snapshot update happen under
    /// one lock, so concurrent first calls initialize exactly once.
    pub fn initialize(&self, encoded: &Map<String, Value>, consent: TrackingConsent) -> InitOutcome {
        let mut previous = self
            .snapshot
            .previous
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !self.core.is_initialized() {
            let Some(configuration) = Configuration::from_encoded(encoded) else {
                warn!("configuration is missing clientToken or env; SDK not initialized");
                return InitOutcome::InvalidConfiguration;
            };
            info!(
                env = %configuration.env,
                site = ?configuration.site,
                ?consent,
                "initializing SDK core"
            );
            self.core.initialize(configuration, consent);
            *previous = Some(encoded.clone());
            InitOutcome::Initialized
        } else if previous.as_ref() != Some(encoded) {
            warn!("{MESSAGE_INVALID_REINITIALIZATION}");
            InitOutcome::ConflictingConfiguration
        } else {
            debug!("SDK core already initialized with the same configuration");
            InitOutcome::AlreadyInitialized
        }
    }

    /// Flush and stop the SDK Core on a dedicated worker thread, blocking
    /// until it is done. There is no timeout.
    pub fn flush_and_shutdown(&self) -> Result<()> {
        let core = Arc::clone(&self.core);
        let worker = std::thread::Builder::new()
            .name(self.shutdown_thread_name.clone())
            .spawn(move || shutdown_sequence(core.as_ref()))?;

        worker
            .join()
            .map_err(|_| BridgeError::Shutdown("shutdown worker panicked".into()))
    }
}

fn shutdown_sequence(core: &dyn SdkCore) {
    match core.shutdown_hook() {
        Some(hook) => {
            debug!("flushing SDK core executors");
            hook.flush_and_shutdown_executors();
        }
        None => debug!("SDK core has no shutdown hook; skipping flush"),
    }
    core.stop_instance();
    info!("SDK core stopped");
}
