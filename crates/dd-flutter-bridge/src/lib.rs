// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// dd-flutter bridge: receives method-channel calls from the calling layer
// and forwards them into the native SDK Core.
//
// The SDK Core and the calling layer are both collaborators behind the
// traits in `traits`. `stub` provides an in-memory SDK Core for hosts
// without a native SDK (desktop, CI, the command-line host).

pub mod channel;
pub mod lifecycle;
pub mod main_thread;
pub mod mapper;
pub mod perf;
pub mod plugin;
pub mod stub;
pub mod traits;

pub use channel::{MethodCall, MethodResponse};
pub use lifecycle::{ConfigurationSnapshot, InitOutcome, LifecycleGuard};
pub use main_thread::MainThread;
pub use mapper::EventMapperBridge;
pub use plugin::BridgePlugin;
