// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synchronous event mapping through the calling layer.
//
// The SDK Core expects event mappers to return before its pipeline moves on,
// but the calling layer can only be reached asynchronously and only from
// the designated context. Each `map` call therefore:
//
//   1. serializes the event,
//   2. posts the outbound call onto the designated context,
//   3. blocks the calling thread on a one-slot channel with a timeout,
//   4. merges the writable fields of the reply back into the event.
//
// Every failure path returns the event unmodified. A reply that arrives
// after the timeout finds the receiver gone and is dropped.

use std::marker::PhantomData;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dd_flutter_core::MappableEvent;
use serde_json::{json, Value};
use tracing::{debug, debug_span, warn};
use uuid::Uuid;

use crate::channel::MethodResponse;
use crate::main_thread::MainThread;
use crate::perf::MapperStats;
use crate::traits::{MethodChannel, Reply, SdkCore};

/// Key the calling layer sets when its own mapper threw.
pub const MAPPER_ERROR_KEY: &str = "_dd.mapper_error";

/// What came back through the slot.
#[derive(Debug)]
enum MapperReply {
    Mapped(Value),
    CallerError { code: String, message: Option<String> },
    NotImplemented,
    Undeliverable(String),
}

impl From<MethodResponse> for MapperReply {
    fn from(response: MethodResponse) -> Self {
        match response {
            MethodResponse::Success { value } => Self::Mapped(value),
            MethodResponse::Error { code, message, .. } => Self::CallerError { code, message },
            MethodResponse::NotImplemented => Self::NotImplemented,
        }
    }
}

/// Round-trips events of kind `E` through the calling layer.
pub struct EventMapperBridge<E> {
    channel: Arc<dyn MethodChannel>,
    main_thread: Arc<MainThread>,
    core: Arc<dyn SdkCore>,
    stats: Arc<MapperStats>,
    timeout: Duration,
    _event: PhantomData<fn(E) -> E>,
}

impl<E> Clone for EventMapperBridge<E> {
    fn clone(&self) -> Self {
        Self {
            channel: Arc::clone(&self.channel),
            main_thread: Arc::clone(&self.main_thread),
            core: Arc::clone(&self.core),
            stats: Arc::clone(&self.stats),
            timeout: self.timeout,
            _event: PhantomData,
        }
    }
}

impl<E: MappableEvent> EventMapperBridge<E> {
    pub fn new(
        channel: Arc<dyn MethodChannel>,
        main_thread: Arc<MainThread>,
        core: Arc<dyn SdkCore>,
        stats: Arc<MapperStats>,
        timeout: Duration,
    ) -> Self {
        Self {
            channel,
            main_thread,
            core,
            stats,
            timeout,
            _event: PhantomData,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Let the calling layer rewrite `event`.
    ///
    /// Must not be called from the designated context; doing so returns the
    /// event untouched instead of deadlocking.
    pub fn map(&self, mut event: E) -> E {
        let request_id = Uuid::new_v4();
        let span = debug_span!("map_event", mapper = E::MAPPER_NAME, %request_id);
        let _enter = span.enter();

        let telemetry = self.core.telemetry();

        if self.main_thread.is_current() {
            warn!("event mapper invoked on the designated context");
            telemetry.error(
                &format!(
                    "{} was invoked on the designated context; returning unmodified event.",
                    E::MAPPER_NAME
                ),
                None,
                None,
            );
            return event;
        }

        let payload = match serde_json::to_value(&event) {
            Ok(payload) => payload,
            Err(err) => {
                telemetry.error(
                    &format!("Failed to encode event for {}: {err}", E::MAPPER_NAME),
                    None,
                    None,
                );
                return event;
            }
        };

        let started = Instant::now();
        match self.round_trip(payload) {
            Ok(MapperReply::Mapped(value)) => {
                self.stats.record_total(started.elapsed());
                self.apply(&mut event, value);
            }
            Ok(MapperReply::CallerError { code, message }) => {
                self.stats.record_total(started.elapsed());
                // The calling layer's mapper threw; that is a bug in user code.
                debug!(%code, reason = message.as_deref(), "mapper reported an error");
            }
            Ok(MapperReply::NotImplemented) => {
                telemetry.error(
                    &format!("{} returned notImplemented.", E::MAPPER_METHOD),
                    None,
                    None,
                );
            }
            Ok(MapperReply::Undeliverable(reason)) => {
                telemetry.error(
                    &format!("Attempting call {} failed.", E::MAPPER_METHOD),
                    None,
                    Some(&reason),
                );
            }
            Err(RecvTimeoutError::Timeout) => {
                self.stats.record_timeout();
                debug!(timeout_ms = self.timeout.as_millis(), "mapper timed out");
                telemetry.debug(&format!("{} timed out", E::MAPPER_NAME));
            }
            Err(RecvTimeoutError::Disconnected) => {
                telemetry.error(
                    &format!(
                        "{} reply was dropped without an answer.",
                        E::MAPPER_METHOD
                    ),
                    None,
                    None,
                );
            }
        }

        event
    }

    /// Post the outbound call and wait for the single reply.
    fn round_trip(&self, payload: Value) -> Result<MapperReply, RecvTimeoutError> {
        let (slot, waiter) = mpsc::sync_channel::<MapperReply>(1);
        let channel = Arc::clone(&self.channel);
        let stats = Arc::clone(&self.stats);

        let posted = self.main_thread.post(move || {
            let dispatch_started = Instant::now();
            let reply_slot = slot.clone();
            let reply: Reply = Box::new(move |response| {
                // Fails once the waiter has given up; the reply is dropped.
                let _ = reply_slot.try_send(response.into());
            });

            let arguments = json!({ "event": payload });
            if let Err(err) = channel.invoke_method(E::MAPPER_METHOD, arguments, reply) {
                let _ = slot.try_send(MapperReply::Undeliverable(err.to_string()));
            }
            stats.record_main_thread(dispatch_started.elapsed());
        });

        if let Err(err) = posted {
            return Ok(MapperReply::Undeliverable(err.to_string()));
        }

        waiter.recv_timeout(self.timeout)
    }

    fn apply(&self, event: &mut E, value: Value) {
        let Value::Object(map) = value else {
            debug!("mapper returned a non-object; keeping event");
            return;
        };
        if map.contains_key(MAPPER_ERROR_KEY) {
            debug!("mapper flagged an error; keeping event");
            return;
        }

        match serde_json::from_value::<E>(Value::Object(map)) {
            Ok(mapped) => event.merge_mapped(mapped),
            Err(err) => self.core.telemetry().error(
                &format!(
                    "Attempt to deserialize mapped {} event failed. Returning unmodified event.",
                    E::MAPPER_NAME
                ),
                None,
                Some(&err.to_string()),
            ),
        }
    }
}
