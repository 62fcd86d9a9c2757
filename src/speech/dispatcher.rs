//! Off-thread message fetching with a single tracked request and a ceiling.
use std::{
    sync::{
        mpsc::{self, Receiver, Sender},
        Mutex, PoisonError,
    },
    thread,
    time::Duration,
};

use bevy::prelude::*;

use super::{
    errors::{SpeechError, SpeechErrorKind},
    source::MessageSource,
    types::{SpeechDelivery, SpeechOrigin, SpeechRequest, SpeechRequestId},
};

type WorkerReply = (SpeechRequestId, Result<String, SpeechError>);

#[derive(Debug)]
struct InFlight {
    id: SpeechRequestId,
    request: SpeechRequest,
    deadline: Timer,
}

/// Result of handing a request to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A worker is fetching; the delivery arrives through [`SpeechDispatcher::poll`].
    Pending(SpeechRequestId),
    Resolved(SpeechDelivery),
}

/// Runs broker calls on detached worker threads and hands the replies back
/// to the event loop. Only the newest request is tracked.
#[derive(Resource)]
pub struct SpeechDispatcher {
    sender: Sender<WorkerReply>,
    receiver: Mutex<Receiver<WorkerReply>>,
    next_id: u64,
    in_flight: Option<InFlight>,
    ceiling: Duration,
}

impl SpeechDispatcher {
    pub fn new(ceiling: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
            next_id: 1,
            in_flight: None,
            ceiling,
        }
    }

    pub fn current(&self) -> Option<SpeechRequestId> {
        self.in_flight.as_ref().map(|in_flight| in_flight.id)
    }

    pub fn is_waiting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn dispatch(&mut self, request: SpeechRequest, source: &mut MessageSource) -> DispatchOutcome {
        let id = self.allocate_id();
        self.supersede(id);

        let Some(broker) = source.broker() else {
            let (text, origin) = source.fetch_blocking(&request);
            return DispatchOutcome::Resolved(SpeechDelivery {
                request_id: id,
                category: request.category,
                purpose: request.purpose,
                origin,
                text,
                failure: None,
            });
        };

        let sender = self.sender.clone();
        let worker_request = request.clone();
        let spawned = thread::Builder::new()
            .name(format!("speech-fetch-{}", id.value()))
            .spawn(move || {
                let result = broker.generate(&worker_request);
                // The receiver only disappears on shutdown.
                let _ = sender.send((id, result));
            });

        if let Err(err) = spawned {
            warn!(target: "speech", "Could not start fetch worker: {}", err);
            let failure = SpeechErrorKind::transport(err.to_string());
            return DispatchOutcome::Resolved(self.fallback(id, &request, source, Some(failure)));
        }

        debug!(target: "speech", "Fetch {} dispatched ({})", id.value(), request.category);
        self.in_flight = Some(InFlight {
            id,
            request,
            deadline: Timer::new(self.ceiling, TimerMode::Once),
        });
        DispatchOutcome::Pending(id)
    }

    /// Resolves immediately from the fallback table, superseding any fetch.
    pub fn resolve_offline(&mut self, request: SpeechRequest, source: &mut MessageSource) -> SpeechDelivery {
        let id = self.allocate_id();
        self.supersede(id);
        self.fallback(id, &request, source, None)
    }

    /// Drains worker replies and enforces the fetch ceiling. Replies for
    /// superseded requests are dropped.
    pub fn poll(&mut self, delta: Duration, source: &mut MessageSource) -> Option<SpeechDelivery> {
        let replies: Vec<WorkerReply> = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .try_iter()
            .collect();

        let mut delivered = None;
        for (id, result) in replies {
            if self.current() != Some(id) {
                debug!(target: "speech", "Discarding late reply for fetch {}", id.value());
                continue;
            }
            let Some(in_flight) = self.in_flight.take() else {
                continue;
            };
            delivered = Some(match result {
                Ok(text) => SpeechDelivery {
                    request_id: id,
                    category: in_flight.request.category,
                    purpose: in_flight.request.purpose,
                    origin: SpeechOrigin::Live,
                    text,
                    failure: None,
                },
                Err(err) => {
                    warn!(target: "speech", "{}; using fallback", err);
                    self.fallback(id, &in_flight.request, source, Some(err.kind))
                }
            });
        }

        if delivered.is_some() {
            return delivered;
        }

        let expired = match self.in_flight.as_mut() {
            Some(in_flight) => in_flight.deadline.tick(delta).is_finished(),
            None => false,
        };
        if expired {
            if let Some(in_flight) = self.in_flight.take() {
                warn!(
                    target: "speech",
                    "Fetch {} exceeded {:?}; using fallback",
                    in_flight.id.value(),
                    self.ceiling
                );
                return Some(self.fallback(
                    in_flight.id,
                    &in_flight.request,
                    source,
                    Some(SpeechErrorKind::Timeout),
                ));
            }
        }
        None
    }

    fn allocate_id(&mut self) -> SpeechRequestId {
        let id = SpeechRequestId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn supersede(&mut self, by: SpeechRequestId) {
        if let Some(previous) = self.in_flight.take() {
            debug!(
                target: "speech",
                "Fetch {} superseded by {}",
                previous.id.value(),
                by.value()
            );
        }
    }

    fn fallback(
        &self,
        id: SpeechRequestId,
        request: &SpeechRequest,
        source: &mut MessageSource,
        failure: Option<SpeechErrorKind>,
    ) -> SpeechDelivery {
        SpeechDelivery {
            request_id: id,
            category: request.category,
            purpose: request.purpose,
            origin: SpeechOrigin::Fallback,
            text: source.fallback_for(request),
            failure,
        }
    }
}

impl Default for SpeechDispatcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}
