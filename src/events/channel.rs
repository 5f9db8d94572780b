//! Event channel built on crossbeam-channel.

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::warn;

use super::{ApplyEvent, Event, PipelineEvent, PipelinePhase};
use crate::core::executor::{FileOutcome, FileStatus};

/// Sends events from the engine to whoever listens.
///
/// Cloneable and `Send`, so scanner threads can share it.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event. A dropped receiver discards it silently.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }

    pub fn phase(&self, phase: PipelinePhase) {
        self.send(Event::Pipeline(PipelineEvent::PhaseChanged { phase }));
    }

    /// Report one executor outcome. Files that were already gone are only
    /// logged; listeners see removals and failures.
    pub fn file_outcome(&self, outcome: &FileOutcome, dry_run: bool) {
        match &outcome.status {
            FileStatus::Deleted | FileStatus::WouldDelete => {
                self.send(Event::Apply(ApplyEvent::FileDeleted {
                    path: outcome.path.clone(),
                    dry_run,
                }))
            }
            FileStatus::Missing => warn!("Already gone: {}", outcome.path.display()),
            FileStatus::Failed(message) => self.send(Event::Apply(ApplyEvent::FileFailed {
                path: outcome.path.clone(),
                message: message.clone(),
            })),
        }
    }
}

/// Receives events on the UI side
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event arrives, None once every sender is gone
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }

    /// Everything already queued, without blocking
    pub fn drain(&self) -> Vec<Event> {
        self.inner.try_iter().collect()
    }
}

/// Factory for sender/receiver pairs
pub struct EventChannel;

impl EventChannel {
    /// Unbounded channel; events are small
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender nobody listens to
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}
