//! Live owner instances and their event feeds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use super::{LifecycleEvent, OwnerKind, Termination};

/// Capacity of an owner's event fan-out. Lifecycles are short sequences;
/// consumers that lag this far behind have already missed the point.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Errors produced when a lifecycle source misbehaves.
///
/// These indicate a bug in the owner integration (the UI framework side),
/// not in this library, so they are returned rather than panicking: the
/// host decides how loudly to fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The event does not belong to this owner kind's vocabulary.
    InvalidEvent {
        kind: OwnerKind,
        event: LifecycleEvent,
    },
    /// The event is out of order for this owner's current phase.
    OutOfOrder {
        kind: OwnerKind,
        prev: Option<LifecycleEvent>,
        event: LifecycleEvent,
    },
}

impl std::fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleError::InvalidEvent { kind, event } => {
                write!(f, "{} is not a {} lifecycle event", event, kind)
            }
            LifecycleError::OutOfOrder { kind, prev, event } => match prev {
                Some(prev) => write!(f, "{} may not follow {} for a {} owner", event, prev, kind),
                None => write!(f, "{} may not be the first event of a {} owner", event, kind),
            },
        }
    }
}

impl std::error::Error for LifecycleError {}

/// Shared handle to a live owner instance.
pub type OwnerHandle = Arc<Owner>;

/// A live UI owner instance.
///
/// Constructed by the UI framework integration once per concrete owner
/// (each screen rotation produces a *new* `Owner`). The owner publishes its
/// ordered lifecycle events over a broadcast feed that the binding layer
/// subscribes to, and carries the `will_recreate` flag distinguishing a
/// transient destroy (configuration change) from a permanent one.
#[derive(Debug)]
pub struct Owner {
    id: String,
    kind: OwnerKind,
    events: broadcast::Sender<LifecycleEvent>,
    will_recreate: AtomicBool,
    phase: Mutex<Option<LifecycleEvent>>,
}

impl Owner {
    /// Create a new owner of the given kind with a fresh id.
    pub fn new(kind: OwnerKind) -> OwnerHandle {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            id: Uuid::new_v4().to_string(),
            kind,
            events,
            will_recreate: AtomicBool::new(false),
            phase: Mutex::new(None),
        })
    }

    /// Unique id of this owner instance.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Which lifecycle vocabulary this owner follows.
    pub fn kind(&self) -> OwnerKind {
        self.kind
    }

    /// Subscribe to this owner's lifecycle events.
    ///
    /// Only events emitted after subscribing are delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.events.subscribe()
    }

    /// The last event this owner emitted, if any.
    pub fn phase(&self) -> Option<LifecycleEvent> {
        *self.phase.lock().unwrap()
    }

    /// Mark whether the upcoming destroy is a recreation (configuration
    /// change) rather than a permanent termination.
    ///
    /// The UI framework sets this before emitting DESTROY on a screen that
    /// it is about to rebuild under the same identity.
    pub fn set_will_recreate(&self, will_recreate: bool) {
        self.will_recreate.store(will_recreate, Ordering::SeqCst);
    }

    /// Whether this owner reported it will be recreated.
    pub fn will_recreate(&self) -> bool {
        self.will_recreate.load(Ordering::SeqCst)
    }

    /// Classify `event` as a termination point for this owner, taking the
    /// current `will_recreate` flag into account.
    pub fn termination_for(&self, event: LifecycleEvent) -> Option<Termination> {
        event.termination(self.kind, self.will_recreate())
    }

    /// Publish a lifecycle event.
    ///
    /// Validates the vocabulary and ordering before delivering; an invalid
    /// emission is rejected without being observed by any subscriber.
    pub fn emit(&self, event: LifecycleEvent) -> Result<(), LifecycleError> {
        let mut phase = self.phase.lock().unwrap();
        if !event.is_valid_for(self.kind) {
            return Err(LifecycleError::InvalidEvent {
                kind: self.kind,
                event,
            });
        }
        if !event.can_follow(*phase, self.kind) {
            return Err(LifecycleError::OutOfOrder {
                kind: self.kind,
                prev: *phase,
                event,
            });
        }
        *phase = Some(event);
        debug!(owner = %self.id, kind = %self.kind, event = %event, "lifecycle event");
        // No subscribers is fine; the owner may outlive every binding.
        let _ = self.events.send(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::LifecycleEvent::*;

    #[tokio::test]
    async fn test_emit_delivers_to_subscribers() {
        let owner = Owner::new(OwnerKind::Screen);
        let mut rx = owner.subscribe();
        owner.emit(Create).unwrap();
        owner.emit(Start).unwrap();
        assert_eq!(rx.recv().await.unwrap(), Create);
        assert_eq!(rx.recv().await.unwrap(), Start);
    }

    #[test]
    fn test_emit_without_subscribers_is_ok() {
        let owner = Owner::new(OwnerKind::Screen);
        assert!(owner.emit(Create).is_ok());
        assert_eq!(owner.phase(), Some(Create));
    }

    #[test]
    fn test_emit_rejects_wrong_vocabulary() {
        let owner = Owner::new(OwnerKind::Screen);
        let err = owner.emit(Attach).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidEvent { .. }));
        // Rejected events do not advance the phase.
        assert_eq!(owner.phase(), None);
    }

    #[test]
    fn test_emit_rejects_out_of_order() {
        let owner = Owner::new(OwnerKind::Screen);
        owner.emit(Create).unwrap();
        let err = owner.emit(Resume).unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::OutOfOrder {
                prev: Some(Create),
                ..
            }
        ));
        assert_eq!(owner.phase(), Some(Create));
    }

    #[test]
    fn test_emit_rejects_events_after_final() {
        let owner = Owner::new(OwnerKind::Screen);
        for ev in [Create, Start, Resume, Pause, Stop, Destroy] {
            owner.emit(ev).unwrap();
        }
        assert!(owner.emit(Create).is_err());
        assert!(owner.emit(Destroy).is_err());
    }

    #[test]
    fn test_termination_for_tracks_recreate_flag() {
        let owner = Owner::new(OwnerKind::Screen);
        assert_eq!(owner.termination_for(Destroy), Some(Termination::Permanent));
        owner.set_will_recreate(true);
        assert_eq!(owner.termination_for(Destroy), Some(Termination::Transient));
    }

    #[test]
    fn test_owner_ids_are_unique() {
        let a = Owner::new(OwnerKind::Screen);
        let b = Owner::new(OwnerKind::Screen);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_error_display() {
        let err = LifecycleError::InvalidEvent {
            kind: OwnerKind::Screen,
            event: Detach,
        };
        assert_eq!(err.to_string(), "DETACH is not a screen lifecycle event");
    }
}
