//! Lifecycle event vocabulary and termination classification.

use std::fmt;

/// Which lifecycle vocabulary an owner follows.
///
/// A screen-like owner runs CREATE → START → RESUME → PAUSE → STOP →
/// DESTROY. A nested-view-like owner runs ATTACH → CREATE → CREATE_VIEW →
/// START → RESUME → PAUSE → STOP → DESTROY_VIEW → DESTROY → DETACH, with
/// its view layer possibly rebuilt several times between ATTACH and DETACH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerKind {
    /// Top-level screen owner.
    Screen,
    /// View nested inside a screen, with its own attach/detach bracket.
    NestedView,
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerKind::Screen => write!(f, "screen"),
            OwnerKind::NestedView => write!(f, "nested-view"),
        }
    }
}

/// One event in an owner's ordered lifecycle.
///
/// The union of both vocabularies; [`LifecycleEvent::is_valid_for`] says
/// which events a given [`OwnerKind`] may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Nested view attached to its host (nested-view only, first event).
    Attach,
    /// Owner created.
    Create,
    /// Nested view's view layer built (nested-view only).
    CreateView,
    /// Owner became visible.
    Start,
    /// Owner became interactive.
    Resume,
    /// Owner lost interactivity (transient).
    Pause,
    /// Owner no longer visible (transient).
    Stop,
    /// Nested view's view layer torn down (nested-view only, transient).
    DestroyView,
    /// Owner destroyed. Terminal for screens; for nested views the view
    /// still detaches afterwards.
    Destroy,
    /// Nested view detached from its host (nested-view only, final event).
    Detach,
}

/// Classification of a terminal lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The owner is going away but the same logical unit will come back
    /// (configuration change, view rebuild). In-flight work survives.
    Transient,
    /// The owning UI unit is gone for good. In-flight work must stop.
    Permanent,
}

impl LifecycleEvent {
    /// Whether this event belongs to the given owner kind's vocabulary.
    pub fn is_valid_for(self, kind: OwnerKind) -> bool {
        match kind {
            OwnerKind::Screen => matches!(
                self,
                LifecycleEvent::Create
                    | LifecycleEvent::Start
                    | LifecycleEvent::Resume
                    | LifecycleEvent::Pause
                    | LifecycleEvent::Stop
                    | LifecycleEvent::Destroy
            ),
            OwnerKind::NestedView => true,
        }
    }

    /// Whether this event may legally follow `prev` for the given kind.
    ///
    /// `prev == None` means no event has been emitted yet. The allowed
    /// transitions form the usual lifecycle loops: pause/resume, stop/start
    /// (restart), and for nested views a view-layer rebuild between
    /// DESTROY_VIEW and CREATE_VIEW. Nothing follows the final event.
    pub fn can_follow(self, prev: Option<LifecycleEvent>, kind: OwnerKind) -> bool {
        use LifecycleEvent::*;
        if !self.is_valid_for(kind) {
            return false;
        }
        match kind {
            OwnerKind::Screen => match (prev, self) {
                (None, Create) => true,
                (Some(Create), Start) => true,
                (Some(Start), Resume) => true,
                (Some(Resume), Pause) => true,
                (Some(Pause), Resume) | (Some(Pause), Stop) => true,
                (Some(Stop), Start) | (Some(Stop), Destroy) => true,
                _ => false,
            },
            OwnerKind::NestedView => match (prev, self) {
                (None, Attach) => true,
                (Some(Attach), Create) => true,
                (Some(Create), CreateView) => true,
                (Some(CreateView), Start) => true,
                (Some(Start), Resume) => true,
                (Some(Resume), Pause) => true,
                (Some(Pause), Resume) | (Some(Pause), Stop) => true,
                (Some(Stop), Start) | (Some(Stop), DestroyView) => true,
                (Some(DestroyView), CreateView) | (Some(DestroyView), Destroy) => true,
                (Some(Destroy), Detach) => true,
                _ => false,
            },
        }
    }

    /// Classify this event as a termination point, if it is one.
    ///
    /// This is the single place deciding what cancels bound pipelines:
    ///
    /// - Screen DESTROY is permanent unless the owner reported it will be
    ///   recreated (`will_recreate`), in which case it is transient and the
    ///   same view-model re-attaches to the recreated owner.
    /// - Nested-view DETACH is permanent. DESTROY_VIEW and DESTROY are
    ///   transient for nested views (the view layer rebuilds, the detach
    ///   still follows).
    /// - PAUSE and STOP are not termination events at all.
    pub fn termination(self, kind: OwnerKind, will_recreate: bool) -> Option<Termination> {
        use LifecycleEvent::*;
        match (kind, self) {
            (OwnerKind::Screen, Destroy) => {
                if will_recreate {
                    Some(Termination::Transient)
                } else {
                    Some(Termination::Permanent)
                }
            }
            (OwnerKind::NestedView, Detach) => Some(Termination::Permanent),
            (OwnerKind::NestedView, DestroyView) | (OwnerKind::NestedView, Destroy) => {
                Some(Termination::Transient)
            }
            _ => None,
        }
    }

    /// Whether this event is the final one of the kind's vocabulary.
    pub fn is_final_for(self, kind: OwnerKind) -> bool {
        match kind {
            OwnerKind::Screen => self == LifecycleEvent::Destroy,
            OwnerKind::NestedView => self == LifecycleEvent::Detach,
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleEvent::Attach => "ATTACH",
            LifecycleEvent::Create => "CREATE",
            LifecycleEvent::CreateView => "CREATE_VIEW",
            LifecycleEvent::Start => "START",
            LifecycleEvent::Resume => "RESUME",
            LifecycleEvent::Pause => "PAUSE",
            LifecycleEvent::Stop => "STOP",
            LifecycleEvent::DestroyView => "DESTROY_VIEW",
            LifecycleEvent::Destroy => "DESTROY",
            LifecycleEvent::Detach => "DETACH",
        };
        write!(f, "{}", name)
    }
}
