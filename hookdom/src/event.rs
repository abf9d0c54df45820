use std::sync::Arc;

use crate::document::NodeId;

/// Kinds of events a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Change,
}

/// Events dispatched through the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The selection of a form control changed through user interaction.
    Change { target: NodeId },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Change { .. } => EventKind::Change,
        }
    }

    pub fn target(&self) -> NodeId {
        match self {
            Self::Change { target } => *target,
        }
    }
}

/// Handle for a registered listener. Pass it back to `Document::remove_listener`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

pub type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

pub(crate) struct Listener {
    pub id: ListenerId,
    pub node: NodeId,
    pub kind: EventKind,
    pub handler: Handler,
}
