pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod template;

pub use document::{Document, NodeId};
pub use element::{Content, Element};
pub use error::{DomError, Result};
pub use event::{Event, EventKind, ListenerId};
