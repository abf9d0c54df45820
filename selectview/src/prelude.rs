//! Convenient re-exports for building select fields.

pub use hookdom::{Document, NodeId};

pub use crate::{
    Collection, CollectionEvent, FieldParent, Model, OptionSource, OptionTuple, SelectConfig,
    SelectError, SelectView, Value,
};
