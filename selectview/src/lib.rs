//! A form field binding a set of options to a native `<select>`.
//!
//! Options come from a list of scalars, a list of `(value, label, disabled)`
//! tuples, or a live [`Collection`] of models. The view resolves every value
//! it is given against that option set, keeps the native selection in sync,
//! tracks required-field validity and notifies its [`FieldParent`].

pub mod collection;
pub mod config;
pub mod error;
pub mod model;
pub mod parent;
pub mod prelude;
pub mod source;
pub mod validation;
pub mod value;
pub mod view;

pub use collection::{Collection, CollectionEvent, Subscription};
pub use config::{BeforeSubmit, DEFAULT_TEMPLATE, SelectConfig};
pub use error::{ConfigError, LookupError, Result, SelectError};
pub use model::{Cid, Model};
pub use parent::FieldParent;
pub use source::{Attributes, OptionEntry, OptionSource, OptionTuple};
pub use validation::ValidationState;
pub use value::Value;
pub use view::SelectView;
