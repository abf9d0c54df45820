//! Error types for select views.

use hookdom::DomError;

/// Invalid construction options. Raised by [`SelectView::new`](crate::SelectView::new).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The `name` option is missing or blank.
    #[error("SelectView requires a name property")]
    MissingName,

    /// The option source is unusable as configured.
    #[error("SelectView requires select options: {reason}")]
    InvalidOptions { reason: String },
}

/// A candidate value has no matching option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No array option matches the value.
    #[error("value '{value}' not in set of provided options")]
    ValueNotFound { value: String },

    /// No collection model matches the model or id.
    #[error("model or model id '{value}' not found in options collection")]
    ModelNotFound { value: String },
}

/// Errors raised by [`SelectView`](crate::SelectView) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The template could not be parsed or the tree rejected an operation.
    #[error("template error: {0}")]
    Dom(#[from] DomError),

    /// The rendered template contains no `<select>`.
    #[error("no select found in template")]
    NoSelect,

    /// The committed value has no rendered `<option>` to select.
    #[error("no option exists for value: '{value}'")]
    NoOptionForValue { value: String },
}

impl SelectError {
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup(_))
    }
}

pub type Result<T> = std::result::Result<T, SelectError>;
