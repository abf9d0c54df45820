//! Required-field validation and its visible message.

use hookdom::{Document, NodeId};

use crate::error::Result;
use crate::value::Value;

/// Hook of the element shown/hidden with the message.
pub const MESSAGE_CONTAINER_HOOK: &str = "message-container";
/// Hook of the element receiving the message text.
pub const MESSAGE_TEXT_HOOK: &str = "message-text";

/// Validation rule and current outcome of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationState {
    pub required: bool,
    pub required_message: String,
    pub valid_class: String,
    pub invalid_class: String,
    valid: bool,
}

impl ValidationState {
    pub fn new(
        required: bool,
        required_message: impl Into<String>,
        valid_class: impl Into<String>,
        invalid_class: impl Into<String>,
    ) -> Self {
        Self {
            required,
            required_message: required_message.into(),
            valid_class: valid_class.into(),
            invalid_class: invalid_class.into(),
            valid: !required,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Current error message, if the field is invalid.
    pub fn error(&self) -> Option<&str> {
        (!self.valid).then_some(self.required_message.as_str())
    }

    /// Re-evaluate against a value.
    ///
    /// Optional fields are always valid: their value is constrained to the
    /// option set or null. Required fields are invalid only when empty, so a
    /// selected `0` counts.
    pub fn evaluate(&mut self, value: &Value) -> bool {
        self.valid = !self.required || !value.is_empty();
        self.valid
    }

    /// Reflect the outcome on the rendered field.
    ///
    /// With `hide` set the message and both state classes are cleared without
    /// touching the outcome. Templates lacking either message hook are left alone.
    pub fn display(&self, doc: &Document, root: NodeId, hide: bool) -> Result<()> {
        let (Some(container), Some(text)) = (
            doc.query_hook(root, MESSAGE_CONTAINER_HOOK),
            doc.query_hook(root, MESSAGE_TEXT_HOOK),
        ) else {
            return Ok(());
        };

        if hide {
            doc.hide(container)?;
            doc.set_text(text, "")?;
            doc.remove_class(root, &self.valid_class)?;
            doc.remove_class(root, &self.invalid_class)?;
            return Ok(());
        }

        match self.error() {
            Some(message) => {
                doc.show(container)?;
                doc.set_text(text, message)?;
                doc.add_class(root, &self.invalid_class)?;
                doc.remove_class(root, &self.valid_class)?;
            }
            None => {
                doc.hide(container)?;
                doc.set_text(text, "")?;
                doc.add_class(root, &self.valid_class)?;
                doc.remove_class(root, &self.invalid_class)?;
            }
        }
        Ok(())
    }
}
