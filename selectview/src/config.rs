//! Construction options for [`SelectView`](crate::SelectView).

use std::sync::{Arc, Weak};

use hookdom::NodeId;

use crate::error::Result;
use crate::parent::FieldParent;
use crate::source::OptionSource;
use crate::value::Value;
use crate::view::SelectView;

/// Markup used when no template is supplied.
///
/// Any replacement needs a `<select>` (or to be one) and may carry `label`,
/// `message-container` and `message-text` hooks.
pub const DEFAULT_TEMPLATE: &str = r#"<label class="select">
    <span data-hook="label"></span>
    <select></select>
    <span data-hook="message-container" class="message message-below message-error">
        <p data-hook="message-text"></p>
    </span>
</label>"#;

pub const DEFAULT_VALID_CLASS: &str = "input-valid";
pub const DEFAULT_INVALID_CLASS: &str = "input-invalid";
pub const DEFAULT_REQUIRED_MESSAGE: &str = "Selection required";
pub const DEFAULT_TEXT_ATTRIBUTE: &str = "text";

/// Replacement for the built-in `before_submit` behaviour.
pub type BeforeSubmit = Arc<dyn Fn(&SelectView) -> Result<()> + Send + Sync>;

/// Options for a select view.
///
/// # Example
///
/// ```
/// use selectview::{OptionSource, SelectConfig};
///
/// let config = SelectConfig::new("word", OptionSource::scalars(["foo", "bar"]))
///     .label("Choose a word")
///     .unselected_text("Please choose:")
///     .required(true);
/// assert_eq!(config.required_message, "Selection required");
/// ```
#[derive(Clone)]
pub struct SelectConfig {
    pub name: String,
    pub options: OptionSource,
    /// Label text; falls back to `name`.
    pub label: Option<String>,
    /// Initial value.
    pub value: Value,
    /// Text of the synthetic "no selection" option. Omitted when `None`.
    pub unselected_text: Option<String>,
    pub required: bool,
    pub valid_class: String,
    pub invalid_class: String,
    pub required_message: String,
    /// Model field used as option value. Defaults to the collection's main index.
    pub id_attribute: Option<String>,
    /// Model field used as option label.
    pub text_attribute: String,
    /// Model field that disables an option when truthy.
    pub disabled_attribute: Option<String>,
    /// Collection-backed views yield the model (true) or only its id (false).
    pub yield_model: bool,
    /// Show the validation message right from the first render.
    pub eager_validate: bool,
    pub template: String,
    /// Existing element to render into.
    pub el: Option<NodeId>,
    pub parent: Option<Weak<dyn FieldParent>>,
    pub before_submit: Option<BeforeSubmit>,
    pub auto_render: bool,
}

impl std::fmt::Debug for SelectConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectConfig")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("label", &self.label)
            .field("value", &self.value)
            .field("unselected_text", &self.unselected_text)
            .field("required", &self.required)
            .field("yield_model", &self.yield_model)
            .field("eager_validate", &self.eager_validate)
            .field("el", &self.el)
            .field("has_parent", &self.parent.is_some())
            .field("auto_render", &self.auto_render)
            .finish_non_exhaustive()
    }
}

impl SelectConfig {
    pub fn new(name: impl Into<String>, options: impl Into<OptionSource>) -> Self {
        Self {
            name: name.into(),
            options: options.into(),
            label: None,
            value: Value::Null,
            unselected_text: None,
            required: false,
            valid_class: DEFAULT_VALID_CLASS.into(),
            invalid_class: DEFAULT_INVALID_CLASS.into(),
            required_message: DEFAULT_REQUIRED_MESSAGE.into(),
            id_attribute: None,
            text_attribute: DEFAULT_TEXT_ATTRIBUTE.into(),
            disabled_attribute: None,
            yield_model: true,
            eager_validate: false,
            template: DEFAULT_TEMPLATE.into(),
            el: None,
            parent: None,
            before_submit: None,
            auto_render: false,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    /// Add a placeholder option. An empty text means no placeholder.
    pub fn unselected_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.unselected_text = (!text.is_empty()).then_some(text);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn valid_class(mut self, class: impl Into<String>) -> Self {
        self.valid_class = class.into();
        self
    }

    pub fn invalid_class(mut self, class: impl Into<String>) -> Self {
        self.invalid_class = class.into();
        self
    }

    pub fn required_message(mut self, message: impl Into<String>) -> Self {
        self.required_message = message.into();
        self
    }

    pub fn id_attribute(mut self, field: impl Into<String>) -> Self {
        self.id_attribute = Some(field.into());
        self
    }

    pub fn text_attribute(mut self, field: impl Into<String>) -> Self {
        self.text_attribute = field.into();
        self
    }

    pub fn disabled_attribute(mut self, field: impl Into<String>) -> Self {
        self.disabled_attribute = Some(field.into());
        self
    }

    pub fn yield_model(mut self, yield_model: bool) -> Self {
        self.yield_model = yield_model;
        self
    }

    pub fn eager_validate(mut self, eager: bool) -> Self {
        self.eager_validate = eager;
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn el(mut self, el: NodeId) -> Self {
        self.el = Some(el);
        self
    }

    /// Attach the containing form. Only a weak reference is kept.
    pub fn parent<P: FieldParent + 'static>(mut self, parent: &Arc<P>) -> Self {
        let parent: Arc<dyn FieldParent> = parent.clone();
        self.parent = Some(Arc::downgrade(&parent));
        self
    }

    pub fn before_submit(
        mut self,
        hook: impl Fn(&SelectView) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.before_submit = Some(Arc::new(hook));
        self
    }

    pub fn auto_render(mut self, auto_render: bool) -> Self {
        self.auto_render = auto_render;
        self
    }
}
