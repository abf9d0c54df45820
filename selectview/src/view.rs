//! The select view: a form field bound to a native `<select>`.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use hookdom::{Document, Element, EventKind, ListenerId, NodeId};

use crate::collection::Subscription;
use crate::config::{BeforeSubmit, SelectConfig};
use crate::error::{ConfigError, Result, SelectError};
use crate::parent::FieldParent;
use crate::source::{Attributes, OptionSource};
use crate::validation::ValidationState;
use crate::value::Value;

/// Hook of the element receiving the label text.
pub const LABEL_HOOK: &str = "label";

struct SelectInner {
    doc: Document,
    name: String,
    label: String,
    options: OptionSource,
    attrs: Attributes,
    yield_model: bool,
    unselected_text: Option<String>,
    eager_validate: bool,
    template: String,

    value: Value,
    starting_value: Value,
    validation: ValidationState,

    el: Option<NodeId>,
    label_el: Option<NodeId>,
    select: Option<NodeId>,
    rendered: bool,

    parent: Option<Weak<dyn FieldParent>>,
    before_submit: Option<BeforeSubmit>,
    change_listener: Option<ListenerId>,
    subscription: Option<Subscription>,
}

impl SelectInner {
    /// Is `value` currently a legal selection? Lookup failures become `false`.
    fn has_option_by_value(&self, value: &Value) -> bool {
        self.option_by_value(value).is_ok()
    }

    fn option_by_value(&self, value: &Value) -> Result<Value> {
        Ok(self.options.find(value, &self.attrs, self.yield_model)?)
    }

    /// Map a candidate onto the canonical value.
    fn resolve(&self, candidate: &Value, init: bool) -> Result<Value> {
        if !candidate.is_empty() {
            return self.option_by_value(candidate);
        }

        let null_valid =
            self.unselected_text.is_some() || self.has_option_by_value(&Value::Null);

        // Initializing without a value and without a null option: take the first one
        if init
            && !null_valid
            && let Some(first) = self.options.first_value(&self.attrs, self.yield_model)
        {
            return Ok(first);
        }
        Ok(Value::Null)
    }

    fn validate(&mut self, hide_message: bool) -> Result<bool> {
        let valid = self.validation.evaluate(&self.value);
        if let (Some(_), Some(el)) = (self.select, self.el) {
            self.validation.display(&self.doc, el, hide_message)?;
        }
        Ok(valid)
    }

    fn render_options(&self) -> Result<()> {
        let Some(select) = self.select else {
            return Ok(());
        };
        let doc = &self.doc;

        doc.clear_children(select)?;
        if let Some(text) = &self.unselected_text {
            let option = doc.create(Element::option("", text.as_str()));
            doc.append_child(select, option)?;
        }

        let entries = self.options.entries(&self.attrs);
        log::debug!(
            "SelectView::render_options name={} count={}",
            self.name,
            entries.len()
        );
        for entry in entries {
            let option = doc.create(
                Element::option(entry.value.key().unwrap_or_default(), entry.label)
                    .disabled(entry.disabled),
            );
            doc.append_child(select, option)?;
        }
        Ok(())
    }

    /// Point the native selection at the option matching the current value.
    fn sync_from_value(&self) -> Result<()> {
        let Some(select) = self.select else {
            return Ok(());
        };
        let doc = &self.doc;

        if self.value.is_empty() {
            if self.unselected_text.is_some() || (self.starting_value.is_empty() && !self.rendered)
            {
                doc.set_selected_index(select, Some(0))?;
                return Ok(());
            }
            if self.options.is_empty() {
                return Ok(());
            }
        }

        let lookup = match &self.value {
            Value::Model(model) => model.get_or_null(&self.attrs.id),
            other => other.clone(),
        };
        let key = lookup.key().unwrap_or_default();

        let position = doc
            .options(select)
            .into_iter()
            .position(|option| doc.option_value(option).as_deref() == Some(key.as_str()));
        match position {
            Some(index) => {
                doc.set_selected_index(select, Some(index))?;
                Ok(())
            }
            None => Err(SelectError::NoOptionForValue { value: key }),
        }
    }

    /// Attach a parsed template, bind the change listener, then fill and
    /// sync the options. The caller rolls back on error.
    fn mount(&mut self, fragment: NodeId, weak: Weak<RwLock<SelectInner>>) -> Result<()> {
        let doc = self.doc.clone();
        let el = match self.el {
            Some(el) => {
                doc.append_child(el, fragment)?;
                el
            }
            None => {
                self.el = Some(fragment);
                fragment
            }
        };

        self.label_el = doc.query_hook(el, LABEL_HOOK);
        if let Some(label_el) = self.label_el {
            doc.set_text(label_el, self.label.as_str())?;
        }

        let select = if doc.matches_tag(el, "select") {
            Some(el)
        } else {
            doc.query_tag(el, "select")
        };
        let select = select.ok_or(SelectError::NoSelect)?;
        doc.set_attribute(select, "name", self.name.as_str())?;
        self.select = Some(select);

        self.change_listener = Some(doc.add_listener(el, EventKind::Change, move |_| {
            if let Some(view) = SelectView::from_weak(&weak)
                && let Err(err) = view.commit_native_selection()
            {
                log::warn!("SelectView change rejected: {err}");
            }
        }));

        self.render_options()?;
        self.sync_from_value()?;
        self.validate(!self.eager_validate)?;
        Ok(())
    }

    /// Translate the native selection back into a candidate value.
    fn native_candidate(&self) -> Option<Value> {
        let select = self.select?;
        let native = self.doc.selected_value(select).unwrap_or_default();
        let candidate = self
            .options
            .entries(&self.attrs)
            .into_iter()
            .find(|entry| entry.value.key().as_deref() == Some(native.as_str()))
            .map(|entry| entry.value)
            .unwrap_or_else(|| Value::from(native));
        Some(candidate)
    }

    fn parent(&self) -> Option<Arc<dyn FieldParent>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }
}

/// A form field presenting a set of options through a native `<select>`.
///
/// `SelectView` is a cheap-clone handle: clones share the same field. The
/// view keeps its `value` in sync with the native selection in both
/// directions, re-renders when a collection-backed option set changes, and
/// reports its validity to an optional [`FieldParent`].
///
/// # Example
///
/// ```
/// use hookdom::Document;
/// use selectview::{OptionSource, SelectConfig, SelectView, Value};
///
/// let doc = Document::new();
/// let view = SelectView::new(
///     &doc,
///     SelectConfig::new("word", OptionSource::scalars(["one", "two", "three"]))
///         .unselected_text("Please choose:")
///         .value("two")
///         .auto_render(true),
/// )
/// .unwrap();
///
/// assert_eq!(view.value(), Value::from("two"));
/// view.set_value(Value::Null).unwrap();
/// assert_eq!(view.value(), Value::Null);
/// ```
#[derive(Clone)]
pub struct SelectView {
    inner: Arc<RwLock<SelectInner>>,
}

impl std::fmt::Debug for SelectView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("SelectView")
            .field("name", &inner.name)
            .field("value", &inner.value)
            .field("valid", &inner.validation.is_valid())
            .field("rendered", &inner.rendered)
            .finish()
    }
}

impl SelectView {
    /// Create a view. The initial value is resolved immediately; with
    /// `auto_render` the view is rendered as well.
    pub fn new(doc: &Document, config: SelectConfig) -> Result<Self> {
        let name = config.name.trim().to_string();
        if name.is_empty() {
            return Err(ConfigError::MissingName.into());
        }

        let id_attribute = match (&config.id_attribute, &config.options) {
            (Some(id), _) => id.clone(),
            (None, OptionSource::Collection(coll)) => coll.main_index(),
            (None, _) => "id".to_string(),
        };
        if config.options.is_collection()
            && (id_attribute.is_empty() || config.text_attribute.is_empty())
        {
            return Err(ConfigError::InvalidOptions {
                reason: "collection id and text attributes must be non-empty".into(),
            }
            .into());
        }

        let SelectConfig {
            options,
            label,
            value,
            unselected_text,
            required,
            valid_class,
            invalid_class,
            required_message,
            text_attribute,
            disabled_attribute,
            yield_model,
            eager_validate,
            template,
            el,
            parent,
            before_submit,
            auto_render,
            ..
        } = config;

        let view = Self {
            inner: Arc::new(RwLock::new(SelectInner {
                doc: doc.clone(),
                label: label.unwrap_or_else(|| name.clone()),
                name,
                options,
                attrs: Attributes {
                    id: id_attribute,
                    text: text_attribute,
                    disabled: disabled_attribute,
                },
                yield_model,
                unselected_text: unselected_text.filter(|t| !t.is_empty()),
                eager_validate,
                template,
                value: Value::Null,
                starting_value: Value::Null,
                validation: ValidationState::new(
                    required,
                    required_message,
                    valid_class,
                    invalid_class,
                ),
                el,
                label_el: None,
                select: None,
                rendered: false,
                parent,
                before_submit,
                change_listener: None,
                subscription: None,
            })),
        };

        let starting = view.set_value_with(value, !eager_validate, true)?;
        view.write().starting_value = starting;

        if auto_render {
            view.render()?;
        }
        Ok(view)
    }

    fn read(&self) -> RwLockReadGuard<'_, SelectInner> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SelectInner> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn from_weak(weak: &Weak<RwLock<SelectInner>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Build the field from its template. Calling it again does nothing.
    ///
    /// A failed render leaves the view unrendered: the parsed template is
    /// discarded and its listener removed, so a later call starts afresh.
    pub fn render(&self) -> Result<()> {
        let mut guard = self.write();
        let inner = &mut *guard;
        if inner.rendered {
            return Ok(());
        }
        let doc = inner.doc.clone();
        let host = inner.el;

        let fragment = doc.parse(&inner.template)?;
        if let Err(err) = inner.mount(fragment, Arc::downgrade(&self.inner)) {
            if let Some(listener) = inner.change_listener.take() {
                doc.remove_listener(listener);
            }
            inner.el = host;
            inner.label_el = None;
            inner.select = None;
            if let Err(cleanup) = doc.discard(fragment) {
                log::warn!("SelectView failed to discard template: {cleanup}");
            }
            log::debug!("SelectView::render name={} failed: {err}", inner.name);
            return Err(err);
        }

        if let OptionSource::Collection(coll) = &inner.options {
            let weak = Arc::downgrade(&self.inner);
            inner.subscription = Some(coll.subscribe(move |event| {
                log::trace!("SelectView collection event {event:?}");
                if let Some(view) = Self::from_weak(&weak)
                    && let Err(err) = view.options_changed()
                {
                    log::warn!("SelectView failed to follow option change: {err}");
                }
            }));
        }
        inner.rendered = true;

        log::debug!(
            "SelectView::render name={} el={:?} select={:?} value={}",
            inner.name,
            inner.el,
            inner.select,
            inner.value
        );
        Ok(())
    }

    /// React to the collection changing: re-render, then keep the value if it
    /// still exists or fall back to the first remaining option.
    fn options_changed(&self) -> Result<()> {
        let fallback = {
            let inner = self.read();
            inner.render_options()?;

            let still_present = match &inner.value {
                Value::Null if inner.unselected_text.is_some() => true,
                value => inner.has_option_by_value(value),
            };
            if still_present {
                inner.sync_from_value()?;
                None
            } else {
                inner.options.first_value(&inner.attrs, inner.yield_model)
            }
        };

        if let Some(first) = fallback {
            self.set_value(first)?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Value
    // -------------------------------------------------------------------------

    /// Set the value, showing the validation message if the field is invalid.
    pub fn set_value(&self, candidate: impl Into<Value>) -> Result<Value> {
        self.set_value_with(candidate, false, false)
    }

    /// Resolve, commit, validate and display a new value, then notify the parent.
    ///
    /// A candidate without a matching option is rejected before anything
    /// changes. When the value is committed but has no rendered option (e.g.
    /// clearing a field without a placeholder) the error is returned after the
    /// commit and the parent is not notified.
    pub fn set_value_with(
        &self,
        candidate: impl Into<Value>,
        hide_message: bool,
        init: bool,
    ) -> Result<Value> {
        let candidate = candidate.into();
        let (value, parent) = {
            let mut inner = self.write();
            let value = inner.resolve(&candidate, init)?;
            inner.value = value.clone();
            inner.validate(hide_message)?;
            inner.sync_from_value()?;
            log::debug!("SelectView::set_value name={} value={}", inner.name, value);
            (value, inner.parent())
        };

        if let Some(parent) = parent {
            parent.update(self);
        }
        Ok(value)
    }

    /// Select the null option without showing a message.
    ///
    /// Fails when there is no placeholder or null-valued option to select;
    /// the value is null afterwards either way.
    pub fn clear(&self) -> Result<()> {
        self.set_value_with(Value::Null, true, false)?;
        Ok(())
    }

    /// Restore the value resolved at construction.
    pub fn reset(&self) -> Result<Value> {
        let starting = self.read().starting_value.clone();
        self.set_value_with(starting, true, false)
    }

    /// Re-read the native selection and commit it.
    fn commit_native_selection(&self) -> Result<Value> {
        let candidate = self.read().native_candidate();
        match candidate {
            Some(candidate) => self.set_value(candidate),
            None => Ok(self.value()),
        }
    }

    /// Called by the containing form right before it submits.
    pub fn before_submit(&self) -> Result<()> {
        let hook = self.read().before_submit.clone();
        if let Some(hook) = hook {
            return hook(self);
        }
        self.commit_native_selection()?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Re-run validation and show the outcome.
    pub fn validate(&self) -> Result<bool> {
        self.write().validate(false)
    }

    pub fn is_valid(&self) -> bool {
        self.read().validation.is_valid()
    }

    /// The message shown while invalid.
    pub fn error(&self) -> Option<String> {
        self.read().validation.error().map(String::from)
    }

    pub fn required(&self) -> bool {
        self.read().validation.required
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// Canonical value for a candidate, or a lookup error.
    pub fn option_by_value(&self, candidate: impl Into<Value>) -> Result<Value> {
        self.read().option_by_value(&candidate.into())
    }

    pub fn has_option_by_value(&self, candidate: impl Into<Value>) -> bool {
        self.read().has_option_by_value(&candidate.into())
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    /// Detach the field from its parent node and release every listener and
    /// collection subscription.
    pub fn remove(&self) -> Result<()> {
        let mut inner = self.write();
        let doc = inner.doc.clone();

        if let Some(el) = inner.el {
            doc.detach(el)?;
        }
        if let Some(listener) = inner.change_listener.take() {
            doc.remove_listener(listener);
        }
        if let Some(subscription) = inner.subscription.take()
            && let Some(coll) = inner.options.as_collection()
        {
            coll.unsubscribe(subscription);
        }
        log::debug!("SelectView::remove name={}", inner.name);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn value(&self) -> Value {
        self.read().value.clone()
    }

    pub fn starting_value(&self) -> Value {
        self.read().starting_value.clone()
    }

    pub fn name(&self) -> String {
        self.read().name.clone()
    }

    pub fn document(&self) -> Document {
        self.read().doc.clone()
    }

    /// Root element, once rendered (or the element supplied in the config).
    pub fn el(&self) -> Option<NodeId> {
        self.read().el
    }

    pub fn select_el(&self) -> Option<NodeId> {
        self.read().select
    }

    pub fn label_el(&self) -> Option<NodeId> {
        self.read().label_el
    }

    pub fn is_rendered(&self) -> bool {
        self.read().rendered
    }

    pub fn options(&self) -> OptionSource {
        self.read().options.clone()
    }
}
