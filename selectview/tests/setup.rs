use hookdom::{Document, DomError, Element};
use selectview::{ConfigError, OptionSource, SelectConfig, SelectError, SelectView, Value};

fn words() -> OptionSource {
    OptionSource::scalars(["foo", "bar", "baz"])
}

fn rendered(config: SelectConfig) -> (Document, SelectView) {
    let doc = Document::new();
    let view = SelectView::new(&doc, config.auto_render(true)).unwrap();
    (doc, view)
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_requires_name() {
    let doc = Document::new();
    let result = SelectView::new(&doc, SelectConfig::new("  ", words()));
    assert!(matches!(
        result,
        Err(SelectError::Config(ConfigError::MissingName))
    ));
}

#[test]
fn test_rejects_blank_collection_attributes() {
    let doc = Document::new();
    let config = SelectConfig::new("word", selectview::Collection::default()).id_attribute("");
    assert!(matches!(
        SelectView::new(&doc, config),
        Err(SelectError::Config(ConfigError::InvalidOptions { .. }))
    ));
}

#[test]
fn test_rejects_unknown_initial_value() {
    let doc = Document::new();
    let result = SelectView::new(&doc, SelectConfig::new("word", words()).value("qux"));
    assert!(result.is_err_and(|err| err.is_lookup()));
}

#[test]
fn test_empty_option_set() {
    let doc = Document::new();

    let view = SelectView::new(&doc, SelectConfig::new("num", OptionSource::Scalars(vec![])))
        .unwrap();
    assert!(view.is_valid(), "empty, non-required option set is valid");

    let view = SelectView::new(
        &doc,
        SelectConfig::new("num", OptionSource::Scalars(vec![])).required(true),
    )
    .unwrap();
    assert!(!view.is_valid(), "empty, required option set is invalid");
    assert_eq!(view.value(), Value::Null);
}

#[test]
fn test_initial_value_defaults_to_first_option() {
    let doc = Document::new();
    let view = SelectView::new(&doc, SelectConfig::new("word", words())).unwrap();
    assert_eq!(view.value(), Value::from("foo"));
    assert_eq!(view.starting_value(), Value::from("foo"));
    assert!(!view.is_rendered());
}

#[test]
fn test_initial_value_stays_null_with_placeholder() {
    let doc = Document::new();
    let view = SelectView::new(
        &doc,
        SelectConfig::new("word", words()).unselected_text("Please choose:"),
    )
    .unwrap();
    assert_eq!(view.value(), Value::Null);
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_autorenders_on_init() {
    let (doc, view) = rendered(SelectConfig::new("word", words()).label("Choose a word"));
    let el = view.el().unwrap();

    assert!(view.is_rendered());
    assert_eq!(doc.query_tag(el, "select"), view.select_el());
}

#[test]
fn test_renders_label_text() {
    let (doc, view) = rendered(SelectConfig::new("word", words()).label("Choose a word"));
    let label = doc.query_hook(view.el().unwrap(), "label").unwrap();

    assert_eq!(view.label_el(), Some(label));
    assert_eq!(doc.text_content(label), "Choose a word");
}

#[test]
fn test_label_text_falls_back_to_name() {
    let (doc, view) = rendered(SelectConfig::new("word", OptionSource::Scalars(vec![])));
    let label = view.label_el().unwrap();
    assert_eq!(doc.text_content(label), "word");
}

#[test]
fn test_works_with_bare_select_template() {
    let doc = Document::new();
    let view = SelectView::new(
        &doc,
        SelectConfig::new("word", words()).template("<select></select>"),
    )
    .unwrap();
    view.render().unwrap();

    let el = view.el().unwrap();
    assert_eq!(doc.tag_name(el).as_deref(), Some("SELECT"));
    assert_eq!(view.select_el(), Some(el));
    assert_eq!(view.label_el(), None);
    assert_eq!(doc.options(el).len(), 3);
}

#[test]
fn test_sets_name_on_select() {
    let (doc, view) = rendered(SelectConfig::new("word", OptionSource::Scalars(vec![])));
    let select = view.select_el().unwrap();
    assert_eq!(doc.attribute(select, "name").as_deref(), Some("word"));
}

#[test]
fn test_template_without_select_fails() {
    let doc = Document::new();
    let result = SelectView::new(
        &doc,
        SelectConfig::new("word", words())
            .template("<div><span data-hook=\"label\"></span></div>")
            .auto_render(true),
    );
    assert!(matches!(result, Err(SelectError::NoSelect)));
}

#[test]
fn test_malformed_template_fails() {
    let doc = Document::new();
    let view = SelectView::new(&doc, SelectConfig::new("word", words()).template("<div>")).unwrap();
    assert_eq!(
        view.render(),
        Err(SelectError::Dom(DomError::UnclosedTag { tag: "div".into() }))
    );
}

#[test]
fn test_failed_render_leaves_nothing_behind() {
    let doc = Document::new();
    let host = doc.create(Element::div());
    let view = SelectView::new(
        &doc,
        SelectConfig::new("word", OptionSource::scalars(["one", "two"]))
            .value("two")
            .el(host),
    )
    .unwrap();
    // Nothing rendered yet, so the empty value is accepted
    view.clear().unwrap();
    let nodes = doc.node_count();

    for _ in 0..2 {
        assert!(matches!(
            view.render(),
            Err(SelectError::NoOptionForValue { .. })
        ));
        assert!(!view.is_rendered());
        assert_eq!(view.el(), Some(host));
        assert_eq!(view.select_el(), None);
        assert!(doc.children(host).is_empty());
        assert_eq!(doc.listener_count(host), 0);
        assert_eq!(doc.node_count(), nodes);
    }

    view.set_value("one").unwrap();
    view.render().unwrap();
    assert_eq!(doc.query_tag_all(host, "select").len(), 1);
    assert_eq!(doc.listener_count(host), 1);
    assert_eq!(doc.selected_value(view.select_el().unwrap()).as_deref(), Some("one"));
}

#[test]
fn test_failed_render_without_host_resets_root() {
    let doc = Document::new();
    let view = SelectView::new(
        &doc,
        SelectConfig::new("word", words()).template("<div><span data-hook=\"label\"></span></div>"),
    )
    .unwrap();
    let nodes = doc.node_count();

    assert!(matches!(view.render(), Err(SelectError::NoSelect)));
    assert_eq!(view.el(), None);
    assert_eq!(view.label_el(), None);
    assert_eq!(doc.node_count(), nodes);
}

#[test]
fn test_render_is_idempotent() {
    let (doc, view) = rendered(SelectConfig::new("word", words()));
    let el = view.el().unwrap();

    view.render().unwrap();

    assert_eq!(view.el(), Some(el));
    assert_eq!(doc.options(view.select_el().unwrap()).len(), 3);
    assert_eq!(doc.listener_count(el), 1);
    assert_eq!(doc.query_tag_all(el, "select").len(), 1);
}

#[test]
fn test_renders_into_supplied_element() {
    let doc = Document::new();
    let host = doc.create(Element::div());
    let view = SelectView::new(
        &doc,
        SelectConfig::new("word", words()).el(host).auto_render(true),
    )
    .unwrap();

    assert_eq!(view.el(), Some(host));
    assert_eq!(doc.children(host).len(), 1);
    assert!(doc.query_tag(host, "select").is_some());
}

// ============================================================================
// Validation display
// ============================================================================

#[test]
fn test_message_hidden_without_eager_validation() {
    let (doc, view) = rendered(
        SelectConfig::new("num", words())
            .required(true)
            .unselected_text("default"),
    );
    let el = view.el().unwrap();
    let container = doc.query_hook(el, "message-container").unwrap();

    assert!(!view.is_valid());
    assert!(doc.is_hidden(container));
    assert!(!doc.has_class(el, "input-invalid"));
}

#[test]
fn test_eager_validation_shows_message() {
    let (doc, view) = rendered(
        SelectConfig::new("num", words())
            .eager_validate(true)
            .required(true)
            .unselected_text("default"),
    );
    let el = view.el().unwrap();
    let container = doc.query_hook(el, "message-container").unwrap();
    let text = doc.query_hook(el, "message-text").unwrap();

    assert!(!doc.is_hidden(container));
    assert_eq!(doc.text_content(text), "Selection required");
    assert!(doc.has_class(el, "input-invalid"));
    assert_eq!(view.error().as_deref(), Some("Selection required"));
}

#[test]
fn test_custom_classes_and_message() {
    let (doc, view) = rendered(
        SelectConfig::new("num", words())
            .required(true)
            .unselected_text("default")
            .valid_class("ok")
            .invalid_class("bad")
            .required_message("Pick one"),
    );
    let el = view.el().unwrap();
    let text = doc.query_hook(el, "message-text").unwrap();

    assert!(!view.validate().unwrap());
    assert!(doc.has_class(el, "bad"));
    assert_eq!(doc.text_content(text), "Pick one");

    view.set_value("bar").unwrap();
    assert!(doc.has_class(el, "ok"));
    assert!(!doc.has_class(el, "bad"));
    assert_eq!(doc.text_content(text), "");
}
