use hookdom::{Document, DomError, Element, EventKind};

const FIELD_TEMPLATE: &str = r#"
<label class="select">
    <span data-hook="label"></span>
    <select></select>
    <span data-hook="message-container" class="message message-below message-error">
        <p data-hook="message-text"></p>
    </span>
</label>
"#;

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_single_root() {
    let doc = Document::new();
    let root = doc.parse(FIELD_TEMPLATE).unwrap();

    assert_eq!(doc.tag_name(root).as_deref(), Some("LABEL"));
    assert!(doc.has_class(root, "select"));
    assert_eq!(doc.children(root).len(), 3);
}

#[test]
fn test_parse_multiple_roots_wraps_in_div() {
    let doc = Document::new();
    let root = doc.parse("<span>a</span><span>b</span>").unwrap();

    assert_eq!(doc.tag_name(root).as_deref(), Some("DIV"));
    assert_eq!(doc.children(root).len(), 2);
    assert_eq!(doc.text_content(root), "ab");
}

#[test]
fn test_parse_empty_template() {
    let doc = Document::new();
    assert_eq!(doc.parse("   "), Err(DomError::EmptyTemplate));
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_query_hook_matches_word_in_list() {
    let doc = Document::new();
    let root = doc
        .parse(r#"<div><p data-hook="intro message-text">hi</p></div>"#)
        .unwrap();

    let found = doc.query_hook(root, "message-text").unwrap();
    assert_eq!(doc.text_content(found), "hi");
    assert!(doc.query_hook(root, "message").is_none());
}

#[test]
fn test_query_tag_excludes_root() {
    let doc = Document::new();
    let root = doc.parse("<select><option>a</option></select>").unwrap();

    assert!(doc.query_tag(root, "select").is_none());
    assert!(doc.matches_tag(root, "select"));
    assert_eq!(doc.query_tag_all(root, "option").len(), 1);
}

// ============================================================================
// Tree mutation
// ============================================================================

#[test]
fn test_append_and_detach() {
    let doc = Document::new();
    let parent = doc.create(Element::div());
    let child = doc.create(Element::div());

    doc.append_child(parent, child).unwrap();
    assert_eq!(doc.parent(child), Some(parent));
    assert_eq!(doc.children(parent), vec![child]);

    doc.detach(child).unwrap();
    assert_eq!(doc.parent(child), None);
    assert!(doc.children(parent).is_empty());

    // Detaching a parentless node is a no-op
    doc.detach(child).unwrap();
}

#[test]
fn test_append_into_own_subtree_fails() {
    let doc = Document::new();
    let outer = doc.create(Element::div());
    let inner = doc.create(Element::div());
    doc.append_child(outer, inner).unwrap();

    assert_eq!(doc.append_child(inner, outer), Err(DomError::HierarchyRequest));
}

#[test]
fn test_set_text_and_classes() {
    let doc = Document::new();
    let root = doc.parse(FIELD_TEMPLATE).unwrap();
    let label = doc.query_hook(root, "label").unwrap();

    doc.set_text(label, "Choose a word").unwrap();
    assert_eq!(doc.text_content(label), "Choose a word");
    doc.set_text(label, "").unwrap();
    assert_eq!(doc.text_content(label), "");

    doc.add_class(root, "input-valid").unwrap();
    doc.add_class(root, "input-valid").unwrap();
    assert_eq!(doc.attribute(root, "class").as_deref(), Some("select input-valid"));
    doc.remove_class(root, "input-valid").unwrap();
    assert!(!doc.has_class(root, "input-valid"));

    doc.hide(label).unwrap();
    assert!(doc.is_hidden(label));
    doc.show(label).unwrap();
    assert!(!doc.is_hidden(label));
}

// ============================================================================
// Native select
// ============================================================================

#[test]
fn test_select_defaults_to_first_option() {
    let doc = Document::new();
    let select = doc.create(
        Element::select()
            .child(Element::option("one", "Option One"))
            .child(Element::option("two", "Option Two").disabled(true)),
    );

    assert_eq!(doc.selected_index(select), Some(0));
    assert_eq!(doc.selected_value(select).as_deref(), Some("one"));

    let options = doc.options(select);
    assert_eq!(doc.option_text(options[1]), "Option Two");
    assert!(doc.option_disabled(options[1]));
    assert!(!doc.option_disabled(options[0]));
}

#[test]
fn test_select_index_out_of_range_deselects() {
    let doc = Document::new();
    let select = doc.create(Element::select().child(Element::option("a", "A")));

    doc.set_selected_index(select, Some(5)).unwrap();
    assert_eq!(doc.selected_index(select), None);
    assert_eq!(doc.selected_value(select), None);
}

#[test]
fn test_option_value_falls_back_to_text() {
    let doc = Document::new();
    let select = doc.parse("<select><option>plain</option></select>").unwrap();
    let option = doc.options(select)[0];

    assert_eq!(doc.option_value(option).as_deref(), Some("plain"));
}

#[test]
fn test_clear_children_resets_selection() {
    let doc = Document::new();
    let select = doc.create(
        Element::select()
            .child(Element::option("a", "A"))
            .child(Element::option("b", "B")),
    );
    doc.set_selected_index(select, Some(1)).unwrap();

    doc.clear_children(select).unwrap();
    assert!(doc.options(select).is_empty());
    assert_eq!(doc.selected_index(select), None);
}

// ============================================================================
// Node reclamation
// ============================================================================

#[test]
fn test_clear_children_frees_nodes() {
    let doc = Document::new();
    let select = doc.create(Element::select());
    let base = doc.node_count();

    for _ in 0..100 {
        doc.clear_children(select).unwrap();
        for i in 0..3 {
            let option = doc.create(Element::option(i.to_string(), format!("Option {i}")));
            doc.append_child(select, option).unwrap();
        }
    }

    // Three options, each with its text node
    assert_eq!(doc.node_count(), base + 6);
    assert_eq!(doc.options(select).len(), 3);
}

#[test]
fn test_set_text_frees_old_text() {
    let doc = Document::new();
    let root = doc.parse(FIELD_TEMPLATE).unwrap();
    let text = doc.query_hook(root, "message-text").unwrap();
    doc.set_text(text, "Selection required").unwrap();
    let base = doc.node_count();

    for round in 0..50 {
        doc.set_text(text, format!("round {round}")).unwrap();
    }

    assert_eq!(doc.node_count(), base);
    assert_eq!(doc.text_content(text), "round 49");
}

#[test]
fn test_stale_handle_does_not_resolve() {
    let doc = Document::new();
    let parent = doc.create(Element::div());
    let child = doc.create(Element::new("span"));
    doc.append_child(parent, child).unwrap();

    doc.clear_children(parent).unwrap();
    let reused = doc.create(Element::new("p"));

    assert_ne!(reused, child);
    assert_eq!(doc.tag_name(child), None);
    assert!(matches!(
        doc.append_child(parent, child),
        Err(DomError::UnknownNode(_))
    ));
    assert_eq!(doc.tag_name(reused).as_deref(), Some("P"));
}

#[test]
fn test_discard_frees_subtree_and_listeners() {
    let doc = Document::new();
    let form = doc.create(Element::div());
    let field = doc.parse(FIELD_TEMPLATE).unwrap();
    doc.append_child(form, field).unwrap();
    let select = doc.query_tag(field, "select").unwrap();
    doc.add_listener(select, EventKind::Change, |_| {});

    doc.discard(field).unwrap();

    assert!(doc.children(form).is_empty());
    assert_eq!(doc.node_count(), 1);
    assert_eq!(doc.listener_count(select), 0);
    assert!(doc.discard(field).is_err());
}

// ============================================================================
// Builders
// ============================================================================

#[test]
fn test_create_from_builder() {
    let doc = Document::new();
    let root = doc.create(
        Element::div()
            .class("field")
            .class("field")
            .child(Element::new("p").hook("message-text").hidden(true))
            .child(Element::select().attr("name", "word").children([
                Element::option("a", "Alpha"),
                Element::option("b", "Beta").disabled(true),
            ])),
    );

    assert!(doc.has_class(root, "field"));
    let message = doc.query_hook(root, "message-text").unwrap();
    assert!(doc.is_hidden(message));

    let select = doc.query_tag(root, "select").unwrap();
    assert_eq!(doc.attribute(select, "name").as_deref(), Some("word"));
    let options = doc.options(select);
    assert_eq!(options.len(), 2);
    assert!(!doc.option_disabled(options[0]));
    assert!(doc.option_disabled(options[1]));
    assert_eq!(doc.option_text(options[1]), "Beta");
}

#[test]
fn test_text_element() {
    let text = Element::text("hello");
    assert!(text.is_text());
    assert!(!Element::div().is_text());

    let doc = Document::new();
    let node = doc.create(Element::new("span").child(text));
    assert_eq!(doc.text_content(node), "hello");
}
