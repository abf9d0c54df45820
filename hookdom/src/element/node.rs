use std::collections::BTreeMap;

use super::Content;

/// Tag used for bare text nodes.
pub const TEXT_TAG: &str = "#text";

/// A detached element description.
///
/// Elements are plain values built up with the builder methods below and then
/// materialized into a [`Document`](crate::Document) with `Document::create`.
/// Templates parse into the same representation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: Vec<String>,
    pub hidden: bool,
    pub content: Content,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn select() -> Self {
        Self::new("select")
    }

    /// Create an `<option>` with the given value and label.
    pub fn option(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new("option").attr("value", value).child(Self::text(label))
    }

    /// Create a bare text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            tag: TEXT_TAG.into(),
            content: Content::Text(content.into()),
            ..Default::default()
        }
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if name == "class" {
            self.classes = value.split_whitespace().map(String::from).collect();
        } else {
            self.attributes.insert(name, value);
        }
        self
    }

    /// Shorthand for the `data-hook` naming attribute.
    pub fn hook(self, hook: impl Into<String>) -> Self {
        self.attr("data-hook", hook)
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn disabled(self, disabled: bool) -> Self {
        if disabled {
            self.attr("disabled", "")
        } else {
            self
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&String> {
        self.attributes.get(name)
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            Content::None => self.content = Content::Children(vec![child]),
            Content::Text(text) => {
                let text = Element::text(std::mem::take(text));
                self.content = Content::Children(vec![text, child]);
            }
        }
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        for child in new_children {
            self = self.child(child);
        }
        self
    }
}
