//! Error types for template parsing and tree manipulation.

/// Errors produced by the element tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The template contained no elements.
    #[error("template contains no elements")]
    EmptyTemplate,

    /// A tag was opened but never closed.
    #[error("unclosed <{tag}> in template")]
    UnclosedTag { tag: String },

    /// A closing tag did not match the innermost open tag.
    #[error("expected </{expected}>, found </{found}>")]
    MismatchedTag { expected: String, found: String },

    /// A tag could not be parsed.
    #[error("malformed tag at byte {offset}")]
    MalformedTag { offset: usize },

    /// A node cannot be appended into its own subtree.
    #[error("cannot append a node into its own subtree")]
    HierarchyRequest,

    /// The node id does not belong to this document.
    #[error("unknown node {0}")]
    UnknownNode(usize),
}

pub type Result<T> = std::result::Result<T, DomError>;
