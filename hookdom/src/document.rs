//! Shared element tree.
//!
//! A [`Document`] owns every node it creates in an arena and hands out
//! [`NodeId`] handles. The handle is cheap to clone and can be captured by
//! event listeners; listeners run after the arena lock is released, so they
//! are free to mutate the tree they were dispatched from.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::element::{Content, Element, TEXT_TAG};
use crate::error::{DomError, Result};
use crate::event::{Event, EventKind, Handler, Listener, ListenerId};
use crate::template;

static NEXT_LISTENER: AtomicU64 = AtomicU64::new(0);

/// Handle of a node inside a [`Document`].
///
/// Slots of discarded nodes are reused; the generation keeps a stale handle
/// from reaching the node that took its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node-{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    hidden: bool,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Explicit selection of a `<select>`; `None` falls back to the first option.
    selected: Option<usize>,
}

#[derive(Default)]
struct Slot {
    generation: u32,
    data: Option<NodeData>,
}

#[derive(Default)]
struct Arena {
    slots: Vec<Slot>,
    free: Vec<usize>,
    listeners: Vec<Listener>,
}

impl Arena {
    fn node(&self, id: NodeId) -> Result<&NodeData> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_ref())
            .ok_or(DomError::UnknownNode(id.index))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_mut())
            .ok_or(DomError::UnknownNode(id.index))
    }

    fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.data = Some(data);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            data: Some(data),
        });
        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Free a subtree and every listener attached inside it. The caller
    /// unlinks `root` from its parent first.
    fn release(&mut self, root: NodeId) {
        let mut pending = vec![root];
        let mut released = Vec::new();
        while let Some(id) = pending.pop() {
            let Some(slot) = self
                .slots
                .get_mut(id.index)
                .filter(|slot| slot.generation == id.generation)
            else {
                continue;
            };
            let Some(data) = slot.data.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            pending.extend(data.children);
            released.push(id);
        }
        self.listeners.retain(|l| !released.contains(&l.node));
    }

    fn insert(&mut self, element: Element, parent: Option<NodeId>) -> NodeId {
        let Element {
            tag,
            attributes,
            classes,
            hidden,
            content,
        } = element;

        let mut data = NodeData {
            tag,
            attributes,
            classes,
            hidden,
            parent,
            ..Default::default()
        };
        let children = match content {
            Content::None => Vec::new(),
            Content::Text(text) if data.tag == TEXT_TAG => {
                data.text = Some(text);
                Vec::new()
            }
            Content::Text(text) => vec![Element::text(text)],
            Content::Children(children) => children,
        };
        let id = self.alloc(data);

        let child_ids: Vec<NodeId> = children
            .into_iter()
            .map(|child| self.insert(child, Some(id)))
            .collect();
        if let Ok(node) = self.node_mut(id) {
            node.children = child_ids;
        }
        id
    }

    fn text_content(&self, id: NodeId) -> String {
        let Ok(node) = self.node(id) else {
            return String::new();
        };
        if let Some(text) = &node.text {
            return text.clone();
        }
        node.children
            .iter()
            .map(|child| self.text_content(*child))
            .collect()
    }

    fn find_descendants(&self, root: NodeId, pred: &dyn Fn(&NodeData) -> bool, out: &mut Vec<NodeId>) {
        let Ok(node) = self.node(root) else {
            return;
        };
        for child in &node.children {
            if self.node(*child).is_ok_and(pred) {
                out.push(*child);
            }
            self.find_descendants(*child, pred, out);
        }
    }

    fn options(&self, select: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.find_descendants(select, &|n: &NodeData| n.tag == "option", &mut out);
        out
    }

    fn option_value(&self, option: NodeId) -> Option<String> {
        let node = self.node(option).ok()?;
        match node.attributes.get("value") {
            Some(value) => Some(value.clone()),
            None => Some(self.text_content(option)),
        }
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).ok().and_then(|n| n.parent)
    }

    fn is_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        while let Some(parent) = self.parent_of(node) {
            if parent == ancestor {
                return true;
            }
            node = parent;
        }
        false
    }
}

/// Shared in-memory element tree.
#[derive(Clone, Default)]
pub struct Document {
    inner: Arc<RwLock<Arena>>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arena = self.read();
        f.debug_struct("Document")
            .field("nodes", &arena.live_count())
            .field("listeners", &arena.listeners.len())
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Arena> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Arena> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Materialize an element description as a new detached subtree.
    pub fn create(&self, element: Element) -> NodeId {
        self.write().insert(element, None)
    }

    /// Parse a template into a new detached subtree.
    ///
    /// A template with several top-level elements is wrapped in a `<div>`.
    pub fn parse(&self, markup: &str) -> Result<NodeId> {
        let mut roots = template::parse(markup)?;
        let root = match roots.len() {
            0 => return Err(DomError::EmptyTemplate),
            1 => roots.remove(0),
            _ => Element::div().children(roots),
        };
        let id = self.create(root);
        log::debug!("Document::parse root={id}");
        Ok(id)
    }

    // -------------------------------------------------------------------------
    // Tree structure
    // -------------------------------------------------------------------------

    /// Move `child` (and its subtree) under `parent`.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let mut arena = self.write();
        arena.node(parent)?;
        let old_parent = arena.node(child)?.parent;
        if child == parent || arena.is_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        if let Some(old) = old_parent {
            arena.node_mut(old)?.children.retain(|c| *c != child);
        }
        arena.node_mut(child)?.parent = Some(parent);
        arena.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Detach a node from its parent. Does nothing for a parentless node.
    pub fn detach(&self, node: NodeId) -> Result<()> {
        let mut arena = self.write();
        let Some(parent) = arena.node(node)?.parent else {
            return Ok(());
        };
        arena.node_mut(parent)?.children.retain(|c| *c != node);
        arena.node_mut(node)?.parent = None;
        Ok(())
    }

    /// Remove every child of a node (`innerHTML = ''`). The removed
    /// subtrees are freed and their ids stop resolving.
    pub fn clear_children(&self, node: NodeId) -> Result<()> {
        let mut arena = self.write();
        let data = arena.node_mut(node)?;
        let children = std::mem::take(&mut data.children);
        data.selected = None;
        for child in children {
            arena.release(child);
        }
        Ok(())
    }

    /// Detach a node and free its whole subtree, listeners included.
    pub fn discard(&self, node: NodeId) -> Result<()> {
        let mut arena = self.write();
        if let Some(parent) = arena.node(node)?.parent {
            arena.node_mut(parent)?.children.retain(|c| *c != node);
        }
        arena.release(node);
        log::trace!("Document::discard {node}");
        Ok(())
    }

    /// Number of live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.read().live_count()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.read().node(node).ok()?.parent
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.read()
            .node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Node properties
    // -------------------------------------------------------------------------

    /// Upper-cased tag name, like the platform reports it.
    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.read().node(node).ok().map(|n| n.tag.to_ascii_uppercase())
    }

    pub fn matches_tag(&self, node: NodeId, tag: &str) -> bool {
        self.read()
            .node(node)
            .is_ok_and(|n| n.tag.eq_ignore_ascii_case(tag))
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let arena = self.read();
        let data = arena.node(node).ok()?;
        if name == "class" {
            return Some(data.classes.join(" "));
        }
        data.attributes.get(name).cloned()
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
        let mut arena = self.write();
        let data = arena.node_mut(node)?;
        let value = value.into();
        if name == "class" {
            data.classes = value.split_whitespace().map(String::from).collect();
        } else {
            data.attributes.insert(name.to_string(), value);
        }
        Ok(())
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.read().text_content(node)
    }

    /// Replace the children of a node with a single text node.
    pub fn set_text(&self, node: NodeId, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        let mut arena = self.write();
        if arena.node(node)?.tag == TEXT_TAG {
            arena.node_mut(node)?.text = Some(text);
            return Ok(());
        }
        let old = std::mem::take(&mut arena.node_mut(node)?.children);
        for child in old {
            arena.release(child);
        }
        if !text.is_empty() {
            let child = arena.insert(Element::text(text), Some(node));
            arena.node_mut(node)?.children.push(child);
        }
        Ok(())
    }

    pub fn add_class(&self, node: NodeId, class: &str) -> Result<()> {
        let mut arena = self.write();
        let data = arena.node_mut(node)?;
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.to_string());
        }
        Ok(())
    }

    pub fn remove_class(&self, node: NodeId, class: &str) -> Result<()> {
        self.write().node_mut(node)?.classes.retain(|c| c != class);
        Ok(())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.read()
            .node(node)
            .is_ok_and(|n| n.classes.iter().any(|c| c == class))
    }

    pub fn hide(&self, node: NodeId) -> Result<()> {
        self.write().node_mut(node)?.hidden = true;
        Ok(())
    }

    pub fn show(&self, node: NodeId) -> Result<()> {
        self.write().node_mut(node)?.hidden = false;
        Ok(())
    }

    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.read().node(node).is_ok_and(|n| n.hidden)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// First descendant with the given tag (the root itself is not considered).
    pub fn query_tag(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        self.query_tag_all(root, tag).into_iter().next()
    }

    pub fn query_tag_all(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        let tag = tag.to_ascii_lowercase();
        let mut out = Vec::new();
        self.read()
            .find_descendants(root, &|n: &NodeData| n.tag == tag, &mut out);
        out
    }

    /// First descendant whose `data-hook` list contains `hook` (`[data-hook~=hook]`).
    pub fn query_hook(&self, root: NodeId, hook: &str) -> Option<NodeId> {
        let mut out = Vec::new();
        self.read().find_descendants(
            root,
            &|n: &NodeData| {
                n.attributes
                    .get("data-hook")
                    .is_some_and(|hooks| hooks.split_whitespace().any(|h| h == hook))
            },
            &mut out,
        );
        out.into_iter().next()
    }

    // -------------------------------------------------------------------------
    // Native select state
    // -------------------------------------------------------------------------

    /// `<option>` descendants of a select, in document order.
    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.read().options(select)
    }

    /// The `value` attribute of an option, falling back to its text.
    pub fn option_value(&self, option: NodeId) -> Option<String> {
        self.read().option_value(option)
    }

    pub fn option_text(&self, option: NodeId) -> String {
        self.text_content(option)
    }

    pub fn option_disabled(&self, option: NodeId) -> bool {
        self.read()
            .node(option)
            .is_ok_and(|n| n.attributes.contains_key("disabled"))
    }

    /// Selected index of a select; the first option when nothing was chosen yet.
    pub fn selected_index(&self, select: NodeId) -> Option<usize> {
        let arena = self.read();
        let count = arena.options(select).len();
        let explicit = arena.node(select).ok()?.selected;
        match explicit {
            Some(index) if index < count => Some(index),
            Some(_) => None,
            None if count > 0 => Some(0),
            None => None,
        }
    }

    pub fn set_selected_index(&self, select: NodeId, index: Option<usize>) -> Result<()> {
        let mut arena = self.write();
        let count = arena.options(select).len();
        let index = index.filter(|i| *i < count);
        arena.node_mut(select)?.selected = index;
        Ok(())
    }

    /// The option node currently selected.
    pub fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        let index = self.selected_index(select)?;
        self.options(select).get(index).copied()
    }

    /// The value of the currently selected option.
    pub fn selected_value(&self, select: NodeId) -> Option<String> {
        let option = self.selected_option(select)?;
        self.option_value(option)
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    pub fn add_listener(
        &self,
        node: NodeId,
        kind: EventKind,
        handler: impl Fn(&Event) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(NEXT_LISTENER.fetch_add(1, Ordering::Relaxed));
        self.write().listeners.push(Listener {
            id,
            node,
            kind,
            handler: Arc::new(handler),
        });
        log::trace!("Document::add_listener {id} on {node} kind={kind:?}");
        id
    }

    /// Remove a listener. Returns false when it was already gone.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut arena = self.write();
        let before = arena.listeners.len();
        arena.listeners.retain(|l| l.id != id);
        let removed = arena.listeners.len() != before;
        log::trace!("Document::remove_listener {id} removed={removed}");
        removed
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.read()
            .listeners
            .iter()
            .filter(|l| l.node == node)
            .count()
    }

    /// Dispatch an event to its target and then every ancestor.
    pub fn dispatch(&self, event: Event) {
        let handlers: Vec<Handler> = {
            let arena = self.read();
            let mut path = vec![event.target()];
            let mut current = event.target();
            while let Some(parent) = arena.parent_of(current) {
                path.push(parent);
                current = parent;
            }
            let kind = event.kind();
            let mut handlers = Vec::new();
            for node in path {
                for listener in &arena.listeners {
                    if listener.node == node && listener.kind == kind {
                        handlers.push(Arc::clone(&listener.handler));
                    }
                }
            }
            handlers
        };

        log::trace!("Document::dispatch {event:?} handlers={}", handlers.len());
        for handler in handlers {
            handler(&event);
        }
    }

    /// Select an option the way a user would, then fire `change`.
    pub fn choose(&self, select: NodeId, index: usize) -> Result<()> {
        self.set_selected_index(select, Some(index))?;
        self.dispatch(Event::Change { target: select });
        Ok(())
    }
}
