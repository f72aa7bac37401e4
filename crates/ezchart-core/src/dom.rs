// File: crates/ezchart-core/src/dom.rs
// Summary: Arena-backed SVG document with d3-style selection helpers, keyed joins and bound data.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use crate::error::{ChartError, Result};
use crate::events::{CustomEvent, Datum, DomEvent};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Handle to an element. A slot freed by `remove` is reused with a new
/// generation, so handles to removed elements never resolve again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Clone, Debug)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    key: Option<String>,
    datum: Option<Datum>,
    listeners: Vec<(DomEvent, CustomEvent)>,
}

impl Element {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
            parent,
            key: None,
            datum: None,
            listeners: Vec::new(),
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class").is_some_and(|c| c.split_whitespace().any(|t| t == class))
    }
}

/// Outcome of [`Document::join`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Join {
    /// One node per key, in key order.
    pub nodes: Vec<NodeId>,
    /// Nodes created by this join.
    pub entered: Vec<NodeId>,
    /// Number of stale nodes removed.
    pub exited: usize,
}

/// Format a coordinate for an attribute: at most 3 decimals, no trailing zeros.
pub fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let r = (v * 1000.0).round() / 1000.0;
    let r = if r == 0.0 { 0.0 } else { r };
    let s = format!("{r:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// A tree of elements rooted at a host container (`div`) that charts mount into.
#[derive(Clone, Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self { Self::new() }
}

impl Document {
    pub fn new() -> Self {
        let root = Slot { generation: 0, element: Some(Element::new("div", None)) };
        Self { slots: vec![root], free: Vec::new(), live: 1, root: NodeId { index: 0, generation: 0 } }
    }

    pub fn root(&self) -> NodeId { self.root }

    pub fn contains(&self, id: NodeId) -> bool { self.get(id).is_some() }

    /// Number of live elements, root included.
    pub fn len(&self) -> usize { self.live }

    pub fn is_empty(&self) -> bool { self.live <= 1 }

    /// Arena slots allocated so far, free ones included.
    pub fn capacity(&self) -> usize { self.slots.len() }

    fn get(&self, id: NodeId) -> Option<&Element> {
        self.slots
            .get(id.index)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.element.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Element> {
        self.slots
            .get_mut(id.index)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.element.as_mut())
            .ok_or(ChartError::MissingNode(id))
    }

    pub fn append(&mut self, parent: NodeId, tag: &str) -> Result<NodeId> {
        if !self.contains(parent) {
            return Err(ChartError::MissingNode(parent));
        }
        let element = Some(Element::new(tag, Some(parent)));
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.element = element;
                NodeId { index, generation: slot.generation }
            }
            None => {
                self.slots.push(Slot { generation: 0, element });
                NodeId { index: self.slots.len() - 1, generation: 0 }
            }
        };
        self.live += 1;
        self.get_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Detach `id` and drop it with all descendants.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Ok(());
        }
        let parent = self.get(id).ok_or(ChartError::MissingNode(id))?.parent;
        if let Some(p) = parent {
            self.get_mut(p)?.children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let Some(slot) = self.slots.get_mut(n.index).filter(|s| s.generation == n.generation) else {
                continue;
            };
            if let Some(el) = slot.element.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(n.index);
                self.live -= 1;
                stack.extend(el.children);
            }
        }
        Ok(())
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> { self.get(id).map(|e| e.tag.as_str()) }
    pub fn parent(&self, id: NodeId) -> Option<NodeId> { self.get(id).and_then(|e| e.parent) }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl ToString) -> Result<()> {
        let value = value.to_string();
        let el = self.get_mut(id)?;
        match el.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => el.attrs.push((name.to_string(), value)),
        }
        Ok(())
    }

    /// Numeric attribute, formatted with [`fmt_num`].
    pub fn set_num(&mut self, id: NodeId, name: &str, value: f64) -> Result<()> {
        self.set_attr(id, name, fmt_num(value))
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Result<()> {
        self.get_mut(id)?.attrs.retain(|(k, _)| k != name);
        Ok(())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id).and_then(|e| e.attr(name))
    }

    pub fn attr_f64(&self, id: NodeId, name: &str) -> Option<f64> {
        self.attr(id, name).and_then(|v| v.parse().ok())
    }

    pub fn classed(&mut self, id: NodeId, class: &str, on: bool) -> Result<()> {
        let el = self.get_mut(id)?;
        let mut tokens: Vec<String> = el
            .attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let present = tokens.iter().any(|t| t == class);
        if on && !present {
            tokens.push(class.to_string());
        } else if !on && present {
            tokens.retain(|t| t != class);
        } else {
            return Ok(());
        }
        if tokens.is_empty() {
            self.remove_attr(id, "class")
        } else {
            self.set_attr(id, "class", tokens.join(" "))
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get(id).is_some_and(|e| e.has_class(class))
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        self.get_mut(id)?.text = Some(text.into());
        Ok(())
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|e| e.text.as_deref())
    }

    pub fn set_datum(&mut self, id: NodeId, datum: Datum) -> Result<()> {
        self.get_mut(id)?.datum = Some(datum);
        Ok(())
    }

    pub fn datum(&self, id: NodeId) -> Option<&Datum> {
        self.get(id).and_then(|e| e.datum.as_ref())
    }

    pub fn key(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|e| e.key.as_deref())
    }

    /// Route DOM event `ev` on `id` to `custom`, replacing an earlier route.
    pub fn on(&mut self, id: NodeId, ev: DomEvent, custom: CustomEvent) -> Result<()> {
        let el = self.get_mut(id)?;
        el.listeners.retain(|(e, _)| *e != ev);
        el.listeners.push((ev, custom));
        Ok(())
    }

    pub fn listener(&self, id: NodeId, ev: DomEvent) -> Option<CustomEvent> {
        self.get(id)
            .and_then(|e| e.listeners.iter().find(|(d, _)| *d == ev))
            .map(|(_, c)| *c)
    }

    /// First direct child of `parent` with `tag` and `class`.
    pub fn select_child(&self, parent: NodeId, tag: &str, class: &str) -> Option<NodeId> {
        self.children(parent).iter().copied().find(|&c| {
            self.get(c).is_some_and(|e| e.tag == tag && e.has_class(class))
        })
    }

    /// Reuse the direct child `tag.class` of `parent` or create it.
    pub fn select_or_append(&mut self, parent: NodeId, tag: &str, class: &str) -> Result<NodeId> {
        if let Some(id) = self.select_child(parent, tag, class) {
            return Ok(id);
        }
        let id = self.append(parent, tag)?;
        self.classed(id, class, true)?;
        Ok(id)
    }

    /// Descendants of `scope` (excluding it) carrying `class`, in document order.
    pub fn select_all(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope).into_iter().filter(|&id| self.has_class(id, class)).collect()
    }

    pub fn find_first(&self, scope: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(scope).into_iter().find(|&id| self.tag(id) == Some(tag))
    }

    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Keyed data join over the `tag.class` children of `parent`: reuses nodes
    /// whose key matches, appends nodes for new keys, removes the rest, and
    /// orders the joined nodes by key order.
    pub fn join<S: AsRef<str>>(&mut self, parent: NodeId, tag: &str, class: &str, keys: &[S]) -> Result<Join> {
        if !self.contains(parent) {
            return Err(ChartError::MissingNode(parent));
        }
        let existing: Vec<NodeId> = self
            .children(parent)
            .iter()
            .copied()
            .filter(|&c| self.get(c).is_some_and(|e| e.tag == tag && e.has_class(class)))
            .collect();
        let insert_at = existing
            .first()
            .and_then(|first| self.children(parent).iter().position(|c| c == first));

        let mut by_key: HashMap<String, NodeId> = HashMap::new();
        let mut stale = Vec::new();
        for id in existing {
            match self.key(id).map(str::to_string) {
                Some(k) if !by_key.contains_key(&k) => { by_key.insert(k, id); }
                _ => stale.push(id),
            }
        }

        // exits go first so entering nodes can take over their slots
        let wanted: HashSet<&str> = keys.iter().map(|k| k.as_ref()).collect();
        by_key.retain(|k, id| {
            let keep = wanted.contains(k.as_str());
            if !keep {
                stale.push(*id);
            }
            keep
        });
        let mut join = Join { exited: stale.len(), ..Join::default() };
        for id in stale {
            self.remove(id)?;
        }

        for k in keys {
            let k = k.as_ref();
            let id = match by_key.remove(k) {
                Some(id) => id,
                None => {
                    let id = self.append(parent, tag)?;
                    self.classed(id, class, true)?;
                    self.get_mut(id)?.key = Some(k.to_string());
                    join.entered.push(id);
                    id
                }
            };
            join.nodes.push(id);
        }

        let ordered = join.nodes.clone();
        let children = &mut self.get_mut(parent)?.children;
        children.retain(|c| !ordered.contains(c));
        let at = insert_at.map(|i| i.min(children.len())).unwrap_or(children.len());
        for (i, id) in ordered.into_iter().enumerate() {
            children.insert(at + i, id);
        }
        Ok(join)
    }

    /// Serialize `id` and its subtree.
    pub fn markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Markup of the first `<svg>` under the root, if any chart has mounted.
    pub fn svg_markup(&self) -> Option<String> {
        self.find_first(self.root, "svg").map(|id| self.markup(id))
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(el) = self.get(id) else { return };
        let _ = write!(out, "<{}", el.tag);
        for (k, v) in &el.attrs {
            let _ = write!(out, " {}=\"{}\"", k, escape(v));
        }
        if el.children.is_empty() && el.text.is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(t) = &el.text {
            out.push_str(&escape(t));
        }
        for &c in &el.children {
            self.write_node(c, out);
        }
        let _ = write!(out, "</{}>", el.tag);
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_num_trims() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(1.23456), "1.235");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(12.5), "12.5");
    }

    #[test]
    fn classed_toggles_tokens() {
        let mut doc = Document::new();
        let g = doc.append(doc.root(), "g").unwrap();
        doc.classed(g, "series", true).unwrap();
        doc.classed(g, "up-day", true).unwrap();
        doc.classed(g, "series", true).unwrap();
        assert_eq!(doc.attr(g, "class"), Some("series up-day"));
        doc.classed(g, "series", false).unwrap();
        assert_eq!(doc.attr(g, "class"), Some("up-day"));
        assert!(doc.has_class(g, "up-day"));
    }

    #[test]
    fn select_or_append_is_idempotent() {
        let mut doc = Document::new();
        let a = doc.select_or_append(doc.root(), "svg", "chart").unwrap();
        let b = doc.select_or_append(doc.root(), "svg", "chart").unwrap();
        assert_eq!(a, b);
        assert_eq!(doc.children(doc.root()).len(), 1);
    }

    #[test]
    fn join_enter_update_exit() {
        let mut doc = Document::new();
        let root = doc.root();
        let first = doc.join(root, "g", "series", &["a", "b", "c"]).unwrap();
        assert_eq!(first.entered.len(), 3);

        let second = doc.join(root, "g", "series", &["c", "a", "d"]).unwrap();
        assert_eq!(second.exited, 1);
        assert_eq!(second.entered.len(), 1);
        // reused nodes keep identity
        assert_eq!(second.nodes[0], first.nodes[2]);
        assert_eq!(second.nodes[1], first.nodes[0]);
        let keys: Vec<_> = doc.children(root).iter().map(|&c| doc.key(c).unwrap()).collect();
        assert_eq!(keys, vec!["c", "a", "d"]);
        assert!(!doc.contains(first.nodes[1]));
    }

    #[test]
    fn join_keeps_unrelated_children_in_place() {
        let mut doc = Document::new();
        let root = doc.root();
        let axis = doc.append(root, "g").unwrap();
        doc.classed(axis, "axis", true).unwrap();
        doc.join(root, "g", "series", &["a"]).unwrap();
        let tail = doc.append(root, "text").unwrap();
        doc.join(root, "g", "series", &["b", "a"]).unwrap();
        let tags: Vec<_> = doc.children(root).iter().map(|&c| doc.key(c).unwrap_or("-")).collect();
        assert_eq!(tags, vec!["-", "b", "a", "-"]);
        assert_eq!(doc.children(root)[3], tail);
    }

    #[test]
    fn markup_escapes_and_self_closes() {
        let mut doc = Document::new();
        let svg = doc.append(doc.root(), "svg").unwrap();
        let t = doc.append(svg, "text").unwrap();
        doc.set_text(t, "a < b & \"c\"").unwrap();
        doc.append(svg, "rect").unwrap();
        assert_eq!(
            doc.svg_markup().unwrap(),
            "<svg><text>a &lt; b &amp; &quot;c&quot;</text><rect/></svg>"
        );
    }

    #[test]
    fn remove_drops_subtree() {
        let mut doc = Document::new();
        let g = doc.append(doc.root(), "g").unwrap();
        let c = doc.append(g, "circle").unwrap();
        doc.remove(g).unwrap();
        assert!(!doc.contains(c));
        assert!(doc.is_empty());
        assert!(matches!(doc.set_attr(c, "r", 1), Err(ChartError::MissingNode(_))));
    }

    #[test]
    fn freed_slots_are_reused_without_reviving_old_ids() {
        let mut doc = Document::new();
        let root = doc.root();
        let old = doc.append(root, "g").unwrap();
        doc.remove(old).unwrap();
        let new = doc.append(root, "circle").unwrap();
        assert_eq!(doc.capacity(), 2);
        assert_ne!(old, new);
        assert!(!doc.contains(old));
        assert_eq!(doc.tag(new), Some("circle"));
    }

    #[test]
    fn sliding_joins_keep_the_arena_bounded() {
        let mut doc = Document::new();
        let root = doc.root();
        for shift in 0..100 {
            let keys: Vec<String> = (shift..shift + 20).map(|k| k.to_string()).collect();
            let join = doc.join(root, "circle", "dot", &keys).unwrap();
            assert_eq!(join.nodes.len(), 20);
        }
        assert_eq!(doc.len(), 21);
        assert_eq!(doc.capacity(), 21);
    }
}
