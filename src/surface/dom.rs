//! In-memory component tree
//!
//! An arena of nodes with shadow roots. It can be built programmatically or
//! loaded from a JSON snapshot captured from a live page:
//!
//! ```json
//! {
//!   "tag": "game-app",
//!   "shadow": [
//!     { "tag": "game-row", "attributes": { "letters": "crane" },
//!       "shadow": [ { "tag": "game-tile", "attributes": { "evaluation": "absent" } } ] }
//!   ]
//! }
//! ```

use super::{NodeId, Selector, Surface};
use crate::error::SnapshotError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Serialized element, as found in snapshot files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default, skip_serializing_if = "std::collections::HashMap::is_empty")]
    pub attributes: FxHashMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
    /// Children of the attached shadow root, if the element hosts one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Vec<Element>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot {
    One(Element),
    Many(Vec<Element>),
}

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    ShadowRoot,
    Element {
        tag: String,
        attributes: FxHashMap<String, String>,
    },
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    children: Vec<NodeId>,
    shadow_root: Option<NodeId>,
}

/// Arena-backed DOM
///
/// Clicks are recorded rather than acted upon; [`BoardSimulator`](super::BoardSimulator)
/// wraps a `Dom` when clicks need to change the page.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
    clicks: Vec<NodeId>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// An empty document
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                children: Vec::new(),
                shadow_root: None,
            }],
            clicks: Vec::new(),
        }
    }

    /// Build a document whose top-level children are `roots`
    #[must_use]
    pub fn from_elements(roots: &[Element]) -> Self {
        let mut dom = Self::new();
        let document = dom.document();
        for element in roots {
            dom.insert_tree(document, element);
        }
        dom
    }

    /// Parse a JSON snapshot (a single element or an array of them)
    ///
    /// # Errors
    /// Returns `SnapshotError::Parse` if the JSON does not describe elements.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let dom = match serde_json::from_str(json)? {
            Snapshot::One(element) => Self::from_elements(&[element]),
            Snapshot::Many(elements) => Self::from_elements(&elements),
        };
        debug!(nodes = dom.nodes.len(), "loaded snapshot");
        Ok(dom)
    }

    /// Read and parse a JSON snapshot file
    ///
    /// # Errors
    /// Returns `SnapshotError` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn insert_tree(&mut self, parent: NodeId, element: &Element) -> NodeId {
        let id = self.push_node(
            parent,
            NodeKind::Element {
                tag: element.tag.clone(),
                attributes: element.attributes.clone(),
            },
        );
        if let Some(shadow_children) = &element.shadow {
            let shadow = self.attach_shadow(id);
            for child in shadow_children {
                self.insert_tree(shadow, child);
            }
        }
        for child in &element.children {
            self.insert_tree(id, child);
        }
        id
    }

    fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            children: Vec::new(),
            shadow_root: None,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append an element under `parent` (an element, shadow root or the document)
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let attributes = attributes
            .iter()
            .map(|&(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self.push_node(
            parent,
            NodeKind::Element {
                tag: tag.to_string(),
                attributes,
            },
        )
    }

    /// Attach (or return the existing) shadow root of `host`
    pub fn attach_shadow(&mut self, host: NodeId) -> NodeId {
        if let Some(existing) = self.nodes[host.0].shadow_root {
            return existing;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind: NodeKind::ShadowRoot,
            children: Vec::new(),
            shadow_root: None,
        });
        self.nodes[host.0].shadow_root = Some(id);
        id
    }

    /// Set an attribute; no-op on non-element nodes
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[node.0].kind {
            attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[node.0].kind {
            attributes.remove(name);
        }
    }

    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Document | NodeKind::ShadowRoot => None,
        }
    }

    /// Elements clicked so far, in order
    #[must_use]
    pub fn clicks(&self) -> &[NodeId] {
        &self.clicks
    }

    fn collect_matches(&self, scope: NodeId, selector: &Selector, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[scope.0].children {
            if let NodeKind::Element { tag, attributes } = &self.nodes[child.0].kind
                && selector.matches(tag, |name| attributes.get(name).map(String::as_str))
            {
                out.push(child);
            }
            self.collect_matches(child, selector, out);
        }
    }
}

impl Surface for Dom {
    fn document(&self) -> NodeId {
        NodeId(0)
    }

    fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.nodes.get(host.0)?.shadow_root
    }

    fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut out = Vec::new();
        if scope.0 < self.nodes.len() {
            self.collect_matches(scope, selector, &mut out);
        }
        out
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeKind::Document | NodeKind::ShadowRoot => None,
        }
    }

    fn click(&mut self, node: NodeId) {
        self.clicks.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "tag": "game-app",
        "shadow": [
            { "tag": "game-row", "attributes": { "letters": "crane" },
              "shadow": [ { "tag": "game-tile", "attributes": { "evaluation": "absent" } } ] },
            { "tag": "game-row", "attributes": { "letters": "" } }
        ]
    }"#;

    #[test]
    fn query_does_not_cross_shadow_boundaries() {
        let dom = Dom::from_json(SNAPSHOT).unwrap();
        let document = dom.document();

        let apps = dom.query_all(document, &Selector::tag("game-app"));
        assert_eq!(apps.len(), 1);
        // Rows live inside the app's shadow root
        assert!(dom.query_all(document, &Selector::tag("game-row")).is_empty());

        let shadow = dom.shadow_root(apps[0]).unwrap();
        let rows = dom.query_all(shadow, &Selector::tag("game-row"));
        assert_eq!(rows.len(), 2);
        assert_eq!(dom.attribute(rows[0], "letters"), Some("crane"));
        assert_eq!(dom.attribute(rows[1], "letters"), Some(""));
        assert!(dom.shadow_root(rows[1]).is_none());
    }

    #[test]
    fn query_returns_document_order() {
        let mut dom = Dom::new();
        let root = dom.document();
        let outer = dom.append_element(root, "div", &[("data-key", "a")]);
        let inner = dom.append_element(outer, "button", &[("data-key", "a")]);
        let sibling = dom.append_element(root, "button", &[("data-key", "a")]);

        let found = dom.query_all(root, &Selector::attribute("data-key", "a"));
        assert_eq!(found, vec![outer, inner, sibling]);
        assert_eq!(dom.query(root, &Selector::tag("button")), Some(inner));
    }

    #[test]
    fn attributes_can_change() {
        let mut dom = Dom::new();
        let root = dom.document();
        let tile = dom.append_element(root, "game-tile", &[]);

        dom.set_attribute(tile, "evaluation", "present");
        assert_eq!(dom.attribute(tile, "evaluation"), Some("present"));

        dom.remove_attribute(tile, "evaluation");
        assert_eq!(dom.attribute(tile, "evaluation"), None);
        assert_eq!(dom.tag(tile), Some("game-tile"));
        assert_eq!(dom.tag(root), None);
    }

    #[test]
    fn clicks_are_recorded() {
        let mut dom = Dom::new();
        let root = dom.document();
        let key = dom.append_element(root, "button", &[("data-key", "r")]);

        dom.click(key);
        dom.click(key);
        assert_eq!(dom.clicks(), &[key, key]);
    }

    #[test]
    fn snapshot_array_form() {
        let dom = Dom::from_json(r#"[{"tag":"header"},{"tag":"game-app"}]"#).unwrap();
        assert!(dom.query(dom.document(), &Selector::tag("game-app")).is_some());
    }

    #[test]
    fn invalid_snapshot_is_rejected() {
        assert!(matches!(
            Dom::from_json(r#"{"attributes":{}}"#),
            Err(SnapshotError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        fs::write(&path, SNAPSHOT).unwrap();

        let dom = Dom::load(&path).unwrap();
        assert!(dom.query(dom.document(), &Selector::tag("game-app")).is_some());

        let missing = Dom::load(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(SnapshotError::Read { .. })));
    }
}
