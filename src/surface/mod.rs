//! Puzzle surface
//!
//! The extractor and the driver never reach into global page state. They take
//! an explicit handle to the component tree through the [`Surface`] trait, so a
//! captured snapshot or a simulated board can stand in for a live page.
//!
//! Page layout the crate relies on:
//!
//! ```text
//! game-app
//! └─ #shadow
//!    ├─ game-theme-manager
//!    │  └─ #game
//!    │     └─ game-keyboard
//!    │        └─ #shadow
//!    │           └─ [data-key='a'] … [data-key='↵']
//!    └─ game-row[letters]           (one per attempt, top to bottom)
//!       └─ #shadow
//!          └─ game-tile[evaluation] (one per letter, left to right)
//! ```

mod dom;
mod simulator;

pub use dom::{Dom, Element};
pub use simulator::BoardSimulator;

use crate::error::StructureNotFound;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const APP_TAG: &str = "game-app";
pub const ROW_TAG: &str = "game-row";
pub const TILE_TAG: &str = "game-tile";
pub const THEME_MANAGER_TAG: &str = "game-theme-manager";
pub const GAME_ID: &str = "game";
pub const KEYBOARD_TAG: &str = "game-keyboard";

pub const LETTERS_ATTR: &str = "letters";
pub const EVALUATION_ATTR: &str = "evaluation";
pub const KEY_ATTR: &str = "data-key";

/// Handle to a node of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// The subset of CSS selectors the crate needs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// `game-row`
    Tag(String),
    /// `#game`
    Id(String),
    /// `[data-key='a']`
    Attribute { name: String, value: String },
}

impl Selector {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Match against an element's tag and attribute lookup
    pub fn matches<'a>(&self, tag: &str, attribute: impl Fn(&str) -> Option<&'a str>) -> bool {
        match self {
            Self::Tag(wanted) => wanted.eq_ignore_ascii_case(tag),
            Self::Id(wanted) => attribute("id") == Some(wanted.as_str()),
            Self::Attribute { name, value } => attribute(name) == Some(value.as_str()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "{tag}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Attribute { name, value } => write!(f, "[{name}='{value}']"),
        }
    }
}

/// Read/write access to a page's component tree
///
/// Queries follow `querySelectorAll` semantics: descendants of `scope` in
/// document order, without crossing into shadow roots.
pub trait Surface {
    /// The document node
    fn document(&self) -> NodeId;

    /// Shadow root attached to `host`, if any
    fn shadow_root(&self, host: NodeId) -> Option<NodeId>;

    /// All descendants of `scope` matching `selector`, in document order
    fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId>;

    /// First descendant of `scope` matching `selector`
    fn query(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.query_all(scope, selector).into_iter().next()
    }

    /// Attribute value of an element
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Activate an element as a user click would
    fn click(&mut self, node: NodeId);
}

/// Resolve the `game-app` shadow root, where rows and the theme manager live
///
/// # Errors
/// Returns `StructureNotFound` if the app element or its shadow root is missing.
pub fn app_root<S: Surface + ?Sized>(surface: &S) -> Result<NodeId, StructureNotFound> {
    let app = surface
        .query(surface.document(), &Selector::tag(APP_TAG))
        .ok_or_else(|| StructureNotFound::new(APP_TAG))?;
    surface
        .shadow_root(app)
        .ok_or_else(|| StructureNotFound::new(format!("{APP_TAG} shadow root")))
}

/// Resolve the on-screen keyboard's shadow root
///
/// # Errors
/// Returns `StructureNotFound` naming the first missing step of the path.
pub fn keyboard_root<S: Surface + ?Sized>(surface: &S) -> Result<NodeId, StructureNotFound> {
    let mut node = app_root(surface)?;
    for selector in [
        Selector::tag(THEME_MANAGER_TAG),
        Selector::id(GAME_ID),
        Selector::tag(KEYBOARD_TAG),
    ] {
        node = surface
            .query(node, &selector)
            .ok_or_else(|| StructureNotFound::new(selector.to_string()))?;
    }
    surface
        .shadow_root(node)
        .ok_or_else(|| StructureNotFound::new(format!("{KEYBOARD_TAG} shadow root")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_display_is_css() {
        assert_eq!(Selector::tag("game-row").to_string(), "game-row");
        assert_eq!(Selector::id("game").to_string(), "#game");
        assert_eq!(
            Selector::attribute("data-key", "a").to_string(),
            "[data-key='a']"
        );
    }

    #[test]
    fn selector_matching() {
        let attrs = |name: &str| match name {
            "id" => Some("game"),
            "data-key" => Some("↵"),
            _ => None,
        };
        assert!(Selector::tag("GAME-ROW").matches("game-row", attrs));
        assert!(Selector::id("game").matches("div", attrs));
        assert!(Selector::attribute("data-key", "↵").matches("button", attrs));
        assert!(!Selector::attribute("data-key", "a").matches("button", attrs));
    }

    #[test]
    fn resolves_paths_on_simulated_board() {
        let board = BoardSimulator::new("crane");
        assert!(app_root(&board).is_ok());
        assert!(keyboard_root(&board).is_ok());
    }

    #[test]
    fn missing_app_names_the_step() {
        let dom = Dom::new();
        assert_eq!(app_root(&dom), Err(StructureNotFound::new("game-app")));
    }

    #[test]
    fn missing_keyboard_names_the_step() {
        let mut dom = Dom::new();
        let app = dom.append_element(dom.document(), APP_TAG, &[]);
        let shadow = dom.attach_shadow(app);
        dom.append_element(shadow, THEME_MANAGER_TAG, &[]);

        assert_eq!(keyboard_root(&dom), Err(StructureNotFound::new("#game")));
    }
}
