//! Simulated puzzle page
//!
//! Renders a board into a [`Dom`] with the same component layout as the live
//! page and reacts to keyboard clicks: letters fill the current row, `←` erases,
//! `↵` submits and reveals the tile evaluations.

use super::{
    APP_TAG, Dom, EVALUATION_ATTR, GAME_ID, KEY_ATTR, KEYBOARD_TAG, LETTERS_ATTR, NodeId,
    ROW_TAG, Selector, Surface, THEME_MANAGER_TAG, TILE_TAG,
};
use crate::core::evaluate;
use rustc_hash::FxHashMap;
use tracing::debug;

pub const SUBMIT_KEY: &str = "↵";
pub const BACKSPACE_KEY: &str = "←";

const KEYBOARD_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];
const DEFAULT_ATTEMPTS: usize = 6;

struct Row {
    host: NodeId,
    tiles: Vec<NodeId>,
}

/// A playable board behind the [`Surface`] trait
pub struct BoardSimulator {
    dom: Dom,
    answer: String,
    rows: Vec<Row>,
    keys: FxHashMap<NodeId, String>,
    current: usize,
    typed: String,
    solved: bool,
}

impl BoardSimulator {
    /// A six-attempt board for `answer` (case-insensitive)
    #[must_use]
    pub fn new(answer: &str) -> Self {
        Self::with_attempts(answer, DEFAULT_ATTEMPTS)
    }

    #[must_use]
    pub fn with_attempts(answer: &str, attempts: usize) -> Self {
        let answer = answer.to_lowercase();
        let width = answer.chars().count();

        let mut dom = Dom::new();
        let app = dom.append_element(dom.document(), APP_TAG, &[]);
        let app_shadow = dom.attach_shadow(app);

        let theme = dom.append_element(app_shadow, THEME_MANAGER_TAG, &[]);
        let game = dom.append_element(theme, "div", &[("id", GAME_ID)]);

        let rows = (0..attempts)
            .map(|_| {
                let host = dom.append_element(game, ROW_TAG, &[(LETTERS_ATTR, "")]);
                let row_shadow = dom.attach_shadow(host);
                let tiles = (0..width)
                    .map(|_| dom.append_element(row_shadow, TILE_TAG, &[]))
                    .collect();
                Row { host, tiles }
            })
            .collect();

        let keyboard = dom.append_element(game, KEYBOARD_TAG, &[]);
        let keyboard_shadow = dom.attach_shadow(keyboard);
        let mut keys = FxHashMap::default();
        for (i, letters) in KEYBOARD_ROWS.iter().enumerate() {
            let row = dom.append_element(keyboard_shadow, "div", &[("class", "row")]);
            let mut row_keys: Vec<String> = letters.chars().map(String::from).collect();
            if i == KEYBOARD_ROWS.len() - 1 {
                row_keys.insert(0, SUBMIT_KEY.to_string());
                row_keys.push(BACKSPACE_KEY.to_string());
            }
            for key in row_keys {
                let button = dom.append_element(row, "button", &[(KEY_ATTR, key.as_str())]);
                keys.insert(button, key);
            }
        }

        Self {
            dom,
            answer,
            rows,
            keys,
            current: 0,
            typed: String::new(),
            solved: false,
        }
    }

    #[must_use]
    pub const fn dom(&self) -> &Dom {
        &self.dom
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub const fn is_solved(&self) -> bool {
        self.solved
    }

    /// Solved, or every row used
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.solved || self.current >= self.rows.len()
    }

    /// Letters typed into the current row but not yet submitted
    #[must_use]
    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// Apply one keyboard key, as if its button were clicked
    pub fn press(&mut self, key: &str) {
        if self.is_over() {
            debug!(key, "board is over; key ignored");
            return;
        }

        let width = self.answer.chars().count();
        match key {
            SUBMIT_KEY => {
                if self.typed.chars().count() == width {
                    self.submit();
                } else {
                    debug!(typed = %self.typed, "not enough letters");
                }
                return;
            }
            BACKSPACE_KEY => {
                self.typed.pop();
            }
            letter => {
                if self.typed.chars().count() < width {
                    self.typed.push_str(letter);
                }
            }
        }
        self.render_current_row();
    }

    fn render_current_row(&mut self) {
        let row = &self.rows[self.current];
        self.dom.set_attribute(row.host, LETTERS_ATTR, &self.typed);

        let mut letters = self.typed.chars();
        for &tile in &row.tiles {
            match letters.next() {
                Some(letter) => self.dom.set_attribute(tile, "letter", &letter.to_string()),
                None => self.dom.remove_attribute(tile, "letter"),
            }
        }
    }

    fn submit(&mut self) {
        let evaluations = evaluate(&self.typed, &self.answer);
        let row = &self.rows[self.current];
        for (&tile, evaluation) in row.tiles.iter().zip(&evaluations) {
            if let Some(value) = evaluation.as_attribute() {
                self.dom.set_attribute(tile, EVALUATION_ATTR, value);
            }
        }

        self.solved = self.typed == self.answer;
        debug!(word = %self.typed, row = self.current, solved = self.solved, "row revealed");
        self.current += 1;
        self.typed.clear();
    }
}

impl Surface for BoardSimulator {
    fn document(&self) -> NodeId {
        self.dom.document()
    }

    fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.dom.shadow_root(host)
    }

    fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.dom.query_all(scope, selector)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.dom.attribute(node, name)
    }

    fn click(&mut self, node: NodeId) {
        self.dom.click(node);
        if let Some(key) = self.keys.get(&node).cloned() {
            self.press(&key);
        }
    }
}
