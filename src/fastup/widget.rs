//! Widget registry.
//!
//! A widget expands a `<name|…>` subtree into a replacement subtree; the
//! core never interprets widget semantics itself. Only a debug stub ships:
//! `.dump`, which writes the raw token dump of its argument to stderr and
//! expands to nothing. It writes to stderr directly and is therefore not a
//! conforming widget; the dotted name marks it as hidden.

use std::collections::HashMap;
use std::fmt;

use super::arena::Arena;
use super::render::{RawRenderer, Renderer};
use super::store::TokenStore;
use super::token::TokenId;

/// Error that can occur during widget expansion
#[derive(Debug, Clone, PartialEq)]
pub enum ExpandError {
    /// Widget not found in registry
    WidgetNotFound(String),
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpandError::WidgetNotFound(name) => write!(f, "Widget '{name}' not found"),
        }
    }
}

impl std::error::Error for ExpandError {}

/// Trait for widgets
///
/// `expand` receives the store and the entering mark of the `<…>` subtree
/// holding the widget's name and argument branches, and returns the root of
/// a replacement subtree appended to the same store, or `None` to expand to
/// nothing.
pub trait Widget: Send + Sync {
    /// The name this widget is registered under
    fn name(&self) -> &str;

    /// Expand the widget subtree rooted at `widget`.
    fn expand<'s>(&self, store: &mut TokenStore<'s>, widget: TokenId) -> Option<TokenId>;

    /// Optional one-line description, shown by the CLI's widget list
    fn description(&self) -> &str {
        ""
    }
}

/// Registry of widgets, constructed at startup and passed to whoever
/// expands; there is no global discovery.
pub struct WidgetRegistry {
    widgets: HashMap<String, Box<dyn Widget>>,
}

impl WidgetRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        WidgetRegistry {
            widgets: HashMap::new(),
        }
    }

    /// Register a widget
    ///
    /// If a widget with the same name already exists, it will be replaced.
    pub fn register<W: Widget + 'static>(&mut self, widget: W) {
        self.widgets.insert(widget.name().to_string(), Box::new(widget));
    }

    /// Get a widget by name
    pub fn get(&self, name: &str) -> Option<&dyn Widget> {
        self.widgets.get(name).map(|w| w.as_ref())
    }

    /// Check if a widget exists
    pub fn has(&self, name: &str) -> bool {
        self.widgets.contains_key(name)
    }

    /// Expand `widget` with the named widget
    pub fn expand<'s>(
        &self,
        name: &str,
        store: &mut TokenStore<'s>,
        widget: TokenId,
    ) -> Result<Option<TokenId>, ExpandError> {
        let handler = self
            .get(name)
            .ok_or_else(|| ExpandError::WidgetNotFound(name.to_string()))?;
        Ok(handler.expand(store, widget))
    }

    /// List all registered widget names (sorted)
    pub fn list_widgets(&self) -> Vec<String> {
        let mut names: Vec<_> = self.widgets.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with the built-in widgets
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(DumpWidget);
        registry
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Debug stub: dumps its argument subtree to stderr, expands to nothing.
pub struct DumpWidget;

impl Widget for DumpWidget {
    fn name(&self) -> &str {
        ".dump"
    }

    fn description(&self) -> &str {
        "debug stub: dump the argument subtree to stderr"
    }

    fn expand<'s>(&self, store: &mut TokenStore<'s>, widget: TokenId) -> Option<TokenId> {
        let mut out = Arena::new();
        let span = RawRenderer.render(&mut out, store, widget);
        eprint!("{}", out.text(span));
        None
    }
}
