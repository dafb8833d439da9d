//! Renderer registry.
//!
//! A renderer turns a parsed token tree into bytes: debug dumps, plain text,
//! ANSI-styled terminal output or JSON. Each renderer implements the
//! [`Renderer`] trait and is registered with a [`RendererRegistry`], which the
//! caller constructs at startup and passes to whoever renders; there is no
//! global discovery.

mod json;
mod raw;
mod text;
mod tree;

use std::collections::HashMap;
use std::fmt;

use super::arena::{Arena, ByteSpan};
use super::store::TokenStore;
use super::token::TokenId;

pub use json::JsonRenderer;
pub use raw::RawRenderer;
pub use text::{AnsiRenderer, PlainRenderer};
pub use tree::TreeRenderer;

fn kind_name(kind: super::token::TokenKind) -> &'static str {
    match kind {
        super::token::TokenKind::Mark => "mark",
        super::token::TokenKind::Text => "text",
    }
}

/// Error that can occur while rendering
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Renderer not found in registry
    RendererNotFound(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::RendererNotFound(name) => write!(f, "Renderer '{name}' not found"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Trait for document renderers
///
/// A renderer receives an output arena and the root token of a document, and
/// returns a span of the output arena holding its rendering. Implementations
/// build their output in a private arena and hand it over with
/// [`Arena::splice_solid`]; they must not retain token ids or spans past
/// their own return.
pub trait Renderer: Send + Sync {
    /// The name this renderer is registered under (e.g. "ansi", "tree")
    fn name(&self) -> &str;

    /// Render `document` into `out`.
    fn render(&self, out: &mut Arena, store: &TokenStore<'_>, document: TokenId) -> ByteSpan;

    /// Optional one-line description, shown by the CLI's renderer list
    fn description(&self) -> &str {
        ""
    }
}

/// Registry of document renderers
///
/// Renderers can be registered and retrieved by name. The registry is a plain
/// value owned by the caller; unrelated executions never share one.
pub struct RendererRegistry {
    renderers: HashMap<String, Box<dyn Renderer>>,
}

impl RendererRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        RendererRegistry {
            renderers: HashMap::new(),
        }
    }

    /// Register a renderer
    ///
    /// If a renderer with the same name already exists, it will be replaced.
    pub fn register<R: Renderer + 'static>(&mut self, renderer: R) {
        self.renderers
            .insert(renderer.name().to_string(), Box::new(renderer));
    }

    /// Get a renderer by name
    pub fn get(&self, name: &str) -> Option<&dyn Renderer> {
        self.renderers.get(name).map(|r| r.as_ref())
    }

    /// Check if a renderer exists
    pub fn has(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// Render a document with the named renderer
    pub fn render(
        &self,
        name: &str,
        out: &mut Arena,
        store: &TokenStore<'_>,
        document: TokenId,
    ) -> Result<ByteSpan, RenderError> {
        let renderer = self
            .get(name)
            .ok_or_else(|| RenderError::RendererNotFound(name.to_string()))?;
        Ok(renderer.render(out, store, document))
    }

    /// List all registered renderer names (sorted)
    pub fn list_renderers(&self) -> Vec<String> {
        let mut names: Vec<_> = self.renderers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with the built-in renderers
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register(TreeRenderer);
        registry.register(RawRenderer);
        registry.register(PlainRenderer);
        registry.register(AnsiRenderer);
        registry.register(JsonRenderer);

        registry
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
