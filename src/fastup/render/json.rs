//! Structural JSON dump via serde.

use serde::Serialize;

use super::Renderer;
use crate::fastup::arena::{Arena, ByteSpan};
use crate::fastup::store::{Tok, TokenStore};
use crate::fastup::token::{TokenId, TokenKind};

pub struct JsonRenderer;

#[derive(Debug, Serialize)]
struct JsonNode<'s> {
    kind: &'static str,
    text: &'s str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<JsonNode<'s>>,
}

fn node<'a, 's>(tk: Tok<'a, 's>) -> JsonNode<'s> {
    match tk.kind() {
        TokenKind::Text => JsonNode {
            kind: "text",
            text: tk.text(),
            children: Vec::new(),
        },
        TokenKind::Mark => JsonNode {
            kind: "mark",
            text: tk.text(),
            children: tk.children().map(node).collect(),
        },
    }
}

impl Renderer for JsonRenderer {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "the token tree as pretty-printed JSON"
    }

    fn render(&self, out: &mut Arena, store: &TokenStore<'_>, document: TokenId) -> ByteSpan {
        let root = node(store.at(document));
        let rendered = serde_json::to_string_pretty(&root)
            .expect("a tree of strings always serializes");
        out.push_str(&rendered)
    }
}
