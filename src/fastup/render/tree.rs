//! Box-drawing tree dump.
//!
//! One line per token, indented by nesting depth. Entering marks print both
//! characters of their pair on one line (`mark ()`), leaving marks are
//! folded into their entering line, text tokens print their capture quoted.

use super::{kind_name, Renderer};
use crate::fastup::arena::{Arena, ByteSpan};
use crate::fastup::store::TokenStore;
use crate::fastup::token::TokenId;

pub struct TreeRenderer;

impl Renderer for TreeRenderer {
    fn name(&self) -> &str {
        "tree"
    }

    fn description(&self) -> &str {
        "indented dump of the token tree, for debugging"
    }

    fn render(&self, out: &mut Arena, store: &TokenStore<'_>, document: TokenId) -> ByteSpan {
        let mut pool = Arena::new();
        let doc = store.at(document);
        let range = doc.tree();

        // One flag per nesting level: whether the pair entered at that level
        // was the last child, so deeper lines draw spaces instead of `│`.
        // A run of n tokens nests at most n/2 pairs deep.
        let mut no_siblings = vec![false; range.len() / 2 + 2];
        let mut level = 0usize;
        let mut first = true;

        for index in range {
            let tk = store.at(TokenId(index as u32));
            if tk.is_leaving() {
                level -= 1;
                continue;
            }

            // The newline goes before every line but the first, so the
            // output ends without one.
            if !first {
                pool.push_str("\n");
            }
            first = false;

            let is_last_child = tk.next_sibling().map_or(true, |sib| sib.is_leaving());

            if level >= 1 {
                for &no_sib in &no_siblings[1..level] {
                    pool.push_str(if no_sib { "   " } else { "│  " });
                }
                pool.push_str(if is_last_child { "└─ " } else { "├─ " });
            }

            pool.push_str(kind_name(tk.kind()));
            pool.push_str(" ");
            if tk.is_entering() {
                pool.push_str(tk.text());
                pool.push_str(tk.leaving().text());

                if is_last_child {
                    no_siblings[level] = true;
                }
                level += 1;
                no_siblings[level] = false;
            } else {
                pool.push_str("\"");
                pool.push_str(tk.text());
                pool.push_str("\"");
            }
        }

        out.splice_solid(pool)
    }
}
