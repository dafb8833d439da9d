//! Flat token table dump.
//!
//! One line per token in storage order, with ids instead of formatting: the
//! closest view of what the store actually holds. Documents chained through
//! alt links are dumped as further BRANCH paragraphs; links into another
//! store cannot be followed from here and are printed opaquely.

use std::collections::{HashSet, VecDeque};
use std::fmt::Write as _;

use super::{kind_name, Renderer};
use crate::fastup::arena::{Arena, ByteSpan};
use crate::fastup::store::{Tok, TokenStore};
use crate::fastup::token::{TokenId, TokenKind};

pub struct RawRenderer;

fn token_line(buf: &mut String, tk: Tok<'_, '_>) {
    match tk.pair() {
        Some(pair) => {
            let _ = write!(buf, "#{} ->#{}", tk.id().index(), pair.id().index());
        }
        None => {
            let _ = write!(buf, "#{} ->_", tk.id().index());
        }
    }
    let quote = match tk.kind() {
        TokenKind::Mark => '\'',
        TokenKind::Text => '"',
    };
    let _ = write!(buf, " {} {}{}{}", kind_name(tk.kind()), quote, tk.text(), quote);
}

impl Renderer for RawRenderer {
    fn name(&self) -> &str {
        "raw"
    }

    fn description(&self) -> &str {
        "flat table of tokens with their pair and alt links"
    }

    fn render(&self, out: &mut Arena, store: &TokenStore<'_>, document: TokenId) -> ByteSpan {
        let mut buf = String::new();

        let doc = store.at(document);
        if doc.pair().is_none() {
            token_line(&mut buf, doc);
            buf.push('\n');
            return out.push_str(&buf);
        }

        let mut pending = VecDeque::new();
        let mut seen = HashSet::new();
        pending.push_back(document);
        seen.insert(document);

        while let Some(branch) = pending.pop_front() {
            let branch = store.at(branch);
            let _ = writeln!(
                buf,
                "    BRANCH <<#{} #{}>>",
                branch.id().index(),
                branch.leaving().id().index(),
            );

            for index in branch.tree() {
                let tk = store.at(TokenId(index as u32));
                token_line(&mut buf, tk);

                if let Some(link) = tk.alt() {
                    let side = if tk.is_entering() { "ENTER" } else { "LEAVE" };
                    if link.store == store.id() {
                        let _ = write!(buf, "    ALT {side} #{}", link.token.index());
                        // Follow forward links into further documents of this
                        // store, each dumped once.
                        if tk.is_entering() && seen.insert(link.token) {
                            pending.push_back(link.token);
                        }
                    } else {
                        let _ = write!(buf, "    ALT {side} store#{} #{}", link.store.0, link.token.index());
                    }
                }
                buf.push('\n');
            }
        }

        out.push_str(&buf)
    }
}
