//! Self-hosting error diagnostics.
//!
//!     A failed parse does not return an error value: it returns a Fastup
//!     document describing the failure, built out of the very same token
//!     primitives the parser produces, and treelized by the very same pass.
//!     Callers therefore handle exactly one result type, and any renderer can
//!     display a diagnostic.
//!
//!     The formatter assembles a pre-styled skeleton: an error background,
//!     an error foreground, a `<`/`>` indicator pair, the `ERROR: ` prefix,
//!     and the caller's parts. Referenced tokens are quoted in a highlight
//!     color of their own.

use super::store::TokenStore;
use super::token::{Token, TokenId};
use super::tree::treelize;

pub const ERROR_BACKGROUND: &str = "551100";
pub const ERROR_FOREGROUND: &str = "ff6666";
pub const INDICATOR_FOREGROUND: &str = "44ccdd";
pub const REFERENCE_FOREGROUND: &str = "ccdd44";

/// One piece of a diagnostic message.
#[derive(Debug, Clone, Copy)]
pub enum Part<'s> {
    /// Literal message text.
    Lit(&'s str),
    /// The captured text of a referenced token, rendered in the reference
    /// style. Borrows from wherever that token's text lives.
    Ref(&'s str),
}

/// In-progress flag for the formatter, passed explicitly down the parse call
/// chain instead of living in hidden global state.
///
/// Formatting an error while another one is being formatted means an error
/// was triggered while rendering a diagnostic's own tokens. That is a broken
/// core invariant, not an input error, and panics.
#[derive(Debug, Default)]
pub struct ErrorGuard {
    formatting: bool,
}

/// Build a diagnostic document from `parts`, append its tokens into `store`
/// (so its lifetime matches the caller's tree) and return its root.
pub fn format_error<'s>(
    store: &mut TokenStore<'s>,
    guard: &mut ErrorGuard,
    parts: &[Part<'s>],
) -> TokenId {
    assert!(!guard.formatting, "invalid Fastup syntax in an error message");
    guard.formatting = true;

    let mut run: Vec<Token<'s>> = vec![
        Token::mark('['),
        Token::text_token(ERROR_BACKGROUND),
        Token::mark('('),
        Token::text_token(ERROR_FOREGROUND),
        Token::text_token(" "),
        Token::mark('('),
        Token::text_token(INDICATOR_FOREGROUND),
        Token::text_token("<"),
        Token::mark(')'),
        Token::text_token("ERROR: "),
    ];

    for part in parts {
        match *part {
            Part::Lit(text) => run.push(Token::text_token(text)),
            Part::Ref(text) => {
                run.push(Token::mark('('));
                run.push(Token::text_token(REFERENCE_FOREGROUND));
                run.push(Token::text_token(text));
                run.push(Token::mark(')'));
            }
        }
    }

    run.extend([
        Token::mark('('),
        Token::text_token(INDICATOR_FOREGROUND),
        Token::text_token(">"),
        Token::mark(')'),
        Token::text_token(" "),
        Token::mark(')'),
        Token::mark(']'),
    ]);

    let range = store.splice_run(run);
    let root = treelize(store, range, guard);

    guard.formatting = false;
    root
}
