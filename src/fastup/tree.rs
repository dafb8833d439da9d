//! Pairing pass.
//!
//!     A token run encodes its tree purely by order: an entering mark and the
//!     leaving mark it pairs with delimit a subtree, and everything between
//!     them is that subtree's content. `treelize` walks a freshly spliced run
//!     and fills in the `pair` links, turning the flat run into a navigable
//!     tree without moving a single token.
//!
//!     The walk is backward. By the time an entering mark is visited, every
//!     entering mark after it has already been paired, so the forward scan
//!     for its own partner can hop over whole subtrees in one step instead of
//!     re-examining their insides. The pass is linear in practice: each token
//!     is landed on a bounded number of times.
//!
//!     Malformed runs do not return an error value. They return a diagnostic
//!     document built by [`format_error`], which lives in the same store and
//!     renders like any other tree.

use std::ops::Range;

use super::error::{format_error, ErrorGuard, Part};
use super::store::TokenStore;
use super::token::{pairable, paired_char_of, Pairable, TokenId};

/// Pair up the marks of `run` and return the root token of the resulting
/// tree, or of a diagnostic document when the run is malformed.
///
/// The run must hold at least an entering mark and its leaving mark.
pub fn treelize<'s>(
    store: &mut TokenStore<'s>,
    run: Range<u32>,
    guard: &mut ErrorGuard,
) -> TokenId {
    assert!(run.len() >= 2);

    let mut back_leaving: Option<TokenId> = None;
    for index in run.clone().rev() {
        let entering = TokenId(index);
        match pairable(store.token(entering)) {
            Pairable::No => continue,
            Pairable::Leaving => {
                if back_leaving.is_none() {
                    back_leaving = Some(entering);
                }
                continue;
            }
            Pairable::Entering => {}
        }

        let want = paired_char_of(store.token(entering).front());
        let mut cursor = index + 1;
        let mut paired = false;
        while cursor < run.end {
            let leaving = TokenId(cursor);
            match pairable(store.token(leaving)) {
                Pairable::No => {
                    cursor += 1;
                    continue;
                }
                Pairable::Entering => match store.token(leaving).pair_id() {
                    // Later entering marks were paired by earlier iterations
                    // of the backward walk, so their subtrees can be skipped
                    // whole.
                    Some(pair) => {
                        cursor = pair.0 + 1;
                        continue;
                    }
                    None => unreachable!("forward pair scan reached an unpaired entering mark"),
                },
                Pairable::Leaving => {}
            }

            if store.token(leaving).front() != want {
                let a = store.token(entering).text();
                let b = store.token(leaving).text();
                return format_error(
                    store,
                    guard,
                    &[
                        Part::Lit("token \""),
                        Part::Ref(a),
                        Part::Lit("\" and \""),
                        Part::Ref(b),
                        Part::Lit("\" is not a pair."),
                    ],
                );
            }

            store.link_pair(entering, leaving);
            paired = true;
            break;
        }

        if !paired {
            let a = store.token(entering).text();
            return format_error(
                store,
                guard,
                &[
                    Part::Lit("missing leaving token for \""),
                    Part::Ref(a),
                    Part::Lit("\"."),
                ],
            );
        }
    }

    if let Some(leaving) = back_leaving {
        if store.token(leaving).pair_id().is_none() {
            let a = store.token(leaving).text();
            return format_error(
                store,
                guard,
                &[
                    Part::Lit("missing entering token for \""),
                    Part::Ref(a),
                    Part::Lit("\"."),
                ],
            );
        }
    }

    TokenId(run.start)
}
