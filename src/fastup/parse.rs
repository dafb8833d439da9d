//! Scanner and parse entry point.
//!
//!     `parse` turns Fastup source into a tree in two passes. The scan pass
//!     walks the source once, front to back, emitting a flat run of tokens
//!     into the store: mark tokens for the bracket characters, text tokens
//!     borrowing slices of the source. The pairing pass ([`treelize`]) then
//!     links the marks in place. Neither pass copies source text.
//!
//!     Every parse is wrapped in an implicit widget: the run opens with
//!     `< ^ $ ^` (an anonymous widget with an empty name branch) and closes
//!     with `$ >`, so a plain string and a full document come back with the
//!     same two-branch root shape.
//!
//!     Branch separators are contextual. A `|` inside an open bracket closes
//!     the current branch and opens a sibling; at the top level there is no
//!     bracket to separate, and the character is ordinary text. The scanner
//!     keeps a bracket depth for this, and the same depth decides whether the
//!     closing `$ >` of the wrapper is emitted at all: when a bracket is
//!     still open at end of input, the wrapper is left unclosed so the
//!     pairing pass reports the dangling bracket instead of a confusing
//!     mismatch against the wrapper's own `>`.
//!
//!     A failed scan returns a diagnostic document in place of the tree, see
//!     [`format_error`].

use std::ops::Range;

use logos::{Lexer, Logos};
use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{format_error, ErrorGuard, Part};
use super::lexeme::{is_magical, is_space, RawLexeme};
use super::store::TokenStore;
use super::token::{Token, TokenId};
use super::tree::treelize;

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new("^[0-9a-f]{6}$").unwrap());

/// Parse `source` into a token tree inside `store` and return its root.
///
/// Syntax errors come back as a diagnostic document with the same root
/// shape, so callers never see a second result type.
pub fn parse<'s>(store: &mut TokenStore<'s>, source: &'s str) -> TokenId {
    let mut guard = ErrorGuard::default();

    let mut run = vec![
        Token::mark('<'),
        Token::mark('^'),
        Token::mark('$'),
        Token::mark('^'),
    ];
    match scan(store, &mut guard, &mut run, source) {
        Err(diagnostic) => return diagnostic,
        Ok(balanced) => {
            if balanced {
                run.push(Token::mark('$'));
                run.push(Token::mark('>'));
            }
        }
    }

    let range = store.splice_run(run);
    treelize(store, range, &mut guard)
}

/// Scan `source` into `run`. Returns whether every opened bracket was closed
/// again, or the root of a diagnostic document on a grammar violation.
fn scan<'s>(
    store: &mut TokenStore<'s>,
    guard: &mut ErrorGuard,
    run: &mut Vec<Token<'s>>,
    source: &'s str,
) -> Result<bool, TokenId> {
    let mut lexer = RawLexeme::lexer(source);
    let mut depth = 0u32;
    let mut pending: Option<Range<usize>> = None;

    skip_spaces(&mut lexer);
    while let Some(lexeme) = lexer.next() {
        let lexeme = match lexeme {
            Ok(lexeme) => lexeme,
            // The Run pattern accepts every character the single-character
            // tokens do not.
            Err(()) => unreachable!("the lexer covers all inputs"),
        };

        match lexeme {
            RawLexeme::Run => extend(&mut pending, lexer.span()),

            RawLexeme::Pipe if depth == 0 => extend(&mut pending, lexer.span()),
            RawLexeme::Pipe => {
                flush(run, source, &mut pending, true);
                run.push(Token::mark('$'));
                run.push(Token::mark('^'));
                skip_spaces(&mut lexer);
            }

            RawLexeme::WidgetOpen => {
                flush(run, source, &mut pending, false);
                run.push(Token::mark('<'));
                skip_spaces(&mut lexer);

                let name_start = position(source, &lexer);
                let name = widget_name(&mut lexer);
                if name.is_empty() {
                    run.push(Token::mark('^'));
                    run.push(Token::mark('$'));
                } else {
                    run.push(Token::text_token(name));
                }
                skip_spaces(&mut lexer);

                let rest = lexer.remainder();
                match rest.chars().next() {
                    None if name.is_empty() => {
                        return Err(format_error(store, guard, &[Part::Lit("missing widget name.")]));
                    }
                    None => {
                        return Err(format_error(
                            store,
                            guard,
                            &[
                                Part::Lit("expecting \"|\" or \">\" after the widget name \""),
                                Part::Ref(name),
                                Part::Lit("\"."),
                            ],
                        ));
                    }
                    Some('|') => {
                        lexer.bump(1);
                        skip_spaces(&mut lexer);
                        run.push(Token::mark('^'));
                        depth += 1;
                    }
                    Some('>') => {
                        lexer.bump(1);
                        run.push(Token::mark('>'));
                    }
                    Some(other) => {
                        // Quote the name up to and including the offending
                        // character, intervening spaces and all.
                        let end = position(source, &lexer) + other.len_utf8();
                        return Err(format_error(
                            store,
                            guard,
                            &[
                                Part::Lit("invalid widget name \""),
                                Part::Ref(&source[name_start..end]),
                                Part::Lit("\"."),
                            ],
                        ));
                    }
                }
            }

            RawLexeme::ForegroundOpen | RawLexeme::BackgroundOpen => {
                flush(run, source, &mut pending, false);
                run.push(Token::mark(if lexeme == RawLexeme::ForegroundOpen {
                    '('
                } else {
                    '['
                }));

                let rest = lexer.remainder();
                let take = rest
                    .char_indices()
                    .nth(6)
                    .map(|(index, _)| index)
                    .unwrap_or(rest.len());
                let color = &rest[..take];
                if color.is_empty() {
                    return Err(format_error(
                        store,
                        guard,
                        &[Part::Lit("expecting hex color in rrggbb format.")],
                    ));
                }
                if !HEX_COLOR.is_match(color) {
                    return Err(format_error(
                        store,
                        guard,
                        &[
                            Part::Lit("expecting hex color in rrggbb format, but got \""),
                            Part::Ref(color),
                            Part::Lit("\"."),
                        ],
                    ));
                }
                lexer.bump(take);
                run.push(Token::text_token(color));

                if !lexer.remainder().starts_with(':') {
                    return Err(format_error(
                        store,
                        guard,
                        &[
                            Part::Lit("missing colon \":\" after the color \""),
                            Part::Ref(color),
                            Part::Lit("\"."),
                        ],
                    ));
                }
                lexer.bump(1);
                skip_spaces(&mut lexer);
                run.push(Token::mark('^'));
                depth += 1;
            }

            RawLexeme::GroupOpen => {
                flush(run, source, &mut pending, false);
                // `{}` is a no-op used to keep the whitespace after it.
                if lexer.remainder().starts_with('}') {
                    lexer.bump(1);
                } else {
                    run.push(Token::mark('{'));
                    run.push(Token::mark('^'));
                    depth += 1;
                }
            }

            RawLexeme::WidgetClose
            | RawLexeme::ForegroundClose
            | RawLexeme::BackgroundClose
            | RawLexeme::GroupClose => {
                flush(run, source, &mut pending, lexeme == RawLexeme::WidgetClose);
                run.push(Token::mark('$'));
                run.push(Token::mark(match lexeme {
                    RawLexeme::WidgetClose => '>',
                    RawLexeme::ForegroundClose => ')',
                    RawLexeme::BackgroundClose => ']',
                    _ => '}',
                }));
                depth = depth.saturating_sub(1);
            }

            RawLexeme::Backslash => {
                flush(run, source, &mut pending, false);
                // The escaped character becomes a text token of its own; a
                // trailing backslash escapes nothing and is dropped.
                let rest = lexer.remainder();
                if let Some(escaped) = rest.chars().next() {
                    run.push(Token::text_token(&rest[..escaped.len_utf8()]));
                    lexer.bump(escaped.len_utf8());
                }
            }
        }
    }
    flush(run, source, &mut pending, true);

    Ok(depth == 0)
}

/// Byte offset of the lexer's read position in `source`.
fn position(source: &str, lexer: &Lexer<'_, RawLexeme>) -> usize {
    source.len() - lexer.remainder().len()
}

fn skip_spaces(lexer: &mut Lexer<'_, RawLexeme>) {
    let spaces = lexer
        .remainder()
        .bytes()
        .take_while(|&byte| is_space(byte))
        .count();
    lexer.bump(spaces);
}

/// Consume a widget name from the lexer's remainder: the longest run of
/// characters that are neither spaces nor magical. May be empty.
fn widget_name<'s>(lexer: &mut Lexer<'s, RawLexeme>) -> &'s str {
    let rest = lexer.remainder();
    let mut len = 0;
    for ch in rest.chars() {
        if ch.is_ascii() && (is_space(ch as u8) || is_magical(ch as u8)) {
            break;
        }
        len += ch.len_utf8();
    }
    lexer.bump(len);
    &rest[..len]
}

/// Grow the pending text span to cover the lexer's current token. Adjacent
/// by construction: the span is only kept across lexemes that do not flush.
fn extend(pending: &mut Option<Range<usize>>, span: Range<usize>) {
    match pending {
        Some(range) => range.end = span.end,
        None => *pending = Some(span),
    }
}

/// Emit the pending text span, trimming trailing whitespace when the run is
/// cut short by end of input, a branch separator or a widget close.
fn flush<'s>(
    run: &mut Vec<Token<'s>>,
    source: &'s str,
    pending: &mut Option<Range<usize>>,
    trim: bool,
) {
    if let Some(span) = pending.take() {
        let mut text = &source[span];
        if trim {
            text = text.trim_end_matches(|ch: char| ch.is_ascii() && is_space(ch as u8));
        }
        if !text.is_empty() {
            run.push(Token::text_token(text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fastup::token::TokenKind;

    /// Flatten a parse into `(front-or-text, kind)` pairs for easy shape
    /// assertions.
    fn shape<'s>(store: &TokenStore<'s>, root: TokenId) -> Vec<(TokenKind, &'s str)> {
        store
            .at(root)
            .tree()
            .map(|index| {
                let tk = store.at(TokenId(index as u32));
                (tk.kind(), tk.text())
            })
            .collect()
    }

    fn texts<'s>(store: &TokenStore<'s>, root: TokenId) -> Vec<&'s str> {
        shape(store, root)
            .into_iter()
            .filter(|(kind, _)| *kind == TokenKind::Text)
            .map(|(_, text)| text)
            .collect()
    }

    #[test]
    fn every_parse_has_the_two_branch_wrapper() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, "hi");

        let doc = store.at(root);
        assert_eq!(doc.front(), '<');
        let mut branches = doc.children();
        let empty = branches.next().unwrap();
        assert_eq!(empty.front(), '^');
        assert_eq!(empty.descendants().len(), 0);
        let content = branches.next().unwrap();
        assert_eq!(content.front(), '^');
        assert!(branches.next().is_none());
    }

    #[test]
    fn a_foreground_color_wraps_a_branch() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, "(ff0000:Hi)");

        use TokenKind::{Mark, Text};
        assert_eq!(
            shape(&store, root),
            vec![
                (Mark, "<"),
                (Mark, "^"),
                (Mark, "$"),
                (Mark, "^"),
                (Mark, "("),
                (Text, "ff0000"),
                (Mark, "^"),
                (Text, "Hi"),
                (Mark, "$"),
                (Mark, ")"),
                (Mark, "$"),
                (Mark, ">"),
            ],
        );
    }

    #[test]
    fn a_top_level_pipe_is_ordinary_text() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, "a|b");
        assert_eq!(texts(&store, root), vec!["a|b"]);
    }

    #[test]
    fn a_pipe_inside_a_bracket_separates_branches() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, "{a | b}");

        let doc = store.at(root);
        let group = doc.children().nth(1).unwrap().children().next().unwrap();
        assert_eq!(group.front(), '{');
        let branch_texts: Vec<Vec<&str>> = group
            .children()
            .map(|branch| {
                branch
                    .descendants()
                    .map(|index| store.at(TokenId(index as u32)).text())
                    .collect()
            })
            .collect();
        assert_eq!(branch_texts, vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn leading_spaces_are_dropped_and_trailing_spaces_trimmed() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, "  hi  ");
        assert_eq!(texts(&store, root), vec!["hi"]);
    }

    #[test]
    fn the_empty_group_keeps_following_whitespace() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, "{}   hi");
        assert_eq!(texts(&store, root), vec!["   hi"]);
    }

    #[test]
    fn escapes_capture_the_next_character_verbatim() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, r"a\(b\");
        assert_eq!(texts(&store, root), vec!["a", "(", "b"]);
    }

    #[test]
    fn a_widget_takes_a_name_and_pipe_separated_branches() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, "< gradient | ffff00 | 00ffff >");

        let doc = store.at(root);
        let widget = doc.children().nth(1).unwrap().children().next().unwrap();
        assert_eq!(widget.front(), '<');
        let mut children = widget.children();
        assert_eq!(children.next().unwrap().text(), "gradient");
        let first = children.next().unwrap();
        assert_eq!(first.front(), '^');
        assert_eq!(
            first
                .descendants()
                .map(|index| store.at(TokenId(index as u32)).text())
                .collect::<Vec<_>>(),
            vec!["ffff00"],
        );
    }

    #[test]
    fn a_nameless_widget_gets_an_empty_name_branch() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, "<|a>");

        let doc = store.at(root);
        let widget = doc.children().nth(1).unwrap().children().next().unwrap();
        let name = widget.children().next().unwrap();
        assert_eq!(name.front(), '^');
        assert_eq!(name.descendants().len(), 0);
    }

    #[test]
    fn a_bad_color_reports_what_it_saw() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, "(bad:x)");
        let texts = texts(&store, root);
        assert!(texts.contains(&"expecting hex color in rrggbb format, but got \""));
        assert!(texts.contains(&"bad:x)"));
    }

    #[test]
    fn a_missing_colon_reports_the_color() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, "(ff0000x)");
        let texts = texts(&store, root);
        assert!(texts.contains(&"missing colon \":\" after the color \""));
        assert!(texts.contains(&"ff0000"));
    }

    #[test]
    fn an_unclosed_color_reports_the_dangling_bracket() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, "(ff0000:x");
        assert!(texts(&store, root).contains(&"missing leaving token for \""));
    }

    #[test]
    fn a_bare_widget_open_reports_the_missing_name() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, "<");
        assert!(texts(&store, root).contains(&"missing widget name."));
    }

    #[test]
    fn a_widget_name_followed_by_garbage_is_quoted_with_it() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, "<foo(bar)>");
        let texts = texts(&store, root);
        assert!(texts.contains(&"invalid widget name \""));
        assert!(texts.contains(&"foo("));
    }

    #[test]
    fn a_widget_name_at_end_of_input_reports_the_missing_separator() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, "<time");
        let texts = texts(&store, root);
        assert!(texts.contains(&"expecting \"|\" or \">\" after the widget name \""));
        assert!(texts.contains(&"time"));
    }

    #[test]
    fn all_marks_of_a_successful_parse_are_paired() {
        let mut store = TokenStore::new();
        let root = parse(&mut store, "{a | (00ff00:b) | [112233:c <w>]}");
        for index in store.at(root).tree() {
            let tk = store.at(TokenId(index as u32));
            if tk.kind() == TokenKind::Mark {
                let pair = tk.pair().expect("paired");
                assert_eq!(pair.pair().map(|p| p.id()), Some(tk.id()));
            }
        }
    }
}
