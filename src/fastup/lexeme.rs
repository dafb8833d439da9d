//! Raw lexemes feeding the scanner.
//!
//!     The scanner does not walk the source byte by byte: a logos lexer first
//!     chops it into a flat stream of magical characters, escapes, and
//!     longest-match text runs. Everything context-sensitive (widget headers,
//!     hex colors, escaped characters, space skipping) is handled by the
//!     scanner on top of this stream, slicing the source through the lexer's
//!     spans so no text is ever copied.
//!
//!     `^` and `$` are deliberately absent here: the branch pair is synthetic
//!     and has no surface syntax, so both characters lex as ordinary text.

use logos::Logos;

/// All lexemes of the Fastup surface syntax.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum RawLexeme {
    #[token("<")]
    WidgetOpen,
    #[token(">")]
    WidgetClose,
    #[token("(")]
    ForegroundOpen,
    #[token(")")]
    ForegroundClose,
    #[token("[")]
    BackgroundOpen,
    #[token("]")]
    BackgroundClose,
    #[token("{")]
    GroupOpen,
    #[token("}")]
    GroupClose,

    /// Branch separator inside a bracket; ordinary text at the top level.
    #[token("|")]
    Pipe,

    /// Escape introducer; the scanner consumes the escaped character itself.
    #[token("\\")]
    Backslash,

    /// Longest run of non-magical characters.
    #[regex(r"[^<>()\[\]{}|\\]+")]
    Run,
}

/// Whitespace as the scanner sees it: space, tab, and the other ASCII
/// vertical-space controls.
pub fn is_space(byte: u8) -> bool {
    byte == b' ' || (0x09..=0x0d).contains(&byte)
}

/// Characters that terminate a text run.
pub fn is_magical(byte: u8) -> bool {
    matches!(
        byte,
        b'<' | b'>' | b'(' | b')' | b'[' | b']' | b'{' | b'}' | b'|' | b'\\'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<(RawLexeme, &str)> {
        let mut lexer = RawLexeme::lexer(source);
        let mut out = Vec::new();
        while let Some(item) = lexer.next() {
            out.push((item.expect("every byte lexes"), lexer.slice()));
        }
        out
    }

    #[test]
    fn magical_characters_lex_alone() {
        assert_eq!(
            lex("a(b)c"),
            vec![
                (RawLexeme::Run, "a"),
                (RawLexeme::ForegroundOpen, "("),
                (RawLexeme::Run, "b"),
                (RawLexeme::ForegroundClose, ")"),
                (RawLexeme::Run, "c"),
            ]
        );
    }

    #[test]
    fn branch_characters_are_plain_text() {
        assert_eq!(lex("a^b$c"), vec![(RawLexeme::Run, "a^b$c")]);
    }

    #[test]
    fn runs_swallow_whitespace_and_newlines() {
        assert_eq!(
            lex(" a\nb\t|"),
            vec![(RawLexeme::Run, " a\nb\t"), (RawLexeme::Pipe, "|")]
        );
    }

    #[test]
    fn backslash_is_its_own_lexeme() {
        assert_eq!(
            lex(r"a\(b"),
            vec![
                (RawLexeme::Run, "a"),
                (RawLexeme::Backslash, "\\"),
                (RawLexeme::ForegroundOpen, "("),
                (RawLexeme::Run, "b"),
            ]
        );
    }

    #[test]
    fn space_predicate_matches_the_ascii_controls() {
        for byte in [b' ', b'\t', b'\n', 0x0b, 0x0c, b'\r'] {
            assert!(is_space(byte));
        }
        assert!(!is_space(b'a'));
        assert!(is_magical(b'|'));
        assert!(!is_magical(b'^'));
    }
}
