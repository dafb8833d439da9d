//! Token record and mark classification.
//!
//!     A Fastup document is a flat run of fixed-size tokens. Tree structure is
//!     not stored as parent/child links: a matched pair of mark tokens delimits
//!     a subtree, and which member of the pair "enters" the subtree is decided
//!     purely by comparing their positions in the run. See [store](super::store)
//!     for the storage and navigation layer built on top of this record.
//!
//! Mark characters
//!
//!     `< >` widget, `( )` foreground color, `[ ]` background color, `{ }`
//!     literal group, and the synthetic `^ $` branch pair. The branch pair has
//!     no surface syntax; `^` and `$` in source text are ordinary text.

/// What a token holds: a structural mark character, or a captured substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Mark,
    Text,
}

/// Index of a token inside a [`TokenStore`](super::store::TokenStore).
///
/// Tokens are only ever appended to a store, so an id stays valid for the
/// store's whole lifetime. Ordering of ids is storage order, which is what
/// encodes the tree (see [`Pairable`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(pub(crate) u32);

impl TokenId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Process-unique identity of a token store, carried by cross-document links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(pub(crate) u32);

/// A non-owning link from one entering mark to another, possibly in a
/// different store. Connecting two documents never couples their lifetimes;
/// whoever follows the link is responsible for keeping the target store alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AltLink {
    pub store: StoreId,
    pub token: TokenId,
}

/// One fixed-size token.
///
/// For `Text` the captured substring borrows the source (never copied) and is
/// guaranteed non-empty. For `Mark` the text is the single mark character and
/// `alt` may carry a cross-document link once the token is paired.
#[derive(Debug, Clone, Copy)]
pub struct Token<'s> {
    pub(crate) kind: TokenKind,
    pub(crate) pair: Option<TokenId>,
    pub(crate) alt: Option<AltLink>,
    pub(crate) text: &'s str,
}

impl<'s> Token<'s> {
    /// Create a text token capturing `text`. Panics if the capture is empty.
    pub fn text_token(text: &'s str) -> Token<'s> {
        assert!(!text.is_empty(), "a text token captures at least one character");
        Token { kind: TokenKind::Text, pair: None, alt: None, text }
    }

    /// Create a mark token for one of the pairable characters.
    pub fn mark(ch: char) -> Token<'static> {
        let text = match ch {
            '<' => "<",
            '>' => ">",
            '(' => "(",
            ')' => ")",
            '[' => "[",
            ']' => "]",
            '{' => "{",
            '}' => "}",
            '^' => "^",
            '$' => "$",
            other => panic!("not a pairable mark character: {other:?}"),
        };
        Token { kind: TokenKind::Mark, pair: None, alt: None, text }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &'s str {
        self.text
    }

    /// First character of the token's text. Always present.
    pub fn front(&self) -> char {
        match self.text.chars().next() {
            Some(ch) => ch,
            None => unreachable!("token text is never empty"),
        }
    }

    pub fn pair_id(&self) -> Option<TokenId> {
        self.pair
    }

    /// Cross-document link. Only mark tokens can hold one.
    pub fn alt(&self) -> Option<AltLink> {
        match self.kind {
            TokenKind::Mark => self.alt,
            TokenKind::Text => None,
        }
    }
}

/// Which side of a pair a token's mark character sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairable {
    No,
    Entering,
    Leaving,
}

/// Classify a token for pair matching. Text tokens never pair.
pub fn pairable(token: &Token<'_>) -> Pairable {
    match token.kind {
        TokenKind::Text => Pairable::No,
        TokenKind::Mark => match token.front() {
            '<' | '(' | '[' | '{' | '^' => Pairable::Entering,
            '>' | ')' | ']' | '}' | '$' => Pairable::Leaving,
            _ => Pairable::No,
        },
    }
}

/// The complement of a pairable mark character.
pub fn paired_char_of(ch: char) -> char {
    match ch {
        '<' => '>',
        '>' => '<',
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '^' => '$',
        '$' => '^',
        other => panic!("not a pairable mark character: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_tokens_carry_their_character() {
        let tk = Token::mark('(');
        assert_eq!(tk.kind(), TokenKind::Mark);
        assert_eq!(tk.text(), "(");
        assert_eq!(tk.front(), '(');
        assert_eq!(tk.pair_id(), None);
    }

    #[test]
    fn text_tokens_capture_their_slice() {
        let tk = Token::text_token("hello");
        assert_eq!(tk.kind(), TokenKind::Text);
        assert_eq!(tk.text(), "hello");
        assert_eq!(tk.alt(), None);
    }

    #[test]
    #[should_panic(expected = "at least one character")]
    fn empty_text_token_is_rejected() {
        let _ = Token::text_token("");
    }

    #[test]
    #[should_panic(expected = "not a pairable mark character")]
    fn unknown_mark_character_is_rejected() {
        let _ = Token::mark('x');
    }

    #[test]
    fn classification_covers_every_mark() {
        for (enter, leave) in [('<', '>'), ('(', ')'), ('[', ']'), ('{', '}'), ('^', '$')] {
            assert_eq!(pairable(&Token::mark(enter)), Pairable::Entering);
            assert_eq!(pairable(&Token::mark(leave)), Pairable::Leaving);
            assert_eq!(paired_char_of(enter), leave);
            assert_eq!(paired_char_of(leave), enter);
        }
        assert_eq!(pairable(&Token::text_token("^$")), Pairable::No);
    }
}
