//! Token storage and tree navigation.
//!
//!     A `TokenStore` owns one growable, contiguous run of tokens. Tokens are
//!     only appended, never removed or reordered, so a `TokenId` stays valid
//!     for the store's whole lifetime and comparing two ids compares storage
//!     positions. That ordering is the entire tree encoding: the subtree of a
//!     matched pair is the contiguous id range `[entering, leaving]`, and
//!     siblings are found by hopping from one child's leaving mark to the next
//!     position.
//!
//!     The [`Tok`] cursor packages a store reference with an id and exposes
//!     the navigation operations; it is `Copy` and cheap to pass around.

use std::ops::Range;
use std::sync::atomic::{AtomicU32, Ordering};

use super::token::{AltLink, StoreId, Token, TokenId, TokenKind};

static NEXT_STORE_ID: AtomicU32 = AtomicU32::new(0);

/// Append-only token arena. One parse may append several runs (a document and
/// any diagnostic documents formatted against it); all of them share this
/// storage and die together with it.
#[derive(Debug)]
pub struct TokenStore<'s> {
    id: StoreId,
    tokens: Vec<Token<'s>>,
}

impl<'s> TokenStore<'s> {
    pub fn new() -> TokenStore<'s> {
        TokenStore {
            id: StoreId(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed)),
            tokens: Vec::new(),
        }
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn push(&mut self, token: Token<'s>) -> TokenId {
        let id = TokenId(self.tokens.len() as u32);
        self.tokens.push(token);
        id
    }

    /// Append a finished run of tokens and return its id range. The run is
    /// contiguous and fixed from here on; pair linking happens in place.
    pub fn splice_run(&mut self, run: Vec<Token<'s>>) -> Range<u32> {
        let start = self.tokens.len() as u32;
        self.tokens.extend(run);
        start..self.tokens.len() as u32
    }

    pub fn token(&self, id: TokenId) -> &Token<'s> {
        &self.tokens[id.index()]
    }

    pub fn last_id(&self) -> Option<TokenId> {
        if self.tokens.is_empty() { None } else { Some(TokenId(self.tokens.len() as u32 - 1)) }
    }

    pub fn at<'a>(&'a self, id: TokenId) -> Tok<'a, 's> {
        assert!(id.index() < self.tokens.len(), "token id out of range");
        Tok { store: self, id }
    }

    /// Cursor by raw position, for walking [`Tok::tree`] ranges.
    pub fn at_index<'a>(&'a self, index: usize) -> Tok<'a, 's> {
        self.at(TokenId(index as u32))
    }

    /// Link two mark tokens as a pair, both ways.
    pub(crate) fn link_pair(&mut self, a: TokenId, b: TokenId) {
        assert!(a != b, "a mark cannot pair with itself");
        let (ta, tb) = (&self.tokens[a.index()], &self.tokens[b.index()]);
        assert!(ta.kind == TokenKind::Mark && tb.kind == TokenKind::Mark);
        assert!(ta.pair.is_none() && tb.pair.is_none(), "token is already paired");
        self.tokens[a.index()].pair = Some(b);
        self.tokens[b.index()].pair = Some(a);
    }

    fn is_entering(&self, id: TokenId) -> bool {
        match self.tokens[id.index()].pair {
            Some(p) => p > id,
            None => false,
        }
    }

    /// Connect two entering marks of this store with a forward link, and their
    /// leaving counterparts with the link in the opposite direction.
    ///
    /// Panics if either token is not an entering mark, or if either slot is
    /// already connected: both indicate a caller bug, not an input error.
    pub fn connect_alt(&mut self, from: TokenId, target: TokenId) {
        assert!(self.is_entering(target), "alt target must be an entering mark");
        assert!(self.is_entering(from), "alt source must be an entering mark");

        let from_leaving = match self.tokens[from.index()].pair {
            Some(p) => p,
            None => unreachable!("entering marks are paired"),
        };
        let target_leaving = match self.tokens[target.index()].pair {
            Some(p) => p,
            None => unreachable!("entering marks are paired"),
        };

        let id = self.id;
        self.set_alt(from, AltLink { store: id, token: target });
        self.set_alt(target_leaving, AltLink { store: id, token: from_leaving });
    }

    fn set_alt(&mut self, id: TokenId, link: AltLink) {
        let token = &mut self.tokens[id.index()];
        match token.kind {
            TokenKind::Mark => {
                assert!(token.alt.is_none(), "alt slot is already connected");
                token.alt = Some(link);
            }
            TokenKind::Text => panic!("text tokens have no alt slot"),
        }
    }
}

impl<'s> Default for TokenStore<'s> {
    fn default() -> Self {
        TokenStore::new()
    }
}

/// Connect entering marks living in two different stores. The link is
/// non-owning: dropping either store simply leaves the other side dangling by
/// id, which consumers must treat as opaque.
pub fn connect_alt_across<'a, 'b>(
    from_store: &mut TokenStore<'a>,
    from: TokenId,
    target_store: &mut TokenStore<'b>,
    target: TokenId,
) {
    assert!(from_store.id != target_store.id, "use connect_alt within one store");
    assert!(target_store.is_entering(target), "alt target must be an entering mark");
    assert!(from_store.is_entering(from), "alt source must be an entering mark");

    let from_leaving = match from_store.tokens[from.index()].pair {
        Some(p) => p,
        None => unreachable!("entering marks are paired"),
    };
    let target_leaving = match target_store.tokens[target.index()].pair {
        Some(p) => p,
        None => unreachable!("entering marks are paired"),
    };

    from_store.set_alt(from, AltLink { store: target_store.id, token: target });
    target_store.set_alt(target_leaving, AltLink { store: from_store.id, token: from_leaving });
}

/// A copyable cursor over one token of a store.
#[derive(Clone, Copy)]
pub struct Tok<'a, 's> {
    store: &'a TokenStore<'s>,
    id: TokenId,
}

impl<'a, 's> Tok<'a, 's> {
    pub fn id(self) -> TokenId {
        self.id
    }

    pub fn store(self) -> &'a TokenStore<'s> {
        self.store
    }

    fn token(self) -> &'a Token<'s> {
        self.store.token(self.id)
    }

    pub fn kind(self) -> TokenKind {
        self.token().kind
    }

    pub fn text(self) -> &'s str {
        self.token().text
    }

    pub fn front(self) -> char {
        self.token().front()
    }

    pub fn alt(self) -> Option<AltLink> {
        self.token().alt()
    }

    pub fn pair(self) -> Option<Tok<'a, 's>> {
        self.token().pair.map(|p| self.store.at(p))
    }

    pub fn is_entering(self) -> bool {
        matches!(self.token().pair, Some(p) if p > self.id)
    }

    pub fn is_leaving(self) -> bool {
        matches!(self.token().pair, Some(p) if p < self.id)
    }

    /// The lower-positioned member of the pair; `self` when unpaired.
    pub fn entering(self) -> Tok<'a, 's> {
        match self.token().pair {
            Some(p) if p < self.id => self.store.at(p),
            _ => self,
        }
    }

    /// The higher-positioned member of the pair; `self` when unpaired.
    pub fn leaving(self) -> Tok<'a, 's> {
        match self.token().pair {
            Some(p) if p > self.id => self.store.at(p),
            _ => self,
        }
    }

    pub fn next(self) -> Option<Tok<'a, 's>> {
        let next = self.id.index() + 1;
        if next < self.store.len() { Some(self.store.at(TokenId(next as u32))) } else { None }
    }

    pub fn prev(self) -> Option<Tok<'a, 's>> {
        if self.id.0 > 0 { Some(self.store.at(TokenId(self.id.0 - 1))) } else { None }
    }

    /// The token right after this token's whole subtree.
    pub fn next_sibling(self) -> Option<Tok<'a, 's>> {
        self.leaving().next()
    }

    pub fn prev_sibling(self) -> Option<Tok<'a, 's>> {
        self.entering().prev()
    }

    /// Id range of the whole subtree, `[entering, leaving]` inclusive.
    pub fn tree(self) -> Range<usize> {
        self.entering().id.index()..self.leaving().id.index() + 1
    }

    /// Id range strictly between the pair marks.
    pub fn descendants(self) -> Range<usize> {
        self.entering().id.index() + 1..self.leaving().id.index()
    }

    /// Direct children, found by hopping over each child's subtree.
    pub fn children(self) -> Children<'a, 's> {
        let range = self.descendants();
        Children { store: self.store, cur: range.start, end: range.end }
    }
}

pub struct Children<'a, 's> {
    store: &'a TokenStore<'s>,
    cur: usize,
    end: usize,
}

impl<'a, 's> Iterator for Children<'a, 's> {
    type Item = Tok<'a, 's>;

    fn next(&mut self) -> Option<Tok<'a, 's>> {
        if self.cur >= self.end {
            return None;
        }
        let child = self.store.at(TokenId(self.cur as u32));
        self.cur = child.leaving().id.index() + 1;
        Some(child)
    }
}
