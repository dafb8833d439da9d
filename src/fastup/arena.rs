//! Append-only block arena for rendered output.
//!
//!     Compared to a plain growable buffer, a block arena never copies already
//!     written bytes while appending: when the current block runs out, a fresh
//!     block is chained on the back. The one copy a caller can pay for is the
//!     explicit [`consolidate`](Arena::consolidate), which merges every block
//!     into a single one so the whole content can be read as one slice.
//!
//!     Allocations hand out [`ByteSpan`] handles instead of references. A span
//!     is resolved through the arena that issued it and stays resolvable until
//!     the next consolidation; resolving a stale span panics instead of
//!     reading the wrong block.
//!
//!     Renderers use the splice operations to build output privately and then
//!     move it, block ownership and all, into the caller's output arena.

/// Block payload capacity. Must be a power of two.
pub const DEFAULT_BLOCK_SIZE: usize = 4 * 1024;

/// Handle to a contiguous allocation inside an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSpan {
    block: u32,
    start: u32,
    len: u32,
}

impl ByteSpan {
    pub const EMPTY: ByteSpan = ByteSpan { block: 0, start: 0, len: 0 };

    pub fn len(self) -> usize {
        self.len as usize
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

#[derive(Debug)]
struct Block {
    buf: Box<[u8]>,
    used: usize,
    /// Alignment of the first record written into this block; consolidation
    /// re-pads to it so record layout survives the merge.
    first_align: usize,
}

impl Block {
    fn new(capacity: usize, first_align: usize) -> Block {
        Block { buf: vec![0u8; capacity].into_boxed_slice(), used: 0, first_align }
    }
}

/// An append-only pool of fixed-capacity blocks.
#[derive(Debug)]
pub struct Arena {
    blocks: Vec<Block>,
    block_size: usize,
}

impl Arena {
    pub fn new() -> Arena {
        Arena::with_block_size(DEFAULT_BLOCK_SIZE)
    }

    pub fn with_block_size(block_size: usize) -> Arena {
        assert!(block_size.is_power_of_two(), "block size must be a power of two");
        Arena { blocks: Vec::new(), block_size }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Exactly one block: spans stay valid under further non-merging use.
    pub fn is_solid(&self) -> bool {
        self.blocks.len() == 1
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total bytes handed out so far, not counting alignment padding lost to
    /// block boundaries.
    pub fn used_len(&self) -> usize {
        self.blocks.iter().map(|b| b.used).sum()
    }

    /// Allocate `size` bytes aligned to `align` (a power of two dividing the
    /// block size). Appends a new block when the current one cannot satisfy
    /// the request, sized to the smallest multiple of the block size that
    /// fits. Never fails; allocator exhaustion aborts.
    pub fn alloc(&mut self, size: usize, align: usize) -> ByteSpan {
        assert!(align.is_power_of_two(), "alignment must be a power of two");
        assert!(self.block_size % align == 0, "alignment must divide the block size");
        if size == 0 {
            return ByteSpan::EMPTY;
        }

        let fits = match self.blocks.last() {
            Some(block) => align_up(block.used, align) + size <= block.buf.len(),
            None => false,
        };
        if !fits {
            let capacity = align_up(size, self.block_size);
            self.blocks.push(Block::new(capacity, align));
        }

        let index = self.blocks.len() - 1;
        let block = &mut self.blocks[index];
        let start = align_up(block.used, align);
        block.used = start + size;
        ByteSpan { block: index as u32, start: start as u32, len: size as u32 }
    }

    /// Allocate-and-copy convenience.
    pub fn push_bytes(&mut self, data: &[u8]) -> ByteSpan {
        let span = self.alloc(data.len(), 1);
        self.bytes_mut(span).copy_from_slice(data);
        span
    }

    pub fn push_str(&mut self, text: &str) -> ByteSpan {
        self.push_bytes(text.as_bytes())
    }

    pub fn bytes(&self, span: ByteSpan) -> &[u8] {
        if span.is_empty() {
            return &[];
        }
        let block = &self.blocks[span.block as usize];
        &block.buf[span.start as usize..span.start as usize + span.len as usize]
    }

    pub fn bytes_mut(&mut self, span: ByteSpan) -> &mut [u8] {
        if span.is_empty() {
            return &mut [];
        }
        let block = &mut self.blocks[span.block as usize];
        &mut block.buf[span.start as usize..span.start as usize + span.len as usize]
    }

    /// Read a span back as text. The arena only ever receives whole `str`s
    /// from the renderers, so a violation here is a broken invariant.
    pub fn text(&self, span: ByteSpan) -> &str {
        match std::str::from_utf8(self.bytes(span)) {
            Ok(text) => text,
            Err(_) => panic!("arena span does not hold valid UTF-8"),
        }
    }

    /// Move all of `other`'s blocks onto the back of this arena. O(1) in
    /// block count; `other`'s spans are not translated. New allocations may
    /// continue in the spliced tail block's free space.
    pub fn splice(&mut self, mut other: Arena) {
        self.blocks.append(&mut other.blocks);
    }

    /// Consolidate `other` (at most one merge), splice its single block onto
    /// the back, and return the span of the transferred content as addressed
    /// from `self`.
    pub fn splice_solid(&mut self, mut other: Arena) -> ByteSpan {
        other.consolidate();
        match other.blocks.pop() {
            None => ByteSpan::EMPTY,
            Some(block) => {
                let len = block.used;
                self.blocks.push(block);
                ByteSpan { block: (self.blocks.len() - 1) as u32, start: 0, len: len as u32 }
            }
        }
    }

    /// Merge all blocks into exactly one block sized to fit every used byte,
    /// preserving each block's first-record alignment, and discard the old
    /// blocks. Every previously issued span is invalidated. No-op when the
    /// arena is already empty or solid.
    pub fn consolidate(&mut self) {
        if self.blocks.len() <= 1 {
            return;
        }

        let mut total = 0usize;
        for block in &self.blocks {
            total = align_up(total, block.first_align) + block.used;
        }

        let first_align = self.blocks[0].first_align;
        let mut merged = Block::new(align_up(total, self.block_size), first_align);
        let mut offset = 0usize;
        for block in &self.blocks {
            offset = align_up(offset, block.first_align);
            merged.buf[offset..offset + block.used].copy_from_slice(&block.buf[..block.used]);
            offset += block.used;
        }
        merged.used = offset;

        self.blocks.clear();
        self.blocks.push(merged);
    }

    /// Consolidate if needed and return the full used region. The slice is
    /// valid until the arena's next allocation or consolidation; with no
    /// intervening writes, repeated calls return identical bytes.
    pub fn read_all(&mut self) -> &[u8] {
        self.consolidate();
        match self.blocks.first() {
            None => &[],
            Some(block) => &block.buf[..block.used],
        }
    }
}

impl Default for Arena {
    fn default() -> Arena {
        Arena::new()
    }
}

fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_grow_new_blocks_on_demand() {
        let mut arena = Arena::with_block_size(64);
        arena.push_bytes(&[1u8; 48]);
        assert_eq!(arena.block_count(), 1);
        arena.push_bytes(&[2u8; 48]);
        assert_eq!(arena.block_count(), 2);
        // Oversized requests get a block of the least fitting multiple.
        arena.push_bytes(&[3u8; 200]);
        assert_eq!(arena.block_count(), 3);
        assert_eq!(arena.used_len(), 48 + 48 + 200);
    }

    #[test]
    fn alignment_pads_the_write_offset() {
        let mut arena = Arena::with_block_size(64);
        arena.alloc(1, 1);
        let span = arena.alloc(8, 8);
        assert_eq!(arena.bytes(span).len(), 8);
        arena.consolidate();
        // One block, content still addressable through read_all.
        assert!(arena.is_solid());
    }

    #[test]
    fn spans_read_back_what_was_written() {
        let mut arena = Arena::new();
        let a = arena.push_str("hello ");
        let b = arena.push_str("world");
        assert_eq!(arena.text(a), "hello ");
        assert_eq!(arena.text(b), "world");
    }

    #[test]
    fn read_all_is_idempotent_without_intervening_writes() {
        let mut arena = Arena::with_block_size(16);
        arena.push_str("0123456789abcdef");
        arena.push_str("more");
        let first = arena.read_all().to_vec();
        let second = arena.read_all().to_vec();
        assert_eq!(first, second);
        assert_eq!(first, b"0123456789abcdefmore");
        assert!(arena.is_solid());
    }

    #[test]
    fn splice_transfers_blocks_in_order() {
        let mut front = Arena::with_block_size(16);
        front.push_str("front");
        let mut back = Arena::with_block_size(16);
        back.push_str("0123456789abcdef");
        back.push_str("back");
        let blocks = back.block_count();

        front.splice(back);
        assert_eq!(front.block_count(), 1 + blocks);
        assert_eq!(front.read_all(), b"front0123456789abcdefback");
    }

    #[test]
    fn splice_solid_returns_the_transferred_span() {
        let mut out = Arena::new();
        out.push_str("prefix");
        let mut pool = Arena::with_block_size(16);
        pool.push_str("0123456789abcdef");
        pool.push_str("tail");

        let span = out.splice_solid(pool);
        assert_eq!(out.text(span), "0123456789abcdeftail");
    }

    #[test]
    fn empty_spans_resolve_anywhere() {
        let arena = Arena::new();
        assert_eq!(arena.bytes(ByteSpan::EMPTY), &[] as &[u8]);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn block_size_must_be_a_power_of_two() {
        let _ = Arena::with_block_size(100);
    }
}
