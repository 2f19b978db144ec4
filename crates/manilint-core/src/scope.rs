//! Block tree: nested brace-delimited regions of a token stream.
//!
//! The tree is derived data. It holds token indices into the stream it was
//! built from and must be rebuilt after any fix that inserts tokens.

use crate::token::{TokenKind, TokenStream};
use serde::Serialize;
use std::ops::Range;

/// Index of a [`Block`] within its [`BlockTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockId(usize);

impl BlockId {
    /// The virtual block covering the whole manifest.
    pub const ROOT: Self = Self(0);
}

/// Syntactic role of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    /// The whole manifest.
    Root,
    /// `type { 'title': attr => value }` or resource defaults `Type { ... }`.
    ResourceBody,
    /// Hash literal `{ key => value }`.
    Hash,
    /// Selector body `$x ? { case => result }`.
    Selector,
    /// Class, define, node, conditional and lambda bodies.
    Code,
}

/// One `title: attributes` section of a resource body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TitleScope {
    /// Last code token of the title (the string, variable or `]`).
    pub title: usize,
    /// The `:` after the title.
    pub colon: usize,
    /// The `;` ending the section, or the block's closing `}`.
    pub end: usize,
}

impl TitleScope {
    /// Tokens strictly between the colon and the terminator.
    #[must_use]
    pub fn interior(&self) -> Range<usize> {
        self.colon + 1..self.end
    }
}

/// A brace-delimited region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Syntactic role.
    pub kind: BlockKind,
    /// Index of `{` (0 for the root).
    pub open: usize,
    /// Index of the matching `}` (stream length for the root or an unclosed block).
    pub close: usize,
    /// True if `{` and `}` are on the same source line.
    pub single_line: bool,
    /// Enclosing block; `None` only for the root.
    pub parent: Option<BlockId>,
    /// Directly nested blocks in source order.
    pub children: Vec<BlockId>,
    /// Title sections of a resource body; empty for every other kind.
    pub titles: Vec<TitleScope>,
}

impl Block {
    /// Tokens strictly inside the delimiters.
    #[must_use]
    pub fn interior(&self) -> Range<usize> {
        match self.kind {
            BlockKind::Root => self.open..self.close,
            _ => self.open + 1..self.close,
        }
    }

    /// Token ranges whose attribute lines share one alignment column: one per
    /// title section of a titled resource body, otherwise the whole interior.
    #[must_use]
    pub fn scopes(&self) -> Vec<Range<usize>> {
        if self.titles.is_empty() {
            vec![self.interior()]
        } else {
            self.titles.iter().map(TitleScope::interior).collect()
        }
    }
}

/// Arena of blocks plus, for every token, the innermost block containing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockTree {
    blocks: Vec<Block>,
    owners: Vec<BlockId>,
}

impl BlockTree {
    /// Returns the block with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    #[must_use]
    pub fn get(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    /// The root block.
    #[must_use]
    pub fn root(&self) -> &Block {
        self.get(BlockId::ROOT)
    }

    /// Number of blocks, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: the root exists even for an empty manifest.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in pre-order (by position of their opening brace).
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks.iter().enumerate().map(|(i, b)| (BlockId(i), b))
    }

    /// Blocks of the given kind, in pre-order.
    pub fn of_kind(&self, kind: BlockKind) -> impl Iterator<Item = (BlockId, &Block)> {
        self.iter().filter(move |(_, b)| b.kind == kind)
    }

    /// Innermost block containing token `index`. Braces belong to the
    /// enclosing block, not to the block they delimit.
    #[must_use]
    pub fn owner(&self, index: usize) -> BlockId {
        self.owners.get(index).copied().unwrap_or(BlockId::ROOT)
    }
}

/// Builds the block tree of `tokens` in one left-to-right scan.
///
/// Total on any input: a stray `}` is ignored and blocks still open at the
/// end are closed at the end of the stream.
#[must_use]
pub fn build_blocks(tokens: &TokenStream) -> BlockTree {
    let toks = tokens.as_slice();
    let mut blocks = vec![Block {
        kind: BlockKind::Root,
        open: 0,
        close: toks.len(),
        single_line: false,
        parent: None,
        children: Vec::new(),
        titles: Vec::new(),
    }];
    let mut owners = Vec::with_capacity(toks.len());
    let mut stack = vec![BlockId::ROOT];

    for (i, token) in toks.iter().enumerate() {
        let current = stack.last().copied().unwrap_or(BlockId::ROOT);
        owners.push(current);
        match token.kind {
            TokenKind::LBrace => {
                let id = BlockId(blocks.len());
                blocks.push(Block {
                    kind: classify(tokens, i),
                    open: i,
                    close: toks.len(),
                    single_line: false,
                    parent: Some(current),
                    children: Vec::new(),
                    titles: Vec::new(),
                });
                blocks[current.0].children.push(id);
                stack.push(id);
            }
            TokenKind::RBrace if stack.len() > 1 => {
                if let Some(id) = stack.pop() {
                    let block = &mut blocks[id.0];
                    block.close = i;
                    block.single_line = toks[block.open].line == token.line;
                    owners[i] = block.parent.unwrap_or(BlockId::ROOT);
                }
            }
            _ => {}
        }
    }

    let mut tree = BlockTree { blocks, owners };
    for index in 0..tree.blocks.len() {
        if tree.blocks[index].kind == BlockKind::ResourceBody {
            let titles = find_titles(tokens, &tree, BlockId(index));
            tree.blocks[index].titles = titles;
        }
    }
    tree
}

/// Decides what the `{` at `index` opens from the code token before it.
fn classify(tokens: &TokenStream, index: usize) -> BlockKind {
    let Some(prev) = tokens.prev_code(index).and_then(|i| tokens.get(i)) else {
        return BlockKind::Hash;
    };
    match prev.kind {
        TokenKind::Question => BlockKind::Selector,
        TokenKind::TypeRef => BlockKind::ResourceBody,
        TokenKind::Name if opens_with_title(tokens, index) => BlockKind::ResourceBody,
        TokenKind::FatArrow | TokenKind::LParen | TokenKind::LBrack | TokenKind::Comma => {
            BlockKind::Hash
        }
        TokenKind::Operator if matches!(prev.text.as_str(), "=" | "+" | "+=") => BlockKind::Hash,
        _ => BlockKind::Code,
    }
}

/// True if the body after the `{` at `index` starts with `title:`, i.e. a
/// `:` comes before any `=>`, `;` or brace at the body's own nesting level.
fn opens_with_title(tokens: &TokenStream, index: usize) -> bool {
    let mut depth = 0usize;
    let mut i = index;
    while let Some(next) = tokens.next_code(i) {
        i = next;
        let Some(token) = tokens.get(i) else { break };
        match token.kind {
            TokenKind::LBrack | TokenKind::LParen => depth += 1,
            TokenKind::RBrack | TokenKind::RParen => depth = depth.saturating_sub(1),
            TokenKind::Colon if depth == 0 => return true,
            TokenKind::FatArrow | TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace
                if depth == 0 =>
            {
                return false
            }
            _ => {}
        }
    }
    false
}

/// Splits a resource body into its `title:` sections.
fn find_titles(tokens: &TokenStream, tree: &BlockTree, id: BlockId) -> Vec<TitleScope> {
    let block = tree.get(id);
    let mut titles: Vec<TitleScope> = Vec::new();
    let mut open: Option<(usize, usize)> = None;

    for i in block.interior() {
        if tree.owner(i) != id {
            continue;
        }
        let Some(token) = tokens.get(i) else { break };
        match token.kind {
            TokenKind::Colon if open.is_none() => {
                let title = tokens.prev_code(i).unwrap_or(i);
                open = Some((title, i));
            }
            TokenKind::Semicolon => {
                if let Some((title, colon)) = open.take() {
                    titles.push(TitleScope {
                        title,
                        colon,
                        end: i,
                    });
                }
            }
            _ => {}
        }
    }
    if let Some((title, colon)) = open {
        titles.push(TitleScope {
            title,
            colon,
            end: block.close,
        });
    }
    titles
}
