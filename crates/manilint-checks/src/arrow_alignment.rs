//! Check that the `=>` of attribute lines in one scope share a column.
//!
//! # Rationale
//!
//! Aligned arrows make attribute lists scannable. The column is the
//! narrowest one that fits: one space past the longest key.
//!
//! # Scopes
//!
//! Every multi-line block (resource body, hash, selector, code body and the
//! manifest itself) is aligned on its own, and each `title:` section of a
//! multi-title resource body is aligned separately. Lines of nested blocks
//! belong to the nested block only.

use manilint_core::{
    BlockId, BlockTree, Check, FixSet, Location, Problem, RunContext, Severity, Token,
    TokenKind, TokenStream,
};
use std::ops::Range;
use tracing::debug;

/// Check code for arrow-alignment.
pub const CODE: &str = "ML002";

/// Check name for arrow-alignment.
pub const NAME: &str = "arrow-alignment";

const MESSAGE: &str = "indentation of => is not properly aligned";

/// Requires `=>` to be aligned within each attribute scope.
#[derive(Debug, Clone, Default)]
pub struct ArrowAlignment;

impl ArrowAlignment {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// One `key => value` line of a scope.
#[derive(Debug, Clone, Copy)]
struct AttributeLine {
    /// Last code token of the key.
    key_last: usize,
    arrow: usize,
    key_end: usize,
}

impl Check for ArrowAlignment {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires => to be aligned one space past the longest key of each block"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn run(&self, tokens: &mut TokenStream, blocks: &BlockTree, ctx: &RunContext<'_>) -> Vec<Problem> {
        let mut problems = Vec::new();
        let mut fixes = FixSet::new();

        for (id, block) in blocks.iter() {
            if block.single_line {
                continue;
            }
            for scope in block.scopes() {
                problems.extend(self.check_scope(tokens, blocks, id, scope, ctx, &mut fixes));
            }
        }

        if !fixes.is_empty() {
            debug!("{}: realigning {} line(s)", NAME, fixes.len());
            fixes.apply(tokens);
        }

        problems.sort_by_key(|p| p.location);
        problems
    }
}

impl ArrowAlignment {
    fn check_scope(
        &self,
        tokens: &TokenStream,
        blocks: &BlockTree,
        id: BlockId,
        scope: Range<usize>,
        ctx: &RunContext<'_>,
        fixes: &mut FixSet,
    ) -> Vec<Problem> {
        let lines = attribute_lines(tokens, blocks, id, scope);
        let Some(widest) = lines.iter().map(|l| l.key_end).max() else {
            return Vec::new();
        };
        let target = widest + 1;
        let block = blocks.get(id);
        debug!(
            "{}: {:?} block at token {} aligns {} line(s) to column {}",
            NAME,
            block.kind,
            block.open,
            lines.len(),
            target
        );

        let mut problems = Vec::new();
        for line in lines {
            let Some(arrow) = tokens.get(line.arrow) else {
                continue;
            };
            if arrow.column == target {
                continue;
            }

            let location = Location::new(arrow.line, arrow.column);
            let padding = " ".repeat(target - line.key_end);
            let fixed = ctx.may_fix(NAME, location.line)
                && queue_padding(fixes, tokens, line, padding);
            problems.push(
                Problem::new(CODE, NAME, self.default_severity(), location, MESSAGE)
                    .with_fixed(fixed),
            );
        }
        problems
    }
}

/// Lines of `scope` that start, directly in block `id`, with `key =>`.
fn attribute_lines(
    tokens: &TokenStream,
    blocks: &BlockTree,
    id: BlockId,
    scope: Range<usize>,
) -> Vec<AttributeLine> {
    let mut lines = Vec::new();
    for start in scope {
        let Some(token) = tokens.get(start) else { break };
        if !token.is_code() || blocks.owner(start) != id || !tokens.starts_line(start) {
            continue;
        }
        let Some((key_last, arrow)) = find_arrow(tokens, start) else {
            continue;
        };
        let (Some(last), Some(arrow_token)) = (tokens.get(key_last), tokens.get(arrow)) else {
            continue;
        };
        if arrow_token.line == last.end_line() {
            lines.push(AttributeLine {
                key_last,
                arrow,
                key_end: last.end_column(),
            });
        }
    }
    lines
}

/// Scans the line starting at `start` for its first `=>` outside brackets
/// and parentheses. Returns the last key token and the arrow.
///
/// The key may span several tokens (`Integer[1, 5]`, `/^(a|b)$/`). The scan
/// gives up at the end of the line, at a brace, and at a `,`, `;` or `:`
/// outside brackets.
fn find_arrow(tokens: &TokenStream, start: usize) -> Option<(usize, usize)> {
    let mut depth = match tokens.get(start)?.kind {
        TokenKind::LBrack | TokenKind::LParen => 1usize,
        TokenKind::FatArrow
        | TokenKind::LBrace
        | TokenKind::RBrace
        | TokenKind::RBrack
        | TokenKind::RParen
        | TokenKind::Comma
        | TokenKind::Semicolon
        | TokenKind::Colon => return None,
        _ => 0,
    };
    let mut key_last = start;
    for index in start + 1..tokens.len() {
        let token = tokens.get(index)?;
        match token.kind {
            TokenKind::FatArrow if depth == 0 => return Some((key_last, index)),
            TokenKind::Newline
            | TokenKind::Comment
            | TokenKind::LBrace
            | TokenKind::RBrace => return None,
            TokenKind::Comma | TokenKind::Semicolon | TokenKind::Colon if depth == 0 => {
                return None
            }
            TokenKind::LBrack | TokenKind::LParen => depth += 1,
            TokenKind::RBrack | TokenKind::RParen => depth = depth.checked_sub(1)?,
            _ => {}
        }
        if token.is_code() {
            key_last = index;
        }
    }
    None
}

/// Queues the whitespace between key and arrow to become `padding`.
///
/// Returns false, leaving the line alone, if the gap is not a single
/// whitespace token or nothing at all.
fn queue_padding(
    fixes: &mut FixSet,
    tokens: &TokenStream,
    line: AttributeLine,
    padding: String,
) -> bool {
    match line.arrow - line.key_last {
        1 => {
            fixes.insert(line.arrow, Token::new(TokenKind::Whitespace, padding));
            true
        }
        2 if tokens
            .get(line.key_last + 1)
            .is_some_and(|t| t.kind == TokenKind::Whitespace) =>
        {
            fixes.replace(line.key_last + 1, padding);
            true
        }
        _ => false,
    }
}
