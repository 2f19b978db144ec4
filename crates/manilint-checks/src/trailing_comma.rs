//! Check that multi-line resource bodies end their last attribute with a comma.
//!
//! # Rationale
//!
//! A trailing comma on the last attribute keeps diffs to one line when a new
//! attribute is appended.
//!
//! ```text
//! file { 'foo':
//!   foo => bar,
//!   baz => qux     <- line should end in comma
//! }
//! ```
//!
//! Single-line bodies and title sections ended by `;` are exempt.

use manilint_core::{
    BlockKind, BlockTree, Check, FixSet, Location, Problem, RunContext, Severity, Token,
    TokenKind, TokenStream,
};
use std::ops::Range;
use tracing::debug;

/// Check code for trailing-comma.
pub const CODE: &str = "ML001";

/// Check name for trailing-comma.
pub const NAME: &str = "trailing-comma";

const MESSAGE: &str = "line should end in comma";

/// Requires a comma after the last attribute of a multi-line resource body.
#[derive(Debug, Clone, Default)]
pub struct TrailingComma;

impl TrailingComma {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for TrailingComma {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires a trailing comma after the last attribute of a multi-line resource"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn run(&self, tokens: &mut TokenStream, blocks: &BlockTree, ctx: &RunContext<'_>) -> Vec<Problem> {
        let mut problems = Vec::new();
        let mut fixes = FixSet::new();

        for (id, block) in blocks.of_kind(BlockKind::ResourceBody) {
            if block.single_line {
                continue;
            }
            let Some(close) = tokens.get(block.close) else {
                continue;
            };
            let close_line = close.line;

            let scope = match block.titles.last() {
                Some(title) if title.end != block.close => continue,
                Some(title) => title.interior(),
                None => block.interior(),
            };

            let has_attributes = scope.clone().any(|i| {
                blocks.owner(i) == id
                    && tokens.get(i).is_some_and(|t| t.kind == TokenKind::FatArrow)
            });
            if !has_attributes {
                continue;
            }

            let Some(last) = last_value(tokens, &scope, block.close) else {
                continue;
            };
            let Some(value) = tokens.get(last) else {
                continue;
            };
            if value.end_line() == close_line {
                continue;
            }

            let location = Location::new(value.end_line(), value.end_column());
            let fixed = ctx.may_fix(NAME, location.line);
            if fixed {
                fixes.insert(last + 1, Token::new(TokenKind::Comma, ","));
            }
            problems.push(
                Problem::new(CODE, NAME, self.default_severity(), location, MESSAGE)
                    .with_fixed(fixed),
            );
        }

        if !fixes.is_empty() {
            debug!("{}: inserting {} comma(s)", NAME, fixes.len());
            fixes.apply(tokens);
        }

        problems.sort_by_key(|p| p.location);
        problems
    }
}

/// Last code token of `scope` before `close`, unless it already ends the
/// attribute list (`,`), or the section is empty (`:` or `;`).
fn last_value(tokens: &TokenStream, scope: &Range<usize>, close: usize) -> Option<usize> {
    let last = tokens.prev_code(close).filter(|&i| i >= scope.start)?;
    match tokens.get(last)?.kind {
        TokenKind::Comma | TokenKind::Colon | TokenKind::Semicolon => None,
        _ => Some(last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manilint_core::{build_blocks, tokenize};

    fn run(code: &str, fix: bool) -> (Vec<Problem>, String) {
        let mut tokens = tokenize(code).expect("Failed to tokenize");
        let blocks = build_blocks(&tokens);
        let problems = TrailingComma::new().run(&mut tokens, &blocks, &RunContext::detached(fix));
        (problems, tokens.render())
    }

    const MISSING: &str = "
    file { 'foo':
      foo => bar,
      baz => qux
    }";

    #[test]
    fn test_detects_missing_comma() {
        let (problems, output) = run(MISSING, false);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].code, CODE);
        assert_eq!(problems[0].severity, Severity::Error);
        assert_eq!(problems[0].message, "line should end in comma");
        assert_eq!(problems[0].location, Location::new(4, 17));
        assert!(!problems[0].fixed);
        assert_eq!(output, MISSING);
    }

    #[test]
    fn test_fix_appends_comma() {
        let (problems, output) = run(MISSING, true);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].fixed);
        assert_eq!(
            output,
            "
    file { 'foo':
      foo => bar,
      baz => qux,
    }"
        );
    }

    #[test]
    fn test_allows_existing_comma() {
        let (problems, _) = run("file { 'foo':\n  foo => bar,\n  baz => qux,\n}", false);
        assert!(problems.is_empty());
    }

    #[test]
    fn test_ignores_one_liners() {
        let (problems, _) = run(
            "
        class{'some_class':}
        include 'a_module'
      ",
            true,
        );
        assert!(problems.is_empty());
    }

    #[test]
    fn test_ignores_single_line_resources() {
        let (problems, _) = run("file { 'foo': ensure => file }", false);
        assert!(problems.is_empty());
    }

    #[test]
    fn test_ignores_trailing_comment_line() {
        let (problems, _) =
            run("file { 'foo':\n  ensure => directory,\n  # purge => true\n}", false);
        assert!(problems.is_empty());
    }

    #[test]
    fn test_comma_goes_before_trailing_comment() {
        let (problems, output) =
            run("file { 'foo':\n  ensure => directory # keep\n}", true);
        assert_eq!(problems.len(), 1);
        assert_eq!(output, "file { 'foo':\n  ensure => directory, # keep\n}");
    }

    #[test]
    fn test_multi_title_checks_only_the_section_closed_by_brace() {
        let code = "file {\n  '/tmp/foo': ;\n  '/tmp/bar':\n    foo => 'bar';\n  '/tmp/baz':\n    gronk => 'bah',\n    meh => 'no'\n}";
        let (problems, output) = run(code, true);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].location, Location::new(7, 16));
        assert!(output.contains("meh => 'no',\n}"));
        assert!(output.contains("foo => 'bar';"));
    }

    #[test]
    fn test_value_on_closing_line_is_exempt() {
        let (problems, _) = run("file {\n  'foo': ensure => present }", false);
        assert!(problems.is_empty());
    }

    #[test]
    fn test_nested_hash_value_needs_comma() {
        let code = "class { 'x':\n  opts => {\n    a => 1,\n  }\n}";
        let (problems, output) = run(code, true);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].location, Location::new(4, 4));
        assert_eq!(output, "class { 'x':\n  opts => {\n    a => 1,\n  },\n}");
    }

    #[test]
    fn test_resource_defaults() {
        let (problems, _) = run("File {\n  mode => '0644'\n}", false);
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn test_reports_in_source_order() {
        let code = "file { 'a':\n  x => 1\n}\nfile { 'b':\n  y => 2\n}";
        let (problems, output) = run(code, true);
        let lines: Vec<usize> = problems.iter().map(|p| p.location.line).collect();
        assert_eq!(lines, vec![2, 5]);
        assert_eq!(output, "file { 'a':\n  x => 1,\n}\nfile { 'b':\n  y => 2,\n}");
    }
}
