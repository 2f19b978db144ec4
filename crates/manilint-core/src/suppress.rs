//! Comment-based control directives.
//!
//! Supports:
//! ```text
//! file { 'x':
//!   ensure => present # lint:ignore:trailing-comma
//! }
//!
//! # lint:ignore:arrow-alignment lint:ignore:trailing-comma
//! ...
//! # lint:endignore
//! ```
//!
//! A directive trailing code covers its own line. A directive alone on its
//! line opens a range that runs until the next `lint:endignore` (or the end
//! of the manifest). `all` matches every check.

use crate::token::{TokenKind, TokenStream};
use tracing::warn;

const IGNORE_PREFIX: &str = "lint:ignore:";
const END_IGNORE: &str = "lint:endignore";

/// Lines on which a set of checks is suppressed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SuppressedRange {
    checks: Vec<String>,
    first_line: usize,
    last_line: usize,
}

impl SuppressedRange {
    fn covers(&self, check: &str, line: usize) -> bool {
        (self.first_line..=self.last_line).contains(&line)
            && self.checks.iter().any(|c| c == check || c == "all")
    }
}

/// Control-comment suppressions of one manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suppressions {
    ranges: Vec<SuppressedRange>,
}

impl Suppressions {
    /// No suppressions.
    #[must_use]
    pub const fn none() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Collects the control comments of a token stream.
    #[must_use]
    pub fn from_tokens(tokens: &TokenStream) -> Self {
        let mut ranges = Vec::new();
        let mut open: Vec<SuppressedRange> = Vec::new();

        for (index, token) in tokens.iter().enumerate() {
            if token.kind != TokenKind::Comment {
                continue;
            }
            let Some(directive) = parse_directive(&token.text) else {
                continue;
            };
            match directive {
                Directive::Ignore(checks) if tokens.starts_line(index) => {
                    open.push(SuppressedRange {
                        checks,
                        first_line: token.line,
                        last_line: usize::MAX,
                    });
                }
                Directive::Ignore(checks) => ranges.push(SuppressedRange {
                    checks,
                    first_line: token.line,
                    last_line: token.line,
                }),
                Directive::EndIgnore => match open.pop() {
                    Some(mut range) => {
                        range.last_line = token.line;
                        ranges.push(range);
                    }
                    None => warn!("lint:endignore on line {} has no open ignore", token.line),
                },
            }
        }

        ranges.extend(open);
        Self { ranges }
    }

    /// Returns true if `check` is suppressed on `line`.
    #[must_use]
    pub fn is_suppressed(&self, check: &str, line: usize) -> bool {
        self.ranges.iter().any(|r| r.covers(check, line))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Directive {
    Ignore(Vec<String>),
    EndIgnore,
}

/// Parses a `#` comment into a control directive. Words that are not
/// directives (such as a free-text reason) are skipped.
fn parse_directive(comment: &str) -> Option<Directive> {
    let body = comment.strip_prefix('#')?.trim();
    let mut checks = Vec::new();

    for word in body.split_whitespace() {
        if word == END_IGNORE {
            return Some(Directive::EndIgnore);
        }
        if let Some(name) = word.strip_prefix(IGNORE_PREFIX) {
            if !name.is_empty() {
                checks.push(name.to_string());
            }
        }
    }

    (!checks.is_empty()).then_some(Directive::Ignore(checks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn suppressions(source: &str) -> Suppressions {
        Suppressions::from_tokens(&tokenize(source).expect("should tokenize"))
    }

    #[test]
    fn parses_ignore_directives() {
        assert_eq!(
            parse_directive("# lint:ignore:arrow-alignment lint:ignore:trailing-comma legacy"),
            Some(Directive::Ignore(vec![
                "arrow-alignment".to_string(),
                "trailing-comma".to_string()
            ]))
        );
        assert_eq!(parse_directive("# lint:endignore"), Some(Directive::EndIgnore));
        assert_eq!(parse_directive("# just a comment"), None);
        assert_eq!(parse_directive("# lint:ignore:"), None);
    }

    #[test]
    fn trailing_directive_covers_its_line() {
        let s = suppressions("a => 1,\nb => 2 # lint:ignore:trailing-comma\nc => 3");
        assert!(s.is_suppressed("trailing-comma", 2));
        assert!(!s.is_suppressed("trailing-comma", 1));
        assert!(!s.is_suppressed("trailing-comma", 3));
        assert!(!s.is_suppressed("arrow-alignment", 2));
    }

    #[test]
    fn block_directive_covers_until_endignore() {
        let s = suppressions("# lint:ignore:all\na\nb\n# lint:endignore\nc");
        assert!(s.is_suppressed("arrow-alignment", 2));
        assert!(s.is_suppressed("trailing-comma", 3));
        assert!(!s.is_suppressed("arrow-alignment", 5));
    }

    #[test]
    fn unclosed_block_runs_to_end() {
        let s = suppressions("x\n  # lint:ignore:arrow-alignment\na\nb");
        assert!(s.is_suppressed("arrow-alignment", 4));
        assert!(!s.is_suppressed("arrow-alignment", 1));
    }

    #[test]
    fn no_directives() {
        assert!(!suppressions("file { 'a': }").is_suppressed("all", 1));
        assert!(!Suppressions::none().is_suppressed("arrow-alignment", 1));
    }
}
