//! Check trait for defining lint rules over the token stream.

use crate::scope::BlockTree;
use crate::suppress::Suppressions;
use crate::token::TokenStream;
use crate::types::{Problem, Severity};

static NO_SUPPRESSIONS: Suppressions = Suppressions::none();

/// Settings of one check invocation.
///
/// Built by the engine for each manifest; checks only read it.
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'a> {
    fix: bool,
    suppressions: &'a Suppressions,
}

impl<'a> RunContext<'a> {
    /// Creates a context honouring the given control comments.
    #[must_use]
    pub fn new(fix: bool, suppressions: &'a Suppressions) -> Self {
        Self { fix, suppressions }
    }

    /// Returns true if `check` may rewrite tokens on `line`: fix mode is on
    /// and no control comment suppresses the check there.
    #[must_use]
    pub fn may_fix(&self, check: &str, line: usize) -> bool {
        self.fix && !self.suppressions.is_suppressed(check, line)
    }
}

impl RunContext<'static> {
    /// Creates a context without control comments.
    #[must_use]
    pub fn detached(fix: bool) -> Self {
        Self {
            fix,
            suppressions: &NO_SUPPRESSIONS,
        }
    }
}

/// A lint check over the token stream and its block tree.
///
/// A check must not assume that any other check ran before it: it sees the
/// current stream, which may already carry fixes from earlier checks. It
/// reports at most one problem per offending location, in source order.
/// When fixing is allowed and possible, it mutates the affected tokens in
/// place and marks the problem fixed; otherwise it leaves the tokens alone
/// and reports the problem unfixed.
///
/// # Example
///
/// ```ignore
/// use manilint_core::{BlockTree, Check, Location, Problem, RunContext, Severity, TokenStream};
///
/// pub struct NoTabs;
///
/// impl Check for NoTabs {
///     fn name(&self) -> &'static str { "no-tabs" }
///     fn code(&self) -> &'static str { "ML100" }
///
///     fn run(&self, tokens: &mut TokenStream, _: &BlockTree, _: &RunContext<'_>) -> Vec<Problem> {
///         tokens
///             .iter()
///             .filter(|t| t.text.contains('\t'))
///             .map(|t| Problem::new(self.code(), self.name(), Severity::Warning,
///                 Location::new(t.line, t.column), "tab character found"))
///             .collect()
///     }
/// }
/// ```
pub trait Check: Send + Sync {
    /// Returns the kebab-case name of this check (e.g., "arrow-alignment").
    fn name(&self) -> &'static str;

    /// Returns the check code (e.g., "ML002").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this check enforces.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for problems from this check.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Inspects the stream and returns the problems found.
    ///
    /// # Arguments
    ///
    /// * `tokens` - The manifest's current token stream; mutated when fixing
    /// * `blocks` - Block tree built from `tokens` as they were on entry
    /// * `ctx` - Fix mode and control-comment suppressions
    fn run(&self, tokens: &mut TokenStream, blocks: &BlockTree, ctx: &RunContext<'_>)
        -> Vec<Problem>;
}

/// Type alias for boxed Check trait objects.
pub type CheckBox = Box<dyn Check>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::scope::build_blocks;
    use crate::types::Location;

    struct TestCheck;

    impl Check for TestCheck {
        fn name(&self) -> &'static str {
            "test-check"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test check"
        }

        fn run(
            &self,
            tokens: &mut TokenStream,
            _blocks: &BlockTree,
            _ctx: &RunContext<'_>,
        ) -> Vec<Problem> {
            vec![Problem::new(
                self.code(),
                self.name(),
                self.default_severity(),
                Location::new(1, 1),
                format!("{} tokens", tokens.len()),
            )]
        }
    }

    #[test]
    fn test_check_trait() {
        let check = TestCheck;
        assert_eq!(check.name(), "test-check");
        assert_eq!(check.code(), "TEST001");
        assert_eq!(check.default_severity(), Severity::Error);

        let mut tokens = tokenize("a => 1").expect("should tokenize");
        let blocks = build_blocks(&tokens);
        let problems = check.run(&mut tokens, &blocks, &RunContext::detached(false));
        assert_eq!(problems[0].message, "5 tokens");
    }

    #[test]
    fn may_fix_respects_mode_and_suppressions() {
        let tokens = tokenize("a => 1 # lint:ignore:x\nb => 2").expect("should tokenize");
        let suppressions = Suppressions::from_tokens(&tokens);

        let ctx = RunContext::new(true, &suppressions);
        assert!(!ctx.may_fix("x", 1));
        assert!(ctx.may_fix("x", 2));
        assert!(ctx.may_fix("y", 1));

        let off = RunContext::new(false, &suppressions);
        assert!(!off.may_fix("y", 1));
        assert!(RunContext::detached(true).may_fix("x", 1));
    }
}
