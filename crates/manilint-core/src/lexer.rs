//! Lossless tokenizer for manifest source text.

use crate::token::{Token, TokenKind, TokenStream};
use miette::{Diagnostic, SourceSpan};
use tracing::debug;

/// Multi-character operators, longest first.
const OPERATORS: &[&str] = &[
    "<<|", "|>>", "->", "~>", "<-", "<~", "==", "!=", ">=", "<=", "=~", "!~", "+>", "<|", "|>",
    "<<", ">>", "+=", "-=",
];

/// Fatal tokenization failure. No checks run for a manifest that fails to lex.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum LexError {
    /// A quoted string runs to the end of input.
    #[error("unterminated string literal at {line}:{column}")]
    #[diagnostic(
        code(manilint::lex::unterminated_string),
        help("close the string with a matching quote")
    )]
    UnterminatedString {
        /// Line of the opening quote.
        line: usize,
        /// Column of the opening quote.
        column: usize,
        /// Span of the opening quote.
        #[label("string starts here")]
        span: SourceSpan,
    },

    /// A `/*` comment has no closing `*/`.
    #[error("unterminated block comment at {line}:{column}")]
    #[diagnostic(code(manilint::lex::unterminated_comment))]
    UnterminatedComment {
        /// Line of the opening `/*`.
        line: usize,
        /// Column of the opening `/*`.
        column: usize,
        /// Span of the opening `/*`.
        #[label("comment starts here")]
        span: SourceSpan,
    },

    /// A closing delimiter with nothing open.
    #[error("unexpected '{found}' at {line}:{column}")]
    #[diagnostic(code(manilint::lex::unbalanced))]
    UnexpectedClose {
        /// The stray delimiter.
        found: char,
        /// Line of the delimiter.
        line: usize,
        /// Column of the delimiter.
        column: usize,
        /// Span of the delimiter.
        #[label("no matching opener")]
        span: SourceSpan,
    },

    /// A closing delimiter that does not match the innermost opener.
    #[error("expected '{expected}' but found '{found}' at {line}:{column}")]
    #[diagnostic(code(manilint::lex::unbalanced))]
    MismatchedClose {
        /// The closer the innermost opener requires.
        expected: char,
        /// The closer actually found.
        found: char,
        /// Line of the closer.
        line: usize,
        /// Column of the closer.
        column: usize,
        /// Span of the closer.
        #[label("mismatched delimiter")]
        span: SourceSpan,
    },

    /// An opening delimiter still open at end of input.
    #[error("unclosed '{open}' opened at {line}:{column}")]
    #[diagnostic(
        code(manilint::lex::unbalanced),
        help("every opening delimiter needs a matching closer")
    )]
    Unclosed {
        /// The opening delimiter.
        open: char,
        /// Line of the opener.
        line: usize,
        /// Column of the opener.
        column: usize,
        /// Span of the opener.
        #[label("opened here")]
        span: SourceSpan,
    },
}

impl LexError {
    /// Line the error points at.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::UnterminatedString { line, .. }
            | Self::UnterminatedComment { line, .. }
            | Self::UnexpectedClose { line, .. }
            | Self::MismatchedClose { line, .. }
            | Self::Unclosed { line, .. } => *line,
        }
    }

    /// Column the error points at.
    #[must_use]
    pub fn column(&self) -> usize {
        match self {
            Self::UnterminatedString { column, .. }
            | Self::UnterminatedComment { column, .. }
            | Self::UnexpectedClose { column, .. }
            | Self::MismatchedClose { column, .. }
            | Self::Unclosed { column, .. } => *column,
        }
    }
}

/// Tokenizes `source` into a lossless [`TokenStream`].
///
/// # Errors
///
/// Returns a [`LexError`] for unterminated strings or block comments and for
/// unbalanced `{}`/`[]`/`()` delimiters.
pub fn tokenize(source: &str) -> Result<TokenStream, LexError> {
    let mut lexer = Lexer::new(source);
    lexer.run()?;
    debug!("Tokenized {} bytes into {} tokens", source.len(), lexer.tokens.len());
    Ok(TokenStream::new(lexer.tokens))
}

/// An opening delimiter awaiting its closer.
struct OpenDelimiter {
    kind: TokenKind,
    text: char,
    line: usize,
    column: usize,
    offset: usize,
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    open: Vec<OpenDelimiter>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            open: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<(), LexError> {
        while self.pos < self.bytes.len() {
            let start = self.pos;
            let (kind, end) = self.scan()?;
            match kind {
                TokenKind::LBrace | TokenKind::LBrack | TokenKind::LParen => {
                    self.open.push(OpenDelimiter {
                        kind,
                        text: char::from(self.bytes[start]),
                        line: self.line,
                        column: self.column,
                        offset: start,
                    });
                }
                TokenKind::RBrace | TokenKind::RBrack | TokenKind::RParen => {
                    self.close(kind, start)?;
                }
                _ => {}
            }
            self.emit(kind, end);
        }

        if let Some(open) = self.open.pop() {
            return Err(LexError::Unclosed {
                open: open.text,
                line: open.line,
                column: open.column,
                span: (open.offset, 1).into(),
            });
        }
        Ok(())
    }

    /// Classifies the token starting at `self.pos` and returns its end offset.
    fn scan(&self) -> Result<(TokenKind, usize), LexError> {
        let start = self.pos;
        let byte = self.bytes[start];
        let next = self.bytes.get(start + 1).copied();

        let scanned = match byte {
            b'\n' => (TokenKind::Newline, start + 1),
            b' ' | b'\t' | b'\r' => (
                TokenKind::Whitespace,
                self.take_while(start, |b| matches!(b, b' ' | b'\t' | b'\r')),
            ),
            b'#' => (TokenKind::Comment, self.take_while(start, |b| b != b'\n')),
            b'/' if next == Some(b'*') => (TokenKind::BlockComment, self.block_comment_end()?),
            b'"' | b'\'' => (TokenKind::String, self.string_end(byte)?),
            b'$' => match self.name_end(start + 1) {
                Some(end) => (TokenKind::Variable, end),
                None => (TokenKind::Operator, start + 1),
            },
            b'0'..=b'9' => (TokenKind::Number, self.number_end(start)),
            b':' if next == Some(b':') => match self.name_end(start) {
                Some(end) => (TokenKind::Name, end),
                None => (TokenKind::Operator, start + 2),
            },
            b if b.is_ascii_alphabetic() || b == b'_' => {
                let end = self.name_end(start).unwrap_or(start + 1);
                let kind = if b.is_ascii_uppercase() {
                    TokenKind::TypeRef
                } else {
                    TokenKind::Name
                };
                (kind, end)
            }
            b'=' if next == Some(b'>') => (TokenKind::FatArrow, start + 2),
            b',' => (TokenKind::Comma, start + 1),
            b';' => (TokenKind::Semicolon, start + 1),
            b':' => (TokenKind::Colon, start + 1),
            b'?' => (TokenKind::Question, start + 1),
            b'{' => (TokenKind::LBrace, start + 1),
            b'}' => (TokenKind::RBrace, start + 1),
            b'[' => (TokenKind::LBrack, start + 1),
            b']' => (TokenKind::RBrack, start + 1),
            b'(' => (TokenKind::LParen, start + 1),
            b')' => (TokenKind::RParen, start + 1),
            _ => (TokenKind::Operator, self.operator_end(start)),
        };
        Ok(scanned)
    }

    fn take_while(&self, start: usize, pred: impl Fn(u8) -> bool) -> usize {
        let mut end = start;
        while end < self.bytes.len() && pred(self.bytes[end]) {
            end += 1;
        }
        end
    }

    /// End of a `[A-Za-z0-9_]` word with `::` separators, or `None` if no
    /// word starts at `start` (a leading `::` is allowed).
    fn name_end(&self, start: usize) -> Option<usize> {
        let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
        let mut end = start;
        loop {
            if self.bytes[end..].starts_with(b"::")
                && self.bytes.get(end + 2).copied().is_some_and(is_word)
            {
                end += 2;
            }
            let word_end = self.take_while(end, is_word);
            if word_end == end {
                break;
            }
            end = word_end;
            if !self.bytes[end..].starts_with(b"::") {
                break;
            }
        }
        (end > start).then_some(end)
    }

    fn number_end(&self, start: usize) -> usize {
        let mut end = start;
        while end < self.bytes.len() {
            let b = self.bytes[end];
            let dot_digit =
                b == b'.' && self.bytes.get(end + 1).is_some_and(u8::is_ascii_digit);
            if b.is_ascii_alphanumeric() || b == b'_' || dot_digit {
                end += 1;
            } else {
                break;
            }
        }
        end
    }

    fn string_end(&self, quote: u8) -> Result<usize, LexError> {
        let mut end = self.pos + 1;
        while end < self.bytes.len() {
            match self.bytes[end] {
                b'\\' => end += 2,
                b if b == quote => return Ok(end + 1),
                _ => end += 1,
            }
        }
        Err(LexError::UnterminatedString {
            line: self.line,
            column: self.column,
            span: (self.pos, 1).into(),
        })
    }

    fn block_comment_end(&self) -> Result<usize, LexError> {
        match self.src[self.pos + 2..].find("*/") {
            Some(rel) => Ok(self.pos + 2 + rel + 2),
            None => Err(LexError::UnterminatedComment {
                line: self.line,
                column: self.column,
                span: (self.pos, 2).into(),
            }),
        }
    }

    fn operator_end(&self, start: usize) -> usize {
        let rest = &self.src[start..];
        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            return start + op.len();
        }
        // Keep multi-byte characters whole.
        start + rest.chars().next().map_or(1, char::len_utf8)
    }

    fn close(&mut self, kind: TokenKind, offset: usize) -> Result<(), LexError> {
        let found = char::from(self.bytes[offset]);
        match self.open.pop() {
            Some(open) if open.kind.closer() == Some(kind) => Ok(()),
            Some(open) => Err(LexError::MismatchedClose {
                expected: closing_char(open.kind),
                found,
                line: self.line,
                column: self.column,
                span: (offset, 1).into(),
            }),
            None => Err(LexError::UnexpectedClose {
                found,
                line: self.line,
                column: self.column,
                span: (offset, 1).into(),
            }),
        }
    }

    fn emit(&mut self, kind: TokenKind, end: usize) {
        // A trailing backslash in an unterminated scan can overshoot.
        let end = end.min(self.bytes.len());
        let text = &self.src[self.pos..end];
        for byte in text.bytes() {
            if byte == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.tokens.push(Token::new(kind, text));
        self.pos = end;
    }
}

fn closing_char(kind: TokenKind) -> char {
    match kind {
        TokenKind::LBrack => ']',
        TokenKind::LParen => ')',
        _ => '}',
    }
}
