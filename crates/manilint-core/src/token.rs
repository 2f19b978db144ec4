//! Tokens and the owned, mutable token stream.
//!
//! Every byte of a manifest belongs to exactly one [`Token`], whitespace and
//! comments included, so [`TokenStream::render`] reproduces the source
//! exactly until a check edits it.

use serde::Serialize;

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Bare word or keyword, including `::`-qualified names.
    Name,
    /// Capitalised type reference such as `File` or `Class`.
    TypeRef,
    /// Variable reference (`$name`, `$::fact`).
    Variable,
    /// Single- or double-quoted string literal.
    String,
    /// Numeric literal.
    Number,
    /// `=>`
    FatArrow,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `?`
    Question,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBrack,
    /// `]`
    RBrack,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `#` comment, up to but excluding the newline.
    Comment,
    /// `/* ... */` comment.
    BlockComment,
    /// Run of spaces, tabs and carriage returns.
    Whitespace,
    /// A single `\n`.
    Newline,
    /// Any other punctuation (`->`, `=`, `==`, `|`, ...).
    Operator,
}

impl TokenKind {
    /// Whitespace, newlines and comments.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::Newline | Self::Comment | Self::BlockComment
        )
    }

    /// Returns the closing delimiter kind for an opening delimiter.
    #[must_use]
    pub fn closer(self) -> Option<Self> {
        match self {
            Self::LBrace => Some(Self::RBrace),
            Self::LBrack => Some(Self::RBrack),
            Self::LParen => Some(Self::RParen),
            _ => None,
        }
    }
}

/// A single lexical unit with its exact source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Lexical category.
    pub kind: TokenKind,
    /// Exact bytes of the token.
    pub text: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Byte column within the line (1-indexed).
    pub column: usize,
}

impl Token {
    /// Creates a token without a position. Positions are assigned by
    /// [`TokenStream::reindex`].
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            line: 0,
            column: 0,
        }
    }

    /// Returns true for tokens that carry code rather than layout.
    #[must_use]
    pub fn is_code(&self) -> bool {
        !self.kind.is_trivia()
    }

    /// Column just past the last byte of the token, on the token's last line.
    #[must_use]
    pub fn end_column(&self) -> usize {
        match self.text.rfind('\n') {
            Some(nl) => self.text.len() - nl,
            None => self.column + self.text.len(),
        }
    }

    /// Line of the token's last byte.
    #[must_use]
    pub fn end_line(&self) -> usize {
        self.line + self.text.matches('\n').count()
    }
}

/// The ordered tokens of one manifest.
///
/// Checks mutate the stream in place while fixing. After a mutation the
/// cached `line`/`column` of later tokens may be stale until
/// [`reindex`](Self::reindex) runs; the engine does this after every check
/// that fixed something.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Builds a stream and assigns positions.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut stream = Self { tokens };
        stream.reindex();
        stream
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the stream holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the token at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Iterates over all tokens in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Borrows the tokens as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Concatenates every token's text.
    #[must_use]
    pub fn render(&self) -> String {
        let capacity = self.tokens.iter().map(|t| t.text.len()).sum();
        let mut out = String::with_capacity(capacity);
        for token in &self.tokens {
            out.push_str(&token.text);
        }
        out
    }

    /// Recomputes `line` and `column` of every token with a running cursor.
    pub fn reindex(&mut self) {
        let mut line = 1;
        let mut column = 1;
        for token in &mut self.tokens {
            token.line = line;
            token.column = column;
            for byte in token.text.bytes() {
                if byte == b'\n' {
                    line += 1;
                    column = 1;
                } else {
                    column += 1;
                }
            }
        }
    }

    /// Replaces the text of the token at `index`, keeping its kind.
    ///
    /// Returns false if `index` is out of bounds.
    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.tokens.get_mut(index) {
            Some(token) => {
                token.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Inserts `token` before `index`, shifting later tokens right.
    ///
    /// Returns false if `index` is past the end of the stream.
    pub fn insert(&mut self, index: usize, token: Token) -> bool {
        if index > self.tokens.len() {
            return false;
        }
        self.tokens.insert(index, token);
        true
    }

    /// Index of the first code token after `index`.
    #[must_use]
    pub fn next_code(&self, index: usize) -> Option<usize> {
        (index + 1..self.tokens.len()).find(|&i| self.tokens[i].is_code())
    }

    /// Index of the last code token before `index`.
    #[must_use]
    pub fn prev_code(&self, index: usize) -> Option<usize> {
        (0..index.min(self.tokens.len()))
            .rev()
            .find(|&i| self.tokens[i].is_code())
    }

    /// Index of the first non-whitespace token after `index`, stopping at
    /// newlines and comments (which are returned).
    #[must_use]
    pub fn next_non_blank(&self, index: usize) -> Option<usize> {
        (index + 1..self.tokens.len()).find(|&i| self.tokens[i].kind != TokenKind::Whitespace)
    }

    /// Returns true if `index` is the first non-whitespace token on its line.
    #[must_use]
    pub fn starts_line(&self, index: usize) -> bool {
        let mut i = index;
        while i > 0 {
            i -= 1;
            match self.tokens[i].kind {
                TokenKind::Whitespace => continue,
                TokenKind::Newline => return true,
                _ => return self.tokens[i].text.ends_with('\n'),
            }
        }
        index < self.tokens.len()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
