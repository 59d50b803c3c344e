use crate::lexer::cursor::Cursor;
use crate::span::Span;

pub mod cursor;

/// Token over LMC source text.
///
/// Statements end at line breaks, so `\n` lexes to its own kind rather than
/// folding into [`TokenKind::Whitespace`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// Label or mnemonic, distinguished by the parser.
    Ident,
    /// Decimal literal, possibly negative.
    Lit,
    Comment,
    /// Spaces, tabs and carriage returns.
    Whitespace,
    /// Ends the current statement.
    Newline,
    Unknown,
    Eof,
}

/// Lex the input into a token stream, treating `comment_char` as the start
/// of a to-end-of-line comment.
pub fn tokenize(input: &str, comment_char: char) -> impl Iterator<Item = Token> + '_ {
    let mut cursor = Cursor::new(input);
    let mut offs = 0;
    std::iter::from_fn(move || {
        let (kind, len) = cursor.advance_token(comment_char);
        if kind == TokenKind::Eof {
            return None;
        }
        let token = Token {
            kind,
            span: Span::new(offs, len),
        };
        offs += len;
        Some(token)
    })
}

/// Test if a character is considered to be whitespace within a line.
pub(crate) fn is_inline_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

/// Test if a character is considered an LMC identifier character.
pub(crate) fn is_id(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_')
}

impl Cursor<'_> {
    pub(crate) fn advance_token(&mut self, comment_char: char) -> (TokenKind, usize) {
        let first_char = match self.bump() {
            Some(c) => c,
            None => return (TokenKind::Eof, 0),
        };
        let kind = match first_char {
            // Checked first so that any comment character wins over the
            // token class it would otherwise belong to.
            c if c == comment_char => {
                self.take_while(|c| c != '\n');
                TokenKind::Comment
            }
            '\n' => TokenKind::Newline,
            c if is_inline_whitespace(c) => {
                self.take_while(is_inline_whitespace);
                TokenKind::Whitespace
            }
            // Digit-leading tokens are always literals; labels must start
            // with a letter or underscore.
            c if c.is_ascii_digit() => {
                self.take_while(|c| c.is_ascii_digit());
                TokenKind::Lit
            }
            '-' => {
                self.take_while(|c| c.is_ascii_digit());
                TokenKind::Lit
            }
            c if is_id(c) => {
                self.take_while(is_id);
                TokenKind::Ident
            }
            _ => TokenKind::Unknown,
        };
        let res = (kind, self.pos_in_token());
        self.reset_pos();
        res
    }
}
