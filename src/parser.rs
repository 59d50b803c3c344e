use std::iter::Peekable;
use std::vec::IntoIter;

use miette::Result;

use crate::air::{Air, AirStmt, Image, Mnemonic, Operand, StmtKind};
use crate::error;
use crate::lexer::{tokenize, Token, TokenKind};
use crate::runtime::{MEMORY_SIZE, WORD_MAX};
use crate::span::Span;
use crate::symbol::SymbolTable;

/// Character that begins a comment unless configured otherwise.
pub const DEFAULT_COMMENT_CHAR: char = '#';

/// Assembles LMC source text into a loadable machine-code image.
///
/// Stateless per invocation: nothing survives between calls to
/// [`Assembler::assemble`], so one instance may serve many programs.
#[derive(Clone, Copy, Debug)]
pub struct Assembler {
    comment_char: char,
}

impl Default for Assembler {
    fn default() -> Self {
        Assembler::new()
    }
}

impl Assembler {
    pub fn new() -> Self {
        Assembler {
            comment_char: DEFAULT_COMMENT_CHAR,
        }
    }

    /// Use a comment character other than `#`.
    pub fn with_comment_char(comment_char: char) -> Self {
        Assembler { comment_char }
    }

    /// Run both assembly passes over `src`.
    ///
    /// All-or-nothing: any diagnostic yields no image.
    pub fn assemble(&self, src: &str) -> Result<Image> {
        let air = AsmParser::new(src, self.comment_char).parse()?;
        air.encode(src)
    }
}

/// Assemble with the default comment character.
pub fn assemble(src: &str) -> Result<Image> {
    Assembler::new().assemble(src)
}

/// Transforms the token stream into AIR, assigning one mailbox per
/// significant source line and filling the symbol table (pass one of two).
pub struct AsmParser<'a> {
    /// Reference to the source file
    src: &'a str,
    /// Peekable iterator over tokens, with whitespace and comments dropped
    toks: Peekable<IntoIter<Token>>,
    ast: Vec<AirStmt>,
    symbols: SymbolTable,
}

impl<'a> AsmParser<'a> {
    pub fn new(src: &'a str, comment_char: char) -> Self {
        let toks: Vec<Token> = tokenize(src, comment_char)
            .filter(|tok| !matches!(tok.kind, TokenKind::Whitespace | TokenKind::Comment))
            .collect();
        AsmParser {
            src,
            toks: toks.into_iter().peekable(),
            ast: Vec::new(),
            symbols: SymbolTable::new(),
        }
    }

    fn get_span(&self, span: Span) -> &'a str {
        &self.src[span.range()]
    }

    /// Create AIR out of the token stream.
    pub fn parse(mut self) -> Result<Air> {
        while let Some(tok) = self.toks.next() {
            match tok.kind {
                TokenKind::Newline => continue,
                TokenKind::Ident => self.parse_stmt(tok)?,
                TokenKind::Lit => return Err(error::unexpected_token(tok.span, self.src)),
                TokenKind::Unknown => return Err(error::unknown_token(tok.span, self.src)),
                // Filtered out or never yielded
                TokenKind::Whitespace | TokenKind::Comment | TokenKind::Eof => unreachable!(),
            }
        }
        Ok(Air::new(self.ast, self.symbols))
    }

    /// Parse one statement starting at its leading identifier.
    fn parse_stmt(&mut self, first: Token) -> Result<()> {
        if self.ast.len() >= MEMORY_SIZE {
            return Err(error::program_too_large(first.span, self.src));
        }
        let addr = self.ast.len() as u16;

        // A leading identifier that names a mnemonic is one; anything else
        // is a label prefix with the mnemonic following on the same line.
        let (label, mnemonic_tok, mnemonic) = match Mnemonic::parse(self.get_span(first.span)) {
            Some(mnemonic) => (None, first, mnemonic),
            None => {
                let tok = match self.next_on_line() {
                    Some(tok) => tok,
                    None => return Err(error::missing_mnemonic(first.span, self.src)),
                };
                if tok.kind != TokenKind::Ident {
                    return Err(error::unknown_mnemonic(tok.span, self.src));
                }
                match Mnemonic::parse(self.get_span(tok.span)) {
                    Some(mnemonic) => (Some(first), tok, mnemonic),
                    None => return Err(error::unknown_mnemonic(tok.span, self.src)),
                }
            }
        };

        if let Some(label_tok) = label {
            let name = self.get_span(label_tok.span);
            if self.symbols.insert(name, addr).is_some() {
                return Err(error::duplicate_label(label_tok.span, self.src));
            }
        }

        let operand_tok = self.next_on_line();
        let kind = if mnemonic.takes_addr() {
            let tok = match operand_tok {
                Some(tok) => tok,
                None => return Err(error::missing_operand(mnemonic_tok.span, self.src)),
            };
            let operand = match tok.kind {
                TokenKind::Ident => Operand::Label {
                    name: self.get_span(tok.span).to_string(),
                    span: tok.span,
                },
                TokenKind::Lit => {
                    let value = self.parse_lit(tok)?;
                    if !(0..MEMORY_SIZE as i32).contains(&value) {
                        return Err(error::addr_out_of_range(tok.span, self.src));
                    }
                    Operand::Addr {
                        value: value as u16,
                        span: tok.span,
                    }
                }
                _ => return Err(error::unknown_token(tok.span, self.src)),
            };
            StmtKind::Instr { mnemonic, operand }
        } else if mnemonic == Mnemonic::Dat {
            let value = match operand_tok {
                None => 0,
                Some(tok) if tok.kind == TokenKind::Lit => {
                    let value = self.parse_lit(tok)?;
                    if !(0..=WORD_MAX as i32).contains(&value) {
                        return Err(error::literal_out_of_range(tok.span, self.src));
                    }
                    value as u16
                }
                Some(tok) => return Err(error::unexpected_operand(tok.span, self.src)),
            };
            StmtKind::Data { value }
        } else {
            // INP, OUT, and HLT carry their operand sub-code implicitly.
            if let Some(tok) = operand_tok {
                return Err(error::unexpected_operand(tok.span, self.src));
            }
            StmtKind::Nullary { mnemonic }
        };

        // Statements end at the line break.
        if let Some(tok) = self.next_on_line() {
            return Err(error::unexpected_token(tok.span, self.src));
        }

        self.ast.push(AirStmt { addr, kind });
        Ok(())
    }

    /// Next token before the statement's line break, if any.
    fn next_on_line(&mut self) -> Option<Token> {
        match self.toks.peek() {
            Some(tok) if tok.kind != TokenKind::Newline => self.toks.next(),
            _ => None,
        }
    }

    fn parse_lit(&self, tok: Token) -> Result<i32> {
        self.get_span(tok.span)
            .parse::<i32>()
            .map_err(|_| error::bad_literal(tok.span, self.src))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn image_length_matches_significant_lines() {
        let src = "# leading comment\n\nINP\nSTA 10   # store it\n\nOUT\nHLT\n";
        let image = assemble(src).unwrap();
        assert_eq!(image.words(), &[901, 310, 902, 0]);
    }

    #[test]
    fn resolves_forward_and_backward_references() {
        let src = "loop BRA end\n     BRA loop\nend  HLT\n";
        let image = assemble(src).unwrap();
        assert_eq!(image.words(), &[602, 600, 0]);
    }

    #[test]
    fn labels_and_direct_addresses_encode_identically() {
        let labeled = assemble("LDA num\nHLT\nnum DAT 7").unwrap();
        let direct = assemble("LDA 2\nHLT\nDAT 7").unwrap();
        assert_eq!(labeled.words(), direct.words());
    }

    #[test]
    fn mnemonics_are_case_insensitive() {
        let image = assemble("inp\nSta x\nx dat 5\nhlt").unwrap();
        assert_eq!(image.words(), &[901, 302, 5, 0]);
    }

    #[test]
    fn symbol_table_records_addresses() {
        let image = assemble("INP\nSTA count\ncount DAT 0\nHLT").unwrap();
        assert_eq!(image.symbols().get("count"), Some(2));
        assert_eq!(image.symbols().len(), 1);
    }

    #[test]
    fn dat_defaults_to_zero() {
        let image = assemble("x DAT\nHLT").unwrap();
        assert_eq!(image.words(), &[0, 0]);
    }

    #[test]
    fn dat_accepts_full_word_range() {
        assert_eq!(assemble("DAT 999").unwrap().words(), &[999]);
        assert!(assemble("DAT 1000").is_err());
        assert!(assemble("DAT -1").is_err());
    }

    #[test]
    fn dat_rejects_label_operand() {
        assert!(assemble("x DAT y\ny DAT 1").is_err());
    }

    #[test]
    fn rejects_unknown_mnemonic() {
        assert!(assemble("MOV 5").is_err());
        assert!(assemble("label FOO bar").is_err());
    }

    #[test]
    fn rejects_duplicate_label() {
        assert!(assemble("x DAT 1\nx DAT 2").is_err());
    }

    #[test]
    fn rejects_undefined_label_with_no_image() {
        assert!(assemble("BRA nowhere\nHLT").is_err());
    }

    #[test]
    fn rejects_operand_on_nullary_instructions() {
        assert!(assemble("INP 5").is_err());
        assert!(assemble("OUT x\nx DAT").is_err());
        assert!(assemble("HLT 0").is_err());
    }

    #[test]
    fn rejects_missing_operand() {
        assert!(assemble("ADD").is_err());
    }

    #[test]
    fn rejects_address_out_of_range() {
        assert!(assemble("LDA 100").is_err());
        assert!(assemble("LDA -1").is_err());
        assert_eq!(assemble("LDA 99").unwrap().words(), &[599]);
    }

    #[test]
    fn rejects_program_over_100_statements() {
        let src = "INP\n".repeat(101);
        assert!(assemble(&src).is_err());
        let src = "INP\n".repeat(100);
        assert_eq!(assemble(&src).unwrap().len(), 100);
    }

    #[test]
    fn rejects_trailing_tokens() {
        assert!(assemble("x ADD y z\ny DAT\nz DAT").is_err());
    }

    #[test]
    fn empty_source_assembles_to_empty_image() {
        let image = assemble("\n# nothing here\n").unwrap();
        assert!(image.is_empty());
    }

    #[test]
    fn honors_custom_comment_char() {
        let asm = Assembler::with_comment_char(';');
        let image = asm.assemble("; a comment\nINP ; trailing\nHLT").unwrap();
        assert_eq!(image.words(), &[901, 0]);
        // `#` is an ordinary unknown token under a `;` configuration.
        assert!(asm.assemble("INP # not a comment").is_err());
    }
}
