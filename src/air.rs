use miette::Result;

use crate::error;
use crate::span::Span;
use crate::symbol::SymbolTable;

/// Assembly intermediate representation: one statement per significant
/// source line, in mailbox order, plus the labels collected in pass one.
#[derive(Debug)]
pub struct Air {
    ast: Vec<AirStmt>,
    symbols: SymbolTable,
}

impl Air {
    pub(crate) fn new(ast: Vec<AirStmt>, symbols: SymbolTable) -> Self {
        Air { ast, symbols }
    }

    pub fn get(&self, idx: usize) -> &AirStmt {
        &self.ast[idx]
    }

    pub fn len(&self) -> usize {
        self.ast.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ast.is_empty()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Pass two: resolve address operands against the symbol table and
    /// encode each statement into a machine word.
    ///
    /// `src` is only used to attach source context to diagnostics.
    pub fn encode(&self, src: &str) -> Result<Image> {
        let mut words = Vec::with_capacity(self.ast.len());
        for stmt in &self.ast {
            words.push(stmt.emit(&self.symbols, src)?);
        }
        Ok(Image {
            words,
            symbols: self.symbols.clone(),
        })
    }
}

/// Single LMC statement and the mailbox it was assigned.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AirStmt {
    /// Mailbox this statement occupies, assigned in source order.
    pub addr: u16,
    pub kind: StmtKind,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum StmtKind {
    /// Instruction addressing a mailbox, e.g. `loop SUB one`.
    Instr {
        mnemonic: Mnemonic,
        operand: Operand,
    },
    /// Instruction taking no operand: `INP`, `OUT`, `HLT`.
    Nullary { mnemonic: Mnemonic },
    /// `DAT` cell holding a raw literal. Never executed as an opcode, only
    /// addressed.
    Data { value: u16 },
}

/// Address operand as written: symbolic, or a direct mailbox number.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Operand {
    Label { name: String, span: Span },
    Addr { value: u16, span: Span },
}

impl AirStmt {
    /// Encode this statement as a three-digit word, `opcode * 100 + operand`.
    pub fn emit(&self, symbols: &SymbolTable, src: &str) -> Result<u16> {
        let word = match &self.kind {
            StmtKind::Data { value } => *value,
            StmtKind::Nullary { mnemonic } => mnemonic.base(),
            StmtKind::Instr { mnemonic, operand } => {
                let addr = match operand {
                    Operand::Label { name, span } => symbols
                        .get(name)
                        .ok_or_else(|| error::unresolved_label(*span, src))?,
                    // Range-checked at parse time.
                    Operand::Addr { value, .. } => *value,
                };
                mnemonic.base() + addr
            }
        };
        Ok(word)
    }
}

/// The eleven LMC mnemonics.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mnemonic {
    Add,
    Sub,
    Sta,
    Lda,
    Bra,
    Brz,
    Brp,
    Inp,
    Out,
    Hlt,
    Dat,
}

impl Mnemonic {
    /// Case-insensitive lookup, `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Mnemonic> {
        Some(match s.to_ascii_uppercase().as_str() {
            "ADD" => Mnemonic::Add,
            "SUB" => Mnemonic::Sub,
            "STA" => Mnemonic::Sta,
            "LDA" => Mnemonic::Lda,
            "BRA" => Mnemonic::Bra,
            "BRZ" => Mnemonic::Brz,
            "BRP" => Mnemonic::Brp,
            "INP" => Mnemonic::Inp,
            "OUT" => Mnemonic::Out,
            "HLT" => Mnemonic::Hlt,
            "DAT" => Mnemonic::Dat,
            _ => return None,
        })
    }

    /// Whether this mnemonic takes a mailbox address operand.
    pub fn takes_addr(self) -> bool {
        matches!(
            self,
            Mnemonic::Add
                | Mnemonic::Sub
                | Mnemonic::Sta
                | Mnemonic::Lda
                | Mnemonic::Bra
                | Mnemonic::Brz
                | Mnemonic::Brp
        )
    }

    /// Encoded word before the address operand is added in.
    fn base(self) -> u16 {
        match self {
            Mnemonic::Hlt => 0,
            Mnemonic::Add => 100,
            Mnemonic::Sub => 200,
            Mnemonic::Sta => 300,
            Mnemonic::Lda => 500,
            Mnemonic::Bra => 600,
            Mnemonic::Brz => 700,
            Mnemonic::Brp => 800,
            Mnemonic::Inp => 901,
            Mnemonic::Out => 902,
            // Data statements encode their literal, not an opcode.
            Mnemonic::Dat => unreachable!("DAT has no opcode"),
        }
    }
}

/// Loadable machine-code image: one word per source statement in mailbox
/// order, with the symbol table kept for diagnostics.
#[derive(Clone, Debug)]
pub struct Image {
    words: Vec<u16>,
    symbols: SymbolTable,
}

impl Image {
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn emits_encoding_table() {
        let symbols = SymbolTable::new();
        let nullary = |mnemonic| AirStmt {
            addr: 0,
            kind: StmtKind::Nullary { mnemonic },
        };
        assert_eq!(nullary(Mnemonic::Hlt).emit(&symbols, "").unwrap(), 0);
        assert_eq!(nullary(Mnemonic::Inp).emit(&symbols, "").unwrap(), 901);
        assert_eq!(nullary(Mnemonic::Out).emit(&symbols, "").unwrap(), 902);

        let sta = AirStmt {
            addr: 0,
            kind: StmtKind::Instr {
                mnemonic: Mnemonic::Sta,
                operand: Operand::Addr {
                    value: 42,
                    span: Span::new(0, 0),
                },
            },
        };
        assert_eq!(sta.emit(&symbols, "").unwrap(), 342);
    }

    #[test]
    fn emit_fails_on_unresolved_label() {
        let symbols = SymbolTable::new();
        let stmt = AirStmt {
            addr: 0,
            kind: StmtKind::Instr {
                mnemonic: Mnemonic::Bra,
                operand: Operand::Label {
                    name: "nowhere".to_string(),
                    span: Span::new(4, 7),
                },
            },
        };
        assert!(stmt.emit(&symbols, "BRA nowhere").is_err());
    }

    #[test]
    fn data_emits_raw_literal() {
        let symbols = SymbolTable::new();
        let stmt = AirStmt {
            addr: 9,
            kind: StmtKind::Data { value: 999 },
        };
        assert_eq!(stmt.emit(&symbols, "").unwrap(), 999);
    }
}
