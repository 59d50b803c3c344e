//! Assembler and simulator for the Little Man Computer: 100 mailboxes, one
//! accumulator, eleven mnemonics.
//!
//! ```
//! use mailman::{assemble, Simulator};
//!
//! let image = assemble("INP\nSTA x\nINP\nADD x\nOUT\nHLT\nx DAT").unwrap();
//! let mut sim = Simulator::new();
//! sim.load(image.words()).unwrap();
//! ```

// Assembling
mod parser;
pub use parser::{assemble, AsmParser, Assembler, DEFAULT_COMMENT_CHAR};
mod air;
pub use air::{Air, AirStmt, Image, Mnemonic, Operand, StmtKind};

// Running
mod runtime;
pub use runtime::{RunError, Simulator, MEMORY_SIZE, WORD_MAX};

mod error;
mod lexer;
mod span;
pub use span::Span;
mod symbol;
pub use symbol::SymbolTable;

/// Amount of lines to show as context, each side of focus line (line containing span).
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 2;
