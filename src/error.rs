//! Assembly-time diagnostics. All of them abort assembly: a failing program
//! produces no machine-code image.

use miette::{miette, LabeledSpan, Report, Severity};

use crate::span::Span;

pub fn unknown_token(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::unknown_token",
        help = "statements are made of labels, mnemonics, and decimal literals.",
        labels = vec![LabeledSpan::at(span, "unknown token")],
        "Encountered an unknown token",
    )
    .with_source_code(src.to_string())
}

pub fn unexpected_token(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::unexpected_token",
        help = "statements take the form `[label] MNEMONIC [operand]`, one per line.",
        labels = vec![LabeledSpan::at(span, "unexpected token")],
        "Unexpected token",
    )
    .with_source_code(src.to_string())
}

pub fn unknown_mnemonic(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::unknown_mnemonic",
        help = "valid mnemonics are ADD, SUB, STA, LDA, BRA, BRZ, BRP, INP, OUT, HLT, and DAT.",
        labels = vec![LabeledSpan::at(span, "not a mnemonic")],
        "Unknown instruction mnemonic",
    )
    .with_source_code(src.to_string())
}

pub fn missing_mnemonic(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::missing_mnemonic",
        help = "a label must be followed by a mnemonic on the same line.",
        labels = vec![LabeledSpan::at(span, "label without an instruction")],
        "Statement is missing a mnemonic",
    )
    .with_source_code(src.to_string())
}

pub fn duplicate_label(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::duplicate_label",
        help = "each label may only be defined once per program.",
        labels = vec![LabeledSpan::at(span, "duplicate label")],
        "Duplicate label definition",
    )
    .with_source_code(src.to_string())
}

pub fn unresolved_label(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::unresolved_label",
        help = "labels are case-sensitive; check that this one is defined somewhere.",
        labels = vec![LabeledSpan::at(span, "undefined label")],
        "Reference to an undefined label",
    )
    .with_source_code(src.to_string())
}

pub fn missing_operand(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::missing_operand",
        help = "this instruction addresses a mailbox: give it a label or an address 0-99.",
        labels = vec![LabeledSpan::at(span, "requires an operand")],
        "Instruction is missing its address operand",
    )
    .with_source_code(src.to_string())
}

pub fn unexpected_operand(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::unexpected_operand",
        help = "INP, OUT, and HLT take no operand; DAT takes an optional decimal literal.",
        labels = vec![LabeledSpan::at(span, "unexpected operand")],
        "Instruction does not accept this operand",
    )
    .with_source_code(src.to_string())
}

pub fn bad_literal(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::bad_literal",
        help = "literals are plain decimal integers, like 42.",
        labels = vec![LabeledSpan::at(span, "invalid literal")],
        "Invalid decimal literal",
    )
    .with_source_code(src.to_string())
}

pub fn addr_out_of_range(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::addr_out_of_range",
        help = "the LMC has 100 mailboxes, addressed 0-99.",
        labels = vec![LabeledSpan::at(span, "address out of range")],
        "Mailbox address out of range",
    )
    .with_source_code(src.to_string())
}

pub fn literal_out_of_range(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::literal_out_of_range",
        help = "a mailbox holds a three-digit word: DAT literals range 0-999.",
        labels = vec![LabeledSpan::at(span, "literal out of range")],
        "DAT literal out of range",
    )
    .with_source_code(src.to_string())
}

pub fn program_too_large(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::program_too_large",
        help = "programs are limited to the LMC's 100 mailboxes.",
        labels = vec![LabeledSpan::at(span, "no mailbox left for this statement")],
        "Program exceeds 100 statements",
    )
    .with_source_code(src.to_string())
}
