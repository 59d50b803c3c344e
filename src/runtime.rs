use std::cmp::Ordering;

use thiserror::Error;

/// The LMC addresses 100 mailboxes.
pub const MEMORY_SIZE: usize = 100;

/// Largest value a three-digit mailbox word can hold.
pub const WORD_MAX: u16 = 999;

/// Fault that aborts execution. Distinct from a normal `HLT` so front-ends
/// can report "crashed" rather than "finished".
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum RunError {
    #[error("program image of {0} words does not fit in {MEMORY_SIZE} mailboxes")]
    ImageTooLarge(usize),
    #[error("word {value} at address {addr} is not a three-digit value")]
    WordOutOfRange { addr: u16, value: u16 },
    #[error("program counter ran out of addressable memory at {0}")]
    PcOutOfBounds(u16),
    #[error("illegal instruction {word:03} at address {addr}")]
    IllegalInstruction { addr: u16, word: u16 },
    #[error("input value {0} does not fit in a three-digit word")]
    InputOutOfRange(i64),
    #[error("input supplied while none was requested")]
    InputNotRequested,
}

/// Sign of the accumulator's last-computed value, tracked separately from
/// the wrapped three-digit contents so `BRP` can see through the wrap.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Sign {
    Zero,
    Positive,
    Negative,
}

impl Sign {
    fn of(value: i32) -> Sign {
        match value.cmp(&0) {
            Ordering::Less => Sign::Negative,
            Ordering::Equal => Sign::Zero,
            Ordering::Greater => Sign::Positive,
        }
    }
}

/// Owns the complete machine state and advances it one instruction per
/// [`step`](Simulator::step).
///
/// The simulator never blocks: an `INP` instruction raises
/// [`awaiting_input`](Simulator::awaiting_input) and returns control to the
/// caller, who supplies the value through
/// [`provide_input`](Simulator::provide_input) before stepping again.
/// Instances share nothing, so any number may run side by side.
#[derive(Clone, Debug)]
pub struct Simulator {
    /// Mailboxes 0-99.
    mem: [u16; MEMORY_SIZE],
    /// Address of the next instruction to fetch.
    pc: u16,
    /// Displayed accumulator contents, always three digits.
    acc: u16,
    acc_sign: Sign,
    halted: bool,
    awaiting_input: bool,
}

impl Default for Simulator {
    fn default() -> Self {
        Simulator::new()
    }
}

impl Simulator {
    pub fn new() -> Simulator {
        Simulator {
            mem: [0; MEMORY_SIZE],
            pc: 0,
            acc: 0,
            acc_sign: Sign::Zero,
            halted: false,
            awaiting_input: false,
        }
    }

    /// Return every register, mailbox, and flag to its power-on state.
    pub fn reset(&mut self) {
        *self = Simulator::new();
    }

    /// Copy a machine-code image into memory, zero the unused tail, and
    /// reset registers and flags.
    pub fn load(&mut self, image: &[u16]) -> Result<(), RunError> {
        if image.len() > MEMORY_SIZE {
            return Err(RunError::ImageTooLarge(image.len()));
        }
        if let Some((addr, &value)) = image.iter().enumerate().find(|&(_, &word)| word > WORD_MAX)
        {
            return Err(RunError::WordOutOfRange {
                addr: addr as u16,
                value,
            });
        }
        self.reset();
        self.mem[..image.len()].copy_from_slice(image);
        Ok(())
    }

    /// Execution finished normally via `HLT`.
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// An `INP` instruction is waiting on [`provide_input`](Simulator::provide_input).
    pub fn awaiting_input(&self) -> bool {
        self.awaiting_input
    }

    pub fn accumulator(&self) -> u16 {
        self.acc
    }

    pub fn counter(&self) -> u16 {
        self.pc
    }

    /// Read-only view of the mailboxes.
    pub fn memory(&self) -> &[u16] {
        &self.mem
    }

    /// Execute one fetch/decode/execute cycle.
    ///
    /// Returns the value emitted by an `OUT` instruction, if one executed.
    /// A no-op while halted or while input is pending.
    pub fn step(&mut self) -> Result<Option<u16>, RunError> {
        if self.halted || self.awaiting_input {
            return Ok(None);
        }

        let addr = self.pc;
        let word = *self
            .mem
            .get(addr as usize)
            .ok_or(RunError::PcOutOfBounds(addr))?;
        // Counter advances before execution; a taken branch overwrites it.
        self.pc += 1;

        // Operand is two digits, so mailbox accesses below cannot go out of
        // bounds.
        let (opcode, operand) = (word / 100, word % 100);
        let mut output = None;
        match opcode {
            0 => self.halted = true,
            1 => self.set_acc(i32::from(self.acc) + i32::from(self.mem[operand as usize])),
            2 => self.set_acc(i32::from(self.acc) - i32::from(self.mem[operand as usize])),
            3 => self.mem[operand as usize] = self.acc,
            5 => self.set_acc(i32::from(self.mem[operand as usize])),
            6 => self.pc = operand,
            7 => {
                if self.acc == 0 {
                    self.pc = operand;
                }
            }
            8 => {
                if self.acc_sign != Sign::Negative {
                    self.pc = operand;
                }
            }
            9 if operand == 1 => self.awaiting_input = true,
            9 if operand == 2 => output = Some(self.acc),
            _ => return Err(RunError::IllegalInstruction { addr, word }),
        }
        Ok(output)
    }

    /// Resolve a pending `INP` by writing `value` into the accumulator and
    /// clearing the flag. Execution resumes at the already-advanced counter;
    /// the `INP` instruction is not re-fetched.
    pub fn provide_input(&mut self, value: i64) -> Result<(), RunError> {
        if !self.awaiting_input {
            return Err(RunError::InputNotRequested);
        }
        if !(0..=i64::from(WORD_MAX)).contains(&value) {
            return Err(RunError::InputOutOfRange(value));
        }
        self.acc = value as u16;
        self.acc_sign = Sign::of(value as i32);
        self.awaiting_input = false;
        Ok(())
    }

    /// Store a wrapped three-digit value while remembering the sign of the
    /// unwrapped result for `BRP`.
    fn set_acc(&mut self, unwrapped: i32) {
        self.acc_sign = Sign::of(unwrapped);
        self.acc = unwrapped.rem_euclid(1000) as u16;
    }
}
