use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Recoverable assembly diagnostics. They are counted and reported with
/// their source position, and the affected operand contributes zero bytes;
/// assembly always continues.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AsmError {
    IllegalOpcode,
    IllegalOperand,
    MissingOperand,
    MultiplyDefined,
    Undefined,
    ValueOutOfRange,
    MissingParen,
    MissingStringSep,
    MemoryOverride,
    MissingIf,
    IfNesting,
    MissingEndif,
    IncludeNesting,
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            AsmError::IllegalOpcode => "illegal opcode",
            AsmError::IllegalOperand => "illegal operand",
            AsmError::MissingOperand => "missing operand",
            AsmError::MultiplyDefined => "multiply defined symbol",
            AsmError::Undefined => "undefined symbol",
            AsmError::ValueOutOfRange => "value out of range",
            AsmError::MissingParen => "missing )",
            AsmError::MissingStringSep => "missing string separator",
            AsmError::MemoryOverride => "memory override",
            AsmError::MissingIf => "missing IF",
            AsmError::IfNesting => "IF nesting too deep",
            AsmError::MissingEndif => "missing ENDIF",
            AsmError::IncludeNesting => "INCLUDE nesting too deep",
        })
    }
}

/// Conditions that abort the whole assembly.
#[derive(Debug)]
pub enum Fatal {
    /// Pass 1 finished with this many errors; no output is produced.
    Halted(usize),
    FileOpen(PathBuf, io::Error),
    Internal(&'static str),
    Io(io::Error),
}

impl fmt::Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Fatal::Halted(n) => write!(f, "assembly halted, {} error(s)", n),
            Fatal::FileOpen(path, err) => {
                write!(f, "can't open file {}: {}", path.display(), err)
            }
            Fatal::Internal(what) => write!(f, "internal error: {}", what),
            Fatal::Io(err) => write!(f, "write failed: {}", err),
        }
    }
}

impl error::Error for Fatal {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Fatal::FileOpen(_, err) | Fatal::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Fatal {
    fn from(err: io::Error) -> Fatal {
        Fatal::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, Fatal>;
