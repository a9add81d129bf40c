//! Two-pass assembler for the Zilog Z80.
//!
//! The main entry point is [`assemble`], which takes the source list and
//! output switches in an [`Options`] value, writes the object file (and
//! optionally a listing), and returns the number of assembly errors.
//! Pass 1 assigns addresses and collects symbols, pass 2 emits object
//! code through the [objfile](../objfile/index.html) sink and writes the
//! listing. An error-free assembly leaves exactly one absolute image.
//!
//! # Source Language
//!
//! One statement per line:
//!
//! ```text
//! LABEL:  OPCODE  OPERAND,OPERAND  ; comment
//! ```
//!
//! A label starts in column one, may end with `:`, and is significant to
//! eight characters. Identifiers and mnemonics are case-insensitive. A
//! `*` in column one comments out the whole line. `END` stops the current
//! file (an included file resumes its includer).
//!
//! ## Operands and Expressions
//!
//! Operand expressions combine symbols, `$` (the current location),
//! numbers and `'…'` character strings with the operators
//! `+ - * / % < > | & ^ ~`, where `<` and `>` shift. Operators have no
//! precedence and bind right to left: `1+2*3` is `1+(2*3)`. Numbers are
//! decimal by default; a trailing `H`, `O` or `B` selects base 16, 8 or 2,
//! and a hex number must start with a digit (`0FFH`). `'A'` is 0x41,
//! `'AB'` is 0x4142.
//!
//! ## Pseudo Operations
//!
//!  Directive | Effect
//! -----------|--------------------------------------------------------
//! `ORG e`    | place the next byte at address `e`
//! `l EQU e`  | define `l` once
//! `l DEFL e` | define `l`, redefinable
//! `DEFB ...` | bytes: expressions and/or `'strings'`, unterminated
//! `DEFM 's'` | string bytes, unterminated
//! `DEFW ...` | 16-bit words, low byte first
//! `DEFS e`   | reserve `e` bytes (filled with 0FFH unless `-x`)
//! `INCLUDE f`| assemble file `f` in place (up to 5 levels)
//! `IFDEF s` / `IFNDEF s` / `IFEQ a,b` / `IFNEQ a,b` | conditional assembly (up to 5 levels)
//! `ELSE` / `ENDIF` | close or flip the innermost conditional
//! `TITLE t`  | listing page title
//! `PAGE n` / `EJECT` | listing page length / page break
//! `LIST` / `NOLIST` | listing on and off
//! `PRINT t`  | write `t` to the console during pass 1
//! `EXTRN` / `PUBLIC` | accepted, ignored
//!
//! # Object Formats
//!
//! Intel HEX (the default), raw binary, or Mostek binary, selected by
//! [`Format`]; see the objfile crate for the exact shapes.

mod driver;
mod encode;
mod errors;
mod eval;
mod listing;
mod optab;
mod parser;
mod pseudo;
mod scan;
mod symtab;

#[cfg(test)]
mod test;

pub use crate::driver::{assemble, Asm, Options, SymSort};
pub use crate::errors::{AsmError, Fatal, Result};
pub use objfile::Format;

/// Significant length of symbol names.
pub const SYMSIZE: usize = 8;
/// Conditional-assembly nesting limit.
pub const IFNEST: usize = 5;
/// Include nesting limit.
pub const INCNEST: usize = 5;
/// Capacity of the per-line object-code buffer.
pub const OPCARRAY: usize = 256;
/// Default listing lines per page.
pub const PLENGTH: usize = 65;
/// The end-of-file mnemonic, handled by the driver itself.
pub const ENDFILE: &str = "END";
