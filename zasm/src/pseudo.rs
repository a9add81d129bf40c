//! Pseudo operations: address placement, symbol definition, data
//! definition, conditional assembly, include files and listing control.

use crate::driver::Asm;
use crate::errors::{AsmError, Result};
use crate::scan::{split2, split_items, sym_name, COMMENT, STRSEP};
use crate::{IFNEST, INCNEST};
use std::io::Write;
use std::path::PathBuf;

/// Listing-control and include operations sharing one dispatcher.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MiscOp {
    Eject,
    List,
    Nolist,
    Page,
    Print,
    Include,
    Title,
}

/// Conditional-assembly operations.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CondOp {
    IfDef,
    IfNdef,
    IfEq,
    IfNeq,
    Else,
    Endif,
}

impl<W: Write> Asm<W> {
    /// `ORG`: place the next byte. The first `ORG` of pass 1 becomes the
    /// program start address; later ones in pass 2 emit gap fill. Moving
    /// backwards is a memory override.
    pub(crate) fn op_org(&mut self, opnd: &str) -> Result<usize> {
        let addr = self.eval(opnd);
        if addr < self.pc {
            self.asmerr(AsmError::MemoryOverride);
            return Ok(0);
        }
        if self.pass == 1 {
            if self.prg_flag == 0 {
                self.prg_adr = addr;
                self.prg_flag = 1;
            }
        } else {
            self.prg_flag += 1;
            if self.prg_flag > 2 {
                self.obj.fill((addr - self.pc) as usize)?;
            }
            self.sd_flag = 2;
        }
        self.pc = addr;
        Ok(0)
    }

    /// `EQU`: define the label once; pass 2 only computes the listing
    /// value.
    pub(crate) fn op_equ(&mut self, label: &str, opnd: &str) -> Result<usize> {
        if self.pass == 1 {
            if self.symtab.get(label).is_none() {
                self.sd_val = self.eval(opnd);
                let val = self.sd_val;
                self.put_sym(label, val);
            } else {
                self.asmerr(AsmError::MultiplyDefined);
            }
        } else {
            self.sd_flag = 1;
            self.sd_val = self.eval(opnd);
        }
        Ok(0)
    }

    /// `DEFL`: like `EQU`, but silently redefinable in both passes.
    pub(crate) fn op_defl(&mut self, label: &str, opnd: &str) -> Result<usize> {
        self.sd_flag = 1;
        self.sd_val = self.eval(opnd);
        let val = self.sd_val;
        self.put_sym(label, val);
        Ok(0)
    }

    /// `DEFS`: advance the location counter; pass 2 fills the gap unless
    /// fill is disabled.
    pub(crate) fn op_defs(&mut self, label: &str, opnd: &str) -> Result<usize> {
        if self.pass == 1 && !label.is_empty() {
            self.put_label();
        }
        self.sd_val = self.pc;
        self.sd_flag = 3;
        let count = self.eval(opnd);
        if self.pass == 2 && self.dump_flag && count > 0 {
            self.obj.fill(count as usize)?;
        }
        self.pc += count;
        Ok(0)
    }

    /// `DEFB`: bytes from expressions and quoted strings, unterminated.
    pub(crate) fn op_defb(&mut self, label: &str, opnd: &str) -> Result<usize> {
        if self.pass == 1 && !label.is_empty() {
            self.put_label();
        }
        let chars: Vec<char> = opnd.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if chars[i] == STRSEP {
                i += 1;
                loop {
                    match chars.get(i) {
                        None => {
                            self.asmerr(AsmError::MissingStringSep);
                            return Ok(self.ops.len());
                        }
                        Some(&STRSEP) => {
                            i += 1;
                            break;
                        }
                        Some(&c) => {
                            self.emit(c as u8)?;
                            i += 1;
                        }
                    }
                }
            } else {
                let start = i;
                while i < chars.len() && chars[i] != ',' {
                    i += 1;
                }
                let item: String = chars[start..i].iter().collect();
                let b = if self.pass == 2 {
                    (self.eval(&item) & 0xff) as u8
                } else {
                    0
                };
                self.emit(b)?;
            }
            if chars.get(i) == Some(&',') {
                i += 1;
            }
        }
        Ok(self.ops.len())
    }

    /// `DEFM`: one quoted string, no terminator byte.
    pub(crate) fn op_defm(&mut self, label: &str, opnd: &str) -> Result<usize> {
        if self.pass == 1 && !label.is_empty() {
            self.put_label();
        }
        let mut chars = opnd.chars();
        if chars.next() != Some(STRSEP) {
            self.asmerr(AsmError::MissingStringSep);
            return Ok(0);
        }
        loop {
            match chars.next() {
                None => {
                    self.asmerr(AsmError::MissingStringSep);
                    break;
                }
                Some(STRSEP) => break,
                Some(c) => self.emit(c as u8)?,
            }
        }
        Ok(self.ops.len())
    }

    /// `DEFW`: 16-bit words, low byte first.
    pub(crate) fn op_defw(&mut self, label: &str, opnd: &str) -> Result<usize> {
        if self.pass == 1 && !label.is_empty() {
            self.put_label();
        }
        for item in split_items(opnd) {
            let w = if self.pass == 2 {
                (self.eval(item) & 0xffff) as u16
            } else {
                0
            };
            self.emit_word(w)?;
        }
        Ok(self.ops.len())
    }

    /// Listing control and `INCLUDE`.
    pub(crate) fn op_misc(&mut self, op: MiscOp, opnd: &str) -> Result<usize> {
        self.sd_flag = 2;
        match op {
            MiscOp::Eject => {
                if self.pass == 2 {
                    self.p_line = self.ppl;
                }
            }
            MiscOp::List => {
                if self.pass == 2 {
                    self.list_flag = true;
                }
            }
            MiscOp::Nolist => {
                if self.pass == 2 {
                    self.list_flag = false;
                }
            }
            MiscOp::Page => {
                if self.pass == 2 {
                    let ppl = self.eval(opnd);
                    if ppl > 0 {
                        self.ppl = ppl as usize;
                    }
                }
            }
            MiscOp::Print => {
                if self.pass == 1 {
                    let text: String =
                        opnd.chars().filter(|&c| c != STRSEP).collect();
                    println!("{}", text);
                }
            }
            MiscOp::Include => return self.op_include(),
            MiscOp::Title => {
                if self.pass == 2 {
                    self.title = title_text(&self.line);
                }
            }
        }
        Ok(0)
    }

    /// `INCLUDE`: process another source file in place, then resume.
    fn op_include(&mut self) -> Result<usize> {
        if self.incnest >= INCNEST {
            self.asmerr(AsmError::IncludeNesting);
            return Ok(0);
        }
        let fname = match include_filename(&self.line) {
            Some(f) => f,
            None => {
                self.asmerr(AsmError::MissingOperand);
                return Ok(0);
            }
        };
        self.incnest += 1;
        let saved_line = self.c_line;
        let saved_fn = self.srcfn.clone();
        if self.pass == 2 {
            self.sd_flag = 2;
            self.lst_line(0, 0);
        }
        if self.ver_flag {
            println!("   Include {}", fname.display());
        }
        self.process_file(&fname)?;
        self.incnest -= 1;
        self.c_line = saved_line;
        self.srcfn = saved_fn;
        if self.ver_flag {
            println!("   Resume  {}", self.srcfn);
        }
        if self.list_flag && self.pass == 2 {
            self.lst_header();
            self.lst_attl();
        }
        self.sd_flag = 4;
        Ok(0)
    }

    /// `IFDEF`/`IFNDEF`/`IFEQ`/`IFNEQ`/`ELSE`/`ENDIF`. A nested frame
    /// saves the enclosing `gencode`; a false condition clears it until
    /// the matching `ENDIF` restores the saved state.
    pub(crate) fn op_cond(&mut self, op: CondOp, opnd: &str) -> Result<usize> {
        match op {
            CondOp::IfDef | CondOp::IfNdef => {
                if self.push_cond() {
                    if self.gencode {
                        let defined =
                            self.symtab.get(sym_name(opnd)).is_some();
                        if defined == (op == CondOp::IfNdef) {
                            self.gencode = false;
                        }
                    }
                }
            }
            CondOp::IfEq | CondOp::IfNeq => {
                if self.push_cond() {
                    match split2(opnd) {
                        ("", _) | (_, None) => {
                            self.asmerr(AsmError::MissingOperand)
                        }
                        (left, Some(right)) => {
                            if self.gencode {
                                let a = self.eval(left);
                                let b = self.eval(right);
                                if (a == b) == (op == CondOp::IfNeq) {
                                    self.gencode = false;
                                }
                            }
                        }
                    }
                }
            }
            CondOp::Else => {
                if self.iflevel == 0 {
                    self.asmerr(AsmError::MissingIf);
                } else if self.condstack[self.iflevel - 1] {
                    self.gencode = !self.gencode;
                }
            }
            CondOp::Endif => {
                if self.iflevel == 0 {
                    self.asmerr(AsmError::MissingIf);
                } else {
                    self.iflevel -= 1;
                    self.gencode = self.condstack[self.iflevel];
                }
            }
        }
        self.sd_flag = 2;
        Ok(0)
    }

    /// Push the current `gencode` onto the conditional stack; false when
    /// the nesting limit is hit.
    fn push_cond(&mut self) -> bool {
        if self.iflevel >= IFNEST {
            self.asmerr(AsmError::IfNesting);
            return false;
        }
        self.condstack[self.iflevel] = self.gencode;
        self.iflevel += 1;
        true
    }

    /// `EXTRN` and `PUBLIC` are accepted and ignored.
    pub(crate) fn op_glob(&mut self) -> Result<usize> {
        self.sd_flag = 2;
        Ok(0)
    }
}

/// The include filename is taken from the raw line so its case survives.
fn include_filename(line: &str) -> Option<PathBuf> {
    let mut rest = line.trim_start();
    // skip the INCLUDE word itself
    rest = match rest.find(char::is_whitespace) {
        Some(at) => rest[at..].trim_start(),
        None => return None,
    };
    let end = rest
        .find(|c: char| c.is_whitespace() || c == COMMENT)
        .unwrap_or_else(|| rest.len());
    if end == 0 {
        None
    } else {
        Some(PathBuf::from(&rest[..end]))
    }
}

/// `TITLE` takes the rest of the raw line, optionally quoted.
fn title_text(line: &str) -> String {
    let mut rest = line.trim_start();
    rest = match rest.find(char::is_whitespace) {
        Some(at) => rest[at..].trim_start(),
        None => return String::new(),
    };
    if rest.starts_with(STRSEP) {
        rest = &rest[1..];
    }
    let end = rest
        .find(|c: char| c == STRSEP || c == COMMENT || c == '\n')
        .unwrap_or_else(|| rest.len());
    rest[..end].to_string()
}
