//! Instruction encoders. Each encoder consumes the operand field of the
//! current line, classifies its comma-separated parts, and appends one to
//! four object bytes to the line buffer, returning the byte count.
//!
//! Operand expressions are only evaluated in pass 2; pass 1 derives the
//! byte count from classification alone, which is what lets forward
//! references assemble.

use crate::driver::Asm;
use crate::errors::{AsmError, Fatal, Result};
use crate::scan::split2;
use crate::OPCARRAY;
use byteorder::WriteBytesExt;
use std::io::Write;
use util::Endian;
use z80::*;

/// A classified sub-operand. Expression text stays unevaluated until an
/// encoder arm actually needs the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opnd<'a> {
    None,
    Reg(Reg),
    Pair(Pair),
    IndHl,
    IndBc,
    IndDe,
    IndSp,
    IndIx(&'a str),
    IndIy(&'a str),
    Mem(&'a str),
    Expr(&'a str),
}

/// Classify one sub-operand. Register, pair and plain indirect tokens win;
/// `(IX...)`/`(IY...)` keep their displacement text; any other
/// parenthesized form is a memory reference and the rest is an expression.
pub fn classify(s: &str) -> Opnd {
    if s.is_empty() {
        return Opnd::None;
    }
    if let Ok(r) = s.parse::<Reg>() {
        return Opnd::Reg(r);
    }
    if let Ok(p) = s.parse::<Pair>() {
        return Opnd::Pair(p);
    }
    match s {
        "(HL)" => return Opnd::IndHl,
        "(BC)" => return Opnd::IndBc,
        "(DE)" => return Opnd::IndDe,
        "(SP)" => return Opnd::IndSp,
        _ => {}
    }
    if s.starts_with("(IX") && s.ends_with(')') {
        return Opnd::IndIx(&s[3..s.len() - 1]);
    }
    if s.starts_with("(IY") && s.ends_with(')') {
        return Opnd::IndIy(&s[3..s.len() - 1]);
    }
    if s.starts_with('(') {
        return Opnd::Mem(s);
    }
    Opnd::Expr(s)
}

impl<W: Write> Asm<W> {
    /// Append one byte to the line buffer.
    pub(crate) fn emit(&mut self, b: u8) -> Result<()> {
        if self.ops.len() >= OPCARRAY {
            return Err(Fatal::Internal("line buffer overflow"));
        }
        self.ops.push(b);
        Ok(())
    }

    /// Append a 16-bit word, low byte first.
    pub(crate) fn emit_word(&mut self, w: u16) -> Result<()> {
        if self.ops.len() + 2 > OPCARRAY {
            return Err(Fatal::Internal("line buffer overflow"));
        }
        self.ops.write_u16::<Endian>(w)?;
        Ok(())
    }

    /// 8-bit immediate, range-checked; 0 in pass 1.
    fn imm8(&mut self, s: &str) -> u8 {
        if self.pass == 2 {
            let val = self.eval(s);
            (self.chk_v1(val) & 0xff) as u8
        } else {
            0
        }
    }

    /// 16-bit immediate or address; 0 in pass 1.
    fn imm16(&mut self, s: &str) -> u16 {
        if self.pass == 2 {
            (self.eval(s) & 0xffff) as u16
        } else {
            0
        }
    }

    /// Signed index displacement for `(IX±d)`/`(IY±d)`; 0 in pass 1.
    fn disp8(&mut self, s: &str) -> u8 {
        if self.pass == 2 {
            let val = self.eval(s);
            (self.chk_v2(val) & 0xff) as u8
        } else {
            0
        }
    }

    /// Relative branch displacement from the byte after the instruction.
    fn rel8(&mut self, s: &str) -> u8 {
        if self.pass == 2 {
            let target = self.eval(s);
            let disp = self.chk_v2(target.wrapping_sub(self.pc + 2));
            (disp & 0xff) as u8
        } else {
            0
        }
    }

    fn illegal(&mut self) -> Result<usize> {
        self.asmerr(AsmError::IllegalOperand);
        Ok(0)
    }

    fn missing(&mut self) -> Result<usize> {
        self.asmerr(AsmError::MissingOperand);
        Ok(0)
    }

    /// Single-byte instructions (opcode byte from the table).
    pub(crate) fn op_1b(&mut self, c1: u8) -> Result<usize> {
        self.emit(c1)?;
        Ok(1)
    }

    /// Two-byte instructions (ED group and friends).
    pub(crate) fn op_2b(&mut self, c1: u8, c2: u8) -> Result<usize> {
        self.emit(c1)?;
        self.emit(c2)?;
        Ok(2)
    }

    /// The 8-bit source side shared by all ALU operations: register,
    /// `(HL)`, indexed memory, or an immediate.
    fn alu_src(&mut self, op: AluOp, s: &str) -> Result<usize> {
        match classify(s) {
            Opnd::Reg(r) => match r.bits() {
                Some(bits) => {
                    self.emit(alu_r(op, bits))?;
                    Ok(1)
                }
                None => self.illegal(),
            },
            Opnd::IndHl => {
                self.emit(alu_r(op, IND_HL))?;
                Ok(1)
            }
            Opnd::IndIx(d) => {
                self.emit(PREFIX_IX)?;
                self.emit(alu_r(op, IND_HL))?;
                let d = self.disp8(d);
                self.emit(d)?;
                Ok(3)
            }
            Opnd::IndIy(d) => {
                self.emit(PREFIX_IY)?;
                self.emit(alu_r(op, IND_HL))?;
                let d = self.disp8(d);
                self.emit(d)?;
                Ok(3)
            }
            Opnd::Mem(t) | Opnd::Expr(t) => {
                self.emit(alu_n(op))?;
                let n = self.imm8(t);
                self.emit(n)?;
                Ok(2)
            }
            Opnd::None => self.missing(),
            _ => self.illegal(),
        }
    }

    /// `SUB`, `AND`, `XOR`, `OR` and `CP` take a bare source operand.
    pub(crate) fn op_alu(&mut self, op: AluOp, opnd: &str) -> Result<usize> {
        self.alu_src(op, opnd)
    }

    /// `ADD A,src`, `ADD HL,ss`, `ADD IX,pp`, `ADD IY,pp`.
    pub(crate) fn op_add(&mut self, opnd: &str) -> Result<usize> {
        let (dst, src) = match split2(opnd) {
            (d, Some(s)) => (d, s),
            _ => return self.missing(),
        };
        match classify(dst) {
            Opnd::Reg(Reg::A) => self.alu_src(AluOp::ADD, src),
            Opnd::Pair(Pair::HL) => match classify(src).pair_dd() {
                Some(ss) => {
                    self.emit(add_hl_ss(ss))?;
                    Ok(1)
                }
                None => self.illegal(),
            },
            Opnd::Pair(idx @ Pair::IX) | Opnd::Pair(idx @ Pair::IY) => {
                // the index register itself sits in the HL slot
                let pp = match classify(src) {
                    Opnd::Pair(p) if p == idx => Some(2),
                    Opnd::Pair(Pair::BC) => Some(0),
                    Opnd::Pair(Pair::DE) => Some(1),
                    Opnd::Pair(Pair::SP) => Some(3),
                    _ => None,
                };
                match pp {
                    Some(pp) => {
                        self.emit(index_prefix(idx))?;
                        self.emit(add_hl_ss(pp))?;
                        Ok(2)
                    }
                    None => self.illegal(),
                }
            }
            _ => self.illegal(),
        }
    }

    /// `ADC A,src` and `ADC HL,ss`.
    pub(crate) fn op_adc(&mut self, opnd: &str) -> Result<usize> {
        self.adc_sbc(opnd, AluOp::ADC)
    }

    /// `SBC A,src` and `SBC HL,ss`.
    pub(crate) fn op_sbc(&mut self, opnd: &str) -> Result<usize> {
        self.adc_sbc(opnd, AluOp::SBC)
    }

    fn adc_sbc(&mut self, opnd: &str, op: AluOp) -> Result<usize> {
        let (dst, src) = match split2(opnd) {
            (d, Some(s)) => (d, s),
            _ => return self.missing(),
        };
        match classify(dst) {
            Opnd::Reg(Reg::A) => self.alu_src(op, src),
            Opnd::Pair(Pair::HL) => match classify(src).pair_dd() {
                Some(ss) => {
                    self.emit(PREFIX_EXT)?;
                    let byte = if op == AluOp::ADC {
                        adc_hl_ss(ss)
                    } else {
                        sbc_hl_ss(ss)
                    };
                    self.emit(byte)?;
                    Ok(2)
                }
                None => self.illegal(),
            },
            _ => self.illegal(),
        }
    }

    /// `INC` and `DEC` over registers, pairs and memory operands.
    pub(crate) fn op_incdec(&mut self, inc: bool, opnd: &str) -> Result<usize> {
        let r_byte = |bits| if inc { inc_r(bits) } else { dec_r(bits) };
        let ss_byte = |ss| if inc { inc_ss(ss) } else { dec_ss(ss) };
        match classify(opnd) {
            Opnd::Reg(r) => match r.bits() {
                Some(bits) => {
                    self.emit(r_byte(bits))?;
                    Ok(1)
                }
                None => self.illegal(),
            },
            Opnd::IndHl => {
                self.emit(r_byte(IND_HL))?;
                Ok(1)
            }
            Opnd::IndIx(d) => {
                self.emit(PREFIX_IX)?;
                self.emit(r_byte(IND_HL))?;
                let d = self.disp8(d);
                self.emit(d)?;
                Ok(3)
            }
            Opnd::IndIy(d) => {
                self.emit(PREFIX_IY)?;
                self.emit(r_byte(IND_HL))?;
                let d = self.disp8(d);
                self.emit(d)?;
                Ok(3)
            }
            Opnd::Pair(idx @ Pair::IX) | Opnd::Pair(idx @ Pair::IY) => {
                self.emit(index_prefix(idx))?;
                self.emit(ss_byte(2))?;
                Ok(2)
            }
            Opnd::Pair(p) => match p.dd() {
                Some(ss) => {
                    self.emit(ss_byte(ss))?;
                    Ok(1)
                }
                None => self.illegal(),
            },
            Opnd::None => self.missing(),
            _ => self.illegal(),
        }
    }

    /// CB-group rotates and shifts.
    pub(crate) fn op_rot(&mut self, op: RotOp, opnd: &str) -> Result<usize> {
        match classify(opnd) {
            Opnd::Reg(r) => match r.bits() {
                Some(bits) => {
                    self.emit(PREFIX_BIT)?;
                    self.emit(rot_m(op, bits))?;
                    Ok(2)
                }
                None => self.illegal(),
            },
            Opnd::IndHl => {
                self.emit(PREFIX_BIT)?;
                self.emit(rot_m(op, IND_HL))?;
                Ok(2)
            }
            Opnd::IndIx(d) => self.rot_index(PREFIX_IX, rot_m(op, IND_HL), d),
            Opnd::IndIy(d) => self.rot_index(PREFIX_IY, rot_m(op, IND_HL), d),
            Opnd::None => self.missing(),
            _ => self.illegal(),
        }
    }

    fn rot_index(&mut self, prefix: u8, byte: u8, d: &str) -> Result<usize> {
        self.emit(prefix)?;
        self.emit(PREFIX_BIT)?;
        let d = self.disp8(d);
        self.emit(d)?;
        self.emit(byte)?;
        Ok(4)
    }

    /// `BIT`, `RES` and `SET`: bit number, then a register or memory
    /// operand.
    pub(crate) fn op_bits(&mut self, grp: BitGrp, opnd: &str) -> Result<usize> {
        let (bit_expr, target) = match split2(opnd) {
            (b, Some(t)) => (b, t),
            _ => return self.missing(),
        };
        let bit = if self.pass == 2 {
            match self.eval(bit_expr) {
                b @ 0..=7 => b as u8,
                _ => {
                    self.asmerr(AsmError::ValueOutOfRange);
                    0
                }
            }
        } else {
            0
        };
        match classify(target) {
            Opnd::Reg(r) => match r.bits() {
                Some(bits) => {
                    self.emit(PREFIX_BIT)?;
                    self.emit(bit_m(grp, bit, bits))?;
                    Ok(2)
                }
                None => self.illegal(),
            },
            Opnd::IndHl => {
                self.emit(PREFIX_BIT)?;
                self.emit(bit_m(grp, bit, IND_HL))?;
                Ok(2)
            }
            Opnd::IndIx(d) => {
                self.rot_index(PREFIX_IX, bit_m(grp, bit, IND_HL), d)
            }
            Opnd::IndIy(d) => {
                self.rot_index(PREFIX_IY, bit_m(grp, bit, IND_HL), d)
            }
            _ => self.illegal(),
        }
    }

    /// `PUSH`/`POP` over BC, DE, HL, AF, IX and IY.
    pub(crate) fn op_pupo(&mut self, push: bool, opnd: &str) -> Result<usize> {
        let byte = |qq| if push { push_qq(qq) } else { pop_qq(qq) };
        match classify(opnd) {
            Opnd::Pair(idx @ Pair::IX) | Opnd::Pair(idx @ Pair::IY) => {
                self.emit(index_prefix(idx))?;
                self.emit(byte(2))?;
                Ok(2)
            }
            Opnd::Pair(p) => match p.qq() {
                Some(qq) => {
                    self.emit(byte(qq))?;
                    Ok(1)
                }
                None => self.illegal(),
            },
            Opnd::None => self.missing(),
            _ => self.illegal(),
        }
    }

    /// The four exchange forms.
    pub(crate) fn op_ex(&mut self, opnd: &str) -> Result<usize> {
        if opnd == "AF,AF'" {
            self.emit(0x08)?;
            return Ok(1);
        }
        let (dst, src) = match split2(opnd) {
            (d, Some(s)) => (d, s),
            _ => return self.missing(),
        };
        match (classify(dst), classify(src)) {
            (Opnd::Pair(Pair::DE), Opnd::Pair(Pair::HL)) => {
                self.emit(0xeb)?;
                Ok(1)
            }
            (Opnd::IndSp, Opnd::Pair(Pair::HL)) => {
                self.emit(0xe3)?;
                Ok(1)
            }
            (Opnd::IndSp, Opnd::Pair(idx @ Pair::IX))
            | (Opnd::IndSp, Opnd::Pair(idx @ Pair::IY)) => {
                self.emit(index_prefix(idx))?;
                self.emit(0xe3)?;
                Ok(2)
            }
            _ => self.illegal(),
        }
    }

    /// `JP`: absolute, conditional, or through HL/IX/IY.
    pub(crate) fn op_jp(&mut self, opnd: &str) -> Result<usize> {
        match split2(opnd) {
            ("", None) => self.missing(),
            (target, None) => match classify(target) {
                Opnd::IndHl => {
                    self.emit(0xe9)?;
                    Ok(1)
                }
                Opnd::IndIx("") => {
                    self.emit(PREFIX_IX)?;
                    self.emit(0xe9)?;
                    Ok(2)
                }
                Opnd::IndIy("") => {
                    self.emit(PREFIX_IY)?;
                    self.emit(0xe9)?;
                    Ok(2)
                }
                Opnd::Mem(t) | Opnd::Expr(t) => {
                    self.emit(JP_NN)?;
                    let nn = self.imm16(t);
                    self.emit_word(nn)?;
                    Ok(3)
                }
                _ => self.illegal(),
            },
            (cond, Some(target)) => match cond.parse::<Cond>() {
                Ok(cc) => {
                    self.emit(jp_cc(cc))?;
                    let nn = self.imm16(target);
                    self.emit_word(nn)?;
                    Ok(3)
                }
                Err(_) => self.illegal(),
            },
        }
    }

    /// `JR`: relative jump, plain or over NZ/Z/NC/C.
    pub(crate) fn op_jr(&mut self, opnd: &str) -> Result<usize> {
        match split2(opnd) {
            ("", None) => self.missing(),
            (target, None) => {
                self.emit(JR_E)?;
                let e = self.rel8(target);
                self.emit(e)?;
                Ok(2)
            }
            (cond, Some(target)) => match cond.parse::<Cond>() {
                Ok(cc) if cc.relative() => {
                    self.emit(jr_cc(cc))?;
                    let e = self.rel8(target);
                    self.emit(e)?;
                    Ok(2)
                }
                _ => self.illegal(),
            },
        }
    }

    /// `CALL`, absolute or conditional.
    pub(crate) fn op_call(&mut self, opnd: &str) -> Result<usize> {
        match split2(opnd) {
            ("", None) => self.missing(),
            (target, None) => {
                self.emit(CALL_NN)?;
                let nn = self.imm16(target);
                self.emit_word(nn)?;
                Ok(3)
            }
            (cond, Some(target)) => match cond.parse::<Cond>() {
                Ok(cc) => {
                    self.emit(call_cc(cc))?;
                    let nn = self.imm16(target);
                    self.emit_word(nn)?;
                    Ok(3)
                }
                Err(_) => self.illegal(),
            },
        }
    }

    /// `RET`, plain or conditional.
    pub(crate) fn op_ret(&mut self, opnd: &str) -> Result<usize> {
        if opnd.is_empty() {
            self.emit(RET)?;
            return Ok(1);
        }
        match opnd.parse::<Cond>() {
            Ok(cc) => {
                self.emit(ret_cc(cc))?;
                Ok(1)
            }
            Err(_) => self.illegal(),
        }
    }

    /// `DJNZ e`.
    pub(crate) fn op_djnz(&mut self, opnd: &str) -> Result<usize> {
        if opnd.is_empty() {
            return self.missing();
        }
        self.emit(DJNZ_E)?;
        let e = self.rel8(opnd);
        self.emit(e)?;
        Ok(2)
    }

    /// `RST p`, with `p` one of the eight restart addresses.
    pub(crate) fn op_rst(&mut self, opnd: &str) -> Result<usize> {
        let mut p = if self.pass == 2 { self.eval(opnd) } else { 0 };
        if p < 0 || p >> 3 > 7 || p & 7 != 0 {
            self.asmerr(AsmError::ValueOutOfRange);
            p = 0;
        }
        self.emit(rst(p as u8))?;
        Ok(1)
    }

    /// `IM 0`, `IM 1` or `IM 2`.
    pub(crate) fn op_im(&mut self, opnd: &str) -> Result<usize> {
        let mode = if self.pass == 2 { self.eval(opnd) } else { 0 };
        let byte = match mode {
            0 => 0x46,
            1 => 0x56,
            2 => 0x5e,
            _ => {
                self.asmerr(AsmError::IllegalOperand);
                0x46
            }
        };
        self.emit(PREFIX_EXT)?;
        self.emit(byte)?;
        Ok(2)
    }

    /// `IN A,(n)` and `IN r,(C)`.
    pub(crate) fn op_in(&mut self, opnd: &str) -> Result<usize> {
        let (dst, src) = match split2(opnd) {
            (d, Some(s)) => (d, s),
            _ => return self.missing(),
        };
        let bits = match dst.parse::<Reg>().ok().and_then(Reg::bits) {
            Some(bits) => bits,
            None => return self.illegal(),
        };
        if src == "(C)" {
            self.emit(PREFIX_EXT)?;
            self.emit(in_r_c(bits))?;
            return Ok(2);
        }
        match classify(src) {
            Opnd::Mem(t) if bits == 7 => {
                self.emit(0xdb)?;
                let n = self.imm8(t);
                self.emit(n)?;
                Ok(2)
            }
            _ => self.illegal(),
        }
    }

    /// `OUT (n),A` and `OUT (C),r`.
    pub(crate) fn op_out(&mut self, opnd: &str) -> Result<usize> {
        let (dst, src) = match split2(opnd) {
            (d, Some(s)) => (d, s),
            _ => return self.missing(),
        };
        if dst == "(C)" {
            match src.parse::<Reg>().ok().and_then(Reg::bits) {
                Some(bits) => {
                    self.emit(PREFIX_EXT)?;
                    self.emit(out_c_r(bits))?;
                    return Ok(2);
                }
                None => return self.illegal(),
            }
        }
        match (classify(dst), classify(src)) {
            (Opnd::Mem(t), Opnd::Reg(Reg::A)) => {
                self.emit(0xd3)?;
                let n = self.imm8(t);
                self.emit(n)?;
                Ok(2)
            }
            _ => self.illegal(),
        }
    }

    /// The `LD` matrix, dispatched on the destination class.
    pub(crate) fn op_ld(&mut self, opnd: &str) -> Result<usize> {
        let (dst, src) = match split2(opnd) {
            (d, Some(s)) => (d, s),
            _ => return self.missing(),
        };
        match classify(dst) {
            Opnd::Reg(Reg::I) => match classify(src) {
                Opnd::Reg(Reg::A) => self.op_2b(PREFIX_EXT, 0x47),
                _ => self.illegal(),
            },
            Opnd::Reg(Reg::R) => match classify(src) {
                Opnd::Reg(Reg::A) => self.op_2b(PREFIX_EXT, 0x4f),
                _ => self.illegal(),
            },
            Opnd::Reg(r) => self.ld_reg8(r, src),
            Opnd::Pair(idx @ Pair::IX) | Opnd::Pair(idx @ Pair::IY) => {
                match classify(src) {
                    Opnd::Mem(t) => {
                        self.emit(index_prefix(idx))?;
                        self.emit(0x2a)?;
                        let nn = self.imm16(t);
                        self.emit_word(nn)?;
                        Ok(4)
                    }
                    Opnd::Expr(t) => {
                        self.emit(index_prefix(idx))?;
                        self.emit(0x21)?;
                        let nn = self.imm16(t);
                        self.emit_word(nn)?;
                        Ok(4)
                    }
                    _ => self.illegal(),
                }
            }
            Opnd::Pair(Pair::AF) => self.illegal(),
            Opnd::Pair(p) => self.ld_pair(p, src),
            Opnd::IndHl => match classify(src) {
                Opnd::Reg(r) => match r.bits() {
                    Some(bits) => {
                        self.emit(ld_r_r(IND_HL, bits))?;
                        Ok(1)
                    }
                    None => self.illegal(),
                },
                Opnd::Mem(t) | Opnd::Expr(t) => {
                    self.emit(0x36)?;
                    let n = self.imm8(t);
                    self.emit(n)?;
                    Ok(2)
                }
                _ => self.illegal(),
            },
            Opnd::IndBc => match classify(src) {
                Opnd::Reg(Reg::A) => self.op_1b(0x02),
                _ => self.illegal(),
            },
            Opnd::IndDe => match classify(src) {
                Opnd::Reg(Reg::A) => self.op_1b(0x12),
                _ => self.illegal(),
            },
            Opnd::IndIx(d) => self.ld_index(PREFIX_IX, d, src),
            Opnd::IndIy(d) => self.ld_index(PREFIX_IY, d, src),
            Opnd::Mem(t) => self.ld_mem(t, src),
            _ => self.illegal(),
        }
    }

    /// `LD r,...` with an 8-bit destination register.
    fn ld_reg8(&mut self, r: Reg, src: &str) -> Result<usize> {
        let dst = match r.bits() {
            Some(bits) => bits,
            None => return self.illegal(),
        };
        match classify(src) {
            Opnd::Reg(Reg::I) if r == Reg::A => self.op_2b(PREFIX_EXT, 0x57),
            Opnd::Reg(Reg::R) if r == Reg::A => self.op_2b(PREFIX_EXT, 0x5f),
            Opnd::Reg(s) => match s.bits() {
                Some(bits) => {
                    self.emit(ld_r_r(dst, bits))?;
                    Ok(1)
                }
                None => self.illegal(),
            },
            Opnd::IndHl => {
                self.emit(ld_r_r(dst, IND_HL))?;
                Ok(1)
            }
            Opnd::IndBc if r == Reg::A => self.op_1b(0x0a),
            Opnd::IndDe if r == Reg::A => self.op_1b(0x1a),
            Opnd::IndIx(d) => {
                self.emit(PREFIX_IX)?;
                self.emit(ld_r_r(dst, IND_HL))?;
                let d = self.disp8(d);
                self.emit(d)?;
                Ok(3)
            }
            Opnd::IndIy(d) => {
                self.emit(PREFIX_IY)?;
                self.emit(ld_r_r(dst, IND_HL))?;
                let d = self.disp8(d);
                self.emit(d)?;
                Ok(3)
            }
            Opnd::Mem(t) if r == Reg::A => {
                self.emit(0x3a)?;
                let nn = self.imm16(t);
                self.emit_word(nn)?;
                Ok(3)
            }
            Opnd::Expr(t) => {
                self.emit(ld_r_n(dst))?;
                let n = self.imm8(t);
                self.emit(n)?;
                Ok(2)
            }
            Opnd::None => self.missing(),
            _ => self.illegal(),
        }
    }

    /// `LD dd,...` with BC, DE, HL or SP as destination.
    fn ld_pair(&mut self, p: Pair, src: &str) -> Result<usize> {
        let dd = p.dd().unwrap();
        match classify(src) {
            Opnd::Mem(t) => {
                let nn = self.imm16(t);
                match p {
                    Pair::HL => {
                        self.emit(0x2a)?;
                        self.emit_word(nn)?;
                        Ok(3)
                    }
                    _ => {
                        self.emit(PREFIX_EXT)?;
                        self.emit(0x4b | dd << PAIR_SHIFT)?;
                        self.emit_word(nn)?;
                        Ok(4)
                    }
                }
            }
            Opnd::Expr(t) => {
                self.emit(ld_dd_nn(dd))?;
                let nn = self.imm16(t);
                self.emit_word(nn)?;
                Ok(3)
            }
            Opnd::Pair(Pair::HL) if p == Pair::SP => self.op_1b(0xf9),
            Opnd::Pair(idx @ Pair::IX) | Opnd::Pair(idx @ Pair::IY)
                if p == Pair::SP =>
            {
                self.emit(index_prefix(idx))?;
                self.emit(0xf9)?;
                Ok(2)
            }
            Opnd::None => self.missing(),
            _ => self.illegal(),
        }
    }

    /// `LD (IX±d),...` / `LD (IY±d),...`.
    fn ld_index(&mut self, prefix: u8, d: &str, src: &str) -> Result<usize> {
        match classify(src) {
            Opnd::Reg(r) => match r.bits() {
                Some(bits) => {
                    self.emit(prefix)?;
                    self.emit(ld_r_r(IND_HL, bits))?;
                    let d = self.disp8(d);
                    self.emit(d)?;
                    Ok(3)
                }
                None => self.illegal(),
            },
            Opnd::Mem(t) | Opnd::Expr(t) => {
                self.emit(prefix)?;
                self.emit(0x36)?;
                let d = self.disp8(d);
                self.emit(d)?;
                let n = self.imm8(t);
                self.emit(n)?;
                Ok(4)
            }
            Opnd::None => self.missing(),
            _ => self.illegal(),
        }
    }

    /// `LD (nn),...`.
    fn ld_mem(&mut self, t: &str, src: &str) -> Result<usize> {
        let nn = self.imm16(t);
        match classify(src) {
            Opnd::Reg(Reg::A) => {
                self.emit(0x32)?;
                self.emit_word(nn)?;
                Ok(3)
            }
            Opnd::Pair(Pair::HL) => {
                self.emit(0x22)?;
                self.emit_word(nn)?;
                Ok(3)
            }
            Opnd::Pair(idx @ Pair::IX) | Opnd::Pair(idx @ Pair::IY) => {
                self.emit(index_prefix(idx))?;
                self.emit(0x22)?;
                self.emit_word(nn)?;
                Ok(4)
            }
            Opnd::Pair(p) => match p.dd() {
                Some(dd) => {
                    self.emit(PREFIX_EXT)?;
                    self.emit(0x43 | dd << PAIR_SHIFT)?;
                    self.emit_word(nn)?;
                    Ok(4)
                }
                None => self.illegal(),
            },
            Opnd::None => self.missing(),
            _ => self.illegal(),
        }
    }
}

impl<'a> Opnd<'a> {
    /// `dd` field of a plain register pair, if this is one.
    fn pair_dd(self) -> Option<u8> {
        match self {
            Opnd::Pair(p) => p.dd(),
            _ => None,
        }
    }
}

fn index_prefix(idx: Pair) -> u8 {
    match idx {
        Pair::IY => PREFIX_IY,
        _ => PREFIX_IX,
    }
}
