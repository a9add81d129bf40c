use crate::constants;
use num::traits::ToPrimitive;
use num_derive::{FromPrimitive, ToPrimitive};
use util::EnumFromStr;
use util_derive::EnumFromStr;

/// 8-bit registers. The discriminants of `B` through `A` are the three-bit
/// codes embedded in instruction bytes; 6 is skipped because it encodes the
/// memory operand `(HL)`. `I` and `R` have no operand-field code and only
/// appear in the dedicated `LD` forms.
#[derive(
    Clone, Copy, PartialEq, Eq, Debug, ToPrimitive, FromPrimitive, EnumFromStr,
)]
pub enum Reg {
    B = 0,
    C = 1,
    D = 2,
    E = 3,
    H = 4,
    L = 5,
    A = 7,
    I = 8,
    R = 9,
}

impl Reg {
    /// Three-bit operand field code; `None` for `I` and `R`.
    pub fn bits(self) -> Option<u8> {
        match self {
            Reg::I | Reg::R => None,
            r => Some(enum_code(r)),
        }
    }
}

/// Register pairs and 16-bit registers.
#[derive(
    Clone, Copy, PartialEq, Eq, Debug, ToPrimitive, FromPrimitive, EnumFromStr,
)]
pub enum Pair {
    BC = 0,
    DE = 1,
    HL = 2,
    SP = 3,
    AF = 4,
    IX = 5,
    IY = 6,
}

impl Pair {
    /// `dd` field code (16-bit arithmetic and loads): BC, DE, HL, SP.
    pub fn dd(self) -> Option<u8> {
        match self {
            Pair::AF | Pair::IX | Pair::IY => None,
            p => Some(enum_code(p)),
        }
    }

    /// `qq` field code (PUSH and POP): BC, DE, HL, AF.
    pub fn qq(self) -> Option<u8> {
        match self {
            Pair::BC | Pair::DE | Pair::HL => Some(enum_code(self)),
            Pair::AF => Some(3),
            _ => None,
        }
    }
}

/// Jump conditions with their three-bit codes. `C` doubles as the carry
/// condition and the register name; context decides which one is meant.
#[derive(
    Clone, Copy, PartialEq, Eq, Debug, ToPrimitive, FromPrimitive, EnumFromStr,
)]
pub enum Cond {
    NZ = 0,
    Z = 1,
    NC = 2,
    C = 3,
    PO = 4,
    PE = 5,
    P = 6,
    M = 7,
}

impl Cond {
    /// `JR` only supports NZ, Z, NC and C.
    pub fn relative(self) -> bool {
        enum_code(self) < 4
    }
}

/// ALU operations in operation-field order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ToPrimitive, FromPrimitive)]
pub enum AluOp {
    ADD = 0,
    ADC = 1,
    SUB = 2,
    SBC = 3,
    AND = 4,
    XOR = 5,
    OR = 6,
    CP = 7,
}

/// Rotate and shift operations of the CB group, in operation-field order.
/// Code 6 is the undocumented SLL and deliberately missing.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ToPrimitive, FromPrimitive)]
pub enum RotOp {
    RLC = 0,
    RRC = 1,
    RL = 2,
    RR = 3,
    SLA = 4,
    SRA = 5,
    SRL = 7,
}

/// Bit test/reset/set group selectors (bits 7..6 of the CB opcode).
#[derive(Clone, Copy, PartialEq, Eq, Debug, ToPrimitive, FromPrimitive)]
pub enum BitGrp {
    BIT = 1,
    RES = 2,
    SET = 3,
}

macro_rules! impl_enum_display {
    ($e:ty) => {
        impl std::fmt::Display for $e {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                std::fmt::Debug::fmt(self, f)
            }
        }
    };
}

impl_enum_display!(Reg);
impl_enum_display!(Pair);
impl_enum_display!(Cond);
impl_enum_display!(AluOp);

/// Narrow an enum to its encoding field value.
#[inline]
pub fn enum_code<T: ToPrimitive + Copy>(val: T) -> u8 {
    val.to_u8().unwrap()
}

/// `LD r,r'`; also covers `(HL)` on either side via [`IND_HL`](constants::IND_HL).
#[inline]
pub fn ld_r_r(dst: u8, src: u8) -> u8 {
    constants::LD_R_R | dst << constants::DST_SHIFT | src
}

/// `LD r,n` opcode byte (immediate follows).
#[inline]
pub fn ld_r_n(dst: u8) -> u8 {
    constants::LD_R_N | dst << constants::DST_SHIFT
}

/// `LD dd,nn` opcode byte (word follows).
#[inline]
pub fn ld_dd_nn(dd: u8) -> u8 {
    constants::LD_DD_NN | dd << constants::PAIR_SHIFT
}

/// Register-source ALU operation.
#[inline]
pub fn alu_r(op: AluOp, src: u8) -> u8 {
    constants::ALU_R | enum_code(op) << constants::OP_SHIFT | src
}

/// Immediate-source ALU operation opcode byte.
#[inline]
pub fn alu_n(op: AluOp) -> u8 {
    constants::ALU_N | enum_code(op) << constants::OP_SHIFT
}

/// `INC r`.
#[inline]
pub fn inc_r(dst: u8) -> u8 {
    constants::INC_R | dst << constants::DST_SHIFT
}

/// `DEC r`.
#[inline]
pub fn dec_r(dst: u8) -> u8 {
    constants::DEC_R | dst << constants::DST_SHIFT
}

/// `INC ss`.
#[inline]
pub fn inc_ss(ss: u8) -> u8 {
    constants::INC_SS | ss << constants::PAIR_SHIFT
}

/// `DEC ss`.
#[inline]
pub fn dec_ss(ss: u8) -> u8 {
    constants::DEC_SS | ss << constants::PAIR_SHIFT
}

/// `ADD HL,ss` (and the prefixed `ADD IX/IY,pp` second byte).
#[inline]
pub fn add_hl_ss(ss: u8) -> u8 {
    constants::ADD_HL_SS | ss << constants::PAIR_SHIFT
}

/// `ADC HL,ss` second byte (ED-prefixed).
#[inline]
pub fn adc_hl_ss(ss: u8) -> u8 {
    constants::ADC_HL_SS | ss << constants::PAIR_SHIFT
}

/// `SBC HL,ss` second byte (ED-prefixed).
#[inline]
pub fn sbc_hl_ss(ss: u8) -> u8 {
    constants::SBC_HL_SS | ss << constants::PAIR_SHIFT
}

/// `PUSH qq`.
#[inline]
pub fn push_qq(qq: u8) -> u8 {
    constants::PUSH_QQ | qq << constants::PAIR_SHIFT
}

/// `POP qq`.
#[inline]
pub fn pop_qq(qq: u8) -> u8 {
    constants::POP_QQ | qq << constants::PAIR_SHIFT
}

/// Rotate/shift byte of the CB group.
#[inline]
pub fn rot_m(op: RotOp, m: u8) -> u8 {
    enum_code(op) << constants::OP_SHIFT | m
}

/// BIT/RES/SET byte of the CB group.
#[inline]
pub fn bit_m(grp: BitGrp, bit: u8, m: u8) -> u8 {
    enum_code(grp) << 6 | bit << constants::BIT_SHIFT | m
}

/// `RET cc`.
#[inline]
pub fn ret_cc(cond: Cond) -> u8 {
    constants::RET_CC | enum_code(cond) << constants::COND_SHIFT
}

/// `JP cc,nn` opcode byte.
#[inline]
pub fn jp_cc(cond: Cond) -> u8 {
    constants::JP_CC | enum_code(cond) << constants::COND_SHIFT
}

/// `CALL cc,nn` opcode byte.
#[inline]
pub fn call_cc(cond: Cond) -> u8 {
    constants::CALL_CC | enum_code(cond) << constants::COND_SHIFT
}

/// `JR cc,e` opcode byte; the caller checks [`Cond::relative`].
#[inline]
pub fn jr_cc(cond: Cond) -> u8 {
    constants::JR_CC | enum_code(cond) << constants::COND_SHIFT
}

/// `RST p` for `p` in `{0, 8, 10H, .., 38H}`.
#[inline]
pub fn rst(p: u8) -> u8 {
    constants::RST | p
}

/// `IN r,(C)` second byte (ED-prefixed).
#[inline]
pub fn in_r_c(dst: u8) -> u8 {
    constants::IN_R_C | dst << constants::DST_SHIFT
}

/// `OUT (C),r` second byte (ED-prefixed).
#[inline]
pub fn out_c_r(src: u8) -> u8 {
    constants::OUT_C_R | src << constants::DST_SHIFT
}
