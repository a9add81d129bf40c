//! Opcode bases, prefixes and field positions of the Z80 encoding.
//!
//! Instruction Layouts
//!
//! ```text
//!          +---+---+---+---+---+---+---+---+
//!          | 7   6 | 5   4   3 | 2   1   0 |
//!          +---+---+---+---+---+---+---+---+
//! LD r,r'  | 0   1 |    dst    |    src    |
//! ALU op   | 1   0 |    op     |    src    |
//! INC/DEC  | 0   0 |    dst    |  1 0 0/1  |
//! 16-bit   |  base high bits, pair in 5..4 |
//! JP cc    | 1   1 |   cond    | 0   1   0 |
//! RST p    | 1   1 |   p>>3    | 1   1   1 |
//!          +---+---+---+---+---+---+---+---+
//! ```

/// Prefix selecting IX-based addressing.
pub const PREFIX_IX: u8 = 0xdd;
/// Prefix selecting IY-based addressing.
pub const PREFIX_IY: u8 = 0xfd;
/// Prefix of the rotate/shift/bit group.
pub const PREFIX_BIT: u8 = 0xcb;
/// Prefix of the extended (ED) group.
pub const PREFIX_EXT: u8 = 0xed;

/// Register-field code of the memory operand `(HL)`.
pub const IND_HL: u8 = 6;

/// Destination register field position (bits 5..3).
pub const DST_SHIFT: u8 = 3;
/// Condition code field position (bits 5..3).
pub const COND_SHIFT: u8 = 3;
/// Register pair field position (bits 5..4).
pub const PAIR_SHIFT: u8 = 4;
/// ALU operation field position (bits 5..3).
pub const OP_SHIFT: u8 = 3;
/// Bit number field position in the CB group (bits 5..3).
pub const BIT_SHIFT: u8 = 3;

/// `LD r,r'` base.
pub const LD_R_R: u8 = 0x40;
/// `LD r,n` base.
pub const LD_R_N: u8 = 0x06;
/// `LD dd,nn` base.
pub const LD_DD_NN: u8 = 0x01;
/// Register ALU operation base (`ADD A,r` .. `CP r`).
pub const ALU_R: u8 = 0x80;
/// Immediate ALU operation base (`ADD A,n` .. `CP n`).
pub const ALU_N: u8 = 0xc6;
/// `INC r` base.
pub const INC_R: u8 = 0x04;
/// `DEC r` base.
pub const DEC_R: u8 = 0x05;
/// `INC ss` base.
pub const INC_SS: u8 = 0x03;
/// `DEC ss` base.
pub const DEC_SS: u8 = 0x0b;
/// `ADD HL,ss` base.
pub const ADD_HL_SS: u8 = 0x09;
/// `ADC HL,ss` base, after the ED prefix.
pub const ADC_HL_SS: u8 = 0x4a;
/// `SBC HL,ss` base, after the ED prefix.
pub const SBC_HL_SS: u8 = 0x42;
/// `PUSH qq` base.
pub const PUSH_QQ: u8 = 0xc5;
/// `POP qq` base.
pub const POP_QQ: u8 = 0xc1;
/// `RET cc` base.
pub const RET_CC: u8 = 0xc0;
/// `JP cc,nn` base.
pub const JP_CC: u8 = 0xc2;
/// `CALL cc,nn` base.
pub const CALL_CC: u8 = 0xc4;
/// `JR cc,e` base; only the first four condition codes exist here.
pub const JR_CC: u8 = 0x20;
/// `RST p` base.
pub const RST: u8 = 0xc7;
/// `IN r,(C)` base, after the ED prefix.
pub const IN_R_C: u8 = 0x40;
/// `OUT (C),r` base, after the ED prefix.
pub const OUT_C_R: u8 = 0x41;

/// `JP nn`.
pub const JP_NN: u8 = 0xc3;
/// `JR e`.
pub const JR_E: u8 = 0x18;
/// `CALL nn`.
pub const CALL_NN: u8 = 0xcd;
/// `DJNZ e`.
pub const DJNZ_E: u8 = 0x10;
/// `RET`.
pub const RET: u8 = 0xc9;
