use crate::pseudo::{CondOp, MiscOp};
use z80::{AluOp, BitGrp, RotOp};

/// Encoder selection for one opcode-table entry. Reused encoders carry
/// their parameters in the variant: `One` holds the opcode byte, `Two` an
/// ED-prefixed pair, the group variants their operation code.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OpKind {
    One(u8),
    Two(u8, u8),
    Alu(AluOp),
    Add,
    Adc,
    Sbc,
    Inc,
    Dec,
    Ld,
    Ex,
    Push,
    Pop,
    Jp,
    Jr,
    Call,
    Ret,
    Djnz,
    Rst,
    In,
    Out,
    Im,
    Rot(RotOp),
    Bits(BitGrp),
    Org,
    Equ,
    Defl,
    Defs,
    Defb,
    Defm,
    Defw,
    Misc(MiscOp),
    Cond(CondOp),
    Glob,
}

/// Opcode-table entry: mnemonic and its encoder.
#[derive(Debug)]
pub struct Opc {
    pub name: &'static str,
    pub kind: OpKind,
}

const fn opc(name: &'static str, kind: OpKind) -> Opc {
    Opc { name, kind }
}

/// All Z80 mnemonics and pseudo operations except `END`, which the driver
/// matches itself. Sorted ascending by name for binary search.
pub static OPCTAB: [Opc; 89] = [
    opc("ADC", OpKind::Adc),
    opc("ADD", OpKind::Add),
    opc("AND", OpKind::Alu(AluOp::AND)),
    opc("BIT", OpKind::Bits(BitGrp::BIT)),
    opc("CALL", OpKind::Call),
    opc("CCF", OpKind::One(0x3f)),
    opc("CP", OpKind::Alu(AluOp::CP)),
    opc("CPD", OpKind::Two(0xed, 0xa9)),
    opc("CPDR", OpKind::Two(0xed, 0xb9)),
    opc("CPI", OpKind::Two(0xed, 0xa1)),
    opc("CPIR", OpKind::Two(0xed, 0xb1)),
    opc("CPL", OpKind::One(0x2f)),
    opc("DAA", OpKind::One(0x27)),
    opc("DEC", OpKind::Dec),
    opc("DEFB", OpKind::Defb),
    opc("DEFL", OpKind::Defl),
    opc("DEFM", OpKind::Defm),
    opc("DEFS", OpKind::Defs),
    opc("DEFW", OpKind::Defw),
    opc("DI", OpKind::One(0xf3)),
    opc("DJNZ", OpKind::Djnz),
    opc("EI", OpKind::One(0xfb)),
    opc("EJECT", OpKind::Misc(MiscOp::Eject)),
    opc("ELSE", OpKind::Cond(CondOp::Else)),
    opc("ENDIF", OpKind::Cond(CondOp::Endif)),
    opc("EQU", OpKind::Equ),
    opc("EX", OpKind::Ex),
    opc("EXTRN", OpKind::Glob),
    opc("EXX", OpKind::One(0xd9)),
    opc("HALT", OpKind::One(0x76)),
    opc("IFDEF", OpKind::Cond(CondOp::IfDef)),
    opc("IFEQ", OpKind::Cond(CondOp::IfEq)),
    opc("IFNDEF", OpKind::Cond(CondOp::IfNdef)),
    opc("IFNEQ", OpKind::Cond(CondOp::IfNeq)),
    opc("IM", OpKind::Im),
    opc("IN", OpKind::In),
    opc("INC", OpKind::Inc),
    opc("INCLUDE", OpKind::Misc(MiscOp::Include)),
    opc("IND", OpKind::Two(0xed, 0xaa)),
    opc("INDR", OpKind::Two(0xed, 0xba)),
    opc("INI", OpKind::Two(0xed, 0xa2)),
    opc("INIR", OpKind::Two(0xed, 0xb2)),
    opc("JP", OpKind::Jp),
    opc("JR", OpKind::Jr),
    opc("LD", OpKind::Ld),
    opc("LDD", OpKind::Two(0xed, 0xa8)),
    opc("LDDR", OpKind::Two(0xed, 0xb8)),
    opc("LDI", OpKind::Two(0xed, 0xa0)),
    opc("LDIR", OpKind::Two(0xed, 0xb0)),
    opc("LIST", OpKind::Misc(MiscOp::List)),
    opc("NEG", OpKind::Two(0xed, 0x44)),
    opc("NOLIST", OpKind::Misc(MiscOp::Nolist)),
    opc("NOP", OpKind::One(0x00)),
    opc("OR", OpKind::Alu(AluOp::OR)),
    opc("ORG", OpKind::Org),
    opc("OTDR", OpKind::Two(0xed, 0xbb)),
    opc("OTIR", OpKind::Two(0xed, 0xb3)),
    opc("OUT", OpKind::Out),
    opc("OUTD", OpKind::Two(0xed, 0xab)),
    opc("OUTI", OpKind::Two(0xed, 0xa3)),
    opc("PAGE", OpKind::Misc(MiscOp::Page)),
    opc("POP", OpKind::Pop),
    opc("PRINT", OpKind::Misc(MiscOp::Print)),
    opc("PUBLIC", OpKind::Glob),
    opc("PUSH", OpKind::Push),
    opc("RES", OpKind::Bits(BitGrp::RES)),
    opc("RET", OpKind::Ret),
    opc("RETI", OpKind::Two(0xed, 0x4d)),
    opc("RETN", OpKind::Two(0xed, 0x45)),
    opc("RL", OpKind::Rot(RotOp::RL)),
    opc("RLA", OpKind::One(0x17)),
    opc("RLC", OpKind::Rot(RotOp::RLC)),
    opc("RLCA", OpKind::One(0x07)),
    opc("RLD", OpKind::Two(0xed, 0x6f)),
    opc("RR", OpKind::Rot(RotOp::RR)),
    opc("RRA", OpKind::One(0x1f)),
    opc("RRC", OpKind::Rot(RotOp::RRC)),
    opc("RRCA", OpKind::One(0x0f)),
    opc("RRD", OpKind::Two(0xed, 0x67)),
    opc("RST", OpKind::Rst),
    opc("SBC", OpKind::Sbc),
    opc("SCF", OpKind::One(0x37)),
    opc("SET", OpKind::Bits(BitGrp::SET)),
    opc("SLA", OpKind::Rot(RotOp::SLA)),
    opc("SRA", OpKind::Rot(RotOp::SRA)),
    opc("SRL", OpKind::Rot(RotOp::SRL)),
    opc("SUB", OpKind::Alu(AluOp::SUB)),
    opc("TITLE", OpKind::Misc(MiscOp::Title)),
    opc("XOR", OpKind::Alu(AluOp::XOR)),
];

/// Binary search over the sorted mnemonic table.
pub fn search_op(name: &str) -> Option<&'static Opc> {
    OPCTAB
        .binary_search_by(|o| o.name.cmp(name))
        .ok()
        .map(|i| &OPCTAB[i])
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn table_is_sorted() {
        for pair in OPCTAB.windows(2) {
            assert!(
                pair[0].name < pair[1].name,
                "{} must sort before {}",
                pair[0].name,
                pair[1].name
            );
        }
    }

    #[test]
    fn search_finds_every_entry() {
        for entry in OPCTAB.iter() {
            let found = search_op(entry.name).unwrap();
            assert_eq!(found.name, entry.name);
        }
    }

    #[test]
    fn search_misses() {
        assert!(search_op("MOV").is_none());
        assert!(search_op("END").is_none());
        assert!(search_op("").is_none());
    }
}
