use super::*;
use num::traits::FromPrimitive;

#[test]
fn register_codes() {
    assert_eq!(enum_code(Reg::B), 0);
    assert_eq!(enum_code(Reg::C), 1);
    assert_eq!(enum_code(Reg::D), 2);
    assert_eq!(enum_code(Reg::E), 3);
    assert_eq!(enum_code(Reg::H), 4);
    assert_eq!(enum_code(Reg::L), 5);
    assert_eq!(enum_code(Reg::A), 7);
    assert_eq!(Reg::from_u8(7), Some(Reg::A));
    assert_eq!(Reg::from_u8(6), None);
    assert_eq!(Reg::A.bits(), Some(7));
    assert_eq!(Reg::I.bits(), None);
    assert_eq!(Reg::R.bits(), None);
}

#[test]
fn register_names() {
    assert_eq!("A".parse(), Ok(Reg::A));
    assert_eq!("l".parse(), Ok(Reg::L));
    assert_eq!("hl".parse(), Ok(Pair::HL));
    assert_eq!("IY".parse(), Ok(Pair::IY));
    assert!("Q".parse::<Reg>().is_err());
    assert!("(HL)".parse::<Reg>().is_err());
}

#[test]
fn condition_codes() {
    assert_eq!(enum_code(Cond::NZ), 0);
    assert_eq!(enum_code(Cond::C), 3);
    assert_eq!(enum_code(Cond::M), 7);
    assert!(Cond::C.relative());
    assert!(!Cond::PO.relative());
    assert_eq!("PE".parse(), Ok(Cond::PE));
}

#[test]
fn pair_fields() {
    assert_eq!(Pair::BC.dd(), Some(0));
    assert_eq!(Pair::SP.dd(), Some(3));
    assert_eq!(Pair::AF.dd(), None);
    assert_eq!(Pair::AF.qq(), Some(3));
    assert_eq!(Pair::SP.qq(), None);
    assert_eq!(Pair::IX.dd(), None);
}

#[test]
fn load_bytes() {
    // LD A,B / LD B,A / LD A,(HL)
    assert_eq!(ld_r_r(7, 0), 0x78);
    assert_eq!(ld_r_r(0, 7), 0x47);
    assert_eq!(ld_r_r(7, IND_HL), 0x7e);
    // LD E,n / LD HL,nn
    assert_eq!(ld_r_n(3), 0x1e);
    assert_eq!(ld_dd_nn(Pair::HL.dd().unwrap()), 0x21);
}

#[test]
fn alu_bytes() {
    assert_eq!(alu_r(AluOp::ADD, 0), 0x80);
    assert_eq!(alu_r(AluOp::SUB, 7), 0x97);
    assert_eq!(alu_r(AluOp::CP, IND_HL), 0xbe);
    assert_eq!(alu_n(AluOp::ADD), 0xc6);
    assert_eq!(alu_n(AluOp::XOR), 0xee);
}

#[test]
fn inc_dec_bytes() {
    assert_eq!(inc_r(7), 0x3c);
    assert_eq!(dec_r(IND_HL), 0x35);
    assert_eq!(inc_ss(0), 0x03);
    assert_eq!(dec_ss(2), 0x2b);
    assert_eq!(add_hl_ss(1), 0x19);
    assert_eq!(adc_hl_ss(2), 0x6a);
    assert_eq!(sbc_hl_ss(0), 0x42);
}

#[test]
fn stack_bytes() {
    assert_eq!(push_qq(Pair::BC.qq().unwrap()), 0xc5);
    assert_eq!(push_qq(Pair::AF.qq().unwrap()), 0xf5);
    assert_eq!(pop_qq(Pair::HL.qq().unwrap()), 0xe1);
}

#[test]
fn cb_group_bytes() {
    assert_eq!(rot_m(RotOp::RLC, 0), 0x00);
    assert_eq!(rot_m(RotOp::RL, 7), 0x17);
    assert_eq!(rot_m(RotOp::SRL, IND_HL), 0x3e);
    assert_eq!(bit_m(BitGrp::BIT, 7, 7), 0x7f);
    assert_eq!(bit_m(BitGrp::RES, 0, 0), 0x80);
    assert_eq!(bit_m(BitGrp::SET, 3, IND_HL), 0xde);
}

#[test]
fn jump_bytes() {
    assert_eq!(ret_cc(Cond::NZ), 0xc0);
    assert_eq!(ret_cc(Cond::M), 0xf8);
    assert_eq!(jp_cc(Cond::C), 0xda);
    assert_eq!(call_cc(Cond::Z), 0xcc);
    assert_eq!(jr_cc(Cond::NC), 0x30);
    assert_eq!(rst(0x38), 0xff);
    assert_eq!(rst(0x00), 0xc7);
}

#[test]
fn io_bytes() {
    assert_eq!(in_r_c(7), 0x78);
    assert_eq!(out_c_r(1), 0x49);
}
