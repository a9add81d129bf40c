use crate::driver::Asm;
use crate::encode::{classify, Opnd};
use matches::assert_matches;
use objfile::{Format, ObjWriter};
use std::io::Cursor;
use z80::{Pair, Reg};


pub fn asm(format: Format) -> Asm<Vec<u8>> {
    Asm::new(ObjWriter::new(format, Vec::new()))
}

/// Run both passes over an in-memory source, as the file driver would.
pub fn assemble_with<F>(
    source: &str,
    format: Format,
    defines: &[&str],
    configure: F,
) -> (Vec<u8>, usize)
where
    F: FnOnce(&mut Asm<Vec<u8>>),
{
    let mut a = asm(format);
    configure(&mut a);
    for d in defines {
        a.predefine(d);
    }
    pass_over(&mut a, 1, source);
    if a.errors == 0 {
        pass_over(&mut a, 2, source);
    }
    let errors = a.errors;
    let mut obj = a.into_object();
    obj.end().unwrap();
    (obj.into_inner(), errors)
}

pub fn assemble_source(
    source: &str,
    format: Format,
    defines: &[&str],
) -> (Vec<u8>, usize) {
    assemble_with(source, format, defines, |_| ())
}

pub fn pass_over(a: &mut Asm<Vec<u8>>, pass: u8, source: &str) {
    a.pass = pass;
    a.pc = 0;
    if pass == 2 {
        let start = a.start_addr();
        a.obj.header(start).unwrap();
    }
    a.read_source("test.asm", Cursor::new(source.as_bytes().to_vec()))
        .unwrap();
}

/// Encode a single line in pass-2 mode and return its object bytes.
fn enc_full(line: &str) -> (Vec<u8>, usize) {
    let mut a = asm(Format::Bin);
    pass_over(&mut a, 2, line);
    let errors = a.errors;
    let mut obj = a.into_object();
    obj.end().unwrap();
    (obj.into_inner(), errors)
}

fn enc(line: &str) -> Vec<u8> {
    let (bytes, errors) = enc_full(line);
    assert_eq!(errors, 0, "unexpected errors for {:?}", line);
    bytes
}

fn enc_err(line: &str) -> (Vec<u8>, usize) {
    let (bytes, errors) = enc_full(line);
    assert!(errors > 0, "expected errors for {:?}", line);
    (bytes, errors)
}

fn eval_str(s: &str) -> (i32, usize) {
    let mut a = asm(Format::Bin);
    a.pass = 2;
    let val = a.eval(s);
    (val, a.errors)
}

fn eval_ok(s: &str) -> i32 {
    let (val, errors) = eval_str(s);
    assert_eq!(errors, 0, "unexpected errors for {:?}", s);
    val
}

// ---- expression evaluator ----

#[test]
fn eval_right_associative_without_precedence() {
    assert_eq!(eval_ok("1+2*3"), 7);
    assert_eq!(eval_ok("2*3+1"), 8);
    assert_eq!(eval_ok("10/2-3"), -10);
    assert_eq!(eval_ok("8-2-1"), 7);
}

#[test]
fn eval_leading_operator_starts_from_zero() {
    assert_eq!(eval_ok("-5"), -5);
    assert_eq!(eval_ok("-5+3"), -8);
    assert_eq!(eval_ok("~0"), -1);
    assert_eq!(eval_ok("~1"), -2);
}

#[test]
fn eval_radix_suffixes() {
    assert_eq!(eval_ok("255"), 255);
    assert_eq!(eval_ok("0FFH"), 255);
    assert_eq!(eval_ok("0ABCDH"), 0xabcd);
    assert_eq!(eval_ok("377O"), 255);
    assert_eq!(eval_ok("11111111B"), 255);
    assert_eq!(eval_ok("0"), 0);
}

#[test]
fn eval_char_strings() {
    assert_eq!(eval_ok("'A'"), 0x41);
    assert_eq!(eval_ok("'AB'"), 0x4142);
    assert_eq!(eval_ok("''"), 0);
    assert_eq!(eval_ok("'A'+1"), 0x42);
}

#[test]
fn eval_parens_group() {
    assert_eq!(eval_ok("(1+2)*3"), 9);
    assert_eq!(eval_ok("((4))"), 4);
    assert_eq!(eval_ok("2*(3+1)"), 8);
}

#[test]
fn eval_logic_operators() {
    assert_eq!(eval_ok("12&10"), 8);
    assert_eq!(eval_ok("12|3"), 15);
    assert_eq!(eval_ok("12^10"), 6);
    assert_eq!(eval_ok("1<4"), 16);
    assert_eq!(eval_ok("16>2"), 4);
    assert_eq!(eval_ok("7%3"), 1);
}

#[test]
fn eval_symbols_and_location() {
    let mut a = asm(Format::Bin);
    a.pass = 2;
    a.pc = 0x123;
    a.symtab.insert("START", 0x100);
    assert_eq!(a.eval("$"), 0x123);
    assert_eq!(a.eval("START+2"), 0x102);
    // names are significant to eight characters
    a.symtab.insert("LONGNAME", 7);
    assert_eq!(a.eval("LONGNAMETOOLONG"), 7);
    assert_eq!(a.errors, 0);
}

#[test]
fn eval_undefined_symbol_is_zero_with_error() {
    let (val, errors) = eval_str("NOWHERE");
    assert_eq!(val, 0);
    assert_eq!(errors, 1);
}

#[test]
fn eval_unterminated_string() {
    let (val, errors) = eval_str("'AB");
    assert_eq!(val, 0);
    assert_eq!(errors, 1);
}

#[test]
fn eval_missing_paren() {
    let (val, errors) = eval_str("(1+2");
    assert_eq!(val, 0);
    assert_eq!(errors, 1);
}

#[test]
fn eval_empty_is_zero() {
    assert_eq!(eval_ok(""), 0);
}

#[test]
fn check_ranges() {
    let mut a = asm(Format::Bin);
    a.pass = 2;
    assert_eq!(a.chk_v1(255), 255);
    assert_eq!(a.chk_v1(-255), -255);
    assert_eq!(a.chk_v2(127), 127);
    assert_eq!(a.chk_v2(-127), -127);
    assert_eq!(a.errors, 0);
    assert_eq!(a.chk_v1(256), 0);
    assert_eq!(a.chk_v2(-128), 0);
    assert_eq!(a.errors, 2);
}

// ---- operand classification ----

#[test]
fn classify_operands() {
    assert_matches!(classify("A"), Opnd::Reg(Reg::A));
    assert_matches!(classify("I"), Opnd::Reg(Reg::I));
    assert_matches!(classify("HL"), Opnd::Pair(Pair::HL));
    assert_matches!(classify("AF"), Opnd::Pair(Pair::AF));
    assert_matches!(classify("(HL)"), Opnd::IndHl);
    assert_matches!(classify("(SP)"), Opnd::IndSp);
    assert_matches!(classify("(IX+5)"), Opnd::IndIx("+5"));
    assert_matches!(classify("(IY-1)"), Opnd::IndIy("-1"));
    assert_matches!(classify("(IX)"), Opnd::IndIx(""));
    assert_matches!(classify("(100H)"), Opnd::Mem("(100H)"));
    assert_matches!(classify("5+3"), Opnd::Expr("5+3"));
    assert_matches!(classify(""), Opnd::None);
}

// ---- encoders ----

#[test]
fn encode_single_byte_ops() {
    assert_eq!(enc(" NOP"), [0x00]);
    assert_eq!(enc(" HALT"), [0x76]);
    assert_eq!(enc(" EXX"), [0xd9]);
    assert_eq!(enc(" CCF"), [0x3f]);
    assert_eq!(enc(" RLA"), [0x17]);
}

#[test]
fn encode_extended_ops() {
    assert_eq!(enc(" NEG"), [0xed, 0x44]);
    assert_eq!(enc(" LDIR"), [0xed, 0xb0]);
    assert_eq!(enc(" RETI"), [0xed, 0x4d]);
    assert_eq!(enc(" RRD"), [0xed, 0x67]);
}

#[test]
fn encode_ld_register_forms() {
    assert_eq!(enc(" LD A,B"), [0x78]);
    assert_eq!(enc(" LD B,A"), [0x47]);
    assert_eq!(enc(" LD C,0FFH"), [0x0e, 0xff]);
    assert_eq!(enc(" LD A,-1"), [0x3e, 0xff]);
    assert_eq!(enc(" LD A,(HL)"), [0x7e]);
    assert_eq!(enc(" LD (HL),A"), [0x77]);
    assert_eq!(enc(" LD (HL),42"), [0x36, 0x2a]);
}

#[test]
fn encode_ld_accumulator_forms() {
    assert_eq!(enc(" LD A,(BC)"), [0x0a]);
    assert_eq!(enc(" LD A,(DE)"), [0x1a]);
    assert_eq!(enc(" LD (BC),A"), [0x02]);
    assert_eq!(enc(" LD (DE),A"), [0x12]);
    assert_eq!(enc(" LD A,(1234H)"), [0x3a, 0x34, 0x12]);
    assert_eq!(enc(" LD (1234H),A"), [0x32, 0x34, 0x12]);
    assert_eq!(enc(" LD A,I"), [0xed, 0x57]);
    assert_eq!(enc(" LD A,R"), [0xed, 0x5f]);
    assert_eq!(enc(" LD I,A"), [0xed, 0x47]);
    assert_eq!(enc(" LD R,A"), [0xed, 0x4f]);
}

#[test]
fn encode_ld_pair_forms() {
    assert_eq!(enc(" LD HL,1234H"), [0x21, 0x34, 0x12]);
    assert_eq!(enc(" LD BC,5"), [0x01, 0x05, 0x00]);
    assert_eq!(enc(" LD SP,0"), [0x31, 0x00, 0x00]);
    assert_eq!(enc(" LD HL,(1234H)"), [0x2a, 0x34, 0x12]);
    assert_eq!(enc(" LD BC,(1234H)"), [0xed, 0x4b, 0x34, 0x12]);
    assert_eq!(enc(" LD SP,(1234H)"), [0xed, 0x7b, 0x34, 0x12]);
    assert_eq!(enc(" LD (1234H),HL"), [0x22, 0x34, 0x12]);
    assert_eq!(enc(" LD (1234H),BC"), [0xed, 0x43, 0x34, 0x12]);
    assert_eq!(enc(" LD (1234H),DE"), [0xed, 0x53, 0x34, 0x12]);
    assert_eq!(enc(" LD (1234H),SP"), [0xed, 0x73, 0x34, 0x12]);
    assert_eq!(enc(" LD SP,HL"), [0xf9]);
    assert_eq!(enc(" LD SP,IX"), [0xdd, 0xf9]);
}

#[test]
fn encode_ld_index_forms() {
    assert_eq!(enc(" LD IX,1234H"), [0xdd, 0x21, 0x34, 0x12]);
    assert_eq!(enc(" LD IY,(1234H)"), [0xfd, 0x2a, 0x34, 0x12]);
    assert_eq!(enc(" LD (1234H),IX"), [0xdd, 0x22, 0x34, 0x12]);
    assert_eq!(enc(" LD A,(IX+5)"), [0xdd, 0x7e, 0x05]);
    assert_eq!(enc(" LD H,(IX)"), [0xdd, 0x66, 0x00]);
    assert_eq!(enc(" LD (IY-2),B"), [0xfd, 0x70, 0xfe]);
    assert_eq!(enc(" LD (IX+1),7"), [0xdd, 0x36, 0x01, 0x07]);
}

#[test]
fn encode_alu_forms() {
    assert_eq!(enc(" ADD A,B"), [0x80]);
    assert_eq!(enc(" ADD A,0FFH"), [0xc6, 0xff]);
    assert_eq!(enc(" ADD A,(HL)"), [0x86]);
    assert_eq!(enc(" ADD A,(IX+3)"), [0xdd, 0x86, 0x03]);
    assert_eq!(enc(" ADC A,C"), [0x89]);
    assert_eq!(enc(" SBC A,D"), [0x9a]);
    assert_eq!(enc(" SUB L"), [0x95]);
    assert_eq!(enc(" SUB 5"), [0xd6, 0x05]);
    assert_eq!(enc(" AND A"), [0xa7]);
    assert_eq!(enc(" XOR A"), [0xaf]);
    assert_eq!(enc(" OR B"), [0xb0]);
    assert_eq!(enc(" CP (HL)"), [0xbe]);
    assert_eq!(enc(" CP 'Q'"), [0xfe, 0x51]);
}

#[test]
fn encode_16bit_arithmetic() {
    assert_eq!(enc(" ADD HL,BC"), [0x09]);
    assert_eq!(enc(" ADD HL,SP"), [0x39]);
    assert_eq!(enc(" ADD IX,DE"), [0xdd, 0x19]);
    assert_eq!(enc(" ADD IX,IX"), [0xdd, 0x29]);
    assert_eq!(enc(" ADD IY,SP"), [0xfd, 0x39]);
    assert_eq!(enc(" ADC HL,DE"), [0xed, 0x5a]);
    assert_eq!(enc(" SBC HL,BC"), [0xed, 0x42]);
}

#[test]
fn encode_inc_dec() {
    assert_eq!(enc(" INC A"), [0x3c]);
    assert_eq!(enc(" DEC E"), [0x1d]);
    assert_eq!(enc(" INC (HL)"), [0x34]);
    assert_eq!(enc(" INC BC"), [0x03]);
    assert_eq!(enc(" DEC SP"), [0x3b]);
    assert_eq!(enc(" INC IX"), [0xdd, 0x23]);
    assert_eq!(enc(" DEC IY"), [0xfd, 0x2b]);
    assert_eq!(enc(" INC (IX+1)"), [0xdd, 0x34, 0x01]);
    assert_eq!(enc(" DEC (IY-1)"), [0xfd, 0x35, 0xff]);
}

#[test]
fn encode_rotate_shift() {
    assert_eq!(enc(" RLC B"), [0xcb, 0x00]);
    assert_eq!(enc(" RL (HL)"), [0xcb, 0x16]);
    assert_eq!(enc(" RR C"), [0xcb, 0x19]);
    assert_eq!(enc(" SLA D"), [0xcb, 0x22]);
    assert_eq!(enc(" SRL A"), [0xcb, 0x3f]);
    assert_eq!(enc(" SRA (IX+2)"), [0xdd, 0xcb, 0x02, 0x2e]);
}

#[test]
fn encode_bit_group() {
    assert_eq!(enc(" BIT 7,A"), [0xcb, 0x7f]);
    assert_eq!(enc(" RES 0,B"), [0xcb, 0x80]);
    assert_eq!(enc(" SET 1,(HL)"), [0xcb, 0xce]);
    assert_eq!(enc(" BIT 3,(IX+4)"), [0xdd, 0xcb, 0x04, 0x5e]);
}

#[test]
fn encode_jumps_and_calls() {
    assert_eq!(enc(" JP 1234H"), [0xc3, 0x34, 0x12]);
    assert_eq!(enc(" JP NZ,5"), [0xc2, 0x05, 0x00]);
    assert_eq!(enc(" JP C,5"), [0xda, 0x05, 0x00]);
    assert_eq!(enc(" JP M,5"), [0xfa, 0x05, 0x00]);
    assert_eq!(enc(" JP (HL)"), [0xe9]);
    assert_eq!(enc(" JP (IX)"), [0xdd, 0xe9]);
    assert_eq!(enc(" CALL 5"), [0xcd, 0x05, 0x00]);
    assert_eq!(enc(" CALL PO,5"), [0xe4, 0x05, 0x00]);
    assert_eq!(enc(" RET"), [0xc9]);
    assert_eq!(enc(" RET Z"), [0xc8]);
    assert_eq!(enc(" RET NC"), [0xd0]);
    assert_eq!(enc(" JR $"), [0x18, 0xfe]);
    assert_eq!(enc(" JR NZ,$"), [0x20, 0xfe]);
    assert_eq!(enc(" DJNZ $"), [0x10, 0xfe]);
    assert_eq!(enc(" RST 38H"), [0xff]);
    assert_eq!(enc(" RST 8"), [0xcf]);
    assert_eq!(enc(" IM 1"), [0xed, 0x56]);
    assert_eq!(enc(" IM 2"), [0xed, 0x5e]);
}

#[test]
fn encode_stack_and_exchange() {
    assert_eq!(enc(" PUSH AF"), [0xf5]);
    assert_eq!(enc(" PUSH BC"), [0xc5]);
    assert_eq!(enc(" POP HL"), [0xe1]);
    assert_eq!(enc(" PUSH IX"), [0xdd, 0xe5]);
    assert_eq!(enc(" POP IY"), [0xfd, 0xe1]);
    assert_eq!(enc(" EX DE,HL"), [0xeb]);
    assert_eq!(enc(" EX AF,AF'"), [0x08]);
    assert_eq!(enc(" EX (SP),HL"), [0xe3]);
    assert_eq!(enc(" EX (SP),IX"), [0xdd, 0xe3]);
}

#[test]
fn encode_io() {
    assert_eq!(enc(" IN A,(0FEH)"), [0xdb, 0xfe]);
    assert_eq!(enc(" IN C,(C)"), [0xed, 0x48]);
    assert_eq!(enc(" OUT (0FEH),A"), [0xd3, 0xfe]);
    assert_eq!(enc(" OUT (C),H"), [0xed, 0x61]);
}

#[test]
fn encode_rejects_bad_operands() {
    enc_err(" LD Q,B");
    enc_err(" PUSH SP");
    enc_err(" POP DE,HL");
    enc_err(" JR PO,5");
    enc_err(" RET X");
    enc_err(" IM 3");
    enc_err(" RST 7");
    enc_err(" ADD HL,AF");
    enc_err(" EX HL,DE");
    enc_err(" ADD A");
}

#[test]
fn bad_operands_emit_nothing() {
    let (bytes, _) = enc_err(" LD Q,B");
    assert!(bytes.is_empty());
}
