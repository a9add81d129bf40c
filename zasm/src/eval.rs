use crate::driver::Asm;
use crate::errors::AsmError;
use crate::parser::{Rule, ZasmParser};
use crate::scan::{sym_name, STRSEP};
use pest::iterators::Pair;
use pest::Parser;
use std::io::Write;

impl<W: Write> Asm<W> {
    /// Evaluate an operand expression. Any diagnostic leaves the affected
    /// token contributing zero, and assembly continues.
    ///
    /// Operators have no precedence and combine right to left: the value
    /// accumulated so far is folded with the evaluation of the whole rest,
    /// so `1+2*3` is 7 and `2*3+1` is 8. Source files depend on this
    /// order; it must not be replaced by conventional precedence.
    pub fn eval(&mut self, s: &str) -> i32 {
        if s.trim().is_empty() {
            return 0;
        }
        match ZasmParser::parse(Rule::expr_input, s) {
            Ok(mut pairs) => {
                let expr = pairs
                    .next()
                    .unwrap()
                    .into_inner()
                    .next()
                    .unwrap();
                self.eval_expr(expr)
            }
            Err(_) => {
                // The scanner already dropped whitespace outside strings,
                // so a parse failure means an unterminated string, an
                // unbalanced paren, or a token no rule covers.
                if s.matches(STRSEP).count() % 2 == 1 {
                    self.asmerr(AsmError::MissingStringSep);
                } else if !parens_balanced(s) {
                    self.asmerr(AsmError::MissingParen);
                } else {
                    self.asmerr(AsmError::Undefined);
                }
                0
            }
        }
    }

    fn eval_expr(&mut self, pair: Pair<Rule>) -> i32 {
        let mut inner = pair.into_inner();
        let first = inner.next().unwrap();
        let (val, op) = match first.as_rule() {
            Rule::term => {
                let v = self.eval_term(first);
                match inner.next() {
                    Some(op) => (v, op),
                    None => return v,
                }
            }
            Rule::operator => (0, first),
            _ => unreachable!(),
        };
        let rhs = match inner.next() {
            Some(expr) => self.eval_expr(expr),
            None => 0,
        };
        match op.as_str() {
            "+" => val.wrapping_add(rhs),
            "-" => val.wrapping_sub(rhs),
            "*" => val.wrapping_mul(rhs),
            "/" => val.checked_div(rhs).unwrap_or(0),
            "%" => val.checked_rem(rhs).unwrap_or(0),
            "<" => val.wrapping_shl(rhs as u32),
            ">" => val.wrapping_shr(rhs as u32),
            "|" => val | rhs,
            "&" => val & rhs,
            "^" => val ^ rhs,
            "~" => !rhs,
            _ => unreachable!(),
        }
    }

    fn eval_term(&mut self, pair: Pair<Rule>) -> i32 {
        let inner = pair.into_inner().next().unwrap();
        match inner.as_rule() {
            Rule::paren => match inner.into_inner().next() {
                Some(expr) => self.eval_expr(expr),
                None => 0,
            },
            Rule::string => {
                strval(inner.into_inner().next().unwrap().as_str())
            }
            Rule::number => self.numval(inner.as_str()),
            Rule::symbol => self.symval(inner.as_str()),
            _ => unreachable!(),
        }
    }

    /// The trailing character selects the radix; a digit-led token that
    /// matches no radix form is a symbol after all.
    fn numval(&mut self, s: &str) -> i32 {
        match s.as_bytes()[s.len() - 1] {
            b'0'..=b'9' => radix_prefix(s, 10),
            b'H' => radix_prefix(s, 16),
            b'B' => radix_prefix(s, 2),
            b'O' => radix_prefix(s, 8),
            _ => self.symval(s),
        }
    }

    fn symval(&mut self, name: &str) -> i32 {
        if name == "$" {
            return self.pc;
        }
        match self.symtab.get(sym_name(name)) {
            Some(val) => val,
            None => {
                self.asmerr(AsmError::Undefined);
                0
            }
        }
    }

    /// Check an 8-bit value that may be written signed or unsigned.
    pub fn chk_v1(&mut self, i: i32) -> i32 {
        if i >= -255 && i <= 255 {
            i
        } else {
            self.asmerr(AsmError::ValueOutOfRange);
            0
        }
    }

    /// Check a signed 8-bit displacement.
    pub fn chk_v2(&mut self, i: i32) -> i32 {
        if i >= -127 && i <= 127 {
            i
        } else {
            self.asmerr(AsmError::ValueOutOfRange);
            0
        }
    }
}

/// Accumulate the longest prefix of `s` that is valid in `radix`.
fn radix_prefix(s: &str, radix: u32) -> i32 {
    let mut num = 0i32;
    for c in s.chars() {
        match c.to_digit(radix) {
            Some(d) => {
                num = num.wrapping_mul(radix as i32).wrapping_add(d as i32)
            }
            None => break,
        }
    }
    num
}

/// String value: each character shifts the accumulator up one byte, so
/// `'A'` is 0x41 and `'AB'` is 0x4142.
fn strval(s: &str) -> i32 {
    s.bytes()
        .fold(0i32, |acc, b| acc.wrapping_shl(8).wrapping_add(b as i32))
}

fn parens_balanced(s: &str) -> bool {
    let mut depth = 0i32;
    let mut in_string = false;
    for c in s.chars() {
        match c {
            STRSEP => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth -= 1,
            _ => {}
        }
    }
    depth == 0
}
