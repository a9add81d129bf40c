use pest_derive::Parser;

/// Pest parser over the operand expression grammar in `zasm.pest`.
#[derive(Parser)]
#[grammar = "zasm.pest"]
pub struct ZasmParser;
