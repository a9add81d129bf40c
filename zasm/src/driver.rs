//! The two-pass driver: assembler context, per-line processing and the
//! file-level entry point.
//!
//! Pass 1 walks all source files assigning addresses and collecting
//! symbols; pass 2 walks them again, emitting object code and the
//! listing. Both passes share one [`Asm`] context, the single owner of
//! all assembler state.

use crate::errors::{AsmError, Fatal, Result};
use crate::optab::{search_op, OpKind};
use crate::scan::{split_line, sym_name};
use crate::symtab::{sort_by_addr, sort_by_name, SymTab};
use crate::{ENDFILE, IFNEST, PLENGTH};
use objfile::{Format, ObjWriter};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Order of the symbol-table appendix.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SymSort {
    Addr,
    Name,
}

/// Everything the invocation decides: sources, output format and paths,
/// listing and verbosity switches, predefined symbols.
#[derive(Debug)]
pub struct Options {
    pub files: Vec<PathBuf>,
    pub format: Format,
    pub obj_file: Option<PathBuf>,
    pub lst_file: Option<PathBuf>,
    pub listing: bool,
    pub sym_sort: Option<SymSort>,
    pub verbose: bool,
    /// `DEFS` fills the object file unless disabled with `-x`.
    pub fill: bool,
    pub defines: Vec<String>,
}

impl Options {
    pub fn new(files: Vec<PathBuf>) -> Options {
        Options {
            files,
            format: Format::Hex,
            obj_file: None,
            lst_file: None,
            listing: false,
            sym_sort: None,
            verbose: false,
            fill: true,
            defines: Vec::new(),
        }
    }
}

/// The assembler context. One instance carries a whole two-pass run;
/// encoders and pseudo-ops mutate it through `&mut self` methods.
pub struct Asm<W: Write> {
    pub(crate) pass: u8,
    pub(crate) pc: i32,
    pub(crate) gencode: bool,
    pub(crate) iflevel: usize,
    pub(crate) condstack: [bool; IFNEST],
    pub(crate) incnest: usize,
    pub(crate) errors: usize,
    /// Pass-2 diagnostic held until the listing line is written.
    pub(crate) errnum: Option<AsmError>,

    pub(crate) label: String,
    pub(crate) opcode: String,
    pub(crate) operand: String,
    pub(crate) line: String,
    /// Object bytes of the current line.
    pub(crate) ops: Vec<u8>,

    pub(crate) symtab: SymTab,
    pub(crate) prg_adr: i32,
    pub(crate) prg_flag: i32,
    /// Listing-column mode of the current line; see `lst_line`.
    pub(crate) sd_flag: u8,
    pub(crate) sd_val: i32,

    pub(crate) c_line: usize,
    pub(crate) s_line: usize,
    pub(crate) p_line: usize,
    pub(crate) page: usize,
    pub(crate) ppl: usize,
    pub(crate) title: String,
    pub(crate) srcfn: String,

    pub(crate) list_flag: bool,
    pub(crate) ver_flag: bool,
    pub(crate) dump_flag: bool,

    pub(crate) obj: ObjWriter<W>,
    pub(crate) lst: Option<Box<dyn Write>>,
}

impl<W: Write> Asm<W> {
    pub fn new(obj: ObjWriter<W>) -> Asm<W> {
        Asm {
            pass: 1,
            pc: 0,
            gencode: true,
            iflevel: 0,
            condstack: [false; IFNEST],
            incnest: 0,
            errors: 0,
            errnum: None,
            label: String::new(),
            opcode: String::new(),
            operand: String::new(),
            line: String::new(),
            ops: Vec::with_capacity(16),
            symtab: SymTab::new(),
            prg_adr: 0,
            prg_flag: 0,
            sd_flag: 0,
            sd_val: 0,
            c_line: 0,
            s_line: 0,
            p_line: 0,
            page: 0,
            ppl: PLENGTH,
            title: String::new(),
            srcfn: String::new(),
            list_flag: false,
            ver_flag: false,
            dump_flag: true,
            obj,
            lst: None,
        }
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    /// Give up the context and hand back the object sink.
    pub fn into_object(self) -> ObjWriter<W> {
        self.obj
    }

    pub fn symtab(&self) -> &SymTab {
        &self.symtab
    }

    /// Program start address, latched by the first `ORG` of pass 1.
    pub fn start_addr(&self) -> u16 {
        (self.prg_adr & 0xffff) as u16
    }

    /// Predefine a symbol with value 0, as the `-d` option does.
    pub fn predefine(&mut self, name: &str) {
        let upper = name.to_ascii_uppercase();
        self.symtab.insert(sym_name(&upper), 0);
    }

    /// Count a diagnostic. Pass 1 reports it right away with its source
    /// position; pass 2 parks it for the next listing line.
    pub(crate) fn asmerr(&mut self, e: AsmError) {
        if self.pass == 1 {
            let msg = format!(
                "Error in file: {} Line: {}\n{}\n",
                self.srcfn, self.c_line, e
            );
            if self.lst.is_some() {
                self.lst_write(&msg);
            } else {
                print!("{}", msg);
            }
        } else {
            self.errnum = Some(e);
        }
        self.errors += 1;
    }

    /// Insert or update a symbol; inert inside a false conditional so
    /// skipped branches define nothing.
    pub(crate) fn put_sym(&mut self, name: &str, val: i32) {
        if !self.gencode {
            return;
        }
        self.symtab.insert(name, val);
    }

    /// Bind the current label to the current address; a known name is a
    /// multiple definition.
    pub(crate) fn put_label(&mut self) {
        if self.symtab.get(&self.label).is_none() {
            let label = self.label.clone();
            let pc = self.pc;
            self.put_sym(&label, pc);
        } else {
            self.asmerr(AsmError::MultiplyDefined);
        }
    }

    /// Run one pass over the source files.
    pub fn run_pass(&mut self, pass: u8, files: &[PathBuf]) -> Result<()> {
        self.pass = pass;
        self.pc = 0;
        if self.ver_flag {
            println!("Pass {}", pass);
        }
        if pass == 2 {
            let start = self.start_addr();
            self.obj.header(start)?;
        }
        for file in files {
            if self.ver_flag {
                println!("   Read    {}", file.display());
            }
            self.process_file(file)?;
        }
        Ok(())
    }

    /// Process one source file; also the reentry point for `INCLUDE`.
    pub(crate) fn process_file(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)
            .map_err(|e| Fatal::FileOpen(path.to_path_buf(), e))?;
        let name = path.display().to_string();
        self.read_source(&name, BufReader::new(file))
    }

    /// Drive the per-line loop over any source of lines.
    pub(crate) fn read_source<R: BufRead>(
        &mut self,
        name: &str,
        mut reader: R,
    ) -> Result<()> {
        self.c_line = 0;
        self.srcfn = name.to_string();
        let mut buf = String::new();
        loop {
            buf.clear();
            if reader.read_line(&mut buf)? == 0 {
                break;
            }
            while buf.ends_with('\n') || buf.ends_with('\r') {
                buf.pop();
            }
            self.line.clear();
            self.line.push_str(&buf);
            if !self.process_line()? {
                break;
            }
        }
        if self.pass == 1 && self.iflevel > 0 {
            self.asmerr(AsmError::MissingEndif);
        }
        Ok(())
    }

    /// Handle one line. Returns false when `END` stops the current file.
    fn process_line(&mut self) -> Result<bool> {
        self.c_line += 1;
        if self.pass == 2 {
            self.s_line += 1;
        }
        let fields = split_line(&self.line);
        self.label = fields.label;
        self.opcode = fields.opcode;
        self.operand = fields.operand;

        if self.opcode == ENDFILE {
            if self.pass == 2 {
                let pc = self.pc;
                self.lst_line(pc, 0);
            }
            return Ok(false);
        }
        if !self.opcode.is_empty() {
            match search_op(&self.opcode) {
                Some(op) => {
                    let count = self.dispatch(op.kind)?;
                    if self.pass == 1 {
                        if self.gencode {
                            self.pc += count as i32;
                        }
                    } else if self.gencode {
                        let pc = self.pc;
                        self.lst_line(pc, count);
                        self.obj_write(count)?;
                        self.pc += count as i32;
                    } else {
                        self.sd_flag = 2;
                        self.lst_line(0, 0);
                    }
                }
                None => {
                    self.asmerr(AsmError::IllegalOpcode);
                    if self.pass == 2 {
                        self.sd_flag = 2;
                        self.lst_line(0, 0);
                    }
                }
            }
        } else if !self.label.is_empty() && self.pass == 1 {
            self.put_label();
        } else if self.pass == 2 {
            self.sd_flag = 2;
            self.lst_line(0, 0);
        }
        Ok(true)
    }

    /// Route a table entry to its encoder. Conditional pseudo-ops always
    /// run; everything else is inert inside a false conditional branch.
    fn dispatch(&mut self, kind: OpKind) -> Result<usize> {
        self.ops.clear();
        let operand = self.operand.clone();
        let label = self.label.clone();

        if let OpKind::Cond(c) = kind {
            return self.op_cond(c, &operand);
        }
        if !self.gencode {
            return Ok(0);
        }
        match kind {
            OpKind::Org => self.op_org(&operand),
            OpKind::Equ => self.op_equ(&label, &operand),
            OpKind::Defl => self.op_defl(&label, &operand),
            OpKind::Defs => self.op_defs(&label, &operand),
            OpKind::Defb => self.op_defb(&label, &operand),
            OpKind::Defm => self.op_defm(&label, &operand),
            OpKind::Defw => self.op_defw(&label, &operand),
            OpKind::Misc(m) => self.op_misc(m, &operand),
            OpKind::Glob => self.op_glob(),
            kind => {
                if self.pass == 1 && !label.is_empty() {
                    self.put_label();
                }
                match kind {
                    OpKind::One(c1) => self.op_1b(c1),
                    OpKind::Two(c1, c2) => self.op_2b(c1, c2),
                    OpKind::Alu(op) => self.op_alu(op, &operand),
                    OpKind::Add => self.op_add(&operand),
                    OpKind::Adc => self.op_adc(&operand),
                    OpKind::Sbc => self.op_sbc(&operand),
                    OpKind::Inc => self.op_incdec(true, &operand),
                    OpKind::Dec => self.op_incdec(false, &operand),
                    OpKind::Ld => self.op_ld(&operand),
                    OpKind::Ex => self.op_ex(&operand),
                    OpKind::Push => self.op_pupo(true, &operand),
                    OpKind::Pop => self.op_pupo(false, &operand),
                    OpKind::Jp => self.op_jp(&operand),
                    OpKind::Jr => self.op_jr(&operand),
                    OpKind::Call => self.op_call(&operand),
                    OpKind::Ret => self.op_ret(&operand),
                    OpKind::Djnz => self.op_djnz(&operand),
                    OpKind::Rst => self.op_rst(&operand),
                    OpKind::In => self.op_in(&operand),
                    OpKind::Out => self.op_out(&operand),
                    OpKind::Im => self.op_im(&operand),
                    OpKind::Rot(op) => self.op_rot(op, &operand),
                    OpKind::Bits(grp) => self.op_bits(grp, &operand),
                    _ => unreachable!(),
                }
            }
        }
    }

    fn obj_write(&mut self, count: usize) -> Result<()> {
        let n = count.min(self.ops.len());
        self.obj.write_bytes(&self.ops[..n])?;
        Ok(())
    }
}

/// Assemble the sources named in `opts`, writing object file and listing.
/// Returns the error count; pass-1 errors abort with [`Fatal::Halted`]
/// after removing the partial object file.
pub fn assemble(opts: &Options) -> Result<usize> {
    if opts.files.is_empty() {
        return Err(Fatal::Internal("no input files"));
    }
    let sources: Vec<PathBuf> = opts
        .files
        .iter()
        .map(|f| with_default_ext(f, "asm"))
        .collect();
    let obj_path = match &opts.obj_file {
        Some(p) => with_default_ext(p, opts.format.extension()),
        None => sources[0].with_extension(opts.format.extension()),
    };
    let obj = objfile::create_file(opts.format, &obj_path)
        .map_err(|e| Fatal::FileOpen(obj_path.clone(), e))?;

    let mut asm = Asm::new(obj);
    asm.ver_flag = opts.verbose;
    asm.dump_flag = opts.fill;
    if opts.listing {
        let lst_path = match &opts.lst_file {
            Some(p) => with_default_ext(p, "lst"),
            None => sources[0].with_extension("lst"),
        };
        let file = File::create(&lst_path)
            .map_err(|e| Fatal::FileOpen(lst_path.clone(), e))?;
        asm.lst = Some(Box::new(BufWriter::new(file)));
        asm.list_flag = true;
    }
    for define in &opts.defines {
        asm.predefine(define);
    }

    asm.run_pass(1, &sources)?;
    if asm.errors > 0 {
        let n = asm.errors;
        let msg = format!("{} error(s)\n", n);
        if asm.lst.is_some() {
            asm.lst_write(&msg);
        } else {
            print!("{}", msg);
        }
        drop(asm);
        let _ = fs::remove_file(&obj_path);
        return Err(Fatal::Halted(n));
    }
    asm.run_pass(2, &sources)?;
    asm.obj.end()?;
    if asm.ver_flag {
        println!("{} error(s)", asm.errors);
    }
    if asm.lst.is_some() {
        if let Some(sort) = opts.sym_sort {
            let mut entries = asm.symtab.entries();
            match sort {
                SymSort::Addr => sort_by_addr(&mut entries),
                SymSort::Name => sort_by_name(&mut entries),
            }
            asm.lst_sort_sym(&entries);
        }
    }
    Ok(asm.errors)
}

/// Append the conventional extension when the name carries none.
fn with_default_ext(path: &Path, ext: &str) -> PathBuf {
    if path.extension().is_none() {
        path.with_extension(ext)
    } else {
        path.to_path_buf()
    }
}
