//! Listing output: paged source listing with address and object-code
//! columns, plus the sorted symbol-table appendix.

use crate::driver::Asm;
use std::io::Write;

impl<W: Write> Asm<W> {
    pub(crate) fn lst_write(&mut self, s: &str) {
        if let Some(w) = self.lst.as_mut() {
            let _ = w.write_all(s.as_bytes());
        }
    }

    /// Begin a new listing page.
    pub(crate) fn lst_header(&mut self) {
        self.page += 1;
        let head = format!(
            "\x0cZ80 Assembler\t\tRelease {}\t\t\t\tPage {}\n",
            env!("CARGO_PKG_VERSION"),
            self.page
        );
        let src = format!("Source file: {}\n", self.srcfn);
        let title = format!("Title:       {}\n", self.title);
        self.lst_write(&head);
        self.lst_write(&src);
        self.lst_write(&title);
        self.p_line = 3;
    }

    /// Column header for source lines.
    pub(crate) fn lst_attl(&mut self) {
        self.lst_write("\nLOC   OBJECT CODE   LINE   STMT SOURCE CODE\n");
        self.p_line += 2;
    }

    /// Write one source line to the listing. `val` is the address column
    /// (unless `sd_flag` redirects it), `count` the number of object bytes
    /// in the line buffer; rows carry at most four bytes, longer emissions
    /// continue on follow-up rows with advancing addresses.
    pub(crate) fn lst_line(&mut self, val: i32, count: usize) {
        if !self.list_flag || self.lst.is_none() || self.sd_flag == 4 {
            self.sd_flag = 0;
            return;
        }
        if self.p_line >= self.ppl || self.c_line == 1 {
            self.lst_header();
            self.lst_attl();
        }
        let mut row = String::new();
        let mut with_data = true;
        match self.sd_flag {
            0 => row.push_str(&format!("{:04X}  ", val & 0xffff)),
            1 => row.push_str(&format!("{:04X}  ", self.sd_val & 0xffff)),
            2 => row.push_str("      "),
            _ => {
                row.push_str(&format!("{:04X}              ", self.sd_val & 0xffff));
                with_data = false;
            }
        }
        if with_data {
            for slot in 0..4 {
                if slot < count {
                    row.push_str(&format!("{:02X} ", self.ops[slot]));
                } else {
                    row.push_str("   ");
                }
            }
        }
        row.push_str(&format!(
            "{:6} {:6} {}\n",
            self.c_line, self.s_line, self.line
        ));
        self.lst_write(&row);
        if let Some(err) = self.errnum.take() {
            let note = format!("=> {}\n", err);
            self.lst_write(&note);
            self.p_line += 1;
        }
        self.sd_flag = 0;
        self.p_line += 1;

        let mut i = 4;
        let mut addr = val;
        while i < count {
            if self.p_line >= self.ppl {
                self.lst_header();
                self.lst_attl();
            }
            self.s_line += 1;
            addr += 4;
            let mut row = format!("{:04X}  ", addr & 0xffff);
            for slot in 0..4 {
                if i + slot < count {
                    row.push_str(&format!("{:02X} ", self.ops[i + slot]));
                } else {
                    row.push_str("   ");
                }
            }
            row.push_str(&format!("{:6} {:6}\n", self.c_line, self.s_line));
            self.lst_write(&row);
            self.p_line += 1;
            i += 4;
        }
    }

    /// Symbol-table appendix: four `NAME VALUE` columns per row.
    pub(crate) fn lst_sort_sym(&mut self, entries: &[(String, i32)]) {
        self.p_line = 0;
        self.title = "Symboltable".to_string();
        let mut col = 0;
        for (name, val) in entries {
            if self.p_line == 0 {
                self.lst_header();
                self.lst_write("\n");
                self.p_line += 1;
            }
            let cell = format!("{:<8} {:04X}\t", name, val & 0xffff);
            self.lst_write(&cell);
            col += 1;
            if col == 4 {
                self.lst_write("\n");
                col = 0;
                self.p_line += 1;
                if self.p_line >= self.ppl {
                    self.p_line = 0;
                }
            }
        }
        if col != 0 {
            self.lst_write("\n");
        }
    }
}
