//! Object-code sinks for Z80 assembly output.
//!
//! Three formats share one writer type:
//!
//! * **raw binary** — emitted bytes are written through unchanged; gaps are
//!   filled with `0xFF`.
//! * **Mostek binary** — a raw image prefixed with `0xFF` and the 16-bit
//!   load address, little endian.
//! * **Intel HEX** — ASCII records `:LLAAAATTDD..CC`, packing up to
//!   [`HEX_RECLEN`] data bytes each; gaps advance the record address without
//!   emitting anything, the image is sparse.
//!
//! The record address wraps at 16 bits.

use byteorder::WriteBytesExt;
use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::io::BufWriter;
use std::path::Path;
use util::Endian;


/// Max number of data bytes per Intel-HEX record.
pub const HEX_RECLEN: usize = 32;

/// Object output format.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Format {
    Bin,
    Mostek,
    Hex,
}

impl Format {
    /// Conventional file extension for the format.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Hex => "hex",
            _ => "bin",
        }
    }
}

/// Format-switched byte sink. Bytes arrive in target-address order; the
/// caller announces gaps through [`fill`](ObjWriter::fill).
#[derive(Debug)]
pub struct ObjWriter<W: Write> {
    format: Format,
    out: W,
    hex_addr: u16,
    hex_buf: Vec<u8>,
}

impl<W: Write> ObjWriter<W> {
    pub fn new(format: Format, out: W) -> ObjWriter<W> {
        ObjWriter {
            format,
            out,
            hex_addr: 0,
            hex_buf: Vec::with_capacity(HEX_RECLEN),
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Begin the image at `start`. Writes the Mostek prefix or seeds the
    /// HEX record address; a raw image has no header.
    pub fn header(&mut self, start: u16) -> io::Result<()> {
        match self.format {
            Format::Bin => {}
            Format::Mostek => {
                self.out.write_u8(0xff)?;
                self.out.write_u16::<Endian>(start)?;
            }
            Format::Hex => self.hex_addr = start,
        }
        Ok(())
    }

    /// Append object bytes at the current address.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self.format {
            Format::Bin | Format::Mostek => self.out.write_all(bytes)?,
            Format::Hex => {
                for &b in bytes {
                    if self.hex_buf.len() >= HEX_RECLEN {
                        self.flush_hex()?;
                    }
                    self.hex_buf.push(b);
                }
            }
        }
        Ok(())
    }

    /// Skip `count` bytes of target memory: `0xFF` filler in the binary
    /// formats, a silent address bump in HEX.
    pub fn fill(&mut self, count: usize) -> io::Result<()> {
        match self.format {
            Format::Bin | Format::Mostek => {
                for _ in 0..count {
                    self.out.write_u8(0xff)?;
                }
            }
            Format::Hex => {
                self.flush_hex()?;
                self.hex_addr = self.hex_addr.wrapping_add(count as u16);
            }
        }
        Ok(())
    }

    /// Complete the image: flush pending HEX data and write the end record.
    pub fn end(&mut self) -> io::Result<()> {
        if self.format == Format::Hex {
            self.flush_hex()?;
            writeln!(self.out, ":00000001FF")?;
        }
        self.out.flush()
    }

    /// Hand back the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn flush_hex(&mut self) -> io::Result<()> {
        if self.hex_buf.is_empty() {
            return Ok(());
        }
        let sum = self.checksum();
        write!(self.out, ":{:02X}{:04X}00", self.hex_buf.len(), self.hex_addr)?;
        for &b in &self.hex_buf {
            write!(self.out, "{:02X}", b)?;
        }
        writeln!(self.out, "{:02X}", sum)?;
        self.hex_addr = self.hex_addr.wrapping_add(self.hex_buf.len() as u16);
        self.hex_buf.clear();
        Ok(())
    }

    /// Two's complement of the 8-bit sum over length, address and data.
    fn checksum(&self) -> u8 {
        let mut sum = self.hex_buf.len() as u8;
        sum = sum.wrapping_add((self.hex_addr >> 8) as u8);
        sum = sum.wrapping_add(self.hex_addr as u8);
        for &b in &self.hex_buf {
            sum = sum.wrapping_add(b);
        }
        sum.wrapping_neg()
    }
}

/// Open `path` for writing and wrap it in an [`ObjWriter`].
pub fn create_file<P: AsRef<Path>>(
    format: Format,
    path: P,
) -> io::Result<ObjWriter<BufWriter<File>>> {
    Ok(ObjWriter::new(format, BufWriter::new(File::create(path)?)))
}
