#[macro_use]
extern crate clap;

use clap::Arg;
use std::cmp;
use std::path::PathBuf;
use std::process;
use zasm::{Format, Options, SymSort};

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("define")
                .short("d")
                .value_name("SYMBOL")
                .number_of_values(1)
                .multiple(true)
                .help("Predefines SYMBOL with value 0"),
        )
        .arg(
            Arg::with_name("format")
                .short("f")
                .value_name("FORMAT")
                .possible_values(&["b", "m", "h"])
                .default_value("h")
                .help("Object format: raw binary, Mostek binary or Intel-HEX"),
        )
        .arg(
            Arg::with_name("listing")
                .short("l")
                .value_name("LISTFILE")
                .takes_value(true)
                .min_values(0)
                .max_values(1)
                .help("Writes a listing, by default next to the first source"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .value_name("OBJFILE")
                .takes_value(true)
                .help("Sets the object file to write to"),
        )
        .arg(
            Arg::with_name("symtab")
                .short("s")
                .value_name("ORDER")
                .possible_values(&["a", "n"])
                .requires("listing")
                .help("Appends the symbol table, sorted by address or name"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .help("Reports progress on stdout"),
        )
        .arg(
            Arg::with_name("nofill")
                .short("x")
                .help("Does not fill DEFS space in the object file"),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("Source files (given the .asm extension if none)")
                .required(true)
                .multiple(true),
        )
        .get_matches();

    let files: Vec<PathBuf> = matches
        .values_of("INPUT")
        .unwrap()
        .map(PathBuf::from)
        .collect();
    let mut opts = Options::new(files);

    opts.format = match matches.value_of("format").unwrap() {
        "b" => Format::Bin,
        "m" => Format::Mostek,
        _ => Format::Hex,
    };
    opts.listing = matches.is_present("listing");
    opts.lst_file = matches.value_of("listing").map(PathBuf::from);
    opts.obj_file = matches.value_of("output").map(PathBuf::from);
    opts.sym_sort = match matches.value_of("symtab") {
        Some("a") => Some(SymSort::Addr),
        Some("n") => Some(SymSort::Name),
        _ => None,
    };
    opts.verbose = matches.is_present("verbose");
    opts.fill = !matches.is_present("nofill");
    if let Some(defines) = matches.values_of("define") {
        opts.defines = defines.map(str::to_string).collect();
    }

    if opts.verbose {
        println!("{} Release {}", crate_name!(), crate_version!());
    }
    match zasm::assemble(&opts) {
        Ok(errors) => process::exit(cmp::min(errors, 255) as i32),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
