//! blockpath CLI
//!
//! Runs the matching engine over files, for level authors checking their
//! pattern libraries and reference programs.

use std::path::Path;

use blockpath::{
    canon_file, fmt_file, init_tracing, match_files, parse_file, validate_files, CommandError,
};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    let result = match command.as_str() {
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: blockpath parse <program.txt>");
                std::process::exit(1);
            }
            parse_file(Path::new(&args[2]))
        }
        "canon" => {
            if args.len() < 3 {
                eprintln!("Usage: blockpath canon <snapshot.json>");
                std::process::exit(1);
            }
            canon_file(Path::new(&args[2]))
        }
        "fmt" => {
            if args.len() < 3 {
                eprintln!("Usage: blockpath fmt <snapshot.json | program.txt>");
                std::process::exit(1);
            }
            fmt_file(Path::new(&args[2]))
        }
        "match" => {
            if args.len() < 4 {
                eprintln!("Usage: blockpath match <library.json> <snapshot.json | program.txt>");
                std::process::exit(1);
            }
            match_files(Path::new(&args[2]), Path::new(&args[3]))
        }
        "validate" => {
            if args.len() < 4 {
                eprintln!("Usage: blockpath validate <program.txt> <snapshot.json>");
                std::process::exit(1);
            }
            validate_files(Path::new(&args[2]), Path::new(&args[3]))
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    report(result);
}

fn report(result: Result<String, CommandError>) {
    match result {
        Ok(output) => {
            print!("{output}");
            if !output.is_empty() && !output.ends_with('\n') {
                println!();
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("blockpath - program-structure matching for block-programming levels");
    eprintln!();
    eprintln!("Usage: blockpath <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  parse <program.txt>                 Parse text code, print the program as JSON");
    eprintln!("  canon <snapshot.json>               Canonicalize a block workspace snapshot");
    eprintln!("  fmt <snapshot.json | program.txt>   Print a program as canonical text");
    eprintln!("  match <library.json> <program>      Print the hint and reward for a program");
    eprintln!("  validate <program.txt> <snapshot>   Check text code against blocks");
    eprintln!("  help                                Show this message");
    eprintln!();
    eprintln!("Files ending in .json are read as block snapshots, anything else as text.");
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=bp_match=debug) for tracing output.");
}
