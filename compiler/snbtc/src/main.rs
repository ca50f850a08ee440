//! SNBT lexer CLI.

use snbtc::commands::{lex_file, parse_lex_options};

fn main() {
    snbtc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: snbt lex <file> [options]");
                eprintln!();
                print_lex_options();
                std::process::exit(1);
            }
            let options = match parse_lex_options(&args[3..]) {
                Ok(options) => options,
                Err(msg) => {
                    eprintln!("error: {msg}");
                    std::process::exit(1);
                }
            };
            lex_file(&args[2], &options);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("snbt {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("SNBT lexer");
    println!();
    println!("Usage: snbt <command> [options]");
    println!();
    println!("Commands:");
    println!("  lex <file>    Tokenize a file and display tokens");
    println!("  help          Show this help message");
    println!("  version       Show version information");
    println!();
    print_lex_options();
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=snbt_lexer=trace) for lexer tracing.");
}

fn print_lex_options() {
    println!("Lex options:");
    println!("  --charset=<label>       Input encoding: utf-8, utf-16be, utf-16le, utf-32be, utf-32le");
    println!("  --tab-size=<n>          Columns per tab stop (default: 1)");
    println!("  --unparsed-lines=<list> Comma-separated lines to leave out");
    println!("  -w, --keep-whitespace   Report whitespace tokens");
}
