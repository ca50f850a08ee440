//! Command handlers for the `snbt` CLI.

use snbt_lexer::{escape_text, Charset, Lexer, LexerConfig, SourceError};
use tracing::debug;

/// Options accepted by `snbt lex`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexOptions {
    /// Explicit input encoding. Sniffed from a byte order mark when absent.
    pub charset: Option<Charset>,
    pub tab_size: Option<u32>,
    /// Report whitespace as unparsed tokens instead of skipping it.
    pub keep_whitespace: bool,
    /// One-based lines to leave out of lexing.
    pub unparsed_lines: Vec<u32>,
}

/// Parse the options following `snbt lex <file>`.
pub fn parse_lex_options(args: &[String]) -> Result<LexOptions, String> {
    let mut options = LexOptions::default();
    for arg in args {
        if let Some(label) = arg.strip_prefix("--charset=") {
            options.charset = Some(Charset::for_label(label).map_err(|e| e.to_string())?);
        } else if let Some(size) = arg.strip_prefix("--tab-size=") {
            let size = size
                .parse()
                .map_err(|_| format!("invalid tab size '{size}'"))?;
            options.tab_size = Some(size);
        } else if arg == "--keep-whitespace" || arg == "-w" {
            options.keep_whitespace = true;
        } else if let Some(lines) = arg.strip_prefix("--unparsed-lines=") {
            for line in lines.split(',').map(str::trim).filter(|l| !l.is_empty()) {
                let line = line
                    .parse()
                    .map_err(|_| format!("invalid line number '{line}'"))?;
                options.unparsed_lines.push(line);
            }
        } else {
            return Err(format!("unknown option '{arg}'"));
        }
    }
    Ok(options)
}

/// Build a lexer over `bytes` as configured by `options`.
pub fn build_lexer(
    bytes: &[u8],
    input_source: &str,
    options: &LexOptions,
) -> Result<Lexer, SourceError> {
    let mut config = if options.keep_whitespace {
        LexerConfig::retaining_whitespace()
    } else {
        LexerConfig::default()
    };
    config.input_source = input_source.to_owned();
    if let Some(tab_size) = options.tab_size {
        config.source = config.source.with_tab_size(tab_size);
    }
    let mut lexer = Lexer::from_bytes(bytes, options.charset, config)?;
    if !options.unparsed_lines.is_empty() {
        lexer.set_unparsed_lines(options.unparsed_lines.iter().copied());
    }
    Ok(lexer)
}

/// One line per token: kind, span, location, and escaped image.
pub fn render_tokens(lexer: &mut Lexer) -> Vec<String> {
    lexer
        .tokenize()
        .into_iter()
        .map(|id| {
            let token = lexer.token(id);
            format!(
                "{:<14} {}..{} @ {} \"{}\"",
                token.kind(),
                token.begin(),
                token.end(),
                lexer.location(id),
                escape_text(&lexer.image(id))
            )
        })
        .collect()
}

/// Lex a file and display the token stream.
pub fn lex_file(path: &str, options: &LexOptions) {
    let bytes = read_bytes(path);
    debug!(path, len = bytes.len(), "read input");
    let mut lexer = match build_lexer(&bytes, path, options) {
        Ok(lexer) => lexer,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let lines = render_tokens(&mut lexer);
    println!("Tokens for '{}' ({} tokens):", path, lines.len());
    for line in &lines {
        println!("  {line}");
    }
}

fn read_bytes(path: &str) -> Vec<u8> {
    match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}
