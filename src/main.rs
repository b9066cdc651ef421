//! `mbecat` — bat for MBE binary sheet containers.
//!
//! Reads `"EXPA"`-tagged MBE files and dumps their sheets to stdout.
//! When stdout is a terminal the output is pretty-printed as
//! syntax-highlighted markdown tables via `bat`; when piped,
//! tab-separated plain text is emitted. A canonical mode re-encodes the
//! parsed file and writes the raw MBE bytes back out.

use bat::{Input, PrettyPrinter};
use is_terminal::IsTerminal;
use std::io::{self, Read, Write};
use std::process;

use mbecat::encoding::TextEncoding;
use mbecat::{generate, parse_with, render, ParseError, ParseOptions};

const USAGE: &str = "\
mbecat - bat for MBE binary sheet containers

Usage: mbecat [OPTIONS] [FILE...]
       cat FILE | mbecat [OPTIONS]
       mbecat [OPTIONS] -

Options:
  -p, --plain           Force plain text output (no colors, no decorations)
  -m, --markdown        Output as markdown (default when terminal detected)
  -c, --canonical       Re-encode the parsed file and write canonical MBE
                        bytes to stdout
  -e, --encoding <ENC>  String encoding used while parsing:
                        utf-8 (default), latin1, or windows-1252
  -h, --help            Show this help

When stdout is a terminal, output is pretty-printed as syntax-highlighted
markdown with decorations. When piped, output is plain text.

Multiple files can be specified and will be processed in order.
Use - to read from stdin explicitly.

Files are recognized by the leading EXPA magic, not file extension.";

/// Maximum input file size (256 MiB). Prevents accidental OOM from
/// huge or degenerate files.
const MAX_INPUT_SIZE: usize = 256 * 1024 * 1024;

/// Output mode selection.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    /// Detect automatically: markdown to terminal, plain text when piped.
    Auto,
    /// Force plain text output.
    Plain,
    /// Force markdown output.
    Markdown,
    /// Re-encode and emit canonical MBE bytes.
    Canonical,
}

/// All errors that can occur while processing one input.
#[derive(Debug, thiserror::Error)]
enum MbecatError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("pretty print: {0}")]
    Render(String),
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut mode = Mode::Auto;
    let mut encoding = TextEncoding::default();
    let mut files: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                println!("{USAGE}");
                return;
            }
            "-p" | "--plain" => mode = Mode::Plain,
            "-m" | "--markdown" => mode = Mode::Markdown,
            "-c" | "--canonical" => mode = Mode::Canonical,
            "-e" | "--encoding" => {
                i += 1;
                let Some(value) = args.get(i) else {
                    eprintln!("mbecat: --encoding requires a value");
                    process::exit(1);
                };
                match value.parse() {
                    Ok(enc) => encoding = enc,
                    Err(e) => {
                        eprintln!("mbecat: {e}");
                        process::exit(1);
                    }
                }
            }
            "-" => files.push("-".to_string()),
            s if s.starts_with('-') => {
                eprintln!("mbecat: unknown option: {s}");
                eprintln!("{USAGE}");
                process::exit(1);
            }
            _ => files.push(args[i].clone()),
        }
        i += 1;
    }

    // No files specified → read from stdin
    if files.is_empty() {
        files.push("-".to_string());
    }

    let mut exit_code = 0;
    for (i, path) in files.iter().enumerate() {
        let (buf, filename) = if path == "-" {
            let mut buf = Vec::new();
            if let Err(e) = io::stdin().read_to_end(&mut buf) {
                eprintln!("mbecat: stdin: {e}");
                exit_code = 1;
                continue;
            }
            (buf, "stdin".to_string())
        } else {
            match std::fs::read(path) {
                Ok(b) => (b, path.clone()),
                Err(e) => {
                    eprintln!("mbecat: {path}: {e}");
                    exit_code = 1;
                    continue;
                }
            }
        };

        if buf.len() > MAX_INPUT_SIZE {
            #[allow(clippy::cast_precision_loss)] // only used in error message
            let size_mib = buf.len() as f64 / (1024.0 * 1024.0);
            eprintln!(
                "mbecat: {filename}: too large ({size_mib:.1} MiB, max {} MiB)",
                MAX_INPUT_SIZE / (1024 * 1024),
            );
            exit_code = 1;
            continue;
        }

        let multiple = files.len() > 1;

        if let Err(e) = run(&buf, &filename, mode, encoding, multiple && i > 0) {
            eprintln!("mbecat: {filename}: {e}");
            exit_code = 1;
        }
    }

    if exit_code != 0 {
        process::exit(exit_code);
    }
}

fn run(
    data: &[u8],
    filename: &str,
    mode: Mode,
    encoding: TextEncoding,
    needs_separator: bool,
) -> Result<(), MbecatError> {
    let options = ParseOptions { encoding };
    let file = parse_with(data, &options)?;
    let is_tty = io::stdout().is_terminal();

    if needs_separator && !is_tty && mode != Mode::Canonical {
        io::stdout().write_all(b"\n")?;
    }

    match mode {
        Mode::Canonical => {
            io::stdout().write_all(&generate(&file))?;
        }
        Mode::Plain => {
            io::stdout().write_all(render::render_plain(&file).as_bytes())?;
        }
        Mode::Markdown => {
            let md = render::render_markdown(&file);
            if is_tty {
                pretty_print(&md, filename)?;
            } else {
                io::stdout().write_all(md.as_bytes())?;
            }
        }
        Mode::Auto => {
            if is_tty {
                pretty_print(&render::render_markdown(&file), filename)?;
            } else {
                io::stdout().write_all(render::render_plain(&file).as_bytes())?;
            }
        }
    }

    Ok(())
}

fn pretty_print(content: &str, filename: &str) -> Result<(), MbecatError> {
    let input = Input::from_bytes(content.as_bytes())
        .name(filename)
        .title(filename);

    let theme = std::env::var("BAT_THEME").unwrap_or_else(|_| "ansi".to_string());

    PrettyPrinter::new()
        .input(input)
        .language("Markdown")
        .theme(&theme)
        .header(true)
        .line_numbers(false)
        .grid(true)
        .colored_output(true)
        .true_color(true)
        .paging_mode(bat::PagingMode::QuitIfOneScreen)
        .print()
        .map_err(|e| MbecatError::Render(e.to_string()))?;

    Ok(())
}
