use man::prelude::*;
use std::path::Path;

fn main() {
    let page = Manual::new("mbecat")
        .about("cat(1) for MBE binary sheet containers — renders to markdown with bat")
        .author(Author::new("Damon Petta").email("d@disassemble.net"))
        .flag(
            Flag::new()
                .short("-p")
                .long("--plain")
                .help("Force plain text output (no colors, no decorations)."),
        )
        .flag(
            Flag::new()
                .short("-m")
                .long("--markdown")
                .help("Output as markdown (default when terminal detected)."),
        )
        .flag(Flag::new().short("-c").long("--canonical").help(
            "Re-encode the parsed file through the generator and write \
             the canonical MBE bytes to stdout. Re-encoding normalizes \
             alignment padding and row strides without changing cell \
             content. Most useful when piping to a file \
             (mbecat --canonical bloated.mbe > tight.mbe).",
        ))
        .flag(Flag::new().short("-e").long("--encoding").help(
            "String encoding used while parsing: utf-8 (default), \
             latin1, or windows-1252. Output is always UTF-8. Picking \
             the wrong encoding produces garbled text, not an error.",
        ))
        .flag(
            Flag::new()
                .short("-h")
                .long("--help")
                .help("Show help information."),
        )
        .arg(Arg::new("[FILE...]"))
        .custom(
            Section::new("description")
                .paragraph(
                    "mbecat reads MBE binary sheet containers and dumps their \
                     sheets to the terminal as markdown tables. cat had catdoc, \
                     bat got batdoc, MBE gets mbecat.",
                )
                .paragraph(
                    "An MBE container holds typed sheets of rows with int and \
                     string columns: int cells are stored inline in a \
                     fixed-stride block, string cells out-of-line in a trailing \
                     CHNK pool addressed by absolute file offset. Files are \
                     recognized by the leading EXPA magic, not file extension.",
                )
                .paragraph(
                    "When stdout is a terminal, output is pretty-printed as \
                     syntax-highlighted markdown via bat(1) with paging. When \
                     piped, plain tab-separated text is emitted.",
                )
                .paragraph(
                    "Multiple files can be specified and will be processed in \
                     order. Use \\fB-\\fR to read from stdin explicitly. Maximum \
                     input size is 256 MiB.",
                ),
        )
        .example(
            Example::new()
                .text("View an MBE file in the terminal")
                .command("mbecat data.mbe"),
        )
        .example(
            Example::new()
                .text("Extract sheets as plain-text TSV")
                .command("mbecat --plain data.mbe > data.tsv"),
        )
        .example(
            Example::new()
                .text("Canonicalize a file written by another tool")
                .command("mbecat --canonical theirs.mbe > canonical.mbe"),
        )
        .example(
            Example::new()
                .text("Read a legacy Western European file from stdin")
                .command("curl -sL https://example.com/file.mbe | mbecat -e windows-1252"),
        )
        .custom(
            Section::new("environment")
                .paragraph(
                    "mbecat respects the \\fBNO_COLOR\\fR environment variable. \
                     When set, colored output is suppressed even on a terminal.",
                )
                .paragraph(
                    "The \\fBPAGER\\fR environment variable controls which pager \
                     is used when output is displayed on a terminal.",
                ),
        )
        .custom(Section::new("see also").paragraph("bat(1), batdoc(1)"))
        .render();

    // Write to OUT_DIR (standard cargo output directory)
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let out_path = Path::new(&out_dir).join("mbecat.1");
    std::fs::write(&out_path, &page).unwrap();

    // Also write to target/man/ so packaging scripts have a stable path
    // that doesn't depend on the hash-based OUT_DIR.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let man_dir = Path::new(&manifest_dir).join("target").join("man");
    std::fs::create_dir_all(&man_dir).unwrap();
    std::fs::write(man_dir.join("mbecat.1"), &page).unwrap();

    println!("cargo::rerun-if-changed=build.rs");
}
