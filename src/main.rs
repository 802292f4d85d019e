//! booksmith - export chapter trees to Markdown, EPUB and MOBI

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{LevelFilter, info};

use booksmith::export::{EpubConfig, EpubExporter, MarkdownExporter, MobiConfig, MobiExporter};
use booksmith::{Chapter, filename};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Markdown,
    Epub,
    Mobi,
}

#[derive(Parser)]
#[command(name = "booksmith")]
#[command(version, about = "Export chapter trees to Markdown, EPUB and MOBI", long_about = None)]
#[command(after_help = "EXAMPLES:
    booksmith book.json                     Write <Title>.epub
    booksmith book.json -f markdown         Print Markdown to stdout
    booksmith book.json -f mobi -o out      Write out.mobi via kindlegen")]
struct Cli {
    /// Chapter tree as JSON (name, author, content, sub_chapters)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Epub)]
    format: Format,

    /// Output file (default: derived from the root chapter name; stdout for Markdown)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<String>,

    /// MOBI compiler executable
    #[arg(long, value_name = "BIN", default_value = "kindlegen")]
    compiler: String,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else if cli.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        })
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> booksmith::Result<()> {
    let chapter = load_chapter(&cli.input)?;
    info!(
        "Loaded {:?} ({} chapters) from {}",
        chapter.name,
        chapter.count(),
        cli.input.display()
    );

    match cli.format {
        Format::Markdown => {
            let markdown = MarkdownExporter::new().render(&chapter);
            match cli.output {
                Some(ref path) => {
                    fs::write(path, markdown)?;
                    info!("Markdown saved to {path:?}");
                }
                None => print!("{markdown}"),
            }
        }
        Format::Epub => {
            let output = output_name(cli, &chapter, "epub");
            EpubExporter::new()
                .with_config(EpubConfig {
                    quiet: cli.quiet,
                    ..Default::default()
                })
                .to_epub(&chapter, &output)?;
        }
        Format::Mobi => {
            let output = output_name(cli, &chapter, "mobi");
            MobiExporter::new()
                .with_config(MobiConfig {
                    compiler: cli.compiler.clone(),
                    quiet: cli.quiet,
                })
                .to_mobi(&chapter, &output)?;
        }
    }

    Ok(())
}

fn load_chapter(path: &Path) -> booksmith::Result<Chapter> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Explicit `--output`, else the sanitized root name plus `extension`.
fn output_name(cli: &Cli, chapter: &Chapter, extension: &str) -> String {
    match cli.output {
        Some(ref output) => output.clone(),
        None => format!("{}.{extension}", filename(&chapter.name)),
    }
}
