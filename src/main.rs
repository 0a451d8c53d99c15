//! turndown - HTML to Markdown converter

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;

use turndown::{
    BulletListMarker, CodeBlockStyle, HeadingStyle, HtmlRetentionMode, LinkStyle, Options,
    Settings, TurndownService,
};

#[derive(Parser)]
#[command(name = "turndown")]
#[command(version, about = "Convert HTML to Markdown", long_about = None)]
#[command(after_help = "EXAMPLES:
    turndown page.html                    Print Markdown for page.html
    turndown page.html -o page.md         Write Markdown to page.md
    curl -s URL | turndown --atx          Convert from stdin
    turndown --config opts.json page.html Load options from a JSON file")]
struct Cli {
    /// Input HTML file; reads stdin when absent or `-`
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Output file; writes stdout when absent
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<String>,

    /// JSON file of options (camelCase keys, e.g. {"headingStyle": "atx"})
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Use `#` headings instead of underlined ones
    #[arg(long)]
    atx: bool,

    /// Use fenced code blocks instead of indented ones
    #[arg(long)]
    fenced: bool,

    /// Bullet list marker
    #[arg(long, value_name = "MARKER", value_parser = ["*", "-", "+"])]
    bullet: Option<String>,

    /// Emit reference-style links
    #[arg(long)]
    referenced: bool,

    /// How to treat markup Markdown cannot express
    #[arg(long, value_name = "MODE", value_parser = ["standard", "preserveAll", "markdownIncludingHtml"])]
    retain: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> turndown::Result<()> {
    let service = TurndownService::with_options(options_from(cli)?)?;

    let bytes = match cli.input.as_deref() {
        None | Some("-") => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
        Some(path) => fs::read(path)?,
    };

    let markdown = service.render_bytes(&bytes)?;

    match &cli.output {
        Some(path) => fs::write(path, format!("{markdown}\n"))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{markdown}")?;
        }
    }
    Ok(())
}

fn options_from(cli: &Cli) -> turndown::Result<Options> {
    let mut options = match &cli.config {
        Some(path) => Settings::from_json(&fs::read_to_string(path)?)?.into_options(),
        None => Options::default(),
    };

    if cli.atx {
        options.heading_style = HeadingStyle::Atx;
    }
    if cli.fenced {
        options.code_block_style = CodeBlockStyle::Fenced;
    }
    if let Some(marker) = &cli.bullet {
        options.bullet_list_marker = marker.parse::<BulletListMarker>()?;
    }
    if cli.referenced {
        options.link_style = LinkStyle::Referenced;
    }
    if let Some(mode) = &cli.retain {
        options.html_retention_mode = mode.parse::<HtmlRetentionMode>()?;
    }
    Ok(options)
}
