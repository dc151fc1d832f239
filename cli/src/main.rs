//! mdocx CLI - Markdown to styled Word conversion tool

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use mdocx::{
    ConvertReport, Converter, DocumentConfig, DocumentStyle, FooterText, MarkdownBackend, Margins,
    PandocBackend, PaperSize, Rgb,
};

#[derive(Parser)]
#[command(name = "mdocx")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert Markdown to styled Word documents", long_about = None)]
struct Cli {
    /// Input Markdown file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output DOCX file (defaults to the input name with .docx)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    options: ConvertArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Markdown file to DOCX
    Convert {
        /// Input Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output DOCX file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: ConvertArgs,
    },

    /// Check that pandoc is installed
    Check,

    /// Show version information
    Version,
}

#[derive(Args, Clone, Default)]
struct ConvertArgs {
    /// Working directory for relative paths and the img/ folder
    #[arg(long, value_name = "DIR")]
    workdir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE", env = "MDOCX_CONFIG")]
    config: Option<PathBuf>,

    /// Document style preset
    #[arg(long, value_enum)]
    style: Option<StyleArg>,

    /// Paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Document author
    #[arg(long)]
    author: Option<String>,

    /// Document date
    #[arg(long)]
    date: Option<String>,

    /// Font name
    #[arg(long)]
    font: Option<String>,

    /// Base font size in points
    #[arg(long, value_name = "PT")]
    font_size: Option<f64>,

    /// Line spacing multiplier
    #[arg(long, value_name = "FACTOR")]
    line_spacing: Option<f64>,

    /// Margins in centimetres: top,right,bottom,left
    #[arg(long, value_name = "T,R,B,L", value_parser = parse_margins)]
    margins: Option<Margins>,

    /// Heading color, e.g. 1=#2596BE or 2=37,150,190 (repeatable)
    #[arg(long, value_name = "LEVEL=COLOR", value_parser = parse_heading_color)]
    heading_color: Vec<(u8, Rgb)>,

    /// Footer text on odd pages
    #[arg(long, value_name = "TEXT")]
    footer_odd: Option<String>,

    /// Footer text on even pages
    #[arg(long, value_name = "TEXT")]
    footer_even: Option<String>,

    /// Document language tag, e.g. en-US
    #[arg(long, value_name = "TAG")]
    lang: Option<String>,

    /// Do not generate a table of contents
    #[arg(long)]
    no_toc: bool,

    /// Do not center the title block
    #[arg(long)]
    no_center_title: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Print the conversion report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum StyleArg {
    /// Formal report (default)
    Report,
    /// Internal note
    Note,
    /// Letter
    Letter,
    /// Memo
    Memo,
}

impl From<StyleArg> for DocumentStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Report => DocumentStyle::Report,
            StyleArg::Note => DocumentStyle::Note,
            StyleArg::Letter => DocumentStyle::Letter,
            StyleArg::Memo => DocumentStyle::Memo,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PaperArg {
    /// 8.5 x 11 in
    Letter,
    /// 8.5 x 14 in
    Legal,
    /// 210 x 297 mm
    A4,
}

impl From<PaperArg> for PaperSize {
    fn from(paper: PaperArg) -> Self {
        match paper {
            PaperArg::Letter => PaperSize::Letter,
            PaperArg::Legal => PaperSize::Legal,
            PaperArg::A4 => PaperSize::A4,
        }
    }
}

fn parse_margins(s: &str) -> Result<Margins, String> {
    Margins::parse(s).map_err(|e| e.to_string())
}

fn parse_heading_color(s: &str) -> Result<(u8, Rgb), String> {
    let (level, color) = s
        .split_once('=')
        .ok_or_else(|| format!("expected LEVEL=COLOR, got '{}'", s))?;
    let level: u8 = level
        .trim()
        .parse()
        .map_err(|_| format!("invalid heading level '{}'", level))?;
    let color: Rgb = color.parse().map_err(|e: mdocx::Error| e.to_string())?;
    Ok((level, color))
}

fn main() {
    let cli = Cli::parse();

    let quiet = match &cli.command {
        Some(Commands::Convert { options, .. }) => options.quiet || options.json,
        _ => cli.options.quiet || cli.options.json,
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if quiet { "warn" } else { "info" }),
    )
    .init();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            options,
        }) => cmd_convert(&input, output.as_deref(), &options),
        Some(Commands::Check) => cmd_check(),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), &cli.options)
            } else {
                println!("{}", "Usage: mdocx <FILE> [OUTPUT]".yellow());
                println!("       mdocx --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_config(args: &ConvertArgs) -> Result<DocumentConfig, Box<dyn std::error::Error>> {
    let base = match (&args.config, args.style) {
        (Some(path), _) => DocumentConfig::from_json_file(path)?,
        (None, Some(style)) => DocumentConfig::for_style(style.into()).build()?,
        (None, None) => DocumentConfig::default(),
    };

    let footer = match (&args.footer_odd, &args.footer_even) {
        (None, None) => None,
        (odd, even) => Some(FooterText::new(
            odd.clone().unwrap_or_else(|| base.footer_text().odd.clone()),
            even.clone().unwrap_or_else(|| base.footer_text().even.clone()),
        )),
    };

    let mut builder = base.into_builder();
    if let (Some(_), Some(style)) = (&args.config, args.style) {
        builder = builder.with_style(style.into());
    }
    if let Some(paper) = args.paper {
        builder = builder.with_paper_size(paper.into());
    }
    if let Some(ref author) = args.author {
        builder = builder.with_author(author);
    }
    if let Some(ref date) = args.date {
        builder = builder.with_date(date);
    }
    if let Some(ref font) = args.font {
        builder = builder.with_font_name(font);
    }
    if let Some(size) = args.font_size {
        builder = builder.with_base_font_size(size);
    }
    if let Some(spacing) = args.line_spacing {
        builder = builder.with_line_spacing(spacing);
    }
    if let Some(margins) = args.margins {
        builder = builder.with_margins(margins);
    }
    for &(level, color) in &args.heading_color {
        builder = builder.with_heading_color(level, color);
    }
    if let Some(footer) = footer {
        builder = builder.with_footer_text(footer);
    }
    if let Some(ref lang) = args.lang {
        builder = builder.with_language(lang);
    }
    if args.no_toc {
        builder = builder.with_toc(false);
    }
    if args.no_center_title {
        builder = builder.with_center_title(false);
    }

    Ok(builder.build()?)
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("docx")
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    args: &ConvertArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(args)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input));

    // Fails before any work when pandoc is missing
    let converter = Converter::new(config)?;

    let pb = if args.quiet || args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Converting {}...", input.display()));

    let report = converter.convert(input, &output, args.workdir.as_deref());
    pb.finish_and_clear();
    let report = report?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !args.quiet {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &ConvertReport) {
    let stats = &report.stats;
    println!("{} {}", "Saved to".green().bold(), report.output.display());
    println!("  {} Title: {}", "├─".dimmed(), report.title);
    println!(
        "  {} Images: {}/{} embedded",
        "├─".dimmed(),
        stats.images_embedded,
        stats.images_found
    );
    println!(
        "  {} Tables: {} ({} cells)",
        "├─".dimmed(),
        stats.table_count,
        stats.cell_count
    );
    println!(
        "  {} Paragraphs: {}, footnote paragraphs: {}",
        "└─".dimmed(),
        stats.paragraphs_formatted,
        stats.footnote_paragraphs
    );

    if !stats.styles_skipped.is_empty() {
        println!(
            "{} styles not found: {}",
            "Warning:".yellow(),
            stats.styles_skipped.join(", ")
        );
    }
    if stats.images_not_embedded() > 0 || stats.placeholders_unfilled > 0 {
        println!(
            "{} {} image(s) not embedded, {} placeholder(s) unfilled",
            "Warning:".yellow(),
            stats.images_not_embedded(),
            stats.placeholders_unfilled
        );
    }
}

fn cmd_check() -> Result<(), Box<dyn std::error::Error>> {
    let backend = PandocBackend::locate()?;
    println!(
        "{} {} found at {}",
        "✓".green().bold(),
        backend.name(),
        backend.program().display()
    );
    match backend.version() {
        Ok(version) => println!("  {}", version.dimmed()),
        Err(e) => println!("  {} {}", "Could not read version:".yellow(), e),
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "mdocx".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Markdown to styled Word conversion tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/mdocx".dimmed());
    println!("License: MIT");
}
