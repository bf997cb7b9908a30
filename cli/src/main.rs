//! redocx CLI - Word document house-style normalizer

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use redocx::{convert_file, detect, Conversion, ConvertOptions, KnownAuthors};

#[derive(Parser)]
#[command(name = "redocx")]
#[command(author = "amberfield")]
#[command(version)]
#[command(about = "Re-emit Word documents through a house style template", long_about = None)]
struct Cli {
    /// Input DOCX file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Style template DOCX (built-in styles if not specified)
    #[arg(short, long, value_name = "FILE", env = "REDOCX_TEMPLATE", global = true)]
    template: Option<PathBuf>,

    /// Known authors JSON file (a flat array of names)
    #[arg(short, long, value_name = "FILE", env = "REDOCX_AUTHORS", global = true)]
    authors: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one document
    Convert {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to <stem>_clean.docx next to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert every document in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory (created if missing)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Number of parallel conversions (defaults to the CPU count)
        #[arg(short, long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Show what would be extracted from a document
    Info {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Emit the extracted structure as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let options = match build_options(cli.template.as_deref(), cli.authors.as_deref()) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Convert { input, output }) => {
            cmd_convert(&input, output.as_deref(), &options)
        }
        Some(Commands::Batch {
            input,
            output,
            jobs,
        }) => cmd_batch(&input, output.as_deref(), jobs, &options),
        Some(Commands::Info { input, json }) => cmd_info(&input, json, &options),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), &options)
            } else {
                println!("{}", "Usage: redocx <FILE> [OUTPUT]".yellow());
                println!("       redocx --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_options(
    template: Option<&Path>,
    authors: Option<&Path>,
) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
    let mut options = ConvertOptions::new();
    if let Some(path) = template {
        options = options.with_template(path);
    }
    options = match authors {
        Some(path) => options.with_authors_file(path)?,
        None => options.with_authors(KnownAuthors::empty()),
    };
    Ok(options)
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}_clean.docx", stem))
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_output(input));

    let report = convert_file(input, &output, options)?;

    println!("{} {}", "Saved to".green(), output.display());
    print_report(&report);

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: Option<&Path>,
    jobs: Option<usize>,
    options: &ConvertOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(n) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()?;
    }

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| input.join("clean"));
    fs::create_dir_all(&output_dir)?;

    let mut files: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(detect::is_candidate_file_name)
        })
        .collect();
    files.sort();

    if files.is_empty() {
        println!("{}", "No .docx files found".yellow());
        return Ok(());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    // One failed file must not sink the batch; failures are collected and
    // reported at the end.
    let failures: Vec<(PathBuf, String)> = files
        .par_iter()
        .filter_map(|path| {
            let file_name = path.file_name().unwrap_or_default();
            let out_path = output_dir.join(file_name);
            let result = convert_file(path, &out_path, options);
            pb.inc(1);
            match result {
                Ok(_) => None,
                Err(e) => Some((path.clone(), e.to_string())),
            }
        })
        .collect();

    pb.finish_with_message("Done!");

    let converted = files.len() - failures.len();
    println!(
        "\n{} {} of {} files converted to {}",
        "Done!".green().bold(),
        converted,
        files.len(),
        output_dir.display()
    );

    for (path, message) in &failures {
        eprintln!("{} {}: {}", "Failed".red(), path.display(), message);
    }
    if !failures.is_empty() {
        return Err(format!("{} files failed", failures.len()).into());
    }

    Ok(())
}

fn cmd_info(
    input: &Path,
    json: bool,
    options: &ConvertOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = redocx::parse_file_with_authors(input, &options.authors)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!(
        "{}: {}",
        "Title".bold(),
        if doc.title.is_empty() {
            "(none detected)".to_string()
        } else {
            doc.title.clone()
        }
    );
    if let Some(ref author) = doc.author {
        println!("{}: {}", "Author".bold(), author);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = doc.plain_text();
    println!("{}: {}", "Blocks".bold(), doc.block_count());
    println!("{}: {}", "Paragraphs".bold(), doc.paragraph_count());
    println!("{}: {}", "Tables".bold(), doc.table_count());
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());

    Ok(())
}

fn print_report(report: &Conversion) {
    println!(
        "  {} title: {}",
        "├─".dimmed(),
        if report.title.is_empty() {
            "(none detected)".to_string()
        } else {
            report.title.clone()
        }
    );
    if let Some(ref author) = report.author {
        println!("  {} author: {}", "├─".dimmed(), author);
    }
    println!(
        "  {} {} blocks ({} paragraphs, {} tables)",
        "└─".dimmed(),
        report.blocks,
        report.paragraphs,
        report.tables
    );
}

fn cmd_version() {
    println!("{} {}", "redocx".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Word document house-style normalizer");
}
