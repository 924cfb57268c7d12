//! pdftag CLI - tagging template generation from layout detections

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdftag::{JsonFormat, TagNode, TagOptions, TemplateFileWriter};

#[derive(Parser)]
#[command(name = "pdftag")]
#[command(version)]
#[command(about = "Generate PDF tagging templates from layout detection dumps", long_about = None)]
struct Cli {
    /// Input detection dump (JSON)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output template file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a tagging template from a detection dump
    Template {
        /// Input detection dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Confidence threshold below which detections are dropped
        #[arg(long, default_value = "0.3")]
        threshold: f32,

        /// Zoom factor the page images were rendered at
        #[arg(long, default_value = "2.0")]
        zoom: f32,

        /// IoU above which same-class detections are merged
        #[arg(long, default_value = "0.5")]
        merge_iou: f32,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Process pages sequentially
        #[arg(long)]
        sequential: bool,
    },

    /// Show tag structure statistics for a detection dump
    Info {
        /// Input detection dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Confidence threshold below which detections are dropped
        #[arg(long, default_value = "0.3")]
        threshold: f32,

        /// Zoom factor the page images were rendered at
        #[arg(long, default_value = "2.0")]
        zoom: f32,

        /// Limit output to one page (0-based)
        #[arg(long, value_name = "INDEX")]
        page: Option<usize>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Template {
            input,
            output,
            threshold,
            zoom,
            merge_iou,
            compact,
            sequential,
        }) => cmd_template(
            &input,
            output.as_deref(),
            threshold,
            zoom,
            merge_iou,
            compact,
            sequential,
        ),
        Some(Commands::Info {
            input,
            threshold,
            zoom,
            page,
        }) => cmd_info(&input, threshold, zoom, page),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: generate a template if input is provided
            if let Some(input) = cli.input {
                let defaults = TagOptions::default();
                cmd_template(
                    &input,
                    cli.output.as_deref(),
                    defaults.threshold,
                    defaults.zoom,
                    defaults.merge_iou,
                    false,
                    false,
                )
            } else {
                println!("{}", "Usage: pdftag <FILE> [OUTPUT]".yellow());
                println!("       pdftag --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_options(threshold: f32, zoom: f32, merge_iou: f32, sequential: bool) -> TagOptions {
    let mut options = TagOptions::new()
        .with_threshold(threshold)
        .with_zoom(zoom)
        .with_merge_iou(merge_iou);
    if sequential {
        options = options.sequential();
    }
    options
}

fn cmd_template(
    input: &Path,
    output: Option<&Path>,
    threshold: f32,
    zoom: f32,
    merge_iou: f32,
    compact: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(threshold, zoom, merge_iou, sequential);
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Reading detections...");
    let data = fs::read(input)?;
    pb.inc(1);

    pb.set_message("Building tag structure...");
    let doc = pdftag::tag_dump_bytes_with_options(&data, &options)?;
    pb.inc(1);

    pb.set_message("Writing template...");
    if let Some(path) = output {
        pdftag::TagWriter::write(
            &TemplateFileWriter::new(path).with_format(format),
            &doc,
        )?;
        pb.inc(1);
        pb.finish_with_message("Done!");
        println!(
            "{} {} ({} pages, {} tags)",
            "Saved to".green(),
            path.display(),
            doc.page_count(),
            doc.tag_count()
        );
    } else {
        let json = pdftag::template::to_template_json(&doc, format)?;
        pb.inc(1);
        pb.finish_and_clear();
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(
    input: &Path,
    threshold: f32,
    zoom: f32,
    page: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let options = build_options(threshold, zoom, TagOptions::default().merge_iou, false);
    let doc = pdftag::tag_dump_bytes_with_options(&data, &options)?;

    let pages: Vec<&pdftag::TaggedPage> = match page {
        Some(index) => vec![doc.require_page(index)?],
        None => doc.pages.iter().collect(),
    };

    println!("{}", "Tag Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Tags".bold(), doc.tag_count());

    for page in &pages {
        println!(
            "  {} page {} ({}x{} pt): {} tags",
            "├─".dimmed(),
            page.info.index,
            page.info.width,
            page.info.height,
            page.tag_count()
        );
    }

    println!();
    println!("{}", "Tag Classes".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for page in &pages {
        count_classes(&page.root, &mut counts);
    }
    for (label, count) in counts {
        println!("{}: {}", label.bold(), count);
    }

    Ok(())
}

fn count_classes(node: &TagNode, counts: &mut BTreeMap<&'static str, usize>) {
    for child in &node.children {
        *counts.entry(child.class.as_str()).or_insert(0) += 1;
        count_classes(child, counts);
    }
}

fn cmd_version() {
    println!("{} {}", "pdftag".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF tagging template generator");
    println!();
    println!("License: MIT");
}
