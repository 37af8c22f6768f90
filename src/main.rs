use anyhow::{bail, Context};
use clap::Parser;
use log::LevelFilter;
use pixtone::{
    collect_image_paths, format_file_size, AdjustmentArgs, AdjustmentInput, AdjustmentSet,
    BatchProcessor, Cli, Commands, FormatArg, ImageProcessor, Loader, MetadataProcessor,
    ProcessConfig,
};
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    match cli.command {
        Commands::Preview {
            input,
            output,
            quality,
            adjustments,
        } => process_preview(input, output, quality, &adjustments),
        Commands::Export {
            inputs,
            output_dir,
            quality,
            format,
            suffix,
            threads,
            recursive,
            no_optimize,
            adjustments,
        } => process_export(
            inputs,
            output_dir,
            quality,
            format,
            suffix,
            threads,
            recursive,
            no_optimize,
            &adjustments,
        ),
        Commands::Info { input } => process_info(&input),
    }
}

fn adjustment_set(args: &AdjustmentArgs) -> anyhow::Result<AdjustmentSet> {
    let set = AdjustmentInput::from(args).validate()?;
    log::debug!("Adjustments: {}", set);
    Ok(set)
}

fn process_preview(
    input: PathBuf,
    output: Option<PathBuf>,
    quality: Option<u8>,
    adjustments: &AdjustmentArgs,
) -> anyhow::Result<()> {
    let set = adjustment_set(adjustments)?;

    let mut config = ProcessConfig::default();
    if let Some(quality) = quality {
        config.preview_quality = quality;
    }
    let processor = ImageProcessor::new(config)?;
    let preview = processor.preview(&input, &set)?;

    let output_path = output.unwrap_or_else(|| {
        let dir = input.parent().unwrap_or_else(|| Path::new("."));
        pixtone::generate_output_path(&input, dir, "preview", "jpg")
    });
    std::fs::write(&output_path, &preview.bytes)
        .with_context(|| format!("Failed to write preview to {}", output_path.display()))?;

    println!(
        "Preview saved to: {} ({}x{}, {})",
        output_path.display(),
        preview.width,
        preview.height,
        format_file_size(preview.bytes.len() as u64)
    );

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn process_export(
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    quality: Option<u8>,
    format: FormatArg,
    suffix: String,
    threads: usize,
    recursive: bool,
    no_optimize: bool,
    adjustments: &AdjustmentArgs,
) -> anyhow::Result<()> {
    let set = adjustment_set(adjustments)?;

    let defaults = ProcessConfig::default();
    let config = ProcessConfig {
        export_quality: quality.unwrap_or(defaults.export_quality),
        format: format.into(),
        suffix,
        optimize_png: !no_optimize,
        threads,
        ..defaults
    };
    let batch = BatchProcessor::new(config)?.with_progress(true);

    let mut image_paths = Vec::new();
    for input in &inputs {
        if input.is_dir() {
            image_paths.extend(collect_image_paths(input, recursive));
        } else {
            image_paths.push(input.clone());
        }
    }

    if image_paths.is_empty() {
        log::warn!("No image files found");
        return Ok(());
    }

    let report = batch.export_all(&image_paths, &set, &output_dir)?;

    for (path, err) in report.failed() {
        eprintln!("Failed: {}: {}", path.display(), err);
    }

    println!(
        "Exported {} of {} images to: {} ({} -> {})",
        report.success_count(),
        report.outcomes.len(),
        output_dir.display(),
        format_file_size(report.total_size_before()),
        format_file_size(report.total_size_after())
    );

    if !report.is_complete_success() {
        bail!("{} image(s) failed", report.failure_count());
    }

    Ok(())
}

fn process_info(input: &Path) -> anyhow::Result<()> {
    if !input.exists() {
        bail!("File does not exist: {}", input.display());
    }

    let file_size = std::fs::metadata(input)?.len();
    let (width, height, format) = Loader::new().get_dimensions_and_format(input)?;

    let metadata = MetadataProcessor::new();
    let exif = metadata.read_metadata(input)?;

    println!("=== Image Information ===");
    println!("File: {}", input.display());
    println!("Size: {}", format_file_size(file_size));
    println!("Dimensions: {} x {} pixels", width, height);
    println!("Format: {}", format);
    println!("Has EXIF metadata: {}", exif.is_some());

    if let Some(exif) = exif {
        println!("\n=== EXIF Metadata ===");
        for (label, value) in metadata.extract_common_metadata(&exif) {
            println!("{:25}: {}", label, value);
        }
    }

    Ok(())
}
