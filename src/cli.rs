// pixtone/src/cli.rs
use crate::core::{AdjustmentInput, Knob, OutputFormat};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pixtone", version, about = "Batch tone and color adjustment for photographs")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render an adjusted preview of one image
    Preview {
        /// Source image
        input: PathBuf,

        /// Where to write the preview (defaults to <stem>_preview.jpg next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JPEG quality for the preview [default: the preview-quality preset]
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: Option<u8>,

        #[command(flatten)]
        adjustments: AdjustmentArgs,
    },

    /// Apply adjustments to images or folders and write the results
    Export {
        /// Image files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory, created if missing
        #[arg(short = 'd', long = "output-dir")]
        output_dir: PathBuf,

        /// Export quality (1-100) [default: the export-quality preset]
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: Option<u8>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = FormatArg::Jpeg)]
        format: FormatArg,

        /// Suffix appended to the file stem
        #[arg(long, default_value = "edited")]
        suffix: String,

        /// Worker threads (1 = sequential, 0 = one per core)
        #[arg(short = 'j', long, default_value_t = 1)]
        threads: usize,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Skip oxipng optimization for PNG output
        #[arg(long)]
        no_optimize: bool,

        #[command(flatten)]
        adjustments: AdjustmentArgs,
    },

    /// Show dimensions, format and EXIF details
    Info {
        /// Image file
        input: PathBuf,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct AdjustmentArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub brightness: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    pub exposure: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    pub contrast: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    pub highlights: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    pub shadows: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    pub vignette: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    pub saturation: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    pub warmth: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    pub tint: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    pub sharpness: Option<f32>,

    /// Extra adjustments as name=value, e.g. --set shadows=-20
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub pairs: Vec<String>,
}

impl From<&AdjustmentArgs> for AdjustmentInput {
    fn from(args: &AdjustmentArgs) -> Self {
        let input = AdjustmentInput::new()
            .set_opt(Knob::Brightness, args.brightness)
            .set_opt(Knob::Exposure, args.exposure)
            .set_opt(Knob::Contrast, args.contrast)
            .set_opt(Knob::Highlights, args.highlights)
            .set_opt(Knob::Shadows, args.shadows)
            .set_opt(Knob::Vignette, args.vignette)
            .set_opt(Knob::Saturation, args.saturation)
            .set_opt(Knob::Warmth, args.warmth)
            .set_opt(Knob::Tint, args.tint)
            .set_opt(Knob::Sharpness, args.sharpness);

        args.pairs
            .iter()
            .fold(input, |input, pair| input.parse_pair(pair))
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Jpeg,
    Png,
    Webp,
    Same,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Webp => OutputFormat::WebP,
            FormatArg::Same => OutputFormat::SameAsInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_negative_knob_values() {
        let cli = Cli::try_parse_from([
            "pixtone", "export", "a.jpg", "-d", "out", "--shadows", "-30", "--set", "tint=-5",
        ])
        .unwrap();

        let Commands::Export { adjustments, .. } = cli.command else {
            panic!("expected export");
        };
        let set = AdjustmentInput::from(&adjustments).validate().unwrap();
        assert_eq!(set.get(Knob::Shadows), -30.0);
        assert_eq!(set.get(Knob::Tint), -5.0);
        assert_eq!(set.get(Knob::Brightness), 0.0);
    }

    #[test]
    fn export_requires_output_dir() {
        assert!(Cli::try_parse_from(["pixtone", "export", "a.jpg"]).is_err());
    }

    #[test]
    fn omitted_quality_defers_to_presets() {
        let cli = Cli::try_parse_from(["pixtone", "export", "a.jpg", "-d", "out"]).unwrap();
        let Commands::Export { quality, .. } = cli.command else {
            panic!("expected export");
        };
        assert_eq!(quality, None);

        let cli = Cli::try_parse_from(["pixtone", "preview", "a.jpg", "-q", "70"]).unwrap();
        let Commands::Preview { quality, .. } = cli.command else {
            panic!("expected preview");
        };
        assert_eq!(quality, Some(70));
    }

    #[test]
    fn quality_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["pixtone", "preview", "a.jpg", "-q", "0"]).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
