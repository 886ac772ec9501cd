//! Command-line entry point: `icon-recolor <INPUT> <OUTPUT>`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use icon_recolor::{ConversionProfile, HueBand, IconConverter, ResizeFilter};

/// Convert an image into a multi-size .ico, recoloring a hue band.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Source image (PNG, ICO, BMP, JPEG or GIF).
    input: PathBuf,

    /// Where to write the icon container.
    output: PathBuf,

    /// JSON conversion profile; other flags override its values.
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Comma-separated edge lengths, e.g. 256,128,64.
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<u32>>,

    /// Lower bound of the hue band to replace, in degrees.
    #[arg(long)]
    band_lo: Option<f32>,

    /// Upper bound of the hue band to replace, in degrees.
    #[arg(long)]
    band_hi: Option<f32>,

    /// Substitute hue in degrees.
    #[arg(long)]
    hue: Option<f32>,

    /// Resampling filter.
    #[arg(long, value_parser = parse_filter)]
    filter: Option<ResizeFilter>,

    /// Render sizes one after another instead of concurrently.
    #[arg(long)]
    sequential: bool,

    /// Log progress (same as RUST_LOG=debug).
    #[arg(short, long)]
    verbose: bool,
}

fn parse_filter(value: &str) -> Result<ResizeFilter, String> {
    serde_json::from_value(serde_json::Value::String(value.to_owned()))
        .map_err(|_| "expected nearest, triangle, catmull-rom, gaussian or lanczos3".to_owned())
}

impl Args {
    fn profile(&self) -> icon_recolor::Result<ConversionProfile> {
        let mut profile = match &self.profile {
            Some(path) => ConversionProfile::load(path)?,
            None => ConversionProfile::default(),
        };
        if let Some(sizes) = &self.sizes {
            profile.sizes = sizes.clone();
        }
        let HueBand { lo, hi } = profile.hue_band;
        profile.hue_band = HueBand::new(self.band_lo.unwrap_or(lo), self.band_hi.unwrap_or(hi));
        if let Some(hue) = self.hue {
            profile.substitute_hue = hue;
        }
        if let Some(filter) = self.filter {
            profile.filter = filter;
        }
        if self.sequential {
            profile.parallel = false;
        }
        Ok(profile)
    }
}

fn run(args: &Args) -> icon_recolor::Result<()> {
    let profile = args.profile()?;
    let converter = IconConverter::from_profile(&profile)?;
    converter.convert_file(&args.input, &args.output)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&args) {
        Ok(()) => {
            println!("{}", args.output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("icon-recolor: {err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
