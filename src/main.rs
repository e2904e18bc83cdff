use biasplot::{Config, GrayscaleField, Pipeline};
use clap::Parser;
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The original image, shown as "Reality".
    original: PathBuf,

    /// The stippled rendering of the original image.
    stippled: PathBuf,

    /// The path to save the figure.
    #[arg(short, long, default_value = "statistics_meme.png")]
    output: PathBuf,

    /// A JSON file with default options. flags below take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// The letter cut out of the stippled image.
    #[arg(long)]
    letter: Option<char>,

    /// The letter's em size as a fraction of the smaller image side.
    #[arg(long)]
    font_size_ratio: Option<f32>,

    /// Mask samples below this value remove stipples.
    #[arg(long, allow_negative_numbers = true)]
    threshold: Option<f32>,

    #[arg(long)]
    dpi: Option<u32>,

    /// Background color, any CSS color name or hex code such as #d3d3d3.
    #[arg(long)]
    background: Option<String>,

    /// A font file to try before the configured candidates. may be repeated.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<(Config, PathBuf, PathBuf, PathBuf)> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };

        if let Some(letter) = self.letter {
            config.letter = letter;
        }
        if let Some(ratio) = self.font_size_ratio {
            config.font_size_ratio = ratio;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(dpi) = self.dpi {
            config.dpi = dpi;
        }
        if let Some(background) = self.background {
            config.background_color = background;
        }
        // fonts given on the command line are tried first
        config.font_candidates = self
            .fonts
            .into_iter()
            .chain(config.font_candidates)
            .collect();

        Ok((config, self.original, self.stippled, self.output))
    }
}

fn load_field(path: &Path) -> Result<GrayscaleField> {
    log::debug!("Loading image: {:?}", path);
    let image = image::open(path).map_err(|e| format!("Failed to open {:?}: {}", path, e))?;
    Ok(GrayscaleField::from_dynamic(&image))
}

fn main() -> Result<()> {
    env_logger::init();
    let (config, original, stippled, output) = Args::parse().into_config()?;

    let original = load_field(&original)?;
    let stippled = load_field(&stippled)?;

    let report = Pipeline::new(config)?.run(&original, &stippled, &output)?;

    log::info!(
        "Removed {} of {} stipples",
        report.removed_ink_samples,
        report.total_ink_samples
    );
    println!(
        "removed {} of {} stipples ({:.1}%)",
        report.removed_ink_samples,
        report.total_ink_samples,
        100. * report.removal_ratio()
    );

    Ok(())
}
