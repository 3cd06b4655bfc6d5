//! Command-line interface for generating images from samples or tile catalogs

use crate::algorithm::executor::{Collapse, time_seed};
use crate::algorithm::model::{Model, Outcome};
use crate::algorithm::overlapping::{OverlappingConfig, OverlappingModel};
use crate::algorithm::tiled::{TiledConfig, TiledModel};
use crate::io::configuration::{
    DEFAULT_ATTEMPTS, DEFAULT_OUTPUT_SIZE, DEFAULT_PATTERN_SIZE, DEFAULT_SYMMETRY,
    DEFAULT_TILED_OUTPUT_SIZE, GIF_FRAME_DELAY_MS, OUTPUT_SUFFIX, VISUALIZATION_INTERVAL,
};
use crate::io::error::{Result, WfcError, invalid_parameter};
use crate::io::image::{export_pixel_grid_as_png, load_sample};
use crate::io::progress::GenerationProgress;
use crate::io::tileset::load_tileset;
use crate::io::visualization::FrameCapture;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "wavecollapse")]
#[command(
    author,
    version,
    about = "Generate images by wave function collapse"
)]
/// Command-line arguments shared by both models
pub struct Cli {
    /// Model to run
    #[command(subcommand)]
    pub command: Command,

    /// Random seed for reproducible generation; the clock is used when absent
    #[arg(short, long, global = true)]
    pub seed: Option<u64>,

    /// Maximum observations per attempt; runs to completion when absent
    #[arg(short, long, global = true)]
    pub iterations: Option<usize>,

    /// Attempts before giving up on contradictions, each with the next seed
    #[arg(short, long, global = true, default_value_t = DEFAULT_ATTEMPTS)]
    pub attempts: usize,

    /// Output PNG path; defaults to the input name with a suffix
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Also write an animated GIF of the generation
    #[arg(short, long, global = true)]
    pub visualize: bool,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available models
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Overlapping model driven by a sample image
    Overlapping(OverlappingArgs),
    /// Tiled model driven by a JSON tile catalog
    Tiled(TiledArgs),
}

/// Arguments of the overlapping model
#[derive(Args, Debug)]
// Each boolean maps to an independent model switch
#[allow(clippy::struct_excessive_bools)]
pub struct OverlappingArgs {
    /// Sample image
    #[arg(value_name = "SAMPLE")]
    pub sample: PathBuf,

    /// Output width in pixels
    #[arg(short = 'w', long, default_value_t = DEFAULT_OUTPUT_SIZE)]
    pub width: usize,

    /// Output height in pixels
    #[arg(short = 'H', long, default_value_t = DEFAULT_OUTPUT_SIZE)]
    pub height: usize,

    /// Pattern side length
    #[arg(short = 'N', long, default_value_t = DEFAULT_PATTERN_SIZE)]
    pub pattern_size: usize,

    /// Dihedral variants kept per sample position (1 to 8)
    #[arg(long, default_value_t = DEFAULT_SYMMETRY)]
    pub symmetry: usize,

    /// Whether sample windows wrap around the sample edges
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub periodic_input: bool,

    /// Whether the output tiles seamlessly
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub periodic_output: bool,

    /// Pin the sample's bottom row pattern along the output's bottom row
    #[arg(short, long)]
    pub ground: bool,
}

impl OverlappingArgs {
    /// Model configuration described by these arguments
    pub const fn config(&self) -> OverlappingConfig {
        OverlappingConfig {
            pattern_size: self.pattern_size,
            width: self.width,
            height: self.height,
            periodic_input: self.periodic_input,
            periodic_output: self.periodic_output,
            symmetry: self.symmetry,
            ground: self.ground,
        }
    }
}

/// Arguments of the tiled model
#[derive(Args, Debug)]
pub struct TiledArgs {
    /// Tile catalog document
    #[arg(value_name = "TILESET")]
    pub tileset: PathBuf,

    /// Output width in tiles
    #[arg(short = 'w', long, default_value_t = DEFAULT_TILED_OUTPUT_SIZE)]
    pub width: usize,

    /// Output height in tiles
    #[arg(short = 'H', long, default_value_t = DEFAULT_TILED_OUTPUT_SIZE)]
    pub height: usize,

    /// Whether the output wraps around its edges
    #[arg(short, long)]
    pub periodic: bool,
}

impl TiledArgs {
    /// Model configuration described by these arguments
    pub const fn config(&self) -> TiledConfig {
        TiledConfig {
            width: self.width,
            height: self.height,
            periodic: self.periodic,
        }
    }
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Input file named by the subcommand
    pub fn input(&self) -> &Path {
        match &self.command {
            Command::Overlapping(args) => &args.sample,
            Command::Tiled(args) => &args.tileset,
        }
    }

    /// Where the rendered PNG is written
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(self.input()))
    }
}

/// `<dir>/<stem>_wfc.png` next to the input
pub fn default_output_path(input_path: &Path) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let output_name = format!("{}{OUTPUT_SUFFIX}.png", stem.to_string_lossy());

    if let Some(parent) = input_path.parent() {
        parent.join(output_name)
    } else {
        PathBuf::from(output_name)
    }
}

/// GIF path written alongside an output PNG
pub fn visualization_path(output_path: &Path) -> PathBuf {
    output_path.with_extension("gif")
}

/// Seed used by a one-based attempt number
pub const fn seed_for_attempt(base: u64, attempt: usize) -> u64 {
    base.wrapping_add(attempt.saturating_sub(1) as u64)
}

/// Runs one generation described by the command line
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for parsed arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Build the selected model, generate and write the outputs
    ///
    /// Returns the path of the written PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input cannot be loaded or describes an invalid model
    /// - Every attempt ends in a contradiction
    /// - An output file cannot be written
    pub fn run(&self) -> Result<PathBuf> {
        if self.cli.attempts == 0 {
            return Err(invalid_parameter(
                "attempts",
                &self.cli.attempts,
                &"at least one attempt is required",
            ));
        }

        let label = self
            .cli
            .input()
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        match &self.cli.command {
            Command::Overlapping(args) => {
                let sample = load_sample(&args.sample)?;
                let model = OverlappingModel::new(&sample, &args.config())?;
                self.generate(model, &label)
            }
            Command::Tiled(args) => {
                let tileset = load_tileset(&args.tileset)?;
                let model = TiledModel::new(&tileset, &args.config())?;
                self.generate(model, &label)
            }
        }
    }

    // Allow print for user feedback on retries and written files
    #[allow(clippy::print_stderr)]
    fn generate<M: Model>(&self, model: M, label: &str) -> Result<PathBuf> {
        let mut engine = Collapse::new(model);
        let (width, height) = engine.state.dimensions;
        let base_seed = self.cli.seed.unwrap_or_else(time_seed);
        let output_path = self.cli.output_path();

        let progress = if self.cli.should_show_progress() {
            GenerationProgress::new(width * height, label)
        } else {
            GenerationProgress::hidden()
        };
        let mut capture = self
            .cli
            .visualize
            .then(|| FrameCapture::new(VISUALIZATION_INTERVAL));

        for attempt in 1..=self.cli.attempts {
            let seed = seed_for_attempt(base_seed, attempt);
            engine.set_seed(seed);
            engine.clear();
            progress.reset();
            if let Some(capture) = capture.as_mut() {
                capture.clear();
            }

            let outcome = self.drive(&mut engine, &progress, capture.as_mut(), attempt);

            if outcome == Outcome::Contradiction {
                if !self.cli.quiet {
                    eprintln!("Contradiction with seed {seed} (attempt {attempt})");
                }
                continue;
            }

            progress.finish(outcome);
            export_pixel_grid_as_png(&engine.render(), &output_path)?;

            if let Some(capture) = capture.as_ref() {
                capture.export_gif(&visualization_path(&output_path), GIF_FRAME_DELAY_MS)?;
            }

            if !self.cli.quiet {
                if outcome == Outcome::Incomplete {
                    eprintln!(
                        "Stopped after {} iterations with cells still open",
                        engine.iteration
                    );
                }
                eprintln!("Wrote {} (seed {seed})", output_path.display());
            }
            return Ok(output_path);
        }

        progress.finish(Outcome::Contradiction);
        Err(WfcError::GenerationFailed {
            attempts: self.cli.attempts,
        })
    }

    fn drive<M: Model>(
        &self,
        engine: &mut Collapse<M>,
        progress: &GenerationProgress,
        mut capture: Option<&mut FrameCapture>,
        attempt: usize,
    ) -> Outcome {
        if let Some(capture) = capture.as_deref_mut() {
            capture.record(engine.render());
        }

        loop {
            if self
                .cli
                .iterations
                .is_some_and(|limit| engine.iteration >= limit)
            {
                break;
            }

            let finished = engine.iterate_once();
            progress.update(engine.state.collapsed_count(), attempt);

            if let Some(capture) = capture.as_deref_mut() {
                if finished {
                    capture.record(engine.render());
                } else {
                    capture.record_at(engine.iteration, || engine.render());
                }
            }

            if finished {
                break;
            }
        }

        engine.outcome()
    }
}
