//! Demo launcher for `rdh-rs`: hide a payload file in a grayscale PNG and
//! get both the payload and the pristine cover back out.
//!
//! ```text
//! cargo run --example rdh-demo -- embed cover.png secret.bin marked.png --iterations 16
//! cargo run --example rdh-demo -- extract marked.png --cover-out recovered.png --payload-out secret.bin
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use rdh_core::prelude::*;

#[derive(Parser)]
#[command(name = "rdh-demo", about = "Reversible data hiding demo")]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Embed a payload file into a cover image
	Embed {
		/// Cover image (any format `image` can read; converted to 8-bit gray)
		cover: PathBuf,

		/// File whose bytes are embedded
		payload: PathBuf,

		/// Where to write the marked image
		output: PathBuf,

		/// Embedding iterations to run
		#[arg(long, default_value_t = 8)]
		iterations: usize,

		/// Embedding algorithm
		#[arg(long, value_enum, default_value_t = Algorithm::Unidirectional)]
		algorithm: Algorithm,
	},

	/// Recover the cover image and payload from a marked image
	Extract {
		/// Marked image produced by `embed`
		marked: PathBuf,

		/// Where to write the recovered cover image
		#[arg(long)]
		cover_out: Option<PathBuf>,

		/// Where to write the recovered payload bytes
		#[arg(long)]
		payload_out: Option<PathBuf>,

		/// Algorithm the image was embedded with
		#[arg(long, value_enum, default_value_t = Algorithm::Unidirectional)]
		algorithm: Algorithm,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
	/// Peak/zero histogram shifting
	Unidirectional,
	/// Histogram shifting with brightness-preserving peak selection
	Brightness,
	/// Range scaling, plain residual order
	Scaling,
	/// Range scaling, value-ordered residuals
	ScalingValueOrdered,
	/// Range scaling, variable-width residual groups
	ScalingVariableBits,
}

impl std::fmt::Display for Algorithm {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Algorithm::Unidirectional => "unidirectional",
			Algorithm::Brightness => "brightness",
			Algorithm::Scaling => "scaling",
			Algorithm::ScalingValueOrdered => "scaling-value-ordered",
			Algorithm::ScalingVariableBits => "scaling-variable-bits",
		};
		write!(f, "{name}")
	}
}

impl Algorithm {
	fn residual_mode(self) -> Option<ResidualMode> {
		match self {
			Algorithm::Scaling => Some(ResidualMode::Plain),
			Algorithm::ScalingValueOrdered => Some(ResidualMode::ValueOrdered),
			Algorithm::ScalingVariableBits => Some(ResidualMode::variable_bits()),
			Algorithm::Unidirectional | Algorithm::Brightness => None,
		}
	}
}

fn load_raster(path: &Path) -> Result<Raster> {
	let gray = image::open(path)
		.with_context(|| format!("cannot read image {}", path.display()))?
		.to_luma8();
	let (width, height) = gray.dimensions();
	Ok(Raster::new(width as usize, height as usize, gray.into_raw())?)
}

fn save_raster(raster: &Raster, path: &Path) -> Result<()> {
	let gray = image::GrayImage::from_raw(
		raster.width() as u32,
		raster.height() as u32,
		raster.pixels().to_vec(),
	)
	.context("raster shape does not form an image buffer")?;
	gray.save(path)
		.with_context(|| format!("cannot write image {}", path.display()))
}

fn embed(
	cover: &Path,
	payload: &Path,
	output: &Path,
	iterations: usize,
	algorithm: Algorithm,
) -> Result<()> {
	let raster = load_raster(cover)?;
	let data = std::fs::read(payload)
		.with_context(|| format!("cannot read payload {}", payload.display()))?;

	info!(
		"embedding {} payload bytes into {}x{} cover",
		data.len(),
		raster.width(),
		raster.height()
	);

	let embedded = match algorithm.residual_mode() {
		Some(mode) => ScalingEmbedder::new(raster, &data, mode).embed(iterations)?,
		None => {
			let embedder = match algorithm {
				Algorithm::Brightness => {
					UnidirectionEmbedder::brightness_preserving(raster, &data)
				}
				_ => UnidirectionEmbedder::new(raster, &data),
			};
			embedder.embed(iterations)?
		}
	};

	save_raster(&embedded.image, output)?;
	println!(
		"{}",
		serde_json::json!({
			"marked": output.display().to_string(),
			"iterations": embedded.iterations,
			"pure_payload_bits": embedded.pure_payload_bits,
			"payload_bits": data.len() * 8,
		})
	);
	Ok(())
}

fn extract(
	marked: &Path,
	cover_out: Option<&Path>,
	payload_out: Option<&Path>,
	algorithm: Algorithm,
) -> Result<()> {
	let raster = load_raster(marked)?;

	let outcome = match algorithm.residual_mode() {
		Some(mode) => ScalingExtractor::new(mode).extract(&raster)?,
		None => UnidirectionExtractor::new().extract(&raster)?,
	};

	info!(
		"extracted {} payload bytes over {} iterations",
		outcome.payload.len(),
		outcome.iterations
	);

	if let Some(path) = cover_out {
		save_raster(&outcome.image, path)?;
	}
	if let Some(path) = payload_out {
		std::fs::write(path, &outcome.payload)
			.with_context(|| format!("cannot write payload {}", path.display()))?;
	}

	println!(
		"{}",
		serde_json::json!({
			"iterations": outcome.iterations,
			"payload_bytes": outcome.payload.len(),
		})
	);
	Ok(())
}

fn main() -> Result<()> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Embed {
			cover,
			payload,
			output,
			iterations,
			algorithm,
		} => embed(&cover, &payload, &output, iterations, algorithm),
		Command::Extract {
			marked,
			cover_out,
			payload_out,
			algorithm,
		} => extract(
			&marked,
			cover_out.as_deref(),
			payload_out.as_deref(),
			algorithm,
		),
	}
}
