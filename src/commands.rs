//! Command Runners
//! Implementations of the `render`, `frames` and `config` subcommands.

use crate::charts::{svg, StaticChartRenderer};
use crate::cli::{ConfigAction, ConfigArgs, FramesArgs, ImageFormat, InputArgs, RenderArgs};
use crate::config::ChartSettings;
use crate::playback::{Playback, PlaybackError};
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Settings from `path`, or the defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<ChartSettings> {
    match path {
        Some(path) => ChartSettings::load(path)
            .with_context(|| format!("Failed to read settings {}", path.display())),
        None => Ok(ChartSettings::default()),
    }
}

fn prepare(input: &InputArgs) -> Result<Playback> {
    let mut settings = load_settings(input.config.as_deref())?;
    input.apply_overrides(&mut settings);
    Playback::load_csv(&input.csv, &settings)
        .with_context(|| format!("Cannot chart {}", input.csv.display()))
}

pub fn run_render(args: &RenderArgs) -> Result<()> {
    let mut playback = prepare(&args.input)?;
    if playback.is_empty() {
        return Err(PlaybackError::NoFrames.into());
    }

    let index = match &args.at {
        Some(label) => playback.frame_index(label)?,
        None => playback.len() - 1,
    };
    let transition = playback.play_to(index)?;
    let counts = transition.counts();
    log::info!(
        "Frame '{}': {} entering, {} updating, {} exiting",
        playback.frames()[index].label,
        counts.enter,
        counts.update,
        counts.exit
    );

    match args.format {
        ImageFormat::Svg => {
            let document = if args.animated {
                svg::render_transition(&transition)
            } else {
                svg::render_scene(&transition.end())
            };
            match &args.output {
                Some(path) => {
                    fs::write(path, document)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(document.as_bytes())?;
                    stdout.flush()?;
                }
            }
        }
        ImageFormat::Png => {
            let Some(path) = &args.output else {
                bail!("PNG output requires --output");
            };
            if args.animated {
                log::warn!("--animated has no effect on PNG output");
            }
            StaticChartRenderer::save_png(&transition.end(), path)
                .with_context(|| format!("Failed to render {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

pub fn run_frames(args: &FramesArgs) -> Result<()> {
    let mut playback = prepare(&args.input)?;
    if playback.is_empty() {
        return Err(PlaybackError::NoFrames.into());
    }

    // Renders must run in order, serialization need not.
    let transitions: Vec<_> = std::iter::from_fn(|| playback.advance()).collect();

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;
    transitions
        .par_iter()
        .enumerate()
        .try_for_each(|(i, transition)| {
            let path = args.out_dir.join(format!("frame_{:04}.svg", i));
            fs::write(&path, svg::render_transition(transition))
                .with_context(|| format!("Failed to write {}", path.display()))
        })?;

    println!(
        "Wrote {} frames to {}",
        transitions.len(),
        args.out_dir.display()
    );
    Ok(())
}

pub fn run_config(args: &ConfigArgs) -> Result<()> {
    match &args.action {
        ConfigAction::Init { output, force } => {
            if output.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    output.display()
                );
            }
            ChartSettings::default().save(output)?;
            println!("Created settings file {}", output.display());
        }
        ConfigAction::Show { config } => {
            let settings = load_settings(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }
    Ok(())
}
