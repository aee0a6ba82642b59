//! Command Line Interface
//! Argument definitions for the `dotchart` binary.

use crate::config::ChartSettings;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Default file name for `config init`.
pub const DEFAULT_SETTINGS_FILE: &str = "dotchart.json";

#[derive(Parser, Debug)]
#[command(name = "dotchart")]
#[command(author, version, about = "Animated dot charts from CSV files")]
#[command(long_about = "Render scatter and bubble charts from CSV files as SVG or PNG, \
    or explore them in the interactive viewer.\n\n\
    Exit codes:\n  \
    0 - Success\n  \
    2 - Invalid input, settings or I/O error")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Without a subcommand the viewer opens
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive viewer
    View(ViewArgs),

    /// Render one frame of a CSV file as SVG or PNG
    Render(RenderArgs),

    /// Write one animated SVG per frame
    Frames(FramesArgs),

    /// Settings file utilities
    Config(ConfigArgs),
}

#[derive(Args, Debug, Default)]
pub struct ViewArgs {
    /// CSV file to open on startup
    pub csv: Option<PathBuf>,

    /// Settings file to apply on startup
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Data source and column choices shared by the rendering commands.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// CSV file to read
    pub csv: PathBuf,

    /// Settings file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Column for the x position
    #[arg(long)]
    pub x: Option<String>,

    /// Column for the y position
    #[arg(long)]
    pub y: Option<String>,

    /// Column for the dot area
    #[arg(long)]
    pub radius: Option<String>,

    /// Column for the dot color category
    #[arg(long)]
    pub color: Option<String>,

    /// Column identifying a dot across frames
    #[arg(long)]
    pub key: Option<String>,

    /// Column splitting rows into animation frames
    #[arg(long)]
    pub frame: Option<String>,

    /// Chart width in pixels
    #[arg(long)]
    pub width: Option<f64>,

    /// Chart height in pixels
    #[arg(long)]
    pub height: Option<f64>,
}

impl InputArgs {
    /// Overlay the command line choices on loaded settings.
    pub fn apply_overrides(&self, settings: &mut ChartSettings) {
        let columns = &mut settings.columns;
        for (arg, slot) in [
            (&self.x, &mut columns.x),
            (&self.y, &mut columns.y),
            (&self.radius, &mut columns.radius),
            (&self.color, &mut columns.color),
            (&self.key, &mut columns.key),
            (&self.frame, &mut columns.frame),
        ] {
            if arg.is_some() {
                slot.clone_from(arg);
            }
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ImageFormat {
    #[default]
    Svg,
    Png,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Frame label to render (default: the last frame)
    #[arg(long)]
    pub at: Option<String>,

    /// Emit the transition into the frame as SMIL animation (SVG only)
    #[arg(long)]
    pub animated: bool,

    /// Output image format
    #[arg(short, long, value_enum, default_value = "svg")]
    pub format: ImageFormat,

    /// Output file (SVG defaults to stdout; PNG requires a file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct FramesArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory receiving frame_0000.svg, frame_0001.svg, ...
    #[arg(long)]
    pub out_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write the default settings file
    Init {
        /// Output path for the settings file
        #[arg(short, long, default_value = DEFAULT_SETTINGS_FILE)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective settings as JSON
    Show {
        /// Settings file to read (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
