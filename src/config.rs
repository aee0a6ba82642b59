//! Chart Settings
//! JSON-backed chart configuration shared by the CLI and the viewer, and the
//! mapping from CSV columns onto dot chart accessors.

use crate::charts::color::{ColorParseError, Rgb};
use crate::charts::format::{FormatError, TickFormat};
use crate::charts::scale::OrdinalScale;
use crate::charts::scene::Margin;
use crate::charts::transition::{Ease, DEFAULT_DURATION};
use crate::charts::DotChart;
use crate::data::{Record, Schema};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
    #[error("No numeric column available for {0}")]
    NoNumericColumn(&'static str),
    #[error("Invalid tick format: {0}")]
    TickFormat(#[from] FormatError),
    #[error(transparent)]
    Color(#[from] ColorParseError),
    #[error("Chart size must be positive, got {0}x{1}")]
    InvalidSize(f64, f64),
}

/// Which CSV column feeds each encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSettings {
    /// Defaults to the first numeric column.
    pub x: Option<String>,
    /// Defaults to the first numeric column other than x.
    pub y: Option<String>,
    pub radius: Option<String>,
    pub color: Option<String>,
    pub key: Option<String>,
    pub frame: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub duration_ms: u64,
    pub ease: Ease,
    pub columns: ColumnSettings,
    pub x_domain: Option<[f64; 2]>,
    pub y_domain: Option<[f64; 2]>,
    pub x_ticks: usize,
    pub y_ticks: usize,
    pub x_tick_format: Option<String>,
    pub y_tick_format: Option<String>,
    /// Hex colors for the color scale; empty uses category10.
    pub palette: Vec<String>,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
            margin: Margin::default(),
            duration_ms: DEFAULT_DURATION.as_millis() as u64,
            ease: Ease::default(),
            columns: ColumnSettings::default(),
            x_domain: None,
            y_domain: None,
            x_ticks: 10,
            y_ticks: 10,
            x_tick_format: None,
            y_tick_format: None,
            palette: Vec::new(),
        }
    }
}

impl ChartSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&text)?;
        log::info!("Loaded chart settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        std::fs::write(path, text)?;
        log::info!("Saved chart settings to {}", path.display());
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn frame_column(&self) -> Option<&str> {
        self.columns.frame.as_deref()
    }

    /// Column indices for x and y, falling back to the numeric columns.
    pub fn position_columns(&self, schema: &Schema) -> Result<(usize, usize), ConfigError> {
        let numeric = schema.numeric_columns();

        let x = match &self.columns.x {
            Some(name) => column(schema, name)?,
            None => numeric
                .first()
                .and_then(|name| schema.index_of(name))
                .ok_or(ConfigError::NoNumericColumn("x"))?,
        };
        let y = match &self.columns.y {
            Some(name) => column(schema, name)?,
            None => numeric
                .iter()
                .filter_map(|name| schema.index_of(name))
                .find(|&i| i != x)
                .ok_or(ConfigError::NoNumericColumn("y"))?,
        };
        Ok((x, y))
    }

    /// Build a dot chart whose accessors read the configured columns of `schema`.
    pub fn build_chart(&self, schema: &Schema) -> Result<DotChart<Record>, ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::InvalidSize(self.width, self.height));
        }

        let (x, y) = self.position_columns(schema)?;
        let mut chart = DotChart::with_position(
            move |d: &Record, _| d.number(x),
            move |d: &Record, _| d.number(y),
        );

        if let Some(name) = &self.columns.radius {
            let r = column(schema, name)?;
            chart.set_radius(move |d: &Record, _| d.number(r));
        }
        if let Some(name) = &self.columns.color {
            let z = column(schema, name)?;
            chart.set_color(move |d: &Record, _| d.text(z));
        }
        if let Some(name) = &self.columns.key {
            let k = column(schema, name)?;
            chart.set_key(move |d: &Record, _| d.text(k));
        }

        chart
            .set_width(self.width)
            .set_height(self.height)
            .set_margin(self.margin)
            .set_duration(self.duration())
            .set_ease(self.ease)
            .set_x_domain(self.x_domain)
            .set_y_domain(self.y_domain)
            .set_x_ticks(self.x_ticks)
            .set_y_ticks(self.y_ticks)
            .set_x_tick_format(parse_format(self.x_tick_format.as_deref())?)
            .set_y_tick_format(parse_format(self.y_tick_format.as_deref())?);

        if !self.palette.is_empty() {
            let colors = self
                .palette
                .iter()
                .map(|hex| hex.parse::<Rgb>())
                .collect::<Result<Vec<_>, _>>()?;
            chart.set_color_scale(OrdinalScale::with_range(colors));
        }

        log::debug!(
            "Chart columns: x={} y={}",
            schema.names()[x],
            schema.names()[y]
        );
        Ok(chart)
    }
}

fn column(schema: &Schema, name: &str) -> Result<usize, ConfigError> {
    schema
        .index_of(name)
        .ok_or_else(|| ConfigError::UnknownColumn(name.to_string()))
}

fn parse_format(spec: Option<&str>) -> Result<Option<TickFormat>, ConfigError> {
    Ok(spec.map(TickFormat::parse).transpose()?)
}
