//! Frame Playback
//! Drives a record chart through the frames of a data set, one render per
//! step, so that every transition starts from the frame shown before it.

use crate::charts::{ChartTarget, DotChart, Transition};
use crate::config::{ChartSettings, ConfigError};
use crate::data::{DataLoader, DataProcessor, Frame, LoaderError, ProcessorError, Record, Schema};
use polars::prelude::DataFrame;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Unknown frame '{0}'")]
    UnknownFrame(String),
    #[error("No frames to render")]
    NoFrames,
}

pub struct Playback {
    chart: DotChart<Record>,
    schema: Schema,
    frames: Vec<Frame>,
    target: ChartTarget,
    current: Option<usize>,
}

impl Playback {
    pub fn new(chart: DotChart<Record>, schema: Schema, frames: Vec<Frame>) -> Self {
        Self {
            chart,
            schema,
            frames,
            target: ChartTarget::new(),
            current: None,
        }
    }

    /// Convert a loaded DataFrame and prepare its frames for `settings`.
    pub fn from_dataframe(df: &DataFrame, settings: &ChartSettings) -> Result<Self, PlaybackError> {
        let (schema, records) = DataProcessor::to_records(df)?;
        let frames = DataProcessor::split_frames(&schema, &records, settings.frame_column())?;
        let chart = settings.build_chart(&schema)?;
        log::info!("Prepared {} frames from {} records", frames.len(), records.len());
        Ok(Self::new(chart, schema, frames))
    }

    pub fn load_csv(path: impl AsRef<Path>, settings: &ChartSettings) -> Result<Self, PlaybackError> {
        let mut loader = DataLoader::new();
        let df = loader.load_csv(path)?;
        Self::from_dataframe(df, settings)
    }

    pub fn chart(&self) -> &DotChart<Record> {
        &self.chart
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the frame on screen, if any frame was rendered yet.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn target(&self) -> &ChartTarget {
        &self.target
    }

    pub fn frame_index(&self, label: &str) -> Result<usize, PlaybackError> {
        self.frames
            .iter()
            .position(|f| f.label == label)
            .ok_or_else(|| PlaybackError::UnknownFrame(label.to_string()))
    }

    /// Render frame `index` directly, transitioning from whatever is shown.
    pub fn show(&mut self, index: usize) -> Option<Transition> {
        let frame = self.frames.get(index)?;
        let transition = self.chart.render(&mut self.target, &frame.records);
        self.current = Some(index);
        Some(transition)
    }

    /// Render the frame after the current one; `None` at the end.
    pub fn advance(&mut self) -> Option<Transition> {
        let next = self.current.map_or(0, |i| i + 1);
        self.show(next)
    }

    /// Render every frame from the current position up to `index` and return
    /// the last transition. Seeking backwards renders `index` directly.
    pub fn play_to(&mut self, index: usize) -> Result<Transition, PlaybackError> {
        if index >= self.frames.len() {
            return Err(PlaybackError::NoFrames);
        }
        match self.current {
            Some(current) if current >= index => {
                return self.show(index).ok_or(PlaybackError::NoFrames);
            }
            _ => {}
        }

        let mut last = None;
        while self.current.map_or(true, |i| i < index) {
            last = self.advance();
        }
        last.ok_or(PlaybackError::NoFrames)
    }

    /// Forget what was shown; the next render starts from an empty target.
    pub fn reset(&mut self) {
        self.target.clear();
        self.current = None;
    }
}
