//! Data module - CSV loading and record conversion

mod loader;
mod processor;

pub use loader::{DataLoader, LoaderError};
pub use processor::{Cell, DataProcessor, Frame, ProcessorError, Record, Schema, ALL_FRAME};
