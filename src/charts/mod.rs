//! Charts module - Reusable dot chart, scales, axes and output backends

pub mod axis;
pub mod color;
pub mod dot_chart;
pub mod format;
pub mod scale;
pub mod scene;
pub mod svg;
pub mod transition;

mod plotter;
mod renderer;

pub use axis::{Axis, Orient};
pub use color::{Rgb, CATEGORY10};
pub use dot_chart::{ChartTarget, Components, DotChart, Point, ScaleSnapshot};
pub use format::{FormatError, FormatSpec, TickFormat};
pub use plotter::{ScenePlotter, Viewport};
pub use renderer::{RenderError, StaticChartRenderer};
pub use scale::{LinearScale, OrdinalScale, SqrtScale};
pub use scene::{Margin, Scene};
pub use transition::{Ease, Phase, Transition};
