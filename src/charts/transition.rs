//! Transition Module
//! Describes the animated change produced by one render: every element's
//! lifecycle phase with its start and end attributes. Consumers sample the
//! transition over time (live viewer) or encode it (animated SVG).

use crate::charts::axis::Orient;
use crate::charts::dot_chart::Point;
use crate::charts::scene::{lerp, AxisState, DotAttrs, DotState, Margin, Scene, TickState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Opacity of elements that are entering or leaving; zero would stop some
/// renderers from interpolating.
pub const FADED: f64 = 1e-6;

/// Default transition length.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(250);

/// Easing curve applied to normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ease {
    Linear,
    CubicIn,
    CubicOut,
    #[default]
    CubicInOut,
    SinInOut,
}

impl Ease {
    pub const ALL: [Ease; 5] = [
        Ease::Linear,
        Ease::CubicIn,
        Ease::CubicOut,
        Ease::CubicInOut,
        Ease::SinInOut,
    ];

    /// Eased value of `t`, clamped to [0, 1].
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Ease::Linear => t,
            Ease::CubicIn => t * t * t,
            Ease::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Ease::CubicInOut => {
                if t <= 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    0.5 * u * u * u + 1.0
                }
            }
            Ease::SinInOut => (1.0 - (std::f64::consts::PI * t).cos()) / 2.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Ease::Linear => "linear",
            Ease::CubicIn => "cubic-in",
            Ease::CubicOut => "cubic-out",
            Ease::CubicInOut => "cubic-in-out",
            Ease::SinInOut => "sin-in-out",
        }
    }

    /// Equivalent SMIL `keySplines` control points, if the curve has one.
    pub fn key_splines(self) -> Option<&'static str> {
        match self {
            Ease::Linear => None,
            Ease::CubicIn => Some("0.32 0 0.67 0"),
            Ease::CubicOut => Some("0.33 1 0.68 1"),
            Ease::CubicInOut => Some("0.65 0 0.35 1"),
            Ease::SinInOut => Some("0.37 0 0.63 1"),
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ease {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ease::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| format!("unknown easing '{}'", s))
    }
}

/// Lifecycle phase of a bound element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Enter,
    Update,
    Exit,
}

/// A pair of values animated from one to the other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
}

impl<T: Copy> Tween<T> {
    pub fn new(from: T, to: T) -> Self {
        Self { from, to }
    }

    pub fn fixed(value: T) -> Self {
        Self {
            from: value,
            to: value,
        }
    }
}

impl Tween<f64> {
    pub fn at(&self, t: f64) -> f64 {
        lerp(self.from, self.to, t)
    }
}

impl Tween<[f64; 2]> {
    pub fn at(&self, t: f64) -> [f64; 2] {
        [
            lerp(self.from[0], self.to[0], t),
            lerp(self.from[1], self.to[1], t),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DotTransition {
    pub key: String,
    pub datum: Point,
    pub phase: Phase,
    pub from: DotAttrs,
    pub to: DotAttrs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickTransition {
    pub value: f64,
    pub label: String,
    pub phase: Phase,
    pub from_pos: f64,
    pub to_pos: f64,
    pub from_opacity: f64,
    pub to_opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTransition {
    pub orient: Orient,
    pub translate: Tween<[f64; 2]>,
    pub range: Tween<[f64; 2]>,
    pub tick_size: f64,
    pub tick_padding: f64,
    pub ticks: Vec<TickTransition>,
}

impl AxisTransition {
    fn sample(&self, t: f64) -> AxisState {
        let finished = t >= 1.0;
        AxisState {
            orient: self.orient,
            translate: self.translate.at(t),
            range: self.range.at(t),
            tick_size: self.tick_size,
            tick_padding: self.tick_padding,
            ticks: self
                .ticks
                .iter()
                .filter(|tick| !(finished && tick.phase == Phase::Exit))
                .map(|tick| TickState {
                    value: tick.value,
                    label: tick.label.clone(),
                    position: lerp(tick.from_pos, tick.to_pos, t),
                    opacity: lerp(tick.from_opacity, tick.to_opacity, t),
                })
                .collect(),
        }
    }
}

/// Element counts per phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseCounts {
    pub enter: usize,
    pub update: usize,
    pub exit: usize,
}

/// The full animated change from the previous scene to the new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub width: Tween<f64>,
    pub height: Tween<f64>,
    pub margin: Margin,
    pub x_axis: AxisTransition,
    pub y_axis: AxisTransition,
    /// Dots in paint order: exiting dots first, then live dots by descending radius.
    pub dots: Vec<DotTransition>,
    pub duration: Duration,
    pub ease: Ease,
}

impl Transition {
    /// Fraction of the transition completed after `elapsed`, in [0, 1].
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.progress(elapsed) >= 1.0
    }

    /// Scene at normalized time `t`; exiting elements are removed once `t >= 1`.
    pub fn sample(&self, t: f64) -> Scene {
        let finished = t >= 1.0;
        let e = if finished { 1.0 } else { self.ease.apply(t) };

        Scene {
            width: self.width.at(e),
            height: self.height.at(e),
            margin: self.margin,
            x_axis: self.x_axis.sample(e),
            y_axis: self.y_axis.sample(e),
            dots: self
                .dots
                .iter()
                .filter(|dot| !(finished && dot.phase == Phase::Exit))
                .map(|dot| DotState {
                    key: dot.key.clone(),
                    datum: dot.datum.clone(),
                    attrs: dot.from.lerp(&dot.to, e),
                })
                .collect(),
        }
    }

    /// Scene after the transition has completed.
    pub fn end(&self) -> Scene {
        self.sample(1.0)
    }

    /// Scene before the transition starts.
    pub fn start(&self) -> Scene {
        self.sample(0.0)
    }

    pub fn counts(&self) -> PhaseCounts {
        self.dots
            .iter()
            .fold(PhaseCounts::default(), |mut counts, dot| {
                match dot.phase {
                    Phase::Enter => counts.enter += 1,
                    Phase::Update => counts.update += 1,
                    Phase::Exit => counts.exit += 1,
                }
                counts
            })
    }
}
