//! Scene Module
//! A static picture of a rendered chart: svg size, axes and dots in draw order.
//! Scenes are what transitions produce when sampled and what every output
//! backend (SVG, PNG, egui) draws.

use crate::charts::axis::Orient;
use crate::charts::color::Rgb;
use crate::charts::dot_chart::Point;
use serde::{Deserialize, Serialize};

/// Space between the svg border and the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        // Half-pixel offsets keep 1px axis lines crisp
        Self {
            top: 19.5,
            right: 19.5,
            bottom: 19.5,
            left: 39.5,
        }
    }
}

/// Visual attributes of one dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotAttrs {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: Rgb,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
}

impl DotAttrs {
    pub fn lerp(&self, other: &DotAttrs, t: f64) -> DotAttrs {
        DotAttrs {
            cx: lerp(self.cx, other.cx, t),
            cy: lerp(self.cy, other.cy, t),
            r: lerp(self.r, other.r, t),
            fill: self.fill.lerp(other.fill, t),
            fill_opacity: lerp(self.fill_opacity, other.fill_opacity, t),
            stroke_opacity: lerp(self.stroke_opacity, other.stroke_opacity, t),
        }
    }
}

/// Interpolate between two numbers; the endpoints are returned exactly.
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    if t <= 0.0 {
        from
    } else if t >= 1.0 {
        to
    } else {
        from + (to - from) * t
    }
}

/// A dot on screen together with the point it was bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct DotState {
    pub key: String,
    pub datum: Point,
    pub attrs: DotAttrs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickState {
    pub value: f64,
    pub label: String,
    /// Offset along the axis, in plot-area pixels.
    pub position: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisState {
    pub orient: Orient,
    /// Translation of the axis group inside the plot area.
    pub translate: [f64; 2],
    /// Sorted pixel extent covered by the domain line.
    pub range: [f64; 2],
    pub tick_size: f64,
    pub tick_padding: f64,
    pub ticks: Vec<TickState>,
}

impl AxisState {
    /// Path of the domain line with its outer ticks.
    pub fn domain_path(&self) -> String {
        let [r0, r1] = self.range;
        let (r0, r1) = (js_number(r0), js_number(r1));
        let s = js_number(self.tick_size);
        let neg = js_number(-self.tick_size);
        match self.orient {
            Orient::Bottom => format!("M{},{}V0H{}V{}", r0, s, r1, s),
            Orient::Top => format!("M{},{}V0H{}V{}", r0, neg, r1, neg),
            Orient::Left => format!("M{},{}H0V{}H{}", neg, r0, r1, neg),
            Orient::Right => format!("M{},{}H0V{}H{}", s, r0, r1, s),
        }
    }

    /// Origin of a tick relative to the axis group.
    pub fn tick_origin(&self, position: f64) -> (f64, f64) {
        if self.orient.is_horizontal() {
            (position, 0.0)
        } else {
            (0.0, position)
        }
    }
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub x_axis: AxisState,
    pub y_axis: AxisState,
    /// Dots in paint order, bottom first.
    pub dots: Vec<DotState>,
}

impl Scene {
    pub fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    pub fn inner_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }

    pub fn dot(&self, key: &str) -> Option<&DotState> {
        self.dots.iter().find(|d| d.key == key)
    }
}

/// Format a number the way JavaScript's `String(n)` does.
pub fn js_number(value: f64) -> String {
    let mut buffer = ryu_js::Buffer::new();
    buffer.format(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(orient: Orient) -> AxisState {
        AxisState {
            orient,
            translate: [0.0, 0.0],
            range: [0.0, 900.0],
            tick_size: 6.0,
            tick_padding: 3.0,
            ticks: Vec::new(),
        }
    }

    #[test]
    fn domain_paths_per_orientation() {
        assert_eq!(axis(Orient::Bottom).domain_path(), "M0,6V0H900V6");
        assert_eq!(axis(Orient::Left).domain_path(), "M-6,0H0V900H-6");
        assert_eq!(axis(Orient::Top).domain_path(), "M0,-6V0H900V-6");
    }

    #[test]
    fn lerp_keeps_endpoints_exact() {
        assert_eq!(lerp(0.1, 0.7, 1.0), 0.7);
        assert_eq!(lerp(f64::NAN, 3.0, 1.0), 3.0);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn js_number_matches_javascript() {
        assert_eq!(js_number(1e-6), "0.000001");
        assert_eq!(js_number(19.5), "19.5");
        assert_eq!(js_number(900.0), "900");
        assert_eq!(js_number(f64::NAN), "NaN");
    }
}
