//! Axis Module
//! Axis configuration, tick layout and the keyed tick join used to animate
//! axes between two scales.

use crate::charts::format::{FormatSpec, TickFormat};
use crate::charts::scale::LinearScale;
use crate::charts::scene::{AxisState, TickState};
use crate::charts::transition::{Phase, TickTransition, FADED};

/// Side of the plot an axis is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orient {
    Top,
    Bottom,
    Left,
    Right,
}

impl Orient {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Orient::Top | Orient::Bottom)
    }

    /// Sign of the direction ticks point in (away from the plot for bottom/right).
    fn sign(self) -> f64 {
        match self {
            Orient::Top | Orient::Left => -1.0,
            Orient::Bottom | Orient::Right => 1.0,
        }
    }

    /// End point of a tick line drawn from the tick origin.
    pub fn tick_line_end(self, size: f64) -> (f64, f64) {
        let d = self.sign() * size;
        if self.is_horizontal() {
            (0.0, d)
        } else {
            (d, 0.0)
        }
    }

    /// Label anchor point relative to the tick origin.
    pub fn label_offset(self, size: f64, padding: f64) -> (f64, f64) {
        let d = self.sign() * (size.max(0.0) + padding);
        if self.is_horizontal() {
            (0.0, d)
        } else {
            (d, 0.0)
        }
    }

    /// SVG `text-anchor` for tick labels.
    pub fn label_anchor(self) -> &'static str {
        match self {
            Orient::Top | Orient::Bottom => "middle",
            Orient::Left => "end",
            Orient::Right => "start",
        }
    }

    /// SVG `dy` shift that centers the label on its anchor.
    pub fn label_dy(self) -> &'static str {
        match self {
            Orient::Top => "0em",
            Orient::Bottom => ".71em",
            Orient::Left | Orient::Right => ".32em",
        }
    }
}

/// A configurable axis: owns the scale it labels.
#[derive(Debug, Clone)]
pub struct Axis {
    scale: LinearScale,
    orient: Orient,
    ticks: usize,
    tick_format: Option<TickFormat>,
    tick_size: f64,
    tick_padding: f64,
}

impl Axis {
    pub fn new(orient: Orient) -> Self {
        Self {
            scale: LinearScale::default(),
            orient,
            ticks: 10,
            tick_format: None,
            tick_size: 6.0,
            tick_padding: 3.0,
        }
    }

    pub fn scale(&self) -> &LinearScale {
        &self.scale
    }

    pub fn scale_mut(&mut self) -> &mut LinearScale {
        &mut self.scale
    }

    pub fn set_scale(&mut self, scale: LinearScale) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn orient(&self) -> Orient {
        self.orient
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn set_ticks(&mut self, ticks: usize) -> &mut Self {
        self.ticks = ticks;
        self
    }

    pub fn tick_format(&self) -> Option<&TickFormat> {
        self.tick_format.as_ref()
    }

    pub fn set_tick_format(&mut self, format: Option<TickFormat>) -> &mut Self {
        self.tick_format = format;
        self
    }

    pub fn tick_size(&self) -> f64 {
        self.tick_size
    }

    pub fn tick_padding(&self) -> f64 {
        self.tick_padding
    }

    /// Tick values with their labels for the current scale.
    pub fn labelled_ticks(&self) -> Vec<(f64, String)> {
        let values = self.scale.ticks(self.ticks);
        let default_format;
        let format = match &self.tick_format {
            Some(format) => format,
            None => {
                default_format = TickFormat::Spec(FormatSpec::fixed(
                    self.scale.tick_precision(self.ticks),
                    true,
                ));
                &default_format
            }
        };
        values.into_iter().map(|v| (v, format.format(v))).collect()
    }

    /// Static layout of the axis against its current scale.
    pub fn layout(&self, translate: [f64; 2]) -> AxisState {
        let ticks = self
            .labelled_ticks()
            .into_iter()
            .map(|(value, label)| TickState {
                position: self.scale.apply(value),
                value,
                label,
                opacity: 1.0,
            })
            .collect();

        AxisState {
            orient: self.orient,
            translate,
            range: sorted(self.scale.range()),
            tick_size: self.tick_size,
            tick_padding: self.tick_padding,
            ticks,
        }
    }

    /// Join the ticks currently on screen with the ticks of the current scale.
    ///
    /// Entering ticks start at their position under `scale0`, exiting ticks
    /// travel to their position under the current scale while fading out.
    pub fn join_ticks(
        &self,
        previous: Option<&AxisState>,
        scale0: &LinearScale,
    ) -> Vec<TickTransition> {
        let old: &[TickState] = previous.map(|state| state.ticks.as_slice()).unwrap_or(&[]);
        let new = self.labelled_ticks();
        let mut joined = Vec::with_capacity(old.len() + new.len());

        for (value, label) in &new {
            let to_pos = self.scale.apply(*value);
            match old.iter().find(|t| same_tick(t.value, *value)) {
                Some(existing) => joined.push(TickTransition {
                    value: *value,
                    label: label.clone(),
                    phase: Phase::Update,
                    from_pos: existing.position,
                    to_pos,
                    from_opacity: existing.opacity,
                    to_opacity: 1.0,
                }),
                None => joined.push(TickTransition {
                    value: *value,
                    label: label.clone(),
                    phase: Phase::Enter,
                    from_pos: scale0.apply(*value),
                    to_pos,
                    from_opacity: FADED,
                    to_opacity: 1.0,
                }),
            }
        }

        for tick in old {
            if !new.iter().any(|(value, _)| same_tick(tick.value, *value)) {
                joined.push(TickTransition {
                    value: tick.value,
                    label: tick.label.clone(),
                    phase: Phase::Exit,
                    from_pos: tick.position,
                    to_pos: self.scale.apply(tick.value),
                    from_opacity: tick.opacity,
                    to_opacity: FADED,
                });
            }
        }

        joined
    }
}

/// Ticks are keyed by value; compare bit patterns so that values produced by
/// the same arithmetic match exactly.
fn same_tick(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits()
}

fn sorted([a, b]: [f64; 2]) -> [f64; 2] {
    if a <= b {
        [a, b]
    } else {
        [b, a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bottom_axis(domain: [f64; 2]) -> Axis {
        let mut axis = Axis::new(Orient::Bottom);
        axis.scale_mut().set_domain(domain).set_range([0.0, 100.0]);
        axis
    }

    #[test]
    fn default_labels_use_step_precision_and_grouping() {
        let axis = bottom_axis([0.0, 1.0]);
        let labels: Vec<String> = axis.labelled_ticks().into_iter().map(|(_, l)| l).collect();
        assert_eq!(labels.first().map(String::as_str), Some("0.0"));
        assert_eq!(labels.last().map(String::as_str), Some("1.0"));

        let axis = bottom_axis([0.0, 20000.0]);
        let labels: Vec<String> = axis.labelled_ticks().into_iter().map(|(_, l)| l).collect();
        assert_eq!(labels[1], "2,000");
    }

    #[test]
    fn custom_format_and_tick_count() {
        let mut axis = bottom_axis([0.0, 1.0]);
        axis.set_ticks(2)
            .set_tick_format(Some(TickFormat::parse(".0%").unwrap()));
        let labels: Vec<String> = axis.labelled_ticks().into_iter().map(|(_, l)| l).collect();
        assert_eq!(labels, vec!["0%", "50%", "100%"]);
    }

    #[test]
    fn layout_sorts_range_for_vertical_axes() {
        let mut axis = Axis::new(Orient::Left);
        axis.scale_mut().set_domain([0.0, 10.0]).set_range([200.0, 0.0]);
        let state = axis.layout([0.0, 0.0]);
        assert_eq!(state.range, [0.0, 200.0]);
        assert_eq!(state.ticks[0].position, 200.0);
    }

    #[test]
    fn tick_join_phases() {
        let before = bottom_axis([0.0, 10.0]);
        let previous = before.layout([0.0, 0.0]);

        let after = bottom_axis([5.0, 15.0]);
        let joined = after.join_ticks(Some(&previous), before.scale());

        let phase_of = |v: f64| joined.iter().find(|t| t.value == v).map(|t| t.phase);
        assert_eq!(phase_of(0.0), Some(Phase::Exit));
        assert_eq!(phase_of(8.0), Some(Phase::Update));
        assert_eq!(phase_of(14.0), Some(Phase::Enter));

        let entering = joined.iter().find(|t| t.value == 14.0).unwrap();
        // enters where the old scale would have put it
        assert_eq!(entering.from_pos, 140.0);
        assert_eq!(entering.to_pos, 90.0);
        assert_eq!(entering.from_opacity, FADED);

        let exiting = joined.iter().find(|t| t.value == 0.0).unwrap();
        assert_eq!(exiting.from_pos, 0.0);
        assert_eq!(exiting.to_pos, -50.0);
        assert_eq!(exiting.to_opacity, FADED);
    }

    #[test]
    fn orient_geometry() {
        assert_eq!(Orient::Bottom.tick_line_end(6.0), (0.0, 6.0));
        assert_eq!(Orient::Left.tick_line_end(6.0), (-6.0, 0.0));
        assert_eq!(Orient::Left.label_offset(6.0, 3.0), (-9.0, 0.0));
        assert_eq!(Orient::Left.label_anchor(), "end");
    }
}
