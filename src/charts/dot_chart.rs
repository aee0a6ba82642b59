//! Dot Chart Module
//! The reusable dot chart: configuration, record normalization, domain
//! computation and the keyed enter/update/exit join against a render target.
//!
//! ```
//! use dotchart::charts::{ChartTarget, DotChart};
//!
//! let mut chart = DotChart::<[f64; 2]>::new();
//! chart.set_width(400.0).set_height(300.0);
//!
//! let mut target = ChartTarget::new();
//! let transition = chart.render(&mut target, &[[1.0, 2.0], [3.0, 5.0]]);
//! assert_eq!(transition.counts().enter, 2);
//! assert_eq!(chart.x_scale().domain(), [1.0, 3.0]);
//! ```

use crate::charts::axis::{Axis, Orient};
use crate::charts::format::TickFormat;
use crate::charts::scale::{extent, max, LinearScale, OrdinalScale, SqrtScale};
use crate::charts::scene::{AxisState, DotAttrs, Margin, Scene};
use crate::charts::transition::{
    AxisTransition, DotTransition, Ease, Phase, Transition, Tween, DEFAULT_DURATION, FADED,
};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Accessor producing a number from a record and its index.
pub type NumberAccessor<T> = Arc<dyn Fn(&T, usize) -> f64 + Send + Sync>;

/// Accessor producing a category or identity key from a record and its index.
pub type TextAccessor<T> = Arc<dyn Fn(&T, usize) -> String + Send + Sync>;

const NAN_DOMAIN: [f64; 2] = [f64::NAN, f64::NAN];

/// A record normalized through the chart's accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub z: String,
    pub key: String,
}

/// Records whose numeric components can be read by position.
///
/// Charts over such records get default x/y accessors reading components 0 and 1.
pub trait Components {
    /// Component at `index`, NaN when absent.
    fn component(&self, index: usize) -> f64;
}

impl<const N: usize> Components for [f64; N] {
    fn component(&self, index: usize) -> f64 {
        self.get(index).copied().unwrap_or(f64::NAN)
    }
}

impl Components for Vec<f64> {
    fn component(&self, index: usize) -> f64 {
        self.get(index).copied().unwrap_or(f64::NAN)
    }
}

impl Components for (f64, f64) {
    fn component(&self, index: usize) -> f64 {
        match index {
            0 => self.0,
            1 => self.1,
            _ => f64::NAN,
        }
    }
}

/// Copies of the scales used by the previous render of a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleSnapshot {
    pub x: LinearScale,
    pub y: LinearScale,
    pub r: SqrtScale,
}

/// Where a chart is drawn: retains the previous scales and scene between renders.
#[derive(Debug, Clone, Default)]
pub struct ChartTarget {
    snapshot: Option<ScaleSnapshot>,
    scene: Option<Scene>,
}

impl ChartTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<&ScaleSnapshot> {
        self.snapshot.as_ref()
    }

    /// The scene as it stands once the last transition has finished.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Forget everything drawn so far; the next render starts from scratch.
    pub fn clear(&mut self) {
        self.snapshot = None;
        self.scene = None;
    }
}

/// A configurable, reusable dot (scatter/bubble) chart.
pub struct DotChart<T> {
    margin: Margin,
    width: f64,
    height: f64,
    x_value: NumberAccessor<T>,
    y_value: NumberAccessor<T>,
    r_value: NumberAccessor<T>,
    z_value: TextAccessor<T>,
    key_value: TextAccessor<T>,
    x_domain: Option<[f64; 2]>,
    y_domain: Option<[f64; 2]>,
    x_axis: Axis,
    y_axis: Axis,
    r: SqrtScale,
    z: OrdinalScale,
    duration: Duration,
    ease: Ease,
}

impl<T> Clone for DotChart<T> {
    fn clone(&self) -> Self {
        Self {
            margin: self.margin,
            width: self.width,
            height: self.height,
            x_value: Arc::clone(&self.x_value),
            y_value: Arc::clone(&self.y_value),
            r_value: Arc::clone(&self.r_value),
            z_value: Arc::clone(&self.z_value),
            key_value: Arc::clone(&self.key_value),
            x_domain: self.x_domain,
            y_domain: self.y_domain,
            x_axis: self.x_axis.clone(),
            y_axis: self.y_axis.clone(),
            r: self.r,
            z: self.z.clone(),
            duration: self.duration,
            ease: self.ease,
        }
    }
}

impl<T: Components + 'static> Default for DotChart<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Components + 'static> DotChart<T> {
    /// Chart reading x and y from components 0 and 1 of each record.
    pub fn new() -> Self {
        Self::with_position(|d: &T, _| d.component(0), |d: &T, _| d.component(1))
    }
}

impl<T: 'static> DotChart<T> {
    /// Chart over arbitrary records with the given x and y accessors.
    pub fn with_position<X, Y>(x: X, y: Y) -> Self
    where
        X: Fn(&T, usize) -> f64 + Send + Sync + 'static,
        Y: Fn(&T, usize) -> f64 + Send + Sync + 'static,
    {
        Self {
            margin: Margin::default(),
            width: 960.0,
            height: 500.0,
            x_value: Arc::new(x),
            y_value: Arc::new(y),
            r_value: Arc::new(|_: &T, _: usize| 1.0),
            z_value: Arc::new(|_: &T, _: usize| "undefined".to_string()),
            key_value: Arc::new(|_: &T, i: usize| i.to_string()),
            x_domain: None,
            y_domain: None,
            x_axis: Axis::new(Orient::Bottom),
            y_axis: Axis::new(Orient::Left),
            r: SqrtScale::default(),
            z: OrdinalScale::category10(),
            duration: DEFAULT_DURATION,
            ease: Ease::default(),
        }
    }

    // ===== Dimensions =====

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_width(&mut self, width: f64) -> &mut Self {
        self.width = width;
        self
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_height(&mut self, height: f64) -> &mut Self {
        self.height = height;
        self
    }

    pub fn margin(&self) -> Margin {
        self.margin
    }

    pub fn set_margin(&mut self, margin: Margin) -> &mut Self {
        self.margin = margin;
        self
    }

    // ===== Accessors =====

    pub fn key(&self) -> &TextAccessor<T> {
        &self.key_value
    }

    pub fn set_key<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&T, usize) -> String + Send + Sync + 'static,
    {
        self.key_value = Arc::new(f);
        self
    }

    pub fn x(&self) -> &NumberAccessor<T> {
        &self.x_value
    }

    pub fn set_x<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&T, usize) -> f64 + Send + Sync + 'static,
    {
        self.x_value = Arc::new(f);
        self
    }

    pub fn y(&self) -> &NumberAccessor<T> {
        &self.y_value
    }

    pub fn set_y<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&T, usize) -> f64 + Send + Sync + 'static,
    {
        self.y_value = Arc::new(f);
        self
    }

    pub fn radius(&self) -> &NumberAccessor<T> {
        &self.r_value
    }

    pub fn set_radius<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&T, usize) -> f64 + Send + Sync + 'static,
    {
        self.r_value = Arc::new(f);
        self
    }

    pub fn color(&self) -> &TextAccessor<T> {
        &self.z_value
    }

    pub fn set_color<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&T, usize) -> String + Send + Sync + 'static,
    {
        self.z_value = Arc::new(f);
        self
    }

    // ===== Domains and scales =====

    pub fn x_domain(&self) -> Option<[f64; 2]> {
        self.x_domain
    }

    /// Fix the x domain; `None` computes it from the data on each render.
    pub fn set_x_domain(&mut self, domain: Option<[f64; 2]>) -> &mut Self {
        self.x_domain = domain;
        self
    }

    pub fn y_domain(&self) -> Option<[f64; 2]> {
        self.y_domain
    }

    pub fn set_y_domain(&mut self, domain: Option<[f64; 2]>) -> &mut Self {
        self.y_domain = domain;
        self
    }

    pub fn color_scale(&self) -> &OrdinalScale {
        &self.z
    }

    pub fn set_color_scale(&mut self, scale: OrdinalScale) -> &mut Self {
        self.z = scale;
        self
    }

    pub fn radius_scale(&self) -> &SqrtScale {
        &self.r
    }

    pub fn x_scale(&self) -> &LinearScale {
        self.x_axis.scale()
    }

    pub fn set_x_scale(&mut self, scale: LinearScale) -> &mut Self {
        self.x_axis.set_scale(scale);
        self
    }

    pub fn y_scale(&self) -> &LinearScale {
        self.y_axis.scale()
    }

    pub fn set_y_scale(&mut self, scale: LinearScale) -> &mut Self {
        self.y_axis.set_scale(scale);
        self
    }

    // ===== Axes =====

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    pub fn x_ticks(&self) -> usize {
        self.x_axis.ticks()
    }

    pub fn set_x_ticks(&mut self, ticks: usize) -> &mut Self {
        self.x_axis.set_ticks(ticks);
        self
    }

    pub fn y_ticks(&self) -> usize {
        self.y_axis.ticks()
    }

    pub fn set_y_ticks(&mut self, ticks: usize) -> &mut Self {
        self.y_axis.set_ticks(ticks);
        self
    }

    pub fn x_tick_format(&self) -> Option<&TickFormat> {
        self.x_axis.tick_format()
    }

    pub fn set_x_tick_format(&mut self, format: Option<TickFormat>) -> &mut Self {
        self.x_axis.set_tick_format(format);
        self
    }

    pub fn y_tick_format(&self) -> Option<&TickFormat> {
        self.y_axis.tick_format()
    }

    pub fn set_y_tick_format(&mut self, format: Option<TickFormat>) -> &mut Self {
        self.y_axis.set_tick_format(format);
        self
    }

    // ===== Animation =====

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Duration) -> &mut Self {
        self.duration = duration;
        self
    }

    pub fn ease(&self) -> Ease {
        self.ease
    }

    pub fn set_ease(&mut self, ease: Ease) -> &mut Self {
        self.ease = ease;
        self
    }

    // ===== Rendering =====

    /// Convert records to points. Each accessor runs exactly once per record,
    /// in order, so stateful accessors see a predictable sequence.
    pub fn normalize(&self, data: &[T]) -> Vec<Point> {
        data.iter()
            .enumerate()
            .map(|(i, d)| Point {
                x: (self.x_value)(d, i),
                y: (self.y_value)(d, i),
                r: (self.r_value)(d, i),
                z: (self.z_value)(d, i),
                key: (self.key_value)(d, i),
            })
            .collect()
    }

    /// Render every `(target, data)` pair in order against the shared scales.
    pub fn render_all<'a, I>(&mut self, selection: I) -> Vec<Transition>
    where
        I: IntoIterator<Item = (&'a mut ChartTarget, &'a [T])>,
    {
        selection
            .into_iter()
            .map(|(target, data)| self.render(target, data))
            .collect()
    }

    /// Draw `data` into `target`, returning the transition from what the
    /// target showed before. The target keeps the finished scene.
    pub fn render(&mut self, target: &mut ChartTarget, data: &[T]) -> Transition {
        let inner_width = self.width - self.margin.left - self.margin.right;
        let inner_height = self.height - self.margin.top - self.margin.bottom;

        // Update the scales' ranges.
        self.x_axis.scale_mut().set_range([0.0, inner_width]);
        self.y_axis.scale_mut().set_range([inner_height, 0.0]);
        self.r
            .set_range([0.0, inner_width.min(inner_height) / 12.0]);

        let points = self.normalize(data);

        // Update the scales' domains.
        let x_domain = self
            .x_domain
            .or_else(|| extent(points.iter().map(|p| p.x)))
            .unwrap_or(NAN_DOMAIN);
        let y_domain = self
            .y_domain
            .or_else(|| extent(points.iter().map(|p| p.y)))
            .unwrap_or(NAN_DOMAIN);
        let r_max = max(points.iter().map(|p| p.r)).unwrap_or(f64::NAN);

        self.x_axis.scale_mut().set_domain(x_domain);
        self.y_axis.scale_mut().set_domain(y_domain);
        self.r.set_domain([0.0, r_max]);
        self.z.set_domain(points.iter().map(|p| p.z.as_str()));

        // Stash the new scales, entering dots start from the old ones.
        let current = ScaleSnapshot {
            x: *self.x_axis.scale(),
            y: *self.y_axis.scale(),
            r: self.r,
        };
        let old = target.snapshot.replace(current).unwrap_or(current);
        let previous = target.scene.take();

        // Exiting categories join the color domain after the live ones, in paint order.
        if let Some(scene) = previous.as_ref() {
            let live: HashSet<&str> = points.iter().map(|p| p.key.as_str()).collect();
            for dot in scene.dots.iter().filter(|d| !live.contains(d.key.as_str())) {
                self.z.insert(dot.datum.z.as_str());
            }
        }

        let x_axis = self.axis_transition(
            &self.x_axis,
            previous.as_ref().map(|s| &s.x_axis),
            &old.x,
            [0.0, inner_height],
        );
        let y_axis = self.axis_transition(
            &self.y_axis,
            previous.as_ref().map(|s| &s.y_axis),
            &old.y,
            [current.x.apply(0.0), 0.0],
        );

        let dots = self.join_dots(points, previous.as_ref(), &old, &current);

        let transition = Transition {
            width: Tween::new(
                previous.as_ref().map_or(self.width, |s| s.width),
                self.width,
            ),
            height: Tween::new(
                previous.as_ref().map_or(self.height, |s| s.height),
                self.height,
            ),
            margin: self.margin,
            x_axis,
            y_axis,
            dots,
            duration: self.duration,
            ease: self.ease,
        };

        let counts = transition.counts();
        log::debug!(
            "dot chart render: {} enter, {} update, {} exit; x {:?}, y {:?}, r [0, {}]",
            counts.enter,
            counts.update,
            counts.exit,
            x_domain,
            y_domain,
            r_max
        );

        target.scene = Some(transition.end());
        transition
    }

    fn axis_transition(
        &self,
        axis: &Axis,
        previous: Option<&AxisState>,
        scale0: &LinearScale,
        translate: [f64; 2],
    ) -> AxisTransition {
        let layout = axis.layout(translate);
        AxisTransition {
            orient: layout.orient,
            translate: Tween::new(previous.map_or(translate, |p| p.translate), translate),
            range: Tween::new(previous.map_or(layout.range, |p| p.range), layout.range),
            tick_size: layout.tick_size,
            tick_padding: layout.tick_padding,
            ticks: axis.join_ticks(previous, scale0),
        }
    }

    fn encode(&self, point: &Point, scales: &ScaleSnapshot, opacity: f64) -> DotAttrs {
        DotAttrs {
            cx: scales.x.apply(point.x),
            cy: scales.y.apply(point.y),
            r: scales.r.apply(point.r),
            fill: self.z.apply(&point.z),
            fill_opacity: opacity,
            stroke_opacity: opacity,
        }
    }

    /// Keyed join of the new points against the dots on screen.
    fn join_dots(
        &self,
        points: Vec<Point>,
        previous: Option<&Scene>,
        old: &ScaleSnapshot,
        current: &ScaleSnapshot,
    ) -> Vec<DotTransition> {
        // Duplicate keys bind to a single dot; the first record wins.
        let mut slots: HashSet<String> = HashSet::with_capacity(points.len());
        let mut bound: Vec<Point> = Vec::with_capacity(points.len());
        for point in points {
            if slots.insert(point.key.clone()) {
                bound.push(point);
            }
        }

        let on_screen = previous.map(|s| s.dots.as_slice()).unwrap_or(&[]);

        let exiting = on_screen
            .iter()
            .filter(|dot| !slots.contains(&dot.key))
            .map(|dot| DotTransition {
                key: dot.key.clone(),
                datum: dot.datum.clone(),
                phase: Phase::Exit,
                from: dot.attrs,
                to: self.encode(&dot.datum, current, FADED),
            });

        let mut live: Vec<DotTransition> = bound
            .into_iter()
            .map(|point| {
                let to = self.encode(&point, current, 1.0);
                match on_screen.iter().find(|dot| dot.key == point.key) {
                    Some(existing) => DotTransition {
                        key: point.key.clone(),
                        phase: Phase::Update,
                        from: existing.attrs,
                        to,
                        datum: point,
                    },
                    None => DotTransition {
                        key: point.key.clone(),
                        phase: Phase::Enter,
                        from: self.encode(&point, old, FADED),
                        to,
                        datum: point,
                    },
                }
            })
            .collect();

        // Big dots underneath small ones.
        live.sort_by(|a, b| b.datum.r.partial_cmp(&a.datum.r).unwrap_or(Ordering::Equal));

        exiting.chain(live).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::color::CATEGORY10;

    #[derive(Debug, Clone)]
    struct Nation {
        name: &'static str,
        region: &'static str,
        income: f64,
        life_expectancy: f64,
        population: f64,
    }

    fn nation(
        name: &'static str,
        region: &'static str,
        income: f64,
        life_expectancy: f64,
        population: f64,
    ) -> Nation {
        Nation {
            name,
            region,
            income,
            life_expectancy,
            population,
        }
    }

    fn nations_chart() -> DotChart<Nation> {
        let mut chart = DotChart::with_position(|d: &Nation, _| d.income, |d: &Nation, _| {
            d.life_expectancy
        });
        chart
            .set_radius(|d, _| d.population)
            .set_color(|d, _| d.region.to_string())
            .set_key(|d, _| d.name.to_string());
        chart
    }

    fn year_1800() -> Vec<Nation> {
        vec![
            nation("Angola", "Sub-Saharan Africa", 1000.0, 30.0, 1_500_000.0),
            nation("China", "East Asia & Pacific", 985.0, 35.0, 320_000_000.0),
            nation("France", "Europe & Central Asia", 1400.0, 33.0, 29_000_000.0),
        ]
    }

    fn year_1801() -> Vec<Nation> {
        vec![
            nation("China", "East Asia & Pacific", 990.0, 36.0, 325_000_000.0),
            nation("France", "Europe & Central Asia", 1420.0, 34.0, 29_500_000.0),
            nation("India", "South Asia", 800.0, 25.0, 170_000_000.0),
        ]
    }

    #[test]
    fn accessors_round_trip() {
        let mut chart = nations_chart();
        chart
            .set_width(640.0)
            .set_height(480.0)
            .set_margin(Margin {
                top: 1.0,
                right: 2.0,
                bottom: 3.0,
                left: 4.0,
            })
            .set_x_domain(Some([0.0, 10.0]))
            .set_y_domain(Some([20.0, 90.0]))
            .set_x_ticks(5)
            .set_y_ticks(4)
            .set_duration(Duration::from_millis(750))
            .set_ease(Ease::Linear);

        assert_eq!(chart.width(), 640.0);
        assert_eq!(chart.height(), 480.0);
        assert_eq!(chart.margin().left, 4.0);
        assert_eq!(chart.x_domain(), Some([0.0, 10.0]));
        assert_eq!(chart.y_domain(), Some([20.0, 90.0]));
        assert_eq!(chart.x_ticks(), 5);
        assert_eq!(chart.y_ticks(), 4);
        assert_eq!(chart.duration(), Duration::from_millis(750));
        assert_eq!(chart.ease(), Ease::Linear);

        let france = &year_1800()[2];
        assert_eq!((chart.x())(france, 0), 1400.0);
        assert_eq!((chart.y())(france, 0), 33.0);
        assert_eq!((chart.radius())(france, 0), 29_000_000.0);
        assert_eq!((chart.color())(france, 0), "Europe & Central Asia");
        assert_eq!((chart.key())(france, 0), "France");

        chart.set_x_tick_format(Some(TickFormat::parse(",.0f").unwrap()));
        assert_eq!(chart.x_tick_format().unwrap().format(12000.0), "12,000");
        assert!(chart.y_tick_format().is_none());

        let scale = LinearScale::new([1.0, 2.0], [3.0, 4.0]);
        chart.set_x_scale(scale);
        assert_eq!(chart.x_scale(), &scale);

        let palette = OrdinalScale::with_range(vec![CATEGORY10[3]]);
        chart.set_color_scale(palette.clone());
        assert_eq!(chart.color_scale(), &palette);
    }

    #[test]
    fn default_accessors_read_components() {
        let chart = DotChart::<[f64; 2]>::new();
        let points = chart.normalize(&[[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(
            points[1],
            Point {
                x: 3.0,
                y: 4.0,
                r: 1.0,
                z: "undefined".to_string(),
                key: "1".to_string(),
            }
        );
        assert_eq!(chart.width(), 960.0);
        assert_eq!(chart.height(), 500.0);
        assert_eq!(chart.margin(), Margin::default());
    }

    #[test]
    fn normalizing_twice_is_identical() {
        let chart = nations_chart();
        let data = year_1800();
        assert_eq!(chart.normalize(&data), chart.normalize(&data));
    }

    #[test]
    fn domains_come_from_data_unless_overridden() {
        let mut chart = nations_chart();
        let mut target = ChartTarget::new();
        chart.render(&mut target, &year_1800());
        assert_eq!(chart.x_scale().domain(), [985.0, 1400.0]);
        assert_eq!(chart.y_scale().domain(), [30.0, 35.0]);
        assert_eq!(chart.radius_scale().domain(), [0.0, 320_000_000.0]);
        assert_eq!(
            chart.color_scale().domain(),
            &["Sub-Saharan Africa", "East Asia & Pacific", "Europe & Central Asia"]
        );

        chart
            .set_x_domain(Some([300.0, 100_000.0]))
            .set_y_domain(Some([10.0, 85.0]));
        chart.render(&mut target, &year_1800());
        assert_eq!(chart.x_scale().domain(), [300.0, 100_000.0]);
        assert_eq!(chart.y_scale().domain(), [10.0, 85.0]);
    }

    #[test]
    fn ranges_follow_inner_size() {
        let mut chart = nations_chart();
        chart.set_width(500.0).set_height(300.0).set_margin(Margin {
            top: 10.0,
            right: 10.0,
            bottom: 20.0,
            left: 30.0,
        });
        chart.render(&mut ChartTarget::new(), &year_1800());
        assert_eq!(chart.x_scale().range(), [0.0, 460.0]);
        assert_eq!(chart.y_scale().range(), [270.0, 0.0]);
        assert_eq!(chart.radius_scale().range(), [0.0, 22.5]);
    }

    #[test]
    fn first_render_enters_everything_in_place() {
        let mut chart = nations_chart();
        let mut target = ChartTarget::new();
        let transition = chart.render(&mut target, &year_1800());

        assert_eq!(transition.counts().enter, 3);
        for dot in &transition.dots {
            assert_eq!(dot.phase, Phase::Enter);
            assert_eq!(dot.from.cx, dot.to.cx);
            assert_eq!(dot.from.fill_opacity, FADED);
            assert_eq!(dot.to.fill_opacity, 1.0);
        }
        // width/height do not animate on creation
        assert_eq!(transition.width, Tween::fixed(960.0));
        assert!(target.scene().is_some());
        assert!(target.snapshot().is_some());
    }

    #[test]
    fn dots_sorted_by_descending_radius() {
        let mut chart = nations_chart();
        let transition = chart.render(&mut ChartTarget::new(), &year_1800());
        let keys: Vec<&str> = transition.dots.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["China", "France", "Angola"]);
    }

    #[test]
    fn second_render_joins_by_key() {
        let mut chart = nations_chart();
        let mut target = ChartTarget::new();
        chart.render(&mut target, &year_1800());
        let before = target.scene().cloned().unwrap();
        let old_snapshot = *target.snapshot().unwrap();

        let transition = chart.render(&mut target, &year_1801());
        let phase = |key: &str| {
            transition
                .dots
                .iter()
                .find(|d| d.key == key)
                .map(|d| d.phase)
        };
        assert_eq!(phase("Angola"), Some(Phase::Exit));
        assert_eq!(phase("China"), Some(Phase::Update));
        assert_eq!(phase("France"), Some(Phase::Update));
        assert_eq!(phase("India"), Some(Phase::Enter));

        // exits are painted first
        assert_eq!(transition.dots[0].key, "Angola");

        // updates start where the previous render left them
        let china = transition.dots.iter().find(|d| d.key == "China").unwrap();
        assert_eq!(china.from, before.dot("China").unwrap().attrs);

        // entering dots start at their position under the previous scales
        let india = transition.dots.iter().find(|d| d.key == "India").unwrap();
        assert_eq!(india.from.cx, old_snapshot.x.apply(800.0));
        assert_eq!(india.from.cy, old_snapshot.y.apply(25.0));
        assert_eq!(india.to.cx, chart.x_scale().apply(800.0));

        // exiting dots fade out at their position under the new scales
        let angola = transition.dots.iter().find(|d| d.key == "Angola").unwrap();
        assert_eq!(angola.to.cx, chart.x_scale().apply(1000.0));
        assert_eq!(angola.to.fill_opacity, FADED);

        // finished scene no longer has the exited dot
        let after = target.scene().unwrap();
        assert!(after.dot("Angola").is_none());
        assert_eq!(after.dots.len(), 3);
    }

    #[test]
    fn y_axis_sits_at_x_zero() {
        let mut chart = DotChart::<[f64; 2]>::new();
        chart.set_x_domain(Some([-10.0, 10.0]));
        let transition = chart.render(&mut ChartTarget::new(), &[[0.0, 0.0], [1.0, 1.0]]);
        let inner_width = 960.0 - 39.5 - 19.5;
        assert_eq!(transition.y_axis.translate.to, [inner_width / 2.0, 0.0]);
        assert_eq!(transition.x_axis.translate.to, [0.0, 500.0 - 39.0]);
    }

    #[test]
    fn empty_data_gives_nan_domains() {
        let mut chart = DotChart::<[f64; 2]>::new();
        let mut target = ChartTarget::new();
        let transition = chart.render(&mut target, &[]);
        assert!(chart.x_scale().domain()[0].is_nan());
        assert!(transition.dots.is_empty());
        assert!(transition.x_axis.ticks.is_empty());
    }

    #[test]
    fn non_numeric_values_propagate_as_nan() {
        let mut chart = DotChart::<[f64; 2]>::new();
        let transition = chart.render(&mut ChartTarget::new(), &[[f64::NAN, 1.0], [2.0, 3.0]]);
        let bad = transition.dots.iter().find(|d| d.key == "0").unwrap();
        assert!(bad.to.cx.is_nan());
        // NaN is ignored for the domain
        assert_eq!(chart.x_scale().domain(), [2.0, 2.0]);
    }

    #[test]
    fn duplicate_keys_bind_once() {
        let mut chart = DotChart::<[f64; 2]>::new();
        chart.set_key(|_, _| "same".to_string());
        let transition = chart.render(&mut ChartTarget::new(), &[[0.0, 0.0], [5.0, 5.0]]);
        assert_eq!(transition.dots.len(), 1);
        assert_eq!(transition.dots[0].datum.x, 0.0);
    }

    #[test]
    fn vanished_categories_exit_in_distinct_colors() {
        let mut chart = nations_chart();
        let mut target = ChartTarget::new();
        chart.render(
            &mut target,
            &[
                nation("Angola", "Sub-Saharan Africa", 1000.0, 30.0, 1.0),
                nation("China", "East Asia & Pacific", 985.0, 35.0, 1.0),
                nation("France", "Europe & Central Asia", 1400.0, 33.0, 1.0),
            ],
        );
        let transition = chart.render(
            &mut target,
            &[nation("Chile", "Latin America & Caribbean", 1200.0, 32.0, 1.0)],
        );

        let fills: Vec<_> = transition
            .dots
            .iter()
            .filter(|d| d.phase == Phase::Exit)
            .map(|d| d.to.fill)
            .collect();
        assert_eq!(fills.len(), 3);
        let distinct: HashSet<_> = fills.iter().collect();
        assert_eq!(distinct.len(), 3);

        let live = transition.dots.iter().find(|d| d.key == "Chile").unwrap();
        assert_eq!(live.to.fill, CATEGORY10[0]);
        assert!(!fills.contains(&CATEGORY10[0]));
        assert_eq!(chart.color_scale().domain().len(), 4);
    }

    #[test]
    fn render_all_keeps_targets_independent() {
        let mut chart = DotChart::<[f64; 2]>::new();
        let mut first = ChartTarget::new();
        let mut second = ChartTarget::new();
        let a = vec![[0.0, 0.0], [1.0, 1.0]];
        let b = vec![[0.0, 0.0]];

        let transitions = chart.render_all(vec![
            (&mut first, a.as_slice()),
            (&mut second, b.as_slice()),
        ]);
        assert_eq!(transitions.len(), 2);
        assert_eq!(first.scene().unwrap().dots.len(), 2);
        assert_eq!(second.scene().unwrap().dots.len(), 1);

        // the shared scales reflect the last target rendered
        assert_eq!(chart.x_scale().domain(), [0.0, 0.0]);
    }

    #[test]
    fn clearing_target_restarts_enter() {
        let mut chart = DotChart::<[f64; 2]>::new();
        let mut target = ChartTarget::new();
        chart.render(&mut target, &[[0.0, 0.0]]);
        target.clear();
        let transition = chart.render(&mut target, &[[0.0, 0.0]]);
        assert_eq!(transition.counts().enter, 1);
    }
}
