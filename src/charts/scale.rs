//! Scale Module
//! Linear, square-root and ordinal scales mapping data values to pixels and colors.

use crate::charts::color::{Rgb, CATEGORY10};
use std::collections::HashMap;

/// Affine mapping from a numeric domain onto a numeric range.
///
/// Domains are used exactly as set, so a reversed range (`[height, 0]`) gives
/// the usual upward y-axis. Values outside the domain are not clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl Default for LinearScale {
    fn default() -> Self {
        Self {
            domain: [0.0, 1.0],
            range: [0.0, 1.0],
        }
    }
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn set_domain(&mut self, domain: [f64; 2]) -> &mut Self {
        self.domain = domain;
        self
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn set_range(&mut self, range: [f64; 2]) -> &mut Self {
        self.range = range;
        self
    }

    /// Map a domain value to the range.
    pub fn apply(&self, value: f64) -> f64 {
        let t = normalize(value, self.domain);
        self.range[0] + t * (self.range[1] - self.range[0])
    }

    /// Step between roughly `count` ticks, or `None` for an empty or non-finite domain.
    pub fn tick_step(&self, count: usize) -> Option<f64> {
        tick_range(self.domain, count).map(|(_, _, step)| step)
    }

    /// Round tick values covering the domain, approximately `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match tick_range(self.domain, count) {
            Some((start, stop, step)) => float_range(start, stop, step),
            None => Vec::new(),
        }
    }

    /// Number of decimals the default tick labels need for `count` ticks.
    pub fn tick_precision(&self, count: usize) -> usize {
        self.tick_step(count)
            .map(|step| (-(step.log10() + 0.01).floor()).max(0.0) as usize)
            .unwrap_or(0)
    }
}

/// Position of `value` in `[a, b]` as a fraction. A zero-width interval maps
/// every finite value to its start.
fn normalize(value: f64, [a, b]: [f64; 2]) -> f64 {
    let span = b - a;
    if span == 0.0 {
        (value - a) * 0.0
    } else {
        (value - a) / span
    }
}

/// `(first tick, stop bound, step)` for a domain, stop bound exclusive.
fn tick_range(domain: [f64; 2], count: usize) -> Option<(f64, f64, f64)> {
    let (lo, hi) = if domain[0] <= domain[1] {
        (domain[0], domain[1])
    } else {
        (domain[1], domain[0])
    };
    let span = hi - lo;
    if count == 0 || !span.is_finite() || span <= 0.0 {
        return None;
    }

    let m = count as f64;
    let mut step = 10f64.powf((span / m).log10().floor());
    let err = m / span * step;

    if err <= 0.15 {
        step *= 10.0;
    } else if err <= 0.35 {
        step *= 5.0;
    } else if err <= 0.75 {
        step *= 2.0;
    }

    let start = (lo / step).ceil() * step;
    let stop = (hi / step).floor() * step + step * 0.5;
    Some((start, stop, step))
}

/// Evenly spaced values in `[start, stop)`, computed on an integer grid so
/// steps like 0.1 don't accumulate rounding error.
fn float_range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || !step.is_finite() {
        return Vec::new();
    }

    let mut k = 1.0;
    while (step * k) % 1.0 != 0.0 && k < 1e15 {
        k *= 10.0;
    }

    let (start, stop, step) = (start * k, stop * k, step * k);
    let mut values = Vec::new();
    let mut i = 0.0;
    loop {
        let v = start + step * i;
        if !(v < stop) {
            break;
        }
        values.push(v / k);
        i += 1.0;
    }
    values
}

/// Square-root scale: a power scale with exponent 0.5, sign preserving.
///
/// Used for bubble radii so that the drawn *area* is proportional to the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl Default for SqrtScale {
    fn default() -> Self {
        Self {
            domain: [0.0, 1.0],
            range: [0.0, 1.0],
        }
    }
}

impl SqrtScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn set_domain(&mut self, domain: [f64; 2]) -> &mut Self {
        self.domain = domain;
        self
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn set_range(&mut self, range: [f64; 2]) -> &mut Self {
        self.range = range;
        self
    }

    pub fn apply(&self, value: f64) -> f64 {
        let linear = LinearScale::new(
            [signed_sqrt(self.domain[0]), signed_sqrt(self.domain[1])],
            self.range,
        );
        linear.apply(signed_sqrt(value))
    }
}

fn signed_sqrt(x: f64) -> f64 {
    if x < 0.0 {
        -(-x).sqrt()
    } else {
        x.sqrt()
    }
}

/// Maps category keys onto a list of colors in domain order, wrapping around.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    range: Vec<Rgb>,
}

impl Default for OrdinalScale {
    fn default() -> Self {
        Self::category10()
    }
}

impl OrdinalScale {
    /// Ordinal scale over the ten categorical colors.
    pub fn category10() -> Self {
        Self::with_range(CATEGORY10.to_vec())
    }

    pub fn with_range(range: Vec<Rgb>) -> Self {
        Self {
            domain: Vec::new(),
            index: HashMap::new(),
            range,
        }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Replace the domain. Duplicates are dropped; the first occurrence keeps its slot.
    pub fn set_domain<I, S>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain.clear();
        self.index.clear();
        for key in keys {
            self.insert(key.into());
        }
        self
    }

    /// Append a key to the domain unless it is already there. Returns its slot.
    pub fn insert(&mut self, key: impl Into<String>) -> usize {
        let key = key.into();
        if let Some(&slot) = self.index.get(&key) {
            return slot;
        }
        let slot = self.domain.len();
        self.index.insert(key.clone(), slot);
        self.domain.push(key);
        slot
    }

    pub fn range(&self) -> &[Rgb] {
        &self.range
    }

    pub fn set_range(&mut self, range: Vec<Rgb>) -> &mut Self {
        self.range = range;
        self
    }

    /// Color for a key. Keys outside the domain get the color of the next free
    /// slot without joining it; `insert` them first to keep them distinct.
    pub fn apply(&self, key: &str) -> Rgb {
        if self.range.is_empty() {
            return Rgb::BLACK;
        }
        let slot = self.index.get(key).copied().unwrap_or(self.domain.len());
        self.range[slot % self.range.len()]
    }
}

/// Minimum and maximum of the values, ignoring NaN.
pub fn extent<I: IntoIterator<Item = f64>>(values: I) -> Option<[f64; 2]> {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some([v, v]),
            Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
        })
}

/// Maximum of the values, ignoring NaN.
pub fn max<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    extent(values).map(|[_, hi]| hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_maps_and_extrapolates() {
        let scale = LinearScale::new([0.0, 100.0], [0.0, 500.0]);
        assert_eq!(scale.apply(50.0), 250.0);
        assert_eq!(scale.apply(150.0), 750.0);
    }

    #[test]
    fn linear_reversed_range() {
        let scale = LinearScale::new([0.0, 10.0], [400.0, 0.0]);
        assert_eq!(scale.apply(0.0), 400.0);
        assert_eq!(scale.apply(10.0), 0.0);
    }

    #[test]
    fn linear_degenerate_domain_maps_to_range_start() {
        let scale = LinearScale::new([5.0, 5.0], [10.0, 20.0]);
        assert_eq!(scale.apply(5.0), 10.0);
        assert_eq!(scale.apply(7.0), 10.0);
        assert!(scale.apply(f64::NAN).is_nan());
    }

    #[test]
    fn linear_nan_domain_propagates() {
        let scale = LinearScale::new([f64::NAN, f64::NAN], [0.0, 100.0]);
        assert!(scale.apply(1.0).is_nan());
        assert!(scale.ticks(10).is_empty());
    }

    #[test]
    fn ticks_are_round_numbers() {
        let scale = LinearScale::new([0.0, 1.0], [0.0, 1.0]);
        assert_eq!(
            scale.ticks(10),
            vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]
        );

        let scale = LinearScale::new([3.0, 97.0], [0.0, 1.0]);
        assert_eq!(
            scale.ticks(10),
            vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0]
        );

        let scale = LinearScale::new([0.0, 1000.0], [0.0, 1.0]);
        assert_eq!(scale.ticks(5), vec![0.0, 200.0, 400.0, 600.0, 800.0, 1000.0]);
    }

    #[test]
    fn ticks_ignore_domain_direction() {
        let scale = LinearScale::new([10.0, 0.0], [0.0, 1.0]);
        assert_eq!(scale.ticks(5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn tick_precision_follows_step() {
        assert_eq!(LinearScale::new([0.0, 1.0], [0.0, 1.0]).tick_precision(10), 1);
        assert_eq!(LinearScale::new([0.0, 100.0], [0.0, 1.0]).tick_precision(10), 0);
        assert_eq!(LinearScale::new([0.0, 0.05], [0.0, 1.0]).tick_precision(10), 3);
    }

    #[test]
    fn sqrt_scale_maps_area() {
        let scale = SqrtScale::new([0.0, 100.0], [0.0, 10.0]);
        assert_eq!(scale.apply(0.0), 0.0);
        assert_eq!(scale.apply(25.0), 5.0);
        assert_eq!(scale.apply(100.0), 10.0);
        assert_eq!(scale.apply(-25.0), -5.0);
    }

    #[test]
    fn ordinal_assigns_in_first_seen_order() {
        let mut scale = OrdinalScale::category10();
        scale.set_domain(["asia", "europe", "asia", "africa"]);
        assert_eq!(scale.domain(), &["asia", "europe", "africa"]);
        assert_eq!(scale.apply("asia"), CATEGORY10[0]);
        assert_eq!(scale.apply("europe"), CATEGORY10[1]);
        assert_eq!(scale.apply("africa"), CATEGORY10[2]);
        // unknown keys take the next slot
        assert_eq!(scale.apply("oceania"), CATEGORY10[3]);
    }

    #[test]
    fn ordinal_insert_gives_new_keys_their_own_slots() {
        let mut scale = OrdinalScale::category10();
        scale.set_domain(["asia"]);
        assert_eq!(scale.insert("europe"), 1);
        assert_eq!(scale.insert("africa"), 2);
        assert_eq!(scale.insert("asia"), 0);
        assert_eq!(scale.domain(), &["asia", "europe", "africa"]);
        assert_ne!(scale.apply("europe"), scale.apply("africa"));
    }

    #[test]
    fn ordinal_wraps_range() {
        let mut scale = OrdinalScale::with_range(vec![Rgb::BLACK, Rgb::WHITE]);
        scale.set_domain(["a", "b", "c"]);
        assert_eq!(scale.apply("c"), Rgb::BLACK);
    }

    #[test]
    fn extent_skips_nan() {
        assert_eq!(extent([3.0, f64::NAN, -1.0, 7.0]), Some([-1.0, 7.0]));
        assert_eq!(extent([f64::NAN]), None);
        assert_eq!(extent(Vec::new()), None);
        assert_eq!(max([1.0, 4.0, f64::NAN]), Some(4.0));
    }
}
