//! SVG Output Module
//! Serializes scenes to static SVG and transitions to SVG animated with SMIL.
//!
//! Markup mirrors the chart skeleton: `svg > g` (inner translate) holding the
//! dots followed by the `x axis` and `y axis` groups.

use crate::charts::axis::Orient;
use crate::charts::scene::{js_number, AxisState, DotAttrs, Scene};
use crate::charts::transition::{AxisTransition, DotTransition, Phase, TickTransition, Transition};
use std::fmt::Write;

const STYLE: &str = ".axis path, .axis line { fill: none; stroke: #000; shape-rendering: crispEdges; } \
.axis text { font: 10px sans-serif; } .dot { stroke: #000; }";

/// Static SVG document for a scene.
pub fn render_scene(scene: &Scene) -> String {
    let mut out = String::new();
    open_svg(&mut out, scene.width, scene.height, None);
    open_inner(&mut out, scene.margin.left, scene.margin.top);

    for dot in &scene.dots {
        let _ = write!(out, "<circle class=\"dot\"");
        dot_attributes(&mut out, &dot.attrs);
        let _ = writeln!(out, "/>");
    }

    static_axis(&mut out, "x axis", &scene.x_axis);
    static_axis(&mut out, "y axis", &scene.y_axis);

    let _ = writeln!(out, "</g>");
    let _ = writeln!(out, "</svg>");
    out
}

/// SVG document that plays the transition once when opened, ending on the
/// transition's final scene.
pub fn render_transition(transition: &Transition) -> String {
    if transition.duration.is_zero() {
        return render_scene(&transition.end());
    }

    let timing = Timing::new(transition);
    let mut out = String::new();

    let resize = (transition.width.to != transition.width.from
        || transition.height.to != transition.height.from)
        .then_some((transition, &timing));
    open_svg(
        &mut out,
        transition.width.from,
        transition.height.from,
        resize,
    );
    open_inner(&mut out, transition.margin.left, transition.margin.top);

    for dot in &transition.dots {
        animated_dot(&mut out, dot, &timing);
    }

    animated_axis(&mut out, "x axis", &transition.x_axis, &timing);
    animated_axis(&mut out, "y axis", &transition.y_axis, &timing);

    let _ = writeln!(out, "</g>");
    let _ = writeln!(out, "</svg>");
    out
}

/// Shared SMIL timing attributes.
struct Timing {
    dur: String,
    spline: String,
}

impl Timing {
    fn new(transition: &Transition) -> Self {
        let dur = format!("{}ms", transition.duration.as_millis());
        let spline = match transition.ease.key_splines() {
            Some(splines) => format!(
                " calcMode=\"spline\" keyTimes=\"0;1\" keySplines=\"{}\"",
                splines
            ),
            None => String::new(),
        };
        Self { dur, spline }
    }

    fn animate(&self, out: &mut String, attribute: &str, from: &str, to: &str) {
        if from == to {
            return;
        }
        let _ = writeln!(
            out,
            "<animate attributeName=\"{}\" from=\"{}\" to=\"{}\" dur=\"{}\" fill=\"freeze\"{}/>",
            attribute, from, to, self.dur, self.spline
        );
    }

    fn animate_number(&self, out: &mut String, attribute: &str, from: f64, to: f64) {
        self.animate(out, attribute, &js_number(from), &js_number(to));
    }

    fn animate_translate(&self, out: &mut String, from: (f64, f64), to: (f64, f64)) {
        if from == to {
            return;
        }
        let _ = writeln!(
            out,
            "<animateTransform attributeName=\"transform\" type=\"translate\" from=\"{} {}\" to=\"{} {}\" dur=\"{}\" fill=\"freeze\"{}/>",
            js_number(from.0),
            js_number(from.1),
            js_number(to.0),
            js_number(to.1),
            self.dur,
            self.spline
        );
    }

    fn remove_at_end(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "<set attributeName=\"visibility\" to=\"hidden\" begin=\"{}\" fill=\"freeze\"/>",
            self.dur
        );
    }
}

fn open_svg(out: &mut String, width: f64, height: f64, resize: Option<(&Transition, &Timing)>) {
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">",
        js_number(width),
        js_number(height)
    );
    if let Some((transition, timing)) = resize {
        timing.animate_number(out, "width", transition.width.from, transition.width.to);
        timing.animate_number(out, "height", transition.height.from, transition.height.to);
    }
    let _ = writeln!(out, "<style>{}</style>", STYLE);
}

fn open_inner(out: &mut String, left: f64, top: f64) {
    let _ = writeln!(
        out,
        "<g transform=\"translate({},{})\">",
        js_number(left),
        js_number(top)
    );
}

fn dot_attributes(out: &mut String, attrs: &DotAttrs) {
    let _ = write!(
        out,
        " cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" fill-opacity=\"{}\" stroke-opacity=\"{}\"",
        js_number(attrs.cx),
        js_number(attrs.cy),
        js_number(attrs.r),
        attrs.fill,
        js_number(attrs.fill_opacity),
        js_number(attrs.stroke_opacity)
    );
}

fn animated_dot(out: &mut String, dot: &DotTransition, timing: &Timing) {
    let _ = write!(out, "<circle class=\"dot\"");
    dot_attributes(out, &dot.from);
    let _ = writeln!(out, ">");

    let (from, to) = (&dot.from, &dot.to);
    timing.animate_number(out, "cx", from.cx, to.cx);
    timing.animate_number(out, "cy", from.cy, to.cy);
    timing.animate_number(out, "r", from.r, to.r);
    timing.animate(out, "fill", &from.fill.to_string(), &to.fill.to_string());
    timing.animate_number(out, "fill-opacity", from.fill_opacity, to.fill_opacity);
    timing.animate_number(out, "stroke-opacity", from.stroke_opacity, to.stroke_opacity);
    if dot.phase == Phase::Exit {
        timing.remove_at_end(out);
    }

    let _ = writeln!(out, "</circle>");
}

fn static_axis(out: &mut String, class: &str, axis: &AxisState) {
    let _ = writeln!(
        out,
        "<g class=\"{}\" transform=\"translate({},{})\">",
        class,
        js_number(axis.translate[0]),
        js_number(axis.translate[1])
    );
    for tick in &axis.ticks {
        open_tick(out, axis, tick.position, tick.opacity);
        tick_body(
            out,
            axis.orient,
            axis.tick_size,
            axis.tick_padding,
            &escape_xml(&tick.label),
        );
        let _ = writeln!(out, "</g>");
    }
    let _ = writeln!(out, "<path class=\"domain\" d=\"{}\"/>", axis.domain_path());
    let _ = writeln!(out, "</g>");
}

fn open_tick(out: &mut String, axis: &AxisState, position: f64, opacity: f64) {
    let (x, y) = axis.tick_origin(position);
    let _ = writeln!(
        out,
        "<g class=\"tick\" transform=\"translate({},{})\" opacity=\"{}\">",
        js_number(x),
        js_number(y),
        js_number(opacity)
    );
}

fn tick_body(out: &mut String, orient: Orient, size: f64, padding: f64, label: &str) {
    let (x2, y2) = orient.tick_line_end(size);
    let (tx, ty) = orient.label_offset(size, padding);
    let _ = writeln!(
        out,
        "<line x2=\"{}\" y2=\"{}\"/>",
        js_number(x2),
        js_number(y2)
    );
    let _ = writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" dy=\"{}\" text-anchor=\"{}\">{}</text>",
        js_number(tx),
        js_number(ty),
        orient.label_dy(),
        orient.label_anchor(),
        label
    );
}

fn animated_axis(out: &mut String, class: &str, axis: &AxisTransition, timing: &Timing) {
    let _ = writeln!(
        out,
        "<g class=\"{}\" transform=\"translate({},{})\">",
        class,
        js_number(axis.translate.from[0]),
        js_number(axis.translate.from[1])
    );
    timing.animate_translate(
        out,
        (axis.translate.from[0], axis.translate.from[1]),
        (axis.translate.to[0], axis.translate.to[1]),
    );

    let state = |range: [f64; 2]| AxisState {
        orient: axis.orient,
        translate: [0.0, 0.0],
        range,
        tick_size: axis.tick_size,
        tick_padding: axis.tick_padding,
        ticks: Vec::new(),
    };
    let (start, end) = (state(axis.range.from), state(axis.range.to));

    for tick in &axis.ticks {
        animated_tick(out, &start, tick, timing);
    }

    let _ = writeln!(out, "<path class=\"domain\" d=\"{}\">", start.domain_path());
    timing.animate(out, "d", &start.domain_path(), &end.domain_path());
    let _ = writeln!(out, "</path>");
    let _ = writeln!(out, "</g>");
}

fn animated_tick(out: &mut String, axis: &AxisState, tick: &TickTransition, timing: &Timing) {
    open_tick(out, axis, tick.from_pos, tick.from_opacity);
    timing.animate_translate(
        out,
        axis.tick_origin(tick.from_pos),
        axis.tick_origin(tick.to_pos),
    );
    timing.animate_number(out, "opacity", tick.from_opacity, tick.to_opacity);
    if tick.phase == Phase::Exit {
        timing.remove_at_end(out);
    }
    tick_body(
        out,
        axis.orient,
        axis.tick_size,
        axis.tick_padding,
        &escape_xml(&tick.label),
    );
    let _ = writeln!(out, "</g>");
}

/// Escape text content and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
