//! Scene Plotter Module
//! Paints a chart scene into an egui painter for the interactive viewer.

use crate::charts::color::Rgb;
use crate::charts::scene::{AxisState, Scene};
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2};

const BACKGROUND: Color32 = Color32::WHITE;
const INK: Color32 = Color32::BLACK;

/// Maps scene (svg pixel) coordinates into a screen rect.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    origin: Pos2,
    scale: f32,
}

impl Viewport {
    /// Fit a `width` x `height` scene into `rect`, keeping its aspect ratio.
    pub fn fit(rect: Rect, width: f64, height: f64) -> Self {
        let sx = rect.width() / width.max(1.0) as f32;
        let sy = rect.height() / height.max(1.0) as f32;
        let scale = sx.min(sy).max(0.0);
        let used = Vec2::new(width as f32 * scale, height as f32 * scale);
        let origin = rect.min + (rect.size() - used) / 2.0;
        Self { origin, scale }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn to_screen(&self, x: f64, y: f64) -> Pos2 {
        self.origin + Vec2::new(x as f32, y as f32) * self.scale
    }

    pub fn to_scene(&self, pos: Pos2) -> (f64, f64) {
        if self.scale <= 0.0 {
            return (f64::NAN, f64::NAN);
        }
        let local = (pos - self.origin) / self.scale;
        (local.x as f64, local.y as f64)
    }
}

pub struct ScenePlotter;

impl ScenePlotter {
    /// Paint `scene` into `rect` and return the viewport used.
    pub fn paint(painter: &Painter, rect: Rect, scene: &Scene) -> Viewport {
        let view = Viewport::fit(rect, scene.width, scene.height);
        let canvas = Rect::from_min_max(
            view.to_screen(0.0, 0.0),
            view.to_screen(scene.width, scene.height),
        );
        painter.rect_filled(canvas, 0.0, BACKGROUND);

        let (left, top) = (scene.margin.left, scene.margin.top);

        for dot in &scene.dots {
            let a = &dot.attrs;
            if !(a.cx.is_finite() && a.cy.is_finite() && a.r.is_finite()) || a.r <= 0.0 {
                continue;
            }
            let center = view.to_screen(left + a.cx, top + a.cy);
            let radius = a.r as f32 * view.scale;
            let fill = color32(a.fill, a.fill_opacity);
            let stroke = Stroke::new(1.0, INK.gamma_multiply(a.stroke_opacity.clamp(0.0, 1.0) as f32));
            painter.circle(center, radius, fill, stroke);
        }

        for axis in [&scene.x_axis, &scene.y_axis] {
            Self::paint_axis(painter, &view, axis, (left, top));
        }

        view
    }

    /// Index of the topmost dot under `pointer`, if any.
    pub fn hit_test(scene: &Scene, view: &Viewport, pointer: Pos2) -> Option<usize> {
        let (x, y) = view.to_scene(pointer);
        let (x, y) = (x - scene.margin.left, y - scene.margin.top);
        scene.dots.iter().rposition(|dot| {
            let a = &dot.attrs;
            let (dx, dy) = (a.cx - x, a.cy - y);
            a.fill_opacity > 0.5 && dx * dx + dy * dy <= a.r * a.r
        })
    }

    fn paint_axis(painter: &Painter, view: &Viewport, axis: &AxisState, origin: (f64, f64)) {
        let base = (origin.0 + axis.translate[0], origin.1 + axis.translate[1]);
        if !(base.0.is_finite() && base.1.is_finite()) {
            return;
        }
        let at = |x: f64, y: f64| view.to_screen(base.0 + x, base.1 + y);
        let stroke = Stroke::new(1.0, INK);

        let [r0, r1] = axis.range;
        let (ox, oy) = axis.orient.tick_line_end(axis.tick_size);
        let domain = if axis.orient.is_horizontal() {
            vec![at(r0, oy), at(r0, 0.0), at(r1, 0.0), at(r1, oy)]
        } else {
            vec![at(ox, r0), at(0.0, r0), at(0.0, r1), at(ox, r1)]
        };
        painter.add(egui::Shape::line(domain, stroke));

        let (lx, ly) = axis.orient.label_offset(axis.tick_size, axis.tick_padding);
        let align = if axis.orient.is_horizontal() {
            Align2::CENTER_TOP
        } else {
            Align2::RIGHT_CENTER
        };
        let font = FontId::proportional((10.0 * view.scale()).max(6.0));

        for tick in &axis.ticks {
            if !tick.position.is_finite() {
                continue;
            }
            let (tx, ty) = axis.tick_origin(tick.position);
            let color = INK.gamma_multiply(tick.opacity.clamp(0.0, 1.0) as f32);
            painter.line_segment([at(tx, ty), at(tx + ox, ty + oy)], Stroke::new(1.0, color));
            painter.text(at(tx + lx, ty + ly), align, &tick.label, font.clone(), color);
        }
    }
}

fn color32(rgb: Rgb, opacity: f64) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(rgb.r, rgb.g, rgb.b, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_keeps_aspect_ratio() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 10.0), Vec2::new(480.0, 500.0));
        let view = Viewport::fit(rect, 960.0, 500.0);
        assert_eq!(view.scale(), 0.5);

        // Letterboxed vertically: 250px used of 500
        let top_left = view.to_screen(0.0, 0.0);
        assert_eq!(top_left, Pos2::new(10.0, 135.0));
        let (x, y) = view.to_scene(view.to_screen(100.0, 40.0));
        assert!((x - 100.0).abs() < 1e-3 && (y - 40.0).abs() < 1e-3);
    }

    #[test]
    fn opacity_maps_to_alpha() {
        let c = color32(Rgb::new(31, 119, 180), 1.0);
        assert_eq!(c.a(), 255);
        assert_eq!(color32(Rgb::WHITE, 1e-6).a(), 0);
    }
}
