//! Static Chart Renderer
//! Rasterizes a scene to PNG with plotters, for exports and reports.
//!
//! Layout follows the SVG output exactly: the plot area is translated by the
//! margins, dots are painted first (largest underneath), axes on top.

use crate::charts::scene::{AxisState, Scene};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid image size {0}x{1}")]
    InvalidSize(f64, f64),
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

const AXIS_COLOR: RGBColor = RGBColor(0, 0, 0);
const LABEL_SIZE: f64 = 10.0;

type Area<'a> = DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the scene to PNG bytes in memory.
    pub fn render_png(scene: &Scene) -> Result<Vec<u8>, RenderError> {
        let (width, height) = Self::pixel_size(scene)?;
        let mut buffer = vec![0u8; (width * height * 3) as usize];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(drawing)?;

            let origin = (scene.margin.left, scene.margin.top);
            Self::draw_dots(&root, scene, origin)?;

            let mut labels_ok = true;
            for axis in [&scene.x_axis, &scene.y_axis] {
                Self::draw_axis(&root, axis, origin, &mut labels_ok)?;
            }
            if !labels_ok {
                log::warn!("Tick labels skipped: no usable font for the PNG renderer");
            }

            root.present().map_err(drawing)?;
        }

        let image = RgbImage::from_raw(width, height, buffer)
            .ok_or(RenderError::InvalidSize(scene.width, scene.height))?;
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Render the scene and write it to `path` as PNG.
    pub fn save_png(scene: &Scene, path: &Path) -> Result<(), RenderError> {
        let bytes = Self::render_png(scene)?;
        std::fs::write(path, bytes)?;
        log::info!("Saved PNG chart to {}", path.display());
        Ok(())
    }

    fn pixel_size(scene: &Scene) -> Result<(u32, u32), RenderError> {
        let valid = |v: f64| (1.0..=16384.0).contains(&v);
        if !valid(scene.width) || !valid(scene.height) {
            return Err(RenderError::InvalidSize(scene.width, scene.height));
        }
        Ok((scene.width.round() as u32, scene.height.round() as u32))
    }

    fn draw_dots(root: &Area<'_>, scene: &Scene, origin: (f64, f64)) -> Result<(), RenderError> {
        for dot in &scene.dots {
            let a = &dot.attrs;
            // NaN positions are simply not visible
            if !(a.cx.is_finite() && a.cy.is_finite() && a.r.is_finite()) || a.r <= 0.0 {
                continue;
            }

            let center = pixel(origin.0 + a.cx, origin.1 + a.cy);
            let fill = RGBColor(a.fill.r, a.fill.g, a.fill.b).mix(a.fill_opacity.clamp(0.0, 1.0));
            let stroke = AXIS_COLOR.mix(a.stroke_opacity.clamp(0.0, 1.0));

            root.draw(&Circle::new(center, a.r, fill.filled()))
                .map_err(drawing)?;
            root.draw(&Circle::new(center, a.r, stroke.stroke_width(1)))
                .map_err(drawing)?;
        }
        Ok(())
    }

    fn draw_axis(
        root: &Area<'_>,
        axis: &AxisState,
        origin: (f64, f64),
        labels_ok: &mut bool,
    ) -> Result<(), RenderError> {
        let base = (origin.0 + axis.translate[0], origin.1 + axis.translate[1]);
        if !(base.0.is_finite() && base.1.is_finite()) {
            return Ok(());
        }
        let at = |x: f64, y: f64| pixel(base.0 + x, base.1 + y);

        // Domain line with outer ticks
        let [r0, r1] = axis.range;
        let (ox, oy) = axis.orient.tick_line_end(axis.tick_size);
        let domain = if axis.orient.is_horizontal() {
            vec![at(r0, oy), at(r0, 0.0), at(r1, 0.0), at(r1, oy)]
        } else {
            vec![at(ox, r0), at(0.0, r0), at(0.0, r1), at(ox, r1)]
        };
        root.draw(&PathElement::new(domain, AXIS_COLOR.stroke_width(1)))
            .map_err(drawing)?;

        let (lx, ly) = axis.orient.label_offset(axis.tick_size, axis.tick_padding);
        let anchor = if axis.orient.is_horizontal() {
            Pos::new(HPos::Center, VPos::Top)
        } else {
            Pos::new(HPos::Right, VPos::Center)
        };

        for tick in &axis.ticks {
            if !tick.position.is_finite() {
                continue;
            }
            let (tx, ty) = axis.tick_origin(tick.position);
            let color = AXIS_COLOR.mix(tick.opacity.clamp(0.0, 1.0));

            root.draw(&PathElement::new(
                vec![at(tx, ty), at(tx + ox, ty + oy)],
                color.stroke_width(1),
            ))
            .map_err(drawing)?;

            if *labels_ok {
                let style = ("sans-serif", LABEL_SIZE)
                    .into_font()
                    .color(&color)
                    .pos(anchor);
                let label = Text::new(tick.label.clone(), at(tx + lx, ty + ly), style);
                if root.draw(&label).is_err() {
                    *labels_ok = false;
                }
            }
        }
        Ok(())
    }
}

fn pixel(x: f64, y: f64) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

fn drawing<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Drawing(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::dot_chart::{ChartTarget, DotChart};

    fn scene() -> Scene {
        let mut chart = DotChart::<[f64; 2]>::new();
        chart.set_width(320.0).set_height(200.0);
        chart
            .render(&mut ChartTarget::new(), &[[1.0, 1.0], [2.0, 3.0], [f64::NAN, 0.0]])
            .end()
    }

    #[test]
    fn renders_png_of_scene_size() {
        let bytes = StaticChartRenderer::render_png(&scene()).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 320);
        assert_eq!(decoded.height(), 200);
    }

    #[test]
    fn rejects_degenerate_size() {
        let mut scene = scene();
        scene.width = 0.0;
        assert!(matches!(
            StaticChartRenderer::render_png(&scene),
            Err(RenderError::InvalidSize(_, _))
        ));
    }

    #[test]
    fn saves_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        StaticChartRenderer::save_png(&scene(), &path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }
}
