//! Chart Viewer Widget
//! Central panel playing the chart's transitions live, with a frame slider
//! and play/pause controls.

use crate::charts::{Scene, ScenePlotter, Transition};
use crate::playback::Playback;
use egui::{RichText, Sense};
use std::time::{Duration, Instant};

/// Pause on each finished frame while playing.
const FRAME_HOLD: Duration = Duration::from_millis(400);

/// Live view of a playback.
#[derive(Default)]
pub struct ChartViewer {
    playback: Option<Playback>,
    transition: Option<Transition>,
    started: Option<Instant>,
    playing: bool,
    slider: usize,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Replace the playback and show its first frame.
    pub fn set_playback(&mut self, playback: Playback) {
        self.clear();
        self.playback = Some(playback);
        self.step(0);
    }

    pub fn has_chart(&self) -> bool {
        self.transition.is_some()
    }

    /// Transition into the frame on screen.
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// The frame on screen once its transition has finished.
    pub fn scene(&self) -> Option<Scene> {
        self.transition.as_ref().map(Transition::end)
    }

    pub fn frame_label(&self) -> Option<&str> {
        let playback = self.playback.as_ref()?;
        let index = playback.current()?;
        Some(playback.frames()[index].label.as_str())
    }

    fn step(&mut self, index: usize) {
        let Some(playback) = &mut self.playback else {
            return;
        };
        if let Some(transition) = playback.show(index) {
            let counts = transition.counts();
            log::debug!(
                "Viewer frame {}: +{} ~{} -{}",
                index,
                counts.enter,
                counts.update,
                counts.exit
            );
            self.transition = Some(transition);
            self.started = Some(Instant::now());
            self.slider = index;
        }
    }

    fn elapsed(&self) -> Duration {
        self.started.map(|s| s.elapsed()).unwrap_or_default()
    }

    /// Advance playback once the current transition and hold are over.
    fn tick(&mut self) {
        let (Some(playback), Some(transition)) = (&self.playback, &self.transition) else {
            return;
        };
        if !self.playing || self.elapsed() < transition.duration + FRAME_HOLD {
            return;
        }
        let next = playback.current().map_or(0, |i| i + 1);
        if next < playback.len() {
            self.step(next);
        } else {
            self.playing = false;
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let Some(frame_count) = self.playback.as_ref().map(Playback::len) else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        self.tick();

        // ===== Playback controls =====
        ui.horizontal(|ui| {
            let label = if self.playing { "⏸ Pause" } else { "▶ Play" };
            if ui.add_enabled(frame_count > 1, egui::Button::new(label)).clicked() {
                self.playing = !self.playing;
                if self.playing && self.slider + 1 >= frame_count {
                    self.step(0);
                }
            }

            let mut index = self.slider;
            let slider = egui::Slider::new(&mut index, 0..=frame_count.saturating_sub(1))
                .show_value(false);
            if ui.add_enabled(frame_count > 1, slider).changed() && index != self.slider {
                self.playing = false;
                self.step(index);
            }

            if let Some(label) = self.frame_label() {
                ui.label(RichText::new(label).size(18.0).strong());
            }
        });
        ui.separator();

        let Some(transition) = &self.transition else {
            return;
        };

        let t = transition.progress(self.elapsed());
        let scene = transition.sample(t);

        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
        let view = ScenePlotter::paint(&painter, response.rect, &scene);

        if let Some(pointer) = response.hover_pos() {
            if let Some(index) = ScenePlotter::hit_test(&scene, &view, pointer) {
                let datum = &scene.dots[index].datum;
                response.on_hover_text_at_pointer(format!(
                    "{}\nx: {}\ny: {}\nr: {}\ncolor: {}",
                    datum.key, datum.x, datum.y, datum.r, datum.z
                ));
            }
        }

        if t < 1.0 || self.playing {
            ctx.request_repaint();
        }
    }
}
