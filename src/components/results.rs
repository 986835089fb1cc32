//! Results panel — renders whatever the session has produced so far:
//! description, creative pack (with extracted color swatches and a save
//! button), story, and the enhanced image.

use crate::palette;
use crate::session::SessionState;
use crate::{log_err, log_info, t};
use eframe::egui;
use egui::{Color32, ColorImage, RichText, TextureHandle, TextureOptions, Vec2};
use image::RgbaImage;

const SWATCH_SIZE: Vec2 = Vec2::new(42.0, 28.0);

#[derive(Default)]
pub struct ResultsPanel {
    /// Texture for the enhanced image, rebuilt when the URL changes.
    enhanced_texture: Option<TextureHandle>,
    enhanced_url: Option<String>,
    /// One-line feedback after a save attempt.
    save_notice: Option<String>,
}

impl ResultsPanel {
    /// `enhanced` carries the decoded pixels matching
    /// `state.enhanced_image_url`, when the download has completed.
    pub fn show(&mut self, ui: &mut egui::Ui, state: &SessionState, enhanced: Option<&RgbaImage>) {
        if !state.analysis_done {
            ui.label(RichText::new(t!("results.empty")).italics().weak());
            return;
        }

        ui.heading(t!("results.description"));
        ui.label(&state.full_response);

        if let Some(pack) = &state.creative_pack {
            ui.separator();
            ui.heading(t!("results.pack"));
            ui.label(pack);
            self.show_swatches(ui, pack);
            self.show_save_button(ui, pack);
        }

        if let Some(story) = &state.story {
            ui.separator();
            ui.heading(t!("results.story"));
            ui.label(story);
        }

        if let Some(url) = &state.enhanced_image_url {
            ui.separator();
            ui.heading(t!("results.enhanced"));
            self.show_enhanced(ui, url, enhanced);
        }
    }

    /// One swatch per extracted hex token. Zero matches renders nothing —
    /// that is a quiet miss, not an error.
    fn show_swatches(&self, ui: &mut egui::Ui, pack: &str) {
        let colors: Vec<(&str, Color32)> = palette::extract_hex_colors(pack)
            .filter_map(|token| palette::parse_color(token).map(|c| (token, c)))
            .collect();
        if colors.is_empty() {
            return;
        }

        ui.add_space(4.0);
        ui.label(RichText::new(t!("results.palette")).strong());
        ui.horizontal_wrapped(|ui| {
            for (token, color) in colors {
                ui.vertical(|ui| {
                    let (rect, _) = ui.allocate_exact_size(SWATCH_SIZE, egui::Sense::hover());
                    ui.painter()
                        .rect_filled(rect, egui::Rounding::same(3.0), color);
                    ui.painter().rect_stroke(
                        rect,
                        egui::Rounding::same(3.0),
                        egui::Stroke::new(1.0, Color32::DARK_GRAY),
                    );
                    ui.label(RichText::new(token).monospace().small());
                });
            }
        });
    }

    fn show_save_button(&mut self, ui: &mut egui::Ui, pack: &str) {
        ui.add_space(4.0);
        if ui.button(t!("action.save_pack")).clicked() {
            if let Some(path) = crate::io::ask_pack_path() {
                match crate::io::write_pack(&path, pack) {
                    Ok(()) => {
                        log_info!("pack saved to {}", path.display());
                        self.save_notice = Some(t!("results.saved", path = path.display()));
                    }
                    Err(e) => {
                        log_err!("pack save failed: {}", e);
                        self.save_notice = Some(t!("results.save_failed", detail = e));
                    }
                }
            }
        }
        if let Some(notice) = &self.save_notice {
            ui.label(RichText::new(notice).weak());
        }
    }

    fn show_enhanced(&mut self, ui: &mut egui::Ui, url: &str, pixels: Option<&RgbaImage>) {
        if self.enhanced_url.as_deref() != Some(url) {
            self.enhanced_texture = None;
            if let Some(img) = pixels {
                let color_image = ColorImage::from_rgba_unmultiplied(
                    [img.width() as usize, img.height() as usize],
                    img.as_raw(),
                );
                self.enhanced_texture = Some(ui.ctx().load_texture(
                    "enhanced_image",
                    color_image,
                    TextureOptions::LINEAR,
                ));
                self.enhanced_url = Some(url.to_string());
            }
        }

        match &self.enhanced_texture {
            Some(texture) => {
                let size = texture.size_vec2();
                ui.image(egui::load::SizedTexture::new(texture.id(), size));
            }
            None => {
                ui.spinner();
            }
        }
        ui.hyperlink(url);
    }
}
