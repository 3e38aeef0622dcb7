// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Presentation canvas.
//!
//! Shows the composited slide letterboxed into the available space.

/// Fit an image into the available area, preserving its aspect ratio.
pub fn fit_rect(available: egui::Rect, img_width: u32, img_height: u32) -> egui::Rect {
    let img_aspect = img_width as f32 / img_height as f32;
    let available_aspect = available.width() / available.height();

    let (display_width, display_height) = if img_aspect > available_aspect {
        // Image is wider - fit to width
        let width = available.width();
        (width, width / img_aspect)
    } else {
        // Image is taller - fit to height
        let height = available.height();
        (height * img_aspect, height)
    };

    egui::Rect::from_center_size(available.center(), egui::vec2(display_width, display_height))
}

/// Display the current slide frame.
pub fn show(
    ui: &mut egui::Ui,
    texture: &Option<egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
) {
    let available = ui.max_rect();
    ui.painter().rect_filled(available, 0.0, egui::Color32::BLACK);

    let (Some(texture), Some((img_width, img_height))) = (texture, image_size) else {
        return;
    };
    if img_width == 0 || img_height == 0 {
        return;
    }

    ui.painter().image(
        texture.id(),
        fit_rect(available, img_width, img_height),
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}
