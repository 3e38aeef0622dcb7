// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Presentation window and egui App implementation.
//!
//! Every repaint runs one presentation iteration: render the current
//! slide, upload it, then poll the keyboard for navigation commands.

use crate::ui::canvas;
use phislides::config::KeyBindings;
use phislides::presenter::Presenter;
use phislides::state::{Command, Phase};
use phislides::Frame;

/// Keyboard bindings resolved to egui keys.
struct KeyMap {
    bindings: Vec<(egui::Key, Command)>,
}

impl KeyMap {
    fn new(keys: &KeyBindings) -> Self {
        let groups = [
            (&keys.quit, Command::Quit),
            (&keys.next, Command::Next),
            (&keys.previous, Command::Previous),
            (&keys.restart, Command::Restart),
        ];

        let mut bindings = Vec::new();
        for (names, command) in groups {
            for name in names {
                match egui::Key::from_name(name) {
                    Some(key) => bindings.push((key, command)),
                    None => log::warn!("Unknown key '{}' bound to {:?}", name, command),
                }
            }
        }
        Self { bindings }
    }

    /// Commands whose keys were pressed this frame, in binding order.
    fn pressed(&self, ctx: &egui::Context) -> Vec<Command> {
        ctx.input(|i| {
            self.bindings
                .iter()
                .filter(|(key, _)| i.key_pressed(*key))
                .map(|(_, command)| *command)
                .collect()
        })
    }
}

/// Main application state.
pub struct PhiSlidesApp {
    presenter: Presenter,

    /// Current slide, or terminated
    phase: Phase,

    keys: KeyMap,

    /// Texture holding the last composited frame
    texture: Option<egui::TextureHandle>,

    /// Size of the last composited frame (width, height)
    frame_size: Option<(u32, u32)>,
}

impl PhiSlidesApp {
    pub fn new(presenter: Presenter, keys: &KeyBindings) -> Self {
        let phase = presenter.start();
        Self {
            presenter,
            phase,
            keys: KeyMap::new(keys),
            texture: None,
            frame_size: None,
        }
    }

    fn upload(&mut self, ctx: &egui::Context, frame: &Frame) {
        let (width, height) = frame.dimensions();
        let image = egui::ColorImage::from_rgb([width as usize, height as usize], frame.as_raw());
        match self.texture {
            Some(ref mut texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("slide", image, egui::TextureOptions::LINEAR));
            }
        }
        self.frame_size = Some((width, height));
    }

    fn close(&mut self, ctx: &egui::Context) {
        self.phase = Phase::Terminated;
        self.presenter.shutdown();
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

impl eframe::App for PhiSlidesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let Phase::Running(state) = self.phase else {
            self.close(ctx);
            return;
        };

        match self.presenter.render(state) {
            Ok(frame) => self.upload(ctx, &frame),
            Err(e) => {
                log::error!("Ending presentation: {}", e);
                self.close(ctx);
                return;
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                canvas::show(ui, &self.texture, self.frame_size);
            });

        for command in self.keys.pressed(ctx) {
            self.phase = self.presenter.handle(self.phase, command);
            if let Phase::Running(next) = self.phase {
                log::debug!("{:?} -> {}", command, self.presenter.slide_name(next));
            } else {
                self.close(ctx);
                return;
            }
        }

        ctx.request_repaint();
    }
}
