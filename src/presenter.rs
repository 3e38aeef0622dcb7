// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The presentation loop body.
//!
//! One iteration reads the camera once, pulls one frame per region of the
//! current slide, composites them in descriptor order onto a fresh copy of
//! the slide background and hands the result back for display.

use crate::error::CameraFailure;
use crate::io::media::{Frame, FrameStream};
use crate::loader::LoadedDeck;
use crate::render::Compositor;
use crate::state::{Command, Phase, PresentationState};
use image::imageops;
use std::collections::HashSet;

/// Owns the loaded deck and the shared camera for the lifetime of a
/// presentation.
pub struct Presenter {
    deck: LoadedDeck,
    camera: Option<Box<dyn FrameStream>>,
    compositor: Compositor,
    mirror_camera: bool,
    released: bool,
    /// `(slide, region)` pairs whose last pull failed
    failing: HashSet<(usize, usize)>,
}

impl Presenter {
    pub fn new(
        deck: LoadedDeck,
        camera: Box<dyn FrameStream>,
        compositor: Compositor,
        mirror_camera: bool,
    ) -> Self {
        Self {
            deck,
            camera: Some(camera),
            compositor,
            mirror_camera,
            released: false,
            failing: HashSet::new(),
        }
    }

    /// Initial phase: running on the first slide.
    pub fn start(&self) -> Phase {
        if self.deck.is_empty() {
            Phase::Terminated
        } else {
            Phase::Running(PresentationState::new(self.deck.len()))
        }
    }

    pub fn slide_name(&self, state: PresentationState) -> &str {
        &self.deck.slides[state.index()].name
    }

    /// Apply a command and return the next phase. Quitting releases every
    /// device.
    pub fn handle(&mut self, phase: Phase, command: Command) -> Phase {
        let next = phase.apply(command);
        match (phase, next) {
            (Phase::Running(state), Phase::Running(_)) if command == Command::Restart => {
                self.restart_videos(state);
            }
            (Phase::Running(_), Phase::Terminated) => self.shutdown(),
            _ => {}
        }
        if let (Phase::Running(from), Phase::Running(to)) = (phase, next) {
            if from != to {
                log::info!("Slide {} -> {}", from.index() + 1, to.index() + 1);
            }
        }
        next
    }

    /// Rewind every video on the current slide.
    fn restart_videos(&mut self, state: PresentationState) {
        let slide = &mut self.deck.slides[state.index()];
        let mut restarted = 0;
        for region in slide.regions.iter_mut().filter(|r| r.source.is_video()) {
            region.source.rewind();
            restarted += 1;
        }
        log::info!("Restarted {} videos on slide {}", restarted, state.index() + 1);
    }

    /// Run one iteration for `state` and return the composited canvas.
    ///
    /// A camera failure is terminal: devices are released before the error
    /// is returned.
    pub fn render(&mut self, state: PresentationState) -> Result<Frame, CameraFailure> {
        let camera = match self.read_camera() {
            Ok(frame) => frame,
            Err(e) => {
                self.shutdown();
                return Err(e);
            }
        };

        let slide = &mut self.deck.slides[state.index()];
        let mut canvas = slide.background.clone();
        for (index, region) in slide.regions.iter_mut().enumerate() {
            let Some(placement) = region.placement else {
                continue;
            };
            let key = (state.index(), index);
            match region.source.pull(&camera) {
                Ok(content) => {
                    if self.failing.remove(&key) {
                        log::info!("Slide {} region {} recovered", slide.name, index + 1);
                    }
                    if let Some(content) = content {
                        self.compositor.blit(&mut canvas, &placement, &content);
                    }
                }
                Err(e) => {
                    if self.failing.insert(key) {
                        log::error!(
                            "Slide {} {} region {}: {:#}",
                            slide.name,
                            region.source.kind(),
                            index + 1,
                            e
                        );
                    } else {
                        log::debug!("Slide {} region {}: {:#}", slide.name, index + 1, e);
                    }
                }
            }
        }
        Ok(canvas)
    }

    fn read_camera(&mut self) -> Result<Frame, CameraFailure> {
        let camera = self.camera.as_mut().ok_or(CameraFailure::Released)?;
        let mut frame = camera
            .read_frame()
            .map_err(CameraFailure::Read)?
            .ok_or(CameraFailure::Exhausted)?;
        if self.mirror_camera {
            imageops::flip_horizontal_in_place(&mut frame);
        }
        Ok(frame)
    }

    /// Release the camera and every content source. Safe to call more than
    /// once; only the first call releases anything.
    pub fn shutdown(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let videos = self.deck.video_count();
        for slide in &mut self.deck.slides {
            slide.regions.clear();
        }
        drop(self.camera.take());
        log::info!("Released camera and {} video sources", videos);
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for Presenter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tests::{solid, ScriptedStream};
    use crate::content::{ContentSource, VideoSource};
    use crate::loader::{LoadedRegion, LoadedSlide};
    use crate::models::Placement;
    use anyhow::Result;
    use image::imageops::FilterType;
    use image::Rgb;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Stream that counts how often it is dropped.
    struct DropCounting {
        inner: ScriptedStream,
        drops: Rc<Cell<usize>>,
    }

    impl FrameStream for DropCounting {
        fn read_frame(&mut self) -> Result<Option<Frame>> {
            self.inner.read_frame()
        }

        fn rewind(&mut self) -> Result<()> {
            self.inner.rewind()
        }
    }

    impl Drop for DropCounting {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn full_box() -> Option<Placement> {
        Some(Placement::Boxed {
            x: 0.5,
            y: 0.5,
            width: 1.0,
            height: 1.0,
        })
    }

    fn slide(name: &str, regions: Vec<LoadedRegion>) -> LoadedSlide {
        LoadedSlide {
            name: name.to_string(),
            background: Frame::from_pixel(4, 2, Rgb([0, 0, 0])),
            regions,
        }
    }

    fn presenter(slides: Vec<LoadedSlide>, camera: Vec<Frame>) -> Presenter {
        Presenter::new(
            LoadedDeck { slides },
            Box::new(ScriptedStream::new(camera)),
            Compositor::new(FilterType::Nearest),
            false,
        )
    }

    #[test]
    fn test_background_does_not_accumulate_overlays() {
        let region = LoadedRegion {
            placement: full_box(),
            source: ContentSource::Camera,
        };
        let mut presenter = presenter(vec![slide("a", vec![region])], vec![solid(50); 3]);
        let Phase::Running(state) = presenter.start() else {
            panic!("deck should start running");
        };

        assert_eq!(presenter.render(state).unwrap(), solid(50));
        assert_eq!(presenter.deck.slides[0].background, solid(0));
    }

    #[test]
    fn test_camera_is_mirrored() {
        let mut camera = Frame::from_pixel(4, 2, Rgb([0, 0, 0]));
        camera.put_pixel(0, 0, Rgb([255, 255, 255]));
        let region = LoadedRegion {
            placement: full_box(),
            source: ContentSource::Camera,
        };
        let mut presenter = presenter(vec![slide("a", vec![region])], vec![camera]);
        presenter.mirror_camera = true;

        let canvas = presenter.render(PresentationState::new(1)).unwrap();
        assert_eq!(canvas.get_pixel(3, 0), &Rgb([255, 255, 255]));
        assert_eq!(canvas.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_camera_failure_is_terminal_and_releases() {
        let mut presenter = presenter(vec![slide("a", Vec::new())], vec![solid(1)]);
        let state = PresentationState::new(1);
        assert!(presenter.render(state).is_ok());
        assert!(matches!(
            presenter.render(state),
            Err(CameraFailure::Exhausted)
        ));
        assert!(presenter.is_released());
        assert!(matches!(
            presenter.render(state),
            Err(CameraFailure::Released)
        ));
    }

    #[test]
    fn test_restart_only_touches_current_slide() {
        let first = ScriptedStream::new(vec![solid(1), solid(2)]);
        let second = ScriptedStream::new(vec![solid(3)]);
        let (first_rewinds, second_rewinds) = (first.rewind_counter(), second.rewind_counter());
        let slides = vec![
            slide(
                "a",
                vec![LoadedRegion {
                    placement: full_box(),
                    source: ContentSource::Video(VideoSource::new(Box::new(first), "a.mp4")),
                }],
            ),
            slide(
                "b",
                vec![LoadedRegion {
                    placement: full_box(),
                    source: ContentSource::Video(VideoSource::new(Box::new(second), "b.mp4")),
                }],
            ),
        ];
        let mut presenter = presenter(slides, vec![solid(0); 8]);
        let phase = presenter.start();
        let Phase::Running(state) = phase else {
            panic!("deck should start running");
        };

        assert_eq!(presenter.render(state).unwrap(), solid(1));
        assert_eq!(presenter.render(state).unwrap(), solid(2));
        assert_eq!(presenter.render(state).unwrap(), solid(2));

        let phase = presenter.handle(phase, Command::Restart);
        assert_eq!(phase, Phase::Running(state));
        assert_eq!((first_rewinds.get(), second_rewinds.get()), (1, 0));
        assert_eq!(presenter.render(state).unwrap(), solid(1));

        let phase = presenter.handle(phase, Command::Next);
        assert_eq!(phase, Phase::Running(state.next()));
        assert_eq!(presenter.slide_name(state.next()), "b");
    }

    #[test]
    fn test_failing_region_does_not_stop_others() {
        let failing: crate::content::registry::SharedTransform =
            Rc::new(|_: &Frame| -> Result<Frame> { anyhow::bail!("boom") });
        let regions = vec![
            LoadedRegion {
                placement: full_box(),
                source: ContentSource::Camera,
            },
            LoadedRegion {
                placement: full_box(),
                source: ContentSource::Callback {
                    id: "fx.boom".to_string(),
                    transform: failing,
                },
            },
            LoadedRegion {
                placement: None,
                source: ContentSource::Camera,
            },
            LoadedRegion {
                placement: full_box(),
                source: ContentSource::Disabled,
            },
        ];
        let mut presenter = presenter(vec![slide("a", regions)], vec![solid(77)]);
        assert_eq!(presenter.render(PresentationState::new(1)).unwrap(), solid(77));
    }

    #[test]
    fn test_quit_releases_every_handle_once() {
        let drops = Rc::new(Cell::new(0));
        let stream = |frames: Vec<Frame>| -> Box<dyn FrameStream> {
            Box::new(DropCounting {
                inner: ScriptedStream::new(frames),
                drops: Rc::clone(&drops),
            })
        };
        let slides = vec![
            slide(
                "a",
                vec![LoadedRegion {
                    placement: full_box(),
                    source: ContentSource::Video(VideoSource::new(stream(vec![solid(1)]), "a.mp4")),
                }],
            ),
            slide(
                "b",
                vec![LoadedRegion {
                    placement: full_box(),
                    source: ContentSource::Video(VideoSource::new(stream(vec![solid(2)]), "b.mp4")),
                }],
            ),
        ];
        let mut presenter = Presenter::new(
            LoadedDeck { slides },
            stream(vec![solid(0)]),
            Compositor::default(),
            true,
        );

        let phase = presenter.handle(presenter.start(), Command::Next);
        let phase = presenter.handle(phase, Command::Quit);
        assert_eq!(phase, Phase::Terminated);
        assert_eq!(drops.get(), 3);

        presenter.shutdown();
        drop(presenter);
        assert_eq!(drops.get(), 3);
    }

    #[test]
    fn test_repeated_failures_are_tracked_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let flaky: crate::content::registry::SharedTransform =
            Rc::new(move |frame: &Frame| -> Result<Frame> {
                counter.set(counter.get() + 1);
                if counter.get() <= 2 {
                    anyhow::bail!("warming up");
                }
                Ok(frame.clone())
            });
        let region = LoadedRegion {
            placement: full_box(),
            source: ContentSource::Callback {
                id: "fx.flaky".to_string(),
                transform: flaky,
            },
        };
        let mut presenter = presenter(vec![slide("a", vec![region])], vec![solid(9); 3]);
        let state = PresentationState::new(1);

        assert_eq!(presenter.render(state).unwrap(), solid(0));
        assert_eq!(presenter.render(state).unwrap(), solid(0));
        assert_eq!(presenter.failing.len(), 1);

        assert_eq!(presenter.render(state).unwrap(), solid(9));
        assert!(presenter.failing.is_empty());
        assert_eq!(calls.get(), 3);
    }
}
