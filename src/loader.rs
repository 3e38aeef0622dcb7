// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Deck loading for the presentation runtime.
//!
//! Loading runs in two passes. The first checks that every file the
//! descriptor references exists, so a broken deck is reported before any
//! device is opened. The second decodes backgrounds and opens one content
//! source per region. Transforms that fail to resolve only disable their
//! own region.

use crate::config::{DescriptorFormat, Resolution};
use crate::content::registry::TransformRegistry;
use crate::content::{ContentSource, VideoSource};
use crate::error::SetupError;
use crate::io::media::{load_background, Frame, FrameStream, MediaBackend};
use crate::io::serialization::import_deck;
use crate::models::deck::{Deck, FUNCTIONS_DIR, SLIDES_DIR, VIDEOS_DIR};
use crate::models::region::{ContentRef, Placement};
use std::path::{Path, PathBuf};

/// Well-known locations inside a deck folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckPaths {
    pub base: PathBuf,
    pub descriptor: PathBuf,
    pub slides: PathBuf,
    pub videos: PathBuf,
    pub functions: PathBuf,
}

impl DeckPaths {
    /// Locations of an existing deck. The descriptor is `slides.yaml`, or
    /// `slides.json` when only that one exists.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        let format = DescriptorFormat::ALL
            .into_iter()
            .find(|format| base.join(format.file_name()).is_file())
            .unwrap_or_default();
        Self::with_format(base, format)
    }

    /// Locations of a deck whose descriptor is written in `format`.
    pub fn with_format(base: impl Into<PathBuf>, format: DescriptorFormat) -> Self {
        let base = base.into();
        Self {
            descriptor: base.join(format.file_name()),
            slides: base.join(SLIDES_DIR),
            videos: base.join(VIDEOS_DIR),
            functions: base.join(FUNCTIONS_DIR),
            base,
        }
    }
}

/// A region ready to be composited.
pub struct LoadedRegion {
    /// `None` for placements of unsupported arity; such regions are skipped.
    pub placement: Option<Placement>,
    pub source: ContentSource,
}

/// A slide with its background decoded at canvas size.
pub struct LoadedSlide {
    pub name: String,
    pub background: Frame,
    pub regions: Vec<LoadedRegion>,
}

/// Every slide of a deck with its content sources open.
pub struct LoadedDeck {
    pub slides: Vec<LoadedSlide>,
}

impl LoadedDeck {
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn video_count(&self) -> usize {
        self.slides
            .iter()
            .flat_map(|slide| &slide.regions)
            .filter(|region| region.source.is_video())
            .count()
    }
}

/// Read the descriptor of a deck folder and check every file it names.
pub fn read_descriptor(paths: &DeckPaths) -> Result<Deck, SetupError> {
    if !paths.base.is_dir() {
        return Err(SetupError::MissingBaseFolder(paths.base.clone()));
    }
    if !paths.descriptor.is_file() {
        return Err(SetupError::MissingDescriptor(paths.descriptor.clone()));
    }
    let deck = import_deck(&paths.descriptor).map_err(|source| SetupError::Descriptor {
        path: paths.descriptor.clone(),
        source,
    })?;
    if deck.is_empty() {
        return Err(SetupError::EmptyDeck(paths.descriptor.clone()));
    }

    for slide in &deck.slides {
        let image = paths.slides.join(&slide.img_slide);
        if !image.is_file() {
            return Err(SetupError::MissingSlideImage(image));
        }
        for region in slide.regions() {
            if let ContentRef::Video(name) = region.content() {
                let video = paths.videos.join(name);
                if !video.is_file() {
                    return Err(SetupError::MissingVideo(video));
                }
            }
        }
    }
    Ok(deck)
}

/// Load a deck folder: validate it, decode backgrounds at `canvas` size and
/// open every region's content source.
pub fn load_deck(
    base: &Path,
    canvas: Resolution,
    registry: &mut TransformRegistry,
    backend: &dyn MediaBackend,
) -> Result<LoadedDeck, SetupError> {
    let paths = DeckPaths::new(base);
    let deck = read_descriptor(&paths)?;
    log::info!(
        "Loaded descriptor {} with {} slides",
        paths.descriptor.display(),
        deck.len()
    );

    let mut backgrounds = Vec::with_capacity(deck.len());
    for slide in &deck.slides {
        let path = paths.slides.join(&slide.img_slide);
        let background =
            load_background(&path, canvas).map_err(|source| SetupError::SlideImage {
                path: path.clone(),
                source,
            })?;
        backgrounds.push(background);
    }

    registry.set_modules_dir(&paths.functions);

    let mut slides = Vec::with_capacity(deck.len());
    for (slide, background) in deck.slides.iter().zip(backgrounds) {
        let mut regions = Vec::with_capacity(slide.regions().len());
        for region in slide.regions() {
            let placement = match region.placement() {
                Some(placement) if placement.is_finite() => Some(placement),
                Some(_) => {
                    log::warn!(
                        "Slide {}: region with non-finite position {:?} will be skipped",
                        slide.img_slide,
                        region.position
                    );
                    None
                }
                None => {
                    log::warn!(
                        "Slide {}: region with {} position values will be skipped",
                        slide.img_slide,
                        region.position.len()
                    );
                    None
                }
            };
            let source = open_source(region.content(), &paths, registry, backend)?;
            log::debug!("Slide {}: {} region", slide.img_slide, source.kind());
            regions.push(LoadedRegion { placement, source });
        }
        slides.push(LoadedSlide {
            name: slide.img_slide.clone(),
            background,
            regions,
        });
    }

    let deck = LoadedDeck { slides };
    log::info!("Opened {} video sources", deck.video_count());
    Ok(deck)
}

fn open_source(
    content: ContentRef<'_>,
    paths: &DeckPaths,
    registry: &mut TransformRegistry,
    backend: &dyn MediaBackend,
) -> Result<ContentSource, SetupError> {
    match content {
        ContentRef::Camera => Ok(ContentSource::Camera),
        ContentRef::Video(name) => {
            let path = paths.videos.join(name);
            let stream = backend
                .open_video(&path)
                .map_err(|source| SetupError::VideoOpen {
                    path: path.clone(),
                    source,
                })?;
            Ok(ContentSource::Video(VideoSource::new(stream, name)))
        }
        ContentRef::Callback(id) => match registry.resolve(id) {
            Ok(transform) => Ok(ContentSource::Callback {
                id: id.to_string(),
                transform,
            }),
            Err(e) => {
                log::error!("Error loading function '{}': {:#}", id, e);
                Ok(ContentSource::Disabled)
            }
        },
    }
}

/// Open the shared camera. Called only after the deck loaded cleanly.
pub fn open_camera(backend: &dyn MediaBackend, index: i32) -> Result<Box<dyn FrameStream>, SetupError> {
    backend
        .open_camera(index)
        .map_err(|source| SetupError::CameraOpen { index, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tests::{solid, ScriptedStream};
    use crate::content::transform::FunctionModule;
    use crate::io::serialization::export_yaml;
    use crate::models::{Region, Slide};
    use image::{Rgb, RgbImage};
    use std::cell::RefCell;

    /// Backend that records which devices were opened.
    #[derive(Default)]
    struct RecordingBackend {
        opened: RefCell<Vec<String>>,
    }

    impl MediaBackend for RecordingBackend {
        fn open_camera(&self, index: i32) -> anyhow::Result<Box<dyn FrameStream>> {
            self.opened.borrow_mut().push(format!("camera {index}"));
            Ok(Box::new(ScriptedStream::new(vec![solid(1)])))
        }

        fn open_video(&self, path: &Path) -> anyhow::Result<Box<dyn FrameStream>> {
            self.opened.borrow_mut().push(path.display().to_string());
            Ok(Box::new(ScriptedStream::new(vec![solid(2)])))
        }
    }

    fn scaled() -> Placement {
        Placement::Scaled {
            x: 0.5,
            y: 0.5,
            scale: 0.2,
        }
    }

    fn write_deck(dir: &Path, slides: Vec<Slide>) -> DeckPaths {
        let paths = DeckPaths::new(dir);
        std::fs::create_dir_all(&paths.slides).unwrap();
        std::fs::create_dir_all(&paths.videos).unwrap();
        std::fs::create_dir_all(&paths.functions).unwrap();
        for slide in &slides {
            RgbImage::from_pixel(40, 20, Rgb([9, 9, 9]))
                .save(paths.slides.join(&slide.img_slide))
                .unwrap();
        }
        export_yaml(&Deck::new(slides), &paths.descriptor).unwrap();
        paths
    }

    #[test]
    fn test_missing_base_folder() {
        let err = read_descriptor(&DeckPaths::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, SetupError::MissingBaseFolder(_)));
    }

    #[test]
    fn test_missing_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_descriptor(&DeckPaths::new(dir.path())).unwrap_err();
        assert!(matches!(err, SetupError::MissingDescriptor(_)));
    }

    #[test]
    fn test_missing_slide_image() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_deck(dir.path(), vec![Slide::new("a.png", None)]);
        std::fs::remove_file(paths.slides.join("a.png")).unwrap();
        let err = read_descriptor(&paths).unwrap_err();
        assert!(matches!(err, SetupError::MissingSlideImage(p) if p.ends_with("a.png")));
    }

    #[test]
    fn test_missing_video_fails_before_any_device_opens() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(VIDEOS_DIR)).unwrap();
        std::fs::write(dir.path().join(VIDEOS_DIR).join("first.mp4"), b"").unwrap();
        write_deck(
            dir.path(),
            vec![
                Slide::new("a.png", Some(vec![Region::new(scaled(), "first.mp4")])),
                Slide::new("b.png", Some(vec![Region::new(scaled(), "gone.mp4")])),
            ],
        );

        let backend = RecordingBackend::default();
        let err = load_deck(
            dir.path(),
            Resolution::new(40, 20),
            &mut TransformRegistry::new(),
            &backend,
        )
        .err()
        .unwrap();
        assert!(matches!(err, SetupError::MissingVideo(p) if p.ends_with("gone.mp4")));
        assert!(backend.opened.borrow().is_empty());
    }

    #[test]
    fn test_empty_deck_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_deck(dir.path(), Vec::new());
        assert!(matches!(
            read_descriptor(&paths).unwrap_err(),
            SetupError::EmptyDeck(_)
        ));
    }

    #[test]
    fn test_sources_resolved_per_region() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_deck(
            dir.path(),
            vec![
                Slide::new(
                    "a.png",
                    Some(vec![
                        Region::new(scaled(), "clip.mp4"),
                        Region::new(scaled(), "loopback.process_frame"),
                        Region::new(scaled(), "missing.process_frame"),
                        Region {
                            position: vec![0.5, 0.5],
                            function: None,
                        },
                    ]),
                ),
                Slide::new("b.png", None),
            ],
        );
        std::fs::write(paths.videos.join("clip.mp4"), b"").unwrap();
        FunctionModule::loopback()
            .save(&paths.functions.join("loopback.yaml"))
            .unwrap();

        let backend = RecordingBackend::default();
        let deck = load_deck(
            dir.path(),
            Resolution::new(80, 40),
            &mut TransformRegistry::new(),
            &backend,
        )
        .unwrap();

        assert_eq!(deck.len(), 2);
        assert_eq!(deck.video_count(), 1);
        assert_eq!(deck.slides[0].background.dimensions(), (80, 40));
        let kinds: Vec<_> = deck.slides[0]
            .regions
            .iter()
            .map(|r| r.source.kind())
            .collect();
        assert_eq!(kinds, ["video", "callback", "disabled", "camera"]);
        assert!(deck.slides[0].regions[3].placement.is_none());
        assert!(deck.slides[1].regions.is_empty());
        assert_eq!(backend.opened.borrow().len(), 1);
    }

    #[test]
    fn test_open_camera_error() {
        let err = open_camera(&crate::io::media::UnavailableBackend, 3).err().unwrap();
        assert!(matches!(err, SetupError::CameraOpen { index: 3, .. }));
    }

    #[test]
    fn test_json_descriptor_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_deck(
            dir.path(),
            vec![Slide::new("a.png", Some(vec![Region::new(scaled(), "camera")]))],
        );
        let deck = read_descriptor(&paths).unwrap();
        std::fs::remove_file(&paths.descriptor).unwrap();
        crate::io::serialization::export_deck(&deck, &dir.path().join("slides.json")).unwrap();

        let paths = DeckPaths::new(dir.path());
        assert!(paths.descriptor.ends_with("slides.json"));
        let loaded = load_deck(
            dir.path(),
            Resolution::new(40, 20),
            &mut TransformRegistry::new(),
            &RecordingBackend::default(),
        )
        .unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.slides[0].regions[0].source.kind(), "camera");
    }

    #[test]
    fn test_yaml_descriptor_wins_over_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("slides.yaml"), "slides: []\n").unwrap();
        std::fs::write(dir.path().join("slides.json"), "{\"slides\": []}").unwrap();
        assert!(DeckPaths::new(dir.path()).descriptor.ends_with("slides.yaml"));
    }

    #[test]
    fn test_non_finite_position_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_deck(dir.path(), vec![Slide::new("a.png", None)]);
        std::fs::write(
            &paths.descriptor,
            "slides:\n- img_slide: a.png\n  interactive_frames:\n  - position: [.inf, 0.5, 0.2]\n  - position: [0.5, 0.5, 0.2]\n",
        )
        .unwrap();

        let deck = load_deck(
            dir.path(),
            Resolution::new(40, 20),
            &mut TransformRegistry::new(),
            &RecordingBackend::default(),
        )
        .unwrap();
        let regions = &deck.slides[0].regions;
        assert_eq!(regions.len(), 2);
        assert!(regions[0].placement.is_none());
        assert_eq!(regions[1].placement, Some(scaled()));
    }
}
