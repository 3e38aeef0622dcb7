// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading (images, camera and videos).
//!
//! This module loads slide backgrounds and defines the pull-based frame
//! stream interface behind which camera and video devices live.

use crate::config::Resolution;
use anyhow::Result;
use image::imageops::FilterType;
use image::RgbImage;
use std::path::Path;

/// A raster frame. Every stage of the pipeline works in 8-bit RGB.
pub type Frame = RgbImage;

/// A source of frames read one at a time.
pub trait FrameStream {
    /// Read the next frame. `Ok(None)` means the stream is exhausted.
    fn read_frame(&mut self) -> Result<Option<Frame>>;

    /// Reposition the stream at its first frame.
    fn rewind(&mut self) -> Result<()>;
}

/// Opens the camera and video devices used by the presentation runtime.
pub trait MediaBackend {
    fn open_camera(&self, index: i32) -> Result<Box<dyn FrameStream>>;
    fn open_video(&self, path: &Path) -> Result<Box<dyn FrameStream>>;
}

/// Load a slide background and resize it to the presentation canvas.
pub fn load_background(path: &Path, canvas: Resolution) -> image::ImageResult<Frame> {
    let image = image::open(path)?.to_rgb8();
    if image.dimensions() == (canvas.width, canvas.height) {
        return Ok(image);
    }
    Ok(image::imageops::resize(
        &image,
        canvas.width,
        canvas.height,
        FilterType::Lanczos3,
    ))
}

/// Backend used when the crate is built without a capture library.
pub struct UnavailableBackend;

impl MediaBackend for UnavailableBackend {
    fn open_camera(&self, _index: i32) -> Result<Box<dyn FrameStream>> {
        anyhow::bail!("camera support not enabled. Build with --features video-opencv")
    }

    fn open_video(&self, _path: &Path) -> Result<Box<dyn FrameStream>> {
        anyhow::bail!("video support not enabled. Build with --features video-opencv")
    }
}

#[cfg(feature = "video-opencv")]
mod opencv_impl {
    use super::*;
    use anyhow::Context;
    use opencv::core::Mat;
    use opencv::prelude::*;
    use opencv::{imgproc, videoio};

    /// Camera and video capture through OpenCV's videoio module.
    pub struct OpenCvBackend;

    struct CaptureStream {
        capture: videoio::VideoCapture,
        label: String,
    }

    impl CaptureStream {
        fn open(capture: videoio::VideoCapture, label: String) -> Result<Self> {
            if !capture.is_opened()? {
                anyhow::bail!("{} could not be opened", label);
            }
            log::info!("Opened {}", label);
            Ok(Self { capture, label })
        }
    }

    impl FrameStream for CaptureStream {
        fn read_frame(&mut self) -> Result<Option<Frame>> {
            let mut bgr = Mat::default();
            if !self.capture.read(&mut bgr)? || bgr.empty() {
                return Ok(None);
            }
            mat_to_frame(&bgr).map(Some)
        }

        fn rewind(&mut self) -> Result<()> {
            self.capture.set(videoio::CAP_PROP_POS_FRAMES, 0.0)?;
            Ok(())
        }
    }

    impl Drop for CaptureStream {
        fn drop(&mut self) {
            match self.capture.release() {
                Ok(()) => log::debug!("Released {}", self.label),
                Err(e) => log::warn!("Failed to release {}: {}", self.label, e),
            }
        }
    }

    fn mat_to_frame(bgr: &Mat) -> Result<Frame> {
        let mut rgb = Mat::default();
        imgproc::cvt_color(bgr, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;
        let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
        let bytes = rgb.data_bytes()?.to_vec();
        Frame::from_raw(width, height, bytes).context("frame buffer size mismatch")
    }

    impl MediaBackend for OpenCvBackend {
        fn open_camera(&self, index: i32) -> Result<Box<dyn FrameStream>> {
            let capture = videoio::VideoCapture::new(index, videoio::CAP_ANY)?;
            Ok(Box::new(CaptureStream::open(capture, format!("camera {}", index))?))
        }

        fn open_video(&self, path: &Path) -> Result<Box<dyn FrameStream>> {
            let name = path.to_string_lossy();
            let capture = videoio::VideoCapture::from_file(&name, videoio::CAP_ANY)?;
            Ok(Box::new(CaptureStream::open(capture, format!("video {}", name))?))
        }
    }
}

#[cfg(feature = "video-opencv")]
pub use opencv_impl::OpenCvBackend;

/// The capture backend this build was compiled with.
pub fn default_backend() -> Box<dyn MediaBackend> {
    #[cfg(feature = "video-opencv")]
    {
        Box::new(OpenCvBackend)
    }
    #[cfg(not(feature = "video-opencv"))]
    {
        Box::new(UnavailableBackend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_load_background_resizes_to_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slide.png");
        RgbImage::from_pixel(200, 100, Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let background = load_background(&path, Resolution::new(90, 45)).unwrap();
        assert_eq!(background.dimensions(), (90, 45));

        let same = load_background(&path, Resolution::new(200, 100)).unwrap();
        assert_eq!(same.get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_unavailable_backend_explains_itself() {
        let err = UnavailableBackend.open_camera(0).err().unwrap();
        assert!(err.to_string().contains("video-opencv"));
    }
}
