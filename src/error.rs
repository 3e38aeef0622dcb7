// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for deck loading and presentation.

use std::path::PathBuf;

/// Fatal problems found while preparing a deck, before the render loop.
#[derive(thiserror::Error, Debug)]
pub enum SetupError {
    #[error("base folder '{}' not found", .0.display())]
    MissingBaseFolder(PathBuf),

    #[error("deck descriptor '{}' not found", .0.display())]
    MissingDescriptor(PathBuf),

    #[error("slide image '{}' not found", .0.display())]
    MissingSlideImage(PathBuf),

    #[error("video file '{}' not found", .0.display())]
    MissingVideo(PathBuf),

    #[error("deck descriptor '{}' contains no slides", .0.display())]
    EmptyDeck(PathBuf),

    #[error("failed to read deck descriptor '{}': {source}", .path.display())]
    Descriptor {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to decode slide image '{}': {source}", .path.display())]
    SlideImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to open video '{}': {source}", .path.display())]
    VideoOpen {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to open camera {index}: {source}")]
    CameraOpen {
        index: i32,
        #[source]
        source: anyhow::Error,
    },
}

/// The camera stopped delivering frames. Ends the presentation.
#[derive(thiserror::Error, Debug)]
pub enum CameraFailure {
    #[error("camera stream ended")]
    Exhausted,

    #[error("camera read failed: {0}")]
    Read(#[source] anyhow::Error),

    #[error("camera already released")]
    Released,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_errors_name_the_path() {
        let err = SetupError::MissingVideo(PathBuf::from("deck/videos/intro.mp4"));
        assert!(err.to_string().contains("deck/videos/intro.mp4"));

        let err = SetupError::Descriptor {
            path: PathBuf::from("deck/slides.yaml"),
            source: anyhow::anyhow!("bad indentation"),
        };
        let text = err.to_string();
        assert!(text.contains("deck/slides.yaml"));
        assert!(text.contains("bad indentation"));
    }

    #[test]
    fn test_camera_failure_preserves_source() {
        let err = CameraFailure::Read(anyhow::Error::new(std::io::Error::other("unplugged")));
        assert!(err.to_string().contains("unplugged"));
    }
}
