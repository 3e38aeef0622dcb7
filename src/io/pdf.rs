// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! PDF page rasterization.

use crate::config::Resolution;
use crate::io::media::Frame;
use anyhow::Result;
use std::path::Path;

/// Renders every page of a document to a raster of an exact size.
pub trait PageRasterizer {
    /// Render all pages in order, each stretched to `resolution`.
    fn rasterize(&mut self, document: &Path, resolution: Resolution) -> Result<Vec<Frame>>;
}

#[cfg(feature = "pdf-pdfium")]
mod pdfium_impl {
    use super::*;
    use anyhow::Context;
    use pdfium_render::prelude::*;

    /// Rasterizer backed by the PDFium library, bound at runtime.
    pub struct PdfiumRasterizer {
        pdfium: Pdfium,
    }

    impl PdfiumRasterizer {
        /// Bind to a PDFium library next to the executable, falling back to
        /// the system library.
        pub fn new() -> Result<Self> {
            let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library())
                .context("PDFium library not found")?;
            Ok(Self {
                pdfium: Pdfium::new(bindings),
            })
        }
    }

    impl PageRasterizer for PdfiumRasterizer {
        fn rasterize(&mut self, document: &Path, resolution: Resolution) -> Result<Vec<Frame>> {
            let pdf = self
                .pdfium
                .load_pdf_from_file(document, None)
                .with_context(|| format!("opening {}", document.display()))?;
            // Each axis is scaled independently so every page lands on the
            // same pixel grid.
            let config = PdfRenderConfig::new()
                .set_target_size(resolution.width as i32, resolution.height as i32);

            let mut pages = Vec::new();
            for (index, page) in pdf.pages().iter().enumerate() {
                let bitmap = page
                    .render_with_config(&config)
                    .with_context(|| format!("rendering page {}", index + 1))?;
                let mut frame = bitmap.as_image().to_rgb8();
                if frame.dimensions() != (resolution.width, resolution.height) {
                    frame = image::imageops::resize(
                        &frame,
                        resolution.width,
                        resolution.height,
                        image::imageops::FilterType::Lanczos3,
                    );
                }
                log::debug!("Rendered page {} at {}", index + 1, resolution);
                pages.push(frame);
            }
            Ok(pages)
        }
    }
}

#[cfg(feature = "pdf-pdfium")]
pub use pdfium_impl::PdfiumRasterizer;

/// The rasterizer this build was compiled with.
pub fn default_rasterizer() -> Result<Box<dyn PageRasterizer>> {
    #[cfg(feature = "pdf-pdfium")]
    {
        Ok(Box::new(PdfiumRasterizer::new()?))
    }
    #[cfg(not(feature = "pdf-pdfium"))]
    {
        anyhow::bail!("PDF support not enabled. Build with --features pdf-pdfium")
    }
}
