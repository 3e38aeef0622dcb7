// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Registry resolving `module.function` identifiers to frame transforms.
//!
//! Transforms registered in code take precedence; anything else is looked
//! up as an entry point of a function module on disk.

use super::transform::{FrameTransform, FunctionModule, MODULE_EXTENSION};
use anyhow::{anyhow, bail, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Shared handle to a transform. Several regions may use the same one.
pub type SharedTransform = Rc<dyn FrameTransform>;

/// Registry of available frame transforms.
pub struct TransformRegistry {
    /// Transforms registered in code, by full `module.function` id
    registered: HashMap<String, SharedTransform>,
    /// Folder searched for `<module>.yaml` function modules
    modules_dir: Option<PathBuf>,
    /// Modules already parsed, by module name
    modules: HashMap<String, FunctionModule>,
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformRegistry {
    /// Create a registry with no module folder.
    pub fn new() -> Self {
        Self {
            registered: HashMap::new(),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }

    /// Create a registry that also searches `modules_dir` for modules.
    pub fn with_modules_dir(modules_dir: impl Into<PathBuf>) -> Self {
        Self {
            modules_dir: Some(modules_dir.into()),
            ..Self::new()
        }
    }

    pub fn set_modules_dir(&mut self, modules_dir: impl Into<PathBuf>) {
        self.modules_dir = Some(modules_dir.into());
        self.modules.clear();
    }

    /// Register a transform under a `module.function` identifier.
    pub fn register(&mut self, id: impl Into<String>, transform: impl FrameTransform + 'static) {
        let id = id.into();
        if self.contains(&id) {
            log::warn!("Replacing registered transform {}", id);
        } else {
            log::debug!("Registered transform {}", id);
        }
        self.registered.insert(id, Rc::new(transform));
    }

    /// Check if an identifier is registered in code
    pub fn contains(&self, id: &str) -> bool {
        self.registered.contains_key(id)
    }

    /// Resolve an identifier to a transform.
    pub fn resolve(&mut self, id: &str) -> Result<SharedTransform> {
        if let Some(transform) = self.registered.get(id) {
            return Ok(Rc::clone(transform));
        }

        let (module_name, function) = id
            .rsplit_once('.')
            .filter(|(m, f)| !m.is_empty() && !f.is_empty())
            .ok_or_else(|| anyhow!("'{}' is not of the form module.function", id))?;

        let module = self.module(module_name)?;
        let chain = module
            .entry_point(function)
            .ok_or_else(|| anyhow!("module '{}' has no function '{}'", module_name, function))?;
        Ok(Rc::new(chain))
    }

    fn module(&mut self, name: &str) -> Result<&FunctionModule> {
        if !self.modules.contains_key(name) {
            let Some(dir) = self.modules_dir.as_deref() else {
                bail!("no function module folder configured for '{}'", name);
            };
            let path = module_path(dir, name);
            if !path.is_file() {
                bail!("function file '{}' not found", path.display());
            }
            let module = FunctionModule::load(&path)?;
            self.modules.insert(name.to_string(), module);
        }
        self.modules
            .get(name)
            .ok_or_else(|| anyhow!("module '{}' failed to load", name))
    }
}

/// Location of a function module inside a modules folder.
pub fn module_path(modules_dir: &Path, module_name: &str) -> PathBuf {
    modules_dir.join(format!("{}.{}", module_name, MODULE_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::transform::TransformStep;
    use crate::io::media::Frame;
    use image::Rgb;

    #[test]
    fn test_registered_transform_wins() {
        let mut registry = TransformRegistry::new();
        registry.register("fx.red", |frame: &Frame| -> Result<Frame> {
            Ok(Frame::from_pixel(frame.width(), frame.height(), Rgb([255, 0, 0])))
        });
        assert!(registry.contains("fx.red"));

        let transform = registry.resolve("fx.red").unwrap();
        let out = transform.apply(&Frame::new(3, 2)).unwrap();
        assert_eq!(out.get_pixel(2, 1), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_resolves_module_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut module = FunctionModule::loopback();
        module
            .functions
            .insert("negative".to_string(), vec![TransformStep::Invert]);
        module.save(&module_path(dir.path(), "effects")).unwrap();

        let mut registry = TransformRegistry::with_modules_dir(dir.path());
        let transform = registry.resolve("effects.negative").unwrap();
        let out = transform.apply(&Frame::new(1, 1)).unwrap();
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert!(registry.resolve("effects.process_frame").is_ok());
    }

    #[test]
    fn test_resolution_failures_name_the_cause() {
        let dir = tempfile::tempdir().unwrap();
        FunctionModule::loopback()
            .save(&module_path(dir.path(), "loopback"))
            .unwrap();
        let mut registry = TransformRegistry::with_modules_dir(dir.path());

        let err = registry.resolve("nodot").err().unwrap();
        assert!(err.to_string().contains("module.function"));

        let err = registry.resolve("absent.process_frame").err().unwrap();
        assert!(err.to_string().contains("absent.yaml"));

        let err = registry.resolve("loopback.missing").err().unwrap();
        assert!(err.to_string().contains("missing"));

        let err = TransformRegistry::new().resolve("loopback.process_frame").err().unwrap();
        assert!(err.to_string().contains("no function module folder"));
    }
}
