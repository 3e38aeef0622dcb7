// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Deck descriptor serialization and deserialization.
//!
//! This module handles exporting and importing deck descriptors in YAML
//! and JSON formats.

use crate::models::deck::Deck;
use anyhow::{bail, Result};
use std::path::Path;

/// Export a deck descriptor to YAML format.
pub fn export_yaml(deck: &Deck, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(deck)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export a deck descriptor to JSON format.
pub fn export_json(deck: &Deck, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(deck)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import a deck descriptor from YAML format.
pub fn import_yaml(path: &Path) -> Result<Deck> {
    let yaml = std::fs::read_to_string(path)?;
    let deck = serde_yaml::from_str(&yaml)?;
    Ok(deck)
}

/// Import a deck descriptor from JSON format.
pub fn import_json(path: &Path) -> Result<Deck> {
    let json = std::fs::read_to_string(path)?;
    let deck = serde_json::from_str(&json)?;
    Ok(deck)
}

/// Export a deck descriptor, picking the format from the file extension.
pub fn export_deck(deck: &Deck, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(deck, path),
        Some("json") => export_json(deck, path),
        extension => bail!("Unsupported descriptor extension: {:?}", extension),
    }
}

/// Import a deck descriptor, picking the format from the file extension.
pub fn import_deck(path: &Path) -> Result<Deck> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        extension => bail!("Unsupported descriptor extension: {:?}", extension),
    }
}
