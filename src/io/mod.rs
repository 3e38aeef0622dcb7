// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for media, documents and deck descriptors.

pub mod markers;
pub mod media;
pub mod pdf;
pub mod serialization;
