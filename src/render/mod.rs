// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame composition.

pub mod compositor;

pub use compositor::Compositor;
