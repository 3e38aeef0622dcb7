// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Slide navigation state.

/// Discrete commands the presenter reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    /// Restart every video on the current slide.
    Restart,
    Quit,
}

/// Index of the current slide in a deck of fixed size.
///
/// Navigation wraps in both directions. The value is passed into and
/// returned from every iteration instead of being mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationState {
    index: usize,
    slide_count: usize,
}

impl PresentationState {
    /// Start on the first slide. `slide_count` must be non-zero.
    pub fn new(slide_count: usize) -> Self {
        debug_assert!(slide_count > 0, "a presentation needs at least one slide");
        Self {
            index: 0,
            slide_count: slide_count.max(1),
        }
    }

    /// Start on `index`, wrapped into range.
    pub fn at(index: usize, slide_count: usize) -> Self {
        let state = Self::new(slide_count);
        Self {
            index: index % state.slide_count,
            ..state
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn next(self) -> Self {
        Self {
            index: (self.index + 1) % self.slide_count,
            ..self
        }
    }

    pub fn previous(self) -> Self {
        Self {
            index: (self.index + self.slide_count - 1) % self.slide_count,
            ..self
        }
    }
}

/// Outer state of the presentation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running(PresentationState),
    Terminated,
}

impl Phase {
    /// Apply a command. Restart leaves the index alone; its side effect on
    /// videos is carried out by the presenter.
    pub fn apply(self, command: Command) -> Phase {
        match (self, command) {
            (Phase::Terminated, _) => Phase::Terminated,
            (Phase::Running(_), Command::Quit) => Phase::Terminated,
            (Phase::Running(state), Command::Next) => Phase::Running(state.next()),
            (Phase::Running(state), Command::Previous) => Phase::Running(state.previous()),
            (Phase::Running(state), Command::Restart) => Phase::Running(state),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Phase::Running(_))
    }
}
