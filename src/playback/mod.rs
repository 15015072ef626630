// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Traveler playback.
//!
//! [`PlaybackController`] is a frame-driven state machine: the caller feeds it elapsed wall-clock
//! milliseconds through [`PlaybackController::advance`] and reads the marker position back from
//! the active [`LayoutState`]. Segment timing is derived from on-screen pixel length, so it is
//! re-read from the layout on every frame and follows layout toggles and resizes.

use std::fmt;

use crate::layout::{LayoutState, Point};
use crate::model::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackPhase {
    Idle,
    Playing,
    Paused,
    Finished,
}

impl PlaybackPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Finished => "finished",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackConfig {
    pub min_segment_ms: f64,
    pub max_segment_ms: f64,
    /// Duration per on-screen pixel at speed 1.0, before clamping.
    pub ms_per_pixel: f64,
    /// Pause between arriving at a node and leaving it. Not scaled by speed.
    pub settle_ms: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { min_segment_ms: 400.0, max_segment_ms: 6000.0, ms_per_pixel: 8.0, settle_ms: 250.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackError {
    InvalidSpeed(f64),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSpeed(speed) => {
                write!(f, "speed multiplier must be finite and > 0 (got {speed})")
            }
        }
    }
}

impl std::error::Error for PlaybackError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    NodeRevealed(usize),
    SegmentStarted { from: usize, to: usize },
    Arrived(usize),
    Finished,
}

/// Snapshot of the externally visible playback flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_index: usize,
    pub speed_multiplier: f64,
    pub is_uniform_layout_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    /// Waiting before the next segment starts; zero right after `play` from `Idle`.
    Settling { remaining_ms: f64 },
    /// Marker in flight from `current_index` toward `current_index + 1`.
    Moving { progress: f64 },
}

#[derive(Debug, Clone)]
pub struct PlaybackController {
    config: PlaybackConfig,
    phase: PlaybackPhase,
    stage: Stage,
    last_index: usize,
    current_index: usize,
    revealed: usize,
    speed: f64,
}

impl PlaybackController {
    pub fn new(route: &Route) -> Self {
        Self::with_config(route, PlaybackConfig::default())
    }

    pub fn with_config(route: &Route, config: PlaybackConfig) -> Self {
        let mut controller = Self {
            config,
            phase: PlaybackPhase::Idle,
            stage: Stage::Settling { remaining_ms: 0.0 },
            last_index: route.last_index(),
            current_index: 0,
            revealed: 1,
            speed: 1.0,
        };
        controller.reset();
        controller
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }

    pub fn is_finished(&self) -> bool {
        self.phase == PlaybackPhase::Finished
    }

    /// Last node the traveler fully arrived at.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Number of nodes drawn so far, always a prefix of the route.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        index < self.revealed
    }

    /// Index of the leg being traversed, including while paused mid-leg.
    pub fn active_segment(&self) -> Option<usize> {
        match self.stage {
            Stage::Moving { .. } if self.phase != PlaybackPhase::Finished => {
                Some(self.current_index)
            }
            _ => None,
        }
    }

    /// Fraction of the active leg already covered; zero when no leg is in flight.
    pub fn progress(&self) -> f64 {
        match self.stage {
            Stage::Moving { progress } if self.active_segment().is_some() => progress,
            _ => 0.0,
        }
    }

    pub fn state(&self, layout: &LayoutState) -> PlaybackState {
        PlaybackState {
            is_playing: self.is_playing(),
            current_index: self.current_index,
            speed_multiplier: self.speed,
            is_uniform_layout_active: layout.is_uniform(),
        }
    }

    pub fn play(&mut self) -> bool {
        match self.phase {
            PlaybackPhase::Idle | PlaybackPhase::Paused => {
                self.transition(PlaybackPhase::Playing);
                true
            }
            PlaybackPhase::Playing | PlaybackPhase::Finished => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != PlaybackPhase::Playing {
            return false;
        }
        self.transition(PlaybackPhase::Paused);
        true
    }

    /// Play when stopped, pause when playing. Returns the resulting phase.
    pub fn toggle(&mut self) -> PlaybackPhase {
        if !self.pause() {
            self.play();
        }
        self.phase
    }

    /// Takes effect on the next `advance`, including for the leg already in flight.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), PlaybackError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(PlaybackError::InvalidSpeed(speed));
        }
        log::debug!("playback speed {} -> {speed}", self.speed);
        self.speed = speed;
        Ok(())
    }

    /// Back to the start node. A single-stop route has nowhere to go and lands in `Finished`.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.revealed = 1;
        self.stage = Stage::Settling { remaining_ms: 0.0 };
        let phase =
            if self.last_index == 0 { PlaybackPhase::Finished } else { PlaybackPhase::Idle };
        self.transition(phase);
    }

    /// Unscaled-by-progress duration of the leg starting at `from` in the given layout.
    pub fn segment_duration_ms(&self, layout: &LayoutState, from: usize) -> f64 {
        let pixels = layout.edge_pixels(from).unwrap_or(0.0);
        let base = (pixels * self.config.ms_per_pixel)
            .clamp(self.config.min_segment_ms, self.config.max_segment_ms);
        base / self.speed
    }

    /// Time left on the active leg at the current speed.
    pub fn remaining_segment_ms(&self, layout: &LayoutState) -> Option<f64> {
        let from = self.active_segment()?;
        Some((1.0 - self.progress()) * self.segment_duration_ms(layout, from))
    }

    /// Moves the traveler forward by `dt_ms` of wall-clock time.
    ///
    /// Time left over after an arrival carries into the settle pause and the following leg, so a
    /// long frame can complete more than one leg. Nothing happens unless the phase is `Playing`.
    pub fn advance(&mut self, dt_ms: f64, layout: &LayoutState) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        if self.phase != PlaybackPhase::Playing || !dt_ms.is_finite() || dt_ms <= 0.0 {
            return events;
        }

        let mut budget = dt_ms;
        loop {
            match self.stage {
                Stage::Settling { remaining_ms } => {
                    if budget < remaining_ms {
                        self.stage = Stage::Settling { remaining_ms: remaining_ms - budget };
                        break;
                    }
                    budget -= remaining_ms;
                    self.start_segment(&mut events);
                }
                Stage::Moving { progress } => {
                    let duration = self.segment_duration_ms(layout, self.current_index);
                    let left = (1.0 - progress) * duration;
                    if budget < left {
                        self.stage = Stage::Moving { progress: progress + budget / duration };
                        break;
                    }
                    budget -= left;
                    if self.arrive(&mut events) {
                        break;
                    }
                }
            }
        }
        events
    }

    /// Plays from the current position to the end in fixed frame steps, without a clock.
    pub fn run_to_end(&mut self, layout: &LayoutState, frame_ms: f64) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        if !frame_ms.is_finite() || frame_ms <= 0.0 {
            return events;
        }
        self.play();
        while self.is_playing() {
            events.extend(self.advance(frame_ms, layout));
        }
        events
    }

    /// Marker position on the given layout; `None` only when the layout has no nodes for it.
    pub fn marker_position(&self, layout: &LayoutState) -> Option<Point> {
        let here = layout.point(self.current_index)?;
        match self.active_segment() {
            Some(from) => {
                let there = layout.point(from + 1)?;
                Some(here.lerp(there, self.progress()))
            }
            None => Some(here),
        }
    }

    /// Great-circle kilometres covered so far, including the partial active leg.
    pub fn traveled_km(&self, route: &Route) -> f64 {
        let done: f64 =
            route.edges().iter().take(self.current_index).map(|edge| edge.distance_km()).sum();
        let partial = self
            .active_segment()
            .and_then(|from| route.edge(from))
            .map_or(0.0, |edge| edge.distance_km() * self.progress());
        done + partial
    }

    fn start_segment(&mut self, events: &mut Vec<PlaybackEvent>) {
        let to = self.current_index + 1;
        if self.revealed <= to {
            self.revealed = to + 1;
            events.push(PlaybackEvent::NodeRevealed(to));
        }
        events.push(PlaybackEvent::SegmentStarted { from: self.current_index, to });
        log::debug!("segment {} -> {to} started", self.current_index);
        self.stage = Stage::Moving { progress: 0.0 };
    }

    /// Returns `true` when the route is complete.
    fn arrive(&mut self, events: &mut Vec<PlaybackEvent>) -> bool {
        self.current_index += 1;
        events.push(PlaybackEvent::Arrived(self.current_index));
        log::debug!("arrived at node {}", self.current_index);

        if self.current_index >= self.last_index {
            self.stage = Stage::Settling { remaining_ms: 0.0 };
            self.transition(PlaybackPhase::Finished);
            events.push(PlaybackEvent::Finished);
            return true;
        }
        self.stage = Stage::Settling { remaining_ms: self.config.settle_ms };
        false
    }

    fn transition(&mut self, next: PlaybackPhase) {
        if self.phase != next {
            log::debug!("playback {} -> {}", self.phase.as_str(), next.as_str());
        }
        self.phase = next;
    }
}
