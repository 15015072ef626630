// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Renderer-facing output.
//!
//! A [`Scene`] is a flat, serializable snapshot of what should be on screen for one frame:
//! circles with their numbers and labels, legs with distance labels and the traveler marker.
//! Front-ends (the terminal canvas, `--dump`) draw from it and never touch layout state directly.

mod scene;

pub use scene::{
    build_scene, progressive_scene, static_scene, Scene, SceneEdge, SceneNode, ScenePlayback,
    ScenePoint,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    /// Nodes appear as the traveler reaches them.
    #[default]
    Progressive,
    /// Everything drawn at once; nodes can be dragged.
    Static,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Progressive => "progressive",
            Self::Static => "static",
        }
    }
}

/// Distance label text, one decimal.
pub fn format_km(km: f64) -> String {
    format!("{km:.1} km")
}

pub fn scene_schema() -> schemars::Schema {
    schemars::schema_for!(Scene)
}
