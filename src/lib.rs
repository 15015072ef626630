// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tourline: geographic route layout and animated traveler playback.
//!
//! The pipeline is `model` (decode the optimizer payload into a [`model::Route`]) → `layout`
//! (project, measure, resolve collisions or run the uniform simulation) → `playback` (advance
//! the traveler from a frame clock) → `render` (a serializable scene for any front-end). `tui` is
//! the bundled terminal front-end.

pub mod layout;
pub mod model;
pub mod playback;
pub mod render;
pub mod tui;
