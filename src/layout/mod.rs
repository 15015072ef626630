// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout engine: projection, label metrics, collision resolution and the uniform alternative.
//!
//! Everything here is pure and synchronous. [`LayoutState`] owns the resulting node positions and
//! is the only thing callers mutate.

pub mod metrics;
pub mod node;
pub mod projector;
pub mod resolver;
pub mod state;
pub mod surface;
pub mod uniform;

pub use metrics::{
    estimate_nodes, place_labels, CellMetrics, HeuristicMetrics, TextExtent, TextMetrics,
};
pub use node::{LabelSide, NodePosition};
pub use projector::{project, ProjectorConfig};
pub use resolver::{resolve, ResolveReport, ResolverConfig};
pub use state::{LayoutMode, LayoutOptions, LayoutReport, LayoutState};
pub use surface::{Point, Surface, SurfaceError};
pub use uniform::{simulate, UniformConfig, UniformReport};
