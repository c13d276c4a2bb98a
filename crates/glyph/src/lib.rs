// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

//! Deterministic emotion-icon generation: an eight-emotion score record is
//! composed into a reproducible set of non-overlapping triangles, which a
//! decoupled renderer turns into self-contained SVG markup. Identical seeds
//! reproduce identical icons bit-for-bit, server-side and client-side.

pub mod composer;
pub mod emotion;
pub mod error;
pub mod renderer;
pub mod seeded;

pub use composer::{generate_icon, IconModel, Triangle, SIGNIFICANCE_THRESHOLD};
pub use emotion::{Emotion, EmotionScores, Gradient};
pub use error::{IconError, Result};
pub use renderer::render_svg;
pub use seeded::SeededRandom;
