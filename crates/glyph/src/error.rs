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

use thiserror::Error;

/// Failures of the icon core. The composer is side-effect-free, so the
/// taxonomy is narrow: both variants indicate a broken algorithm or colour
/// table, not bad caller input, and must never be swallowed.
#[derive(Error, Debug)]
pub enum IconError {
    #[error("invalid triangle at index {index}: {reason}")]
    InvalidTriangle { index: usize, reason: String },
    #[error("invalid gradient at index {index}: {reason}")]
    InvalidGradient { index: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, IconError>;
