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

use crate::emotion::{Emotion, EmotionScores, Gradient};
use crate::error::{IconError, Result};
use crate::seeded::SeededRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Emotions scoring below this are dropped entirely and produce no shape.
/// The bound is inclusive: exactly 0.1 is significant.
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.1;

/// Retry budget after the initial placement attempt. Every attempt consumes
/// two generator draws whether it succeeds or fails, so the budget is part
/// of the reproducibility contract, not a tuning knob.
const MAX_PLACEMENT_RETRIES: usize = 50;

const RANDOM_SEED_SPACE: u32 = 1_000_000;

/// One visual unit of an icon. Percentage coordinates, normalised size,
/// rotation in degrees. The gradient is always populated by the composer;
/// it is optional at the type level so foreign or legacy payloads missing
/// one can still be deserialised and skipped by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub emotion: Emotion,
    pub size: f64,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    #[serde(default)]
    pub gradient: Option<Gradient>,
}

/// The unit of output and persistence: an ordered triangle list plus the
/// seed that produced it. Immutable once created; a re-analysis always
/// produces a wholly new model, never a partial update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconModel {
    pub triangles: Vec<Triangle>,
    pub seed: u32,
}

// Transient bookkeeping for overlap rejection within one generate call.
struct PlacedRegion {
    x: f64,
    y: f64,
    size: f64,
}

/// Composes an icon from emotion scores. Given the same seed and scores the
/// output is identical to full float precision across runs and across
/// reimplementations; when `seed` is `None` a throwaway random seed in
/// [0, 1,000,000) is chosen and echoed back in the model.
///
/// Callers wanting icons reproducibly tied to a diary entry derive the seed
/// from the entry's identifier themselves and pass it in.
pub fn generate_icon(scores: &EmotionScores, seed: Option<u32>) -> Result<IconModel> {
    let icon_seed = seed.unwrap_or_else(|| rand::thread_rng().gen_range(0..RANDOM_SEED_SPACE));
    let mut random = SeededRandom::new(icon_seed);

    let significant: Vec<(Emotion, f64)> = scores
        .iter()
        .filter(|&(_, value)| value >= SIGNIFICANCE_THRESHOLD)
        .collect();
    debug!(
        seed = icon_seed,
        significant = significant.len(),
        "composing emotion icon"
    );

    let mut placed: Vec<PlacedRegion> = Vec::new();
    let mut triangles = Vec::with_capacity(significant.len());

    for (emotion, value) in significant {
        let size = (value * 0.8 + 0.2).clamp(0.2, 1.0);

        let mut position = place_without_overlap(&mut random, size, &placed);
        let mut attempts = 0;
        while position.is_none() && attempts < MAX_PLACEMENT_RETRIES {
            position = place_without_overlap(&mut random, size, &placed);
            attempts += 1;
        }

        // Budget exhausted: place unconditionally. Still two draws, so the
        // stream stays aligned with a successful attempt.
        let (x, y) = match position {
            Some(position) => position,
            None => (random.next() * 80.0 + 10.0, random.next() * 80.0 + 10.0),
        };

        placed.push(PlacedRegion { x, y, size });

        // Rotation is drawn after placement; reordering breaks determinism.
        let rotation = random.next() * 360.0;

        triangles.push(Triangle {
            emotion,
            size,
            x,
            y,
            rotation,
            gradient: Some(emotion.gradient()),
        });
    }

    if triangles.is_empty() {
        warn!(
            seed = icon_seed,
            "no emotion reached the significance threshold; icon will be empty"
        );
    }

    validate_triangles(&triangles)?;

    Ok(IconModel {
        triangles,
        seed: icon_seed,
    })
}

// Draws a candidate position (two generator values) and rejects it if any
// already-placed region sits closer than the size-derived minimum distance.
// Coordinate deltas are scaled by 5 before the Euclidean distance; this is
// the reference metric, not a plain percentage-space distance.
fn place_without_overlap(
    random: &mut SeededRandom,
    size: f64,
    placed: &[PlacedRegion],
) -> Option<(f64, f64)> {
    let x = random.next() * 80.0 + 10.0;
    let y = random.next() * 80.0 + 10.0;

    let min_distance = (size + 0.3) * 30.0;

    for region in placed {
        let distance =
            (((x - region.x) * 5.0).powi(2) + ((y - region.y) * 5.0).powi(2)).sqrt();
        if distance < min_distance {
            return None;
        }
    }

    Some((x, y))
}

// Postcondition check. Unreachable with a well-formed colour table; any hit
// is an internal logic error and must abort the operation.
fn validate_triangles(triangles: &[Triangle]) -> Result<()> {
    for (index, triangle) in triangles.iter().enumerate() {
        if !triangle.size.is_finite()
            || !triangle.x.is_finite()
            || !triangle.y.is_finite()
            || !triangle.rotation.is_finite()
        {
            return Err(IconError::InvalidTriangle {
                index,
                reason: "non-finite geometry field".to_string(),
            });
        }
        match &triangle.gradient {
            None => {
                return Err(IconError::InvalidTriangle {
                    index,
                    reason: "missing gradient".to_string(),
                })
            }
            Some(gradient) => {
                if gradient.start_color.is_empty() || gradient.end_color.is_empty() {
                    return Err(IconError::InvalidGradient {
                        index,
                        reason: "empty colour value".to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_scores() -> EmotionScores {
        EmotionScores {
            joy: 0.9,
            trust: 0.45,
            fear: 0.3,
            surprise: 0.62,
            sadness: 0.15,
            disgust: 0.1,
            anger: 0.55,
            anticipation: 0.78,
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let scores = full_scores();
        let first = generate_icon(&scores, Some(123_456)).unwrap();
        let second = generate_icon(&scores, Some(123_456)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn significance_filter_drops_low_scores() {
        let scores = EmotionScores {
            joy: 0.9,
            trust: 0.05,
            fear: 0.1,
            ..EmotionScores::default()
        };
        let icon = generate_icon(&scores, Some(9)).unwrap();
        let emotions: Vec<Emotion> = icon.triangles.iter().map(|t| t.emotion).collect();
        assert_eq!(emotions, vec![Emotion::Joy, Emotion::Fear]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let at_threshold = EmotionScores {
            trust: 0.1,
            ..EmotionScores::default()
        };
        let below = EmotionScores {
            trust: 0.0999,
            ..EmotionScores::default()
        };
        assert_eq!(generate_icon(&at_threshold, Some(1)).unwrap().triangles.len(), 1);
        assert!(generate_icon(&below, Some(1)).unwrap().triangles.is_empty());
    }

    #[test]
    fn size_follows_formula_and_bounds() {
        let scores = full_scores();
        let icon = generate_icon(&scores, Some(77)).unwrap();
        for triangle in &icon.triangles {
            let score = scores.score(triangle.emotion);
            assert_eq!(triangle.size, (score * 0.8 + 0.2).clamp(0.2, 1.0));
            assert!((0.2..=1.0).contains(&triangle.size));
        }
    }

    #[test]
    fn empty_scores_yield_empty_icon_with_seed() {
        let icon = generate_icon(&EmotionScores::default(), Some(42)).unwrap();
        assert!(icon.triangles.is_empty());
        assert_eq!(icon.seed, 42);
    }

    #[test]
    fn single_emotion_uses_first_three_draws() {
        let scores = EmotionScores {
            joy: 0.9,
            ..EmotionScores::default()
        };
        let icon = generate_icon(&scores, Some(7)).unwrap();
        assert_eq!(icon.seed, 7);
        assert_eq!(icon.triangles.len(), 1);

        let triangle = &icon.triangles[0];
        assert_eq!(triangle.emotion, Emotion::Joy);
        assert_eq!(triangle.size, 0.9 * 0.8 + 0.2);
        assert_eq!(triangle.gradient, Some(Emotion::Joy.gradient()));

        // With nothing placed yet the first attempt always succeeds, so the
        // triangle consumes exactly the first three generator values.
        let mut reference = SeededRandom::new(7);
        assert_eq!(triangle.x, reference.next() * 80.0 + 10.0);
        assert_eq!(triangle.y, reference.next() * 80.0 + 10.0);
        assert_eq!(triangle.rotation, reference.next() * 360.0);
    }

    #[test]
    fn positions_stay_in_bounds_across_seeds() {
        let scores = full_scores();
        for seed in 0..100 {
            let icon = generate_icon(&scores, Some(seed)).unwrap();
            for triangle in &icon.triangles {
                assert!((10.0..=90.0).contains(&triangle.x), "x out of bounds");
                assert!((10.0..=90.0).contains(&triangle.y), "y out of bounds");
                assert!((0.0..360.0).contains(&triangle.rotation));
            }
        }
    }

    #[test]
    fn crowded_scores_never_drop_an_emotion() {
        // Eight maximum-size triangles cannot all be placed without overlap;
        // the fallback must still emit one shape per emotion.
        let crowded = EmotionScores {
            joy: 1.0,
            trust: 1.0,
            fear: 1.0,
            surprise: 1.0,
            sadness: 1.0,
            disgust: 1.0,
            anger: 1.0,
            anticipation: 1.0,
        };
        for seed in 0..200 {
            let icon = generate_icon(&crowded, Some(seed)).unwrap();
            assert_eq!(icon.triangles.len(), 8, "seed {seed} dropped a shape");
        }
    }

    #[test]
    fn resolved_random_seed_stays_in_space() {
        let icon = generate_icon(&full_scores(), None).unwrap();
        assert!(icon.seed < 1_000_000);
    }

    #[test]
    fn validation_rejects_missing_gradient() {
        let triangles = vec![Triangle {
            emotion: Emotion::Joy,
            size: 0.5,
            x: 50.0,
            y: 50.0,
            rotation: 0.0,
            gradient: None,
        }];
        assert!(matches!(
            validate_triangles(&triangles),
            Err(IconError::InvalidTriangle { index: 0, .. })
        ));
    }

    #[test]
    fn validation_rejects_empty_colour() {
        let triangles = vec![Triangle {
            emotion: Emotion::Joy,
            size: 0.5,
            x: 50.0,
            y: 50.0,
            rotation: 0.0,
            gradient: Some(Gradient {
                start_color: String::new(),
                end_color: "#FFA500".to_string(),
            }),
        }];
        assert!(matches!(
            validate_triangles(&triangles),
            Err(IconError::InvalidGradient { index: 0, .. })
        ));
    }
}
