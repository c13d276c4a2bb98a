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

use serde::{Deserialize, Serialize};

/// The eight primary emotions of the dual-axis emotion wheel, four opposing
/// pairs. Declaration order is the canonical iteration order; the composer's
/// draw sequence depends on it, so reordering variants changes every icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Trust,
    Fear,
    Surprise,
    Sadness,
    Disgust,
    Anger,
    Anticipation,
}

/// Gradient colour pair for one emotion, serialised with the wire field
/// names shared with client implementations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    pub start_color: String,
    pub end_color: String,
}

// Fixed colour pairs, indexed by variant order. A design asset as much as a
// constant: reimplementations must reproduce these exact values.
const EMOTION_COLOURS: [(&str, &str); 8] = [
    ("#FFD700", "#FFA500"),
    ("#87CEEB", "#4682B4"),
    ("#800080", "#4B0082"),
    ("#FFFF00", "#FFD700"),
    ("#4169E1", "#191970"),
    ("#9ACD32", "#556B2F"),
    ("#FF4500", "#8B0000"),
    ("#FF69B4", "#C71585"),
];

const EMOTION_LABELS: [&str; 8] = [
    "喜び",
    "信頼",
    "恐怖",
    "驚き",
    "悲しみ",
    "嫌悪",
    "怒り",
    "期待",
];

impl Emotion {
    pub const ALL: [Emotion; 8] = [
        Emotion::Joy,
        Emotion::Trust,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Sadness,
        Emotion::Disgust,
        Emotion::Anger,
        Emotion::Anticipation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Trust => "trust",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Sadness => "sadness",
            Emotion::Disgust => "disgust",
            Emotion::Anger => "anger",
            Emotion::Anticipation => "anticipation",
        }
    }

    /// Japanese display label for UI surfaces.
    pub fn label(self) -> &'static str {
        EMOTION_LABELS[self as usize]
    }

    pub fn gradient(self) -> Gradient {
        let (start, end) = EMOTION_COLOURS[self as usize];
        Gradient {
            start_color: start.to_string(),
            end_color: end.to_string(),
        }
    }
}

/// Per-class confidence scores from the classification collaborator. All
/// eight fields are always present; values sit in [0,1] but are independent
/// confidences, not a probability distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EmotionScores {
    pub joy: f64,
    pub trust: f64,
    pub fear: f64,
    pub surprise: f64,
    pub sadness: f64,
    pub disgust: f64,
    pub anger: f64,
    pub anticipation: f64,
}

impl EmotionScores {
    pub fn score(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Joy => self.joy,
            Emotion::Trust => self.trust,
            Emotion::Fear => self.fear,
            Emotion::Surprise => self.surprise,
            Emotion::Sadness => self.sadness,
            Emotion::Disgust => self.disgust,
            Emotion::Anger => self.anger,
            Emotion::Anticipation => self.anticipation,
        }
    }

    pub fn set(&mut self, emotion: Emotion, value: f64) {
        match emotion {
            Emotion::Joy => self.joy = value,
            Emotion::Trust => self.trust = value,
            Emotion::Fear => self.fear = value,
            Emotion::Surprise => self.surprise = value,
            Emotion::Sadness => self.sadness = value,
            Emotion::Disgust => self.disgust = value,
            Emotion::Anger => self.anger = value,
            Emotion::Anticipation => self.anticipation = value,
        }
    }

    /// Iterates the eight emotions in canonical order. Deliberately explicit
    /// rather than any reflective field walk: the fixed arity and ordering
    /// are part of the determinism contract.
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL.iter().map(move |&emotion| (emotion, self.score(emotion)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_matches_declaration() {
        let order: Vec<&str> = Emotion::ALL.iter().map(|e| e.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "joy",
                "trust",
                "fear",
                "surprise",
                "sadness",
                "disgust",
                "anger",
                "anticipation"
            ]
        );
    }

    #[test]
    fn gradient_table_is_complete_and_non_empty() {
        for emotion in Emotion::ALL {
            let gradient = emotion.gradient();
            assert!(gradient.start_color.starts_with('#'));
            assert!(gradient.end_color.starts_with('#'));
        }
    }

    #[test]
    fn joy_gradient_matches_fixed_pair() {
        let gradient = Emotion::Joy.gradient();
        assert_eq!(gradient.start_color, "#FFD700");
        assert_eq!(gradient.end_color, "#FFA500");
    }

    #[test]
    fn scores_iterate_in_canonical_order() {
        let scores = EmotionScores {
            joy: 0.1,
            trust: 0.2,
            fear: 0.3,
            surprise: 0.4,
            sadness: 0.5,
            disgust: 0.6,
            anger: 0.7,
            anticipation: 0.8,
        };
        let collected: Vec<(Emotion, f64)> = scores.iter().collect();
        assert_eq!(collected[0], (Emotion::Joy, 0.1));
        assert_eq!(collected[7], (Emotion::Anticipation, 0.8));
    }

    #[test]
    fn emotion_serialises_lowercase() {
        let json = serde_json::to_string(&Emotion::Anticipation).unwrap();
        assert_eq!(json, "\"anticipation\"");
    }

    #[test]
    fn gradient_serialises_with_wire_field_names() {
        let json = serde_json::to_string(&Emotion::Joy.gradient()).unwrap();
        assert!(json.contains("\"startColor\":\"#FFD700\""));
        assert!(json.contains("\"endColor\":\"#FFA500\""));
    }
}
