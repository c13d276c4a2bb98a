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

use crate::composer::{IconModel, Triangle};
use crate::emotion::Gradient;

// Equilateral vertex offsets relative to the centre, as fixed literals.
// Kept as literals (not recomputed from sin 60°) so output stays
// pixel-identical with every other implementation of this renderer.
const APEX_OFFSET: f64 = 0.577;
const BASE_HALF_WIDTH: f64 = 0.5;
const BASE_DROP: f64 = 0.289;

const EDGE_SCALE: f64 = 30.0;

/// Renders an icon model into a self-contained SVG document. Gradient
/// definitions are inlined, so the markup can be embedded anywhere without
/// external references. Triangles without a gradient are skipped rather
/// than rendered or rejected; this function never fails.
pub fn render_svg(icon: &IconModel, width: u32, height: u32) -> String {
    let visible: Vec<(&Triangle, &Gradient)> = icon
        .triangles
        .iter()
        .filter_map(|triangle| triangle.gradient.as_ref().map(|g| (triangle, g)))
        .collect();

    let mut defs = String::new();
    let mut shapes = String::new();

    for (index, (triangle, gradient)) in visible.iter().enumerate() {
        let gradient_id = format!("icon-{}-gradient-{}", icon.seed, index);

        defs.push_str(&format!(
            "<linearGradient id=\"{gradient_id}\" x1=\"0%\" y1=\"0%\" x2=\"100%\" y2=\"100%\">\
             <stop offset=\"0%\" style=\"stop-color:{};stop-opacity:0.8\"/>\
             <stop offset=\"100%\" style=\"stop-color:{};stop-opacity:0.9\"/>\
             </linearGradient>",
            gradient.start_color, gradient.end_color
        ));

        let edge = triangle.size * EDGE_SCALE;
        let center_x = (triangle.x / 100.0) * f64::from(width);
        let center_y = (triangle.y / 100.0) * f64::from(height);

        let apex = (center_x, center_y - edge * APEX_OFFSET);
        let base_left = (center_x - edge * BASE_HALF_WIDTH, center_y + edge * BASE_DROP);
        let base_right = (center_x + edge * BASE_HALF_WIDTH, center_y + edge * BASE_DROP);

        shapes.push_str(&format!(
            "<polygon points=\"{},{} {},{} {},{}\" fill=\"url(#{gradient_id})\" \
             transform=\"rotate({} {} {})\" \
             stroke=\"rgba(255,255,255,0.3)\" stroke-width=\"1\"/>",
            apex.0,
            apex.1,
            base_left.0,
            base_left.1,
            base_right.0,
            base_right.1,
            triangle.rotation,
            center_x,
            center_y
        ));
    }

    format!(
        "<svg width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" \
         xmlns=\"http://www.w3.org/2000/svg\">\
         <defs>{defs}</defs>\
         <rect width=\"100%\" height=\"100%\" fill=\"rgba(0,0,0,0.05)\" rx=\"8\"/>\
         {shapes}</svg>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::generate_icon;
    use crate::emotion::{Emotion, EmotionScores};

    fn polygon_count(svg: &str) -> usize {
        svg.matches("<polygon").count()
    }

    #[test]
    fn renders_one_polygon_per_triangle() {
        let scores = EmotionScores {
            joy: 0.9,
            sadness: 0.4,
            anger: 0.7,
            ..EmotionScores::default()
        };
        let icon = generate_icon(&scores, Some(11)).unwrap();
        let svg = render_svg(&icon, 100, 100);
        assert_eq!(polygon_count(&svg), icon.triangles.len());
    }

    #[test]
    fn empty_icon_renders_background_only() {
        let icon = generate_icon(&EmotionScores::default(), Some(5)).unwrap();
        let svg = render_svg(&icon, 100, 100);
        assert_eq!(polygon_count(&svg), 0);
        assert!(svg.contains("viewBox=\"0 0 100 100\""));
        assert!(svg.contains("rx=\"8\""));
    }

    #[test]
    fn triangle_without_gradient_is_skipped() {
        let mut icon = generate_icon(
            &EmotionScores {
                joy: 0.9,
                trust: 0.9,
                ..EmotionScores::default()
            },
            Some(3),
        )
        .unwrap();
        icon.triangles[0].gradient = None;
        let svg = render_svg(&icon, 100, 100);
        assert_eq!(polygon_count(&svg), 1);
    }

    #[test]
    fn gradient_ids_are_seed_scoped_and_inlined() {
        let scores = EmotionScores {
            joy: 0.9,
            ..EmotionScores::default()
        };
        let icon = generate_icon(&scores, Some(77)).unwrap();
        let svg = render_svg(&icon, 100, 100);
        assert!(svg.contains("id=\"icon-77-gradient-0\""));
        assert!(svg.contains("url(#icon-77-gradient-0)"));
        assert!(svg.contains("stop-opacity:0.8"));
        assert!(svg.contains("stop-opacity:0.9"));
    }

    #[test]
    fn stroke_and_rotation_are_applied() {
        let scores = EmotionScores {
            anger: 0.8,
            ..EmotionScores::default()
        };
        let icon = generate_icon(&scores, Some(8)).unwrap();
        let svg = render_svg(&icon, 200, 200);
        assert!(svg.contains("stroke=\"rgba(255,255,255,0.3)\""));
        assert!(svg.contains("transform=\"rotate("));
    }

    #[test]
    fn joy_triangle_uses_joy_colours() {
        let scores = EmotionScores {
            joy: 1.0,
            ..EmotionScores::default()
        };
        let icon = generate_icon(&scores, Some(4)).unwrap();
        let svg = render_svg(&icon, 100, 100);
        let gradient = Emotion::Joy.gradient();
        assert!(svg.contains(&gradient.start_color));
        assert!(svg.contains(&gradient.end_color));
    }

    #[test]
    fn rendering_is_deterministic() {
        let scores = EmotionScores {
            fear: 0.6,
            surprise: 0.5,
            ..EmotionScores::default()
        };
        let icon = generate_icon(&scores, Some(2024)).unwrap();
        assert_eq!(render_svg(&icon, 120, 120), render_svg(&icon, 120, 120));
    }
}
