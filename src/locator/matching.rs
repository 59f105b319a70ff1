//! Grayscale template matching.
//!
//! NCC (normalized cross-correlation) over grayscale images: accurate and
//! robust to brightness changes, which matters for a game client that dims
//! the scene behind popups.

use image::GrayImage;
use imageproc::template_matching::{MatchTemplateMethod, find_extremes, match_template_parallel};

/// Best-scoring placement of a template inside a larger image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch {
    /// Top-left corner of the matched region.
    pub x: u32,
    pub y: u32,
    /// NCC score in 0.0..=1.0, higher is better.
    pub score: f32,
}

impl BestMatch {
    /// Center of the matched region for the given template size.
    pub fn center(&self, template_w: u32, template_h: u32) -> (i32, i32) {
        (
            (self.x + template_w / 2) as i32,
            (self.y + template_h / 2) as i32,
        )
    }
}

/// Find the global best placement of `template` inside `screen`.
///
/// Returns `None` when the template is empty or does not fit inside the
/// screen image, which can never be a match.
pub fn best_match(screen: &GrayImage, template: &GrayImage) -> Option<BestMatch> {
    let (tpl_w, tpl_h) = template.dimensions();
    if tpl_w == 0 || tpl_h == 0 {
        return None;
    }
    if tpl_w > screen.width() || tpl_h > screen.height() {
        return None;
    }

    let result = match_template_parallel(
        screen,
        template,
        MatchTemplateMethod::CrossCorrelationNormalized,
    );
    let extremes = find_extremes(&result);

    // NCC: higher value = better match
    let (x, y) = extremes.max_value_location;
    Some(BestMatch {
        x,
        y,
        score: extremes.max_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Screen with a distinct bright block on a textured background.
    fn synthetic_screen() -> GrayImage {
        GrayImage::from_fn(64, 48, |x, y| {
            if (20..30).contains(&x) && (10..20).contains(&y) {
                Luma([230])
            } else {
                // Uneven background so NCC has variance to normalize against.
                Luma([((x * 7 + y * 13) % 97) as u8])
            }
        })
    }

    #[test]
    fn exact_crop_matches_at_origin_of_crop() {
        let screen = synthetic_screen();
        let template = image::imageops::crop_imm(&screen, 18, 8, 14, 14).to_image();

        let hit = best_match(&screen, &template).unwrap();
        assert_eq!((hit.x, hit.y), (18, 8));
        assert!(hit.score > 0.99, "exact crop should score ~1.0, got {}", hit.score);
    }

    #[test]
    fn center_accounts_for_template_size() {
        let hit = BestMatch { x: 18, y: 8, score: 1.0 };
        assert_eq!(hit.center(14, 14), (25, 15));
    }

    #[test]
    fn absent_pattern_scores_low() {
        let screen = synthetic_screen();
        // Checkerboard that appears nowhere on the screen.
        let template = GrayImage::from_fn(12, 12, |x, y| {
            if (x + y) % 2 == 0 { Luma([255]) } else { Luma([0]) }
        });

        let hit = best_match(&screen, &template).unwrap();
        assert!(hit.score < 0.80, "unexpectedly high score {}", hit.score);
    }

    #[test]
    fn oversized_template_is_rejected() {
        let screen = synthetic_screen();
        let template = GrayImage::new(100, 100);
        assert!(best_match(&screen, &template).is_none());
    }

    #[test]
    fn empty_template_is_rejected() {
        let screen = synthetic_screen();
        let template = GrayImage::new(0, 0);
        assert!(best_match(&screen, &template).is_none());
    }
}
