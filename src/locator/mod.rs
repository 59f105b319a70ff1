//! Screen localization of reference patterns.
//!
//! A locator answers one question: is this reference image currently visible
//! on screen, and where is its center. Detection failures are data, not
//! errors — a missing template file or a failed capture degrades to
//! [`Detection::ResourceError`] and the control loop keeps running.

pub mod matching;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::GrayImage;

/// Screen coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Outcome of a single locate query.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// Pattern visible, center of the matched region.
    Found(Point),
    /// Pattern not on screen (or below the confidence threshold).
    NotFound,
    /// Template unloadable or screen capture failed. Treated as a miss by
    /// the controller, but kept distinct so callers can tell "not there"
    /// from "could not look".
    ResourceError(String),
}

/// Single-shot "is this pattern on screen" query.
pub trait Locate {
    fn locate(&mut self, pattern: &str, confidence: f32) -> Detection;
}

/// Production locator: captures the primary monitor and matches cached
/// grayscale templates against it.
///
/// Every call re-captures the screen — the screen is assumed to change
/// between polls, so there is nothing worth caching on that side. Templates
/// are immutable and cached for the process lifetime.
pub struct ScreenLocator {
    template_dir: PathBuf,
    templates: HashMap<String, GrayImage>,
}

impl ScreenLocator {
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            templates: HashMap::new(),
        }
    }

    /// Load a template image, dropping any alpha channel.
    ///
    /// Alpha is not used for matching; a BGRA reference image is flattened
    /// to opaque RGB before the grayscale conversion.
    fn load_template(path: &Path) -> anyhow::Result<GrayImage> {
        let dynamic = image::open(path).with_context(|| format!("reading {}", path.display()))?;
        let rgb = dynamic.to_rgb8();
        Ok(image::imageops::grayscale(&rgb))
    }

    fn template(&mut self, name: &str) -> anyhow::Result<&GrayImage> {
        if !self.templates.contains_key(name) {
            let path = self.template_dir.join(name);
            let tpl = Self::load_template(&path)?;
            self.templates.insert(name.to_string(), tpl);
        }
        Ok(&self.templates[name])
    }

    fn capture_screen() -> anyhow::Result<GrayImage> {
        let monitors = xcap::Monitor::all().context("enumerating monitors")?;
        let monitor = monitors.first().context("no monitor found")?;
        let rgba = monitor.capture_image().context("capturing screen")?;
        Ok(image::imageops::grayscale(&rgba))
    }
}

impl Locate for ScreenLocator {
    fn locate(&mut self, pattern: &str, confidence: f32) -> Detection {
        let template = match self.template(pattern) {
            Ok(tpl) => tpl.clone(),
            Err(e) => {
                log::error!("Template '{}' unusable: {:#}", pattern, e);
                return Detection::ResourceError(format!("{:#}", e));
            }
        };

        let screen = match Self::capture_screen() {
            Ok(img) => img,
            Err(e) => {
                log::error!("Screen capture failed: {:#}", e);
                return Detection::ResourceError(format!("{:#}", e));
            }
        };

        match matching::best_match(&screen, &template) {
            Some(hit) if hit.score >= confidence => {
                let (x, y) = hit.center(template.width(), template.height());
                log::debug!("'{}' matched at ({}, {}) score {:.3}", pattern, x, y, hit.score);
                Detection::Found(Point { x, y })
            }
            Some(hit) => {
                log::trace!("'{}' best score {:.3} below {:.2}", pattern, hit.score, confidence);
                Detection::NotFound
            }
            None => Detection::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_template_is_a_resource_error() {
        let mut locator = ScreenLocator::new("no-such-dir");
        match locator.locate("nope.png", 0.8) {
            Detection::ResourceError(reason) => assert!(reason.contains("nope.png")),
            other => panic!("expected ResourceError, got {:?}", other),
        }
    }
}
