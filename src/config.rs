//! Bot configuration.
//!
//! All timing and confidence knobs live here so tests can inject fast
//! profiles instead of patching process-wide constants.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Directory containing the reference images.
    pub template_dir: PathBuf,
    /// Ordered list of template file names to search and click, one pass at a time.
    pub targets: Vec<String>,
    /// Template of the quit-confirmation popup.
    pub quit_template: String,
    /// Key pressed to dismiss the quit popup.
    pub dismiss_key: String,
    /// How long to keep polling for a single target before giving up.
    pub search_timeout_ms: u64,
    /// Minimum NCC score to accept a target match.
    pub match_confidence: f32,
    /// Minimum NCC score to accept the quit popup. Stricter than
    /// `match_confidence`: a false positive here aborts a legitimate
    /// interaction, a false negative only delays the dismissal.
    pub popup_confidence: f32,
    pub pre_click_ms: u64,
    pub post_click_ms: u64,
    /// How long the mouse button stays down. The game ignores clicks where
    /// press and release land in the same instant.
    pub hold_ms: u64,
    /// Pointer move animation duration.
    pub move_ms: u64,
    /// Sleep between polls while a target is not yet visible.
    pub poll_ms: u64,
    /// Sleep after dismissing the popup, lets the UI settle.
    pub popup_settle_ms: u64,
    /// Sleep between full passes over the target list.
    pub pass_pause_ms: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("templates"),
            targets: Vec::new(),
            quit_template: "quit.png".to_string(),
            dismiss_key: "escape".to_string(),
            search_timeout_ms: 4000,
            match_confidence: 0.80,
            popup_confidence: 0.90,
            pre_click_ms: 300,
            post_click_ms: 200,
            hold_ms: 100,
            move_ms: 80,
            poll_ms: 500,
            popup_settle_ms: 500,
            pass_pause_ms: 1000,
        }
    }
}

impl BotConfig {
    /// Load configuration from a JSON file, falling back to defaults if the
    /// file is missing or malformed.
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path);
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring malformed config {}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config at {}, using defaults", path);
                Self::default()
            }
        }
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }

    pub fn pre_click(&self) -> Duration {
        Duration::from_millis(self.pre_click_ms)
    }

    pub fn post_click(&self) -> Duration {
        Duration::from_millis(self.post_click_ms)
    }

    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }

    pub fn move_duration(&self) -> Duration {
        Duration::from_millis(self.move_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    pub fn popup_settle(&self) -> Duration {
        Duration::from_millis(self.popup_settle_ms)
    }

    pub fn pass_pause(&self) -> Duration {
        Duration::from_millis(self.pass_pause_ms)
    }
}
