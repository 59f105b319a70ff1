//! Synthetic input dispatch.
//!
//! The controller only ever needs four gestures: move the pointer, press and
//! release the left button, and press a named key. Keeping the trait that
//! narrow lets tests substitute a recording stub for the real device.

use std::thread;
use std::time::Duration;

use anyhow::Context;
use enigo::{Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};

/// Fire-and-forget input injection. Failures are logged by implementations,
/// never surfaced to the control loop.
pub trait InputDriver {
    /// Move the pointer to absolute coordinates, animated over `duration`.
    fn move_to(&mut self, x: i32, y: i32, duration: Duration);
    fn press_down(&mut self);
    fn release(&mut self);
    /// Press and release a key by name (see [`string_to_key`]).
    fn press_key(&mut self, key: &str);
}

/// Production driver over enigo.
pub struct EnigoDriver {
    enigo: Enigo,
}

impl EnigoDriver {
    pub fn new() -> anyhow::Result<Self> {
        let enigo = Enigo::new(&Settings::default()).context("initializing input backend")?;
        Ok(Self { enigo })
    }
}

impl InputDriver for EnigoDriver {
    fn move_to(&mut self, x: i32, y: i32, duration: Duration) {
        if duration.is_zero() {
            if let Err(e) = self.enigo.move_mouse(x, y, Coordinate::Abs) {
                log::warn!("move_mouse failed: {}", e);
            }
            return;
        }

        // Animate from the current position so the target application sees
        // a gesture rather than a teleport.
        let (start_x, start_y) = self.enigo.location().unwrap_or((x, y));
        let steps = 16u32;
        let step_pause = duration / steps;
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            let ix = start_x + ((x - start_x) as f64 * t).round() as i32;
            let iy = start_y + ((y - start_y) as f64 * t).round() as i32;
            if let Err(e) = self.enigo.move_mouse(ix, iy, Coordinate::Abs) {
                log::warn!("move_mouse failed: {}", e);
                return;
            }
            thread::sleep(step_pause);
        }
    }

    fn press_down(&mut self) {
        if let Err(e) = self.enigo.button(Button::Left, Direction::Press) {
            log::warn!("button press failed: {}", e);
        }
    }

    fn release(&mut self) {
        if let Err(e) = self.enigo.button(Button::Left, Direction::Release) {
            log::warn!("button release failed: {}", e);
        }
    }

    fn press_key(&mut self, key: &str) {
        let Some(key) = string_to_key(key) else {
            log::warn!("Unknown key name '{}', dropping key press", key);
            return;
        };
        if let Err(e) = self.enigo.key(key, Direction::Click) {
            log::warn!("key press failed: {}", e);
        }
    }
}

/// Convert a configured key name to an enigo Key variant.
///
/// Covers the keys that plausibly dismiss a dialog, plus single characters
/// (as Unicode keys). Anything else is rejected rather than guessed.
pub fn string_to_key(key_str: &str) -> Option<Key> {
    match key_str.to_lowercase().as_str() {
        "escape" | "esc" => Some(Key::Escape),
        "return" | "enter" => Some(Key::Return),
        "space" | " " => Some(Key::Space),
        "tab" => Some(Key::Tab),
        "backspace" | "back" => Some(Key::Backspace),
        "delete" | "del" => Some(Key::Delete),

        // Single character: type it as a Unicode key
        _ if key_str.len() == 1 => key_str.chars().next().map(Key::Unicode),

        _ => None,
    }
}
