//! Search-and-click control loop.
//!
//! One [`Controller`] drives the whole bot: an infinite pass loop over the
//! configured target list, a bounded-retry search per target, and a priority
//! branch that dismisses the quit-confirmation popup before every target
//! check. All waiting is blocking sleeps on the calling thread; the only way
//! out is the shared stop flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;

use crate::config::BotConfig;
use crate::input::InputDriver;
use crate::locator::{Detection, Locate, Point};

/// Result of one per-target search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Target found and clicked at this point.
    Clicked(Point),
    /// Deadline elapsed without a match. Expected, not an error.
    TimedOut,
    /// Stop flag was raised mid-search.
    Stopped,
}

pub struct Controller<L, I> {
    locator: L,
    input: I,
    config: BotConfig,
    stop: Arc<AtomicBool>,
}

impl<L: Locate, I: InputDriver> Controller<L, I> {
    pub fn new(locator: L, input: I, config: BotConfig, stop: Arc<AtomicBool>) -> Self {
        Self {
            locator,
            input,
            config,
            stop,
        }
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// If the quit popup is visible, dismiss it and report true.
    ///
    /// Uses the stricter popup confidence: wrongly pressing the dismiss key
    /// mid-interaction is worse than leaving a popup up for one more poll.
    fn dismiss_quit_popup(&mut self) -> bool {
        match self
            .locator
            .locate(&self.config.quit_template, self.config.popup_confidence)
        {
            Detection::Found(_) => {
                log::info!("Quit popup detected, dismissing");
                self.input.press_key(&self.config.dismiss_key);
                thread::sleep(self.config.popup_settle());
                true
            }
            Detection::NotFound => false,
            Detection::ResourceError(reason) => {
                log::warn!("Popup check degraded to miss: {}", reason);
                false
            }
        }
    }

    /// Click at a point with the full gesture the game expects:
    /// settle, animated move, press, hold, release, settle.
    ///
    /// The hold and the two settle delays are load-bearing. The game rejects
    /// instantaneous synthetic clicks, so none of these sleeps may be elided.
    fn click(&mut self, point: Point) {
        thread::sleep(self.config.pre_click());
        self.input
            .move_to(point.x, point.y, self.config.move_duration());
        self.input.press_down();
        thread::sleep(self.config.hold());
        self.input.release();
        thread::sleep(self.config.post_click());
        log::info!("Clicked at ({}, {})", point.x, point.y);
    }

    /// Poll for `target` until it appears or the timeout elapses, clicking
    /// it once on the first hit.
    ///
    /// The deadline is wall-clock and checked only at the top of the loop:
    /// popup handling consumes real time but never short-circuits a search
    /// that still has budget at the next check.
    pub fn search_and_click(&mut self, target: &str) -> SearchOutcome {
        let deadline = Instant::now() + self.config.search_timeout();
        while Instant::now() < deadline {
            if self.stopped() {
                return SearchOutcome::Stopped;
            }
            if self.dismiss_quit_popup() {
                continue;
            }
            match self
                .locator
                .locate(target, self.config.match_confidence)
            {
                Detection::Found(point) => {
                    log::info!("Found '{}' at ({}, {})", target, point.x, point.y);
                    self.click(point);
                    return SearchOutcome::Clicked(point);
                }
                Detection::NotFound => {}
                Detection::ResourceError(reason) => {
                    log::warn!("'{}' degraded to miss: {}", target, reason);
                }
            }
            thread::sleep(self.config.poll_interval());
        }
        log::info!(
            "'{}' not found within {}ms",
            target,
            self.config.search_timeout_ms
        );
        SearchOutcome::TimedOut
    }

    /// One full traversal of the target list.
    ///
    /// Starts with an unconditional dismiss key press — a defensive reset in
    /// case a popup survived the previous pass — then attempts every target
    /// in order. A timeout never aborts the pass.
    pub fn run_pass(&mut self) {
        log::debug!("Pass start, resetting popup state");
        self.input.press_key(&self.config.dismiss_key);
        thread::sleep(self.config.popup_settle());

        let targets = self.config.targets.clone();
        for target in &targets {
            log::info!("Searching for '{}'", target);
            match self.search_and_click(target) {
                SearchOutcome::Clicked(_) => {}
                SearchOutcome::TimedOut => log::info!("Skipping '{}'", target),
                SearchOutcome::Stopped => return,
            }
        }
    }

    /// Run passes forever, until the stop flag is raised.
    pub fn run(&mut self) {
        if self.config.targets.is_empty() {
            log::error!("No targets configured, nothing to do");
            return;
        }
        log::info!(
            "Running over {} targets, stop with the failsafe hotkey or Ctrl+C",
            self.config.targets.len()
        );
        while !self.stopped() {
            self.run_pass();
            if self.stopped() {
                break;
            }
            thread::sleep(self.config.pass_pause());
        }
        log::info!("Stop requested, shutting down");
    }
}
