mod config;
mod controller;
mod input;
mod locator;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use config::BotConfig;
use controller::Controller;
use input::EnigoDriver;
use locator::ScreenLocator;

/// Listen for the global failsafe hotkey (F12) on a background thread and
/// raise the stop flag when it fires. This works even while the game window
/// has focus, which is the whole point.
fn spawn_failsafe_listener(stop: Arc<AtomicBool>) {
    thread::spawn(move || {
        if let Err(error) = rdev::listen(move |event| {
            if let rdev::EventType::KeyPress(rdev::Key::F12) = event.event_type {
                log::warn!("Failsafe hotkey pressed, requesting stop");
                stop.store(true, Ordering::Relaxed);
            }
        }) {
            log::error!("Failsafe hotkey listener failed: {:?}", error);
        }
    });
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = BotConfig::load("botconfig.json");

    let stop = Arc::new(AtomicBool::new(false));
    spawn_failsafe_listener(stop.clone());

    let locator = ScreenLocator::new(&config.template_dir);
    let input = EnigoDriver::new()?;
    let mut controller = Controller::new(locator, input, config, stop);
    controller.run();
    Ok(())
}
