//! Sim Gallery entry point
//!
//! On the web this attaches a `Gallery` to the page and exposes it as
//! `window.gallery` for the menu script. Natively it runs one simulation
//! headless for a number of frames and logs what it reported.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use wasm_bindgen::prelude::*;

    use sim_gallery::platform::Gallery;

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sim Gallery starting...");

        let window = web_sys::window().ok_or("no window")?;
        let gallery = Gallery::new()?;
        js_sys::Reflect::set(&window, &JsValue::from_str("gallery"), &JsValue::from(gallery))?;

        // Hide loading indicator
        if let Some(loading) = window.document().and_then(|d| d.get_element_by_id("loading")) {
            let _ = loading.set_attribute("class", "hidden");
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    use sim_gallery::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, HEADLESS_FRAME_MS, HEADLESS_FRAMES};
    use sim_gallery::platform::{HeadlessHost, headless};
    use sim_gallery::status::status_lines;
    use sim_gallery::{Runtime, Settings, demos};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let id = args.next().unwrap_or_else(|| demos::DEFAULT_DEMO.to_string());
    let frames = match args.next().map(|raw| raw.parse::<usize>()) {
        None => HEADLESS_FRAMES,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            log::error!("Frame count must be a whole number: {}", e);
            return ExitCode::from(2);
        }
    };

    log::info!("Sim Gallery (headless) running '{}' for {} frames", id, frames);

    let HeadlessHost {
        host,
        clock,
        panels,
        layers,
        primary,
    } = headless(CANVAS_WIDTH, CANVAS_HEIGHT);
    let mut runtime = Runtime::new(host, Settings::load(), 0x5EED);
    demos::register_all(&mut runtime);

    if let Err(e) = runtime.load_sim(&id) {
        log::error!("{}", e);
        log::info!("Available simulations: {}", runtime.registered_ids().join(", "));
        return ExitCode::FAILURE;
    }

    let delivered = clock.run(&mut runtime, frames, 0.0, HEADLESS_FRAME_MS);

    log::info!("Status after {} frames:", delivered);
    for line in status_lines(&runtime.status_text()) {
        log::info!("  {}", line);
    }
    let snapshot = panels.snapshot();
    log::info!(
        "{} controls, {} fps, {} primary draw commands in the last frame, {} retained layers created",
        snapshot.controls.len(),
        runtime.fps(),
        primary.since_last_clear().len(),
        layers.state().created_total
    );

    runtime.unload();
    ExitCode::SUCCESS
}
