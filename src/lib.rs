#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod animation;
pub mod color;
pub mod config;
pub mod error;
pub mod label;
pub mod nav;
pub mod particles;
pub mod planner;
pub mod rng;
pub mod scene;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    mod label;
    mod planner;
    pub mod render;
    pub mod ui;

    pub use planner::DomPlannerView;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // The page stays usable without the background, so a missing canvas
        // or GL context only costs the decoration.
        match document.get_element_by_id("bg-canvas") {
            Some(el) => match el.dyn_into::<web_sys::HtmlCanvasElement>() {
                Ok(canvas) => {
                    if let Err(e) = render::start(&document, canvas) {
                        log::warn!("background disabled: {}", e);
                    }
                }
                Err(_) => log::warn!("#bg-canvas is not a canvas"),
            },
            None => log::info!("no #bg-canvas; skipping background"),
        }

        ui::install(&window, &document)?;
        planner::install(&document)?;
        Ok(())
    }
}

// When compiling for non-wasm targets (e.g., `cargo test` on host),
// provide an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
