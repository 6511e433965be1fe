//! Browser bridge
//!
//! The page owns rendering, audio and collision detection. It forwards pointer
//! events and contacts here, calls `frame` from `requestAnimationFrame`, and
//! reads back a JSON snapshot plus the cue list.

use wasm_bindgen::prelude::*;

use super::FixedTimestep;
use crate::persistence::LocalStorageStore;
use crate::settings::Settings;
use crate::sim::{ColorTag, Contact, GameState, TickInput, tick};
use crate::stats::PersistentStats;
use crate::tuning::Tuning;
use crate::ui::HudSnapshot;

const STORAGE_PREFIX: &str = "chroma_climb_";

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("Chroma Climb starting...");
}

/// Game instance exported to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    stepper: FixedTimestep,
    input: TickInput,
    events_json: String,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game; `tuning_json` may be empty to use the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: &str) -> Result<WebGame, JsValue> {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        let store = LocalStorageStore::new(STORAGE_PREFIX);
        let settings = Settings::load(&store);
        let stats = PersistentStats::load(Box::new(store));
        let seed = js_sys::Date::now() as u64;

        let state = GameState::new(tuning, settings, stats, seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Game initialized with seed: {}", seed);

        Ok(WebGame {
            state,
            stepper: FixedTimestep::default(),
            input: TickInput::default(),
            events_json: String::from("[]"),
        })
    }

    pub fn press_down(&mut self) {
        self.input.press_down = true;
    }

    pub fn press_up(&mut self) {
        self.input.press_up = true;
    }

    pub fn report_star(&mut self) {
        self.input.contacts.push(Contact::Star);
    }

    pub fn report_color_switcher(&mut self) {
        self.input.contacts.push(Contact::ColorSwitcher);
    }

    pub fn report_obstacle(&mut self, color: u8) {
        self.input.contacts.push(Contact::Obstacle {
            color: ColorTag(color),
        });
    }

    /// Advance by one browser frame (seconds)
    pub fn frame(&mut self, dt: f32) {
        let state = &mut self.state;
        let input = &mut self.input;
        self.stepper.advance(dt, |step| {
            tick(state, input, step);
            // One-shot inputs are consumed by the first substep
            *input = TickInput::default();
        });

        let events = self.state.drain_events();
        self.events_json = serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Failed to encode events: {}", e);
            String::from("[]")
        });
    }

    /// Current frame as JSON
    pub fn snapshot(&self) -> String {
        HudSnapshot::capture(&self.state)
            .to_json()
            .unwrap_or_else(|_| String::from("{}"))
    }

    /// Cues raised during the last frame, as a JSON array
    pub fn events(&self) -> String {
        self.events_json.clone()
    }

    pub fn sfx_volume(&self) -> f32 {
        self.state.settings.effective_sfx_volume()
    }

    pub fn set_reduced_motion(&mut self, enabled: bool) {
        let state = &mut self.state;
        state.settings.reduced_motion = enabled;
        state.settings.save(state.score.stats_mut().store_mut());
    }
}
