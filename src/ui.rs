//! Plain-data view of the game for the render/UI layer
//!
//! Nothing here mutates the simulation; the host captures a snapshot after
//! each frame and draws from it.

use serde::Serialize;

use crate::sim::{GamePhase, GameState, MenuSnapshot, Tier};

#[derive(Debug, Clone, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub template: usize,
    pub tier: Tier,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Serialize)]
pub struct PickupView {
    pub id: u32,
    pub y: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub color: [f32; 4],
}

/// Everything the renderer and HUD need for one frame
#[derive(Debug, Clone, Serialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub high_score: u32,
    pub total_stars: u32,
    pub background: [f32; 4],
    pub camera: [f32; 3],
    pub high_score_marker: f32,
    pub hint_visible: bool,
    pub hint_scale: f32,
    pub reset_button_scale: f32,
    pub menu: Option<MenuSnapshot>,
    pub player: Option<PlayerView>,
    pub obstacles: Vec<ObstacleView>,
    pub stars: Vec<PickupView>,
    pub color_switchers: Vec<PickupView>,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let palette = &state.tuning.player_colors;
        let color_of = |index: usize| palette.get(index).map(|c| c.to_array()).unwrap_or([1.0; 4]);
        let run = state.score.run_state();

        Self {
            phase: state.phase,
            score: run.current_score,
            high_score: run.high_score,
            total_stars: run.total_stars_collected,
            background: state.camera.background.to_array(),
            camera: state.camera.position.to_array(),
            high_score_marker: state.high_score_marker,
            hint_visible: state.hint_visible,
            hint_scale: state.hint_pulse.scale(),
            reset_button_scale: state.reset_button_scale,
            menu: state.menu,
            player: state.player.as_ref().map(|p| PlayerView {
                x: p.pos.x,
                y: p.pos.y,
                color: color_of(p.color.index()),
            }),
            obstacles: state
                .level
                .obstacles()
                .iter()
                .map(|o| ObstacleView {
                    id: o.id.0,
                    template: o.template,
                    tier: o.tier,
                    x: o.motion.x,
                    y: o.height,
                    rotation: o.motion.rotation,
                    color: color_of(o.color.index()),
                })
                .collect(),
            stars: state
                .level
                .stars()
                .iter()
                .map(|s| PickupView {
                    id: s.id.0,
                    y: s.height,
                    scale: s.pulse.scale(),
                })
                .collect(),
            color_switchers: state
                .level
                .color_switchers()
                .iter()
                .map(|s| PickupView {
                    id: s.id.0,
                    y: s.height,
                    scale: s.pulse.scale(),
                })
                .collect(),
        }
    }

    /// JSON encoding for hosts that cross a language boundary
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
