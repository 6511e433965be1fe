//! Fixed timestep simulation tick
//!
//! Drives the PLAYING / GAME_OVER state machine: input handling, contact
//! resolution, per-entity motion and timed effects.

use super::behaviors::{Player, Pulsate};
use super::state::{ColorTag, Contact, GameEvent, GamePhase, GameState, MenuSnapshot};
use crate::consts::RESET_BUTTON_PRESSED_SCALE;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer/tap went down this tick
    pub press_down: bool,
    /// Pointer/tap went up this tick
    pub press_up: bool,
    /// Contacts reported by the physics layer since the last tick
    pub contacts: Vec<Contact>,
}

impl TickInput {
    pub fn press() -> Self {
        Self {
            press_down: true,
            ..Default::default()
        }
    }

    pub fn release() -> Self {
        Self {
            press_up: true,
            ..Default::default()
        }
    }

    pub fn contact(contact: Contact) -> Self {
        Self {
            contacts: vec![contact],
            ..Default::default()
        }
    }
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    match state.phase {
        GamePhase::Playing => {
            state.handle_playing_input(input);
            for &contact in &input.contacts {
                state.apply_contact(contact);
            }
        }
        GamePhase::GameOver => {
            // Contacts from a finished run are stale, even if this press restarts
            state.handle_menu_input(input);
        }
    }

    // Entity motion
    if let Some(player) = state.player.as_mut() {
        player.update(state.tuning.gravity, dt);
        let target_y = player.pos.y;
        state
            .camera
            .follow(target_y, state.tuning.camera_smooth_time, dt);
    }
    state.level.update(dt);
    if state.hint_visible {
        state.hint_pulse.update(dt);
    }

    update_effects(state, dt);
}

fn update_effects(state: &mut GameState, dt: f32) {
    if let Some(lerp) = state.effects.background.as_mut() {
        state.camera.background = lerp.advance(dt);
        if lerp.finished() {
            state.effects.background = None;
        }
    }

    if let Some(shake) = state.effects.shake.as_mut() {
        state.camera.position = shake.advance(dt, &mut state.rng);
        if shake.finished() {
            state.effects.shake = None;
        }
    }

    let reveal_due = state
        .effects
        .reveal
        .as_mut()
        .is_some_and(|reveal| reveal.advance(dt));
    if reveal_due {
        state.effects.reveal = None;
        state.show_game_over_menu();
    }
}

impl GameState {
    /// Route one physics contact
    pub fn apply_contact(&mut self, contact: Contact) {
        match contact {
            Contact::Obstacle { color } => self.on_obstacle_contact(color),
            Contact::Star => self.on_star_contact(),
            Contact::ColorSwitcher => self.on_color_switcher_contact(),
        }
    }

    /// Obstacle touched: fatal unless the colors match
    pub fn on_obstacle_contact(&mut self, color: ColorTag) {
        let Some(player) = self.player.as_ref() else {
            log::debug!("Obstacle contact with no live player, ignoring");
            return;
        };
        if self.phase != GamePhase::Playing {
            return;
        }
        if player.color == color {
            return;
        }
        log::debug!(
            "Fatal contact: player {:?} hit obstacle {:?}",
            player.color,
            color
        );
        self.lose_game();
    }

    /// Star touched: collect the oldest star and score it
    pub fn on_star_contact(&mut self) {
        if self.player.is_none() || self.phase != GamePhase::Playing {
            log::debug!("Star contact with no live player, ignoring");
            return;
        }

        let star = self
            .level
            .collect_star(self.score.current_score(), &mut self.rng);
        let update = self.score.on_star_collected();

        self.push_event(GameEvent::StarCollected {
            height: star.height,
            score: update.score,
        });
        if update.new_high_score {
            self.push_event(GameEvent::NewHighScore {
                score: update.score,
            });
        }
        if let Some(target) = update.background_target {
            if self.settings.effective_background_transitions() {
                self.effects.start_background(
                    self.camera.background,
                    target,
                    self.tuning.background_lerp_duration,
                );
            } else {
                self.effects.background = None;
                self.camera.background = target;
            }
            self.push_event(GameEvent::BackgroundAdvanced {
                index: self.score.background_index(),
            });
        }
    }

    /// Color switcher touched: recolor the player and collect the switcher
    pub fn on_color_switcher_contact(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let palette_len = self.tuning.player_colors.len();
        let Some(player) = self.player.as_mut() else {
            log::debug!("Color switcher contact with no live player, ignoring");
            return;
        };
        player.switch_color(palette_len, &mut self.rng);
        let color = player.color;
        self.level.collect_color_switcher();
        self.push_event(GameEvent::ColorSwitched { color });
    }

    /// Destroy the player and schedule the game over menu
    fn lose_game(&mut self) {
        let Some(player) = self.player.take() else {
            return;
        };
        log::info!(
            "Run {} lost at score {}",
            self.runs_started,
            self.score.current_score()
        );
        self.effects.schedule_reveal(self.tuning.game_over_delay);
        if self.settings.effective_screen_shake() {
            self.effects
                .start_shake(self.camera.position, self.tuning.camera_shake_duration);
        }
        self.push_event(GameEvent::PlayerLost {
            position: player.pos,
        });
    }

    /// Freeze the menu numbers and switch to the game over phase
    pub(crate) fn show_game_over_menu(&mut self) {
        let snapshot = MenuSnapshot {
            score: self.score.current_score(),
            high_score: self.score.high_score(),
            total_stars: self.score.total_stars(),
        };
        log::info!(
            "Game over: score {}, best {}, stars {}",
            snapshot.score,
            snapshot.high_score,
            snapshot.total_stars
        );
        self.phase = GamePhase::GameOver;
        self.menu = Some(snapshot);
        self.menu_press_armed = false;
        self.push_event(GameEvent::GameOverShown);
    }

    fn handle_playing_input(&mut self, input: &TickInput) {
        if !input.press_down {
            return;
        }
        if self.hint_visible {
            self.hint_visible = false;
        }
        if let Some(player) = self.player.as_mut() {
            player.jump(self.tuning.jump_force);
            self.push_event(GameEvent::Jump);
        }
    }

    /// Restart needs a full press-and-release while the menu is showing.
    /// Both may arrive in the same tick when a tap is shorter than a frame.
    fn handle_menu_input(&mut self, input: &TickInput) {
        if input.press_down {
            self.menu_press_armed = true;
            self.reset_button_scale = RESET_BUTTON_PRESSED_SCALE;
        }
        if input.press_up && self.menu_press_armed {
            self.menu_press_armed = false;
            self.reset_button_scale = 1.0;
            self.restart();
        }
    }

    /// Tear down the current level and start over
    pub fn restart(&mut self) {
        self.level.clear();
        self.start_new_run();
    }

    pub(crate) fn start_new_run(&mut self) {
        self.menu = None;
        self.phase = GamePhase::Playing;
        self.camera.reset();
        self.effects.cancel_cosmetic();
        self.effects.reveal = None;

        self.camera.background = self.score.reset();
        self.player = Some(Player::spawn(
            self.tuning.player_spawn_y,
            self.tuning.player_colors.len(),
            &mut self.rng,
        ));
        self.level
            .initialize(self.tuning.initial_obstacles, &mut self.rng);
        self.high_score_marker = self.score.high_score_marker_height();
        self.hint_visible = self.settings.show_hint;
        self.hint_pulse = Pulsate::default();

        self.runs_started += 1;
        log::info!(
            "Run {} started (high score {}, marker at {:.1})",
            self.runs_started,
            self.score.high_score(),
            self.high_score_marker
        );
        self.push_event(GameEvent::RunStarted {
            run: self.runs_started,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::Tier;
    use crate::persistence::{KeyValueStore, MemoryStore};
    use crate::settings::Settings;
    use crate::stats::{HIGH_SCORE_KEY, PersistentStats, TOTAL_STARS_KEY};
    use crate::tuning::Tuning;

    fn new_game(seed: u64, high: i64, total: i64) -> GameState {
        let mut store = MemoryStore::new();
        store.set_int(HIGH_SCORE_KEY, high);
        store.set_int(TOTAL_STARS_KEY, total);
        let stats = PersistentStats::load(Box::new(store));
        GameState::new(Tuning::default(), Settings::default(), stats, seed).unwrap()
    }

    fn run_ticks(state: &mut GameState, ticks: u32) {
        let input = TickInput::default();
        for _ in 0..ticks {
            tick(state, &input, SIM_DT);
        }
    }

    fn other_color(state: &GameState) -> ColorTag {
        let current = state.player.as_ref().unwrap().color;
        ColorTag(((current.index() + 1) % state.tuning.player_colors.len()) as u8)
    }

    fn die(state: &mut GameState) {
        let color = other_color(state);
        tick(state, &TickInput::contact(Contact::Obstacle { color }), SIM_DT);
        run_ticks(state, 125);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_new_game_starts_playing() {
        let mut state = new_game(1, 0, 0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.player_alive());
        assert!(state.hint_visible);
        assert_eq!(state.level.obstacles().len(), 4);
        assert_eq!(state.level.stars().len(), 4);
        assert_eq!(state.drain_events(), vec![GameEvent::RunStarted { run: 1 }]);
    }

    #[test]
    fn test_first_press_hides_hint_and_jumps() {
        let mut state = new_game(1, 0, 0);
        state.drain_events();
        tick(&mut state, &TickInput::press(), SIM_DT);
        assert!(!state.hint_visible);
        let player = state.player.as_ref().unwrap();
        assert!(player.active);
        assert!(player.pos.y > -10.0);
        assert_eq!(state.drain_events(), vec![GameEvent::Jump]);
    }

    #[test]
    fn test_star_contacts_score_and_persist() {
        let mut state = new_game(5, 3, 10);
        for _ in 0..4 {
            tick(&mut state, &TickInput::contact(Contact::Star), SIM_DT);
        }
        assert_eq!(state.score.current_score(), 4);
        assert_eq!(state.score.high_score(), 4);
        assert_eq!(state.score.total_stars(), 14);
        let store = state.score.stats().store();
        assert_eq!(store.get_int(HIGH_SCORE_KEY, 0), 4);
        assert_eq!(store.get_int(TOTAL_STARS_KEY, 0), 14);
        assert_eq!(state.level.stars().len(), 4);
        assert_eq!(state.level.obstacles().len(), 7);
    }

    #[test]
    fn test_star_spawn_uses_score_before_increment() {
        let mut state = new_game(17, 0, 0);
        let mut tiers = Vec::new();
        for _ in 0..16 {
            tick(&mut state, &TickInput::contact(Contact::Star), SIM_DT);
            let newest = state.level.obstacles().back().unwrap();
            tiers.push((state.score.current_score(), newest.tier));
        }
        assert_eq!(tiers[4], (5, Tier::Easy));
        assert_eq!(tiers[5], (6, Tier::Any));
        assert_eq!(tiers[14], (15, Tier::Any));
        assert_eq!(tiers[15], (16, Tier::Hard));
        assert!(tiers[..5].iter().all(|&(_, tier)| tier == Tier::Easy));
    }

    #[test]
    fn test_background_lerps_at_five() {
        let mut state = new_game(9, 0, 0);
        let palette = state.tuning.background_colors.clone();
        assert_eq!(state.camera.background, palette[0]);

        for _ in 0..5 {
            tick(&mut state, &TickInput::contact(Contact::Star), SIM_DT);
        }
        assert_eq!(state.score.background_index(), 1);
        assert!(state.effects.background.is_some());
        assert_ne!(state.camera.background, palette[1]);

        run_ticks(&mut state, 130);
        assert!(state.effects.background.is_none());
        assert_eq!(state.camera.background, palette[1]);
    }

    #[test]
    fn test_reduced_motion_snaps_background() {
        let mut state = new_game(9, 0, 0);
        state.settings.reduced_motion = true;
        for _ in 0..5 {
            tick(&mut state, &TickInput::contact(Contact::Star), SIM_DT);
        }
        assert!(state.effects.background.is_none());
        assert_eq!(state.camera.background, state.tuning.background_colors[1]);
    }

    #[test]
    fn test_matching_obstacle_is_harmless() {
        let mut state = new_game(3, 0, 0);
        let color = state.player.as_ref().unwrap().color;
        tick(&mut state, &TickInput::contact(Contact::Obstacle { color }), SIM_DT);
        run_ticks(&mut state, 200);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.player_alive());
        assert!(state.effects.reveal.is_none());
    }

    #[test]
    fn test_fatal_obstacle_reveals_menu_after_delay() {
        let mut state = new_game(3, 8, 20);
        for _ in 0..2 {
            tick(&mut state, &TickInput::contact(Contact::Star), SIM_DT);
        }
        state.drain_events();

        let color = other_color(&state);
        tick(&mut state, &TickInput::contact(Contact::Obstacle { color }), SIM_DT);
        assert!(!state.player_alive());
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.effects.shake.is_some());
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::PlayerLost { .. }]
        ));

        run_ticks(&mut state, 100);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.menu.is_none());

        run_ticks(&mut state, 25);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            state.menu,
            Some(MenuSnapshot {
                score: 2,
                high_score: 8,
                total_stars: 22,
            })
        );
        assert!(state.drain_events().contains(&GameEvent::GameOverShown));
        assert_eq!(state.camera.position, GameState::CAMERA_START);
    }

    #[test]
    fn test_contacts_ignored_after_death() {
        let mut state = new_game(4, 0, 0);
        let color = other_color(&state);
        let input = TickInput {
            contacts: vec![Contact::Obstacle { color }, Contact::Star, Contact::ColorSwitcher],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!(!state.player_alive());
        assert_eq!(state.score.current_score(), 0);
        assert_eq!(state.level.stars().len(), 4);
    }

    #[test]
    fn test_restart_needs_press_and_release() {
        let mut state = new_game(6, 0, 0);
        tick(&mut state, &TickInput::contact(Contact::Star), SIM_DT);
        die(&mut state);

        // Release without a press in the menu does nothing
        tick(&mut state, &TickInput::release(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(&mut state, &TickInput::press(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.reset_button_scale, RESET_BUTTON_PRESSED_SCALE);

        tick(&mut state, &TickInput::release(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.reset_button_scale, 1.0);
        assert!(state.menu.is_none());
        assert!(state.player_alive());
        assert!(state.hint_visible);
        assert_eq!(state.score.current_score(), 0);
        assert_eq!(state.score.background_index(), 0);
        assert_eq!(state.level.obstacles().len(), 4);
        assert_eq!(state.level.obstacles().front().unwrap().height, 0.0);
        assert_eq!(state.high_score_marker, 17.5);
        assert_eq!(state.runs_started, 2);
    }

    #[test]
    fn test_tap_within_one_tick_restarts() {
        let mut state = new_game(6, 0, 0);
        die(&mut state);
        let tap = TickInput {
            press_down: true,
            press_up: true,
            ..Default::default()
        };
        tick(&mut state, &tap, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.reset_button_scale, 1.0);
        assert!(!state.menu_press_armed);
        assert_eq!(state.runs_started, 2);
    }

    #[test]
    fn test_stale_contacts_dropped_on_restart_tick() {
        let mut state = new_game(6, 0, 0);
        die(&mut state);
        tick(&mut state, &TickInput::press(), SIM_DT);
        let input = TickInput {
            press_up: true,
            contacts: vec![Contact::Star],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score.current_score(), 0);
    }

    #[test]
    fn test_totals_survive_restarts() {
        let mut state = new_game(12, 0, 10);
        for stars in [3, 6, 1] {
            for _ in 0..stars {
                tick(&mut state, &TickInput::contact(Contact::Star), SIM_DT);
            }
            die(&mut state);
            tick(&mut state, &TickInput::press(), SIM_DT);
            tick(&mut state, &TickInput::release(), SIM_DT);
        }
        assert_eq!(state.score.total_stars(), 20);
        assert_eq!(state.score.high_score(), 6);
        assert_eq!(state.high_score_marker, 6.0 * 17.5);
    }

    #[test]
    fn test_color_switcher_recolors_player() {
        let mut state = new_game(21, 0, 0);
        // Make sure a switcher exists
        while state.level.color_switchers().is_empty() {
            tick(&mut state, &TickInput::contact(Contact::Star), SIM_DT);
        }
        let before = state.player.as_ref().unwrap().color;
        let count = state.level.color_switchers().len();
        tick(&mut state, &TickInput::contact(Contact::ColorSwitcher), SIM_DT);
        assert_ne!(state.player.as_ref().unwrap().color, before);
        assert_eq!(state.level.color_switchers().len(), count - 1);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = new_game(99999, 0, 0);
        let mut state2 = new_game(99999, 0, 0);

        let inputs = [
            TickInput::press(),
            TickInput::contact(Contact::Star),
            TickInput::default(),
            TickInput::contact(Contact::Star),
            TickInput::press(),
        ];

        for input in &inputs {
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        let h1: Vec<(f32, u8)> = state1.level.obstacles().iter().map(|o| (o.height, o.color.0)).collect();
        let h2: Vec<(f32, u8)> = state2.level.obstacles().iter().map(|o| (o.height, o.color.0)).collect();
        assert_eq!(h1, h2);
        assert_eq!(
            state1.player.as_ref().unwrap().color,
            state2.player.as_ref().unwrap().color
        );
    }
}
