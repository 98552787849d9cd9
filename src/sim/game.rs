//! The game state machine
//!
//! Idle -> Playing on a tap, Playing -> GameOver on a collision, and
//! GameOver -> Idle on the next tap. Everything advances once per drawn
//! frame; there is no separate update step.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::{Animation, Timed};
use super::assets::Assets;
use super::car::{Car, CarKind};
use super::input::Gesture;
use super::road::Road;
use crate::consts::{
    LEFT_LANE, ORANGE, PLAYER_SPAWN_HEIGHT, RIGHT_LANE, SCORE_FONT_SIZE, SCORE_INSET_BOTTOM,
    SCORE_INSET_X,
};
use crate::error::GameError;
use crate::geometry::Rect;
use crate::renderer::{Image, RenderContext, TextLabel, Texture, TextureProvider};
use crate::tuning::Tuning;

/// How far below its resting place the player's car starts the intro,
/// relative to the road speed
const INTRO_LEAD_FACTOR: f32 = 1.5;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Road at rest, waiting for a tap
    Idle,
    /// Active gameplay
    Playing,
    /// Crashed; cars roll off the screen until the next tap
    GameOver,
}

/// Something the host may want to react to (sounds, analytics)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Overtaken { total: u32 },
    Crashed { cars_overtaken: u32 },
    Reset,
}

/// What the intro animation moves while it plays
pub struct IntroScene<'a> {
    pub road: &'a mut Road,
    pub player: &'a mut Car,
    pub assets: &'a Assets,
}

/// Accelerates the road from rest while the player's car drives up from
/// below the screen to its spawn point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntroAnimation {
    pub destination_y: f32,
    pub initial_speed: f32,
}

impl<'a> Animation<IntroScene<'a>> for IntroAnimation {
    fn render(&mut self, scene: &mut IntroScene<'a>, ctx: &mut dyn RenderContext, progress: f32) {
        scene.road.speed = self.initial_speed * progress;
        let lead = self.destination_y + scene.road.speed * INTRO_LEAD_FACTOR;
        scene.player.center.y = self.destination_y + lead * (1.0 - progress);

        scene.road.draw(ctx, scene.assets.road);
        scene.player.draw(ctx, scene.assets);
    }
}

/// A complete game on a fixed-size screen
pub struct Game<T: TextureProvider> {
    screen_size: Vec2,
    tuning: Tuning,
    textures: T,
    assets: Assets,

    road: Road,
    player: Car,
    enemy: Car,
    intro: Timed<IntroAnimation>,

    phase: GamePhase,
    game_start_time: Option<f64>,
    cars_overtaken: u32,
    drag_anchor: Option<Vec2>,

    rng: Pcg32,
    /// Count last rasterized and its texture, `None` if rasterizing failed
    score_label: Option<(u32, Option<Texture>)>,
    events: Vec<GameEvent>,
}

impl<T: TextureProvider> Game<T> {
    /// Load every texture up front and place the cars at their spawn points.
    ///
    /// Lanes are drawn from `tuning.seed`, or from a random seed when unset.
    /// Fails on an empty screen, out-of-range tuning or a missing texture.
    pub fn new(screen_size: Vec2, tuning: Tuning, mut textures: T) -> Result<Self, GameError> {
        if !(screen_size.is_finite() && screen_size.cmpgt(Vec2::ZERO).all()) {
            return Err(GameError::ScreenSize {
                width: screen_size.x,
                height: screen_size.y,
            });
        }
        tuning.validate()?;
        let assets = Assets::load(&mut textures)?;
        let seed = tuning.seed.unwrap_or_else(rand::random);

        let mut game = Self {
            screen_size,
            road: Road::new(screen_size),
            player: Car::new(CarKind::Player, screen_size),
            enemy: Car::new(CarKind::Enemy, screen_size),
            intro: Timed::new(
                tuning.intro_duration_ms,
                IntroAnimation {
                    destination_y: 0.0,
                    initial_speed: tuning.initial_speed,
                },
            ),
            phase: GamePhase::Idle,
            game_start_time: None,
            cars_overtaken: 0,
            drag_anchor: None,
            rng: Pcg32::seed_from_u64(seed),
            score_label: None,
            events: Vec::new(),
            tuning,
            textures,
            assets,
        };
        game.place_cars();
        game.intro.animation.destination_y = game.player.center.y;

        log::info!(
            "Game ready: {}x{} screen, lane seed {seed}",
            screen_size.x,
            screen_size.y
        );
        Ok(game)
    }

    /// Advance one frame and draw it
    pub fn draw(&mut self, ctx: &mut dyn RenderContext) {
        match self.phase {
            GamePhase::Idle => self.draw_idle(ctx),
            GamePhase::Playing => self.draw_playing(ctx),
            GamePhase::GameOver => self.draw_game_over(ctx),
        }
    }

    /// Back to a fresh idle game
    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.game_start_time = None;
        self.road.speed = 0.0;
        self.cars_overtaken = 0;
        self.player.is_crashed = false;
        self.enemy.is_crashed = false;
        self.drag_anchor = None;
        self.intro.reset();
        self.place_cars();

        self.events.push(GameEvent::Reset);
        log::info!("Game reset");
    }

    /// Pan began. Grabs the player's car if the touch landed on it.
    pub fn move_started(&mut self, location: Vec2) {
        if self.player.frame().contains(location) {
            self.drag_anchor = Some(self.player.center);
        }
    }

    /// Pan moved; `translation` is cumulative since the pan began
    pub fn moved(&mut self, translation: Vec2) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if let Some(anchor) = self.drag_anchor {
            self.player.center = anchor + translation;
        }
    }

    pub fn move_ended(&mut self) {
        self.drag_anchor = None;
    }

    pub fn handle_tap(&mut self, _location: Vec2) {
        match self.phase {
            GamePhase::Idle => {
                self.phase = GamePhase::Playing;
                self.events.push(GameEvent::Started);
                log::info!("Game started");
            }
            GamePhase::GameOver => self.reset(),
            GamePhase::Playing => {}
        }
    }

    /// Route a recognized gesture to its handler
    pub fn apply(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Tap(location) => self.handle_tap(location),
            Gesture::PanBegan(location) => self.move_started(location),
            Gesture::PanChanged(translation) => self.moved(translation),
            Gesture::PanEnded => self.move_ended(),
        }
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn cars_overtaken(&self) -> u32 {
        self.cars_overtaken
    }

    pub fn road(&self) -> &Road {
        &self.road
    }

    pub fn player(&self) -> &Car {
        &self.player
    }

    pub fn enemy(&self) -> &Car {
        &self.enemy
    }

    pub fn drag_anchor(&self) -> Option<Vec2> {
        self.drag_anchor
    }

    /// Whether the player's car has finished driving onto the screen
    pub fn intro_finished(&self) -> bool {
        self.intro.is_finished()
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn textures(&self) -> &T {
        &self.textures
    }

    fn place_cars(&mut self) {
        let (w, h) = (self.screen_size.x, self.screen_size.y);

        self.player.center = Vec2::new(
            w - w * RIGHT_LANE,
            h - self.player.size().y * PLAYER_SPAWN_HEIGHT,
        );
        self.enemy.center = Vec2::new(
            w - w * LEFT_LANE,
            -self.enemy.size().y - self.tuning.initial_speed,
        );
    }

    fn draw_idle(&mut self, ctx: &mut dyn RenderContext) {
        self.road.draw(ctx, self.assets.road);
        self.draw_centered(ctx, self.assets.tap_to_start);
    }

    fn draw_playing(&mut self, ctx: &mut dyn RenderContext) {
        self.update_speed(ctx.time());

        self.road.draw(ctx, self.assets.road);
        self.player.draw(ctx, &self.assets);

        if !self.intro.is_finished() {
            let mut scene = IntroScene {
                road: &mut self.road,
                player: &mut self.player,
                assets: &self.assets,
            };
            self.intro.animate(&mut scene, ctx);
        }
        self.drive_enemy(ctx);

        self.check_crash();
        self.draw_score(ctx);
    }

    fn draw_game_over(&mut self, ctx: &mut dyn RenderContext) {
        self.player.center.y += self.road.speed;
        self.enemy.center.y += self.road.speed;

        self.road.draw(ctx, self.assets.road);
        self.player.draw(ctx, &self.assets);
        self.enemy.draw(ctx, &self.assets);

        self.draw_centered(ctx, self.assets.game_over);
    }

    /// The first playing frame only records the start time
    fn update_speed(&mut self, now: f64) {
        match self.game_start_time {
            None => self.game_start_time = Some(now),
            Some(start) => self.road.speed = self.tuning.speed_at(now - start),
        }
    }

    /// Move the oncoming car, and send it round again once it has left the
    /// bottom of the screen. Waits for the intro to finish.
    fn drive_enemy(&mut self, ctx: &mut dyn RenderContext) {
        if !self.intro.is_finished() {
            return;
        }

        let frame = self.enemy.frame();
        let speed = self.road.speed;

        self.enemy.center.y += speed * self.tuning.enemy_speed_factor;
        self.enemy.draw(ctx, &self.assets);

        if frame.min_y() < self.screen_size.y + speed {
            return;
        }

        let lane = if self.rng.random_bool(0.5) {
            LEFT_LANE
        } else {
            RIGHT_LANE
        };
        let w = self.screen_size.x;
        self.enemy.center = Vec2::new(w - w * lane, -frame.height() - speed);
        self.cars_overtaken += 1;

        self.events.push(GameEvent::Overtaken {
            total: self.cars_overtaken,
        });
        log::debug!(
            "Enemy respawned at x={} ({} overtaken)",
            self.enemy.center.x,
            self.cars_overtaken
        );
    }

    fn check_crash(&mut self) {
        if !self.player.frame().intersects(&self.enemy.frame()) {
            return;
        }
        self.player.is_crashed = true;
        self.enemy.is_crashed = true;
        self.phase = GamePhase::GameOver;

        self.events.push(GameEvent::Crashed {
            cars_overtaken: self.cars_overtaken,
        });
        log::info!("Crashed after overtaking {} cars", self.cars_overtaken);
    }

    fn draw_score(&mut self, ctx: &mut dyn RenderContext) {
        let Some(texture) = self.score_texture() else {
            return;
        };
        let frame = Rect::new(
            SCORE_INSET_X,
            self.screen_size.y - SCORE_INSET_BOTTOM,
            texture.width as f32,
            texture.height as f32,
        );
        ctx.draw_image(Image::new(frame, texture));
    }

    /// Score label for the current count, rasterized only when the count changes.
    /// A failed count is remembered and not retried until the count moves on.
    fn score_texture(&mut self) -> Option<Texture> {
        if let Some((count, texture)) = self.score_label {
            if count == self.cars_overtaken {
                return texture;
            }
        }

        let label = TextLabel::new(
            format!("Cars overtaken: {}", self.cars_overtaken),
            SCORE_FONT_SIZE,
            ORANGE,
        );
        let texture = match self.textures.text(&label) {
            Ok(texture) => Some(texture),
            Err(e) => {
                log::warn!("Skipping score overlay for {}: {e}", self.cars_overtaken);
                None
            }
        };
        if let Some((_, Some(old))) = self.score_label.replace((self.cars_overtaken, texture)) {
            self.textures.release(old);
        }
        texture
    }

    fn draw_centered(&self, ctx: &mut dyn RenderContext, texture: Texture) {
        // Whole-pixel halves keep text crisp
        let half = Vec2::new((texture.width / 2) as f32, (texture.height / 2) as f32);
        let origin = self.screen_size / 2.0 - half;
        let frame = Rect::new(
            origin.x,
            origin.y,
            texture.width as f32,
            texture.height as f32,
        );
        ctx.draw_image(Image::new(frame, texture));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AssetError, ConfigError};
    use crate::renderer::{FrameRecorder, HeadlessTextures};

    const SCREEN: Vec2 = Vec2::new(400.0, 800.0);

    fn tuning() -> Tuning {
        Tuning {
            seed: Some(7),
            ..Default::default()
        }
    }

    fn game_with(tuning: Tuning) -> Game<HeadlessTextures> {
        Game::new(SCREEN, tuning, HeadlessTextures::new()).unwrap()
    }

    fn frame_at(game: &mut Game<HeadlessTextures>, time: f64) -> FrameRecorder {
        let mut frame = FrameRecorder::new(time);
        game.draw(&mut frame);
        frame
    }

    /// Start a game whose intro is already over and whose road runs at the
    /// initial speed
    fn running_game() -> Game<HeadlessTextures> {
        let mut game = game_with(Tuning {
            intro_duration_ms: 0.0,
            ..tuning()
        });
        game.handle_tap(Vec2::ZERO);
        frame_at(&mut game, 0.0);
        frame_at(&mut game, 0.0);
        assert!(game.intro_finished());
        assert_eq!(game.road().speed, 10.0);
        game
    }

    #[test]
    fn test_spawn_positions() {
        let game = game_with(tuning());
        assert_eq!(game.player().center, Vec2::new(300.0, 625.0));
        assert_eq!(game.enemy().center, Vec2::new(100.0, -210.0));
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.road().speed, 0.0);
    }

    #[test]
    fn test_idle_draws_road_and_prompt() {
        let mut game = game_with(tuning());
        let frame = frame_at(&mut game, 0.0);
        let assets = *game.assets();

        assert_eq!(frame.images().len(), 12);
        assert_eq!(frame.images_with(assets.road.id).count(), 11);

        let prompt = frame.images()[11];
        assert_eq!(prompt.texture, assets.tap_to_start);
        // 202x34 label, halves rounded down
        assert_eq!(prompt.frame, Rect::new(99.0, 383.0, 202.0, 34.0));
    }

    #[test]
    fn test_tap_transitions() {
        let mut game = game_with(tuning());

        game.handle_tap(Vec2::ZERO);
        assert_eq!(game.phase(), GamePhase::Playing);

        game.handle_tap(Vec2::ZERO);
        assert_eq!(game.phase(), GamePhase::Playing);

        game.phase = GamePhase::GameOver;
        game.handle_tap(Vec2::ZERO);
        assert_eq!(game.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_first_playing_frame_keeps_speed() {
        let mut game = game_with(Tuning {
            intro_duration_ms: 0.0,
            ..tuning()
        });
        game.handle_tap(Vec2::ZERO);
        frame_at(&mut game, 5000.0);
        assert_eq!(game.game_start_time, Some(5000.0));
        assert_eq!(game.road().speed, 0.0);
    }

    #[test]
    fn test_speed_ramp() {
        let mut game = game_with(tuning());
        game.handle_tap(Vec2::ZERO);

        frame_at(&mut game, 1000.0);
        frame_at(&mut game, 31_000.0);
        assert!(game.intro_finished());
        assert_eq!(game.road().speed, 15.0);
    }

    #[test]
    fn test_intro_drives_player_in() {
        let mut game = game_with(tuning());
        game.handle_tap(Vec2::ZERO);

        frame_at(&mut game, 0.0);
        assert_eq!(game.road().speed, 0.0);
        assert_eq!(game.player().center.y, 1250.0);

        let frame = frame_at(&mut game, 375.0);
        assert_eq!(game.road().speed, 5.0);
        assert_eq!(game.player().center.y, 941.25);

        // Road and player drawn twice, no enemy, then the score
        let assets = *game.assets();
        assert_eq!(frame.images_with(assets.road.id).count(), 22);
        assert_eq!(frame.images_with(assets.player.id).count(), 2);
        assert_eq!(frame.images_with(assets.enemy.id).count(), 0);
        assert_eq!(frame.images().len(), 25);
    }

    #[test]
    fn test_enemy_waits_for_intro() {
        let mut game = game_with(tuning());
        game.handle_tap(Vec2::ZERO);
        frame_at(&mut game, 0.0);
        frame_at(&mut game, 700.0);
        assert!(!game.intro_finished());
        assert_eq!(game.enemy().center.y, -210.0);

        let frame = frame_at(&mut game, 750.0);
        assert!(game.intro_finished());
        assert_eq!(frame.images_with(game.assets().enemy.id).count(), 1);
        assert!(game.enemy().center.y > -210.0);
    }

    #[test]
    fn test_enemy_respawn() {
        let mut game = running_game();
        game.enemy.center.y = 950.0;

        frame_at(&mut game, 0.0);
        assert_eq!(game.cars_overtaken(), 1);
        assert_eq!(game.enemy().center.y, -210.0);
        let x = game.enemy().center.x;
        assert!(x == 100.0 || x == 300.0, "unexpected lane {x}");
        assert!(game.drain_events().contains(&GameEvent::Overtaken { total: 1 }));
    }

    #[test]
    fn test_enemy_on_screen_keeps_going() {
        let mut game = running_game();
        // Top edge just above the respawn threshold before the move
        game.enemy.center.y = 800.0 + 10.0 + 100.0 - 0.5;

        frame_at(&mut game, 0.0);
        assert_eq!(game.cars_overtaken(), 0);
        assert_eq!(game.enemy().center.y, 909.5 + 15.0);
    }

    #[test]
    fn test_forced_overlap_ends_game() {
        let mut game = running_game();
        game.enemy.center = game.player.center;

        frame_at(&mut game, 0.0);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert!(game.player().is_crashed);
        assert!(game.enemy().is_crashed);

        let frame = frame_at(&mut game, 16.0);
        let assets = *game.assets();
        assert_eq!(frame.images_with(assets.flame.id).count(), 2);
        assert_eq!(frame.images().last().map(|i| i.texture), Some(assets.game_over));
    }

    #[test]
    fn test_touching_edges_collide() {
        let mut game = game_with(tuning());
        // Player spans y 500..750; enemy spans 300..500
        game.enemy.center = Vec2::new(300.0, 400.0);
        game.check_crash();
        assert_eq!(game.phase(), GamePhase::GameOver);

        let mut game = game_with(tuning());
        game.enemy.center = Vec2::new(300.0, 399.0);
        game.check_crash();
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(!game.player().is_crashed);
    }

    #[test]
    fn test_game_over_rolls_cars_off() {
        let mut game = running_game();
        game.enemy.center = game.player.center;
        frame_at(&mut game, 0.0);

        let player_y = game.player().center.y;
        let enemy_y = game.enemy().center.y;
        frame_at(&mut game, 16.0);
        frame_at(&mut game, 32.0);

        assert_eq!(game.player().center.y, player_y + 20.0);
        assert_eq!(game.enemy().center.y, enemy_y + 20.0);
        assert_eq!(game.cars_overtaken(), 0);
        assert_eq!(game.road().speed, 10.0);
    }

    #[test]
    fn test_pan_is_anchored() {
        let mut game = game_with(tuning());
        game.handle_tap(Vec2::ZERO);

        game.move_started(Vec2::new(300.0, 625.0));
        assert_eq!(game.drag_anchor(), Some(Vec2::new(300.0, 625.0)));

        game.moved(Vec2::new(-200.0, 0.0));
        assert_eq!(game.player().center, Vec2::new(100.0, 625.0));

        // Relative to the anchor, not to the last position
        game.moved(Vec2::new(-150.0, 10.0));
        assert_eq!(game.player().center, Vec2::new(150.0, 635.0));

        game.move_ended();
        assert_eq!(game.drag_anchor(), None);
        game.moved(Vec2::new(50.0, 0.0));
        assert_eq!(game.player().center, Vec2::new(150.0, 635.0));
    }

    #[test]
    fn test_pan_outside_player_or_while_idle() {
        let mut game = game_with(tuning());

        game.move_started(Vec2::new(10.0, 10.0));
        assert_eq!(game.drag_anchor(), None);

        // Anchoring is allowed while idle, moving is not
        game.move_started(Vec2::new(300.0, 625.0));
        assert!(game.drag_anchor().is_some());
        game.moved(Vec2::new(-200.0, 0.0));
        assert_eq!(game.player().center, Vec2::new(300.0, 625.0));
    }

    #[test]
    fn test_gestures_dispatch() {
        let mut game = game_with(tuning());
        game.apply(Gesture::Tap(Vec2::ZERO));
        assert_eq!(game.phase(), GamePhase::Playing);

        game.apply(Gesture::PanBegan(Vec2::new(300.0, 625.0)));
        game.apply(Gesture::PanChanged(Vec2::new(-200.0, 0.0)));
        assert_eq!(game.player().center.x, 100.0);
        game.apply(Gesture::PanEnded);
        assert_eq!(game.drag_anchor(), None);
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut game = running_game();
        game.enemy.center.y = 950.0;
        frame_at(&mut game, 0.0);
        game.move_started(game.player().center);
        game.enemy.center = game.player.center;
        frame_at(&mut game, 0.0);
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.handle_tap(Vec2::ZERO);
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.cars_overtaken(), 0);
        assert_eq!(game.road().speed, 0.0);
        assert_eq!(game.game_start_time, None);
        assert_eq!(game.drag_anchor(), None);
        assert!(!game.player().is_crashed);
        assert!(!game.enemy().is_crashed);
        assert_eq!(game.player().center, Vec2::new(300.0, 625.0));
        assert_eq!(game.enemy().center, Vec2::new(100.0, -210.0));
        assert!(!game.intro_finished());
        assert_eq!(game.intro.timeline.launch_time(), None);
    }

    #[test]
    fn test_score_label_cached_per_count() {
        let mut game = running_game();
        frame_at(&mut game, 0.0);
        let frame = frame_at(&mut game, 0.0);

        let score = *frame.images().last().unwrap();
        assert_eq!(score.frame.origin, Vec2::new(30.0, 760.0));
        let first = score.texture;

        game.enemy.center.y = 950.0;
        frame_at(&mut game, 0.0);

        let labels = game.textures().labels();
        let score_labels: Vec<&String> =
            labels.iter().filter(|l| l.starts_with("Cars overtaken")).collect();
        assert_eq!(score_labels, vec!["Cars overtaken: 0", "Cars overtaken: 1"]);
        assert_eq!(game.textures().released(), &[first.id]);
    }

    #[test]
    fn test_event_sequence() {
        let mut game = running_game();
        game.enemy.center.y = 950.0;
        frame_at(&mut game, 0.0);
        game.enemy.center = game.player.center;
        frame_at(&mut game, 0.0);
        game.handle_tap(Vec2::ZERO);

        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::Started,
                GameEvent::Overtaken { total: 1 },
                GameEvent::Crashed { cars_overtaken: 1 },
                GameEvent::Reset,
            ]
        );
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_same_seed_same_lanes() {
        let lanes = |seed| {
            let mut game = running_game();
            game.rng = Pcg32::seed_from_u64(seed);
            (0..8)
                .map(|_| {
                    game.enemy.center = Vec2::new(100.0, 950.0);
                    frame_at(&mut game, 0.0);
                    game.enemy().center.x
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(lanes(99), lanes(99));
    }

    #[test]
    fn test_rejects_empty_screen() {
        for screen in [Vec2::new(0.0, 800.0), Vec2::new(400.0, f32::NAN), Vec2::new(-1.0, 5.0)] {
            let result = Game::new(screen, tuning(), HeadlessTextures::new());
            assert!(
                matches!(result, Err(GameError::ScreenSize { .. })),
                "accepted {screen:?}"
            );
        }
    }

    #[test]
    fn test_rejects_invalid_tuning() {
        let bad = Tuning {
            speed_ramp_ms: 0.0,
            ..tuning()
        };
        let result = Game::new(SCREEN, bad, HeadlessTextures::new());
        assert!(matches!(
            result,
            Err(GameError::Config(ConfigError::Invalid { field: "speed_ramp_ms", .. }))
        ));
    }

    /// Fails every score label, counting the attempts
    struct NoScore {
        inner: HeadlessTextures,
        attempts: u32,
    }

    impl TextureProvider for NoScore {
        fn load(&mut self, name: &str) -> Result<Texture, AssetError> {
            self.inner.load(name)
        }

        fn text(&mut self, label: &TextLabel) -> Result<Texture, AssetError> {
            if label.text.starts_with("Cars overtaken") {
                self.attempts += 1;
                return Err(AssetError::Text {
                    text: label.text.clone(),
                    reason: "no font".to_string(),
                });
            }
            self.inner.text(label)
        }
    }

    #[test]
    fn test_score_failure_not_retried_each_frame() {
        let textures = NoScore {
            inner: HeadlessTextures::new(),
            attempts: 0,
        };
        let mut game = Game::new(
            SCREEN,
            Tuning {
                intro_duration_ms: 0.0,
                ..tuning()
            },
            textures,
        )
        .unwrap();
        game.handle_tap(Vec2::ZERO);

        let mut frame = FrameRecorder::new(0.0);
        for _ in 0..5 {
            frame.begin(0.0);
            game.draw(&mut frame);
        }
        assert_eq!(game.textures().attempts, 1);

        // A new count gets a fresh attempt
        game.enemy.center.y = 950.0;
        for _ in 0..2 {
            frame.begin(0.0);
            game.draw(&mut frame);
        }
        assert_eq!(game.cars_overtaken(), 1);
        assert_eq!(game.textures().attempts, 2);
    }

    struct NoFlame(HeadlessTextures);

    impl TextureProvider for NoFlame {
        fn load(&mut self, name: &str) -> Result<Texture, AssetError> {
            if name == "flame" {
                return Err(AssetError::Missing {
                    name: name.to_string(),
                });
            }
            self.0.load(name)
        }

        fn text(&mut self, label: &TextLabel) -> Result<Texture, AssetError> {
            self.0.text(label)
        }
    }

    #[test]
    fn test_missing_texture_is_fatal() {
        let result = Game::new(SCREEN, tuning(), NoFlame(HeadlessTextures::new()));
        assert!(matches!(
            result,
            Err(GameError::Asset(AssetError::Missing { name })) if name == "flame"
        ));
    }
}
