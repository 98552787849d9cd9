//! Game simulation
//!
//! All gameplay lives here and only talks to the outside world through
//! `RenderContext` and `TextureProvider`:
//! - One `Game::draw` per display refresh advances and draws a frame
//! - Seeded RNG only, so a seed replays the same traffic
//! - No platform dependencies

pub mod animation;
pub mod assets;
pub mod car;
pub mod game;
pub mod input;
pub mod road;

pub use animation::{Animation, Timed, Timeline};
pub use assets::Assets;
pub use car::{Car, CarKind};
pub use game::{Game, GameEvent, GamePhase, IntroAnimation, IntroScene};
pub use input::{Gesture, GestureTracker, TAP_SLOP};
pub use road::Road;
