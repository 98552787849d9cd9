//! Pointer gesture recognition
//!
//! Raw pointer events become taps or pans. A press that never travels
//! further than [`TAP_SLOP`] is a tap; anything else is a pan whose
//! translation is always measured from the press position.

use glam::Vec2;

/// Distance a pointer may wander before a press stops being a tap (points)
pub const TAP_SLOP: f32 = 10.0;

/// A recognized gesture, in screen points
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Tap(Vec2),
    /// Pan started at this location
    PanBegan(Vec2),
    /// Cumulative translation since `PanBegan`
    PanChanged(Vec2),
    PanEnded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Press {
    Pending { start: Vec2 },
    Panning { start: Vec2 },
}

/// Tracks a single pointer from down to up
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    press: Option<Press>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a pointer is currently down
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    pub fn pointer_down(&mut self, location: Vec2) {
        self.press = Some(Press::Pending { start: location });
    }

    /// Pointer moved while down. Returns the pan gestures this movement produced.
    pub fn pointer_moved(&mut self, location: Vec2) -> Vec<Gesture> {
        match self.press {
            None => Vec::new(),
            Some(Press::Pending { start }) => {
                if location.distance(start) <= TAP_SLOP {
                    return Vec::new();
                }
                self.press = Some(Press::Panning { start });
                vec![Gesture::PanBegan(start), Gesture::PanChanged(location - start)]
            }
            Some(Press::Panning { start }) => vec![Gesture::PanChanged(location - start)],
        }
    }

    /// Pointer released. A press that never panned is a tap at its start.
    pub fn pointer_up(&mut self) -> Option<Gesture> {
        match self.press.take()? {
            Press::Pending { start } => Some(Gesture::Tap(start)),
            Press::Panning { .. } => Some(Gesture::PanEnded),
        }
    }

    /// Pointer lost (left the window, cancelled by the browser)
    pub fn pointer_cancel(&mut self) -> Option<Gesture> {
        match self.press.take()? {
            Press::Pending { .. } => None,
            Press::Panning { .. } => Some(Gesture::PanEnded),
        }
    }
}
