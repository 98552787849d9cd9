//! Time-boxed animations
//!
//! A [`Timeline`] owns the timing (lazy launch, progress, finished flag);
//! an [`Animation`] only knows how to draw itself at a given progress.
//! [`Timed`] glues the two together.

use crate::renderer::RenderContext;

/// Something that renders a frame of itself for a progress in [0, 1]
///
/// `S` is whatever the animation mutates while playing.
pub trait Animation<S: ?Sized> {
    fn render(&mut self, scene: &mut S, ctx: &mut dyn RenderContext, progress: f32);
}

/// Launch time, progress and completion of a fixed-duration animation
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    duration_ms: f64,
    launch_time: Option<f64>,
    finished: bool,
}

impl Timeline {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            launch_time: None,
            finished: false,
        }
    }

    /// When the first `advance` happened, if it has
    pub fn launch_time(&self) -> Option<f64> {
        self.launch_time
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Move the timeline to `now`.
    ///
    /// The first call records `now` as the launch time. Returns the clamped
    /// progress while the animation is running; once the elapsed time
    /// reaches the duration the timeline finishes and returns `None` until
    /// it is reset.
    pub fn advance(&mut self, now: f64) -> Option<f32> {
        if self.finished {
            return None;
        }

        let launch = *self.launch_time.get_or_insert(now);
        let runtime = now - launch;

        if runtime < self.duration_ms {
            let progress = runtime / self.duration_ms;
            Some(progress.clamp(0.0, 1.0) as f32)
        } else {
            self.finished = true;
            None
        }
    }

    pub fn reset(&mut self) {
        self.launch_time = None;
        self.finished = false;
    }
}

/// An animation driven by its own timeline
#[derive(Debug, Clone)]
pub struct Timed<A> {
    pub timeline: Timeline,
    pub animation: A,
}

impl<A> Timed<A> {
    pub fn new(duration_ms: f64, animation: A) -> Self {
        Self {
            timeline: Timeline::new(duration_ms),
            animation,
        }
    }

    /// Render the frame for `ctx.time()`, unless the timeline has run out
    pub fn animate<S: ?Sized>(&mut self, scene: &mut S, ctx: &mut dyn RenderContext)
    where
        A: Animation<S>,
    {
        if let Some(progress) = self.timeline.advance(ctx.time()) {
            self.animation.render(scene, ctx, progress);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.timeline.is_finished()
    }

    pub fn reset(&mut self) {
        self.timeline.reset();
    }
}
