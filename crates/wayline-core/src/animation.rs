//! Marker animation playback over a route snapshot.
//!
//! [`AnimationController`] drives one interpolation timeline at a time.
//! It is scheduler-driven: an external frame driver calls
//! [`tick`](AnimationController::tick) repeatedly and, after
//! completion, [`try_reset`](AnimationController::try_reset) once the
//! grace period has passed. Time is injected through the [`Clock`]
//! trait so playback is testable without sleeping.
//!
//! Supersession is handled with generation tokens instead of ad hoc
//! flags: every `start` bumps a counter and hands out a [`RunToken`]
//! carrying it. Deferred callbacks present their token before acting
//! and are silently discarded on mismatch, so several timers can be
//! outstanding across restarts while at most one generation's effects
//! are ever observable.

use std::time::Duration;

use crate::types::{Coordinate, Route};

/// How long a completed run holds the marker at the final waypoint
/// before [`try_reset`](AnimationController::try_reset) may return it
/// to the start.
pub const RESET_GRACE: Duration = Duration::from_millis(750);

/// A monotonic time source.
///
/// The controller never reads a clock directly; drivers supply one
/// (e.g. backed by `std::time::Instant`) and tests supply a manual
/// clock they advance by hand.
pub trait Clock {
    /// An opaque instant captured by [`now`](Self::now).
    type Instant: Copy;

    /// The current instant.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`. Must be non-decreasing across
    /// calls for the same instant.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Proof of which run a deferred callback belongs to.
///
/// Obtained from [`AnimationController::start`]; presented back on
/// every tick and reset. A token whose generation no longer matches
/// the controller's is stale and every operation taking it becomes a
/// no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken {
    generation: u64,
}

/// Externally observable playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No run in flight; progress is 0.
    Idle,
    /// A run is advancing toward progress 1.
    Running,
    /// Progress reached 1; awaiting the grace-period reset.
    Completed,
}

/// Errors from starting a playback run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AnimationError {
    /// [`AnimationController::start`] requires at least one waypoint.
    #[error("cannot animate an empty route")]
    EmptyRoute,
}

/// One in-flight (or just-completed) playback run.
struct Run<I> {
    /// Immutable route snapshot captured at start.
    route: Route,
    duration: Duration,
    started: I,
    /// Monotonically non-decreasing within the run.
    progress: f64,
    /// Set when progress first reaches 1.
    completed_at: Option<I>,
}

/// Drives a single marker-animation timeline with start/cancel/reset
/// semantics that are safe against overlapping restarts.
pub struct AnimationController<C: Clock> {
    clock: C,
    generation: u64,
    run: Option<Run<C::Instant>>,
}

impl<C: Clock> AnimationController<C> {
    /// Create an idle controller on the given clock.
    #[must_use]
    pub const fn new(clock: C) -> Self {
        Self {
            clock,
            generation: 0,
            run: None,
        }
    }

    /// Begin a new run over a snapshot of `route`, superseding any
    /// previous run.
    ///
    /// Progress restarts at 0 and advances linearly to 1 over
    /// `duration` (linear easing: constant parameter speed, not
    /// constant physical speed, since waypoints are not
    /// arc-length-normalized). Tokens handed out by earlier starts are
    /// invalidated immediately.
    ///
    /// # Errors
    ///
    /// [`AnimationError::EmptyRoute`] if `route` has no points.
    pub fn start(&mut self, route: &Route, duration: Duration) -> Result<RunToken, AnimationError> {
        if route.is_empty() {
            return Err(AnimationError::EmptyRoute);
        }

        self.generation += 1;
        self.run = Some(Run {
            route: route.clone(),
            duration,
            started: self.clock.now(),
            progress: 0.0,
            completed_at: None,
        });
        Ok(RunToken {
            generation: self.generation,
        })
    }

    /// Advance the run `token` belongs to and return the marker
    /// position.
    ///
    /// Returns `None` when the token is stale or the controller is
    /// idle -- a discarded callback, not an error. A zero duration
    /// completes on the first tick.
    pub fn tick(&mut self, token: RunToken) -> Option<Coordinate> {
        if token.generation != self.generation {
            return None;
        }
        let run = self.run.as_mut()?;

        let raw = if run.duration.is_zero() {
            1.0
        } else {
            (self.clock.elapsed(&run.started).as_secs_f64() / run.duration.as_secs_f64()).min(1.0)
        };
        // Clamp to non-decreasing in case the clock misbehaves.
        run.progress = run.progress.max(raw);

        if run.progress >= 1.0 && run.completed_at.is_none() {
            run.completed_at = Some(self.clock.now());
        }

        position_along(&run.route, run.progress)
    }

    /// Post-completion reset: return the marker to the start once the
    /// grace period has passed.
    ///
    /// Returns `true` and transitions to idle (progress 0) only when
    /// `token` is current, the run has completed, and at least
    /// [`RESET_GRACE`] has elapsed since completion. Everything else
    /// is a no-op returning `false`, so a stale reset scheduled by a
    /// superseded run can never clobber the current one.
    pub fn try_reset(&mut self, token: RunToken) -> bool {
        if token.generation != self.generation {
            return false;
        }
        let Some(run) = self.run.as_ref() else {
            return false;
        };
        let Some(completed_at) = run.completed_at else {
            return false;
        };
        if self.clock.elapsed(&completed_at) < RESET_GRACE {
            return false;
        }

        self.run = None;
        true
    }

    /// Abandon any run immediately: the controller becomes idle with
    /// progress 0 and every outstanding token is invalidated at once.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.run = None;
    }

    /// Progress of the current run in `[0, 1]`, or 0 when idle.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.run.as_ref().map_or(0.0, |run| run.progress)
    }

    /// Current playback state.
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        match &self.run {
            None => PlaybackState::Idle,
            Some(run) => {
                if run.completed_at.is_some() {
                    PlaybackState::Completed
                } else {
                    PlaybackState::Running
                }
            }
        }
    }
}

/// Map `progress` in `[0, 1]` to a point along `route` by piecewise-
/// linear interpolation.
///
/// The N waypoints act as control points at parameter values
/// `0, 1/(N-1), ..., 1`; latitude and longitude are interpolated
/// independently between the two bracketing waypoints. Out-of-range
/// progress is clamped. A single-point route returns that point for
/// every progress value; only an empty route returns `None`.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn position_along(route: &Route, progress: f64) -> Option<Coordinate> {
    match route.points() {
        [] => None,
        [only] => Some(*only),
        points => {
            let scaled = progress.clamp(0.0, 1.0) * (points.len() - 1) as f64;
            let index = (scaled.floor() as usize).min(points.len() - 2);
            let t = scaled - index as f64;
            let a = points[index];
            let b = points[index + 1];
            Some(Coordinate::new(
                t.mul_add(b.latitude - a.latitude, a.latitude),
                t.mul_add(b.longitude - a.longitude, a.longitude),
            ))
        }
    }
}
