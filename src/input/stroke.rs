//! Stroke renderer: the per-gesture `idle -> active -> idle` state machine.

use crate::draw::{StrokeStyle, Surface, SurfaceError, render_dot, render_segment};
use crate::util::Point;
use std::time::Duration;

/// Timing and distance thresholds for stroke rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSettings {
    /// Samples arriving sooner than this after the last accepted one are dropped
    pub min_sample_interval: Duration,
    /// Movement (px) a sample must exceed before a segment is drawn
    pub min_movement: f64,
    /// Gestures shorter than this that barely move become a dot
    pub dot_window: Duration,
}

impl Default for StrokeSettings {
    fn default() -> Self {
        Self {
            min_sample_interval: Duration::from_millis(6),
            min_movement: 1.0,
            dot_window: Duration::from_millis(200),
        }
    }
}

/// Transient data for one pointer-down-to-pointer-up gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeState {
    /// Style resolved at gesture start; tool changes mid-stroke do not touch it
    pub style: StrokeStyle,
    /// Where the gesture started
    pub start: Point,
    /// Last accepted sample (control point of the next segment)
    pub last: Point,
    /// Where the next segment starts (gesture start, then each midpoint)
    pub anchor: Point,
    /// Timestamp of the pointer-down
    pub start_time: Duration,
    /// Timestamp of the last accepted sample
    pub last_sample_time: Duration,
}

/// Result of feeding one move sample to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// No gesture in progress
    Inactive,
    /// Arrived within the minimum sample interval and was dropped
    Throttled,
    /// Did not move far enough to draw
    BelowThreshold,
    /// A smoothed segment was painted
    Drawn,
}

/// What a completed gesture left on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Short tap: a filled circle at the start point
    Dot,
    /// Continuous smoothed path (possibly empty for long, motionless presses)
    Stroke,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StrokePhase {
    Idle,
    Active(StrokeState),
}

/// Draws smoothed freehand strokes and tap dots onto a surface.
///
/// Exactly one gesture can be active at a time; a second `begin` while
/// active is refused rather than merged.
#[derive(Debug)]
pub struct StrokeRenderer {
    settings: StrokeSettings,
    phase: StrokePhase,
}

impl StrokeRenderer {
    pub fn new(settings: StrokeSettings) -> Self {
        Self {
            settings,
            phase: StrokePhase::Idle,
        }
    }

    pub fn settings(&self) -> &StrokeSettings {
        &self.settings
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, StrokePhase::Active(_))
    }

    /// Current gesture data, if a gesture is in progress.
    pub fn state(&self) -> Option<&StrokeState> {
        match &self.phase {
            StrokePhase::Active(state) => Some(state),
            StrokePhase::Idle => None,
        }
    }

    /// `idle -> active`: records the gesture start.
    ///
    /// Returns `false` (and changes nothing) if a gesture is already active.
    pub fn begin(&mut self, style: StrokeStyle, at: Point, now: Duration) -> bool {
        if self.is_active() {
            return false;
        }

        self.phase = StrokePhase::Active(StrokeState {
            style,
            start: at,
            last: at,
            anchor: at,
            start_time: now,
            last_sample_time: now,
        });
        log::debug!(
            "Gesture started at ({:.1}, {:.1}) width {:.1}",
            at.x,
            at.y,
            style.width
        );
        true
    }

    /// `active -> active`: feeds one move sample.
    ///
    /// Draws the quadratic segment from the current anchor to the midpoint of
    /// the last sample and `at`, using the last sample as control point.
    pub fn sample(
        &mut self,
        surface: &mut Surface,
        at: Point,
        now: Duration,
    ) -> Result<SampleOutcome, SurfaceError> {
        let StrokePhase::Active(state) = &mut self.phase else {
            return Ok(SampleOutcome::Inactive);
        };

        if now.saturating_sub(state.last_sample_time) < self.settings.min_sample_interval {
            return Ok(SampleOutcome::Throttled);
        }

        if state.last.distance_to(at) <= self.settings.min_movement {
            return Ok(SampleOutcome::BelowThreshold);
        }

        let mid = state.last.midpoint(at);
        {
            let ctx = surface.context()?;
            render_segment(&ctx, &state.style, state.anchor, state.last, mid)?;
        }

        state.anchor = mid;
        state.last = at;
        state.last_sample_time = now;
        Ok(SampleOutcome::Drawn)
    }

    /// `active -> idle`: finishes the gesture.
    ///
    /// A gesture shorter than the dot window whose displacement stays under
    /// the movement threshold gets a filled dot of radius `base_width / 2` at
    /// its start point. The renderer is idle afterwards even if drawing fails.
    ///
    /// # Returns
    /// `None` if no gesture was active.
    pub fn end(
        &mut self,
        surface: &mut Surface,
        now: Duration,
    ) -> Result<Option<GestureKind>, SurfaceError> {
        let StrokePhase::Active(state) = std::mem::replace(&mut self.phase, StrokePhase::Idle)
        else {
            return Ok(None);
        };

        let elapsed = now.saturating_sub(state.start_time);
        let displacement = state.start.distance_to(state.last);

        if elapsed < self.settings.dot_window && displacement < self.settings.min_movement {
            let ctx = surface.context()?;
            render_dot(&ctx, &state.style, state.start, state.style.dot_radius())?;
            log::debug!("Gesture ended as dot after {:?}", elapsed);
            return Ok(Some(GestureKind::Dot));
        }

        log::debug!(
            "Gesture ended as stroke after {:?} ({:.1}px displacement)",
            elapsed,
            displacement
        );
        Ok(Some(GestureKind::Stroke))
    }

    /// Drops an in-progress gesture without drawing anything more.
    pub fn cancel(&mut self) {
        self.phase = StrokePhase::Idle;
    }
}
