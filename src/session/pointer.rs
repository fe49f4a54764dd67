use super::core::AnnotationSession;
use super::types::{FormStatus, Notice, SessionError};
use crate::draw::{StrokeStyle, SurfaceError};
use crate::input::{
    DefaultAction, DisplayRect, MouseButton, PointerEvent, TouchEvent, map_to_surface,
};
use crate::util::Point;
use log::{debug, error};
use std::time::Duration;

impl AnnotationSession {
    /// Processes a mouse/pen button press.
    ///
    /// # Behavior
    /// - Left button with a drawing tool: starts a gesture
    /// - Left button with the text tool: picks the text anchor
    /// - Other buttons: ignored
    pub fn on_pointer_down(&mut self, event: &PointerEvent) {
        if event.button != MouseButton::Left {
            return;
        }
        if let Some(point) = self.surface_point(event.client_x, event.client_y, &event.rect, true) {
            self.begin_gesture(point, event.timestamp);
        }
    }

    /// Processes pointer motion while a button may be held.
    pub fn on_pointer_move(&mut self, event: &PointerEvent) {
        if !self.renderer.is_active() {
            return;
        }
        if let Some(point) = self.surface_point(event.client_x, event.client_y, &event.rect, false)
        {
            self.continue_gesture(point, event.timestamp);
        }
    }

    /// Processes a button release; ends the gesture and records history.
    pub fn on_pointer_up(&mut self, event: &PointerEvent) {
        if event.button != MouseButton::Left {
            return;
        }
        self.finish_gesture(event.timestamp);
    }

    /// Pointer left the surface: treated exactly like a release.
    pub fn on_pointer_leave(&mut self, timestamp: Duration) {
        self.finish_gesture(timestamp);
    }

    /// Processes a touch start.
    ///
    /// Events with more than one contact are ignored (palm rejection). The
    /// platform's scroll/zoom is suppressed whenever a form is shown, even
    /// one that failed to load; with no form selected it is left alone.
    pub fn on_touch_start(&mut self, event: &TouchEvent) -> DefaultAction {
        let action = self.touch_default_action();
        if event.is_multi_touch() {
            return action;
        }
        if let Some(touch) = event.touches.first()
            && let Some(point) = self.surface_point(touch.client_x, touch.client_y, &event.rect, true)
        {
            self.begin_gesture(point, event.timestamp);
        }
        action
    }

    pub fn on_touch_move(&mut self, event: &TouchEvent) -> DefaultAction {
        let action = self.touch_default_action();
        if event.is_multi_touch() || !self.renderer.is_active() {
            return action;
        }
        if let Some(touch) = event.touches.first()
            && let Some(point) =
                self.surface_point(touch.client_x, touch.client_y, &event.rect, false)
        {
            self.continue_gesture(point, event.timestamp);
        }
        action
    }

    /// Processes a touch end; the gesture finishes once no contact remains.
    pub fn on_touch_end(&mut self, event: &TouchEvent) -> DefaultAction {
        if event.touches.is_empty() {
            self.finish_gesture(event.timestamp);
        }
        self.touch_default_action()
    }

    /// True while a stroke gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        self.renderer.is_active()
    }

    fn touch_default_action(&self) -> DefaultAction {
        match self.status {
            FormStatus::NoForm => DefaultAction::Allow,
            FormStatus::Ready | FormStatus::Failed(_) => DefaultAction::Prevent,
        }
    }

    /// Maps a display position into the active surface.
    ///
    /// Returns `None` when there is no drawable form or the position cannot
    /// be mapped. With `announce`, a missing form raises a notice.
    fn surface_point(
        &mut self,
        client_x: f64,
        client_y: f64,
        rect: &DisplayRect,
        announce: bool,
    ) -> Option<Point> {
        let Some(layers) = self.layers.as_ref() else {
            if announce && self.status == FormStatus::NoForm {
                self.push_notice(Notice::error(SessionError::NoActiveForm.notice_message()));
            }
            return None;
        };
        map_to_surface(
            client_x,
            client_y,
            rect,
            layers.surface.width(),
            layers.surface.height(),
        )
    }

    fn begin_gesture(&mut self, point: Point, now: Duration) {
        if !self.tool.draws_strokes() {
            debug!("Text anchor at ({:.1}, {:.1})", point.x, point.y);
            self.pending_text = Some(point);
            return;
        }

        let style = StrokeStyle::resolve(self.tool, self.color, self.width);
        if !self.renderer.begin(style, point, now) {
            debug!("Ignoring gesture start while another gesture is active");
        }
    }

    fn continue_gesture(&mut self, point: Point, now: Duration) {
        let Some(layers) = self.layers.as_mut() else {
            return;
        };
        if let Err(err) = self.renderer.sample(&mut layers.surface, point, now) {
            self.report_draw_error(err);
        }
    }

    fn finish_gesture(&mut self, now: Duration) {
        let Some(layers) = self.layers.as_mut() else {
            self.renderer.cancel();
            return;
        };

        let ended = self.renderer.end(&mut layers.surface, now);
        if matches!(ended, Ok(None)) {
            return;
        }

        // Capture even if the final mark failed so history matches the surface.
        let captured = self.history.capture(&layers.surface);
        if let Err(err) = ended.and(captured) {
            self.report_draw_error(err);
        }
    }

    fn report_draw_error(&mut self, err: SurfaceError) {
        error!("Drawing failed: {}", err);
        self.push_notice(Notice::error(SessionError::Surface(err).notice_message()));
    }
}
