use super::options::{MAX_WIDTH, MIN_WIDTH, SessionOptions};
use super::types::{FormStatus, Notice, SessionError};
use crate::catalog::{BackgroundSource, FormCatalog, FormRef};
use crate::draw::{Color, Surface, render_text};
use crate::export::Subject;
use crate::history::History;
use crate::input::{StrokeRenderer, Tool};
use crate::util::Point;
use chrono::NaiveDate;
use log::{debug, error, info, warn};

/// Background and annotation layer of the active form.
///
/// Both are sized to the background's natural resolution.
pub(super) struct FormLayers {
    pub(super) background: Surface,
    pub(super) surface: Surface,
}

/// One user's annotation session over a sequence of forms.
///
/// Owns the annotation surface, its history, the tool configuration, and
/// the single stroke renderer fed by both mouse and touch handlers.
pub struct AnnotationSession {
    pub(super) options: SessionOptions,
    source: Box<dyn BackgroundSource>,
    pub(super) subject: Subject,
    pub(super) tool: Tool,
    pub(super) color: Color,
    pub(super) width: f64,
    pub(super) form: Option<FormRef>,
    pub(super) status: FormStatus,
    pub(super) layers: Option<FormLayers>,
    pub(super) history: History,
    pub(super) renderer: StrokeRenderer,
    pub(super) pending_text: Option<Point>,
    pub(super) export_date: Option<NaiveDate>,
    notices: Vec<Notice>,
}

impl AnnotationSession {
    pub fn new(options: SessionOptions, subject: Subject, source: Box<dyn BackgroundSource>) -> Self {
        Self {
            tool: options.initial_tool,
            color: options.initial_color,
            width: options.initial_width,
            history: History::new(options.history_depth),
            renderer: StrokeRenderer::new(options.stroke),
            options,
            source,
            subject,
            form: None,
            status: FormStatus::NoForm,
            layers: None,
            pending_text: None,
            export_date: None,
            notices: Vec::new(),
        }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn set_subject(&mut self, subject: Subject) {
        self.subject = subject;
    }

    /// Fixes the date used in export filenames and footers (defaults to today).
    pub fn set_export_date(&mut self, date: Option<NaiveDate>) {
        self.export_date = date;
    }

    // ========================================================================
    // Form activation
    // ========================================================================

    /// Activates the catalog's first form, if any.
    pub fn activate_default(&mut self, catalog: &FormCatalog) -> Result<(), SessionError> {
        match catalog.default_form() {
            Some(form) => self.activate_form(form.clone()),
            None => {
                info!("Form catalog is empty; no form activated");
                Ok(())
            }
        }
    }

    /// Loads `form`'s background and starts a fresh surface and history.
    ///
    /// On load failure the previous form is dropped as well, the status
    /// becomes [`FormStatus::Failed`], and drawing stays inert.
    pub fn activate_form(&mut self, form: FormRef) -> Result<(), SessionError> {
        match self.source.load(&form) {
            Ok(background) => self.activate_with_background(form, background),
            Err(source) => {
                error!("Failed to load form '{}': {}", form.name, source);
                self.drop_form_state();
                self.status = FormStatus::Failed(source.to_string());
                let err = SessionError::Load {
                    name: form.name.clone(),
                    source,
                };
                self.form = Some(form);
                self.notices.push(Notice::error(err.notice_message()));
                Err(err)
            }
        }
    }

    /// Activates `form` with an already decoded background.
    pub fn activate_with_background(
        &mut self,
        form: FormRef,
        background: Surface,
    ) -> Result<(), SessionError> {
        let surface = Surface::new(background.width(), background.height())
            .map_err(|err| self.fail(err.into()))?;

        self.drop_form_state();
        if let Err(err) = self.history.reset(&surface) {
            return Err(self.fail(err.into()));
        }

        info!(
            "Activated form '{}' ({}x{})",
            form.name,
            surface.width(),
            surface.height()
        );
        self.layers = Some(FormLayers {
            background,
            surface,
        });
        self.form = Some(form);
        self.status = FormStatus::Ready;
        Ok(())
    }

    fn drop_form_state(&mut self) {
        self.renderer.cancel();
        self.pending_text = None;
        self.layers = None;
        self.history.clear();
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    /// The form most recently activated (loaded or failed).
    pub fn active_form(&self) -> Option<&FormRef> {
        self.form.as_ref()
    }

    /// Annotation layer of the active form.
    pub fn surface(&self) -> Option<&Surface> {
        self.layers.as_ref().map(|layers| &layers.surface)
    }

    pub fn background(&self) -> Option<&Surface> {
        self.layers.as_ref().map(|layers| &layers.background)
    }

    // ========================================================================
    // Tool configuration
    // ========================================================================

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Changes the tool used by the next gesture.
    ///
    /// Leaving the text tool discards any pending text anchor.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool != Tool::Text {
            self.pending_text = None;
        }
        if self.renderer.is_active() {
            debug!("Tool changed to {} mid-gesture; applies to the next gesture", tool);
        }
        self.tool = tool;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Sets the base width, clamped to 1-50 px. Non-finite values are ignored.
    pub fn set_width(&mut self, width: f64) {
        if !width.is_finite() {
            warn!("Ignoring non-finite width {}", width);
            return;
        }
        self.width = width.clamp(MIN_WIDTH, MAX_WIDTH);
    }

    // ========================================================================
    // History
    // ========================================================================

    pub fn can_undo(&self) -> bool {
        self.layers.is_some() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.layers.is_some() && self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_cursor(&self) -> usize {
        self.history.cursor()
    }

    /// Steps back one history entry.
    ///
    /// # Returns
    /// `false` if there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool, SessionError> {
        self.require_form()?;
        self.abandon_gesture();
        let Some(layers) = self.layers.as_mut() else {
            return Err(SessionError::NoActiveForm);
        };

        match self.history.undo(&mut layers.surface) {
            Ok(true) => {
                self.notices.push(Notice::info("Undone"));
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Steps forward one history entry.
    ///
    /// # Returns
    /// `false` if there was nothing to redo.
    pub fn redo(&mut self) -> Result<bool, SessionError> {
        self.require_form()?;
        self.abandon_gesture();
        let Some(layers) = self.layers.as_mut() else {
            return Err(SessionError::NoActiveForm);
        };

        match self.history.redo(&mut layers.surface) {
            Ok(true) => {
                self.notices.push(Notice::info("Redone"));
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Erases the annotation layer and records that as a history entry.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.require_form()?;
        self.abandon_gesture();
        let Some(layers) = self.layers.as_mut() else {
            return Err(SessionError::NoActiveForm);
        };

        let result = layers
            .surface
            .clear()
            .and_then(|()| self.history.capture(&layers.surface));
        if let Err(err) = result {
            return Err(self.fail(err.into()));
        }

        self.notices.push(Notice::info("Canvas cleared"));
        Ok(())
    }

    /// Drops an in-progress gesture and repaints the last committed entry
    /// over its partial ink.
    fn abandon_gesture(&mut self) {
        if !self.renderer.is_active() {
            return;
        }
        self.renderer.cancel();
        if let (Some(layers), Some(current)) = (self.layers.as_mut(), self.history.current())
            && let Err(err) = layers.surface.restore(current)
        {
            error!("Failed to discard partial gesture: {}", err);
        }
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Where submitted text will be placed, if the text tool picked a spot.
    pub fn pending_text_anchor(&self) -> Option<Point> {
        self.pending_text
    }

    /// Rasterizes `text` at the pending anchor and records a history entry.
    ///
    /// Empty or whitespace-only text changes nothing and keeps the anchor.
    pub fn submit_text(&mut self, text: &str) -> Result<(), SessionError> {
        self.require_form()?;
        let Some(anchor) = self.pending_text else {
            return Err(self.fail(SessionError::NoTextAnchor));
        };
        if text.trim().is_empty() {
            return Err(self.fail(SessionError::EmptyText));
        }
        let Some(layers) = self.layers.as_mut() else {
            return Err(SessionError::NoActiveForm);
        };

        let pixel_size = self.options.text_pixel_size(self.width);
        let drawn = layers
            .surface
            .context()
            .and_then(|ctx| {
                render_text(&ctx, anchor, text, self.color, pixel_size, &self.options.font)
                    .map_err(Into::into)
            })
            .and_then(|_| self.history.capture(&layers.surface));
        if let Err(err) = drawn {
            return Err(self.fail(err.into()));
        }

        debug!(
            "Placed {} chars of text at ({:.1}, {:.1}), {:.0}px",
            text.len(),
            anchor.x,
            anchor.y,
            pixel_size
        );
        self.pending_text = None;
        self.notices.push(Notice::success("Text added to form"));
        Ok(())
    }

    /// Closes the text entry without drawing.
    pub fn cancel_text(&mut self) {
        self.pending_text = None;
    }

    // ========================================================================
    // Notices and preconditions
    // ========================================================================

    /// Drains queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(super) fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Queues the error's notice and hands the error back.
    pub(super) fn fail(&mut self, err: SessionError) -> SessionError {
        warn!("{}", err);
        self.notices.push(Notice::error(err.notice_message()));
        err
    }

    /// Checks that a form is ready for drawing or export.
    pub(super) fn require_form(&mut self) -> Result<(), SessionError> {
        if self.status == FormStatus::Ready && self.layers.is_some() {
            return Ok(());
        }

        let err = match (&self.status, &self.form) {
            (FormStatus::Failed(_), Some(form)) => SessionError::FormUnavailable(form.name.clone()),
            _ => SessionError::NoActiveForm,
        };
        Err(self.fail(err))
    }
}

impl std::fmt::Debug for AnnotationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationSession")
            .field("form", &self.form)
            .field("status", &self.status)
            .field("tool", &self.tool)
            .field("width", &self.width)
            .field("history_len", &self.history.len())
            .finish()
    }
}
