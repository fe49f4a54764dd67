//! Recorded interaction scripts.
//!
//! A script is a JSON document holding the subject, an optional display
//! rectangle, and an ordered list of steps (tool changes, pointer and touch
//! events with millisecond timestamps, text, history commands, exports).
//! Replaying it through an [`AnnotationSession`] reproduces a whole
//! annotation session without a UI.
//!
//! ```json
//! {
//!   "subject": { "name": "Jane Doe", "identifier": "MR-0042" },
//!   "steps": [
//!     { "action": "width", "width": 4 },
//!     { "action": "pointer_down", "x": 50, "y": 50, "t": 0 },
//!     { "action": "pointer_up", "x": 50, "y": 50, "t": 80 },
//!     { "action": "export_image" }
//!   ]
//! }
//! ```

use crate::catalog::FormCatalog;
use crate::config::ColorSpec;
use crate::export::{ExportArtifact, Message, Subject};
use crate::input::{DisplayRect, MouseButton, PointerEvent, TouchEvent, TouchPoint, Tool};
use crate::session::{AnnotationSession, Notice, SessionError};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// A recorded session.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub subject: Subject,
    /// Form to start on; the catalog default when absent
    #[serde(default)]
    pub form: Option<String>,
    /// On-screen rectangle of the surface; 1:1 with the surface when absent
    #[serde(default)]
    pub display: Option<DisplayRect>,
    /// Export date (`YYYY-MM-DD`); today when absent
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub steps: Vec<Step>,
}

/// One recorded action.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Activate {
        form: String,
    },
    Tool {
        tool: Tool,
    },
    Color {
        color: ColorSpec,
    },
    Width {
        width: f64,
    },
    PointerDown {
        x: f64,
        y: f64,
        t: u64,
        #[serde(default)]
        button: MouseButton,
    },
    PointerMove {
        x: f64,
        y: f64,
        t: u64,
    },
    PointerUp {
        x: f64,
        y: f64,
        t: u64,
        #[serde(default)]
        button: MouseButton,
    },
    PointerLeave {
        t: u64,
    },
    TouchStart {
        touches: Vec<TouchPoint>,
        t: u64,
    },
    TouchMove {
        touches: Vec<TouchPoint>,
        t: u64,
    },
    TouchEnd {
        #[serde(default)]
        touches: Vec<TouchPoint>,
        t: u64,
    },
    Text {
        text: String,
    },
    CancelText,
    Undo,
    Redo,
    Clear,
    ExportImage,
    ExportDocument,
    Print,
    Message {
        #[serde(default)]
        template: Option<String>,
    },
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid replay script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Everything a replay produced.
#[derive(Debug, Default)]
pub struct ReplayOutcome {
    pub artifacts: Vec<ExportArtifact>,
    pub messages: Vec<Message>,
    pub notices: Vec<Notice>,
    /// Steps that failed (each also left an error notice)
    pub failed_steps: usize,
}

/// Feeds `script` through `session`.
///
/// Failed steps are counted and replay continues, matching how the engine
/// treats every failure as non-fatal.
pub fn replay(
    script: &Script,
    session: &mut AnnotationSession,
    catalog: &FormCatalog,
) -> ReplayOutcome {
    let mut outcome = ReplayOutcome::default();
    session.set_subject(script.subject.clone());
    session.set_export_date(script.date);

    let initial = match &script.form {
        Some(name) => activate_named(session, catalog, name),
        None => session.activate_default(catalog),
    };
    if initial.is_err() {
        outcome.failed_steps += 1;
    }

    for (index, step) in script.steps.iter().enumerate() {
        log::debug!("Replaying step {}: {:?}", index, step);
        if let Err(err) = apply(step, script.display, session, catalog, &mut outcome) {
            log::warn!("Step {} failed: {}", index, err);
            outcome.failed_steps += 1;
        }
        outcome.notices.extend(session.take_notices());
    }
    outcome.notices.extend(session.take_notices());
    outcome
}

fn apply(
    step: &Step,
    display: Option<DisplayRect>,
    session: &mut AnnotationSession,
    catalog: &FormCatalog,
    outcome: &mut ReplayOutcome,
) -> Result<(), SessionError> {
    let rect = display.unwrap_or_else(|| {
        session
            .surface()
            .map(|surface| DisplayRect::identity(surface.width(), surface.height()))
            .unwrap_or(DisplayRect::new(0.0, 0.0, 1.0, 1.0))
    });
    let at = |t: u64| Duration::from_millis(t);

    match step {
        Step::Activate { form } => activate_named(session, catalog, form)?,
        Step::Tool { tool } => session.set_tool(*tool),
        Step::Color { color } => session.set_color(color.to_color()),
        Step::Width { width } => session.set_width(*width),
        Step::PointerDown { x, y, t, button } => {
            let mut event = PointerEvent::new(*x, *y, rect, at(*t));
            event.button = *button;
            session.on_pointer_down(&event);
        }
        Step::PointerMove { x, y, t } => {
            session.on_pointer_move(&PointerEvent::new(*x, *y, rect, at(*t)));
        }
        Step::PointerUp { x, y, t, button } => {
            let mut event = PointerEvent::new(*x, *y, rect, at(*t));
            event.button = *button;
            session.on_pointer_up(&event);
        }
        Step::PointerLeave { t } => session.on_pointer_leave(at(*t)),
        Step::TouchStart { touches, t } => {
            let action = session.on_touch_start(&touch(touches, rect, at(*t)));
            log::trace!("touch_start at {}ms: {:?}", t, action);
        }
        Step::TouchMove { touches, t } => {
            let action = session.on_touch_move(&touch(touches, rect, at(*t)));
            log::trace!("touch_move at {}ms: {:?}", t, action);
        }
        Step::TouchEnd { touches, t } => {
            let action = session.on_touch_end(&touch(touches, rect, at(*t)));
            log::trace!("touch_end at {}ms: {:?}", t, action);
        }
        Step::Text { text } => session.submit_text(text)?,
        Step::CancelText => session.cancel_text(),
        Step::Undo => {
            session.undo()?;
        }
        Step::Redo => {
            session.redo()?;
        }
        Step::Clear => session.clear()?,
        Step::ExportImage => outcome.artifacts.push(session.export_as_image()?),
        Step::ExportDocument => outcome.artifacts.push(session.export_as_document()?),
        Step::Print => outcome.artifacts.push(session.print()?),
        Step::Message { template } => {
            let message = match template {
                Some(template) => session.compose_message(template)?,
                None => session.compose_default_message()?,
            };
            outcome.messages.push(message);
        }
    }
    Ok(())
}

fn touch(touches: &[TouchPoint], rect: DisplayRect, timestamp: Duration) -> TouchEvent {
    TouchEvent {
        touches: touches.to_vec(),
        rect,
        timestamp,
    }
}

fn activate_named(
    session: &mut AnnotationSession,
    catalog: &FormCatalog,
    name: &str,
) -> Result<(), SessionError> {
    match catalog.find(name) {
        Some(form) => session.activate_form(form.clone()),
        None => {
            log::warn!("Form '{}' is not in the catalog", name);
            Err(SessionError::FormUnavailable(name.to_string()))
        }
    }
}
