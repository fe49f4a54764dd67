use super::*;
use crate::catalog::{BackgroundSource, FormCatalog, FormRef, LoadError};
use crate::draw::Surface;
use crate::draw::color::{BLUE, RED};
use crate::export::{ExportKind, Subject};
use crate::input::{
    DefaultAction, DisplayRect, MouseButton, PointerEvent, TouchEvent, TouchPoint, Tool,
};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Serves opaque white backgrounds of fixed sizes, keyed by URL.
struct MemorySource {
    sizes: HashMap<String, (u32, u32)>,
}

impl BackgroundSource for MemorySource {
    fn load(&self, form: &FormRef) -> Result<Surface, LoadError> {
        let (width, height) = self
            .sizes
            .get(&form.url)
            .copied()
            .ok_or_else(|| LoadError::NotFound(PathBuf::from(&form.url)))?;
        let white = [255, 255, 255, 255].repeat((width * height) as usize);
        Ok(Surface::from_rgba(width, height, &white)?)
    }
}

fn form_a() -> FormRef {
    FormRef::new("A", "a.jpg")
}

fn form_b() -> FormRef {
    FormRef::new("B", "b.jpg")
}

fn session() -> AnnotationSession {
    let sizes = HashMap::from([
        ("a.jpg".to_string(), (100, 100)),
        ("b.jpg".to_string(), (80, 60)),
    ]);
    let mut session = AnnotationSession::new(
        SessionOptions::default(),
        Subject::new("Jane Doe", "MR-0042"),
        Box::new(MemorySource { sizes }),
    );
    session.set_export_date(NaiveDate::from_ymd_opt(2026, 3, 7));
    session
}

fn ready_session() -> AnnotationSession {
    let mut session = session();
    session.activate_form(form_a()).unwrap();
    session.set_color(RED);
    session.set_width(4.0);
    session
}

fn rect() -> DisplayRect {
    DisplayRect::identity(100, 100)
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn pointer(x: f64, y: f64, t: u64) -> PointerEvent {
    PointerEvent::new(x, y, rect(), ms(t))
}

/// Drags through `points`, 10 ms apart, then releases.
fn drag(session: &mut AnnotationSession, points: &[(f64, f64)], start: u64) {
    let (x0, y0) = points[0];
    session.on_pointer_down(&pointer(x0, y0, start));
    let mut t = start;
    for &(x, y) in &points[1..] {
        t += 10;
        session.on_pointer_move(&pointer(x, y, t));
    }
    let (xn, yn) = points[points.len() - 1];
    session.on_pointer_up(&pointer(xn, yn, t + 10));
}

fn tap(session: &mut AnnotationSession, x: f64, y: f64, start: u64) {
    session.on_pointer_down(&pointer(x, y, start));
    session.on_pointer_up(&pointer(x, y, start + 50));
}

fn is_blank(surface: &Surface) -> bool {
    surface.snapshot().unwrap().as_bytes().iter().all(|b| *b == 0)
}

fn messages(session: &mut AnnotationSession) -> Vec<String> {
    session
        .take_notices()
        .into_iter()
        .map(|notice| notice.message)
        .collect()
}

#[test]
fn activation_starts_blank_with_one_history_entry() {
    let session = ready_session();
    assert_eq!(session.status(), &FormStatus::Ready);
    assert_eq!(session.active_form(), Some(&form_a()));
    let surface = session.surface().unwrap();
    assert_eq!((surface.width(), surface.height()), (100, 100));
    assert!(is_blank(surface));
    assert_eq!(session.history_len(), 1);
    assert!(!session.can_undo());
}

#[test]
fn tap_draws_dot_and_undo_returns_to_blank() {
    let mut session = ready_session();
    session.on_pointer_down(&pointer(50.0, 50.0, 1_000));
    session.on_pointer_up(&pointer(50.0, 50.0, 1_080));

    let surface = session.surface().unwrap();
    let center = surface.pixel(50, 50).unwrap();
    assert!(center.r > 200 && center.a > 200);
    assert!(surface.pixel(51, 51).unwrap().a > 0);
    assert!(surface.pixel(53, 50).unwrap().is_transparent());
    assert!(surface.pixel(50, 47).unwrap().is_transparent());
    assert_eq!(session.history_len(), 2);

    assert!(session.undo().unwrap());
    assert!(is_blank(session.surface().unwrap()));
    assert_eq!(session.history_cursor(), 0);
    assert_eq!(messages(&mut session), ["Undone"]);
}

#[test]
fn drag_draws_continuous_stroke() {
    let mut session = ready_session();
    drag(
        &mut session,
        &[(10.0, 50.0), (30.0, 50.0), (50.0, 50.0), (70.0, 50.0), (90.0, 50.0)],
        0,
    );

    let surface = session.surface().unwrap();
    for x in [12, 30, 50, 70] {
        assert!(surface.pixel(x, 50).unwrap().a > 200, "gap at x={}", x);
    }
    assert!(surface.pixel(50, 60).unwrap().is_transparent());
    assert_eq!(session.history_len(), 2);
}

#[test]
fn undo_then_redo_restores_exact_pixels() {
    let mut session = ready_session();
    drag(&mut session, &[(10.0, 20.0), (40.0, 20.0), (80.0, 20.0)], 0);
    drag(&mut session, &[(10.0, 70.0), (40.0, 60.0), (80.0, 70.0)], 500);
    tap(&mut session, 90.0, 90.0, 1_000);

    let before = session.surface().unwrap().snapshot().unwrap();
    assert!(session.undo().unwrap());
    assert_ne!(session.surface().unwrap().snapshot().unwrap(), before);
    assert!(session.redo().unwrap());
    assert_eq!(session.surface().unwrap().snapshot().unwrap(), before);
}

#[test]
fn new_stroke_after_undo_discards_redo() {
    let mut session = ready_session();
    tap(&mut session, 20.0, 20.0, 0);
    tap(&mut session, 40.0, 40.0, 500);
    session.undo().unwrap();
    session.undo().unwrap();
    assert!(session.can_redo());

    tap(&mut session, 60.0, 60.0, 1_000);
    assert!(!session.can_redo());
    assert_eq!(session.history_len(), 2);

    let after = session.surface().unwrap().snapshot().unwrap();
    assert!(!session.redo().unwrap());
    assert_eq!(session.surface().unwrap().snapshot().unwrap(), after);
}

#[test]
fn eraser_clears_only_under_its_path() {
    let mut session = ready_session();
    session.set_width(20.0);
    drag(
        &mut session,
        &[(5.0, 50.0), (25.0, 50.0), (45.0, 50.0), (65.0, 50.0), (85.0, 50.0), (95.0, 50.0)],
        0,
    );
    assert!(session.surface().unwrap().pixel(50, 50).unwrap().a > 200);

    session.set_tool(Tool::Eraser);
    session.set_width(6.0);
    drag(
        &mut session,
        &[(50.0, 10.0), (50.0, 30.0), (50.0, 50.0), (50.0, 70.0), (50.0, 90.0)],
        1_000,
    );

    let surface = session.surface().unwrap();
    assert!(surface.pixel(50, 50).unwrap().is_transparent());
    assert!(surface.pixel(45, 45).unwrap().is_transparent());
    assert!(surface.pixel(20, 50).unwrap().a > 200);
    assert!(surface.pixel(75, 50).unwrap().a > 200);

    // The background is a separate layer: flattening shows the form through the gap.
    let flat = session.flatten().unwrap();
    let gap = flat.pixel(50, 50).unwrap();
    assert_eq!((gap.r, gap.g, gap.b, gap.a), (255, 255, 255, 255));
}

#[test]
fn eraser_tap_uses_base_width() {
    let mut session = ready_session();
    session.set_width(20.0);
    drag(
        &mut session,
        &[(5.0, 50.0), (25.0, 50.0), (45.0, 50.0), (65.0, 50.0), (85.0, 50.0), (95.0, 50.0)],
        0,
    );

    session.set_tool(Tool::Eraser);
    session.set_width(6.0);
    tap(&mut session, 50.0, 50.0, 1_000);

    let surface = session.surface().unwrap();
    assert!(surface.pixel(50, 50).unwrap().is_transparent());
    assert!(surface.pixel(54, 50).unwrap().a > 200);
    assert!(surface.pixel(57, 50).unwrap().a > 200);
    assert!(surface.pixel(50, 54).unwrap().a > 200);
    assert_eq!(session.history_len(), 3);
}

#[test]
fn highlighter_tap_uses_base_width() {
    let mut session = ready_session();
    session.set_tool(Tool::Highlighter);
    tap(&mut session, 50.0, 50.0, 0);

    let surface = session.surface().unwrap();
    let center = surface.pixel(50, 50).unwrap();
    assert!(center.a > 0 && center.a < 200);
    assert!(surface.pixel(53, 50).unwrap().is_transparent());
    assert!(surface.pixel(50, 47).unwrap().is_transparent());
    assert_eq!(session.history_len(), 2);
}

#[test]
fn switching_forms_resets_history() {
    let mut session = ready_session();
    tap(&mut session, 50.0, 50.0, 0);
    tap(&mut session, 20.0, 20.0, 500);
    assert_eq!(session.history_len(), 3);

    session.activate_form(form_b()).unwrap();
    assert_eq!(session.history_len(), 1);
    assert!(!session.can_undo());
    let surface = session.surface().unwrap();
    assert_eq!((surface.width(), surface.height()), (80, 60));
    assert!(is_blank(surface));
}

#[test]
fn flatten_does_not_change_what_undo_restores() {
    let mut session = ready_session();
    tap(&mut session, 30.0, 30.0, 0);
    let after_first = session.surface().unwrap().snapshot().unwrap();
    tap(&mut session, 60.0, 60.0, 500);

    for _ in 0..3 {
        session.flatten().unwrap();
    }
    session.export_as_image().unwrap();
    session.print().unwrap();

    assert_eq!(session.history_len(), 3);
    session.undo().unwrap();
    assert_eq!(session.surface().unwrap().snapshot().unwrap(), after_first);
}

#[test]
fn display_scaling_maps_into_surface_pixels() {
    let mut session = ready_session();
    let zoomed = DisplayRect::new(10.0, 20.0, 200.0, 200.0);
    session.on_pointer_down(&PointerEvent::new(110.0, 120.0, zoomed, ms(0)));
    session.on_pointer_up(&PointerEvent::new(110.0, 120.0, zoomed, ms(40)));

    let surface = session.surface().unwrap();
    assert!(surface.pixel(50, 50).unwrap().a > 200);
    assert!(surface.pixel(99, 99).unwrap().is_transparent());
}

#[test]
fn secondary_button_does_not_draw() {
    let mut session = ready_session();
    let mut event = pointer(50.0, 50.0, 0);
    event.button = MouseButton::Right;
    session.on_pointer_down(&event);
    assert!(!session.is_drawing());
    session.on_pointer_up(&event);
    assert_eq!(session.history_len(), 1);
}

#[test]
fn pointer_leave_ends_gesture() {
    let mut session = ready_session();
    session.on_pointer_down(&pointer(10.0, 10.0, 0));
    session.on_pointer_move(&pointer(60.0, 10.0, 20));
    session.on_pointer_leave(ms(30));
    assert!(!session.is_drawing());
    assert_eq!(session.history_len(), 2);

    // A late release after leaving changes nothing.
    session.on_pointer_up(&pointer(60.0, 10.0, 40));
    assert_eq!(session.history_len(), 2);
}

#[test]
fn tool_change_mid_stroke_applies_to_next_gesture() {
    let mut session = ready_session();
    session.on_pointer_down(&pointer(10.0, 50.0, 0));
    session.set_tool(Tool::Eraser);
    session.on_pointer_move(&pointer(50.0, 50.0, 10));
    session.on_pointer_move(&pointer(90.0, 50.0, 20));
    session.on_pointer_up(&pointer(90.0, 50.0, 30));
    assert!(session.surface().unwrap().pixel(30, 50).unwrap().a > 200);

    drag(&mut session, &[(30.0, 20.0), (30.0, 50.0), (30.0, 80.0)], 1_000);
    assert!(session.surface().unwrap().pixel(30, 50).unwrap().is_transparent());
}

#[test]
fn single_touch_tap_draws_dot() {
    let mut session = ready_session();
    let start = TouchEvent::single(50.0, 50.0, rect(), ms(0));
    assert_eq!(session.on_touch_start(&start), DefaultAction::Prevent);
    let end = TouchEvent {
        touches: Vec::new(),
        rect: rect(),
        timestamp: ms(60),
    };
    assert_eq!(session.on_touch_end(&end), DefaultAction::Prevent);

    assert!(session.surface().unwrap().pixel(50, 50).unwrap().a > 200);
    assert_eq!(session.history_len(), 2);
}

#[test]
fn multi_touch_is_ignored() {
    let mut session = ready_session();
    let palm = TouchEvent {
        touches: vec![
            TouchPoint {
                client_x: 20.0,
                client_y: 20.0,
            },
            TouchPoint {
                client_x: 60.0,
                client_y: 60.0,
            },
        ],
        rect: rect(),
        timestamp: ms(0),
    };
    assert_eq!(session.on_touch_start(&palm), DefaultAction::Prevent);
    assert!(!session.is_drawing());
    assert_eq!(session.on_touch_move(&palm), DefaultAction::Prevent);

    assert!(is_blank(session.surface().unwrap()));
    assert_eq!(session.history_len(), 1);
    assert!(session.take_notices().is_empty());
}

#[test]
fn touch_end_with_remaining_contact_keeps_gesture() {
    let mut session = ready_session();
    let start = session.on_touch_start(&TouchEvent::single(10.0, 10.0, rect(), ms(0)));
    let moved = session.on_touch_move(&TouchEvent::single(60.0, 10.0, rect(), ms(20)));
    let lifted = session.on_touch_end(&TouchEvent::single(60.0, 10.0, rect(), ms(30)));
    assert_eq!([start, moved, lifted], [DefaultAction::Prevent; 3]);
    assert!(session.is_drawing());

    let released = session.on_touch_end(&TouchEvent {
        touches: Vec::new(),
        rect: rect(),
        timestamp: ms(40),
    });
    assert_eq!(released, DefaultAction::Prevent);
    assert!(!session.is_drawing());
    assert_eq!(session.history_len(), 2);
}

#[test]
fn touch_scrolls_page_only_without_a_form() {
    let mut session = session();
    let start = TouchEvent::single(10.0, 10.0, rect(), ms(0));
    assert_eq!(session.on_touch_start(&start), DefaultAction::Allow);
    assert_eq!(session.on_touch_move(&start), DefaultAction::Allow);
    let end = TouchEvent {
        touches: Vec::new(),
        rect: rect(),
        timestamp: ms(20),
    };
    assert_eq!(session.on_touch_end(&end), DefaultAction::Allow);
    assert_eq!(messages(&mut session), ["Please select a form first"]);

    assert!(session.activate_form(FormRef::new("Missing", "missing.jpg")).is_err());
    session.take_notices();
    assert_eq!(session.on_touch_start(&start), DefaultAction::Prevent);
    assert!(session.take_notices().is_empty());

    session.activate_form(form_a()).unwrap();
    assert_eq!(session.on_touch_start(&start), DefaultAction::Prevent);
    assert_eq!(session.on_touch_end(&end), DefaultAction::Prevent);
}

#[test]
fn drawing_without_form_raises_notice_once_per_gesture() {
    let mut session = session();
    session.on_pointer_down(&pointer(10.0, 10.0, 0));
    session.on_pointer_move(&pointer(20.0, 10.0, 10));
    session.on_pointer_up(&pointer(20.0, 10.0, 20));
    assert_eq!(messages(&mut session), ["Please select a form first"]);

    assert!(matches!(session.undo(), Err(SessionError::NoActiveForm)));
    assert!(matches!(
        session.export_as_image(),
        Err(SessionError::NoActiveForm)
    ));
    assert_eq!(session.take_notices().len(), 2);
}

#[test]
fn load_failure_leaves_drawing_inert() {
    let mut session = ready_session();
    tap(&mut session, 50.0, 50.0, 0);

    let err = session
        .activate_form(FormRef::new("Missing", "missing.jpg"))
        .unwrap_err();
    assert!(matches!(err, SessionError::Load { .. }));
    assert!(matches!(session.status(), FormStatus::Failed(_)));
    assert!(session.surface().is_none());
    assert_eq!(session.history_len(), 0);
    assert_eq!(messages(&mut session), ["Failed to load form: Missing"]);

    session.on_pointer_down(&pointer(50.0, 50.0, 1_000));
    assert!(!session.is_drawing());
    assert!(session.take_notices().is_empty());

    assert!(matches!(
        session.undo(),
        Err(SessionError::FormUnavailable(name)) if name == "Missing"
    ));

    session.activate_form(form_b()).unwrap();
    assert_eq!(session.status(), &FormStatus::Ready);
}

#[test]
fn default_form_is_first_catalog_entry() {
    let mut started = session();
    started
        .activate_default(&FormCatalog::new(vec![form_b(), form_a()]))
        .unwrap();
    assert_eq!(started.active_form(), Some(&form_b()));

    let mut empty = session();
    empty.activate_default(&FormCatalog::default()).unwrap();
    assert_eq!(empty.status(), &FormStatus::NoForm);
}

#[test]
fn text_tool_places_anchor_instead_of_drawing() {
    let mut session = ready_session();
    session.set_tool(Tool::Text);
    tap(&mut session, 12.0, 30.0, 0);

    assert_eq!(
        session.pending_text_anchor(),
        Some(crate::util::Point::new(12.0, 30.0))
    );
    assert!(!session.is_drawing());
    assert!(is_blank(session.surface().unwrap()));
    assert_eq!(session.history_len(), 1);
}

#[test]
fn empty_text_is_a_noop() {
    let mut session = ready_session();
    session.set_tool(Tool::Text);
    tap(&mut session, 12.0, 30.0, 0);

    assert!(matches!(
        session.submit_text("   \n"),
        Err(SessionError::EmptyText)
    ));
    assert_eq!(session.history_len(), 1);
    assert!(session.pending_text_anchor().is_some());
    assert_eq!(messages(&mut session), ["Please enter some text"]);
}

#[test]
fn submitted_text_is_captured() {
    let mut session = ready_session();
    session.set_tool(Tool::Text);
    session.set_color(BLUE);
    tap(&mut session, 12.0, 30.0, 0);

    session.submit_text("BP 120/80").unwrap();
    assert_eq!(session.history_len(), 2);
    assert!(session.pending_text_anchor().is_none());
    assert_eq!(messages(&mut session), ["Text added to form"]);

    assert!(matches!(
        session.submit_text("again"),
        Err(SessionError::NoTextAnchor)
    ));
}

#[test]
fn leaving_text_tool_cancels_anchor() {
    let mut session = ready_session();
    session.set_tool(Tool::Text);
    tap(&mut session, 12.0, 30.0, 0);
    session.set_tool(Tool::Pen);
    assert!(session.pending_text_anchor().is_none());
}

#[test]
fn clear_is_undoable() {
    let mut session = ready_session();
    tap(&mut session, 50.0, 50.0, 0);
    let inked = session.surface().unwrap().snapshot().unwrap();

    session.clear().unwrap();
    assert!(is_blank(session.surface().unwrap()));
    assert_eq!(session.history_len(), 3);

    session.undo().unwrap();
    assert_eq!(session.surface().unwrap().snapshot().unwrap(), inked);
}

#[test]
fn undo_mid_gesture_discards_partial_ink() {
    let mut session = ready_session();
    tap(&mut session, 20.0, 20.0, 0);
    session.on_pointer_down(&pointer(10.0, 80.0, 1_000));
    session.on_pointer_move(&pointer(90.0, 80.0, 1_010));

    assert!(session.undo().unwrap());
    assert!(!session.is_drawing());
    assert!(is_blank(session.surface().unwrap()));
}

#[test]
fn width_is_clamped() {
    let mut session = ready_session();
    session.set_width(500.0);
    assert_eq!(session.width(), MAX_WIDTH);
    session.set_width(0.1);
    assert_eq!(session.width(), MIN_WIDTH);
    session.set_width(f64::NAN);
    assert_eq!(session.width(), MIN_WIDTH);
}

#[test]
fn exports_name_files_after_subject_form_and_date() {
    let mut session = ready_session();
    tap(&mut session, 50.0, 50.0, 0);

    let image = session.export_as_image().unwrap();
    assert_eq!(image.kind, ExportKind::Image);
    assert_eq!(image.filename, "Jane_Doe_A_2026-03-07.png");
    assert!(image.bytes.starts_with(b"\x89PNG"));

    let document = session.export_as_document().unwrap();
    assert_eq!(document.filename, "Jane_Doe_A_2026-03-07.pdf");
    assert!(document.bytes.starts_with(b"%PDF-"));

    let print = session.print().unwrap();
    let html = String::from_utf8(print.bytes).unwrap();
    assert!(html.contains("<title>A - Jane Doe</title>"));
    assert!(html.contains("07/03/2026"));

    assert_eq!(
        messages(&mut session),
        ["Form saved as PNG", "Form saved as PDF", "Print job prepared"]
    );
}

#[test]
fn exported_png_contains_background_and_ink() {
    let mut session = ready_session();
    tap(&mut session, 50.0, 50.0, 0);
    let image = session.export_as_image().unwrap();

    let decoded = Surface::from_png(&mut image.bytes.as_slice()).unwrap();
    let ink = decoded.pixel(50, 50).unwrap();
    let paper = decoded.pixel(5, 5).unwrap();
    assert!(ink.r > 200 && ink.g < 60);
    assert_eq!((paper.r, paper.g, paper.b, paper.a), (255, 255, 255, 255));
}

#[test]
fn export_failure_leaves_state_untouched() {
    let mut options = SessionOptions::default();
    options.date_format = "%Q".into();
    let mut session = AnnotationSession::new(
        options,
        Subject::new("Jane Doe", "MR-0042"),
        Box::new(MemorySource {
            sizes: HashMap::from([("a.jpg".to_string(), (100, 100))]),
        }),
    );
    session.activate_form(form_a()).unwrap();
    tap(&mut session, 50.0, 50.0, 0);
    let before = session.surface().unwrap().snapshot().unwrap();

    assert!(matches!(
        session.export_as_document(),
        Err(SessionError::Export(_))
    ));
    assert_eq!(messages(&mut session), ["Failed to save PDF"]);
    assert_eq!(session.surface().unwrap().snapshot().unwrap(), before);
    assert_eq!(session.history_len(), 2);
}

#[test]
fn message_uses_template_and_contact() {
    let mut session = ready_session();
    session.set_subject(Subject::new("Jane", "MR-1").with_contact("+1 555-0100"));

    let message = session.compose_default_message().unwrap();
    assert_eq!(message.text, "Hi Jane, your A is ready. MR No: MR-1");
    assert_eq!(
        message.handoff_url.as_deref(),
        Some("https://wa.me/15550100?text=Hi+Jane%2C+your+A+is+ready.+MR+No%3A+MR-1")
    );

    let custom = session.compose_message("{form} for {id}").unwrap();
    assert_eq!(custom.text, "A for MR-1");
}
