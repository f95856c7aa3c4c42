//! End-to-end behaviour of the surface: pointer rays in, actions out.
use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::{Matrix4, Point2, Point3, Vector3};
use visor_core::render::{knob_x, meditation_layout, MeditationLayout};
use visor_core::state::{CarouselData, CarouselItem, MeditationData, VariantKind};
use visor_core::{
    dispatch, Action, Camera, DisplayMesh, DisplayObject, HitRegion, Mesh, NavKind, NavOptions,
    NavStack, NavView, Navigator, PointerOutcome, Pose, Ray, Rect, RegionAction, Screen,
    ScreenState, StateController, SurfaceCalibration, SurfaceContext,
};

fn controller() -> StateController {
    StateController::new(SurfaceContext::default())
}

fn quad() -> DisplayObject {
    DisplayObject::new(Mesh::display_quad(2.0, 3.0), Pose::default())
}

/// Straight-on ray hitting the 2x3 quad at texture coordinate (u, v)
fn ray_at_uv(u: f32, v: f32) -> Ray {
    let x = -1.0 + 2.0 * u;
    let y = -1.5 + 3.0 * v;
    Ray::new(Point3::new(x, y, 5.0), Vector3::new(0.0, 0.0, -1.0))
}

fn gradient_carousel() -> CarouselData {
    CarouselData {
        items: vec![CarouselItem {
            name: "Glow".to_string(),
            variants: (0..6).map(|i| format!("v{}", i)).collect(),
            kind: VariantKind::Gradient {
                stops: vec![0xFF_FF_00_00, 0xFF_00_00_FF],
            },
        }],
        current_index: 0,
        current_variant_index: 3,
        extra_scalar: 0.0,
    }
}

#[test]
fn test_off_surface_hit_never_dispatches() {
    let mut controller = StateController::new(SurfaceContext {
        calibration: SurfaceCalibration::new(Point2::new(0.2, 0.2), Point2::new(0.8, 0.8))
            .unwrap(),
        ..SurfaceContext::default()
    });
    controller.set_state(ScreenState::Listening);
    let object = quad();
    let mesh: &dyn DisplayMesh = &object;

    let outcome = controller.handle_pointer(Some(&ray_at_uv(0.1, 0.5)), Some(mesh), 10);
    assert_eq!(outcome, PointerOutcome::OffSurface);
    assert!(controller.feedback().is_none());
}

#[test]
fn test_missing_ray_or_mesh_is_no_hit() {
    let mut controller = controller();
    let object = quad();
    let mesh: &dyn DisplayMesh = &object;
    let ray = ray_at_uv(0.5, 0.5);
    assert_eq!(
        controller.handle_pointer(None, Some(mesh), 0),
        PointerOutcome::NoHit
    );
    assert_eq!(controller.handle_pointer(Some(&ray), None, 0), PointerOutcome::NoHit);
    // Pointing away from the quad
    let away = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(
        controller.handle_pointer(Some(&away), Some(mesh), 0),
        PointerOutcome::NoHit
    );
}

#[test]
fn test_camera_click_presses_listening_cancel() {
    let mut controller = controller();
    controller.set_state(ScreenState::Listening);
    let heard = Rc::new(RefCell::new(Vec::new()));
    let sink = heard.clone();
    controller.set_listener(Some(Box::new(move |action: &Action| {
        sink.borrow_mut().push(action.clone())
    })));

    // The cancel band runs along the bottom of the surface, which sits at
    // high u on the quarter-turned quad
    let object = quad();
    let (width, height) = (200, 200);
    let camera = Camera::new(width, height);
    let target = Point3::new(-1.0 + 2.0 * 0.95, 0.0, 0.0);
    let (sx, sy, _) = camera
        .project_to_screen(&target, &Matrix4::identity(), width, height)
        .unwrap();
    let ray = camera.pointer_ray(sx, sy, width, height).unwrap();

    let mesh: &dyn DisplayMesh = &object;
    match controller.handle_pointer(Some(&ray), Some(mesh), 100) {
        PointerOutcome::Hit { action, .. } => assert_eq!(action, RegionAction::Cancel),
        other => panic!("expected a hit, got {:?}", other),
    }
    assert_eq!(*heard.borrow(), vec![Action::Cancel(ScreenState::Listening)]);
    assert_eq!(controller.feedback().unwrap().button_name, "cancel");
}

#[test]
fn test_knob_sits_at_variant_fraction() {
    let mut controller = controller();
    controller.set_state(ScreenState::Carousel);
    controller.set_carousel_data(gradient_carousel());

    let slider = controller
        .regions()
        .iter()
        .find(|r| matches!(r.action, RegionAction::VariantSlider { count: 6 }))
        .map(|r| r.rect)
        .unwrap();
    let knob = knob_x(slider, 3, 6);
    assert!((knob - (slider.x as f32 + 0.6 * slider.w as f32)).abs() < 1e-3);

    // Pressing at the knob keeps the same variant
    let (_, cy) = slider.center();
    controller.handle_surface_point(knob, cy as f32, 0);
    match controller.screen() {
        Screen::Carousel(data) => assert_eq!(data.current_variant_index, 3),
        other => panic!("unexpected screen {:?}", other),
    }
}

#[test]
fn test_finished_countdown_shows_message() {
    let mut controller = controller();
    controller.set_state(ScreenState::Meditation);
    controller.set_meditation_data(MeditationData {
        phase: "Exhale".to_string(),
        timer: Some(0),
        cycle: 5,
        max_cycles: 5,
        message: "Well done".to_string(),
    });
    controller.tick(16);

    let Screen::Meditation(data) = controller.screen() else {
        panic!("meditation screen expected");
    };
    assert_eq!(data.timer, None);
    assert_eq!(meditation_layout(data), MeditationLayout::Message);
}

#[test]
fn test_regions_follow_the_rendered_state() {
    let mut controller = controller();
    let names = |c: &StateController| -> Vec<String> {
        c.regions().iter().map(|r| r.name().to_string()).collect()
    };

    controller.set_state(ScreenState::Listening);
    assert_eq!(names(&controller), ["cancel"]);

    controller.set_state(ScreenState::Music);
    assert_eq!(names(&controller), ["prev", "play_pause", "next"]);

    // Data for another screen leaves the regions alone
    controller.set_text("ignored");
    assert_eq!(names(&controller), ["prev", "play_pause", "next"]);
}

#[test]
fn test_first_listed_region_wins_overlap() {
    let regions = vec![
        HitRegion::new(Rect::new(0, 0, 100, 100), RegionAction::Panel {
            name: "inner".to_string(),
            value: None,
        }),
        HitRegion::new(Rect::new(0, 0, 200, 200), RegionAction::Cancel),
    ];
    assert_eq!(dispatch(50.0, 50.0, &regions).map(|r| r.name()), Some("inner"));
    assert_eq!(dispatch(150.0, 150.0, &regions).map(|r| r.name()), Some("cancel"));
    assert!(dispatch(250.0, 10.0, &regions).is_none());
}

#[test]
fn test_nav_stack_ignores_repeat_push() {
    let mut stack = NavStack::new();
    assert!(stack.push(NavKind::Panel, NavOptions::panel("effects")));
    assert!(!stack.push(NavKind::Panel, NavOptions::panel("effects")));
    assert!(stack.push(NavKind::Panel, NavOptions::panel("volume")));
    assert_eq!(stack.depth(), 3);
    assert_eq!(stack.previous().and_then(|s| s.panel_id.as_deref()), Some("effects"));
}

#[derive(Default)]
struct Shown {
    calls: Rc<RefCell<Vec<String>>>,
    mood: Option<String>,
}

impl NavView for Shown {
    fn show_menu(&mut self) {
        self.calls.borrow_mut().push("menu".into());
    }
    fn hide_menu(&mut self) {}
    fn show_mood_mode(&mut self, mode: &str) {
        self.mood = Some(mode.to_string());
        self.calls.borrow_mut().push(format!("mood {}", mode));
    }
    fn show_panel(&mut self, panel_id: &str) {
        self.calls.borrow_mut().push(format!("panel {}", panel_id));
    }
    fn hide_panel(&mut self) {}
    fn show_idle(&mut self) {
        self.calls.borrow_mut().push("idle".into());
    }
    fn current_mood_mode(&self) -> Option<String> {
        self.mood.clone()
    }
    fn current_panel_id(&self) -> Option<String> {
        None
    }
}

#[test]
fn test_carousel_from_mood_mode_returns_there() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let view = Shown {
        calls: calls.clone(),
        mood: None,
    };
    let mut nav = Navigator::with_view(Box::new(view));

    nav.enter_mood_mode("focus");
    nav.open_carousel();
    assert_eq!(nav.current().kind, NavKind::Carousel);
    nav.close_carousel();

    assert_eq!(nav.current().kind, NavKind::MoodMode);
    assert_eq!(nav.current().mood_mode.as_deref(), Some("focus"));
    assert_eq!(calls.borrow().last().map(String::as_str), Some("mood focus"));
}

#[test]
fn test_panel_over_menu_closes_back_to_menu() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut nav = Navigator::with_view(Box::new(Shown {
        calls: calls.clone(),
        mood: None,
    }));

    nav.open_menu();
    nav.open_panel("effects");
    assert_eq!(nav.stack().depth(), 2);
    nav.close_panel();

    assert_eq!(nav.current().kind, NavKind::Menu);
    assert!(nav.menu_open());
    assert_eq!(calls.borrow().last().map(String::as_str), Some("menu"));
}

#[test]
fn test_carousel_close_press_keeps_menu_entry() {
    let mut controller = controller();
    controller
        .navigator_mut()
        .set_view(Some(Box::new(Shown::default())));
    controller.navigator_mut().open_menu();

    // Carousel shown directly, without a carousel nav entry
    controller.set_state(ScreenState::Carousel);
    controller.set_carousel_data(gradient_carousel());
    let close = controller
        .regions()
        .iter()
        .find(|r| r.action == RegionAction::CarouselAction(visor_core::hit::Side::Left))
        .map(|r| r.rect)
        .unwrap();
    let (cx, cy) = close.center();
    controller.handle_surface_point(cx as f32, cy as f32, 0);

    assert_eq!(controller.navigator().current().kind, NavKind::Menu);
    assert_eq!(controller.navigator().stack().depth(), 2);
}
