/// Visor Web - WASM bindings for the control surface
///
/// The page owns the 3D scene. It uploads `pixels()` as the display
/// texture whenever `take_dirty()` says so, and reports pointer hits either
/// as a ray against the built-in display quad or as a UV it picked itself.
use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::{Point2, Point3, Vector3};
use visor_core::state::{CarouselData, CarouselItem, MeditationData, MusicData, VariantKind};
use visor_core::{
    Action, DisplayMesh, DisplayObject, Key, Mesh, MeshHit, NavView, PointerOutcome, Pose, Ray,
    Screen, ScreenState, StateController, SurfaceCalibration, SurfaceContext,
};
use wasm_bindgen::prelude::*;

/// A hit the page already resolved with its own raycaster
struct PickedHit(MeshHit);

impl DisplayMesh for PickedHit {
    fn intersect(&self, _ray: &Ray) -> Option<MeshHit> {
        Some(self.0)
    }
}

#[wasm_bindgen]
pub struct WebSurface {
    controller: StateController,
    object: DisplayObject,
    actions: Rc<RefCell<Vec<String>>>,
    view: Rc<RefCell<ViewState>>,
}

#[wasm_bindgen]
impl WebSurface {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> WebSurface {
        let query = UrlQuery::read();
        let mut controller = StateController::new(SurfaceContext {
            width,
            height,
            calibration: query.calibration.unwrap_or_default(),
            calibration_enabled: query.calibrate,
            ..SurfaceContext::default()
        });

        let actions = Rc::new(RefCell::new(Vec::new()));
        let sink = actions.clone();
        controller.set_listener(Some(Box::new(move |action: &Action| {
            sink.borrow_mut().push(action_label(action))
        })));

        let view = Rc::new(RefCell::new(ViewState::default()));
        controller
            .navigator_mut()
            .set_view(Some(Box::new(PageView(view.clone()))));

        WebSurface {
            controller,
            object: DisplayObject::new(Mesh::display_quad(2.0, 3.0), Pose::default()),
            actions,
            view,
        }
    }

    pub fn width(&self) -> u32 {
        self.controller.context().width
    }

    pub fn height(&self) -> u32 {
        self.controller.context().height
    }

    /// RGBA bytes, row-major from the top-left
    pub fn pixels(&self) -> Vec<u8> {
        self.controller.surface().to_rgba()
    }

    #[wasm_bindgen(js_name = takeDirty)]
    pub fn take_dirty(&mut self) -> bool {
        self.controller.take_dirty()
    }

    pub fn state(&self) -> String {
        self.controller.state().to_string()
    }

    #[wasm_bindgen(js_name = setState)]
    pub fn set_state(&mut self, name: &str) -> Result<bool, JsValue> {
        let state: ScreenState = name.parse().map_err(to_js)?;
        Ok(self.controller.set_state(state))
    }

    pub fn tick(&mut self, now_ms: f64) {
        self.controller.tick(now_ms as u64);
    }

    /// Place the built-in display quad
    #[wasm_bindgen(js_name = setPose)]
    pub fn set_pose(&mut self, rx: f32, ry: f32, rz: f32, tx: f32, ty: f32, tz: f32) {
        self.object.pose = Pose::new(Vector3::new(rx, ry, rz), Vector3::new(tx, ty, tz));
    }

    /// World-space ray against the built-in quad. Returns the pressed
    /// region's name, if any.
    #[wasm_bindgen(js_name = pointerRay)]
    #[allow(clippy::too_many_arguments)]
    pub fn pointer_ray(
        &mut self,
        ox: f32,
        oy: f32,
        oz: f32,
        dx: f32,
        dy: f32,
        dz: f32,
        now_ms: f64,
    ) -> Option<String> {
        let ray = Ray::new(Point3::new(ox, oy, oz), Vector3::new(dx, dy, dz));
        let mesh: &dyn DisplayMesh = &self.object;
        let outcome = self.controller.handle_pointer(Some(&ray), Some(mesh), now_ms as u64);
        pressed_name(outcome)
    }

    /// A UV the page's own raycaster found on its display mesh
    #[wasm_bindgen(js_name = pointerUv)]
    pub fn pointer_uv(&mut self, u: f32, v: f32, now_ms: f64) -> Option<String> {
        let picked = PickedHit(MeshHit {
            uv: Point2::new(u, v),
            distance: 0.0,
        });
        // The ray is ignored by a picked hit but still required
        let ray = Ray::new(Point3::origin(), Vector3::z());
        let outcome = self
            .controller
            .handle_pointer(Some(&ray), Some(&picked as &dyn DisplayMesh), now_ms as u64);
        pressed_name(outcome)
    }

    /// Actions heard since the last call, oldest first
    #[wasm_bindgen(js_name = drainActions)]
    pub fn drain_actions(&mut self) -> Vec<String> {
        self.actions.borrow_mut().drain(..).collect()
    }

    /// `KeyboardEvent.key` in calibration mode. Returns the calibration
    /// line when the copy key was pressed.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str) -> Option<String> {
        self.controller.handle_key(parse_key(key)?)
    }

    pub fn calibration(&self) -> String {
        self.controller.calibration().to_string()
    }

    #[wasm_bindgen(js_name = setCalibration)]
    pub fn set_calibration(&mut self, line: &str) -> Result<(), JsValue> {
        let calibration: SurfaceCalibration = line.parse().map_err(to_js)?;
        self.controller.set_calibration(calibration);
        Ok(())
    }

    #[wasm_bindgen(js_name = setIdlePrompt)]
    pub fn set_idle_prompt(&mut self, prompt: String) {
        self.controller.set_idle_prompt(prompt);
    }

    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&mut self, text: String) {
        self.controller.set_text(text);
    }

    #[wasm_bindgen(js_name = setProgress)]
    pub fn set_progress(&mut self, progress: f32) {
        self.controller.set_progress(progress);
    }

    /// `timer` below zero means no countdown
    #[wasm_bindgen(js_name = setMeditation)]
    pub fn set_meditation(
        &mut self,
        phase: String,
        timer: i32,
        cycle: u32,
        max_cycles: u32,
        message: String,
    ) {
        self.controller.set_meditation_data(MeditationData {
            phase,
            timer: u32::try_from(timer).ok(),
            cycle,
            max_cycles,
            message,
        });
    }

    #[wasm_bindgen(js_name = setMusic)]
    pub fn set_music(&mut self, track_name: String, is_playing: bool, current: f32, duration: f32) {
        self.controller.set_music_data(MusicData {
            track_name,
            is_playing,
            current_time: current,
            duration,
        });
    }

    /// Append an item to the carousel. Non-empty `stops` makes a gradient
    /// slider; otherwise pills, with a phase slider when `with_phase`.
    #[wasm_bindgen(js_name = addCarouselItem)]
    pub fn add_carousel_item(
        &mut self,
        name: String,
        variants: Vec<String>,
        stops: Vec<u32>,
        with_phase: bool,
    ) {
        let Screen::Carousel(current) = self.controller.screen() else {
            log::debug!("carousel item {} ignored outside the carousel", name);
            return;
        };
        let kind = match (stops.is_empty(), with_phase) {
            (false, _) => VariantKind::Gradient { stops },
            (true, true) => VariantKind::PillsWithPhase,
            (true, false) => VariantKind::Pills,
        };
        let mut data: CarouselData = current.clone();
        data.items.push(CarouselItem {
            name,
            variants,
            kind,
        });
        self.controller.set_carousel_data(data);
    }

    #[wasm_bindgen(js_name = setCarouselIndex)]
    pub fn set_carousel_index(&mut self, index: usize) {
        self.controller.set_carousel_index(index);
    }

    #[wasm_bindgen(js_name = setCarouselVariant)]
    pub fn set_carousel_variant(&mut self, index: usize) {
        self.controller.set_carousel_variant(index);
    }

    #[wasm_bindgen(js_name = setExtraScalar)]
    pub fn set_extra_scalar(&mut self, value: f32) {
        self.controller.set_extra_scalar(value);
    }

    #[wasm_bindgen(js_name = openMenu)]
    pub fn open_menu(&mut self) {
        self.controller.navigator_mut().open_menu();
    }

    #[wasm_bindgen(js_name = closeMenu)]
    pub fn close_menu(&mut self) {
        self.controller.navigator_mut().close_menu();
    }

    #[wasm_bindgen(js_name = openPanel)]
    pub fn open_panel(&mut self, panel_id: &str) {
        self.controller.navigator_mut().open_panel(panel_id);
    }

    #[wasm_bindgen(js_name = closePanel)]
    pub fn close_panel(&mut self) {
        self.controller.navigator_mut().close_panel();
    }

    #[wasm_bindgen(js_name = openCarousel)]
    pub fn open_carousel(&mut self) {
        self.controller.navigator_mut().open_carousel();
    }

    #[wasm_bindgen(js_name = closeCarousel)]
    pub fn close_carousel(&mut self) {
        self.controller.navigator_mut().close_carousel();
    }

    #[wasm_bindgen(js_name = enterMoodMode)]
    pub fn enter_mood_mode(&mut self, mode: &str) {
        self.controller.navigator_mut().enter_mood_mode(mode);
    }

    #[wasm_bindgen(js_name = exitMoodMode)]
    pub fn exit_mood_mode(&mut self) {
        self.controller.navigator_mut().exit_mood_mode();
    }

    #[wasm_bindgen(js_name = resetNav)]
    pub fn reset_nav(&mut self) {
        self.controller.navigator_mut().reset();
    }

    #[wasm_bindgen(js_name = navDepth)]
    pub fn nav_depth(&self) -> usize {
        self.controller.navigator().stack().depth()
    }

    /// Kind of the top navigation entry, e.g. "Menu"
    #[wasm_bindgen(js_name = navKind)]
    pub fn nav_kind(&self) -> String {
        format!("{:?}", self.controller.navigator().current().kind)
    }

    #[wasm_bindgen(js_name = menuVisible)]
    pub fn menu_visible(&self) -> bool {
        self.view.borrow().menu
    }

    #[wasm_bindgen(js_name = visiblePanel)]
    pub fn visible_panel(&self) -> Option<String> {
        self.view.borrow().panel.clone()
    }

    #[wasm_bindgen(js_name = moodMode)]
    pub fn mood_mode(&self) -> Option<String> {
        self.view.borrow().mood.clone()
    }
}

/// What the page should have on display around the surface
#[derive(Debug, Default)]
struct ViewState {
    menu: bool,
    panel: Option<String>,
    mood: Option<String>,
}

/// Navigation view the page reads back through `WebSurface`
struct PageView(Rc<RefCell<ViewState>>);

impl NavView for PageView {
    fn show_menu(&mut self) {
        self.0.borrow_mut().menu = true;
    }

    fn hide_menu(&mut self) {
        let mut view = self.0.borrow_mut();
        view.menu = false;
        view.mood = None;
    }

    fn show_mood_mode(&mut self, mode: &str) {
        log::debug!("page view: mood mode {}", mode);
        self.0.borrow_mut().mood = Some(mode.to_string());
    }

    fn show_panel(&mut self, panel_id: &str) {
        log::debug!("page view: panel {}", panel_id);
        self.0.borrow_mut().panel = Some(panel_id.to_string());
    }

    fn hide_panel(&mut self) {
        self.0.borrow_mut().panel = None;
    }

    fn show_idle(&mut self) {
        *self.0.borrow_mut() = ViewState::default();
    }

    fn current_mood_mode(&self) -> Option<String> {
        self.0.borrow().mood.clone()
    }

    fn current_panel_id(&self) -> Option<String> {
        self.0.borrow().panel.clone()
    }
}

/// What the page asked for in its query string
#[derive(Debug, Default)]
struct UrlQuery {
    calibrate: bool,
    calibration: Option<SurfaceCalibration>,
}

impl UrlQuery {
    #[cfg(target_arch = "wasm32")]
    fn read() -> Self {
        let Some(params) = web_sys::window()
            .and_then(|window| window.location().search().ok())
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
        else {
            return Self::default();
        };
        let calibration = params.get("calibration").and_then(|line| {
            line.parse()
                .map_err(|err| log::warn!("ignoring calibration parameter: {}", err))
                .ok()
        });
        Self {
            calibrate: params.has("calibrate"),
            calibration,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn read() -> Self {
        Self::default()
    }
}

fn pressed_name(outcome: PointerOutcome) -> Option<String> {
    match outcome {
        PointerOutcome::Hit { action, .. } => Some(action.name().to_string()),
        _ => None,
    }
}

fn action_label(action: &Action) -> String {
    match action {
        Action::Variant { index } => format!("variant:{}", index),
        Action::CarouselMoved { index } => format!("carousel_nav:{}", index),
        Action::CarouselUse { index, variant } => format!("carousel_use:{}:{}", index, variant),
        Action::Phase(value) => format!("phase_slider:{}", value),
        Action::Panel { name, value: Some(value) } => format!("{}:{}", name, value),
        Action::Panel { name, value: None } => name.clone(),
        other => format!("{:?}", other).to_lowercase(),
    }
}

fn parse_key(key: &str) -> Option<Key> {
    match key {
        "ArrowUp" => Some(Key::Up),
        "ArrowDown" => Some(Key::Down),
        "ArrowLeft" => Some(Key::Left),
        "ArrowRight" => Some(Key::Right),
        _ => {
            let mut chars = key.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            match c.to_digit(10) {
                Some(digit) => Some(Key::Digit(digit as u8)),
                None => Some(Key::Char(c)),
            }
        }
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub fn start() -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    console_log::init_with_level(log::Level::Debug).map_err(to_js)?;
    log::info!("visor web ready");
    Ok(())
}
