//! State controller: owns the active screen and routes events through the
//! mapper, the dispatcher and the navigator.
use std::rc::Rc;

use log::{debug, info};

use crate::calibration::{CalibrationEdge, SurfaceCalibration};
use crate::feedback::PressFeedback;
use crate::geometry::Ray;
use crate::hit::{dispatch, HitRegion, RegionAction, Side, Transport};
use crate::mapper::CoordinateMapper;
use crate::nav::Navigator;
use crate::panel::Panel;
use crate::render::{FrameInfo, Renderer};
use crate::scene::DisplayMesh;
use crate::state::{CarouselData, MeditationData, MusicData, PanelSlot, Screen, ScreenState};
use crate::surface::Surface;
use crate::theme;

/// Step applied by one arrow key press in calibration mode
pub const CALIBRATION_STEP: f32 = 0.001;

/// Pulls points on the far surface edge back inside the last pixel
const EDGE_INSET: f32 = 0.5;

/// Everything the controller needs to know up front
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceContext {
    pub width: u32,
    pub height: u32,
    pub calibration: SurfaceCalibration,
    /// Allows entering the calibration screen
    pub calibration_enabled: bool,
    pub flash_ms: u64,
}

impl Default for SurfaceContext {
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
            calibration: SurfaceCalibration::full(),
            calibration_enabled: false,
            flash_ms: theme::FLASH_MS,
        }
    }
}

/// What a region press means to the outside world
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Start,
    MenuToggled,
    Cancel(ScreenState),
    Confirm(ScreenState),
    CarouselClose,
    CarouselUse { index: usize, variant: usize },
    CarouselMoved { index: usize },
    Variant { index: usize },
    Phase(f32),
    Transport(Transport),
    Panel { name: String, value: Option<f32> },
}

pub trait ActionListener {
    fn on_action(&mut self, action: &Action);
}

impl<F: FnMut(&Action)> ActionListener for F {
    fn on_action(&mut self, action: &Action) {
        self(action)
    }
}

/// Result of one pointer event
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// No ray, no mesh, or the ray missed the mesh
    NoHit,
    /// Hit the mesh outside the calibrated rectangle
    OffSurface,
    /// On the surface but not on a control
    Miss { x: f32, y: f32 },
    Hit { action: RegionAction, x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Up,
    Down,
    Left,
    Right,
    Char(char),
}

pub struct StateController {
    context: SurfaceContext,
    screen: Screen,
    renderer: Renderer,
    mapper: CoordinateMapper,
    regions: Vec<HitRegion>,
    /// The state `regions` were drawn for
    regions_state: ScreenState,
    frame: u64,
    now_ms: u64,
    feedback: Option<PressFeedback>,
    navigator: Navigator,
    listener: Option<Box<dyn ActionListener>>,
}

impl StateController {
    pub fn new(context: SurfaceContext) -> Self {
        let mapper = CoordinateMapper::new(context.width, context.height, context.calibration);
        let renderer = Renderer::new(context.width as usize, context.height as usize);
        let mut controller = Self {
            context,
            screen: Screen::default(),
            renderer,
            mapper,
            regions: Vec::new(),
            regions_state: ScreenState::Idle,
            frame: 0,
            now_ms: 0,
            feedback: None,
            navigator: Navigator::new(),
            listener: None,
        };
        controller.render();
        controller
    }

    pub fn set_listener(&mut self, listener: Option<Box<dyn ActionListener>>) {
        self.listener = listener;
    }

    /// Switch screens with fresh data. Returns false when refused.
    pub fn set_state(&mut self, state: ScreenState) -> bool {
        if state == ScreenState::Calibration && !self.context.calibration_enabled {
            debug!("calibration screen requested but calibration mode is off");
            return false;
        }
        debug!("state {} -> {}", self.screen.state(), state);
        self.screen = Screen::for_state(state);
        self.render();
        true
    }

    pub fn set_idle_prompt(&mut self, prompt: impl Into<String>) {
        match &mut self.screen {
            Screen::Idle(data) => data.prompt = prompt.into(),
            _ => return self.ignored("set_idle_prompt"),
        }
        self.render();
    }

    pub fn set_meditation_data(&mut self, meditation: MeditationData) {
        match &mut self.screen {
            Screen::Meditation(data) => *data = meditation,
            _ => return self.ignored("set_meditation_data"),
        }
        self.render();
    }

    /// Indices are clamped into the new item list
    pub fn set_carousel_data(&mut self, mut carousel: CarouselData) {
        match &mut self.screen {
            Screen::Carousel(data) => {
                carousel.current_index = carousel
                    .current_index
                    .min(carousel.items.len().saturating_sub(1));
                carousel.extra_scalar = carousel.extra_scalar.clamp(0.0, 1.0);
                *data = carousel;
                clamp_variant(data);
            }
            _ => return self.ignored("set_carousel_data"),
        }
        self.render();
    }

    pub fn set_carousel_variant(&mut self, index: usize) {
        match &mut self.screen {
            Screen::Carousel(data) => {
                data.current_variant_index = index;
                clamp_variant(data);
            }
            _ => return self.ignored("set_carousel_variant"),
        }
        self.render();
    }

    /// Select an item; its variant selection starts over
    pub fn set_carousel_index(&mut self, index: usize) {
        match &mut self.screen {
            Screen::Carousel(data) => {
                data.current_index = index.min(data.items.len().saturating_sub(1));
                data.current_variant_index = 0;
            }
            _ => return self.ignored("set_carousel_index"),
        }
        self.render();
    }

    pub fn set_extra_scalar(&mut self, value: f32) {
        match &mut self.screen {
            Screen::Carousel(data) => data.extra_scalar = value.clamp(0.0, 1.0),
            _ => return self.ignored("set_extra_scalar"),
        }
        self.render();
    }

    pub fn set_panel_data(&mut self, panel: Option<Rc<dyn Panel>>) {
        match &mut self.screen {
            Screen::Panel(slot) => *slot = PanelSlot { panel },
            _ => return self.ignored("set_panel_data"),
        }
        self.render();
    }

    pub fn set_music_data(&mut self, music: MusicData) {
        match &mut self.screen {
            Screen::Music(data) => *data = music,
            _ => return self.ignored("set_music_data"),
        }
        self.render();
    }

    pub fn set_progress(&mut self, progress: f32) {
        match &mut self.screen {
            Screen::Speaking(data) => data.progress = progress.clamp(0.0, 1.0),
            _ => return self.ignored("set_progress"),
        }
        self.render();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        match &mut self.screen {
            Screen::Speaking(data) => data.text = text.into(),
            _ => return self.ignored("set_text"),
        }
        self.render();
    }

    /// Per-frame update
    pub fn tick(&mut self, now_ms: u64) {
        self.frame = self.frame.wrapping_add(1);
        self.now_ms = now_ms;
        if self.feedback.as_ref().is_some_and(|f| f.is_expired(now_ms)) {
            self.feedback = None;
        }
        if let Screen::Meditation(data) = &mut self.screen {
            if data.timer == Some(0) {
                data.timer = None;
            }
        }
        self.render();
    }

    /// Route a pointer ray to whatever control it lands on
    pub fn handle_pointer(
        &mut self,
        ray: Option<&Ray>,
        mesh: Option<&dyn DisplayMesh>,
        now_ms: u64,
    ) -> PointerOutcome {
        self.now_ms = now_ms;
        let Some(point) = self.mapper.map_pointer_to_surface(ray, mesh) else {
            return PointerOutcome::NoHit;
        };
        if !point.on_surface {
            return PointerOutcome::OffSurface;
        }
        let (x, y) = (point.x, point.y);
        self.handle_surface_point(x, y, now_ms)
    }

    /// Dispatch a point already in surface pixels
    pub fn handle_surface_point(&mut self, x: f32, y: f32, now_ms: u64) -> PointerOutcome {
        self.now_ms = now_ms;
        // The mapper may return the far edge itself; regions are half-open
        let x = x.clamp(0.0, (self.context.width as f32 - EDGE_INSET).max(0.0));
        let y = y.clamp(0.0, (self.context.height as f32 - EDGE_INSET).max(0.0));
        if self.regions_state != self.screen.state() {
            debug!("regions belong to {}, not dispatching", self.regions_state);
            return PointerOutcome::Miss { x, y };
        }
        let Some(region) = dispatch(x, y, &self.regions).cloned() else {
            return PointerOutcome::Miss { x, y };
        };

        debug!("pressed {} at ({:.1}, {:.1})", region, x, y);
        self.feedback = Some(PressFeedback::new(
            region.action.feedback_key(),
            now_ms,
            self.context.flash_ms,
        ));
        let action = self.apply(&region, x);
        if let Some(listener) = self.listener.as_mut() {
            listener.on_action(&action);
        }
        self.render();

        PointerOutcome::Hit {
            action: region.action,
            x,
            y,
        }
    }

    /// Calibration keys. Returns the formatted calibration line on `c`.
    pub fn handle_key(&mut self, key: Key) -> Option<String> {
        let Screen::Calibration(data) = &mut self.screen else {
            return None;
        };
        let mut line = None;
        match key {
            Key::Digit(digit) => {
                if let Some(edge) = CalibrationEdge::from_digit(digit) {
                    data.selected = edge;
                }
            }
            Key::Up | Key::Right => {
                self.mapper
                    .calibration_mut()
                    .nudge(data.selected, CALIBRATION_STEP);
            }
            Key::Down | Key::Left => {
                self.mapper
                    .calibration_mut()
                    .nudge(data.selected, -CALIBRATION_STEP);
            }
            Key::Char('c') | Key::Char('C') => {
                let text = self.mapper.calibration().to_string();
                info!("calibration {}", text);
                line = Some(text);
            }
            Key::Char(_) => return None,
        }
        self.render();
        line
    }

    pub fn surface(&self) -> &Surface {
        self.renderer.surface()
    }

    /// For the texture consumer: true once per render
    pub fn take_dirty(&mut self) -> bool {
        self.renderer.surface_mut().take_dirty()
    }

    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    pub fn state(&self) -> ScreenState {
        self.screen.state()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn calibration(&self) -> &SurfaceCalibration {
        self.mapper.calibration()
    }

    pub fn set_calibration(&mut self, calibration: SurfaceCalibration) {
        *self.mapper.calibration_mut() = calibration;
        self.render();
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn context(&self) -> &SurfaceContext {
        &self.context
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn feedback(&self) -> Option<&PressFeedback> {
        self.feedback.as_ref()
    }

    fn render(&mut self) {
        let frame = FrameInfo {
            frame: self.frame,
            now_ms: self.now_ms,
            feedback: self.feedback.as_ref(),
            calibration: self.mapper.calibration(),
        };
        self.regions = self.renderer.render(&self.screen, &frame);
        self.regions_state = self.screen.state();
    }

    fn ignored(&self, setter: &str) {
        debug!("{} ignored while {} is active", setter, self.screen.state());
    }

    /// Internal effects of a press, and the action the listener hears
    fn apply(&mut self, region: &HitRegion, x: f32) -> Action {
        let state = self.screen.state();
        match &region.action {
            RegionAction::Start => Action::Start,
            RegionAction::MenuToggle => {
                self.navigator.toggle_menu();
                Action::MenuToggled
            }
            RegionAction::Cancel => Action::Cancel(state),
            RegionAction::Confirm => Action::Confirm(state),
            RegionAction::CarouselAction(Side::Left) => {
                self.navigator.close_carousel();
                Action::CarouselClose
            }
            RegionAction::CarouselAction(Side::Right) => match &self.screen {
                Screen::Carousel(data) => Action::CarouselUse {
                    index: data.current_index,
                    variant: data.current_variant_index,
                },
                _ => Action::CarouselUse {
                    index: 0,
                    variant: 0,
                },
            },
            RegionAction::CarouselNav(step) => {
                let mut index = 0;
                if let Screen::Carousel(data) = &mut self.screen {
                    let len = data.items.len() as i64;
                    if len > 0 {
                        let stepped = data.current_index as i64 + *step as i64;
                        index = stepped.rem_euclid(len) as usize;
                        data.current_index = index;
                        data.current_variant_index = 0;
                    }
                }
                Action::CarouselMoved { index }
            }
            RegionAction::Variant(index) => {
                if let Screen::Carousel(data) = &mut self.screen {
                    data.current_variant_index = *index;
                    clamp_variant(data);
                }
                Action::Variant { index: *index }
            }
            RegionAction::VariantSlider { count } => {
                let span = count.saturating_sub(1) as f32;
                let index = (region.fraction_x(x) * span).round() as usize;
                if let Screen::Carousel(data) = &mut self.screen {
                    data.current_variant_index = index;
                    clamp_variant(data);
                }
                Action::Variant { index }
            }
            RegionAction::PhaseSlider => {
                let value = region.fraction_x(x);
                if let Screen::Carousel(data) = &mut self.screen {
                    data.extra_scalar = value;
                }
                Action::Phase(value)
            }
            RegionAction::Transport(transport) => Action::Transport(*transport),
            RegionAction::Panel { name, value } => Action::Panel {
                name: name.clone(),
                value: *value,
            },
        }
    }
}

fn clamp_variant(data: &mut CarouselData) {
    let count = data.current_item().map_or(0, |item| item.variants.len());
    data.current_variant_index = data.current_variant_index.min(count.saturating_sub(1));
}
