//! Screen states and the data each one renders
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::calibration::CalibrationEdge;
use crate::error::VisorError;
use crate::panel::Panel;

/// Which screen is active. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenState {
    Idle,
    Listening,
    Processing,
    Speaking,
    Meditation,
    Carousel,
    Panel,
    Music,
    Calibration,
}

impl ScreenState {
    pub const ALL: [ScreenState; 9] = [
        ScreenState::Idle,
        ScreenState::Listening,
        ScreenState::Processing,
        ScreenState::Speaking,
        ScreenState::Meditation,
        ScreenState::Carousel,
        ScreenState::Panel,
        ScreenState::Music,
        ScreenState::Calibration,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScreenState::Idle => "idle",
            ScreenState::Listening => "listening",
            ScreenState::Processing => "processing",
            ScreenState::Speaking => "speaking",
            ScreenState::Meditation => "meditation",
            ScreenState::Carousel => "carousel",
            ScreenState::Panel => "panel",
            ScreenState::Music => "music",
            ScreenState::Calibration => "calibration",
        }
    }
}

impl fmt::Display for ScreenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScreenState {
    type Err = VisorError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.name() == name)
            .ok_or_else(|| VisorError::UnknownState(name.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdleData {
    pub prompt: String,
}

impl Default for IdleData {
    fn default() -> Self {
        Self {
            prompt: "Tap to talk".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpeakingData {
    pub text: String,
    /// Playback progress, 0..1
    pub progress: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeditationData {
    /// Phase label, e.g. "Inhale"
    pub phase: String,
    /// Seconds left in the phase; `None` when no countdown runs
    pub timer: Option<u32>,
    /// Zero-based index of the current cycle
    pub cycle: u32,
    pub max_cycles: u32,
    /// Shown centered when there is no countdown
    pub message: String,
}

impl Default for MeditationData {
    fn default() -> Self {
        Self {
            phase: String::new(),
            timer: None,
            cycle: 0,
            max_cycles: 0,
            message: "Get comfortable".to_string(),
        }
    }
}

/// How the carousel's center control looks for one item
#[derive(Debug, Clone, PartialEq)]
pub enum VariantKind {
    /// Continuous slider over a colour gradient
    Gradient { stops: Vec<u32> },
    /// A row of selectable pills
    Pills,
    /// Pills plus a secondary 0..1 slider driven by `extra_scalar`
    PillsWithPhase,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselItem {
    pub name: String,
    pub variants: Vec<String>,
    pub kind: VariantKind,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CarouselData {
    pub items: Vec<CarouselItem>,
    pub current_index: usize,
    pub current_variant_index: usize,
    /// Secondary slider value, 0..1
    pub extra_scalar: f32,
}

impl CarouselData {
    pub fn current_item(&self) -> Option<&CarouselItem> {
        self.items.get(self.current_index)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MusicData {
    pub track_name: String,
    pub is_playing: bool,
    /// Seconds
    pub current_time: f32,
    /// Seconds
    pub duration: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationData {
    pub selected: CalibrationEdge,
}

impl Default for CalibrationData {
    fn default() -> Self {
        Self {
            selected: CalibrationEdge::MinX,
        }
    }
}

/// The slot the panel screen delegates to
#[derive(Clone, Default)]
pub struct PanelSlot {
    pub panel: Option<Rc<dyn Panel>>,
}

impl fmt::Debug for PanelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelSlot")
            .field("panel", &self.panel.as_ref().map(|p| p.id().to_string()))
            .finish()
    }
}

/// The active screen together with its data
#[derive(Debug, Clone)]
pub enum Screen {
    Idle(IdleData),
    Listening,
    Processing,
    Speaking(SpeakingData),
    Meditation(MeditationData),
    Carousel(CarouselData),
    Panel(PanelSlot),
    Music(MusicData),
    Calibration(CalibrationData),
}

impl Screen {
    /// Fresh data for `state`
    pub fn for_state(state: ScreenState) -> Self {
        match state {
            ScreenState::Idle => Screen::Idle(IdleData::default()),
            ScreenState::Listening => Screen::Listening,
            ScreenState::Processing => Screen::Processing,
            ScreenState::Speaking => Screen::Speaking(SpeakingData::default()),
            ScreenState::Meditation => Screen::Meditation(MeditationData::default()),
            ScreenState::Carousel => Screen::Carousel(CarouselData::default()),
            ScreenState::Panel => Screen::Panel(PanelSlot::default()),
            ScreenState::Music => Screen::Music(MusicData::default()),
            ScreenState::Calibration => Screen::Calibration(CalibrationData::default()),
        }
    }

    pub fn state(&self) -> ScreenState {
        match self {
            Screen::Idle(_) => ScreenState::Idle,
            Screen::Listening => ScreenState::Listening,
            Screen::Processing => ScreenState::Processing,
            Screen::Speaking(_) => ScreenState::Speaking,
            Screen::Meditation(_) => ScreenState::Meditation,
            Screen::Carousel(_) => ScreenState::Carousel,
            Screen::Panel(_) => ScreenState::Panel,
            Screen::Music(_) => ScreenState::Music,
            Screen::Calibration(_) => ScreenState::Calibration,
        }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Screen::for_state(ScreenState::Idle)
    }
}
