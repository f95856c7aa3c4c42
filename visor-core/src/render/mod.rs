//! Surface renderer: one drawing routine per screen state.
//!
//! Each routine draws its controls and returns their hit regions from the
//! same rectangles, so what is drawn is exactly what can be hit. Routines
//! only read the screen data.
mod calibration;
mod carousel;
mod idle;
mod meditation;
mod music;
mod panel;
mod voice;

pub use carousel::{knob_x, CarouselLayout};
pub use meditation::{meditation_layout, MeditationLayout};

use crate::calibration::SurfaceCalibration;
use crate::feedback::PressFeedback;
use crate::hit::{HitRegion, Rect, RegionAction};
use crate::state::Screen;
use crate::surface::Surface;
use crate::theme;

/// Everything a routine may read besides the screen data
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo<'a> {
    /// Monotonic frame counter, drives periodic motion
    pub frame: u64,
    /// Wall clock, drives flash decay
    pub now_ms: u64,
    pub feedback: Option<&'a PressFeedback>,
    pub calibration: &'a SurfaceCalibration,
}

impl FrameInfo<'_> {
    /// Flash intensity for a control, 0 when it is not flashing
    pub fn flash(&self, action: &RegionAction) -> f32 {
        let key = action.feedback_key();
        self.feedback
            .filter(|feedback| feedback.button_name == key)
            .and_then(|feedback| feedback.intensity(self.now_ms))
            .map_or(0.0, |intensity| intensity * theme::FLASH_MAX)
    }
}

/// Owns the pixel buffer the display mesh samples
pub struct Renderer {
    surface: Surface,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            surface: Surface::new(width, height),
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Redraw the whole surface for `screen` and return its hit regions
    pub fn render(&mut self, screen: &Screen, frame: &FrameInfo) -> Vec<HitRegion> {
        let surface = &mut self.surface;
        surface.clear(theme::BACKGROUND);

        let regions = match screen {
            Screen::Idle(data) => idle::draw(surface, data, frame),
            Screen::Listening => voice::draw_listening(surface, frame),
            Screen::Processing => voice::draw_processing(surface, frame),
            Screen::Speaking(data) => voice::draw_speaking(surface, data, frame),
            Screen::Meditation(data) => meditation::draw(surface, data, frame),
            Screen::Carousel(data) => carousel::draw(surface, data, frame),
            Screen::Panel(slot) => panel::draw(surface, slot, frame),
            Screen::Music(data) => music::draw(surface, data, frame),
            Screen::Calibration(data) => calibration::draw(surface, data, frame),
        };

        surface.mark_dirty();
        regions
    }
}

/// Full-width band along the bottom edge, shared by the voice and
/// meditation screens
fn cancel_band(surface: &mut Surface, frame: &FrameInfo) -> HitRegion {
    let h = (surface.height() as f32 * theme::BAND_FRACTION).round() as i32;
    let band = Rect::new(0, surface.height() as i32 - h, surface.width() as i32, h);
    let action = RegionAction::Cancel;
    button(surface, band, theme::CANCEL_FILL, "Cancel", frame.flash(&action));
    HitRegion::new(band, action)
}

/// The area above the cancel band
fn content_area(surface: &Surface) -> Rect {
    let h = (surface.height() as f32 * theme::BAND_FRACTION).round() as i32;
    Rect::new(0, 0, surface.width() as i32, surface.height() as i32 - h)
}

fn button(surface: &mut Surface, rect: Rect, fill: u32, label: &str, flash: f32) {
    surface.fill_rect(rect, fill);
    surface.brighten_rect(rect, flash);
    surface.stroke_rect(rect, 1, theme::BUTTON_EDGE);
    if !label.is_empty() {
        surface.text_centered(rect, label, theme::TEXT_SCALE, theme::FOREGROUND);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ScreenState;
    use crate::surface::lerp_colour;

    #[test]
    fn test_every_state_marks_dirty() {
        let calibration = SurfaceCalibration::full();
        let frame = FrameInfo {
            frame: 3,
            now_ms: 0,
            feedback: None,
            calibration: &calibration,
        };
        let mut renderer = Renderer::new(480, 320);
        for state in ScreenState::ALL {
            renderer.surface_mut().take_dirty();
            renderer.render(&Screen::for_state(state), &frame);
            assert!(renderer.surface().is_dirty(), "{} left surface clean", state);
        }
    }

    #[test]
    fn test_flash_only_for_named_control() {
        let calibration = SurfaceCalibration::full();
        let feedback = PressFeedback::new("cancel", 100, 200);
        let frame = FrameInfo {
            frame: 0,
            now_ms: 100,
            feedback: Some(&feedback),
            calibration: &calibration,
        };
        assert_eq!(frame.flash(&RegionAction::Cancel), theme::FLASH_MAX);
        assert_eq!(frame.flash(&RegionAction::Confirm), 0.0);
    }

    #[test]
    fn test_press_flash_brightens_button() {
        let calibration = SurfaceCalibration::full();
        let feedback = PressFeedback::new("cancel", 0, 200);
        let mut frame = FrameInfo {
            frame: 0,
            now_ms: 0,
            feedback: None,
            calibration: &calibration,
        };
        let mut renderer = Renderer::new(480, 320);
        renderer.render(&Screen::Listening, &frame);
        assert_eq!(renderer.surface().pixel(5, 260), Some(theme::CANCEL_FILL));

        frame.feedback = Some(&feedback);
        renderer.render(&Screen::Listening, &frame);
        let lit = renderer.surface().pixel(5, 260).unwrap();
        assert_eq!(lit, lerp_colour(theme::CANCEL_FILL, 0xFF_FF_FF_FF, theme::FLASH_MAX));
    }
}
