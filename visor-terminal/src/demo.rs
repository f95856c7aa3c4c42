//! Sample data for each screen and a navigation view that remembers what
//! it was asked to show.
use std::rc::Rc;

use log::info;
use visor_core::state::{CarouselData, CarouselItem, MeditationData, MusicData, VariantKind};
use visor_core::{ChoicePanel, NavView, ScreenState, StateController};

/// Fill the screen that is now active with something to look at
pub fn populate(controller: &mut StateController) {
    match controller.state() {
        ScreenState::Idle => controller.set_idle_prompt("Click the circle to talk"),
        ScreenState::Speaking => {
            controller.set_text("Breathe in slowly through your nose and let the day settle.");
            controller.set_progress(0.35);
        }
        ScreenState::Meditation => controller.set_meditation_data(MeditationData {
            phase: "Inhale".to_string(),
            timer: Some(4),
            cycle: 1,
            max_cycles: 5,
            message: String::new(),
        }),
        ScreenState::Carousel => controller.set_carousel_data(carousel()),
        ScreenState::Panel => {
            let options = ["Echo", "Shimmer", "Warmth"].map(String::from).to_vec();
            let panel = ChoicePanel::new("effects", "Effects", options)
                .with_hint("Pick an effect, then confirm");
            controller.set_panel_data(Some(Rc::new(panel)));
        }
        ScreenState::Music => controller.set_music_data(MusicData {
            track_name: "Low Tide".to_string(),
            is_playing: true,
            current_time: 42.0,
            duration: 215.0,
        }),
        ScreenState::Listening | ScreenState::Processing | ScreenState::Calibration => {}
    }
}

pub fn carousel() -> CarouselData {
    CarouselData {
        items: vec![
            CarouselItem {
                name: "Glow".to_string(),
                variants: ["Ember", "Amber", "Gold", "Lime", "Teal", "Ice"]
                    .map(String::from)
                    .to_vec(),
                kind: VariantKind::Gradient {
                    stops: vec![0xFF_E0_40_20, 0xFF_F0_C0_30, 0xFF_40_C0_B0, 0xFF_A0_E0_FF],
                },
            },
            CarouselItem {
                name: "Rain".to_string(),
                variants: ["Mist", "Shower", "Storm"].map(String::from).to_vec(),
                kind: VariantKind::Pills,
            },
            CarouselItem {
                name: "Waves".to_string(),
                variants: ["Calm", "Swell"].map(String::from).to_vec(),
                kind: VariantKind::PillsWithPhase,
            },
        ],
        current_index: 0,
        current_variant_index: 2,
        extra_scalar: 0.5,
    }
}

/// Logs each visual change and tracks what is on display
#[derive(Debug, Default)]
pub struct LoggingView {
    menu: bool,
    panel: Option<String>,
    mood: Option<String>,
}

impl NavView for LoggingView {
    fn show_menu(&mut self) {
        info!("view: menu shown");
        self.menu = true;
    }

    fn hide_menu(&mut self) {
        self.menu = false;
        self.mood = None;
    }

    fn show_mood_mode(&mut self, mode: &str) {
        info!("view: mood mode {}", mode);
        self.mood = Some(mode.to_string());
    }

    fn show_panel(&mut self, panel_id: &str) {
        info!("view: panel {}", panel_id);
        self.panel = Some(panel_id.to_string());
    }

    fn hide_panel(&mut self) {
        self.panel = None;
    }

    fn show_idle(&mut self) {
        info!("view: idle");
        self.menu = false;
        self.panel = None;
        self.mood = None;
    }

    fn current_mood_mode(&self) -> Option<String> {
        self.mood.clone()
    }

    fn current_panel_id(&self) -> Option<String> {
        self.panel.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visor_core::SurfaceContext;

    #[test]
    fn test_populate_every_state() {
        let mut controller = StateController::new(SurfaceContext {
            calibration_enabled: true,
            ..SurfaceContext::default()
        });
        for state in ScreenState::ALL {
            assert!(controller.set_state(state));
            populate(&mut controller);
            assert_eq!(controller.state(), state);
        }
    }

    #[test]
    fn test_demo_carousel_indices_valid() {
        let data = carousel();
        let item = data.current_item().unwrap();
        assert!(data.current_variant_index < item.variants.len());
    }
}
