use super::{cancel_band, content_area, FrameInfo};
use crate::hit::{HitRegion, Rect};
use crate::state::MeditationData;
use crate::surface::{Surface, GLYPH_SIZE};
use crate::theme;

const DOT_RADIUS: f32 = 6.0;
const DOT_GAP: f32 = 10.0;

/// Which arrangement the top of the meditation screen uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeditationLayout {
    /// Phase label left, countdown right
    Countdown(u32),
    /// No countdown: centered wrapped message
    Message,
}

pub fn meditation_layout(data: &MeditationData) -> MeditationLayout {
    match data.timer {
        Some(seconds) if seconds > 0 => MeditationLayout::Countdown(seconds),
        _ => MeditationLayout::Message,
    }
}

pub(super) fn draw(
    surface: &mut Surface,
    data: &MeditationData,
    frame: &FrameInfo,
) -> Vec<HitRegion> {
    let area = content_area(surface);
    let dots_h = (DOT_RADIUS * 2.0 + theme::MARGIN as f32 * 2.0) as i32;
    let top = Rect::new(area.x, area.y, area.w, area.h - dots_h);

    match meditation_layout(data) {
        MeditationLayout::Countdown(seconds) => {
            let label_y = top.y + top.h / 2 - GLYPH_SIZE * theme::TEXT_SCALE / 2;
            surface.text(
                top.x + theme::MARGIN * 2,
                label_y,
                &data.phase,
                theme::TEXT_SCALE,
                theme::FOREGROUND,
            );
            let number_y = top.y + top.h / 2 - GLYPH_SIZE * theme::LARGE_TEXT_SCALE / 2;
            surface.text_right(
                top.right() - theme::MARGIN * 2,
                number_y,
                &seconds.to_string(),
                theme::LARGE_TEXT_SCALE,
                theme::ACCENT,
            );
        }
        MeditationLayout::Message => {
            let text = if data.message.is_empty() {
                &data.phase
            } else {
                &data.message
            };
            surface.text_wrapped(
                top.inset(theme::MARGIN),
                text,
                theme::TEXT_SCALE,
                theme::FOREGROUND,
            );
        }
    }

    draw_cycle_dots(surface, data, Rect::new(area.x, top.bottom(), area.w, dots_h));

    vec![cancel_band(surface, frame)]
}

fn draw_cycle_dots(surface: &mut Surface, data: &MeditationData, row: Rect) {
    let count = data.max_cycles;
    if count == 0 {
        return;
    }
    let pitch = DOT_RADIUS * 2.0 + DOT_GAP;
    let span = pitch * count as f32 - DOT_GAP;
    let (cx, cy) = row.center();
    let first = cx as f32 - span / 2.0 + DOT_RADIUS;

    for i in 0..count {
        let colour = if i < data.cycle {
            theme::DOT_DONE
        } else if i == data.cycle {
            theme::DOT_CURRENT
        } else {
            theme::DOT_FUTURE
        };
        surface.fill_circle(first + i as f32 * pitch, cy as f32, DOT_RADIUS, colour);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_selection() {
        let mut data = MeditationData {
            phase: "Inhale".into(),
            timer: Some(4),
            cycle: 1,
            max_cycles: 5,
            message: String::new(),
        };
        assert_eq!(meditation_layout(&data), MeditationLayout::Countdown(4));
        data.timer = Some(0);
        assert_eq!(meditation_layout(&data), MeditationLayout::Message);
        data.timer = None;
        assert_eq!(meditation_layout(&data), MeditationLayout::Message);
    }
}
