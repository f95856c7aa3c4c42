//! Listening, processing and speaking: a cancel band plus one animation each
use std::f32::consts::TAU;

use super::{cancel_band, content_area, FrameInfo};
use crate::hit::{HitRegion, Rect};
use crate::state::SpeakingData;
use crate::surface::{lerp_colour, Surface, GLYPH_SIZE};
use crate::theme;

const BAR_COUNT: i32 = 16;
const WAVE_SPEED: f32 = 0.15;
const WAVE_SPREAD: f32 = 0.6;
const SPINNER_DOTS: usize = 8;
const SPINNER_SPEED: f32 = 0.12;
const PROGRESS_HEIGHT: i32 = 8;

/// Bar height as a share of the available height, in [0.3, 1]
pub(super) fn wave_height(frame: u64, bar: i32) -> f32 {
    0.3 + 0.7 * (frame as f32 * WAVE_SPEED + bar as f32 * WAVE_SPREAD).sin().abs()
}

pub(super) fn draw_listening(surface: &mut Surface, frame: &FrameInfo) -> Vec<HitRegion> {
    let area = content_area(surface);
    let label_h = GLYPH_SIZE * theme::TEXT_SCALE + theme::MARGIN * 2;
    surface.text_centered(
        Rect::new(area.x, area.y, area.w, label_h),
        "Listening",
        theme::TEXT_SCALE,
        theme::DIM_TEXT,
    );

    let waves = Rect::new(
        area.x,
        area.y + label_h,
        area.w,
        area.h - label_h - theme::MARGIN,
    )
    .inset(theme::MARGIN);
    let slot = waves.w / BAR_COUNT;
    let (_, mid) = waves.center();
    for i in 0..BAR_COUNT {
        let bar_h = (wave_height(frame.frame, i) * waves.h as f32).round() as i32;
        surface.fill_rect(
            Rect::new(
                waves.x + i * slot + slot / 4,
                mid - bar_h / 2,
                (slot / 2).max(1),
                bar_h,
            ),
            theme::ACCENT,
        );
    }

    vec![cancel_band(surface, frame)]
}

pub(super) fn draw_processing(surface: &mut Surface, frame: &FrameInfo) -> Vec<HitRegion> {
    let area = content_area(surface);
    let (cx, cy) = area.center();
    let radius = area.h.min(area.w) as f32 * 0.28;
    let phase = frame.frame as f32 * SPINNER_SPEED;

    for i in 0..SPINNER_DOTS {
        let angle = phase + i as f32 * TAU / SPINNER_DOTS as f32;
        // Dot 0 leads; the rest trail off
        let fade = 1.0 - i as f32 / SPINNER_DOTS as f32;
        surface.fill_circle(
            cx as f32 + radius * angle.cos(),
            cy as f32 + radius * angle.sin(),
            3.0 + 4.0 * fade,
            lerp_colour(theme::ACCENT_SOFT, theme::ACCENT, fade),
        );
    }
    surface.text_centered(
        Rect::new(area.x, cy - GLYPH_SIZE, area.w, GLYPH_SIZE * 2),
        "Thinking",
        1,
        theme::DIM_TEXT,
    );

    vec![cancel_band(surface, frame)]
}

pub(super) fn draw_speaking(
    surface: &mut Surface,
    data: &SpeakingData,
    frame: &FrameInfo,
) -> Vec<HitRegion> {
    let area = content_area(surface);
    let inner_w = area.w - theme::MARGIN * 2;
    let bar_y = area.bottom() - theme::MARGIN - PROGRESS_HEIGHT;
    let text = Rect::new(
        area.x + theme::MARGIN,
        area.y + theme::MARGIN,
        inner_w,
        bar_y - area.y - theme::MARGIN * 2,
    );
    surface.text_wrapped(text, &data.text, theme::TEXT_SCALE, theme::FOREGROUND);

    let track = Rect::new(area.x + theme::MARGIN, bar_y, inner_w, PROGRESS_HEIGHT);
    surface.fill_rect(track, theme::ACCENT_SOFT);
    let filled = (data.progress.clamp(0.0, 1.0) * track.w as f32).round() as i32;
    surface.fill_rect(Rect::new(track.x, track.y, filled, track.h), theme::ACCENT);

    vec![cancel_band(surface, frame)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_height_range() {
        for frame in 0..200 {
            for bar in 0..BAR_COUNT {
                let h = wave_height(frame, bar);
                assert!((0.3..=1.0).contains(&h));
            }
        }
    }
}
