use super::FrameInfo;
use crate::hit::{HitRegion, Rect, RegionAction, Transport};
use crate::state::MusicData;
use crate::surface::{lerp_colour, Surface, GLYPH_SIZE};
use crate::theme;

/// `m:ss`, negative and non-finite inputs read as zero
pub fn format_time(seconds: f32) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

pub(super) fn draw(surface: &mut Surface, data: &MusicData, frame: &FrameInfo) -> Vec<HitRegion> {
    let w = surface.width() as i32;
    let h = surface.height() as i32;

    let label = Rect::new(0, theme::MARGIN, w, GLYPH_SIZE * theme::TEXT_SCALE * 2);
    let track = if data.track_name.is_empty() {
        "Nothing playing"
    } else {
        data.track_name.as_str()
    };
    surface.text_centered(label, track, theme::TEXT_SCALE, theme::FOREGROUND);

    let radius = (w.min(h) as f32 * 0.14).max(8.0);
    let cy = h as f32 * 0.5;
    let controls = [
        (Transport::Previous, w as f32 * 0.25, radius * 0.8),
        (Transport::PlayPause, w as f32 * 0.5, radius),
        (Transport::Next, w as f32 * 0.75, radius * 0.8),
    ];

    let mut regions = Vec::with_capacity(controls.len());
    for (transport, cx, r) in controls {
        let action = RegionAction::Transport(transport);
        let fill = if transport == Transport::PlayPause {
            theme::ACCENT
        } else {
            theme::BUTTON_FILL
        };
        let flash = frame.flash(&action);
        surface.fill_circle(cx, cy, r, lerp_colour(fill, 0xFF_FF_FF_FF, flash));
        surface.ring(cx, cy, r, 2.0, theme::BUTTON_EDGE);
        draw_glyph(surface, transport, data.is_playing, cx, cy, r);

        let reach = r.ceil() as i32;
        let rect = Rect::new(cx as i32 - reach, cy as i32 - reach, reach * 2, reach * 2);
        regions.push(HitRegion::new(rect, action));
    }

    // Progress line and time text
    let bar = Rect::new(
        theme::MARGIN * 3,
        (h as f32 * 0.78).round() as i32,
        w - theme::MARGIN * 6,
        4,
    );
    surface.fill_rect(bar, theme::ACCENT_SOFT);
    if data.duration > 0.0 {
        let done = (data.current_time / data.duration).clamp(0.0, 1.0);
        let filled = (bar.w as f32 * done).round() as i32;
        surface.fill_rect(Rect::new(bar.x, bar.y, filled, bar.h), theme::ACCENT);
    }
    let time = format!(
        "{} / {}",
        format_time(data.current_time),
        format_time(data.duration)
    );
    let row_h = GLYPH_SIZE * theme::TEXT_SCALE;
    let time_row = Rect::new(0, bar.bottom() + theme::MARGIN, w, row_h);
    surface.text_centered(time_row, &time, theme::TEXT_SCALE, theme::DIM_TEXT);

    regions
}

fn draw_glyph(
    surface: &mut Surface,
    transport: Transport,
    playing: bool,
    cx: f32,
    cy: f32,
    r: f32,
) {
    let s = (r * 0.35).round() as i32;
    let (x, y) = (cx.round() as i32, cy.round() as i32);
    let bar = s / 3 + 1;
    match transport {
        Transport::Previous => {
            surface.fill_rect(Rect::new(x - s, y - s, bar, s * 2), theme::FOREGROUND);
            triangle(surface, x + s, y, s, -1);
        }
        Transport::Next => {
            surface.fill_rect(Rect::new(x + s - bar, y - s, bar, s * 2), theme::FOREGROUND);
            triangle(surface, x - s, y, s, 1);
        }
        Transport::PlayPause if playing => {
            let thick = (s * 2 / 3).max(2);
            surface.fill_rect(Rect::new(x - s, y - s, thick, s * 2), theme::FOREGROUND);
            surface.fill_rect(Rect::new(x + s - thick, y - s, thick, s * 2), theme::FOREGROUND);
        }
        Transport::PlayPause => triangle(surface, x - s / 2, y, s, 1),
    }
}

/// Filled arrowhead of half-height `s` whose base sits at `x`, pointing
/// along `dir` (+1 right, -1 left)
fn triangle(surface: &mut Surface, x: i32, y: i32, s: i32, dir: i32) {
    for dx in 0..=s * 3 / 2 {
        let half = s - dx * 2 / 3;
        if half < 0 {
            break;
        }
        let column = Rect::new(x + dx * dir, y - half, 1, half * 2 + 1);
        surface.fill_rect(column, theme::FOREGROUND);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::SurfaceCalibration;
    use crate::feedback::PressFeedback;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.9), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f32::NAN), "0:00");
    }

    #[test]
    fn test_transport_regions_in_order() {
        let calibration = SurfaceCalibration::full();
        let feedback = PressFeedback::new("next", 0, 200);
        let frame = FrameInfo {
            frame: 0,
            now_ms: 50,
            feedback: Some(&feedback),
            calibration: &calibration,
        };
        let mut surface = Surface::new(480, 320);
        let regions = draw(&mut surface, &MusicData::default(), &frame);
        let names: Vec<_> = regions.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["prev", "play_pause", "next"]);
        assert!(regions[0].rect.right() <= regions[1].rect.x);
        assert!(regions[1].rect.right() <= regions[2].rect.x);
    }
}
