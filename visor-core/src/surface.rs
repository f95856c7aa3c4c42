//! The 2D pixel buffer shown on the display mesh, plus drawing primitives.
//!
//! Pixels are packed ARGB (`0xAARRGGBB`). Every primitive clips to the
//! buffer, so callers can draw partially off-surface without checks.
use font8x8::legacy::BASIC_LEGACY;

use crate::hit::Rect;

pub const GLYPH_SIZE: i32 = 8;

pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
    dirty: bool,
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
            dirty: true,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width + x as usize])
    }

    /// Flag the texture for re-upload by the 3D consumer
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether a re-upload is needed and clears the flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// RGBA bytes for texture upload
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for &argb in &self.pixels {
            let [a, r, g, b] = argb.to_be_bytes();
            bytes.extend_from_slice(&[r, g, b, a]);
        }
        bytes
    }

    pub fn clear(&mut self, colour: u32) {
        self.pixels.fill(colour);
    }

    #[inline]
    fn put(&mut self, x: i32, y: i32, colour: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = colour;
        }
    }

    fn clip(&self, rect: Rect) -> Option<(usize, usize, usize, usize)> {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.right().min(self.width as i32);
        let y1 = rect.bottom().min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }

    pub fn fill_rect(&mut self, rect: Rect, colour: u32) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            self.pixels[y * self.width + x0..y * self.width + x1].fill(colour);
        }
    }

    pub fn stroke_rect(&mut self, rect: Rect, thickness: i32, colour: u32) {
        let t = thickness.min(rect.w / 2).min(rect.h / 2).max(1);
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, t), colour);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - t, rect.w, t), colour);
        self.fill_rect(Rect::new(rect.x, rect.y, t, rect.h), colour);
        self.fill_rect(Rect::new(rect.right() - t, rect.y, t, rect.h), colour);
    }

    /// Blend every pixel in `rect` toward white by `amount` (0..1)
    pub fn brighten_rect(&mut self, rect: Rect, amount: f32) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            for px in &mut self.pixels[y * self.width + x0..y * self.width + x1] {
                *px = lerp_colour(*px, 0xFF_FF_FF_FF, amount);
            }
        }
    }

    /// Left-to-right gradient through evenly spaced colour stops
    pub fn gradient_rect(&mut self, rect: Rect, stops: &[u32]) {
        match stops {
            [] => {}
            [only] => self.fill_rect(rect, *only),
            _ => {
                let Some((x0, y0, x1, y1)) = self.clip(rect) else {
                    return;
                };
                for x in x0..x1 {
                    let t = (x as f32 - rect.x as f32) / (rect.w - 1).max(1) as f32;
                    let colour = sample_stops(stops, t);
                    for y in y0..y1 {
                        self.pixels[y * self.width + x] = colour;
                    }
                }
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, colour: u32) {
        let r2 = radius * radius;
        let (x0, x1) = ((cx - radius).floor() as i32, (cx + radius).ceil() as i32);
        let (y0, y1) = ((cy - radius).floor() as i32, (cy + radius).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.put(x, y, colour);
                }
            }
        }
    }

    pub fn ring(&mut self, cx: f32, cy: f32, radius: f32, thickness: f32, colour: u32) {
        let outer = radius * radius;
        let inner = (radius - thickness).max(0.0).powi(2);
        let (x0, x1) = ((cx - radius).floor() as i32, (cx + radius).ceil() as i32);
        let (y0, y1) = ((cy - radius).floor() as i32, (cy + radius).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let d2 = dx * dx + dy * dy;
                if d2 <= outer && d2 >= inner {
                    self.put(x, y, colour);
                }
            }
        }
    }

    /// Draw `text` with its top-left corner at (x, y)
    pub fn text(&mut self, x: i32, y: i32, text: &str, scale: i32, colour: u32) {
        let scale = scale.max(1);
        for (col, ch) in text.chars().enumerate() {
            let glyph = glyph_for_char(ch);
            let glyph_x = x + col as i32 * GLYPH_SIZE * scale;
            for (row, bits) in glyph.iter().enumerate() {
                for bit in 0..GLYPH_SIZE {
                    if (bits >> bit) & 0x01 == 0 {
                        continue;
                    }
                    self.fill_rect(
                        Rect::new(
                            glyph_x + bit * scale,
                            y + row as i32 * scale,
                            scale,
                            scale,
                        ),
                        colour,
                    );
                }
            }
        }
    }

    /// Draw `text` centered inside `rect`
    pub fn text_centered(&mut self, rect: Rect, text: &str, scale: i32, colour: u32) {
        let (cx, cy) = rect.center();
        let x = cx - text_width(text, scale) / 2;
        let y = cy - GLYPH_SIZE * scale.max(1) / 2;
        self.text(x, y, text, scale, colour);
    }

    /// Draw `text` with its right edge at `right`
    pub fn text_right(&mut self, right: i32, y: i32, text: &str, scale: i32, colour: u32) {
        self.text(right - text_width(text, scale), y, text, scale, colour);
    }

    /// Word-wrap into `rect` and center each line; returns lines drawn
    pub fn text_wrapped(&mut self, rect: Rect, text: &str, scale: i32, colour: u32) -> usize {
        let line_height = GLYPH_SIZE * scale.max(1) + scale.max(1) * 2;
        let max_lines = (rect.h / line_height.max(1)).max(0) as usize;
        let lines = wrap_text(text, rect.w, scale);
        let shown = lines.len().min(max_lines);
        let block = shown as i32 * line_height;
        let mut y = rect.y + (rect.h - block) / 2;
        for line in lines.iter().take(shown) {
            self.text_centered(Rect::new(rect.x, y, rect.w, line_height), line, scale, colour);
            y += line_height;
        }
        shown
    }
}

fn glyph_for_char(ch: char) -> [u8; 8] {
    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}

pub fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * GLYPH_SIZE * scale.max(1)
}

/// Greedy word wrap by pixel width. Words longer than a line are split.
pub fn wrap_text(text: &str, max_width: i32, scale: i32) -> Vec<String> {
    let max_chars = (max_width / (GLYPH_SIZE * scale.max(1))).max(1) as usize;
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if line.is_empty() {
            word.len()
        } else {
            line.chars().count() + 1 + word.len()
        };
        if needed > max_chars {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.extend(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

pub fn lerp_colour(from: u32, to: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let a = from.to_be_bytes();
    let b = to.to_be_bytes();
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8;
    }
    u32::from_be_bytes(out)
}

/// Colour at `t` (0..1) along evenly spaced stops
pub fn sample_stops(stops: &[u32], t: f32) -> u32 {
    match stops {
        [] => 0,
        [only] => *only,
        _ => {
            let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
            let i = (scaled.floor() as usize).min(stops.len() - 2);
            lerp_colour(stops[i], stops[i + 1], scaled - i as f32)
        }
    }
}
