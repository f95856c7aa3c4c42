//! The calibration rectangle: which part of the mesh's UV space holds the surface
use std::fmt;
use std::str::FromStr;

use nalgebra::Point2;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace0, multispace1},
    combinator::all_consuming,
    number::complete::float,
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};

use crate::error::{Result, VisorError};

/// Smallest span an edited rectangle may shrink to on either axis
const MIN_SPAN: f32 = 0.01;

/// One of the four floats calibration mode can edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationEdge {
    MinX,
    MinY,
    MaxX,
    MaxY,
}

impl CalibrationEdge {
    pub const ALL: [CalibrationEdge; 4] = [
        CalibrationEdge::MinX,
        CalibrationEdge::MinY,
        CalibrationEdge::MaxX,
        CalibrationEdge::MaxY,
    ];

    /// Keys `1`..`4` select edges in the order listed in `ALL`
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1..=4 => Some(Self::ALL[digit as usize - 1]),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CalibrationEdge::MinX => "uv_min.x",
            CalibrationEdge::MinY => "uv_min.y",
            CalibrationEdge::MaxX => "uv_max.x",
            CalibrationEdge::MaxY => "uv_max.y",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceCalibration {
    pub uv_min: Point2<f32>,
    pub uv_max: Point2<f32>,
}

impl SurfaceCalibration {
    /// Build a rectangle, rejecting empty, inverted or non-finite ones
    pub fn new(uv_min: Point2<f32>, uv_max: Point2<f32>) -> Result<Self> {
        let finite = [uv_min.x, uv_min.y, uv_max.x, uv_max.y]
            .iter()
            .all(|v| v.is_finite());
        if !finite || uv_max.x <= uv_min.x || uv_max.y <= uv_min.y {
            return Err(VisorError::CalibrationRange {
                min_x: uv_min.x,
                min_y: uv_min.y,
                max_x: uv_max.x,
                max_y: uv_max.y,
            });
        }
        Ok(Self { uv_min, uv_max })
    }

    /// The whole texture
    pub fn full() -> Self {
        Self {
            uv_min: Point2::new(0.0, 0.0),
            uv_max: Point2::new(1.0, 1.0),
        }
    }

    pub fn contains(&self, uv: &Point2<f32>) -> bool {
        (self.uv_min.x..=self.uv_max.x).contains(&uv.x)
            && (self.uv_min.y..=self.uv_max.y).contains(&uv.y)
    }

    /// UV inside the rectangle → (u, v) in [0, 1]²
    pub fn normalize(&self, uv: &Point2<f32>) -> (f32, f32) {
        (
            (uv.x - self.uv_min.x) / (self.uv_max.x - self.uv_min.x),
            (uv.y - self.uv_min.y) / (self.uv_max.y - self.uv_min.y),
        )
    }

    /// Inverse of `normalize`
    pub fn denormalize(&self, u: f32, v: f32) -> Point2<f32> {
        Point2::new(
            self.uv_min.x + u * (self.uv_max.x - self.uv_min.x),
            self.uv_min.y + v * (self.uv_max.y - self.uv_min.y),
        )
    }

    pub fn get(&self, edge: CalibrationEdge) -> f32 {
        match edge {
            CalibrationEdge::MinX => self.uv_min.x,
            CalibrationEdge::MinY => self.uv_min.y,
            CalibrationEdge::MaxX => self.uv_max.x,
            CalibrationEdge::MaxY => self.uv_max.y,
        }
    }

    /// Move one edge by `delta`, staying inside [0, 1] and never
    /// crossing the opposite edge.
    pub fn nudge(&mut self, edge: CalibrationEdge, delta: f32) {
        // Bounds can cross for rectangles outside [0, 1]; clamp would panic
        match edge {
            CalibrationEdge::MinX => {
                self.uv_min.x = (self.uv_min.x + delta).min(self.uv_max.x - MIN_SPAN).max(0.0)
            }
            CalibrationEdge::MinY => {
                self.uv_min.y = (self.uv_min.y + delta).min(self.uv_max.y - MIN_SPAN).max(0.0)
            }
            CalibrationEdge::MaxX => {
                self.uv_max.x = (self.uv_max.x + delta).max(self.uv_min.x + MIN_SPAN).min(1.0)
            }
            CalibrationEdge::MaxY => {
                self.uv_max.y = (self.uv_max.y + delta).max(self.uv_min.y + MIN_SPAN).min(1.0)
            }
        }
    }
}

impl Default for SurfaceCalibration {
    fn default() -> Self {
        Self::full()
    }
}

/// The line emitted by the calibration copy key; `FromStr` reads it back
impl fmt::Display for SurfaceCalibration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "uv_min={:.4},{:.4} uv_max={:.4},{:.4}",
            self.uv_min.x, self.uv_min.y, self.uv_max.x, self.uv_max.y
        )
    }
}

impl FromStr for SurfaceCalibration {
    type Err = VisorError;

    /// Accepts `uv_min=x,y uv_max=x,y` or four bare floats separated by
    /// whitespace or commas.
    fn from_str(line: &str) -> Result<Self> {
        let (_, (min_x, min_y, max_x, max_y)) =
            all_consuming(delimited(multispace0, alt((labelled, bare)), multispace0))(line)
                .map_err(|_| VisorError::CalibrationSyntax(line.to_string()))?;
        Self::new(Point2::new(min_x, min_y), Point2::new(max_x, max_y))
    }
}

type Corners = (f32, f32, f32, f32);

fn pair(input: &str) -> IResult<&str, (f32, f32)> {
    separated_pair(float, char(','), float)(input)
}

fn labelled(input: &str) -> IResult<&str, Corners> {
    let (input, (min, max)) = separated_pair(
        preceded(tag("uv_min="), pair),
        multispace1,
        preceded(tag("uv_max="), pair),
    )(input)?;
    Ok((input, (min.0, min.1, max.0, max.1)))
}

fn separator(input: &str) -> IResult<&str, ()> {
    let (input, _) = alt((delimited(multispace0, tag(","), multispace0), multispace1))(input)?;
    Ok((input, ()))
}

fn bare(input: &str) -> IResult<&str, Corners> {
    let (input, (a, _, b, _, c, _, d)) =
        tuple((float, separator, float, separator, float, separator, float))(input)?;
    Ok((input, (a, b, c, d)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parses_back() {
        let calibration =
            SurfaceCalibration::new(Point2::new(0.093, 0.247), Point2::new(0.907, 0.753)).unwrap();
        let line = calibration.to_string();
        assert_eq!(line, "uv_min=0.0930,0.2470 uv_max=0.9070,0.7530");
        let parsed: SurfaceCalibration = line.parse().unwrap();
        assert!((parsed.uv_min - calibration.uv_min).norm() < 1e-4);
        assert!((parsed.uv_max - calibration.uv_max).norm() < 1e-4);
    }

    #[test]
    fn test_bare_floats() {
        let parsed: SurfaceCalibration = " 0.1 0.2, 0.9,0.8 ".parse().unwrap();
        assert_eq!(parsed.uv_min, Point2::new(0.1, 0.2));
        assert_eq!(parsed.uv_max, Point2::new(0.9, 0.8));
    }

    #[test]
    fn test_rejects_garbage_and_inverted() {
        assert!(matches!(
            "uv_min=0.1".parse::<SurfaceCalibration>(),
            Err(VisorError::CalibrationSyntax(_))
        ));
        assert!(matches!(
            "0.9 0.2 0.1 0.8".parse::<SurfaceCalibration>(),
            Err(VisorError::CalibrationRange { .. })
        ));
    }

    #[test]
    fn test_normalize_inverts_denormalize() {
        let calibration =
            SurfaceCalibration::new(Point2::new(0.2, 0.1), Point2::new(0.6, 0.9)).unwrap();
        let uv = calibration.denormalize(0.25, 0.5);
        assert!((uv - Point2::new(0.3, 0.5)).norm() < 1e-6);
        let (u, v) = calibration.normalize(&uv);
        assert!((u - 0.25).abs() < 1e-6);
        assert!((v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_nudge_keeps_rectangle_valid() {
        let mut calibration = SurfaceCalibration::full();
        calibration.nudge(CalibrationEdge::MinX, 0.25);
        assert!((calibration.uv_min.x - 0.25).abs() < 1e-6);

        calibration.nudge(CalibrationEdge::MaxX, -5.0);
        assert!((calibration.uv_max.x - 0.26).abs() < 1e-6);

        calibration.nudge(CalibrationEdge::MinY, -1.0);
        assert_eq!(calibration.uv_min.y, 0.0);
        assert_eq!(CalibrationEdge::from_digit(4), Some(CalibrationEdge::MaxY));
        assert_eq!(CalibrationEdge::from_digit(5), None);
    }
}
