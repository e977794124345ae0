use std::f64::consts::TAU;

use log::debug;

use crate::device::{Device, FillRule};
use crate::error::Result;
use crate::geom::Point;

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointStyle {
    pub color: String,
    /// Stroke colour of the marker at the segment's end point.
    pub destination_color: String,
    pub fill: String,
    pub width: f64,
    pub radius: f64,
}

/// How the control overlay is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStyle {
    pub control_line: LineStyle,
    pub point: PointStyle,
}

impl Default for DebugStyle {
    fn default() -> Self {
        DebugStyle {
            control_line: LineStyle {
                color: "rgb(200,100,100)".to_string(),
                width: 0.5,
            },
            point: PointStyle {
                color: "rgb(200,50,50)".to_string(),
                destination_color: "#000".to_string(),
                fill: "white".to_string(),
                width: 1.0,
                radius: 1.0,
            },
        }
    }
}

/// A segment about to be drawn, in surface space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugSegment {
    pub from: Point,
    pub cp1: Option<Point>,
    pub cp2: Option<Point>,
    pub to: Point,
}

impl DebugSegment {
    pub fn line(from: Point, to: Point) -> Self {
        DebugSegment {
            from,
            cp1: None,
            cp2: None,
            to,
        }
    }

    pub fn quadratic(from: Point, cp: Point, to: Point) -> Self {
        DebugSegment {
            from,
            cp1: Some(cp),
            cp2: None,
            to,
        }
    }

    pub fn cubic(from: Point, cp1: Point, cp2: Point, to: Point) -> Self {
        DebugSegment {
            from,
            cp1: Some(cp1),
            cp2: Some(cp2),
            to,
        }
    }

    /// Points in drawing order: start, control points, end.
    pub fn points(&self) -> Vec<Point> {
        let mut points = vec![self.from];
        points.extend(self.cp1);
        points.extend(self.cp2);
        points.push(self.to);
        points
    }
}

/// Draws control lines and point markers for `segment` straight onto the
/// device, then re-opens a path at the segment start so the caller's next
/// path command continues from there.
pub(crate) fn draw_controls<D: Device>(
    device: &mut D,
    segment: &DebugSegment,
    style: &DebugStyle,
) -> Result<()> {
    device.save()?;
    let drawn = draw_markers(device, segment, style);
    let restored = device.restore();
    drawn?;
    restored?;
    device.begin_path()?;
    device.move_to(segment.from.x, segment.from.y)
}

fn draw_markers<D: Device>(device: &mut D, segment: &DebugSegment, style: &DebugStyle) -> Result<()> {
    device.set_stroke_style(&style.control_line.color);
    device.set_line_width(style.control_line.width);
    device.begin_path()?;
    if let Some(cp1) = segment.cp1 {
        device.move_to(segment.from.x, segment.from.y)?;
        device.line_to(cp1.x, cp1.y)?;
        if let Some(cp2) = segment.cp2 {
            device.line_to(cp2.x, cp2.y)?;
        }
        device.line_to(segment.to.x, segment.to.y)?;
    }
    device.stroke()?;

    let points = segment.points();
    let last = points.len() - 1;
    for (i, p) in points.iter().enumerate() {
        device.set_line_width(style.point.width);
        if i == last {
            device.set_stroke_style(&style.point.destination_color);
        } else {
            device.set_stroke_style(&style.point.color);
        }
        device.set_fill_style(&style.point.fill);
        device.begin_path()?;
        device.arc(p.x, p.y, style.point.radius, 0.0, TAU, true)?;
        device.fill(FillRule::NonZero)?;
        device.stroke()?;
    }
    debug!(
        "from points {}",
        points
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<String>>()
            .join(" to ")
    );
    Ok(())
}
