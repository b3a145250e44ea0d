//! Grid snapping and background grid generation.
//!
//! All placements and drags land on grid intersections. The minor pitch is
//! the snapping unit; major lines are drawn every `major_every` cells and
//! carry no snapping meaning of their own.

use crate::error::EditorError;
use kurbo::{Line, Point};
use serde::{Deserialize, Serialize};

/// Tolerance for deciding whether a coordinate already sits on the grid.
const GRID_EPSILON: f64 = 1e-6;

/// How the background grid is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridStyle {
    None,
    #[default]
    Lines,
    Dots,
}

impl GridStyle {
    /// None → Lines → Dots → None.
    pub fn cycle(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::Dots,
            GridStyle::Dots => GridStyle::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GridStyle::None => "none",
            GridStyle::Lines => "lines",
            GridStyle::Dots => "dots",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Minor grid spacing in canvas units.
    pub pitch: f64,
    /// Number of minor cells between major lines.
    pub major_every: u32,
    pub style: GridStyle,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            pitch: 10.0,
            major_every: 5,
            style: GridStyle::Lines,
        }
    }
}

impl GridConfig {
    /// # Errors
    /// Returns `InvalidGridPitch` for a zero, negative or non-finite pitch.
    pub fn validate(&self) -> Result<(), EditorError> {
        if !self.pitch.is_finite() || self.pitch <= 0.0 {
            return Err(EditorError::InvalidGridPitch(self.pitch));
        }
        Ok(())
    }

    pub fn major_pitch(&self) -> f64 {
        self.pitch * f64::from(self.major_every.max(1))
    }
}

/// Round each axis independently to the nearest multiple of `pitch`.
///
/// `pitch` must be positive; callers validate it once through
/// [`GridConfig::validate`].
#[must_use]
pub fn snap(point: Point, pitch: f64) -> Point {
    debug_assert!(pitch > 0.0, "grid pitch must be positive");
    Point::new(snap_axis(point.x, pitch), snap_axis(point.y, pitch))
}

/// Snap a pointer position reported in zoomed screen space.
///
/// The host divides nothing itself: `screen / (pitch * scale)` is rounded and
/// scaled back by `pitch`, giving canvas coordinates.
#[must_use]
pub fn snap_scaled(screen: Point, pitch: f64, scale: f64) -> Point {
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };
    let step = pitch * scale;
    Point::new(
        (screen.x / step).round() * pitch,
        (screen.y / step).round() * pitch,
    )
}

fn snap_axis(v: f64, pitch: f64) -> f64 {
    (v / pitch).round() * pitch
}

/// Whether both coordinates are (within floating-point noise) multiples of `pitch`.
pub fn is_on_grid(point: Point, pitch: f64) -> bool {
    let on_axis = |v: f64| {
        let cells = v / pitch;
        (cells - cells.round()).abs() < GRID_EPSILON
    };
    on_axis(point.x) && on_axis(point.y)
}

/// # Errors
/// Returns `InvalidGridPosition` when `point` is off the grid.
pub fn require_on_grid(point: Point, pitch: f64) -> Result<(), EditorError> {
    if is_on_grid(point, pitch) {
        Ok(())
    } else {
        Err(EditorError::InvalidGridPosition {
            x: point.x,
            y: point.y,
            pitch,
        })
    }
}

// ─── Background grid ─────────────────────────────────────────────────────

/// Dash pattern for the dotted style: `(dash, gap, offset)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub dash: f64,
    pub gap: f64,
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub line: Line,
    pub major: bool,
    pub width: f64,
    pub dash: Option<Dash>,
}

/// Generate the background grid covering `width × height`.
///
/// Minor lines come first, then major lines, vertical before horizontal
/// within each pass, so major lines paint on top.
pub fn grid_lines(width: f64, height: f64, config: &GridConfig) -> Vec<GridLine> {
    if config.style == GridStyle::None || config.validate().is_err() {
        return Vec::new();
    }

    let minor = config.pitch;
    let major = config.major_pitch();
    let dots = config.style == GridStyle::Dots;

    let minor_dash = dots.then(|| Dash {
        dash: minor * 0.1,
        gap: minor * 0.9,
        offset: minor * 0.05,
    });
    let major_dash = dots.then(|| Dash {
        dash: major * 0.05,
        gap: major * 0.95,
        offset: major * 0.025,
    });

    let mut lines = Vec::new();
    for (step, is_major, w, dash) in [
        (minor, false, 0.5, minor_dash),
        (major, true, 1.0, major_dash),
    ] {
        let mut x = 0.0;
        while x < width {
            lines.push(GridLine {
                line: Line::new((x, 0.0), (x, height)),
                major: is_major,
                width: w,
                dash,
            });
            x += step;
        }
        let mut y = 0.0;
        while y < height {
            lines.push(GridLine {
                line: Line::new((0.0, y), (width, y)),
                major: is_major,
                width: w,
                dash,
            });
            y += step;
        }
    }
    lines
}
