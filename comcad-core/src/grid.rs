//! Infinite two-tier grid clipped to the visible rectangle.

use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_GRID_SPACING, DEFAULT_MAJOR_EVERY, MAX_LINES_PER_AXIS, MAX_LOD_STEPS,
    MIN_GRID_SPACING,
};
use crate::error::{CadError, Result};
use crate::geometry::{Point, Rect, Segment};
use crate::view::ViewTransform;

/// Axes denser than this produce no lines at all.
const HARD_LINE_LIMIT: f64 = 1_000_000.0;

/// Where major line counting starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridAnchor {
    /// Index 0 is the first line at or before the visible rectangle's minimum.
    #[default]
    Viewport,
    /// Index 0 is the world origin; major lines do not move while panning.
    World,
}

/// Grid line spacing and major/minor classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    minor_spacing: f64,
    major_every: u32,
    anchor: GridAnchor,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            minor_spacing: DEFAULT_GRID_SPACING,
            major_every: DEFAULT_MAJOR_EVERY,
            anchor: GridAnchor::Viewport,
        }
    }
}

impl GridSpec {
    /// Create a grid spec, rejecting spacing <= 0 and a zero major interval.
    pub fn new(minor_spacing: f64, major_every: u32) -> Result<Self> {
        if !minor_spacing.is_finite() || minor_spacing <= 0.0 {
            return Err(CadError::InvalidGridSpacing {
                spacing: minor_spacing,
            });
        }
        if major_every == 0 {
            return Err(CadError::InvalidMajorEvery { major_every });
        }
        Ok(Self {
            minor_spacing,
            major_every,
            anchor: GridAnchor::Viewport,
        })
    }

    /// Create a grid spec, clamping invalid values to the nearest safe ones.
    pub fn clamped(minor_spacing: f64, major_every: u32) -> Self {
        let minor_spacing = if minor_spacing.is_finite() {
            minor_spacing.max(MIN_GRID_SPACING)
        } else {
            tracing::warn!("Non-finite grid spacing, using {}", DEFAULT_GRID_SPACING);
            DEFAULT_GRID_SPACING
        };
        Self {
            minor_spacing,
            major_every: major_every.max(1),
            anchor: GridAnchor::Viewport,
        }
    }

    pub fn with_anchor(mut self, anchor: GridAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn minor_spacing(&self) -> f64 {
        self.minor_spacing
    }

    pub fn major_every(&self) -> u32 {
        self.major_every
    }

    pub fn anchor(&self) -> GridAnchor {
        self.anchor
    }

    /// The same lattice with every line spaced `major_every` times further apart.
    fn coarsened(&self) -> Self {
        let factor = f64::from(self.major_every.max(2));
        Self {
            minor_spacing: self.minor_spacing * factor,
            ..*self
        }
    }
}

/// Which coordinate a grid line holds constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Constant x, spans the visible height.
    Vertical,
    /// Constant y, spans the visible width.
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    Major,
    Minor,
}

/// One grid line in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub axis: Axis,
    pub kind: LineKind,
    /// The x (vertical) or y (horizontal) the line sits on.
    pub coordinate: f64,
    pub segment: Segment,
}

impl GridLine {
    pub fn is_major(&self) -> bool {
        self.kind == LineKind::Major
    }
}

/// Generate the grid lines covering `visible`.
///
/// Lines start at the largest multiple of the spacing not greater than the
/// rectangle's minimum and stop at the last one not greater than its maximum.
/// A zero-size or non-finite rectangle produces no lines.
pub fn lines(visible: Rect, spec: &GridSpec) -> Vec<GridLine> {
    if visible.is_degenerate() {
        return Vec::new();
    }

    let mut out = Vec::new();
    axis_lines(Axis::Vertical, visible, spec, &mut out);
    axis_lines(Axis::Horizontal, visible, spec, &mut out);
    out
}

/// Grid lines for the current view, coarsened so minor lines are at least
/// `min_pixel_spacing` apart on screen and capped per axis.
pub fn lines_for_view(
    view: &ViewTransform,
    spec: &GridSpec,
    min_pixel_spacing: f64,
) -> Vec<GridLine> {
    let mut effective = *spec;
    let mut steps = 0;
    while effective.minor_spacing * view.scale() < min_pixel_spacing && steps < MAX_LOD_STEPS {
        effective = effective.coarsened();
        steps += 1;
    }

    let visible = view.visible_rect();
    let per_axis = (visible.width().max(visible.height()) / effective.minor_spacing).ceil() + 1.0;
    if !per_axis.is_finite() || per_axis > MAX_LINES_PER_AXIS as f64 {
        tracing::debug!(
            "Grid too dense at scale {:.4} ({} lines per axis), skipping",
            view.scale(),
            per_axis
        );
        return Vec::new();
    }

    if steps > 0 {
        tracing::trace!(
            "Grid coarsened {} step(s) to spacing {}",
            steps,
            effective.minor_spacing
        );
    }
    lines(visible, &effective)
}

fn axis_lines(axis: Axis, visible: Rect, spec: &GridSpec, out: &mut Vec<GridLine>) {
    let spacing = spec.minor_spacing;
    let (min, max) = match axis {
        Axis::Vertical => (visible.min.x, visible.max.x),
        Axis::Horizontal => (visible.min.y, visible.max.y),
    };

    let first_index = (min / spacing).floor();
    let start = first_index * spacing;
    let count = ((max - start) / spacing).floor();
    if !count.is_finite() || count < 0.0 {
        return;
    }
    if count > HARD_LINE_LIMIT {
        tracing::warn!(
            "Refusing to generate {} grid lines at spacing {}",
            count,
            spacing
        );
        return;
    }

    let major_every = i64::from(spec.major_every);
    let first_index = first_index as i64;
    out.reserve(count as usize + 1);

    for i in 0..=count as i64 {
        let coordinate = start + i as f64 * spacing;
        if coordinate > max {
            break;
        }

        let lattice_index = match spec.anchor {
            GridAnchor::Viewport => i,
            GridAnchor::World => first_index + i,
        };
        let kind = if lattice_index.rem_euclid(major_every) == 0 {
            LineKind::Major
        } else {
            LineKind::Minor
        };

        let segment = match axis {
            Axis::Vertical => Segment::new(
                Point::new(coordinate, visible.min.y),
                Point::new(coordinate, visible.max.y),
            ),
            Axis::Horizontal => Segment::new(
                Point::new(visible.min.x, coordinate),
                Point::new(visible.max.x, coordinate),
            ),
        };

        out.push(GridLine {
            axis,
            kind,
            coordinate,
            segment,
        });
    }
}
