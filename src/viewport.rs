use ratatui::layout::Rect;

use crate::grid::Point;

/// Maps terminal cells onto the logical playfield and back.
///
/// The playfield is stretched over `area`; a cell maps to the playfield
/// point under its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub area: Rect,
    pub field_width: f64,
    pub field_height: f64,
}

impl Viewport {
    pub fn new(area: Rect, field_width: f64, field_height: f64) -> Self {
        Self {
            area,
            field_width,
            field_height,
        }
    }

    fn scale(&self) -> Option<(f64, f64)> {
        if self.area.width == 0 || self.area.height == 0 {
            return None;
        }
        Some((
            self.field_width / self.area.width as f64,
            self.field_height / self.area.height as f64,
        ))
    }

    /// Playfield point for a terminal cell, or None outside the area
    pub fn to_playfield(&self, column: u16, row: u16) -> Option<Point> {
        let (sx, sy) = self.scale()?;
        let inside = column >= self.area.x
            && column < self.area.right()
            && row >= self.area.y
            && row < self.area.bottom();
        if !inside {
            return None;
        }

        Some(Point::new(
            ((column - self.area.x) as f64 + 0.5) * sx,
            ((row - self.area.y) as f64 + 0.5) * sy,
        ))
    }

    /// Terminal cell containing a playfield point, clamped to the area
    pub fn to_cell(&self, point: Point) -> Option<(u16, u16)> {
        let (sx, sy) = self.scale()?;
        let col = (point.x / sx).floor().clamp(0.0, (self.area.width - 1) as f64) as u16;
        let row = (point.y / sy).floor().clamp(0.0, (self.area.height - 1) as f64) as u16;
        Some((self.area.x + col, self.area.y + row))
    }

    /// All cells whose centers fall within `radius` of `center`
    pub fn cells_within(&self, center: Point, radius: f64) -> Vec<(u16, u16)> {
        let mut cells = Vec::new();
        for row in self.area.top()..self.area.bottom() {
            for column in self.area.left()..self.area.right() {
                if let Some(p) = self.to_playfield(column, row) {
                    if p.distance(center) <= radius {
                        cells.push((column, row));
                    }
                }
            }
        }
        cells
    }
}
