/// Character-cell plotter for projected point sets
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use lensview_core::ProjectionResult;
use nalgebra::Point2;
use std::io::Write;

/// Glyph for the final (possibly distorted) projection
pub const PROJECTED_GLYPH: char = 'o';
/// Glyph for the undistorted reference projection
pub const REFERENCE_GLYPH: char = '·';

/// Plots projection results into a fixed-size character buffer
pub struct PointRenderer {
    width: usize,
    height: usize,
    margin: usize,
    char_buffer: Vec<char>,
}

impl PointRenderer {
    pub fn new(width: usize, height: usize, margin: usize) -> Self {
        Self {
            width,
            height,
            margin,
            char_buffer: vec![' '; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.char_buffer = vec![' '; width * height];
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
    }

    /// Scale every point into the canvas and plot it
    ///
    /// Both sequences share one bounding box so they stay comparable.
    pub fn render_result(&mut self, result: &ProjectionResult) {
        let Some(bounds) = Bounds::of(result.all_points()) else {
            return;
        };

        if let Some(reference) = &result.reference {
            for point in reference {
                self.plot(point, &bounds, REFERENCE_GLYPH);
            }
        }
        for point in &result.projected {
            self.plot(point, &bounds, PROJECTED_GLYPH);
        }
    }

    pub fn glyph_at(&self, x: usize, y: usize) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.char_buffer[y * self.width + x])
        } else {
            None
        }
    }

    fn plot(&mut self, point: &Point2<f64>, bounds: &Bounds, glyph: char) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let x = scale(point.x, bounds.min.x, bounds.max.x, self.width, self.margin);
        let y = scale(point.y, bounds.min.y, bounds.max.y, self.height, self.margin);
        self.char_buffer[y * self.width + x] = glyph;
    }

    /// Write the buffer with its top-left corner at (`left`, `top`)
    pub fn draw<W: Write>(&self, writer: &mut W, left: u16, top: u16) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(left, top + y as u16))?;
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                let color = match c {
                    PROJECTED_GLYPH => Color::Cyan,
                    REFERENCE_GLYPH => Color::DarkGrey,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Axis-aligned extent of a point set
struct Bounds {
    min: Point2<f64>,
    max: Point2<f64>,
}

impl Bounds {
    fn of<'a>(points: impl Iterator<Item = &'a Point2<f64>>) -> Option<Self> {
        points.fold(None, |bounds, p| match bounds {
            None => Some(Bounds { min: *p, max: *p }),
            Some(Bounds { min, max }) => Some(Bounds {
                min: Point2::new(min.x.min(p.x), min.y.min(p.y)),
                max: Point2::new(max.x.max(p.x), max.y.max(p.y)),
            }),
        })
    }
}

/// Map `value` from `[min, max]` onto a cell index inside the margins
fn scale(value: f64, min: f64, max: f64, cells: usize, margin: usize) -> usize {
    let last = cells - 1;
    let margin = margin.min(last / 2);
    let usable = (last - 2 * margin) as f64;

    let extent = max - min;
    let t = if extent > 0.0 { (value - min) / extent } else { 0.5 };
    let cell = margin as f64 + (t * usable).round();
    (cell.max(0.0) as usize).min(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(projected: &[(f64, f64)], reference: Option<&[(f64, f64)]>) -> ProjectionResult {
        let to_points = |pts: &[(f64, f64)]| -> Vec<Point2<f64>> {
            pts.iter().map(|&(x, y)| Point2::new(x, y)).collect()
        };
        ProjectionResult {
            projected: to_points(projected),
            reference: reference.map(to_points),
        }
    }

    #[test]
    fn test_extremes_land_on_margins() {
        let mut renderer = PointRenderer::new(21, 11, 2);
        renderer.render_result(&result(&[(-1.0, -1.0), (1.0, 1.0)], None));
        assert_eq!(renderer.glyph_at(2, 2), Some(PROJECTED_GLYPH));
        assert_eq!(renderer.glyph_at(18, 8), Some(PROJECTED_GLYPH));
        assert_eq!(renderer.glyph_at(10, 5), Some(' '));
    }

    #[test]
    fn test_single_point_is_centered() {
        let mut renderer = PointRenderer::new(21, 11, 2);
        renderer.render_result(&result(&[(3.0, 3.0)], None));
        assert_eq!(renderer.glyph_at(10, 5), Some(PROJECTED_GLYPH));
    }

    #[test]
    fn test_projected_drawn_over_reference() {
        let mut renderer = PointRenderer::new(11, 11, 0);
        renderer.render_result(&result(
            &[(0.0, 0.0), (1.0, 1.0)],
            Some(&[(0.0, 0.0), (0.5, 0.5)][..]),
        ));
        assert_eq!(renderer.glyph_at(0, 0), Some(PROJECTED_GLYPH));
        assert_eq!(renderer.glyph_at(5, 5), Some(REFERENCE_GLYPH));
    }

    #[test]
    fn test_empty_result_and_clear() {
        let mut renderer = PointRenderer::new(5, 5, 1);
        renderer.render_result(&result(&[], None));
        renderer.render_result(&result(&[(0.0, 0.0)], None));
        renderer.clear();
        assert!((0..5).all(|y| (0..5).all(|x| renderer.glyph_at(x, y) == Some(' '))));
    }

    #[test]
    fn test_zero_sized_canvas_is_safe() {
        let mut renderer = PointRenderer::new(0, 0, 2);
        renderer.render_result(&result(&[(1.0, 2.0)], None));
        assert_eq!(renderer.glyph_at(0, 0), None);
    }
}
