/// Owned pixel grid the pipeline rasterizes into
use crate::color::Color;

/// RGB pixel buffer plus a parallel depth grid
///
/// The depth grid is reset to `+inf` by [`FrameBuffer::clear`] and is
/// otherwise left alone: visibility comes from draw order, not depth tests.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    depth: Vec<f64>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; size],
            depth: vec![f64::INFINITY; size],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major pixels, `width * height` long
    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    pub fn depth(&self) -> &[f64] {
        &self.depth
    }

    /// Read a pixel; `None` when out of bounds
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|idx| self.pixels[idx])
    }

    /// Fill with `color` and reset depth to `+inf`
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
        self.depth.fill(f64::INFINITY);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color;
        }
    }

    /// Set pixel with alpha blending
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: u8) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color.blend_over(self.pixels[idx], alpha);
        }
    }

    /// Draw a horizontal span, both ends inclusive, clipped to the buffer
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, color: Color) {
        if y < 0 || y as usize >= self.height || self.width == 0 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }
        let row = y as usize * self.width;
        self.pixels[row + start as usize..=row + end as usize].fill(color);
    }

    /// Fill a polygon using the scanline algorithm, sampling row centers
    pub fn fill_polygon(&mut self, vertices: &[(f64, f64)], color: Color) {
        if vertices.len() < 3 || self.height == 0 {
            return;
        }

        let mut min_y = f64::MAX;
        let mut max_y = f64::MIN;
        for &(_, y) in vertices {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        let min_y = (min_y.floor() as i32).max(0);
        let max_y = (max_y.ceil() as i32).min(self.height as i32 - 1);

        let mut intersections = Vec::with_capacity(vertices.len());
        let n = vertices.len();

        for y in min_y..=max_y {
            intersections.clear();
            let yf = f64::from(y) + 0.5;

            for i in 0..n {
                let (x1, y1) = vertices[i];
                let (x2, y2) = vertices[(i + 1) % n];

                if (y1 <= yf && y2 > yf) || (y2 <= yf && y1 > yf) {
                    let x = x1 + (yf - y1) / (y2 - y1) * (x2 - x1);
                    intersections.push(x.floor() as i32);
                }
            }

            intersections.sort_unstable();
            for pair in intersections.chunks_exact(2) {
                self.hline(pair[0], pair[1], y, color);
            }
        }
    }

    /// Draw a line using Bresenham's algorithm, clipped to the buffer
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        self.trace_line(x0, y0, x1, y1, true, |fb, x, y| fb.set_pixel(x, y, color));
    }

    /// Stroke a closed polygon outline.
    ///
    /// Each vertex is touched once, so translucent outlines do not darken
    /// the corners twice.
    pub fn stroke_polygon(&mut self, vertices: &[(i32, i32)], color: Color, alpha: u8) {
        let n = vertices.len();
        if n < 2 {
            return;
        }
        for i in 0..n {
            let (x0, y0) = vertices[i];
            let (x1, y1) = vertices[(i + 1) % n];
            if alpha == u8::MAX {
                self.trace_line(x0, y0, x1, y1, false, |fb, x, y| fb.set_pixel(x, y, color));
            } else {
                self.trace_line(x0, y0, x1, y1, false, |fb, x, y| {
                    fb.blend_pixel(x, y, color, alpha)
                });
            }
        }
    }

    /// Walk the Bresenham pixels from `(x0, y0)` to `(x1, y1)`.
    ///
    /// The minor coordinate after `k` major steps has a closed form, so only
    /// the steps that can land inside the buffer are visited and the pixels
    /// drawn are exactly those the full line would put on screen.
    fn trace_line<F>(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, include_end: bool, mut plot: F)
    where
        F: FnMut(&mut Self, i32, i32),
    {
        let (w, h) = (self.width as i64, self.height as i64);
        if w == 0 || h == 0 {
            return;
        }

        let (x0, y0, x1, y1) = (
            i64::from(x0),
            i64::from(y0),
            i64::from(x1),
            i64::from(y1),
        );
        let (dx, dy) = (x1 - x0, y1 - y0);
        let x_major = dx.abs() >= dy.abs();
        let (a0, b0, da, db, a_len, b_len) = if x_major {
            (x0, y0, dx, dy, w, h)
        } else {
            (y0, x0, dy, dx, h, w)
        };

        let len = da.abs();
        let adb = db.abs();
        let (sa, sb) = (da.signum(), db.signum());
        // Closed polygons skip the shared vertex; a single point is still drawn
        let last = if include_end || len == 0 { len } else { len - 1 };

        let minor = |k: i64| -> i64 {
            if len == 0 {
                0
            } else {
                ((2 * i128::from(k) * i128::from(adb) + i128::from(len)) / (2 * i128::from(len))) as i64
            }
        };

        // Steps whose major coordinate is on screen
        let (mut k_lo, mut k_hi) = match sa {
            1 => (-a0, a_len - 1 - a0),
            -1 => (a0 - (a_len - 1), a0),
            _ => (0, 0),
        };

        // Steps whose minor coordinate can be on screen, padded for rounding
        if sb == 0 {
            if !(0..b_len).contains(&b0) {
                return;
            }
        } else {
            let (m_lo, m_hi) = if sb > 0 {
                (-b0, b_len - 1 - b0)
            } else {
                (b0 - (b_len - 1), b0)
            };
            let per_minor = len as f64 / adb as f64;
            k_lo = k_lo.max((((m_lo as f64 - 1.0) * per_minor).floor() as i64).saturating_sub(1));
            k_hi = k_hi.min((((m_hi as f64 + 1.0) * per_minor).ceil() as i64).saturating_add(1));
        }

        for k in k_lo.max(0)..=k_hi.min(last) {
            let a = a0 + sa * k;
            let b = b0 + sb * minor(k);
            if !(0..a_len).contains(&a) || !(0..b_len).contains(&b) {
                continue;
            }
            let (x, y) = if x_major { (a, b) } else { (b, a) };
            plot(self, x as i32, y as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(255, 0, 0);

    fn count(fb: &FrameBuffer, color: Color) -> usize {
        fb.pixels().iter().filter(|&&c| c == color).count()
    }

    #[test]
    fn test_clear_resets_pixels_and_depth() {
        let mut fb = FrameBuffer::new(4, 3);
        assert_eq!(fb.pixels().len(), 12);
        fb.clear(RED);
        assert_eq!(count(&fb, RED), 12);
        assert!(fb.depth().iter().all(|d| *d == f64::INFINITY));
    }

    #[test]
    fn test_out_of_bounds_writes_are_ignored() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel(-1, 0, RED);
        fb.set_pixel(0, 2, RED);
        fb.blend_pixel(5, 5, RED, 128);
        assert_eq!(count(&fb, RED), 0);
        assert_eq!(fb.get_pixel(2, 0), None);
    }

    #[test]
    fn test_fill_rectangle() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.fill_polygon(&[(2.0, 2.0), (6.0, 2.0), (6.0, 5.0), (2.0, 5.0)], RED);
        // Rows 2, 3, 4; columns 2..=6
        assert_eq!(count(&fb, RED), 15);
        assert_eq!(fb.get_pixel(2, 2), Some(RED));
        assert_eq!(fb.get_pixel(6, 4), Some(RED));
        assert_eq!(fb.get_pixel(2, 5), Some(Color::BLACK));
    }

    #[test]
    fn test_fill_clips_to_buffer() {
        let mut fb = FrameBuffer::new(8, 8);
        fb.fill_polygon(&[(-100.0, -100.0), (500.0, -50.0), (4.0, 400.0)], RED);
        assert!(count(&fb, RED) > 0);
        assert_eq!(fb.pixels().len(), 64);
    }

    #[test]
    fn test_degenerate_polygons_draw_nothing() {
        let mut fb = FrameBuffer::new(8, 8);
        fb.fill_polygon(&[(1.0, 1.0), (5.0, 5.0)], RED);
        fb.fill_polygon(&[(1.0, 3.0), (4.0, 3.0), (7.0, 3.0)], RED);
        assert_eq!(count(&fb, RED), 0);
    }

    #[test]
    fn test_line_endpoints_and_length() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.line(1, 1, 8, 4, RED);
        assert_eq!(fb.get_pixel(1, 1), Some(RED));
        assert_eq!(fb.get_pixel(8, 4), Some(RED));
        // One pixel per step along the major axis
        assert_eq!(count(&fb, RED), 8);
    }

    #[test]
    fn test_line_clipped() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.line(-1_000_000, 5, 1_000_000, 5, RED);
        assert_eq!(count(&fb, RED), 10);
        fb.clear(Color::BLACK);
        fb.line(-5, -5, -1, 20, RED);
        assert_eq!(count(&fb, RED), 0);
    }

    /// Draw on a buffer large enough to hold the whole line, then compare
    /// the `w` x `h` window at the origin against the clipped draw.
    fn assert_matches_unclipped(w: i32, h: i32, (x0, y0): (i32, i32), (x1, y1): (i32, i32)) {
        let mut clipped = FrameBuffer::new(w as usize, h as usize);
        clipped.line(x0, y0, x1, y1, RED);

        let (min_x, min_y) = (x0.min(x1).min(0), y0.min(y1).min(0));
        let (max_x, max_y) = (x0.max(x1).max(w - 1), y0.max(y1).max(h - 1));
        let mut full = FrameBuffer::new((max_x - min_x + 1) as usize, (max_y - min_y + 1) as usize);
        full.line(x0 - min_x, y0 - min_y, x1 - min_x, y1 - min_y, RED);

        for y in 0..h {
            for x in 0..w {
                assert_eq!(
                    clipped.get_pixel(x, y),
                    full.get_pixel(x - min_x, y - min_y),
                    "line ({x0},{y0})->({x1},{y1}) differs at ({x},{y})"
                );
            }
        }
    }

    #[test]
    fn test_clipped_line_keeps_visible_pixels() {
        let mut fb = FrameBuffer::new(160, 90);
        fb.line(-12, 92, 173, 89, RED);
        // Only the stretch along the last row is on screen
        assert_eq!(count(&fb, RED), 17);
        assert!((143..=159).all(|x| fb.get_pixel(x, 89) == Some(RED)));

        assert_matches_unclipped(160, 90, (-12, 92), (173, 89));
        assert_matches_unclipped(10, 10, (17, 574), (-4, -933));
    }

    #[test]
    fn test_clipped_lines_match_full_lines() {
        // Small LCG so the sweep is deterministic
        let mut state: u32 = 0x2545_f491;
        let mut next = |span: i32| -> i32 {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 8) as i32 % (2 * span + 1) - span
        };
        for (w, h) in [(10, 10), (16, 9), (40, 23)] {
            for _ in 0..300 {
                let a = (next(60), next(60));
                let b = (next(60), next(60));
                assert_matches_unclipped(w, h, a, b);
            }
        }
    }

    #[test]
    fn test_stroke_blends_each_pixel_once() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.clear(Color::WHITE);
        fb.stroke_polygon(&[(1, 1), (8, 1), (8, 8), (1, 8)], Color::BLACK, 50);
        let expected = Color::BLACK.blend_over(Color::WHITE, 50);
        // 4 edges of 7 pixels each, corners shared
        assert_eq!(count(&fb, expected), 28);
        assert_eq!(fb.get_pixel(1, 1), Some(expected));
        assert_eq!(fb.get_pixel(4, 4), Some(Color::WHITE));
    }
}
