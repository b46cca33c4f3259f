/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise product of two colors scaled by `intensity`.
    ///
    /// Each channel is `s * l / 255 * intensity`, truncated and clamped to
    /// `0..=255`.
    pub fn modulate(self, light: Color, intensity: f64) -> Color {
        let channel = |s: u8, l: u8| -> u8 {
            let v = f64::from(s) * f64::from(l) / 255.0 * intensity;
            // `as` saturates, NaN becomes 0
            v.clamp(0.0, 255.0) as u8
        };
        Color::new(
            channel(self.r, light.r),
            channel(self.g, light.g),
            channel(self.b, light.b),
        )
    }

    /// Blend `self` over `dst` with alpha in `0..=255`.
    #[inline]
    pub fn blend_over(self, dst: Color, alpha: u8) -> Color {
        let a = u32::from(alpha);
        let mix = |s: u8, d: u8| -> u8 {
            ((u32::from(s) * a + u32::from(d) * (255 - a) + 127) / 255) as u8
        };
        Color::new(mix(self.r, dst.r), mix(self.g, dst.g), mix(self.b, dst.b))
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::new(r, g, b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Color::new(r, g, b)
    }
}

/// Per-channel saturating accumulator used to sum light contributions.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ColorSum {
    r: u32,
    g: u32,
    b: u32,
}

impl ColorSum {
    pub(crate) fn add(&mut self, c: Color) {
        self.r += u32::from(c.r);
        self.g += u32::from(c.g);
        self.b += u32::from(c.b);
    }

    pub(crate) fn clamped(self) -> Color {
        Color::new(
            self.r.min(255) as u8,
            self.g.min(255) as u8,
            self.b.min(255) as u8,
        )
    }
}
