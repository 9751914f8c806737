/// Straight-alpha linear RGBA color, each channel nominally in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Subtracts `step` from all four channels, flooring at 0.
    #[inline]
    pub fn faded(self, step: f32) -> Self {
        let f = |c: f32| (c - step).max(0.0);
        Self::new(f(self.r), f(self.g), f(self.b), f(self.a))
    }

    /// Adds `step` to the RGB channels, capping at 1. Alpha is untouched.
    #[inline]
    pub fn brightened(self, step: f32) -> Self {
        let f = |c: f32| (c + step).min(1.0);
        Self::new(f(self.r), f(self.g), f(self.b), self.a)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

impl From<ColorRgba> for wgpu::Color {
    fn from(c: ColorRgba) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}
