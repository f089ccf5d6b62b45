// HSL color model for line and shade-fill rendering
/// A color in HSL space with an alpha channel. Hue is in `[0, 1)`,
/// saturation/lightness/alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        h: 0.0,
        s: 0.0,
        l: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        h: 0.0,
        s: 0.0,
        l: 1.0,
        a: 1.0,
    };

    pub fn hsl(h: f64, s: f64, l: f64) -> Self {
        Self {
            h: h.fract(),
            s,
            l,
            a: 1.0,
        }
    }

    pub fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    /// CSS `rgba(...)` form for the rendering layer.
    pub fn to_rgba_string(&self) -> String {
        let (r, g, b) = self.to_rgb();
        format!("rgba({}, {}, {}, {})", r, g, b, self.a)
    }

    fn to_rgb(&self) -> (u8, u8, u8) {
        let c = (1.0 - (2.0 * self.l - 1.0).abs()) * self.s;
        let hp = self.h * 6.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = self.l - c / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (channel(r1), channel(g1), channel(b1))
    }
}

/// Evenly spaced hues at full saturation, starting from a fixed offset so
/// adjacent charts do not all open with the same leading color.
pub fn generate_colors(count: usize, hue_offset: f64) -> Vec<Color> {
    (0..count)
        .map(|i| Color::hsl(i as f64 / count as f64 + hue_offset, 1.0, 0.5))
        .collect()
}
