use strata_core::math::PackedVec4;

/// Straight-alpha RGBA tint, one `f32` per channel.
///
/// ```
/// use strata_render::Color;
///
/// let orange = Color::from_rgb_hex(0xFF8800);
/// let faded = orange.with_alpha(0.5);
/// assert_eq!(Color::from_rgba_hex(0xFF880080).g, orange.g);
/// assert!(!faded.is_opaque());
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    /// Clear color of a renderer built from the default config.
    pub const CORNFLOWER_BLUE: Color = Color::rgb(100.0 / 255.0, 149.0 / 255.0, 237.0 / 255.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// `0xRRGGBB`, fully opaque.
    pub fn from_rgb_hex(hex: u32) -> Self {
        Self::from_rgba_hex((hex << 8) | 0xFF)
    }

    /// `0xRRGGBBAA`.
    pub fn from_rgba_hex(hex: u32) -> Self {
        let [r, g, b, a] = hex.to_be_bytes().map(|byte| byte as f32 / 255.0);
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Linear blend towards `other`; `t` is clamped to `0.0..=1.0`.
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |from: f32, to: f32| from + (to - from) * t;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Vertex attribute form of the color.
    pub fn to_packed(self) -> PackedVec4 {
        PackedVec4::from(self.to_array())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_channels() {
        assert_eq!(Color::from_rgb_hex(0xFF0000), Color::RED);
        let c = Color::from_rgba_hex(0x00FF0000);
        assert_eq!(c, Color::rgba(0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn test_default_is_white() {
        assert_eq!(Color::default(), Color::WHITE);
        assert!(Color::default().is_opaque());
    }

    #[test]
    fn test_lerp_clamps() {
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 2.0), Color::WHITE);
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 0.5), Color::rgb(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_packed_layout() {
        let packed = Color::rgba(0.1, 0.2, 0.3, 0.4).to_packed();
        assert_eq!(packed.w, 0.4);
        assert_eq!(bytemuck::bytes_of(&packed).len(), 16);
    }
}
