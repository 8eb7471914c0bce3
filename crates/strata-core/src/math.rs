//! Math types for the 2D renderer.
//!
//! CPU-side calculations use the SIMD-backed [`glam`] types re-exported from
//! [`fast`]. Data that crosses the GPU-upload boundary uses the `#[repr(C)]`
//! types in [`packed`], which are [`bytemuck::Pod`] and can be cast to bytes.
//!
//! ```
//! use strata_core::math::{Vec2, PackedVec2};
//!
//! let position = Vec2::new(10.0, 20.0);
//! let packed = PackedVec2::from(position);
//! let bytes: &[u8] = bytemuck::bytes_of(&packed);
//! assert_eq!(bytes.len(), 8);
//! ```

pub mod fast {
    pub use glam::*;
}

pub mod packed {
    use bytemuck::{Pod, Zeroable};

    /// A 2D vector with guaranteed `#[repr(C)]` layout (8 bytes).
    #[repr(C)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
    pub struct Vec2 {
        pub x: f32,
        pub y: f32,
    }

    /// A 4D vector with guaranteed `#[repr(C)]` layout (16 bytes).
    ///
    /// Used for colors and packed rectangles in vertex records.
    #[repr(C)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
    pub struct Vec4 {
        pub x: f32,
        pub y: f32,
        pub z: f32,
        pub w: f32,
    }

    impl From<glam::Vec2> for Vec2 {
        fn from(v: glam::Vec2) -> Self {
            Self { x: v.x, y: v.y }
        }
    }

    impl From<[f32; 4]> for Vec4 {
        fn from(v: [f32; 4]) -> Self {
            Self {
                x: v[0],
                y: v[1],
                z: v[2],
                w: v[3],
            }
        }
    }
}

pub use fast::*;
pub use packed::{Vec2 as PackedVec2, Vec4 as PackedVec4};

/// Rotate `point` around `origin` by `angle` degrees (clockwise in screen space,
/// where +Y points down).
pub fn rotate_around(point: Vec2, origin: Vec2, angle: f32) -> Vec2 {
    if angle == 0.0 {
        return point;
    }
    let rotation = Vec2::from_angle(angle.to_radians());
    origin + rotation.rotate(point - origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_zero_is_identity() {
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(rotate_around(p, Vec2::ZERO, 0.0), p);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let rotated = rotate_around(Vec2::new(1.0, 0.0), Vec2::ZERO, 90.0);
        assert!((rotated.x - 0.0).abs() < 1e-5);
        assert!((rotated.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_around_origin_point() {
        let rotated = rotate_around(Vec2::new(12.0, 10.0), Vec2::new(10.0, 10.0), 180.0);
        assert!((rotated.x - 8.0).abs() < 1e-4);
        assert!((rotated.y - 10.0).abs() < 1e-4);
    }
}
