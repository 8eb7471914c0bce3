//! GPU-upload records, one per batch item.
//!
//! Every record is `#[repr(C)]`, 16-byte multiple sized and [`Pod`], so a
//! slot can be handed to the GPU layer with [`bytemuck::bytes_of`].

use bytemuck::{Pod, Zeroable};
use strata_core::math::{PackedVec2, PackedVec4};

/// Textured quad record shared by texture and glyph batches (64 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    /// Source rect in texels. A negative width or height mirrors that axis.
    pub src: PackedVec4,
    /// Destination center (`x`, `y`) and render size (`z`, `w`).
    pub dest: PackedVec4,
    pub tint: PackedVec4,
    pub view_size: PackedVec2,
    /// Rotation in degrees around the destination center.
    pub angle: f32,
    pub _pad: f32,
}

/// Rectangle/circle record (96 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ShapeVertex {
    /// Center (`x`, `y`), width and height.
    pub rect: PackedVec4,
    pub color: PackedVec4,
    pub gradient_start: PackedVec4,
    pub gradient_stop: PackedVec4,
    /// Top-left, bottom-left, bottom-right, top-right.
    pub corner_radius: PackedVec4,
    pub border_thickness: f32,
    /// `1.0` filled, `0.0` outlined.
    pub is_solid: f32,
    /// `0.0` none, `1.0` horizontal, `2.0` vertical.
    pub gradient_type: f32,
    pub _pad: f32,
}

/// Line segment record (48 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub p1: PackedVec2,
    pub p2: PackedVec2,
    pub color: PackedVec4,
    pub thickness: f32,
    pub _pad: [f32; 3],
}

static_assertions::assert_eq_size!(QuadVertex, [u8; 64]);
static_assertions::assert_eq_size!(ShapeVertex, [u8; 96]);
static_assertions::assert_eq_size!(LineVertex, [u8; 48]);
