//! Filled/bordered shapes and lines.
//!
//! Dimensions are clamped instead of rejected: these values are often driven
//! by continuous UI input where transient out-of-range values are expected.
//!
//! - width, height, diameter and line thickness never go below `1.0`
//! - border thickness stays within `1.0..=min(width, height) / 2`
//! - corner radii stay within `0.0..=min(width, height) / 2`

use strata_core::math::Vec2;

use crate::color::Color;

const MIN_DIMENSION: f32 = 1.0;

fn clamp_dimension(value: f32) -> f32 {
    if value.is_nan() { MIN_DIMENSION } else { value.max(MIN_DIMENSION) }
}

/// Upper bound wins over the lower bound of 1 only when it is at least 1.
fn clamp_border(value: f32, half: f32) -> f32 {
    if value.is_nan() {
        return MIN_DIMENSION;
    }
    value.min(half).max(MIN_DIMENSION)
}

fn clamp_radius(value: f32, half: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.min(half).max(0.0)
}

/// How a shape's fill color varies across it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GradientType {
    /// Solid color only.
    #[default]
    None,
    /// Start color on the left, stop color on the right.
    Horizontal,
    /// Start color at the top, stop color at the bottom.
    Vertical,
}

impl GradientType {
    pub(crate) const fn as_f32(self) -> f32 {
        match self {
            GradientType::None => 0.0,
            GradientType::Horizontal => 1.0,
            GradientType::Vertical => 2.0,
        }
    }
}

/// Per-corner radii of a rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CornerRadius {
    pub top_left: f32,
    pub bottom_left: f32,
    pub bottom_right: f32,
    pub top_right: f32,
}

impl CornerRadius {
    pub const fn new(top_left: f32, bottom_left: f32, bottom_right: f32, top_right: f32) -> Self {
        Self {
            top_left,
            bottom_left,
            bottom_right,
            top_right,
        }
    }

    pub const fn uniform(radius: f32) -> Self {
        Self::new(radius, radius, radius, radius)
    }

    fn clamped(self, half: f32) -> Self {
        Self {
            top_left: clamp_radius(self.top_left, half),
            bottom_left: clamp_radius(self.bottom_left, half),
            bottom_right: clamp_radius(self.bottom_right, half),
            top_right: clamp_radius(self.top_right, half),
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [
            self.top_left,
            self.bottom_left,
            self.bottom_right,
            self.top_right,
        ]
    }
}

/// Fill styling shared by rectangles and circles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub color: Color,
    /// Filled when `true`, outlined with `border_thickness` otherwise.
    pub is_solid: bool,
    pub gradient_type: GradientType,
    pub gradient_start: Color,
    pub gradient_stop: Color,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            is_solid: true,
            gradient_type: GradientType::None,
            gradient_start: Color::WHITE,
            gradient_stop: Color::WHITE,
        }
    }
}

/// A rectangle centered on `position`, optionally rounded and/or outlined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectShape {
    pub position: Vec2,
    pub style: ShapeStyle,
    width: f32,
    height: f32,
    border_thickness: f32,
    corner_radius: CornerRadius,
}

impl RectShape {
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            position,
            style: ShapeStyle::default(),
            width: clamp_dimension(width),
            height: clamp_dimension(height),
            border_thickness: MIN_DIMENSION,
            corner_radius: CornerRadius::default(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn border_thickness(&self) -> f32 {
        self.border_thickness
    }

    pub fn corner_radius(&self) -> CornerRadius {
        self.corner_radius
    }

    fn half_min_side(&self) -> f32 {
        self.width.min(self.height) / 2.0
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = clamp_dimension(width);
        self.reclamp();
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = clamp_dimension(height);
        self.reclamp();
    }

    pub fn set_border_thickness(&mut self, thickness: f32) {
        self.border_thickness = clamp_border(thickness, self.half_min_side());
    }

    pub fn set_corner_radius(&mut self, radius: CornerRadius) {
        self.corner_radius = radius.clamped(self.half_min_side());
    }

    /// Keep border and radii valid after a dimension shrinks.
    fn reclamp(&mut self) {
        let half = self.half_min_side();
        self.border_thickness = clamp_border(self.border_thickness, half);
        self.corner_radius = self.corner_radius.clamped(half);
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.style.color = color;
        self
    }

    pub fn with_solid(mut self, is_solid: bool) -> Self {
        self.style.is_solid = is_solid;
        self
    }

    pub fn with_border_thickness(mut self, thickness: f32) -> Self {
        self.set_border_thickness(thickness);
        self
    }

    pub fn with_corner_radius(mut self, radius: CornerRadius) -> Self {
        self.set_corner_radius(radius);
        self
    }

    pub fn with_gradient(mut self, gradient_type: GradientType, start: Color, stop: Color) -> Self {
        self.style.gradient_type = gradient_type;
        self.style.gradient_start = start;
        self.style.gradient_stop = stop;
        self
    }
}

/// A circle centered on `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleShape {
    pub position: Vec2,
    pub style: ShapeStyle,
    diameter: f32,
    border_thickness: f32,
}

impl CircleShape {
    pub fn new(position: Vec2, diameter: f32) -> Self {
        Self {
            position,
            style: ShapeStyle::default(),
            diameter: clamp_dimension(diameter),
            border_thickness: MIN_DIMENSION,
        }
    }

    pub fn diameter(&self) -> f32 {
        self.diameter
    }

    pub fn radius(&self) -> f32 {
        self.diameter / 2.0
    }

    pub fn border_thickness(&self) -> f32 {
        self.border_thickness
    }

    pub fn set_diameter(&mut self, diameter: f32) {
        self.diameter = clamp_dimension(diameter);
        self.border_thickness = clamp_border(self.border_thickness, self.radius());
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.set_diameter(radius * 2.0);
    }

    pub fn set_border_thickness(&mut self, thickness: f32) {
        self.border_thickness = clamp_border(thickness, self.radius());
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.style.color = color;
        self
    }

    pub fn with_solid(mut self, is_solid: bool) -> Self {
        self.style.is_solid = is_solid;
        self
    }

    pub fn with_border_thickness(mut self, thickness: f32) -> Self {
        self.set_border_thickness(thickness);
        self
    }

    pub fn with_gradient(mut self, gradient_type: GradientType, start: Color, stop: Color) -> Self {
        self.style.gradient_type = gradient_type;
        self.style.gradient_start = start;
        self.style.gradient_stop = stop;
        self
    }
}

/// A straight line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub p1: Vec2,
    pub p2: Vec2,
    pub color: Color,
    thickness: f32,
}

impl Line {
    pub fn new(p1: Vec2, p2: Vec2, color: Color, thickness: f32) -> Self {
        Self {
            p1,
            p2,
            color,
            thickness: clamp_dimension(thickness),
        }
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    pub fn set_thickness(&mut self, thickness: f32) {
        self.thickness = clamp_dimension(thickness);
    }

    pub fn length(&self) -> f32 {
        self.p1.distance(self.p2)
    }
}
