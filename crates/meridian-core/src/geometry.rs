//! Geometric primitives shared by every layout algorithm.
//!
//! - [`Point`] - A 2D position in layout space.
//! - [`Bounds`] - The axis-aligned bounding box of a set of points.
//!
//! All coordinates are `f32`. Layout space is unitless; renderers decide what
//! a unit means on screen.

use serde::{Deserialize, Serialize, ser::SerializeStruct};

/// A 2D point in layout space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Checks that neither coordinate is NaN or infinite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Linear blend `self + (other - self) * t`, applied per axis.
    pub fn lerp(self, other: Point, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Point at `radius` from `self` in the direction of `angle` (radians).
    pub fn polar_offset(self, radius: f32, angle: f32) -> Self {
        Self {
            x: self.x + radius * angle.cos(),
            y: self.y + radius * angle.sin(),
        }
    }
}

/// Axis-aligned bounding box with minimum and maximum coordinates.
///
/// Serializes as `{min_x, min_y, max_x, max_y, width, height}`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds from explicit corners
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest bounds containing every point, or zero bounds for an empty iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// # use meridian_core::geometry::{Bounds, Point};
    /// let bounds = Bounds::from_points([Point::new(-10.0, 5.0), Point::new(30.0, 25.0)]);
    /// assert_eq!(bounds.min_x(), -10.0);
    /// assert_eq!(bounds.width(), 40.0);
    /// assert_eq!(bounds.height(), 20.0);
    ///
    /// assert_eq!(Bounds::from_points(std::iter::empty()), Bounds::default());
    /// ```
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        points
            .into_iter()
            .map(|p| Self::new(p.x, p.y, p.x, p.y))
            .reduce(|acc, b| acc.merge(&b))
            .unwrap_or_default()
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Merges two bounds to create a larger bounds that contains both
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

impl Serialize for Bounds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Bounds", 6)?;
        state.serialize_field("min_x", &self.min_x)?;
        state.serialize_field("min_y", &self.min_y)?;
        state.serialize_field("max_x", &self.max_x)?;
        state.serialize_field("max_y", &self.max_y)?;
        state.serialize_field("width", &self.width())?;
        state.serialize_field("height", &self.height())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_lerp_endpoints() {
        let a = Point::new(10.0, -4.0);
        let b = Point::new(20.0, 6.0);

        assert_eq!(a.lerp(b, 0.0), a);
        let mid = a.lerp(b, 0.5);
        assert_approx_eq!(f32, mid.x(), 15.0);
        assert_approx_eq!(f32, mid.y(), 1.0);
    }

    #[test]
    fn test_point_polar_offset() {
        let center = Point::new(100.0, 100.0);
        let p = center.polar_offset(50.0, std::f32::consts::FRAC_PI_2);

        assert_approx_eq!(f32, p.x(), 100.0, epsilon = 1e-4);
        assert_approx_eq!(f32, p.y(), 150.0, epsilon = 1e-4);
    }

    #[test]
    fn test_point_is_finite() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f32::NAN, 2.0).is_finite());
        assert!(!Point::new(0.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_bounds_single_point_has_zero_size() {
        let bounds = Bounds::from_points([Point::new(3.0, 4.0)]);
        assert_eq!(bounds.width(), 0.0);
        assert_eq!(bounds.height(), 0.0);
        assert_eq!(bounds.min_x(), 3.0);
        assert_eq!(bounds.max_y(), 4.0);
    }

    #[test]
    fn test_bounds_serializes_size() {
        let bounds = Bounds::new(0.0, 0.0, 10.0, 20.0);
        let json = serde_json::to_value(bounds).unwrap();
        assert_eq!(json["width"], 10.0);
        assert_eq!(json["height"], 20.0);
    }
}
