//! Running layout extent
//!
//! The layout engine folds every placed module's extent into a [`BoundingBox`].
//! The box only ever widens: each call to [`BoundingBox::check_extremes`]
//! performs four independent min/max comparisons.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle enclosing all placed modules
///
/// Starts as `{+inf, +inf, 0, 0}`, so the maximum corner always includes the
/// origin of the working surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    #[serde(with = "unbounded")]
    pub min_x: f64,
    #[serde(with = "unbounded")]
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: 0.0,
            max_y: 0.0,
        }
    }
}

impl BoundingBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widen the box to cover a candidate extent. Never narrows.
    pub fn check_extremes(&mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) {
        if min_x < self.min_x {
            self.min_x = min_x;
        }
        if min_y < self.min_y {
            self.min_y = min_y;
        }
        if max_x > self.max_x {
            self.max_x = max_x;
        }
        if max_y > self.max_y {
            self.max_y = max_y;
        }
    }

    /// True until the first extent has been folded in
    pub fn is_empty(&self) -> bool {
        !self.min_x.is_finite() || !self.min_y.is_finite()
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Copy grown by `margin` on every side
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Whether `other` overlaps this box (touching edges count)
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Whether `other` lies fully inside this box
    pub fn contains(&self, other: &BoundingBox) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    /// Center of the box; `None` while empty
    pub fn center(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        Some((
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        ))
    }
}

/// JSON has no infinity; an unset minimum travels as `null`.
mod unbounded {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
