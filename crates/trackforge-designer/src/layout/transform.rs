//! SVG `transform` attribute parsing
//!
//! Only `rotate`, `translate` and `scale` are read. Anything else in the string
//! (`skewX`, `matrix`, stray text) is ignored, and each missing component
//! falls back to the identity.

use lyon::math::{vector, Angle, Transform};
use regex::Regex;
use std::sync::OnceLock;

const NUMBER: &str = r"[-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?";

/// Decomposed transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgTransform {
    /// Degrees, clockwise on screen
    pub rotate: f64,
    pub translate: (f64, f64),
    pub scale: (f64, f64),
}

impl Default for SvgTransform {
    fn default() -> Self {
        Self {
            rotate: 0.0,
            translate: (0.0, 0.0),
            scale: (1.0, 1.0),
        }
    }
}

impl SvgTransform {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Scale, then rotate, then translate
    pub fn to_matrix(&self) -> Transform {
        Transform::scale(self.scale.0 as f32, self.scale.1 as f32)
            .then_rotate(Angle::degrees(self.rotate as f32))
            .then_translate(vector(self.translate.0 as f32, self.translate.1 as f32))
    }
}

struct Patterns {
    rotate: Regex,
    translate: Regex,
    scale: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let one = format!(r"({NUMBER})");
        let pair = format!(r"({NUMBER})(?:\s*,\s*|\s+)?({NUMBER})?");
        Patterns {
            rotate: Regex::new(&format!(r"rotate\(\s*{one}")).expect("invalid rotate regex"),
            translate: Regex::new(&format!(r"translate\(\s*{pair}\s*\)"))
                .expect("invalid translate regex"),
            scale: Regex::new(&format!(r"scale\(\s*{pair}\s*\)")).expect("invalid scale regex"),
        }
    })
}

fn number(caps: &regex::Captures<'_>, group: usize) -> Option<f64> {
    caps.get(group).and_then(|m| m.as_str().parse().ok())
}

/// Parse the supported parts of a transform string
pub fn parse_transform(input: &str) -> SvgTransform {
    let p = patterns();
    let mut result = SvgTransform::default();

    if let Some(caps) = p.rotate.captures(input) {
        if let Some(angle) = number(&caps, 1) {
            result.rotate = angle;
        }
    }

    if let Some(caps) = p.translate.captures(input) {
        if let Some(tx) = number(&caps, 1) {
            result.translate = (tx, number(&caps, 2).unwrap_or(0.0));
        }
    }

    if let Some(caps) = p.scale.captures(input) {
        if let Some(sx) = number(&caps, 1) {
            result.scale = (sx, number(&caps, 2).unwrap_or(sx));
        }
    }

    result
}
