//! SVG path data
//!
//! Path labels carry their outline as SVG path data. This module converts
//! between that text form and `lyon` paths. Supported commands are
//! `M L H V C S Q T Z` in absolute and relative form; elliptical arcs are
//! rejected.

use lyon::math::point;
use lyon::path::{Event, Path};
use regex::Regex;
use std::fmt::Write;
use std::sync::OnceLock;
use trackforge_core::AssetError;

use crate::layout::transform::{parse_transform, SvgTransform};

/// Render a path as SVG path data with absolute commands
pub fn to_svg_path(path: &Path) -> String {
    let mut svg = String::new();
    for event in path.iter() {
        // Writing to a String never fails.
        let _ = match event {
            Event::Begin { at } => write!(svg, "M{} {} ", at.x, at.y),
            Event::Line { to, .. } => write!(svg, "L{} {} ", to.x, to.y),
            Event::Quadratic { ctrl, to, .. } => {
                write!(svg, "Q{} {} {} {} ", ctrl.x, ctrl.y, to.x, to.y)
            }
            Event::Cubic {
                ctrl1, ctrl2, to, ..
            } => write!(
                svg,
                "C{} {} {} {} {} {} ",
                ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
            ),
            Event::End { close, .. } => {
                if close {
                    svg.push_str("Z ");
                }
                Ok(())
            }
        };
    }
    svg.trim_end().to_string()
}

/// Pull the `d` attribute out of a `<path .../>` element, or return the input
/// untouched when it is already bare path data
pub fn extract_path_data(input: &str) -> &str {
    static D_ATTR: OnceLock<Regex> = OnceLock::new();
    let re = D_ATTR.get_or_init(|| {
        Regex::new(r#"(?s)<path\b[^>]*?\sd\s*=\s*["']([^"']*)["']"#).expect("invalid d regex")
    });
    match re.captures(input).and_then(|c| c.get(1)) {
        Some(d) => d.as_str(),
        None => input,
    }
}

/// The `transform` attribute of a `<path .../>` element, if any
pub fn extract_transform(input: &str) -> Option<SvgTransform> {
    static TRANSFORM_ATTR: OnceLock<Regex> = OnceLock::new();
    let re = TRANSFORM_ATTR.get_or_init(|| {
        Regex::new(r#"(?s)<path\b[^>]*?\stransform\s*=\s*["']([^"']*)["']"#)
            .expect("invalid transform regex")
    });
    re.captures(input)
        .and_then(|c| c.get(1))
        .map(|m| parse_transform(m.as_str()))
}

/// Parse SVG path data (or a `<path>` element) into a `lyon` path. An
/// element's `transform` attribute is applied to the result.
pub fn parse_svg_path(input: &str) -> Result<Path, AssetError> {
    let data = extract_path_data(input);
    let tokens = tokenize_svg_path(data);

    let mut builder = Path::builder();
    let mut current = (0.0f32, 0.0f32);
    let mut start = (0.0f32, 0.0f32);
    let mut subpath_active = false;
    let mut prev_cubic_ctrl: Option<(f32, f32)> = None;
    let mut prev_quad_ctrl: Option<(f32, f32)> = None;

    let mut i = 0usize;
    let mut cmd: Option<char> = None;

    let invalid = |msg: String| AssetError::InvalidOutline(msg);

    while i < tokens.len() {
        if is_cmd_token(&tokens[i]) {
            cmd = tokens[i].chars().next();
            i += 1;
        }
        let Some(c) = cmd else {
            return Err(invalid(format!("path data must start with a command, found '{}'", tokens[i])));
        };

        let relative = c.is_ascii_lowercase();
        let base = if relative { current } else { (0.0, 0.0) };

        let mut take = |n: usize| -> Result<Vec<f32>, AssetError> {
            if i + n > tokens.len() || tokens[i..i + n].iter().any(|t| is_cmd_token(t)) {
                return Err(invalid(format!("command '{c}' is missing arguments")));
            }
            let values = tokens[i..i + n]
                .iter()
                .map(|t| {
                    t.parse::<f32>()
                        .map_err(|_| invalid(format!("'{t}' is not a number")))
                })
                .collect::<Result<Vec<f32>, AssetError>>()?;
            i += n;
            Ok(values)
        };

        let upper = c.to_ascii_uppercase();
        match upper {
            'M' => {
                let v = take(2)?;
                if subpath_active {
                    builder.end(false);
                }
                current = (base.0 + v[0], base.1 + v[1]);
                start = current;
                builder.begin(point(current.0, current.1));
                subpath_active = true;
                // Extra pairs after a moveto are implicit linetos.
                cmd = Some(if relative { 'l' } else { 'L' });
            }
            'Z' => {
                if subpath_active {
                    builder.end(true);
                    subpath_active = false;
                }
                current = start;
                cmd = None;
            }
            _ if !subpath_active => {
                builder.begin(point(current.0, current.1));
                start = current;
                subpath_active = true;
                continue;
            }
            'L' => {
                let v = take(2)?;
                current = (base.0 + v[0], base.1 + v[1]);
                builder.line_to(point(current.0, current.1));
            }
            'H' => {
                let v = take(1)?;
                current.0 = base.0 + v[0];
                builder.line_to(point(current.0, current.1));
            }
            'V' => {
                let v = take(1)?;
                current.1 = base.1 + v[0];
                builder.line_to(point(current.0, current.1));
            }
            'C' | 'S' => {
                let (ctrl1, rest) = if upper == 'C' {
                    let v = take(6)?;
                    ((base.0 + v[0], base.1 + v[1]), [v[2], v[3], v[4], v[5]])
                } else {
                    let v = take(4)?;
                    (
                        prev_cubic_ctrl.map_or(current, |p| reflect(p, current)),
                        [v[0], v[1], v[2], v[3]],
                    )
                };
                let ctrl2 = (base.0 + rest[0], base.1 + rest[1]);
                let to = (base.0 + rest[2], base.1 + rest[3]);
                builder.cubic_bezier_to(
                    point(ctrl1.0, ctrl1.1),
                    point(ctrl2.0, ctrl2.1),
                    point(to.0, to.1),
                );
                current = to;
                prev_cubic_ctrl = Some(ctrl2);
                prev_quad_ctrl = None;
                continue;
            }
            'Q' | 'T' => {
                let (ctrl, to) = if upper == 'Q' {
                    let v = take(4)?;
                    ((base.0 + v[0], base.1 + v[1]), (base.0 + v[2], base.1 + v[3]))
                } else {
                    let v = take(2)?;
                    (
                        prev_quad_ctrl.map_or(current, |p| reflect(p, current)),
                        (base.0 + v[0], base.1 + v[1]),
                    )
                };
                builder.quadratic_bezier_to(point(ctrl.0, ctrl.1), point(to.0, to.1));
                current = to;
                prev_quad_ctrl = Some(ctrl);
                prev_cubic_ctrl = None;
                continue;
            }
            other => {
                return Err(invalid(format!("unsupported path command '{other}'")));
            }
        }

        prev_cubic_ctrl = None;
        prev_quad_ctrl = None;
    }

    if subpath_active {
        builder.end(false);
    }

    let path = builder.build();
    Ok(match extract_transform(input) {
        Some(t) if !t.is_identity() => path.transformed(&t.to_matrix()),
        _ => path,
    })
}

fn reflect(p: (f32, f32), around: (f32, f32)) -> (f32, f32) {
    (2.0 * around.0 - p.0, 2.0 * around.1 - p.1)
}

fn is_cmd_token(s: &str) -> bool {
    s.len() == 1 && s.chars().all(|c| c.is_ascii_alphabetic())
}

/// Split path data into commands and numbers. A sign starts a new number
/// unless it follows an exponent marker.
fn tokenize_svg_path(path_data: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current_token = String::new();

    for ch in path_data.chars() {
        match ch {
            c if c.is_ascii_alphabetic() && c != 'e' && c != 'E' => {
                if !current_token.is_empty() {
                    tokens.push(std::mem::take(&mut current_token));
                }
                tokens.push(ch.to_string());
            }
            ' ' | ',' | '\n' | '\r' | '\t' => {
                if !current_token.is_empty() {
                    tokens.push(std::mem::take(&mut current_token));
                }
            }
            '-' | '+' => {
                if !current_token.is_empty() && !current_token.ends_with(|c| c == 'e' || c == 'E') {
                    tokens.push(std::mem::take(&mut current_token));
                }
                current_token.push(ch);
            }
            _ => current_token.push(ch),
        }
    }

    if !current_token.is_empty() {
        tokens.push(current_token);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::outline::{path_extent, path_rings};

    #[test]
    fn test_element_transform_applied() {
        let element = r#"<path transform="translate(10 20) scale(2)" d="M0 0 L1 0 L1 1 Z"/>"#;
        let extent = path_extent(&parse_svg_path(element).unwrap(), 0.1).unwrap();
        assert_eq!((extent.min_x, extent.min_y), (10.0, 20.0));
        assert_eq!((extent.max_x, extent.max_y), (12.0, 22.0));
    }

    #[test]
    fn test_tokenize_signs_and_exponents() {
        assert_eq!(
            tokenize_svg_path("M10-5L1e-3,2"),
            vec!["M", "10", "-5", "L", "1e-3", "2"]
        );
    }

    #[test]
    fn test_parse_absolute_square() {
        let path = parse_svg_path("M 0 0 L 4 0 L 4 4 L 0 4 Z").unwrap();
        let rings = path_rings(&path, 0.1);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
    }

    #[test]
    fn test_parse_relative_and_implicit_lineto() {
        let path = parse_svg_path("m 1 1 2 0 0 2 h -2 z").unwrap();
        let extent = path_extent(&path, 0.1).unwrap();
        assert_eq!((extent.min_x, extent.min_y), (1.0, 1.0));
        assert_eq!((extent.max_x, extent.max_y), (3.0, 3.0));
    }

    #[test]
    fn test_parse_curves() {
        let path = parse_svg_path("M0 0 Q 5 10 10 0 T 20 0 C 20 -5 25 -5 25 0 S 30 5 30 0 Z").unwrap();
        let extent = path_extent(&path, 0.01).unwrap();
        assert!(extent.max_y > 4.0 && extent.max_y <= 5.0 + 1e-3);
        assert_eq!(extent.max_x, 30.0);
    }

    #[test]
    fn test_extract_from_element() {
        let element = r#"<path fill="black" d="M0 0 L1 1 Z" stroke="none"/>"#;
        assert_eq!(extract_path_data(element), "M0 0 L1 1 Z");
        assert_eq!(extract_path_data("M0 0 L1 1"), "M0 0 L1 1");
    }

    #[test]
    fn test_rejects_arcs_and_garbage() {
        assert!(matches!(
            parse_svg_path("M0 0 A 5 5 0 0 1 10 0"),
            Err(AssetError::InvalidOutline(_))
        ));
        assert!(parse_svg_path("M 0 zero").is_err());
        assert!(parse_svg_path("10 10").is_err());
        assert!(parse_svg_path("M 0 0 L 5").is_err());
    }

    #[test]
    fn test_svg_round_trip_preserves_extent() {
        let first = parse_svg_path("M0 0 L8 0 Q 8 6 4 6 L 0 6 Z").unwrap();
        let reparsed = parse_svg_path(&to_svg_path(&first)).unwrap();
        assert_eq!(path_extent(&first, 0.01), path_extent(&reparsed, 0.01));
    }

    #[test]
    fn test_empty_data_is_empty_path() {
        let path = parse_svg_path("").unwrap();
        assert!(path.iter().next().is_none());
    }
}
