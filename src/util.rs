//! Small geometry helpers shared across modules.

use once_cell::sync::Lazy;
use regex::Regex;

static PATH_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z]|-?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").unwrap());

/// Rescales and translates an SVG path string, used to fit issue-folder
/// icons into their 40x40 shape. Coordinates of absolute commands are scaled
/// and offset; relative commands are scaled only. Arc flags and rotations
/// pass through untouched.
pub fn scale_svg_path(path: &str, scale: f64, dx: f64, dy: f64) -> String {
    let mut out = String::with_capacity(path.len());
    let mut command = 'M';
    let mut param = 0usize;

    for token in PATH_TOKEN.find_iter(path) {
        let token = token.as_str();
        if let Some(letter) = token.chars().next().filter(|c| c.is_ascii_alphabetic()) {
            command = letter;
            param = 0;
            if !out.is_empty() {
                out.push(' ');
            }
            out.push(letter);
            continue;
        }

        let value: f64 = match token.parse() {
            Ok(value) => value,
            Err(_) => {
                out.push(' ');
                out.push_str(token);
                continue;
            }
        };

        let absolute = command.is_ascii_uppercase();
        let scaled = match command.to_ascii_uppercase() {
            'H' => value * scale + if absolute { dx } else { 0.0 },
            'V' => value * scale + if absolute { dy } else { 0.0 },
            'A' => match param % 7 {
                // rx, ry
                0 | 1 => value * scale,
                // x-axis rotation and the two flags
                2 | 3 | 4 => value,
                // endpoint x
                5 => value * scale + if absolute { dx } else { 0.0 },
                // endpoint y
                _ => value * scale + if absolute { dy } else { 0.0 },
            },
            _ => {
                // Remaining commands alternate x and y parameters.
                if param % 2 == 0 {
                    value * scale + if absolute { dx } else { 0.0 }
                } else {
                    value * scale + if absolute { dy } else { 0.0 }
                }
            }
        };
        param += 1;

        out.push(' ');
        out.push_str(&format_number(scaled));
    }

    out
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_and_offsets_absolute_coordinates() {
        assert_eq!(scale_svg_path("M 10 20 L 30 40", 2.0, 5.0, 0.0), "M 25 40 L 65 80");
    }

    #[test]
    fn relative_commands_scale_without_offset() {
        assert_eq!(scale_svg_path("m 10 20 l 5 5", 2.0, 100.0, 100.0), "m 20 40 l 10 10");
    }

    #[test]
    fn horizontal_and_vertical_use_the_matching_axis() {
        assert_eq!(scale_svg_path("H 10 V 20", 1.0, 3.0, 7.0), "H 13 V 27");
        assert_eq!(scale_svg_path("h 10 v 20", 2.0, 3.0, 7.0), "h 20 v 40");
    }

    #[test]
    fn arc_flags_pass_through() {
        assert_eq!(
            scale_svg_path("A 5 5 0 0 1 10 10", 2.0, 1.0, 1.0),
            "A 10 10 0 0 1 21 21"
        );
    }

    #[test]
    fn compact_paths_tokenize() {
        assert_eq!(scale_svg_path("M10,20L-5.5.5Z", 1.0, 0.0, 0.0), "M 10 20 L -5.5 0.5 Z");
    }
}
