//! Input line parsing.
//!
//! Wire format: `<x>,<y>,<v>[,...]`, UTF-8, comma separated. `x` and `y` are
//! truncated toward zero, `v` is clamped to [0, 1]. Extra fields are ignored.

use std::fmt;

use crate::error::ParseError;
use crate::util::clamp_unit;

/// One accepted sample: column `x`, row `y`, intensity `v` in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub x: usize,
    pub y: usize,
    pub v: f64,
}

impl Measurement {
    /// Build a measurement, clamping the intensity.
    pub fn new(x: usize, y: usize, v: f64) -> Self {
        Self {
            x,
            y,
            v: clamp_unit(v),
        }
    }

    /// Parse one input line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
        if fields.len() < 3 {
            return Err(ParseError::TooFewFields(fields.len()));
        }
        let x = coordinate("x", fields[0])?;
        let y = coordinate("y", fields[1])?;
        let v = number("v", fields[2])?;
        Ok(Self::new(x, y, v))
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={} y={} v={:.2}", self.x, self.y, self.v)
    }
}

impl std::str::FromStr for Measurement {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn number(field: &'static str, raw: &str) -> Result<f64, ParseError> {
    match raw.parse::<f64>() {
        Ok(n) if !n.is_nan() => Ok(n),
        _ => Err(ParseError::NotANumber {
            field,
            value: raw.to_string(),
        }),
    }
}

fn coordinate(axis: &'static str, raw: &str) -> Result<usize, ParseError> {
    let n = number(axis, raw)?;
    if !n.is_finite() {
        return Err(ParseError::NotANumber {
            field: axis,
            value: raw.to_string(),
        });
    }
    let t = n.trunc();
    if t < 0.0 {
        return Err(ParseError::NegativeCoordinate { axis, value: n });
    }
    // Saturating cast; oversized values are rejected later by the grid limit
    Ok(t as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_triple() {
        let m = Measurement::parse("3,4,0.25").unwrap();
        assert_eq!(m, Measurement { x: 3, y: 4, v: 0.25 });
    }

    #[test]
    fn truncates_coordinates_toward_zero() {
        let m = Measurement::parse("3.9, 4.2 ,0.5").unwrap();
        assert_eq!((m.x, m.y), (3, 4));
        // -0.7 truncates to -0 which is a valid zero index
        let m = Measurement::parse("-0.7,0,0.5").unwrap();
        assert_eq!(m.x, 0);
    }

    #[test]
    fn clamps_intensity() {
        assert_eq!(Measurement::parse("1,1,5.0").unwrap().v, 1.0);
        assert_eq!(Measurement::parse("1,1,-3.0").unwrap().v, 0.0);
        assert_eq!(Measurement::parse("1,1,inf").unwrap().v, 1.0);
    }

    #[test]
    fn ignores_extra_fields_and_whitespace() {
        let m = Measurement::parse("  2,7,0.125,extra,stuff\r\n").unwrap();
        assert_eq!(m, Measurement { x: 2, y: 7, v: 0.125 });
    }

    #[test]
    fn rejects_too_few_fields() {
        assert_eq!(
            Measurement::parse("abc,def"),
            Err(ParseError::TooFewFields(2))
        );
        assert_eq!(Measurement::parse(""), Err(ParseError::TooFewFields(1)));
    }

    #[test]
    fn rejects_non_numeric() {
        let err = Measurement::parse("1,two,0.5").unwrap_err();
        assert!(matches!(err, ParseError::NotANumber { field: "y", .. }));
        let err = Measurement::parse("1,2,NaN").unwrap_err();
        assert!(matches!(err, ParseError::NotANumber { field: "v", .. }));
        let err = Measurement::parse("inf,2,0.5").unwrap_err();
        assert!(matches!(err, ParseError::NotANumber { field: "x", .. }));
    }

    #[test]
    fn rejects_negative_coordinates() {
        let err = Measurement::parse("1,-2,0.5").unwrap_err();
        assert_eq!(
            err,
            ParseError::NegativeCoordinate {
                axis: "y",
                value: -2.0
            }
        );
    }

    #[test]
    fn display_matches_caption_format() {
        assert_eq!(Measurement::new(3, 4, 0.5161).to_string(), "x=3 y=4 v=0.52");
    }
}
