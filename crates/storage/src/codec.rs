//! CSV encoding of data tiles.
//!
//! A data tile is a header line `x,y,value` followed by one record per point.
//! Decoding finds columns by header name, so files with extra columns (such as
//! a `tile_id` column) still load. Floats are written in their shortest
//! round-trip form, which makes encoding a pure function of the points.

use pyramid_common::Point;
use std::fmt::Write;
use thiserror::Error;

pub const HEADER: &str = "x,y,value";

#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    #[error("data tile is not valid UTF-8")]
    Utf8,

    #[error("data tile is empty")]
    Empty,

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("line {line}: {message}")]
    InvalidRow { line: usize, message: String },
}

/// Encode points as CSV.
pub fn encode_points(points: &[Point]) -> Vec<u8> {
    let mut out = String::with_capacity(HEADER.len() + 1 + points.len() * 24);
    out.push_str(HEADER);
    out.push('\n');
    for p in points {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{},{},{}", p.x, p.y, p.value);
    }
    out.into_bytes()
}

/// Decode CSV produced by [`encode_points`] or any file with `x`, `y`, `value` columns.
pub fn decode_points(data: &[u8]) -> Result<Vec<Point>, CodecError> {
    let text = std::str::from_utf8(data).map_err(|_| CodecError::Utf8)?;
    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let (_, header) = lines.next().ok_or(CodecError::Empty)?;
    let columns: Vec<&str> = header
        .trim_start_matches('\u{feff}')
        .split(',')
        .map(str::trim)
        .collect();
    let column = |name: &'static str| {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or(CodecError::MissingColumn(name))
    };
    let (x_col, y_col, value_col) = (column("x")?, column("y")?, column("value")?);

    let mut points = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let field = |col: usize, name: &str| {
            fields.get(col).copied().ok_or_else(|| CodecError::InvalidRow {
                line: line_no,
                message: format!("missing field '{}'", name),
            })
        };

        let x = parse_float(field(x_col, "x")?, line_no)?;
        let y = parse_float(field(y_col, "y")?, line_no)?;
        let value = parse_value(field(value_col, "value")?, line_no)?;
        points.push(Point::new(x, y, value));
    }

    Ok(points)
}

fn parse_float(field: &str, line: usize) -> Result<f64, CodecError> {
    field.parse().map_err(|_| CodecError::InvalidRow {
        line,
        message: format!("invalid number '{}'", field),
    })
}

/// Integer values, also accepting integral floats such as `57.0`.
fn parse_value(field: &str, line: usize) -> Result<i64, CodecError> {
    if let Ok(v) = field.parse::<i64>() {
        return Ok(v);
    }
    match field.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v.is_finite() => Ok(v as i64),
        _ => Err(CodecError::InvalidRow {
            line,
            message: format!("invalid integer value '{}'", field),
        }),
    }
}
