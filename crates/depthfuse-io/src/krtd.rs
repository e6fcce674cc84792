//! KRTD camera files.
//!
//! ```text
//! fx  s  cx        <- K, three rows
//!  0 fy  cy
//!  0  0   1
//!                  <- separator line
//! r00 r01 r02      <- R, three rows
//! r10 r11 r12
//! r20 r21 r22
//!                  <- separator line
//! tx ty tz         <- t
//! [k1 k2 ...]      <- optional distortion, ignored
//! ```
//!
//! The pose `[R|t]` maps world points to camera coordinates.

use anyhow::{Context, Result};
use depthfuse_core::{rigid_matrix, split_rigid, Mat3, Mat4, Real, Vec3};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KrtdError {
    #[error("krtd file ends before line {line}")]
    MissingLine { line: usize },
    #[error("krtd line {line}: expected 3 numbers, found {found}")]
    ShortRow { line: usize, found: usize },
    #[error("krtd line {line}: cannot parse {token:?} as a number")]
    BadNumber { line: usize, token: String },
}

const K_ROWS: usize = 0;
const R_ROWS: usize = 4;
const T_ROW: usize = 8;

fn parse_row(lines: &[&str], index: usize) -> Result<[Real; 3], KrtdError> {
    let line = index + 1;
    let text = lines.get(index).ok_or(KrtdError::MissingLine { line })?;
    let mut row = [0.0; 3];
    let mut found = 0;
    for token in text.split_whitespace().take(3) {
        row[found] = token.parse().map_err(|_| KrtdError::BadNumber {
            line,
            token: token.to_owned(),
        })?;
        found += 1;
    }
    if found < 3 {
        return Err(KrtdError::ShortRow { line, found });
    }
    Ok(row)
}

fn parse_block(lines: &[&str], first: usize) -> Result<Mat3, KrtdError> {
    let mut m = Mat3::zeros();
    for r in 0..3 {
        let row = parse_row(lines, first + r)?;
        for (c, v) in row.into_iter().enumerate() {
            m[(r, c)] = v;
        }
    }
    Ok(m)
}

/// Parse KRTD text into `K` and the 4×4 world → camera pose.
///
/// The pose bottom row is always `[0, 0, 0, 1]`.
pub fn parse_krtd(text: &str) -> Result<(Mat3, Mat4), KrtdError> {
    let lines: Vec<&str> = text.lines().collect();
    let k = parse_block(&lines, K_ROWS)?;
    let r = parse_block(&lines, R_ROWS)?;
    let t = parse_row(&lines, T_ROW)?;
    Ok((k, rigid_matrix(&r, &Vec3::from(t))))
}

pub fn read_krtd(path: &Path) -> Result<(Mat3, Mat4)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read krtd file {}", path.display()))?;
    parse_krtd(&text).with_context(|| format!("failed to parse krtd file {}", path.display()))
}

/// Format `K` and `[R|t]` as KRTD text with a zero distortion line.
pub fn format_krtd(k: &Mat3, pose: &Mat4) -> String {
    let (r, t) = split_rigid(pose);
    let mut out = String::new();
    for m in [k, &r] {
        for row in 0..3 {
            out.push_str(&format!(
                "{:.17e} {:.17e} {:.17e}\n",
                m[(row, 0)],
                m[(row, 1)],
                m[(row, 2)]
            ));
        }
        out.push('\n');
    }
    out.push_str(&format!("{:.17e} {:.17e} {:.17e}\n\n", t.x, t.y, t.z));
    out.push_str("0 0 0 0 0\n");
    out
}

pub fn write_krtd(path: &Path, k: &Mat3, pose: &Mat4) -> Result<()> {
    fs::write(path, format_krtd(k, pose))
        .with_context(|| format!("failed to write krtd file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
1000 0 320
0 1000 240
0 0 1

1 0 0
0 0 -1
0 1 0

0.5 -1.25 3

0 0 0 0 0
";

    #[test]
    fn parses_k_r_t() {
        let (k, pose) = parse_krtd(SAMPLE).unwrap();
        assert_eq!(k[(0, 0)], 1000.0);
        assert_eq!(k[(0, 2)], 320.0);
        assert_eq!(k[(1, 2)], 240.0);
        assert_eq!(pose[(1, 2)], -1.0);
        assert_eq!(pose[(2, 1)], 1.0);
        assert_eq!(pose[(0, 3)], 0.5);
        assert_eq!(pose[(1, 3)], -1.25);
        assert_eq!(pose[(2, 3)], 3.0);
        assert_eq!(pose.row(3).iter().copied().collect::<Vec<_>>(), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn truncated_file_is_rejected() {
        let text: String = SAMPLE.lines().take(7).collect::<Vec<_>>().join("\n");
        assert_eq!(parse_krtd(&text).unwrap_err(), KrtdError::MissingLine { line: 9 });
    }

    #[test]
    fn malformed_rows_are_rejected() {
        let short = SAMPLE.replacen("0 1000 240", "0 1000", 1);
        assert_eq!(
            parse_krtd(&short).unwrap_err(),
            KrtdError::ShortRow { line: 2, found: 2 }
        );
        let bad = SAMPLE.replacen("0.5 -1.25 3", "0.5 x 3", 1);
        assert!(matches!(
            parse_krtd(&bad).unwrap_err(),
            KrtdError::BadNumber { line: 9, .. }
        ));
    }

    #[test]
    fn formatted_text_parses_back() {
        let (k, pose) = parse_krtd(SAMPLE).unwrap();
        let (k2, pose2) = parse_krtd(&format_krtd(&k, &pose)).unwrap();
        assert_eq!(k, k2);
        assert_eq!(pose, pose2);
    }
}
