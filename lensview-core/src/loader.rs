/// Whitespace-separated point file parser
use std::fs;
use std::path::Path;

use nalgebra::Point3;
use nom::{
    character::complete::{space0, space1},
    combinator::all_consuming,
    multi::separated_list1,
    number::complete::double,
    sequence::delimited,
    IResult,
};

use crate::error::LoadError;
use crate::geometry::PointCloud;

/// Expected shape of each row in a point file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointFormat {
    /// Two numbers per row; z is set to 1.0.
    Planar,
    /// Three numbers per row.
    Spatial,
    /// Decided by the first data row, then enforced for the rest.
    Auto,
}

impl PointFormat {
    fn expected(self) -> &'static str {
        match self {
            PointFormat::Planar => "2 numbers",
            PointFormat::Spatial => "3 numbers",
            PointFormat::Auto => "2 or 3 numbers",
        }
    }

    fn resolve(self, count: usize) -> Option<PointFormat> {
        match (self, count) {
            (PointFormat::Planar, 2) | (PointFormat::Auto, 2) => Some(PointFormat::Planar),
            (PointFormat::Spatial, 3) | (PointFormat::Auto, 3) => Some(PointFormat::Spatial),
            _ => None,
        }
    }
}

/// Read and parse a point file
///
/// Nothing is returned unless every row parses.
pub fn load_points(path: impl AsRef<Path>, format: PointFormat) -> Result<PointCloud, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cloud = parse_points(&text, format)?;
    log::info!("Loaded {} points from {}", cloud.len(), path.display());
    Ok(cloud)
}

/// Parse point rows from text; blank lines are skipped
pub fn parse_points(input: &str, format: PointFormat) -> Result<PointCloud, LoadError> {
    let mut format = format;
    let mut cloud = PointCloud::new();

    for (index, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let format_error = || LoadError::Format {
            line: index + 1,
            expected: format.expected(),
            found: line.trim().to_string(),
        };

        let (_, row) = parse_row(line).map_err(|_| format_error())?;
        let resolved = format.resolve(row.len()).ok_or_else(format_error)?;
        format = resolved;

        let point = match resolved {
            PointFormat::Planar => Point3::new(row[0], row[1], 1.0),
            _ => Point3::new(row[0], row[1], row[2]),
        };
        cloud.push(point);
    }

    Ok(cloud)
}

fn parse_row(input: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(delimited(space0, separated_list1(space1, double), space0))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_spatial_rows() {
        let cloud = parse_points("1 2 3\n-4.5\t0 1e2\n", PointFormat::Spatial).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.points()[1], Point3::new(-4.5, 0.0, 100.0));
    }

    #[test]
    fn test_auto_detects_planar() {
        let cloud = parse_points("1 2\n\n3 4\r\n", PointFormat::Auto).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.points()[0], Point3::new(1.0, 2.0, 1.0));
        assert_eq!(cloud.points()[1], Point3::new(3.0, 4.0, 1.0));
    }

    #[test]
    fn test_auto_rejects_mixed_rows() {
        let err = parse_points("1 2 3\n4 5\n", PointFormat::Auto).unwrap_err();
        match err {
            LoadError::Format { line, expected, .. } => {
                assert_eq!(line, 2);
                assert_eq!(expected, "3 numbers");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_garbage_token() {
        let err = parse_points("1 2 x\n", PointFormat::Spatial).unwrap_err();
        assert!(matches!(err, LoadError::Format { line: 1, .. }));
    }

    #[test]
    fn test_rejects_wrong_count() {
        assert!(parse_points("1 2 3 4\n", PointFormat::Spatial).is_err());
        assert!(parse_points("1 2 3\n", PointFormat::Planar).is_err());
    }

    #[test]
    fn test_empty_input_is_empty_cloud() {
        let cloud = parse_points("", PointFormat::Auto).unwrap();
        assert!(cloud.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 0 0").unwrap();
        writeln!(file, "1 0 0").unwrap();
        let cloud = load_points(file.path(), PointFormat::Spatial).unwrap();
        assert_eq!(cloud.len(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_points("/nonexistent/points.txt", PointFormat::Auto).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
