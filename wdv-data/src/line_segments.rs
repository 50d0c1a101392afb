//! Line segments for instantaneous values, split on approval and data mask.

use log::debug;
use serde::Serialize;
use wdv_nwis::{MaskQualifier, Point};

/// Rendering classification shared by every point of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineClasses {
    pub approved: bool,
    pub estimated: bool,
    pub data_mask: Option<MaskQualifier>,
}

/// A maximal run of consecutive points with equal [`LineClasses`]. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSegment {
    pub classes: LineClasses,
    pub points: Vec<Point>,
}

/// The mask explaining a missing value. Only null-valued points are masked.
/// If several masks match, the first in [`MaskQualifier::ALL`] order wins.
pub fn data_mask(point: &Point) -> Option<MaskQualifier> {
    if point.value.is_some() {
        return None;
    }
    let masks = MaskQualifier::all_in(&point.qualifiers);
    if masks.len() > 1 {
        debug!(
            "Point at {} carries multiple masks {:?}, using {:?}",
            point.date_time, masks, masks[0]
        );
    }
    masks.first().copied()
}

pub fn line_classes(point: &Point) -> LineClasses {
    LineClasses {
        approved: point.approved,
        estimated: point.estimated,
        data_mask: data_mask(point),
    }
}

/// Split instantaneous values into segments, starting a new one whenever a
/// point's classification differs from its predecessor's.
pub fn line_segments(points: &[Point]) -> Vec<LineSegment> {
    let mut segments: Vec<LineSegment> = Vec::new();
    for point in points {
        let classes = line_classes(point);
        match segments.last_mut() {
            Some(current) if current.classes == classes => current.points.push(point.clone()),
            _ => segments.push(LineSegment {
                classes,
                points: vec![point.clone()],
            }),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date_time: i64, value: Option<f64>, qualifiers: &[&str]) -> Point {
        let qualifiers = qualifiers.iter().map(|q| q.to_string()).collect::<Vec<String>>();
        Point {
            date_time,
            value,
            approved: qualifiers.iter().any(|q| q == "A"),
            estimated: qualifiers.iter().any(|q| q == "E"),
            qualifiers,
        }
    }

    #[test]
    fn test_empty_points() {
        assert!(line_segments(&[]).is_empty());
    }

    #[test]
    fn test_approval_change_starts_segment() {
        let points = vec![
            point(1, Some(10.0), &["P"]),
            point(2, Some(11.0), &["A"]),
            point(3, Some(12.0), &["A"]),
        ];
        let segments = line_segments(&points);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].points.len(), 1);
        assert_eq!(segments[1].points.len(), 2);
        assert!(!segments[0].classes.approved);
        assert!(segments[1].classes.approved);
    }

    #[test]
    fn test_masked_points_form_their_own_segment() {
        let points = vec![
            point(1, Some(10.0), &["P"]),
            point(2, Some(11.0), &["P"]),
            point(3, None, &["P", "ICE"]),
            point(4, None, &["P", "ice"]),
            point(5, Some(9.0), &["P"]),
        ];
        let segments = line_segments(&points);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].points.len(), 2);
        assert_eq!(segments[0].classes.data_mask, None);
        assert_eq!(segments[1].classes.data_mask, Some(MaskQualifier::Ice));
        assert_eq!(
            segments[1].points.iter().map(|p| p.date_time).collect::<Vec<_>>(),
            vec![3, 4]
        );
        assert_eq!(segments[2].points.len(), 1);
    }

    #[test]
    fn test_mask_requires_null_value() {
        let valued = point(1, Some(1.0), &["Ice"]);
        assert_eq!(data_mask(&valued), None);
        let unmasked_null = point(2, None, &["P"]);
        assert_eq!(data_mask(&unmasked_null), None);
    }

    #[test]
    fn test_multiple_masks_use_vocabulary_order() {
        let p = point(1, None, &["Dry", "Eqp", "Ice"]);
        assert_eq!(data_mask(&p), Some(MaskQualifier::Ice));
    }

    #[test]
    fn test_segments_partition_input() {
        let points = vec![
            point(1, Some(1.0), &["A"]),
            point(2, Some(1.0), &["A", "E"]),
            point(3, None, &["P", "Dry"]),
            point(4, None, &["P", "Ice"]),
            point(5, None, &["P"]),
            point(6, Some(1.0), &["P"]),
        ];
        let segments = line_segments(&points);
        assert_eq!(segments.len(), 5);
        let flattened = segments
            .iter()
            .flat_map(|s| s.points.iter().cloned())
            .collect::<Vec<Point>>();
        assert_eq!(flattened, points);
        assert!(segments.iter().all(|s| !s.points.is_empty()));
    }

    #[test]
    fn test_classes_serialize_with_mask_code() {
        let classes = line_classes(&point(1, None, &["P", "Ice"]));
        assert_eq!(
            serde_json::to_value(classes).unwrap(),
            serde_json::json!({"approved": false, "estimated": false, "dataMask": "ice"})
        );
    }
}
