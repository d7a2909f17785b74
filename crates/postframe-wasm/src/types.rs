//! Conversions between JavaScript-friendly values and core types.
//!
//! Everything here is plain Rust so it can be unit tested on the host.

use postframe_core::{FilterId, FlipAxis, Phase, Point, UnknownFilter};
use serde::Serialize;

/// Parse a pointer phase name (`"start"`, `"move"`, `"end"`, `"cancel"`).
pub(crate) fn phase_from_str(value: &str) -> Option<Phase> {
    match value {
        "start" => Some(Phase::Start),
        "move" => Some(Phase::Move),
        "end" => Some(Phase::End),
        "cancel" => Some(Phase::Cancel),
        _ => None,
    }
}

/// Parse a flip axis name (`"horizontal"` or `"vertical"`).
pub(crate) fn axis_from_str(value: &str) -> Option<FlipAxis> {
    match value {
        "horizontal" | "x" => Some(FlipAxis::Horizontal),
        "vertical" | "y" => Some(FlipAxis::Vertical),
        _ => None,
    }
}

/// Parse an optional filter identifier. `None` and `""` clear the filter.
pub(crate) fn filter_from_str(value: Option<&str>) -> Result<Option<FilterId>, UnknownFilter> {
    match value {
        None | Some("") | Some("none") => Ok(None),
        Some(id) => id.parse().map(Some),
    }
}

/// Convert flat `[x0, y0, x1, y1, ...]` coordinates into points.
///
/// A trailing unpaired value is dropped.
pub(crate) fn points_from_flat(coords: &[f64]) -> Vec<Point> {
    coords
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect()
}

/// Entry of the filter picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct FilterInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub css: &'static str,
}

pub(crate) fn filter_catalog() -> Vec<FilterInfo> {
    FilterId::ALL
        .into_iter()
        .map(|f| FilterInfo {
            id: f.as_str(),
            label: f.label(),
            css: f.css(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_from_str() {
        assert_eq!(phase_from_str("start"), Some(Phase::Start));
        assert_eq!(phase_from_str("move"), Some(Phase::Move));
        assert_eq!(phase_from_str("end"), Some(Phase::End));
        assert_eq!(phase_from_str("cancel"), Some(Phase::Cancel));
        assert_eq!(phase_from_str("hover"), None);
    }

    #[test]
    fn test_axis_from_str() {
        assert_eq!(axis_from_str("horizontal"), Some(FlipAxis::Horizontal));
        assert_eq!(axis_from_str("y"), Some(FlipAxis::Vertical));
        assert_eq!(axis_from_str("diagonal"), None);
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!(filter_from_str(None), Ok(None));
        assert_eq!(filter_from_str(Some("")), Ok(None));
        assert_eq!(filter_from_str(Some("none")), Ok(None));
        assert_eq!(filter_from_str(Some("sepia")), Ok(Some(FilterId::Sepia)));
        assert!(filter_from_str(Some("lomo")).is_err());
    }

    #[test]
    fn test_points_from_flat() {
        let points = points_from_flat(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(points, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
        assert!(points_from_flat(&[]).is_empty());
    }

    #[test]
    fn test_filter_catalog() {
        let catalog = filter_catalog();
        assert_eq!(catalog.len(), FilterId::ALL.len());
        assert_eq!(catalog[0].id, "grayscale");
        assert_eq!(catalog[0].label, "Grayscale");
    }
}
