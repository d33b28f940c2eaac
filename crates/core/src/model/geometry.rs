use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GeometryError {
    #[error("a point needs a coordinate")]
    PointMissing,

    #[error("a line needs at least {min} points, got {got}")]
    LineTooShort { min: usize, got: usize },

    #[error("a polygon needs at least {min} points, got {got}")]
    PolygonTooShort { min: usize, got: usize },
}

//
// ─── COORDINATES ───────────────────────────────────────────────────────────────
//

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<[f64; 2]> for LatLon {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

//
// ─── GEOMETRY ──────────────────────────────────────────────────────────────────
//

/// Shape drawn on the map for a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "points", rename_all = "lowercase")]
pub enum Geometry {
    Point(LatLon),
    Line(Vec<LatLon>),
    /// Implicitly closed: the last point connects back to the first.
    Polygon(Vec<LatLon>),
}

impl Geometry {
    pub const MIN_LINE_POINTS: usize = 2;
    pub const MIN_POLYGON_POINTS: usize = 3;

    #[must_use]
    pub fn point(lat: f64, lon: f64) -> Self {
        Self::Point(LatLon::new(lat, lon))
    }

    /// Build a line from an ordered list of points.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::LineTooShort` for fewer than two points.
    pub fn line(points: Vec<LatLon>) -> Result<Self, GeometryError> {
        if points.len() < Self::MIN_LINE_POINTS {
            return Err(GeometryError::LineTooShort {
                min: Self::MIN_LINE_POINTS,
                got: points.len(),
            });
        }
        Ok(Self::Line(points))
    }

    /// Build a polygon outline from an ordered list of points.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::PolygonTooShort` for fewer than three points.
    pub fn polygon(points: Vec<LatLon>) -> Result<Self, GeometryError> {
        if points.len() < Self::MIN_POLYGON_POINTS {
            return Err(GeometryError::PolygonTooShort {
                min: Self::MIN_POLYGON_POINTS,
                got: points.len(),
            });
        }
        Ok(Self::Polygon(points))
    }

    /// Stand-in for a feature without recorded coordinates.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::point(0.0, 0.0)
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "point",
            Self::Line(_) => "line",
            Self::Polygon(_) => "polygon",
        }
    }

    /// Points to draw, with polygons closed back to their first point.
    #[must_use]
    pub fn outline(&self) -> Vec<LatLon> {
        match self {
            Self::Point(p) => vec![*p],
            Self::Line(points) => points.clone(),
            Self::Polygon(points) => closed_ring(points),
        }
    }

    /// Where a label for this feature is placed on the map.
    ///
    /// Points label themselves, lines label their middle vertex and polygons
    /// the mean of their closed ring.
    #[must_use]
    pub fn label_anchor(&self) -> LatLon {
        match self {
            Self::Point(p) => *p,
            Self::Line(points) => points
                .get(points.len() / 2)
                .copied()
                .unwrap_or(LatLon::new(0.0, 0.0)),
            Self::Polygon(points) => {
                let ring = closed_ring(points);
                if ring.is_empty() {
                    return LatLon::new(0.0, 0.0);
                }
                let n = ring.len() as f64;
                let (lat, lon) = ring
                    .iter()
                    .fold((0.0, 0.0), |(lat, lon), p| (lat + p.lat, lon + p.lon));
                LatLon::new(lat / n, lon / n)
            }
        }
    }
}

fn closed_ring(points: &[LatLon]) -> Vec<LatLon> {
    let mut ring = points.to_vec();
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if first != last {
            ring.push(*first);
        }
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[[f64; 2]]) -> Vec<LatLon> {
        raw.iter().copied().map(LatLon::from).collect()
    }

    #[test]
    fn constructors_enforce_minimum_point_counts() {
        assert_eq!(
            Geometry::line(pts(&[[1.0, 1.0]])).unwrap_err(),
            GeometryError::LineTooShort { min: 2, got: 1 }
        );
        assert_eq!(
            Geometry::polygon(pts(&[[1.0, 1.0], [2.0, 2.0]])).unwrap_err(),
            GeometryError::PolygonTooShort { min: 3, got: 2 }
        );
        assert!(Geometry::line(pts(&[[1.0, 1.0], [2.0, 2.0]])).is_ok());
    }

    #[test]
    fn polygon_outline_is_closed_once() {
        let open = Geometry::polygon(pts(&[[0.0, 0.0], [0.0, 2.0], [2.0, 2.0]])).unwrap();
        let outline = open.outline();
        assert_eq!(outline.len(), 4);
        assert_eq!(outline.first(), outline.last());

        let closed =
            Geometry::polygon(pts(&[[0.0, 0.0], [0.0, 2.0], [2.0, 2.0], [0.0, 0.0]])).unwrap();
        assert_eq!(closed.outline().len(), 4);
    }

    #[test]
    fn label_anchor_uses_middle_vertex_for_lines() {
        let line = Geometry::line(pts(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]])).unwrap();
        assert_eq!(line.label_anchor(), LatLon::new(2.0, 2.0));
    }

    #[test]
    fn label_anchor_averages_closed_polygon_ring() {
        let square = Geometry::polygon(pts(&[[0.0, 0.0], [0.0, 4.0], [4.0, 4.0], [4.0, 0.0]])).unwrap();
        // ring repeats the first vertex, so the mean is pulled towards it
        let anchor = square.label_anchor();
        assert!((anchor.lat - 8.0 / 5.0).abs() < 1e-9);
        assert!((anchor.lon - 8.0 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn geometry_serializes_with_type_tag() {
        let json = serde_json::to_value(Geometry::point(52.5, 13.4)).unwrap();
        assert_eq!(json["type"], "point");
        assert_eq!(json["points"]["lat"], 52.5);
    }
}
