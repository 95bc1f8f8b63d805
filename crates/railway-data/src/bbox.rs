use crate::error::RailwayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Axis-aligned rectangle in geographic coordinates.
///
/// `x` is longitude and `y` is latitude. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self, RailwayError> {
        if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
            return Err(RailwayError::InvalidBbox(
                "coordinates must be finite".to_string(),
            ));
        }
        if min_x > max_x || min_y > max_y {
            return Err(RailwayError::InvalidBbox(format!(
                "minimum exceeds maximum in ({min_x}, {min_y})-({max_x}, {max_y})"
            )));
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        (self.min_x..=self.max_x).contains(&longitude)
            && (self.min_y..=self.max_y).contains(&latitude)
    }
}

/// Renders as `minx,miny,maxx,maxy`
impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

impl FromStr for BoundingBox {
    type Err = RailwayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RailwayError::InvalidBbox(format!("{s:?}: {e}")))?;

        match values.as_slice() {
            &[min_x, min_y, max_x, max_y] => Self::new(min_x, min_y, max_x, max_y),
            _ => Err(RailwayError::InvalidBbox(format!(
                "{s:?}: expected 4 comma-separated values, got {}",
                values.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let bbox = BoundingBox::new(138.99, 34.99, 139.02, 35.02).unwrap();
        assert!(bbox.contains(139.0, 35.0));
        assert!(bbox.contains(139.01, 35.01));
        assert!(bbox.contains(138.99, 34.99));
        assert!(bbox.contains(139.02, 35.02));
        assert!(!bbox.contains(140.0, 36.0));
        assert!(!bbox.contains(139.0, 35.03));
    }

    #[test]
    fn test_rejects_inverted_box() {
        assert!(BoundingBox::new(139.1, 35.0, 139.0, 35.1).is_err());
        assert!(BoundingBox::new(139.0, 35.1, 139.1, 35.0).is_err());
        assert!(BoundingBox::new(f64::NAN, 35.0, 139.1, 35.1).is_err());
    }

    #[test]
    fn test_display_and_parse() {
        let bbox = BoundingBox::new(139.69, 35.65, 139.71, 35.7).unwrap();
        assert_eq!(bbox.to_string(), "139.69,35.65,139.71,35.7");

        let parsed: BoundingBox = bbox.to_string().parse().unwrap();
        assert_eq!(parsed, bbox);

        let spaced: BoundingBox = " 139.69, 35.65 ,139.71,35.7".parse().unwrap();
        assert_eq!(spaced, bbox);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "1,2,3".parse::<BoundingBox>(),
            Err(RailwayError::InvalidBbox(_))
        ));
        assert!(matches!(
            "a,b,c,d".parse::<BoundingBox>(),
            Err(RailwayError::InvalidBbox(_))
        ));
        assert!("3,2,1,4".parse::<BoundingBox>().is_err());
    }
}
