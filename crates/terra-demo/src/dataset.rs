//! RON polygon datasets.
//!
//! A dataset file looks like
//!
//! ```ron
//! (
//!     sector: Some((min_latitude: 0.0, max_latitude: 10.0, min_longitude: 0.0, max_longitude: 10.0)),
//!     records: [
//!         (parts: [[(latitude: 1.0, longitude: 1.0), (latitude: 1.0, longitude: 9.0), (latitude: 9.0, longitude: 5.0)]]),
//!     ],
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use terra_config::TessellationConfig;
use terra_geo::{LatLon, Sector};
use terra_tessellate::{GridTessellator, PolygonRecord, TessellationError};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ron parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    /// Grid sector. Overrides the configured one when present.
    pub sector: Option<Sector>,
    pub records: Vec<PolygonRecord>,
}

impl Dataset {
    pub fn from_ron(path: &Path) -> Result<Self, DatasetError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    pub fn from_ron_str(ron_str: &str) -> Result<Self, DatasetError> {
        Ok(ron::from_str(ron_str)?)
    }

    /// Built-in sample: a square lake with an island and a triangular field.
    pub fn sample() -> Self {
        let ring = |pts: &[(f64, f64)]| pts.iter().map(|&p| LatLon::from(p)).collect::<Vec<_>>();
        let lake = PolygonRecord::new(vec![
            ring(&[(1.0, 1.0), (1.0, 9.0), (9.0, 9.0), (9.0, 1.0)]),
            ring(&[(3.0, 3.0), (6.5, 3.0), (6.5, 6.5), (3.0, 6.5)]),
        ]);
        let field = PolygonRecord::ring(ring(&[(0.5, 10.5), (4.0, 14.5), (9.5, 11.0)]));
        Self {
            sector: None,
            records: vec![lake, field],
        }
    }

    /// Picks the grid sector: the dataset's own, then the configured one,
    /// then the bounding box of the records.
    pub fn tessellator(
        &self,
        config: &TessellationConfig,
    ) -> Result<GridTessellator, TessellationError> {
        match self.sector.or(config.sector) {
            Some(sector) => GridTessellator::new(sector, config.subdivisions),
            None => GridTessellator::for_records(&self.records, config.subdivisions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset() {
        let dataset = Dataset::from_ron_str(
            "(records: [(parts: [[(latitude: 1.0, longitude: 2.0), (latitude: 3.0, longitude: 2.0), (latitude: 3.0, longitude: 5.0)]])])",
        )
        .unwrap();
        assert_eq!(dataset.sector, None);
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.records[0].parts[0][2], LatLon::new(3.0, 5.0));
    }

    #[test]
    fn test_invalid_dataset() {
        assert!(matches!(
            Dataset::from_ron_str("(records: 3)"),
            Err(DatasetError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Dataset::from_ron(&dir.path().join("absent.ron")),
            Err(DatasetError::Io(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.ron");
        let sample = Dataset::sample();
        std::fs::write(&path, ron::to_string(&sample).unwrap()).unwrap();
        assert_eq!(Dataset::from_ron(&path).unwrap(), sample);
    }

    #[test]
    fn test_sector_precedence() {
        let mut config = TessellationConfig::default();
        let mut dataset = Dataset::sample();

        let bounding = dataset.tessellator(&config).unwrap();
        assert_eq!(*bounding.sector(), Sector::new(0.5, 9.5, 1.0, 14.5));
        assert_eq!(bounding.subdivisions(), 8);

        let configured = Sector::new(0.0, 20.0, 0.0, 20.0);
        config.sector = Some(configured);
        assert_eq!(*dataset.tessellator(&config).unwrap().sector(), configured);

        let own = Sector::new(0.0, 10.0, 0.0, 15.0);
        dataset.sector = Some(own);
        assert_eq!(*dataset.tessellator(&config).unwrap().sector(), own);
    }

    #[test]
    fn test_sample_tessellates_cleanly() {
        let dataset = Dataset::sample();
        let tessellation = dataset
            .tessellator(&TessellationConfig::default())
            .unwrap()
            .tessellate(&dataset.records)
            .unwrap();
        assert!(tessellation.report.failed_records.is_empty());
        // 64 - 12.25 for the lake, 17.125 for the field.
        let expected = 64.0 - 12.25 + 17.125;
        assert!((tessellation.mesh.planar_area() - expected).abs() < 1e-6);
    }
}
