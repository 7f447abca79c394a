//! Per-run statistics and anomaly counters.

use crate::error::TessellationError;

/// Counters for the recoverable anomalies met during a run.
///
/// Each increment corresponds to one `warn!` emitted by the stage that
/// resolved the anomaly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnomalyCounts {
    /// Vertices outside their assigned cell, replaced by the nearest point inside it.
    pub clamped_vertices: usize,
    /// Cell transitions where no edge intersection was found.
    pub missing_edge_points: usize,
    /// Stitched contour pairs whose shared endpoint did not match.
    pub orphan_mismatches: usize,
    /// Consecutive crossed cells that share neither an edge nor a corner.
    pub non_adjacent_crossings: usize,
    /// Cell/record groups the triangulator rejected.
    pub triangulation_failures: usize,
}

impl AnomalyCounts {
    /// Sum of all counters.
    pub fn total(&self) -> usize {
        self.clamped_vertices
            + self.missing_edge_points
            + self.orphan_mismatches
            + self.non_adjacent_crossings
            + self.triangulation_failures
    }
}

/// A record that was dropped from the output.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordFailure {
    /// Index of the record in the input slice.
    pub record: usize,
    /// Why it was dropped.
    pub error: TessellationError,
}

/// Summary of one tessellation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TessellationReport {
    /// Recoverable anomalies.
    pub anomalies: AnomalyCounts,
    /// Records aborted by a fatal error.
    pub failed_records: Vec<RecordFailure>,
    /// Rings walked successfully.
    pub rings: usize,
    /// Cells holding at least one boundary contour.
    pub touched_cells: usize,
    /// Cells marked filled by the interior pass.
    pub filled_cells: usize,
    /// Triangles in the assembled mesh.
    pub triangles: usize,
}

impl TessellationReport {
    /// Returns `true` if no record failed and no anomaly was recorded.
    pub fn is_clean(&self) -> bool {
        self.failed_records.is_empty() && self.anomalies.total() == 0
    }
}
