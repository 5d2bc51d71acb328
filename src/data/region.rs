//! Region-by-frame statistics and the region inclusion rule.

use serde::{Deserialize, Serialize};

use crate::error::{GrapherError, Result};

/// Largest region count accepted from object maps and VOI tables.
pub const MAX_REGIONS: usize = 1 << 16;

/// Number of voxels per region, parallel to the region axis of a [`RegionMatrix`].
pub type VoxelCounts = Vec<u64>;

/// Rectangular `matrix[region][frame]` table of region means.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct RegionMatrix {
    rows: Vec<Vec<f64>>,
    frames: usize,
}

impl RegionMatrix {
    /// Build from one row per region. Every row must have the same number of frames.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let frames = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|row| row.len() != frames) {
            return Err(GrapherError::DimensionMismatch {
                what: "frames per region",
                expected: frames,
                found: bad.len(),
            });
        }
        Ok(Self { rows, frames })
    }

    pub fn num_regions(&self) -> usize {
        self.rows.len()
    }

    pub fn num_frames(&self) -> usize {
        self.frames
    }

    pub fn region(&self, region: usize) -> &[f64] {
        &self.rows[region]
    }

    /// Default x axis: frame indices `0..frames` for a time series, otherwise
    /// one-based region indices.
    pub fn default_axis(&self) -> Vec<f64> {
        if self.frames > 1 {
            (0..self.frames).map(|f| f as f64).collect()
        } else {
            (1..=self.rows.len()).map(|r| r as f64).collect()
        }
    }
}

impl TryFrom<Vec<Vec<f64>>> for RegionMatrix {
    type Error = GrapherError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        RegionMatrix::new(rows)
    }
}

impl From<RegionMatrix> for Vec<Vec<f64>> {
    fn from(matrix: RegionMatrix) -> Self {
        matrix.rows
    }
}

/// Output of ROI averaging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiStats {
    pub means: RegionMatrix,
    pub num_voxels: VoxelCounts,
}

/// The data submitted by one plot request, retained for replotting and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedPlotRequest")]
pub struct PlotRequest {
    pub x: Vec<f64>,
    pub y: RegionMatrix,
    pub voxel_counts: Option<VoxelCounts>,
}

impl PlotRequest {
    pub fn new(x: Vec<f64>, y: RegionMatrix, voxel_counts: Option<VoxelCounts>) -> Result<Self> {
        check_counts(&y, voxel_counts.as_deref())?;
        Ok(Self { x, y, voxel_counts })
    }

    pub fn counts(&self) -> Option<&[u64]> {
        self.voxel_counts.as_deref()
    }
}

/// A plot request as read from a file, before its voxel counts are checked
/// against the regions.
#[derive(Debug, Clone, Deserialize)]
pub struct UncheckedPlotRequest {
    pub x: Vec<f64>,
    pub y: RegionMatrix,
    #[serde(default)]
    pub voxel_counts: Option<VoxelCounts>,
}

impl TryFrom<UncheckedPlotRequest> for PlotRequest {
    type Error = GrapherError;

    fn try_from(raw: UncheckedPlotRequest) -> Result<Self> {
        PlotRequest::new(raw.x, raw.y, raw.voxel_counts)
    }
}

impl From<RoiStats> for PlotRequest {
    fn from(stats: RoiStats) -> Self {
        Self {
            x: stats.means.default_axis(),
            y: stats.means,
            voxel_counts: Some(stats.num_voxels),
        }
    }
}

/// Fail fast when voxel counts do not cover exactly the regions of `y`.
pub fn check_counts(y: &RegionMatrix, counts: Option<&[u64]>) -> Result<()> {
    match counts {
        Some(counts) if counts.len() != y.num_regions() => Err(GrapherError::DimensionMismatch {
            what: "voxel counts per region",
            expected: y.num_regions(),
            found: counts.len(),
        }),
        _ => Ok(()),
    }
}

/// A region is shown when there is no volume data or it has at least one voxel.
pub fn is_included(counts: Option<&[u64]>, region: usize) -> bool {
    counts.map_or(true, |c| c.get(region).is_some_and(|&n| n > 0))
}

/// Indices of the shown regions, in region order.
pub fn included_regions(
    num_regions: usize,
    counts: Option<&[u64]>,
) -> impl Iterator<Item = usize> + '_ {
    (0..num_regions).filter(move |&r| is_included(counts, r))
}
