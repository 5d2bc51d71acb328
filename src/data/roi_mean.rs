use serde::{Deserialize, Serialize};

use crate::data::region::{RegionMatrix, RoiStats, MAX_REGIONS};
use crate::error::{GrapherError, Result};

/// An image volume with one or more frames. `data` is frame-major:
/// `data[frame * voxels + (z * dims[1] + y) * dims[0] + x]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub dims: [usize; 3],
    #[serde(default = "one")]
    pub frames: usize,
    pub data: Vec<f32>,
}

fn one() -> usize {
    1
}

impl Volume {
    /// `None` when the dimensions overflow `usize`.
    pub fn voxels_per_frame(&self) -> Option<usize> {
        self.dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }
}

/// An object map: one integer label per voxel, 0 meaning background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMap {
    pub dims: [usize; 3],
    pub labels: Vec<u32>,
}

/// Average every frame of `image` over each labelled region of `objectmap`.
///
/// Label `l` maps to region `l - 1`; regions without voxels get a mean of 0.
pub fn roi_mean(image: &Volume, objectmap: &LabelMap) -> Result<RoiStats> {
    if image.dims != objectmap.dims {
        return Err(GrapherError::Computation(format!(
            "image dimensions {:?} do not match object map dimensions {:?}",
            image.dims, objectmap.dims
        )));
    }
    let voxels = image.voxels_per_frame().ok_or_else(|| {
        GrapherError::Computation(format!("image dimensions {:?} are too large", image.dims))
    })?;
    if objectmap.labels.len() != voxels {
        return Err(GrapherError::Computation(format!(
            "object map has {} labels for {} voxels",
            objectmap.labels.len(),
            voxels
        )));
    }
    if voxels.checked_mul(image.frames) != Some(image.data.len()) {
        return Err(GrapherError::Computation(format!(
            "image has {} values for {} voxels x {} frames",
            image.data.len(),
            voxels,
            image.frames
        )));
    }

    let num_regions = objectmap.labels.iter().copied().max().unwrap_or(0) as usize;
    if num_regions > MAX_REGIONS {
        return Err(GrapherError::Computation(format!(
            "object map has {num_regions} regions, the limit is {MAX_REGIONS}"
        )));
    }
    let mut num_voxels = vec![0u64; num_regions];
    let mut sums = vec![vec![0.0f64; image.frames]; num_regions];

    for (voxel, &label) in objectmap.labels.iter().enumerate() {
        if label == 0 {
            continue;
        }
        let region = label as usize - 1;
        num_voxels[region] += 1;
        for (frame, sum) in sums[region].iter_mut().enumerate() {
            *sum += f64::from(image.data[frame * voxels + voxel]);
        }
    }

    for (sum_row, &count) in sums.iter_mut().zip(&num_voxels) {
        if count > 0 {
            let n = count as f64;
            sum_row.iter_mut().for_each(|v| *v /= n);
        }
    }

    tracing::debug!(
        regions = num_regions,
        frames = image.frames,
        "computed roi means"
    );
    Ok(RoiStats {
        means: RegionMatrix::new(sums)?,
        num_voxels,
    })
}
