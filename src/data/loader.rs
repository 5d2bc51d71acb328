use std::path::Path;

use serde::de::DeserializeOwned;

use crate::data::region::{PlotRequest, UncheckedPlotRequest};
use crate::data::roi_mean::{LabelMap, Volume};
use crate::error::{GrapherError, Result};
use crate::export::csv::parse_voi_csv;

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Load a VOI table: a CSV export (or plain table) or a JSON plot request.
pub fn load_voi_table(path: &Path) -> Result<PlotRequest> {
    let request = match extension(path).as_str() {
        "csv" => parse_voi_csv(&std::fs::read_to_string(path)?)?,
        "json" => PlotRequest::try_from(read_json::<UncheckedPlotRequest>(path)?)?,
        ext => {
            return Err(GrapherError::Parse(format!(
                "unsupported file format: .{ext}"
            )))
        }
    };
    tracing::info!(
        "Loaded {} regions x {} frames from {:?}",
        request.y.num_regions(),
        request.y.num_frames(),
        path
    );
    Ok(request)
}

/// Load an image volume stored as JSON (`dims`, `frames`, `data`).
pub fn load_volume(path: &Path) -> Result<Volume> {
    read_json(path)
}

/// Load an object map stored as JSON (`dims`, `labels`).
pub fn load_label_map(path: &Path) -> Result<LabelMap> {
    read_json(path)
}
