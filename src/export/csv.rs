//! VOI table serialization.
//!
//! Layout of an export (one column per shown region):
//!
//! ```text
//!       ,Region 1,Region 3
//! Volume,12,40
//! Frame,Region 1,Region 3
//! 0,1.5,2.25
//! 1,1.75,2.5
//! ```

use std::collections::HashSet;

use crate::data::region::{
    check_counts, included_regions, PlotRequest, RegionMatrix, MAX_REGIONS,
};
use crate::error::{GrapherError, Result};

const VOLUME_ROW: &str = "Volume";
const FRAME_ROW: &str = "Frame";

fn region_header(region: usize) -> String {
    format!("Region {}", region + 1)
}

fn parse_region_header(cell: &str) -> Option<usize> {
    cell.strip_prefix("Region ")?
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|&k| k > 0)
        .map(|k| k - 1)
}

/// Serialize the shown regions of a request as CSV text.
///
/// The column set is chosen with the same rule as the chart formatter, so an
/// export always contains exactly the regions that were plotted.
pub fn write_voi_csv(request: &PlotRequest) -> Result<String> {
    let y = &request.y;
    let counts = request.counts();
    check_counts(y, counts)?;
    let frames = y.num_frames();
    if request.x.len() < frames {
        return Err(GrapherError::DimensionMismatch {
            what: "x axis values per frame",
            expected: frames,
            found: request.x.len(),
        });
    }
    let columns: Vec<usize> = included_regions(y.num_regions(), counts).collect();

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    let labels = columns.iter().map(|&r| region_header(r));
    writer.write_record(std::iter::once(String::new()).chain(labels.clone()))?;

    let volumes = columns.iter().map(|&r| match counts {
        Some(c) => c[r].to_string(),
        None => String::new(),
    });
    writer.write_record(std::iter::once(VOLUME_ROW.to_string()).chain(volumes))?;

    writer.write_record(std::iter::once(FRAME_ROW.to_string()).chain(labels))?;

    for frame in 0..frames {
        let values = columns.iter().map(|&r| y.region(r)[frame].to_string());
        writer.write_record(std::iter::once(request.x[frame].to_string()).chain(values))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| GrapherError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| GrapherError::Parse(e.to_string()))
}

/// Read a VOI table back into a plot request.
///
/// Exports are recognised by their `Volume`/`Frame` header rows; each column is
/// put back at the region named by its header and regions absent from the file
/// get a voxel count of zero. Any other table is read as a header row followed
/// by `x, region values...` rows, without voxel counts.
pub fn parse_voi_csv(text: &str) -> Result<PlotRequest> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    let is_export = rows.len() >= 3
        && rows[1].first().map(String::as_str) == Some(VOLUME_ROW)
        && rows[2].first().map(String::as_str) == Some(FRAME_ROW);
    if is_export {
        parse_export(&rows)
    } else {
        parse_plain(&rows)
    }
}

fn parse_number(cell: &str) -> Result<f64> {
    cell.parse::<f64>()
        .map_err(|_| GrapherError::Parse(format!("not a number: {cell:?}")))
}

fn check_width(row: &[String], width: usize) -> Result<()> {
    if row.len() != width {
        return Err(GrapherError::DimensionMismatch {
            what: "cells per row",
            expected: width,
            found: row.len(),
        });
    }
    Ok(())
}

fn parse_export(rows: &[Vec<String>]) -> Result<PlotRequest> {
    let header = &rows[2];
    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(header.len().saturating_sub(1));
    for cell in &header[1..] {
        let region = parse_region_header(cell)
            .ok_or_else(|| GrapherError::Parse(format!("bad region header: {cell:?}")))?;
        if region >= MAX_REGIONS {
            return Err(GrapherError::Parse(format!(
                "{cell:?} exceeds the limit of {MAX_REGIONS} regions"
            )));
        }
        if !seen.insert(region) {
            return Err(GrapherError::Parse(format!("duplicate column: {cell:?}")));
        }
        columns.push(region);
    }
    let width = header.len();
    let num_regions = columns.iter().max().map_or(0, |&m| m + 1);

    let volume_row = &rows[1];
    check_width(volume_row, width)?;
    let voxel_counts = if volume_row[1..].iter().all(String::is_empty) {
        None
    } else {
        let mut counts = vec![0u64; num_regions];
        for (&region, cell) in columns.iter().zip(&volume_row[1..]) {
            counts[region] = cell
                .parse::<u64>()
                .map_err(|_| GrapherError::Parse(format!("bad voxel count: {cell:?}")))?;
        }
        Some(counts)
    };

    let data = &rows[3..];
    let mut x = Vec::with_capacity(data.len());
    let mut matrix = vec![vec![0.0; data.len()]; num_regions];
    for (frame, row) in data.iter().enumerate() {
        check_width(row, width)?;
        x.push(parse_number(&row[0])?);
        for (&region, cell) in columns.iter().zip(&row[1..]) {
            matrix[region][frame] = parse_number(cell)?;
        }
    }

    PlotRequest::new(x, RegionMatrix::new(matrix)?, voxel_counts)
}

fn parse_plain(rows: &[Vec<String>]) -> Result<PlotRequest> {
    let Some((header, data)) = rows.split_first() else {
        return Err(GrapherError::Parse("empty table".into()));
    };
    let width = header.len();
    if width < 2 {
        return Err(GrapherError::Parse("table has no region columns".into()));
    }

    let mut x = Vec::with_capacity(data.len());
    let mut matrix = vec![Vec::with_capacity(data.len()); width - 1];
    for row in data {
        check_width(row, width)?;
        x.push(parse_number(&row[0])?);
        for (column, cell) in matrix.iter_mut().zip(&row[1..]) {
            column.push(parse_number(cell)?);
        }
    }

    PlotRequest::new(x, RegionMatrix::new(matrix)?, None)
}
