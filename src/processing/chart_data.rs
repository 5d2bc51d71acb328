//! Conversion of region statistics into chart-ready data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::region::{check_counts, included_regions, RegionMatrix};
use crate::error::{GrapherError, Result};
use crate::state::palette::{Palette, Rgb};

/// One line of a time-series chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<f64>,
    pub color: Rgb,
}

/// One bar of a per-region bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub value: f64,
    /// One-based region index, which is also the bar's x position.
    pub index: usize,
    pub label: String,
    pub color: Rgb,
}

/// What the bars of a bar chart measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarQuantity {
    Intensity,
    Volume,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    TimeSeries {
        x: Vec<f64>,
        series: Vec<ChartSeries>,
    },
    Bars {
        bars: Vec<ChartBar>,
        colors: BTreeMap<String, Rgb>,
        quantity: BarQuantity,
    },
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::TimeSeries { series, .. } => series.is_empty(),
            ChartData::Bars { bars, .. } => bars.is_empty(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartData::TimeSeries { .. } => "Average Intensity in each Region vs Time",
            ChartData::Bars { quantity: BarQuantity::Intensity, .. } => {
                "Average Intensity in each Region"
            }
            ChartData::Bars { quantity: BarQuantity::Volume, .. } => "Volume of each Region",
        }
    }

    pub fn x_axis_label(&self) -> &'static str {
        match self {
            ChartData::TimeSeries { .. } => "Time (s)",
            ChartData::Bars { .. } => "Region Index",
        }
    }

    pub fn y_axis_label(&self) -> &'static str {
        match self {
            ChartData::TimeSeries { .. } => "Intensity",
            ChartData::Bars { quantity: BarQuantity::Intensity, .. } => "Intensity (pixel value)",
            ChartData::Bars { quantity: BarQuantity::Volume, .. } => "Volume (voxels)",
        }
    }
}

/// True when the request is drawn as one line per region.
pub fn is_time_series(num_frames: usize, show_volume: bool) -> bool {
    num_frames > 1 && !show_volume
}

/// Format region statistics for plotting.
///
/// Regions with a zero voxel count are left out. Without voxel counts every
/// region is shown and `show_volume` is ignored, since there is no volume to show.
pub fn format_chart_data(
    x: &[f64],
    y: &RegionMatrix,
    voxel_counts: Option<&[u64]>,
    show_volume: bool,
    palette: &Palette,
) -> Result<ChartData> {
    check_counts(y, voxel_counts)?;
    let show_volume = show_volume && voxel_counts.is_some();
    let frames = y.num_frames();

    if is_time_series(frames, show_volume) {
        if x.len() != frames {
            return Err(GrapherError::DimensionMismatch {
                what: "x axis values per frame",
                expected: frames,
                found: x.len(),
            });
        }
        let series = included_regions(y.num_regions(), voxel_counts)
            .map(|region| ChartSeries {
                label: format!("Region {region}"),
                values: y.region(region).to_vec(),
                color: palette.color_for_region(region),
            })
            .collect();
        return Ok(ChartData::TimeSeries {
            x: x.to_vec(),
            series,
        });
    }

    let quantity = if show_volume {
        BarQuantity::Volume
    } else {
        BarQuantity::Intensity
    };
    let mut bars = Vec::new();
    let mut colors = BTreeMap::new();
    if frames > 0 {
        for region in included_regions(y.num_regions(), voxel_counts) {
            let index = region + 1;
            let label = format!("R{index}");
            let color = palette.color_for_region(region);
            let value = match (quantity, voxel_counts) {
                (BarQuantity::Volume, Some(counts)) => counts[region] as f64,
                _ => y.region(region)[0],
            };
            colors.insert(label.clone(), color);
            bars.push(ChartBar {
                value,
                index,
                label,
                color,
            });
        }
    }
    Ok(ChartData::Bars {
        bars,
        colors,
        quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<f64>>) -> RegionMatrix {
        RegionMatrix::new(rows).unwrap()
    }

    fn series_of(data: &ChartData) -> &[ChartSeries] {
        match data {
            ChartData::TimeSeries { series, .. } => series,
            other => panic!("expected time series, got {other:?}"),
        }
    }

    fn bars_of(data: &ChartData) -> &[ChartBar] {
        match data {
            ChartData::Bars { bars, .. } => bars,
            other => panic!("expected bars, got {other:?}"),
        }
    }

    #[test]
    fn test_time_series_two_regions() {
        let palette = Palette::default();
        let y = matrix(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let data =
            format_chart_data(&[0.0, 1.0, 2.0], &y, Some(&[1, 1]), false, &palette).unwrap();

        let series = series_of(&data);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Region 0");
        assert_eq!(series[0].values, vec![1.0, 2.0, 3.0]);
        assert_eq!(series[1].label, "Region 1");
        assert_eq!(series[1].values, vec![4.0, 5.0, 6.0]);
        assert_ne!(series[0].color, series[1].color);
        if let ChartData::TimeSeries { x, .. } = &data {
            assert_eq!(x, &vec![0.0, 1.0, 2.0]);
        }
    }

    #[test]
    fn test_time_series_skips_empty_regions() {
        let palette = Palette::default();
        let y = matrix(vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0], vec![4.0, 4.0]]);
        let counts = [5, 0, 2, 0];
        let data = format_chart_data(&[0.0, 1.0], &y, Some(&counts), false, &palette).unwrap();

        let labels: Vec<&str> = series_of(&data).iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Region 0", "Region 2"]);
    }

    #[test]
    fn test_time_series_without_counts_shows_all() {
        let palette = Palette::default();
        let y = matrix(vec![vec![1.0, 1.0], vec![2.0, 2.0]]);
        let data = format_chart_data(&[0.0, 1.0], &y, None, false, &palette).unwrap();
        assert_eq!(series_of(&data).len(), 2);
    }

    #[test]
    fn test_time_series_axis_length_checked() {
        let palette = Palette::default();
        let y = matrix(vec![vec![1.0, 2.0, 3.0]]);
        let err = format_chart_data(&[0.0, 1.0], &y, None, false, &palette).unwrap_err();
        assert!(matches!(err, GrapherError::DimensionMismatch { expected: 3, found: 2, .. }));
    }

    #[test]
    fn test_bar_with_excluded_region() {
        let palette = Palette::default();
        let y = matrix(vec![vec![5.0], vec![9.0]]);
        let data = format_chart_data(&[1.0, 2.0], &y, Some(&[0, 3]), false, &palette).unwrap();

        let bars = bars_of(&data);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].index, 2);
        assert_eq!(bars[0].label, "R2");
        assert_eq!(bars[0].value, 9.0);
        if let ChartData::Bars { colors, quantity, .. } = &data {
            assert_eq!(colors.len(), 1);
            assert_eq!(colors["R2"], bars[0].color);
            assert_eq!(*quantity, BarQuantity::Intensity);
        }
    }

    #[test]
    fn test_bar_without_counts_includes_all() {
        let palette = Palette::default();
        let y = matrix(vec![vec![7.0], vec![8.0]]);
        let data = format_chart_data(&[1.0, 2.0], &y, None, false, &palette).unwrap();

        let values: Vec<f64> = bars_of(&data).iter().map(|b| b.value).collect();
        assert_eq!(values, vec![7.0, 8.0]);
    }

    #[test]
    fn test_volume_mode_uses_voxel_counts() {
        let palette = Palette::default();
        let y = matrix(vec![vec![5.0], vec![9.0]]);
        let data = format_chart_data(&[1.0, 2.0], &y, Some(&[2, 3]), true, &palette).unwrap();

        let values: Vec<f64> = bars_of(&data).iter().map(|b| b.value).collect();
        assert_eq!(values, vec![2.0, 3.0]);
        assert_eq!(data.title(), "Volume of each Region");
    }

    #[test]
    fn test_volume_mode_forces_bars_for_time_series() {
        let palette = Palette::default();
        let y = matrix(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let data = format_chart_data(&[0.0, 1.0], &y, Some(&[4, 6]), true, &palette).unwrap();
        let values: Vec<f64> = bars_of(&data).iter().map(|b| b.value).collect();
        assert_eq!(values, vec![4.0, 6.0]);
    }

    #[test]
    fn test_volume_request_without_counts_falls_back_to_values() {
        let palette = Palette::default();
        let y = matrix(vec![vec![1.0, 2.0]]);
        let data = format_chart_data(&[0.0, 1.0], &y, None, true, &palette).unwrap();
        assert!(matches!(data, ChartData::TimeSeries { .. }));
    }

    #[test]
    fn test_empty_inputs_give_empty_chart() {
        let palette = Palette::default();

        let no_frames = matrix(vec![Vec::new(), Vec::new()]);
        let data = format_chart_data(&[], &no_frames, Some(&[1, 1]), false, &palette).unwrap();
        assert!(data.is_empty());

        let y = matrix(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let data = format_chart_data(&[0.0, 1.0], &y, Some(&[0, 0]), false, &palette).unwrap();
        assert!(data.is_empty());

        let data = format_chart_data(&[], &RegionMatrix::default(), None, false, &palette).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_count_mismatch_is_rejected() {
        let palette = Palette::default();
        let y = matrix(vec![vec![1.0], vec![2.0]]);
        let err = format_chart_data(&[1.0, 2.0], &y, Some(&[1, 1, 1]), false, &palette);
        assert!(matches!(err, Err(GrapherError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_colors_independent_of_values_and_mode() {
        let palette = Palette::default();
        let a = matrix(vec![vec![1.0, 2.0]; 30]);
        let b = matrix(vec![vec![-100.0, 3.5]; 30]);
        let x = [0.0, 1.0];

        let colors_a: Vec<Rgb> = series_of(&format_chart_data(&x, &a, None, false, &palette).unwrap())
            .iter()
            .map(|s| s.color)
            .collect();
        let colors_b: Vec<Rgb> = series_of(&format_chart_data(&x, &b, None, false, &palette).unwrap())
            .iter()
            .map(|s| s.color)
            .collect();
        assert_eq!(colors_a, colors_b);

        let counts = vec![1; 30];
        let bar_colors: Vec<Rgb> =
            bars_of(&format_chart_data(&x, &a, Some(&counts), true, &palette).unwrap())
                .iter()
                .map(|b| b.color)
                .collect();
        assert_eq!(colors_a, bar_colors);

        for (region, color) in colors_a.iter().enumerate() {
            assert_eq!(*color, palette.color_for_region(region));
        }
    }

    #[test]
    fn test_bar_count_matches_included_regions() {
        let palette = Palette::default();
        let y = matrix((0..9).map(|r| vec![r as f64]).collect());
        let counts: Vec<u64> = (0..9).map(|r| (r % 3) as u64).collect();
        let data = format_chart_data(&y.default_axis(), &y, Some(&counts), false, &palette).unwrap();
        assert_eq!(bars_of(&data).len(), counts.iter().filter(|&&n| n > 0).count());
    }

    #[test]
    fn test_json_is_tagged() {
        let palette = Palette::default();
        let y = matrix(vec![vec![5.0]]);
        let data = format_chart_data(&[1.0], &y, None, false, &palette).unwrap();
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["kind"], "bars");
        assert_eq!(json["quantity"], "intensity");
        assert_eq!(json["bars"][0]["label"], "R1");
    }
}
