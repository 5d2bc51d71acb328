use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::data::region::PlotRequest;
use crate::data::roi_mean::{roi_mean, LabelMap, Volume};
use crate::error::{GrapherError, Result};
use crate::export::csv::write_voi_csv;
use crate::export::sink::{FileSink, SaveRequest};
use crate::processing::chart_data::{format_chart_data, ChartData};
use crate::state::debounce::Debouncer;
use crate::state::layout::CanvasLayout;
use crate::state::palette::Palette;

/// Presentation state of the grapher window.
///
/// Only the last plot request and display mode outlive a plot; the chart itself
/// is rebuilt from them on every replot.
#[derive(Debug)]
pub struct GrapherSession {
    last: Option<PlotRequest>,
    /// Display mode of the last replot request, reused after a resize.
    show_volume: bool,
    chart: Option<ChartData>,
    window_open: bool,
    mode_buttons_visible: bool,
    /// Set by a replot; the chart is drawn from the following frame on.
    render_deferred: bool,
    extra_width: f32,
    viewer_size: Option<[f32; 2]>,
    layout: CanvasLayout,
    resize: Debouncer,
}

impl GrapherSession {
    pub fn new(resize_delay: Duration) -> Self {
        Self {
            last: None,
            show_volume: false,
            chart: None,
            window_open: false,
            mode_buttons_visible: true,
            render_deferred: false,
            extra_width: 0.0,
            viewer_size: None,
            layout: CanvasLayout::default(),
            resize: Debouncer::new(resize_delay),
        }
    }

    pub fn last_request(&self) -> Option<&PlotRequest> {
        self.last.as_ref()
    }

    pub fn chart(&self) -> Option<&ChartData> {
        self.chart.as_ref()
    }

    pub fn is_window_open(&self) -> bool {
        self.window_open
    }

    /// Whether the values/volumes toggle applies, i.e. volume data exists.
    pub fn mode_buttons_visible(&self) -> bool {
        self.mode_buttons_visible
    }

    pub fn show_volume(&self) -> bool {
        self.show_volume
    }

    pub fn layout(&self) -> &CanvasLayout {
        &self.layout
    }

    /// Compute ROI statistics and plot them.
    ///
    /// Previously retained data is dropped first, so a failure leaves nothing
    /// to replot or export.
    pub fn plot_roi(
        &mut self,
        image: Option<&Volume>,
        objectmap: Option<&LabelMap>,
        extra_width: f32,
        palette: &Palette,
    ) -> Result<&ChartData> {
        self.extra_width = extra_width;
        self.refresh_layout();
        self.last = None;
        self.chart = None;

        let (Some(image), Some(objectmap)) = (image, objectmap) else {
            return Err(GrapherError::MissingInput(
                "no image or objectmap in memory".into(),
            ));
        };
        let stats = roi_mean(image, objectmap).map_err(|e| match e {
            GrapherError::Computation(msg) => GrapherError::Computation(msg),
            other => GrapherError::Computation(other.to_string()),
        })?;
        self.plot(PlotRequest::from(stats), palette)
    }

    /// Replace the retained data and plot its values.
    ///
    /// The request is only retained once its chart has been built; a request
    /// that cannot be plotted leaves the previous plot in place.
    pub fn plot(&mut self, request: PlotRequest, palette: &Palette) -> Result<&ChartData> {
        tracing::info!(
            regions = request.y.num_regions(),
            frames = request.y.num_frames(),
            "plot request"
        );
        let chart = chart_for(&request, false, palette)?;
        let has_volumes = request.voxel_counts.is_some();
        self.last = Some(request);
        self.show_volume = false;
        Ok(self.show_chart(chart, has_volumes))
    }

    /// Redraw the retained data as values or volumes.
    pub fn replot(&mut self, show_volume: bool, palette: &Palette) -> Result<&ChartData> {
        self.show_volume = show_volume;
        let Some(request) = self.last.as_ref() else {
            return Err(GrapherError::MissingInput("no objectmap in memory".into()));
        };
        let chart = chart_for(request, show_volume, palette)?;
        let has_volumes = request.voxel_counts.is_some();
        Ok(self.show_chart(chart, has_volumes))
    }

    fn show_chart(&mut self, chart: ChartData, has_volumes: bool) -> &ChartData {
        tracing::debug!(title = chart.title(), empty = chart.is_empty(), "replot");
        self.mode_buttons_visible = has_volumes;
        self.window_open = true;
        self.render_deferred = true;
        self.refresh_layout();
        self.chart.insert(chart)
    }

    /// The chart to draw this frame. Returns `None` once right after a replot so
    /// the window can settle its size before the chart is laid out.
    pub fn chart_for_frame(&mut self) -> Option<&ChartData> {
        if std::mem::take(&mut self.render_deferred) {
            return None;
        }
        self.chart.as_ref()
    }

    pub fn close(&mut self) {
        self.window_open = false;
        self.mode_buttons_visible = false;
        self.resize.cancel();
    }

    /// Write the retained data as CSV. Without retained data this does nothing.
    pub fn export_csv(
        &self,
        sink: &mut dyn FileSink,
        file_name: &str,
    ) -> Result<Option<PathBuf>> {
        let Some(request) = self.last.as_ref() else {
            tracing::debug!("csv export skipped: nothing plotted");
            return Ok(None);
        };
        let text = write_voi_csv(request)?;
        sink.write_text(&SaveRequest::csv(file_name), &text)
    }

    fn set_viewer_size(&mut self, size: Option<[f32; 2]>) {
        self.viewer_size = size;
        self.refresh_layout();
    }

    /// Note a viewer resize. A visible window gets a replot once resizing has
    /// been quiet for the debounce delay; a hidden one only updates its layout.
    pub fn notify_resize(&mut self, size: Option<[f32; 2]>, now: Instant) {
        self.resize.cancel();
        self.set_viewer_size(size);
        if self.window_open {
            self.resize.notify(now);
        }
    }

    /// Time until a pending resize replot, for scheduling a repaint.
    pub fn resize_pending(&self, now: Instant) -> Option<Duration> {
        self.resize.remaining(now)
    }

    /// Run the debounced replot if it is due. Returns true when a replot ran.
    pub fn poll_resize(&mut self, now: Instant, palette: &Palette) -> Result<bool> {
        if !self.resize.fire(now) || !self.window_open {
            return Ok(false);
        }
        tracing::debug!("resize settled, replotting");
        self.replot(self.show_volume, palette)?;
        Ok(true)
    }

    fn refresh_layout(&mut self) {
        self.layout = CanvasLayout::compute(self.viewer_size, self.extra_width);
    }
}

fn chart_for(request: &PlotRequest, show_volume: bool, palette: &Palette) -> Result<ChartData> {
    format_chart_data(
        &request.x,
        &request.y,
        request.counts(),
        show_volume && request.voxel_counts.is_some(),
        palette,
    )
}

impl Default for GrapherSession {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::region::RegionMatrix;
    use crate::export::sink::DirectorySink;

    fn request(rows: Vec<Vec<f64>>, counts: Option<Vec<u64>>) -> PlotRequest {
        let y = RegionMatrix::new(rows).unwrap();
        PlotRequest::new(y.default_axis(), y, counts).unwrap()
    }

    #[test]
    fn test_replot_without_data_fails() {
        let mut session = GrapherSession::default();
        let err = session.replot(false, &Palette::default()).unwrap_err();
        assert!(matches!(err, GrapherError::MissingInput(_)));
        assert!(!session.is_window_open());
    }

    #[test]
    fn test_replot_switches_mode_without_new_data() {
        let palette = Palette::default();
        let mut session = GrapherSession::default();
        session
            .plot(request(vec![vec![5.0], vec![9.0]], Some(vec![2, 3])), &palette)
            .unwrap();
        assert!(session.is_window_open());
        assert!(session.mode_buttons_visible());

        let chart = session.replot(true, &palette).unwrap();
        assert_eq!(chart.title(), "Volume of each Region");
        assert!(session.show_volume());

        let chart = session.replot(false, &palette).unwrap();
        assert_eq!(chart.title(), "Average Intensity in each Region");
    }

    #[test]
    fn test_no_volume_data_hides_mode_buttons() {
        let palette = Palette::default();
        let mut session = GrapherSession::default();
        session
            .plot(request(vec![vec![7.0], vec![8.0]], None), &palette)
            .unwrap();
        assert!(!session.mode_buttons_visible());

        let chart = session.replot(true, &palette).unwrap();
        assert_eq!(chart.title(), "Average Intensity in each Region");
    }

    #[test]
    fn test_new_plot_overwrites_retained_data() {
        let palette = Palette::default();
        let mut session = GrapherSession::default();
        session.plot(request(vec![vec![1.0]], None), &palette).unwrap();
        let second = request(vec![vec![2.0], vec![3.0]], Some(vec![1, 1]));
        session.plot(second.clone(), &palette).unwrap();
        assert_eq!(session.last_request(), Some(&second));
    }

    #[test]
    fn test_failed_plot_keeps_previous_plot() {
        let palette = Palette::default();
        let root = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(root.path());
        let mut session = GrapherSession::default();
        let first = request(vec![vec![5.0], vec![9.0]], Some(vec![2, 3]));
        session.plot(first.clone(), &palette).unwrap();

        let y = RegionMatrix::new(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        let bad = PlotRequest::new(vec![0.0, 1.0, 2.0, 3.0], y, None).unwrap();
        let err = session.plot(bad, &palette).unwrap_err();
        assert!(matches!(
            err,
            GrapherError::DimensionMismatch { expected: 3, found: 4, .. }
        ));

        assert_eq!(session.last_request(), Some(&first));
        assert_eq!(session.chart().unwrap().title(), "Average Intensity in each Region");
        assert!(session.mode_buttons_visible());

        let path = session.export_csv(&mut sink, "voidata.csv").unwrap().unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with(",Region 1,Region 2"));
        assert!(session.replot(true, &palette).is_ok());
    }

    #[test]
    fn test_plot_roi_missing_inputs() {
        let palette = Palette::default();
        let mut session = GrapherSession::default();
        session.plot(request(vec![vec![1.0]], None), &palette).unwrap();

        let err = session.plot_roi(None, None, 0.0, &palette).unwrap_err();
        assert!(matches!(err, GrapherError::MissingInput(_)));
        assert!(session.last_request().is_none());
        assert!(session.chart().is_none());
    }

    #[test]
    fn test_plot_roi_computation_error() {
        let palette = Palette::default();
        let mut session = GrapherSession::default();
        let image = Volume {
            dims: [2, 1, 1],
            frames: 1,
            data: vec![1.0, 2.0],
        };
        let map = LabelMap {
            dims: [3, 1, 1],
            labels: vec![1, 1, 1],
        };
        let err = session
            .plot_roi(Some(&image), Some(&map), 0.0, &palette)
            .unwrap_err();
        assert!(matches!(err, GrapherError::Computation(_)));
    }

    #[test]
    fn test_plot_roi_time_series() {
        let palette = Palette::default();
        let mut session = GrapherSession::default();
        let image = Volume {
            dims: [2, 1, 1],
            frames: 2,
            data: vec![1.0, 2.0, 3.0, 4.0],
        };
        let map = LabelMap {
            dims: [2, 1, 1],
            labels: vec![1, 2],
        };
        let chart = session
            .plot_roi(Some(&image), Some(&map), 100.0, &palette)
            .unwrap();
        let ChartData::TimeSeries { x, series } = chart else {
            panic!("expected time series");
        };
        assert_eq!(x, &vec![0.0, 1.0]);
        assert_eq!(series[1].values, vec![2.0, 4.0]);
        assert_eq!(session.layout().dialog_size[0], 280.0);
    }

    #[test]
    fn test_chart_rendering_deferred_one_frame() {
        let palette = Palette::default();
        let mut session = GrapherSession::default();
        session.plot(request(vec![vec![1.0]], None), &palette).unwrap();
        assert!(session.chart_for_frame().is_none());
        assert!(session.chart_for_frame().is_some());
    }

    #[test]
    fn test_resize_is_debounced() {
        let palette = Palette::default();
        let mut session = GrapherSession::new(Duration::from_millis(200));
        session
            .plot(request(vec![vec![1.0, 2.0]], Some(vec![1])), &palette)
            .unwrap();
        session.replot(true, &palette).unwrap();

        let t0 = Instant::now();
        session.notify_resize(Some([400.0, 300.0]), t0);
        session.notify_resize(Some([500.0, 300.0]), t0 + Duration::from_millis(100));
        assert!(!session.poll_resize(t0 + Duration::from_millis(250), &palette).unwrap());
        assert!(session.poll_resize(t0 + Duration::from_millis(300), &palette).unwrap());
        assert!(!session.poll_resize(t0 + Duration::from_millis(900), &palette).unwrap());

        // replot after resize keeps the last display mode
        assert_eq!(session.chart().unwrap().title(), "Volume of each Region");
        assert_eq!(session.layout().dialog_size, [480.0, 280.0]);
    }

    #[test]
    fn test_resize_while_hidden_only_updates_layout() {
        let palette = Palette::default();
        let mut session = GrapherSession::default();
        session.plot(request(vec![vec![1.0]], None), &palette).unwrap();
        session.close();

        let t0 = Instant::now();
        session.notify_resize(Some([400.0, 300.0]), t0);
        assert!(session.resize_pending(t0).is_none());
        assert!(!session.poll_resize(t0 + Duration::from_secs(1), &palette).unwrap());
        assert_eq!(session.layout().dialog_size, [380.0, 280.0]);
    }

    #[test]
    fn test_export_without_data_is_noop() {
        let root = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(root.path());
        let session = GrapherSession::default();
        assert!(session.export_csv(&mut sink, "voidata.csv").unwrap().is_none());
        assert!(!root.path().join("voidata.csv").exists());
    }

    #[test]
    fn test_export_writes_retained_data() {
        let palette = Palette::default();
        let root = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(root.path());
        let mut session = GrapherSession::default();
        session
            .plot(request(vec![vec![5.0], vec![9.0]], Some(vec![0, 3])), &palette)
            .unwrap();

        let path = session.export_csv(&mut sink, "voidata.csv").unwrap().unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with(",Region 2"));
    }
}
