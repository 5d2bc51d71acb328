/// Viewer size assumed when no viewer has reported its dimensions.
pub const DEFAULT_VIEWER_SIZE: [f32; 2] = [200.0, 200.0];

const DIALOG_POS: [f32; 2] = [10.0, 40.0];
const DIALOG_MARGIN: f32 = 20.0;
const WIDGET_MARGIN_W: f32 = 10.0;
/// Title bar plus button footer.
const WIDGET_MARGIN_H: f32 = 120.0;
const CANVAS_MARGIN_H: f32 = 15.0;

/// Placement of the grapher window and its chart canvas, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    pub dialog_pos: [f32; 2],
    pub dialog_size: [f32; 2],
    pub widget_size: [f32; 2],
    pub canvas_size: [f32; 2],
}

impl CanvasLayout {
    /// Fit the window to the viewer, widened by `extra_width` (e.g. a side panel
    /// that was open when the viewer was measured).
    pub fn compute(viewer: Option<[f32; 2]>, extra_width: f32) -> Self {
        let [vw, vh] = viewer.unwrap_or(DEFAULT_VIEWER_SIZE);
        let width = (vw + extra_width - DIALOG_MARGIN).max(0.0);
        let height = (vh - DIALOG_MARGIN).max(0.0);
        let inner_w = (width - WIDGET_MARGIN_W).max(0.0);
        let inner_h = (height - WIDGET_MARGIN_H).max(0.0);
        Self {
            dialog_pos: DIALOG_POS,
            dialog_size: [width, height],
            widget_size: [inner_w, inner_h],
            canvas_size: [inner_w, (inner_h - CANVAS_MARGIN_H).max(0.0)],
        }
    }
}

impl Default for CanvasLayout {
    fn default() -> Self {
        Self::compute(None, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewer() {
        let layout = CanvasLayout::default();
        assert_eq!(layout.dialog_size, [180.0, 180.0]);
        assert_eq!(layout.widget_size, [170.0, 60.0]);
        assert_eq!(layout.canvas_size, [170.0, 45.0]);
    }

    #[test]
    fn test_extra_width_widens_only() {
        let base = CanvasLayout::compute(Some([800.0, 600.0]), 0.0);
        let wide = CanvasLayout::compute(Some([800.0, 600.0]), 250.0);
        assert_eq!(wide.canvas_size[0] - base.canvas_size[0], 250.0);
        assert_eq!(wide.canvas_size[1], base.canvas_size[1]);
        assert_eq!(base.canvas_size, [770.0, 445.0]);
    }

    #[test]
    fn test_tiny_viewer_clamps() {
        let layout = CanvasLayout::compute(Some([5.0, 5.0]), 0.0);
        assert_eq!(layout.canvas_size, [0.0, 0.0]);
    }
}
