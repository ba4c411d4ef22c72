use super::{BuiltChart, DatasetRole, set_prediction};

/// A chart currently mounted in a view, with its per-instance interaction state.
#[derive(Debug)]
pub struct ChartInstance {
    id: u64,
    chart: BuiltChart,
    /// `(dataset, point)` under the pointer during the last frame.
    pub hovered: Option<(usize, usize)>,
}

impl ChartInstance {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn chart(&self) -> &BuiltChart {
        &self.chart
    }

    /// Replace the prediction marker; indices shift, so hover state is reset.
    pub fn set_prediction(&mut self, x: f64, y: f64) {
        set_prediction(&mut self.chart, x, y);
        self.hovered = None;
    }

    pub fn prediction_count(&self) -> usize {
        self.chart
            .config
            .datasets_with_role(DatasetRole::Prediction)
            .count()
    }
}

impl Drop for ChartInstance {
    fn drop(&mut self) {
        tracing::debug!("Released chart #{}", self.id);
    }
}

/// Owner of at most one [`ChartInstance`].
///
/// Installing a chart always drops the previous instance before the new one
/// is mounted, so hover state never leaks across reloads.
#[derive(Debug, Default)]
pub struct ChartSlot {
    current: Option<ChartInstance>,
    next_id: u64,
    released: u64,
}

impl ChartSlot {
    pub fn install(&mut self, chart: BuiltChart) -> &mut ChartInstance {
        self.release();
        self.next_id += 1;
        tracing::debug!("Mounted chart #{}", self.next_id);
        self.current.insert(ChartInstance {
            id: self.next_id,
            chart,
            hovered: None,
        })
    }

    pub fn release(&mut self) {
        if let Some(previous) = self.current.take() {
            drop(previous);
            self.released += 1;
        }
    }

    pub fn current(&self) -> Option<&ChartInstance> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut ChartInstance> {
        self.current.as_mut()
    }

    pub fn is_mounted(&self) -> bool {
        self.current.is_some()
    }

    /// Number of instances released so far.
    pub fn released_count(&self) -> u64 {
        self.released
    }
}
