// Chart store - serialized state replacement keyed by chart id
use crate::application::layout::ChartState;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Central store of chart state. Every mutation replaces the whole state for
/// one chart under the lock, so concurrent layout dispatches serialize and
/// the later one wins; there are no partial updates.
///
/// Loaders re-check that their chart still exists here after every await,
/// which is how stale work gets dropped.
#[derive(Default)]
pub struct ChartStore {
    charts: Mutex<HashMap<String, ChartState>>,
}

impl ChartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, chart_id: impl Into<String>, state: ChartState) {
        self.charts.lock().await.insert(chart_id.into(), state);
    }

    /// Drop a chart. In-flight loads for it will notice and stop silently.
    pub async fn remove(&self, chart_id: &str) -> Option<ChartState> {
        self.charts.lock().await.remove(chart_id)
    }

    pub async fn get(&self, chart_id: &str) -> Option<ChartState> {
        self.charts.lock().await.get(chart_id).cloned()
    }

    /// Replace a chart's state with `apply(state)`. Returns false if the
    /// chart no longer exists.
    pub async fn update<F>(&self, chart_id: &str, apply: F) -> bool
    where
        F: FnOnce(ChartState) -> ChartState,
    {
        let mut charts = self.charts.lock().await;
        match charts.remove(chart_id) {
            Some(state) => {
                charts.insert(chart_id.to_string(), apply(state));
                true
            }
            None => false,
        }
    }
}
