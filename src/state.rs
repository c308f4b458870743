use log::{info, warn};

use crate::color::{self, ChoroplethScale, Color};
use crate::data::fuse::fuse;
use crate::data::model::{Dataset, FeatureCollection, Record, Statistics};
use crate::data::stats::compute_statistics;

/// Layer opacity before the user touches the slider.
pub const DEFAULT_OPACITY: f32 = 0.7;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Everything the UI can ask the state to do.
#[derive(Debug, Clone)]
pub enum Action {
    /// A file was picked; previous data and errors are discarded.
    LoadStarted { file_name: String },
    /// A file was parsed successfully.
    Loaded(Dataset),
    /// Reading or parsing failed; the message is shown to the user.
    LoadFailed(String),
    MetricChanged(String),
    OpacityChanged(f32),
    Cleared,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Never mutated in place: [`AppState::reduce`] consumes the current value
/// and returns the next one, recomputing the derived fields (`merged`,
/// `statistics`, `scale`, `colors`) from the inputs.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Name of the loaded (or loading) file.
    pub file_name: Option<String>,

    /// Geographic features as parsed.
    pub geo: Option<FeatureCollection>,

    /// Tabular records as parsed.
    pub tabular: Option<Vec<Record>>,

    /// `geo` with `tabular` joined on; this is what the map draws.
    pub merged: Option<FeatureCollection>,

    /// Per-column statistics over `tabular`.
    pub statistics: Option<Statistics>,

    /// Columns offered as choropleth metrics.
    pub metrics: Vec<String>,

    /// Active choropleth metric.
    pub metric: Option<String>,

    /// Scale for the active metric over `merged`.
    pub scale: Option<ChoroplethScale>,

    /// One fill colour per feature of `merged`.
    pub colors: Vec<Color>,

    /// Fill opacity in `0.0..=1.0`.
    pub opacity: f32,

    /// Error message shown in the UI.
    pub error: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            file_name: None,
            geo: None,
            tabular: None,
            merged: None,
            statistics: None,
            metrics: Vec::new(),
            metric: None,
            scale: None,
            colors: Vec::new(),
            opacity: DEFAULT_OPACITY,
            error: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Produce the state that follows `action`.
    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::LoadStarted { file_name } => AppState {
                file_name: Some(file_name),
                loading: true,
                opacity: self.opacity,
                metric: self.metric,
                ..AppState::default()
            },
            Action::Loaded(dataset) => self.with_dataset(dataset),
            Action::LoadFailed(message) => {
                warn!("Load failed: {message}");
                AppState {
                    error: Some(message),
                    opacity: self.opacity,
                    ..AppState::default()
                }
            }
            Action::MetricChanged(metric) => AppState {
                metric: Some(metric),
                ..self
            }
            .recolored(),
            Action::OpacityChanged(opacity) if opacity.is_finite() => AppState {
                opacity: opacity.clamp(0.0, 1.0),
                ..self
            },
            Action::OpacityChanged(_) => self,
            Action::Cleared => AppState {
                opacity: self.opacity,
                ..AppState::default()
            },
        }
    }

    /// Whether anything is loaded.
    pub fn has_data(&self) -> bool {
        self.geo.is_some() || self.tabular.is_some()
    }

    fn with_dataset(self, dataset: Dataset) -> Self {
        let metrics = dataset.numeric_columns();
        // Keep the user's metric across reloads when the new data has it.
        let metric = self
            .metric
            .filter(|m| metrics.contains(m))
            .or_else(|| metrics.first().cloned());

        let statistics = dataset.tabular.as_deref().map(compute_statistics);
        let merged = dataset.geo.as_ref().map(|geo| match dataset.tabular.as_deref() {
            Some(rows) => fuse(geo, rows),
            None => geo.clone(),
        });

        info!(
            "Dataset {} ready: metrics {:?}, active {:?}",
            dataset.file_name, metrics, metric
        );

        AppState {
            file_name: Some(dataset.file_name),
            geo: dataset.geo,
            tabular: dataset.tabular,
            merged,
            statistics,
            metrics,
            metric,
            scale: None,
            colors: Vec::new(),
            opacity: self.opacity,
            error: None,
            loading: false,
        }
        .recolored()
    }

    /// Recompute `scale` and `colors` from `merged` and `metric`.
    fn recolored(self) -> Self {
        let (scale, colors) = match (&self.merged, &self.metric) {
            (Some(merged), Some(metric)) => {
                let scale = ChoroplethScale::new(merged, metric);
                let colors = scale.colors(merged);
                (Some(scale), colors)
            }
            (Some(merged), None) => (None, vec![color::BASELINE.into_format(); merged.len()]),
            _ => (None, Vec::new()),
        };
        AppState {
            scale,
            colors,
            ..self
        }
    }
}
