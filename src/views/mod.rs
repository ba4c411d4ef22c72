//! Per-view state and the controller that drives loads, clicks and predictions.
//!
//! The controller owns both view states outright; background work only ever
//! touches a [`DataSource`] and reports back through [`jobs::JobMessage`].

mod jobs;
mod knn;
mod regression;
mod sequence;
mod status;

pub use knn::{
    ClassificationDetail, KSlider, KnnViewState, Verdict, accuracy_text, accuracy_tone,
};
pub use regression::{
    InputError, PredictionDisplay, RegressionViewState, check_rooms, parse_rooms, r2_tone,
};
pub use sequence::{RequestSequence, RequestTicket};
pub use status::{MetricTone, Notice, NoticeKind, StatusBarState, StatusTone};

use std::sync::Arc;

use crate::api::{DataSource, KnnRequest};
use crate::config::{AppSettings, ResponseOrdering};
use jobs::{JobMessage, KnnLoadResult, PredictResult, RegressionLoadResult, ViewJobs};

/// Which tab is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActiveView {
    #[default]
    Knn,
    Regression,
}

impl ActiveView {
    pub fn title(self) -> &'static str {
        match self {
            Self::Knn => "KNN classification",
            Self::Regression => "Linear regression",
        }
    }
}

impl std::str::FromStr for ActiveView {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "knn" => Ok(Self::Knn),
            "regression" => Ok(Self::Regression),
            other => Err(format!("Unknown view '{other}' (expected knn or regression)")),
        }
    }
}

/// Owns both views and the job channel their requests report through.
pub struct ViewController {
    source: Arc<dyn DataSource>,
    jobs: ViewJobs,
    ordering: ResponseOrdering,
    pub active: ActiveView,
    pub knn: KnnViewState,
    pub regression: RegressionViewState,
    pub status: StatusBarState,
    notice: Option<Notice>,
}

impl ViewController {
    pub fn new(source: Arc<dyn DataSource>, settings: &AppSettings) -> Self {
        Self {
            source,
            jobs: ViewJobs::new(),
            ordering: settings.ordering,
            active: ActiveView::default(),
            knn: KnnViewState::new(&settings.knn),
            regression: RegressionViewState::default(),
            status: StatusBarState::idle(),
            notice: None,
        }
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    /// Request a repaint from worker threads once their result is queued.
    pub fn set_repaint_context(&mut self, ctx: egui::Context) {
        self.jobs.set_repaint_context(ctx);
    }

    /// Kick off the first load of both views.
    pub fn load_all(&mut self) {
        self.load_knn(self.knn.slider.committed());
        self.load_regression();
    }

    pub fn load_knn(&mut self, k: u32) {
        let request = self.begin_knn_load(k);
        self.jobs
            .begin_knn_load(Arc::clone(&self.source), request.0, request.1);
    }

    pub(crate) fn begin_knn_load(&mut self, k: u32) -> (RequestTicket, KnnRequest) {
        let request = self.knn.request_for(k);
        let ticket = self.knn.requests.issue();
        tracing::info!(
            "Loading KNN data (k={}, request #{})",
            request.k,
            ticket.value()
        );
        self.status
            .set(format!("Loading KNN data for K={}", request.k), StatusTone::Busy);
        (ticket, request)
    }

    pub fn load_regression(&mut self) {
        let ticket = self.begin_regression_load();
        self.jobs
            .begin_regression_load(Arc::clone(&self.source), ticket);
    }

    pub(crate) fn begin_regression_load(&mut self) -> RequestTicket {
        let ticket = self.regression.requests.issue();
        tracing::info!("Loading regression data (request #{})", ticket.value());
        self.status.set("Loading regression data", StatusTone::Busy);
        ticket
    }

    /// Live slider movement: the label follows, nothing reloads.
    pub fn knn_slider_dragged(&mut self, k: u32) {
        self.knn.slider.drag_to(k);
    }

    /// Slider released: reload when the committed K changed.
    pub fn knn_slider_released(&mut self) {
        if let Some(k) = self.knn.slider.release() {
            self.load_knn(k);
        }
    }

    pub fn knn_point_clicked(&mut self, dataset: usize, point: usize) {
        if !self.knn.select_point(dataset, point) {
            tracing::debug!("KNN click on ({dataset}, {point}) did not resolve to a sample");
        }
    }

    /// Clicking a regression sample fills the input and predicts its raw x,
    /// subject to the same range check as typed input.
    pub fn regression_point_clicked(&mut self, dataset: usize, point: usize) {
        let Some(rooms) = self.regression.take_clicked_rooms(dataset, point) else {
            return;
        };
        match check_rooms(rooms) {
            Ok(rooms) => self.predict(rooms),
            Err(err) => self.reject_rooms(err),
        }
    }

    /// Validate the rooms input and request a prediction.
    pub fn submit_rooms(&mut self) {
        match parse_rooms(&self.regression.rooms_input) {
            Ok(rooms) => self.predict(rooms),
            Err(err) => self.reject_rooms(err),
        }
    }

    fn reject_rooms(&mut self, err: InputError) {
        tracing::warn!(
            "Rejected rooms input {:?}: {err:?}",
            self.regression.rooms_input
        );
        self.show_notice(Notice::new(NoticeKind::Validation, err.to_string()));
        self.status.set(err.to_string(), StatusTone::Warning);
    }

    fn predict(&mut self, rooms: f64) {
        let ticket = self.begin_prediction(rooms);
        self.jobs
            .begin_prediction(Arc::clone(&self.source), ticket, rooms);
    }

    pub(crate) fn begin_prediction(&mut self, rooms: f64) -> RequestTicket {
        let ticket = self.regression.predictions.issue();
        tracing::info!("Predicting price for {rooms} rooms (request #{})", ticket.value());
        self.status
            .set(format!("Predicting price for {rooms} rooms"), StatusTone::Busy);
        ticket
    }

    /// Drain finished jobs. Call once per frame.
    pub fn poll_background_jobs(&mut self) {
        while let Ok(message) = self.jobs.try_recv_message() {
            self.apply_job_message(message);
        }
    }

    pub(crate) fn apply_job_message(&mut self, message: JobMessage) {
        match message {
            JobMessage::KnnLoaded(message) => self.apply_knn_result(message),
            JobMessage::RegressionLoaded(message) => self.apply_regression_result(message),
            JobMessage::PricePredicted(message) => self.apply_prediction_result(message),
        }
    }

    fn apply_knn_result(&mut self, message: KnnLoadResult) {
        let KnnLoadResult {
            ticket,
            request,
            result,
        } = message;
        if !self.knn.requests.complete(ticket, self.ordering) {
            tracing::info!(
                "Discarding stale KNN response #{} (k={})",
                ticket.value(),
                request.k
            );
            return;
        }
        let applied = result.map_err(|err| err.to_string()).and_then(|envelope| {
            let samples = envelope.description.samples;
            self.knn
                .apply_envelope(envelope, request)
                .map(|()| samples)
                .map_err(|err| err.to_string())
        });
        match applied {
            Ok(samples) => {
                tracing::info!("Rendered KNN chart for K={} (request #{})", request.k, ticket.value());
                self.status.set(
                    format!("KNN model loaded: K={}, {samples} samples", request.k),
                    StatusTone::Info,
                );
            }
            Err(message) => self.report_error(NoticeKind::Load, format!("Loading data failed: {message}")),
        }
    }

    fn apply_regression_result(&mut self, message: RegressionLoadResult) {
        let RegressionLoadResult { ticket, result } = message;
        if !self.regression.requests.complete(ticket, self.ordering) {
            tracing::info!("Discarding stale regression response #{}", ticket.value());
            return;
        }
        let applied = result.map_err(|err| err.to_string()).and_then(|envelope| {
            let samples = envelope.description.samples;
            self.regression
                .apply_envelope(envelope)
                .map(|()| samples)
                .map_err(|err| err.to_string())
        });
        match applied {
            Ok(samples) => {
                tracing::info!("Rendered regression chart (request #{})", ticket.value());
                self.status.set(
                    format!("Regression model loaded: {samples} samples"),
                    StatusTone::Info,
                );
            }
            Err(message) => self.report_error(NoticeKind::Load, format!("Loading data failed: {message}")),
        }
    }

    fn apply_prediction_result(&mut self, message: PredictResult) {
        let PredictResult {
            ticket,
            rooms,
            result,
        } = message;
        if !self.regression.predictions.complete(ticket, self.ordering) {
            tracing::info!("Discarding stale prediction #{} ({rooms} rooms)", ticket.value());
            return;
        }
        match result {
            Ok(prediction) => {
                tracing::info!("Predicted {} for {rooms} rooms", prediction.price.text);
                self.status.set(
                    format!("Predicted price for {rooms} rooms: {}", prediction.price.text),
                    StatusTone::Info,
                );
                self.regression.apply_prediction(rooms, prediction);
            }
            Err(err) => self.report_error(NoticeKind::Prediction, format!("Prediction failed: {err}")),
        }
    }

    fn report_error(&mut self, kind: NoticeKind, message: String) {
        tracing::error!("{message}");
        self.status.set(message.clone(), StatusTone::Error);
        self.show_notice(Notice::new(kind, message));
    }

    fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
