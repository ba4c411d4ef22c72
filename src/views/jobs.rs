use std::sync::{
    Arc,
    mpsc::{Receiver, Sender},
};
use std::thread;

use super::sequence::RequestTicket;
use crate::api::{DataSource, KnnRequest, LoadError, Prediction, ResultEnvelope};

type TryRecvError = std::sync::mpsc::TryRecvError;

pub(crate) enum JobMessage {
    KnnLoaded(KnnLoadResult),
    RegressionLoaded(RegressionLoadResult),
    PricePredicted(PredictResult),
}

#[derive(Debug)]
pub(crate) struct KnnLoadResult {
    pub(crate) ticket: RequestTicket,
    pub(crate) request: KnnRequest,
    pub(crate) result: Result<ResultEnvelope, LoadError>,
}

#[derive(Debug)]
pub(crate) struct RegressionLoadResult {
    pub(crate) ticket: RequestTicket,
    pub(crate) result: Result<ResultEnvelope, LoadError>,
}

#[derive(Debug)]
pub(crate) struct PredictResult {
    pub(crate) ticket: RequestTicket,
    pub(crate) rooms: f64,
    pub(crate) result: Result<Prediction, LoadError>,
}

/// Worker threads report back here; the UI thread drains the channel once per frame.
pub(crate) struct ViewJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    repaint: Option<egui::Context>,
}

impl ViewJobs {
    pub(crate) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel();
        Self {
            message_tx,
            message_rx,
            repaint: None,
        }
    }

    /// Wake the UI whenever a job finishes instead of waiting for input.
    pub(crate) fn set_repaint_context(&mut self, ctx: egui::Context) {
        self.repaint = Some(ctx);
    }

    pub(crate) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    pub(crate) fn begin_knn_load(
        &self,
        source: Arc<dyn DataSource>,
        ticket: RequestTicket,
        request: KnnRequest,
    ) {
        self.spawn(move || {
            let result = source.knn_data(&request);
            JobMessage::KnnLoaded(KnnLoadResult {
                ticket,
                request,
                result,
            })
        });
    }

    pub(crate) fn begin_regression_load(&self, source: Arc<dyn DataSource>, ticket: RequestTicket) {
        self.spawn(move || {
            let result = source.regression_data();
            JobMessage::RegressionLoaded(RegressionLoadResult { ticket, result })
        });
    }

    pub(crate) fn begin_prediction(
        &self,
        source: Arc<dyn DataSource>,
        ticket: RequestTicket,
        rooms: f64,
    ) {
        self.spawn(move || {
            let result = source.predict_price(rooms);
            JobMessage::PricePredicted(PredictResult {
                ticket,
                rooms,
                result,
            })
        });
    }

    fn spawn(&self, job: impl FnOnce() -> JobMessage + Send + 'static) {
        let tx = self.message_tx.clone();
        let repaint = self.repaint.clone();
        thread::spawn(move || {
            let _ = tx.send(job());
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }
}
