use egui::Color32;

/// Severity of the footer status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Busy,
    Info,
    Warning,
    Error,
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    /// Main status message text.
    pub text: String,
    /// Badge label shown next to the status.
    pub badge_label: String,
    /// Badge color.
    pub badge_color: Color32,
    /// Rolling status log entries, newest last.
    pub log: Vec<String>,
}

const STATUS_LOG_LIMIT: usize = 50;

impl StatusBarState {
    /// Status shown before the first load finishes.
    pub fn idle() -> Self {
        let (badge_label, badge_color) = status_badge(StatusTone::Idle);
        Self {
            text: "Waiting for data".into(),
            badge_label,
            badge_color,
            log: Vec::new(),
        }
    }

    pub fn set(&mut self, text: impl Into<String>, tone: StatusTone) {
        let (label, color) = status_badge(tone);
        self.text = text.into();
        self.badge_label = label;
        self.badge_color = color;
        self.log.push(format!("[{}] {}", self.badge_label, self.text));
        if self.log.len() > STATUS_LOG_LIMIT {
            let overflow = self.log.len() - STATUS_LOG_LIMIT;
            self.log.drain(..overflow);
        }
    }

    /// Concatenate log entries into a single displayable string.
    pub fn log_text(&self) -> String {
        self.log.join("\n")
    }
}

fn status_badge(tone: StatusTone) -> (String, Color32) {
    match tone {
        StatusTone::Idle => ("Idle".into(), Color32::from_rgb(42, 42, 42)),
        StatusTone::Busy => ("Loading".into(), Color32::from_rgb(31, 139, 255)),
        StatusTone::Info => ("Info".into(), Color32::from_rgb(64, 140, 112)),
        StatusTone::Warning => ("Warning".into(), Color32::from_rgb(192, 138, 43)),
        StatusTone::Error => ("Error".into(), Color32::from_rgb(192, 57, 43)),
    }
}

/// Quality bucket for a displayed metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricTone {
    Good,
    Fair,
    Poor,
}

impl MetricTone {
    pub fn color(self) -> Color32 {
        match self {
            Self::Good => Color32::from_rgb(76, 175, 80),
            Self::Fair => Color32::from_rgb(255, 152, 0),
            Self::Poor => Color32::from_rgb(244, 67, 54),
        }
    }
}

/// Which kind of failure a notice reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Load,
    Prediction,
    Validation,
}

/// Modal message shown until the user dismisses it.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        let title = match kind {
            NoticeKind::Load => "Could not load data",
            NoticeKind::Prediction => "Prediction failed",
            NoticeKind::Validation => "Invalid input",
        };
        Self {
            kind,
            title: title.to_string(),
            message: message.into(),
        }
    }
}
