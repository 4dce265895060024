use serde::Serialize;

/// Lifecycle of a render job as seen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingState {
    Idle,
    Analyzing,
    Rendering,
    Completed,
    Error,
}

/// Snapshot of a render job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingStatus {
    pub state: ProcessingState,
    /// 0 to 100
    pub progress: f64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingStatus {
    pub fn idle() -> Self {
        Self {
            state: ProcessingState::Idle,
            progress: 0.0,
            message: String::new(),
            error: None,
        }
    }

    pub fn analyzing() -> Self {
        Self {
            state: ProcessingState::Analyzing,
            progress: 0.0,
            message: "Initializing engine...".to_string(),
            error: None,
        }
    }

    pub fn rendering(progress: f64, message: impl Into<String>) -> Self {
        Self {
            state: ProcessingState::Rendering,
            progress: progress.clamp(0.0, 100.0),
            message: message.into(),
            error: None,
        }
    }

    pub fn completed() -> Self {
        Self {
            state: ProcessingState::Completed,
            progress: 100.0,
            message: "Video generated successfully!".to_string(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            state: ProcessingState::Error,
            progress: 0.0,
            message: "Failed to generate video".to_string(),
            error: Some(error.into()),
        }
    }

    /// Completed or failed
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, ProcessingState::Completed | ProcessingState::Error)
    }
}

impl Default for ProcessingStatus {
    fn default() -> Self {
        Self::idle()
    }
}
