use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(String),

    /// Bad or missing track data for one aircraft. Never aborts a run.
    #[error("input error for {aircraft}: {reason}")]
    Input { aircraft: String, reason: String },

    #[error("time error: {0}")]
    Time(String),

    #[error("IO error {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error {0}")]
    Json(#[from] serde_json::Error),
}

pub fn config_error(msg: impl ToString) -> SimError {
    SimError::Config(msg.to_string())
}

pub fn input_error(aircraft: impl ToString, reason: impl ToString) -> SimError {
    SimError::Input {
        aircraft: aircraft.to_string(),
        reason: reason.to_string(),
    }
}
