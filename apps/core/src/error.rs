use thiserror::Error;

/// Failure fetching a single candidate location.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("could not read file: {0}")]
    Io(String),
    #[error("could not parse document: {0}")]
    Parse(String),
}

/// One failed candidate in a fallback pass.
#[derive(Debug)]
pub struct Attempt {
    pub location: String,
    pub error: FetchError,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no candidate locations configured")]
    NoCandidates,
    #[error("all {} candidate locations failed: {}", .attempts.len(), summarize(.attempts))]
    Exhausted { attempts: Vec<Attempt> },
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("invalid facility document: {0}")]
    Parse(String),
    #[error("no facility has usable coordinates")]
    NoUsableData,
    #[error("background load stopped: {0}")]
    Task(String),
    #[error("map surface rejected {operation}: {message}")]
    Surface { operation: &'static str, message: String },
}

fn summarize(attempts: &[Attempt]) -> String {
    attempts
        .iter()
        .map(|attempt| format!("{} ({})", attempt.location, attempt.error))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_message_lists_every_location() {
        let error = LoadError::Exhausted {
            attempts: vec![
                Attempt {
                    location: "data/facilities.geojson".to_string(),
                    error: FetchError::Status(404),
                },
                Attempt {
                    location: "facilities.geojson".to_string(),
                    error: FetchError::Network("connection refused".to_string()),
                },
            ],
        };

        let message = error.to_string();
        assert!(message.starts_with("all 2 candidate locations failed"));
        assert!(message.contains("data/facilities.geojson (server answered with status 404)"));
        assert!(message.contains("facilities.geojson (request failed: connection refused)"));
    }
}
