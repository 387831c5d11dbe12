use serde::Serialize;

/// `{"result": ...}` wrapper used by every user endpoint.
#[derive(Debug, Serialize)]
pub struct ResultEnvelope<T> {
    pub result: T,
}

impl<T> ResultEnvelope<T> {
    pub fn new(result: T) -> Self {
        Self { result }
    }
}
