use serde::Deserialize;

/// The `{"data": ...}` envelope wrapping every `/api2/json` answer.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}
