use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub query: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
