use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub year: i32,
}

/// Body of `POST /movies`. A missing `year` reads as 0 and fails validation.
#[derive(Debug, Deserialize)]
pub struct MovieRequest {
    pub title: Option<String>,
    #[serde(default)]
    pub year: i32,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub errors: Vec<String>,
}
