use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SummaryRequest {
    #[validate(length(min = 1, message = "document_id must not be empty"))]
    pub document_id: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub document_id: String,
    pub summary: String,
}
