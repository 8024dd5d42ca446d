//! In-library reading request (the "cart" submission)

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::item::ItemId;

/// Reading request sent to the library once the selection is complete
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReadingRequest {
    #[validate(length(min = 1, message = "Select at least one book"))]
    pub items: Vec<ItemId>,
    #[validate(custom(function = "validate_visit_date"))]
    pub visit_date: NaiveDate,
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

/// Server acknowledgement of a submitted reading request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub message: Option<String>,
}

fn validate_visit_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date < Utc::now().date_naive() {
        let mut err = ValidationError::new("visit_date_in_past");
        err.message = Some("Visit date cannot be in the past".into());
        return Err(err);
    }
    Ok(())
}
