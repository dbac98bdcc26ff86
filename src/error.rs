use thiserror::Error;

use crate::form::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Failed to read form file: {0}")]
    FormError(String),
    #[error("Form is incomplete:\n{0}")]
    Validation(ValidationErrors),
    #[error("Invalid date format: {0}")]
    DateError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
