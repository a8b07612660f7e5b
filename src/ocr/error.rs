use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Tesseract is not installed or not in PATH")]
    TesseractNotInstalled,

    #[error("Tesseract initialization failed: {details}")]
    InitializationFailed { details: String },

    #[error("Failed to load image {path}: {details}")]
    InvalidImage { path: String, details: String },

    #[error("Text extraction failed: {details}")]
    ExtractionFailed { details: String },

    #[error("tesseract exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
