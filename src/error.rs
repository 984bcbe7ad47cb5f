use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to initialize OCR engine: {0}")]
    InitializationError(String),

    #[error("Failed to load image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save image {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Preprocessing failed: {0}")]
    PreprocessingError(String),

    #[error("Failed to recognize text: {0}")]
    RecognitionError(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid corrections file {path}: {source}")]
    InvalidCorrections {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl OcrError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OcrError::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable category code, so callers can branch without matching on messages
    pub fn code(&self) -> &'static str {
        match self {
            OcrError::InitializationError(_) => "INIT_ERROR",
            OcrError::Decode { .. } => "DECODE_ERROR",
            OcrError::Encode { .. } => "ENCODE_ERROR",
            OcrError::PreprocessingError(_) => "PREPROCESSING_ERROR",
            OcrError::RecognitionError(_) => "OCR_ERROR",
            OcrError::Io { .. } => "IO_ERROR",
            OcrError::InvalidCorrections { .. } => "CORRECTIONS_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = OcrError::io(
            "txt/scan1.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.code(), "IO_ERROR");
        assert!(err.to_string().contains("scan1.txt"));
    }

    #[test]
    fn test_codes_distinguish_categories() {
        let ocr = OcrError::RecognitionError("engine crashed".to_string());
        let init = OcrError::InitializationError("no tessdata".to_string());
        assert_eq!(ocr.code(), "OCR_ERROR");
        assert_eq!(init.code(), "INIT_ERROR");
        assert_ne!(ocr.code(), init.code());
    }
}
