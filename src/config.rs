use std::path::PathBuf;

/// Tesseract recognition settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrSettings {
    /// OCR engine mode (3 = Tesseract default, whatever is available)
    pub engine_mode: u8,
    /// Page segmentation mode (4 = single column of text of variable sizes)
    pub page_seg_mode: u8,
    /// Recognition languages, in priority order
    pub languages: Vec<String>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            engine_mode: 3,
            page_seg_mode: 4,
            languages: vec!["ukr".to_string(), "rus".to_string(), "eng".to_string()],
        }
    }
}

impl OcrSettings {
    /// Parse a `+`-separated language list such as `ukr+rus+eng`
    pub fn parse_languages(spec: &str) -> Vec<String> {
        spec.split('+')
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Languages joined the way Tesseract expects them (`ukr+rus+eng`)
    pub fn language_spec(&self) -> String {
        self.languages.join("+")
    }

    /// Command-line style rendering, used for logging
    pub fn config_string(&self) -> String {
        format!(
            "--oem {} --psm {} -l {}",
            self.engine_mode,
            self.page_seg_mode,
            self.language_spec()
        )
    }
}

/// Batch configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub debug_dir: PathBuf,
    pub ocr: OcrSettings,
    /// Path to tessdata directory (models are downloaded to a cache dir if not set)
    pub tessdata_path: Option<PathBuf>,
    /// JSON file replacing the built-in text corrections
    pub corrections_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("img"),
            output_dir: PathBuf::from("txt"),
            debug_dir: PathBuf::from("debug"),
            ocr: OcrSettings::default(),
            tessdata_path: None,
            corrections_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_string() {
        assert_eq!(
            OcrSettings::default().config_string(),
            "--oem 3 --psm 4 -l ukr+rus+eng"
        );
    }

    #[test]
    fn test_parse_languages_ignores_empty_parts() {
        assert_eq!(
            OcrSettings::parse_languages("ukr++rus+ eng +"),
            vec!["ukr", "rus", "eng"]
        );
    }

    #[test]
    fn test_default_folders() {
        let config = Config::default();
        assert_eq!(config.input_dir, PathBuf::from("img"));
        assert_eq!(config.output_dir, PathBuf::from("txt"));
        assert_eq!(config.debug_dir, PathBuf::from("debug"));
        assert!(config.tessdata_path.is_none());
    }
}
