//! Raw classifier output and the optional label decoder.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{CropError, Result};

/// A class label as the classifier emits it.
///
/// Models trained on encoded targets emit integers; models trained on the
/// crop names directly emit text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLabel {
    Integer(i64),
    Text(String),
}

impl fmt::Display for RawLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawLabel::Integer(v) => write!(f, "{v}"),
            RawLabel::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RawLabel {
    fn from(v: i64) -> Self {
        RawLabel::Integer(v)
    }
}

impl From<&str> for RawLabel {
    fn from(s: &str) -> Self {
        RawLabel::Text(s.to_string())
    }
}

/// Both `{"classes": [...]}` and a bare array are accepted on disk.
#[derive(Deserialize)]
#[serde(untagged)]
enum EncoderFile {
    Wrapped { classes: Vec<String> },
    Bare(Vec<String>),
}

/// Maps encoded class indices back to crop names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDecoder {
    classes: Vec<String>,
}

impl LabelDecoder {
    pub fn new(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            return Err(CropError::LabelEncoderLoad(
                "classes must not be empty".to_string(),
            ));
        }
        Ok(Self { classes })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| CropError::LabelEncoderLoad(e.to_string()))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: EncoderFile = serde_json::from_str(content)
            .map_err(|e| CropError::LabelEncoderLoad(e.to_string()))?;
        let classes = match file {
            EncoderFile::Wrapped { classes } | EncoderFile::Bare(classes) => classes,
        };
        Self::new(classes)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn decode(&self, raw: &RawLabel) -> Result<String> {
        match raw {
            RawLabel::Integer(idx) => usize::try_from(*idx)
                .ok()
                .and_then(|i| self.classes.get(i))
                .cloned()
                .ok_or_else(|| {
                    CropError::LabelDecode(format!(
                        "index {idx} out of range for {} classes",
                        self.classes.len()
                    ))
                }),
            RawLabel::Text(s) => Err(CropError::LabelDecode(format!(
                "label {s:?} is not an encoded index"
            ))),
        }
    }
}
