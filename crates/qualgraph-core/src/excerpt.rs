use serde::{Deserialize, Serialize};

/// A span of a text source coded with a given code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextExcerpt {
    pub code_name: String,
    pub color: Option<String>,
    pub source_name: String,
    /// Set when the excerpt was collected through a case assignment.
    pub case_name: Option<String>,
    pub pos0: i64,
    pub pos1: i64,
    pub text: String,
    pub owner: String,
}

/// Pixel region of a coded image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRegion {
    pub x1: f64,
    pub y1: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageExcerpt {
    pub code_name: String,
    pub color: Option<String>,
    pub source_name: String,
    pub case_name: Option<String>,
    pub media_path: String,
    pub region: ImageRegion,
    pub owner: String,
    pub memo: Option<String>,
}

/// A coded segment of an audio or video source, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaExcerpt {
    pub code_name: String,
    pub color: Option<String>,
    pub source_name: String,
    pub case_name: Option<String>,
    pub media_path: String,
    pub start_ms: i64,
    pub end_ms: i64,
    pub owner: String,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Excerpt {
    Text(TextExcerpt),
    Image(ImageExcerpt),
    Media(MediaExcerpt),
}
