use qualgraph_core::{Excerpt, ImageExcerpt, ImageRegion, MediaExcerpt, TextExcerpt};
use serde::{Deserialize, Serialize};

/// Longest side of an image excerpt in a report.
pub const MAX_IMAGE_EXTENT: f64 = 300.0;

/// Which set of codings a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportScope {
    /// Every coding of the code, across all files and coders.
    Coded,
    /// Codings inside spans assigned to cases.
    Cases,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Unique per report so the same file can be cropped more than once.
    pub resource_name: String,
    pub media_path: String,
    pub region: ImageRegion,
    pub display_width: f64,
    pub display_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReportBlock {
    Html(String),
    Image(ImageBlock),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub blocks: Vec<ReportBlock>,
}

/// Displays a finished report.
pub trait ReportViewer {
    fn show(&mut self, report: Report);
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `61500` -> `"1.01"`.
pub fn msecs_to_mins_and_secs(msecs: i64) -> String {
    let secs = msecs.max(0) / 1000;
    format!("{}.{:02}", secs / 60, secs % 60)
}

/// Scale `(width, height)` down to fit a `MAX_IMAGE_EXTENT` square. Smaller
/// images keep their size.
pub fn fit_image(width: f64, height: f64) -> (f64, f64) {
    let scale_w = if width > MAX_IMAGE_EXTENT {
        MAX_IMAGE_EXTENT / width
    } else {
        1.0
    };
    let scale_h = if height > MAX_IMAGE_EXTENT {
        MAX_IMAGE_EXTENT / height
    } else {
        1.0
    };
    let scale = scale_w.min(scale_h);
    (width * scale, height * scale)
}

fn highlight(color: Option<&str>, inner: &str) -> String {
    format!(
        "<span style=\"background-color:{}\">{}</span>",
        color.unwrap_or("#FFFFFF"),
        inner
    )
}

pub fn build_report(code_name: &str, scope: ReportScope, excerpts: &[Excerpt]) -> Report {
    let title = match scope {
        ReportScope::Coded => format!("Coded text : {code_name}"),
        ReportScope::Cases => format!("Coded media for cases: {code_name}"),
    };
    let mut blocks = Vec::new();
    let mut image_counter = 0usize;
    for excerpt in excerpts {
        match excerpt {
            Excerpt::Text(text) => push_text(&mut blocks, text),
            Excerpt::Image(image) => {
                push_image(&mut blocks, image, image_counter);
                image_counter += 1;
            }
            Excerpt::Media(media) => push_media(&mut blocks, media),
        }
    }
    tracing::debug!("Report '{}' built with {} blocks", title, blocks.len());
    Report { title, blocks }
}

fn origin_label(case_name: Option<&str>, source_name: &str) -> String {
    match case_name {
        Some(case) => format!(
            "Case: <em>{}</em>, File: {}",
            escape_html(case),
            escape_html(source_name)
        ),
        None => format!("File: <em>{}</em>", escape_html(source_name)),
    }
}

fn push_text(blocks: &mut Vec<ReportBlock>, text: &TextExcerpt) {
    let title = format!(
        "{}, Coder: <em>{}</em>, {} - {}",
        highlight(
            text.color.as_deref(),
            &origin_label(text.case_name.as_deref(), &text.source_name)
        ),
        escape_html(&text.owner),
        text.pos0,
        text.pos1
    );
    blocks.push(ReportBlock::Html(title));
    blocks.push(ReportBlock::Html(format!(
        "<p>{}</p>",
        escape_html(&text.text)
    )));
}

fn push_image(blocks: &mut Vec<ReportBlock>, image: &ImageExcerpt, counter: usize) {
    let title = format!(
        "{}<br />Coder: {}<br />",
        highlight(
            image.color.as_deref(),
            &origin_label(image.case_name.as_deref(), &image.media_path)
        ),
        escape_html(&image.owner)
    );
    blocks.push(ReportBlock::Html(title));
    let (display_width, display_height) = fit_image(image.region.width, image.region.height);
    blocks.push(ReportBlock::Image(ImageBlock {
        resource_name: format!("{}-{}", counter, image.media_path),
        media_path: image.media_path.clone(),
        region: image.region,
        display_width,
        display_height,
    }));
    blocks.push(ReportBlock::Text(format!(
        "Memo: {}",
        image.memo.as_deref().unwrap_or_default()
    )));
}

fn push_media(blocks: &mut Vec<ReportBlock>, media: &MediaExcerpt) {
    let title = format!(
        "{}<br />[{} - {}] Coder: {}",
        highlight(
            media.color.as_deref(),
            &origin_label(media.case_name.as_deref(), &media.media_path)
        ),
        msecs_to_mins_and_secs(media.start_ms),
        msecs_to_mins_and_secs(media.end_ms),
        escape_html(&media.owner)
    );
    blocks.push(ReportBlock::Html(title));
    blocks.push(ReportBlock::Text(format!(
        "Memo: {}",
        media.memo.as_deref().unwrap_or_default()
    )));
}
