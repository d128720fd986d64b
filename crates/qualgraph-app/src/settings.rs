use crate::RenderOptions;
use qualgraph_graph::{
    CanvasSize, GraphCanvas, GraphNode, HierarchyIndexer, NodeStyleOptions, RadialLayouter,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub font_family: String,
    pub base_font_size: f32,
    pub monochrome: bool,
    pub enlarge_category_font: bool,
    pub layout: RadialLayoutSettings,
    pub max_expansion_rounds: usize,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            canvas_width: GraphCanvas::DEFAULT_SIZE.width,
            canvas_height: GraphCanvas::DEFAULT_SIZE.height,
            font_family: "Noto Sans".to_string(),
            base_font_size: GraphNode::DEFAULT_FONT_SIZE,
            monochrome: false,
            enlarge_category_font: false,
            layout: RadialLayoutSettings::default(),
            max_expansion_rounds: HierarchyIndexer::DEFAULT_MAX_EXPANSION_ROUNDS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialLayoutSettings {
    pub radius: f32,
    pub min_separation: f32,
    pub max_passes: usize,
}

impl Default for RadialLayoutSettings {
    fn default() -> Self {
        Self {
            radius: RadialLayouter::DEFAULT_RADIUS,
            min_separation: RadialLayouter::DEFAULT_MIN_SEPARATION,
            max_passes: RadialLayouter::MAX_RELAXATION_PASSES,
        }
    }
}

impl GraphSettings {
    /// Read settings from `path`. A missing or unreadable file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("Settings file {:?} not found, using defaults", path);
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    tracing::debug!("Settings loaded from {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::error!("Failed to parse settings: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!("Failed to read settings file: {}", e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn canvas_size(&self) -> CanvasSize {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }

    pub fn indexer(&self) -> HierarchyIndexer {
        HierarchyIndexer {
            max_expansion_rounds: self.max_expansion_rounds,
        }
    }

    pub fn layouter(&self) -> RadialLayouter {
        RadialLayouter {
            radius: self.layout.radius,
            min_separation: self.layout.min_separation,
            max_passes: self.layout.max_passes,
        }
    }

    /// The display toggles saved with these settings.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            monochrome: self.monochrome,
            enlarge_category_font: self.enlarge_category_font,
        }
    }

    /// Node styling for one render; `options` takes precedence over the saved toggles.
    pub fn style_options(&self, options: RenderOptions) -> NodeStyleOptions {
        NodeStyleOptions {
            monochrome: options.monochrome,
            enlarge_category_font: options.enlarge_category_font,
            base_font_size: self.base_font_size,
        }
    }
}
