use qualgraph_core::{CodeId, CodingStore, GraphError, NodeKey, NodeKind};
use qualgraph_events::{Event, EventBus, EventListener};
use qualgraph_graph::{
    AngleAllocator, CanvasNode, CanvasSize, GraphCanvas, GraphLink, HierarchyIndexer, Layouter,
    NodeSet, RadialLayouter, RootSelector, Vec2, apply_styles,
};
use serde::{Deserialize, Serialize};

pub mod report;
pub mod settings;

pub use report::{Report, ReportBlock, ReportScope, ReportViewer};
pub use settings::{GraphSettings, RadialLayoutSettings, SettingsError};

/// Label of the root choice that shows the whole hierarchy.
pub const ALL_ROOTS_LABEL: &str = "All";

/// The two display toggles offered next to the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub monochrome: bool,
    pub enlarge_category_font: bool,
}

/// Context menu entries for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeAction {
    Memo,
    CodedMedia,
    CaseMedia,
}

/// What the memo dialog should show for a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoPrompt {
    pub node: NodeKey,
    pub title: String,
    pub text: String,
}

/// Serializable copy of the scene after a render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub size: CanvasSize,
    pub font_family: String,
    pub nodes: Vec<CanvasNode>,
    pub links: Vec<GraphLink>,
}

/// Drives the code graph: loads the hierarchy from the store, lays it out,
/// and applies node-level edits coming from the shell.
///
/// Each render rebuilds the node set from scratch. Only memo edits are
/// written back to the store.
pub struct GraphView<S: CodingStore> {
    store: S,
    settings: GraphSettings,
    indexer: HierarchyIndexer,
    layouter: RadialLayouter,
    canvas: GraphCanvas,
    bus: Option<EventBus>,
    pending_prompt: Option<MemoPrompt>,
}

impl<S: CodingStore> GraphView<S> {
    pub fn new(store: S, settings: GraphSettings) -> Self {
        Self {
            indexer: settings.indexer(),
            layouter: settings.layouter(),
            canvas: GraphCanvas::new(settings.canvas_size()),
            store,
            settings,
            bus: None,
            pending_prompt: None,
        }
    }

    /// Publish failures back onto `bus` while handling events.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    pub fn canvas(&self) -> &GraphCanvas {
        &self.canvas
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            size: self.canvas.size(),
            font_family: self.settings.font_family.clone(),
            nodes: self.canvas.nodes().to_vec(),
            links: self.canvas.links().to_vec(),
        }
    }

    /// Rebuild the scene for `selector`.
    ///
    /// Any error leaves the canvas empty; no partial graph is shown.
    pub fn render(
        &mut self,
        selector: RootSelector,
        options: RenderOptions,
    ) -> Result<&GraphCanvas, GraphError> {
        let result = self
            .build_nodes(selector, options)
            .and_then(|nodes| self.canvas.populate(nodes));
        if let Err(e) = result {
            tracing::error!("Render failed: {}", e);
            self.canvas.clear();
            return Err(e);
        }
        Ok(&self.canvas)
    }

    fn build_nodes(
        &self,
        selector: RootSelector,
        options: RenderOptions,
    ) -> Result<NodeSet, GraphError> {
        let categories = self.store.list_categories()?;
        let codes = self.store.list_codes()?;

        let mut nodes = self.indexer.select_subtree(&categories, &codes, selector)?;
        self.indexer.compute_depths(&mut nodes)?;
        apply_styles(&mut nodes, &self.settings.style_options(options));
        AngleAllocator::assign_angles(&mut nodes)?;
        let report = self.layouter.execute(&mut nodes, self.canvas.size())?;
        tracing::info!(
            "Laid out {} nodes ({:?}) in {} passes",
            nodes.len(),
            selector,
            report.passes
        );
        Ok(nodes)
    }

    /// Names offered by the root chooser: "All", then categories by name.
    pub fn root_choices(&self) -> Result<Vec<String>, GraphError> {
        let mut names: Vec<String> = self
            .store
            .list_categories()?
            .into_iter()
            .map(|c| c.name)
            .collect();
        names.sort();
        names.insert(0, ALL_ROOTS_LABEL.to_string());
        Ok(names)
    }

    /// Resolve a chooser entry. Categories win over codes of the same name.
    pub fn resolve_root(&self, name: &str) -> Result<Option<RootSelector>, GraphError> {
        if name == ALL_ROOTS_LABEL {
            return Ok(Some(RootSelector::All));
        }
        if let Some(category) = self
            .store
            .list_categories()?
            .into_iter()
            .find(|c| c.name == name)
        {
            return Ok(Some(RootSelector::Subtree(category.id.into())));
        }
        Ok(self
            .store
            .list_codes()?
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| RootSelector::Subtree(c.id.into())))
    }

    /// In-place label edit. Held in memory only.
    pub fn on_text_edited(&mut self, node: NodeKey, text: &str) -> Result<(), GraphError> {
        self.canvas.set_node_text(node, text)
    }

    pub fn on_dragged(&mut self, node: NodeKey, position: Vec2) -> Result<(), GraphError> {
        self.canvas.drag_node(node, position)
    }

    pub fn on_memo_requested(&self, node: NodeKey) -> Result<MemoPrompt, GraphError> {
        let entry = self
            .canvas
            .node(node)
            .ok_or(GraphError::UnknownNode(node))?;
        Ok(MemoPrompt {
            node,
            title: format!("Memo for {} {}", node.kind().label(), entry.node.name),
            text: entry.node.memo.clone().unwrap_or_default(),
        })
    }

    /// Keep the edited memo on the node, then write it to the store.
    ///
    /// A failed write leaves the in-memory memo in place.
    pub fn on_memo_submitted(&mut self, node: NodeKey, text: &str) -> Result<(), GraphError> {
        self.canvas.set_node_memo(node, Some(text.to_string()))?;
        self.store.update_memo(node, text).map_err(|e| {
            tracing::warn!("Memo for {} kept in memory only: {}", node, e);
            GraphError::MemoPersistFailure {
                node,
                reason: e.to_string(),
            }
        })
    }

    pub fn available_actions(&self, node: NodeKey) -> Result<Vec<NodeAction>, GraphError> {
        if self.canvas.node(node).is_none() {
            return Err(GraphError::UnknownNode(node));
        }
        Ok(match node.kind() {
            NodeKind::Category => vec![NodeAction::Memo],
            NodeKind::Code => vec![
                NodeAction::Memo,
                NodeAction::CodedMedia,
                NodeAction::CaseMedia,
            ],
        })
    }

    /// Collect a code's excerpts into a report.
    pub fn report(&self, node: NodeKey, scope: ReportScope) -> Result<Report, GraphError> {
        let code = node.as_code().ok_or(GraphError::NotACode(node))?;
        let name = self.code_name(node, code)?;
        let excerpts = match scope {
            ReportScope::Coded => self.store.fetch_excerpts(code)?,
            ReportScope::Cases => self.store.fetch_case_excerpts(code)?,
        };
        Ok(report::build_report(&name, scope, &excerpts))
    }

    pub fn coded_media_report(&self, node: NodeKey) -> Result<Report, GraphError> {
        self.report(node, ReportScope::Coded)
    }

    pub fn case_media_report(&self, node: NodeKey) -> Result<Report, GraphError> {
        self.report(node, ReportScope::Cases)
    }

    pub fn show_report(
        &self,
        node: NodeKey,
        scope: ReportScope,
        viewer: &mut dyn ReportViewer,
    ) -> Result<(), GraphError> {
        viewer.show(self.report(node, scope)?);
        Ok(())
    }

    /// The edited label when the node is on the canvas, else the stored name.
    fn code_name(&self, node: NodeKey, code: CodeId) -> Result<String, GraphError> {
        if let Some(entry) = self.canvas.node(node) {
            return Ok(entry.node.name.clone());
        }
        self.store
            .list_codes()?
            .into_iter()
            .find(|c| c.id == code)
            .map(|c| c.name)
            .ok_or(GraphError::UnknownNode(node))
    }

    /// Memo prompt produced by the last `NodeMemoRequested` event.
    pub fn take_memo_prompt(&mut self) -> Option<MemoPrompt> {
        self.pending_prompt.take()
    }

    fn publish(&self, event: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(event);
        }
    }

    fn report_error(&self, error: GraphError) {
        let event = match error {
            GraphError::MemoPersistFailure { node, reason } => Event::MemoSaveFailed { node, reason },
            other => Event::ShowError {
                message: other.to_string(),
            },
        };
        self.publish(event);
    }
}

impl<S: CodingStore> EventListener for GraphView<S> {
    fn handle_event(&mut self, event: &Event) {
        let result = match event {
            Event::RenderRequested {
                root,
                monochrome,
                enlarge_category_font,
            } => {
                let selector = root.map(RootSelector::Subtree).unwrap_or_default();
                let options = RenderOptions {
                    monochrome: *monochrome,
                    enlarge_category_font: *enlarge_category_font,
                };
                self.render(selector, options).map(|_| ())
            }
            Event::NodeTextEdited { node, text } => self.on_text_edited(*node, text),
            Event::NodeDragged { node, x, y } => self.on_dragged(*node, Vec2::new(*x, *y)),
            Event::NodeMemoRequested { node } => self.on_memo_requested(*node).map(|prompt| {
                self.pending_prompt = Some(prompt);
            }),
            Event::NodeMemoSubmitted { node, text } => self.on_memo_submitted(*node, text),
            Event::MemoSaveFailed { .. } | Event::ShowError { .. } => Ok(()),
        };
        if let Err(e) = result {
            self.report_error(e);
        }
    }
}

#[cfg(test)]
mod tests;
