use super::*;
use qualgraph_core::{
    CategoryId, CategoryRecord, CodeRecord, Color, Excerpt, HierarchyError, StoreError,
};
use qualgraph_storage::{SourceFile, Storage, TextCoding};

/// In-memory store with switchable failures.
#[derive(Default)]
struct MemoryStore {
    categories: Vec<CategoryRecord>,
    codes: Vec<CodeRecord>,
    fail_reads: bool,
    fail_writes: bool,
    writes: Vec<(NodeKey, String)>,
}

impl CodingStore for MemoryStore {
    fn list_categories(&self) -> Result<Vec<CategoryRecord>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::new("database is locked"));
        }
        Ok(self.categories.clone())
    }

    fn list_codes(&self) -> Result<Vec<CodeRecord>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::new("database is locked"));
        }
        Ok(self.codes.clone())
    }

    fn update_memo(&mut self, node: NodeKey, text: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::new("attempt to write a readonly database"));
        }
        self.writes.push((node, text.to_string()));
        Ok(())
    }

    fn fetch_excerpts(&self, _code: CodeId) -> Result<Vec<Excerpt>, StoreError> {
        Ok(Vec::new())
    }

    fn fetch_case_excerpts(&self, _code: CodeId) -> Result<Vec<Excerpt>, StoreError> {
        Ok(Vec::new())
    }
}

const HEALTH: NodeKey = NodeKey::Category(CategoryId(1));
const FOOD: NodeKey = NodeKey::Category(CategoryId(2));
const DIET: NodeKey = NodeKey::Code(CodeId(10));
const EXERCISE: NodeKey = NodeKey::Code(CodeId(11));

fn health_records() -> (Vec<CategoryRecord>, Vec<CodeRecord>) {
    let categories = vec![CategoryRecord {
        id: CategoryId(1),
        name: "Health".to_string(),
        ..Default::default()
    }];
    let codes = vec![
        CodeRecord {
            id: CodeId(10),
            name: "Diet".to_string(),
            category: Some(CategoryId(1)),
            color: Some("#FF0000".to_string()),
            ..Default::default()
        },
        CodeRecord {
            id: CodeId(11),
            name: "Exercise".to_string(),
            category: Some(CategoryId(1)),
            color: Some("#00FF00".to_string()),
            ..Default::default()
        },
    ];
    (categories, codes)
}

fn scenario_settings() -> GraphSettings {
    GraphSettings {
        canvas_width: 900.0,
        canvas_height: 600.0,
        ..Default::default()
    }
}

fn memory_view() -> GraphView<MemoryStore> {
    let (categories, codes) = health_records();
    let store = MemoryStore {
        categories,
        codes,
        ..Default::default()
    };
    GraphView::new(store, scenario_settings())
}

/// Health > Food > Diet, Health > Exercise, with two Diet codings.
fn storage_view() -> GraphView<Storage> {
    let storage = Storage::new_in_memory().unwrap();
    storage
        .insert_category(&CategoryRecord {
            id: CategoryId(1),
            name: "Health".to_string(),
            ..Default::default()
        })
        .unwrap();
    storage
        .insert_category(&CategoryRecord {
            id: CategoryId(2),
            name: "Food".to_string(),
            parent: Some(CategoryId(1)),
            ..Default::default()
        })
        .unwrap();
    storage
        .insert_code(&CodeRecord {
            id: CodeId(10),
            name: "Diet".to_string(),
            category: Some(CategoryId(2)),
            color: Some("#FF0000".to_string()),
            ..Default::default()
        })
        .unwrap();
    storage
        .insert_code(&CodeRecord {
            id: CodeId(11),
            name: "Exercise".to_string(),
            category: Some(CategoryId(1)),
            color: Some("#00FF00".to_string()),
            ..Default::default()
        })
        .unwrap();
    storage
        .insert_source(&SourceFile {
            id: 1,
            name: "interview.txt".to_string(),
            media_path: None,
        })
        .unwrap();
    for (text, pos0) in [("cut out bread", 4), ("more <greens> & fruit", 30)] {
        storage
            .insert_text_coding(&TextCoding {
                code: CodeId(10),
                file: 1,
                text: text.to_string(),
                pos0,
                pos1: pos0 + 12,
                owner: "jo".to_string(),
            })
            .unwrap();
    }
    GraphView::new(storage, scenario_settings())
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn test_render_health_scenario() {
    let mut view = memory_view();
    let canvas = view
        .render(RootSelector::All, RenderOptions::default())
        .unwrap();

    assert_eq!(canvas.nodes().len(), 3);
    assert_eq!(canvas.links().len(), 2);

    let root = canvas.node(HEALTH).unwrap().position;
    assert!(close(root.x, 300.0) && close(root.y, 300.0), "{root:?}");
    let diet = canvas.node(DIET).unwrap().position;
    let exercise = canvas.node(EXERCISE).unwrap().position;
    assert!(close(diet.x, 165.0) && close(diet.y, 300.0), "{diet:?}");
    assert!(close(exercise.x, 435.0) && close(exercise.y, 300.0), "{exercise:?}");

    let diet_node = &canvas.node(DIET).unwrap().node;
    assert_eq!(diet_node.color, Color::rgb(255, 0, 0));
    assert_eq!(diet_node.depth, 1);
}

#[test]
fn test_render_options_restyle_nodes() {
    let mut view = memory_view();
    let canvas = view
        .render(
            RootSelector::All,
            RenderOptions {
                monochrome: true,
                enlarge_category_font: true,
            },
        )
        .unwrap();
    assert!(canvas.nodes().iter().all(|n| n.node.color == Color::WHITE));
    assert_eq!(canvas.node(HEALTH).unwrap().node.font_size, 10.0);
    assert_eq!(canvas.node(DIET).unwrap().node.font_size, 8.0);

    // Rendering again without the toggles restores code colors.
    let canvas = view
        .render(RootSelector::All, RenderOptions::default())
        .unwrap();
    assert_eq!(
        canvas.node(EXERCISE).unwrap().node.color,
        Color::rgb(0, 255, 0)
    );
}

#[test]
fn test_saved_font_size_reaches_rendered_nodes() {
    let (categories, codes) = health_records();
    let store = MemoryStore {
        categories,
        codes,
        ..Default::default()
    };
    let settings = GraphSettings {
        base_font_size: 11.0,
        ..scenario_settings()
    };
    let mut view = GraphView::new(store, settings);
    let canvas = view
        .render(
            RootSelector::All,
            RenderOptions {
                monochrome: false,
                enlarge_category_font: true,
            },
        )
        .unwrap();
    assert_eq!(canvas.node(HEALTH).unwrap().node.font_size, 13.0);
    assert_eq!(canvas.node(DIET).unwrap().node.font_size, 11.0);
}

#[test]
fn test_store_failure_is_terminal_and_clears_canvas() {
    let mut view = memory_view();
    view.render(RootSelector::All, RenderOptions::default())
        .unwrap();
    assert!(!view.canvas().nodes().is_empty());

    view.store.fail_reads = true;
    let err = view
        .render(RootSelector::All, RenderOptions::default())
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::StoreUnavailable("database is locked".to_string())
    );
    assert!(err.is_terminal());
    assert!(view.canvas().nodes().is_empty());
    assert!(view.canvas().links().is_empty());
}

#[test]
fn test_dangling_parent_aborts_render() {
    let mut view = memory_view();
    view.store.codes.push(CodeRecord {
        id: CodeId(12),
        name: "Sleep".to_string(),
        category: Some(CategoryId(40)),
        ..Default::default()
    });
    let err = view
        .render(RootSelector::All, RenderOptions::default())
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::MalformedHierarchy(HierarchyError::DanglingParent {
            node: NodeKey::Code(CodeId(12)),
            parent: CategoryId(40),
        })
    );
    assert!(view.canvas().nodes().is_empty());
}

#[test]
fn test_subtree_render_centers_selected_category() {
    let mut view = storage_view();
    let canvas = view
        .render(RootSelector::Subtree(FOOD), RenderOptions::default())
        .unwrap();
    assert_eq!(canvas.nodes().len(), 2);
    let food = canvas.node(FOOD).unwrap();
    assert_eq!(food.node.depth, 0);
    assert!(close(food.position.x, 300.0) && close(food.position.y, 300.0));
    assert!(canvas.node(EXERCISE).is_none());
    assert_eq!(canvas.links().len(), 1);
}

#[test]
fn test_drag_and_text_edit_stay_in_memory() {
    let mut view = storage_view();
    view.render(RootSelector::All, RenderOptions::default())
        .unwrap();
    let redraws = view.canvas().redraw_count();

    view.on_dragged(EXERCISE, Vec2::new(50.0, 60.0)).unwrap();
    view.on_text_edited(DIET, "Diet and eating").unwrap();

    assert_eq!(view.canvas().redraw_count(), redraws + 2);
    assert_eq!(
        view.canvas().node(EXERCISE).unwrap().position,
        Vec2::new(50.0, 60.0)
    );
    assert_eq!(view.canvas().node(DIET).unwrap().node.name, "Diet and eating");
    let stored = view.store().get_codes().unwrap();
    assert_eq!(stored[0].name, "Diet");
}

#[test]
fn test_memo_prompt_titles() {
    let mut view = storage_view();
    view.render(RootSelector::All, RenderOptions::default())
        .unwrap();

    let prompt = view.on_memo_requested(DIET).unwrap();
    assert_eq!(prompt.title, "Memo for Code Diet");
    assert_eq!(prompt.text, "");
    assert_eq!(
        view.on_memo_requested(FOOD).unwrap().title,
        "Memo for Category Food"
    );
    assert_eq!(
        view.on_memo_requested(NodeKey::Code(CodeId(77))),
        Err(GraphError::UnknownNode(NodeKey::Code(CodeId(77))))
    );
}

#[test]
fn test_memo_submission_persists() {
    let mut view = storage_view();
    view.render(RootSelector::All, RenderOptions::default())
        .unwrap();

    view.on_memo_submitted(FOOD, "everything eaten").unwrap();

    assert_eq!(
        view.canvas().node(FOOD).unwrap().node.memo.as_deref(),
        Some("everything eaten")
    );
    let categories = view.store().get_categories().unwrap();
    let food = categories.iter().find(|c| c.name == "Food").unwrap();
    assert_eq!(food.memo.as_deref(), Some("everything eaten"));
    assert_eq!(view.on_memo_requested(FOOD).unwrap().text, "everything eaten");
}

#[test]
fn test_memo_write_failure_keeps_edit() {
    let mut view = memory_view();
    view.render(RootSelector::All, RenderOptions::default())
        .unwrap();
    view.store.fail_writes = true;

    let err = view.on_memo_submitted(DIET, "draft").unwrap_err();

    assert_eq!(
        err,
        GraphError::MemoPersistFailure {
            node: DIET,
            reason: "attempt to write a readonly database".to_string(),
        }
    );
    assert!(!err.is_terminal());
    assert_eq!(
        view.canvas().node(DIET).unwrap().node.memo.as_deref(),
        Some("draft")
    );
    // The rest of the view is untouched.
    assert_eq!(view.canvas().nodes().len(), 3);
}

#[test]
fn test_actions_depend_on_kind() {
    let mut view = memory_view();
    view.render(RootSelector::All, RenderOptions::default())
        .unwrap();
    assert_eq!(view.available_actions(HEALTH).unwrap(), vec![NodeAction::Memo]);
    assert_eq!(
        view.available_actions(DIET).unwrap(),
        vec![
            NodeAction::Memo,
            NodeAction::CodedMedia,
            NodeAction::CaseMedia
        ]
    );
}

#[test]
fn test_reports() {
    let mut view = storage_view();
    view.render(RootSelector::All, RenderOptions::default())
        .unwrap();

    let report = view.coded_media_report(DIET).unwrap();
    assert_eq!(report.title, "Coded text : Diet");
    assert_eq!(report.blocks.len(), 4);
    assert_eq!(
        report.blocks[3],
        ReportBlock::Html("<p>more &lt;greens&gt; &amp; fruit</p>".to_string())
    );

    let cases = view.case_media_report(DIET).unwrap();
    assert_eq!(cases.title, "Coded media for cases: Diet");
    assert!(cases.blocks.is_empty());

    assert_eq!(
        view.coded_media_report(FOOD),
        Err(GraphError::NotACode(FOOD))
    );
}

#[test]
fn test_show_report_hands_off_to_viewer() {
    struct Collect(Vec<Report>);
    impl ReportViewer for Collect {
        fn show(&mut self, report: Report) {
            self.0.push(report);
        }
    }

    let view = storage_view();
    let mut viewer = Collect(Vec::new());
    // Works before any render by falling back to the stored name.
    view.show_report(DIET, ReportScope::Coded, &mut viewer)
        .unwrap();
    assert_eq!(viewer.0.len(), 1);
    assert_eq!(viewer.0[0].title, "Coded text : Diet");
}

#[test]
fn test_root_choices_and_resolution() {
    let view = storage_view();
    assert_eq!(view.root_choices().unwrap(), vec!["All", "Food", "Health"]);
    assert_eq!(view.resolve_root("All").unwrap(), Some(RootSelector::All));
    assert_eq!(
        view.resolve_root("Food").unwrap(),
        Some(RootSelector::Subtree(FOOD))
    );
    assert_eq!(
        view.resolve_root("Diet").unwrap(),
        Some(RootSelector::Subtree(DIET))
    );
    assert_eq!(view.resolve_root("Sleep").unwrap(), None);
}

#[test]
fn test_event_handling_round_trip() {
    let bus = EventBus::new();
    let mut view = memory_view().with_event_bus(bus.clone());

    bus.publish(Event::RenderRequested {
        root: None,
        monochrome: false,
        enlarge_category_font: false,
    });
    bus.publish(Event::NodeDragged {
        node: DIET,
        x: 10.0,
        y: 20.0,
    });
    bus.publish(Event::NodeMemoRequested { node: HEALTH });
    bus.dispatch_to(&mut view);

    assert_eq!(
        view.canvas().node(DIET).unwrap().position,
        Vec2::new(10.0, 20.0)
    );
    let prompt = view.take_memo_prompt().unwrap();
    assert_eq!(prompt.title, "Memo for Category Health");
    assert!(bus.drain().is_empty());

    view.store.fail_writes = true;
    bus.publish(Event::NodeMemoSubmitted {
        node: DIET,
        text: "draft".to_string(),
    });
    bus.publish(Event::NodeTextEdited {
        node: NodeKey::Code(CodeId(99)),
        text: "ghost".to_string(),
    });
    bus.dispatch_to(&mut view);

    assert_eq!(
        bus.drain(),
        vec![
            Event::MemoSaveFailed {
                node: DIET,
                reason: "attempt to write a readonly database".to_string(),
            },
            Event::ShowError {
                message: "Node code:99 is not on the canvas".to_string(),
            },
        ]
    );
}
