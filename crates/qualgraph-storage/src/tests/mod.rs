use super::*;
use tempfile::tempdir;

fn category(id: i64, name: &str, parent: Option<i64>) -> CategoryRecord {
    CategoryRecord {
        id: CategoryId(id),
        name: name.to_string(),
        parent: parent.map(CategoryId),
        owner: "default".to_string(),
        date: "2024-03-01 10:00:00".to_string(),
        ..Default::default()
    }
}

fn code(id: i64, name: &str, category: Option<i64>, color: &str) -> CodeRecord {
    CodeRecord {
        id: CodeId(id),
        name: name.to_string(),
        category: category.map(CategoryId),
        color: Some(color.to_string()),
        owner: "default".to_string(),
        ..Default::default()
    }
}

/// Health > Food > Diet, plus Exercise under Health, with codings in three
/// files and one case.
fn seeded() -> Result<Storage, StorageError> {
    let storage = Storage::new_in_memory()?;
    storage.insert_category(&category(1, "Health", None))?;
    storage.insert_category(&category(2, "Food", Some(1)))?;
    storage.insert_code(&code(10, "Diet", Some(2), "#FF0000"))?;
    storage.insert_code(&code(11, "Exercise", Some(1), "#00FF00"))?;

    storage.insert_source(&SourceFile {
        id: 1,
        name: "interview_b.txt".to_string(),
        media_path: None,
    })?;
    storage.insert_source(&SourceFile {
        id: 2,
        name: "interview_a.txt".to_string(),
        media_path: None,
    })?;
    storage.insert_source(&SourceFile {
        id: 3,
        name: "plate.png".to_string(),
        media_path: Some("/images/plate.png".to_string()),
    })?;
    storage.insert_source(&SourceFile {
        id: 4,
        name: "focus_group.mp3".to_string(),
        media_path: Some("/audio/focus_group.mp3".to_string()),
    })?;

    for (file, text, pos0, owner) in [
        (1, "less sugar", 40, "jo"),
        (1, "no snacks", 10, "jo"),
        (2, "fasting", 5, "sam"),
    ] {
        storage.insert_text_coding(&TextCoding {
            code: CodeId(10),
            file,
            text: text.to_string(),
            pos0,
            pos1: pos0 + text.len() as i64,
            owner: owner.to_string(),
        })?;
    }
    storage.insert_image_coding(&ImageCoding {
        code: CodeId(10),
        file: 3,
        region: ImageRegion {
            x1: 10.0,
            y1: 20.0,
            width: 600.0,
            height: 400.0,
        },
        owner: "jo".to_string(),
        memo: Some("vegetables".to_string()),
    })?;
    storage.insert_av_coding(&AvCoding {
        code: CodeId(10),
        file: 4,
        start_ms: 61_500,
        end_ms: 75_000,
        owner: "sam".to_string(),
        memo: None,
    })?;

    storage.insert_case(1, "Participant 7")?;
    storage.insert_case_span(&CaseSpan {
        case_id: 1,
        file: 1,
        pos0: 0,
        pos1: 30,
        owner: "jo".to_string(),
    })?;
    storage.insert_case_span(&CaseSpan {
        case_id: 1,
        file: 3,
        pos0: 0,
        pos1: 0,
        owner: "jo".to_string(),
    })?;
    Ok(storage)
}

#[test]
fn test_tables_are_created() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    let mut stmt = storage
        .conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    assert_eq!(
        tables,
        vec![
            "case_text",
            "cases",
            "code_av",
            "code_cat",
            "code_image",
            "code_name",
            "code_text",
            "source"
        ]
    );
    Ok(())
}

#[test]
fn test_categories_are_ordered_by_name() -> Result<(), StorageError> {
    let storage = seeded()?;
    let categories = storage.get_categories()?;
    let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Food", "Health"]);
    assert_eq!(categories[0].parent, Some(CategoryId(1)));
    assert_eq!(categories[1].parent, None);
    assert_eq!(categories[1].date, "2024-03-01 10:00:00");
    Ok(())
}

#[test]
fn test_codes_keep_category_and_color() -> Result<(), StorageError> {
    let storage = seeded()?;
    let codes = storage.get_codes()?;
    assert_eq!(codes.len(), 2);
    assert_eq!(codes[0].id, CodeId(10));
    assert_eq!(codes[0].category, Some(CategoryId(2)));
    assert_eq!(codes[0].color.as_deref(), Some("#FF0000"));
    assert_eq!(codes[1].category, Some(CategoryId(1)));
    Ok(())
}

#[test]
fn test_null_owner_and_date_read_as_empty() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    storage
        .conn
        .execute("INSERT INTO code_cat (catid, name) VALUES (5, 'Loose')", [])?;
    let categories = storage.get_categories()?;
    assert_eq!(categories[0].owner, "");
    assert_eq!(categories[0].date, "");
    assert_eq!(categories[0].memo, None);
    Ok(())
}

#[test]
fn test_memo_update_targets_the_right_table() -> Result<(), Box<dyn std::error::Error>> {
    let mut storage = seeded()?;
    storage.update_memo(NodeKey::Code(CodeId(10)), "eating habits")?;
    storage.set_memo(NodeKey::Category(CategoryId(2)), "all food talk")?;

    let codes = storage.get_codes()?;
    assert_eq!(codes[0].memo.as_deref(), Some("eating habits"));
    assert_eq!(codes[1].memo, None);
    let categories = storage.get_categories()?;
    assert_eq!(categories[0].memo.as_deref(), Some("all food talk"));
    assert_eq!(categories[1].memo, None);
    Ok(())
}

#[test]
fn test_memo_update_for_missing_row_fails() -> Result<(), StorageError> {
    let storage = seeded()?;
    let missing = NodeKey::Category(CategoryId(99));
    let result = storage.set_memo(missing, "lost");
    assert!(matches!(result, Err(StorageError::NotFound(key)) if key == missing));

    let store_error: StoreError = StorageError::NotFound(missing).into();
    assert_eq!(store_error.0, "No row for category:99");
    Ok(())
}

#[test]
fn test_coded_excerpts_in_query_order() -> Result<(), StorageError> {
    let storage = seeded()?;
    let excerpts = storage.get_coded_excerpts(CodeId(10))?;
    assert_eq!(excerpts.len(), 5);

    let texts: Vec<_> = excerpts
        .iter()
        .filter_map(|e| match e {
            Excerpt::Text(t) => Some((t.source_name.as_str(), t.text.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(
        texts,
        vec![
            ("interview_a.txt", "fasting"),
            ("interview_b.txt", "no snacks"),
            ("interview_b.txt", "less sugar"),
        ]
    );

    match &excerpts[3] {
        Excerpt::Image(image) => {
            assert_eq!(image.media_path, "/images/plate.png");
            assert_eq!(image.region.width, 600.0);
            assert_eq!(image.memo.as_deref(), Some("vegetables"));
            assert_eq!(image.case_name, None);
        }
        other => panic!("expected image excerpt, got {other:?}"),
    }
    match &excerpts[4] {
        Excerpt::Media(media) => {
            assert_eq!(media.start_ms, 61_500);
            assert_eq!(media.end_ms, 75_000);
            assert_eq!(media.owner, "sam");
        }
        other => panic!("expected media excerpt, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_case_excerpts_require_containment() -> Result<(), StorageError> {
    let storage = seeded()?;
    let excerpts = storage.get_case_excerpts(CodeId(10))?;

    // "no snacks" (10..19) lies inside the case span 0..30; "less sugar"
    // (40..50) does not. The image file is assigned whole, the audio file
    // is not assigned at all.
    assert_eq!(excerpts.len(), 2);
    match &excerpts[0] {
        Excerpt::Text(text) => {
            assert_eq!(text.text, "no snacks");
            assert_eq!(text.case_name.as_deref(), Some("Participant 7"));
        }
        other => panic!("expected text excerpt, got {other:?}"),
    }
    assert!(matches!(
        &excerpts[1],
        Excerpt::Image(image) if image.case_name.as_deref() == Some("Participant 7")
    ));
    Ok(())
}

#[test]
fn test_code_without_codings_has_no_excerpts() -> Result<(), StorageError> {
    let storage = seeded()?;
    assert!(storage.get_coded_excerpts(CodeId(11))?.is_empty());
    assert!(storage.get_case_excerpts(CodeId(11))?.is_empty());
    Ok(())
}

#[test]
fn test_store_trait_reads_through() -> Result<(), Box<dyn std::error::Error>> {
    let storage = seeded()?;
    let store: &dyn CodingStore = &storage;
    assert_eq!(store.list_categories()?.len(), 2);
    assert_eq!(store.list_codes()?.len(), 2);
    assert_eq!(store.fetch_excerpts(CodeId(10))?.len(), 5);
    assert_eq!(store.fetch_case_excerpts(CodeId(10))?.len(), 2);
    Ok(())
}

#[test]
fn test_project_file_reopens_with_data() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("project.qda");
    {
        let storage = Storage::create(&path)?;
        storage.insert_category(&category(1, "Health", None))?;
        storage.set_memo(NodeKey::Category(CategoryId(1)), "top level")?;
    }
    let storage = Storage::open(&path)?;
    let categories = storage.get_categories()?;
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].memo.as_deref(), Some("top level"));
    Ok(())
}

#[test]
fn test_open_missing_project_fails_without_creating_it() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("typo_project.qda");
    let result = Storage::open(&path);
    assert!(matches!(result, Err(StorageError::Sqlite(_))));
    assert!(!path.exists());
    Ok(())
}

#[test]
fn test_open_leaves_existing_project_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("project.qda");
    {
        let conn = rusqlite::Connection::open(&path)?;
        conn.execute_batch("CREATE TABLE code_cat (catid INTEGER PRIMARY KEY, name TEXT);")?;
    }
    let storage = Storage::open(&path)?;
    let mode: String = storage
        .conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
    assert_eq!(mode, "delete");
    let tables: i64 = storage.conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
        [],
        |row| row.get(0),
    )?;
    assert_eq!(tables, 1);
    Ok(())
}

#[test]
fn test_case_media_ordered_by_file_then_coder() -> Result<(), StorageError> {
    let storage = seeded()?;
    storage.insert_source(&SourceFile {
        id: 5,
        name: "a_walk.mp4".to_string(),
        media_path: Some("/video/a_walk.mp4".to_string()),
    })?;
    storage.insert_av_coding(&AvCoding {
        code: CodeId(10),
        file: 5,
        start_ms: 0,
        end_ms: 1_000,
        owner: "jo".to_string(),
        memo: None,
    })?;
    storage.insert_case(2, "Anna")?;
    for (case_id, file) in [(2, 4), (1, 5)] {
        storage.insert_case_span(&CaseSpan {
            case_id,
            file,
            pos0: 0,
            pos1: 0,
            owner: "jo".to_string(),
        })?;
    }

    let media: Vec<_> = storage
        .get_case_excerpts(CodeId(10))?
        .into_iter()
        .filter_map(|e| match e {
            Excerpt::Media(m) => Some((m.source_name, m.case_name, m.owner)),
            _ => None,
        })
        .collect();
    // "Participant 7" sorts after "Anna", but its file sorts first.
    assert_eq!(
        media,
        vec![
            (
                "a_walk.mp4".to_string(),
                Some("Participant 7".to_string()),
                "jo".to_string()
            ),
            (
                "focus_group.mp3".to_string(),
                Some("Anna".to_string()),
                "sam".to_string()
            ),
        ]
    );
    Ok(())
}
