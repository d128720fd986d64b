use super::*;

pub(super) fn category_from_row(row: &Row) -> rusqlite::Result<CategoryRecord> {
    Ok(CategoryRecord {
        id: CategoryId(row.get(0)?),
        name: row.get(1)?,
        parent: row.get::<_, Option<i64>>(2)?.map(CategoryId),
        memo: row.get(3)?,
        owner: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        date: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
    })
}

pub(super) fn code_from_row(row: &Row) -> rusqlite::Result<CodeRecord> {
    Ok(CodeRecord {
        id: CodeId(row.get(0)?),
        name: row.get(1)?,
        category: row.get::<_, Option<i64>>(2)?.map(CategoryId),
        color: row.get(3)?,
        memo: row.get(4)?,
        owner: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        date: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
    })
}

/// Columns: code name, color, case name, source name, pos0, pos1, text, owner.
pub(super) fn text_excerpt_from_row(row: &Row) -> rusqlite::Result<Excerpt> {
    Ok(Excerpt::Text(TextExcerpt {
        code_name: row.get(0)?,
        color: row.get(1)?,
        case_name: row.get(2)?,
        source_name: row.get(3)?,
        pos0: row.get::<_, Option<i64>>(4)?.unwrap_or_default(),
        pos1: row.get::<_, Option<i64>>(5)?.unwrap_or_default(),
        text: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        owner: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
    }))
}

/// Columns: code name, color, case name, source name, x1, y1, width,
/// height, owner, media path, memo.
pub(super) fn image_excerpt_from_row(row: &Row) -> rusqlite::Result<Excerpt> {
    Ok(Excerpt::Image(ImageExcerpt {
        code_name: row.get(0)?,
        color: row.get(1)?,
        case_name: row.get(2)?,
        source_name: row.get(3)?,
        region: ImageRegion {
            x1: row.get::<_, Option<f64>>(4)?.unwrap_or_default(),
            y1: row.get::<_, Option<f64>>(5)?.unwrap_or_default(),
            width: row.get::<_, Option<f64>>(6)?.unwrap_or_default(),
            height: row.get::<_, Option<f64>>(7)?.unwrap_or_default(),
        },
        owner: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        media_path: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        memo: row.get(10)?,
    }))
}

/// Columns: code name, color, case name, source name, pos0, pos1, memo,
/// owner, media path.
pub(super) fn media_excerpt_from_row(row: &Row) -> rusqlite::Result<Excerpt> {
    Ok(Excerpt::Media(MediaExcerpt {
        code_name: row.get(0)?,
        color: row.get(1)?,
        case_name: row.get(2)?,
        source_name: row.get(3)?,
        start_ms: row.get::<_, Option<i64>>(4)?.unwrap_or_default(),
        end_ms: row.get::<_, Option<i64>>(5)?.unwrap_or_default(),
        memo: row.get(6)?,
        owner: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        media_path: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
    }))
}
