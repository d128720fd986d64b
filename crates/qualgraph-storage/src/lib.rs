use qualgraph_core::{
    CategoryId, CategoryRecord, CodeId, CodeRecord, CodingStore, Excerpt, ImageExcerpt,
    ImageRegion, MediaExcerpt, NodeKey, StoreError, TextExcerpt,
};
use rusqlite::{Connection, OpenFlags, Result, Row, params};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

mod row_mapping;
mod schema;

const CODED_TEXT_QUERY: &str = "SELECT code_name.name, code_name.color, NULL, source.name,
        code_text.pos0, code_text.pos1, code_text.seltext, code_text.owner
    FROM code_text
    JOIN code_name ON code_name.cid = code_text.cid
    JOIN source ON source.id = code_text.fid
    WHERE code_name.cid = ?1
    ORDER BY source.name, code_text.pos0, code_text.owner";

const CODED_IMAGE_QUERY: &str = "SELECT code_name.name, code_name.color, NULL, source.name,
        code_image.x1, code_image.y1, code_image.width, code_image.height,
        code_image.owner, source.mediapath, code_image.memo
    FROM code_image
    JOIN code_name ON code_name.cid = code_image.cid
    JOIN source ON source.id = code_image.id
    WHERE code_name.cid = ?1
    ORDER BY source.name, code_image.owner";

const CODED_AV_QUERY: &str = "SELECT code_name.name, code_name.color, NULL, source.name,
        code_av.pos0, code_av.pos1, code_av.memo, code_av.owner, source.mediapath
    FROM code_av
    JOIN code_name ON code_name.cid = code_av.cid
    JOIN source ON source.id = code_av.id
    WHERE code_name.cid = ?1
    ORDER BY source.name, code_av.owner";

// Text codings count for a case only when they sit wholly inside the case span.
const CASE_TEXT_QUERY: &str = "SELECT code_name.name, code_name.color, cases.name, source.name,
        code_text.pos0, code_text.pos1, code_text.seltext, code_text.owner
    FROM code_text
    JOIN code_name ON code_name.cid = code_text.cid
    JOIN case_text ON case_text.fid = code_text.fid
        AND code_text.pos0 >= case_text.pos0
        AND code_text.pos1 <= case_text.pos1
    JOIN cases ON cases.caseid = case_text.caseid
    JOIN source ON source.id = code_text.fid
    WHERE code_name.cid = ?1
    ORDER BY cases.name, code_text.pos0, code_text.owner";

// Image and A/V files are assigned to cases whole.
const CASE_IMAGE_QUERY: &str = "SELECT code_name.name, code_name.color, cases.name, source.name,
        code_image.x1, code_image.y1, code_image.width, code_image.height,
        code_image.owner, source.mediapath, code_image.memo
    FROM code_image
    JOIN code_name ON code_name.cid = code_image.cid
    JOIN case_text ON case_text.fid = code_image.id
    JOIN cases ON cases.caseid = case_text.caseid
    JOIN source ON source.id = code_image.id
    WHERE code_name.cid = ?1
    ORDER BY cases.name, code_image.owner";

const CASE_AV_QUERY: &str = "SELECT code_name.name, code_name.color, cases.name, source.name,
        code_av.pos0, code_av.pos1, code_av.memo, code_av.owner, source.mediapath
    FROM code_av
    JOIN code_name ON code_name.cid = code_av.cid
    JOIN case_text ON case_text.fid = code_av.id
    JOIN cases ON cases.caseid = case_text.caseid
    JOIN source ON source.id = code_av.id
    WHERE code_name.cid = ?1
    ORDER BY source.name, code_av.owner";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("No row for {0}")]
    NotFound(NodeKey),
}

impl From<StorageError> for StoreError {
    fn from(error: StorageError) -> Self {
        StoreError::new(error.to_string())
    }
}

/// A source file row: text document, image, or audio/video file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFile {
    pub id: i64,
    pub name: String,
    pub media_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextCoding {
    pub code: CodeId,
    pub file: i64,
    pub text: String,
    pub pos0: i64,
    pub pos1: i64,
    pub owner: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageCoding {
    pub code: CodeId,
    pub file: i64,
    pub region: ImageRegion,
    pub owner: String,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvCoding {
    pub code: CodeId,
    pub file: i64,
    pub start_ms: i64,
    pub end_ms: i64,
    pub owner: String,
    pub memo: Option<String>,
}

/// The span of a file assigned to a case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseSpan {
    pub case_id: i64,
    pub file: i64,
    pub pos0: i64,
    pub pos1: i64,
    pub owner: String,
}

pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open an existing project database. A missing file is an error; the
    /// schema and journal mode are left as the desktop app wrote them.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        // The desktop app may hold the project open at the same time.
        let _ = conn.busy_timeout(Duration::from_millis(2_500));
        Ok(Self { conn })
    }

    /// Create a new project database at `path` with empty tables.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.init()?;
        Ok(storage)
    }

    pub fn new_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.init()?;
        Ok(storage)
    }

    fn init(&self) -> Result<(), StorageError> {
        schema::create_tables(&self.conn)?;
        schema::create_indexes(&self.conn)
    }

    pub fn insert_category(&self, category: &CategoryRecord) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO code_cat (catid, name, owner, date, memo, supercatid)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                category.id.0,
                category.name,
                category.owner,
                category.date,
                category.memo,
                category.parent.map(|p| p.0),
            ],
        )?;
        Ok(())
    }

    pub fn insert_code(&self, code: &CodeRecord) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO code_name (cid, name, memo, owner, date, catid, color)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                code.id.0,
                code.name,
                code.memo,
                code.owner,
                code.date,
                code.category.map(|c| c.0),
                code.color,
            ],
        )?;
        Ok(())
    }

    pub fn insert_source(&self, source: &SourceFile) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO source (id, name, mediapath) VALUES (?1, ?2, ?3)",
            params![source.id, source.name, source.media_path],
        )?;
        Ok(())
    }

    pub fn insert_text_coding(&self, coding: &TextCoding) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO code_text (cid, fid, seltext, pos0, pos1, owner)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                coding.code.0,
                coding.file,
                coding.text,
                coding.pos0,
                coding.pos1,
                coding.owner,
            ],
        )?;
        Ok(())
    }

    pub fn insert_image_coding(&self, coding: &ImageCoding) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO code_image (id, x1, y1, width, height, memo, owner, cid)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                coding.file,
                coding.region.x1,
                coding.region.y1,
                coding.region.width,
                coding.region.height,
                coding.memo,
                coding.owner,
                coding.code.0,
            ],
        )?;
        Ok(())
    }

    pub fn insert_av_coding(&self, coding: &AvCoding) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO code_av (id, pos0, pos1, cid, memo, owner)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                coding.file,
                coding.start_ms,
                coding.end_ms,
                coding.code.0,
                coding.memo,
                coding.owner,
            ],
        )?;
        Ok(())
    }

    pub fn insert_case(&self, id: i64, name: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO cases (caseid, name) VALUES (?1, ?2)",
            params![id, name],
        )?;
        Ok(())
    }

    pub fn insert_case_span(&self, span: &CaseSpan) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO case_text (caseid, fid, pos0, pos1, owner)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![span.case_id, span.file, span.pos0, span.pos1, span.owner],
        )?;
        Ok(())
    }

    pub fn get_categories(&self) -> Result<Vec<CategoryRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT catid, name, supercatid, memo, owner, date FROM code_cat ORDER BY name",
        )?;
        let rows = stmt.query_map([], row_mapping::category_from_row)?;
        let categories = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    pub fn get_codes(&self) -> Result<Vec<CodeRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT cid, name, catid, color, memo, owner, date FROM code_name ORDER BY cid",
        )?;
        let rows = stmt.query_map([], row_mapping::code_from_row)?;
        let codes = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(codes)
    }

    pub fn set_memo(&self, node: NodeKey, text: &str) -> Result<(), StorageError> {
        let updated = match node {
            NodeKey::Category(id) => self.conn.execute(
                "UPDATE code_cat SET memo = ?1 WHERE catid = ?2",
                params![text, id.0],
            )?,
            NodeKey::Code(id) => self.conn.execute(
                "UPDATE code_name SET memo = ?1 WHERE cid = ?2",
                params![text, id.0],
            )?,
        };
        if updated == 0 {
            return Err(StorageError::NotFound(node));
        }
        tracing::debug!("Memo updated for {}", node);
        Ok(())
    }

    pub fn get_coded_excerpts(&self, code: CodeId) -> Result<Vec<Excerpt>, StorageError> {
        self.collect_excerpts(code, [CODED_TEXT_QUERY, CODED_IMAGE_QUERY, CODED_AV_QUERY])
    }

    pub fn get_case_excerpts(&self, code: CodeId) -> Result<Vec<Excerpt>, StorageError> {
        self.collect_excerpts(code, [CASE_TEXT_QUERY, CASE_IMAGE_QUERY, CASE_AV_QUERY])
    }

    /// Runs the text, image and A/V queries in that order and concatenates.
    fn collect_excerpts(&self, code: CodeId, queries: [&str; 3]) -> Result<Vec<Excerpt>, StorageError> {
        let [text, image, av] = queries;
        let mut excerpts = Vec::new();
        excerpts.extend(self.query_excerpts(text, code, row_mapping::text_excerpt_from_row)?);
        excerpts.extend(self.query_excerpts(image, code, row_mapping::image_excerpt_from_row)?);
        excerpts.extend(self.query_excerpts(av, code, row_mapping::media_excerpt_from_row)?);
        Ok(excerpts)
    }

    fn query_excerpts(
        &self,
        sql: &str,
        code: CodeId,
        map: fn(&Row) -> rusqlite::Result<Excerpt>,
    ) -> Result<Vec<Excerpt>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params![code.0])?;
        let mut excerpts = Vec::new();
        while let Some(row) = rows.next()? {
            excerpts.push(map(row)?);
        }
        Ok(excerpts)
    }
}

impl CodingStore for Storage {
    fn list_categories(&self) -> Result<Vec<CategoryRecord>, StoreError> {
        Ok(self.get_categories()?)
    }

    fn list_codes(&self) -> Result<Vec<CodeRecord>, StoreError> {
        Ok(self.get_codes()?)
    }

    fn update_memo(&mut self, node: NodeKey, text: &str) -> Result<(), StoreError> {
        Ok(self.set_memo(node, text)?)
    }

    fn fetch_excerpts(&self, code: CodeId) -> Result<Vec<Excerpt>, StoreError> {
        Ok(self.get_coded_excerpts(code)?)
    }

    fn fetch_case_excerpts(&self, code: CodeId) -> Result<Vec<Excerpt>, StoreError> {
        Ok(self.get_case_excerpts(code)?)
    }
}

#[cfg(test)]
mod tests;
