use super::*;

// Column layout matches the coding database written by the desktop app, so
// an existing project file can be opened directly.
const TABLE_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS code_cat (
        catid INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        owner TEXT,
        date TEXT,
        memo TEXT,
        supercatid INTEGER
    )",
    "CREATE TABLE IF NOT EXISTS code_name (
        cid INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        memo TEXT,
        owner TEXT,
        date TEXT,
        catid INTEGER,
        color TEXT
    )",
    "CREATE TABLE IF NOT EXISTS source (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        fulltext TEXT,
        mediapath TEXT,
        memo TEXT,
        owner TEXT,
        date TEXT
    )",
    "CREATE TABLE IF NOT EXISTS code_text (
        cid INTEGER NOT NULL,
        fid INTEGER NOT NULL,
        seltext TEXT,
        pos0 INTEGER,
        pos1 INTEGER,
        owner TEXT,
        date TEXT,
        memo TEXT
    )",
    "CREATE TABLE IF NOT EXISTS code_image (
        imid INTEGER PRIMARY KEY,
        id INTEGER NOT NULL,
        x1 REAL,
        y1 REAL,
        width REAL,
        height REAL,
        memo TEXT,
        date TEXT,
        owner TEXT,
        cid INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS code_av (
        avid INTEGER PRIMARY KEY,
        id INTEGER NOT NULL,
        pos0 INTEGER,
        pos1 INTEGER,
        cid INTEGER NOT NULL,
        memo TEXT,
        date TEXT,
        owner TEXT
    )",
    "CREATE TABLE IF NOT EXISTS cases (
        caseid INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        memo TEXT,
        owner TEXT,
        date TEXT
    )",
    "CREATE TABLE IF NOT EXISTS case_text (
        id INTEGER PRIMARY KEY,
        caseid INTEGER NOT NULL,
        fid INTEGER NOT NULL,
        pos0 INTEGER,
        pos1 INTEGER,
        owner TEXT,
        date TEXT,
        memo TEXT
    )",
];

const INDEX_STATEMENTS: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_code_text_cid ON code_text(cid)",
    "CREATE INDEX IF NOT EXISTS idx_code_image_cid ON code_image(cid)",
    "CREATE INDEX IF NOT EXISTS idx_code_av_cid ON code_av(cid)",
    "CREATE INDEX IF NOT EXISTS idx_case_text_fid ON case_text(fid)",
];

pub(super) fn create_tables(conn: &Connection) -> Result<(), StorageError> {
    for statement in TABLE_STATEMENTS {
        conn.execute(statement, [])?;
    }
    Ok(())
}

pub(super) fn create_indexes(conn: &Connection) -> Result<(), StorageError> {
    for statement in INDEX_STATEMENTS {
        conn.execute(statement, [])?;
    }
    Ok(())
}
