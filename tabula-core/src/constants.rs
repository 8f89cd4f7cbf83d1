/// Tabula system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Schema version stamped into header-cache entries. Entries written under
/// a different version are invalid regardless of content hash.
pub const HEADER_SCHEMA_VERSION: u32 = 1;

/// Chunk size for streaming file digests.
pub const DIGEST_CHUNK_SIZE: usize = 8192;

/// File extensions recognized as spreadsheet sources.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// Prefix applied to every generated backing table name.
pub const TABLE_NAME_PREFIX: &str = "table";

/// Separator between the statements of a batch.
pub const STATEMENT_SEPARATOR: char = ';';
