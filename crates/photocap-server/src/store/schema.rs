//! `SQLite` schema definitions for the image collection.

/// SQL statement to create the images table.
pub const CREATE_IMAGES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS images (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    data TEXT NOT NULL,
    timestamp TEXT NOT NULL
)
";

/// SQL statement to create an index on timestamp for diagnostics queries.
pub const CREATE_TIMESTAMP_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_images_timestamp ON images(timestamp DESC)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_IMAGES_TABLE, CREATE_TIMESTAMP_INDEX];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_images_table_contains_required_columns() {
        assert!(CREATE_IMAGES_TABLE.contains("id INTEGER PRIMARY KEY"));
        assert!(CREATE_IMAGES_TABLE.contains("data TEXT NOT NULL"));
        assert!(CREATE_IMAGES_TABLE.contains("timestamp TEXT NOT NULL"));
    }
}
