use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TableSortError {
    #[error("failed to read HTML at byte {position}: {reason}")]
    Html { position: u64, reason: String },

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("no sortable table '{0}' in document")]
    TableNotFound(String),

    #[error("column {column} is out of range for {table} ({columns} column(s))")]
    ColumnOutOfRange {
        table: String,
        column: usize,
        columns: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
