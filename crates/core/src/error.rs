use hms_types::RecordId;
use hms_wire::RecordKind;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read collection file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write collection file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize records: {0}")]
    Serialization(serde_json::Error),

    #[error("payload error: {0}")]
    Wire(#[from] hms_wire::WireError),

    #[error("{kind} record {id} not found")]
    NotFound { kind: RecordKind, id: RecordId },
    #[error("{kind} record {id} already exists")]
    DuplicateId { kind: RecordKind, id: RecordId },
}

pub type DashboardResult<T> = std::result::Result<T, DashboardError>;
