//! 领域层统一错误定义
//!
//! 聚焦序列化、Outbox 存储、事件分发、仓储与事务边界等最小必要集合，
//! 便于在各实现层统一转换为 `DomainError`。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 序列化/事件重建 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("parse error: {reason}")]
    Parse { reason: String },
    #[error("invalid event payload: {reason}")]
    InvalidEvent { reason: String },

    // --- Outbox ---
    #[error("outbox store error: {reason}")]
    OutboxStore { reason: String },
    #[error("outbox message not found: {id}")]
    MessageNotFound { id: String },
    #[error("duplicate outbox message: {id}")]
    DuplicateMessage { id: String },

    // --- 事件分发 ---
    #[error("event handler error: handler={handler}, reason={reason}")]
    EventHandler { handler: String, reason: String },

    // --- 仓储/事务 ---
    #[error("repository error: {reason}")]
    Repository { reason: String },
    #[error("transaction error: {reason}")]
    Transaction { reason: String },
    #[error("no active transaction")]
    NoActiveTransaction,
    #[error("transaction already active")]
    TransactionAlreadyActive,

    // --- 领域规则/状态 ---
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },
    #[error("not found: {reason}")]
    NotFound { reason: String },
    #[error("already exists: {reason}")]
    AlreadyExists { reason: String },
}

impl DomainError {
    pub fn outbox_store(reason: impl Into<String>) -> Self {
        Self::OutboxStore {
            reason: reason.into(),
        }
    }

    pub fn transaction(reason: impl Into<String>) -> Self {
        Self::Transaction {
            reason: reason.into(),
        }
    }

    pub fn invalid_event(reason: impl Into<String>) -> Self {
        Self::InvalidEvent {
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

// ---- Cross-crate conversions for infrastructure convenience ----
// 允许在基础设施层直接使用 `?` 将 uuid/chrono 等错误转换为 DomainError

impl From<uuid::Error> for DomainError {
    fn from(err: uuid::Error) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

impl From<chrono::ParseError> for DomainError {
    fn from(err: chrono::ParseError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}
