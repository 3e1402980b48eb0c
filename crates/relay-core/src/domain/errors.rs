//! Errors - 構築時エラーとルーティング時エラー
//!
//! # 分類
//! - **ConfigurationError**: テーブル構築時に検出される構造上の不整合（常に致命的）
//! - **RouteError**: 1 メッセージごとのエラー
//!
//! ハンドラが見つからないことはエラーではありません（`Ok(false)`）。

use thiserror::Error;

use super::role::Role;

/// Error produced by a handler body.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A target whose declarations cannot be turned into a dispatch table.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("method `{contract}::{method}` must have exactly one (1) parameter, found {found}")]
    MalformedContract {
        contract: String,
        method: String,
        found: usize,
    },

    #[error("unable to find target method on `{target}` for `{contract}::{method}({param})`")]
    UnresolvedHandler {
        target: &'static str,
        contract: String,
        method: String,
        param: String,
    },

    #[error("found multiple matching methods on `{target}` for `{contract}::{method}`: {candidates:?}")]
    AmbiguousHandler {
        target: &'static str,
        contract: String,
        method: String,
        candidates: Vec<String>,
    },

    #[error(
        "message type `{message_type}` already mapped as {existing} in target `{target}` (again via `{contract}::{method}` as {attempted}), can only be mapped once"
    )]
    DuplicateMapping {
        target: &'static str,
        message_type: &'static str,
        existing: Role,
        attempted: Role,
        contract: String,
        method: String,
    },
}

/// Failure while routing a single value.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("message cannot be absent")]
    InvalidArgument,

    #[error("handler `{method}` failed for message type `{message_type}`")]
    Delegation {
        method: String,
        message_type: &'static str,
        #[source]
        source: HandlerError,
    },
}
