//! relay-core
//!
//! Typed dispatch tables for message-handling objects.
//!
//! A target declares role-tagged capability contracts and the concrete
//! methods that implement them. A [`Router`] builds one immutable table per
//! target type (validating every declaration up front) and then routes
//! values of unknown runtime type to the single method declared for that
//! exact type.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（Role, TypeKey, Contract, errors）
//! - **typed**: 型付き宣言 API（MessageTarget, MethodSet, predef）
//! - **ports**: ホストとの境界（DelegatingActor）
//! - **app**: テーブル構築とルーティング（TableBuilder, DispatchTable, Router, TableCache）

pub mod app;
pub mod domain;
pub mod ports;
pub mod typed;

pub use app::{DispatchTable, Router, RouterBuilder, TableCache};
pub use domain::{ConfigurationError, Contract, HandlerError, ParamType, Role, RouteError, TypeKey};
pub use ports::DelegatingActor;
pub use typed::{MessageTarget, MethodSet, predef};
