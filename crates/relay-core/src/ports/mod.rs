//! Ports - ホストランタイムとの境界
//!
//! # 主要な trait
//! - **DelegatingActor**: 一致しなかったメッセージの受け口

pub mod delegating_actor;

pub use self::delegating_actor::DelegatingActor;
