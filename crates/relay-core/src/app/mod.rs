//! App - テーブル構築とルーティング
//!
//! # 主要コンポーネント
//! - **TableBuilder**: 宣言の検証とディスパッチテーブルの構築
//! - **DispatchTable**: 三つの名前空間を持つ不変テーブル
//! - **Router**: 実行時の型によるディスパッチ
//! - **TableCache**: ターゲット型ごとのテーブル共有（任意）

pub mod builder;
pub mod cache;
pub mod router;
pub mod table;

// 主要な型を再エクスポート
pub use self::builder::TableBuilder;
pub use self::cache::TableCache;
pub use self::router::{Router, RouterBuilder};
pub use self::table::{DispatchTable, EntrySummary, HandlerEntry, TableSummary};
