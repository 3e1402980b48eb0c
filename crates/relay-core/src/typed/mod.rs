//! Typed - ターゲット宣言の型付き API
//!
//! リフレクションの代わりに、ターゲットは自分の契約と具体メソッドを
//! 明示的に登録します。照合ルール（名前・アリティ・型）は構築時に検査されます。
//!
//! # 二層構造
//! - **表層（Typed）**: `MessageTarget` trait, `MethodSet::on::<M>()` - 型安全
//! - **内部（Dyn）**: `DynMethod<T>` trait - object-safe, type erasure

pub mod handler;
pub mod predef;
pub mod target;

// 主要な trait/型 を再エクスポート
pub use self::handler::{DynMethod, HandlerOutput};
pub use self::target::{MessageTarget, MethodDecl, MethodSet};
