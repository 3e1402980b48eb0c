//! DelegatingActor port - ホスト側の「未処理」経路
//!
//! ホストはメッセージを Router に渡し、どのハンドラにも一致しなかった場合に
//! `unhandled` を呼びます（`Router::on_receive`）。

use std::any::Any;

use tracing::debug;

use crate::typed::MessageTarget;

/// A target that has somewhere to send values no handler claimed.
pub trait DelegatingActor: MessageTarget {
    /// Called with every value that matched no handler.
    ///
    /// The default only logs it.
    fn unhandled(&mut self, _message: &dyn Any) {
        debug!(
            target_type = std::any::type_name::<Self>(),
            "unhandled message of unnamed runtime type"
        );
    }
}
