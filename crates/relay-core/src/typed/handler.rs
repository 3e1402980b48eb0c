//! Handler - ターゲットのメソッドを型消去して保持する
//!
//! # 学習ポイント
//! - ジェネリック構造体 (TypedMethod<T, M, F, R>)
//! - Object-safe trait (DynMethod<T>)
//! - Type erasure パターン (TypedMethod → Arc<dyn DynMethod<T>>)
//! - `&dyn Any` からの downcast

use std::any::Any;
use std::marker::PhantomData;

use crate::domain::{HandlerError, TypeKey};

/// Return values a handler body may produce.
///
/// `()` for infallible handlers, `Result<(), E>` for fallible ones.
pub trait HandlerOutput {
    fn into_result(self) -> Result<(), HandlerError>;
}

impl HandlerOutput for () {
    fn into_result(self) -> Result<(), HandlerError> {
        Ok(())
    }
}

impl<E> HandlerOutput for Result<(), E>
where
    E: Into<HandlerError>,
{
    fn into_result(self) -> Result<(), HandlerError> {
        self.map_err(Into::into)
    }
}

/// DynMethod は object-safe なメソッド呼び出しの抽象化
///
/// `Arc<dyn DynMethod<T>>` としてディスパッチテーブルに格納されます。
/// `Send + Sync` なので、テーブルはスレッド間で共有できます。
pub trait DynMethod<T>: Send + Sync {
    fn invoke(&self, target: &mut T, message: &dyn Any) -> Result<(), HandlerError>;

    /// 宣言されたパラメータ型
    fn param(&self) -> TypeKey;
}

/// 具体型 `M` を受け取るメソッド
pub struct TypedMethod<T, M, F, R> {
    body: F,
    _marker: PhantomData<fn(&mut T, &M) -> R>,
}

impl<T, M, F, R> TypedMethod<T, M, F, R>
where
    F: Fn(&mut T, &M) -> R,
{
    pub fn new(body: F) -> Self {
        Self {
            body,
            _marker: PhantomData,
        }
    }
}

impl<T, M, F, R> DynMethod<T> for TypedMethod<T, M, F, R>
where
    M: Any,
    F: Fn(&mut T, &M) -> R + Send + Sync,
    R: HandlerOutput,
{
    fn invoke(&self, target: &mut T, message: &dyn Any) -> Result<(), HandlerError> {
        let message = message.downcast_ref::<M>().ok_or_else(|| {
            HandlerError::from(format!(
                "payload is not a `{}`",
                std::any::type_name::<M>()
            ))
        })?;
        (self.body)(target, message).into_result()
    }

    fn param(&self) -> TypeKey {
        TypeKey::of::<M>()
    }
}

/// トップ型 (`dyn Any`) を受け取るメソッド
///
/// 何でも受け取れるため、プレースホルダの解決先にはなりません。
pub struct ErasedMethod<T, F, R> {
    body: F,
    _marker: PhantomData<fn(&mut T, &dyn Any) -> R>,
}

impl<T, F, R> ErasedMethod<T, F, R>
where
    F: Fn(&mut T, &dyn Any) -> R,
{
    pub fn new(body: F) -> Self {
        Self {
            body,
            _marker: PhantomData,
        }
    }
}

impl<T, F, R> DynMethod<T> for ErasedMethod<T, F, R>
where
    F: Fn(&mut T, &dyn Any) -> R + Send + Sync,
    R: HandlerOutput,
{
    fn invoke(&self, target: &mut T, message: &dyn Any) -> Result<(), HandlerError> {
        (self.body)(target, message).into_result()
    }

    fn param(&self) -> TypeKey {
        TypeKey::top()
    }
}
