//! MessageTarget trait - ターゲットが自分の契約とメソッドを宣言する
//!
//! # 学習ポイント
//! - 関連関数だけを持つ trait（インスタンスなしで宣言を取り出せる）
//! - Generic methods での登録と型安全性
//! - `Arc<dyn DynMethod<T>>` による型消去

use std::any::Any;
use std::sync::Arc;

use super::handler::{DynMethod, ErasedMethod, HandlerOutput, TypedMethod};
use crate::domain::{Contract, TypeKey};

/// A type whose values can sit behind a [`Router`](crate::app::Router).
///
/// # 使用例
/// ```ignore
/// struct Boss { log: Vec<String> }
///
/// impl MessageTarget for Boss {
///     fn contracts() -> Vec<Contract> {
///         vec![predef::requests1(), predef::responses1()]
///     }
///
///     fn methods(methods: &mut MethodSet<Self>) {
///         methods
///             .on("on_request", |boss: &mut Boss, req: &Work| boss.log.push(req.0.clone()))
///             .on("on_response", |boss: &mut Boss, res: &Done| boss.log.push(res.0.clone()));
///     }
/// }
/// ```
///
/// Both functions describe the type, not an instance: they are called once
/// per table build and must return the same declarations every time.
pub trait MessageTarget: Sized + 'static {
    /// Contracts this type directly declares.
    fn contracts() -> Vec<Contract>;

    /// Concrete methods the contracts resolve against.
    fn methods(methods: &mut MethodSet<Self>);
}

/// A concrete method declared by a target.
pub struct MethodDecl<T> {
    name: String,
    method: Arc<dyn DynMethod<T>>,
}

impl<T> MethodDecl<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param(&self) -> TypeKey {
        self.method.param()
    }

    pub(crate) fn method(&self) -> Arc<dyn DynMethod<T>> {
        Arc::clone(&self.method)
    }

    /// `name(param)`, used in diagnostics.
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.param())
    }
}

/// The set of concrete methods a target declares.
///
/// Several methods may share a name as long as their parameter types differ
/// (overloads); resolution tells them apart by type.
pub struct MethodSet<T> {
    methods: Vec<MethodDecl<T>>,
}

impl<T: 'static> MethodSet<T> {
    pub fn new() -> Self {
        Self {
            methods: Vec::new(),
        }
    }

    /// Declare `name(&M)`.
    pub fn on<M, F, R>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        M: Any,
        F: Fn(&mut T, &M) -> R + Send + Sync + 'static,
        R: HandlerOutput + 'static,
    {
        self.push(name, Arc::new(TypedMethod::<T, M, F, R>::new(body)))
    }

    /// Declare `name(&dyn Any)`, a method over the top type.
    pub fn on_any<F, R>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn(&mut T, &dyn Any) -> R + Send + Sync + 'static,
        R: HandlerOutput + 'static,
    {
        self.push(name, Arc::new(ErasedMethod::<T, F, R>::new(body)))
    }

    fn push(&mut self, name: impl Into<String>, method: Arc<dyn DynMethod<T>>) -> &mut Self {
        self.methods.push(MethodDecl {
            name: name.into(),
            method,
        });
        self
    }

    /// Methods declared under `name`, in declaration order.
    pub fn named<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a MethodDecl<T>> {
        self.methods.iter().filter(move |decl| decl.name == name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<T: 'static> Default for MethodSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: MessageTarget> MethodSet<T> {
    /// Collect everything `T` declares.
    pub fn of() -> Self {
        let mut methods = Self::new();
        T::methods(&mut methods);
        methods
    }
}
