//! Type identifiers used as dispatch keys.

use std::any::{Any, TypeId};
use std::hash::{Hash, Hasher};

/// A stable type identifier paired with the type's name.
///
/// Equality and hashing look at the `TypeId` only; the name is carried for
/// error messages and summaries.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<M: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            name: std::any::type_name::<M>(),
        }
    }

    /// The universal top type (`dyn Any`).
    ///
    /// A method declared over the top type accepts anything, so it can never
    /// stand in for a placeholder parameter.
    pub fn top() -> Self {
        Self::of::<dyn Any>()
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_top(&self) -> bool {
        self.id == TypeId::of::<dyn Any>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for TypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Parameter of a contract method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// The contract names the exact type.
    Concrete(TypeKey),
    /// An unbound type parameter, resolved against the target's own methods.
    Placeholder(String),
}

impl ParamType {
    pub fn concrete<M: ?Sized + 'static>() -> Self {
        ParamType::Concrete(TypeKey::of::<M>())
    }

    pub fn placeholder(name: impl Into<String>) -> Self {
        ParamType::Placeholder(name.into())
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ParamType::Placeholder(_))
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamType::Concrete(key) => write!(f, "{key}"),
            ParamType::Placeholder(name) => write!(f, "<{name}>"),
        }
    }
}
