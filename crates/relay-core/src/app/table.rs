//! DispatchTable - 三つの名前空間を持つ不変のディスパッチテーブル
//!
//! # 設計
//! - 構築時（TableBuilder）にのみ変更される
//! - 構築後は読み取り専用なので、ロックなしで複数スレッドから参照できる
//! - キーは `TypeId`、値は型消去されたメソッド

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::builder::TableBuilder;
use crate::domain::{ConfigurationError, Role, TypeKey};
use crate::typed::{DynMethod, MessageTarget};

/// A message type bound to one method of the target.
pub struct HandlerEntry<T> {
    message_type: TypeKey,
    contract: String,
    method: String,
    invoker: Arc<dyn DynMethod<T>>,
}

impl<T> HandlerEntry<T> {
    pub(crate) fn new(
        message_type: TypeKey,
        contract: impl Into<String>,
        method: impl Into<String>,
        invoker: Arc<dyn DynMethod<T>>,
    ) -> Self {
        Self {
            message_type,
            contract: contract.into(),
            method: method.into(),
            invoker,
        }
    }

    pub fn message_type(&self) -> TypeKey {
        self.message_type
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub(crate) fn invoker(&self) -> &dyn DynMethod<T> {
        self.invoker.as_ref()
    }
}

type Namespace<T> = HashMap<TypeId, HandlerEntry<T>>;

/// Message type → handler, one namespace per [`Role`].
///
/// A message type appears in at most one namespace.
pub struct DispatchTable<T> {
    target: &'static str,
    events: Namespace<T>,
    requests: Namespace<T>,
    responses: Namespace<T>,
}

impl<T: MessageTarget> DispatchTable<T> {
    /// Build the table for `T` from its declarations.
    pub fn build() -> Result<Self, ConfigurationError> {
        TableBuilder::<T>::new().build()
    }
}

impl<T> DispatchTable<T> {
    pub(crate) fn empty(target: &'static str) -> Self {
        Self {
            target,
            events: HashMap::new(),
            requests: HashMap::new(),
            responses: HashMap::new(),
        }
    }

    pub(crate) fn namespace_mut(&mut self, role: Role) -> &mut Namespace<T> {
        match role {
            Role::Event => &mut self.events,
            Role::Request => &mut self.requests,
            Role::Response => &mut self.responses,
        }
    }

    fn namespace(&self, role: Role) -> &Namespace<T> {
        match role {
            Role::Event => &self.events,
            Role::Request => &self.requests,
            Role::Response => &self.responses,
        }
    }

    /// Name of the target type this table was built for.
    pub fn target(&self) -> &'static str {
        self.target
    }

    /// Find the handler for a runtime type.
    ///
    /// Namespaces are searched in [`Role::ALL`] order. Since a type is mapped
    /// at most once, at most one namespace can match.
    pub fn lookup(&self, type_id: TypeId) -> Option<(Role, &HandlerEntry<T>)> {
        Role::ALL
            .into_iter()
            .find_map(|role| self.namespace(role).get(&type_id).map(|entry| (role, entry)))
    }

    /// Role under which `M` is mapped, if any.
    pub fn role_of<M: 'static>(&self) -> Option<Role> {
        self.lookup(TypeId::of::<M>()).map(|(role, _)| role)
    }

    pub fn contains<M: 'static>(&self) -> bool {
        self.role_of::<M>().is_some()
    }

    /// Entries in one namespace.
    pub fn entries(&self, role: Role) -> impl Iterator<Item = &HandlerEntry<T>> {
        self.namespace(role).values()
    }

    pub fn count(&self, role: Role) -> usize {
        self.namespace(role).len()
    }

    /// Total entries across all namespaces.
    pub fn len(&self) -> usize {
        self.events.len() + self.requests.len() + self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summary(&self) -> TableSummary {
        let mut handlers: Vec<EntrySummary> = Role::ALL
            .into_iter()
            .flat_map(|role| {
                self.entries(role).map(move |entry| EntrySummary {
                    role,
                    message_type: entry.message_type.name().to_string(),
                    contract: entry.contract.clone(),
                    method: entry.method.clone(),
                })
            })
            .collect();
        handlers.sort_by(|a, b| (a.role, &a.message_type).cmp(&(b.role, &b.message_type)));

        TableSummary {
            target: self.target.to_string(),
            handlers,
        }
    }
}

/// Serializable view of a [`DispatchTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub target: String,
    pub handlers: Vec<EntrySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub role: Role,
    pub message_type: String,
    pub contract: String,
    pub method: String,
}
