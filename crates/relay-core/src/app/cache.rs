//! TableCache - ターゲット型ごとに構築済みテーブルを共有する
//!
//! テーブルは不変なので、同じ型のターゲットはすべて同じ `Arc` を使えます。
//! 失敗した構築はキャッシュしません。

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::debug;

use super::table::DispatchTable;
use crate::domain::ConfigurationError;
use crate::typed::MessageTarget;

type SharedTable = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct TableCache {
    tables: Mutex<HashMap<TypeId, SharedTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache.
    pub fn global() -> &'static TableCache {
        static GLOBAL: OnceLock<TableCache> = OnceLock::new();
        GLOBAL.get_or_init(TableCache::new)
    }

    /// Return the cached table for `T`, building it on first use.
    pub fn get_or_build<T: MessageTarget>(&self) -> Result<Arc<DispatchTable<T>>, ConfigurationError> {
        // Stored tables are immutable, so a poisoned lock still guards valid data.
        let mut tables = self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(shared) = tables.get(&TypeId::of::<T>()) {
            if let Ok(table) = Arc::clone(shared).downcast::<DispatchTable<T>>() {
                return Ok(table);
            }
        }

        let table = Arc::new(DispatchTable::<T>::build()?);
        debug!(target_type = table.target(), "cached dispatch table");
        tables.insert(TypeId::of::<T>(), Arc::clone(&table) as SharedTable);
        Ok(table)
    }

    /// Number of target types with a cached table.
    pub fn len(&self) -> usize {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clear();
    }
}
