//! TableBuilder - 宣言からディスパッチテーブルを構築する
//!
//! # 学習ポイント
//! - 起動時検証（Fail-fast 設計）
//! - プレースホルダ型の解決（名前 + アリティ + 型で照合）
//! - 全名前空間を横断する一意性チェック
//!
//! # 構築フロー
//! 1. `T::contracts()` で契約を列挙（Role で分類）
//! 2. 契約メソッドごとにアリティを検査（1 以外は MalformedContract）
//! 3. ターゲットの具体メソッドを解決（0 件: UnresolvedHandler, 2 件以上: AmbiguousHandler）
//! 4. 登録前に全名前空間で重複を検査（DuplicateMapping）

use tracing::{debug, warn};

use super::table::{DispatchTable, HandlerEntry};
use crate::domain::{ConfigurationError, Contract, ContractMethod, ParamType, TypeKey};
use crate::typed::{MessageTarget, MethodDecl, MethodSet};

/// Builds a [`DispatchTable`] for `T`.
///
/// The builder is consumed by [`build`](Self::build); a table is returned only
/// when every contract method resolved.
pub struct TableBuilder<T> {
    contracts: Vec<Contract>,
    methods: MethodSet<T>,
}

impl<T: MessageTarget> TableBuilder<T> {
    pub fn new() -> Self {
        Self {
            contracts: T::contracts(),
            methods: MethodSet::of(),
        }
    }

    pub fn build(self) -> Result<DispatchTable<T>, ConfigurationError> {
        let target = std::any::type_name::<T>();
        let mut table = DispatchTable::empty(target);

        for contract in &self.contracts {
            for method in contract.methods() {
                if let Err(err) = self.register(&mut table, contract, method) {
                    warn!(target_type = target, error = %err, "dispatch table build failed");
                    return Err(err);
                }
            }
        }

        debug!(target_type = target, handlers = table.len(), "dispatch table built");
        Ok(table)
    }

    fn register(
        &self,
        table: &mut DispatchTable<T>,
        contract: &Contract,
        method: &ContractMethod,
    ) -> Result<(), ConfigurationError> {
        let resolved = self.resolve(contract, method)?;
        let message_type = resolved.param();

        if let Some((existing, _)) = table.lookup(message_type.id()) {
            return Err(ConfigurationError::DuplicateMapping {
                target: table.target(),
                message_type: message_type.name(),
                existing,
                attempted: contract.role(),
                contract: contract.name().to_string(),
                method: method.name().to_string(),
            });
        }

        debug!(
            target_type = table.target(),
            role = %contract.role(),
            contract = contract.name(),
            method = method.name(),
            message_type = message_type.name(),
            "mapped handler"
        );
        table.namespace_mut(contract.role()).insert(
            message_type.id(),
            HandlerEntry::new(message_type, contract.name(), method.name(), resolved.method()),
        );
        Ok(())
    }

    /// Find the one target method a contract method names.
    fn resolve(
        &self,
        contract: &Contract,
        method: &ContractMethod,
    ) -> Result<&MethodDecl<T>, ConfigurationError> {
        let param = match method.params() {
            [param] => param,
            params => {
                return Err(ConfigurationError::MalformedContract {
                    contract: contract.name().to_string(),
                    method: method.name().to_string(),
                    found: params.len(),
                });
            }
        };

        let candidates: Vec<&MethodDecl<T>> = self
            .methods
            .named(method.name())
            .filter(|decl| accepts(param, decl.param()))
            .collect();

        match candidates.as_slice() {
            [] => Err(ConfigurationError::UnresolvedHandler {
                target: std::any::type_name::<T>(),
                contract: contract.name().to_string(),
                method: method.name().to_string(),
                param: param.to_string(),
            }),
            [decl] => Ok(decl),
            many => Err(ConfigurationError::AmbiguousHandler {
                target: std::any::type_name::<T>(),
                contract: contract.name().to_string(),
                method: method.name().to_string(),
                candidates: many.iter().map(|decl| decl.signature()).collect(),
            }),
        }
    }
}

impl<T: MessageTarget> Default for TableBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a target method's parameter satisfies a contract parameter.
fn accepts(contract_param: &ParamType, target_param: TypeKey) -> bool {
    match contract_param {
        ParamType::Concrete(expected) => *expected == target_param,
        ParamType::Placeholder(_) => !target_param.is_top(),
    }
}
