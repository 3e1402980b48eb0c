//! Capability contracts: role-tagged sets of handler signatures.

use super::role::Role;
use super::type_key::ParamType;

/// One method signature declared by a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractMethod {
    name: String,
    params: Vec<ParamType>,
}

impl ContractMethod {
    pub fn new(name: impl Into<String>, params: Vec<ParamType>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }
}

/// A named set of handler signatures, all belonging to one [`Role`].
///
/// ```ignore
/// let contract = Contract::events("UserManager")
///     .handles::<UserRegistered>("user_registered")
///     .handles::<NameChanged>("user_changed_name");
/// ```
///
/// Contracts are plain values. Arity is not checked here: a method with the
/// wrong number of parameters is rejected when a table is built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    name: String,
    role: Role,
    methods: Vec<ContractMethod>,
}

impl Contract {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            methods: Vec::new(),
        }
    }

    pub fn events(name: impl Into<String>) -> Self {
        Self::new(name, Role::Event)
    }

    pub fn requests(name: impl Into<String>) -> Self {
        Self::new(name, Role::Request)
    }

    pub fn responses(name: impl Into<String>) -> Self {
        Self::new(name, Role::Response)
    }

    /// Declare a unary method.
    pub fn method(self, name: impl Into<String>, param: ParamType) -> Self {
        self.method_with(name, vec![param])
    }

    /// Declare a method with an arbitrary parameter list.
    pub fn method_with(mut self, name: impl Into<String>, params: Vec<ParamType>) -> Self {
        self.methods.push(ContractMethod::new(name, params));
        self
    }

    /// Declare a unary method over the concrete type `M`.
    pub fn handles<M: 'static>(self, name: impl Into<String>) -> Self {
        self.method(name, ParamType::concrete::<M>())
    }

    /// Declare a unary method whose parameter is a placeholder.
    pub fn generic(self, name: impl Into<String>, placeholder: impl Into<String>) -> Self {
        self.method(name, ParamType::placeholder(placeholder))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn methods(&self) -> &[ContractMethod] {
        &self.methods
    }
}
