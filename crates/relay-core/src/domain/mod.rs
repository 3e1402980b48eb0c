//! Domain model (roles, type keys, contracts, errors).

pub mod contract;
pub mod errors;
pub mod role;
pub mod type_key;

pub use self::contract::{Contract, ContractMethod};
pub use self::errors::{ConfigurationError, HandlerError, RouteError};
pub use self::role::Role;
pub use self::type_key::{ParamType, TypeKey};
