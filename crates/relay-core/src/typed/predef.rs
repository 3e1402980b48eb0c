//! Predefined contracts with one to three placeholder-typed methods per role.
//!
//! | contract      | methods                                        |
//! |---------------|------------------------------------------------|
//! | `eventsN`     | `on_event`, `on_event2`, `on_event3`          |
//! | `requestsN`   | `on_request`, `on_request2`, `on_request3`    |
//! | `responsesN`  | `on_response`, `on_response2`, `on_response3` |
//!
//! The `N` variant declares the first `N` methods of its row.

use crate::domain::{Contract, Role};

fn numbered(contract: &str, role: Role, prefix: &str, arity: usize) -> Contract {
    (1..=arity).fold(Contract::new(format!("{contract}{arity}"), role), |c, i| {
        let method = if i == 1 {
            prefix.to_string()
        } else {
            format!("{prefix}{i}")
        };
        c.generic(method, format!("T{i}"))
    })
}

pub fn events1() -> Contract {
    numbered("Events", Role::Event, "on_event", 1)
}

pub fn events2() -> Contract {
    numbered("Events", Role::Event, "on_event", 2)
}

pub fn events3() -> Contract {
    numbered("Events", Role::Event, "on_event", 3)
}

pub fn requests1() -> Contract {
    numbered("Requests", Role::Request, "on_request", 1)
}

pub fn requests2() -> Contract {
    numbered("Requests", Role::Request, "on_request", 2)
}

pub fn requests3() -> Contract {
    numbered("Requests", Role::Request, "on_request", 3)
}

pub fn responses1() -> Contract {
    numbered("Responses", Role::Response, "on_response", 1)
}

pub fn responses2() -> Contract {
    numbered("Responses", Role::Response, "on_response", 2)
}

pub fn responses3() -> Contract {
    numbered("Responses", Role::Response, "on_response", 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn method_names(contract: &Contract) -> Vec<&str> {
        contract.methods().iter().map(|m| m.name()).collect()
    }

    #[rstest]
    #[case::events(events3(), Role::Event, "Events3", ["on_event", "on_event2", "on_event3"])]
    #[case::requests(requests3(), Role::Request, "Requests3", ["on_request", "on_request2", "on_request3"])]
    #[case::responses(responses3(), Role::Response, "Responses3", ["on_response", "on_response2", "on_response3"])]
    fn three_method_contracts(
        #[case] contract: Contract,
        #[case] role: Role,
        #[case] name: &str,
        #[case] methods: [&str; 3],
    ) {
        assert_eq!(contract.role(), role);
        assert_eq!(contract.name(), name);
        assert_eq!(method_names(&contract), methods.to_vec());
        assert!(contract.methods().iter().all(|m| m.params().len() == 1 && m.params()[0].is_placeholder()));
    }

    #[test]
    fn smaller_arities_are_prefixes() {
        assert_eq!(method_names(&requests1()), vec!["on_request"]);
        assert_eq!(method_names(&responses2()), vec!["on_response", "on_response2"]);
        assert_eq!(method_names(&events2()), vec!["on_event", "on_event2"]);
        assert_eq!(events1().name(), "Events1");
    }
}
