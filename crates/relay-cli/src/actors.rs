//! Demo actors.

use std::any::Any;
use std::collections::HashMap;

use relay_core::{Contract, DelegatingActor, MessageTarget, MethodSet, predef};
use tracing::{debug, info, warn};

use crate::host::{Context, HostError, HostedActor, Mailbox};

// ────────────────────────────────────────────────────────────────────────────
// boss and worker
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMessage(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMessage(pub String);

/// Takes work from a client, delegates it to a worker, reports back.
#[derive(Default)]
pub struct Boss {
    ctx: Context,
    client: Option<Mailbox>,
}

impl Boss {
    fn on_request(&mut self, request: &RequestMessage) -> Result<(), HostError> {
        info!(said = %request.0, "client says");
        self.client = Some(self.ctx.sender()?.clone());

        let worker = self.ctx.spawn("worker-actor", Worker::default())?;
        worker.tell(RequestMessage("Do work!".to_string()), Some(self.ctx.myself()?))
    }

    fn on_response(&mut self, response: &ResponseMessage) -> Result<(), HostError> {
        info!(said = %response.0, "worker says");
        let client = self.client.take().ok_or(HostError::NoSender)?;
        client.tell(ResponseMessage("Worker is done".to_string()), Some(self.ctx.myself()?))
    }
}

impl MessageTarget for Boss {
    fn contracts() -> Vec<Contract> {
        vec![predef::responses1(), predef::requests1()]
    }

    fn methods(methods: &mut MethodSet<Self>) {
        methods
            .on("on_request", Boss::on_request)
            .on("on_response", Boss::on_response);
    }
}

impl DelegatingActor for Boss {}

impl HostedActor for Boss {
    fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }
}

#[derive(Default)]
pub struct Worker {
    ctx: Context,
}

impl MessageTarget for Worker {
    fn contracts() -> Vec<Contract> {
        vec![predef::requests1()]
    }

    fn methods(methods: &mut MethodSet<Self>) {
        methods.on("on_request", |worker: &mut Worker, request: &RequestMessage| {
            info!(said = %request.0, "boss says");
            worker.ctx.reply(ResponseMessage("Work complete".to_string()))
        });
    }
}

impl DelegatingActor for Worker {}

impl HostedActor for Worker {
    fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }
}

// ────────────────────────────────────────────────────────────────────────────
// user management (custom contract)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistered {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameChanged {
    pub user_id: u64,
    pub new_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub id: u64,
    pub name: Option<String>,
}

/// Sent back to the sender of a message the actor had no handler for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unhandled {
    pub actor: &'static str,
}

/// `UserManager` event contract: one method per domain event.
pub fn user_manager_contract() -> Contract {
    Contract::events("UserManager")
        .handles::<UserRegistered>("user_registered")
        .handles::<NameChanged>("user_changed_name")
}

#[derive(Default)]
pub struct UserManagementActor {
    ctx: Context,
    users: HashMap<u64, Option<String>>,
}

impl MessageTarget for UserManagementActor {
    fn contracts() -> Vec<Contract> {
        vec![user_manager_contract(), predef::requests1()]
    }

    fn methods(methods: &mut MethodSet<Self>) {
        methods
            .on("user_registered", |actor: &mut UserManagementActor, event: &UserRegistered| {
                info!(id = event.id, "a user registered");
                actor.users.entry(event.id).or_insert(None);
            })
            .on("user_changed_name", |actor: &mut UserManagementActor, event: &NameChanged| {
                info!(id = event.user_id, name = %event.new_name, "user changed name");
                actor.users.insert(event.user_id, Some(event.new_name.clone()));
            })
            .on("on_request", |actor: &mut UserManagementActor, query: &UserQuery| {
                let name = actor.users.get(&query.0).cloned().flatten();
                actor.ctx.reply(UserInfo { id: query.0, name })
            });
    }
}

impl DelegatingActor for UserManagementActor {
    fn unhandled(&mut self, _message: &dyn Any) {
        warn!("user manager received a message it does not handle");
        if let Ok(sender) = self.ctx.sender()
            && let Err(err) = sender.tell(Unhandled { actor: "user-manager" }, None)
        {
            debug!(error = %err, "could not report unhandled message");
        }
    }
}

impl HostedActor for UserManagementActor {
    fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }
}

// ────────────────────────────────────────────────────────────────────────────
// acknowledging actor
// ────────────────────────────────────────────────────────────────────────────

/// Echoes every request and response back to its sender.
#[derive(Default)]
pub struct AcknowledgingActor {
    ctx: Context,
}

impl AcknowledgingActor {
    fn ack<M: Any + Send + Clone>(&mut self, message: &M) -> Result<(), HostError> {
        self.ctx.reply(message.clone())
    }
}

impl MessageTarget for AcknowledgingActor {
    fn contracts() -> Vec<Contract> {
        vec![predef::requests2(), predef::responses1()]
    }

    fn methods(methods: &mut MethodSet<Self>) {
        methods
            .on("on_request", AcknowledgingActor::ack::<f32>)
            .on("on_request2", AcknowledgingActor::ack::<i16>)
            .on("on_response", AcknowledgingActor::ack::<i32>);
    }
}

impl DelegatingActor for AcknowledgingActor {}

impl HostedActor for AcknowledgingActor {
    fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }
}
