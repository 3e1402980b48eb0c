//! Minimal in-process mailbox host.
//!
//! Each actor runs as a tokio task that owns a `Router` over it. Envelopes
//! arrive on an unbounded mpsc channel; before routing, the host puts the
//! envelope's sender into the actor's `Context` so handlers can reply.
//!
//! This is just enough host to drive the demos: no supervision, no
//! restarts, no shutdown protocol.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use relay_core::{ConfigurationError, DelegatingActor, Router, TableCache};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("mailbox `{0}` is closed")]
    MailboxClosed(String),

    #[error("actor has no mailbox of its own yet")]
    Detached,

    #[error("message has no sender to reply to")]
    NoSender,

    #[error("no message within {0:?}")]
    Timeout(Duration),

    #[error("expected a `{expected}` message")]
    UnexpectedMessage { expected: &'static str },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// A message in flight, with the mailbox to reply to.
pub struct Envelope {
    pub message: Box<dyn Any + Send>,
    pub sender: Option<Mailbox>,
}

/// Sending side of an actor's channel.
#[derive(Clone)]
pub struct Mailbox {
    name: Arc<str>,
    tx: mpsc::UnboundedSender<Envelope>,
}

impl Mailbox {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tell<M: Any + Send>(&self, message: M, sender: Option<&Mailbox>) -> Result<(), HostError> {
        self.tx
            .send(Envelope {
                message: Box::new(message),
                sender: sender.cloned(),
            })
            .map_err(|_| HostError::MailboxClosed(self.name.to_string()))
    }
}

impl std::fmt::Debug for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Mailbox").field(&self.name).finish()
    }
}

/// Per-actor view of the host.
#[derive(Debug, Default)]
pub struct Context {
    myself: Option<Mailbox>,
    sender: Option<Mailbox>,
}

impl Context {
    pub fn myself(&self) -> Result<&Mailbox, HostError> {
        self.myself.as_ref().ok_or(HostError::Detached)
    }

    /// Sender of the message currently being handled.
    pub fn sender(&self) -> Result<&Mailbox, HostError> {
        self.sender.as_ref().ok_or(HostError::NoSender)
    }

    /// Reply to the sender of the current message, with this actor as sender.
    pub fn reply<M: Any + Send>(&self, message: M) -> Result<(), HostError> {
        self.sender()?.tell(message, self.myself.as_ref())
    }

    /// Start a child actor.
    pub fn spawn<A: HostedActor>(&self, name: &str, actor: A) -> Result<Mailbox, HostError> {
        spawn(name, actor)
    }
}

/// An actor the host can run.
pub trait HostedActor: DelegatingActor + Send {
    fn context_mut(&mut self) -> &mut Context;
}

/// Start `actor` on the current tokio runtime.
///
/// Fails before anything is spawned when the actor's declarations do not
/// form a valid dispatch table.
pub fn spawn<A: HostedActor>(name: &str, actor: A) -> Result<Mailbox, HostError> {
    let mut router = Router::builder(actor)
        .cache(TableCache::global())
        .label(name)
        .build()?;

    let (tx, rx) = mpsc::unbounded_channel();
    let mailbox = Mailbox {
        name: Arc::from(name),
        tx,
    };
    router.target_mut().context_mut().myself = Some(mailbox.clone());

    debug!(actor = name, handlers = router.mapped_handler_count(), "actor started");
    tokio::spawn(run(router, rx));
    Ok(mailbox)
}

async fn run<A: HostedActor>(mut router: Router<A>, mut rx: mpsc::UnboundedReceiver<Envelope>) {
    while let Some(envelope) = rx.recv().await {
        router.target_mut().context_mut().sender = envelope.sender;
        if let Err(err) = router.on_receive(&*envelope.message) {
            warn!(actor = router.label(), error = %err, "message handling failed");
        }
    }
    debug!(actor = router.label(), "actor stopped");
}

/// A mailbox whose messages are read directly by the caller.
pub struct Probe {
    mailbox: Mailbox,
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl Probe {
    pub fn new(name: &str) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            mailbox: Mailbox {
                name: Arc::from(name),
                tx,
            },
            rx,
        }
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    /// Wait for the next message and require it to be an `M`.
    pub async fn expect_msg<M: Any>(&mut self, within: Duration) -> Result<M, HostError> {
        let envelope = tokio::time::timeout(within, self.rx.recv())
            .await
            .map_err(|_| HostError::Timeout(within))?
            .ok_or_else(|| HostError::MailboxClosed(self.mailbox.name().to_string()))?;

        envelope
            .message
            .downcast::<M>()
            .map(|message| *message)
            .map_err(|_| HostError::UnexpectedMessage {
                expected: std::any::type_name::<M>(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::{Contract, MessageTarget, MethodSet, predef};

    #[derive(Default)]
    struct Doubler {
        ctx: Context,
    }

    impl MessageTarget for Doubler {
        fn contracts() -> Vec<Contract> {
            vec![predef::requests1()]
        }

        fn methods(methods: &mut MethodSet<Self>) {
            methods.on("on_request", |d: &mut Doubler, n: &u64| d.ctx.reply(n * 2));
        }
    }

    impl DelegatingActor for Doubler {}

    impl HostedActor for Doubler {
        fn context_mut(&mut self) -> &mut Context {
            &mut self.ctx
        }
    }

    #[derive(Default)]
    struct Unresolvable {
        ctx: Context,
    }

    impl MessageTarget for Unresolvable {
        fn contracts() -> Vec<Contract> {
            vec![predef::events1()]
        }

        fn methods(_: &mut MethodSet<Self>) {}
    }

    impl DelegatingActor for Unresolvable {}

    impl HostedActor for Unresolvable {
        fn context_mut(&mut self) -> &mut Context {
            &mut self.ctx
        }
    }

    const WAIT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn replies_reach_the_sender() {
        let doubler = spawn("doubler", Doubler::default()).unwrap();
        let mut probe = Probe::new("probe");

        doubler.tell(21_u64, Some(probe.mailbox())).unwrap();
        assert_eq!(probe.expect_msg::<u64>(WAIT).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn handler_error_keeps_the_actor_running() {
        let doubler = spawn("doubler", Doubler::default()).unwrap();
        let mut probe = Probe::new("probe");

        // No sender: the handler fails with NoSender, the actor stays up.
        doubler.tell(1_u64, None).unwrap();
        doubler.tell(5_u64, Some(probe.mailbox())).unwrap();
        assert_eq!(probe.expect_msg::<u64>(WAIT).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn invalid_actor_is_never_spawned() {
        let err = spawn("broken", Unresolvable::default()).unwrap_err();
        assert!(matches!(
            err,
            HostError::Configuration(ConfigurationError::UnresolvedHandler { .. })
        ));
    }

    #[tokio::test]
    async fn probe_rejects_the_wrong_type() {
        let mut probe = Probe::new("probe");
        probe.mailbox().tell("text", None).unwrap();

        assert!(matches!(
            probe.expect_msg::<u64>(WAIT).await,
            Err(HostError::UnexpectedMessage { .. })
        ));
    }
}
