//! relay demo binary
//!
//! Run with: `relay [COMMAND]`

mod actors;
mod host;

use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use relay_core::{DispatchTable, MessageTarget};
use tracing::info;
use tracing_subscriber::EnvFilter;

use actors::{
    AcknowledgingActor, Boss, NameChanged, RequestMessage, ResponseMessage, Unhandled, UserInfo,
    UserManagementActor, UserQuery, UserRegistered, Worker,
};
use host::{Probe, spawn};

const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Typed message dispatch demos")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a demo scenario on the in-process host
    Demo {
        #[arg(value_enum)]
        scenario: Scenario,
    },

    /// Print an actor's dispatch table as JSON
    Inspect {
        #[arg(value_enum)]
        actor: ActorKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Scenario {
    BossAndWorker,
    UserManagement,
    Acknowledging,
}

#[derive(Clone, Copy, ValueEnum)]
enum ActorKind {
    Boss,
    Worker,
    UserManager,
    Acknowledging,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = log_directive(cli.verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .init();

    match cli.command {
        Commands::Demo { scenario } => match scenario {
            Scenario::BossAndWorker => demo_boss_and_worker().await,
            Scenario::UserManagement => demo_user_management().await,
            Scenario::Acknowledging => demo_acknowledging().await,
        },
        Commands::Inspect { actor } => match actor {
            ActorKind::Boss => inspect::<Boss>(),
            ActorKind::Worker => inspect::<Worker>(),
            ActorKind::UserManager => inspect::<UserManagementActor>(),
            ActorKind::Acknowledging => inspect::<AcknowledgingActor>(),
        },
    }
}

async fn demo_boss_and_worker() -> Result<()> {
    let boss = spawn("boss-actor", Boss::default())?;
    let mut client = Probe::new("client");

    info!("telling boss to make worker work");
    boss.tell(RequestMessage("Make worker work!".to_string()), Some(client.mailbox()))?;

    let answer: ResponseMessage = client
        .expect_msg(REPLY_TIMEOUT)
        .await
        .context("waiting for the boss")?;
    println!("Boss says: {}", answer.0);
    Ok(())
}

async fn demo_user_management() -> Result<()> {
    let manager = spawn("user-manager", UserManagementActor::default())?;
    let mut client = Probe::new("client");
    let me = client.mailbox().clone();

    manager.tell(UserRegistered { id: 123 }, Some(&me))?;
    manager.tell(
        NameChanged {
            user_id: 123,
            new_name: "John Doe".to_string(),
        },
        Some(&me),
    )?;
    manager.tell(UserQuery(123), Some(&me))?;

    let user: UserInfo = client.expect_msg(REPLY_TIMEOUT).await.context("waiting for the user query")?;
    println!("User {}: {}", user.id, user.name.as_deref().unwrap_or("<unnamed>"));

    manager.tell(String::from("not a user event"), Some(&me))?;
    let notice: Unhandled = client
        .expect_msg(REPLY_TIMEOUT)
        .await
        .context("waiting for the unhandled notice")?;
    println!("{} left a message unhandled", notice.actor);
    Ok(())
}

async fn demo_acknowledging() -> Result<()> {
    let actor = spawn("acknowledging-actor", AcknowledgingActor::default())?;
    let mut client = Probe::new("client");
    let me = client.mailbox().clone();

    actor.tell(2.5_f32, Some(&me))?;
    actor.tell(3_i16, Some(&me))?;
    actor.tell(4_i32, Some(&me))?;

    println!("ack f32: {}", client.expect_msg::<f32>(REPLY_TIMEOUT).await?);
    println!("ack i16: {}", client.expect_msg::<i16>(REPLY_TIMEOUT).await?);
    println!("ack i32: {}", client.expect_msg::<i32>(REPLY_TIMEOUT).await?);
    Ok(())
}

/// `--verbose` forces `debug`; otherwise `RUST_LOG` if set, else `info`.
fn log_directive(verbose: bool, env: Option<String>) -> String {
    match (verbose, env) {
        (true, _) => "debug".to_string(),
        (false, Some(directive)) if !directive.trim().is_empty() => directive,
        (false, _) => "info".to_string(),
    }
}

fn inspect<T: MessageTarget>() -> Result<()> {
    let table = DispatchTable::<T>::build()?;
    println!("{}", serde_json::to_string_pretty(&table.summary())?);
    Ok(())
}
