// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    missing_doc_code_examples,
    private_doc_tests,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod app;
mod auth;
mod client;
mod command;
mod error;
mod guard;
mod http;
mod metadata;
mod model;
mod prompt;
mod screen;
mod session;
mod storage;
mod store;

use std::{path::PathBuf, process, sync::Arc, time::Duration};

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use error::Result;
use log::{debug, error, warn};
use tokio_util::sync::CancellationToken;
use url::Url;

#[derive(Debug, Subcommand)]
enum Command {
    Login(command::session::Login),
    Logout(command::session::Logout),
    Dashboard(command::navigate::Dashboard),
    Go(command::navigate::Go),
    Purchase(command::purchase::Purchase),
    Transactions(command::navigate::Transactions),
    /// Manage the package catalog. Administrators only.
    #[command(subcommand)]
    Package(command::package::Command),
    Customers(command::customers::Customers),
    HashPassword(command::hash_password::HashPassword),
}

#[async_trait]
impl command::Command for Command {
    async fn execute(self, ctx: &mut command::Context) -> Result<()> {
        match self {
            Self::Login(cmd) => cmd.execute(ctx).await,
            Self::Logout(cmd) => cmd.execute(ctx).await,
            Self::Dashboard(cmd) => cmd.execute(ctx).await,
            Self::Go(cmd) => cmd.execute(ctx).await,
            Self::Purchase(cmd) => cmd.execute(ctx).await,
            Self::Transactions(cmd) => cmd.execute(ctx).await,
            Self::Package(cmd) => cmd.execute(ctx).await,
            Self::Customers(cmd) => cmd.execute(ctx).await,
            Self::HashPassword(cmd) => cmd.execute(ctx).await,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The origin of the storefront backend.
    #[arg(long, env = "DATAPLAN_URL", default_value = "http://localhost:3000", value_parser = Url::parse)]
    url: Url,

    /// How many seconds to wait for each request to the backend.
    #[arg(long, env = "DATAPLAN_TIMEOUT", default_value_t = 10)]
    timeout: u64,

    /// Keep the session in memory only. Every command then starts signed
    /// out.
    #[arg(long)]
    no_persist_session: bool,

    /// The path to the Pinentry program to use when asking for a password.
    #[arg(long, value_hint = clap::ValueHint::ExecutablePath)]
    pinentry_program: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

fn get_session_storage(args: &Args) -> Box<dyn storage::Storage<session::Envelope>> {
    if !args.no_persist_session {
        if let Some(file_storage) = storage::File::new(metadata::SESSION_FILE) {
            debug!("Keeping the session in {}", file_storage.path().display());
            return Box::new(file_storage);
        }
        warn!("There is no data directory to keep the session in, so it will not outlive this command");
    }

    Box::new(storage::Memory::<session::Envelope>::new())
}

async fn run(args: Args, token: CancellationToken) -> Result<()> {
    let prompts: Vec<Box<dyn prompt::Prompt>> = vec![
        Box::new(args.pinentry_program.clone().map_or_else(
            prompt::PinentryPrompt::new,
            prompt::PinentryPrompt::new_with_executable,
        )),
        Box::new(prompt::RpasswordPrompt),
    ];

    let client: Arc<dyn client::Client> = Arc::new(http::HttpClient::new(
        args.url.clone(),
        Duration::from_secs(args.timeout),
    )?);
    let session = session::SessionStore::restore(get_session_storage(&args)).await;

    let mut ctx = command::Context {
        app: app::App::new(
            Arc::clone(&client),
            Box::new(auth::DirectoryAuthenticator::new(client)),
            session,
            Box::new(prompt::TerminalConfirm),
        ),
        prompt: Box::new(prompts),
        token,
    };

    command::Command::execute(args.command, &mut ctx).await
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("DATAPLAN_LOG", "warn")
        .write_style("DATAPLAN_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    let token = CancellationToken::new();
    let interrupt = token.clone();
    drop(tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    }));

    if let Err(e) = run(Args::parse(), token).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
