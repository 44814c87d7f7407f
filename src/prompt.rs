// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    ffi::OsString,
    io::{self, BufRead as _, Write as _},
    path::Path,
};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::task;

use crate::{error::Result, metadata};

#[derive(Debug, Clone)]
pub(crate) struct Request {
    description: String,
}

pub(crate) struct RequestBuilder {
    description: String,
}

impl RequestBuilder {
    pub(crate) fn new() -> Self {
        Self {
            description: "Enter a password.".to_owned(),
        }
    }

    pub(crate) fn for_account(mut self, username: &str) -> Self {
        self.description = format!("Enter the password for {username}.");
        self
    }

    pub(crate) fn with_description(mut self, description: &str) -> Self {
        description.clone_into(&mut self.description);
        self
    }

    pub(crate) fn into_request(self) -> Request {
        Request {
            description: self.description,
        }
    }
}

#[async_trait]
pub(crate) trait Prompt: Send + Sync {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>>;
}

#[async_trait]
impl<T: Prompt + ?Sized> Prompt for Box<T> {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        (**self).prompt(req).await
    }
}

#[async_trait]
impl<T: Prompt> Prompt for Vec<T> {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        for candidate in self {
            if let r @ (Ok(Some(_)) | Err(_)) = candidate.prompt(req.clone()).await {
                return r;
            }
        }

        Ok(None)
    }
}

pub(crate) struct PinentryPrompt {
    executable: Option<OsString>,
}

impl PinentryPrompt {
    pub(crate) const fn new() -> Self {
        Self { executable: None }
    }

    pub(crate) fn new_with_executable<P: AsRef<Path>>(executable: P) -> Self {
        Self {
            executable: Some(executable.as_ref().as_os_str().into()),
        }
    }
}

#[async_trait]
impl Prompt for PinentryPrompt {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        fn interact<'input>(
            mut input: pinentry::PassphraseInput<'input>,
            title: &'input str,
            description: &'input str,
        ) -> Result<SecretString> {
            _ = input.required("A password is required to continue.");
            _ = input.with_title(title);
            _ = input.with_description(description);
            _ = input.with_prompt("Password");

            Ok(input.interact()?)
        }

        let title = format!("Sign in - {}", *metadata::CLIENT_DISPLAY_NAME);

        let input = self
            .executable
            .as_ref()
            .and_then(pinentry::PassphraseInput::with_binary)
            .or_else(pinentry::PassphraseInput::with_default_binary)
            .map(|input| {
                task::spawn_blocking(move || interact(input, &title, &req.description))
            });

        Ok(match input {
            Some(fut) => Some(fut.await??),
            None => None,
        })
    }
}

/// Asks on the controlling terminal without echoing.
pub(crate) struct RpasswordPrompt;

#[async_trait]
impl Prompt for RpasswordPrompt {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        eprintln!("{}", req.description);

        Ok(Some(
            task::spawn_blocking(|| {
                rpassword::prompt_password("Password: ").map(SecretString::new)
            })
            .await??,
        ))
    }
}

/// Reads the first line of standard input, for scripted use.
pub(crate) struct StdinPrompt;

#[async_trait]
impl Prompt for StdinPrompt {
    async fn prompt(&self, _req: Request) -> Result<Option<SecretString>> {
        let line = task::spawn_blocking(|| {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).map(|_| line)
        })
        .await??;

        let password = line.trim_end_matches(['\r', '\n']);
        Ok((!password.is_empty()).then(|| SecretString::new(password.to_owned())))
    }
}

/// Asks a yes-or-no question before something irreversible happens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub(crate) trait Confirm: Send + Sync {
    async fn confirm(&self, question: &str) -> Result<bool>;
}

/// Asks on standard error and reads the answer from standard input.
/// Anything but an explicit yes is a no.
pub(crate) struct TerminalConfirm;

#[async_trait]
impl Confirm for TerminalConfirm {
    async fn confirm(&self, question: &str) -> Result<bool> {
        let question = question.to_owned();
        let answer = task::spawn_blocking(move || -> io::Result<String> {
            let mut stderr = io::stderr().lock();
            write!(stderr, "{question} [y/N] ")?;
            stderr.flush()?;

            let mut answer = String::new();
            let _ = io::stdin().lock().read_line(&mut answer)?;
            Ok(answer)
        })
        .await??;

        Ok(is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
