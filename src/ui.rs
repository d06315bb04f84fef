// UI layer: the interactive transfer workflow, driven by `dialoguer`.
// The session is modeled as an explicit state machine instead of a
// mutable running flag: each handler consumes the current state and
// returns the next one until a terminal outcome is reached.

use crate::api::CdnClient;
use crate::hash;
use crate::log::TransferLog;
use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;

/// Where the session currently is. `ConfirmTransfer` and
/// `ConfirmDelete` carry the data the next step needs so no state
/// lives outside this enum.
pub enum SessionState {
    Prompt,
    FilePrompt,
    ConfirmTransfer { path: String },
    ConfirmDelete { path: String, hash: String },
    Done(TerminalOutcome),
}

/// How the session ended.
#[derive(Debug, PartialEq, Eq)]
pub enum TerminalOutcome {
    /// The user chose Exit from the menu.
    Exited,
    /// One file was transferred; the session is single-shot.
    Transferred { url: String },
}

/// Drive the session from `initial` until a terminal state. Blocks on
/// user input and on the upload itself.
pub fn run(api: CdnClient, log: TransferLog, initial: SessionState) -> Result<TerminalOutcome> {
    let mut state = initial;
    loop {
        state = match state {
            SessionState::Prompt => prompt()?,
            SessionState::FilePrompt => file_prompt()?,
            SessionState::ConfirmTransfer { path } => confirm_transfer(&log, path)?,
            SessionState::ConfirmDelete { path, hash } => confirm_delete(&api, path, hash)?,
            SessionState::Done(outcome) => return Ok(outcome),
        };
    }
}

/// Top-level menu. "Show CDN directory" is an explicitly unimplemented
/// capability: it says so and returns to the menu rather than silently
/// doing nothing.
fn prompt() -> Result<SessionState> {
    let items = vec!["Transfer to CDN", "Show CDN directory", "Exit"];
    let selection = Select::new().items(&items).default(0).interact()?;
    Ok(match selection {
        0 => SessionState::FilePrompt,
        1 => {
            println!("Directory listing is not implemented yet.");
            SessionState::Prompt
        }
        _ => SessionState::Done(TerminalOutcome::Exited),
    })
}

/// Ask for a path and echo the file contents as a sanity check before
/// anything irreversible happens. A missing file is recoverable: the
/// user lands back at the menu instead of losing the session.
fn file_prompt() -> Result<SessionState> {
    let path: String = Input::new().with_prompt("Enter the file path").interact_text()?;
    match fs::read(&path) {
        Ok(content) => {
            println!("{}", String::from_utf8_lossy(&content));
            Ok(SessionState::ConfirmTransfer { path })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            println!("File not found. Please try again.");
            Ok(SessionState::Prompt)
        }
        Err(e) => Err(e.into()),
    }
}

/// On confirmation, hash the path and record it in the transfer log
/// before the upload is attempted. The log may substitute a rehashed
/// identity if the digest collides with an earlier entry.
fn confirm_transfer(log: &TransferLog, path: String) -> Result<SessionState> {
    let confirmed = Confirm::new().with_prompt("Confirm CDN transfer?").interact()?;
    if !confirmed {
        println!("CDN transfer cancelled.");
        return Ok(SessionState::Prompt);
    }
    println!("CDN transfer initiated.");

    let digest = hash::digest(&path);
    let stored = log.record(&path, &digest)?;
    if stored != digest {
        println!("Duplicate hash value found. Rehashed file name.");
    }
    Ok(SessionState::ConfirmDelete { path, hash: stored })
}

/// Ask about deleting the local copy, then run the upload under a
/// spinner. The upload itself guarantees the local file only goes away
/// after a confirmed remote write.
fn confirm_delete(api: &CdnClient, path: String, hash: String) -> Result<SessionState> {
    let delete_local = Confirm::new()
        .with_prompt("Delete local copy after transfer?")
        .interact()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message("Uploading...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let url = api.upload(&path, &hash, delete_local)?;
    spinner.finish_and_clear();

    println!("CDN transfer completed: {}", url);
    Ok(SessionState::Done(TerminalOutcome::Transferred { url }))
}
