// Entrypoint for the CLI application.
// - Keeps `main` small: create the API client and transfer log, then
//   hand both to the interactive session.
// - Returns `anyhow::Result` so every failure surfaces on the console.

use cdnup_cli::{api::CdnClient, log::TransferLog, ui};

fn main() -> anyhow::Result<()> {
    // The client reads `CDN_API_URL` / `CDN_PUBLIC_URL` / `CDN_BRANCH`
    // from the environment, falling back to the built-in defaults. See
    // `api::CdnClient::from_env`.
    let api = CdnClient::from_env()?;

    // The log lives in the working directory as `cdn_log.json`.
    let log = TransferLog::default();

    // Runs until the user exits or one transfer completes.
    ui::run(api, log, ui::SessionState::Prompt)?;
    Ok(())
}
