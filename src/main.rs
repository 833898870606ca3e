// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, process::ExitCode};

use comcell_console::{
    config::{ConsoleConfig, EMAIL_ENV, GROUP_ID_ENV, PASSWORD_ENV},
    logging::init_tracing,
    notify::Severity,
    screen::ScreenError,
    state::{Console, ConsoleError},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ConsoleConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Console exited with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ConsoleConfig) -> Result<(), ConsoleError> {
    info!(api = %config.api_base_url, "Starting console");
    let console = Console::new(config)?;

    let shutdown = console.shutdown_token().clone();
    tokio::spawn(watch_interrupt(shutdown.clone()));

    if console.restore()?.is_none() {
        match (env::var(EMAIL_ENV), env::var(PASSWORD_ENV)) {
            (Ok(email), Ok(password)) => {
                console.login(&email, &password, &shutdown).await?;
            }
            _ => info!("No session; set {EMAIL_ENV} and {PASSWORD_ENV} to sign in"),
        }
    }

    let Ok(group_id) = env::var(GROUP_ID_ENV) else {
        info!("Set {GROUP_ID_ENV} to inspect a group");
        return Ok(());
    };

    let mut screen = console.group_screen(group_id.as_str().into());
    match screen.load().await {
        Ok(()) => {}
        Err(ScreenError::Cancelled) => return Ok(()),
        Err(e) => warn!(group_id = %group_id, error = %e, "Group could not be loaded"),
    }

    let controls = screen.controls();
    info!(
        group_id = %group_id,
        phase = %screen.phase(),
        level = %controls.level,
        can_edit = controls.can_edit,
        can_delete = controls.can_delete,
        "Access summary"
    );
    if let Some(leaders) = screen.leader_conflict() {
        warn!(group_id = %group_id, ?leaders, "Group lists more than one leader");
    }
    match serde_json::to_string_pretty(&controls) {
        Ok(summary) => println!("{summary}"),
        Err(e) => warn!(error = %e, "Could not render access summary"),
    }

    for notice in console.notifier().drain() {
        match notice.severity {
            Severity::Error => error!("{}", notice.message),
            Severity::Warning => warn!("{}", notice.message),
            Severity::Success | Severity::Info => info!("{}", notice.message),
        }
    }
    Ok(())
}

async fn watch_interrupt(shutdown: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Interrupt received; cancelling in-flight requests");
        shutdown.cancel();
    }
}
