//! `client_acl` entry point.
//!
//! Adds, deletes or lists OF-DPA Policy ACL flows.

use anyhow::Context;
use client_acl::cli::{self, Invocation};
use client_acl::{build_rule, run_with, ClientConfig};
use log::{error, info};
use std::io;
use std::process::ExitCode;

fn try_main(invocation: Invocation) -> anyhow::Result<()> {
    let config = ClientConfig::from(&invocation.cli);
    let mode = invocation.cli.mode();

    let rule = build_rule(&invocation.fields).context("Invalid Policy ACL rule")?;
    info!("Running {:?} batch of {} against {}", mode, rule.count, config.rpc_addr);

    let client = config.connect();
    let stdout = io::stdout();
    let report = run_with(client, stdout.lock(), &config.client_name, mode, &rule)
        .with_context(|| format!("{:?} batch failed", mode))?;

    info!(
        "{} flows processed, {} deletions failed",
        report.processed, report.failed
    );
    Ok(())
}

fn main() -> ExitCode {
    let invocation = match cli::parse_from(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&invocation.cli.log_level),
    )
    .init();

    match try_main(invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
