use std::env;
use std::io::{self, Write};

use anyhow::{bail, Context};

use repshare_scan::{
    print_report, scan, CancelToken, NullProgress, ScanOptions, WriteProgress,
};
use repshare_store::DiskStore;

use crate::cli::Cli;

/// Gate guarding against accidental use: the tool is experimental and must
/// be opted into explicitly, before any store access.
const EXPERIMENTAL_VAR: &str = "REPSHARE_IS_EXPERIMENTAL";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    check_experimental()?;

    let cancel = CancelToken::new();
    install_cancel_handler(cancel.clone())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = execute(&cli, cancel, &mut out);

    // Flush even on failure so report lines already produced are not
    // silently lost behind a late error.
    let flushed = out.flush().context("flushing report output");
    result.and(flushed)
}

/// Open the store, scan the full history, print the report.
fn execute(cli: &Cli, cancel: CancelToken, out: &mut impl Write) -> anyhow::Result<()> {
    let store = DiskStore::open(&cli.store_path)
        .with_context(|| format!("opening store '{}'", cli.store_path.display()))?;

    let options = ScanOptions::new(cli.selection()).with_policy(cli.policy());
    let tallies = if cli.quiet {
        scan(&store, options, cancel.clone(), &mut NullProgress)?
    } else {
        scan(&store, options, cancel.clone(), &mut WriteProgress::stderr())?
    };

    print_report(&tallies, &cancel, out)?;
    Ok(())
}

fn check_experimental() -> anyhow::Result<()> {
    match env::var(EXPERIMENTAL_VAR) {
        Ok(value) if is_truthy(&value) => Ok(()),
        _ => bail!(
            "this tool is experimental and should not be used on live data; \
             set {EXPERIMENTAL_VAR}=1 to run it anyway"
        ),
    }
}

fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
}

/// Wire SIGINT to the cancellation token. The listener runs on its own
/// thread so the scan itself stays synchronous; once the signal fires the
/// token flips and the engine aborts at its next checkpoint.
fn install_cancel_handler(cancel: CancelToken) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()
        .context("building signal listener runtime")?;

    std::thread::Builder::new()
        .name("signal-listener".into())
        .spawn(move || {
            runtime.block_on(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("interrupt received, cancelling scan");
                    cancel.cancel();
                }
            });
        })
        .context("spawning signal listener thread")?;

    Ok(())
}
