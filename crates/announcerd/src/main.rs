// # announcerd
//
// Command-line announcer for SA-MP game servers.
//
// This is a THIN integration layer only: argument handling, logging setup
// and wiring. All announce logic lives in announcer-core.
//
// ## Invocation
//
// ```bash
// announcerd <default-port>
// ```
//
// The single argument supplies the port used by targets that configure
// none. A missing or unparsable argument means nothing is announced; the
// process still exits cleanly, matching the "never fail the hosting server
// over an announcement" contract.
//
// ## Configuration
//
// Read from `announce.json` in the working directory. A missing or
// unparseable document yields no announce targets.
//
// ## Environment
//
// - `ANNOUNCER_LOG`: diagnostic log level (trace|debug|info|warn|error)
//
// Diagnostics go to stderr via tracing; announce outcome lines go to
// stdout/stderr and the configured log files through the outcome sinks.

use std::process::ExitCode;
use std::sync::Arc;

use announcer_core::{
    AnnounceConfig, Announcer, ConsoleSink, Dispatcher, FileSink, HttpTransport, MultiSink,
    OutcomeSink,
};
use announcer_ip_http::HttpIpv4Resolver;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

const CONFIG_PATH: &str = "announce.json";

fn main() -> ExitCode {
    init_tracing();

    let Some(default_port) = default_port_arg() else {
        warn!("usage: announcerd <default-port>; nothing to announce");
        return ExitCode::SUCCESS;
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = runtime.block_on(run(default_port)) {
        warn!("announce run aborted: {e}");
    }

    // Announce failures are observable only through the outcome sinks;
    // the exit code never distinguishes partial failure from success.
    ExitCode::SUCCESS
}

/// The single command-line argument, when present and numeric.
fn default_port_arg() -> Option<u16> {
    std::env::args().nth(1)?.parse().ok()
}

async fn run(default_port: u16) -> anyhow::Result<()> {
    let config = match AnnounceConfig::from_path(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            warn!("no usable configuration at {CONFIG_PATH}: {e}");
            return Ok(());
        }
    };

    let transport = Arc::new(HttpTransport::new()?);

    let sinks: Vec<Arc<dyn OutcomeSink>> = vec![
        Arc::new(ConsoleSink),
        Arc::new(FileSink::from_config(&config)),
    ];
    let sink: Arc<dyn OutcomeSink> = Arc::new(MultiSink::new(sinks));
    let resolver = Arc::new(HttpIpv4Resolver::from_config(&config));
    let dispatcher = Dispatcher::new(transport, sink);

    let announcer = Announcer::from_config(&config, default_port, resolver, dispatcher);
    info!(targets = announcer.target_count(), "announcing");

    let outcomes = announcer.announce_all().await;
    let errors = outcomes.iter().filter(|o| o.is_error()).count();
    info!(targets = outcomes.len(), errors, "announce run finished");
    Ok(())
}

fn init_tracing() {
    let level = match std::env::var("ANNOUNCER_LOG")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {e}");
    }
}
