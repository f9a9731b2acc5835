//! djdeck: run a session file through the library, track cache and decks.

use anyhow::{bail, Context};
use tracing::info;

use djdeck::cli::Cli;
use djdeck::config::DjConfig;
use djdeck::logging::init_logging;
use djdeck::session::{DjSession, SessionFile, SessionReport};
use djdeck::DjError;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_logging(&cli.logging_config()).context("logging setup failed")?;

    let mut config = DjConfig::from_env();
    cli.apply_to(&mut config);

    let session_path = config.effective_session_path();
    let session = SessionFile::load(&session_path)?;

    // Session file settings sit between the environment and the CLI flags.
    config.apply_settings(&session.settings);
    cli.apply_to(&mut config);

    if let Some(reason) = config.validate() {
        bail!(DjError::invalid_config(reason));
    }
    info!(
        session = %session_path.display(),
        cache_size = config.cache_size,
        bpm_tolerance = config.bpm_tolerance,
        auto_sync = config.auto_sync,
        "Starting session"
    );

    let mut dj = DjSession::new(config);
    let report = dj.run(&session, &cli.playlists);

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to encode report")?
        );
    } else {
        print_report(&dj, &report);
    }

    Ok(())
}

fn print_report(dj: &DjSession, report: &SessionReport) {
    print!("{}", dj.library().playlist().view());
    println!();
    print!("{}", report.cache);
    println!();
    print!("{}", report.decks);
    println!();

    let stats = &report.stats;
    println!("Session summary");
    println!("  Tracks processed: {}", stats.tracks_processed);
    println!("  Cache hits:       {}", stats.cache_hits);
    println!("  Cache misses:     {}", stats.cache_misses);
    println!("  Cache evictions:  {}", stats.cache_evictions);
    println!("  Deck loads:       {}", stats.deck_loads);
    println!("  Transitions:      {}", stats.transitions);
    println!("  BPM syncs:        {}", stats.bpm_syncs);
    println!("  Errors:           {}", stats.errors);
}
