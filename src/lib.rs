// src/lib.rs

pub mod batch;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod session_log;
pub mod types;

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::batch::{classify, load_batch};
use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::model::ConfigFile;
use crate::engine::Runtime;
use crate::exec::RealBatchExecutor;
use crate::fs::{FileSystem, RealFileSystem};
use crate::session_log::SessionLog;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - session log
/// - batch executor
/// - poll loop (or a single tick in `--once` mode)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = Arc::new(load_and_validate(&args.config)?);

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    info!(path = ?cfg.files.commands, "watching for changes in command file");
    info!(executable = ?cfg.tool.executable, name = %cfg.tool.name, "target tool");
    info!(path = ?cfg.files.log, "session log");

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let log = SessionLog::new(cfg.files.log.clone(), Arc::clone(&fs));
    let executor = RealBatchExecutor::new(Arc::clone(&cfg), log.clone());
    let mut runtime = Runtime::new(&cfg, fs, executor, log);

    if args.once {
        let outcome = runtime.tick().await;
        info!(?outcome, "single pass finished");
        return Ok(());
    }

    // Ctrl-C → graceful shutdown.
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    runtime.run_until(shutdown).await;
    Ok(())
}

/// Simple dry-run output: print the resolved config and the current batch.
fn print_dry_run(cfg: &ConfigFile) {
    println!("cmdfeed dry-run");
    println!("  tool.executable = {}", cfg.tool.executable.display());
    println!("  tool.name = {}", cfg.tool.name);
    match cfg.tool.working_dir() {
        Some(dir) => println!("  tool.working_dir = {}", dir.display()),
        None => println!("  tool.working_dir = (inherited)"),
    }
    println!("  tool.exit_command = {}", cfg.tool.exit_command);
    if let Some(ref prompt) = cfg.tool.ready_prompt {
        println!("  tool.ready_prompt = {}", prompt.as_str());
    }
    println!("  files.commands = {}", cfg.files.commands.display());
    println!("  files.log = {}", cfg.files.log.display());
    println!("  timing = {:?}", cfg.timing);
    println!();

    match load_batch(&RealFileSystem, &cfg.files.commands) {
        Ok(batch) if batch.is_empty() => println!("batch: no commands"),
        Ok(batch) => {
            let mode = classify(&batch, &cfg.tool.name);
            println!("batch ({} commands, {} mode):", batch.len(), mode);
            for (i, command) in batch.commands().iter().enumerate() {
                println!("  {}. {}", i + 1, command);
            }
        }
        Err(err) => println!("batch: unavailable ({err})"),
    }

    debug!("dry-run complete (no execution)");
}
