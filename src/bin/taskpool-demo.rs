use std::process::exit;
use std::thread;

use clap::Parser;
use log::{error, info};

use taskpool::{Result, WorkerPool};

#[derive(Parser)]
#[command(name = "taskpool-demo", version, about = "Submit print tasks to a worker pool")]
struct Cli {
    /// Number of worker threads (defaults to the logical CPU count)
    #[arg(long, value_name = "COUNT")]
    workers: Option<u32>,

    /// Number of tasks to submit
    #[arg(long, default_value_t = 10, value_name = "COUNT")]
    tasks: u32,
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let workers = cli.workers.unwrap_or_else(|| num_cpus::get() as u32);

    info!("taskpool-demo {}", env!("CARGO_PKG_VERSION"));
    info!("Starting pool with {} workers", workers);

    let pool = WorkerPool::new(workers)?;

    for i in 1..=cli.tasks {
        pool.submit(move || {
            let current = thread::current();
            println!(
                "Task {i} running on thread {}",
                current.name().unwrap_or("<unnamed>")
            );
        })?;
    }

    pool.shutdown();
    info!("All tasks completed");
    Ok(())
}
