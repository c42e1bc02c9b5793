use clap::Parser;
use drover::Swarm;
use std::{num::NonZeroU32, time::Duration};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(version, about = "Load test for the car/user fleet API")]
struct Args {
    /// Base URL of the API under test, e.g. http://localhost:3002
    #[arg(long, env = "FLEET_HOST")]
    host: String,

    /// Number of concurrent simulated users
    #[arg(long, env = "FLEET_USERS", default_value_t = 1)]
    users: usize,

    /// Users spawned per second
    #[arg(long, env = "FLEET_HATCH_RATE", default_value = "1")]
    hatch_rate: NonZeroU32,

    /// Stop after this long (e.g. `90s`); runs until Ctrl-C otherwise
    #[arg(long, env = "FLEET_RUN_TIME", value_parser = humantime::parse_duration)]
    run_time: Option<Duration>,

    #[arg(long, env = "FLEET_MIN_WAIT", value_parser = humantime::parse_duration, default_value = "5000ms")]
    min_wait: Duration,

    #[arg(long, env = "FLEET_MAX_WAIT", value_parser = humantime::parse_duration, default_value = "9000ms")]
    max_wait: Duration,

    /// Cap on requests per second across all users
    #[arg(long, env = "FLEET_MAX_TPS")]
    max_tps: Option<NonZeroU32>,

    #[arg(long, env = "FLEET_REPORT_INTERVAL", value_parser = humantime::parse_duration, default_value = "5s")]
    report_interval: Duration,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("drover=info,fleet_load=info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let task_set = fleet_load::task_set().set_wait_time(args.min_wait, args.max_wait)?;
    let mut swarm = Swarm::new(task_set)
        .host(&args.host)
        .users(args.users)
        .hatch_rate(args.hatch_rate)
        .report_interval(args.report_interval);
    if let Some(run_time) = args.run_time {
        swarm = swarm.duration(run_time);
    }
    if let Some(max_tps) = args.max_tps {
        swarm = swarm.max_tps(max_tps);
    }

    info!("Swarming {} with {} users", args.host, args.users);
    let stats = swarm.await?;
    println!("{stats}");

    Ok(())
}
