use clap::{Parser, Subcommand};
use flatboat_domain::config::CliOverrides;
use flatboat_infrastructure::dns::DnsServerHandler;
use flatboat_jobs::{JobRunner, RecordRetentionJob, RequestLogRetentionJob, WalCheckpointJob};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod bootstrap;
mod di;
mod records;
mod server;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "flatboat")]
#[command(version)]
#[command(about = "flatboat - self-service dynamic DNS authority")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long, global = true)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long, global = true)]
    bind: Option<String>,

    /// Database path
    #[arg(long, global = true)]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the DNS server (default)
    Serve,

    /// Manage the records of one subdomain
    #[command(subcommand)]
    Records(records::RecordsCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        database_path: cli.database.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    let database_url = format!("sqlite:{}", config.database.path);
    let (write_pool, read_pool) = bootstrap::init_database(&database_url, &config.database).await?;

    let repos = di::Repositories::new(write_pool, read_pool, &config).await?;
    let use_cases = di::UseCases::new(&repos, &config)?;

    if let Some(Command::Records(command)) = cli.command {
        return records::run(command, &repos, &use_cases).await;
    }

    info!("Starting flatboat v{}", env!("CARGO_PKG_VERSION"));
    info!(
        zone = %repos.zone.apex(),
        serial = repos.serial_value(),
        overrides = use_cases.override_count,
        "Zone loaded"
    );

    let shutdown = CancellationToken::new();

    if config.housekeeping.enabled {
        let housekeeping = &config.housekeeping;
        JobRunner::new()
            .with_record_retention(
                RecordRetentionJob::new(
                    use_cases.prune_records.clone(),
                    housekeeping.record_retention_hours,
                )
                .with_interval(housekeeping.interval_secs),
            )
            .with_request_log_retention(
                RequestLogRetentionJob::new(
                    use_cases.cleanup_requests.clone(),
                    housekeeping.request_retention_hours,
                )
                .with_interval(housekeeping.interval_secs),
            )
            .with_wal_checkpoint(WalCheckpointJob::new(
                repos.write_pool.clone(),
                housekeeping.wal_checkpoint_interval_secs,
            ))
            .with_shutdown_token(shutdown.clone())
            .start()
            .await;
    } else {
        warn!("Housekeeping disabled; records and request logs are kept forever");
    }

    let mut handler = DnsServerHandler::new(use_cases.resolve.clone(), repos.zone.clone());
    if config.database.log_requests {
        handler = handler.with_audit(repos.request_log.clone(), bootstrap::node_hostname());
    }

    let dns_addr = format!("{}:{}", config.server.bind_address, config.server.dns_port);
    let tcp_idle_timeout = Duration::from_secs(config.server.tcp_idle_timeout_secs);

    tokio::select! {
        result = server::start_dns_server(
            dns_addr,
            handler,
            config.server.udp_workers,
            tcp_idle_timeout,
        ) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    shutdown.cancel();
    info!("Server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_is_default() {
        let cli = Cli::try_parse_from(["flatboat", "--dns-port", "5353"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.dns_port, Some(5353));
    }

    #[test]
    fn test_records_subcommand_parses() {
        let cli =
            Cli::try_parse_from(["flatboat", "records", "delete", "abc", "7", "-c", "x.toml"])
                .unwrap();
        assert_eq!(cli.config.as_deref(), Some("x.toml"));
        assert!(matches!(
            cli.command,
            Some(Command::Records(records::RecordsCommand::Delete { id: 7, .. }))
        ));
    }
}
