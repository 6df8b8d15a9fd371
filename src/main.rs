use clap::Parser;
use printfleet::{FleetNodeConfig, FleetOptions, RpcServer};
use slog::Drain;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Runs a single fleet node that leads from the start.
#[derive(Parser, Debug)]
#[command(name = "printfleet")]
#[command(version, about, long_about = None)]
struct Args {
    /// Id this node reports to clients
    #[arg(long, default_value = "node-1")]
    node_id: String,

    /// Address the gRPC server listens on
    #[arg(short, long, default_value = "127.0.0.1:50051")]
    listen_addr: SocketAddr,

    /// Directory for snapshots; state is kept in memory only when absent
    #[arg(short, long)]
    snapshot_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let logger = create_root_logger();
    let node_id = args.node_id;
    let listen_addr = args.listen_addr;
    let snapshot_directory = args.snapshot_dir;

    let config = FleetNodeConfig {
        node_id: node_id.clone(),
        info_logger: logger.clone(),
        snapshot_directory,
        options: FleetOptions::default(),
    };
    let node = match printfleet::try_create_fleet_node(config).await {
        Ok(node) => node,
        Err(e) => {
            slog::crit!(logger, "Failed to create fleet node: {:?}", e);
            return;
        }
    };
    if let Err(e) = node.engine().become_leader().await {
        slog::crit!(logger, "Failed to take leadership: {:?}", e);
        return;
    }

    let (shutdown_handle, shutdown_signal) = printfleet::shutdown_signal();
    let server = RpcServer::new(logger.clone(), node_id, node.clone());
    let server_task = tokio::spawn(server.run(listen_addr, shutdown_signal));

    let _ = tokio::signal::ctrl_c().await;
    slog::info!(logger, "Shutting down.");
    shutdown_handle.shutdown();
    let _ = server_task.await;

    match node.engine().take_snapshot().await {
        Ok(meta) => slog::info!(logger, "Final snapshot: {:?}", meta),
        Err(e) => slog::warn!(logger, "Final snapshot failed: {:?}", e),
    }
}

fn create_root_logger() -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    slog::Logger::root(drain, slog::o!())
}
