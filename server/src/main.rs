use std::io;

use log::info;
use model::RandProvider;
use server::{Dispatcher, FcnnService, Server, ServerConfig};
use tokio::signal;

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let cfg = ServerConfig::from_env()?;
    info!(
        max_workers = cfg.max_workers.get(),
        seeded = cfg.seed.is_some();
        "starting fcnn server with {} weights", cfg.init
    );

    let provider = RandProvider::new(cfg.init, cfg.seed);
    let dispatcher = Dispatcher::new(FcnnService::new(provider), cfg.max_workers.get());
    let server = Server::bind(cfg.addr(), dispatcher).await?;

    tokio::select! {
        ret = server.run() => ret?,
        _ = signal::ctrl_c() => {
            info!("received SIGINT, shutting down");
        }
    }

    Ok(())
}
