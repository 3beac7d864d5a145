use std::{env, io};

use client::{DEFAULT_ADDR, FcnnClient};
use comms::specs::fcnn::ArchitectureDescriptor;
use log::info;

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let addr = env::var("FCNN_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let mut layers = env::args()
        .skip(1)
        .map(|arg| {
            arg.parse::<usize>().map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidInput, format!("invalid layer size {arg:?}: {e}"))
            })
        })
        .collect::<io::Result<Vec<_>>>()?;

    if layers.is_empty() {
        layers = vec![5, 10, 10, 1];
    }

    let architecture = ArchitectureDescriptor::new(layers)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let mut client = FcnnClient::connect(&addr).await?;
    info!("connected to {addr}");

    let model = client.create_model(architecture).await?;
    for (i, layer) in model.layers.iter().enumerate() {
        println!("layer {i}: shape {}", layer.shape);
        println!("{:?}", layer.weights);
    }

    client.close().await?;
    Ok(())
}
