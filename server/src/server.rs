use std::{io, net::SocketAddr};

use log::{debug, info, warn};
use model::ModelProvider;
use tokio::net::{TcpListener, ToSocketAddrs};

use crate::{handler, service::Dispatcher};

/// Accepts plaintext connections and serves each one on its own task.
pub struct Server<P: ModelProvider> {
    listener: TcpListener,
    dispatcher: Dispatcher<P>,
}

impl<P: ModelProvider + 'static> Server<P> {
    /// Binds a new `Server`.
    ///
    /// # Arguments
    /// * `addr` - The address to listen at.
    /// * `dispatcher` - Runs the calls of every connection.
    pub async fn bind<A: ToSocketAddrs>(addr: A, dispatcher: Dispatcher<P>) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            dispatcher,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop forever.
    pub async fn run(self) -> io::Result<()> {
        info!("listening at {}", self.local_addr()?);

        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("failed to accept a connection: {e}");
                    continue;
                }
            };

            debug!("client connected from {addr}");

            let (rx, tx) = stream.into_split();
            let (rx, tx) = comms::channel(rx, tx);
            let dispatcher = self.dispatcher.clone();

            tokio::spawn(async move {
                if let Err(e) = handler::serve_connection(rx, tx, dispatcher).await {
                    warn!("connection with {addr} failed: {e}");
                }

                debug!("client {addr} disconnected");
            });
        }
    }
}
