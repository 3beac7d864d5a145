pub mod error;

use comms::{
    OnoReceiver, OnoSender,
    msg::Msg,
    specs::fcnn::{ArchitectureDescriptor, ModelWeights, Request},
};
use log::debug;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{
        TcpStream, ToSocketAddrs,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
};

pub use error::{ClientErr, Result};

/// The default address of the `FCNN` service.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8090";

/// A handle to call the `FCNN` service through a single connection.
pub struct FcnnClient<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    rx: OnoReceiver<R>,
    tx: OnoSender<W>,
    rx_buf: Vec<u32>,
}

impl FcnnClient<OwnedReadHalf, OwnedWriteHalf> {
    /// Opens a plaintext connection to the service.
    ///
    /// # Arguments
    /// * `addr` - The address the server listens at.
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (rx, tx) = stream.into_split();
        let (rx, tx) = comms::channel(rx, tx);
        Ok(Self::new(rx, tx))
    }
}

impl<R, W> FcnnClient<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a new `FcnnClient` over an already established channel.
    ///
    /// # Arguments
    /// * `rx` - The receiving end of the communication.
    /// * `tx` - The sending end of the communication.
    pub fn new(rx: OnoReceiver<R>, tx: OnoSender<W>) -> Self {
        Self {
            rx,
            tx,
            rx_buf: Vec::new(),
        }
    }

    /// Asks the service for the weights of a new network.
    ///
    /// # Arguments
    /// * `architecture` - The amount of neurons per layer.
    ///
    /// # Returns
    /// One `LayerWeights` per layer transition, or a `ClientErr::Status` carrying the
    /// failure reported by the service.
    pub async fn create_model(&mut self, architecture: ArchitectureDescriptor) -> Result<ModelWeights> {
        debug!("requesting model with layers {:?}", architecture.layers());

        let msg = Msg::Request(Request::CreateModel { architecture });
        self.tx.send(&msg).await?;

        match self.rx.recv_into(&mut self.rx_buf).await? {
            Msg::Response(model) => Ok(model),
            Msg::Err(status) => Err(status.into()),
            other => Err(ClientErr::UnexpectedMessage(other.kind())),
        }
    }

    /// Hangs up the connection.
    pub async fn close(mut self) -> Result<()> {
        self.tx.shutdown().await?;
        Ok(())
    }
}
