use std::io;

use comms::{
    OnoReceiver, OnoSender, Status,
    msg::Msg,
    specs::fcnn::Request,
};
use log::{debug, error, info, warn};
use model::ModelProvider;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::service::Dispatcher;

/// Serves every call made through a single connection until the peer hangs up.
///
/// Failed calls are answered with an `Internal` status and the connection stays
/// usable, a malformed frame is answered the same way but closes the connection.
///
/// # Arguments
/// * `rx` - The receiving end of the communication.
/// * `tx` - The sending end of the communication.
/// * `dispatcher` - Runs the calls.
///
/// # Errors
/// Returns an `io::Error` if the transport fails.
pub async fn serve_connection<R, W, P>(
    mut rx: OnoReceiver<R>,
    mut tx: OnoSender<W>,
    dispatcher: Dispatcher<P>,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    P: ModelProvider + 'static,
{
    let mut rx_buf: Vec<u32> = Vec::new();

    loop {
        let msg = match rx.recv_into(&mut rx_buf).await {
            Ok(msg) => msg,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                debug!("peer hung up");
                return Ok(());
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!("received a malformed frame: {e}");
                let status = Status::internal(format!("Malformed request: {e}"));
                tx.send(&Msg::Err(status)).await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let reply = match msg {
            Msg::Request(Request::CreateModel { architecture }) => {
                info!("received request with layers {:?}", architecture.layers());

                match dispatcher.create_model(architecture).await {
                    Ok(model) => Msg::Response(model),
                    Err(e) => {
                        error!("failed to create model: {e}");
                        Msg::Err(Status::internal(format!("Error creating model: {e}")))
                    }
                }
            }
            other => {
                warn!("expected a request, got {}", other.kind());
                let message = format!("Expected a request, got a {}", other.kind());
                Msg::Err(Status::unimplemented(message))
            }
        };

        send_reply(&mut tx, &reply).await?;
    }
}

/// Sends `reply`, falling back to an `Internal` status when it can't be framed.
///
/// `OnoSender::send` rejects such messages before writing anything, so the stream is
/// still in sync for the fallback.
async fn send_reply<W>(tx: &mut OnoSender<W>, reply: &Msg<'_>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    match tx.send(reply).await {
        Err(e) if e.kind() == io::ErrorKind::InvalidInput => {
            error!("failed to send the {} reply: {e}", reply.kind());
            let status = Status::internal(format!("Error sending model: {e}"));
            tx.send(&Msg::Err(status)).await
        }
        res => res,
    }
}
