use client::{ClientErr, FcnnClient};
use comms::{
    Code, OnoReceiver, OnoSender, Status,
    msg::Msg,
    specs::fcnn::{LayerWeights, ModelWeights, Request, Shape},
};
use tokio::io::{self, AsyncRead, AsyncWrite};

/// Answers a single call with `reply` and returns the architecture it was asked for.
async fn mock_server<R, W>(
    mut rx: OnoReceiver<R>,
    mut tx: OnoSender<W>,
    reply: Msg<'_>,
) -> io::Result<Vec<usize>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut rx_buf: Vec<u32> = Vec::new();
    let Msg::Request(Request::CreateModel { architecture }) = rx.recv_into(&mut rx_buf).await?
    else {
        panic!("expected a request");
    };

    tx.send(&reply).await?;
    Ok(architecture.layers().to_vec())
}

fn client_and_server() -> (
    FcnnClient<io::ReadHalf<io::DuplexStream>, io::WriteHalf<io::DuplexStream>>,
    (
        OnoReceiver<io::ReadHalf<io::DuplexStream>>,
        OnoSender<io::WriteHalf<io::DuplexStream>>,
    ),
) {
    let (one, two) = io::duplex(4096);
    let (rx, tx) = io::split(one);
    let (rx, tx) = comms::channel(rx, tx);
    let client = FcnnClient::new(rx, tx);

    let (rx, tx) = io::split(two);
    (client, comms::channel(rx, tx))
}

#[tokio::test]
async fn returns_the_response() -> Result<(), ClientErr> {
    let (mut client, (rx, tx)) = client_and_server();

    let model = ModelWeights::new(vec![LayerWeights {
        weights: vec![0.5, 0.25, 0.125],
        shape: Shape::new(3, 1),
    }]);

    let call = client.create_model(vec![1usize, 3].into());
    let server = mock_server(rx, tx, Msg::Response(model.clone()));
    let (got, asked) = tokio::join!(call, server);

    assert_eq!(got?, model);
    assert_eq!(asked?, vec![1, 3]);
    Ok(())
}

#[tokio::test]
async fn propagates_the_status() {
    let (mut client, (rx, tx)) = client_and_server();

    let call = client.create_model(vec![5usize].into());
    let server = mock_server(rx, tx, Msg::Err(Status::internal("invalid architecture")));
    let (got, asked) = tokio::join!(call, server);

    let Err(ClientErr::Status(status)) = got else {
        panic!("expected a status");
    };
    assert_eq!(status.code, Code::Internal);
    assert_eq!(status.message, "invalid architecture");
    assert_eq!(asked.unwrap(), vec![5]);
}

#[tokio::test]
async fn rejects_unexpected_messages() {
    let (mut client, (rx, tx)) = client_and_server();

    let call = client.create_model(vec![2usize, 2].into());
    let echo = Msg::Request(Request::CreateModel {
        architecture: vec![2, 2].into(),
    });
    let server = mock_server(rx, tx, echo);
    let (got, _) = tokio::join!(call, server);

    assert!(matches!(got, Err(ClientErr::UnexpectedMessage("request"))));
}

#[tokio::test]
async fn server_hanging_up_is_an_io_error() {
    let (mut client, server) = client_and_server();
    drop(server);

    let err = client.create_model(vec![2usize, 2].into()).await.unwrap_err();
    assert!(matches!(err, ClientErr::Io(_)));
}
