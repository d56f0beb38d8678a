//! Test helpers

use jiff::Timestamp;
use pantry::items::{ItemSnapshot, LineItem};
use testresult::TestResult;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};
use uuid::Uuid;

/// Snapshot of a fresh product sold "each".
pub(crate) fn snapshot(name: &str, price: u64) -> ItemSnapshot {
    ItemSnapshot {
        product_uuid: Uuid::now_v7(),
        name: name.to_string(),
        price,
        original_price: None,
        unit: "each".to_string(),
        image: format!("{}.png", name.to_lowercase().replace(' ', "-")),
    }
}

pub(crate) fn line(snapshot: ItemSnapshot, quantity: u32) -> LineItem {
    snapshot.into_line_item(quantity, Timestamp::UNIX_EPOCH)
}

/// Answer exactly one HTTP request with a canned response. The task yields the raw
/// request head it received.
pub(crate) async fn serve_once(
    status: &'static str,
    body: String,
) -> TestResult<(String, JoinHandle<std::io::Result<String>>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        let (mut socket, _peer) = listener.accept().await?;
        let mut buffer = vec![0_u8; 16 * 1024];
        let read = socket.read(&mut buffer).await?;

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        socket.write_all(response.as_bytes()).await?;
        socket.shutdown().await?;

        let head = buffer.get(..read).unwrap_or_default();

        Ok::<_, std::io::Error>(String::from_utf8_lossy(head).into_owned())
    });

    Ok((format!("http://{addr}"), handle))
}
