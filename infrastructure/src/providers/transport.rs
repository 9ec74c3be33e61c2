//! HTTP plumbing shared by the wire adapters.

use super::error::ProviderHttpError;
use super::sse::SseLineBuffer;
use duet_application::StreamHandle;
use duet_domain::{Provider, StreamEvent};
use futures::StreamExt;
use reqwest::{RequestBuilder, Response};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Decodes one SSE data payload into an optional text fragment
pub(crate) type ChunkDecoder = fn(&str) -> Result<Option<String>, ProviderHttpError>;

const STREAM_BUFFER: usize = 64;

/// Send a request and fail on non-success status
pub(crate) async fn send(request: RequestBuilder) -> Result<Response, ProviderHttpError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderHttpError::from_status(status.as_u16(), &body))
}

/// Send a request and decode its JSON body
pub(crate) async fn send_json<T: serde::de::DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, ProviderHttpError> {
    let response = send(request).await?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Pump an SSE response body into a [`StreamHandle`].
///
/// Fragments are forwarded in arrival order. A transport or decode failure
/// ends the stream with an error event; fragments already sent stay valid.
pub(crate) fn spawn_sse_pump(
    provider: Provider,
    response: Response,
    decode: ChunkDecoder,
) -> StreamHandle {
    let (tx, rx) = mpsc::channel(STREAM_BUFFER);
    tokio::spawn(async move {
        let event = match pump(response, decode, &tx).await {
            Ok(fragments) => {
                debug!("{} stream finished after {} fragments", provider, fragments);
                StreamEvent::Completed
            }
            Err(PumpError::ReceiverGone) => return,
            Err(PumpError::Provider(e)) => {
                warn!("{} stream failed: {}", provider, e);
                StreamEvent::Error(e.to_string())
            }
        };
        let _ = tx.send(event).await;
    });
    StreamHandle::new(provider, rx)
}

enum PumpError {
    ReceiverGone,
    Provider(ProviderHttpError),
}

impl From<ProviderHttpError> for PumpError {
    fn from(e: ProviderHttpError) -> Self {
        PumpError::Provider(e)
    }
}

async fn pump(
    response: Response,
    decode: ChunkDecoder,
    tx: &mpsc::Sender<StreamEvent>,
) -> Result<usize, PumpError> {
    let mut body = response.bytes_stream();
    let mut sse = SseLineBuffer::new();
    let mut forwarded = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(ProviderHttpError::from)?;
        for data in sse.push(&chunk)? {
            forwarded += forward(&data, decode, tx).await?;
        }
    }
    if let Some(data) = sse.finish()? {
        forwarded += forward(&data, decode, tx).await?;
    }
    Ok(forwarded)
}

async fn forward(
    data: &str,
    decode: ChunkDecoder,
    tx: &mpsc::Sender<StreamEvent>,
) -> Result<usize, PumpError> {
    match decode(data)? {
        Some(text) if !text.is_empty() => {
            tx.send(StreamEvent::Delta(text))
                .await
                .map_err(|_| PumpError::ReceiverGone)?;
            Ok(1)
        }
        _ => Ok(0),
    }
}
