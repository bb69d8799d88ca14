// Chunked JSON streaming utilities
use crate::application::streaming_service::StreamMessage;
use crate::infrastructure::chart_mapper::{message_to_chunk, StreamChunk};
use crate::infrastructure::http_response::brotli_compress;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;

/// Create a chunked streaming response of length-prefixed JSON frames
pub async fn chunked_json_stream<S>(stream: S, compress: bool) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = StreamChunk> + Send + 'static,
{
    let byte_stream = stream.then(move |chunk| async move { serialize_chunk(chunk, compress).await });

    let body = Body::from_stream(byte_stream);

    // Frames are compressed one by one, so the response itself carries no
    // Content-Encoding; clients decode each frame after reading its length.
    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson-framed");
    if compress {
        response = response.header("x-frame-encoding", "br");
    }

    response
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize a single chunk to a frame: u32 big-endian length, then payload
async fn serialize_chunk(chunk: StreamChunk, compress: bool) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(&chunk).map_err(std::io::Error::other)?;

    let payload = if compress {
        brotli_compress(json).await?
    } else {
        json
    };

    let length = payload.len() as u32;
    let mut frame = BytesMut::with_capacity(4 + payload.len());
    frame.put_u32(length);
    frame.put_slice(&payload);

    Ok(frame.freeze())
}

/// Helper to create a streaming response from a receiver
pub async fn stream_from_receiver(
    mut rx: tokio::sync::mpsc::Receiver<StreamMessage>,
    compress: bool,
) -> impl IntoResponse {
    let stream = async_stream::stream! {
        while let Some(msg) = rx.recv().await {
            yield message_to_chunk(msg);
        }
    };

    match chunked_json_stream(stream, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
