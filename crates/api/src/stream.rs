use std::pin::Pin;

use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use reqwest::StatusCode;

use crate::error::Result;

/// Largest slice handed to the caller when forwarding an export.
pub const STREAM_CHUNK_SIZE: usize = 1024;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Response whose body has not been read yet.
pub struct StreamResponse {
    pub status: StatusCode,
    body: ByteStream,
}

impl StreamResponse {
    pub fn new(status: StatusCode, body: ByteStream) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn into_chunks(self) -> ByteStream {
        self.body
    }

    /// Drains the body. Only meant for short bodies such as error messages.
    pub async fn text(self) -> Result<String> {
        let mut body = self.body;
        let mut buf = Vec::new();
        while let Some(chunk) = body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Re-slices `inner` so no chunk exceeds `size` bytes. Bytes are never copied or altered.
pub fn rechunk<S>(inner: S, size: usize) -> ByteStream
where
    S: Stream<Item = Result<Bytes>> + Send + 'static,
{
    let size = size.max(1);
    Box::pin(async_stream::stream! {
        let mut inner = Box::pin(inner);
        while let Some(next) = inner.next().await {
            match next {
                Ok(mut chunk) => {
                    while chunk.len() > size {
                        yield Ok(chunk.split_to(size));
                    }
                    if !chunk.is_empty() {
                        yield Ok(chunk);
                    }
                }
                Err(err) => {
                    yield Err(err);
                    break;
                }
            }
        }
    })
}
