//! Upload transport input and bounded body reads.

use std::fmt::Display;

use crackmes_core::error::CoreError;
use crackmes_core::storage::check_declared_size;
use futures::{Stream, StreamExt};

/// An uploaded artifact as handed over by the transport: the client's file
/// name, the declared content length and the body stream.
pub struct Upload<S> {
    pub filename: String,
    pub declared_len: Option<u64>,
    pub body: S,
}

impl<S> Upload<S> {
    pub fn new(filename: impl Into<String>, declared_len: Option<u64>, body: S) -> Self {
        Self {
            filename: filename.into(),
            declared_len,
            body,
        }
    }

    /// Check the declared length against the upload ceiling without
    /// touching the body.
    pub fn check_size(&self) -> Result<u64, CoreError> {
        check_declared_size(self.declared_len)
    }
}

/// Read exactly `declared` bytes from `body`.
///
/// Never buffers more than the declared length: a body that runs past it
/// or ends short is rejected.
pub async fn read_bounded<S, B, E>(mut body: S, declared: u64) -> Result<Vec<u8>, CoreError>
where
    S: Stream<Item = Result<B, E>> + Unpin + Send,
    B: AsRef<[u8]>,
    E: Display,
{
    let declared = check_declared_size(Some(declared))?;

    let mut buf = Vec::with_capacity(declared as usize);
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| CoreError::Validation(format!("Upload interrupted: {e}")))?;
        let chunk = chunk.as_ref();
        if (buf.len() + chunk.len()) as u64 > declared {
            return Err(CoreError::Validation(format!(
                "Upload body exceeds its declared length of {declared} bytes"
            )));
        }
        buf.extend_from_slice(chunk);
    }

    if buf.len() as u64 != declared {
        return Err(CoreError::Validation(format!(
            "Upload body ended after {} of {declared} declared bytes",
            buf.len()
        )));
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use assert_matches::assert_matches;
    use crackmes_core::storage::MAX_UPLOAD_BYTES;
    use futures::stream;

    use super::*;

    fn chunks(parts: Vec<&'static [u8]>) -> impl Stream<Item = Result<&'static [u8], Infallible>> {
        stream::iter(parts.into_iter().map(Ok))
    }

    #[tokio::test]
    async fn reads_exact_body() {
        let body = read_bounded(chunks(vec![&b"abc"[..], &b"def"[..]]), 6).await.unwrap();
        assert_eq!(body, b"abcdef");
    }

    #[tokio::test]
    async fn rejects_body_longer_than_declared() {
        let result = read_bounded(chunks(vec![&b"abc"[..], &b"def"[..]]), 4).await;
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_short_body() {
        let result = read_bounded(chunks(vec![&b"ab"[..]]), 4).await;
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn stream_errors_become_validation() {
        let body = stream::iter(vec![Ok::<&[u8], &str>(b"ab"), Err("reset by peer")]);
        let result = read_bounded(body, 4).await;
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("reset by peer"));
    }

    #[tokio::test]
    async fn oversized_declaration_never_polls_body() {
        // A stream that would panic if polled.
        let body = stream::poll_fn(|_| -> std::task::Poll<Option<Result<&'static [u8], Infallible>>> {
            panic!("body must not be read")
        });
        let result = read_bounded(body, MAX_UPLOAD_BYTES + 1).await;
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn check_size_uses_declared_length() {
        let upload = Upload::new("a.zip", Some(MAX_UPLOAD_BYTES), ());
        assert_eq!(upload.check_size().unwrap(), MAX_UPLOAD_BYTES);
        let upload = Upload::new("a.zip", Some(MAX_UPLOAD_BYTES + 1), ());
        assert!(upload.check_size().is_err());
    }
}
