use std::future::poll_fn;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::stream::{Stream, TryStreamExt};
#[cfg(feature = "tokio-io")]
use tokio::io::AsyncRead;
#[cfg(feature = "tokio-io")]
use tokio_util::io::ReaderStream;

use crate::collector::PartCollector;
use crate::{Consumer, Error, Parser, Part, SizeLimit};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Represents the implementation of `multipart/form-data` formatted data.
///
/// This feeds the chunks of the source stream to a [`Parser`] as they arrive
/// and yields each [`Part`] once its closing delimiter has been parsed, via its
/// [`Stream`] implementation or [`next_part`](Multipart::next_part).
///
/// Each part's data is held in memory until the part is complete; use
/// [`SizeLimit`] to bound it, or drive a [`Parser`] directly to process data
/// as it streams in.
///
/// # Examples
///
/// ```
/// use multiparse::Multipart;
/// use bytes::Bytes;
/// use std::convert::Infallible;
/// use futures_util::stream::once;
///
/// # async fn run() {
/// let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
/// let stream = once(async move { Result::<Bytes, Infallible>::Ok(Bytes::from(data)) });
/// let mut multipart = Multipart::new(stream, "X-BOUNDARY");
///
/// while let Some(part) = multipart.next_part().await.unwrap() {
///     println!("Part: {:?}", part.text())
/// }
/// # }
/// # tokio::runtime::Runtime::new().unwrap().block_on(run());
/// ```
pub struct Multipart<'r> {
    stream: Pin<Box<dyn Stream<Item = Result<Bytes, Error>> + Send + 'r>>,
    parser: Parser<Consumer<PartCollector>>,
    size_limit: SizeLimit,
    stream_size_counter: u64,
    eof: bool,
    pending_error: Option<Error>,
    failed: bool,
}

impl<'r> Multipart<'r> {
    /// Construct a new `Multipart` instance with the given [`Bytes`] stream and
    /// the boundary.
    pub fn new<S, O, E, B>(stream: S, boundary: B) -> Self
    where
        S: Stream<Item = Result<O, E>> + Send + 'r,
        O: Into<Bytes> + 'static,
        E: Into<BoxError> + 'r,
        B: Into<String>,
    {
        Multipart::with_size_limit(stream, boundary, SizeLimit::default())
    }

    /// Construct a new `Multipart` instance with the given [`Bytes`] stream,
    /// the boundary and the size limits.
    pub fn with_size_limit<S, O, E, B>(stream: S, boundary: B, size_limit: SizeLimit) -> Self
    where
        S: Stream<Item = Result<O, E>> + Send + 'r,
        O: Into<Bytes> + 'static,
        E: Into<BoxError> + 'r,
        B: Into<String>,
    {
        let stream = stream
            .map_ok(|b| b.into())
            .map_err(|err| Error::StreamReadFailed(err.into()));

        let boundary: String = boundary.into();
        let consumer = Consumer::new(PartCollector::new()).with_part_size_limit(size_limit.per_part);

        Multipart {
            stream: Box::pin(stream),
            parser: Parser::new(boundary, consumer),
            size_limit,
            stream_size_counter: 0,
            eof: false,
            pending_error: None,
            failed: false,
        }
    }

    /// Construct a new `Multipart` instance with the given
    /// [`AsyncRead`](tokio::io::AsyncRead) reader and the boundary.
    ///
    /// # Optional
    ///
    /// This requires the optional `tokio-io` feature to be enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiparse::Multipart;
    ///
    /// # async fn run() {
    /// let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
    /// let reader = data.as_bytes();
    /// let mut multipart = Multipart::with_reader(reader, "X-BOUNDARY");
    ///
    /// while let Some(part) = multipart.next_part().await.unwrap() {
    ///     println!("Part: {:?}", part.bytes());
    /// }
    /// # }
    /// # tokio::runtime::Runtime::new().unwrap().block_on(run());
    /// ```
    #[cfg(feature = "tokio-io")]
    pub fn with_reader<R, B>(reader: R, boundary: B) -> Self
    where
        R: AsyncRead + Send + 'r,
        B: Into<String>,
    {
        let stream = ReaderStream::new(reader);
        Multipart::new(stream, boundary)
    }

    /// Construct a new `Multipart` instance with the given
    /// [`AsyncRead`](tokio::io::AsyncRead) reader, the boundary and the size
    /// limits.
    ///
    /// # Optional
    ///
    /// This requires the optional `tokio-io` feature to be enabled.
    #[cfg(feature = "tokio-io")]
    pub fn with_reader_with_size_limit<R, B>(reader: R, boundary: B, size_limit: SizeLimit) -> Self
    where
        R: AsyncRead + Send + 'r,
        B: Into<String>,
    {
        let stream = ReaderStream::new(reader);
        Multipart::with_size_limit(stream, boundary, size_limit)
    }

    /// Yields the next [`Part`] if available.
    pub async fn next_part(&mut self) -> crate::Result<Option<Part>> {
        poll_fn(|cx| Pin::new(&mut *self).poll_next(cx)).await.transpose()
    }

    /// Yields the next [`Part`] with its positioning index as a tuple
    /// `(usize, Part)`.
    pub async fn next_part_with_idx(&mut self) -> crate::Result<Option<(usize, Part)>> {
        self.next_part().await.map(|p| p.map(|part| (part.index(), part)))
    }

    fn feed(&mut self, chunk: &[u8]) -> crate::Result<()> {
        self.stream_size_counter += chunk.len() as u64;

        if self.stream_size_counter > self.size_limit.whole_stream {
            return Err(Error::StreamSizeExceeded {
                limit: self.size_limit.whole_stream,
            });
        }

        let consumed = self.parser.execute(chunk);

        if let Some(err) = self.parser.handler_mut().receiver_mut().take_error() {
            return Err(err);
        }

        if consumed < chunk.len() {
            if let Some(limit) = self.parser.handler().exceeded_part_size_limit() {
                return Err(Error::PartSizeExceeded { limit });
            }

            return Err(match self.parser.error() {
                Some(err) => Error::Parse(err),
                None => Error::IncompleteStream,
            });
        }

        Ok(())
    }

    fn fail(&mut self, err: Error) -> Poll<Option<crate::Result<Part>>> {
        debug!("multipart stream failed: {}", err);
        self.failed = true;
        Poll::Ready(Some(Err(err)))
    }
}

impl Stream for Multipart<'_> {
    type Item = Result<Part, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if this.failed {
                return Poll::Ready(None);
            }

            // Parts completed before a failure are still handed out first.
            if let Some(part) = this.parser.handler_mut().receiver_mut().pop() {
                return Poll::Ready(Some(Ok(part)));
            }

            if let Some(err) = this.pending_error.take() {
                return this.fail(err);
            }

            if this.parser.handler().receiver().is_finished() {
                return Poll::Ready(None);
            }

            if this.eof {
                return this.fail(Error::IncompleteStream);
            }

            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    if let Err(err) = this.feed(&chunk) {
                        this.pending_error = Some(err);
                    }
                }
                Poll::Ready(Some(Err(err))) => return this.fail(err),
                Poll::Ready(None) => this.eof = true,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
