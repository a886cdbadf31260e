use std::ops::ControlFlow;

use bytes::{Bytes, BytesMut};

use crate::Handler;

/// Receives whole headers and whole part bodies from a [`Consumer`].
///
/// Only [`receive_header`](Receiver::receive_header) and
/// [`receive_data`](Receiver::receive_data) are required; the part and body
/// notifications default to doing nothing.
pub trait Receiver {
    /// One complete header of the current part.
    ///
    /// Header values that are not valid UTF-8 are decoded lossily.
    fn receive_header(&mut self, name: &str, value: &str);

    /// One complete header of the current part, exactly as it appeared in the
    /// body. Forwards to [`receive_header`](Receiver::receive_header) unless
    /// overridden.
    fn receive_raw_header(&mut self, name: &[u8], value: &[u8]) {
        self.receive_header(&String::from_utf8_lossy(name), &String::from_utf8_lossy(value));
    }

    /// The complete data of the current part.
    fn receive_data(&mut self, chunk: Bytes);

    /// A new part starts.
    fn part_begin(&mut self) {}

    /// The current part is complete; called right after
    /// [`receive_data`](Receiver::receive_data).
    fn part_end(&mut self) {}

    /// The closing delimiter was seen.
    fn body_end(&mut self) {}
}

impl<R: Receiver + ?Sized> Receiver for &mut R {
    fn receive_header(&mut self, name: &str, value: &str) {
        (**self).receive_header(name, value)
    }

    fn receive_raw_header(&mut self, name: &[u8], value: &[u8]) {
        (**self).receive_raw_header(name, value)
    }

    fn receive_data(&mut self, chunk: Bytes) {
        (**self).receive_data(chunk)
    }

    fn part_begin(&mut self) {
        (**self).part_begin()
    }

    fn part_end(&mut self) {
        (**self).part_end()
    }

    fn body_end(&mut self) {
        (**self).body_end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Nothing,
    Name,
    Value,
}

/// A [`Handler`] that joins the parser's fragments back together.
///
/// Header name and value fragments are concatenated and handed to the
/// [`Receiver`] as one pair once the header is known to be complete, that is
/// when the next header name starts or the header block ends. Part data is
/// accumulated and handed over in one piece when the part's closing delimiter
/// is matched.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use multiparse::{Consumer, Parser, Receiver};
///
/// #[derive(Default)]
/// struct Decoded(String);
///
/// impl Receiver for Decoded {
///     fn receive_header(&mut self, name: &str, value: &str) {
///         self.0.push_str(&format!("{}={}\n", name, value));
///     }
///
///     fn receive_data(&mut self, chunk: Bytes) {
///         self.0.push_str(&String::from_utf8_lossy(&chunk));
///         self.0.push('\n');
///     }
/// }
///
/// let body = b"--X\r\nContent-Type: text/plain\r\n\r\nhello\r\n--X--";
/// let mut parser = Parser::new("X", Consumer::new(Decoded::default()));
///
/// for chunk in body.chunks(3) {
///     parser.execute(chunk);
/// }
///
/// assert_eq!(parser.into_handler().into_receiver().0, "Content-Type=text/plain\nhello\n");
/// ```
#[derive(Debug)]
pub struct Consumer<R> {
    receiver: R,
    name: BytesMut,
    value: BytesMut,
    data: BytesMut,
    pending: Pending,
    part_size_limit: u64,
    part_size_exceeded: bool,
}

impl<R: Receiver> Consumer<R> {
    pub fn new(receiver: R) -> Consumer<R> {
        Consumer {
            receiver,
            name: BytesMut::new(),
            value: BytesMut::new(),
            data: BytesMut::new(),
            pending: Pending::Nothing,
            part_size_limit: u64::MAX,
            part_size_exceeded: false,
        }
    }

    /// Stops parsing once a single part's data grows beyond `limit` bytes.
    pub fn with_part_size_limit(mut self, limit: u64) -> Consumer<R> {
        self.part_size_limit = limit;
        self
    }

    /// Returns the limit if parsing was stopped because a part outgrew it.
    pub fn exceeded_part_size_limit(&self) -> Option<u64> {
        if self.part_size_exceeded {
            Some(self.part_size_limit)
        } else {
            None
        }
    }

    pub fn receiver(&self) -> &R {
        &self.receiver
    }

    pub fn receiver_mut(&mut self) -> &mut R {
        &mut self.receiver
    }

    pub fn into_receiver(self) -> R {
        self.receiver
    }

    fn flush_header(&mut self) {
        if self.pending == Pending::Nothing {
            return;
        }

        self.receiver.receive_raw_header(&self.name, &self.value);

        self.name.clear();
        self.value.clear();
        self.pending = Pending::Nothing;
    }
}

impl<R: Receiver> Handler for Consumer<R> {
    fn on_part_data_begin(&mut self) -> ControlFlow<()> {
        self.data.clear();
        self.receiver.part_begin();
        ControlFlow::Continue(())
    }

    fn on_header_field(&mut self, field: &[u8]) -> ControlFlow<()> {
        if self.pending == Pending::Value {
            self.flush_header();
        }

        self.name.extend_from_slice(field);
        self.pending = Pending::Name;
        ControlFlow::Continue(())
    }

    fn on_header_value(&mut self, value: &[u8]) -> ControlFlow<()> {
        self.value.extend_from_slice(value);
        self.pending = Pending::Value;
        ControlFlow::Continue(())
    }

    fn on_headers_complete(&mut self) -> ControlFlow<()> {
        self.flush_header();
        ControlFlow::Continue(())
    }

    fn on_part_data(&mut self, data: &[u8]) -> ControlFlow<()> {
        if (self.data.len() + data.len()) as u64 > self.part_size_limit {
            self.part_size_exceeded = true;
            return ControlFlow::Break(());
        }

        self.data.extend_from_slice(data);
        ControlFlow::Continue(())
    }

    fn on_part_data_end(&mut self) -> ControlFlow<()> {
        let data = self.data.split().freeze();
        self.receiver.receive_data(data);
        self.receiver.part_end();
        ControlFlow::Continue(())
    }

    fn on_body_end(&mut self) -> ControlFlow<()> {
        self.receiver.body_end();
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;

    #[derive(Debug, Default, PartialEq)]
    struct Log {
        headers: Vec<(String, String)>,
        data: Vec<Bytes>,
        parts: usize,
        ended: bool,
    }

    impl Receiver for Log {
        fn receive_header(&mut self, name: &str, value: &str) {
            self.headers.push((name.to_owned(), value.to_owned()));
        }

        fn receive_data(&mut self, chunk: Bytes) {
            self.data.push(chunk);
        }

        fn part_begin(&mut self) {
            self.parts += 1;
        }

        fn body_end(&mut self) {
            self.ended = true;
        }
    }

    const BODY: &[u8] = b"--abcdef12345\r\nContent-Type: application/json\r\nX-Trace: a\xffb\r\n\r\n{\"k\":\"v\"}\r\n--abcdef12345\r\nContent-Type: application/octet-stream\r\n\r\n&\r&\r\n--abcdef12345--";

    fn decode(chunk_size: usize) -> Log {
        let mut parser = Parser::new("abcdef12345", Consumer::new(Log::default()));

        for chunk in BODY.chunks(chunk_size) {
            assert_eq!(parser.execute(chunk), chunk.len());
        }

        parser.into_handler().into_receiver()
    }

    #[test]
    fn test_consumer_reassembles_fragments() {
        let expected = Log {
            headers: vec![
                ("Content-Type".to_owned(), "application/json".to_owned()),
                ("X-Trace".to_owned(), "a\u{FFFD}b".to_owned()),
                ("Content-Type".to_owned(), "application/octet-stream".to_owned()),
            ],
            data: vec![Bytes::from_static(b"{\"k\":\"v\"}"), Bytes::from_static(b"&\r&")],
            parts: 2,
            ended: true,
        };

        for chunk_size in 1..=BODY.len() {
            assert_eq!(decode(chunk_size), expected, "chunk size {}", chunk_size);
        }
    }

    #[test]
    fn test_consumer_part_size_limit() {
        let consumer = Consumer::new(Log::default()).with_part_size_limit(4);
        let mut parser = Parser::new("abcdef12345", consumer);

        let consumed = parser.execute(BODY);

        assert!(consumed < BODY.len());
        assert!(parser.error().unwrap().kind.is_abort());
        assert_eq!(parser.handler().exceeded_part_size_limit(), Some(4));
        assert!(parser.handler().receiver().data.is_empty());
    }

    #[test]
    fn test_consumer_within_part_size_limit() {
        let consumer = Consumer::new(Log::default()).with_part_size_limit(9);
        let mut parser = Parser::new("abcdef12345", consumer);

        assert_eq!(parser.execute(BODY), BODY.len());
        assert_eq!(parser.handler().exceeded_part_size_limit(), None);
    }
}
