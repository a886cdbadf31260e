use crate::constants::{self, COLON, CR, HYPHEN, LF, SPACE};
use crate::error::{ParseError, ParseErrorKind};
use crate::lookbehind::Lookbehind;
use crate::{Handler, State};

/// Invokes a notification callback, stopping at `$at` if it breaks.
macro_rules! notify {
    ($parser:ident, $at:expr, $callback:ident) => {
        if $parser.handler.$callback().is_break() {
            return $parser.stop($at, ParseErrorKind::Aborted);
        }
    };
}

/// Invokes a data callback, stopping at `$at` if it breaks.
macro_rules! emit {
    ($parser:ident, $at:expr, $callback:ident, $data:expr) => {
        if $parser.handler.$callback($data).is_break() {
            return $parser.stop($at, ParseErrorKind::Aborted);
        }
    };
}

/// Incremental multipart body parser.
///
/// A `Parser` is bound to one boundary and one [`Handler`]. Feed it the body in
/// chunks of any size through [`execute`](Parser::execute); it resumes where the
/// previous chunk left off and reports headers and part data to the handler as
/// soon as they are seen. Nothing is allocated after construction.
///
/// The handler doubles as the caller's context: reach it with
/// [`handler`](Parser::handler), [`handler_mut`](Parser::handler_mut) or take it
/// back with [`into_handler`](Parser::into_handler).
///
/// # Examples
///
/// ```
/// use multiparse::{coalesce, Event, Parser};
///
/// let body = b"--abc\r\nContent-Type: text/plain\r\n\r\nhi\r\n--abc--";
/// let (head, tail) = body.split_at(20);
///
/// let mut parser = Parser::new("abc", Vec::new());
/// assert_eq!(parser.execute(head), head.len());
/// assert_eq!(parser.execute(tail), tail.len());
/// assert!(parser.is_done());
///
/// let events = coalesce(parser.into_handler());
/// assert_eq!(events.len(), 7);
/// assert_eq!(events[6], Event::BodyEnd);
/// ```
#[derive(Debug)]
pub struct Parser<H> {
    handler: H,
    boundary: Box<[u8]>,
    lookbehind: Lookbehind,
    state: State,
    index: usize,
    byte_count: u64,
    error: Option<ParseError>,
}

impl<H: Handler> Parser<H> {
    /// Creates a parser for parts delimited by `--boundary`.
    ///
    /// The boundary is copied; it must not itself contain `CR` or `LF`.
    pub fn new<B: AsRef<[u8]>>(boundary: B, handler: H) -> Parser<H> {
        let boundary = boundary.as_ref();

        let mut delimiter = Vec::with_capacity(constants::BOUNDARY_EXT.len() + boundary.len());
        delimiter.extend_from_slice(constants::BOUNDARY_EXT.as_bytes());
        delimiter.extend_from_slice(boundary);

        Parser {
            handler,
            lookbehind: Lookbehind::new(delimiter.len()),
            boundary: delimiter.into_boxed_slice(),
            state: State::Start,
            index: 0,
            byte_count: 0,
            error: None,
        }
    }

    /// Parses the next chunk of the body.
    ///
    /// Returns the number of bytes consumed. When this equals `buf.len()` the
    /// chunk was accepted and the next one may be supplied. A smaller value is
    /// the offset of the byte at which malformed input was found or at which
    /// the handler asked to stop; see [`error`](Parser::error) for the reason.
    /// After that the parser refuses further input and returns `0`.
    ///
    /// Trailing bytes after the closing `--boundary--` are consumed and ignored.
    pub fn execute(&mut self, buf: &[u8]) -> usize {
        if self.error.is_some() {
            return 0;
        }

        let len = buf.len();
        let mut i = 0;
        let mut mark = 0;

        // Arms that `continue` without moving `i` hand the current byte to the
        // state they just entered.
        while i < len {
            let c = buf[i];
            let is_last = i == len - 1;

            match self.state {
                State::Start => {
                    self.index = 0;
                    self.state = State::StartBoundary;
                    continue;
                }

                State::StartBoundary => {
                    let boundary_len = self.boundary.len();

                    if self.index == boundary_len {
                        if c != CR {
                            return self.stop(i, ParseErrorKind::InvalidBoundary);
                        }
                        self.index += 1;
                    } else if self.index == boundary_len + 1 {
                        if c != LF {
                            return self.stop(i, ParseErrorKind::InvalidBoundary);
                        }
                        self.index = 0;
                        trace!("opening boundary matched");
                        notify!(self, i, on_part_data_begin);
                        self.state = State::HeaderFieldStart;
                    } else {
                        if c != self.boundary[self.index] {
                            return self.stop(i, ParseErrorKind::InvalidBoundary);
                        }
                        self.index += 1;
                    }
                }

                State::HeaderFieldStart => {
                    // Only a line that starts with `CR` ends the header block.
                    if c == CR {
                        self.state = State::HeadersAlmostDone;
                    } else {
                        mark = i;
                        self.state = State::HeaderField;
                        continue;
                    }
                }

                State::HeaderField => {
                    if c == COLON {
                        emit!(self, i, on_header_field, &buf[mark..i]);
                        self.state = State::HeaderValueStart;
                    } else if !constants::is_header_field_byte(c) {
                        return self.stop(i, ParseErrorKind::InvalidHeaderField(c));
                    } else if is_last {
                        emit!(self, i, on_header_field, &buf[mark..=i]);
                    }
                }

                State::HeadersAlmostDone => {
                    if c != LF {
                        return self.stop(i, ParseErrorKind::MissingLineFeed);
                    }
                    self.state = State::PartDataStart;
                }

                State::HeaderValueStart => {
                    if c != SPACE {
                        mark = i;
                        self.state = State::HeaderValue;
                        continue;
                    }
                }

                State::HeaderValue => {
                    if c == CR {
                        emit!(self, i, on_header_value, &buf[mark..i]);
                        self.state = State::HeaderValueAlmostDone;
                    } else if is_last {
                        emit!(self, i, on_header_value, &buf[mark..=i]);
                    }
                }

                State::HeaderValueAlmostDone => {
                    if c != LF {
                        return self.stop(i, ParseErrorKind::MissingLineFeed);
                    }
                    self.state = State::HeaderFieldStart;
                }

                State::PartDataStart => {
                    notify!(self, i, on_headers_complete);
                    mark = i;
                    self.state = State::PartData;
                    continue;
                }

                State::PartData => {
                    match memchr::memchr(CR, &buf[i..]) {
                        Some(pos) => {
                            let at = i + pos;
                            if at > mark {
                                emit!(self, at, on_part_data, &buf[mark..at]);
                            }
                            self.lookbehind.open();
                            self.state = State::PartDataAlmostBoundary;
                            i = at + 1;
                        }
                        None => {
                            emit!(self, len - 1, on_part_data, &buf[mark..]);
                            i = len;
                        }
                    }
                    continue;
                }

                State::PartDataAlmostBoundary => {
                    if c == LF {
                        self.lookbehind.confirm_line_feed();
                        self.index = 0;
                        self.state = State::PartDataBoundary;
                    } else {
                        emit!(self, i, on_part_data, self.lookbehind.carriage_return());
                        mark = i;
                        self.state = State::PartData;
                        continue;
                    }
                }

                State::PartDataBoundary => {
                    if self.boundary[self.index] != c {
                        emit!(self, i, on_part_data, self.lookbehind.matched(self.index));
                        mark = i;
                        self.state = State::PartData;
                        continue;
                    }

                    self.lookbehind.push_boundary_byte(self.index, c);
                    self.index += 1;

                    if self.index == self.boundary.len() {
                        trace!("part delimiter matched");
                        notify!(self, i, on_part_data_end);
                        self.state = State::PartDataAlmostEnd;
                    }
                }

                State::PartDataAlmostEnd => {
                    if c == HYPHEN {
                        self.state = State::PartDataFinalHyphen;
                    } else if c == CR {
                        self.state = State::PartDataEnd;
                    } else {
                        return self.stop(i, ParseErrorKind::UnexpectedByte(c));
                    }
                }

                State::PartDataFinalHyphen => {
                    if c != HYPHEN {
                        return self.stop(i, ParseErrorKind::UnexpectedByte(c));
                    }
                    trace!("closing delimiter matched");
                    notify!(self, i, on_body_end);
                    self.state = State::End;
                }

                State::PartDataEnd => {
                    if c != LF {
                        return self.stop(i, ParseErrorKind::UnexpectedByte(c));
                    }
                    self.state = State::HeaderFieldStart;
                    notify!(self, i, on_part_data_begin);
                }

                State::End => {
                    i = len;
                    continue;
                }
            }

            i += 1;
        }

        self.byte_count += len as u64;
        len
    }

    /// Like [`execute`](Parser::execute), but turns a short count into an error.
    pub fn try_execute(&mut self, buf: &[u8]) -> crate::Result<usize> {
        let consumed = self.execute(buf);

        match self.error {
            Some(err) if consumed < buf.len() => Err(err.into()),
            _ => Ok(consumed),
        }
    }

    fn stop(&mut self, offset: usize, kind: ParseErrorKind) -> usize {
        let err = ParseError {
            offset,
            state: self.state,
            kind,
        };

        debug!("multipart parser stopped: {}", err);

        self.error = Some(err);
        self.byte_count += offset as u64;
        offset
    }
}

impl<H> Parser<H> {
    /// The boundary as supplied, without the leading `--`.
    pub fn boundary(&self) -> &[u8] {
        &self.boundary[constants::BOUNDARY_EXT.len()..]
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Returns `true` once the closing `--boundary--` has been seen.
    pub fn is_done(&self) -> bool {
        self.state == State::End
    }

    /// The reason the last [`execute`](Parser::execute) call stopped short, if
    /// it did.
    pub fn error(&self) -> Option<ParseError> {
        self.error
    }

    /// Total number of bytes consumed across all `execute` calls.
    pub fn byte_count(&self) -> u64 {
        self.byte_count
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }
}
