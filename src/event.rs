use std::ops::ControlFlow;

use bytes::{Bytes, BytesMut};

use crate::Handler;

/// An owned copy of one [`Handler`] callback.
///
/// `Vec<Event>` implements [`Handler`], which turns the parser's callbacks into
/// a queue that can be inspected after each [`execute`](crate::Parser::execute)
/// call.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use multiparse::{coalesce, Event, Parser};
///
/// let mut parser = Parser::new("X", Vec::new());
/// parser.execute(b"--X\r\nA: b\r\n\r\nhel");
/// parser.execute(b"lo\r\n--X--");
///
/// let events = coalesce(parser.into_handler());
/// assert_eq!(events[4], Event::PartData(Bytes::from_static(b"hello")));
/// assert_eq!(events.last(), Some(&Event::BodyEnd));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    PartDataBegin,
    HeaderField(Bytes),
    HeaderValue(Bytes),
    HeadersComplete,
    PartData(Bytes),
    PartDataEnd,
    BodyEnd,
}

impl Event {
    /// Appends `next` to `self` when both are fragments of the same kind.
    fn append(&mut self, next: &Event) -> bool {
        let (prev, next) = match (self, next) {
            (Event::HeaderField(prev), Event::HeaderField(next))
            | (Event::HeaderValue(prev), Event::HeaderValue(next))
            | (Event::PartData(prev), Event::PartData(next)) => (prev, next),
            _ => return false,
        };

        let mut joined = BytesMut::with_capacity(prev.len() + next.len());
        joined.extend_from_slice(prev);
        joined.extend_from_slice(next);
        *prev = joined.freeze();

        true
    }
}

/// Merges consecutive header-name, header-value and part-data fragments.
///
/// The result does not depend on how the body was split into chunks.
pub fn coalesce<I: IntoIterator<Item = Event>>(events: I) -> Vec<Event> {
    let mut out: Vec<Event> = Vec::new();

    for event in events {
        let merged = match out.last_mut() {
            Some(last) => last.append(&event),
            None => false,
        };

        if !merged {
            out.push(event);
        }
    }

    out
}

impl Handler for Vec<Event> {
    fn on_part_data_begin(&mut self) -> ControlFlow<()> {
        self.push(Event::PartDataBegin);
        ControlFlow::Continue(())
    }

    fn on_header_field(&mut self, field: &[u8]) -> ControlFlow<()> {
        self.push(Event::HeaderField(Bytes::copy_from_slice(field)));
        ControlFlow::Continue(())
    }

    fn on_header_value(&mut self, value: &[u8]) -> ControlFlow<()> {
        self.push(Event::HeaderValue(Bytes::copy_from_slice(value)));
        ControlFlow::Continue(())
    }

    fn on_headers_complete(&mut self) -> ControlFlow<()> {
        self.push(Event::HeadersComplete);
        ControlFlow::Continue(())
    }

    fn on_part_data(&mut self, data: &[u8]) -> ControlFlow<()> {
        self.push(Event::PartData(Bytes::copy_from_slice(data)));
        ControlFlow::Continue(())
    }

    fn on_part_data_end(&mut self) -> ControlFlow<()> {
        self.push(Event::PartDataEnd);
        ControlFlow::Continue(())
    }

    fn on_body_end(&mut self) -> ControlFlow<()> {
        self.push(Event::BodyEnd);
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(s: &'static str) -> Event {
        Event::PartData(Bytes::from_static(s.as_bytes()))
    }

    #[test]
    fn test_coalesce_merges_same_kind_only() {
        let events = vec![
            Event::HeaderField(Bytes::from_static(b"Content-")),
            Event::HeaderField(Bytes::from_static(b"Type")),
            Event::HeaderValue(Bytes::from_static(b"text/")),
            Event::HeaderValue(Bytes::from_static(b"plain")),
            Event::HeadersComplete,
            data("A"),
            data("\r"),
            data("B"),
            Event::PartDataEnd,
            data("C"),
        ];

        assert_eq!(
            coalesce(events),
            vec![
                Event::HeaderField(Bytes::from_static(b"Content-Type")),
                Event::HeaderValue(Bytes::from_static(b"text/plain")),
                Event::HeadersComplete,
                data("A\rB"),
                Event::PartDataEnd,
                data("C"),
            ]
        );
    }

    #[test]
    fn test_coalesce_keeps_notifications() {
        let events = vec![Event::PartDataEnd, Event::PartDataEnd, Event::BodyEnd];
        assert_eq!(coalesce(events.clone()), events);
        assert!(coalesce(Vec::new()).is_empty());
    }
}
