use std::collections::VecDeque;

use bytes::Bytes;
use http::header::HeaderMap;

use crate::{helpers, Error, Part, Receiver};

/// Turns reassembled headers and data into owned [`Part`]s.
#[derive(Debug, Default)]
pub(crate) struct PartCollector {
    parts: VecDeque<Part>,
    headers: HeaderMap,
    next_part_idx: usize,
    finished: bool,
    error: Option<Error>,
}

impl PartCollector {
    pub fn new() -> Self {
        PartCollector::default()
    }

    pub fn pop(&mut self) -> Option<Part> {
        self.parts.pop_front()
    }

    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }

    /// Returns `true` once the closing delimiter was seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Receiver for PartCollector {
    fn receive_header(&mut self, name: &str, value: &str) {
        self.receive_raw_header(name.as_bytes(), value.as_bytes());
    }

    fn receive_raw_header(&mut self, name: &[u8], value: &[u8]) {
        if self.error.is_some() {
            return;
        }

        match helpers::convert_raw_header(name, value) {
            Ok((name, value)) => {
                self.headers.append(name, value);
            }
            Err(err) => self.error = Some(err),
        }
    }

    fn receive_data(&mut self, chunk: Bytes) {
        let headers = std::mem::take(&mut self.headers);

        let idx = self.next_part_idx;
        self.next_part_idx += 1;

        trace!("part {} complete: {} bytes", idx, chunk.len());

        self.parts.push_back(Part::new(headers, chunk, idx));
    }

    fn part_begin(&mut self) {
        self.headers.clear();
    }

    fn body_end(&mut self) {
        self.finished = true;
    }
}
