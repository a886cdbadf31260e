use bytes::Bytes;
use futures_util::stream;
use multiparse::{coalesce, Error, Event, Multipart, ParseErrorKind, Parser, SizeLimit, State};

const BASIC: &str = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"My Field\"\r\n\r\nabcd\r\n--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"File Field\"; filename=\"a-text-file.txt\"\r\nContent-Type: text/plain\r\n\r\nHello world\nHello\r\nWorld\rAgain\r\n--X-BOUNDARY--\r\n";

fn char_stream(data: &'static str) -> impl futures_util::Stream<Item = multiparse::Result<Bytes>> {
    stream::iter(
        data.chars()
            .map(|ch| ch.to_string())
            .map(|part| multiparse::Result::Ok(Bytes::copy_from_slice(part.as_bytes()))),
    )
}

#[tokio::test]
async fn test_multipart_basic() {
    let mut m = Multipart::new(char_stream(BASIC), "X-BOUNDARY");

    let mut seen = 0;
    while let Some((idx, part)) = m.next_part_with_idx().await.unwrap() {
        if idx == 0 {
            assert_eq!(part.name(), Some("My Field"));
            assert_eq!(part.file_name(), None);
            assert_eq!(part.content_type(), None);
            assert_eq!(part.index(), 0);

            assert_eq!(part.text(), "abcd");
        } else if idx == 1 {
            assert_eq!(part.name(), Some("File Field"));
            assert_eq!(part.file_name(), Some("a-text-file.txt"));
            assert_eq!(part.content_type(), Some(&mime::TEXT_PLAIN));
            assert_eq!(part.index(), 1);

            assert_eq!(part.text(), "Hello world\nHello\r\nWorld\rAgain");
        }
        seen += 1;
    }

    assert_eq!(seen, 2);
}

#[tokio::test]
async fn test_multipart_single_chunk() {
    let stream = stream::once(async { Result::<&'static str, std::convert::Infallible>::Ok(BASIC) });
    let mut m = Multipart::new(stream, "X-BOUNDARY");

    assert!(m.next_part().await.unwrap().is_some());
    assert!(m.next_part().await.unwrap().is_some());
    assert!(m.next_part().await.unwrap().is_none());
    assert!(m.next_part().await.unwrap().is_none());
}

#[tokio::test]
async fn test_multipart_incomplete() {
    let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"My Field\"\r\n\r\nabcd\r\n--X-BOUNDARY\r\nContent-Type: text/plain\r\n\r\nHello";
    let mut m = Multipart::new(char_stream(data), "X-BOUNDARY");

    let first = m.next_part().await.unwrap().unwrap();
    assert_eq!(first.bytes(), &b"abcd"[..]);

    assert_eq!(m.next_part().await.unwrap_err(), Error::IncompleteStream);
    assert!(m.next_part().await.unwrap().is_none());
}

#[tokio::test]
async fn test_multipart_malformed_header() {
    let data = "--X-BOUNDARY\r\nContent-Type: text/plain\r\n\r\nok\r\n--X-BOUNDARY\r\nX_Field: 1\r\n\r\nnope\r\n--X-BOUNDARY--";
    let mut m = Multipart::new(char_stream(data), "X-BOUNDARY");

    assert_eq!(m.next_part().await.unwrap().unwrap().text(), "ok");

    match m.next_part().await {
        Err(Error::Parse(err)) => {
            assert_eq!(err.kind, ParseErrorKind::InvalidHeaderField(b'_'));
            assert_eq!(err.state, State::HeaderField);
        }
        other => panic!("unexpected result: {:?}", other.map(|p| p.map(|p| p.index()))),
    }

    assert!(m.next_part().await.unwrap().is_none());
}

#[tokio::test]
async fn test_multipart_stream_error() {
    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(b"--X\r\n")),
        Err(std::io::Error::new(std::io::ErrorKind::Other, "connection reset")),
    ];
    let mut m = Multipart::new(stream::iter(chunks), "X");

    match m.next_part().await {
        Err(Error::StreamReadFailed(err)) => assert_eq!(err.to_string(), "connection reset"),
        other => panic!("unexpected result: {:?}", other.is_ok()),
    }
}

#[tokio::test]
async fn test_multipart_size_limits() {
    let limit = SizeLimit::new().per_part(5);
    let mut m = Multipart::with_size_limit(char_stream(BASIC), "X-BOUNDARY", limit);

    assert_eq!(m.next_part().await.unwrap().unwrap().text(), "abcd");
    assert_eq!(m.next_part().await.unwrap_err(), Error::PartSizeExceeded { limit: 5 });
    assert!(m.next_part().await.unwrap().is_none());

    let limit = SizeLimit::new().whole_stream(40);
    let mut m = Multipart::with_size_limit(char_stream(BASIC), "X-BOUNDARY", limit);

    assert_eq!(m.next_part().await.unwrap_err(), Error::StreamSizeExceeded { limit: 40 });
}

#[tokio::test]
async fn test_multipart_invalid_header_value() {
    let data = "--X\r\nX-Bad: a\x01b\r\n\r\ndata\r\n--X--";
    let mut m = Multipart::new(char_stream(data), "X");

    assert!(matches!(m.next_part().await, Err(Error::DecodeHeaderValue { .. })));
}

#[test]
fn test_parser_over_arbitrary_chunking() {
    let body = b"--abcdef12345\r\nContent-Type: application/json\r\n\r\n{\"k\":\"v\"}\r\n--abcdef12345\r\nContent-Type: application/octet-stream\r\n\r\n&&\r\n--abcdef12345--";

    let mut whole = Parser::new("abcdef12345", Vec::<Event>::new());
    assert_eq!(whole.execute(body), body.len());
    let expected = coalesce(whole.into_handler());

    for size in 1..=body.len() {
        let mut parser = Parser::new("abcdef12345", Vec::new());

        for chunk in body.chunks(size) {
            assert_eq!(parser.try_execute(chunk), Ok(chunk.len()), "chunk size {}", size);
        }

        assert!(parser.is_done());
        assert_eq!(coalesce(parser.into_handler()), expected, "chunk size {}", size);
    }
}

#[tokio::test]
async fn test_multipart_quoted_file_name_with_semicolon() {
    let data = "--X\r\nContent-Disposition: form-data; name=\"upload\"; filename=\"a;b.txt\"\r\nX-Trace: caf\u{e9}\r\n\r\nbody\r\n--X--";
    let mut m = Multipart::new(char_stream(data), "X");

    let part = m.next_part().await.unwrap().unwrap();
    assert_eq!(part.name(), Some("upload"));
    assert_eq!(part.file_name(), Some("a;b.txt"));
    assert_eq!(part.headers()["x-trace"].as_bytes(), "caf\u{e9}".as_bytes());
    assert_eq!(part.text(), "body");

    assert!(m.next_part().await.unwrap().is_none());
}
