#![no_main]

use libfuzzer_sys::fuzz_target;
use multiparse::Parser;

fuzz_target!(|data: &[u8]| {
    let Some((&split, body)) = data.split_first() else {
        return;
    };

    let mut whole = Parser::new("X-BOUNDARY", ());
    let consumed = whole.execute(body);
    assert!(consumed <= body.len());

    // Where parsing stops must not depend on how the body was fragmented.
    let (head, tail) = body.split_at(split as usize % (body.len() + 1));

    let mut fragmented = Parser::new("X-BOUNDARY", ());
    fragmented.execute(head);
    fragmented.execute(tail);

    assert_eq!(fragmented.byte_count(), whole.byte_count());
    assert_eq!(fragmented.state(), whole.state());
    assert_eq!(fragmented.error().map(|err| err.kind), whole.error().map(|err| err.kind));
});
