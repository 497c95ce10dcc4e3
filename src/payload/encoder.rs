// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Iterated percent-encoding

use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left untouched by [`encode`]: unreserved marks and `/`.
const QUOTE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Percent-encode `payload` `rounds` times, each round encoding the previous
/// round's output. Zero rounds returns the payload unchanged.
pub fn encode(payload: &str, rounds: u32) -> String {
    let mut encoded = payload.to_string();
    for _ in 0..rounds {
        encoded = utf8_percent_encode(&encoded, QUOTE_SET).to_string();
    }
    encoded
}

/// Percent-decode `input` `rounds` times.
///
/// Malformed escapes pass through untouched and invalid UTF-8 is replaced,
/// so decoding never fails.
pub fn decode(input: &str, rounds: u32) -> String {
    let mut decoded = input.to_string();
    for _ in 0..rounds {
        let next = match percent_decode_str(&decoded).decode_utf8_lossy() {
            Cow::Borrowed(_) => break,
            Cow::Owned(s) => s,
        };
        decoded = next;
    }
    decoded
}
