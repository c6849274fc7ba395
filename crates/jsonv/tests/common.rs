#![allow(missing_docs)]
#![allow(dead_code)]

use std::io::{self, Read};

pub const ORIGINAL: &str = r#"
{
    "moderation": {
        "decision": "allow",
        "reason": null
    },
    "request": {
        "filename": "example.rs",
        "language": "rust",
        "options": {
            "opt_level": 2,
            "features": [
                "serde",
                "tokio"
            ]
        }
    },
    "snippets": [
        "fn main() {}",
        "println!(\"hi\")"
    ],
    "entities": [
        {
            "type": "function",
            "name": "main"
        },
        {
            "type": "macro",
            "name": "println"
        }
    ],
    "matrix": [
        [
            "a"
        ]
    ],
    "trailing": {
        "status": "ok"
    }
}"#;

// Chunks are cut on token seams and inside tokens to exercise buffer
// refills at every position the scanner can stop.
#[rustfmt::skip]
pub const STREAM: [&str; 14] = [
    r#"{"moderation":{"decision":"al"#,
    r#"lo"#,
    r#"w","reason":null},""#,
    r#"request":{"filename":"example.rs""#,
    r#","language":"rust","#,
    r#""options":{"opt_level":2"#,
    r#","features":["serde""#,
    r#","tokio"]}"#,
    r#"}"#,
    r#","snippets":["fn main() {}","#,
    r#""println!(\"hi\")"]"#,
    r#","entities":[{"type":"function","name":"main"},{"type":"macro","name":"println"}]"#,
    r#","matrix":[["a"]],"trailing":{"status":"o"#,
    r#"k"}}"#,
];

/// Yields one chunk per `read` call, like a socket delivering frames.
pub struct ChunkedReader<'a> {
    chunks: std::slice::Iter<'a, &'a str>,
    pending: &'a [u8],
}

impl<'a> ChunkedReader<'a> {
    pub fn new(chunks: &'a [&'a str]) -> Self {
        Self {
            chunks: chunks.iter(),
            pending: &[],
        }
    }
}

impl Read for ChunkedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            match self.chunks.next() {
                Some(chunk) => self.pending = chunk.as_bytes(),
                None => return Ok(0),
            }
        }
        let n = self.pending.len().min(buf.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending = &self.pending[n..];
        Ok(n)
    }
}

#[test]
fn assert_stream_example() {
    let streamed = STREAM.join("");

    let value: serde_json::Value = serde_json::from_str(ORIGINAL).unwrap();
    let original = serde_json::to_string(&value).unwrap();

    assert_eq!(streamed, original);
}
