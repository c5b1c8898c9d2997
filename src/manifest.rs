//! `META-INF/MANIFEST.MF` field extraction.

use crate::config::{IMPLEMENTATION_VERSION_KEY, MAIN_CLASS_KEY, MAX_MANIFEST_LINE};
use std::io::{self, BufRead, Read};

/// Fields taken from a manifest. `None` means the key was not present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestFields {
    pub main_class: Option<String>,
    pub version: Option<String>,
}

/// Scan a manifest line by line for `Main-Class` and `Implementation-Version`.
///
/// Lines without a colon, or whose value contains another colon, are skipped.
/// This drops continuation lines and anything that isn't a simple pair. When a
/// key repeats, the last value wins.
///
/// A line longer than [`MAX_MANIFEST_LINE`] fails with `InvalidData`, so a
/// manifest without line breaks is never buffered whole.
pub fn parse_manifest<R: BufRead>(mut reader: R) -> io::Result<ManifestFields> {
    let mut fields = ManifestFields::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        // Room for the longest allowed line plus "\r\n"
        let cap = (MAX_MANIFEST_LINE + 2) as u64;
        if reader.by_ref().take(cap).read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let b = trim_line_ending(&line);
        if b.len() > MAX_MANIFEST_LINE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("manifest line longer than {MAX_MANIFEST_LINE} bytes"),
            ));
        }

        let Some(i) = memchr::memchr(b':', b) else {
            continue;
        };
        let (key, value) = (&b[..i], &b[i + 1..]);
        if memchr::memchr(b':', value).is_some() {
            continue;
        }

        if key == MAIN_CLASS_KEY.as_bytes() {
            fields.main_class = Some(decode_value(value));
        } else if key == IMPLEMENTATION_VERSION_KEY.as_bytes() {
            fields.version = Some(decode_value(value));
        }
    }

    Ok(fields)
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn decode_value(value: &[u8]) -> String {
    String::from_utf8_lossy(value).trim().to_string()
}
