//! Byte-level detectors run against raw `.class` contents.
//!
//! No class-file parsing happens here. Both checks are plain substring
//! searches, so repackaged or obfuscated classes can evade them.

use memchr::memmem;

/// `<init>` as it appears in the constant pool.
const CONSTRUCTOR_PREFIX: &[u8] = b"<init>";

/// `(Ljava/lang/String;Ljavax/naming/Context;)V`, the descriptor of the
/// pre-2.15 JndiManager constructor.
const CONSTRUCTOR_SUFFIX: &[u8] = b"(Ljava/lang/String;Ljavax/naming/Context;)V";

/// Bytes allowed between prefix and suffix. Covers the constant-pool tag and
/// length operands that sit between the two strings.
const MAX_GAP: usize = 3;

/// Method added to JndiManager by the 2.16 fix.
///
/// There is nothing that was *removed* in 2.16 to look for instead, so this
/// will miss a release that renames the method. The constructor rule still
/// catches everything older than 2.15.
const PATCHED_MARKER: &[u8] = b"isJndiEnabled";

/// Matches the third-party YARA rule for the old JndiManager constructor:
///
/// ```text
/// 3c 69 6e 69 74 3e ?? ?? ?? 28 4c 6a 61 76 61 2f 6c 61 6e 67 2f 53 74 72 69
/// 6e 67 3b 4c 6a 61 76 61 78 2f 6e 61 6d 69 6e 67 2f 43 6f 6e 74 65 78 74 3b
/// 29 56
/// ```
///
/// with the wildcard run relaxed to at most [`MAX_GAP`] bytes.
pub fn matches_constructor_signature(content: &[u8]) -> bool {
    let prefix = memmem::Finder::new(CONSTRUCTOR_PREFIX);
    let suffix = memmem::Finder::new(CONSTRUCTOR_SUFFIX);

    let mut start = 0;
    while let Some(i) = prefix.find(&content[start..]) {
        let after_prefix = start + i + CONSTRUCTOR_PREFIX.len();
        if after_prefix >= content.len() {
            return false;
        }
        // Only the nearest suffix matters: a later one can't be closer.
        let Some(gap) = suffix.find(&content[after_prefix..]) else {
            return false;
        };
        if gap <= MAX_GAP {
            return true;
        }
        start = after_prefix;
    }
    false
}

/// Returns true if a JndiManager class is from 2.16 or later.
pub fn matches_patched_marker(content: &[u8]) -> bool {
    memmem::find(content, PATCHED_MARKER).is_some()
}
