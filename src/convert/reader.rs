use std::io::{self, BufRead};

/// One physical line read from a dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
	/// Decoded text without its terminator.
	pub content: String,

	/// Whether the line ended with `\n` (or `\r\n`) in the input.
	pub terminated: bool,
}

/// Iterator over the lines of a byte stream, decoding each one as UTF-8.
///
/// Byte sequences that are not valid UTF-8 are dropped rather than replaced,
/// so dumps carrying stray Latin-1 bytes still convert.
///
/// Only `\n` ends a line. A `\r` directly before it is stripped; any other
/// `\r` stays in the line content.
#[derive(Debug)]
pub struct LossyLines<R> {
	reader: R,
	buf: Vec<u8>,
}

impl<R: BufRead> LossyLines<R> {
	/// Wrap a buffered reader; nothing is read until the first `next`.
	pub fn new(reader: R) -> Self {
		LossyLines {
			reader,
			buf: Vec::with_capacity(8 * 1024),
		}
	}
}

impl<R: BufRead> Iterator for LossyLines<R> {
	type Item = io::Result<RawLine>;

	fn next(&mut self) -> Option<Self::Item> {
		self.buf.clear();
		match self.reader.read_until(b'\n', &mut self.buf) {
			Ok(0) => None,
			Ok(_) => {
				let mut bytes = self.buf.as_slice();
				let terminated = bytes.last() == Some(&b'\n');
				if terminated {
					bytes = &bytes[..bytes.len() - 1];
					if bytes.last() == Some(&b'\r') {
						bytes = &bytes[..bytes.len() - 1];
					}
				}
				Some(Ok(RawLine {
					content: decode_lossy(bytes),
					terminated,
				}))
			}
			Err(e) => Some(Err(e)),
		}
	}
}

/// Decode UTF-8, silently discarding invalid sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len());
	for chunk in bytes.utf8_chunks() {
		out.push_str(chunk.valid());
	}
	out
}
