//! Length-prefixed text messages in the `DataOutput.writeUTF` layout: a
//! big-endian `u16` byte count followed by the string in modified UTF-8.
//!
//! Modified UTF-8 differs from standard UTF-8 in two places. NUL is written
//! as the two bytes `C0 80`, and characters outside the BMP are written as a
//! UTF-16 surrogate pair with each half taking three bytes.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, ErrorKind, Read, Write};

pub const MAX_LEN: usize = u16::MAX as usize;

/// Number of payload bytes `s` takes on the wire, without the prefix.
pub fn encoded_len(s: &str) -> usize {
    s.encode_utf16().map(unit_len).sum()
}

fn unit_len(unit: u16) -> usize {
    match unit {
        0x0001..=0x007f => 1,
        0x0000 | 0x0080..=0x07ff => 2,
        _ => 3,
    }
}

/// Writes one message. Nothing is written if the payload does not fit the prefix.
pub fn write_utf<W: Write>(w: &mut W, s: &str) -> io::Result<()> {
    let len = encoded_len(s);
    if len > MAX_LEN {
        return Err(io::Error::new(
            ErrorKind::InvalidInput,
            format!("encoded string too long: {} bytes", len),
        ));
    }

    let mut buf = Vec::with_capacity(len + 2);
    buf.write_u16::<BigEndian>(len as u16)?;
    for unit in s.encode_utf16() {
        match unit_len(unit) {
            1 => buf.push(unit as u8),
            2 => {
                buf.push(0xc0 | ((unit >> 6) & 0x1f) as u8);
                buf.push(0x80 | (unit & 0x3f) as u8);
            }
            _ => {
                buf.push(0xe0 | ((unit >> 12) & 0x0f) as u8);
                buf.push(0x80 | ((unit >> 6) & 0x3f) as u8);
                buf.push(0x80 | (unit & 0x3f) as u8);
            }
        }
    }
    w.write_all(&buf)
}

/// Reads exactly one message.
pub fn read_utf<R: Read>(r: &mut R) -> io::Result<String> {
    let len = r.read_u16::<BigEndian>()? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    decode(&buf)
}

fn decode(buf: &[u8]) -> io::Result<String> {
    let mut units = Vec::with_capacity(buf.len());
    let mut i = 0;
    while i < buf.len() {
        let b = buf[i];
        match b >> 4 {
            0..=7 => {
                units.push(b as u16);
                i += 1;
            }
            12 | 13 => {
                let b2 = continuation(buf, i, 1)?;
                units.push(((b as u16 & 0x1f) << 6) | (b2 as u16 & 0x3f));
                i += 2;
            }
            14 => {
                let b2 = continuation(buf, i, 1)?;
                let b3 = continuation(buf, i, 2)?;
                units.push(
                    ((b as u16 & 0x0f) << 12) | ((b2 as u16 & 0x3f) << 6) | (b3 as u16 & 0x3f),
                );
                i += 3;
            }
            _ => return Err(malformed(i)),
        }
    }

    String::from_utf16(&units)
        .map_err(|e| io::Error::new(ErrorKind::InvalidData, format!("unpaired surrogate: {}", e)))
}

fn continuation(buf: &[u8], start: usize, offset: usize) -> io::Result<u8> {
    match buf.get(start + offset) {
        Some(&b) if b & 0xc0 == 0x80 => Ok(b),
        Some(_) => Err(malformed(start + offset)),
        None => Err(io::Error::new(
            ErrorKind::InvalidData,
            "malformed input: partial character at end",
        )),
    }
}

fn malformed(at: usize) -> io::Error {
    io::Error::new(
        ErrorKind::InvalidData,
        format!("malformed input around byte {}", at),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(s: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        write_utf(&mut buf, s).unwrap();
        buf
    }

    #[test]
    fn test_ascii_layout() {
        assert_eq!(encode("A 0"), vec![0, 3, b'A', b' ', b'0']);
        assert_eq!(encode(""), vec![0, 0]);
    }

    #[test]
    fn test_nul_uses_two_bytes() {
        assert_eq!(encode("a\0"), vec![0, 3, b'a', 0xc0, 0x80]);
        assert_eq!(encoded_len("\0"), 2);
    }

    #[test]
    fn test_supplementary_as_surrogates() {
        // U+1F600 is D83D DE00 in UTF-16.
        assert_eq!(
            encode("\u{1f600}"),
            vec![0, 6, 0xed, 0xa0, 0xbd, 0xed, 0xb8, 0x80]
        );
    }

    #[test]
    fn test_two_and_three_byte_forms() {
        assert_eq!(encode("é"), vec![0, 2, 0xc3, 0xa9]);
        assert_eq!(encode("€"), vec![0, 3, 0xe2, 0x82, 0xac]);
    }

    #[test]
    fn test_reads_one_message_at_a_time() {
        let mut wire = encode("ping 0");
        wire.extend(encode("olá\0 \u{1f600}"));
        let mut cursor = Cursor::new(wire);
        assert_eq!(read_utf(&mut cursor).unwrap(), "ping 0");
        assert_eq!(read_utf(&mut cursor).unwrap(), "olá\0 \u{1f600}");
        let err = read_utf(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_truncated_payload() {
        let mut cursor = Cursor::new(vec![0, 5, b'a', b'b']);
        let err = read_utf(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_too_long_writes_nothing() {
        let s = "x".repeat(MAX_LEN + 1);
        let mut buf = Vec::new();
        let err = write_utf(&mut buf, &s).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(buf.is_empty());

        let s = "x".repeat(MAX_LEN);
        write_utf(&mut buf, &s).unwrap();
        assert_eq!(&buf[..2], &[0xff, 0xff]);
    }

    #[test]
    fn test_malformed_input() {
        for payload in [vec![0x80], vec![0xf0, 0x80], vec![0xc3, 0x41], vec![0xe2, 0x82]].iter() {
            let mut wire = vec![0, payload.len() as u8];
            wire.extend(payload);
            let err = read_utf(&mut Cursor::new(wire)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidData, "{:?}", payload);
        }
    }

    #[test]
    fn test_unpaired_surrogate() {
        let wire = vec![0, 3, 0xed, 0xa0, 0xbd];
        let err = read_utf(&mut Cursor::new(wire)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
