//! Compact integer, float and string encoding used by chunked map files

use std::io::{self, Read, Write};

/// Marker byte for a 2-byte integer
const INT16_MARKER: u8 = 0x80;
/// Marker byte for a 4-byte integer
const INT32_MARKER: u8 = 0x81;

/// Write a variable-length integer
///
/// Values in -126..=127 take one byte, values that fit an i16 take three and
/// everything else five.
pub fn put_int(writer: &mut impl Write, n: i32) -> io::Result<()> {
    if n < 128 && n > -127 {
        writer.write_all(&[n as i8 as u8])
    } else if n < 0x8000 && n >= -0x8000 {
        writer.write_all(&[INT16_MARKER])?;
        writer.write_all(&(n as i16).to_le_bytes())
    } else {
        writer.write_all(&[INT32_MARKER])?;
        writer.write_all(&n.to_le_bytes())
    }
}

pub fn get_int(reader: &mut impl Read) -> io::Result<i32> {
    let mut buf1 = [0u8; 1];
    reader.read_exact(&mut buf1)?;
    match buf1[0] {
        INT16_MARKER => {
            let mut buf2 = [0u8; 2];
            reader.read_exact(&mut buf2)?;
            Ok(i16::from_le_bytes(buf2) as i32)
        }
        INT32_MARKER => {
            let mut buf4 = [0u8; 4];
            reader.read_exact(&mut buf4)?;
            Ok(i32::from_le_bytes(buf4))
        }
        b => Ok(b as i8 as i32),
    }
}

/// Write a length or count, which must fit a non-negative i32
pub fn put_len(writer: &mut impl Write, len: usize) -> io::Result<()> {
    let n = i32::try_from(len).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("length {} does not fit the format", len))
    })?;
    put_int(writer, n)
}

pub fn get_len(reader: &mut impl Read) -> io::Result<usize> {
    let n = get_int(reader)?;
    usize::try_from(n).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidData, format!("negative length {}", n))
    })
}

pub fn put_float(writer: &mut impl Write, f: f32) -> io::Result<()> {
    writer.write_all(&f.to_le_bytes())
}

pub fn get_float(reader: &mut impl Read) -> io::Result<f32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

/// Write a length-prefixed UTF-8 string
pub fn put_string(writer: &mut impl Write, s: &str) -> io::Result<()> {
    put_len(writer, s.len())?;
    writer.write_all(s.as_bytes())
}

pub fn get_string(reader: &mut impl Read) -> io::Result<String> {
    let len = get_len(reader)?;
    let bytes = get_bytes(reader, len)?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Read exactly `len` raw bytes
pub fn get_bytes(reader: &mut impl Read, len: usize) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.by_ref().take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, found {}", len, bytes.len()),
        ));
    }
    Ok(bytes)
}
