//! Map file decoding

use std::io::{self, Read};
use std::path::Path;

use crate::codec::PackedRegion;
use crate::core::types::IVec3;
use crate::core::{Error, Result};
use crate::entity::decode_entities;
use crate::export::ExportedChunk;
use crate::math::Region;
use crate::vars::MapVar;
use super::wire::{get_bytes, get_int, get_len};
use super::{DecodedMap, MAGIC, VERSION};

/// Largest scale a chunk or map may declare
pub const MAX_SCALE: u32 = 30;

fn format_err(what: &str) -> impl Fn(io::Error) -> Error + '_ {
    move |e| Error::Format(format!("{}: {}", what, e))
}

fn get_scale(reader: &mut impl Read, what: &str) -> Result<u32> {
    let scale = get_int(reader).map_err(format_err(what))?;
    if !(0..=MAX_SCALE as i32).contains(&scale) {
        return Err(Error::Format(format!("{} {} out of range", what, scale)));
    }
    Ok(scale as u32)
}

fn get_chunk(reader: &mut impl Read) -> Result<ExportedChunk> {
    let scale = get_scale(reader, "chunk scale")?;
    let mut fields = [0i32; 6];
    for field in &mut fields {
        *field = get_int(reader).map_err(format_err("chunk header"))?;
    }
    let [x, y, z, sx, sy, sz] = fields;
    let size = IVec3::new(sx, sy, sz);
    if size.cmplt(IVec3::ONE).any() || size.cmpgt(IVec3::splat(2)).any() {
        return Err(Error::Format(format!("chunk size {}x{}x{} is not a cube, plane or pillar", sx, sy, sz)));
    }

    let grid = 1i32 << scale;
    let origin = [x, y, z].map(|c| c.checked_mul(grid));
    let [Some(ox), Some(oy), Some(oz)] = origin else {
        return Err(Error::Format(format!("chunk cell ({}, {}, {}) at scale {} is out of range", x, y, z, scale)));
    };
    let region = Region {
        origin: IVec3::new(ox, oy, oz),
        size,
        grid,
    };

    let unpacked_len = get_len(reader).map_err(format_err("chunk unpacked length"))?;
    let packed_len = get_len(reader).map_err(format_err("chunk packed length"))?;
    let payload = get_bytes(reader, packed_len).map_err(format_err("chunk payload"))?;

    Ok(ExportedChunk::new(region, PackedRegion { payload, unpacked_len }))
}

/// Decode a complete map file
pub fn decode_map(bytes: &[u8]) -> Result<DecodedMap> {
    let mut reader = bytes;

    let magic = get_bytes(&mut reader, MAGIC.len()).map_err(format_err("magic"))?;
    if magic != MAGIC {
        return Err(Error::Format("not a CHUNKED map file".into()));
    }
    let version = get_int(&mut reader).map_err(format_err("version"))?;
    if version != VERSION {
        return Err(Error::Format(format!("unsupported map version {} (expected {})", version, VERSION)));
    }

    let world_scale = get_scale(&mut reader, "map scale")?;
    let num_ents = get_len(&mut reader).map_err(format_err("entity count"))?;
    let num_vars = get_len(&mut reader).map_err(format_err("variable count"))?;
    let num_chunks = get_len(&mut reader).map_err(format_err("chunk count"))?;

    let entities = decode_entities(&mut reader, num_ents)?;
    let vars = (0..num_vars)
        .map(|_| MapVar::decode(&mut reader))
        .collect::<Result<Vec<_>>>()?;
    let chunks = (0..num_chunks)
        .map(|_| get_chunk(&mut reader))
        .collect::<Result<Vec<_>>>()?;

    if !reader.is_empty() {
        log::warn!("{} trailing bytes after the last chunk", reader.len());
    }

    Ok(DecodedMap {
        world_scale,
        entities,
        vars,
        chunks,
    })
}

/// Read and decode a map file from disk
pub fn read_map(path: &Path) -> Result<DecodedMap> {
    let bytes = std::fs::read(path)?;
    decode_map(&bytes)
}
