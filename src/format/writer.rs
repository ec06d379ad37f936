//! Map file encoding and saving

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::{Error, Result};
use crate::export::ExportedChunk;
use super::wire::{put_int, put_len};
use super::{MapFile, MAGIC, VERSION};

fn put_chunk(buf: &mut Vec<u8>, chunk: &ExportedChunk) -> Result<()> {
    let region = chunk.region();
    let cell = region.cell_origin();
    put_int(buf, region.scale() as i32)?;
    for n in [cell.x, cell.y, cell.z, region.size.x, region.size.y, region.size.z] {
        put_int(buf, n)?;
    }
    put_len(buf, chunk.unpacked_len())?;
    put_len(buf, chunk.packed_len())?;
    buf.extend_from_slice(chunk.payload());
    Ok(())
}

/// Encode a complete map file
pub fn encode_map(map: &MapFile) -> Result<Vec<u8>> {
    let payload_total: usize = map.chunks.iter().map(ExportedChunk::packed_len).sum();
    let mut buf = Vec::with_capacity(64 + map.entities.bytes.len() + payload_total + map.chunks.len() * 16);

    buf.extend_from_slice(MAGIC);
    put_int(&mut buf, VERSION)?;
    put_int(&mut buf, map.world_scale as i32)?;
    put_len(&mut buf, map.entities.count)?;
    put_len(&mut buf, map.vars.len())?;
    put_len(&mut buf, map.chunks.len())?;

    buf.extend_from_slice(&map.entities.bytes);
    for var in &map.vars {
        var.encode(&mut buf)?;
    }
    for chunk in &map.chunks {
        put_chunk(&mut buf, chunk)?;
    }

    Ok(buf)
}

/// Encode and write a map file synchronously
pub fn write_map(path: &Path, map: &MapFile) -> Result<()> {
    let bytes = encode_map(map)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Encode and write a map file on the tokio runtime, creating parent directories
pub async fn save_map(path: &Path, map: &MapFile) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::BadOutputPath);
    }

    let bytes = encode_map(map)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, &bytes).await?;

    log::info!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
