//! CHUNKED map file format
//!
//! ```text
//! MAGIC("CHUNKED") VERSION MAPSCALE NUMENTS NUMVARS NUMCHUNKS
//! entities, variables, then per chunk:
//! SCALE X Y Z SX SY SZ UNPACKLEN PACKLEN PAYLOAD
//! ```
//!
//! Every number except the raw magic and payload bytes uses [`wire::put_int`].

pub mod reader;
pub mod wire;
pub mod writer;

pub use reader::{MAX_SCALE, decode_map, read_map};
pub use writer::{encode_map, save_map, write_map};

use crate::entity::{EntityBlob, MapEntity};
use crate::export::ExportedChunk;
use crate::vars::MapVar;

/// File magic, written as 7 raw bytes
pub const MAGIC: &[u8; 7] = b"CHUNKED";

pub const VERSION: i32 = 2;

/// Everything the writer needs for one map file
#[derive(Clone, Debug, Default)]
pub struct MapFile {
    /// log2 of the world edge
    pub world_scale: u32,
    pub entities: EntityBlob,
    pub vars: Vec<MapVar>,
    pub chunks: Vec<ExportedChunk>,
}

/// A map file read back from disk
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedMap {
    pub world_scale: u32,
    pub entities: Vec<MapEntity>,
    pub vars: Vec<MapVar>,
    pub chunks: Vec<ExportedChunk>,
}
