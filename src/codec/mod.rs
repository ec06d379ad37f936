//! Volume codecs: turn one region of the world into a compressed block

pub mod lz4;

pub use lz4::Lz4Codec;

use crate::core::Result;
use crate::math::Region;

/// Compressed bytes of one region plus the raw length they expand to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedRegion {
    pub payload: Vec<u8>,
    pub unpacked_len: usize,
}

impl PackedRegion {
    pub fn packed_len(&self) -> usize {
        self.payload.len()
    }
}

/// Opaque region compressor used by the exporter
pub trait VolumeCodec {
    /// Compress `region`, or decline with [`crate::core::Error::Codec`]
    fn pack(&self, region: &Region) -> Result<PackedRegion>;

    /// Upper bound on the packed size of `unpacked_len` raw bytes
    fn worst_case_compressed_size(&self, unpacked_len: usize) -> usize;
}

impl<C: VolumeCodec + ?Sized> VolumeCodec for &C {
    fn pack(&self, region: &Region) -> Result<PackedRegion> {
        (**self).pack(region)
    }

    fn worst_case_compressed_size(&self, unpacked_len: usize) -> usize {
        (**self).worst_case_compressed_size(unpacked_len)
    }
}
