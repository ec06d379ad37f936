//! Map entities and their export blob

use std::io::{self, Read, Write};

use crate::core::types::IVec3;
use crate::core::{Error, Result};
use crate::format::wire::{get_int, put_int};

/// Number of free attributes per entity
pub const ENTITY_ATTRS: usize = 5;

/// Placed map entity: position, type and attributes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MapEntity {
    pub position: IVec3,
    pub kind: i32,
    pub attrs: [i32; ENTITY_ATTRS],
}

impl MapEntity {
    pub fn new(position: IVec3, kind: i32) -> Self {
        Self {
            position,
            kind,
            attrs: [0; ENTITY_ATTRS],
        }
    }

    pub fn with_attrs(mut self, attrs: [i32; ENTITY_ATTRS]) -> Self {
        self.attrs = attrs;
        self
    }

    /// X Y Z TYPE ATTR1..ATTR5
    pub fn encode(&self, writer: &mut impl Write) -> io::Result<()> {
        let p = self.position;
        for n in [p.x, p.y, p.z, self.kind].into_iter().chain(self.attrs) {
            put_int(writer, n)?;
        }
        Ok(())
    }

    pub fn decode(reader: &mut impl Read) -> Result<Self> {
        let mut fields = [0i32; 4 + ENTITY_ATTRS];
        for field in &mut fields {
            *field = get_int(reader).map_err(|e| Error::Format(format!("entity: {}", e)))?;
        }
        let [x, y, z, kind, attrs @ ..] = fields;
        Ok(Self {
            position: IVec3::new(x, y, z),
            kind,
            attrs,
        })
    }
}

/// Encoded entity section, written to the file as-is
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityBlob {
    pub count: usize,
    pub bytes: Vec<u8>,
}

/// Anything that can hand the exporter its entities as one blob
pub trait EntitySource {
    fn export_entities(&self) -> Result<EntityBlob>;
}

impl EntitySource for [MapEntity] {
    fn export_entities(&self) -> Result<EntityBlob> {
        let mut bytes = Vec::with_capacity(self.len() * (4 + ENTITY_ATTRS));
        for entity in self {
            entity.encode(&mut bytes)?;
        }
        Ok(EntityBlob {
            count: self.len(),
            bytes,
        })
    }
}

impl EntitySource for Vec<MapEntity> {
    fn export_entities(&self) -> Result<EntityBlob> {
        self.as_slice().export_entities()
    }
}

impl EntitySource for EntityBlob {
    fn export_entities(&self) -> Result<EntityBlob> {
        Ok(self.clone())
    }
}

/// Decode `count` entities
pub fn decode_entities(reader: &mut impl Read, count: usize) -> Result<Vec<MapEntity>> {
    (0..count).map(|_| MapEntity::decode(reader)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_layout() {
        let ents = vec![MapEntity::new(IVec3::new(1, 2, 3), 4).with_attrs([5, 6, 7, 8, 9])];
        let blob = ents.export_entities().unwrap();
        assert_eq!(blob.count, 1);
        assert_eq!(blob.bytes, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_decode_entities() {
        let ents = vec![
            MapEntity::new(IVec3::new(512, -3, 70000), 2).with_attrs([0, 100, -200, 3, 1]),
            MapEntity::new(IVec3::ZERO, 11),
        ];
        let blob = ents.export_entities().unwrap();
        let decoded = decode_entities(&mut blob.bytes.as_slice(), blob.count).unwrap();
        assert_eq!(decoded, ents);
    }

    #[test]
    fn test_encode_propagates_write_errors() {
        let entity = MapEntity::new(IVec3::new(1, 2, 3), 4);
        let mut storage = [0u8; 3];
        let err = entity.encode(&mut storage.as_mut_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
        assert_eq!(storage, [1, 2, 3]);
    }

    #[test]
    fn test_decode_truncated() {
        let blob = vec![MapEntity::new(IVec3::ONE, 1)].export_entities().unwrap();
        let cut = &blob.bytes[..blob.bytes.len() - 1];
        assert!(matches!(decode_entities(&mut &cut[..], 1), Err(Error::Format(_))));
    }
}
