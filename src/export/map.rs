//! Whole-map export: top-level cubes, entities and overridden variables

use std::path::Path;

use crate::codec::{Lz4Codec, VolumeCodec};
use crate::core::logging::plural;
use crate::core::types::IVec3;
use crate::core::{Error, Result};
use crate::entity::EntitySource;
use crate::format::{MapFile, write_map};
use crate::math::Region;
use crate::vars::VarRegistry;
use crate::voxel::VoxelGrid;
use super::chunk::{ExportedChunk, packed_total};
use super::config::ExportLimits;
use super::decompose::Decomposer;

/// Export progress sink, fire-and-forget
pub trait Progress {
    fn report(&self, percent: f32, label: &str);
}

/// Reports progress through `log`
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn report(&self, percent: f32, label: &str) {
        log::info!("{} ({:.0}%)", label, percent);
    }
}

impl<F: Fn(f32, &str)> Progress for F {
    fn report(&self, percent: f32, label: &str) {
        self(percent, label)
    }
}

/// Counts reported once a map is written
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapSummary {
    pub chunks: usize,
    pub entities: usize,
    pub vars: usize,
    pub packed_bytes: usize,
}

impl MapSummary {
    fn of(map: &MapFile) -> Self {
        Self {
            chunks: map.chunks.len(),
            entities: map.entities.count,
            vars: map.vars.len(),
            packed_bytes: packed_total(&map.chunks),
        }
    }

    fn log(&self) {
        log::info!(
            "map exported into {} chunk{}, {} ent{}, {} var{}",
            self.chunks, plural(self.chunks),
            self.entities, plural(self.entities),
            self.vars, plural(self.vars)
        );
    }
}

/// Exports the world cube as its 8 top-level octants
pub struct MapExporter<C, P> {
    decomposer: Decomposer<C>,
    progress: P,
}

impl<C: VolumeCodec, P: Progress> MapExporter<C, P> {
    pub fn new(codec: C, limits: ExportLimits, progress: P) -> Self {
        Self {
            decomposer: Decomposer::new(codec, limits),
            progress,
        }
    }

    pub fn decomposer(&self) -> &Decomposer<C> {
        &self.decomposer
    }

    /// Export the world of edge `2^world_scale`, top-level cubes in octant order
    ///
    /// Any top-level failure aborts the export and drops what was produced.
    pub fn export_map(&self, world_scale: u32) -> Result<Vec<ExportedChunk>> {
        if world_scale == 0 {
            return Err(Error::RegionTooSmall(Region::cube(IVec3::ZERO, 0)));
        }
        let world = Region::cube(IVec3::ZERO, world_scale);

        let mut chunks = Vec::new();
        for i in 0..8u8 {
            self.progress.report(i as f32 * 100.0 / 8.0, "exporting map");
            let cube = world.sub_octant(i);
            match self.decomposer.export_cube(&cube) {
                Ok(out) => chunks.extend(out),
                Err(e) => {
                    log::error!("Failed to export {}: {}", cube, e);
                    return Err(e);
                }
            }
        }
        self.progress.report(100.0, "exporting map");

        Ok(chunks)
    }
}

/// Reject output paths that cannot name a file
pub fn check_output_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::BadOutputPath);
    }
    Ok(())
}

/// Run the whole export over a voxel grid and assemble the file contents
pub fn prepare_map(
    grid: &VoxelGrid,
    entities: &(impl EntitySource + ?Sized),
    vars: &VarRegistry,
    limits: ExportLimits,
    progress: impl Progress,
) -> Result<MapFile> {
    let codec = Lz4Codec::new(grid).with_max_input_bound(limits.max_bound);
    limits.validate_for(&codec)?;

    let exporter = MapExporter::new(codec, limits, progress);
    let chunks = exporter.export_map(grid.scale())?;

    Ok(MapFile {
        world_scale: grid.scale(),
        entities: entities.export_entities()?,
        vars: vars.exported(),
        chunks,
    })
}

/// Export a grid to `path`; nothing is written if any part fails
pub fn export_map_command(
    path: &Path,
    grid: &VoxelGrid,
    entities: &(impl EntitySource + ?Sized),
    vars: &VarRegistry,
    limits: ExportLimits,
) -> Result<MapSummary> {
    check_output_path(path)?;

    let map = prepare_map(grid, entities, vars, limits, LogProgress)?;
    write_map(path, &map)?;

    let summary = MapSummary::of(&map);
    summary.log();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use crate::entity::MapEntity;
    use crate::export::test_utils::{SizeStub, assert_exact_cover};
    use crate::format::read_map;
    use crate::vars::{VarValue, flags};
    use crate::voxel::{Voxel, material};

    fn small_limits() -> ExportLimits {
        ExportLimits { min_scale: 3, ..Default::default() }
    }

    /// Terrain-like lower half plus one block of incompressible noise
    fn mixed_grid() -> VoxelGrid {
        let mut grid = VoxelGrid::new(6);
        let stone = Voxel::new(120, 120, 120, material::STONE);
        grid.fill_region(&Region { origin: IVec3::ZERO, size: IVec3::new(2, 1, 2), grid: 32 }, stone);

        let mut state = 0x2545_F491u32;
        let noisy = Region::cube(IVec3::new(32, 32, 0), 5);
        for x in 32..64 {
            for y in 32..64 {
                for z in 0..32 {
                    state ^= state << 13;
                    state ^= state >> 17;
                    state ^= state << 5;
                    let [r, g, b, m] = state.to_le_bytes();
                    grid.set(IVec3::new(x, y, z), Voxel::new(r, g, b, m | 1));
                }
            }
        }
        assert!(noisy.contains(IVec3::new(40, 40, 10)));
        grid
    }

    #[test]
    fn test_export_map_covers_world_in_octant_order() {
        let stub = SizeStub::uniform(100);
        let exporter = MapExporter::new(&stub, small_limits(), LogProgress);
        let chunks = exporter.export_map(6).unwrap();

        assert_eq!(chunks.len(), 8);
        let world = Region::cube(IVec3::ZERO, 6);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.region(), &world.sub_octant(i as u8));
        }
        assert_exact_cover(&world, &chunks);
    }

    #[test]
    fn test_progress_reported_per_cube() {
        let stub = SizeStub::uniform(100);
        let seen = RefCell::new(Vec::new());
        let exporter = MapExporter::new(&stub, small_limits(), |p: f32, _: &str| seen.borrow_mut().push(p));
        exporter.export_map(6).unwrap();
        assert_eq!(*seen.borrow(), vec![0.0, 12.5, 25.0, 37.5, 50.0, 62.5, 75.0, 87.5, 100.0]);
    }

    #[test]
    fn test_top_level_failure_aborts() {
        // the last top-level cube can never be exported
        let last = Region::cube(IVec3::ZERO, 6).sub_octant(7);
        let stub = SizeStub::new(move |r| {
            let inside = last.contains(r.origin);
            if inside { None } else { Some(10) }
        });
        let exporter = MapExporter::new(&stub, small_limits(), LogProgress);
        let err = exporter.export_map(6).unwrap_err();
        assert!(matches!(err, Error::RegionTooSmall(_)));
    }

    #[test]
    fn test_empty_path_rejected_before_export() {
        let grid = VoxelGrid::new(6);
        let err = export_map_command(Path::new(""), &grid, &Vec::<MapEntity>::new(), &VarRegistry::new(), small_limits())
            .unwrap_err();
        assert!(matches!(err, Error::BadOutputPath));
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let grid = VoxelGrid::new(6);
        let limits = ExportLimits { max_packed: 0, ..small_limits() };
        let err = prepare_map(&grid, &Vec::<MapEntity>::new(), &VarRegistry::new(), limits, LogProgress).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_lz4_export_roundtrip() {
        let grid = mixed_grid();
        let entities = vec![MapEntity::new(IVec3::new(10, 10, 33), 1)];
        let mut vars = VarRegistry::new();
        vars.register("fog", VarValue::Int(4000), flags::OVERRIDE);
        vars.register("maxfps", VarValue::Int(200), 0);
        vars.set("fog", VarValue::Int(1500)).unwrap();

        let file = tempfile::NamedTempFile::new().unwrap();
        let summary = export_map_command(file.path(), &grid, &entities, &vars, small_limits()).unwrap();
        assert_eq!(summary.entities, 1);
        assert_eq!(summary.vars, 1);
        // the noisy cube does not fit one chunk
        assert!(summary.chunks > 8);

        let decoded = read_map(file.path()).unwrap();
        assert_eq!(decoded.world_scale, 6);
        assert_eq!(decoded.entities, entities);
        assert_eq!(decoded.vars[0].name, "fog");
        assert_eq!(decoded.chunks.len(), summary.chunks);
        assert_exact_cover(&grid.bounds(), &decoded.chunks);
        for chunk in &decoded.chunks {
            assert!(chunk.packed_len() <= small_limits().max_packed);
        }

        let mut imported = VoxelGrid::new(6);
        let written = imported.import_chunks(&decoded.chunks).unwrap();
        assert_eq!(written as u64, grid.bounds().volume());
        assert_eq!(imported, grid);
    }
}
