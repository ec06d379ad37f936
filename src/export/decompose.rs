//! Recursive cube decomposition
//!
//! Finds a set of chunks that covers a cube exactly once, each within the
//! codec size limits, and prefers the layout with the smallest packed total.
//! Strategies are tried in priority order:
//!
//! 1. the whole cube as one chunk
//! 2. two planes along one axis
//! 3. one plane plus two pillars filling the other half
//! 4. four pillars, either along one axis or in a two-axis diagonal pattern,
//!    competing with a greedy plane/pillar cover
//!
//! Octants left uncovered by the winner are decomposed recursively.

use crate::codec::VolumeCodec;
use crate::core::{Error, Result};
use crate::math::{
    Axis, PillarId, Region, plane_octants, pillar_octants, pillars_in_half, unaligned_patterns,
};
use super::chunk::{ExportedChunk, OctantCost, OctantCosts, RegionExporter, packed_total};
use super::config::ExportLimits;

/// Plane attempt order of the greedy cover: bottom, top, left, right, back, front
const GREEDY_PLANES: [(Axis, u8); 6] = [
    (Axis::Z, 0),
    (Axis::Z, 1),
    (Axis::X, 0),
    (Axis::X, 1),
    (Axis::Y, 0),
    (Axis::Y, 1),
];

const ALL_OCTANTS: u8 = 0xFF;

/// A complete or partial layout for one cube
#[derive(Debug)]
struct Candidate {
    chunks: Vec<ExportedChunk>,
    /// Bitmask of octants the chunks cover
    covered: u8,
    size: usize,
    /// Packed size of the whole cube once uncovered octants are exported
    projected: usize,
}

impl Candidate {
    fn new(chunks: Vec<ExportedChunk>, covered: u8) -> Self {
        let size = packed_total(&chunks);
        Self { chunks, covered, size, projected: size }
    }

    /// Charge each uncovered octant its direct export size
    ///
    /// An uncovered octant with no reusable direct export ranks the candidate
    /// behind every complete one.
    fn with_leftovers(mut self, costs: &OctantCosts, reusable: bool) -> Self {
        let covered = self.covered;
        for i in (0..8u8).filter(|i| covered & (1 << i) == 0) {
            match costs.get(i) {
                OctantCost::Sized { packed, .. } if reusable => {
                    self.projected = self.projected.saturating_add(packed);
                }
                _ => {
                    self.projected = usize::MAX;
                    break;
                }
            }
        }
        self
    }
}

/// Keep whichever of `best` and `next` projects strictly smaller; the loser is dropped
fn keep_cheapest(best: &mut Option<Candidate>, next: Candidate) {
    match best {
        Some(current) if current.projected <= next.projected => {
            log::trace!("discarding candidate of {} bytes", next.size);
        }
        _ => {
            *best = Some(next);
        }
    }
}

/// Decomposes cubes into exportable chunks
pub struct Decomposer<C> {
    exporter: RegionExporter<C>,
}

impl<C: VolumeCodec> Decomposer<C> {
    pub fn new(codec: C, limits: ExportLimits) -> Self {
        Self {
            exporter: RegionExporter::new(codec, limits),
        }
    }

    pub fn exporter(&self) -> &RegionExporter<C> {
        &self.exporter
    }

    pub fn limits(&self) -> &ExportLimits {
        self.exporter.limits()
    }

    /// Export `cube` as a list of chunks covering it exactly once
    ///
    /// Fails with [`Error::RegionTooSmall`] when some part of the cube cannot
    /// be exported above the recursion floor. No chunks are returned on
    /// failure.
    pub fn export_cube(&self, cube: &Region) -> Result<Vec<ExportedChunk>> {
        debug_assert!(cube.is_cube(), "decomposition starts from cubes");

        if cube.scale() <= self.limits().min_scale {
            return Err(Error::RegionTooSmall(*cube));
        }

        if let Some(chunk) = self.exporter.export_cube(cube) {
            log::info!("Exported chunk (direct) {}", cube);
            return Ok(vec![chunk]);
        }

        let (costs, mut direct) = self.exporter.octant_costs(cube);

        if let Some(planes) = self.two_plane_split(cube, &costs) {
            log::debug!("{}: two planes, {} bytes", cube, planes.size);
            return Ok(planes.chunks);
        }

        if let Some(mixed) = self.plane_pillar_split(cube, &costs) {
            log::debug!("{}: plane and pillars, {} bytes", cube, mixed.size);
            return Ok(mixed.chunks);
        }

        // Ties go to the first candidate offered
        let mut best = None;
        if let Some(uniform) = self.uniform_pillar_split(cube, &costs) {
            keep_cheapest(&mut best, uniform);
        }
        if let Some(unaligned) = self.unaligned_pillar_split(cube, &costs) {
            keep_cheapest(&mut best, unaligned);
        }
        if let Some(greedy) = self.greedy_split(cube, costs) {
            let reusable = cube.scale() - 1 > self.limits().min_scale;
            keep_cheapest(&mut best, greedy.with_leftovers(&costs, reusable));
        }

        let (mut out, covered) = match best {
            Some(chosen) => {
                log::debug!(
                    "{}: {} chunk(s) covering octants {:08b}, {} bytes ({} projected)",
                    cube, chosen.chunks.len(), chosen.covered, chosen.size, chosen.projected
                );
                (chosen.chunks, chosen.covered)
            }
            None => (Vec::new(), 0),
        };

        for i in 0..8u8 {
            if covered & (1 << i) != 0 {
                continue;
            }
            let octant = cube.sub_octant(i);
            match direct[i as usize].take() {
                // the recursion's direct step would produce this same chunk
                Some(chunk) if octant.scale() > self.limits().min_scale => {
                    log::info!("Exported chunk (direct) {}", octant);
                    out.push(chunk);
                }
                _ => out.extend(self.export_cube(&octant)?),
            }
        }

        Ok(out)
    }

    /// Export the given pillars, or nothing if any is inadmissible or fails
    fn export_pillars(&self, cube: &Region, costs: &OctantCosts, pillars: &[PillarId]) -> Option<Vec<ExportedChunk>> {
        let admissible = pillars
            .iter()
            .all(|&(axis, which)| self.exporter.can_export(costs, &pillar_octants(axis, which)));
        if !admissible {
            return None;
        }
        pillars
            .iter()
            .map(|&(axis, which)| self.exporter.export_pillar(cube, axis, which))
            .collect()
    }

    fn export_admissible_plane(&self, cube: &Region, costs: &OctantCosts, axis: Axis, side: u8) -> Option<ExportedChunk> {
        if !self.exporter.can_export(costs, &plane_octants(axis, side)) {
            return None;
        }
        self.exporter.export_plane(cube, axis, side)
    }

    /// Both halves along the cheapest axis
    fn two_plane_split(&self, cube: &Region, costs: &OctantCosts) -> Option<Candidate> {
        let mut best = None;
        for axis in Axis::ALL {
            if !self.exporter.can_export(costs, &plane_octants(axis, 0))
                || !self.exporter.can_export(costs, &plane_octants(axis, 1))
            {
                continue;
            }
            let Some(low) = self.exporter.export_plane(cube, axis, 0) else {
                continue;
            };
            let Some(high) = self.exporter.export_plane(cube, axis, 1) else {
                continue;
            };
            keep_cheapest(&mut best, Candidate::new(vec![low, high], ALL_OCTANTS));
        }
        best
    }

    /// One plane, with the opposite half split into two pillars
    fn plane_pillar_split(&self, cube: &Region, costs: &OctantCosts) -> Option<Candidate> {
        let mut best = None;
        for axis in Axis::ALL {
            for side in 0..2u8 {
                let Some(plane) = self.export_admissible_plane(cube, costs, axis, side) else {
                    continue;
                };

                let mut best_pillars: Option<Candidate> = None;
                for pillar_axis in axis.others() {
                    let [a, b] = pillars_in_half(pillar_axis, axis, 1 - side);
                    if let Some(pillars) = self.export_pillars(cube, costs, &[(pillar_axis, a), (pillar_axis, b)]) {
                        keep_cheapest(&mut best_pillars, Candidate::new(pillars, 0));
                    }
                }

                if let Some(pillars) = best_pillars {
                    let mut chunks = Vec::with_capacity(3);
                    chunks.push(plane);
                    chunks.extend(pillars.chunks);
                    keep_cheapest(&mut best, Candidate::new(chunks, ALL_OCTANTS));
                }
            }
        }
        best
    }

    /// Four parallel pillars along the cheapest axis
    fn uniform_pillar_split(&self, cube: &Region, costs: &OctantCosts) -> Option<Candidate> {
        let mut best = None;
        for axis in Axis::ALL {
            let pillars: [PillarId; 4] = std::array::from_fn(|w| (axis, w as u8));
            if let Some(chunks) = self.export_pillars(cube, costs, &pillars) {
                keep_cheapest(&mut best, Candidate::new(chunks, ALL_OCTANTS));
            }
        }
        best
    }

    /// Cheapest two-axis diagonal pillar pattern
    fn unaligned_pillar_split(&self, cube: &Region, costs: &OctantCosts) -> Option<Candidate> {
        let mut best = None;
        for pattern in unaligned_patterns() {
            if let Some(chunks) = self.export_pillars(cube, costs, &pattern) {
                keep_cheapest(&mut best, Candidate::new(chunks, ALL_OCTANTS));
            }
        }
        best
    }

    /// Greedily take every admissible plane, then every admissible pillar
    ///
    /// Works on its own copy of the cost table; covered octants are marked
    /// consumed so later attempts skip them. May leave octants uncovered.
    fn greedy_split(&self, cube: &Region, mut costs: OctantCosts) -> Option<Candidate> {
        let mut chunks = Vec::new();

        for (axis, side) in GREEDY_PLANES {
            let indexes = plane_octants(axis, side);
            if !self.exporter.can_export(&costs, &indexes) {
                continue;
            }
            if let Some(chunk) = self.exporter.export_plane(cube, axis, side) {
                chunks.push(chunk);
                costs.consume(&indexes);
            }
        }

        for axis in Axis::ALL {
            for which in 0..4u8 {
                let indexes = pillar_octants(axis, which);
                if !self.exporter.can_export(&costs, &indexes) {
                    continue;
                }
                if let Some(chunk) = self.exporter.export_pillar(cube, axis, which) {
                    chunks.push(chunk);
                    costs.consume(&indexes);
                }
            }
        }

        if chunks.is_empty() {
            return None;
        }
        let covered = (0..8u8)
            .filter(|&i| costs.is_consumed(i))
            .fold(0u8, |mask, i| mask | (1 << i));
        Some(Candidate::new(chunks, covered))
    }
}
