//! # Voxel Volume
//!
//! A cubic buffer of `VOLUME_SIDE³` voxels with toroidal (wraparound)
//! addressing on every axis. The buffer represents a moving window over an
//! unbounded world: any integer coordinate maps to a valid cell, and a cell
//! holds the content of whichever world coordinate the streaming engine last
//! wrote there. The volume itself is passive storage; it has no notion of
//! which world coordinates are currently valid beyond what the streaming
//! engine maintains through its window center.

use cgmath::Point3;

use super::{Voxel, VOLUME_MASK, VOLUME_SIDE};

/// Number of cells in one z-plane of the volume.
const PLANE_CELLS: usize = (VOLUME_SIDE * VOLUME_SIDE) as usize;

/// Total number of cells in the volume.
const TOTAL_CELLS: usize = PLANE_CELLS * VOLUME_SIDE as usize;

/// A fixed-size, toroidally indexed cube of voxels.
///
/// Cells are stored z-major (`[z][y][x]` order) in one contiguous
/// allocation. Indexing never fails: each coordinate component is reduced
/// modulo `VOLUME_SIDE` with a bitmask, which handles negative coordinates
/// through two's complement.
pub struct VoxelVolume {
    voxels: Vec<Voxel>,
}

impl VoxelVolume {
    /// Creates a volume with every cell empty.
    pub fn new() -> Self {
        VoxelVolume {
            voxels: vec![Voxel::EMPTY; TOTAL_CELLS],
        }
    }

    #[inline]
    fn cell_index(pos: Point3<i32>) -> usize {
        (pos.z & VOLUME_MASK) as usize * PLANE_CELLS
            + (pos.y & VOLUME_MASK) as usize * VOLUME_SIDE as usize
            + (pos.x & VOLUME_MASK) as usize
    }

    /// Returns the cell for `pos`, wrapping each axis modulo `VOLUME_SIDE`.
    #[inline]
    pub fn at(&self, pos: Point3<i32>) -> Voxel {
        self.voxels[Self::cell_index(pos)]
    }

    /// Returns a mutable reference to the cell for `pos`, wrapping each axis
    /// modulo `VOLUME_SIDE`.
    #[inline]
    pub fn at_mut(&mut self, pos: Point3<i32>) -> &mut Voxel {
        &mut self.voxels[Self::cell_index(pos)]
    }

    /// Overwrites every cell with `voxel`.
    pub fn fill(&mut self, voxel: Voxel) {
        self.voxels.fill(voxel);
    }
}

impl Default for VoxelVolume {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::EMPTY_VOXEL;

    #[test]
    fn wraparound_aliases_coordinates_modulo_side() {
        let mut volume = VoxelVolume::new();
        let c = 37;
        volume.at_mut(Point3::new(c, c, c)).kind = 9;
        assert_eq!(volume.at(Point3::new(c + VOLUME_SIDE, c, c)).kind, 9);
        assert_eq!(volume.at(Point3::new(c, c - VOLUME_SIDE, c)).kind, 9);
        assert_eq!(
            volume.at(Point3::new(c, c, c + 3 * VOLUME_SIDE)).kind,
            9
        );
    }

    #[test]
    fn negative_coordinates_map_to_valid_cells() {
        let mut volume = VoxelVolume::new();
        volume.at_mut(Point3::new(-1, -2, -3)).kind = 4;
        assert_eq!(
            volume
                .at(Point3::new(VOLUME_SIDE - 1, VOLUME_SIDE - 2, VOLUME_SIDE - 3))
                .kind,
            4
        );
    }

    #[test]
    fn distinct_cells_do_not_alias() {
        let mut volume = VoxelVolume::new();
        volume.at_mut(Point3::new(0, 0, 0)).kind = 1;
        assert_eq!(volume.at(Point3::new(1, 0, 0)).kind, EMPTY_VOXEL);
        assert_eq!(volume.at(Point3::new(0, 1, 0)).kind, EMPTY_VOXEL);
        assert_eq!(volume.at(Point3::new(0, 0, 1)).kind, EMPTY_VOXEL);
    }

    #[test]
    fn fill_overwrites_every_cell() {
        let mut volume = VoxelVolume::new();
        volume.fill(Voxel::new(2));
        assert_eq!(volume.at(Point3::new(0, 0, 0)).kind, 2);
        assert_eq!(volume.at(Point3::new(255, 255, 255)).kind, 2);
        assert_eq!(volume.at(Point3::new(-1000, 500, 123)).kind, 2);
    }
}
