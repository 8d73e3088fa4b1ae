use log::warn;
use ndarray::Array3;

use crate::{Matrix3, Vector3D};
use super::UnitCell;

/// Maximal number of cells, we need to use this to prevent having too many
/// cells with a small unit cell and a large cutoff
const MAX_NUMBER_OF_CELLS: f64 = 1e5;

/// A cell shift represents the displacement along cell axis between the actual
/// position of an atom and a periodic image of this atom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CellShift([i32; 3]);

impl std::ops::Add<CellShift> for CellShift {
    type Output = CellShift;

    fn add(mut self, rhs: CellShift) -> Self::Output {
        self.0[0] += rhs[0];
        self.0[1] += rhs[1];
        self.0[2] += rhs[2];
        return self;
    }
}

impl std::ops::Sub<CellShift> for CellShift {
    type Output = CellShift;

    fn sub(mut self, rhs: CellShift) -> Self::Output {
        self.0[0] -= rhs[0];
        self.0[1] -= rhs[1];
        self.0[2] -= rhs[2];
        return self;
    }
}

impl std::ops::Index<usize> for CellShift {
    type Output = i32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl CellShift {
    fn is_zero(&self) -> bool {
        self[0] == 0 && self[1] == 0 && self[2] == 0
    }

    /// Compute the shift vector in cartesian coordinates, using the given cell
    /// matrix (stored in row major order).
    fn cartesian(&self, cell: &Matrix3) -> Vector3D {
        let x = cell[0][0] * self[0] as f64 + cell[1][0] * self[1] as f64 + cell[2][0] * self[2] as f64;
        let y = cell[0][1] * self[0] as f64 + cell[1][1] * self[1] as f64 + cell[2][1] * self[2] as f64;
        let z = cell[0][2] * self[0] as f64 + cell[1][2] * self[1] as f64 + cell[2][2] * self[2] as f64;
        Vector3D::new(x, y, z)
    }

    /// When pairing an atom with its own periodic images, the shifts `s` and
    /// `-s` describe the same pair. This keeps only one of them.
    fn is_canonical_self_image(&self) -> bool {
        let sum = self[0] + self[1] + self[2];
        if sum != 0 {
            return sum > 0;
        }
        self[2] > 0 || (self[2] == 0 && self[1] > 0)
    }
}

/// Candidate pair produced by the cell list
#[derive(Debug, Clone)]
struct CellPair {
    first: usize,
    second: usize,
    shift: CellShift,
}

/// Data associated with an atoms inside the `CellList`
#[derive(Debug, Clone)]
struct AtomData {
    /// index of the atom in the original system
    index: usize,
    /// the shift vector from the actual atom position to the image of this atom
    /// inside the unit cell
    shift: CellShift,
}

/// The cell list sorts atoms inside bins/cells, and then creates candidate
/// pairs by looking through all neighboring cells.
#[derive(Debug, Clone)]
struct CellList {
    /// How many cells do we need to look at when searching neighbors to include
    /// all neighbors below cutoff
    n_search: [i32; 3],
    /// the cells themselves
    cells: Array3<Vec<AtomData>>,
    /// Unit cell defining periodic boundary conditions
    unit_cell: UnitCell,
}

impl CellList {
    fn new(unit_cell: UnitCell, cutoff: f64) -> CellList {
        let distances_between_faces = if unit_cell.is_infinite() {
            // use a pseudo orthorhombic cell with size 1, `n_search` below will
            // make sure we look to every cell up to the cutoff
            Vector3D::new(1.0, 1.0, 1.0)
        } else {
            unit_cell.distances_between_faces()
        };

        let mut n_cells = [
            f64::clamp(f64::trunc(distances_between_faces[0] / cutoff), 1.0, f64::INFINITY),
            f64::clamp(f64::trunc(distances_between_faces[1] / cutoff), 1.0, f64::INFINITY),
            f64::clamp(f64::trunc(distances_between_faces[2] / cutoff), 1.0, f64::INFINITY),
        ];

        // limit memory consumption by ensuring we have less than
        // `MAX_NUMBER_OF_CELLS` cells to look though
        let n_cells_total = n_cells[0] * n_cells[1] * n_cells[2];
        if n_cells_total > MAX_NUMBER_OF_CELLS {
            // set the total number of cells close to MAX_NUMBER_OF_CELLS, while
            // keeping roughly the ratio of cells in each direction
            let ratio_x_y = n_cells[0] / n_cells[1];
            let ratio_y_z = n_cells[1] / n_cells[2];

            n_cells[2] = f64::trunc(f64::cbrt(MAX_NUMBER_OF_CELLS / (ratio_x_y * ratio_y_z * ratio_y_z)));
            n_cells[1] = f64::trunc(ratio_y_z * n_cells[2]);
            n_cells[0] = f64::trunc(ratio_x_y * n_cells[1]);
        }

        // number of cells to search in each direction to make sure all possible
        // pairs below the cutoff are accounted for.
        let mut n_search = [
            f64::ceil(cutoff * n_cells[0] / distances_between_faces[0]) as i32,
            f64::ceil(cutoff * n_cells[1] / distances_between_faces[1]) as i32,
            f64::ceil(cutoff * n_cells[2] / distances_between_faces[2]) as i32,
        ];

        let n_cells = [
            n_cells[0] as usize,
            n_cells[1] as usize,
            n_cells[2] as usize,
        ];

        for xyz in 0..3 {
            if n_search[xyz] < 1 {
                n_search[xyz] = 1;
            }

            // don't look for neighboring cells if we have only one cell and no
            // periodic boundary condition
            if n_cells[xyz] == 1 && unit_cell.is_infinite() {
                n_search[xyz] = 0;
            }
        }

        CellList {
            n_search: n_search,
            cells: Array3::from_elem(n_cells, Vec::new()),
            unit_cell: unit_cell,
        }
    }

    fn add_atom(&mut self, index: usize, position: Vector3D) {
        let fractional = if self.unit_cell.is_infinite() {
            position
        } else {
            self.unit_cell.fractional(position)
        };

        let n_cells = self.cells.shape();
        let n_cells = [n_cells[0], n_cells[1], n_cells[2]];

        let cell_index = [
            f64::floor(fractional[0] * n_cells[0] as f64) as i32,
            f64::floor(fractional[1] * n_cells[1] as f64) as i32,
            f64::floor(fractional[2] * n_cells[2] as f64) as i32,
        ];

        // wrap atoms outside of the cell back inside, remembering the shift
        let (shift, cell_index) = if self.unit_cell.is_infinite() {
            let cell_index = [
                i32::clamp(cell_index[0], 0, n_cells[0] as i32 - 1) as usize,
                i32::clamp(cell_index[1], 0, n_cells[1] as i32 - 1) as usize,
                i32::clamp(cell_index[2], 0, n_cells[2] as i32 - 1) as usize,
            ];
            ([0, 0, 0], cell_index)
        } else {
            divmod_vec(cell_index, n_cells)
        };

        self.cells[cell_index].push(AtomData {
            index: index,
            shift: CellShift(shift),
        });
    }

    /// Get the list of candidate pairs, as a "half" list where each pair
    /// appears once. Some candidates might be further apart than the cutoff.
    fn pairs(&self) -> Vec<CellPair> {
        let mut pairs = Vec::new();

        let n_cells = self.cells.shape();
        let n_cells = [n_cells[0], n_cells[1], n_cells[2]];

        let search_x = -self.n_search[0]..=self.n_search[0];
        let search_y = -self.n_search[1]..=self.n_search[1];
        let search_z = -self.n_search[2]..=self.n_search[2];

        for ((cell_i_x, cell_i_y, cell_i_z), current_cell) in self.cells.indexed_iter() {
            for delta_x in search_x.clone() {
                for delta_y in search_y.clone() {
                    for delta_z in search_z.clone() {
                        let cell_i = [
                            cell_i_x as i32 + delta_x,
                            cell_i_y as i32 + delta_y,
                            cell_i_z as i32 + delta_z,
                        ];

                        let (cell_shift, neighbor_cell_i) = divmod_vec(cell_i, n_cells);

                        for atom_i in current_cell {
                            for atom_j in &self.cells[neighbor_cell_i] {
                                if atom_i.index > atom_j.index {
                                    continue;
                                }

                                let shift = CellShift(cell_shift) + atom_i.shift - atom_j.shift;
                                if atom_i.index == atom_j.index && (shift.is_zero() || !shift.is_canonical_self_image()) {
                                    continue;
                                }

                                if self.unit_cell.is_infinite() && !shift.is_zero() {
                                    // no periodic images in an infinite cell
                                    continue;
                                }

                                pairs.push(CellPair {
                                    first: atom_i.index,
                                    second: atom_j.index,
                                    shift: shift,
                                });
                            }
                        }
                    }
                }
            }
        }

        return pairs;
    }
}

/// Quotient and remainder of `a / b`, with the remainder having the same sign
/// as `b`.
fn divmod(a: i32, b: usize) -> (i32, usize) {
    debug_assert!(b < (i32::MAX as usize));
    let b = b as i32;
    let mut quotient = a / b;
    let mut remainder = a % b;
    if remainder < 0 {
        remainder += b;
        quotient -= 1;
    }
    return (quotient, remainder as usize);
}

fn divmod_vec(a: [i32; 3], b: [usize; 3]) -> ([i32; 3], [usize; 3]) {
    let (qx, rx) = divmod(a[0], b[0]);
    let (qy, ry) = divmod(a[1], b[1]);
    let (qz, rz) = divmod(a[2], b[2]);
    return ([qx, qy, qz], [rx, ry, rz]);
}

/// A neighbor of a given origin site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// index of the neighbor site in the structure
    pub site: usize,
    /// distance between the origin site and this periodic image of the
    /// neighbor site
    pub distance: f64,
}

/// Full neighbor list, containing for every site all the periodic images of
/// other sites within the cutoff.
///
/// A pair `i-j` at distance `d` appears both in the list of `i` and in the
/// list of `j`. A site can be its own neighbor through periodic images, and
/// the same neighbor site can appear multiple times at different distances.
/// Each list is sorted by distance, then by neighbor index.
#[derive(Clone, Debug)]
pub struct NeighborsList {
    /// the cutoff used to create this neighbor list
    pub cutoff: f64,
    /// neighbors of each site
    pub neighbors: Vec<Vec<Neighbor>>,
}

impl NeighborsList {
    /// Find all neighbors up to and including `cutoff`
    #[time_graph::instrument(name = "NeighborsList")]
    pub fn new(positions: &[Vector3D], unit_cell: UnitCell, cutoff: f64) -> NeighborsList {
        let mut neighbors = vec![Vec::new(); positions.len()];
        if positions.is_empty() || !(cutoff > 0.0) {
            return NeighborsList { cutoff, neighbors };
        }

        let mut cell_list = CellList::new(unit_cell, cutoff);
        for (index, &position) in positions.iter().enumerate() {
            cell_list.add_atom(index, position);
        }

        let cell_matrix = unit_cell.matrix();
        let cutoff2 = cutoff * cutoff;

        for pair in cell_list.pairs() {
            let mut vector = positions[pair.second] - positions[pair.first];
            vector += pair.shift.cartesian(&cell_matrix);

            let distance2 = vector * vector;
            if distance2 > cutoff2 {
                continue;
            }

            if distance2 < 1e-3 {
                warn!(
                    "sites {} and {} are very close to one another ({} A)",
                    pair.first, pair.second, distance2.sqrt()
                );
                if distance2 == 0.0 {
                    continue;
                }
            }

            let distance = distance2.sqrt();
            neighbors[pair.first].push(Neighbor { site: pair.second, distance });
            neighbors[pair.second].push(Neighbor { site: pair.first, distance });
        }

        // sort the neighbors to make sure the output is ordered naturally
        for list in &mut neighbors {
            list.sort_unstable_by(|a, b| {
                a.distance.total_cmp(&b.distance).then(a.site.cmp(&b.site))
            });
        }

        return NeighborsList {
            cutoff: cutoff,
            neighbors: neighbors,
        };
    }

    /// Total number of (directed) neighbor entries
    pub fn count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum()
    }
}
