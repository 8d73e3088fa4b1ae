use crate::{Error, Vector3D};

mod periodic_table;

mod species;
pub use self::species::{Element, Species};

mod composition;
pub use self::composition::Composition;

mod cell;
pub use self::cell::{UnitCell, CellShape};

mod neighbors;
pub use self::neighbors::{Neighbor, NeighborsList};

mod simple_system;
pub use self::simple_system::SimpleSystem;

mod charges;
pub use self::charges::{PrimitiveCellFinder, NoPrimitiveReduction};
pub use self::charges::{OxidationStateAssigner, SpeciesOxidationStates, FixedOxidationStates};

#[cfg(test)]
pub(crate) mod test_utils;

/// A `System` deals with the storage of sites and related information, as
/// well as the computation of neighbor lists.
pub trait System: Send + Sync {
    /// Get the unit cell for this system
    fn cell(&self) -> Result<UnitCell, Error>;

    /// Get the number of sites in this system
    fn size(&self) -> Result<usize, Error>;

    /// Get the species occupying all sites in this system. The returned value
    /// must be a slice of length `self.size()`.
    fn species(&self) -> Result<&[Species], Error>;

    /// Get the occupancy of all sites in this system, as a slice of length
    /// `self.size()` with values in `(0, 1]`.
    fn occupancies(&self) -> Result<&[f64], Error>;

    /// Get the positions for all sites in this system. The returned value must
    /// be a slice of length `self.size()` containing the Cartesian
    /// coordinates of all sites in the system.
    fn positions(&self) -> Result<&[Vector3D], Error>;

    /// Compute the neighbor list according to the given cutoff, and store it
    /// for later access with `neighbors`.
    fn compute_neighbors(&mut self, cutoff: f64) -> Result<(), Error>;

    /// Get the neighbors of the site at the given index, using the cutoff
    /// passed in the last call to `compute_neighbors`.
    ///
    /// The list must contain every periodic image of every other site up to
    /// and including the cutoff, and must not contain the site itself
    /// (periodic images of the site itself are included).
    fn neighbors(&self, site: usize) -> Result<&[Neighbor], Error>;

    /// Is every site in this system fully occupied?
    #[allow(clippy::float_cmp)]
    fn is_ordered(&self) -> Result<bool, Error> {
        Ok(self.occupancies()?.iter().all(|&occupancy| occupancy == 1.0))
    }

    /// Get the composition of this system, weighting each site by its
    /// occupancy. Oxidation states are ignored.
    fn composition(&self) -> Result<Composition, Error> {
        let species = self.species()?;
        let occupancies = self.occupancies()?;
        Ok(species.iter()
            .zip(occupancies)
            .map(|(species, &occupancy)| (species.element(), occupancy))
            .collect())
    }
}

/// Check that a system only contains fully occupied sites
pub(crate) fn check_ordered(system: &dyn System) -> Result<(), Error> {
    if !system.is_ordered()? {
        return Err(Error::UnsupportedStructure(
            "structures with partial occupancy are not supported".into()
        ));
    }
    Ok(())
}
