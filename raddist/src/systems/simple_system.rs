use crate::Error;

use super::{UnitCell, System, Species, Vector3D};
use super::neighbors::{Neighbor, NeighborsList};

/// A simple implementation of `System` to use when no other is available
#[derive(Clone, Debug)]
pub struct SimpleSystem {
    cell: UnitCell,
    species: Vec<Species>,
    occupancies: Vec<f64>,
    positions: Vec<Vector3D>,
    neighbors: Option<NeighborsList>,
}

impl SimpleSystem {
    /// Create a new empty system with the given unit cell
    pub fn new(cell: UnitCell) -> SimpleSystem {
        SimpleSystem {
            cell: cell,
            species: Vec::new(),
            occupancies: Vec::new(),
            positions: Vec::new(),
            neighbors: None,
        }
    }

    /// Add a fully occupied site with the given species and position
    pub fn add_site(&mut self, species: impl Into<Species>, position: Vector3D) {
        self.species.push(species.into());
        self.occupancies.push(1.0);
        self.positions.push(position);
        self.neighbors = None;
    }

    /// Add a site with the given species, occupancy and position. The
    /// occupancy must be in `(0, 1]`.
    pub fn add_partial_site(&mut self, species: impl Into<Species>, occupancy: f64, position: Vector3D) -> Result<(), Error> {
        if !(occupancy > 0.0 && occupancy <= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "site occupancy must be in (0, 1], got {}", occupancy
            )));
        }

        self.species.push(species.into());
        self.occupancies.push(occupancy);
        self.positions.push(position);
        self.neighbors = None;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn positions_mut(&mut self) -> &mut [Vector3D] {
        // any position access invalidates the neighbor list
        self.neighbors = None;
        return &mut self.positions;
    }
}

impl System for SimpleSystem {
    fn cell(&self) -> Result<UnitCell, Error> {
        Ok(self.cell)
    }

    fn size(&self) -> Result<usize, Error> {
        Ok(self.species.len())
    }

    fn species(&self) -> Result<&[Species], Error> {
        Ok(&self.species)
    }

    fn occupancies(&self) -> Result<&[f64], Error> {
        Ok(&self.occupancies)
    }

    fn positions(&self) -> Result<&[Vector3D], Error> {
        Ok(&self.positions)
    }

    #[allow(clippy::float_cmp)]
    fn compute_neighbors(&mut self, cutoff: f64) -> Result<(), Error> {
        // re-use already computed NL is possible
        if let Some(ref nl) = self.neighbors {
            if nl.cutoff == cutoff {
                return Ok(());
            }
        }

        self.neighbors = Some(NeighborsList::new(&self.positions, self.cell, cutoff));
        Ok(())
    }

    fn neighbors(&self, site: usize) -> Result<&[Neighbor], Error> {
        let neighbors = self.neighbors.as_ref().ok_or_else(|| Error::Internal(
            "neighbor list is not initialized".into()
        ))?;

        neighbors.neighbors.get(site).map(Vec::as_slice).ok_or_else(|| Error::InvalidParameter(format!(
            "site index {} is out of bounds for a system with {} sites", site, self.species.len()
        )))
    }
}

impl std::convert::TryFrom<&dyn System> for SimpleSystem {
    type Error = Error;

    fn try_from(system: &dyn System) -> Result<SimpleSystem, Error> {
        let mut new = SimpleSystem::new(system.cell()?);
        let species = system.species()?;
        let occupancies = system.occupancies()?;
        let positions = system.positions()?;

        if species.len() != positions.len() || occupancies.len() != positions.len() {
            return Err(Error::InvalidParameter(
                "species, occupancies and positions must have the same size".into()
            ));
        }

        for ((&species, &occupancy), &position) in species.iter().zip(occupancies).zip(positions) {
            new.add_partial_site(species, occupancy, position)?;
        }
        return Ok(new);
    }
}
