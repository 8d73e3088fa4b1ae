//! Collaborators used to prepare structures for the electronic RDF: primitive
//! cell reduction and assignment of oxidation states to every site.
use std::collections::BTreeMap;

use crate::Error;
use super::{Element, SimpleSystem, Species, System};

/// Reduction of a structure to its primitive cell
pub trait PrimitiveCellFinder: Send + Sync {
    /// Get the primitive cell of `system`, or `None` if no reduction was
    /// found. Callers then fall back to the original structure.
    fn find_primitive(&self, system: &dyn System) -> Result<Option<SimpleSystem>, Error>;
}

/// Primitive cell finder that never reduces the structure, for structures
/// which are already primitive (or when the reduction is done upstream).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrimitiveReduction;

impl PrimitiveCellFinder for NoPrimitiveReduction {
    fn find_primitive(&self, _: &dyn System) -> Result<Option<SimpleSystem>, Error> {
        Ok(None)
    }
}

/// Assignment of oxidation states to all sites of a structure
pub trait OxidationStateAssigner: Send + Sync {
    /// Create a copy of `system` where every site carries an oxidation
    /// state.
    fn assign(&self, system: &dyn System) -> Result<SimpleSystem, Error>;
}

/// Use the oxidation states already attached to the species of the system,
/// failing if any site does not have one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeciesOxidationStates;

impl OxidationStateAssigner for SpeciesOxidationStates {
    fn assign(&self, system: &dyn System) -> Result<SimpleSystem, Error> {
        for (site, species) in system.species()?.iter().enumerate() {
            if species.oxidation_state().is_none() {
                return Err(Error::UnsupportedStructure(format!(
                    "site {} ({}) does not have an oxidation state", site, species
                )));
            }
        }

        return SimpleSystem::try_from(system);
    }
}

/// Assign oxidation states from a fixed table of per-element values,
/// replacing any oxidation state already present on the sites.
#[derive(Debug, Clone, Default)]
pub struct FixedOxidationStates {
    oxidation_states: BTreeMap<Element, f64>,
}

impl FixedOxidationStates {
    pub fn new(oxidation_states: impl IntoIterator<Item = (Element, f64)>) -> FixedOxidationStates {
        FixedOxidationStates {
            oxidation_states: oxidation_states.into_iter().collect(),
        }
    }

    /// Create the table from element symbols, e.g. `[("Na", 1.0), ("Cl", -1.0)]`
    pub fn from_symbols<'a>(oxidation_states: impl IntoIterator<Item = (&'a str, f64)>) -> Result<FixedOxidationStates, Error> {
        let oxidation_states = oxidation_states.into_iter()
            .map(|(symbol, value)| Ok((Element::from_symbol(symbol)?, value)))
            .collect::<Result<BTreeMap<_, _>, Error>>()?;

        return Ok(FixedOxidationStates { oxidation_states });
    }
}

impl OxidationStateAssigner for FixedOxidationStates {
    fn assign(&self, system: &dyn System) -> Result<SimpleSystem, Error> {
        let mut charged = SimpleSystem::new(system.cell()?);
        let species = system.species()?;
        let occupancies = system.occupancies()?;
        let positions = system.positions()?;

        for ((species, &occupancy), &position) in species.iter().zip(occupancies).zip(positions) {
            let element = species.element();
            let oxidation_state = self.oxidation_states.get(&element).ok_or_else(|| Error::UnsupportedStructure(format!(
                "no oxidation state is defined for {}", element
            )))?;

            let species = Species::with_oxidation_state(element, *oxidation_state);
            charged.add_partial_site(species, occupancy, position)?;
        }

        return Ok(charged);
    }
}
