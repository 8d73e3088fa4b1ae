use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::panic::AssertUnwindSafe;

use once_cell::sync::Lazy;
use rayon::prelude::*;

use crate::{SimpleSystem, System, Error};

use crate::calculators::{CalculatorBase, Features};

/// The `Calculator` type is the main entry point of this library. It wraps
/// one of the implementations of `CalculatorBase`, created by name from the
/// list of registered calculators.
pub struct Calculator {
    implementation: Box<dyn CalculatorBase>,
    parameters: String,
}

/// Parameters specific to a single call to `compute_many`
#[derive(Debug, Clone, Copy, Default)]
pub struct CalculationOptions {
    /// Run the calculation for different systems in parallel, using rayon's
    /// global thread pool
    pub parallel: bool,
    /// Copy the data from systems into native `SimpleSystem` before running
    /// the calculation. This can be faster for systems where accessing the
    /// data is expensive.
    pub use_native_system: bool,
}

impl From<Box<dyn CalculatorBase>> for Calculator {
    fn from(implementation: Box<dyn CalculatorBase>) -> Calculator {
        let parameters = implementation.parameters();
        Calculator {
            implementation: implementation,
            parameters: parameters,
        }
    }
}

impl std::fmt::Debug for Calculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calculator")
            .field("name", &self.implementation.name())
            .field("parameters", &self.parameters)
            .finish()
    }
}

impl Calculator {
    /// Create a new calculator with the given `name` and `parameters`.
    ///
    /// The available calculators are `"rdf"`, `"prdf"` and `"redf"`. The
    /// `parameters` should be formatted as JSON, and missing parameters take
    /// their default value.
    ///
    /// # Errors
    ///
    /// This function returns an error if there is no registered calculator with
    /// the given `name`, or if the parameters are invalid for this calculator.
    pub fn new(name: &str, parameters: String) -> Result<Calculator, Error> {
        let creator = match REGISTERED_CALCULATORS.get(name) {
            Some(creator) => creator,
            None => {
                return Err(Error::InvalidParameter(
                    format!("unknown calculator with name '{}'", name)
                ));
            }
        };

        return Ok(Calculator {
            implementation: creator(&parameters)?,
            parameters: parameters,
        })
    }

    /// Get the name of this calculator
    pub fn name(&self) -> String {
        self.implementation.name()
    }

    /// Get the parameters used to create this calculator in a string, formatted
    /// as JSON.
    pub fn parameters(&self) -> &str {
        &self.parameters
    }

    /// Prepare the calculator with a set of training `systems`. This is
    /// required before any call to `compute` for the partial RDF, and does
    /// nothing for the other calculators.
    #[time_graph::instrument(name = "Calculator::fit")]
    pub fn fit(&mut self, systems: &[Box<dyn System>]) -> Result<(), Error> {
        self.implementation.fit(systems)
    }

    /// Get the names of the features computed by this calculator
    pub fn feature_labels(&self) -> Result<Vec<String>, Error> {
        self.implementation.feature_labels()
    }

    /// Get the references to cite when using this calculator, as BibTeX
    pub fn citations(&self) -> Vec<String> {
        self.implementation.citations()
    }

    /// Get the authors of the original implementation of this calculator
    pub fn implementors(&self) -> Vec<String> {
        self.implementation.implementors()
    }

    /// Compute the features for a single `system`.
    ///
    /// Panics in the calculator are caught and converted to
    /// `Error::Internal`.
    pub fn compute(&self, system: &mut dyn System) -> Result<Features, Error> {
        let implementation = &*self.implementation;
        match std::panic::catch_unwind(AssertUnwindSafe(|| implementation.compute(system))) {
            Ok(result) => result,
            Err(payload) => Err(Error::from(payload)),
        }
    }

    /// Compute the features for all the given `systems`, returning them in
    /// the same order as the systems.
    ///
    /// The first error encountered stops the calculation, there are no
    /// partial results.
    #[time_graph::instrument(name = "Calculator::compute_many")]
    pub fn compute_many(
        &self,
        systems: &mut [Box<dyn System>],
        options: CalculationOptions,
    ) -> Result<Vec<Features>, Error> {
        let mut native_systems;
        let systems = if options.use_native_system {
            native_systems = Vec::with_capacity(systems.len());
            for system in systems.iter() {
                native_systems.push(Box::new(SimpleSystem::try_from(&**system)?) as Box<dyn System>);
            }
            &mut native_systems[..]
        } else {
            systems
        };

        if options.parallel {
            return systems.par_iter_mut()
                .map(|system| self.compute(&mut **system))
                .collect();
        }

        return systems.iter_mut()
            .map(|system| self.compute(&mut **system))
            .collect();
    }
}

type CalculatorCreator = fn(&str) -> Result<Box<dyn CalculatorBase>, Error>;

macro_rules! add_calculator {
    ($map :expr, $name :literal, $type :ty, $parameters :ty) => (
        $map.insert($name, (|json| {
            let parameters = serde_json::from_str::<$parameters>(json)?;
            Ok(Box::new(<$type>::new(parameters)?))
        }) as CalculatorCreator);
    );
}

static REGISTERED_CALCULATORS: Lazy<BTreeMap<&'static str, CalculatorCreator>> = Lazy::new(|| {
    let mut map = BTreeMap::new();
    add_calculator!(map, "rdf", RadialDistribution, RadialDistributionParameters);
    add_calculator!(map, "prdf", PartialRadialDistribution, PartialRadialDistributionParameters);
    add_calculator!(map, "redf", ElectronicRadialDistribution, ElectronicRadialDistributionParameters);
    return map;
});

// Registration of calculator implementations
use crate::calculators::{RadialDistribution, RadialDistributionParameters};
use crate::calculators::{PartialRadialDistribution, PartialRadialDistributionParameters};
use crate::calculators::{ElectronicRadialDistribution, ElectronicRadialDistributionParameters};
