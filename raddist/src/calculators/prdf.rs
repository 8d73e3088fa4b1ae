use std::collections::BTreeSet;

use indexmap::IndexSet;
use log::info;
use ndarray::{s, Array1, Array3};

use super::{CalculatorBase, Features};

use crate::{Error, System};
use crate::math::{bin_index, make_bins, normalize_counts, shell_volumes};
use crate::systems::{check_ordered, Element};

fn default_cutoff() -> f64 { 20.0 }
fn default_bin_size() -> f64 { 0.1 }

/// Parameters for the partial radial distribution function calculator
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PartialRadialDistributionParameters {
    /// Largest distance to include in the distributions
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
    /// Width of the distance bins
    #[serde(default = "default_bin_size")]
    pub bin_size: f64,
    /// Element symbols to always include in the vocabulary, even if they are
    /// not present in the structures used for fitting
    #[serde(default)]
    pub include_elements: Vec<String>,
    /// Element symbols to never include in the vocabulary
    #[serde(default)]
    pub exclude_elements: Vec<String>,
}

impl Default for PartialRadialDistributionParameters {
    fn default() -> Self {
        PartialRadialDistributionParameters {
            cutoff: default_cutoff(),
            bin_size: default_bin_size(),
            include_elements: Vec::new(),
            exclude_elements: Vec::new(),
        }
    }
}

/// Ordered set of elements a partial RDF calculator was fitted against.
///
/// Elements are sorted in canonical order (increasing electronegativity),
/// and each element is identified by its position in the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    elements: IndexSet<Element>,
}

impl Vocabulary {
    fn new(elements: BTreeSet<Element>) -> Vocabulary {
        Vocabulary { elements: elements.into_iter().collect() }
    }

    /// Number of elements in this vocabulary
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over the elements, in order
    pub fn elements(&self) -> impl ExactSizeIterator<Item = Element> + '_ {
        self.elements.iter().copied()
    }

    /// Get the element at position `index`
    pub fn element(&self, index: usize) -> Option<Element> {
        self.elements.get_index(index).copied()
    }

    /// Get the position of `element` in this vocabulary, if it is part of it
    pub fn index_of(&self, element: Element) -> Option<usize> {
        self.elements.get_index_of(&element)
    }

    /// Get the symbols of the elements, in order
    pub fn symbols(&self) -> Vec<&'static str> {
        self.elements().map(Element::symbol).collect()
    }

    /// Iterate over all pairs of element indexes `(i, j)` with `i <= j`, in
    /// the order used by the partial RDF features.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> {
        let n_elements = self.len();
        (0..n_elements).flat_map(move |first| (first..n_elements).map(move |second| (first, second)))
    }

    /// Number of pairs returned by `pairs`
    pub fn n_pairs(&self) -> usize {
        self.len() * (self.len() + 1) / 2
    }
}

/// Partial radial distribution functions for every ordered pair of elements
/// in a vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct PairDistributions {
    /// Start of each distance bin
    pub distances: Array1<f64>,
    /// Elements used to index `values`
    pub elements: Vec<Element>,
    /// Value of the distributions, with shape `[elements, elements, bins]`.
    /// `values[[i, j, bin]]` is the distribution of neighbors with element
    /// `elements[j]` around sites with element `elements[i]`.
    pub values: Array3<f64>,
}

impl PairDistributions {
    /// Get the distribution of `neighbor` around `origin`, if both elements
    /// are part of these distributions
    pub fn get(&self, origin: Element, neighbor: Element) -> Option<Array1<f64>> {
        let origin = self.elements.iter().position(|&e| e == origin)?;
        let neighbor = self.elements.iter().position(|&e| e == neighbor)?;
        Some(self.values.slice(s![origin, neighbor, ..]).to_owned())
    }
}

#[derive(Debug, Clone)]
enum FitState {
    Unfitted,
    Fitted(Vocabulary),
}

/// Partial radial distribution function (PRDF) of a crystal structure.
///
/// The PRDF is the radial distribution function broken down for each pair of
/// elements: for a pair `(A, B)`, it is the number of `B` neighbors at a
/// given distance from `A` sites, divided by the shell volume at this
/// distance and by the number of `A` sites.
///
/// The calculator must be fitted on a set of structures before use, to fix
/// the list of elements (and thus the features) it will produce.
#[derive(Debug, Clone)]
pub struct PartialRadialDistribution {
    parameters: PartialRadialDistributionParameters,
    include: Vec<Element>,
    exclude: Vec<Element>,
    state: FitState,
}

fn parse_elements(symbols: &[String]) -> Result<Vec<Element>, Error> {
    symbols.iter().map(|symbol| Element::from_symbol(symbol)).collect()
}

impl PartialRadialDistribution {
    /// Create a new, unfitted, partial radial distribution calculator
    pub fn new(parameters: PartialRadialDistributionParameters) -> Result<PartialRadialDistribution, Error> {
        if !(parameters.cutoff > 0.0) || !parameters.cutoff.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "cutoff for PRDF must be a positive finite number, got {}", parameters.cutoff
            )));
        }
        make_bins(parameters.cutoff, parameters.bin_size)?;

        let include = parse_elements(&parameters.include_elements)?;
        let exclude = parse_elements(&parameters.exclude_elements)?;

        Ok(PartialRadialDistribution {
            parameters,
            include,
            exclude,
            state: FitState::Unfitted,
        })
    }

    /// Get the parameters used to create this calculator
    pub fn parameters(&self) -> &PartialRadialDistributionParameters {
        &self.parameters
    }

    /// Get the fitted vocabulary, or `None` if `fit` was not called yet
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        match &self.state {
            FitState::Unfitted => None,
            FitState::Fitted(vocabulary) => Some(vocabulary),
        }
    }

    fn fitted_vocabulary(&self) -> Result<&Vocabulary, Error> {
        self.vocabulary().ok_or_else(|| Error::NotFitted(
            "the partial RDF must be fitted on a set of structures before use".into()
        ))
    }

    /// Define the list of elements this calculator works with, from the
    /// elements present in `systems` and the `include_elements`/
    /// `exclude_elements` parameters.
    ///
    /// Calling this function again replaces the previous vocabulary.
    pub fn fit(&mut self, systems: &[Box<dyn System>]) -> Result<&Vocabulary, Error> {
        let mut elements = self.include.iter().copied().collect::<BTreeSet<_>>();
        for system in systems {
            elements.extend(system.composition()?.elements());
        }

        for element in &self.exclude {
            elements.remove(element);
        }

        let vocabulary = Vocabulary::new(elements);
        info!(
            "fitted partial RDF on {} structures, found elements [{}]",
            systems.len(), vocabulary.symbols().join(", ")
        );

        self.state = FitState::Fitted(vocabulary);
        return self.fitted_vocabulary();
    }

    /// Compute the distribution of every element of the vocabulary around
    /// every other element of the vocabulary in the given `system`.
    ///
    /// Elements of the system which are not part of the vocabulary are
    /// ignored, and distributions around elements missing from the system
    /// are zero.
    #[time_graph::instrument(name = "PartialRadialDistribution::compute_pairs")]
    pub fn compute_pairs(&self, system: &mut dyn System) -> Result<PairDistributions, Error> {
        let vocabulary = self.fitted_vocabulary()?;
        check_ordered(system)?;

        let edges = make_bins(self.parameters.cutoff, self.parameters.bin_size)?;
        let n_bins = edges.len() - 1;
        let n_elements = vocabulary.len();

        let n_sites = system.size()?;
        let composition = system.composition()?.fractional();

        system.compute_neighbors(self.parameters.cutoff)?;
        let site_to_element = system.species()?.iter()
            .map(|species| vocabulary.index_of(species.element()))
            .collect::<Vec<_>>();

        let mut counts = Array3::<f64>::zeros((n_elements, n_elements, n_bins));
        for (site, &origin) in site_to_element.iter().enumerate() {
            let Some(origin) = origin else {
                continue;
            };

            for neighbor in system.neighbors(site)? {
                let Some(other) = site_to_element[neighbor.site] else {
                    continue;
                };

                if let Some(bin) = bin_index(&edges, neighbor.distance) {
                    counts[[origin, other, bin]] += 1.0;
                }
            }
        }

        let volumes = shell_volumes(&edges)?;
        let mut values = Array3::<f64>::zeros((n_elements, n_elements, n_bins));
        for (origin, element) in vocabulary.elements().enumerate() {
            if !composition.contains(element) {
                continue;
            }

            let number_density = composition.amount(element) * n_sites as f64;
            for other in 0..n_elements {
                let normalized = normalize_counts(
                    counts.slice(s![origin, other, ..]),
                    volumes.view(),
                    number_density,
                )?;
                values.slice_mut(s![origin, other, ..]).assign(&normalized);
            }
        }

        return Ok(PairDistributions {
            distances: edges[..n_bins].iter().copied().collect(),
            elements: vocabulary.elements().collect(),
            values,
        });
    }

    /// Compute the partial RDF features of the given `system`, as a single
    /// vector containing the distributions for all pairs `(A, B)` of
    /// elements in the vocabulary where `A` comes before or is `B`.
    #[time_graph::instrument(name = "PartialRadialDistribution::compute")]
    pub fn compute(&self, system: &mut dyn System) -> Result<Array1<f64>, Error> {
        let pairs = self.compute_pairs(system)?;
        let vocabulary = self.fitted_vocabulary()?;

        let n_bins = pairs.distances.len();
        let mut features = Array1::<f64>::zeros(vocabulary.n_pairs() * n_bins);
        for (index, (first, second)) in vocabulary.pairs().enumerate() {
            features.slice_mut(s![index * n_bins..(index + 1) * n_bins])
                .assign(&pairs.values.slice(s![first, second, ..]));
        }

        return Ok(features);
    }

    /// Get the name of all the features produced by `compute`
    pub fn feature_labels(&self) -> Result<Vec<String>, Error> {
        let vocabulary = self.fitted_vocabulary()?;
        let edges = make_bins(self.parameters.cutoff, self.parameters.bin_size)?;

        let mut labels = Vec::with_capacity(vocabulary.n_pairs() * (edges.len() - 1));
        for (first, second) in vocabulary.pairs() {
            let first = vocabulary.elements[first];
            let second = vocabulary.elements[second];
            for bin in edges.windows(2) {
                labels.push(format!("{}-{} PRDF r={:.2}-{:.2}", first, second, bin[0], bin[1]));
            }
        }

        return Ok(labels);
    }
}

impl CalculatorBase for PartialRadialDistribution {
    fn name(&self) -> String {
        "partial radial distribution function".into()
    }

    fn parameters(&self) -> String {
        serde_json::to_string(&self.parameters).expect("failed to serialize to JSON")
    }

    fn fit(&mut self, systems: &[Box<dyn System>]) -> Result<(), Error> {
        PartialRadialDistribution::fit(self, systems)?;
        Ok(())
    }

    fn feature_labels(&self) -> Result<Vec<String>, Error> {
        PartialRadialDistribution::feature_labels(self)
    }

    fn citations(&self) -> Vec<String> {
        vec![
            "@article{Schutt2014, \
            author = {Sch{\\\"{u}}tt, K. T. and Glawe, H. and Brockherde, F. and Sanna, A. \
            and M{\\\"{u}}ller, K. R. and Gross, E. K. U.}, \
            doi = {10.1103/PhysRevB.89.205118}, \
            journal = {Physical Review B}, month = {may}, number = {20}, pages = {205118}, \
            title = {{How to represent crystal structures for machine learning: \
            Towards fast prediction of electronic properties}}, \
            url = {http://link.aps.org/doi/10.1103/PhysRevB.89.205118}, \
            volume = {89}, year = {2014}}".into()
        ]
    }

    fn implementors(&self) -> Vec<String> {
        vec!["Logan Ward".into(), "Saurabh Bajaj".into()]
    }

    fn compute(&self, system: &mut dyn System) -> Result<Features, Error> {
        PartialRadialDistribution::compute(self, system).map(Features::Vector)
    }
}
