//! Partial radial distribution functions: vocabulary fitting, ordering of the
//! features and normalization by the number of sites of each element.

use approx::assert_relative_eq;

use raddist::calculators::{PartialRadialDistribution, PartialRadialDistributionParameters};
use raddist::systems::{Element, SimpleSystem, Species, UnitCell};
use raddist::{Calculator, Error, Matrix3, System, Vector3D};

fn species(name: &str) -> Species {
    name.parse().unwrap()
}

fn element(symbol: &str) -> Element {
    symbol.parse().unwrap()
}

/// Rock-salt structure with a primitive cell, the closest pair of different
/// atoms is at a distance of 1
fn rock_salt(first: &str, second: &str) -> SimpleSystem {
    let cell = Matrix3::new([[0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0]]);
    let mut system = SimpleSystem::new(UnitCell::new(cell).unwrap());
    system.add_site(species(first), Vector3D::new(0.0, 0.0, 0.0));
    system.add_site(species(second), Vector3D::new(1.0, 0.0, 0.0));
    return system;
}

/// CsCl structure in a cubic cell of side 1
fn cesium_chloride(first: &str, second: &str) -> SimpleSystem {
    let mut system = SimpleSystem::new(UnitCell::cubic(1.0).unwrap());
    system.add_site(species(first), Vector3D::new(0.0, 0.0, 0.0));
    system.add_site(species(second), Vector3D::new(0.5, 0.5, 0.5));
    return system;
}

fn boxed(system: SimpleSystem) -> Box<dyn System> {
    Box::new(system)
}

fn prdf(cutoff: f64, bin_size: f64) -> PartialRadialDistribution {
    let parameters = PartialRadialDistributionParameters {
        cutoff,
        bin_size,
        ..Default::default()
    };
    return PartialRadialDistribution::new(parameters).unwrap();
}

#[test]
fn vocabulary_does_not_depend_on_fit_order() {
    let iron_oxide = || boxed(rock_salt("Fe", "O"));
    let iron_nickel = || boxed(cesium_chloride("Fe", "Ni"));

    let mut calculator = prdf(2.0, 0.5);
    calculator.fit(&[iron_oxide(), iron_nickel()]).unwrap();
    let first = calculator.vocabulary().unwrap().symbols();

    calculator.fit(&[iron_nickel(), iron_oxide()]).unwrap();
    let second = calculator.vocabulary().unwrap().symbols();

    assert_eq!(first, ["Fe", "Ni", "O"]);
    assert_eq!(first, second);
}

#[test]
fn oxidation_states_are_ignored() {
    let mut calculator = prdf(2.0, 0.5);
    calculator.fit(&[boxed(rock_salt("Na+", "Cl-")), boxed(rock_salt("Na", "Cl"))]).unwrap();
    assert_eq!(calculator.vocabulary().unwrap().symbols(), ["Na", "Cl"]);
}

#[test]
fn output_length() {
    let mut calculator = prdf(3.0, 0.25);
    calculator.fit(&[boxed(rock_salt("Fe", "O")), boxed(cesium_chloride("Fe", "Ni"))]).unwrap();

    let n_bins = 13;
    let n_pairs = 6;
    let labels = calculator.feature_labels().unwrap();
    assert_eq!(labels.len(), n_pairs * n_bins);
    assert_eq!(labels[0], "Fe-Fe PRDF r=0.00-0.25");
    assert_eq!(labels[n_bins], "Fe-Ni PRDF r=0.00-0.25");
    assert_eq!(labels[labels.len() - 1], "O-O PRDF r=3.00-3.25");

    for mut system in [rock_salt("Fe", "O"), cesium_chloride("Fe", "Ni"), rock_salt("Na", "Cl")] {
        let features = calculator.compute(&mut system).unwrap();
        assert_eq!(features.len(), n_pairs * n_bins);
        assert!(features.iter().all(|&value| value >= 0.0));
    }
}

#[test]
fn per_element_density() {
    // CsCl: each site has 8 neighbors of the other element at sqrt(3)/2
    let mut calculator = prdf(1.0, 0.125);
    calculator.fit(&[boxed(cesium_chloride("Cl", "Cs"))]).unwrap();
    assert_eq!(calculator.vocabulary().unwrap().symbols(), ["Cs", "Cl"]);

    let mut system = cesium_chloride("Cl", "Cs");
    let pairs = calculator.compute_pairs(&mut system).unwrap();

    let distance = f64::sqrt(3.0) / 2.0;
    let bin = (distance / 0.125).floor() as usize;
    let (start, end) = (bin as f64 * 0.125, (bin + 1) as f64 * 0.125);
    let shell = 4.0 / 3.0 * std::f64::consts::PI * (end.powi(3) - start.powi(3));

    let cs_cl = pairs.get(element("Cs"), element("Cl")).unwrap();
    let cl_cs = pairs.get(element("Cl"), element("Cs")).unwrap();
    // there is a single site of each element in the structure
    assert_relative_eq!(cs_cl[bin], 8.0 / shell, max_relative = 1e-12);
    assert_relative_eq!(cl_cs[bin], 8.0 / shell, max_relative = 1e-12);

    let cs_cs = pairs.get(element("Cs"), element("Cs")).unwrap();
    assert_relative_eq!(cs_cs[8], 6.0 / (4.0 / 3.0 * std::f64::consts::PI * (1.125_f64.powi(3) - 1.0)), max_relative = 1e-12);

    let features = calculator.compute(&mut system).unwrap();
    let n_bins = pairs.distances.len();
    assert_eq!(features[n_bins + bin], cs_cl[bin]);
}

#[test]
fn errors() {
    let calculator = prdf(2.0, 0.5);
    assert!(matches!(
        calculator.compute(&mut rock_salt("Fe", "O")),
        Err(Error::NotFitted(_))
    ));

    let result = Calculator::new("prdf", r#"{"include_elements": ["Fe", "Qz"]}"#.into());
    assert!(matches!(result, Err(Error::InvalidParameter(_))));

    let mut calculator = prdf(2.0, 0.5);
    calculator.fit(&[boxed(rock_salt("Fe", "O"))]).unwrap();

    let mut system = rock_salt("Fe", "O");
    system.add_partial_site(species("Ni"), 0.5, Vector3D::new(0.5, 0.5, 0.5)).unwrap();
    assert!(matches!(
        calculator.compute(&mut system),
        Err(Error::UnsupportedStructure(_))
    ));
}
