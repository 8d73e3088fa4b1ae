//! Electronic radial distribution function of ionic crystals, with charges
//! coming either from the species or from a fixed table.

use approx::assert_relative_eq;

use raddist::calculators::{ElectronicRadialDistribution, ElectronicRadialDistributionParameters};
use raddist::calculators::Features;
use raddist::systems::{FixedOxidationStates, SimpleSystem, Species, UnitCell};
use raddist::{Calculator, Error, Matrix3, Vector3D};

fn species(name: &str) -> Species {
    name.parse().unwrap()
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

fn redf(cutoff: Option<f64>, dr: f64) -> ElectronicRadialDistribution {
    let parameters = ElectronicRadialDistributionParameters { cutoff, dr };
    return ElectronicRadialDistribution::new(parameters).unwrap();
}

#[test]
fn opposite_charges_contribute_twice() {
    let mut system = SimpleSystem::new(UnitCell::cubic(20.0).unwrap());
    system.add_site(species("Mg2+"), Vector3D::new(0.0, 0.0, 0.0));
    system.add_site(species("O2-"), Vector3D::new(2.5, 0.0, 0.0));

    let calculator = redf(Some(5.0), 1.0);
    let result = calculator.compute(&mut system).unwrap();

    assert_eq!(result.distances.len(), 6);
    assert_relative_eq!(result.distances[2], 2.5);
    // (2 * -2) / (2 * 2.5), seen from both sites
    assert_relative_eq!(result.distribution[2], 2.0 * -4.0 / 5.0, max_relative = 1e-12);
    assert_relative_eq!(result.distribution.sum(), result.distribution[2], max_relative = 1e-12);
}

#[test]
fn derived_cutoff() {
    let calculator = redf(None, 0.05);
    let result = calculator.compute(&mut rock_salt("Na+", "Cl-")).unwrap();

    let cutoff = f64::sqrt(12.0);
    assert_relative_eq!(calculator.cutoff().unwrap(), cutoff, max_relative = 1e-12);
    assert_eq!(result.distances.len(), (cutoff / 0.05).floor() as usize + 1);

    // first neighbors at distance 1, in bin 20
    assert_relative_eq!(result.distances[20], 1.025, max_relative = 1e-12);
    assert_relative_eq!(result.distribution[20], -6.0, max_relative = 1e-12);
    assert!(result.distribution.iter().take(20).all(|&value| value == 0.0));
}

#[test]
fn fixed_oxidation_states() {
    let charges = FixedOxidationStates::from_symbols([("Na", 1.0), ("Cl", -1.0)]).unwrap();
    let calculator = redf(Some(1.5), 0.25).with_oxidation_states(charges);

    // charges on the species are replaced by the table
    let with_table = calculator.compute(&mut rock_salt("Na2+", "Cl")).unwrap();
    let expected = redf(Some(1.5), 0.25).compute(&mut rock_salt("Na+", "Cl-")).unwrap();
    assert_eq!(with_table, expected);

    let mut system = rock_salt("Na", "Br");
    assert!(matches!(calculator.compute(&mut system), Err(Error::UnsupportedStructure(_))));
}

#[test]
fn errors() {
    let result = Calculator::new("redf", r#"{"dr": 0}"#.into());
    assert!(matches!(result, Err(Error::InvalidParameter(_))));

    let result = Calculator::new("redf", r#"{"dr": -0.5}"#.into());
    assert!(matches!(result, Err(Error::InvalidParameter(_))));

    let calculator = Calculator::new("redf", r#"{"cutoff": 1.5, "dr": 0.25}"#.into()).unwrap();

    // no oxidation states
    assert!(matches!(
        calculator.compute(&mut rock_salt("Na", "Cl")),
        Err(Error::UnsupportedStructure(_))
    ));

    let mut disordered = rock_salt("Na+", "Cl-");
    disordered.add_partial_site(species("K+"), 0.5, Vector3D::new(0.5, 0.5, 0.5)).unwrap();
    assert!(matches!(
        calculator.compute(&mut disordered),
        Err(Error::UnsupportedStructure(_))
    ));

    match calculator.compute(&mut rock_salt("Na+", "Cl-")).unwrap() {
        Features::Distribution(result) => assert_eq!(result.distances.len(), 7),
        Features::Vector(_) => panic!("expected a distribution"),
    }
}
