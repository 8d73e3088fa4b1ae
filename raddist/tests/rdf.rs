//! Radial distribution function of simple lattices, where the position and
//! size of the first neighbors shell is known exactly.

use approx::assert_relative_eq;

use raddist::calculators::{RadialDistribution, RadialDistributionParameters};
use raddist::systems::{SimpleSystem, Species, UnitCell};
use raddist::{Calculator, Error, Matrix3, Vector3D};

fn species(name: &str) -> Species {
    name.parse().unwrap()
}

/// Simple cubic lattice with a single site and lattice parameter `a`
fn simple_cubic(a: f64) -> SimpleSystem {
    let mut system = SimpleSystem::new(UnitCell::cubic(a).unwrap());
    system.add_site(species("Po"), Vector3D::new(0.0, 0.0, 0.0));
    return system;
}

/// Face centered cubic lattice with nearest neighbors distance of sqrt(2)
fn fcc() -> SimpleSystem {
    let cell = Matrix3::new([[0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0]]);
    let mut system = SimpleSystem::new(UnitCell::new(cell).unwrap());
    system.add_site(species("Cu"), Vector3D::new(0.0, 0.0, 0.0));
    return system;
}

#[test]
fn first_shell_simple_cubic() {
    for a in [1.0, 2.0, 4.0] {
        let parameters = RadialDistributionParameters { cutoff: 1.5 * a, bin_size: a / 8.0 };
        let rdf = RadialDistribution::new(parameters).unwrap();

        let result = rdf.compute(&mut simple_cubic(a)).unwrap();
        assert_eq!(result.distances.len(), result.distribution.len());

        let first = result.distribution.iter().position(|&value| value > 0.0).unwrap();
        assert_relative_eq!(result.distances[first], a);

        // density of 1 / a^3 and 6 neighbors in the first shell
        let shell = 4.0 / 3.0 * std::f64::consts::PI * ((a + a / 8.0).powi(3) - a.powi(3));
        assert_relative_eq!(result.distribution[first], 6.0 * a.powi(3) / shell, max_relative = 1e-12);
    }
}

#[test]
fn bins() {
    let parameters = RadialDistributionParameters { cutoff: 20.0, bin_size: 0.1 };
    let rdf = RadialDistribution::new(parameters).unwrap();
    let result = rdf.compute(&mut fcc()).unwrap();

    assert_eq!(result.distances.len(), 201);
    assert_eq!(result.distances[0], 0.0);
    assert!(result.distances.windows(2).into_iter().all(|w| w[0] < w[1]));
    assert!(result.distribution.iter().all(|&value| value >= 0.0 && value.is_finite()));
}

#[test]
fn through_calculator() {
    let calculator = Calculator::new("rdf", r#"{"cutoff": 2.0, "bin_size": 0.25}"#.into()).unwrap();
    let features = calculator.compute(&mut fcc()).unwrap();

    // 12 neighbors at sqrt(2) in fcc
    let values = features.values();
    assert_eq!(values.len(), 9);
    let shell = 4.0 / 3.0 * std::f64::consts::PI * (1.5_f64.powi(3) - 1.25_f64.powi(3));
    // the primitive cell has a volume of 2
    assert_relative_eq!(values[5], 12.0 * 2.0 / shell, max_relative = 1e-12);
}

#[test]
fn partial_occupancy() {
    let mut system = simple_cubic(2.0);
    system.add_partial_site(species("Fe"), 0.5, Vector3D::new(1.0, 1.0, 1.0)).unwrap();
    system.add_partial_site(species("Ni"), 0.5, Vector3D::new(1.0, 1.0, 1.0)).unwrap();

    let rdf = RadialDistribution::new(RadialDistributionParameters::default()).unwrap();
    match rdf.compute(&mut system) {
        Err(Error::UnsupportedStructure(message)) => assert!(message.contains("partial occupancy")),
        other => panic!("expected an unsupported structure error, got {:?}", other),
    }
}
