use crate::{Matrix3, System, Vector3D};
use super::{UnitCell, SimpleSystem, Species};

pub fn test_systems(names: &[&str]) -> Vec<Box<dyn System>> {
    return names.iter()
        .map(|&name| Box::new(test_system(name)) as Box<dyn System>)
        .collect();
}

pub fn test_system(name: &str) -> SimpleSystem {
    match name {
        "Po" => get_po(),
        "water" => get_water(),
        "NaCl" => get_nacl(&["Na", "Cl"]),
        "NaCl-charged" => get_nacl(&["Na+", "Cl-"]),
        "FeO" => get_nacl(&["Fe", "O"]),
        "CsCl" => get_cscl(&["Cl", "Cs"]),
        "FeNi" => get_cscl(&["Fe", "Ni"]),
        "FeNi-disordered" => get_fe_ni_disordered(),
        _ => panic!("unknown test system {}", name)
    }
}

fn species(name: &str) -> Species {
    name.parse().expect("invalid species in test system")
}

/// Simple cubic polonium, with a lattice parameter of 2
fn get_po() -> SimpleSystem {
    let mut system = SimpleSystem::new(UnitCell::cubic(2.0).unwrap());
    system.add_site(species("Po"), Vector3D::new(0.0, 0.0, 0.0));
    return system;
}

fn get_water() -> SimpleSystem {
    let mut system = SimpleSystem::new(UnitCell::cubic(10.0).unwrap());
    system.add_site(species("O"), Vector3D::new(0.0, 0.0, 0.0));
    system.add_site(species("H"), Vector3D::new(0.0, 0.75545, -0.58895));
    system.add_site(species("H"), Vector3D::new(0.0, -0.75545, -0.58895));
    return system;
}

/// Rock-salt structure
/// Using a primitive unit cell, the distance between the
/// closest pair of different atoms is exactly 1. The cubic
/// unit cell in these units would have a length of 2.
fn get_nacl(names: &[&str; 2]) -> SimpleSystem {
    let cell = Matrix3::new([[0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0]]);
    let mut system = SimpleSystem::new(UnitCell::new(cell).unwrap());
    system.add_site(species(names[0]), Vector3D::new(0.0, 0.0, 0.0));
    system.add_site(species(names[1]), Vector3D::new(1.0, 0.0, 0.0));
    return system;
}

/// CsCl structure
/// The primitive unit cell is the usual cubic cell with side length set to
/// one.
fn get_cscl(names: &[&str; 2]) -> SimpleSystem {
    let mut system = SimpleSystem::new(UnitCell::cubic(1.0).unwrap());
    system.add_site(species(names[0]), Vector3D::new(0.0, 0.0, 0.0));
    system.add_site(species(names[1]), Vector3D::new(0.5, 0.5, 0.5));
    return system;
}

/// CsCl-like structure with a mixed Fe/Ni site
fn get_fe_ni_disordered() -> SimpleSystem {
    let mut system = SimpleSystem::new(UnitCell::cubic(1.0).unwrap());
    system.add_site(species("Fe"), Vector3D::new(0.0, 0.0, 0.0));
    system.add_partial_site(species("Fe"), 0.5, Vector3D::new(0.5, 0.5, 0.5)).unwrap();
    system.add_partial_site(species("Ni"), 0.5, Vector3D::new(0.5, 0.5, 0.5)).unwrap();
    return system;
}
