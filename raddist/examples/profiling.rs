use raddist::systems::{SimpleSystem, Species, UnitCell};
use raddist::{Calculator, CalculationOptions, System, Vector3D};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let n_cells = match std::env::args().nth(1) {
        Some(value) => value.parse()?,
        None => 3,
    };

    // enable collection of profiling data
    time_graph::enable_data_collection(true);
    // clear any existing collected data
    time_graph::clear_collected_data();

    // run the calculation
    let _features = compute_distributions(n_cells)?;

    // get the call graph and display it
    let graph = time_graph::get_full_graph();
    // (this requires the "table" feature for the time_graph crate)
    println!("{}", graph.as_short_table());

    // also available for saving profiling data to the disk & future analysis
    // (this requires the "json" feature for the time_graph crate)
    println!("{}", graph.as_json());

    Ok(())
}

/// Rock-salt supercell with `n x n x n` conventional cells, with charges on
/// all sites
fn rock_salt(n: usize) -> Result<SimpleSystem, Box<dyn std::error::Error>> {
    let a = 5.64;
    let mut system = SimpleSystem::new(UnitCell::cubic(a * n as f64)?);

    let sodium: Species = "Na+".parse()?;
    let chlorine: Species = "Cl-".parse()?;
    for i in 0..(2 * n) {
        for j in 0..(2 * n) {
            for k in 0..(2 * n) {
                let species = if (i + j + k) % 2 == 0 { sodium } else { chlorine };
                system.add_site(species, Vector3D::new(i as f64, j as f64, k as f64) * (a / 2.0));
            }
        }
    }

    Ok(system)
}

/// Compute the three radial distributions for a rock-salt supercell
fn compute_distributions(n_cells: usize) -> Result<Vec<raddist::calculators::Features>, Box<dyn std::error::Error>> {
    let mut systems = vec![Box::new(rock_salt(n_cells)?) as Box<dyn System>];

    let features = time_graph::spanned!("Full calculation", {
        let options = CalculationOptions {
            parallel: false,
            use_native_system: false,
        };

        let rdf = Calculator::new("rdf", r#"{"cutoff": 10.0}"#.to_owned())?;
        let mut features = rdf.compute_many(&mut systems, options)?;

        let mut prdf = Calculator::new("prdf", r#"{"cutoff": 10.0}"#.to_owned())?;
        prdf.fit(&systems)?;
        features.extend(prdf.compute_many(&mut systems, options)?);

        let redf = Calculator::new("redf", r#"{"dr": 0.05}"#.to_owned())?;
        features.extend(redf.compute_many(&mut systems, options)?);

        features
    });

    Ok(features)
}
