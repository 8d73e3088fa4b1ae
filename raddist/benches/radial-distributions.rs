#![allow(clippy::needless_return)]

use raddist::calculators::{RadialDistribution, RadialDistributionParameters};
use raddist::calculators::{PartialRadialDistribution, PartialRadialDistributionParameters};
use raddist::calculators::{ElectronicRadialDistribution, ElectronicRadialDistributionParameters};
use raddist::systems::{SimpleSystem, Species, UnitCell};
use raddist::{System, Vector3D};

use criterion::{BenchmarkGroup, Criterion, measurement::WallTime, SamplingMode};
use criterion::{black_box, criterion_group, criterion_main};

/// Rock-salt supercell with `n x n x n` conventional cells
fn rock_salt_supercell(n: usize) -> SimpleSystem {
    let a = 5.64;
    let length = a * n as f64;
    let mut system = SimpleSystem::new(UnitCell::cubic(length).unwrap());

    let sodium: Species = "Na+".parse().unwrap();
    let chlorine: Species = "Cl-".parse().unwrap();
    for i in 0..(2 * n) {
        for j in 0..(2 * n) {
            for k in 0..(2 * n) {
                let species = if (i + j + k) % 2 == 0 { sodium } else { chlorine };
                let position = Vector3D::new(i as f64, j as f64, k as f64) * (a / 2.0);
                system.add_site(species, position);
            }
        }
    }

    return system;
}

fn run_rdf(mut group: BenchmarkGroup<WallTime>, system: &SimpleSystem) {
    for &cutoff in black_box(&[5.0, 10.0, 20.0]) {
        let parameters = RadialDistributionParameters { cutoff, bin_size: 0.1 };
        let calculator = RadialDistribution::new(parameters).unwrap();

        group.bench_function(&format!("cutoff = {}", cutoff), |b| b.iter(|| {
            let mut system = system.clone();
            calculator.compute(&mut system).unwrap()
        }));
    }

    group.finish();
}

fn run_prdf(mut group: BenchmarkGroup<WallTime>, system: &SimpleSystem) {
    for &cutoff in black_box(&[5.0, 10.0, 20.0]) {
        let parameters = PartialRadialDistributionParameters {
            cutoff,
            bin_size: 0.1,
            ..Default::default()
        };
        let mut calculator = PartialRadialDistribution::new(parameters).unwrap();
        calculator.fit(&[Box::new(system.clone()) as Box<dyn System>]).unwrap();

        group.bench_function(&format!("cutoff = {}", cutoff), |b| b.iter(|| {
            let mut system = system.clone();
            calculator.compute(&mut system).unwrap()
        }));
    }

    group.finish();
}

fn run_redf(mut group: BenchmarkGroup<WallTime>, system: &SimpleSystem) {
    for &dr in black_box(&[0.05, 0.1, 0.5]) {
        let parameters = ElectronicRadialDistributionParameters { cutoff: None, dr };
        let calculator = ElectronicRadialDistribution::new(parameters).unwrap();

        group.bench_function(&format!("dr = {}", dr), |b| b.iter(|| {
            let mut system = system.clone();
            calculator.compute(&mut system).unwrap()
        }));
    }

    group.finish();
}

fn radial_distributions(c: &mut Criterion) {
    for n in [1, 2] {
        let system = rock_salt_supercell(n);

        let mut group = c.benchmark_group(&format!("RDF for {} atoms", system.size().unwrap()));
        group.noise_threshold(0.05);
        group.sampling_mode(SamplingMode::Flat);
        run_rdf(group, &system);

        let mut group = c.benchmark_group(&format!("PRDF for {} atoms", system.size().unwrap()));
        group.noise_threshold(0.05);
        group.sampling_mode(SamplingMode::Flat);
        run_prdf(group, &system);

        let mut group = c.benchmark_group(&format!("ReDF for {} atoms", system.size().unwrap()));
        group.noise_threshold(0.05);
        group.sampling_mode(SamplingMode::Flat);
        run_redf(group, &system);
    }
}

criterion_group!(all, radial_distributions);
criterion_main!(all);
