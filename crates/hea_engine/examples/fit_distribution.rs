//! HEA Distribution Fitting
//!
//! Fits a 3-qubit hardware-efficient ansatz to a random target
//! distribution, then repeats the fit under a depolarising noise model
//! and prints both comparison tables.

use anyhow::Result;
use hea_engine::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_target(num_qubits: usize, seed: u64) -> Result<Distribution> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let raw: Vec<f64> = (0..1usize << num_qubits).map(|_| rng.gen::<f64>()).collect();
    let total: f64 = raw.iter().sum();
    Ok(Distribution::new(raw.into_iter().map(|p| p / total).collect())?)
}

fn main() -> Result<()> {
    println!("════════════════════════════════════════════════════════════");
    println!("  HEA: fitting a random 3-qubit distribution");
    println!("════════════════════════════════════════════════════════════\n");

    let target = random_target(3, 2024)?;

    // =========================================================================
    // Ideal simulator, staged
    // =========================================================================
    let config = VqaConfig::new(target.clone())
        .with_gate_family(GateFamily::UnitaryThree)
        .with_entanglement(Entanglement::Linear)
        .with_layers(2)
        .with_seed(7);
    println!("{}\n", config);

    let mut pipeline = Pipeline::new(config);
    let circuit = pipeline.build_ansatz()?.clone();
    println!(
        "Ansatz: {} gates, depth {}, {} CNOTs\n",
        circuit.gate_count(),
        circuit.depth(),
        circuit.count_2q()
    );
    pipeline.validate_topology(Some(&Topology::linear(3)))?;
    pipeline.optimize()?;
    pipeline.sample()?;

    if let Some(report) = pipeline.report() {
        println!("{}\n", report);
    }

    // =========================================================================
    // Depolarising noise, SPSA
    // =========================================================================
    println!("────────────────────────────────────────────────────────────");
    println!("  Same target under 1% depolarising noise (SPSA)");
    println!("────────────────────────────────────────────────────────────\n");

    let spsa = Spsa::new()
        .with_max_iter(150)
        .with_early_stop(Convergence::for_shots(1024));
    let noisy = VqaConfig::new(target)
        .with_layers(2)
        .with_noise(NoiseModel::from_depol(0.01)?)
        .with_optimizer(spsa)
        .with_seed(7);

    let outcome = VqaRunner::new(noisy)?.find_target_distribution()?;
    let report = DistributionReport::from_outcome(&outcome);
    println!("{}", report.render(ReportFormat::Markdown)?);
    println!(
        "Converged: {} after {} iterations ({} ms)",
        outcome.converged, outcome.iterations, outcome.total_time_ms
    );

    Ok(())
}
