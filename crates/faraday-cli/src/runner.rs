//! Simulation runner: ties together geometry, grid, and solver.

use std::path::Path;

use anyhow::{Context, Result};

use faraday_core::solver::fit::FitSolver;
use faraday_core::solver::ProbeSample;
use faraday_core::types::BoundaryConfig;
use faraday_core::grid::StaggeredGrid;
use faraday_geometry::assembly::ConductorAssembly;

use crate::config::{JobConfig, SourceComponent};

/// Results from a simulation run.
pub struct SimulationOutput {
    pub probe: Vec<ProbeSample>,
    pub steps: usize,
    pub final_energy: f64,
}

/// Run a full simulation from a parsed job configuration.
pub fn run_simulation(job: &JobConfig) -> Result<(FitSolver, SimulationOutput)> {
    let assembly = ConductorAssembly::new(job.conductor.clone());
    println!(
        "  Conductors: {} solid(s), scheme {:?}",
        assembly.solids().len(),
        job.grid.scheme
    );

    let [nx, ny, nz] = job.grid.cells;
    let grid = StaggeredGrid::new(
        job.grid.bounds,
        nx,
        ny,
        nz,
        &assembly,
        job.grid.scheme,
        job.grid.stabilisation,
    )
    .context("grid construction failed")?;

    for (name, plane) in [
        ("yz", grid.faces_yz()),
        ("zx", grid.faces_zx()),
        ("xy", grid.faces_xy()),
    ] {
        let c = plane.counts();
        println!(
            "  Plane {}: {} interior, {} cut, {} excluded",
            name, c.interior, c.cut, c.excluded
        );
    }

    let bc = BoundaryConfig {
        low: job.solver.bc_low,
        high: job.solver.bc_high,
    };
    let [pi, pj, pk] = job.solver.probe;
    let mut solver = FitSolver::new(grid, job.solver.cfl, bc, (pi, pj, pk))
        .context("solver construction failed")?;
    println!("  dt = {:.4e} s over {} steps", solver.dt(), job.solver.steps);

    let mut probe = Vec::with_capacity(job.solver.steps);
    let report_every = (job.solver.steps / 10).max(1);

    for step in 0..job.solver.steps {
        if let Some(source) = &job.source {
            let value = source.value(solver.time());
            let [i, j, k] = source.cell;
            let fields = solver.fields_mut();
            match source.component {
                SourceComponent::Jx => fields.set_jx(i, j, k, value),
                SourceComponent::Jy => fields.set_jy(i, j, k, value),
                SourceComponent::Jz => fields.set_jz(i, j, k, value),
            }
        }

        solver.advance();
        probe.push(solver.probe_sample());

        // Blow-up is surfaced here, in the driving loop; the solver itself
        // never checks.
        if !solver.fields().is_finite() {
            anyhow::bail!(
                "numerical instability: non-finite field values after step {}",
                step + 1
            );
        }

        if (step + 1) % report_every == 0 || step + 1 == job.solver.steps {
            println!(
                "  [{}/{}] t = {:.4e} s, max|field| = {:.4e}",
                step + 1,
                job.solver.steps,
                solver.time(),
                solver.fields().max_abs()
            );
        }
    }

    let output = SimulationOutput {
        steps: job.solver.steps,
        final_energy: solver.energy(),
        probe,
    };
    Ok((solver, output))
}

/// Write the probe time series to a CSV file with a metadata header.
pub fn write_probe_csv(
    probe: &[ProbeSample],
    path: &Path,
    job: &JobConfig,
) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)?;

    writeln!(file, "# Faraday FIT Solver — Probe Time Series")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(
        file,
        "# probe cell: ({}, {}, {})",
        job.solver.probe[0], job.solver.probe[1], job.solver.probe[2]
    )?;
    writeln!(file, "#")?;
    writeln!(file, "time_s,ex,ey,ez,hx,hy,hz")?;

    for s in probe {
        writeln!(
            file,
            "{:.9e},{:.6e},{:.6e},{:.6e},{:.6e},{:.6e},{:.6e}",
            s.time, s.ex, s.ey, s.ez, s.hx, s.hy, s.hz
        )?;
    }

    println!("Probe series written to: {}", path.display());
    Ok(())
}

/// Write the probe time series to a JSON file.
pub fn write_probe_json(probe: &[ProbeSample], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(probe)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json)?;

    println!("Probe series (JSON) written to: {}", path.display());
    Ok(())
}

/// Write a mid-plane (z = centre) snapshot of every field component.
pub fn write_slice_csv(solver: &FitSolver, path: &Path) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let grid = solver.grid();
    let fields = solver.fields();
    let k = grid.nz() / 2;

    let mut file = std::fs::File::create(path)?;
    writeln!(file, "# Faraday FIT Solver — Field Slice at k = {}", k)?;
    writeln!(file, "# t = {:.9e} s", solver.time())?;
    writeln!(file, "#")?;
    writeln!(file, "i,j,x_m,y_m,ex,ey,ez,hx,hy,hz")?;

    for j in 0..grid.ny() {
        for i in 0..grid.nx() {
            writeln!(
                file,
                "{},{},{:.6},{:.6},{:.6e},{:.6e},{:.6e},{:.6e},{:.6e},{:.6e}",
                i,
                j,
                grid.node_x(i),
                grid.node_y(j),
                fields.ex(i, j, k),
                fields.ey(i, j, k),
                fields.ez(i, j, k),
                fields.hx(i, j, k),
                fields.hy(i, j, k),
                fields.hz(i, j, k),
            )?;
        }
    }

    println!("Field slice written to: {}", path.display());
    Ok(())
}
