//! TOML configuration deserialisation for simulation jobs.

use serde::Deserialize;

use faraday_core::types::{BoundaryKind, GridBounds, GridScheme, StabilisationPolicy};
use faraday_geometry::primitives::Solid;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub grid: GridConfig,
    /// Conductor solids composed by union; may be empty.
    #[serde(default)]
    pub conductor: Vec<Solid>,
    pub solver: SolverConfig,
    /// Optional current source injected between steps.
    #[serde(default)]
    pub source: Option<SourceConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Grid parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct GridConfig {
    pub bounds: GridBounds,
    /// Cell counts along x, y, z.
    pub cells: [usize; 3],
    #[serde(default = "default_scheme")]
    pub scheme: GridScheme,
    #[serde(default)]
    pub stabilisation: StabilisationPolicy,
}

fn default_scheme() -> GridScheme {
    GridScheme::Conformal
}

/// Solver parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_cfl")]
    pub cfl: f64,
    /// Boundary condition at the low bound of each axis.
    #[serde(default = "default_bc")]
    pub bc_low: [BoundaryKind; 3],
    /// Boundary condition at the high bound of each axis.
    #[serde(default = "default_bc")]
    pub bc_high: [BoundaryKind; 3],
    /// Number of leapfrog steps to run.
    pub steps: usize,
    /// Probe cell recorded every step.
    #[serde(default)]
    pub probe: [usize; 3],
}

fn default_cfl() -> f64 {
    1.0
}

fn default_bc() -> [BoundaryKind; 3] {
    [BoundaryKind::Periodic; 3]
}

/// Which current component a source drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceComponent {
    Jx,
    Jy,
    Jz,
}

/// A Gaussian-pulse current source at a single cell.
#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    pub component: SourceComponent,
    pub cell: [usize; 3],
    /// Peak current density (A/m²).
    pub amplitude: f64,
    /// Pulse centre time (s).
    pub t0: f64,
    /// Pulse width (s).
    pub sigma: f64,
}

impl SourceConfig {
    /// Pulse value at time `t`.
    pub fn value(&self, t: f64) -> f64 {
        let arg = (t - self.t0) / self.sigma;
        self.amplitude * (-0.5 * arg * arg).exp()
    }
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save the probe time series as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_probe: bool,
    /// Whether to also save the probe series as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
    /// Whether to save a mid-plane field snapshot after the last step
    /// (default: false).
    #[serde(default)]
    pub save_slice: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_probe: true,
            save_json: false,
            save_slice: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}

fn default_true() -> bool {
    true
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: JobConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [grid]
        bounds = { xmin = -0.5, xmax = 0.5, ymin = -0.5, ymax = 0.5, zmin = -0.5, zmax = 0.5 }
        cells = [30, 30, 30]

        [solver]
        steps = 100
        probe = [15, 15, 15]
    "#;

    #[test]
    fn test_minimal_config_defaults() {
        let job: JobConfig = toml::from_str(MINIMAL).unwrap();
        assert_eq!(job.grid.cells, [30, 30, 30]);
        assert_eq!(job.grid.scheme, GridScheme::Conformal);
        assert_eq!(job.solver.cfl, 1.0);
        assert_eq!(job.solver.bc_low, [BoundaryKind::Periodic; 3]);
        assert!(job.conductor.is_empty());
        assert!(job.source.is_none());
        assert!(job.output.save_probe);
    }

    #[test]
    fn test_conductors_and_bc_parse() {
        let text = r#"
            [grid]
            bounds = { xmin = 0.0, xmax = 1.0, ymin = 0.0, ymax = 1.0, zmin = 0.0, zmax = 1.0 }
            cells = [10, 10, 10]
            scheme = "staircase"

            [[conductor]]
            type = "sphere"
            centre = [0.5, 0.5, 0.5]
            radius = 0.2

            [[conductor]]
            type = "half_space"
            point = [0.0, 0.0, 0.9]
            normal = [0.0, 0.0, -1.0]

            [solver]
            steps = 10
            bc_low = ["pec", "magnetic", "periodic"]
            bc_high = ["electric", "pmc", "periodic"]
        "#;
        let job: JobConfig = toml::from_str(text).unwrap();
        assert_eq!(job.grid.scheme, GridScheme::Staircase);
        assert_eq!(job.conductor.len(), 2);
        assert_eq!(
            job.solver.bc_low,
            [
                BoundaryKind::Pec,
                BoundaryKind::Pmc,
                BoundaryKind::Periodic
            ]
        );
        assert_eq!(
            job.solver.bc_high,
            [
                BoundaryKind::Pec,
                BoundaryKind::Pmc,
                BoundaryKind::Periodic
            ]
        );
    }

    #[test]
    fn test_source_pulse_peaks_at_t0() {
        let src = SourceConfig {
            component: SourceComponent::Jz,
            cell: [5, 5, 5],
            amplitude: 2.0,
            t0: 1.0e-9,
            sigma: 2.0e-10,
        };
        assert_eq!(src.value(1.0e-9), 2.0);
        assert!(src.value(0.0) < 1e-6);
    }
}
