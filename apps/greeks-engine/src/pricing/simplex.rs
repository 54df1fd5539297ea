//! Nelder-Mead downhill simplex for unconstrained minimisation.
//!
//! Derivative-free and local: the result is whatever vertex the simplex
//! collapses onto, which need not be a global minimum.

use std::cell::Cell;

/// Relative perturbation used to build the initial simplex.
const NONZERO_STEP: f64 = 0.05;
/// Absolute perturbation for coordinates that start at zero.
const ZERO_STEP: f64 = 0.000_25;

/// Reflection coefficient.
const RHO: f64 = 1.0;
/// Expansion coefficient.
const CHI: f64 = 2.0;
/// Contraction coefficient.
const PSI: f64 = 0.5;
/// Shrink coefficient.
const SHRINK: f64 = 0.5;

/// Configuration for the simplex minimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplexConfig {
    /// Maximum simplex iterations.
    pub max_iterations: usize,
    /// Maximum objective evaluations.
    pub max_evaluations: usize,
    /// Convergence tolerance on vertex spread.
    pub x_tolerance: f64,
    /// Convergence tolerance on objective spread.
    pub f_tolerance: f64,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            max_evaluations: 1000,
            x_tolerance: 1e-10,
            f_tolerance: 1e-14,
        }
    }
}

/// Outcome of a minimisation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexReport {
    /// Best vertex found.
    pub parameters: Vec<f64>,
    /// Objective at `parameters`.
    pub objective: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Objective evaluations performed.
    pub function_evaluations: usize,
    /// True when both tolerances were met before the budget ran out.
    pub converged: bool,
}

/// Nelder-Mead minimizer.
#[derive(Debug, Clone, Default)]
pub struct NelderMead {
    config: SimplexConfig,
}

impl NelderMead {
    /// Create a minimizer with custom configuration.
    #[must_use]
    pub const fn with_config(config: SimplexConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SimplexConfig {
        &self.config
    }

    /// Minimise `objective` starting from `initial`.
    ///
    /// Never fails: when the iteration or evaluation budget runs out the
    /// best vertex so far is returned with `converged == false`.
    pub fn minimize<F>(&self, initial: &[f64], objective: F) -> SimplexReport
    where
        F: Fn(&[f64]) -> f64,
    {
        let n = initial.len();
        let evaluations = Cell::new(0_usize);
        let eval = |x: &[f64]| {
            evaluations.set(evaluations.get() + 1);
            objective(x)
        };

        if n == 0 {
            let value = eval(initial);
            return SimplexReport {
                parameters: Vec::new(),
                objective: value,
                iterations: 0,
                function_evaluations: 1,
                converged: true,
            };
        }

        let mut vertices: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
        vertices.push(initial.to_vec());
        for k in 0..n {
            let mut vertex = initial.to_vec();
            vertex[k] = if vertex[k] == 0.0 {
                ZERO_STEP
            } else {
                vertex[k] * (1.0 + NONZERO_STEP)
            };
            vertices.push(vertex);
        }
        let mut values: Vec<f64> = vertices.iter().map(|v| eval(v)).collect();
        sort_simplex(&mut vertices, &mut values);

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations
            && evaluations.get() < self.config.max_evaluations
        {
            if self.has_converged(&vertices, &values) {
                converged = true;
                break;
            }

            let centroid = centroid(&vertices[..n]);
            let worst = vertices[n].clone();

            let reflected = affine(&centroid, &worst, 1.0 + RHO, -RHO);
            let f_reflected = eval(&reflected);
            let mut shrink = false;

            if f_reflected < values[0] {
                let expanded = affine(&centroid, &worst, 1.0 + RHO * CHI, -RHO * CHI);
                let f_expanded = eval(&expanded);
                if f_expanded < f_reflected {
                    vertices[n] = expanded;
                    values[n] = f_expanded;
                } else {
                    vertices[n] = reflected;
                    values[n] = f_reflected;
                }
            } else if f_reflected < values[n - 1] {
                vertices[n] = reflected;
                values[n] = f_reflected;
            } else if f_reflected < values[n] {
                // Outside contraction
                let contracted = affine(&centroid, &worst, 1.0 + PSI * RHO, -PSI * RHO);
                let f_contracted = eval(&contracted);
                if f_contracted <= f_reflected {
                    vertices[n] = contracted;
                    values[n] = f_contracted;
                } else {
                    shrink = true;
                }
            } else {
                // Inside contraction
                let contracted = affine(&centroid, &worst, 1.0 - PSI, PSI);
                let f_contracted = eval(&contracted);
                if f_contracted < values[n] {
                    vertices[n] = contracted;
                    values[n] = f_contracted;
                } else {
                    shrink = true;
                }
            }

            if shrink {
                let best = vertices[0].clone();
                for j in 1..=n {
                    vertices[j] = affine(&best, &vertices[j], 1.0 - SHRINK, SHRINK);
                    values[j] = eval(&vertices[j]);
                }
            }

            sort_simplex(&mut vertices, &mut values);
            iterations += 1;
        }

        SimplexReport {
            parameters: vertices.swap_remove(0),
            objective: values[0],
            iterations,
            function_evaluations: evaluations.get(),
            converged,
        }
    }

    fn has_converged(&self, vertices: &[Vec<f64>], values: &[f64]) -> bool {
        let best = &vertices[0];
        let x_spread = vertices[1..]
            .iter()
            .flat_map(|v| v.iter().zip(best).map(|(a, b)| (a - b).abs()))
            .fold(0.0_f64, f64::max);
        let f_spread = values[1..]
            .iter()
            .map(|f| (f - values[0]).abs())
            .fold(0.0_f64, f64::max);

        x_spread <= self.config.x_tolerance && f_spread <= self.config.f_tolerance
    }
}

/// Order vertices by ascending objective value.
fn sort_simplex(vertices: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    *vertices = order.iter().map(|&i| vertices[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}

fn centroid(vertices: &[Vec<f64>]) -> Vec<f64> {
    let count = vertices.len() as f64;
    let mut sum = vec![0.0; vertices[0].len()];
    for vertex in vertices {
        for (acc, x) in sum.iter_mut().zip(vertex) {
            *acc += x;
        }
    }
    sum.iter().map(|s| s / count).collect()
}

/// `a * x + b * y`, element-wise.
fn affine(x: &[f64], y: &[f64], a: f64, b: f64) -> Vec<f64> {
    x.iter().zip(y).map(|(xi, yi)| a * xi + b * yi).collect()
}
