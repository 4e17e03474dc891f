use crate::algorithm::Algorithm;
use crate::grid::{GenerationRun, GRID_H, GRID_W};
use serde::Serialize;

/// Display strings for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Stats {
    pub(crate) final_value: String,
    pub(crate) iterations: String,
    pub(crate) min: String,
    pub(crate) max: String,
    pub(crate) elapsed: String,
    pub(crate) status: String,
}

impl Stats {
    pub(crate) fn from_run(run: &GenerationRun, algo: &Algorithm) -> Self {
        let iterations = group_digits(run.iterations() as i64);
        Self {
            final_value: group_digits(run.final_value),
            min: group_digits(run.min),
            max: group_digits(run.max),
            elapsed: format!("{:.2} ms", run.elapsed_ms()),
            status: format!("Generated {iterations} values with {}", algo.name),
            iterations,
        }
    }

    pub(crate) fn lines(&self) -> [(&'static str, &str); 5] {
        [
            ("Final", &self.final_value),
            ("Iterations", &self.iterations),
            ("Min", &self.min),
            ("Max", &self.max),
            ("Time", &self.elapsed),
        ]
    }
}

/// `-1234567` -> `-1,234,567`
pub(crate) fn group_digits(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct RunSummary {
    pub(crate) seed: i64,
    pub(crate) algorithm: &'static str,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) iterations: usize,
    pub(crate) min: i64,
    pub(crate) max: i64,
    pub(crate) final_value: i64,
    pub(crate) elapsed_ms: f64,
}

impl RunSummary {
    pub(crate) fn from_run(run: &GenerationRun) -> Self {
        Self {
            seed: run.seed,
            algorithm: run.algorithm,
            width: GRID_W,
            height: GRID_H,
            iterations: run.iterations(),
            min: run.min,
            max: run.max,
            final_value: run.final_value,
            elapsed_ms: run.elapsed_ms(),
        }
    }
}
