//! fitgraph core
//!
//! Loads the per-generation bot records written by an evolutionary simulation
//! run and reduces them to fitness series (average and highest fitness per
//! generation). Rendering is left to callers; this crate only produces numbers.

pub mod aggregate;
pub mod data;
pub mod error;
pub mod loader;
pub mod report;

// Re-export commonly used types
pub use aggregate::{
    BestBot, FitnessPoint, FitnessSeries, average_by_generation, average_fitness, best_bot,
    max_by_generation, max_fitness,
};
pub use data::{BotRecord, Generation, RunResults};
pub use error::ResultsError;
pub use loader::{GenerationNumber, GenerationOrder, ResultLoader, load_run_results};
pub use report::FitnessReport;

/// Anything that can produce the generations of a run.
/// The directory loader is the production implementation.
pub trait ResultSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load every generation of the run, in generation order
    ///
    /// # Errors
    ///
    /// Returns an error if the results cannot be read or parsed.
    fn load_run_results(&self) -> Result<RunResults, Self::Error>;
}

impl ResultSource for RunResults {
    type Error = ResultsError;

    fn load_run_results(&self) -> Result<RunResults, Self::Error> {
        Ok(self.clone())
    }
}

/// Load a run from `source` and aggregate it.
///
/// # Errors
///
/// Returns the source's error, or [`ResultsError::EmptyGeneration`] if a
/// generation has no bots.
pub fn analyze<S>(source: &S) -> Result<FitnessReport, S::Error>
where
    S: ResultSource,
    S::Error: From<ResultsError>,
{
    let run = source.load_run_results()?;
    Ok(FitnessReport::from_run(&run)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_in_memory_run() {
        let run = RunResults::new(vec![
            Generation::from_fitness(&[2.0, 4.0, 6.0]),
            Generation::from_fitness(&[3.0, 9.0, 1.0]),
        ]);
        let report = analyze(&run).unwrap();
        assert_eq!(report.average, FitnessSeries::from(vec![(1, 4.0), (2, 13.0 / 3.0)]));
        assert_eq!(report.highest, FitnessSeries::from(vec![(1, 6.0), (2, 9.0)]));
    }
}
