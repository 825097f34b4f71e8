//! Everything a renderer or report writer needs from one run.

use serde::{Deserialize, Serialize};

use crate::aggregate::{
    BestBot, FitnessSeries, average_by_generation, best_bot, max_by_generation,
};
use crate::data::RunResults;
use crate::error::ResultsError;

/// Average and highest fitness series for a run, plus its fittest bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessReport {
    pub generations: usize,
    pub bots: usize,
    pub average: FitnessSeries,
    pub highest: FitnessSeries,
    pub best_bot: Option<BestBot>,
}

impl FitnessReport {
    /// Aggregate a loaded run.
    ///
    /// # Errors
    ///
    /// Returns [`ResultsError::EmptyGeneration`] if any generation has no bots.
    pub fn from_run(run: &RunResults) -> Result<Self, ResultsError> {
        Ok(Self {
            generations: run.len(),
            bots: run.bot_count(),
            average: average_by_generation(run)?,
            highest: max_by_generation(run)?,
            best_bot: best_bot(run)?,
        })
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.generations == 0
    }

    /// `(generation, average, highest)` rows in generation order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, f64, f64)> + '_ {
        self.average
            .points()
            .iter()
            .zip(self.highest.points())
            .map(|(avg, high)| (avg.generation, avg.value, high.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Generation;

    #[test]
    fn report_bundles_both_series() {
        let run = RunResults::new(vec![
            Generation::from_fitness(&[5.0, 7.0]),
            Generation::from_fitness(&[1.0, 2.0, 12.0]),
        ]);
        let report = FitnessReport::from_run(&run).unwrap();

        assert_eq!(report.generations, 2);
        assert_eq!(report.bots, 5);
        let rows: Vec<_> = report.rows().collect();
        assert_eq!(rows, vec![(1, 6.0, 7.0), (2, 5.0, 12.0)]);
        let best = report.best_bot.expect("best bot");
        assert_eq!(best.generation, 2);
        assert_eq!(best.bot.fitness, 12.0);
    }

    #[test]
    fn report_serializes_series_as_point_lists() {
        let run = RunResults::new(vec![Generation::from_fitness(&[5.0, 7.0])]);
        let report = FitnessReport::from_run(&run).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["generations"], 1);
        assert_eq!(value["average"][0]["generation"], 1);
        assert_eq!(value["average"][0]["value"], 6.0);
        assert_eq!(value["highest"][0]["value"], 7.0);
        assert_eq!(value["best_bot"]["bot"]["fitness"], 7.0);
    }
}
