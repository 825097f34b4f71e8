//! Per-generation fitness statistics.

use serde::{Deserialize, Serialize};

use crate::data::{BotRecord, Generation, RunResults};
use crate::error::ResultsError;

/// One value of a fitness series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessPoint {
    /// 1-based generation number
    pub generation: usize,
    pub value: f64,
}

/// Fitness statistic per generation, one point per generation in run order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FitnessSeries {
    points: Vec<FitnessPoint>,
}

impl FitnessSeries {
    #[must_use]
    pub fn points(&self) -> &[FitnessPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|point| point.value)
    }

    #[must_use]
    pub fn last(&self) -> Option<FitnessPoint> {
        self.points.last().copied()
    }

    /// The point with the highest value; ties keep the earliest generation.
    #[must_use]
    pub fn peak(&self) -> Option<FitnessPoint> {
        self.points.iter().copied().fold(None, |best, point| match best {
            Some(current) if current.value >= point.value => Some(current),
            _ => Some(point),
        })
    }

    /// Smallest and largest value, `None` for an empty series.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values().fold(None, |range, value| match range {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
    }
}

impl From<Vec<(usize, f64)>> for FitnessSeries {
    fn from(pairs: Vec<(usize, f64)>) -> Self {
        Self {
            points: pairs
                .into_iter()
                .map(|(generation, value)| FitnessPoint { generation, value })
                .collect(),
        }
    }
}

/// The fittest bot of a run and the generation it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestBot {
    pub generation: usize,
    pub bot: BotRecord,
}

/// Mean fitness of each generation.
///
/// # Errors
///
/// Returns [`ResultsError::EmptyGeneration`] for a generation without bots.
pub fn average_by_generation(run: &RunResults) -> Result<FitnessSeries, ResultsError> {
    series_by_generation(run, average_fitness)
}

/// Highest fitness of each generation.
///
/// # Errors
///
/// Returns [`ResultsError::EmptyGeneration`] for a generation without bots.
pub fn max_by_generation(run: &RunResults) -> Result<FitnessSeries, ResultsError> {
    series_by_generation(run, max_fitness)
}

fn series_by_generation(
    run: &RunResults,
    statistic: fn(&Generation) -> Option<f64>,
) -> Result<FitnessSeries, ResultsError> {
    let points = run
        .numbered()
        .map(|(generation, bots)| {
            statistic(bots)
                .map(|value| FitnessPoint { generation, value })
                .ok_or(ResultsError::EmptyGeneration { generation })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FitnessSeries { points })
}

/// Sum of fitness over bot count, `None` when there are no bots.
#[must_use]
pub fn average_fitness(generation: &Generation) -> Option<f64> {
    if generation.is_empty() {
        return None;
    }
    let total: f64 = generation.fitness_values().sum();
    #[allow(clippy::cast_precision_loss)]
    let count = generation.len() as f64;
    Some(total / count)
}

/// Largest fitness by strict greater-than scan, `None` when there are no bots.
#[must_use]
pub fn max_fitness(generation: &Generation) -> Option<f64> {
    let mut best = None;
    for value in generation.fitness_values() {
        if best.is_none_or(|current| value > current) {
            best = Some(value);
        }
    }
    best
}

/// The highest-fitness bot across every generation. A later bot wins ties.
///
/// # Errors
///
/// Returns [`ResultsError::EmptyGeneration`] for a generation without bots.
pub fn best_bot(run: &RunResults) -> Result<Option<BestBot>, ResultsError> {
    let mut best: Option<(usize, &BotRecord)> = None;
    for (generation, bots) in run.numbered() {
        if bots.is_empty() {
            return Err(ResultsError::EmptyGeneration { generation });
        }
        for bot in bots.bots() {
            match best {
                Some((_, current)) if current.fitness > bot.fitness => {}
                _ => best = Some((generation, bot)),
            }
        }
    }
    Ok(best.map(|(generation, bot)| BestBot {
        generation,
        bot: bot.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn run(generations: &[&[f64]]) -> RunResults {
        generations
            .iter()
            .map(|values| Generation::from_fitness(values))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn average_is_sum_over_count() {
        let series = average_by_generation(&run(&[&[2.0, 4.0, 6.0]])).unwrap();
        assert_eq!(series, FitnessSeries::from(vec![(1, 4.0)]));
    }

    #[test]
    fn max_is_the_largest_value_present() {
        let series = max_by_generation(&run(&[&[3.0, 9.0, 1.0]])).unwrap();
        assert_eq!(series, FitnessSeries::from(vec![(1, 9.0)]));
    }

    #[test]
    fn negative_fitness_is_handled() {
        let data = run(&[&[-5.0, -2.0, -11.0]]);
        assert_eq!(max_by_generation(&data).unwrap().points()[0].value, -2.0);
        assert_eq!(average_by_generation(&data).unwrap().points()[0].value, -6.0);
    }

    #[test]
    fn series_share_generation_numbers() {
        let data = run(&[&[1.0, 3.0], &[5.0], &[2.0, 2.0, 8.0]]);
        let average = average_by_generation(&data).unwrap();
        let highest = max_by_generation(&data).unwrap();

        assert_eq!(average.len(), data.len());
        assert_eq!(highest.len(), data.len());
        let average_numbers: Vec<usize> = average.points().iter().map(|p| p.generation).collect();
        let highest_numbers: Vec<usize> = highest.points().iter().map(|p| p.generation).collect();
        assert_eq!(average_numbers, vec![1, 2, 3]);
        assert_eq!(average_numbers, highest_numbers);
        assert_eq!(average.values().collect::<Vec<_>>(), vec![2.0, 5.0, 4.0]);
        assert_eq!(highest.values().collect::<Vec<_>>(), vec![3.0, 5.0, 8.0]);
    }

    #[test]
    fn empty_generation_is_reported_by_number() {
        let data = run(&[&[1.0], &[], &[2.0]]);
        let err = average_by_generation(&data).unwrap_err();
        assert!(matches!(err, ResultsError::EmptyGeneration { generation: 2 }));
        let err = max_by_generation(&data).unwrap_err();
        assert!(matches!(err, ResultsError::EmptyGeneration { generation: 2 }));
        let err = best_bot(&data).unwrap_err();
        assert!(matches!(err, ResultsError::EmptyGeneration { generation: 2 }));
    }

    #[test]
    fn empty_run_yields_empty_series() {
        let data = RunResults::default();
        assert!(average_by_generation(&data).unwrap().is_empty());
        assert!(max_by_generation(&data).unwrap().is_empty());
        assert!(best_bot(&data).unwrap().is_none());
    }

    #[test]
    fn best_bot_prefers_later_bot_on_ties() {
        let json_a = r#"[{"fitness": 4, "id": "a"}, {"fitness": 9, "id": "b"}]"#;
        let json_b = r#"[{"fitness": 9, "id": "c"}, {"fitness": 1, "id": "d"}]"#;
        let data = RunResults::new(vec![
            Generation::from_json(json_a).unwrap(),
            Generation::from_json(json_b).unwrap(),
        ]);

        let best = best_bot(&data).unwrap().expect("best bot");
        assert_eq!(best.generation, 2);
        assert_eq!(best.bot.extra.get("id"), Some(&Value::from("c")));
    }

    #[test]
    fn peak_and_range_follow_values() {
        let series = FitnessSeries::from(vec![(1, 2.0), (2, 7.5), (3, 7.5), (4, -1.0)]);
        assert_eq!(
            series.peak(),
            Some(FitnessPoint {
                generation: 2,
                value: 7.5
            })
        );
        assert_eq!(series.value_range(), Some((-1.0, 7.5)));
        assert_eq!(series.last().map(|p| p.generation), Some(4));
        assert_eq!(FitnessSeries::default().peak(), None);
    }
}
