use anyhow::Result;
use colored::Colorize;
use fitgraph_core::{BestBot, FitnessReport};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

pub fn generate_console_report(
    out: &mut dyn Write,
    report: &FitnessReport,
    results_dir: &Path,
    verbose: bool,
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Fitness Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==================".cyan())?;

    writeln!(out, "Results directory: {}", results_dir.display())?;
    writeln!(out, "Generations: {}", report.generations)?;
    writeln!(out, "Bots: {}", report.bots)?;

    if report.is_empty() {
        writeln!(out, "{}", "No generations found.".yellow())?;
        return Ok(());
    }

    if let Some(last) = report.average.last() {
        writeln!(
            out,
            "Final average fitness: {} (generation {})",
            format!("{:.3}", last.value).green(),
            last.generation
        )?;
    }
    if let Some(peak) = report.average.peak() {
        writeln!(
            out,
            "Peak average fitness: {:.3} (generation {})",
            peak.value, peak.generation
        )?;
    }
    if let Some(peak) = report.highest.peak() {
        writeln!(
            out,
            "Highest fitness: {} (generation {})",
            format!("{:.3}", peak.value).green(),
            peak.generation
        )?;
    }
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    // Per-generation detail
    if verbose {
        writeln!(out, "{}", "📈 Generations".bright_yellow().bold())?;
        writeln!(out, "{}", "==============".yellow())?;
        writeln!(out, "{:>10}  {:>14}  {:>14}", "Generation", "Average", "Highest")?;
        for (generation, average, highest) in report.rows() {
            writeln!(out, "{generation:>10}  {average:>14.3}  {highest:>14.3}")?;
        }
        writeln!(out)?;
    }

    if let Some(best) = &report.best_bot {
        writeln!(out, "{}", "🏆 Best Bot".bright_yellow().bold())?;
        writeln!(out, "{}", "===========".yellow())?;
        writeln!(
            out,
            "Generation {} with fitness {:.3}",
            best.generation, best.bot.fitness
        )?;
        writeln!(out, "{}", best_bot_json(best)?)?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &FitnessReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    report: &FitnessReport,
    results_dir: &Path,
) -> Result<()> {
    writeln!(out, "# Fitness Report\n")?;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Results directory**: `{}`", results_dir.display())?;
    writeln!(out, "- **Generations**: {}", report.generations)?;
    writeln!(out, "- **Bots**: {}", report.bots)?;
    if let Some(last) = report.average.last() {
        writeln!(
            out,
            "- **Final average fitness**: {:.3} (generation {})",
            last.value, last.generation
        )?;
    }
    if let Some(peak) = report.highest.peak() {
        writeln!(
            out,
            "- **Highest fitness**: {:.3} (generation {})",
            peak.value, peak.generation
        )?;
    }
    writeln!(out)?;

    if report.is_empty() {
        writeln!(out, "_No generations found._")?;
        return Ok(());
    }

    writeln!(out, "## Generations\n")?;
    writeln!(out, "| Generation | Average Fitness | Highest Fitness |")?;
    writeln!(out, "|-----------:|----------------:|----------------:|")?;
    for (generation, average, highest) in report.rows() {
        writeln!(out, "| {generation} | {average:.3} | {highest:.3} |")?;
    }
    writeln!(out)?;

    if let Some(best) = &report.best_bot {
        writeln!(out, "## Best Bot\n")?;
        writeln!(
            out,
            "Generation {} with fitness {:.3}\n",
            best.generation, best.bot.fitness
        )?;
        writeln!(out, "```json\n{}\n```", best_bot_json(best)?)?;
    }
    Ok(())
}

pub fn generate_csv_report(out: &mut dyn Write, report: &FitnessReport) -> Result<()> {
    writeln!(out, "generation,average_fitness,highest_fitness")?;
    for (generation, average, highest) in report.rows() {
        writeln!(out, "{generation},{average},{highest}")?;
    }
    Ok(())
}

fn best_bot_json(best: &BestBot) -> Result<String> {
    Ok(serde_json::to_string_pretty(&best.bot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitgraph_core::{Generation, RunResults};

    fn sample_report() -> FitnessReport {
        let run = RunResults::new(vec![
            Generation::from_json(r#"[{"fitness": 5}, {"fitness": 7, "id": "ace"}]"#).unwrap(),
            Generation::from_fitness(&[2.0, 4.0, 6.0]),
        ]);
        FitnessReport::from_run(&run).unwrap()
    }

    fn render(write: impl FnOnce(&mut dyn Write) -> Result<()>) -> String {
        colored::control::set_override(false);
        let mut buf: Vec<u8> = Vec::new();
        write(&mut buf).expect("report");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn csv_report_lists_each_generation() {
        let report = sample_report();
        let csv = render(|out| generate_csv_report(out, &report));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "generation,average_fitness,highest_fitness",
                "1,6,7",
                "2,4,6"
            ]
        );
    }

    #[test]
    fn json_report_round_trips() {
        let report = sample_report();
        let json = render(|out| generate_json_report(out, &report));
        let parsed: FitnessReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn markdown_report_has_table_and_best_bot() {
        let report = sample_report();
        let md = render(|out| generate_markdown_report(out, &report, Path::new("runs/current")));
        assert!(md.contains("# Fitness Report"));
        assert!(md.contains("| 1 | 6.000 | 7.000 |"));
        assert!(md.contains("| 2 | 4.000 | 6.000 |"));
        assert!(md.contains("\"id\": \"ace\""));
    }

    #[test]
    fn console_report_summarizes_run() {
        let report = sample_report();
        let text = render(|out| {
            generate_console_report(
                out,
                &report,
                Path::new("runs/current"),
                true,
                Duration::from_millis(3),
            )
        });
        assert!(text.contains("Generations: 2"));
        assert!(text.contains("Final average fitness: 4.000 (generation 2)"));
        assert!(text.contains("Highest fitness: 7.000 (generation 1)"));
        assert!(text.contains("Generation 1 with fitness 7.000"));
    }

    #[test]
    fn console_report_handles_empty_run() {
        let report = FitnessReport::from_run(&RunResults::default()).unwrap();
        let text = render(|out| {
            generate_console_report(out, &report, Path::new("empty"), false, Duration::ZERO)
        });
        assert!(text.contains("No generations found."));
    }
}
