use tracing::{info, info_span};

use crate::config::{DayConfig, RankerConfig};
use crate::error::Result;
use crate::output::write_report;
use crate::source::{ReportSource, read_division};
use crate::standings::day::aggregate_day;
use crate::standings::division::parse_division;
use crate::standings::rank::{rank, summarize};
use crate::standings::season::merge_season;
use crate::standings::types::{DayResults, DuplicatePolicy, RankedResult, ReportSummary};

/// Reads, parses and unions every division of `day`, in configured order.
pub fn load_day<S: ReportSource>(
    source: &S,
    day: &DayConfig,
    locator: &str,
    policy: DuplicatePolicy,
) -> Result<DayResults> {
    let mut divisions = Vec::with_capacity(day.divisions.len());

    for division in &day.divisions {
        let _span = info_span!("division", day = %day.name, division = %division).entered();

        let markup = read_division(source, day, division)?;
        divisions.push(parse_division(&day.report_name(division), &markup, locator)?);
    }

    let results = aggregate_day(&day.name, &divisions, policy)?;
    info!(
        day = %day.name,
        divisions = divisions.len(),
        quizzers = results.quizzers.len(),
        "Day loaded"
    );
    Ok(results)
}

/// Produces the ranked season standings without writing anything.
#[tracing::instrument(skip_all)]
pub fn build_standings<S: ReportSource>(source: &S, config: &RankerConfig) -> Result<Vec<RankedResult>> {
    let friday = load_day(source, &config.friday, &config.locator, config.duplicates)?;
    let saturday = load_day(source, &config.saturday, &config.locator, config.duplicates)?;

    let season = merge_season(&friday, &saturday, &config.merge_options())?;
    Ok(rank(season))
}

/// Runs the whole pipeline and writes the report to `config.output`.
///
/// Nothing is written unless every division parses and every Friday quizzer
/// has a Saturday record.
#[tracing::instrument(skip_all, fields(output = %config.output.display()))]
pub fn run<S: ReportSource>(source: &S, config: &RankerConfig) -> Result<ReportSummary> {
    let results = build_standings(source, config)?;
    write_report(&config.output, &results, config.detailed)?;

    let summary = summarize(&results);
    info!(
        quizzers = summary.quizzers,
        mean_average = summary.mean_average,
        leader = summary.leader.as_ref().map(|id| id.as_str()).unwrap_or("-"),
        "Season report written"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RankerError;
    use crate::source::MemorySource;

    fn report(wl: &str, rows: &[(&str, &str, &str, &str)]) -> String {
        let body: String = rows
            .iter()
            .enumerate()
            .map(|(i, (name, team, total, acc))| {
                format!(
                    "<tr><td>{}</td><td>{name}</td><td>{team}</td><td>{total}</td>\
                     <td>0</td><td>1</td><td>{acc}</td></tr>",
                    i + 1
                )
            })
            .collect();
        format!(
            "<table><tr><th>#</th><th>Team / Church</th><th>W / L</th><th>- Total -</th></tr>\
             <tr><td>1</td><td>Team A</td><td>{wl}</td><td>0</td></tr></table>\
             <table><tr><th>#</th><th>Quizzer</th><th>Team / Church</th><th>- Total -</th>\
             <th>- AVG -</th><th>QO</th><th>Q%</th></tr>{body}</table>"
        )
    }

    fn config() -> RankerConfig {
        RankerConfig {
            friday: DayConfig::new("Friday", "f", &["blue"]),
            saturday: DayConfig::new("Saturday", "s", &["tan", "orange"]),
            ..RankerConfig::default()
        }
    }

    #[test]
    fn test_build_standings_reference_scenario() {
        let source = MemorySource::new()
            .with("f-blue", report("3 / 1", &[("Jo Smith", "Team A", "45", "80%")]))
            .with("s-tan", report("3 / 2", &[("Jo Smith", "Team A", "50", "90%")]))
            .with("s-orange", report("1 / 1", &[("Zed", "Team Z", "70", "100%")]));

        let results = build_standings(&source, &config()).unwrap();

        assert_eq!(results.len(), 1);
        let jo = &results[0].record;
        assert_eq!(results[0].rank, 1);
        assert_eq!(jo.id.as_str(), "Jo Smith; Team A");
        assert_eq!(jo.total_points, 95.0);
        assert_eq!(jo.total_rounds, 9);
        assert_eq!(jo.average, 10.556);
        assert_eq!(jo.accuracy, 85.0);
        assert_eq!(jo.quiz_outs, 2);
    }

    #[test]
    fn test_missing_report_names_division() {
        let source = MemorySource::new()
            .with("f-blue", report("3 / 1", &[("Jo Smith", "Team A", "45", "80%")]))
            .with("s-tan", report("3 / 2", &[("Jo Smith", "Team A", "50", "90%")]));

        let err = build_standings(&source, &config()).unwrap_err();
        match err {
            RankerError::SourceNotFound { path, .. } => {
                assert_eq!(path.to_string_lossy(), "s-orange")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_division_is_named() {
        let source = MemorySource::new().with("f-blue", "<p>results pending</p>");

        let err = build_standings(&source, &config()).unwrap_err();
        match err {
            RankerError::MalformedTable { division, .. } => assert_eq!(division, "f-blue"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_day_rounds_per_division() {
        let source = MemorySource::new()
            .with("s-tan", report("3 / 2", &[("A", "T", "10", "50%")]))
            .with("s-orange", report("4 / 2", &[("B", "T", "12", "60%")]));

        let day = load_day(
            &source,
            &config().saturday,
            "- Total -",
            DuplicatePolicy::LastWriteWins,
        )
        .unwrap();

        let rounds: Vec<u32> = day.quizzers.values().map(|r| r.rounds).collect();
        assert_eq!(rounds, vec![5, 6]);
    }
}
