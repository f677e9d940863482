use crate::standings::types::{RankedResult, ReportSummary, Roster, SeasonRecord};
use crate::standings::utility::{mean, stddev};

/// Orders season records by average, best first, and numbers them from 1.
///
/// The sort is stable: quizzers with equal averages stay in roster order,
/// which is Friday's division order.
pub fn rank(season: Roster<SeasonRecord>) -> Vec<RankedResult> {
    let mut records = season.into_values();
    records.sort_by(|a, b| b.average.total_cmp(&a.average));

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| RankedResult { rank: i + 1, record })
        .collect()
}

pub fn summarize(results: &[RankedResult]) -> ReportSummary {
    let averages: Vec<f64> = results.iter().map(|r| r.record.average).collect();
    let avg = mean(&averages);

    ReportSummary {
        quizzers: results.len(),
        mean_average: avg,
        stddev_average: stddev(&averages, avg),
        leader: results.first().map(|r| r.record.id.clone()),
    }
}
