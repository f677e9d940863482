//! Merges the Friday and Saturday rosters into season records.

use tracing::info;

use crate::error::{RankerError, Result};
use crate::standings::types::{
    DayResults, MergeOptions, PartialDayRecord, QuizzerId, Roster, SeasonRecord,
};
use crate::standings::utility::{mean, ratio, round_to};

/// Combines a quizzer's two day records.
pub fn combine(
    id: &QuizzerId,
    friday: &PartialDayRecord,
    saturday: &PartialDayRecord,
    average_precision: u32,
) -> SeasonRecord {
    let total_points = friday.total_points + saturday.total_points;
    let total_rounds = u64::from(friday.rounds) + u64::from(saturday.rounds);

    SeasonRecord {
        id: id.clone(),
        friday_placement: friday.placement,
        saturday_placement: saturday.placement,
        total_points,
        average: round_to(ratio(total_points, total_rounds), average_precision),
        total_rounds,
        quiz_outs: u64::from(friday.quiz_outs) + u64::from(saturday.quiz_outs),
        accuracy: mean(&[friday.accuracy as f64, saturday.accuracy as f64]),
    }
}

/// Builds one season record per Friday quizzer, in Friday order.
///
/// Quizzers who only appear on Saturday are dropped unless
/// `options.require_both_days` is set, in which case they are an error.
///
/// # Errors
///
/// `QuizzerNotFound` if a Friday quizzer has no Saturday record (or, with
/// `require_both_days`, a Saturday quizzer has no Friday record).
pub fn merge_season(
    friday: &DayResults,
    saturday: &DayResults,
    options: &MergeOptions,
) -> Result<Roster<SeasonRecord>> {
    let mut season = Roster::new();

    for (id, fri) in friday.quizzers.iter() {
        let sat = saturday
            .quizzers
            .get(id)
            .ok_or_else(|| RankerError::QuizzerNotFound {
                quizzer: id.to_string(),
                present_on: friday.day.clone(),
                missing_on: saturday.day.clone(),
            })?;

        season.insert(id.clone(), combine(id, fri, sat, options.average_precision));
    }

    let mut saturday_only = saturday.quizzers.ids().filter(|id| !friday.quizzers.contains(id));
    if options.require_both_days {
        if let Some(id) = saturday_only.next() {
            return Err(RankerError::QuizzerNotFound {
                quizzer: id.to_string(),
                present_on: saturday.day.clone(),
                missing_on: friday.day.clone(),
            });
        }
    } else {
        let excluded = saturday_only.count();
        if excluded > 0 {
            info!(excluded, day = %saturday.day, "Quizzers without a Friday record left out of the season");
        }
    }

    Ok(season)
}
