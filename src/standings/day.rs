//! Unions a day's division results into a single roster.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{RankerError, Result};
use crate::standings::types::{DayResults, DivisionResults, DuplicatePolicy, QuizzerId, Roster};

/// Folds `divisions`, in order, into one [`DayResults`].
///
/// With [`DuplicatePolicy::LastWriteWins`] an identity reported by several
/// divisions takes the record from the last of them and keeps the position of
/// the first. With [`DuplicatePolicy::Reject`] the collision is an error.
pub fn aggregate_day(
    day: &str,
    divisions: &[DivisionResults],
    policy: DuplicatePolicy,
) -> Result<DayResults> {
    let mut origin: HashMap<&QuizzerId, &str> = HashMap::new();

    let quizzers = divisions.iter().try_fold(Roster::new(), |mut acc, division| {
        for (id, record) in division.quizzers.iter() {
            if let Some(first) = origin.insert(id, &division.division) {
                if first != division.division {
                    match policy {
                        DuplicatePolicy::Reject => {
                            return Err(RankerError::DuplicateQuizzer {
                                quizzer: id.to_string(),
                                day: day.to_string(),
                                first: first.to_string(),
                                second: division.division.clone(),
                            });
                        }
                        DuplicatePolicy::LastWriteWins => debug!(
                            quizzer = %id,
                            first,
                            second = %division.division,
                            "Quizzer reported by two divisions; keeping the later one"
                        ),
                    }
                }
            }
            acc.insert(id.clone(), record.clone());
        }
        Ok(acc)
    })?;

    debug!(day, divisions = divisions.len(), quizzers = quizzers.len(), "Day aggregated");

    Ok(DayResults {
        day: day.to_string(),
        quizzers,
    })
}
