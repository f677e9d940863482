//! Parses one division report into per-quizzer day records.

use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::{RankerError, Result};
use crate::parser::{Table, find_tables};
use crate::standings::types::{DivisionResults, PartialDayRecord, QuizzerId, Roster};

/// Report column names.
pub mod columns {
    pub const WIN_LOSS: &str = "W / L";
    pub const PLACE: &str = "#";
    pub const QUIZZER: &str = "Quizzer";
    pub const TEAM: &str = "Team / Church";
    pub const TOTAL: &str = "- Total -";
    pub const AVERAGE: &str = "- AVG -";
    pub const QUIZ_OUTS: &str = "QO";
    pub const ACCURACY: &str = "Q%";
}

/// Default locator: both results tables carry a `- Total -` column.
pub const DEFAULT_LOCATOR: &str = columns::TOTAL;

struct IndividualColumns {
    place: usize,
    quizzer: usize,
    team: usize,
    total: usize,
    average: usize,
    quiz_outs: usize,
    accuracy: usize,
}

impl IndividualColumns {
    fn locate(division: &str, table: &Table) -> Result<Self> {
        let find = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| RankerError::MissingColumn {
                    division: division.to_string(),
                    table: "individual",
                    column: name.to_string(),
                })
        };

        Ok(Self {
            place: find(columns::PLACE)?,
            quizzer: find(columns::QUIZZER)?,
            team: find(columns::TEAM)?,
            total: find(columns::TOTAL)?,
            average: find(columns::AVERAGE)?,
            quiz_outs: find(columns::QUIZ_OUTS)?,
            accuracy: find(columns::ACCURACY)?,
        })
    }
}

/// Parses the team and individual standings of one division.
///
/// The first table matching `locator` is team standings and supplies the round
/// count; the second is individual standings.
///
/// # Errors
///
/// `MalformedTable` if fewer than two tables match or a cell cannot be parsed,
/// `MissingColumn` if a required column is absent.
#[tracing::instrument(skip(markup), fields(bytes = markup.len()))]
pub fn parse_division(division: &str, markup: &str, locator: &str) -> Result<DivisionResults> {
    let mut tables = find_tables(markup, locator).into_iter();

    let teams = tables.next().ok_or_else(|| {
        RankerError::malformed(division, format!("no table contains `{locator}`"))
    })?;
    let individuals = tables.next().ok_or_else(|| {
        RankerError::malformed(
            division,
            format!("expected team and individual tables containing `{locator}`, found one"),
        )
    })?;

    let rounds = division_rounds(division, &teams)?;
    let cols = IndividualColumns::locate(division, &individuals)?;

    let mut quizzers = Roster::new();
    for (index, row) in individuals.rows.iter().enumerate() {
        let line = index + 1;
        let id = QuizzerId::new(&row[cols.quizzer], &row[cols.team]);

        let record = PartialDayRecord {
            placement: parse_cell(division, line, columns::PLACE, &row[cols.place])?,
            total_points: parse_cell(division, line, columns::TOTAL, &row[cols.total])?,
            average: parse_cell(division, line, columns::AVERAGE, &row[cols.average])?,
            rounds,
            quiz_outs: parse_cell(division, line, columns::QUIZ_OUTS, &row[cols.quiz_outs])?,
            accuracy: parse_cell(
                division,
                line,
                columns::ACCURACY,
                strip_percent(&row[cols.accuracy]),
            )?,
        };

        if quizzers.insert(id.clone(), record).is_some() {
            warn!(quizzer = %id, "Quizzer listed twice in one division; keeping the later row");
        }
    }

    debug!(rounds, quizzers = quizzers.len(), "Division parsed");

    Ok(DivisionResults {
        division: division.to_string(),
        rounds,
        quizzers,
    })
}

/// Rounds played by every team in the division, read from the first team row.
fn division_rounds(division: &str, teams: &Table) -> Result<u32> {
    let col = teams
        .column_index(columns::WIN_LOSS)
        .ok_or_else(|| RankerError::MissingColumn {
            division: division.to_string(),
            table: "team",
            column: columns::WIN_LOSS.to_string(),
        })?;

    if teams.rows.is_empty() {
        return Err(RankerError::malformed(division, "team table has no rows"));
    }

    let cell = teams.cell(0, col);
    let rounds = parse_rounds(cell).ok_or_else(|| {
        RankerError::malformed(
            division,
            format!("`{}` value `{cell}` is not a valid `W / L` record", columns::WIN_LOSS),
        )
    })?;

    for row in 1..teams.rows.len() {
        let other = teams.cell(row, col);
        if parse_rounds(other) != Some(rounds) {
            warn!(
                row = row + 1,
                value = other,
                expected_rounds = rounds,
                "Team round count differs from the first team"
            );
        }
    }

    Ok(rounds)
}

/// Parses `"12 / 4"` into `(12, 4)`. Whitespace is ignored; anything other
/// than exactly two unsigned integers is rejected.
pub fn parse_win_loss(cell: &str) -> Option<(u32, u32)> {
    let compact: String = cell.chars().filter(|c| !c.is_whitespace()).collect();
    let mut parts = compact.split('/');
    let wins = parts.next()?.parse().ok()?;
    let losses = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((wins, losses))
}

/// Wins plus losses from a `W / L` cell, or `None` if the cell is malformed
/// or the sum does not fit in a `u32`.
pub fn parse_rounds(cell: &str) -> Option<u32> {
    let (wins, losses) = parse_win_loss(cell)?;
    wins.checked_add(losses)
}

/// Drops a trailing `%` from accuracy values like `"80%"`.
pub fn strip_percent(cell: &str) -> &str {
    cell.trim().trim_end_matches('%').trim_end()
}

fn parse_cell<T: FromStr>(division: &str, line: usize, column: &str, cell: &str) -> Result<T> {
    let value = cell.trim();
    let value = if value.is_empty() { "0" } else { value };
    value.parse().map_err(|_| {
        RankerError::malformed(
            division,
            format!("row {line}: `{column}` value `{cell}` is not a number"),
        )
    })
}
