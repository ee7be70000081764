use regex::Regex;

use crate::error::Error;
use crate::table::{FilterInput, InputFocus, Listener, Table, Validity};

pub const MATCH_ALL: &str = ".*";

#[derive(Debug)]
pub enum FilterOutcome {
    Applied { visible: usize, total: usize },
    Rejected(regex::Error),
}

impl FilterOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FilterOutcome::Applied { .. })
    }
}

pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    // unbalanced groups must not pair up with the anchoring group
    Regex::new(pattern)?;
    Regex::new(&format!("^(?:{pattern})$"))
}

pub fn attach_listeners(table: &Table) -> Vec<Listener> {
    (0..table.column_count())
        .map(|column| Listener {
            tab: table.tab,
            column,
        })
        .collect()
}

pub fn apply_filter(
    table: &mut Table,
    filters: &mut Vec<String>,
    column: usize,
    pattern: &str,
    selection: Option<(usize, usize)>,
) -> Result<FilterOutcome, Error> {
    if column >= table.column_count() {
        return Err(Error::UnknownColumn {
            tab: table.tab,
            column,
        });
    }
    if let Err(e) = compile(pattern) {
        log::warn!("invalid filter {pattern:?} on {}[{column}]: {e}", table.tab);
        table.inputs[column] = FilterInput {
            value: pattern.to_owned(),
            validity: Validity::Invalid,
        };
        return Ok(FilterOutcome::Rejected(e));
    }

    // `filters` only ever holds valid patterns
    let mut next_filters = filters.clone();
    next_filters.resize(table.column_count(), MATCH_ALL.to_owned());
    next_filters[column] = pattern.to_owned();

    let len = pattern.chars().count();
    let (start, end) = selection.unwrap_or((len, len));
    let selection_end = end.min(len);
    let selection_start = start.min(selection_end);
    let mut next = rebuild(
        table,
        &next_filters,
        Some(InputFocus {
            column,
            selection_start,
            selection_end,
        }),
    )?;
    next.inputs[column] = FilterInput {
        value: pattern.to_owned(),
        validity: Validity::Valid,
    };
    log::debug!(
        "filter {}[{column}] = {pattern:?}: {}",
        table.tab,
        next.summary
    );

    let outcome = FilterOutcome::Applied {
        visible: next.summary.visible,
        total: next.summary.total,
    };
    *table = next;
    *filters = next_filters;
    Ok(outcome)
}

pub fn reapply(table: &mut Table, filters: &[String]) -> Result<(), Error> {
    if filters.iter().all(|f| f == MATCH_ALL) {
        return Ok(());
    }
    let mut filters = filters.to_vec();
    filters.resize(table.column_count(), MATCH_ALL.to_owned());
    let mut next = rebuild(table, &filters, table.focus)?;
    next.inputs = filters
        .into_iter()
        .map(|value| FilterInput {
            value,
            validity: Validity::Valid,
        })
        .collect();
    *table = next;
    Ok(())
}

fn rebuild(table: &Table, filters: &[String], focus: Option<InputFocus>) -> Result<Table, Error> {
    let regexes = filters
        .iter()
        .take(table.column_count())
        .map(|f| compile(f))
        .collect::<Result<Vec<_>, _>>()?;

    let mut next = table.clone();
    for row in next.rows.iter_mut() {
        row.visible = row
            .cells
            .iter()
            .zip(&regexes)
            .all(|(cell, regex)| regex.is_match(&cell.text));
    }
    next.summary.visible = next.visible_rows().count();
    log::trace!(
        "rebuilt {}: {} of {} rows visible",
        next.tab,
        next.summary.visible,
        next.summary.total
    );
    next.focus = focus;
    next.listeners = attach_listeners(&next);
    Ok(next)
}
