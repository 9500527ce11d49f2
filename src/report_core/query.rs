//! Per-table count query construction.
//!
//! One aggregation query per source table, built entirely from the
//! configured column roles, status literals and datetime roles. Rows are
//! eligible when the anchor column is non-null; the "used", "expired" and
//! "new" categories only count rows already finalized before the start of
//! the current day; DAILY_USED covers the most recent full day window.

use crate::config::{ColumnRoles, DatetimeRoles, StatusLiterals};

/// Build the aggregation query for one table.
///
/// The produced text has one GROUP BY on the category column, six
/// per-category COUNTs, a TOTAL summing exactly those six, and a DAILY_USED
/// bounded to `[day-start - 1 day, day-start)`.
pub fn build_count_query(
    table: &str,
    columns: &ColumnRoles,
    statuses: &StatusLiterals,
    datetimes: &DatetimeRoles,
) -> String {
    let day_start = &datetimes.now_expr;
    let day_before = format!("date({}, '-1 day')", day_start);

    let activated = plain_count(&columns.status, &statuses.activated);
    let used = dated_count(&columns.status, &statuses.used, &datetimes.used_time, day_start);
    let deactivated = plain_count(&columns.status, &statuses.deactivated);
    let expired = dated_count(&columns.status, &statuses.expired, &datetimes.expiry_time, day_start);
    let new_cards = dated_count(
        &columns.status,
        &statuses.newly_generated,
        &datetimes.generated_time,
        day_start,
    );
    let booked_in = plain_count(&columns.status, &statuses.booked_in);

    let total = [&activated, &used, &deactivated, &expired, &new_cards, &booked_in]
        .map(|c| c.as_str())
        .join(" + ");

    let daily_used = format!(
        "COUNT(CASE WHEN {} = '{}' AND {} >= {} AND {} < {} THEN 1 END)",
        columns.status,
        sql_quote(&statuses.used),
        datetimes.used_time,
        day_before,
        datetimes.used_time,
        day_start,
    );

    format!(
        "SELECT\n    \
         CAST({category} AS integer) AS CARD_TYPE,\n    \
         {activated} AS ACTIVATED,\n    \
         {used} AS TOTAL_USED,\n    \
         {deactivated} AS DEACTIVATED,\n    \
         {expired} AS EXPIRED,\n    \
         {new_cards} AS \"NEW\",\n    \
         {booked_in} AS BOOKEDIN,\n    \
         {total} AS TOTAL,\n    \
         {daily_used} AS DAILY_USED\n\
         FROM {table}\n\
         WHERE {anchor} IS NOT NULL\n\
         GROUP BY {category}\n\
         ORDER BY {category}",
        category = columns.category,
        anchor = columns.anchor,
    )
}

fn plain_count(status_column: &str, literal: &str) -> String {
    format!(
        "COUNT(CASE WHEN {} = '{}' THEN 1 END)",
        status_column,
        sql_quote(literal)
    )
}

fn dated_count(status_column: &str, literal: &str, time_column: &str, day_start: &str) -> String {
    format!(
        "COUNT(CASE WHEN {} = '{}' AND {} < {} THEN 1 END)",
        status_column,
        sql_quote(literal),
        time_column,
        day_start
    )
}

fn sql_quote(literal: &str) -> String {
    literal.replace('\'', "''")
}
