use chrono::{Datelike, Month, NaiveDate};

/// Format used by the sales source for purchase dates (`dd/mm/yyyy`).
pub const PURCHASE_DATE_FORMAT: &str = "%d/%m/%Y";

pub fn parse_purchase_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), PURCHASE_DATE_FORMAT).ok()
}

/// Last day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

/// Month-end following the month of `date`.
pub fn next_month_end(date: NaiveDate) -> NaiveDate {
    month_end(month_end(date).succ_opt().unwrap_or(date))
}

/// Every month-end from the month of `first` to the month of `last`,
/// inclusive. Empty when `last` falls in an earlier month than `first`.
pub fn month_ends_between(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let last = month_end(last);
    let mut current = month_end(first);
    let mut result = Vec::new();
    while current <= last {
        result.push(current);
        let next = next_month_end(current);
        if next == current {
            break;
        }
        current = next;
    }
    result
}

/// English month name ("January", "February", ...).
pub fn month_name(date: NaiveDate) -> &'static str {
    Month::try_from(date.month() as u8)
        .map(|m| m.name())
        .unwrap_or("")
}
