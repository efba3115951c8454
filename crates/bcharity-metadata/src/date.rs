//! `YYYY-MM-DD` calendar dates as records carry them.
//!
//! Dates are split into their numeric components rather than handed to a
//! date library, and compared through a closed-form day number (days since
//! 1970-01-01 in the proleptic Gregorian calendar).

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
  pub year:  u32,
  pub month: u32,
  pub day:   u32,
}

impl CalendarDate {
  /// Parse `YYYY-MM-DD`. Returns `None` for anything else, including
  /// impossible days such as `2023-02-29`.
  pub fn parse(s: &str) -> Option<Self> {
    let mut parts = s.trim().split('-');
    let (y, m, d) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || y.len() != 4 || m.len() != 2 || d.len() != 2 {
      return None;
    }
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if !(all_digits(y) && all_digits(m) && all_digits(d)) {
      return None;
    }
    let date = Self {
      year:  y.parse().ok()?,
      month: m.parse().ok()?,
      day:   d.parse().ok()?,
    };
    let valid = date.year >= 1
      && (1..=12).contains(&date.month)
      && (1..=days_in_month(date.year, date.month)).contains(&date.day);
    valid.then_some(date)
  }

  /// Days since 1970-01-01.
  pub fn day_number(&self) -> i64 {
    let m = self.month as i64;
    let d = self.day as i64;
    let y = self.year as i64 - if m <= 2 { 1 } else { 0 };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (m + 9) % 12;
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
  }
}

impl PartialOrd for CalendarDate {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for CalendarDate {
  fn cmp(&self, other: &Self) -> Ordering { self.day_number().cmp(&other.day_number()) }
}

fn is_leap_year(year: u32) -> bool { year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) }

fn days_in_month(year: u32, month: u32) -> u32 {
  match month {
    2 if is_leap_year(year) => 29,
    2 => 28,
    4 | 6 | 9 | 11 => 30,
    _ => 31,
  }
}

/// An opportunity's end: a date, or open-ended.
///
/// Ordering treats `Ongoing` as later than every date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndDate {
  On(CalendarDate),
  Ongoing,
}

impl EndDate {
  /// An empty string is `Ongoing`; otherwise the string must be a date.
  pub fn parse(s: &str) -> Option<Self> {
    if s.trim().is_empty() {
      Some(Self::Ongoing)
    } else {
      CalendarDate::parse(s).map(Self::On)
    }
  }
}

impl PartialOrd for EndDate {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for EndDate {
  fn cmp(&self, other: &Self) -> Ordering {
    match (self, other) {
      (Self::Ongoing, Self::Ongoing) => Ordering::Equal,
      (Self::Ongoing, Self::On(_)) => Ordering::Greater,
      (Self::On(_), Self::Ongoing) => Ordering::Less,
      (Self::On(a), Self::On(b)) => a.cmp(b),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  #[test]
  fn parses_components() {
    let d = CalendarDate::parse("2024-03-15").unwrap();
    assert_eq!((d.year, d.month, d.day), (2024, 3, 15));
  }

  #[test]
  fn rejects_malformed_input() {
    for bad in [
      "", "2024-3-15", "2024/03/15", "20240315", "2024-13-01", "2024-00-10",
      "2023-02-29", "2024-04-31", "2024-03-15-01", "abcd-ef-gh", "0000-01-01",
    ] {
      assert!(CalendarDate::parse(bad).is_none(), "accepted {bad:?}");
    }
    assert!(CalendarDate::parse("2024-02-29").is_some());
  }

  #[test]
  fn day_number_matches_chrono() {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    for s in ["1970-01-01", "2000-02-29", "2020-01-01", "1969-12-31", "2100-03-01"] {
      let ours = CalendarDate::parse(s).unwrap().day_number();
      let theirs = (NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() - epoch).num_days();
      assert_eq!(ours, theirs, "{s}");
    }
  }

  #[test]
  fn ongoing_is_later_than_any_date() {
    let ongoing = EndDate::parse("").unwrap();
    let dated = EndDate::parse("9999-12-31").unwrap();
    assert_eq!(ongoing, EndDate::Ongoing);
    assert!(ongoing > dated);
    assert!(EndDate::parse("2020-01-01").unwrap() < dated);
    assert!(EndDate::parse("not a date").is_none());
  }
}
