//! Types and parsing for the posten.no delivery day response.

use std::fmt;

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostenResponse {
    pub next_delivery_days: Vec<String>,
    #[serde(default)]
    pub is_street_address_req: bool,
}

/// A Norwegian postal code, stored zero-padded to four digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCode(String);

impl PostalCode {
    pub fn parse(input: &str) -> Result<Self> {
        let code = input
            .parse::<u16>()
            .map_err(|_| anyhow!("invalid postal code: {input}"))?;
        if !(1..=9999).contains(&code) {
            bail!("invalid postal code: {code:04}");
        }
        Ok(Self(format!("{code:04}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("mandag", Weekday::Mon),
    ("tirsdag", Weekday::Tue),
    ("onsdag", Weekday::Wed),
    ("torsdag", Weekday::Thu),
    ("fredag", Weekday::Fri),
    ("lørdag", Weekday::Sat),
    ("søndag", Weekday::Sun),
];

const MONTHS: [&str; 12] = [
    "januar", "februar", "mars", "april", "mai", "juni", "juli", "august", "september", "oktober",
    "november", "desember",
];

pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAYS[weekday.num_days_from_monday() as usize].0
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    WEEKDAYS
        .iter()
        .find(|(weekday_name, _)| *weekday_name == name)
        .map(|(_, weekday)| *weekday)
}

fn month_from_name(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|month_name| *month_name == name)
        .map(|index| index as u32 + 1)
}

static DELIVERY_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    let days = WEEKDAYS.map(|(name, _)| name).join("|");
    let months = MONTHS.join("|");
    Regex::new(&format!(
        r"^(?:i (?:dag|morgen) )?(?P<dayname>{days}) (?P<day>\d+)\. (?P<month>{months})$"
    ))
    .unwrap()
});

/// Resolves a phrase like `"onsdag 12. januar"` (optionally prefixed with
/// `"i dag "` or `"i morgen "`) to a date near `now`.
///
/// The response carries no year: a month other than December while `now` is
/// in December means the turn of the year.
pub fn parse_delivery_day(text: &str, now: &DateTime<Tz>) -> Result<NaiveDate> {
    let captures = DELIVERY_DAY_RE
        .captures(text)
        .ok_or_else(|| anyhow!("unrecognized delivery day: {text:?}"))?;

    let weekday = weekday_from_name(&captures["dayname"])
        .ok_or_else(|| anyhow!("unknown weekday in {text:?}"))?;
    let day = captures["day"].parse::<u32>()?;
    let month = month_from_name(&captures["month"])
        .ok_or_else(|| anyhow!("unknown month in {text:?}"))?;

    let mut year = now.year();
    if now.month() == 12 && month != 12 {
        year += 1;
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| anyhow!("invalid date in {text:?}: {year}-{month:02}-{day:02}"))?;
    if date.weekday() != weekday {
        bail!(
            "weekday mismatch in {text:?}: {date} is {}",
            weekday_name(date.weekday())
        );
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::Oslo;

    fn late_december() -> DateTime<Tz> {
        Oslo.with_ymd_and_hms(2021, 12, 28, 12, 0, 0).unwrap()
    }

    #[test]
    fn postal_code_is_zero_padded() {
        assert_eq!(PostalCode::parse("1").unwrap().as_str(), "0001");
        assert_eq!(PostalCode::parse("6666").unwrap().as_str(), "6666");
        assert_eq!(PostalCode::parse("9999").unwrap().as_str(), "9999");
    }

    #[test]
    fn postal_code_out_of_range() {
        for input in ["0", "10000", "99999", "abc", "-1", ""] {
            assert!(PostalCode::parse(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn weekday_table_round_trips() {
        for (name, weekday) in WEEKDAYS {
            assert_eq!(weekday_from_name(name), Some(weekday));
            assert_eq!(weekday_name(weekday), name);
        }
    }

    #[test]
    fn month_table_is_one_based() {
        assert_eq!(month_from_name("januar"), Some(1));
        assert_eq!(month_from_name("desember"), Some(12));
        assert_eq!(month_from_name("décembre"), None);
    }

    #[test]
    fn parses_plain_delivery_day() {
        let date = parse_delivery_day("torsdag 30. desember", &late_december()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 12, 30).unwrap());
    }

    #[test]
    fn parses_today_and_tomorrow_prefixes() {
        let now = late_december();
        assert_eq!(
            parse_delivery_day("i dag tirsdag 28. desember", &now).unwrap(),
            NaiveDate::from_ymd_opt(2021, 12, 28).unwrap()
        );
        assert_eq!(
            parse_delivery_day("i morgen onsdag 29. desember", &now).unwrap(),
            NaiveDate::from_ymd_opt(2021, 12, 29).unwrap()
        );
    }

    #[test]
    fn rolls_over_to_next_year_in_december() {
        let date = parse_delivery_day("onsdag 12. januar", &late_december()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2022, 1, 12).unwrap());
    }

    #[test]
    fn no_rollover_outside_december() {
        let now = Oslo.with_ymd_and_hms(2022, 6, 1, 12, 0, 0).unwrap();
        let date = parse_delivery_day("fredag 3. juni", &now).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2022, 6, 3).unwrap());
    }

    #[test]
    fn rejects_weekday_mismatch() {
        // 2021-12-29 is a Wednesday.
        assert!(parse_delivery_day("mandag 29. desember", &late_december()).is_err());
    }

    #[test]
    fn rejects_unrecognized_phrase() {
        assert!(parse_delivery_day("Wednesday 12. January", &late_december()).is_err());
        assert!(parse_delivery_day("", &late_december()).is_err());
    }
}
