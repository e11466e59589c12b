//! Builds the VCALENDAR section tree from resolved delivery days.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use postgang_ical::{Attribute, Content, Field, Section};

use crate::posten::{weekday_name, PostalCode};

/// Landing page for delivery information, also used as the event URL.
pub const DELIVERY_INFO_URL: &str = "https://www.posten.no/levering-av-post/";

pub struct Calendar {
    pub prod_id: String,
    pub now: DateTime<Tz>,
    pub dates: Vec<NaiveDate>,
    pub hostname: String,
    pub code: PostalCode,
}

impl Calendar {
    pub fn new(
        now: DateTime<Tz>,
        dates: Vec<NaiveDate>,
        hostname: String,
        code: PostalCode,
    ) -> Self {
        let prod_id = format!(
            "-//postgang//postgang {code}@{}//EN",
            env!("CARGO_PKG_VERSION")
        );
        Self {
            prod_id,
            now,
            dates,
            hostname,
            code,
        }
    }

    #[must_use]
    pub fn to_section(&self) -> Section {
        let header = vec![
            Field::new("VERSION", "2.0"),
            Field::new("PRODID", self.prod_id.clone()),
            Field::new("CALSCALE", "GREGORIAN"),
            Field::new("METHOD", "PUBLISH"),
        ];
        let events = self.dates.iter().map(|date| self.event(*date)).collect();
        Section::new(
            "VCALENDAR",
            vec![Content::Fields(header), Content::Sections(events)],
        )
    }

    fn event(&self, date: NaiveDate) -> Section {
        let date_attribute = Attribute::new("VALUE", "DATE");
        // DTEND is the exclusive end of the all-day event.
        let end = date + Days::new(1);
        Section::with_fields(
            "VEVENT",
            vec![
                Field::new(
                    "UID",
                    format!("postgang-{}@{}", date.format("%Y%m%d"), self.hostname),
                ),
                Field::new("URL", DELIVERY_INFO_URL),
                Field::new(
                    "SUMMARY",
                    format!(
                        "{}: Posten kommer {} {}.",
                        self.code,
                        weekday_name(date.weekday()),
                        date.day()
                    ),
                ),
                Field::with_attributes(
                    "DTSTART",
                    date.format("%Y%m%d").to_string(),
                    vec![date_attribute.clone()],
                ),
                Field::with_attributes(
                    "DTEND",
                    end.format("%Y%m%d").to_string(),
                    vec![date_attribute],
                ),
                Field::new(
                    "DTSTAMP",
                    self.now
                        .with_timezone(&Utc)
                        .format("%Y%m%dT%H%M%SZ")
                        .to_string(),
                ),
            ],
        )
    }
}
