mod calendar;
mod cli;
mod posten;

use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Europe::Oslo;
use chrono_tz::Tz;
use log::{debug, info};
use postgang_ical::{ContentPrinter, Section};
use tempfile::NamedTempFile;

use crate::calendar::Calendar;
use crate::cli::Input;
use crate::posten::{PostalCode, PostenResponse};

const UPSTREAM: &str = "https://www.posten.no/levering-av-post";

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let args = cli::parse(env::args().skip(1).collect());

    let (response, now) = match &args.input {
        Some(input) => read_delivery_days(input, args.date)?,
        None => fetch_delivery_days(&args.code).await?,
    };

    if response.is_street_address_req {
        bail!("street address is required for postal code {}", args.code);
    }

    let dates = response
        .next_delivery_days
        .iter()
        .map(|text| posten::parse_delivery_day(text, &now))
        .collect::<Result<Vec<_>>>()?;
    if dates.is_empty() {
        bail!("no delivery days found, check postal code: {}", args.code);
    }
    info!("Resolved {} delivery days", dates.len());

    let hostname = args
        .hostname
        .clone()
        .or_else(|| env::var("HOSTNAME").ok())
        .unwrap_or_else(|| "localhost".to_string());

    let calendar = Calendar::new(now, dates, hostname, args.code.clone());
    let section = calendar.to_section();

    match &args.output {
        Some(path) => write_calendar_file(path, &section)?,
        None => print_calendar(io::stdout().lock(), &section)?,
    }
    Ok(())
}

fn setup_logging() {
    if env::var("LOG").is_err() {
        env::set_var("LOG", "postgang=info");
    }
    pretty_env_logger::init_custom_env("LOG");
}

fn data_url(code: &PostalCode) -> String {
    format!("{UPSTREAM}/_/component/main/1/leftRegion/1?postCode={code}")
}

async fn fetch_delivery_days(code: &PostalCode) -> Result<(PostenResponse, DateTime<Tz>)> {
    let url = data_url(code);
    debug!("Sending HTTP request to {url}");
    let response = reqwest::Client::new()
        .get(&url)
        .header("x-requested-with", "XMLHttpRequest")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        bail!("got HTTP error: {status}");
    }

    // The upstream clock anchors year rollover, not the local one.
    let now = response
        .headers()
        .get(reqwest::header::DATE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| DateTime::parse_from_rfc2822(value).ok())
        .map_or_else(Utc::now, |date| date.with_timezone(&Utc));

    let body = response.text().await?;
    let data = serde_json::from_str(&body).context("unable to parse posten.no response")?;
    Ok((data, now.with_timezone(&Oslo)))
}

fn read_delivery_days(
    input: &Input,
    date: Option<NaiveDate>,
) -> Result<(PostenResponse, DateTime<Tz>)> {
    let body = match input {
        Input::Stdin => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Input::Path(path) => fs::read_to_string(path)
            .with_context(|| format!("couldn't read {}", path.display()))?,
    };
    let data = serde_json::from_str(&body).context("unable to parse posten.no response")?;

    let now = match date {
        Some(date) => date
            .and_time(NaiveTime::MIN)
            .and_local_timezone(Oslo)
            .single()
            .with_context(|| format!("ambiguous local time for {date}"))?,
        None => Utc::now().with_timezone(&Oslo),
    };
    Ok((data, now))
}

fn print_calendar<W: Write>(writer: W, section: &Section) -> Result<()> {
    let mut printer = ContentPrinter::new(io::BufWriter::new(writer));
    printer.print_section(section)?;
    printer.finish()?;
    Ok(())
}

fn write_calendar_file(path: &Path, section: &Section) -> Result<()> {
    // Only replace the destination once the document printed completely.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    print_calendar(tmp.as_file_mut(), section)?;
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("couldn't write {}", path.display()))?;
    Ok(())
}
