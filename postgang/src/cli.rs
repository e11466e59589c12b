use std::env;
use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use getopts::Options;

use crate::posten::PostalCode;

/// Where to read the delivery day response from in offline mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    Path(PathBuf),
}

pub struct Args {
    pub code: PostalCode,
    pub input: Option<Input>,
    pub date: Option<NaiveDate>,
    pub hostname: Option<String>,
    pub output: Option<PathBuf>,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optflag("V", "version", "Print the version and exit");
    opts.optopt(
        "c",
        "code",
        "Postal code, an integer between 1 and 9999",
        "CODE",
    );
    opts.optopt(
        "i",
        "input",
        "Read the delivery day response from a file instead of posten.no ('-' for stdin)",
        "FILE",
    );
    opts.optopt(
        "d",
        "date",
        "Resolve delivery days against this date instead of today (YYYY-MM-DD, with --input)",
        "DATE",
    );
    opts.optopt("n", "hostname", "Hostname to use in event UIDs", "HOSTNAME");
    opts.optopt(
        "o",
        "output",
        "Write the calendar to a file instead of stdout ('-' for stdout)",
        "FILE",
    );
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    if matches.opt_present("version") {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    let code = match matches.opt_str("code") {
        Some(value) => match PostalCode::parse(&value) {
            Ok(code) => code,
            Err(err) => {
                eprintln!("{err}");
                process::exit(1);
            }
        },
        None => {
            eprintln!("Missing required option 'code'");
            process::exit(1);
        }
    };

    let input = matches.opt_str("input").map(|value| {
        if value == "-" {
            Input::Stdin
        } else {
            Input::Path(PathBuf::from(value))
        }
    });

    let date = matches.opt_str("date").map(|value| {
        match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
            Ok(date) => date,
            Err(err) => {
                eprintln!("Provided value for option 'date' is invalid: {err}");
                process::exit(1);
            }
        }
    });

    let output = matches
        .opt_str("output")
        .filter(|value| value != "-")
        .map(PathBuf::from);

    Args {
        code,
        input,
        date,
        hostname: matches.opt_str("hostname"),
        output,
    }
}
