mod app;
mod calendar;
mod help;
mod jumpto;
mod logging;
mod monthlist;
mod theme;
use crate::app::App;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use luach::format::date_label;
use luach::{CalendarDate, DatePicker, HebrewCalendar, PickerConfig, Policy, Schedule, SearchCache};
use ratatui::DefaultTerminal;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        date: Option<Date>,
        policy: Policy,
        schedule: Schedule,
        modern_holidays: bool,
        log: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut date = None;
        let mut policy = Policy::new();
        let mut schedule = Schedule::Israel;
        let mut modern_holidays = false;
        let mut log = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Long("no-past") => policy = policy.disable_past_dates(true),
                Arg::Long("no-holidays") => policy = policy.disable_holidays_and_shabbat(true),
                Arg::Long("diaspora") => schedule = Schedule::Diaspora,
                Arg::Long("modern-holidays") => modern_holidays = true,
                Arg::Long("log") => log = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            date,
            policy,
            schedule,
            modern_holidays,
            log,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                date,
                policy,
                schedule,
                modern_holidays,
                log,
            } => {
                if let Some(path) = log {
                    logging::init(&path)?;
                }
                let engine = HebrewCalendar::new()
                    .schedule(schedule)
                    .modern_holidays(modern_holidays);
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let today = engine
                    .hebrew_date(today)
                    .context("today has no Hebrew date")?;
                let mut config = PickerConfig::new().policy(policy);
                if let Some(date) = date {
                    let date = engine
                        .hebrew_date(date)
                        .with_context(|| format!("{date} has no Hebrew date"))?;
                    config = config.initial_date(date);
                }
                let picked = Rc::new(RefCell::new(None::<CalendarDate>));
                let sink = Rc::clone(&picked);
                let picker = DatePicker::new(engine, today, config, Rc::new(SearchCache::new()))
                    .on_date_set(move |date, _: &str| *sink.borrow_mut() = Some(date));
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(picker).run(terminal)
                })?;
                let picked = *picked.borrow();
                if let Some(date) = picked {
                    let gregorian = engine.gregorian_date(date)?;
                    println!("{}\t{}", date_label(date), gregorian.format(&YMD_FMT)?);
                }
                Ok(())
            }
            Command::Help => {
                println!("Usage: luach [options] [YYYY-MM-DD]");
                println!();
                println!("Pick a date from a Hebrew calendar and print it");
                println!();
                println!("Options:");
                println!("  --no-past         Do not allow picking days before today");
                println!("  --no-holidays     Do not allow picking Shabbat or festivals");
                println!("  --diaspora        Keep the festival days observed outside Israel");
                println!("  --modern-holidays Count Yom HaShoah, Yom HaZikaron, Yom HaAtzmaut");
                println!("                    and Yom Yerushalayim as holidays");
                println!("  --log FILE        Write debug logs to FILE");
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
