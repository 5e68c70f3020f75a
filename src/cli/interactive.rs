use crate::error::{DashboardError, Result};
use crate::processors::{DashboardPipeline, DashboardSession};
use crate::readers::CachedLoader;
use crate::utils::parse_date;
use crate::writers::TextReportWriter;
use chrono::NaiveDate;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

pub const HELP: &str = "\
Commands:
  towns A,B,...      select exactly these towns
  add TOWN           add a town to the selection
  remove TOWN        remove a town from the selection
  all                select every town
  none               clear the town selection
  range START END    restrict to an inclusive date range
  reset              all towns over the full date range
  show               render the current view again
  reload             reload the data file
  help               show this help
  quit               exit";

/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Towns(Vec<String>),
    Add(String),
    Remove(String),
    All,
    None,
    Range(NaiveDate, NaiveDate),
    Reset,
    Show,
    Reload,
    Help,
    Quit,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "towns" => SessionCommand::Towns(
                rest.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            "add" => SessionCommand::Add(Self::town_argument(verb, rest)?),
            "remove" => SessionCommand::Remove(Self::town_argument(verb, rest)?),
            "all" => SessionCommand::All,
            "none" => SessionCommand::None,
            "range" => {
                let mut parts = rest.split_whitespace();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(start), Some(end), None) => {
                        SessionCommand::Range(parse_date(start)?, parse_date(end)?)
                    }
                    _ => {
                        return Err(DashboardError::InvalidCommand(
                            "usage: range START END".to_string(),
                        ))
                    }
                }
            }
            "reset" => SessionCommand::Reset,
            "show" => SessionCommand::Show,
            "reload" => SessionCommand::Reload,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            "" => return Err(DashboardError::InvalidCommand("empty command".to_string())),
            other => {
                return Err(DashboardError::InvalidCommand(format!(
                    "unknown command '{}' (try 'help')",
                    other
                )))
            }
        };

        Ok(command)
    }

    fn town_argument(verb: &str, rest: &str) -> Result<String> {
        if rest.is_empty() {
            return Err(DashboardError::InvalidCommand(format!(
                "usage: {} TOWN",
                verb
            )));
        }
        Ok(rest.to_string())
    }
}

/// What the event loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Render,
    Quiet,
    Quit,
}

/// Ties the session to its loader so reload and watch share one cache
pub struct InteractiveDashboard {
    loader: CachedLoader,
    session: DashboardSession,
    source_failing: bool,
}

impl InteractiveDashboard {
    pub fn new(mut loader: CachedLoader, pipeline: DashboardPipeline) -> Result<Self> {
        let table = loader.get()?;
        Ok(Self {
            loader,
            session: DashboardSession::new(table, pipeline),
            source_failing: false,
        })
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    /// Apply one command. Errors leave the previous selection in place.
    pub fn handle(&mut self, command: SessionCommand) -> Result<Outcome> {
        match command {
            SessionCommand::Towns(towns) => {
                self.session.set_towns(towns)?;
            }
            SessionCommand::Add(town) => {
                self.session.add_town(&town)?;
            }
            SessionCommand::Remove(town) => {
                self.session.remove_town(&town)?;
            }
            SessionCommand::All => {
                self.session.select_all_towns()?;
            }
            SessionCommand::None => {
                self.session.clear_towns()?;
            }
            SessionCommand::Range(start, end) => {
                self.session.set_date_range(start, end)?;
            }
            SessionCommand::Reset => {
                self.session.reset();
            }
            SessionCommand::Show => {}
            SessionCommand::Reload => {
                self.loader.invalidate();
                let table = self.loader.get()?;
                self.session.replace_table(table);
            }
            SessionCommand::Help => return Ok(Outcome::Quiet),
            SessionCommand::Quit => return Ok(Outcome::Quit),
        }
        Ok(Outcome::Render)
    }

    /// Reload when the data file changed; true when the view was recomputed
    pub fn poll_source(&mut self) -> Result<bool> {
        if !self.loader.refresh_if_changed()? {
            return Ok(false);
        }
        let table = self.loader.get()?;
        self.session.replace_table(table);
        Ok(true)
    }

    /// One watch tick. A failed reload keeps the previous table and is
    /// logged once until the source becomes readable again.
    pub fn watch_tick(&mut self) -> bool {
        match self.poll_source() {
            Ok(reloaded) => {
                if self.source_failing {
                    info!(path = %self.loader.path().display(), "Data file readable again");
                    self.source_failing = false;
                }
                reloaded
            }
            Err(e) => {
                if !self.source_failing {
                    warn!("Reload failed, keeping previous table: {}", e);
                    self.source_failing = true;
                }
                false
            }
        }
    }

    pub fn is_source_failing(&self) -> bool {
        self.source_failing
    }
}

/// Run the stdin event loop until `quit` or end of input
pub async fn run_interactive(
    mut dashboard: InteractiveDashboard,
    writer: TextReportWriter,
    watch_interval: Option<Duration>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = watch_interval.map(tokio::time::interval);

    render(&writer, &dashboard)?;
    prompt()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("End of input, leaving interactive mode");
                    break;
                };
                if line.trim().is_empty() {
                    prompt()?;
                    continue;
                }

                let outcome = SessionCommand::parse(&line).and_then(|c| dashboard.handle(c));
                match outcome {
                    Ok(Outcome::Render) => render(&writer, &dashboard)?,
                    Ok(Outcome::Quiet) => println!("{}", HELP),
                    Ok(Outcome::Quit) => break,
                    Err(e) => println!("Error: {}", e),
                }
                prompt()?;
            }
            _ = tick(&mut ticker) => {
                if dashboard.watch_tick() {
                    println!("\nData file changed, view reloaded");
                    render(&writer, &dashboard)?;
                    prompt()?;
                }
            }
        }
    }

    Ok(())
}

async fn tick(ticker: &mut Option<tokio::time::Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

fn render(writer: &TextReportWriter, dashboard: &InteractiveDashboard) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writer.write(dashboard.session().view(), &mut out)
}

fn prompt() -> Result<()> {
    let mut out = std::io::stdout();
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::WeatherReader;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    const CSV: &str = "\
town,date,avg_temp_c,max_temp_c,min_temp_c,humidity,precipitation_mm,wind_kph
A,2024-01-01,20,25,15,60,0,10
A,2024-01-02,22,27,16,55,1.5,12
B,2024-01-01,30,35,25,70,0,8
";

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn dashboard(file: &NamedTempFile) -> InteractiveDashboard {
        let loader = CachedLoader::new(file.path(), WeatherReader::new());
        InteractiveDashboard::new(loader, DashboardPipeline::default()).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            SessionCommand::parse("towns Nairobi, Mombasa").unwrap(),
            SessionCommand::Towns(vec!["Nairobi".to_string(), "Mombasa".to_string()])
        );
        assert_eq!(
            SessionCommand::parse("add Kisumu").unwrap(),
            SessionCommand::Add("Kisumu".to_string())
        );
        assert_eq!(
            SessionCommand::parse("range 2024-01-01 2024/01/31").unwrap(),
            SessionCommand::Range(ymd(2024, 1, 1), ymd(2024, 1, 31))
        );
        assert_eq!(SessionCommand::parse("  QUIT ").unwrap(), SessionCommand::Quit);
        assert_eq!(SessionCommand::parse("towns").unwrap(), SessionCommand::Towns(vec![]));
    }

    #[test]
    fn test_parse_errors() {
        assert!(SessionCommand::parse("add").is_err());
        assert!(SessionCommand::parse("range 2024-01-01").is_err());
        assert!(SessionCommand::parse("range 2024-01-01 soon").is_err());
        assert!(matches!(
            SessionCommand::parse("explode"),
            Err(DashboardError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_commands_update_view() {
        let file = csv_file(CSV);
        let mut dashboard = dashboard(&file);
        assert_eq!(dashboard.session().view().row_count, 3);

        let outcome = dashboard
            .handle(SessionCommand::Towns(vec!["A".to_string()]))
            .unwrap();
        assert_eq!(outcome, Outcome::Render);
        assert_eq!(dashboard.session().view().row_count, 2);

        dashboard
            .handle(SessionCommand::Range(ymd(2024, 1, 1), ymd(2024, 1, 1)))
            .unwrap();
        assert_eq!(dashboard.session().view().row_count, 1);

        assert!(dashboard.handle(SessionCommand::Add("Z".to_string())).is_err());
        assert_eq!(dashboard.session().view().row_count, 1);

        assert_eq!(dashboard.handle(SessionCommand::Help).unwrap(), Outcome::Quiet);
        assert_eq!(dashboard.handle(SessionCommand::Quit).unwrap(), Outcome::Quit);
    }

    #[test]
    fn test_reload_picks_up_new_rows() {
        let file = csv_file(CSV);
        let mut dashboard = dashboard(&file);

        std::fs::write(file.path(), format!("{}B,2024-01-02,31,36,26,65,0,9\n", CSV)).unwrap();
        dashboard.handle(SessionCommand::Reload).unwrap();

        let view = dashboard.session().view();
        assert_eq!(view.row_count, 4);
        assert_eq!(view.town_averages.mean_of("B"), Some(30.5));
    }

    #[test]
    fn test_watch_survives_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("weather.csv");
        std::fs::write(&path, CSV).unwrap();

        let loader = CachedLoader::new(&path, WeatherReader::new());
        let mut dashboard =
            InteractiveDashboard::new(loader, DashboardPipeline::default()).unwrap();

        std::fs::remove_file(&path).unwrap();
        assert!(!dashboard.watch_tick());
        assert!(!dashboard.watch_tick());
        assert!(dashboard.is_source_failing());
        assert_eq!(dashboard.session().view().row_count, 3);

        std::fs::write(&path, format!("{}B,2024-01-02,31,36,26,65,0,9\n", CSV)).unwrap();
        assert!(dashboard.watch_tick());
        assert!(!dashboard.is_source_failing());
        assert_eq!(dashboard.session().view().row_count, 4);
    }

    #[test]
    fn test_poll_source_detects_change() {
        let file = csv_file(CSV);
        let mut dashboard = dashboard(&file);
        assert!(!dashboard.poll_source().unwrap());

        std::fs::write(file.path(), format!("{}B,2024-01-02,31,36,26,65,0,9\n", CSV)).unwrap();

        assert!(dashboard.poll_source().unwrap());
        assert_eq!(dashboard.session().view().row_count, 4);
    }
}
