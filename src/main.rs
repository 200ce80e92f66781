use cadence::{
    app::{App, Control},
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore},
    counterbalance::{self, AssignError, ScheduleRow, Technique},
    passages::{self, PassageSet},
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    TICK_RATE_MS,
};
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand, ValueEnum};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use itertools::Itertools;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    time::Duration,
};

/// counterbalanced condition assignment and a typing speed test for survey experiments
#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// technique and complexity order for an arrangement id (1-12)
    Arrangement {
        id: usize,
        #[clap(long)]
        json: bool,
    },
    /// technique and complexity for one step (1-6) of an arrangement
    Step {
        id: usize,
        step: usize,
        #[clap(long)]
        json: bool,
    },
    /// comma separated steps of an arrangement that use a technique
    Steps {
        id: usize,
        #[clap(value_enum)]
        technique: Technique,
    },
    /// date picker variant for an index (1-2)
    DateSelect { index: usize },
    /// every arrangement/step pairing
    Table {
        #[clap(short, long, value_enum, default_value_t = TableFormat::Tsv)]
        format: TableFormat,
    },
    /// run the typing speed test in the terminal
    Type {
        /// text to type; a random bundled passage when omitted
        #[clap(short, long)]
        prompt: Option<String>,
        /// bundled passage set to pick from
        #[clap(long = "passages")]
        passage_set: Option<String>,
        /// survey question id used to name the answer field
        #[clap(long)]
        question_id: Option<String>,
        /// allow pasting into the answer field
        #[clap(long)]
        allow_paste: bool,
        /// only update the speed display on keystrokes
        #[clap(long)]
        no_auto_update: bool,
        /// print the result as json after the test
        #[clap(long)]
        json: bool,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
enum TableFormat {
    Tsv,
    Csv,
    Json,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Arrangement { id, json } => {
            let a = counterbalance::resolve_arrangement(id).unwrap_or_else(|e| usage_error(e));
            if json {
                writeln!(out, "{}", serde_json::to_string(&a)?)?;
            } else {
                writeln!(
                    out,
                    "{}\t{}\t{}",
                    a.id,
                    a.techniques.iter().join(","),
                    a.complexities.iter().join(",")
                )?;
            }
        }
        Command::Step { id, step, json } => {
            let s = counterbalance::resolve_step(id, step).unwrap_or_else(|e| usage_error(e));
            if json {
                writeln!(out, "{}", serde_json::to_string(&s)?)?;
            } else {
                writeln!(out, "{}\t{}\t{}", s.id, s.technique, s.complexity)?;
            }
        }
        Command::Steps { id, technique } => {
            let steps = counterbalance::steps_for_technique(id, technique)
                .unwrap_or_else(|e| usage_error(e));
            writeln!(out, "{steps}")?;
        }
        Command::DateSelect { index } => {
            let d = counterbalance::date_select_for(index).unwrap_or_else(|e| usage_error(e));
            writeln!(out, "{d}")?;
        }
        Command::Table { format } => {
            write_table(&mut out, &counterbalance::schedule(), format)?;
        }
        Command::Type {
            prompt,
            passage_set,
            question_id,
            allow_paste,
            no_auto_update,
            json,
        } => {
            drop(out);
            let store = FileConfigStore::new();
            log::debug!("loading config from {}", store.path().display());
            let mut config = store.load();
            if let Some(qid) = question_id {
                config.question_id = qid;
            }
            if let Some(set) = passage_set {
                config.passages = set;
            }
            config.options.disable_paste &= !allow_paste;
            config.options.auto_update &= !no_auto_update;

            let prompt = match prompt {
                Some(p) => p,
                None => PassageSet::load(&config.passages)
                    .map(|set| set.random().to_string())
                    .unwrap_or_else(|e| {
                        let mut cmd = Cli::command();
                        cmd.error(
                            ErrorKind::InvalidValue,
                            format!("{e} (available: {})", passages::available().join(", ")),
                        )
                        .exit()
                    }),
            };
            run_type(&prompt, &config, json)?;
        }
    }

    Ok(())
}

fn usage_error(e: AssignError) -> ! {
    let mut cmd = Cli::command();
    cmd.error(ErrorKind::ValueValidation, e).exit()
}

fn write_table<W: Write>(
    out: &mut W,
    rows: &[ScheduleRow],
    format: TableFormat,
) -> Result<(), Box<dyn Error>> {
    match format {
        TableFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
        }
        TableFormat::Tsv | TableFormat::Csv => {
            let delimiter = if format == TableFormat::Tsv { b'\t' } else { b',' };
            let mut writer = csv::WriterBuilder::new()
                .delimiter(delimiter)
                .from_writer(out);
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

fn run_type(prompt: &str, config: &Config, json: bool) -> Result<(), Box<dyn Error>> {
    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let app = App::new(prompt, config, SystemClock)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Some(completion) = result? {
        if json {
            println!("{}", serde_json::to_string(&completion)?);
        } else {
            println!("{} wpm", completion.wpm);
        }
    }
    Ok(())
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App<SystemClock>,
) -> Result<Option<cadence::app::Completion>, Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| f.render_widget(&app, f.area()))?;
    loop {
        let event = runner.step();
        if app.handle(event, runner.tick_interval()) == Control::Quit {
            break;
        }
        terminal.draw(|f| f.render_widget(&app, f.area()))?;
    }

    Ok(app.finish())
}
