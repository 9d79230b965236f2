//! The `unitdrill drill` command.
//!
//! A line-oriented front end over [`DrillEngine`]. Each input line is one
//! user action; the screen is redrawn after every action.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use anyhow::Result;
use comfy_table::Table;

use unitdrill_core::model::Choice;
use unitdrill_core::session::{DrillEngine, DrillState, SessionSummary};

use super::units::units_table;
use super::DataArgs;

/// One line of learner input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Answer(Choice),
    Continue,
    Peek,
    Back,
    Quit,
    Select(i64),
    Unrecognized(String),
}

impl FromStr for Action {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Ok(match s.as_str() {
            "k" | "known" => Action::Answer(Choice::Known),
            "u" | "unknown" => Action::Answer(Choice::Unknown),
            "" | "c" | "continue" => Action::Continue,
            "p" | "peek" => Action::Peek,
            "b" | "back" => Action::Back,
            "q" | "quit" | "exit" => Action::Quit,
            other => match other.trim_start_matches('#').parse::<i64>() {
                Ok(id) => Action::Select(id),
                Err(_) => Action::Unrecognized(other.to_string()),
            },
        })
    }
}

/// Display settings for the drill screen.
#[derive(Debug, Clone, Copy)]
pub struct DrillOptions {
    pub show_remaining: bool,
}

pub fn execute(unit: Option<i64>, source: DataArgs) -> Result<()> {
    let (config, dataset) = source.load()?;
    if dataset.is_empty() {
        println!("No units found in vocabulary.");
        return Ok(());
    }

    let mut engine = DrillEngine::new(dataset).with_placeholder(config.definition_placeholder);
    let options = DrillOptions {
        show_remaining: config.show_remaining,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&mut engine, unit, options, stdin.lock(), stdout.lock())
}

/// Drive `engine` from `input` until `q` or end of input.
pub fn run<R: BufRead, W: Write>(
    engine: &mut DrillEngine,
    start: Option<i64>,
    options: DrillOptions,
    input: R,
    mut out: W,
) -> Result<()> {
    if let Some(unit_id) = start {
        if let Err(e) = engine.start_unit(unit_id) {
            writeln!(out, "! {e}")?;
        }
    }
    render(engine, options, &mut out)?;

    for line in input.lines() {
        let action: Action = match line?.parse() {
            Ok(action) => action,
            Err(never) => match never {},
        };
        tracing::debug!(?action, state = %engine.state(), "input");

        if action == Action::Quit {
            break;
        }
        if let Err(message) = apply(engine, action) {
            writeln!(out, "! {message}")?;
        }
        render(engine, options, &mut out)?;
    }

    out.flush()?;
    Ok(())
}

fn apply(engine: &mut DrillEngine, action: Action) -> Result<(), String> {
    let idle = engine.state() == DrillState::Idle;
    match action {
        Action::Select(id) if idle => engine.start_unit(id).map_err(|e| e.to_string()),
        Action::Continue if idle => Ok(()),
        Action::Answer(choice) => engine.answer(choice).map_err(|e| e.to_string()),
        Action::Continue => engine.proceed().map(|_| ()).map_err(|e| e.to_string()),
        Action::Peek => engine.toggle_peek().map(|_| ()).map_err(|e| e.to_string()),
        Action::Back => {
            engine.back();
            Ok(())
        }
        Action::Select(_) => Err("press b to return to unit selection first".into()),
        Action::Unrecognized(input) => Err(format!("unrecognized input: {input}")),
        Action::Quit => Ok(()),
    }
}

fn render<W: Write>(engine: &DrillEngine, options: DrillOptions, out: &mut W) -> io::Result<()> {
    match engine.state() {
        DrillState::Idle => {
            writeln!(out)?;
            writeln!(out, "{}", units_table(engine.dataset()))?;
            writeln!(out, "Choose a unit by number, or q to quit.")?;
        }
        DrillState::Drilling | DrillState::Revealed(_) => {
            let Some(card) = engine.card() else {
                return Ok(());
            };
            writeln!(out)?;
            if options.show_remaining {
                writeln!(out, "[remaining {}]", card.remaining)?;
            }
            writeln!(out, "  {}", card.term)?;
            if card.definition_visible {
                writeln!(out, "  {}", card.definition)?;
            }
            match engine.state() {
                DrillState::Revealed(choice) => {
                    writeln!(out, "You answered {choice}. [c]ontinue")?;
                }
                _ => writeln!(out, "[k]nown / [u]nknown / [p]eek / [b]ack")?,
            }
        }
        DrillState::Completed => {
            writeln!(out)?;
            writeln!(out, "Unit complete!")?;
            writeln!(out, "Continue to choose another unit.")?;
            if let Some(summary) = engine.summary() {
                writeln!(out, "{}", summary_table(&summary))?;
            }
            writeln!(out, "[c]ontinue")?;
        }
    }
    Ok(())
}

fn summary_table(summary: &SessionSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Unit", "Words", "Cards shown", "Known", "Unknown", "Most missed"]);

    let most_missed = summary
        .missed
        .iter()
        .take(3)
        .map(|m| format!("{} ({})", m.term, m.misses))
        .collect::<Vec<_>>()
        .join(", ");

    table.add_row(vec![
        format!("#{} {}", summary.unit_id, summary.title),
        summary.words.to_string(),
        summary.cards_shown.to_string(),
        summary.known.to_string(),
        summary.unknown.to_string(),
        if most_missed.is_empty() {
            "-".to_string()
        } else {
            most_missed
        },
    ]);
    table
}
