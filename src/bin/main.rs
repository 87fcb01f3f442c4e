use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use miette::{IntoDiagnostic, Result};
use rand::seq::SliceRandom;

use hint_core::core::types::WordId;
use hint_core::{Config, HintEngine, HintService};

#[derive(Parser)]
#[command(name = "hint_engine", version, about = "Adaptive hint selection for vocabulary practice")]
struct Cli {
    /// Path to config.json.
    #[arg(long, global = true, default_value = "config.json")]
    config: PathBuf,

    /// Override the exploration rate from the config file.
    #[arg(long, global = true)]
    exploration_rate: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer line-delimited JSON requests from stdin on stdout.
    Serve,

    /// Print the value table.
    Table,

    /// Run an interactive quiz in the terminal.
    Quiz {
        /// Number of questions to ask.
        #[arg(long, default_value = "10")]
        rounds: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if let Some(rate) = cli.exploration_rate {
        config = config.with_exploration_rate(rate)?;
    }
    let engine = HintEngine::open(config)?;

    match cli.command {
        Commands::Serve => serve(HintService::new(engine)),
        Commands::Table => print_table(&engine),
        Commands::Quiz { rounds } => quiz(engine, rounds),
    }
}

fn serve(service: HintService) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line.into_diagnostic()?;
        if line.trim().is_empty() {
            continue;
        }
        let response = service.handle_json(&line);
        writeln!(stdout, "{response}").into_diagnostic()?;
        stdout.flush().into_diagnostic()?;
    }
    tracing::info!("stdin closed, shutting down");
    Ok(())
}

fn print_table(engine: &HintEngine) -> Result<()> {
    let table = engine.table();
    if table.is_empty() {
        println!("Value table is empty.");
        return Ok(());
    }
    let hint_types = &engine.config().hint_types;

    let mut header = format!("{:>8}", "Word ID");
    for hint in hint_types {
        header.push_str(&format!(" | {hint:>10}"));
    }
    println!("{}", header.as_str().bold());
    println!("{}", "-".repeat(header.len()));

    let initial = engine.config().initial_q_value;
    for (word_id, row) in table.iter() {
        let mut line = format!("{word_id:>8}");
        for hint in hint_types {
            let cell = match row.get(hint) {
                Some(q) => format!("{q:>10.3}"),
                None => format!("{:>10}", "N/A"),
            };
            line.push_str(" | ");
            match row.get(hint) {
                Some(q) if q > initial => line.push_str(&cell.green().to_string()),
                Some(q) if q < initial => line.push_str(&cell.red().to_string()),
                _ => line.push_str(&cell),
            }
        }
        println!("{line}");
    }
    Ok(())
}

fn quiz(mut engine: HintEngine, rounds: usize) -> Result<()> {
    let word_ids = engine.word_ids();
    if word_ids.is_empty() {
        println!("The catalog has no words.");
        return Ok(());
    }

    let mut rng = rand::thread_rng();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut score = 0;

    for round in 1..=rounds {
        let Some(&word_id) = word_ids.choose(&mut rng) else { break };
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0)).into_diagnostic()?;
        println!("{}", format!("Question {round}/{rounds}").bold());

        let hint_type = engine.best_for_word(word_id)?;
        let correct = ask(&engine, word_id, &hint_type, &stdin, &mut stdout)?;
        let Some(correct) = correct else { break };

        engine.record_answer(word_id, &hint_type, correct)?;
        if correct {
            score += 1;
            println!("{}", "Correct!".green());
        } else {
            let answer = engine.word(word_id)?.correct_choice().unwrap_or_default().to_string();
            println!("{} The answer was '{answer}'.", "Not quite.".red());
        }
        println!("Press [Enter] to continue.");
        let mut pause = String::new();
        stdin.lock().read_line(&mut pause).into_diagnostic()?;
    }

    println!("\nScore: {score}/{rounds}");
    println!("Overall best hint type so far: {}", engine.overall_best().bold());
    let flagged = engine.flagged();
    if !flagged.is_empty() {
        println!("Words to review: {flagged:?}");
    }
    Ok(())
}

/// Shows one question and reads the learner's choice.
/// Returns `None` when the learner quits.
fn ask(
    engine: &HintEngine,
    word_id: WordId,
    hint_type: &str,
    stdin: &io::Stdin,
    stdout: &mut io::Stdout,
) -> Result<Option<bool>> {
    let word = engine.word(word_id)?;
    let hint = engine.hint_text(word_id, hint_type)?;

    println!("\nWhat does '{}' mean?", word.word.as_str().bold());
    println!("Hint ({hint_type}): {hint}\n");
    for (i, choice) in word.choices.iter().enumerate() {
        println!("  {}: {choice}", i + 1);
    }

    loop {
        print!("\nAnswer (number, or 'q' to quit) > ");
        stdout.flush().into_diagnostic()?;
        let mut input = String::new();
        if stdin.lock().read_line(&mut input).into_diagnostic()? == 0 {
            return Ok(None);
        }
        match input.trim() {
            "q" | "quit" | "exit" => return Ok(None),
            s => match s.parse::<usize>() {
                Ok(n) if n >= 1 && n <= word.choices.len() => return Ok(Some(n - 1 == word.correct_index)),
                _ => println!("Pick a number between 1 and {}.", word.choices.len()),
            },
        }
    }
}
