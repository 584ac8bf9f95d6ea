//! fitfocus - Workout session planner and focus-mode trainer

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::Level;

use fitfocus::db::{Database, History, Theme};
use fitfocus::exercises::{BodyPart, EXERCISE_DB};
use fitfocus::generate_workout;
use fitfocus::planner::{DEFAULT_MINUTES, WorkoutPlan};
use fitfocus::session::SessionController;
use fitfocus::tui::App;

#[derive(Parser)]
#[command(name = "fitfocus")]
#[command(author, version, about = "Workout planner with focus-mode timers")]
struct Cli {
    /// SQLite file holding history and theme
    #[arg(long, global = true, env = "FITFOCUS_DB", default_value = "fitfocus.db")]
    db: String,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive trainer
    Tui,

    /// Print a generated plan without starting a session
    Plan {
        /// Comma-separated body parts in priority order (e.g. "legs,core")
        #[arg(short, long, value_delimiter = ',', required = true)]
        parts: Vec<String>,

        /// Session length in minutes (20-120)
        #[arg(short, long, default_value_t = DEFAULT_MINUTES)]
        minutes: u32,

        /// Fixed seed for reproducible picks
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List completed sessions, newest first
    History {
        /// Number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Delete a history record
    Delete {
        /// Record id as shown by `history`
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show or change the theme
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let db = Database::open(&cli.db).with_context(|| format!("opening {}", cli.db))?;

    match cli.command {
        Some(Commands::Tui) | None => {
            let controller = SessionController::new(db, Box::new(StdRng::from_entropy()))?;
            let mut app = App::new(controller);
            app.run()?;
        }

        Some(Commands::Plan { parts, minutes, seed }) => {
            let parts = parse_parts(&parts)?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let plan = generate_workout(EXERCISE_DB, &parts, minutes, &mut rng, chrono::Utc::now())?;
            print_plan(&plan);
        }

        Some(Commands::History { limit }) => {
            let history = History::load(&db)?;
            println!("Recent sessions:");
            println!("{:-<60}", "");
            for r in history.records().iter().take(limit) {
                let parts: Vec<_> = r.parts.iter().map(|p| p.label()).collect();
                println!(
                    "{} | {:>3} min | {:>3}% | {} (id: {})",
                    r.date.format("%Y-%m-%d %H:%M"),
                    r.duration,
                    r.completed_rate,
                    parts.join(", "),
                    r.id
                );
            }
        }

        Some(Commands::Delete { id, yes }) => {
            let mut controller = SessionController::new(db, Box::new(StdRng::from_entropy()))?;
            let Some(request) = controller.request_history_delete(&id) else {
                bail!("No history record with id {}", id);
            };
            if !yes && !confirm(&format!("Delete record {}? [y/N] ", id))? {
                println!("Cancelled");
                return Ok(());
            }
            if controller.confirm_history_delete(request) {
                println!("Deleted: {}", id);
            } else {
                println!("Nothing deleted: {} is no longer in history", id);
            }
        }

        Some(Commands::Theme { action }) => {
            let theme = match action {
                None => Theme::load(&db)?,
                Some(action) => {
                    let theme = match action {
                        ThemeAction::Light => Theme::Light,
                        ThemeAction::Dark => Theme::Dark,
                        ThemeAction::Toggle => Theme::load(&db)?.toggled(),
                    };
                    theme.save(&db)?;
                    theme
                }
            };
            println!("Theme: {}", theme.as_str());
        }
    }

    Ok(())
}

fn parse_parts(names: &[String]) -> Result<Vec<BodyPart>> {
    names
        .iter()
        .map(|name| match BodyPart::parse(name) {
            Some(BodyPart::General) | None => bail!("Unknown body part: {}", name),
            Some(part) => Ok(part),
        })
        .collect()
}

fn print_plan(plan: &WorkoutPlan) {
    let parts: Vec<_> = plan.selected_parts.iter().map(|p| p.label()).collect();
    println!("Plan {} | {} min | {}", plan.id, plan.total_duration, parts.join(", "));
    println!("{:-<60}", "");
    for (i, ex) in plan.exercises.iter().enumerate() {
        println!(
            "{:02} {} {:8} {} {} {}",
            i + 1,
            ex.category.emoji(),
            ex.category.label(),
            ex.emoji,
            ex.name,
            ex.prescription.unwrap_or("")
        );
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
