// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use gpa_ledger::{
    export_csv, format_average, import_into, init_logging, label_for_points, load_ledger,
    load_theme, save_ledger, save_theme, Config, CreditHours, GpaTier, Grade, LogTarget,
    SqliteStore, Theme, COURSES_KEY,
};

#[derive(Parser, Debug)]
#[command(name = "gpa-ledger", version, about = "Track courses and compute a credit-weighted GPA")]
struct Cli {
    /// SQLite file holding saved courses and theme
    #[arg(long, global = true, env = gpa_ledger::config::DB_ENV_VAR)]
    db: Option<PathBuf>,

    /// Log filter (e.g. "debug"); logging is off when unset
    #[arg(long, global = true, env = "RUST_LOG")]
    log: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive terminal UI (default)
    Ui,
    /// Add a course
    Add {
        /// Letter grade, e.g. A-, B+, F
        grade: Grade,
        /// Credit hours (1-6)
        #[arg(default_value = "3")]
        credits: CreditHours,
    },
    /// Remove the course at a position (as shown by `list`)
    Remove { index: usize },
    /// Show all courses and the GPA
    List,
    /// Print the GPA only
    Gpa,
    /// Show or change the theme
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
    /// Remove every course
    Clear,
    /// Append courses from a CSV transcript
    Import { csv: PathBuf },
    /// Write courses to a CSV transcript
    Export { csv: PathBuf },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeAction {
    Dark,
    Light,
    Toggle,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.db, cli.log);
    let command = cli.command.unwrap_or(Command::Ui);
    init_logging(config.log_filter.as_deref(), &log_target(&command, &config))?;

    match command {
        Command::Ui => run_ui_mode(&config)?,
        Command::Add { grade, credits } => run_add(&config, grade, credits)?,
        Command::Remove { index } => run_remove(&config, index)?,
        Command::List => run_list(&config)?,
        Command::Gpa => run_gpa(&config)?,
        Command::Theme { action } => run_theme(&config, action)?,
        Command::Clear => run_clear(&config)?,
        Command::Import { csv } => run_import(&config, &csv)?,
        Command::Export { csv } => run_export(&config, &csv)?,
    }

    Ok(())
}

/// The terminal UI owns the screen, so its logs go to a file
fn log_target(command: &Command, config: &Config) -> LogTarget {
    match command {
        Command::Ui => LogTarget::File(config.log_file()),
        _ => LogTarget::Stderr,
    }
}

fn open_store(config: &Config) -> Result<SqliteStore> {
    SqliteStore::open(&config.db_path)
}

fn print_gpa(ledger: &gpa_ledger::Ledger) {
    let average = ledger.compute_average();
    match average {
        Some(gpa) => println!(
            "GPA: {} ({} standing, {} credits)",
            format_average(average),
            GpaTier::from_average(gpa).name(),
            ledger.total_credit_hours()
        ),
        None => println!("GPA: {}", format_average(average)),
    }
}

fn run_add(config: &Config, grade: Grade, credits: CreditHours) -> Result<()> {
    let store = open_store(config)?;
    let mut ledger = load_ledger(&store);

    let record = ledger.append(grade, credits);
    save_ledger(&store, &ledger)?;

    println!(
        "✓ Added {} × {} credits = {:.2} grade points",
        grade.label(),
        record.credit_hours(),
        record.grade_points()
    );
    print_gpa(&ledger);
    Ok(())
}

fn run_remove(config: &Config, index: usize) -> Result<()> {
    let store = open_store(config)?;
    let mut ledger = load_ledger(&store);

    let Some(removed) = ledger.remove_at(index) else {
        bail!(
            "No course at position {} ({} course(s) saved)",
            index,
            ledger.len()
        );
    };
    save_ledger(&store, &ledger)?;

    println!("✓ Removed {}", label_for_points(removed.grade()));
    print_gpa(&ledger);
    Ok(())
}

fn run_list(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let ledger = load_ledger(&store);

    if ledger.is_empty() {
        println!("No courses added yet.");
        return Ok(());
    }

    println!("{:>3}  {:<10} {:>12} {:>12}", "#", "Grade", "Credit Hours", "Grade Points");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for (i, course) in ledger.iter().enumerate() {
        println!(
            "{:>3}  {:<10} {:>12} {:>12.2}",
            i,
            label_for_points(course.grade()),
            course.credit_hours(),
            course.grade_points()
        );
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    print_gpa(&ledger);

    if let Some(saved) = store.updated_at(COURSES_KEY)? {
        println!("Last saved: {}", saved.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    Ok(())
}

fn run_gpa(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    println!("{}", format_average(load_ledger(&store).compute_average()));
    Ok(())
}

fn run_theme(config: &Config, action: Option<ThemeAction>) -> Result<()> {
    let store = open_store(config)?;
    let current = load_theme(&store);

    let next = match action {
        None => {
            println!("{} {}", current.icon(), current);
            return Ok(());
        }
        Some(ThemeAction::Dark) => Theme::Dark,
        Some(ThemeAction::Light) => Theme::Light,
        Some(ThemeAction::Toggle) => current.toggle(),
    };

    save_theme(&store, next)?;
    println!("✓ Theme: {} {}", next.icon(), next);
    Ok(())
}

fn run_clear(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let mut ledger = load_ledger(&store);
    let count = ledger.len();

    ledger.clear();
    save_ledger(&store, &ledger)?;

    println!("✓ Removed {} course(s)", count);
    Ok(())
}

fn run_import(config: &Config, csv: &Path) -> Result<()> {
    println!("📂 Importing transcript {}...", csv.display());

    let store = open_store(config)?;
    let mut ledger = load_ledger(&store);

    let added = import_into(&mut ledger, csv)?;
    save_ledger(&store, &ledger)?;

    println!("✓ Imported {} course(s), {} total", added, ledger.len());
    print_gpa(&ledger);
    Ok(())
}

fn run_export(config: &Config, csv: &Path) -> Result<()> {
    let store = open_store(config)?;
    let ledger = load_ledger(&store);

    let written = export_csv(&ledger, csv)?;
    println!("✓ Wrote {} course(s) to {}", written, csv.display());
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let mut app = ui::App::new(Box::new(store));
    ui::run_ui(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the subcommands: gpa-ledger --help");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ui_mode_logs_to_file() {
        let config = Config::resolve(Some(PathBuf::from("grades.db")), Some("debug".into()));

        assert_eq!(
            log_target(&Command::Ui, &config),
            LogTarget::File(PathBuf::from("grades.log"))
        );
        assert_eq!(log_target(&Command::List, &config), LogTarget::Stderr);
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from(["gpa-ledger", "add", "B+", "4"]).unwrap();
        match cli.command {
            Some(Command::Add { grade, credits }) => {
                assert_eq!(grade, Grade::BPlus);
                assert_eq!(credits.get(), 4);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Cli::try_parse_from(["gpa-ledger", "add", "Z", "3"]).is_err());
        assert!(Cli::try_parse_from(["gpa-ledger", "add", "A", "9"]).is_err());
        // Adding requires a grade
        assert!(Cli::try_parse_from(["gpa-ledger", "add"]).is_err());
    }

    #[test]
    fn test_add_and_remove_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::resolve(Some(dir.path().join("gpa.db")), None);

        run_add(&config, Grade::A, CreditHours::new(3).unwrap()).unwrap();
        run_add(&config, Grade::B, CreditHours::new(4).unwrap()).unwrap();

        let store = open_store(&config).unwrap();
        let gpa = load_ledger(&store).compute_average().unwrap();
        assert!((gpa - 24.0 / 7.0).abs() < 1e-12);
        drop(store);

        run_remove(&config, 0).unwrap();
        assert!(run_remove(&config, 5).is_err());

        let store = open_store(&config).unwrap();
        let ledger = load_ledger(&store);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(0).unwrap().grade(), 3.0);
    }

    #[test]
    fn test_theme_command_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::resolve(Some(dir.path().join("gpa.db")), None);

        run_theme(&config, Some(ThemeAction::Toggle)).unwrap();
        assert_eq!(load_theme(&open_store(&config).unwrap()), Theme::Light);

        run_theme(&config, Some(ThemeAction::Dark)).unwrap();
        assert_eq!(load_theme(&open_store(&config).unwrap()), Theme::Dark);
    }
}
