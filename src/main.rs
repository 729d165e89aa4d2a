use anyhow::Result;
use clap::{Parser, Subcommand};

use budget_calc::cli::{handle_budget_command, handle_config_command, BudgetCommands, ConfigArgs};
use budget_calc::config::{AppPaths, Settings};
use budget_calc::locale::LocaleContext;
use budget_calc::logging::init_tracing;

#[derive(Parser)]
#[command(
    name = "budget",
    author = "Kaylee Beyene",
    version,
    about = "Personal budget calculator",
    long_about = "budget-calc keeps a budget of expenses and incomes in a JSON file, \
                  works out what is left after a savings goal, and converts budgets \
                  to and from CSV."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Budget(BudgetCommands),

    /// Show current configuration, or update it
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let paths = AppPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Budget(cmd)) => {
            let locale = LocaleContext::detect(&settings);
            handle_budget_command(&settings, &locale, cmd)?;
        }
        Some(Commands::Config(args)) => {
            handle_config_command(&paths, &mut settings, args)?;
        }
        None => {
            println!("budget-calc - personal budget calculator");
            println!();
            println!("Run 'budget new <file>' to start a budget.");
            println!("Run 'budget --help' for usage information.");
        }
    }

    Ok(())
}
