//! Budget CLI commands
//!
//! Every command names the budget document it works on. Documents are
//! loaded, edited through [`BudgetEditor`], and written back atomically.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;
use rust_decimal::Decimal;

use crate::config::settings::Settings;
use crate::display::{format_budget, format_budget_list};
use crate::error::{BudgetError, BudgetResult};
use crate::export::{export_budget, import_budget, ExportFormat};
use crate::locale::LocaleContext;
use crate::models::{Budget, GroupKind};
use crate::services::budget::{list_names, BudgetEditor};
use crate::storage::{load_budget, save_budget};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a new budget document
    New {
        /// Path of the budget file to create
        file: PathBuf,
        /// Name for the budget (defaults to <year>-<id>)
        #[arg(short, long)]
        name: Option<String>,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show a budget and its statistics
    Show {
        file: PathBuf,
    },

    /// Append a line item
    Add {
        file: PathBuf,
        /// expense or income
        kind: GroupKind,
        name: String,
        /// Amount in your locale's number format
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Change a line item's name or value
    Set {
        file: PathBuf,
        kind: GroupKind,
        id: i64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, allow_hyphen_values = true)]
        value: Option<String>,
    },

    /// Apply an arithmetic step (add, sub, mul, div) to an item's value
    Adjust {
        file: PathBuf,
        kind: GroupKind,
        id: i64,
        operation: String,
        #[arg(allow_hyphen_values = true)]
        delta: String,
    },

    /// Delete a line item
    #[command(alias = "rm")]
    Remove {
        file: PathBuf,
        kind: GroupKind,
        id: i64,
    },

    /// Set the goal percentage ("auto" to fit available funds, "none" to clear)
    Goal {
        file: PathBuf,
        value: String,
    },

    /// Set the reserves amount
    Reserves {
        file: PathBuf,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Rename a budget
    Rename {
        file: PathBuf,
        name: String,
    },

    /// Build a budget document from a CSV, JSON or YAML export
    Import {
        /// Export to read; `.json`, `.yaml` and `.yml` are read as such,
        /// anything else as CSV with a type,name,value header
        source: PathBuf,
        /// Budget file to write
        file: PathBuf,
        /// Name for the budget (CSV defaults to the file name, JSON and
        /// YAML keep the exported name)
        #[arg(short, long)]
        name: Option<String>,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Export a budget as CSV, JSON or YAML
    Export {
        file: PathBuf,
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List the names and ids of budget documents
    #[command(alias = "ls")]
    List {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Parse a locale-formatted amount, failing on text that is not a number
fn parse_amount(locale: &LocaleContext, text: &str) -> BudgetResult<Decimal> {
    locale
        .parse_number(text)
        .ok_or_else(|| BudgetError::InvalidNumber(text.to_string()))
}

fn ensure_writable(path: &Path, force: bool) -> BudgetResult<()> {
    if path.exists() && !force {
        return Err(BudgetError::Validation(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Ok(())
}

/// Load `file`, run `edit` on it, and save it back
fn edit_budget<F>(file: &Path, edit: F) -> BudgetResult<Budget>
where
    F: FnOnce(&mut BudgetEditor<'_>) -> BudgetResult<()>,
{
    let mut budget = load_budget(file)?;
    edit(&mut BudgetEditor::new(&mut budget))?;
    save_budget(file, &budget)?;
    Ok(budget)
}

fn format_value(locale: &LocaleContext, value: Option<Decimal>) -> String {
    value
        .map(|v| locale.format(v))
        .unwrap_or_else(|| "(not a number)".to_string())
}

/// Handle a budget command
pub fn handle_budget_command(
    settings: &Settings,
    locale: &LocaleContext,
    cmd: BudgetCommands,
) -> BudgetResult<()> {
    match cmd {
        BudgetCommands::New { file, name, force } => {
            ensure_writable(&file, force)?;

            let mut budget = Budget::create_new();
            {
                let mut editor = BudgetEditor::new(&mut budget);
                if let Some(name) = name {
                    editor.rename(name)?;
                }
                editor.set_goal(Some(settings.default_goal));
            }
            save_budget(&file, &budget)?;

            println!("Created budget: {}", budget.name);
            println!("  ID:   {}", budget.id);
            println!("  File: {}", file.display());
        }

        BudgetCommands::Show { file } => {
            let budget = load_budget(&file)?;
            print!("{}", format_budget(&budget, locale));
        }

        BudgetCommands::Add {
            file,
            kind,
            name,
            value,
        } => {
            let value = locale.parse_number(&value);
            let mut added = None;
            edit_budget(&file, |editor| {
                added = Some(editor.add_item(kind, name, value));
                Ok(())
            })?;

            if let Some(item) = added {
                println!(
                    "Added {} #{}: {} ({})",
                    kind,
                    item.id,
                    item.name,
                    format_value(locale, item.value)
                );
            }
        }

        BudgetCommands::Set {
            file,
            kind,
            id,
            name,
            value,
        } => {
            if name.is_none() && value.is_none() {
                return Err(BudgetError::Validation(
                    "Nothing to change: pass --name and/or --value".into(),
                ));
            }
            let value = value.map(|v| locale.parse_number(&v));
            let mut updated = None;
            edit_budget(&file, |editor| {
                updated = Some(editor.update_item(kind, id, name, value)?);
                Ok(())
            })?;

            if let Some(item) = updated {
                println!(
                    "Updated {} #{}: {} ({})",
                    kind,
                    item.id,
                    item.name,
                    format_value(locale, item.value)
                );
            }
        }

        BudgetCommands::Adjust {
            file,
            kind,
            id,
            operation,
            delta,
        } => {
            let delta = locale.parse_number(&delta);
            let mut updated = None;
            edit_budget(&file, |editor| {
                updated = Some(editor.adjust_item(kind, id, delta, &operation)?);
                Ok(())
            })?;

            if let Some(item) = updated {
                println!(
                    "{} #{} is now {}",
                    item.name,
                    item.id,
                    format_value(locale, item.value)
                );
            }
        }

        BudgetCommands::Remove { file, kind, id } => {
            let mut removed = None;
            edit_budget(&file, |editor| {
                removed = Some(editor.remove_item(kind, id)?);
                Ok(())
            })?;

            if let Some(item) = removed {
                println!("Removed {} #{}: {}", kind, item.id, item.name);
            }
        }

        BudgetCommands::Goal { file, value } => {
            let budget = match value.trim().to_lowercase().as_str() {
                "auto" => edit_budget(&file, |editor| {
                    editor.apply_auto_goal();
                    Ok(())
                })?,
                "none" => edit_budget(&file, |editor| {
                    editor.set_goal(None);
                    Ok(())
                })?,
                _ => {
                    let goal = parse_amount(locale, &value)?;
                    edit_budget(&file, |editor| {
                        editor.set_goal(Some(goal));
                        Ok(())
                    })?
                }
            };

            match budget.stats.goal {
                Some(goal) => println!("Goal set to {}%", goal.normalize()),
                None => println!("Goal cleared"),
            }
            println!("  Saved:     {}", locale.format(budget.stats.saved));
            println!("  With goal: {}", locale.format(budget.stats.with_goal));
        }

        BudgetCommands::Reserves { file, value } => {
            let reserves = parse_amount(locale, &value)?;
            edit_budget(&file, |editor| {
                editor.set_reserves(reserves);
                Ok(())
            })?;
            println!("Reserves set to {}", locale.format(reserves));
        }

        BudgetCommands::Rename { file, name } => {
            let budget = edit_budget(&file, |editor| editor.rename(name))?;
            println!("Renamed budget to: {}", budget.name);
        }

        BudgetCommands::Import {
            source,
            file,
            name,
            force,
        } => {
            ensure_writable(&file, force)?;

            let format = ExportFormat::from_path(&source).unwrap_or(ExportFormat::Csv);
            let csv_name = name.clone().unwrap_or_else(|| {
                source
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "imported".to_string())
            });
            let reader = File::open(&source)
                .map_err(|e| BudgetError::Import(format!("{}: {}", source.display(), e)))?;
            let mut budget = import_budget(reader, format, csv_name)?;

            if format != ExportFormat::Csv {
                if let Some(name) = name {
                    BudgetEditor::new(&mut budget).rename(name)?;
                }
            }
            save_budget(&file, &budget)?;

            println!("Imported budget: {}", budget.name);
            println!("  Expenses: {}", budget.expenses.len());
            println!("  Incomes:  {}", budget.incomes.len());
            println!("  File:     {}", file.display());
        }

        BudgetCommands::Export {
            file,
            format,
            output,
            pretty,
        } => {
            let budget = load_budget(&file)?;

            match output {
                Some(path) => {
                    let out = File::create(&path).map_err(|e| {
                        BudgetError::Export(format!("{}: {}", path.display(), e))
                    })?;
                    let mut writer = BufWriter::new(out);
                    export_budget(&budget, format, &mut writer, pretty)?;
                    writer.flush().map_err(|e| BudgetError::Export(e.to_string()))?;
                    println!("Exported {} as {} to {}", budget.name, format, path.display());
                }
                None => {
                    let stdout = io::stdout();
                    let mut handle = stdout.lock();
                    export_budget(&budget, format, &mut handle, pretty)?;
                }
            }
        }

        BudgetCommands::List { files } => {
            let budgets = files
                .iter()
                .map(load_budget)
                .collect::<BudgetResult<Vec<_>>>()?;
            println!("{}", format_budget_list(&list_names(&budgets)).trim_end());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn run(cmd: BudgetCommands) -> BudgetResult<()> {
        handle_budget_command(&Settings::default(), &LocaleContext::default(), cmd)
    }

    #[test]
    fn test_new_applies_default_goal() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("b.json");
        let settings = Settings {
            default_goal: dec!(25),
            ..Settings::default()
        };

        handle_budget_command(
            &settings,
            &LocaleContext::default(),
            BudgetCommands::New {
                file: file.clone(),
                name: Some("Home".into()),
                force: false,
            },
        )
        .unwrap();

        let budget = load_budget(&file).unwrap();
        assert_eq!(budget.name, "Home");
        assert_eq!(budget.stats.goal, Some(dec!(25)));
    }

    #[test]
    fn test_new_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("b.json");
        std::fs::write(&file, "{}").unwrap();

        let err = run(BudgetCommands::New {
            file,
            name: None,
            force: false,
        })
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_edit_commands() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("b.json");
        run(BudgetCommands::New {
            file: file.clone(),
            name: None,
            force: false,
        })
        .unwrap();

        run(BudgetCommands::Add {
            file: file.clone(),
            kind: GroupKind::Income,
            name: "Salary".into(),
            value: "2,000.50".into(),
        })
        .unwrap();
        run(BudgetCommands::Set {
            file: file.clone(),
            kind: GroupKind::Expense,
            id: 1,
            name: Some("Rent".into()),
            value: Some("800".into()),
        })
        .unwrap();
        run(BudgetCommands::Adjust {
            file: file.clone(),
            kind: GroupKind::Expense,
            id: 1,
            operation: "add".into(),
            delta: "100".into(),
        })
        .unwrap();
        run(BudgetCommands::Reserves {
            file: file.clone(),
            value: "500".into(),
        })
        .unwrap();

        let budget = load_budget(&file).unwrap();
        assert_eq!(budget.incomes.total, dec!(2000.5));
        assert_eq!(budget.expenses.items[0].value, Some(dec!(900)));
        assert_eq!(budget.stats.available, dec!(1100.5));
        assert_eq!(budget.stats.reserves, dec!(500));
    }

    #[test]
    fn test_goal_command() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("b.json");
        run(BudgetCommands::New {
            file: file.clone(),
            name: None,
            force: false,
        })
        .unwrap();

        run(BudgetCommands::Goal {
            file: file.clone(),
            value: "none".into(),
        })
        .unwrap();
        assert_eq!(load_budget(&file).unwrap().stats.goal, None);

        let err = run(BudgetCommands::Goal {
            file: file.clone(),
            value: "lots".into(),
        })
        .unwrap_err();
        assert!(matches!(err, BudgetError::InvalidNumber(_)));
    }

    #[test]
    fn test_unknown_operation_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("b.json");
        run(BudgetCommands::New {
            file: file.clone(),
            name: None,
            force: false,
        })
        .unwrap();
        let before = std::fs::read_to_string(&file).unwrap();

        let err = run(BudgetCommands::Adjust {
            file: file.clone(),
            kind: GroupKind::Expense,
            id: 1,
            operation: "pow".into(),
            delta: "2".into(),
        })
        .unwrap_err();

        assert!(err.is_unsupported_operation());
        assert_eq!(std::fs::read_to_string(&file).unwrap(), before);
    }

    #[test]
    fn test_import_and_export() {
        let temp_dir = TempDir::new().unwrap();
        let csv_path = temp_dir.path().join("march.csv");
        let file = temp_dir.path().join("march.json");
        let out = temp_dir.path().join("out.csv");
        let csv = "type,name,value\nexpense,Rent,950\nincome,Salary,2500\ngoal,goal,15\nreserves,reserves,100";
        std::fs::write(&csv_path, csv).unwrap();

        run(BudgetCommands::Import {
            source: csv_path,
            file: file.clone(),
            name: None,
            force: false,
        })
        .unwrap();

        let budget = load_budget(&file).unwrap();
        assert_eq!(budget.name, "march");
        assert_eq!(budget.stats.saved, dec!(375));

        run(BudgetCommands::Export {
            file,
            format: ExportFormat::Csv,
            output: Some(out.clone()),
            pretty: false,
        })
        .unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), format!("{}\n", csv));
    }

    #[test]
    fn test_import_from_json_export() {
        let temp_dir = TempDir::new().unwrap();
        let original = temp_dir.path().join("b.json");
        let exported = temp_dir.path().join("backup.json");
        let restored = temp_dir.path().join("restored.json");

        run(BudgetCommands::New {
            file: original.clone(),
            name: Some("Household".to_string()),
            force: false,
        })
        .unwrap();
        edit_budget(&original, |editor| {
            editor.add_item(GroupKind::Income, "Salary", Some(dec!(2500)));
            Ok(())
        })
        .unwrap();

        run(BudgetCommands::Export {
            file: original.clone(),
            format: ExportFormat::Json,
            output: Some(exported.clone()),
            pretty: true,
        })
        .unwrap();

        run(BudgetCommands::Import {
            source: exported,
            file: restored.clone(),
            name: None,
            force: false,
        })
        .unwrap();

        let before = load_budget(&original).unwrap();
        let after = load_budget(&restored).unwrap();
        assert_eq!(after, before);
        assert_eq!(after.name, "Household");
    }

    #[test]
    fn test_import_yaml_with_new_name() {
        let temp_dir = TempDir::new().unwrap();
        let original = temp_dir.path().join("b.json");
        let exported = temp_dir.path().join("backup.yml");
        let restored = temp_dir.path().join("restored.json");

        run(BudgetCommands::New {
            file: original.clone(),
            name: Some("Household".to_string()),
            force: false,
        })
        .unwrap();
        run(BudgetCommands::Export {
            file: original.clone(),
            format: ExportFormat::Yaml,
            output: Some(exported.clone()),
            pretty: false,
        })
        .unwrap();

        run(BudgetCommands::Import {
            source: exported,
            file: restored.clone(),
            name: Some("Copy".to_string()),
            force: false,
        })
        .unwrap();

        let after = load_budget(&restored).unwrap();
        assert_eq!(after.name, "Copy");
        assert_eq!(after.id, load_budget(&original).unwrap().id);
        assert_eq!(after.stats.goal, Some(dec!(10)));
    }
}
