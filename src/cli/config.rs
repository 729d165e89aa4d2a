//! Config CLI command
//!
//! Shows where settings live and how the locale resolved, and updates
//! settings when options are given.

use clap::Args;

use crate::config::{AppPaths, Settings};
use crate::error::{BudgetError, BudgetResult};
use crate::locale::{parse_decimal, LocaleContext};

/// Options for `config`; with none given the current configuration is shown
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Locale tag for number formatting, e.g. de-DE ("auto" to detect)
    #[arg(long)]
    pub locale: Option<String>,

    /// ISO 4217 currency code, e.g. EUR ("auto" to follow the locale)
    #[arg(long)]
    pub currency: Option<String>,

    /// Goal percentage for budgets created with `new`
    #[arg(long)]
    pub default_goal: Option<String>,
}

impl ConfigArgs {
    fn is_empty(&self) -> bool {
        self.locale.is_none() && self.currency.is_none() && self.default_goal.is_none()
    }
}

fn auto_or(value: String) -> Option<String> {
    if value.trim().eq_ignore_ascii_case("auto") {
        None
    } else {
        Some(value.trim().to_string())
    }
}

/// Apply `args` to `settings`; returns whether anything changed
pub fn apply_config_args(settings: &mut Settings, args: ConfigArgs) -> BudgetResult<bool> {
    if args.is_empty() {
        return Ok(false);
    }

    if let Some(locale) = args.locale {
        settings.locale = auto_or(locale);
    }
    if let Some(currency) = args.currency {
        settings.currency_code = auto_or(currency).map(|c| c.to_uppercase());
    }
    if let Some(goal) = args.default_goal {
        // Stored settings are locale-neutral
        settings.default_goal =
            parse_decimal(&goal).ok_or_else(|| BudgetError::InvalidNumber(goal.clone()))?;
    }

    Ok(true)
}

/// Handle the config command
pub fn handle_config_command(
    paths: &AppPaths,
    settings: &mut Settings,
    args: ConfigArgs,
) -> BudgetResult<()> {
    if apply_config_args(settings, args)? {
        settings.save(paths)?;
        tracing::info!(path = %paths.settings_file().display(), "saved settings");
        println!("Settings saved.");
        println!();
    }

    let locale = LocaleContext::detect(settings);

    println!("budget-calc Configuration");
    println!("=========================");
    println!("Config directory: {}", paths.base_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!();
    println!("Settings:");
    println!(
        "  Locale:       {}",
        settings.locale.as_deref().unwrap_or("(auto)")
    );
    println!(
        "  Currency:     {}",
        settings.currency_code.as_deref().unwrap_or("(auto)")
    );
    println!("  Default goal: {}%", settings.default_goal.normalize());
    println!();
    println!("Resolved:");
    println!("  Locale:   {}", locale.tag);
    println!("  Country:  {}", locale.country_code);
    println!("  Currency: {}", locale.currency_code);
    println!("  Example:  {}", locale.format(rust_decimal::Decimal::new(123450, 2)));

    Ok(())
}
