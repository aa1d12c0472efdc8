//! Categories command implementation.

use crate::cli::CategoriesArgs;
use crate::config::{parse_coverage_list, Config};
use crate::error::Result;
use crate::output::Formatter;
use claimscan_scanner::CategoryRegistry;

/// Execute the categories command.
pub fn execute_categories(args: CategoriesArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let registry = CategoryRegistry::builtin_with(config.extra_specs()?)?;
    let purchased = parse_coverage_list(&args.coverage)?;

    println!("{}", formatter.format_categories(registry.specs(), &purchased)?);

    let active = registry.active_specs(&purchased);
    if active.is_empty() {
        println!("{}", formatter.warning("Every category is suppressed; nothing would be checked"));
    }

    Ok(())
}
