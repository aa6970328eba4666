use std::path::PathBuf;
use tablesort_core::config::SorterConfig;

use crate::output;

pub fn run(
    input_file: PathBuf,
    config: &SorterConfig,
    output_format: &str,
) -> Result<(), tablesort_core::error::TableSortError> {
    let html = std::fs::read_to_string(&input_file)?;
    let listing = tablesort_core::list_tables(&html, config)?;

    match output_format {
        "json" => output::json::print(&listing)?,
        _ => output::table::print_tables(&listing),
    }

    Ok(())
}
