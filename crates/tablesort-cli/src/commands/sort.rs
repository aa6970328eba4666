use std::path::PathBuf;
use tablesort_core::config::SorterConfig;
use tablesort_core::error::TableSortError;
use tablesort_core::state::TableId;
use tablesort_core::SortOptions;

pub fn run(
    input_file: PathBuf,
    table: &str,
    activations: &[usize],
    config: &SorterConfig,
    output_file: Option<PathBuf>,
    keep_controls: bool,
) -> Result<(), TableSortError> {
    let table: TableId = table.parse().map_err(TableSortError::TableNotFound)?;
    let html = std::fs::read_to_string(&input_file)?;

    let sorted = tablesort_core::sort_html(
        &html,
        table,
        activations,
        config,
        &SortOptions { keep_controls },
    )?;

    match output_file {
        Some(path) => {
            std::fs::write(&path, &sorted.html)?;
            eprintln!(
                "Sorted {} by {}, written to {}",
                sorted.table,
                sorted.state,
                path.display()
            );
            if let Some(reorder) = sorted.reorder {
                if reorder.dropped > 0 {
                    eprintln!(
                        "  {} row(s) without a cell in the sorted column were dropped",
                        reorder.dropped
                    );
                }
            }
        }
        None => {
            println!("{}", sorted.html);
        }
    }

    Ok(())
}
