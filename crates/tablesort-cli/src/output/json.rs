use serde::Serialize;
use tablesort_core::error::TableSortError;

pub fn print<T: Serialize + ?Sized>(result: &T) -> Result<(), TableSortError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
