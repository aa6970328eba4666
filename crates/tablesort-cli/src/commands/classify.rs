use serde::Serialize;
use tablesort_core::Value;

use crate::output;

/// One classified input, as printed.
#[derive(Serialize)]
pub struct Classified {
    pub text: String,
    #[serde(flatten)]
    pub value: Value,
}

pub fn run(texts: &[String], output_format: &str) -> Result<(), tablesort_core::error::TableSortError> {
    let results: Vec<Classified> = texts
        .iter()
        .map(|text| Classified {
            text: text.clone(),
            value: tablesort_core::classify(text),
        })
        .collect();

    match output_format {
        "json" => output::json::print(&results)?,
        _ => output::table::print_classified(&results),
    }

    Ok(())
}
