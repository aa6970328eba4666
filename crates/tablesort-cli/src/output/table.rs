use tablesort_core::{TableListing, Value};

use crate::commands::classify::Classified;

pub fn print_tables(listing: &TableListing) {
    if listing.tables.is_empty() {
        println!(
            "No sortable tables ({} candidate(s) examined).",
            listing.candidates
        );
        return;
    }

    println!(
        "{} sortable table(s), {} candidate(s) examined\n",
        listing.tables.len(),
        listing.candidates
    );

    for summary in &listing.tables {
        let kind = match summary.role.as_deref() {
            Some(role) => format!("<{} role=\"{}\">", summary.tag, role),
            None => format!("<{}>", summary.tag),
        };
        println!("=== {} {} ===\n", summary.id, kind);
        println!("  Rows: {}", summary.data_rows);
        println!("  State: {}", summary.state);
        println!("  Columns:");

        for (index, label) in summary.columns.iter().enumerate() {
            let label = if label.is_empty() { "(no label)" } else { label };
            println!("    {index:>3}  {label}");
        }
        println!();
    }
}

pub fn print_classified(results: &[Classified]) {
    let max_text = results
        .iter()
        .map(|r| r.text.chars().count())
        .max()
        .unwrap_or(10);

    for result in results {
        let (kind, key) = match &result.value {
            Value::Number(n) => ("number", n.to_string()),
            Value::Text(s) => ("text", format!("\"{s}\"")),
        };
        println!(
            "  {:<width$}  {:<6}  {}",
            result.text,
            kind,
            key,
            width = max_text
        );
    }
}
