use anyhow::Result;
use colored::Colorize;
use scopegate_auth::Scope;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

pub fn print_scope(scope: &Scope, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(scope)?),
        OutputFormat::Table => println!("{}", scopes_table(std::slice::from_ref(scope))),
    }
    Ok(())
}

pub fn print_scopes(scopes: &[Scope], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(scopes)?),
        OutputFormat::Table => {
            if scopes.is_empty() {
                println!("No scopes found.");
            } else {
                println!("{}", scopes_table(scopes));
            }
        }
    }
    Ok(())
}

/// Prints one page of a scope listing along with the stored total.
pub fn print_scope_page(
    scopes: &[Scope],
    total: i64,
    offset: i64,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&scope_page_json(scopes, total, offset))?
        ),
        OutputFormat::Table => {
            if scopes.is_empty() {
                println!("No scopes found.");
            } else {
                println!("{}", scopes_table(scopes));
            }
            println!("{}", page_summary(scopes.len(), total, offset));
        }
    }
    Ok(())
}

fn scope_page_json(scopes: &[Scope], total: i64, offset: i64) -> serde_json::Value {
    serde_json::json!({
        "total": total,
        "offset": offset,
        "scopes": scopes,
    })
}

fn page_summary(shown: usize, total: i64, offset: i64) -> String {
    if shown == 0 {
        return format!("Total: {total}");
    }
    let first = offset + 1;
    let last = offset + shown as i64;
    format!("Showing {first}-{last} of {total}")
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

fn scopes_table(scopes: &[Scope]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Description"]);
    for scope in scopes {
        builder.push_record([scope.id.as_str(), scope.description.as_str()]);
    }
    builder.build().with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopes_table_contains_rows() {
        let table = scopes_table(&[
            Scope::new("read", "Read access"),
            Scope::new("write", "Write access"),
        ]);
        assert!(table.contains("ID"));
        assert!(table.contains("Description"));
        assert!(table.contains("read"));
        assert!(table.contains("Write access"));
    }

    #[test]
    fn test_page_summary_uses_stored_total() {
        assert_eq!(page_summary(2, 57, 0), "Showing 1-2 of 57");
        assert_eq!(page_summary(7, 57, 50), "Showing 51-57 of 57");
        assert_eq!(page_summary(0, 57, 100), "Total: 57");
    }

    #[test]
    fn test_scope_page_json() {
        let value = scope_page_json(&[Scope::new("read", "Read access")], 3, 0);
        assert_eq!(value["total"], 3);
        assert_eq!(value["offset"], 0);
        assert_eq!(value["scopes"][0]["id"], "read");
        assert_eq!(value["scopes"].as_array().map(Vec::len), Some(1));
    }
}
