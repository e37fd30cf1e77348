//! Plain-text inventory report.

use std::fmt::Write;

use chrono::NaiveDateTime;

use stockscan_store::{LedgerSummary, LocationTotal, TopItem};

/// Number of items listed in the top-items section.
pub const TOP_ITEMS: i64 = 20;

const DESCRIPTION_WIDTH: usize = 40;

/// Everything the report shows.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub generated_at: NaiveDateTime,
    pub summary: LedgerSummary,
    pub locations: Vec<LocationTotal>,
    pub top_items: Vec<TopItem>,
}

pub fn render_report(data: &ReportData) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, data);
    out
}

fn write_report(out: &mut String, data: &ReportData) -> std::fmt::Result {
    writeln!(out, "INVENTORY SUMMARY REPORT")?;
    writeln!(out, "Generated: {}", data.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "{}\n", "=".repeat(60))?;

    writeln!(out, "Total Unique Items: {}", data.summary.unique_items)?;
    writeln!(out, "Total Locations: {}", data.summary.locations)?;
    writeln!(out, "Total Quantity in Stock: {}\n", data.summary.total_quantity)?;

    writeln!(out, "INVENTORY BY LOCATION")?;
    writeln!(out, "{}", "-".repeat(60))?;
    for location in &data.locations {
        writeln!(out, "\n{}:", location.name)?;
        writeln!(out, "  Unique Items: {}", location.unique_items)?;
        writeln!(out, "  Total Quantity: {}", location.total_quantity)?;
    }

    writeln!(out, "\n\nTOP {TOP_ITEMS} ITEMS BY QUANTITY")?;
    writeln!(out, "{}", "-".repeat(60))?;
    for item in &data.top_items {
        let description = if item.description.is_empty() {
            "No description".to_string()
        } else {
            item.description.chars().take(DESCRIPTION_WIDTH).collect()
        };
        writeln!(out, "{}: {} - Qty: {}", item.item_code, description, item.total_quantity)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use stockscan_core::ItemCode;

    fn test_data() -> ReportData {
        ReportData {
            generated_at: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            summary: LedgerSummary {
                unique_items: 2,
                locations: 2,
                total_quantity: 7,
            },
            locations: vec![
                LocationTotal {
                    name: "Annex".to_string(),
                    unique_items: 0,
                    total_quantity: 0,
                },
                LocationTotal {
                    name: "Back room".to_string(),
                    unique_items: 2,
                    total_quantity: 7,
                },
            ],
            top_items: vec![
                TopItem {
                    item_code: ItemCode::parse("111").unwrap(),
                    description: "x".repeat(50),
                    total_quantity: 5,
                },
                TopItem {
                    item_code: ItemCode::parse("222").unwrap(),
                    description: String::new(),
                    total_quantity: 2,
                },
            ],
        }
    }

    #[test]
    fn test_report_layout() {
        let text = render_report(&test_data());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "INVENTORY SUMMARY REPORT");
        assert_eq!(lines[1], "Generated: 2024-05-01 09:30:00");
        assert_eq!(lines[2], "=".repeat(60));
        assert!(text.contains("Total Unique Items: 2\nTotal Locations: 2\nTotal Quantity in Stock: 7\n"));
        assert!(text.contains("\nAnnex:\n  Unique Items: 0\n  Total Quantity: 0\n"));
        assert!(text.contains("\n\n\nTOP 20 ITEMS BY QUANTITY\n"));
    }

    #[test]
    fn test_report_truncates_descriptions() {
        let text = render_report(&test_data());
        assert!(text.contains(&format!("111: {} - Qty: 5\n", "x".repeat(40))));
        assert!(text.contains("222: No description - Qty: 2\n"));
    }
}
