use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

use crate::http::types::reason_phrase;
use crate::report::BatchSummary;
use crate::workload::{BatchResult, Response, ResponseObject};

/// 表格中显示的响应体最大长度
const BODY_PREVIEW: usize = 60;

pub struct BatchReporter {
    verbose: bool,
}

impl BatchReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn print(&self, source: &str, result: &BatchResult) {
        if let Some(err) = &result.err {
            println!(
                "{}: {} ({})",
                "Error".red().bold(),
                err,
                result.code.unwrap_or_default()
            );
            return;
        }

        println!(
            "\nRan {} requests from {}\n",
            result.responses.len(),
            source.bold()
        );
        println!("{}", self.table(result));

        if self.verbose {
            for response in &result.responses {
                self.print_details(response);
            }
        }

        self.print_summary(&BatchSummary::from_result(result));
    }

    pub fn table(&self, result: &BatchResult) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["#", "ID", "Code", "Status", "Body"]);

        for (index, response) in result.responses.iter().enumerate() {
            let color = if !response.is_complete() {
                Color::Yellow
            } else if response.is_success() {
                Color::Green
            } else {
                Color::Red
            };

            table.add_row(vec![
                Cell::new(index + 1),
                Cell::new(&response.id),
                Cell::new(response.code).fg(color),
                Cell::new(reason_phrase(response.code)).fg(color),
                Cell::new(preview(&response.body)).add_attribute(Attribute::Dim),
            ]);
        }

        table
    }

    fn print_details(&self, response: &Response) {
        println!("\n{} {}", "▸".cyan(), response.id.bold());
        for (key, value) in response.headers.iter() {
            let value = value.to_str().unwrap_or("<invalid utf-8>");
            println!("   {}", format!("{}: {}", key, value).blue());
        }

        let body = match &response.object {
            ResponseObject::Decoded(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| response.body.clone())
            }
            ResponseObject::DecodeError(message) => {
                println!("   {}: {}", "Decode error".yellow(), message);
                response.body.clone()
            }
            ResponseObject::Raw => response.body.clone(),
        };
        for line in body.lines() {
            println!("   {}", line);
        }
    }

    pub fn print_summary(&self, summary: &BatchSummary) {
        println!("\n{}", "━".repeat(50));
        println!("{}", "Summary".bold());
        println!("{}", "━".repeat(50));

        if summary.incomplete > 0 {
            println!(
                "  {}: {} succeeded, {} failed, {} incomplete, {} total",
                "Requests".bold(),
                summary.succeeded.to_string().green(),
                summary.failed.to_string().red(),
                summary.incomplete.to_string().yellow(),
                summary.total
            );
        } else {
            println!(
                "  {}: {} succeeded, {} failed, {} total",
                "Requests".bold(),
                summary.succeeded.to_string().green(),
                summary.failed.to_string().red(),
                summary.total
            );
        }
        println!();
    }
}

impl Default for BatchReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

fn preview(body: &str) -> String {
    let flat = body.replace(['\n', '\r'], " ");
    if flat.chars().count() <= BODY_PREVIEW {
        flat
    } else {
        let cut: String = flat.chars().take(BODY_PREVIEW).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_bodies() {
        let long = "x".repeat(200);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), BODY_PREVIEW + 1);
        assert!(shown.ends_with('…'));
        assert_eq!(preview("a\nb"), "a b");
    }

    #[test]
    fn test_table_has_one_row_per_response() {
        let result = BatchResult::new(vec![
            Response::failure("first", 200, "{}"),
            Response::pending("second"),
        ]);
        let rendered = BatchReporter::default().table(&result).to_string();
        assert!(rendered.contains("first"));
        assert!(rendered.contains("second"));
        assert!(rendered.contains("Incomplete"));
    }
}
