//! Plain-text rendering of the expense list and the category chart.

use expense_core::CategoryTotals;
use expense_domain::{Record, DATE_FORMAT};

const BAR_GLYPH: char = '#';
pub const DEFAULT_BAR_WIDTH: usize = 30;

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub struct TableColumn {
    pub header: &'static str,
    pub alignment: Alignment,
}

impl TableColumn {
    pub const fn new(header: &'static str, alignment: Alignment) -> Self {
        Self { header, alignment }
    }
}

pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| visible_width(cell))
                    .fold(visible_width(column.header), usize::max)
            })
            .collect()
    }

    fn render_row(&self, cells: &[&str], widths: &[usize]) -> String {
        self.columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (column, width))| {
                let text = cells.get(idx).copied().unwrap_or("");
                let pad = width.saturating_sub(visible_width(text));
                match column.alignment {
                    Alignment::Left => format!("{}{}", text, " ".repeat(pad)),
                    Alignment::Right => format!("{}{}", " ".repeat(pad), text),
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<&str> = self.columns.iter().map(|column| column.header).collect();
        let mut lines = vec![self.render_row(&header, &widths)];
        let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        lines.push("-".repeat(rule_width));
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            lines.push(self.render_row(&cells, &widths));
        }
        lines.join("\n")
    }
}

fn visible_width(text: &str) -> usize {
    text.chars().count()
}

pub fn format_amount(currency: &str, value: f64) -> String {
    format!("{currency}{value:.2}")
}

/// One row per record: id, amount, category, date, note (`-` when empty).
pub fn expense_table(records: &[&Record], currency: &str) -> String {
    let mut table = Table::new(vec![
        TableColumn::new("ID", Alignment::Left),
        TableColumn::new("Amount", Alignment::Right),
        TableColumn::new("Category", Alignment::Left),
        TableColumn::new("Date", Alignment::Left),
        TableColumn::new("Note", Alignment::Left),
    ]);
    for record in records {
        let note = if record.note.is_empty() {
            "-".to_string()
        } else {
            record.note.clone()
        };
        table.push_row(vec![
            record.id.to_string(),
            format_amount(currency, record.amount.value()),
            record.category.to_string(),
            record.date.format(DATE_FORMAT).to_string(),
            note,
        ]);
    }
    table.render()
}

/// Text stand-in for the pie chart: each category's total, share and a bar.
pub fn totals_chart(totals: &CategoryTotals, currency: &str, bar_width: usize) -> String {
    let mut table = Table::new(vec![
        TableColumn::new("Category", Alignment::Left),
        TableColumn::new("Total", Alignment::Right),
        TableColumn::new("Share", Alignment::Right),
        TableColumn::new("", Alignment::Left),
    ]);
    let amounts = totals.iter();
    for ((category, amount), (_, share)) in amounts.zip(totals.shares()) {
        let filled = (share * bar_width as f64).round() as usize;
        table.push_row(vec![
            category.to_string(),
            format_amount(currency, amount),
            format!("{:.1}%", share * 100.0),
            BAR_GLYPH.to_string().repeat(filled),
        ]);
    }

    let mut out = table.render();
    out.push_str(&format!(
        "\nTotal: {}",
        format_amount(currency, totals.grand_total())
    ));
    let excluded = totals.excluded();
    if excluded.count > 0 {
        out.push_str(&format!(
            "\nNot charted: {} across {} expense(s) with unknown categories",
            format_amount(currency, excluded.amount),
            excluded.count
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use expense_core::totals_by_category;
    use expense_domain::{chrono::NaiveDate, Amount, Category, CategoryLabel};

    fn record(amount: f64, category: Category, note: &str) -> Record {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        Record::new(Amount::new(amount).unwrap(), category, date, note)
    }

    #[test]
    fn expense_table_aligns_columns_and_marks_empty_notes() {
        let lunch = record(50.0, Category::Food, "lunch");
        let bus = record(3.5, Category::Travel, "");
        let rendered = expense_table(&[&lunch, &bus], "$");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[2].contains("$50.00"));
        assert!(lines[2].contains("2024-01-02"));
        assert!(lines[3].ends_with('-'));
        let amount_end = |line: &str, needle: &str| line.find(needle).map(|i| i + needle.len());
        assert_eq!(amount_end(lines[2], "$50.00"), amount_end(lines[3], "$3.50"));
    }

    #[test]
    fn chart_lists_every_category_with_bars() {
        let records = vec![
            record(75.0, Category::Food, ""),
            record(25.0, Category::Bills, ""),
        ];
        let chart = totals_chart(&totals_by_category(&records), "", 20);

        assert!(chart.contains("75.0%"));
        assert!(chart.contains(&"#".repeat(15)));
        assert!(chart.contains("Total: 100.00"));
        for category in Category::ALL {
            assert!(chart.contains(category.as_str()), "missing {category}");
        }
        assert!(!chart.contains("Not charted"));
    }

    #[test]
    fn chart_mentions_unknown_category_spending() {
        let mut stray = record(4.0, Category::Others, "");
        stray.category = CategoryLabel::Unknown("Pets".into());
        let chart = totals_chart(&totals_by_category(&[stray]), "", 10);

        assert!(chart.contains("Total: 0.00"));
        assert!(chart.contains("Not charted: 4.00 across 1 expense(s)"));
    }
}
