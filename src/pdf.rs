use std::io::BufWriter;

use printpdf::*;

use crate::error::{Result, StewardError};
use crate::fmt::money;
use crate::models::{PayrollRow, Transaction};
use crate::reports::{category_summary, status_counts};
use crate::stats::FinancialStats;

// A4 dimensions (mm)
const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN_TOP: f32 = 25.4;
const MARGIN_BOTTOM: f32 = 25.4;
const MARGIN_LEFT: f32 = 19.05;
const MARGIN_RIGHT: f32 = 19.05;
const ROW_H: f32 = 5.0;
const FONT_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 16.0;
const SUBTITLE_SIZE: f32 = 10.0;

fn approx_text_width(text: &str, size: f32) -> f32 {
    text.len() as f32 * size * 0.18
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Col {
    width: f32,
    align: Align,
}

struct PdfWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    current_page: PdfPageIndex,
    current_layer: PdfLayerIndex,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| StewardError::Pdf(format!("{e:?}")))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| StewardError::Pdf(format!("{e:?}")))?;
        Ok(Self {
            doc,
            font,
            font_bold,
            pages: vec![(page, layer)],
            current_page: page,
            current_layer: layer,
            y: MARGIN_TOP,
        })
    }

    fn pdf_y(&self) -> f32 {
        PAGE_H - self.y
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer");
        self.pages.push((page, layer));
        self.current_page = page;
        self.current_layer = layer;
        self.y = MARGIN_TOP;
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.y + needed > PAGE_H - MARGIN_BOTTOM {
            self.new_page();
        }
    }

    fn text(&self, s: &str, x: f32, size: f32, bold: bool) {
        let font = if bold {
            self.font_bold.clone()
        } else {
            self.font.clone()
        };
        let layer = self
            .doc
            .get_page(self.current_page)
            .get_layer(self.current_layer);
        layer.use_text(s, size, Mm(x), Mm(self.pdf_y()), &font);
    }

    fn hline(&self, x1: f32, x2: f32) {
        let layer = self
            .doc
            .get_page(self.current_page)
            .get_layer(self.current_layer);
        layer.set_outline_thickness(0.5);
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(self.pdf_y())), false),
                (Point::new(Mm(x2), Mm(self.pdf_y())), false),
            ],
            is_closed: false,
        };
        layer.add_line(line);
    }

    fn header(&mut self, title: &str, church: &str, subtitle: &str) {
        self.text(title, MARGIN_LEFT, TITLE_SIZE, true);
        self.y += 7.0;
        if !church.is_empty() {
            self.text(church, MARGIN_LEFT, SUBTITLE_SIZE, false);
            self.y += 5.0;
        }
        self.text(subtitle, MARGIN_LEFT, SUBTITLE_SIZE, false);
        self.y += 5.0;
        let ts = chrono::Local::now()
            .format("Generated %Y-%m-%d %H:%M")
            .to_string();
        self.text(&ts, MARGIN_LEFT, 8.0, false);
        self.y += 5.0;
        self.hline(MARGIN_LEFT, PAGE_W - MARGIN_RIGHT);
        self.y += 5.0;
    }

    fn table_header(&mut self, cols: &[Col], headers: &[&str]) {
        self.ensure_space(ROW_H * 2.0);
        let mut x = MARGIN_LEFT;
        for (i, col) in cols.iter().enumerate() {
            if i < headers.len() {
                match col.align {
                    Align::Left => self.text(headers[i], x, FONT_SIZE, true),
                    Align::Right => {
                        let tw = approx_text_width(headers[i], FONT_SIZE);
                        self.text(headers[i], x + col.width - tw, FONT_SIZE, true);
                    }
                }
            }
            x += col.width;
        }
        self.y += ROW_H;
        self.hline(MARGIN_LEFT, PAGE_W - MARGIN_RIGHT);
        self.y += 2.0;
    }

    fn table_row(&mut self, cols: &[Col], values: &[&str], bold: bool) {
        self.ensure_space(ROW_H);
        let mut x = MARGIN_LEFT;
        for (i, col) in cols.iter().enumerate() {
            if i < values.len() {
                match col.align {
                    Align::Left => self.text(values[i], x, FONT_SIZE, bold),
                    Align::Right => {
                        let tw = approx_text_width(values[i], FONT_SIZE);
                        self.text(values[i], x + col.width - tw, FONT_SIZE, bold);
                    }
                }
            }
            x += col.width;
        }
        self.y += ROW_H;
    }

    fn section_label(&mut self, label: &str) {
        self.ensure_space(ROW_H);
        self.text(label, MARGIN_LEFT, FONT_SIZE, true);
        self.y += ROW_H;
    }

    fn blank_row(&mut self) {
        self.y += ROW_H;
    }

    fn separator(&mut self) {
        self.hline(MARGIN_LEFT, PAGE_W - MARGIN_RIGHT);
        self.y += 2.0;
    }

    /// Stamp "Page i of n" in the footer of every page.
    fn number_pages(&self) {
        let total = self.pages.len();
        for (i, (page, layer)) in self.pages.iter().enumerate() {
            let label = format!("Page {} of {}", i + 1, total);
            let layer = self.doc.get_page(*page).get_layer(*layer);
            layer.use_text(
                &label,
                8.0,
                Mm(MARGIN_LEFT),
                Mm(MARGIN_BOTTOM / 2.0),
                &self.font,
            );
        }
    }

    fn to_bytes(self) -> Result<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| StewardError::Pdf(format!("{e:?}")))?;
        buf.into_inner().map_err(|e| StewardError::Pdf(e.to_string()))
    }

    fn to_numbered_bytes(self) -> Result<Vec<u8>> {
        self.number_pages();
        self.to_bytes()
    }
}

// ---------------------------------------------------------------------------
// Render functions
// ---------------------------------------------------------------------------

/// Tabular transaction history over the filtered rows, page-numbered.
pub fn render_history(rows: &[Transaction], church: &str) -> Result<Vec<u8>> {
    let mut pdf = PdfWriter::new("Transaction History")?;
    pdf.header(
        "Transaction History Report",
        church,
        &format!("Total Transactions: {}", rows.len()),
    );

    let cols = &[
        Col { width: 22.0, align: Align::Left },
        Col { width: 35.0, align: Align::Left },
        Col { width: 28.0, align: Align::Right },
        Col { width: 18.0, align: Align::Left },
        Col { width: 28.0, align: Align::Left },
        Col { width: 18.0, align: Align::Left },
        Col { width: 22.9, align: Align::Left },
    ];
    pdf.table_header(
        cols,
        &["Date", "Contributor", "Amount", "Type", "Category", "Status", "Receipt ID"],
    );

    for tx in rows {
        let amount = money(tx.signed_amount());
        let receipt = tx.display_receipt_id();
        pdf.table_row(
            cols,
            &[
                &tx.date,
                &tx.contributor,
                &amount,
                tx.tx_type.as_str(),
                &tx.category,
                tx.status.as_str(),
                &receipt,
            ],
            false,
        );
    }

    pdf.to_numbered_bytes()
}

/// One receipt per page for the selected transactions.
pub fn render_receipts(rows: &[Transaction], church: &str) -> Result<Vec<u8>> {
    let mut pdf = PdfWriter::new("Receipts")?;

    for (index, tx) in rows.iter().enumerate() {
        if index > 0 {
            pdf.new_page();
        }
        pdf.text("OFFICIAL RECEIPT", MARGIN_LEFT, 20.0, true);
        pdf.y += 8.0;
        if !church.is_empty() {
            pdf.text(church, MARGIN_LEFT, SUBTITLE_SIZE, false);
            pdf.y += 5.0;
        }
        let receipt = tx.display_receipt_id();
        pdf.text(&format!("Receipt ID: {receipt}"), MARGIN_LEFT, SUBTITLE_SIZE, false);
        pdf.y += 5.0;
        pdf.text(&format!("Date: {}", tx.date), MARGIN_LEFT, SUBTITLE_SIZE, false);
        pdf.y += 5.0;
        pdf.text(
            &format!("Status: {}", tx.status.as_str()),
            MARGIN_LEFT,
            SUBTITLE_SIZE,
            false,
        );
        pdf.y += 8.0;

        let cols = &[
            Col { width: 70.0, align: Align::Left },
            Col { width: 40.0, align: Align::Left },
            Col { width: 22.0, align: Align::Left },
            Col { width: 39.9, align: Align::Right },
        ];
        pdf.table_header(cols, &["Description", "Category", "Type", "Amount"]);
        let description = tx
            .description
            .clone()
            .unwrap_or_else(|| "General Contribution".to_string());
        let amount = money(tx.amount);
        pdf.table_row(
            cols,
            &[&description, &tx.category, tx.tx_type.as_str(), &amount],
            false,
        );
        pdf.blank_row();
        pdf.text(
            &format!("Received from: {}", tx.contributor),
            MARGIN_LEFT,
            FONT_SIZE,
            false,
        );
        pdf.y += ROW_H;
    }

    pdf.to_bytes()
}

/// Multi-section financial report: summary statistics, category breakdown
/// and status-integrity counts, all over the same filtered subset.
pub fn render_financial_report(
    stats: &FinancialStats,
    rows: &[Transaction],
    period: &str,
    church: &str,
) -> Result<Vec<u8>> {
    let mut pdf = PdfWriter::new("Financial Performance Report")?;
    pdf.header("Financial Performance Report", church, &format!("Period: {period}"));

    let summary_cols = &[
        Col { width: 120.0, align: Align::Left },
        Col { width: 51.9, align: Align::Right },
    ];
    pdf.section_label("Summary");
    pdf.table_header(summary_cols, &["Metric", "Total Value"]);
    let income = money(stats.total_income);
    pdf.table_row(summary_cols, &["Total Income", &income], false);
    let expenditure = money(stats.total_expenditure);
    pdf.table_row(summary_cols, &["Total Expenditure", &expenditure], false);
    let net = money(stats.net_balance);
    pdf.table_row(summary_cols, &["Net Position", &net], true);
    let count = rows.len().to_string();
    pdf.table_row(summary_cols, &["Total Transactions", &count], false);
    pdf.blank_row();

    let breakdown = category_summary(rows);
    if !breakdown.is_empty() {
        let cat_cols = &[
            Col { width: 95.0, align: Align::Left },
            Col { width: 25.0, align: Align::Right },
            Col { width: 51.9, align: Align::Right },
        ];
        pdf.section_label("Breakdown by Category");
        pdf.table_header(cat_cols, &["Category Name", "Volume", "Total Amount"]);
        for item in &breakdown {
            let volume = item.count.to_string();
            let total = money(item.total);
            pdf.table_row(cat_cols, &[&item.name, &volume, &total], false);
        }
        pdf.blank_row();
    }

    let counts = status_counts(rows);
    if !counts.is_empty() {
        let status_cols = &[
            Col { width: 120.0, align: Align::Left },
            Col { width: 51.9, align: Align::Right },
        ];
        pdf.section_label("Transaction Integrity");
        pdf.table_header(status_cols, &["Status", "Count"]);
        for (status, count) in &counts {
            let count = count.to_string();
            pdf.table_row(status_cols, &[status.as_str(), &count], false);
        }
    }

    pdf.to_numbered_bytes()
}

/// One payslip per Paid record for the selected month.
pub fn render_payslips(rows: &[PayrollRow], month: &str, church: &str) -> Result<Vec<u8>> {
    let mut pdf = PdfWriter::new("Payslips")?;

    for (index, row) in rows.iter().enumerate() {
        if index > 0 {
            pdf.new_page();
        }
        pdf.text("PAYSLIP", MARGIN_LEFT, 20.0, true);
        pdf.y += 8.0;
        if !church.is_empty() {
            pdf.text(church, MARGIN_LEFT, SUBTITLE_SIZE, false);
            pdf.y += 5.0;
        }
        pdf.text(month, MARGIN_LEFT, SUBTITLE_SIZE, false);
        pdf.y += 8.0;

        pdf.section_label("Employee Details");
        pdf.text(&row.staff_name, MARGIN_LEFT, FONT_SIZE, true);
        pdf.y += ROW_H;
        pdf.text(&row.staff_role, MARGIN_LEFT, FONT_SIZE, false);
        pdf.y += ROW_H;
        let payment_date = row.record.payment_date.as_deref().unwrap_or("N/A");
        pdf.text(
            &format!("Payment Date: {payment_date}"),
            MARGIN_LEFT,
            FONT_SIZE,
            false,
        );
        pdf.y += 8.0;

        let cols = &[
            Col { width: 120.0, align: Align::Left },
            Col { width: 51.9, align: Align::Right },
        ];
        pdf.table_header(cols, &["Description", "Amount"]);
        let basic = money(row.record.basic_salary);
        pdf.table_row(cols, &["Basic Salary", &basic], false);
        let allowances = format!("+ {}", money(row.record.allowances));
        pdf.table_row(cols, &["Allowances", &allowances], false);
        let deductions = format!("- {}", money(row.record.deductions));
        pdf.table_row(cols, &["Deductions", &deductions], false);
        pdf.separator();
        let net = money(row.record.net_pay);
        pdf.table_row(cols, &["NET TOTAL", &net], true);
    }

    pdf.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTransaction, PayStatus, PayrollRecord, TxStatus, TxType};
    use crate::store::TransactionStore;

    fn seeded_store() -> (tempfile::TempDir, TransactionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TransactionStore::open(&dir.path().join("test.db")).unwrap();
        for (date, contributor, tx_type, category, amount) in [
            ("2026-01-05", "Ama Mensah", TxType::Tithe, "General", 100.0),
            ("2026-01-12", "Kofi Owusu", TxType::Offering, "Building Fund", 250.0),
            ("2026-01-20", "Church Office", TxType::Expense, "Utilities", 75.5),
        ] {
            store
                .insert(&NewTransaction {
                    date: date.to_string(),
                    contributor: contributor.to_string(),
                    tx_type,
                    category: category.to_string(),
                    amount,
                    description: None,
                    status: TxStatus::Processed,
                    receipt_id: None,
                })
                .unwrap();
        }
        (dir, store)
    }

    fn payroll_row(name: &str, net: f64) -> PayrollRow {
        PayrollRow {
            staff_name: name.to_string(),
            staff_role: "Administrator".to_string(),
            record: PayrollRecord {
                id: 1,
                staff_id: 1,
                month: "January 2026".to_string(),
                basic_salary: net,
                allowances: 0.0,
                deductions: 0.0,
                net_pay: net,
                status: PayStatus::Paid,
                payment_date: Some("2026-01-28".to_string()),
            },
        }
    }

    #[test]
    fn test_render_history_produces_pdf() {
        let (_dir, store) = seeded_store();
        let rows = store.fetch_all().unwrap();
        let bytes = render_history(&rows, "Grace Chapel").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_history_paginates_long_tables() {
        let (_dir, store) = seeded_store();
        let mut rows = store.fetch_all().unwrap();
        // enough rows to force several page breaks
        let template = rows[0].clone();
        for i in 0..120 {
            let mut tx = template.clone();
            tx.id = 1000 + i;
            rows.push(tx);
        }
        let bytes = render_history(&rows, "Grace Chapel").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_receipts_produces_pdf() {
        let (_dir, store) = seeded_store();
        let rows = store.fetch_all().unwrap();
        let bytes = render_receipts(&rows, "Grace Chapel").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_financial_report_produces_pdf() {
        let (_dir, store) = seeded_store();
        let rows = store.fetch_all().unwrap();
        let stats = FinancialStats::compute(&rows);
        let bytes =
            render_financial_report(&stats, &rows, "All Time to Present", "Grace Chapel").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_payslips_produces_pdf() {
        let rows = vec![payroll_row("Efua Baidoo", 1800.0), payroll_row("Kojo Antwi", 1200.0)];
        let bytes = render_payslips(&rows, "January 2026", "Grace Chapel").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_empty_sets() {
        let bytes = render_history(&[], "").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let bytes = render_payslips(&[], "January 2026", "").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
