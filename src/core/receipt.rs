//! Receipt export - lays the cart out on A4 pages and hands the PDF to a sink.
//!
//! Layout and rendering are separate. [`layout_receipt`] turns a cart snapshot
//! into pages of positioned text and rules using fixed coordinates in PDF
//! points, y growing downward from the top edge. A [`PdfBackend`] turns those
//! pages into bytes and a [`DocumentSink`] delivers them under the configured
//! file name. Without a backend the export stops before anything is produced.

use crate::{
    config::app::ReceiptSettings,
    core::{cart::cart_total, item::CartItem, view::format_money},
    errors::{Error, Result},
};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

/// A4 width in points
pub const PAGE_WIDTH: f32 = 595.28;
/// A4 height in points
pub const PAGE_HEIGHT: f32 = 841.89;

const LEFT_MARGIN: f32 = 40.0;
const RULE_END: f32 = 555.0;
const RULE_WIDTH: f32 = 0.6;

const TITLE_Y: f32 = 50.0;
const TIMESTAMP_Y: f32 = 70.0;
const HEADER_Y: f32 = 100.0;
const HEADER_RULE_OFFSET: f32 = 6.0;
const FIRST_ROW_OFFSET: f32 = 24.0;

const QTY_X: f32 = 320.0;
const UNIT_PRICE_X: f32 = 380.0;
const SUBTOTAL_HEADER_X: f32 = 460.0;
const SUBTOTAL_X: f32 = 500.0;
const DETAIL_X: f32 = 60.0;

const ROW_STEP: f32 = 16.0;
const DETAIL_STEP: f32 = 12.0;
const CLOSING_GAP: f32 = 10.0;
const TOTAL_GAP: f32 = 24.0;

/// Rows starting below this start on a fresh page instead.
pub const PAGE_BOTTOM: f32 = 740.0;
/// Where rows resume on a continuation page.
pub const PAGE_TOP: f32 = 60.0;

const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 11.0;
const DETAIL_SIZE: f32 = 9.0;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Written instead of rows when there is nothing to list.
pub const EMPTY_RECEIPT_LINE: &str = "Cart is empty.";

/// Font weight of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    /// Regular Helvetica
    Normal,
    /// Helvetica Bold
    Bold,
}

/// Which end of the text sits on the anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Text starts at x
    Left,
    /// Text ends at x
    Right,
}

/// One drawing instruction on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A run of text on a baseline
    Text {
        /// Text to draw
        text: String,
        /// Anchor x in points
        x: f32,
        /// Baseline y in points from the top edge
        y: f32,
        /// Font size in points
        size: f32,
        /// Font weight
        weight: FontWeight,
        /// Anchor side
        align: Align,
    },
    /// A horizontal line
    Rule {
        /// Start x
        x1: f32,
        /// End x
        x2: f32,
        /// y from the top edge
        y: f32,
        /// Stroke width
        width: f32,
    },
}

/// Drawing instructions for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiptPage {
    /// Instructions in drawing order
    pub ops: Vec<DrawOp>,
}

impl ReceiptPage {
    /// Text runs on this page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rule { .. } => None,
        })
    }
}

/// A laid-out receipt, ready for a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptDocument {
    /// Document title
    pub title: String,
    /// Name the file is delivered under
    pub filename: String,
    /// Pages in order, never empty
    pub pages: Vec<ReceiptPage>,
}

impl ReceiptDocument {
    /// Every text run across all pages, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(ReceiptPage::texts)
    }
}

/// Turns a laid-out receipt into PDF bytes.
pub trait PdfBackend {
    /// Renders `document`.
    fn render(&self, document: &ReceiptDocument) -> Result<Vec<u8>>;
}

/// Delivers a finished document, e.g. by saving it where the user can pick it up.
pub trait DocumentSink {
    /// Stores `bytes` under `filename` and reports where they went.
    fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Saves documents into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink writing into `dir`, created on first delivery.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl DocumentSink for DirectorySink {
    fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone)]
pub struct ExportedReceipt {
    /// What was laid out
    pub document: ReceiptDocument,
    /// Where the sink put it
    pub location: PathBuf,
    /// Size of the rendered PDF
    pub size: usize,
}

/// Stateful writer mirroring a PDF drawing context: current font applies to following text.
struct PageWriter {
    pages: Vec<ReceiptPage>,
    size: f32,
    weight: FontWeight,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: vec![ReceiptPage::default()],
            size: BODY_SIZE,
            weight: FontWeight::Normal,
        }
    }

    fn set_font(&mut self, weight: FontWeight, size: f32) {
        self.weight = weight;
        self.size = size;
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn text(&mut self, text: impl Into<String>, x: f32, y: f32, align: Align) {
        let op = DrawOp::Text {
            text: text.into(),
            x,
            y,
            size: self.size,
            weight: self.weight,
            align,
        };
        self.push(op);
    }

    fn rule(&mut self, y: f32) {
        self.push(DrawOp::Rule {
            x1: LEFT_MARGIN,
            x2: RULE_END,
            y,
            width: RULE_WIDTH,
        });
    }

    fn add_page(&mut self) {
        self.pages.push(ReceiptPage::default());
    }
}

/// Lays out the receipt for `items`.
#[must_use]
pub fn layout_receipt(
    items: &[CartItem],
    generated_at: NaiveDateTime,
    settings: &ReceiptSettings,
) -> ReceiptDocument {
    let currency = settings.currency_symbol.as_str();
    let mut writer = PageWriter::new();

    writer.set_font(FontWeight::Bold, TITLE_SIZE);
    writer.text(settings.title.as_str(), LEFT_MARGIN, TITLE_Y, Align::Left);

    writer.set_font(FontWeight::Normal, BODY_SIZE);
    writer.text(
        format!("Generated: {}", generated_at.format(TIMESTAMP_FORMAT)),
        LEFT_MARGIN,
        TIMESTAMP_Y,
        Align::Left,
    );

    let mut y = HEADER_Y;
    writer.set_font(FontWeight::Bold, BODY_SIZE);
    writer.text("Product", LEFT_MARGIN, y, Align::Left);
    writer.text("Qty", QTY_X, y, Align::Left);
    writer.text("Unit Price", UNIT_PRICE_X, y, Align::Left);
    writer.text("Subtotal", SUBTOTAL_HEADER_X, y, Align::Left);
    writer.rule(y + HEADER_RULE_OFFSET);

    y += FIRST_ROW_OFFSET;
    writer.set_font(FontWeight::Normal, BODY_SIZE);

    if items.is_empty() {
        writer.text(EMPTY_RECEIPT_LINE, LEFT_MARGIN, y, Align::Left);
    }

    for item in items {
        if y > PAGE_BOTTOM {
            writer.add_page();
            y = PAGE_TOP;
        }

        writer.text(item.name.as_str(), LEFT_MARGIN, y, Align::Left);
        writer.text(item.quantity.to_string(), QTY_X, y, Align::Right);
        writer.text(format_money(currency, item.price), UNIT_PRICE_X, y, Align::Right);
        writer.text(format_money(currency, item.subtotal()), SUBTOTAL_X, y, Align::Right);
        y += ROW_STEP;

        let Some(extras) = &item.extras else {
            continue;
        };

        let mut details = Vec::with_capacity(3);
        if let Some(order_type) = extras.order_type_label() {
            details.push(format!("Order: {order_type}"));
        }
        if !extras.ingredients.is_empty() {
            details.push(format!("Ingredients: {}", extras.ingredients.join(", ")));
        }
        if !extras.comments.is_empty() {
            details.push(format!("Notes: {}", extras.comments));
        }

        writer.set_font(FontWeight::Normal, DETAIL_SIZE);
        for detail in details {
            writer.text(detail, DETAIL_X, y, Align::Left);
            y += DETAIL_STEP;
        }
        writer.set_font(FontWeight::Normal, BODY_SIZE);
    }

    y += CLOSING_GAP;
    writer.rule(y);

    y += TOTAL_GAP;
    writer.set_font(FontWeight::Bold, BODY_SIZE);
    writer.text(
        format!("Total: {}", format_money(currency, cart_total(items))),
        LEFT_MARGIN,
        y,
        Align::Left,
    );

    ReceiptDocument {
        title: settings.title.clone(),
        filename: settings.filename.clone(),
        pages: writer.pages,
    }
}

/// Builds receipts and delivers them, if a PDF backend is available.
pub struct ReceiptExporter {
    backend: Option<Box<dyn PdfBackend>>,
    settings: ReceiptSettings,
}

impl ReceiptExporter {
    /// Creates an exporter using the backend compiled into this build, if any.
    #[must_use]
    pub fn new(settings: ReceiptSettings) -> Self {
        Self::with_backend(settings, default_backend())
    }

    /// Creates an exporter with an explicit backend, or none.
    #[must_use]
    pub fn with_backend(settings: ReceiptSettings, backend: Option<Box<dyn PdfBackend>>) -> Self {
        Self { backend, settings }
    }

    /// Whether exporting can produce a document at all.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// The settings receipts are laid out with.
    #[must_use]
    pub const fn settings(&self) -> &ReceiptSettings {
        &self.settings
    }

    /// Lays out, renders and delivers the receipt for `items`.
    ///
    /// # Errors
    /// - [`Error::ExportUnavailable`] when there is no backend; nothing is rendered or delivered
    /// - [`Error::Pdf`] when the backend fails
    /// - whatever the sink reports when delivery fails
    #[instrument(skip(self, items, sink), fields(lines = items.len()))]
    pub fn export(
        &self,
        items: &[CartItem],
        generated_at: NaiveDateTime,
        sink: &impl DocumentSink,
    ) -> Result<ExportedReceipt> {
        let Some(backend) = self.backend.as_deref() else {
            error!("Receipt export requested but no PDF backend is available");
            return Err(Error::ExportUnavailable);
        };

        let document = layout_receipt(items, generated_at, &self.settings);
        let bytes = backend.render(&document)?;
        let location = sink.deliver(&document.filename, &bytes)?;
        info!(
            "Exported receipt with {} page(s) to {}",
            document.pages.len(),
            location.display()
        );

        Ok(ExportedReceipt {
            document,
            location,
            size: bytes.len(),
        })
    }
}

#[cfg(feature = "pdf")]
fn default_backend() -> Option<Box<dyn PdfBackend>> {
    Some(Box::new(crate::core::pdf::LopdfBackend))
}

#[cfg(not(feature = "pdf"))]
fn default_backend() -> Option<Box<dyn PdfBackend>> {
    None
}
