//! # Quote Sheet PDF
//!
//! Renders a saved [`Quote`] to a one-page PDF summary using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Data is injected with placeholder replacement before compilation
//! - Only the fonts bundled by `typst-assets` are used
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use pallet_core::pdf::render_quote_pdf;
//! use pallet_core::store::{JsonDataDir, QuoteStore};
//!
//! let store = JsonDataDir::at("pallet-data");
//! let quote = store.load_quote("3f2c9a9e")?.expect("quote exists");
//! std::fs::write("quote.pdf", render_quote_pdf(&quote)?).unwrap();
//! # Ok::<(), pallet_core::errors::QuoteError>(())
//! ```

use chrono::Utc;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;
use tracing::debug;

use crate::errors::{QuoteError, QuoteResult};
use crate::format::{format_board_feet, format_dollars, format_fastener_cost};
use crate::location::find_location;
use crate::quote::Quote;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling one in-memory document.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Template
// ============================================================================

const QUOTE_TEMPLATE: &str = r##"
#set page(
  paper: "us-letter",
  flipped: true,
  margin: (top: 0.75in, bottom: 0.75in, left: 0.6in, right: 0.6in),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 8pt)[Quote {{QUOTE_ID}}]],
      align(right)[#text(size: 8pt)[Prices as of settings dated {{SETTINGS_DATE}}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 10pt)

#block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
  #text(size: 18pt, weight: "bold")[Pallet Quote]
  #h(1fr)
  #text(size: 10pt)[{{DATE}}]
]

#v(10pt)

== Pallets

#table(
  columns: (auto, 1fr, 1fr, auto, auto, auto, auto, auto, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, left, left, right, right, right, right, right, right, right),
  table.header(
    [*\#*], [*Pallet*], [*Ship To*], [*Board Ft*], [*Lumber*], [*Processing*],
    [*Fasteners*], [*Freight*], [*Total*], [*Walkaway*],
  ),
{{PALLET_ROWS}}
)

#v(12pt)

== Quote Totals

#table(
  columns: (1fr, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right),
  [Total board feet], [{{TOTAL_BOARD_FEET}}],
  [Lumber], [{{LUMBER}}],
  [Lumber processing], [{{PROCESSING}}],
  [Additional options], [{{OPTIONS}}],
  [Fasteners], [{{FASTENERS}}],
  [Allocated freight], [{{FREIGHT}}],
  [Delivery fee], [{{DELIVERY_FEE}}],
  [Labor (build)], [{{LABOR}}],
  [*Net revenue price (30%)*], [*{{NET_REVENUE}}*],
)
"##;

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '`' | '[' | ']' | '=' | '-' | '+' | '/' | '~' => {
                format!("\\{}", c)
            }
            _ => c.to_string(),
        })
        .collect()
}

fn cell(text: &str) -> String {
    format!("[{}]", escape_typst(text))
}

fn build_pallet_rows(quote: &Quote) -> String {
    quote
        .summary
        .pallets
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let ship_to = quote
                .input
                .pallets
                .iter()
                .find(|p| p.id == line.pallet_id)
                .and_then(|p| p.location_id.as_deref())
                .and_then(|id| find_location(&quote.locations, id))
                .map(|l| l.name.as_str())
                .unwrap_or("");
            let cells = [
                (i + 1).to_string(),
                line.pallet_name.clone(),
                ship_to.to_string(),
                format_board_feet(line.board_feet),
                format_dollars(line.lumber_price),
                format_dollars(line.processing_cost),
                format!("${}", format_fastener_cost(line.fastener_cost)),
                format_dollars(line.transportation_cost),
                format_dollars(line.results.total_cost_with_transport),
                format_dollars(line.results.walkaway_price),
            ];
            let row: Vec<String> = cells.iter().map(|c| cell(c)).collect();
            format!("  {},", row.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote_source(quote: &Quote) -> String {
    let summary = &quote.summary;
    let money = |v: f64| escape_typst(&format_dollars(v));

    QUOTE_TEMPLATE
        .replace("{{QUOTE_ID}}", &escape_typst(&quote.id))
        .replace("{{DATE}}", &quote.created_at.format("%Y-%m-%d").to_string())
        .replace("{{SETTINGS_DATE}}", &quote.settings.updated_at.format("%Y-%m-%d %H:%M UTC").to_string())
        .replace("{{PALLET_ROWS}}", &build_pallet_rows(quote))
        .replace("{{TOTAL_BOARD_FEET}}", &format_board_feet(summary.total_board_feet))
        .replace("{{LUMBER}}", &money(summary.lumber_price))
        .replace("{{PROCESSING}}", &money(summary.processing_cost))
        .replace("{{OPTIONS}}", &money(summary.additional_options_cost))
        .replace("{{FASTENERS}}", &money(summary.fastener_cost))
        .replace("{{FREIGHT}}", &money(summary.transportation_cost))
        .replace("{{DELIVERY_FEE}}", &money(summary.delivery_fee))
        .replace("{{LABOR}}", &money(summary.labor_build_price))
        .replace("{{NET_REVENUE}}", &money(summary.net_revenue_price_30))
}

/// Render a quote sheet.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(QuoteError::InvalidInput)` - the quote has no priced pallets
/// * `Err(QuoteError::Internal)` - Typst failed to compile or export
pub fn render_quote_pdf(quote: &Quote) -> QuoteResult<Vec<u8>> {
    if quote.summary.pallets.is_empty() {
        return Err(QuoteError::invalid_input("quote", &quote.id, "Quote has no priced pallets"));
    }

    let world = PdfWorld::new(quote_source(quote));
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        QuoteError::Internal {
            message: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        QuoteError::Internal {
            message: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })?;

    debug!(quote = %quote.id, bytes = pdf_bytes.len(), "quote pdf rendered");
    Ok(pdf_bytes)
}
