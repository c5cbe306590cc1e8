//! HTML table scraper.
//!
//! Locates a `<table>` by id or CSS selector and extracts the header texts
//! plus, for each body row, its cell texts and the anchors it contains.

use scraper::{ElementRef, Html, Selector};

use crate::ParseError;
use crate::dom::{selector, text_of};

/// How to find the table in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLocator {
    /// Element id (without `#`).
    Id(String),
    /// Any CSS selector.
    Selector(String),
}

impl TableLocator {
    fn css(&self) -> String {
        match self {
            Self::Id(id) => format!("table[id=\"{id}\"]"),
            Self::Selector(css) => css.clone(),
        }
    }
}

/// A hyperlink found in a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Trimmed link text.
    pub text: String,
    /// Raw `href` attribute.
    pub href: String,
}

/// One body row of a scraped table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedRow {
    /// Trimmed text of each data cell.
    pub cells: Vec<String>,
    /// Anchors anywhere in the row, in document order.
    pub anchors: Vec<Anchor>,
}

impl ScrapedRow {
    /// First anchor whose `href` contains `marker`.
    #[must_use]
    pub fn anchor_containing(&self, marker: &str) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.href.contains(marker))
    }
}

/// Headers and rows extracted from one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedTable {
    /// Header cell texts, after skipping any leading cells.
    pub headers: Vec<String>,
    /// Body rows with at least the configured number of cells.
    pub rows: Vec<ScrapedRow>,
}

/// Extracts a table from an HTML document.
///
/// The default selectors work with standard `<thead>` / `<tbody>` markup.
/// Body rows with fewer data cells than [`HtmlTable::with_min_cells`]
/// (one by default) are skipped, which drops repeated header rows made
/// only of `<th>` cells.
#[derive(Debug, Clone)]
pub struct HtmlTable {
    locator: TableLocator,
    header_selector: String,
    skip_header_cells: usize,
    body_row_selector: String,
    cell_selector: String,
    min_cells: usize,
}

impl HtmlTable {
    /// Creates a table extractor with default selectors.
    #[must_use]
    pub fn new(locator: TableLocator) -> Self {
        Self {
            locator,
            header_selector: "thead th".to_owned(),
            skip_header_cells: 0,
            body_row_selector: "tbody tr".to_owned(),
            cell_selector: "td".to_owned(),
            min_cells: 1,
        }
    }

    /// Shorthand for [`HtmlTable::new`] with [`TableLocator::Id`].
    #[must_use]
    pub fn by_id(id: &str) -> Self {
        Self::new(TableLocator::Id(id.to_owned()))
    }

    /// Overrides the CSS selector used to locate header cells.
    #[must_use]
    pub fn with_header_selector(mut self, css: &str) -> Self {
        css.clone_into(&mut self.header_selector);
        self
    }

    /// Skips the first `count` header cells (e.g. a rank column whose body
    /// cells are `<th>` rather than `<td>`).
    #[must_use]
    pub const fn with_skipped_header_cells(mut self, count: usize) -> Self {
        self.skip_header_cells = count;
        self
    }

    /// Overrides the CSS selector used to locate body rows.
    #[must_use]
    pub fn with_body_row_selector(mut self, css: &str) -> Self {
        css.clone_into(&mut self.body_row_selector);
        self
    }

    /// Overrides the CSS selector used to locate cells within a row.
    #[must_use]
    pub fn with_cell_selector(mut self, css: &str) -> Self {
        css.clone_into(&mut self.cell_selector);
        self
    }

    /// Skips rows with fewer than `count` data cells.
    #[must_use]
    pub const fn with_min_cells(mut self, count: usize) -> Self {
        self.min_cells = count;
        self
    }

    /// Parses `html` and extracts the table.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingElement`] if no table matches, or
    /// [`ParseError::MissingHeaders`] if it has no header cells.
    pub fn parse(&self, html: &str) -> Result<ScrapedTable, ParseError> {
        self.extract(&Html::parse_document(html))
    }

    /// Extracts the table from an already parsed document.
    ///
    /// # Errors
    ///
    /// See [`HtmlTable::parse`].
    pub fn extract(&self, document: &Html) -> Result<ScrapedTable, ParseError> {
        self.try_extract(document)?
            .ok_or_else(|| ParseError::MissingElement {
                selector: self.locator.css(),
            })
    }

    /// Like [`HtmlTable::extract`] but returns `Ok(None)` when the table is
    /// absent, for pages where a table is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for invalid selectors or a table without
    /// header cells.
    pub fn try_extract(&self, document: &Html) -> Result<Option<ScrapedTable>, ParseError> {
        let table_css = self.locator.css();
        let table_sel = selector(&table_css)?;
        let Some(table) = document.select(&table_sel).next() else {
            return Ok(None);
        };

        let header_sel = selector(&self.header_selector)?;
        let headers: Vec<String> = table
            .select(&header_sel)
            .skip(self.skip_header_cells)
            .map(text_of)
            .collect();

        if headers.is_empty() {
            return Err(ParseError::MissingHeaders {
                table: table_css,
                selector: self.header_selector.clone(),
            });
        }

        let row_sel = selector(&self.body_row_selector)?;
        let cell_sel = selector(&self.cell_selector)?;
        let anchor_sel = selector("a[href]")?;

        let rows: Vec<ScrapedRow> = table
            .select(&row_sel)
            .filter_map(|row| scrape_row(row, &cell_sel, &anchor_sel, self.min_cells))
            .collect();

        log::debug!(
            "Extracted {} header(s) and {} row(s) from '{table_css}'",
            headers.len(),
            rows.len()
        );

        Ok(Some(ScrapedTable { headers, rows }))
    }
}

fn scrape_row(
    row: ElementRef<'_>,
    cell_sel: &Selector,
    anchor_sel: &Selector,
    min_cells: usize,
) -> Option<ScrapedRow> {
    let cells: Vec<String> = row.select(cell_sel).map(text_of).collect();
    if cells.len() < min_cells.max(1) {
        return None;
    }

    let anchors = row
        .select(anchor_sel)
        .filter_map(|a| {
            a.value().attr("href").map(|href| Anchor {
                text: text_of(a),
                href: href.to_owned(),
            })
        })
        .collect();

    Some(ScrapedRow { cells, anchors })
}
