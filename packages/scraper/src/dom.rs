//! Small helpers over the `scraper` DOM shared by the site adapters.

use scraper::{ElementRef, Html, Selector};

use crate::ParseError;

/// Parses a CSS selector, mapping failures to [`ParseError::InvalidSelector`].
///
/// # Errors
///
/// Returns [`ParseError::InvalidSelector`] if `css` is not a valid selector.
pub fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::InvalidSelector {
        selector: css.to_owned(),
        message: e.to_string(),
    })
}

/// Concatenated, trimmed text content of an element.
#[must_use]
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// Text of the first element in `document` matching `css`, if any.
///
/// # Errors
///
/// Returns [`ParseError::InvalidSelector`] if `css` is not a valid selector.
pub fn first_text(document: &Html, css: &str) -> Result<Option<String>, ParseError> {
    let sel = selector(css)?;
    Ok(document.select(&sel).next().map(text_of))
}

/// The next sibling that is an element, skipping text and comments.
#[must_use]
pub fn next_element_sibling(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Trimmed text node immediately following an element (its "tail").
#[must_use]
pub fn tail_text(element: ElementRef<'_>) -> Option<String> {
    element
        .next_sibling()
        .and_then(|node| node.value().as_text().map(|t| t.trim().to_owned()))
}
