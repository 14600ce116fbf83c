//! DOM lookup helpers shared by extractors
//!
//! Every lookup that can come up empty returns an `ExtractError` naming the
//! selector, so callers decide whether the miss is fatal.

use crate::{ExtractError, ExtractResult};
use scraper::{ElementRef, Selector};

fn selector(css: &str) -> ExtractResult<Selector> {
    Selector::parse(css).map_err(|_| ExtractError::InvalidSelector(css.to_string()))
}

/// First descendant of `scope` matching `css`
pub fn first<'a>(scope: ElementRef<'a>, css: &str) -> ExtractResult<ElementRef<'a>> {
    let selector = selector(css)?;
    scope
        .select(&selector)
        .next()
        .ok_or_else(|| ExtractError::MissingElement {
            selector: css.to_string(),
        })
}

/// Every descendant of `scope` matching `css`, in document order
pub fn all<'a>(scope: ElementRef<'a>, css: &str) -> ExtractResult<Vec<ElementRef<'a>>> {
    let selector = selector(css)?;
    Ok(scope.select(&selector).collect())
}

/// Direct element children of `element`
pub fn element_children<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Rendered text of an element with whitespace runs collapsed
pub fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Attribute value of an element; `css` only labels the error
pub fn attr(element: ElementRef<'_>, css: &str, name: &str) -> ExtractResult<String> {
    element
        .value()
        .attr(name)
        .map(str::to_string)
        .ok_or_else(|| ExtractError::MissingAttribute {
            selector: css.to_string(),
            attribute: name.to_string(),
        })
}

/// Text of the first match of `css` under `scope`
pub fn first_text(scope: ElementRef<'_>, css: &str) -> ExtractResult<String> {
    first(scope, css).map(text_of)
}

/// Attribute of the first match of `css` under `scope`
pub fn first_attr(scope: ElementRef<'_>, css: &str, name: &str) -> ExtractResult<String> {
    first(scope, css).and_then(|element| attr(element, css, name))
}
