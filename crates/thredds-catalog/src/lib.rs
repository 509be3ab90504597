//! THREDDS catalog discovery for HYCOM datasets.
//!
//! Turns a date range into the ordered list of OPeNDAP dataset addresses to
//! fetch:
//!
//! 1. [`CatalogLocator`] builds the yearly `catalog.xml` address
//! 2. [`CatalogFetcher`] downloads it
//! 3. [`CatalogDocument`] parses it and [`extract_fragments`] pulls the
//!    `urlPath` of every `dataset` element
//! 4. [`UrlResolver`] joins the fragments with the data root and keeps the
//!    addresses whose text contains one of the range's daily date tokens

pub mod document;
pub mod fetch;
pub mod locator;
pub mod resolver;

pub use document::{extract_fragments, CatalogDocument, DocumentError, Element, Node};
pub use fetch::{CatalogFetcher, HttpCatalogFetcher};
pub use locator::CatalogLocator;
pub use resolver::{filter_by_dates, UrlResolver};
