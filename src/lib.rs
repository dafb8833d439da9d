//! # fastup
//!
//! A parser for the Fastup markup language: compact, styled, widget-bearing
//! text for status-line style output.
//!
//! Parsing never copies source text. The scanner emits a flat run of tokens
//! borrowing slices of the input, the treelizer links bracket pairs in place,
//! and the resulting tree is navigated purely through token order. Syntax
//! errors come back as renderable Fastup documents built with the same
//! machinery, so success and failure share one result type.

pub mod fastup;
