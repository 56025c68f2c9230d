//! Read-only context for a render pass.
//!
//! The host owns the page and variable directories; the core borrows them
//! for the duration of one pass and never mutates them. Passing them
//! explicitly keeps the pipeline free of ambient globals.

use vellum_common::{PageDirectory, VariableDirectory};

#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub pages: &'a PageDirectory,
    pub variables: &'a VariableDirectory,
}

impl<'a> RenderContext<'a> {
    pub fn new(pages: &'a PageDirectory, variables: &'a VariableDirectory) -> Self {
        Self { pages, variables }
    }
}
