//! Exercise lookup across an ordered chain of sources.
//!
//! Precedence: sources are consulted in the order they were added and the
//! first one that knows the id wins. When none does, callers get the
//! [`fallback_name`] instead of an error.

use crate::core::types::{Catalog, Exercise};

/// A place exercises can be looked up in.
pub trait ExerciseSource {
    /// Short label used in logs and diagnostics.
    fn label(&self) -> &str;

    fn find(&self, id: u32) -> Option<&Exercise>;
}

/// Catalog-backed source.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    label: String,
    catalog: Catalog,
}

impl CatalogSource {
    pub fn new(label: impl Into<String>, catalog: Catalog) -> Self {
        Self {
            label: label.into(),
            catalog,
        }
    }
}

impl ExerciseSource for CatalogSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn find(&self, id: u32) -> Option<&Exercise> {
        self.catalog.exercise(id)
    }
}

/// Lookup result with the source that answered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Found<'a> {
    pub exercise: &'a Exercise,
    pub source: &'a str,
}

#[derive(Default)]
pub struct ExerciseDirectory {
    sources: Vec<Box<dyn ExerciseSource + Send + Sync>>,
}

impl ExerciseDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source with lower precedence than every source already added.
    pub fn with_source(mut self, source: impl ExerciseSource + Send + Sync + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn sources(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.label()).collect()
    }

    pub fn find(&self, id: u32) -> Option<Found<'_>> {
        self.sources.iter().find_map(|source| {
            source.find(id).map(|exercise| Found {
                exercise,
                source: source.label(),
            })
        })
    }

    /// Title of the exercise, or the fallback name when no source has it.
    pub fn display_name(&self, id: u32) -> String {
        self.find(id)
            .map(|found| found.exercise.title.clone())
            .unwrap_or_else(|| fallback_name(id))
    }
}

pub fn fallback_name(id: u32) -> String {
    format!("Exercise #{}", id)
}
