//! Subject identification for grouped state-label tables

use crate::{Error, Result};
use photosyl_core::{Diagnostic, DiagnosticKind, Diagnostics, SubjectId};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Extract the subject id from a group name of the form `T<digits>_...`
pub fn parse_subject_id(group_name: &str) -> Option<SubjectId> {
    let rest = group_name.strip_prefix('T')?;
    let digits_end = rest.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 || !rest[digits_end..].starts_with('_') {
        return None;
    }
    Some(SubjectId::new(&rest[..digits_end]))
}

/// State-label tables keyed by subject
#[derive(Debug, Clone, Default)]
pub struct SubjectRegistry {
    tables: BTreeMap<SubjectId, DataFrame>,
    diagnostics: Diagnostics,
}

impl SubjectRegistry {
    /// Register named groups
    ///
    /// Groups whose name carries no subject id, or that hold no columns, are
    /// skipped with a diagnostic. Two groups resolving to the same subject
    /// fail the whole load with [`photosyl_core::Error::DuplicateSubject`].
    pub fn from_groups<I, S>(groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, DataFrame)>,
        S: AsRef<str>,
    {
        let mut registry = Self::default();

        for (name, df) in groups {
            let name = name.as_ref();
            let scope = format!("group {name}");

            let Some(subject) = parse_subject_id(name) else {
                registry.diagnostics.push(Diagnostic::new(
                    scope,
                    DiagnosticKind::Schema,
                    "no subject id in group name",
                ));
                continue;
            };

            if registry.tables.contains_key(&subject) {
                return Err(Error::Core(photosyl_core::Error::DuplicateSubject(
                    subject.to_string(),
                )));
            }

            if df.width() == 0 {
                registry.diagnostics.push(Diagnostic::new(
                    scope,
                    DiagnosticKind::MissingInput,
                    "group holds no datasets",
                ));
                continue;
            }

            debug!(%subject, group = name, rows = df.height(), "registered subject");
            registry.tables.insert(subject, df);
        }

        Ok(registry)
    }

    pub fn subjects(&self) -> impl Iterator<Item = &SubjectId> {
        self.tables.keys()
    }

    pub fn get(&self, subject: &SubjectId) -> Option<&DataFrame> {
        self.tables.get(subject)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn tables(&self) -> &BTreeMap<SubjectId, DataFrame> {
        &self.tables
    }

    pub fn into_tables(self) -> BTreeMap<SubjectId, DataFrame> {
        self.tables
    }
}
