//! Free-text filtering and project de-duplication over loaded requests.
//!
//! Both operate on records already ordered by `created_at` descending and keep that order.

use std::collections::HashSet;

use crate::models::{GenerationRequest, ProjectSummary};

/// The user-entered text a record can be found by.
pub trait Searchable {
    fn search_fields(&self) -> [&str; 3];
}

impl Searchable for GenerationRequest {
    fn search_fields(&self) -> [&str; 3] {
        [&self.project_name, &self.business_details, &self.website_structure]
    }
}

impl Searchable for ProjectSummary {
    fn search_fields(&self) -> [&str; 3] {
        [&self.project_name, &self.business_details, &self.website_structure]
    }
}

/// True if `term` occurs, ignoring case, in the project name, business details or website structure.
/// An empty term matches everything.
pub fn matches_search<T: Searchable>(record: &T, term: &str) -> bool {
    let term = term.to_lowercase();
    record
        .search_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(&term))
}

/// Keeps the records matching `search`, or all of them when there is no search term.
pub fn filter_by_search<T: Searchable>(records: Vec<T>, search: Option<&str>) -> Vec<T> {
    match search {
        Some(term) if !term.is_empty() => records
            .into_iter()
            .filter(|record| matches_search(record, term))
            .collect(),
        _ => records,
    }
}

/// One summary per distinct project name, taken from the first (most recent) record carrying it.
pub fn latest_per_project(records: Vec<GenerationRequest>) -> Vec<ProjectSummary> {
    let mut seen: HashSet<String> = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.project_name.clone()))
        .map(ProjectSummary::from)
        .collect()
}
