use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CategoryId, IndicatorId, SubCompetencyId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TaxonomyError {
    #[error("taxonomy has no categories")]
    Empty,

    #[error("duplicate identifier in taxonomy: {id}")]
    DuplicateId { id: String },

    #[error("{node} {id} has no display text")]
    MissingText { node: &'static str, id: String },

    #[error("invalid taxonomy document: {0}")]
    Parse(String),
}

//
// ─── NODES ─────────────────────────────────────────────────────────────────────
//

/// Observable indicator: the selectable leaf of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: IndicatorId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCompetency {
    pub id: SubCompetencyId,
    pub title: String,
    pub indicators: Vec<Indicator>,
}

impl SubCompetency {
    pub fn indicator_ids(&self) -> impl Iterator<Item = &IndicatorId> + '_ {
        self.indicators.iter().map(|indicator| &indicator.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencyCategory {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "subCompetencies")]
    pub sub_competencies: Vec<SubCompetency>,
}

impl CompetencyCategory {
    pub fn indicator_ids(&self) -> impl Iterator<Item = &IndicatorId> + '_ {
        self.sub_competencies
            .iter()
            .flat_map(SubCompetency::indicator_ids)
    }

    #[must_use]
    pub fn indicator_count(&self) -> usize {
        self.sub_competencies
            .iter()
            .map(|sub| sub.indicators.len())
            .sum()
    }
}

//
// ─── TAXONOMY ──────────────────────────────────────────────────────────────────
//

/// Read-only category → sub-competency → indicator tree.
///
/// Built once at startup and never mutated; identifiers are unique across
/// every level so a single flat selection map can address any leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    categories: Vec<CompetencyCategory>,
}

impl Taxonomy {
    /// Validate and wrap a list of categories.
    ///
    /// # Errors
    ///
    /// Returns `TaxonomyError::Empty` for an empty list, `DuplicateId` when an
    /// identifier appears twice anywhere in the tree, and `MissingText` when a
    /// node has blank display text.
    pub fn new(categories: Vec<CompetencyCategory>) -> Result<Self, TaxonomyError> {
        if categories.is_empty() {
            return Err(TaxonomyError::Empty);
        }

        let mut seen: HashSet<&str> = HashSet::new();

        for category in &categories {
            require_text("category", category.id.as_str(), &category.name)?;
            claim(&mut seen, category.id.as_str())?;
            for sub in &category.sub_competencies {
                require_text("sub-competency", sub.id.as_str(), &sub.title)?;
                claim(&mut seen, sub.id.as_str())?;
                for indicator in &sub.indicators {
                    require_text("indicator", indicator.id.as_str(), &indicator.text)?;
                    claim(&mut seen, indicator.id.as_str())?;
                }
            }
        }

        Ok(Self { categories })
    }

    /// Parse a JSON array of categories (the `subCompetencies` layout).
    ///
    /// # Errors
    ///
    /// Returns `TaxonomyError::Parse` for malformed JSON, or any validation
    /// error from [`Taxonomy::new`].
    pub fn from_json_str(raw: &str) -> Result<Self, TaxonomyError> {
        let categories: Vec<CompetencyCategory> =
            serde_json::from_str(raw).map_err(|err| TaxonomyError::Parse(err.to_string()))?;
        Self::new(categories)
    }

    #[must_use]
    pub fn categories(&self) -> &[CompetencyCategory] {
        &self.categories
    }

    #[must_use]
    pub fn category(&self, id: &CategoryId) -> Option<&CompetencyCategory> {
        self.categories.iter().find(|category| &category.id == id)
    }

    #[must_use]
    pub fn sub_competency(&self, id: &SubCompetencyId) -> Option<&SubCompetency> {
        self.categories
            .iter()
            .flat_map(|category| category.sub_competencies.iter())
            .find(|sub| &sub.id == id)
    }

    /// Every indicator id in document order.
    pub fn indicator_ids(&self) -> impl Iterator<Item = &IndicatorId> + '_ {
        self.categories
            .iter()
            .flat_map(CompetencyCategory::indicator_ids)
    }

    #[must_use]
    pub fn indicator_count(&self) -> usize {
        self.categories
            .iter()
            .map(CompetencyCategory::indicator_count)
            .sum()
    }

    #[must_use]
    pub fn contains_indicator(&self, id: &IndicatorId) -> bool {
        self.indicator_ids().any(|candidate| candidate == id)
    }
}

fn claim<'a>(seen: &mut HashSet<&'a str>, id: &'a str) -> Result<(), TaxonomyError> {
    if seen.insert(id) {
        Ok(())
    } else {
        Err(TaxonomyError::DuplicateId { id: id.to_owned() })
    }
}

fn require_text(node: &'static str, id: &str, text: &str) -> Result<(), TaxonomyError> {
    if text.trim().is_empty() {
        return Err(TaxonomyError::MissingText {
            node,
            id: id.to_owned(),
        });
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn counts_and_orders_indicators() {
        let taxonomy = sample();
        assert_eq!(taxonomy.indicator_count(), 7);
        let ids: Vec<&str> = taxonomy.indicator_ids().map(IndicatorId::as_str).collect();
        assert_eq!(
            ids,
            ["ind-x", "ind-y", "ind-z", "ind-w", "ind-p", "ind-q", "ind-r"]
        );
    }

    #[test]
    fn finds_nodes_by_id() {
        let taxonomy = sample();
        let sub = taxonomy
            .sub_competency(&SubCompetencyId::new("sub-b1").unwrap())
            .unwrap();
        assert_eq!(sub.indicators.len(), 3);
        assert!(
            taxonomy
                .category(&CategoryId::new("cat-z").unwrap())
                .is_none()
        );
        assert!(taxonomy.contains_indicator(&IndicatorId::new("ind-w").unwrap()));
    }

    #[test]
    fn rejects_duplicate_ids_across_levels() {
        let err = Taxonomy::new(vec![category("dup", vec![sub("dup", &["ind-1"])])]).unwrap_err();
        assert_eq!(
            err,
            TaxonomyError::DuplicateId {
                id: "dup".to_string()
            }
        );
    }

    #[test]
    fn rejects_indicator_repeated_in_another_category() {
        let err = Taxonomy::new(vec![
            category("cat-1", vec![sub("sub-1", &["ind-1", "ind-2"])]),
            category("cat-2", vec![sub("sub-2", &["ind-3", "ind-2"])]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            TaxonomyError::DuplicateId {
                id: "ind-2".to_string()
            }
        );
    }

    #[test]
    fn rejects_empty_taxonomy() {
        assert_eq!(Taxonomy::new(Vec::new()).unwrap_err(), TaxonomyError::Empty);
    }

    #[test]
    fn rejects_blank_indicator_text() {
        let mut blank = sub("sub-1", &["ind-1"]);
        blank.indicators[0].text = "  ".to_string();
        let err = Taxonomy::new(vec![category("cat-1", vec![blank])]).unwrap_err();
        assert!(matches!(err, TaxonomyError::MissingText { node: "indicator", .. }));
    }

    #[test]
    fn parses_camel_case_document() {
        let raw = r#"[
            {
                "id": "cat-pd",
                "name": "Pedagogy",
                "subCompetencies": [
                    {
                        "id": "sub-pd-di",
                        "title": "Instructional design",
                        "indicators": [
                            { "id": "ind-pd-di-1", "text": "Presents a course plan." },
                            { "id": "ind-pd-di-2", "text": "Links content to activities." }
                        ]
                    }
                ]
            }
        ]"#;
        let taxonomy = Taxonomy::from_json_str(raw).unwrap();
        assert_eq!(taxonomy.categories().len(), 1);
        assert_eq!(taxonomy.indicator_count(), 2);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = Taxonomy::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, TaxonomyError::Parse(_)));
    }
}
