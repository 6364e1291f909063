//! Catalog contracts read by the pipeline: article categories and the
//! peptide product catalog used for entity matching.

/// A known article category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub slug: String,
    pub label: String,
}

/// A canonical peptide from the product catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peptide {
    pub name: String,
    pub slug: String,
}
