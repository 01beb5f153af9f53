use serde::{Deserialize, Serialize};

/// The five rubric categories every evaluation is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ActionRequise,
    DelaiLegal,
    DocumentsObligatoires,
    ImpactFinancier,
    ConsequencesNonConformite,
}

impl Category {
    /// All categories in rubric order.
    pub const ALL: [Category; 5] = [
        Category::ActionRequise,
        Category::DelaiLegal,
        Category::DocumentsObligatoires,
        Category::ImpactFinancier,
        Category::ConsequencesNonConformite,
    ];

    /// JSON key used by the evaluator for this category.
    pub fn key(self) -> &'static str {
        match self {
            Category::ActionRequise => "action_requise",
            Category::DelaiLegal => "delai_legal",
            Category::DocumentsObligatoires => "documents_obligatoires",
            Category::ImpactFinancier => "impact_financier",
            Category::ConsequencesNonConformite => "consequences_non_conformite",
        }
    }

    /// Heading used in prompts and answers.
    pub fn label(self) -> &'static str {
        match self {
            Category::ActionRequise => "Action Requise",
            Category::DelaiLegal => "Délai Legal",
            Category::DocumentsObligatoires => "Documents Obligatoires",
            Category::ImpactFinancier => "Impact Financier",
            Category::ConsequencesNonConformite => "Conséquences Non-Conformité",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
