use serde::Serialize;

use crate::evaluation::Category;

/// Heading spellings accepted for each rubric section.
fn patterns(category: Category) -> &'static [&'static str] {
    match category {
        Category::ActionRequise => &[
            "Action Requise:",
            "Action requise:",
            "• Action Requise",
            "**Action Requise",
        ],
        Category::DelaiLegal => &[
            "Délai Legal:",
            "Délais Legal:",
            "Délai légal:",
            "Délais légal:",
            "• Délai Legal",
            "**Délai Legal",
            "**Délais Legal",
        ],
        Category::DocumentsObligatoires => &[
            "Documents Obligatoires:",
            "Documents obligatoires:",
            "Documents Emploi:",
            "• Documents Obligatoires",
            "**Documents Obligatoires",
            "**Documents Emploi",
        ],
        Category::ImpactFinancier => &[
            "Impact Financier:",
            "Impact financier:",
            "• Impact Financier",
            "**Impact Financier",
        ],
        Category::ConsequencesNonConformite => &[
            "Conséquences Non-Conformité:",
            "Conséquences non-conformité:",
            "Conséquences Non-conséquence:",
            "• Conséquences Non-Conformité",
            "**Conséquences Non-Conformité",
        ],
    }
}

/// Which structured summary sections a candidate answer contains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormatReport {
    pub found: Vec<Category>,
    pub missing: Vec<Category>,
}

impl FormatReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Looks for each section heading in `text`. Informational only.
pub fn check_format(text: &str) -> FormatReport {
    let (found, missing) = Category::ALL
        .into_iter()
        .partition(|&category| patterns(category).iter().any(|p| text.contains(p)));
    FormatReport { found, missing }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_all_bullet_sections() {
        let text = "Réponse.\n\
            • Action Requise: déposer\n\
            • Délai Legal: un mois\n\
            • Documents Obligatoires: Kbis\n\
            • Impact Financier: 50 euros\n\
            • Conséquences Non-Conformité: amende";
        let report = check_format(text);
        assert!(report.is_complete());
        assert_eq!(report.found.len(), 5);
    }

    #[test]
    fn accepts_alternate_spellings_and_reports_missing() {
        let text = "**Action Requise** faire\nDélai légal: 15 jours";
        let report = check_format(text);
        assert_eq!(report.found, vec![Category::ActionRequise, Category::DelaiLegal]);
        assert_eq!(
            report.missing,
            vec![
                Category::DocumentsObligatoires,
                Category::ImpactFinancier,
                Category::ConsequencesNonConformite,
            ]
        );
    }
}
