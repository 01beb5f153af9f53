use serde::{Deserialize, Serialize};

use crate::evaluation::Category;

/// Appended for evaluators that have no native JSON mode.
pub const JSON_ONLY_INSTRUCTION: &str =
    "\n\nRéponds UNIQUEMENT avec un objet JSON valide, sans texte supplémentaire.";

/// Reference answer for the five rubric categories.
///
/// Absent fields deserialize to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundTruth {
    pub action_requise: String,
    pub delai_legal: String,
    pub documents_obligatoires: String,
    pub impact_financier: String,
    pub consequences_non_conformite: String,
}

impl GroundTruth {
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::ActionRequise => &self.action_requise,
            Category::DelaiLegal => &self.delai_legal,
            Category::DocumentsObligatoires => &self.documents_obligatoires,
            Category::ImpactFinancier => &self.impact_financier,
            Category::ConsequencesNonConformite => &self.consequences_non_conformite,
        }
    }
}

/// One answer to be judged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub question: String,
    pub model_response: String,
    #[serde(default)]
    pub ground_truth: GroundTruth,
}

impl EvaluationRequest {
    pub fn new(
        question: impl Into<String>,
        model_response: impl Into<String>,
        ground_truth: GroundTruth,
    ) -> Self {
        Self {
            question: question.into(),
            model_response: model_response.into(),
            ground_truth,
        }
    }

    pub fn prompt(&self) -> String {
        format_evaluation_prompt(&self.question, &self.model_response, &self.ground_truth)
    }
}

/// Builds the evaluator prompt. Values are substituted verbatim.
pub fn format_evaluation_prompt(
    question: &str,
    model_response: &str,
    ground_truth: &GroundTruth,
) -> String {
    format!(
        r#"Tu es un évaluateur expert en droit des affaires français. Tu dois noter la réponse d'un modèle à une question juridique en la comparant à une réponse de référence.

QUESTION:
{question}

RÉPONSE DU MODÈLE:
{model_response}

RÉPONSE DE RÉFÉRENCE:
• Action Requise: {action_requise}
• Délai Legal: {delai_legal}
• Documents Obligatoires: {documents_obligatoires}
• Impact Financier: {impact_financier}
• Conséquences Non-Conformité: {consequences_non_conformite}

CONSIGNES:
- Note chaque catégorie de 0 à 100 selon l'exactitude, la précision et les références légales citées.
- Justifie chaque note en une ou deux phrases.
- Le score global est la moyenne des cinq notes.

Format de sortie (JSON strict):
{{
  "score_global": <nombre>,
  "scores": {{
    "action_requise": <nombre>,
    "delai_legal": <nombre>,
    "documents_obligatoires": <nombre>,
    "impact_financier": <nombre>,
    "consequences_non_conformite": <nombre>
  }},
  "justifications": {{
    "action_requise": "<texte>",
    "delai_legal": "<texte>",
    "documents_obligatoires": "<texte>",
    "impact_financier": "<texte>",
    "consequences_non_conformite": "<texte>"
  }}
}}"#,
        action_requise = ground_truth.action_requise,
        delai_legal = ground_truth.delai_legal,
        documents_obligatoires = ground_truth.documents_obligatoires,
        impact_financier = ground_truth.impact_financier,
        consequences_non_conformite = ground_truth.consequences_non_conformite,
    )
}
