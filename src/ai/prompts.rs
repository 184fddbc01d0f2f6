//! Prompt builders for the study and business tools.

/// Grounding instruction of the Digital Brain chat
pub const CHAT_SYSTEM_INSTRUCTION: &str = "Tu es le Cerveau Numérique de Yann's Note. \
Réponds en français, de façon précise et vérifiable, en t'appuyant sur le contexte académique \
et légal camerounais (OHADA, lois du Cameroun). Si tu ne sais pas, dis-le plutôt que d'inventer.";

/// Persona used for study guides
pub const STUDY_GUIDE_SYSTEM_INSTRUCTION: &str =
    "Tu es un expert pédagogique spécialisé dans l'enseignement supérieur francophone.";

/// Structured study guide for a course topic
pub fn study_guide(course_topic: &str) -> String {
    format!(
        "Agis comme un tuteur universitaire expert pour un étudiant camerounais.
Sujet du cours : \"{topic}\".

Génère un Guide d'Étude Structuré contenant :
1. Les 3 concepts clés à maîtriser absolument.
2. Un résumé clair et concis (méthode Feynman).
3. Les pièges fréquents aux examens sur ce sujet.
4. Un mini-quiz de 3 questions avec les réponses à la fin.

Ton : Encourageant, précis, académique.",
        topic = course_topic.trim()
    )
}

/// Inputs of the public-tender (DAO) decoder
#[derive(Debug, Clone, Default)]
pub struct DaoBrief {
    pub keywords: String,
    pub budget: String,
    pub context: String,
}

/// Risk and strategy analysis of a tender file
pub fn dao_analysis(brief: &DaoBrief) -> String {
    format!(
        "Agis comme un expert marchés publics. Analyse: Secteur {}, Budget {}, Contexte {}. \
Identifie 3 risques et 1 stratégie gagnante.",
        brief.keywords.trim(),
        brief.budget.trim(),
        brief.context.trim()
    )
}

/// Inputs of the 24h pitch deck
#[derive(Debug, Clone, Default)]
pub struct PitchBrief {
    pub project_name: String,
    pub problem: String,
    pub solution: String,
}

/// Investor pitch deck outline
pub fn pitch_deck(brief: &PitchBrief) -> String {
    format!(
        "Structure Pitch Deck YC pour {}. Problème: {}. Solution: {}. \
Hook, Problème, Solution, Marché, Business Model.",
        brief.project_name.trim(),
        brief.problem.trim(),
        brief.solution.trim()
    )
}

/// Two-minute podcast script
pub fn podcast_script(topic: &str) -> String {
    format!(
        "Script podcast 2min sur \"{}\". Intro percutante, Corps avec analogie, Outro Call-to-action.",
        topic.trim()
    )
}
