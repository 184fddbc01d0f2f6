//! Offers and contact details shown on the marketing pages.

use serde::Serialize;

pub const WHATSAPP_NUMBER: &str = "676042996";

/// Cameroon country code prefix for WhatsApp links
const WHATSAPP_COUNTRY_CODE: &str = "237";

/// Direct WhatsApp link to the team
pub fn whatsapp_link() -> String {
    format!("https://wa.me/{}{}", WHATSAPP_COUNTRY_CODE, WHATSAPP_NUMBER)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingPlan {
    Student,
    Entrepreneur,
    Expert,
}

/// A priced offer
#[derive(Debug, Clone, Serialize)]
pub struct Offer {
    pub id: PricingPlan,
    pub title: &'static str,
    pub price: &'static str,
    pub features: &'static [&'static str],
    pub cta: &'static str,
}

pub const PRICING: [Offer; 3] = [
    Offer {
        id: PricingPlan::Student,
        title: "Succès Académique",
        price: "2 000 FCFA",
        features: &[
            "Fiche Audio Zéro Data",
            "Guide d'étude personnalisé",
            "Accès basique au Hub",
        ],
        cta: "Je réussis mes examens",
    },
    Offer {
        id: PricingPlan::Entrepreneur,
        title: "Entrepreneur",
        price: "15k - 50k FCFA",
        features: &[
            "Pitch Deck 24h",
            "Sermon Podcast Express",
            "Formalisation Flash",
        ],
        cta: "Je booste mon business",
    },
    Offer {
        id: PricingPlan::Expert,
        title: "Expert DAO",
        price: "120 000+ FCFA",
        features: &[
            "Décodeur DAO (Marchés Publics)",
            "Analyse stratégique complète",
            "Support prioritaire",
        ],
        cta: "Je gagne des marchés",
    },
];
