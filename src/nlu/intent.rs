//! # Intent Classifier — Keyword Overlap over Health Intents
//!
//! The [`IntentClassifier`] tags every inbound message with one of ~30
//! health intents. The tag feeds telemetry only (per-intent hit counters);
//! it never changes the triage answer.
//!
//! ## Scoring
//!
//! ```text
//! message ──normalise──► for each category in table order:
//!                          matched = keywords contained in message
//!                          confidence = min(|matched| / 2, 1)
//!                        ──► best category, or Unknown (0.1)
//! ```
//!
//! | Comparison | Winner |
//! |------------|--------|
//! | higher confidence | that category |
//! | equal confidence, strictly more keywords | that category |
//! | otherwise | the earlier category in table order |
//!
//! Containment is plain substring matching, so `"hi"` fires inside
//! `"high"`. The table is kept as it is; see [`crate::nlu`] for where that
//! permissiveness is isolated.

use serde::Serialize;

use super::{matching_phrases, normalize};

/// Intent name returned when no keyword matches.
pub const UNKNOWN_INTENT: &str = "Unknown";

/// Confidence reported for [`UNKNOWN_INTENT`].
pub const UNKNOWN_CONFIDENCE: f64 = 0.1;

/// One row of the intent table.
#[derive(Clone, Copy, Debug)]
pub struct IntentCategory {
    pub name: &'static str,
    /// Lower-case keywords or phrases, English and Krio mixed.
    pub keywords: &'static [&'static str],
}

/// The health intent table, in tie-break order.
pub const HEALTH_INTENTS: &[IntentCategory] = &[
    IntentCategory {
        name: "Greeting",
        keywords: &["hello", "hi", "hey", "kushe", "aw di bodi", "good morning", "good afternoon", "good evening"],
    },
    IntentCategory {
        name: "Symptom Check",
        keywords: &[
            "fever", "headache", "pain", "cough", "sick", "sik", "fiba", "belly", "vomit", "diarrhea",
            "rash", "itch", "swelling", "bleeding", "tired", "weak", "body pain", "joint pain",
            "red eyes", "dizzy", "pale", "yellow skin", "yellow eyes", "jaundice", "blood in urine",
            "blood in stool", "constipation", "cold", "flu", "sneeze", "trembling",
        ],
    },
    IntentCategory {
        name: "Malaria Query",
        keywords: &["malaria", "mosquito", "antimalarial", "act", "coartem"],
    },
    IntentCategory {
        name: "Cholera Query",
        keywords: &["cholera", "watery stool", "ors", "dehydration"],
    },
    IntentCategory {
        name: "Typhoid Query",
        keywords: &["typhoid", "widal"],
    },
    IntentCategory {
        name: "COVID Query",
        keywords: &["covid", "corona", "coronavirus", "vaccine", "vaccination"],
    },
    IntentCategory {
        name: "TB Query",
        keywords: &[
            "tuberculosis", "tb", "dots", "cough more than 2 weeks", "night sweat", "weight loss",
            "chest pain",
        ],
    },
    IntentCategory {
        name: "VHF Query",
        keywords: &[
            "ebola", "lassa fever", "marburg", "bleeding from nose", "bleeding from gums",
            "hemorrhagic",
        ],
    },
    IntentCategory {
        name: "Pregnancy Query",
        keywords: &[
            "pregnant", "pregnancy", "antenatal", "baby", "pikin", "bele", "labor", "delivery",
            "breastfeed", "birth control", "contraception", "family planning", "miscarriage",
            "complication", "bleeding in pregnancy", "morning sickness", "folic acid", "iron tablet",
        ],
    },
    IntentCategory {
        name: "Child Health",
        keywords: &[
            "child", "pikin", "baby", "infant", "immunization", "vaccination", "growth", "feeding",
            "under five", "measles", "polio", "pentavalent",
        ],
    },
    IntentCategory {
        name: "Facility Query",
        keywords: &[
            "hospital", "clinic", "health center", "ospitul", "where", "location", "address", "open",
            "hours",
        ],
    },
    IntentCategory {
        name: "Medication Query",
        keywords: &[
            "medicine", "drug", "tablet", "pill", "dose", "paracetamol", "antibiotic", "intake",
            "overdose", "side effect", "damage", "harm", "excessive", "capsule", "syrup", "injection",
            "treatment",
        ],
    },
    IntentCategory {
        name: "Prevention Query",
        keywords: &["prevent", "protection", "avoid", "how to", "what is", "explain", "educate"],
    },
    IntentCategory {
        name: "Emergency",
        keywords: &[
            "emergency", "urgent", "help", "dying", "unconscious", "bleeding", "accident", "poison",
            "cannot breathe",
        ],
    },
    IntentCategory {
        name: "Escalation Request",
        keywords: &["escalate", "human", "nurse", "doctor", "person", "talk to", "speak to"],
    },
    IntentCategory {
        name: "Health Alert Query",
        keywords: &["outbreak", "alert", "news", "campaign", "what happening"],
    },
    IntentCategory {
        name: "General Health",
        keywords: &[
            "health", "healthy", "wellness", "nutrition", "diet", "exercise", "water", "hygiene",
            "fitness", "lifestyle",
        ],
    },
    IntentCategory {
        name: "NCD Query",
        keywords: &[
            "diabetes", "sugar", "hypertension", "blood pressure", "high bp", "heart", "stroke",
            "cancer", "sickle cell", "asthma",
        ],
    },
    IntentCategory {
        name: "Mental Health",
        keywords: &[
            "mental", "depression", "anxiety", "stress", "suicide", "suicidal", "trauma", "grief",
            "sad", "cannot sleep", "worry", "madness", "psychology",
        ],
    },
    IntentCategory {
        name: "SGBV Query",
        keywords: &[
            "rape", "sexual assault", "domestic violence", "abuse", "beating", "violence",
            "hurt by partner", "forced sex", "harassment",
        ],
    },
    IntentCategory {
        name: "STI/HIV Query",
        keywords: &[
            "sti", "std", "hiv", "aids", "syphilis", "gonorrhea", "discharge", "sore on private part",
            "burning sensation", "safe sex", "condom",
        ],
    },
    IntentCategory {
        name: "Sexual Anatomy",
        keywords: &[
            "penis", "vagina", "anatomy", "size", "growth", "development", "body change", "puberty",
            "erection",
        ],
    },
    IntentCategory {
        name: "WASH Query",
        keywords: &[
            "water", "sanitation", "toilet", "hygiene", "latrine", "garbage", "waste", "dirty water",
            "handwash", "soap", "chlorine", "clean wata",
        ],
    },
    IntentCategory {
        name: "Nutrition Query",
        keywords: &[
            "malnutrition", "stunting", "underweight", "vitamin", "protein", "balanced diet",
            "breastfeeding", "kwashiorkor", "marasmus",
        ],
    },
    IntentCategory {
        name: "First Aid",
        keywords: &[
            "first aid", "burn", "wound", "injury", "snake bite", "dog bite", "cut", "bleed",
            "accident", "fracture", "broken bone",
        ],
    },
    IntentCategory {
        name: "Zoonotic Query",
        keywords: &["rabies", "monkeypox", "animal bite", "bat", "rat", "bushmeat"],
    },
    IntentCategory {
        name: "Sensory Query",
        keywords: &[
            "eye", "blind", "ear", "deaf", "cataract", "glaucoma", "ear discharge", "hearing",
            "vision",
        ],
    },
    IntentCategory {
        name: "Dental Query",
        keywords: &["tooth", "teeth", "gum", "dentist", "toothache", "mouth sore"],
    },
    IntentCategory {
        name: "Skin Query",
        keywords: &["skin", "scabies", "krawl-krawl", "fungal", "ringworm", "eczema", "sores"],
    },
];

/// Result of classifying one message.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IntentResult {
    /// Category name, or [`UNKNOWN_INTENT`].
    pub intent: String,
    pub confidence: f64,
    /// Keywords of the winning category found in the message, in table order.
    pub matched_keywords: Vec<String>,
}

impl IntentResult {
    fn unknown() -> Self {
        Self {
            intent: UNKNOWN_INTENT.to_string(),
            confidence: UNKNOWN_CONFIDENCE,
            matched_keywords: Vec::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.matched_keywords.is_empty()
    }
}

/// Stateless keyword-overlap classifier.
#[derive(Clone, Debug)]
pub struct IntentClassifier {
    categories: &'static [IntentCategory],
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Classifier over [`HEALTH_INTENTS`].
    pub fn new() -> Self {
        Self::with_categories(HEALTH_INTENTS)
    }

    pub fn with_categories(categories: &'static [IntentCategory]) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &'static [IntentCategory] {
        self.categories
    }

    /// Classifies a message. Never fails; unmatched text is [`UNKNOWN_INTENT`].
    pub fn classify(&self, text: &str) -> IntentResult {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return IntentResult::unknown();
        }

        let mut best: Option<(&IntentCategory, f64, Vec<&str>)> = None;
        for category in self.categories {
            let matched = matching_phrases(&normalized, category.keywords);
            if matched.is_empty() {
                continue;
            }
            let confidence = (matched.len() as f64 / 2.0).min(1.0);
            let better = match &best {
                None => true,
                Some((_, c, m)) => {
                    confidence > *c || (confidence == *c && matched.len() > m.len())
                }
            };
            if better {
                best = Some((category, confidence, matched));
            }
        }

        match best {
            Some((category, confidence, matched)) => IntentResult {
                intent: category.name.to_string(),
                confidence,
                matched_keywords: matched.into_iter().map(str::to_string).collect(),
            },
            None => IntentResult::unknown(),
        }
    }
}
