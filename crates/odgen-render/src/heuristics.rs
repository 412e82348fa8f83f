//! Keyword heuristics used while laying out the schedule table.
//!
//! Both heuristics are plain function pointers so a renderer can be built
//! with a different vocabulary without touching the layout code:
//!
//! ```rust
//! use odgen_render::heuristics::{keyword_palette, ActivityPalette, NEUTRAL};
//!
//! fn monochrome(_label: &str) -> u32 {
//!     NEUTRAL
//! }
//!
//! let palette: ActivityPalette = monochrome;
//! assert_eq!(palette("ALMOÇO"), NEUTRAL);
//! assert_ne!(keyword_palette("ALMOÇO"), NEUTRAL);
//! ```

/// Background color (0xRRGGBB) for a fixed activity, chosen from its label
pub type ActivityPalette = fn(&str) -> u32;

/// Department hints derived from a scene's continuity notes
pub type ContinuityHints = fn(&str) -> DepartmentHints;

/// Breakfast / coffee
pub const COFFEE: u32 = 0xFFF2CC;
/// Lunch and other meals
pub const MEAL: u32 = 0xFCE5CD;
/// Preparation
pub const PREP: u32 = 0xE1F5FE;
/// Wrap ("desprodução")
pub const WRAP: u32 = 0xF3E5F5;
/// Anything else
pub const NEUTRAL: u32 = 0xF5F5F5;

const COFFEE_WORDS: &[&str] = &["CAFÉ", "CAFE"];
const MEAL_WORDS: &[&str] = &["REFEIÇÃO", "REFEICAO", "ALMOÇO", "ALMOCO"];
const PREP_WORDS: &[&str] = &["PREPARAÇÃO", "PREPARACAO"];
const WRAP_WORDS: &[&str] = &["DESPRODUÇÃO", "DESPRODUCAO"];

const WARDROBE_WORDS: &[&str] = &["uniforme", "figurino", "roupa", "blusa"];
const ART_WORDS: &[&str] = &["crachá", "cracha", "foto", "câmera", "camera", "abajur"];

/// Continuity text routed to the wardrobe and art columns
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DepartmentHints {
    pub wardrobe: String,
    pub art: String,
}

fn contains_any(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|w| haystack.contains(w))
}

/// Default palette: first matching keyword group wins, in the order
/// coffee, meal, prep, wrap.
pub fn keyword_palette(label: &str) -> u32 {
    let label = label.to_uppercase();
    if contains_any(&label, COFFEE_WORDS) {
        COFFEE
    } else if contains_any(&label, MEAL_WORDS) {
        MEAL
    } else if contains_any(&label, PREP_WORDS) {
        PREP
    } else if contains_any(&label, WRAP_WORDS) {
        WRAP
    } else {
        NEUTRAL
    }
}

/// Default hints: the whole note goes to a department column when it
/// mentions one of that department's keywords. A note can feed both.
pub fn keyword_hints(continuity: &str) -> DepartmentHints {
    let lower = continuity.to_lowercase();
    let pick = |words: &[&str]| {
        if contains_any(&lower, words) {
            continuity.to_string()
        } else {
            String::new()
        }
    };
    DepartmentHints {
        wardrobe: pick(WARDROBE_WORDS),
        art: pick(ART_WORDS),
    }
}
