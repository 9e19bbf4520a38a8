//! Preset values offered by the add-habit form.
//!
//! The engine treats categories and colors as opaque labels; these lists are
//! suggestions for hosts, not a closed set.

/// Suggested category labels, in display order.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Health & Fitness",
    "Productivity",
    "Learning",
    "Mindfulness",
    "Social",
    "Creative",
    "Finance",
    "Personal Care",
    "Other",
];

/// Suggested color tokens (purple, pink, red, orange, yellow, green, cyan,
/// blue, indigo, violet).
pub const DEFAULT_COLORS: &[&str] = &[
    "#8B5CF6", "#EC4899", "#EF4444", "#F97316", "#EAB308", "#22C55E", "#06B6D4", "#3B82F6",
    "#6366F1", "#A855F7",
];

/// Color preselected for new drafts.
pub const DEFAULT_COLOR: &str = "#8B5CF6";

/// Days per week preselected for new drafts ("every day").
pub const DEFAULT_TARGET_FREQUENCY: u8 = 7;

/// Human label for a weekly target, as shown by the add-habit form.
pub fn target_frequency_label(target_frequency: u8) -> String {
    match target_frequency {
        7 => "Every day".to_string(),
        1 => "1 day per week".to_string(),
        days => format!("{days} days per week"),
    }
}
