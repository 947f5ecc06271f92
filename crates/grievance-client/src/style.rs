//! Grievance Client Style
//!
//! Presentation lookups shared by the front-ends: badge classes for statuses,
//! priorities and request types, and the stat card model. Unknown names
//! always fall back to the gray style.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::fmt::Display;

pub const GRAY_BADGE: &str = "text-gray-600 bg-gray-50 border-gray-200";
pub const GRAY_STATUS_BADGE: &str = "bg-gray-100 text-gray-800 border-gray-200";

/// Badge classes for a status name.
pub fn status_style(name: &str) -> &'static str {
    match name {
        "Pending" => "bg-yellow-100 text-yellow-800 border-yellow-200",
        "Active" => "bg-blue-100 text-blue-800 border-blue-200",
        "Dev" => "bg-purple-100 text-purple-800 border-purple-200",
        "Stag" => "bg-indigo-100 text-indigo-800 border-indigo-200",
        "Uat" => "bg-orange-100 text-orange-800 border-orange-200",
        "Live" => "bg-green-100 text-green-800 border-green-200",
        "Closed" => "bg-gray-100 text-gray-800 border-gray-200",
        _ => GRAY_STATUS_BADGE,
    }
}

/// Badge classes for a priority name.
pub fn priority_style(name: &str) -> &'static str {
    match name {
        "High" => "text-red-600 bg-red-50 border-red-200",
        "Medium" => "text-yellow-600 bg-yellow-50 border-yellow-200",
        "Low" => "text-green-600 bg-green-50 border-green-200",
        _ => GRAY_BADGE,
    }
}

/// Icon color for a priority in list rows.
pub fn priority_icon_style(name: &str) -> &'static str {
    match name {
        "High" => "text-red-500",
        "Medium" => "text-yellow-500",
        "Low" => "text-green-500",
        _ => "text-gray-500",
    }
}

/// Badge classes for a request type name.
pub fn request_type_style(name: &str) -> &'static str {
    match name {
        "New Development" => "text-blue-600 bg-blue-50 border-blue-200",
        "Data Change" => "text-orange-600 bg-orange-50 border-orange-200",
        "System Bug" => "text-red-600 bg-red-50 border-red-200",
        _ => GRAY_BADGE,
    }
}

// =============================================================================
// Stat Cards
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardColor {
    Blue,
    Green,
    Yellow,
    Red,
    Purple,
    Indigo,
    #[default]
    Gray,
}

impl CardColor {
    /// Parse a color name; unknown names are gray.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "blue" => CardColor::Blue,
            "green" => CardColor::Green,
            "yellow" => CardColor::Yellow,
            "red" => CardColor::Red,
            "purple" => CardColor::Purple,
            "indigo" => CardColor::Indigo,
            _ => CardColor::Gray,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CardColor::Blue => "blue",
            CardColor::Green => "green",
            CardColor::Yellow => "yellow",
            CardColor::Red => "red",
            CardColor::Purple => "purple",
            CardColor::Indigo => "indigo",
            CardColor::Gray => "gray",
        }
    }

    /// Icon text class, e.g. `text-blue-600`.
    pub fn text_class(&self) -> String {
        format!("text-{}-600", self.name())
    }

    /// Icon background class, e.g. `bg-blue-50`.
    pub fn background_class(&self) -> String {
        format!("bg-{}-50", self.name())
    }
}

/// One summary tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub color: CardColor,
}

impl Default for StatCard {
    fn default() -> Self {
        Self {
            title: "N/A".to_string(),
            value: "0".to_string(),
            color: CardColor::Gray,
        }
    }
}

impl StatCard {
    pub fn new(title: impl Into<String>, value: impl Display, color: CardColor) -> Self {
        Self {
            title: title.into(),
            value: value.to_string(),
            color,
        }
    }

    /// Build a card from loosely specified parts, applying the fallbacks.
    pub fn from_parts(title: Option<&str>, value: Option<&str>, color: Option<&str>) -> Self {
        let fallback = Self::default();
        Self {
            title: title
                .filter(|t| !t.trim().is_empty())
                .map(str::to_string)
                .unwrap_or(fallback.title),
            value: value
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
                .unwrap_or(fallback.value),
            color: color.map(CardColor::from_name).unwrap_or(fallback.color),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_styles() {
        assert!(status_style("Pending").contains("yellow"));
        assert!(status_style("Uat").contains("orange"));
        assert_eq!(status_style("Frozen"), GRAY_STATUS_BADGE);
        assert_eq!(status_style(""), GRAY_STATUS_BADGE);
    }

    #[test]
    fn test_priority_and_type_fallbacks() {
        assert!(priority_style("High").contains("red"));
        assert_eq!(priority_style("Urgent"), GRAY_BADGE);
        assert_eq!(priority_icon_style("Urgent"), "text-gray-500");
        assert!(request_type_style("Data Change").contains("orange"));
        assert_eq!(request_type_style("Training"), GRAY_BADGE);
    }

    #[test]
    fn test_stat_card_fallbacks() {
        let card = StatCard::from_parts(None, None, None);
        assert_eq!(card.title, "N/A");
        assert_eq!(card.value, "0");
        assert_eq!(card.color, CardColor::Gray);

        let card = StatCard::from_parts(Some("Pending"), Some("4"), Some("teal"));
        assert_eq!(card.title, "Pending");
        assert_eq!(card.value, "4");
        assert_eq!(card.color, CardColor::Gray);

        assert_eq!(CardColor::from_name("Purple"), CardColor::Purple);
        assert_eq!(CardColor::Indigo.text_class(), "text-indigo-600");
        assert_eq!(CardColor::Green.background_class(), "bg-green-50");
    }

    #[test]
    fn test_stat_card_rebuilt_from_parts() {
        let colors = [
            CardColor::Blue,
            CardColor::Green,
            CardColor::Yellow,
            CardColor::Red,
            CardColor::Purple,
            CardColor::Indigo,
            CardColor::Gray,
        ];
        for color in colors {
            let card = StatCard::new("Pending", 3, color);
            let rebuilt = StatCard::from_parts(Some(&card.title), Some(&card.value), Some(card.color.name()));
            assert_eq!(rebuilt, card);
        }

        let blank = StatCard::from_parts(Some("  "), Some(""), Some("Blue"));
        assert_eq!(blank.title, "N/A");
        assert_eq!(blank.value, "0");
        assert_eq!(blank.color, CardColor::Blue);
    }
}
