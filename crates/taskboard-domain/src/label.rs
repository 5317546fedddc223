use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type LabelId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelColor {
    Red,
    Orange,
    Yellow,
    Green,
    Teal,
    Blue,
    Purple,
    Pink,
    Gray,
}

impl LabelColor {
    pub const PALETTE: [LabelColor; 9] = [
        LabelColor::Red,
        LabelColor::Orange,
        LabelColor::Yellow,
        LabelColor::Green,
        LabelColor::Teal,
        LabelColor::Blue,
        LabelColor::Purple,
        LabelColor::Pink,
        LabelColor::Gray,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Teal => "teal",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Gray => "gray",
        }
    }
}

impl fmt::Display for LabelColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        let lower = if lower == "grey" { "gray".to_string() } else { lower };
        Self::PALETTE
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| format!("Invalid label color: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
    pub color: LabelColor,
}

impl Label {
    pub fn new(name: String, color: LabelColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!("Red".parse::<LabelColor>().unwrap(), LabelColor::Red);
        assert_eq!("grey".parse::<LabelColor>().unwrap(), LabelColor::Gray);
        assert!("magenta".parse::<LabelColor>().is_err());
    }

    #[test]
    fn test_color_serializes_lowercase() {
        let label = Label::new("backend".to_string(), LabelColor::Teal);
        let json = serde_json::to_value(&label).unwrap();
        assert_eq!(json["color"], "teal");
        assert_eq!(json["name"], "backend");
    }
}
