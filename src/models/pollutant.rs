use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Pollutants with a published breakpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PollutantKind {
    #[default]
    Pm25,
    Pm10,
    No2,
    O3,
}

impl PollutantKind {
    pub const ALL: [PollutantKind; 4] = [
        PollutantKind::Pm25,
        PollutantKind::Pm10,
        PollutantKind::No2,
        PollutantKind::O3,
    ];

    /// Parse a request token. Matching ignores case and surrounding
    /// whitespace; anything unrecognized is treated as PM2.5.
    pub fn from_token(token: &str) -> Self {
        Self::recognize(token).unwrap_or_default()
    }

    /// Strict variant of [`from_token`](Self::from_token).
    pub fn recognize(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "pm25" => Some(PollutantKind::Pm25),
            "pm10" => Some(PollutantKind::Pm10),
            "no2" => Some(PollutantKind::No2),
            "o3" => Some(PollutantKind::O3),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            PollutantKind::Pm25 => "pm25",
            PollutantKind::Pm10 => "pm10",
            PollutantKind::No2 => "no2",
            PollutantKind::O3 => "o3",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PollutantKind::Pm25 => "PM2.5",
            PollutantKind::Pm10 => "PM10",
            PollutantKind::No2 => "NO2",
            PollutantKind::O3 => "O3",
        }
    }

    pub fn units(&self) -> &'static str {
        "µg/m³"
    }
}

impl fmt::Display for PollutantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl Serialize for PollutantKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for PollutantKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(PollutantKind::from_token(&token))
    }
}
