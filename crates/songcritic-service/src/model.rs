/// Models the critique can be requested from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CritiqueModel {
    /// Lower-capability default model
    #[default]
    Flash,
    /// Higher-capability model
    Pro,
}

impl CritiqueModel {
    /// Identifier sent to the remote service
    pub fn id(&self) -> &'static str {
        match self {
            CritiqueModel::Flash => "gemini-2.5-flash",
            CritiqueModel::Pro => "gemini-2.5-pro",
        }
    }

    /// Sampling temperature for this model tier. Fixed per tier, not configurable.
    pub fn temperature(&self) -> f64 {
        match self {
            CritiqueModel::Flash => 0.0,
            CritiqueModel::Pro => 0.1,
        }
    }
}

impl std::fmt::Display for CritiqueModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for CritiqueModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flash" | "gemini-2.5-flash" => Ok(CritiqueModel::Flash),
            "pro" | "gemini-2.5-pro" => Ok(CritiqueModel::Pro),
            _ => Err(format!("Unknown model: {}", s)),
        }
    }
}
