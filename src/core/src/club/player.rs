use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Squad role ladder, ordered from least to most prominent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerSquadRole {
    Prospect,
    Rotation,
    Important,
    Key,
    Star,
}

impl PlayerSquadRole {
    pub fn index(self) -> u8 {
        match self {
            PlayerSquadRole::Prospect => 0,
            PlayerSquadRole::Rotation => 1,
            PlayerSquadRole::Important => 2,
            PlayerSquadRole::Key => 3,
            PlayerSquadRole::Star => 4,
        }
    }
}

impl Display for PlayerSquadRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerSquadRole::Prospect => "prospect",
            PlayerSquadRole::Rotation => "rotation",
            PlayerSquadRole::Important => "important",
            PlayerSquadRole::Key => "key",
            PlayerSquadRole::Star => "star",
        };

        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAgent {
    /// 0-100
    pub stubbornness: u8,
    /// Agent's cut of the signing, in percent
    pub fee_pct: f32,
}

impl Default for PlayerAgent {
    fn default() -> Self {
        PlayerAgent {
            stubbornness: 50,
            fee_pct: 5.0,
        }
    }
}

/// The slice of a player the transfer core reads. Attributes, training and
/// generation live elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub club_id: u32,
    pub market_value: f64,
    /// Weekly wage
    pub current_salary: f64,
    pub squad_role: PlayerSquadRole,
    pub agent: PlayerAgent,
}

impl Player {
    pub fn new(id: u32, name: String, club_id: u32, market_value: f64, current_salary: f64) -> Self {
        Player {
            id,
            name,
            club_id,
            market_value,
            current_salary,
            squad_role: PlayerSquadRole::Rotation,
            agent: PlayerAgent::default(),
        }
    }

    pub fn with_role(mut self, role: PlayerSquadRole) -> Self {
        self.squad_role = role;
        self
    }

    pub fn with_agent(mut self, agent: PlayerAgent) -> Self {
        self.agent = agent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ladder_is_ordered() {
        assert!(PlayerSquadRole::Star > PlayerSquadRole::Key);
        assert!(PlayerSquadRole::Prospect < PlayerSquadRole::Rotation);
        assert_eq!(PlayerSquadRole::Important.index(), 2);
        assert_eq!(PlayerSquadRole::Key.to_string(), "key");
    }
}
