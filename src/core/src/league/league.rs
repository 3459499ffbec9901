use crate::error::SchedulingError;
use crate::league::{LeagueSchedule, RoundRobinScheduler};
use crate::shared::IdAllocator;
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct League {
    pub id: u32,
    pub name: String,
    pub club_ids: Vec<u32>,
    /// Match dates supplied for the season, one per round
    pub dates: Vec<NaiveDate>,
}

impl League {
    pub fn new(id: u32, name: String, club_ids: Vec<u32>, dates: Vec<NaiveDate>) -> Self {
        League {
            id,
            name,
            club_ids,
            dates,
        }
    }

    pub fn rounds_required(&self) -> usize {
        self.club_ids.len().saturating_sub(1) * 2
    }

    pub fn generate_schedule(&self, ids: &mut IdAllocator) -> Result<LeagueSchedule, SchedulingError> {
        info!("⚽ generating schedule: {} ({} clubs)", self.name, self.club_ids.len());

        RoundRobinScheduler::generate(&self.club_ids, &self.name, &self.dates, ids)
    }
}
