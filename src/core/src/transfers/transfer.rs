use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTransfer {
    pub negotiation_id: u32,
    pub player_id: u32,
    pub player_name: String,
    pub from_club_id: u32,
    pub to_club_id: u32,
    pub transfer_date: NaiveDate,
    pub fee: f64,
    /// Weekly wage agreed with the player
    pub wage: f64,
    pub contract_years: u8,
    pub season_year: u16,
}

impl CompletedTransfer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        negotiation_id: u32,
        player_id: u32,
        player_name: String,
        from_club_id: u32,
        to_club_id: u32,
        transfer_date: NaiveDate,
        fee: f64,
        wage: f64,
        contract_years: u8,
    ) -> Self {
        CompletedTransfer {
            negotiation_id,
            player_id,
            player_name,
            from_club_id,
            to_club_id,
            transfer_date,
            fee,
            wage,
            contract_years,
            season_year: Self::season_of(transfer_date),
        }
    }

    /// Seasons start in August.
    pub fn season_of(date: NaiveDate) -> u16 {
        if date.month() >= 8 {
            date.year() as u16
        } else {
            (date.year() - 1) as u16
        }
    }
}
