use crate::club::Club;
use crate::error::SchedulingError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Reputation tier of the Swiss draw. Pot 1 holds the strongest clubs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub number: usize,
    pub club_ids: Vec<u32>,
}

pub struct ContinentalQualification;

impl ContinentalQualification {
    /// Picks exactly `count` clubs. Qualified clubs come first; any shortfall
    /// is filled from the remaining clubs by descending reputation. The result
    /// is ordered by descending reputation, ties broken by club id.
    pub fn select(clubs: &[Club], count: usize) -> Result<Vec<Club>, SchedulingError> {
        let mut seen = HashSet::with_capacity(clubs.len());
        for club in clubs {
            if !seen.insert(club.id) {
                return Err(SchedulingError::DuplicateClub(club.id));
            }
        }

        if clubs.len() < count {
            return Err(SchedulingError::NotEnoughParticipants {
                required: count,
                found: clubs.len(),
            });
        }

        let (mut qualified, mut others): (Vec<&Club>, Vec<&Club>) =
            clubs.iter().partition(|c| c.continental);

        Self::sort_by_reputation(&mut qualified);
        Self::sort_by_reputation(&mut others);

        if qualified.len() > count {
            debug!(
                "{} qualified clubs for {} places, dropping the weakest",
                qualified.len(),
                count
            );
            qualified.truncate(count);
        }

        let shortfall = count - qualified.len();
        if shortfall > 0 {
            info!("backfilling {} continental places by reputation", shortfall);
        }

        let mut selected: Vec<&Club> = qualified;
        selected.extend(others.into_iter().take(shortfall));
        Self::sort_by_reputation(&mut selected);

        Ok(selected.into_iter().cloned().collect())
    }

    /// Splits a reputation-ordered selection into consecutive pots.
    pub fn into_pots(
        selected: &[Club],
        pots_count: usize,
        pot_size: usize,
    ) -> Result<Vec<Pot>, SchedulingError> {
        if selected.len() != pots_count * pot_size {
            return Err(SchedulingError::NotEnoughParticipants {
                required: pots_count * pot_size,
                found: selected.len(),
            });
        }

        Ok(selected
            .chunks(pot_size)
            .enumerate()
            .map(|(idx, chunk)| Pot {
                number: idx + 1,
                club_ids: chunk.iter().map(|c| c.id).collect(),
            })
            .collect())
    }

    fn sort_by_reputation(clubs: &mut [&Club]) {
        clubs.sort_by(|a, b| b.reputation.cmp(&a.reputation).then(a.id.cmp(&b.id)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::{ClubReputation, MatchOutcome};

    fn club(id: u32, reputation: u8, qualified: bool) -> Club {
        let club = Club::new(id, format!("Club {}", id), reputation);
        if qualified { club.qualified() } else { club }
    }

    #[test]
    fn shortfall_is_backfilled_by_reputation() {
        let mut clubs: Vec<Club> = (1..=30).map(|id| club(id, 50, true)).collect();
        clubs.extend((31..=45).map(|id| club(id, (id - 30) as u8, false)));

        let selected = ContinentalQualification::select(&clubs, 36).unwrap();

        assert_eq!(selected.len(), 36);

        let backfilled: Vec<u32> = selected.iter().filter(|c| !c.continental).map(|c| c.id).collect();
        assert_eq!(backfilled, vec![45, 44, 43, 42, 41, 40]);
    }

    #[test]
    fn surplus_keeps_strongest_qualifiers() {
        let clubs: Vec<Club> = (1..=40).map(|id| club(id, id as u8 + 10, true)).collect();

        let selected = ContinentalQualification::select(&clubs, 36).unwrap();

        assert_eq!(selected.first().unwrap().id, 40);
        assert!(selected.iter().all(|c| c.id > 4));
    }

    #[test]
    fn pots_follow_reputation_order() {
        let clubs: Vec<Club> = (1..=36).map(|id| club(id, id as u8, true)).collect();

        let selected = ContinentalQualification::select(&clubs, 36).unwrap();
        let pots = ContinentalQualification::into_pots(&selected, 4, 9).unwrap();

        assert_eq!(pots.len(), 4);
        assert_eq!(pots[0].number, 1);
        assert_eq!(pots[0].club_ids, (28..=36).rev().collect::<Vec<u32>>());
        assert_eq!(pots[3].club_ids, (1..=9).rev().collect::<Vec<u32>>());
    }

    #[test]
    fn refreshed_reputation_decides_selection() {
        let mut clubs: Vec<Club> = (1..=40).map(|id| club(id, id as u8 + 10, true)).collect();
        let mut form = ClubReputation::new(clubs[0].reputation);

        for _ in 0..60 {
            form.process_match(MatchOutcome::Win, 90);
        }

        clubs[0].refresh_reputation(&form);

        let selected = ContinentalQualification::select(&clubs, 36).unwrap();
        let pots = ContinentalQualification::into_pots(&selected, 4, 9).unwrap();

        assert!(selected.iter().any(|c| c.id == 1));
        assert!(!selected.iter().any(|c| c.id == 5));
        assert!(pots[0].club_ids.contains(&1));
    }

    #[test]
    fn too_few_clubs_is_an_error() {
        let clubs: Vec<Club> = (1..=20).map(|id| club(id, 60, true)).collect();

        assert_eq!(
            ContinentalQualification::select(&clubs, 36).unwrap_err(),
            SchedulingError::NotEnoughParticipants { required: 36, found: 20 }
        );
    }
}
