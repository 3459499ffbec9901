use crate::error::{IdsExhausted, SchedulingError};
use crate::schedule::{BracketSlot, Fixture, FixtureRound};
use crate::shared::IdAllocator;
use chrono::NaiveDate;
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnockoutDates {
    pub round_of_16: NaiveDate,
    pub quarter_final: NaiveDate,
    pub semi_final: NaiveDate,
    pub final_match: NaiveDate,
}

/// Single elimination from the round of 16. Fixtures are created from the
/// final downwards so every fixture can link to the one its winner plays next.
pub struct KnockoutBracketBuilder;

impl KnockoutBracketBuilder {
    pub const SEEDS: usize = 16;

    pub fn build<R: Rng + ?Sized>(
        seeds: &[u32],
        dates: &KnockoutDates,
        competition: &str,
        ids: &mut IdAllocator,
        rng: &mut R,
    ) -> Result<Vec<Fixture>, SchedulingError> {
        if seeds.len() != Self::SEEDS {
            return Err(SchedulingError::InvalidSeedCount {
                expected: Self::SEEDS,
                found: seeds.len(),
            });
        }

        let mut unique = HashSet::with_capacity(seeds.len());
        for &seed in seeds {
            if !unique.insert(seed) {
                return Err(SchedulingError::DuplicateClub(seed));
            }
        }

        let mut seeds = seeds.to_vec();
        seeds.shuffle(rng);

        let final_match = Fixture::knockout(ids.allocate()?, dates.final_match, competition, FixtureRound::Final);

        let semi_finals =
            Self::feeder_round(&[&final_match], dates.semi_final, competition, FixtureRound::SemiFinal, ids)?;
        let quarter_finals = Self::feeder_round(
            &semi_finals.iter().collect::<Vec<_>>(),
            dates.quarter_final,
            competition,
            FixtureRound::QuarterFinal,
            ids,
        )?;
        let round_of_16: Vec<Fixture> = Self::feeder_round(
            &quarter_finals.iter().collect::<Vec<_>>(),
            dates.round_of_16,
            competition,
            FixtureRound::RoundOf16,
            ids,
        )?
        .into_iter()
        .zip(seeds.chunks(2))
        .map(|(fixture, pair)| fixture.with_participants(pair[0], pair[1]))
        .collect();

        debug!(
            "{} bracket: final {}, {} fixtures in total",
            competition,
            final_match.id,
            1 + semi_finals.len() + quarter_finals.len() + round_of_16.len()
        );

        let mut fixtures = vec![final_match];
        fixtures.extend(semi_finals);
        fixtures.extend(quarter_finals);
        fixtures.extend(round_of_16);

        Ok(fixtures)
    }

    /// Two fixtures per target: the first feeds its home slot, the second its away slot.
    fn feeder_round(
        targets: &[&Fixture],
        date: NaiveDate,
        competition: &str,
        round: FixtureRound,
        ids: &mut IdAllocator,
    ) -> Result<Vec<Fixture>, IdsExhausted> {
        targets
            .iter()
            .flat_map(|target| [(target.id, BracketSlot::Home), (target.id, BracketSlot::Away)])
            .map(|(target_id, slot)| -> Result<Fixture, IdsExhausted> {
                Ok(Fixture::knockout(ids.allocate()?, date, competition, round).linked_to(target_id, slot))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn dates() -> KnockoutDates {
        KnockoutDates {
            round_of_16: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
            quarter_final: NaiveDate::from_ymd_opt(2026, 4, 7).unwrap(),
            semi_final: NaiveDate::from_ymd_opt(2026, 4, 28).unwrap(),
            final_match: NaiveDate::from_ymd_opt(2026, 5, 30).unwrap(),
        }
    }

    fn build(seed: u64) -> Vec<Fixture> {
        let seeds: Vec<u32> = (101..=116).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        KnockoutBracketBuilder::build(&seeds, &dates(), "Champions Cup", &mut IdAllocator::new(), &mut rng)
            .unwrap()
    }

    #[test]
    fn bracket_has_fifteen_fixtures_per_round() {
        let fixtures = build(1);

        let count = |round: FixtureRound| fixtures.iter().filter(|f| f.round == Some(round)).count();

        assert_eq!(fixtures.len(), 15);
        assert_eq!(count(FixtureRound::RoundOf16), 8);
        assert_eq!(count(FixtureRound::QuarterFinal), 4);
        assert_eq!(count(FixtureRound::SemiFinal), 2);
        assert_eq!(count(FixtureRound::Final), 1);
        assert!(fixtures.iter().all(|f| f.is_knockout));
    }

    #[test]
    fn links_form_a_tree_rooted_at_final() {
        let fixtures = build(2);
        let by_id: HashMap<u32, &Fixture> = fixtures.iter().map(|f| (f.id, f)).collect();

        let final_id = fixtures.iter().find(|f| f.round == Some(FixtureRound::Final)).unwrap().id;
        assert!(by_id[&final_id].next.is_none());

        let mut targets = HashSet::new();
        for fixture in fixtures.iter().filter(|f| f.id != final_id) {
            let link = fixture.next.expect("non-final fixture must link forward");
            assert!(targets.insert((link.fixture_id, link.slot)));

            let mut current = fixture;
            let mut steps = 0;
            while let Some(link) = current.next {
                current = by_id[&link.fixture_id];
                steps += 1;
                assert!(steps <= 4);
            }
            assert_eq!(current.id, final_id);
        }

        assert_eq!(targets.len(), 14);
    }

    #[test]
    fn every_seed_starts_in_round_of_16() {
        let fixtures = build(3);

        let mut seen: Vec<u32> = fixtures
            .iter()
            .filter(|f| f.round == Some(FixtureRound::RoundOf16))
            .flat_map(|f| [f.home_club_id.unwrap(), f.away_club_id.unwrap()])
            .collect();
        seen.sort();

        assert_eq!(seen, (101..=116).collect::<Vec<u32>>());
        assert!(
            fixtures
                .iter()
                .filter(|f| f.round != Some(FixtureRound::RoundOf16))
                .all(|f| !f.is_ready())
        );
    }

    #[test]
    fn ids_grow_from_final_down() {
        let fixtures = build(4);

        assert!(fixtures.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(fixtures[0].round, Some(FixtureRound::Final));
    }

    #[test]
    fn shuffle_depends_on_seed() {
        let draws: HashSet<Vec<Option<u32>>> = (0..10)
            .map(|seed| build(seed).iter().map(|f| f.home_club_id).collect())
            .collect();

        assert!(draws.len() > 1);
        assert_eq!(build(7), build(7));
    }

    #[test]
    fn wrong_seed_count_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let result = KnockoutBracketBuilder::build(&[1, 2, 3], &dates(), "Cup", &mut IdAllocator::new(), &mut rng);

        assert_eq!(result.unwrap_err(), SchedulingError::InvalidSeedCount { expected: 16, found: 3 });
    }
}
