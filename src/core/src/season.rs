use crate::club::Club;
use crate::config::SchedulingSettings;
use crate::continent::{KnockoutBracketBuilder, KnockoutDates, Pairing, Pot, SwissDrawScheduler};
use crate::error::{ConfigError, SchedulingError};
use crate::league::League;
use crate::schedule::Fixture;
use crate::shared::IdAllocator;
use crate::utils::TimeEstimation;
use chrono::NaiveDate;
use log::info;
use rand::Rng;
use std::collections::{BTreeMap, HashSet};

/// League phase of the continental competition.
#[derive(Debug, Clone)]
pub struct ContinentalCompetition {
    pub name: String,
    pub match_day_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct SeasonFixtures {
    pub competitions: BTreeMap<String, Vec<Fixture>>,
    /// Leagues that got fewer rounds than a full double round robin
    pub truncated: Vec<String>,
    pub continental_pots: Vec<Pot>,
    pub swiss_leftovers: Vec<Pairing>,
    /// Continues numbering for fixtures scheduled later in the season
    pub ids: IdAllocator,
}

impl SeasonFixtures {
    pub fn fixture_count(&self) -> usize {
        self.competitions.values().map(|f| f.len()).sum()
    }

    pub fn all_fixtures(&self) -> impl Iterator<Item = &Fixture> {
        self.competitions.values().flatten()
    }

    /// Knockout stage once the 16 seeds are known. Fixtures join the
    /// competition's existing list.
    pub fn add_knockout<R: Rng + ?Sized>(
        &mut self,
        competition: &str,
        seeds: &[u32],
        dates: &KnockoutDates,
        rng: &mut R,
    ) -> Result<Vec<u32>, SchedulingError> {
        let bracket = KnockoutBracketBuilder::build(seeds, dates, competition, &mut self.ids, rng)?;
        let ids = bracket.iter().map(|f| f.id).collect();

        info!("🏆 {} knockout bracket drawn: {} fixtures", competition, bracket.len());

        self.competitions
            .entry(String::from(competition))
            .or_default()
            .extend(bracket);

        Ok(ids)
    }
}

pub struct SeasonInitializer {
    swiss: SwissDrawScheduler,
}

impl SeasonInitializer {
    pub fn new(settings: SchedulingSettings) -> Result<Self, ConfigError> {
        Ok(SeasonInitializer {
            swiss: SwissDrawScheduler::new(settings)?,
        })
    }

    pub fn initialize<R: Rng + ?Sized>(
        &self,
        leagues: &[League],
        clubs: &[Club],
        continental: Option<&ContinentalCompetition>,
        rng: &mut R,
    ) -> Result<SeasonFixtures, SchedulingError> {
        let (result, elapsed) = TimeEstimation::estimate(|| self.schedule_all(leagues, clubs, continental, rng));

        if let Ok(season) = &result {
            info!(
                "season initialized: {} fixtures in {} competitions, {} ms",
                season.fixture_count(),
                season.competitions.len(),
                elapsed
            );
        }

        result
    }

    fn schedule_all<R: Rng + ?Sized>(
        &self,
        leagues: &[League],
        clubs: &[Club],
        continental: Option<&ContinentalCompetition>,
        rng: &mut R,
    ) -> Result<SeasonFixtures, SchedulingError> {
        Self::ensure_unique_names(leagues, continental)?;

        let mut ids = IdAllocator::new();
        let mut competitions = BTreeMap::new();
        let mut truncated = Vec::new();

        for league in leagues {
            let schedule = league.generate_schedule(&mut ids)?;

            if schedule.is_truncated() {
                truncated.push(league.name.clone());
            }

            competitions.insert(league.name.clone(), schedule.fixtures);
        }

        let mut continental_pots = Vec::new();
        let mut swiss_leftovers = Vec::new();

        if let Some(competition) = continental {
            let draw = self.swiss.draw(
                clubs,
                &competition.match_day_dates,
                &competition.name,
                &mut ids,
                rng,
            )?;

            continental_pots = draw.pots;
            swiss_leftovers = draw.leftovers;
            competitions.insert(competition.name.clone(), draw.fixtures);
        }

        Ok(SeasonFixtures {
            competitions,
            truncated,
            continental_pots,
            swiss_leftovers,
            ids,
        })
    }

    /// Competition names key the fixture lists, so two competitions may not share one.
    fn ensure_unique_names(
        leagues: &[League],
        continental: Option<&ContinentalCompetition>,
    ) -> Result<(), SchedulingError> {
        let mut seen = HashSet::new();

        let names = leagues
            .iter()
            .map(|league| league.name.as_str())
            .chain(continental.map(|competition| competition.name.as_str()));

        for name in names {
            if !seen.insert(name) {
                return Err(SchedulingError::DuplicateCompetition(String::from(name)));
            }
        }

        Ok(())
    }
}
