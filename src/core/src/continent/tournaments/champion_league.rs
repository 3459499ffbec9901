use crate::club::Club;
use crate::config::SchedulingSettings;
use crate::continent::{ContinentalQualification, Pot};
use crate::error::{ConfigError, SchedulingError};
use crate::schedule::Fixture;
use crate::shared::IdAllocator;
use crate::utils::Logging;
use chrono::NaiveDate;
use itertools::Itertools;
use log::{debug, info, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    pub home: u32,
    pub away: u32,
}

impl Pairing {
    pub fn new(home: u32, away: u32) -> Self {
        Pairing { home, away }
    }

    pub fn involves(&self, club_id: u32) -> bool {
        self.home == club_id || self.away == club_id
    }

    pub fn opponent_of(&self, club_id: u32) -> u32 {
        if self.home == club_id { self.away } else { self.home }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDayPlacement {
    pub match_days: Vec<Vec<Pairing>>,
    /// Pairings no match day could take. Empty on a complete placement.
    pub leftovers: Vec<Pairing>,
}

impl MatchDayPlacement {
    pub fn is_complete(&self) -> bool {
        self.leftovers.is_empty()
    }

    pub fn placed_count(&self) -> usize {
        self.match_days.iter().map(|day| day.len()).sum()
    }

    pub fn to_fixtures(
        &self,
        dates: &[NaiveDate],
        competition: &str,
        ids: &mut IdAllocator,
    ) -> Result<Vec<Fixture>, SchedulingError> {
        if dates.len() != self.match_days.len() {
            return Err(SchedulingError::InvalidMatchDayDates {
                expected: self.match_days.len(),
                found: dates.len(),
            });
        }

        self.match_days
            .iter()
            .zip(dates)
            .enumerate()
            .flat_map(|(day, (pairings, date))| {
                pairings.iter().map(move |p| (day, *date, *p))
            })
            .map(|(day, date, p)| -> Result<Fixture, SchedulingError> {
                Ok(Fixture::match_day(ids.allocate()?, p.home, p.away, date, competition, (day + 1) as u8))
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct SwissSchedule {
    pub competition: String,
    pub pots: Vec<Pot>,
    pub fixtures: Vec<Fixture>,
    pub leftovers: Vec<Pairing>,
}

/// League phase draw: every club meets two opponents from each pot, spread
/// over match days so nobody plays twice on the same day.
pub struct SwissDrawScheduler {
    settings: SchedulingSettings,
}

impl SwissDrawScheduler {
    pub fn new(settings: SchedulingSettings) -> Result<Self, ConfigError> {
        settings.validate()?;

        Ok(SwissDrawScheduler { settings })
    }

    pub fn draw<R: Rng + ?Sized>(
        &self,
        clubs: &[Club],
        dates: &[NaiveDate],
        competition: &str,
        ids: &mut IdAllocator,
        rng: &mut R,
    ) -> Result<SwissSchedule, SchedulingError> {
        if dates.len() != self.settings.match_days {
            return Err(SchedulingError::InvalidMatchDayDates {
                expected: self.settings.match_days,
                found: dates.len(),
            });
        }

        let selected = ContinentalQualification::select(clubs, self.settings.participants_count())?;
        let pots = ContinentalQualification::into_pots(&selected, self.settings.pots_count, self.settings.pot_size)?;

        info!("🎲 {} draw: {} clubs in {} pots", competition, selected.len(), pots.len());

        let pairings = self.generate_pairings(&pots, rng)?;

        let placement = Logging::estimate_result(
            || self.place_on_match_days(&pairings, rng),
            &format!("{} match day placement", competition),
        );

        let fixtures = placement.to_fixtures(dates, competition, ids)?;

        Ok(SwissSchedule {
            competition: String::from(competition),
            pots,
            fixtures,
            leftovers: placement.leftovers,
        })
    }

    pub fn generate_pairings<R: Rng + ?Sized>(
        &self,
        pots: &[Pot],
        rng: &mut R,
    ) -> Result<Vec<Pairing>, SchedulingError> {
        self.validate_pots(pots)?;

        let pot_size = self.settings.pot_size;
        let expected = self.settings.pairings_count();

        let mut pairings = Vec::with_capacity(expected);

        // Each pot becomes a cycle: two opponents from the own pot, one home and one away.
        for pot in pots {
            let mut clubs = pot.club_ids.clone();
            clubs.shuffle(rng);

            for i in 0..pot_size {
                pairings.push(Pairing::new(clubs[i], clubs[(i + 1) % pot_size]));
            }
        }

        // Two opponents from every other pot, with home and away swapped on the second.
        for (a, b) in (0..pots.len()).tuple_combinations() {
            let mut pot_a = pots[a].club_ids.clone();
            let mut pot_b = pots[b].club_ids.clone();

            pot_a.shuffle(rng);
            pot_b.shuffle(rng);

            for i in 0..pot_size {
                pairings.push(Pairing::new(pot_a[i], pot_b[i]));
                pairings.push(Pairing::new(pot_b[(i + 1) % pot_size], pot_a[i]));
            }
        }

        if pairings.len() != expected {
            return Err(SchedulingError::PairingCountMismatch {
                expected,
                found: pairings.len(),
            });
        }

        debug!("swiss draw generated {} pairings", pairings.len());

        Ok(pairings)
    }

    /// Exact placement by backtracking, restarted with a fresh shuffle when a
    /// run spends its node budget. If no run finishes, greedy placement with
    /// alternating-chain repair takes over and whatever it cannot place is
    /// reported as leftovers.
    pub fn place_on_match_days<R: Rng + ?Sized>(&self, pairings: &[Pairing], rng: &mut R) -> MatchDayPlacement {
        let days = self.settings.match_days;

        for attempt in 1..=self.settings.placement_attempts {
            let mut search = DaySearch::new(pairings, days, SEARCH_NODE_BUDGET);

            match search.solve(rng) {
                SearchOutcome::Solved(assigned) => {
                    debug!("placement search finished on attempt {} after {} nodes", attempt, search.nodes);

                    let mut grid = MatchDayGrid::new(pairings.len(), days);
                    for (idx, day) in assigned.into_iter().enumerate() {
                        grid.assign(pairings, idx, day);
                    }

                    return grid.to_placement(pairings, &[]);
                }
                SearchOutcome::Infeasible => {
                    warn!("{} pairings do not fit on {} match days", pairings.len(), days);
                    break;
                }
                SearchOutcome::Exhausted => {
                    debug!("placement attempt {} ran out of budget", attempt);
                }
            }
        }

        self.place_best_effort(pairings, rng)
    }

    /// Greedy runs with reshuffled order, the best one repaired.
    fn place_best_effort<R: Rng + ?Sized>(&self, pairings: &[Pairing], rng: &mut R) -> MatchDayPlacement {
        let days = self.settings.match_days;

        let mut best: Option<(MatchDayGrid, Vec<usize>)> = None;

        for attempt in 1..=self.settings.placement_attempts {
            let (grid, leftovers) = Self::place_greedy(pairings, days, rng);

            debug!("greedy attempt {}: {} leftovers", attempt, leftovers.len());

            let improves = best
                .as_ref()
                .is_none_or(|(_, best_leftovers)| leftovers.len() < best_leftovers.len());

            if improves {
                let done = leftovers.is_empty();
                best = Some((grid, leftovers));

                if done {
                    break;
                }
            }
        }

        let (mut grid, mut leftovers) = match best {
            Some(best) => best,
            None => (MatchDayGrid::new(pairings.len(), days), (0..pairings.len()).collect()),
        };

        if !leftovers.is_empty() {
            let before = leftovers.len();
            leftovers = Self::repair(&mut grid, pairings, leftovers);

            debug!("repair placed {} of {} leftovers", before - leftovers.len(), before);
        }

        let placement = grid.to_placement(pairings, &leftovers);

        if !placement.is_complete() {
            warn!(
                "{} pairings could not be placed on {} match days: {:?}",
                placement.leftovers.len(),
                days,
                placement.leftovers
            );
        }

        placement
    }

    fn validate_pots(&self, pots: &[Pot]) -> Result<(), SchedulingError> {
        if pots.len() != self.settings.pots_count {
            return Err(SchedulingError::InvalidPotCount {
                expected: self.settings.pots_count,
                found: pots.len(),
            });
        }

        let mut seen = HashSet::new();

        for pot in pots {
            if pot.club_ids.len() != self.settings.pot_size {
                return Err(SchedulingError::InvalidPotSize {
                    pot: pot.number,
                    expected: self.settings.pot_size,
                    found: pot.club_ids.len(),
                });
            }

            for &club_id in &pot.club_ids {
                if !seen.insert(club_id) {
                    return Err(SchedulingError::DuplicateClub(club_id));
                }
            }
        }

        Ok(())
    }

    fn place_greedy<R: Rng + ?Sized>(pairings: &[Pairing], days: usize, rng: &mut R) -> (MatchDayGrid, Vec<usize>) {
        let mut order: Vec<usize> = (0..pairings.len()).collect();
        order.shuffle(rng);

        let mut grid = MatchDayGrid::new(pairings.len(), days);
        let mut leftovers = Vec::new();

        for idx in order {
            let pairing = pairings[idx];
            let start = rng.gen_range(0..days);

            let free_day = (0..days)
                .map(|offset| (start + offset) % days)
                .find(|&day| grid.is_free(pairing.home, day) && grid.is_free(pairing.away, day));

            match free_day {
                Some(day) => grid.assign(pairings, idx, day),
                None => leftovers.push(idx),
            }
        }

        (grid, leftovers)
    }

    fn repair(grid: &mut MatchDayGrid, pairings: &[Pairing], mut leftovers: Vec<usize>) -> Vec<usize> {
        loop {
            let before = leftovers.len();

            leftovers.retain(|&idx| !grid.try_recolor(pairings, idx));

            if leftovers.is_empty() || leftovers.len() == before {
                return leftovers;
            }
        }
    }
}

/// Search nodes one backtracking run may visit before it restarts.
const SEARCH_NODE_BUDGET: usize = 20_000;

enum SearchOutcome {
    /// Match day of every pairing, by pairing index
    Solved(Vec<usize>),
    Infeasible,
    Exhausted,
}

enum Step {
    Solved,
    DeadEnd,
    OutOfBudget,
}

/// Backtracking over match days. The pairing with the fewest open days goes
/// next, and a branch is cut as soon as any pairing has no open day left.
/// Days are bits of a per-club mask.
struct DaySearch {
    ends: Vec<(usize, usize)>,
    busy: Vec<u64>,
    assigned: Vec<Option<usize>>,
    order: Vec<usize>,
    days: usize,
    all_days: u64,
    nodes: usize,
    budget: usize,
}

impl DaySearch {
    fn new(pairings: &[Pairing], days: usize, budget: usize) -> Self {
        let mut index: HashMap<u32, usize> = HashMap::new();
        let mut slot = |club_id: u32| {
            let next = index.len();
            *index.entry(club_id).or_insert(next)
        };

        let ends: Vec<(usize, usize)> = pairings.iter().map(|p| (slot(p.home), slot(p.away))).collect();

        DaySearch {
            busy: vec![0; index.len()],
            assigned: vec![None; ends.len()],
            order: (0..ends.len()).collect(),
            ends,
            days,
            all_days: if days >= 64 { u64::MAX } else { (1u64 << days) - 1 },
            nodes: 0,
            budget,
        }
    }

    fn solve<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SearchOutcome {
        self.order.shuffle(rng);

        match self.step(self.ends.len(), rng) {
            Step::Solved => match self.assigned.iter().copied().collect::<Option<Vec<usize>>>() {
                Some(assigned) => SearchOutcome::Solved(assigned),
                None => SearchOutcome::Infeasible,
            },
            Step::DeadEnd => SearchOutcome::Infeasible,
            Step::OutOfBudget => SearchOutcome::Exhausted,
        }
    }

    fn step<R: Rng + ?Sized>(&mut self, remaining: usize, rng: &mut R) -> Step {
        if remaining == 0 {
            return Step::Solved;
        }

        self.nodes += 1;
        if self.nodes > self.budget {
            return Step::OutOfBudget;
        }

        let Some((idx, open)) = self.most_constrained() else {
            return Step::DeadEnd;
        };

        let mut candidates: Vec<usize> = (0..self.days).filter(|&day| open & (1u64 << day) != 0).collect();
        candidates.shuffle(rng);

        for day in candidates {
            self.place(idx, day);

            match self.step(remaining - 1, rng) {
                Step::DeadEnd => self.unplace(idx, day),
                done => return done,
            }
        }

        Step::DeadEnd
    }

    /// Unplaced pairing with the fewest open days, `None` once one has none.
    fn most_constrained(&self) -> Option<(usize, u64)> {
        let mut best: Option<(usize, u64)> = None;

        for &idx in &self.order {
            if self.assigned[idx].is_some() {
                continue;
            }

            let open = self.open_days(idx);

            match open.count_ones() {
                0 => return None,
                1 => return Some((idx, open)),
                count if best.is_none_or(|(_, b)| count < b.count_ones()) => best = Some((idx, open)),
                _ => {}
            }
        }

        best
    }

    fn open_days(&self, idx: usize) -> u64 {
        let (home, away) = self.ends[idx];
        self.all_days & !(self.busy[home] | self.busy[away])
    }

    fn place(&mut self, idx: usize, day: usize) {
        let (home, away) = self.ends[idx];

        self.busy[home] |= 1u64 << day;
        self.busy[away] |= 1u64 << day;
        self.assigned[idx] = Some(day);
    }

    fn unplace(&mut self, idx: usize, day: usize) {
        let (home, away) = self.ends[idx];

        self.busy[home] &= !(1u64 << day);
        self.busy[away] &= !(1u64 << day);
        self.assigned[idx] = None;
    }
}

/// Which pairing each club plays on each match day.
struct MatchDayGrid {
    by_day: Vec<HashMap<u32, usize>>,
    assigned: Vec<Option<usize>>,
}

impl MatchDayGrid {
    fn new(pairings_count: usize, days: usize) -> Self {
        MatchDayGrid {
            by_day: vec![HashMap::new(); days],
            assigned: vec![None; pairings_count],
        }
    }

    fn is_free(&self, club_id: u32, day: usize) -> bool {
        !self.by_day[day].contains_key(&club_id)
    }

    fn free_days(&self, club_id: u32) -> Vec<usize> {
        (0..self.by_day.len()).filter(|&day| self.is_free(club_id, day)).collect()
    }

    fn assign(&mut self, pairings: &[Pairing], idx: usize, day: usize) {
        let pairing = pairings[idx];

        self.by_day[day].insert(pairing.home, idx);
        self.by_day[day].insert(pairing.away, idx);
        self.assigned[idx] = Some(day);
    }

    fn unassign(&mut self, pairings: &[Pairing], idx: usize) {
        if let Some(day) = self.assigned[idx].take() {
            let pairing = pairings[idx];

            self.by_day[day].remove(&pairing.home);
            self.by_day[day].remove(&pairing.away);
        }
    }

    /// Places an unplaced pairing by swapping two match days along an
    /// alternating chain so both clubs share a free day. The chain must not
    /// touch the other club, otherwise the swap would take its free day away.
    fn try_recolor(&mut self, pairings: &[Pairing], idx: usize) -> bool {
        let pairing = pairings[idx];
        let free_home = self.free_days(pairing.home);
        let free_away = self.free_days(pairing.away);

        if let Some(&day) = free_home.iter().find(|day| free_away.contains(day)) {
            self.assign(pairings, idx, day);
            return true;
        }

        let sides = [
            (pairing.away, pairing.home, &free_away, &free_home),
            (pairing.home, pairing.away, &free_home, &free_away),
        ];

        for (start, other, free_start, free_other) in sides {
            for &target in free_other {
                for &spare in free_start {
                    let chain = self.alternating_chain(pairings, start, target, spare);

                    if chain.iter().any(|&i| pairings[i].involves(other)) {
                        continue;
                    }

                    let moves: Vec<(usize, usize)> = chain
                        .iter()
                        .map(|&i| {
                            let day = if self.assigned[i] == Some(target) { spare } else { target };
                            (i, day)
                        })
                        .collect();

                    for &(i, _) in &moves {
                        self.unassign(pairings, i);
                    }

                    for &(i, day) in &moves {
                        self.assign(pairings, i, day);
                    }

                    self.assign(pairings, idx, target);
                    return true;
                }
            }
        }

        false
    }

    /// Pairings reached from `start` by following `first`, `second`, `first`...
    fn alternating_chain(&self, pairings: &[Pairing], start: u32, first: usize, second: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut club = start;
        let mut day = first;

        while let Some(&idx) = self.by_day[day].get(&club) {
            if chain.contains(&idx) {
                break;
            }

            chain.push(idx);
            club = pairings[idx].opponent_of(club);
            day = if day == first { second } else { first };
        }

        chain
    }

    fn to_placement(&self, pairings: &[Pairing], leftovers: &[usize]) -> MatchDayPlacement {
        let mut match_days = vec![Vec::new(); self.by_day.len()];

        for (idx, day) in self.assigned.iter().enumerate() {
            if let Some(day) = day {
                match_days[*day].push(pairings[idx]);
            }
        }

        MatchDayPlacement {
            match_days,
            leftovers: leftovers.iter().map(|&idx| pairings[idx]).collect(),
        }
    }
}
