use chrono::NaiveDate;
use club_core::utils::TimeEstimation;
use club_core::{
    BracketSlot, Club, ClubReputation, ContinentalCompetition, ContinentalQualification, ContractOffer, Fixture,
    FixtureBook, FixtureRound,
    KnockoutDates, League, MarketValueValuation, MatchCalendar, MatchOutcome, MatchScore, MatchSimulator,
    NegotiationStage, Player, PlayerAgent, PlayerSquadRole, PlayerValuation, ScoutingKnowledge, SeasonInitializer,
    SimulatorSettings, TransferMarket, TransferOffer, WorldDirectory, YouthIntake,
};
use color_eyre::eyre::eyre;
use env_logger::Env;
use log::info;
use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::env;

/// Stronger clubs score more. Level knockout ties go to penalties.
struct ReputationSimulator {
    reputations: HashMap<u32, ClubReputation>,
    rng: StdRng,
}

impl ReputationSimulator {
    fn goals(&mut self, club_id: u32) -> u8 {
        let reputation = self.reputations.get(&club_id).map_or(50, |r| r.score());
        let chances = 2 + reputation / 25;

        (0..chances).filter(|_| self.rng.gen_bool(0.3)).count() as u8
    }

    fn record(&mut self, club_id: u32, outcome: MatchOutcome, opponent_id: u32) {
        let opponent = self.reputations.get(&opponent_id).map_or(50, |r| r.score());

        if let Some(reputation) = self.reputations.get_mut(&club_id) {
            reputation.process_match(outcome, opponent);
        }
    }
}

impl MatchSimulator for ReputationSimulator {
    fn simulate(&mut self, fixture: &Fixture) -> MatchScore {
        let (home, away) = match (fixture.home_club_id, fixture.away_club_id) {
            (Some(home), Some(away)) => (home, away),
            _ => return MatchScore::new(0, 0),
        };

        let score = MatchScore::new(self.goals(home), self.goals(away));

        let (home_outcome, away_outcome) = match score.home_score.cmp(&score.away_score) {
            std::cmp::Ordering::Greater => (MatchOutcome::Win, MatchOutcome::Loss),
            std::cmp::Ordering::Less => (MatchOutcome::Loss, MatchOutcome::Win),
            std::cmp::Ordering::Equal => (MatchOutcome::Draw, MatchOutcome::Draw),
        };

        self.record(home, home_outcome, away);
        self.record(away, away_outcome, home);

        if fixture.is_knockout && score.home_score == score.away_score {
            let slot = if self.rng.gen_bool(0.5) {
                BracketSlot::Home
            } else {
                BracketSlot::Away
            };

            return score.with_shootout(slot);
        }

        score
    }
}

fn date(year: i32, month: u32, day: u32) -> color_eyre::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| eyre!("invalid date {}-{}-{}", year, month, day))
}

fn load_settings() -> color_eyre::Result<SimulatorSettings> {
    match env::var("SETTINGS_PATH") {
        Ok(path) => {
            info!("loading settings from {}", path);
            Ok(SimulatorSettings::from_json(&std::fs::read_to_string(path)?)?)
        }
        Err(_) => Ok(SimulatorSettings::default()),
    }
}

fn sample_clubs() -> Vec<Club> {
    (1..=40)
        .map(|id| {
            let reputation = (95 - id * 2) as u8;
            let club = Club::new(id, format!("Club {}", id), reputation)
                .with_finances(reputation as f64 * 2_000_000.0, reputation as f64 * 20_000.0);

            if id <= 32 { club.qualified() } else { club }
        })
        .collect()
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    env_logger::Builder::from_env(Env::default().default_filter_or("debug")).init();

    let settings = load_settings()?;
    let mut rng = StdRng::from_entropy();

    let clubs = sample_clubs();

    let leagues = vec![
        League::new(
            1,
            String::from("Premier Division"),
            (1..=20).collect(),
            MatchCalendar::weekly(date(2025, 8, 16)?, 38),
        ),
        League::new(
            2,
            String::from("First Division"),
            (21..=40).collect(),
            MatchCalendar::weekly(date(2025, 8, 9)?, 38),
        ),
    ];

    let continental = ContinentalCompetition {
        name: String::from("Champions Cup"),
        match_day_dates: MatchCalendar::every(date(2025, 9, 17)?, 14, settings.scheduling.match_days),
    };

    let mut season = SeasonInitializer::new(settings.scheduling.clone())?.initialize(
        &leagues,
        &clubs,
        Some(&continental),
        &mut rng,
    )?;

    let seeds: Vec<u32> = season
        .continental_pots
        .iter()
        .flat_map(|pot| pot.club_ids.iter().copied())
        .take(16)
        .collect();

    let knockout_dates = KnockoutDates {
        round_of_16: date(2026, 2, 17)?,
        quarter_final: date(2026, 4, 7)?,
        semi_final: date(2026, 4, 28)?,
        final_match: date(2026, 5, 30)?,
    };

    season.add_knockout(&continental.name, &seeds, &knockout_dates, &mut rng)?;

    let knockout: Vec<Fixture> = season.competitions[&continental.name]
        .iter()
        .filter(|f| f.is_knockout)
        .cloned()
        .collect();

    let mut simulator = ReputationSimulator {
        reputations: clubs.iter().map(|c| (c.id, ClubReputation::new(c.reputation))).collect(),
        rng: StdRng::from_entropy(),
    };

    let mut book = FixtureBook::new(knockout);

    let (played, elapsed) = TimeEstimation::estimate(|| -> color_eyre::Result<usize> {
        let mut played = 0;

        for round_date in [
            knockout_dates.round_of_16,
            knockout_dates.quarter_final,
            knockout_dates.semi_final,
            knockout_dates.final_match,
        ] {
            played += book.play_day(round_date, &mut simulator)?.len();
        }

        Ok(played)
    });

    info!("knockout played: {} fixtures, {} ms", played?, elapsed);

    if let Some(final_match) = book
        .into_fixtures()
        .into_iter()
        .find(|f| f.round == Some(FixtureRound::Final))
    {
        info!(
            "🏆 final: {:?} {} - {} {:?}",
            final_match.home_club_id, final_match.home_score, final_match.away_score, final_match.away_club_id
        );
    }

    let mut next_season = clubs.clone();
    for club in &mut next_season {
        if let Some(reputation) = simulator.reputations.get(&club.id) {
            club.refresh_reputation(reputation);
        }
    }

    let scheduling = &settings.scheduling;
    let contenders = ContinentalQualification::select(&next_season, scheduling.participants_count())?;
    let pots = ContinentalQualification::into_pots(&contenders, scheduling.pots_count, scheduling.pot_size)?;

    if let Some(top) = pots.first() {
        info!("next season's top pot by current reputation: {:?}", top.club_ids);
    }

    let mut academy = YouthIntake::new(14);
    if let Some(intake) = academy.process(date(2026, 3, 1)?, clubs[0].reputation) {
        info!("academy intake: {} players, potential up to {}", intake.players, intake.potential_ceiling);
    }

    let target = Player::new(500, String::from("Target Striker"), 5, 50_000_000.0, 100_000.0)
        .with_role(PlayerSquadRole::Key)
        .with_agent(PlayerAgent {
            stubbornness: 75,
            fee_pct: 9.0,
        });

    let mut scouting = ScoutingKnowledge::new();
    scouting.observe(target.id, 15);
    scouting.observe(target.id, 15);

    let estimate = scouting.estimate_value(target.id, MarketValueValuation.true_value(&target));
    info!("scouts value {} between {:.0} and {:.0}", target.name, estimate.low, estimate.high);

    let directory = WorldDirectory::new(vec![target.clone()], next_season.clone()).with_scouting(2, scouting.clone());
    let mut market = TransferMarket::new(settings.negotiation.clone())?;

    let mut today = date(2026, 7, 1)?;
    let id = market
        .approach_player(&directory, &MarketValueValuation, target.id, 2, today, &mut rng)?
        .negotiation_id();

    let mut fee = estimate.low;

    while market.get(id).is_some_and(|n| n.stage == NegotiationStage::ClubFee && n.is_open()) {
        let reply = market.submit_fee_offer(&directory, id, TransferOffer::new(fee), today)?;
        info!("fee {:.0}: {:?} \"{}\"", fee, reply.status, reply.response.message);

        fee *= 1.1;
        today = today.succ_opt().ok_or_else(|| eyre!("calendar overflow"))?;
    }

    let mut wage = target.current_salary;

    while market.get(id).is_some_and(|n| n.stage == NegotiationStage::Contract && n.is_open()) {
        let offer = ContractOffer::new(wage, 4, PlayerSquadRole::Key).with_signing_bonus(1_000_000.0);
        let reply = market.submit_contract_offer(&directory, id, offer, today)?;
        info!("wage {:.0}: {:?} \"{}\"", wage, reply.status, reply.response.message);

        wage *= 1.08;
        today = today.succ_opt().ok_or_else(|| eyre!("calendar overflow"))?;
    }

    match market.history().last() {
        Some(transfer) => info!(
            "✅ {} signed for club {}: fee {:.0}, wage {:.0}",
            transfer.player_name, transfer.to_club_id, transfer.fee, transfer.wage
        ),
        None => info!("{} stays at club {}", target.name, target.club_id),
    }

    Ok(())
}
