//! Single-trial state machine.
//!
//! A [`Game`] moves through `Fresh → FirstChoiceMade → Revealed → Resolved`.
//! When the host's policy has no legal door to open, the trial is rerolled:
//! it returns to `Fresh` with a newly sampled layout drawn from the same
//! [`LayoutRequest`], so randomized door/goat counts are re-drawn while fixed
//! ones stay fixed.
//!
//! ```text
//!   Fresh ──choose──▶ FirstChoiceMade ──reveal──▶ Revealed ──choose──▶ Resolved
//!     ▲                                              │
//!     └───────────────── reroll (no legal reveal) ───┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::{MIN_DOORS, REROLL_ALERT_THRESHOLD};
use crate::error::{ConfigError, GameError};
use crate::random::RandomSource;
use crate::types::{HostStrategy, PlayerStrategy};

// ── Layout request ──────────────────────────────────────────────────────

/// Door and goat counts a trial is (re)initialized from.
///
/// `None` means "sample on every initialization": doors uniformly from
/// `[MIN_DOORS, max_doors]`, goats uniformly from `[0, door_count]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutRequest {
    doors: Option<usize>,
    goats: Option<usize>,
    max_doors: usize,
}

impl LayoutRequest {
    pub fn new(
        doors: Option<usize>,
        goats: Option<usize>,
        max_doors: usize,
    ) -> Result<Self, ConfigError> {
        if let Some(doors) = doors {
            if doors < MIN_DOORS {
                return Err(ConfigError::TooFewDoors {
                    doors,
                    min: MIN_DOORS,
                });
            }
            if max_doors < doors {
                return Err(ConfigError::MaxDoorsBelowDoors { max_doors, doors });
            }
        }
        if max_doors < MIN_DOORS {
            return Err(ConfigError::TooFewDoors {
                doors: max_doors,
                min: MIN_DOORS,
            });
        }
        if let Some(goats) = goats {
            // With randomized doors the smallest draw must still fit the goats.
            let fewest = doors.unwrap_or(MIN_DOORS);
            if goats > fewest {
                return Err(ConfigError::TooManyGoats {
                    goats,
                    doors: fewest,
                });
            }
        }
        Ok(Self {
            doors,
            goats,
            max_doors,
        })
    }

    /// Fixed classic layout: `doors` doors, `goats` goats.
    pub fn fixed(doors: usize, goats: usize) -> Result<Self, ConfigError> {
        Self::new(Some(doors), Some(goats), doors)
    }

    pub fn doors(&self) -> Option<usize> {
        self.doors
    }

    pub fn goats(&self) -> Option<usize> {
        self.goats
    }

    pub fn max_doors(&self) -> usize {
        self.max_doors
    }
}

// ── Reroll policy ───────────────────────────────────────────────────────

/// What a trial does when it keeps needing rerolls.
///
/// Each reroll past `alert_after` logs a warning. If `abort_after` is set,
/// exceeding it abandons the trial with [`GameError::ExcessiveRerolls`];
/// otherwise the trial retries indefinitely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RerollPolicy {
    pub alert_after: u32,
    pub abort_after: Option<u32>,
}

impl Default for RerollPolicy {
    fn default() -> Self {
        Self {
            alert_after: REROLL_ALERT_THRESHOLD,
            abort_after: None,
        }
    }
}

impl RerollPolicy {
    pub fn aborting_after(limit: u32) -> Self {
        Self {
            abort_after: Some(limit),
            ..Self::default()
        }
    }
}

// ── Trial ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Fresh,
    FirstChoiceMade,
    Revealed,
    Resolved,
}

/// Result of a host reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reveal {
    /// The door that was opened.
    Opened(usize),
    /// The host's policy has no legal door; the trial must be reinitialized.
    RerollRequired,
}

/// One trial of the door game.
#[derive(Clone, Debug)]
pub struct Game {
    request: LayoutRequest,
    door_count: usize,
    goat_count: usize,
    /// `true` = prize behind the door.
    prizes: Vec<bool>,
    /// `true` = opened by the host.
    visible: Vec<bool>,
    choice: Option<usize>,
    win: bool,
    phase: Phase,
    rerolls: u32,
}

impl Game {
    /// Sample a fresh trial from `request`.
    pub fn new<R: RandomSource + ?Sized>(request: LayoutRequest, rng: &mut R) -> Self {
        let mut game = Self {
            request,
            door_count: 0,
            goat_count: 0,
            prizes: Vec::new(),
            visible: Vec::new(),
            choice: None,
            win: false,
            phase: Phase::Fresh,
            rerolls: 0,
        };
        game.initialize(rng);
        game
    }

    /// Build a trial with a known layout. Rerolls keep the same door and goat
    /// counts but resample goat positions.
    pub fn with_layout(prizes: Vec<bool>) -> Result<Self, GameError> {
        let door_count = prizes.len();
        if door_count < MIN_DOORS {
            return Err(GameError::InvalidLayout(format!(
                "{door_count} doors, need at least {MIN_DOORS}"
            )));
        }
        let goat_count = prizes.iter().filter(|&&p| !p).count();
        let request = LayoutRequest::fixed(door_count, goat_count)
            .map_err(|e| GameError::InvalidLayout(e.to_string()))?;
        Ok(Self {
            request,
            door_count,
            goat_count,
            visible: vec![false; door_count],
            prizes,
            choice: None,
            win: false,
            phase: Phase::Fresh,
            rerolls: 0,
        })
    }

    /// (Re)sample the layout and clear the player's pick and outcome.
    /// The reroll count survives reinitialization.
    pub fn initialize<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.door_count = match self.request.doors {
            Some(doors) => doors,
            None => MIN_DOORS + rng.uniform_int(self.request.max_doors - MIN_DOORS + 1),
        };
        self.goat_count = match self.request.goats {
            Some(goats) => goats,
            None => rng.uniform_int(self.door_count + 1),
        };

        self.prizes = vec![true; self.door_count];
        self.visible = vec![false; self.door_count];
        for door in rng.choose_without_replacement(self.door_count, self.goat_count) {
            self.prizes[door] = false;
        }

        self.choice = None;
        self.win = false;
        self.phase = Phase::Fresh;
    }

    /// First open door that still holds a prize.
    fn revealed_prize(&self) -> Option<usize> {
        (0..self.door_count).find(|&d| self.visible[d] && self.prizes[d])
    }

    fn closed_doors(&self) -> Vec<usize> {
        (0..self.door_count).filter(|&d| !self.visible[d]).collect()
    }

    fn set_choice(&mut self, door: usize) {
        self.choice = Some(door);
        if self.phase == Phase::Fresh {
            self.phase = Phase::FirstChoiceMade;
        }
    }

    /// Player pick. An opened prize door is always taken, whatever the strategy.
    pub fn choose<R: RandomSource + ?Sized>(&mut self, strategy: PlayerStrategy, rng: &mut R) {
        if let Some(door) = self.revealed_prize() {
            info!(door, "taking a revealed prize");
            self.set_choice(door);
            return;
        }

        match strategy {
            PlayerStrategy::Stay => {
                if self.choice.is_none() {
                    debug!("stay with no pick yet; nothing to keep");
                }
            }
            PlayerStrategy::Random => {
                let pool = self.closed_doors();
                if let Some(door) = rng.pick(&pool) {
                    self.set_choice(door);
                }
            }
            PlayerStrategy::Update => {
                let mut pool = self.closed_doors();
                if let Some(current) = self.choice {
                    match pool.iter().position(|&d| d == current) {
                        Some(pos) => {
                            pool.remove(pos);
                        }
                        None => debug!(
                            current,
                            ?pool,
                            "pick is no longer closed; switching among all closed doors"
                        ),
                    }
                }
                if let Some(door) = rng.pick(&pool) {
                    self.set_choice(door);
                }
            }
        }
    }

    /// Host opens one door other than the player's pick.
    ///
    /// Returns [`Reveal::RerollRequired`] without touching the state when the
    /// strategy has no legal door. The phase only advances to `Revealed` from
    /// `FirstChoiceMade`.
    pub fn reveal<R: RandomSource + ?Sized>(
        &mut self,
        strategy: HostStrategy,
        rng: &mut R,
    ) -> Reveal {
        let choice = self.choice;
        let pool: Vec<usize> = match strategy {
            HostStrategy::Goat => (0..self.door_count)
                .filter(|&d| !self.prizes[d] && Some(d) != choice)
                .collect(),
            HostStrategy::Random => (0..self.door_count).filter(|&d| Some(d) != choice).collect(),
        };

        match rng.pick(&pool) {
            Some(door) => {
                self.visible[door] = true;
                if self.phase == Phase::FirstChoiceMade {
                    self.phase = Phase::Revealed;
                }
                Reveal::Opened(door)
            }
            None => {
                info!(
                    goats = self.goat_count,
                    doors = self.door_count,
                    "no goat left to reveal, rerolling"
                );
                Reveal::RerollRequired
            }
        }
    }

    /// Play the trial to resolution: random first pick, host reveal, then the
    /// player's second decision. Rerolls until a reveal succeeds or `policy`
    /// gives up.
    pub fn play<R: RandomSource + ?Sized>(
        &mut self,
        player: PlayerStrategy,
        host: HostStrategy,
        policy: &RerollPolicy,
        rng: &mut R,
    ) -> Result<bool, GameError> {
        loop {
            self.choose(PlayerStrategy::Random, rng);
            match self.reveal(host, rng) {
                Reveal::Opened(_) => break,
                Reveal::RerollRequired => {
                    self.rerolls += 1;
                    if let Some(limit) = policy.abort_after {
                        if self.rerolls > limit {
                            return Err(GameError::ExcessiveRerolls {
                                rerolls: self.rerolls,
                                limit,
                            });
                        }
                    }
                    if self.rerolls > policy.alert_after {
                        warn!(
                            rerolls = self.rerolls,
                            "too many rerolls within one game, possible bug"
                        );
                    }
                    self.initialize(rng);
                }
            }
        }

        self.choose(player, rng);
        self.win = self.choice.is_some_and(|c| self.prizes[c]);
        self.phase = Phase::Resolved;
        Ok(self.win)
    }

    pub fn door_count(&self) -> usize {
        self.door_count
    }

    pub fn goat_count(&self) -> usize {
        self.goat_count
    }

    pub fn prizes(&self) -> &[bool] {
        &self.prizes
    }

    pub fn visible(&self) -> &[bool] {
        &self.visible
    }

    pub fn choice(&self) -> Option<usize> {
        self.choice
    }

    pub fn win(&self) -> bool {
        self.win
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of times this trial was reinitialized before it resolved.
    pub fn rerolls(&self) -> u32 {
        self.rerolls
    }
}

/// Hand-driven moves for unit tests.
#[cfg(test)]
impl Game {
    /// Manually open `door`. The player's current pick cannot be opened.
    fn open(&mut self, door: usize) -> Result<(), GameError> {
        if door >= self.door_count {
            return Err(GameError::InvalidLayout(format!(
                "door {door} out of range for {} doors",
                self.door_count
            )));
        }
        if self.choice == Some(door) {
            return Err(GameError::InvalidLayout(format!(
                "door {door} is the player's pick"
            )));
        }
        self.visible[door] = true;
        if self.phase == Phase::FirstChoiceMade {
            self.phase = Phase::Revealed;
        }
        Ok(())
    }

    /// Manually set the player's pick.
    fn pick_door(&mut self, door: usize) -> Result<(), GameError> {
        if door >= self.door_count {
            return Err(GameError::InvalidLayout(format!(
                "door {door} out of range for {} doors",
                self.door_count
            )));
        }
        self.set_choice(door);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn rng(seed: u64) -> SmallRng {
        SmallRng::seed_from_u64(seed)
    }

    #[test]
    fn initialize_places_exact_goat_count() {
        let mut rng = rng(1);
        let request = LayoutRequest::fixed(7, 4).unwrap();
        for _ in 0..100 {
            let game = Game::new(request, &mut rng);
            assert_eq!(game.door_count(), 7);
            assert_eq!(game.prizes().iter().filter(|&&p| !p).count(), 4);
            assert!(game.visible().iter().all(|&v| !v));
            assert_eq!(game.choice(), None);
            assert_eq!(game.phase(), Phase::Fresh);
        }
    }

    #[test]
    fn randomized_counts_stay_in_bounds() {
        let mut rng = rng(2);
        let request = LayoutRequest::new(None, None, 6).unwrap();
        let mut seen_doors = [false; 7];
        for _ in 0..500 {
            let game = Game::new(request, &mut rng);
            assert!((MIN_DOORS..=6).contains(&game.door_count()));
            assert!(game.goat_count() <= game.door_count());
            seen_doors[game.door_count()] = true;
        }
        assert!(seen_doors[3] && seen_doors[6]);
    }

    #[test]
    fn request_validation() {
        assert!(matches!(
            LayoutRequest::fixed(2, 1),
            Err(ConfigError::TooFewDoors { doors: 2, .. })
        ));
        assert!(matches!(
            LayoutRequest::fixed(3, 4),
            Err(ConfigError::TooManyGoats { goats: 4, doors: 3 })
        ));
        assert!(matches!(
            LayoutRequest::new(Some(5), None, 4),
            Err(ConfigError::MaxDoorsBelowDoors { .. })
        ));
        assert!(matches!(
            LayoutRequest::new(None, Some(4), 8),
            Err(ConfigError::TooManyGoats { goats: 4, doors: 3 })
        ));
    }

    #[test]
    fn goat_reveal_skips_pick_and_prizes() {
        let mut rng = rng(3);
        for _ in 0..200 {
            let mut game = Game::with_layout(vec![false, true, false, true]).unwrap();
            game.pick_door(0).unwrap();
            assert_eq!(game.reveal(HostStrategy::Goat, &mut rng), Reveal::Opened(2));
            assert_eq!(game.visible(), &[false, false, true, false]);
            assert_eq!(game.phase(), Phase::Revealed);
        }
    }

    #[test]
    fn goat_reveal_without_candidates_requires_reroll() {
        let mut rng = rng(4);
        let mut game = Game::with_layout(vec![true, false, true]).unwrap();
        game.pick_door(1).unwrap();
        assert_eq!(game.reveal(HostStrategy::Goat, &mut rng), Reveal::RerollRequired);
        assert!(game.visible().iter().all(|&v| !v));
        assert_eq!(game.phase(), Phase::FirstChoiceMade);

        let mut no_goats = Game::with_layout(vec![true; 3]).unwrap();
        assert_eq!(no_goats.reveal(HostStrategy::Goat, &mut rng), Reveal::RerollRequired);
    }

    #[test]
    fn random_reveal_never_opens_pick() {
        let mut rng = rng(5);
        for _ in 0..200 {
            let mut game = Game::with_layout(vec![true, true, false]).unwrap();
            game.pick_door(1).unwrap();
            match game.reveal(HostStrategy::Random, &mut rng) {
                Reveal::Opened(door) => assert_ne!(door, 1),
                Reveal::RerollRequired => panic!("random host always has a door"),
            }
            assert!(!game.visible()[1]);
        }
    }

    #[test]
    fn stay_keeps_pick_and_noops_without_one() {
        let mut rng = rng(6);
        let mut game = Game::with_layout(vec![true, false, false]).unwrap();
        game.choose(PlayerStrategy::Stay, &mut rng);
        assert_eq!(game.choice(), None);
        assert_eq!(game.phase(), Phase::Fresh);

        game.pick_door(2).unwrap();
        game.open(1).unwrap();
        game.choose(PlayerStrategy::Stay, &mut rng);
        assert_eq!(game.choice(), Some(2));
    }

    #[test]
    fn update_switches_to_other_closed_door() {
        let mut rng = rng(7);
        for _ in 0..100 {
            let mut game = Game::with_layout(vec![false, true, false]).unwrap();
            game.pick_door(0).unwrap();
            game.open(2).unwrap();
            game.choose(PlayerStrategy::Update, &mut rng);
            assert_eq!(game.choice(), Some(1));
        }
    }

    #[test]
    fn update_with_opened_pick_uses_all_closed_doors() {
        let mut rng = rng(8);
        let mut game = Game::with_layout(vec![false, false, true, false]).unwrap();
        game.open(0).unwrap();
        // Pick points at an opened door; the switch falls back to every closed door.
        game.choice = Some(0);
        game.choose(PlayerStrategy::Update, &mut rng);
        let picked = game.choice().unwrap();
        assert!(picked != 0 && !game.visible()[picked]);
    }

    #[test]
    fn random_pick_stays_closed() {
        let mut rng = rng(9);
        for _ in 0..100 {
            let mut game = Game::with_layout(vec![true, false, false, false]).unwrap();
            game.open(3).unwrap();
            game.choose(PlayerStrategy::Random, &mut rng);
            assert_ne!(game.choice(), Some(3));
        }
    }

    #[test]
    fn revealed_prize_is_always_taken() {
        let mut rng = rng(10);
        for strategy in PlayerStrategy::ALL {
            let mut game = Game::with_layout(vec![false, true, false]).unwrap();
            game.pick_door(0).unwrap();
            game.open(1).unwrap();
            game.choose(strategy, &mut rng);
            assert_eq!(game.choice(), Some(1), "strategy {strategy}");
        }
    }

    #[test]
    fn open_rejects_pick_and_out_of_range() {
        let mut game = Game::with_layout(vec![true, false, false]).unwrap();
        game.pick_door(0).unwrap();
        assert!(game.open(0).is_err());
        assert!(game.open(3).is_err());
        assert!(game.pick_door(5).is_err());
    }

    #[test]
    fn with_layout_rejects_short_layouts() {
        assert!(Game::with_layout(vec![true, false]).is_err());
    }

    #[test]
    fn play_resolves_and_records_win() {
        let mut rng = rng(11);
        let request = LayoutRequest::fixed(3, 2).unwrap();
        for _ in 0..200 {
            let mut game = Game::new(request, &mut rng);
            let policy = RerollPolicy::default();
            let win = game
                .play(PlayerStrategy::Update, HostStrategy::Goat, &policy, &mut rng)
                .unwrap();
            let choice = game.choice().unwrap();
            assert_eq!(win, game.prizes()[choice]);
            assert_eq!(game.win(), win);
            assert_eq!(game.phase(), Phase::Resolved);
            assert_eq!(game.rerolls(), 0);
            assert_eq!(game.visible().iter().filter(|&&v| v).count(), 1);
            assert!(!game.visible()[choice]);
        }
    }

    #[test]
    fn fixed_zero_goats_hits_abort_cap() {
        let mut rng = rng(12);
        let request = LayoutRequest::fixed(3, 0).unwrap();
        let mut game = Game::new(request, &mut rng);
        let policy = RerollPolicy::aborting_after(25);
        let err = game
            .play(PlayerStrategy::Stay, HostStrategy::Goat, &policy, &mut rng)
            .unwrap_err();
        assert_eq!(err, GameError::ExcessiveRerolls { rerolls: 26, limit: 25 });
        assert_eq!(game.rerolls(), 26);
    }

    #[test]
    fn randomized_goats_recover_from_rerolls() {
        let mut rng = rng(13);
        let request = LayoutRequest::new(Some(3), None, 3).unwrap();
        let policy = RerollPolicy::aborting_after(1000);
        let mut total_rerolls = 0;
        for _ in 0..500 {
            let mut game = Game::new(request, &mut rng);
            game.play(PlayerStrategy::Stay, HostStrategy::Goat, &policy, &mut rng)
                .unwrap();
            // A resolved goat-host trial always had a goat other than the first pick.
            assert!(game.goat_count() >= 1);
            total_rerolls += game.rerolls();
        }
        assert!(total_rerolls > 0);
    }

    /// Counts `WARN` events seen while installed.
    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn play_counting_warnings(
        request: LayoutRequest,
        policy: RerollPolicy,
        seed: u64,
    ) -> (Result<bool, GameError>, u32, usize) {
        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        let (result, rerolls) = tracing::subscriber::with_default(subscriber, || {
            let mut rng = rng(seed);
            let mut game = Game::new(request, &mut rng);
            let result = game.play(PlayerStrategy::Stay, HostStrategy::Goat, &policy, &mut rng);
            (result, game.rerolls())
        });
        (result, rerolls, counter.0.load(Ordering::SeqCst))
    }

    #[test]
    fn reroll_warnings_start_after_alert_threshold() {
        let request = LayoutRequest::fixed(3, 0).unwrap();

        // Rerolls 1 through 10 stay quiet.
        let quiet = RerollPolicy {
            alert_after: 10,
            abort_after: Some(10),
        };
        let (result, rerolls, warnings) = play_counting_warnings(request, quiet, 14);
        assert_eq!(result, Err(GameError::ExcessiveRerolls { rerolls: 11, limit: 10 }));
        assert_eq!(rerolls, 11);
        assert_eq!(warnings, 0);

        // Rerolls 11 through 15 each warn; the 16th aborts instead.
        let noisy = RerollPolicy {
            alert_after: 10,
            abort_after: Some(15),
        };
        let (result, rerolls, warnings) = play_counting_warnings(request, noisy, 14);
        assert_eq!(result, Err(GameError::ExcessiveRerolls { rerolls: 16, limit: 15 }));
        assert_eq!(rerolls, 16);
        assert_eq!(warnings, 5);
    }

    #[test]
    fn reroll_warning_does_not_stop_the_trial() {
        // Randomized goats eventually allow a reveal; every reroll warns on the way.
        let request = LayoutRequest::new(Some(3), None, 3).unwrap();
        let policy = RerollPolicy {
            alert_after: 0,
            abort_after: None,
        };
        for seed in 0..50 {
            let (result, rerolls, warnings) = play_counting_warnings(request, policy, seed);
            assert!(result.is_ok());
            assert_eq!(warnings, rerolls as usize);
        }
    }

    #[test]
    fn reveal_without_first_pick_keeps_phase() {
        let mut rng = rng(15);
        let mut game = Game::with_layout(vec![false, true, true]).unwrap();
        match game.reveal(HostStrategy::Random, &mut rng) {
            Reveal::Opened(door) => assert!(game.visible()[door]),
            Reveal::RerollRequired => panic!("random host always has a door"),
        }
        assert_eq!(game.phase(), Phase::Fresh);

        game.choose(PlayerStrategy::Random, &mut rng);
        assert_eq!(game.phase(), Phase::FirstChoiceMade);
    }
}
