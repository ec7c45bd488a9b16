//! Per-tick game state machine
//!
//! Ordering inside a playing tick is fixed: flight, missile, collisions,
//! damage, outcome. Won and Lost freeze everything but the outcome clock
//! until a restart.

use super::collision::{self, Contacts};
use super::flight::{self, Intents};
use super::missile;
use super::state::{GameOutcome, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Start over (only honoured once the run is won or lost)
    pub restart: bool,
}

impl TickInput {
    pub fn intents(&self) -> Intents {
        Intents {
            up: self.up,
            down: self.down,
            left: self.left,
            right: self.right,
        }
    }
}

/// Damage sources, in the order they are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageEvent {
    Wall,
    Missile,
    Water,
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub damage: Vec<DamageEvent>,
    pub missile_spawned: bool,
    pub missile_retired: bool,
    /// Outcome entered on this tick (restart reports `Playing`)
    pub transition: Option<GameOutcome>,
}

/// Advance the game state by one tick of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickReport {
    let mut report = TickReport::default();

    if state.outcome.is_terminal() {
        if input.restart {
            log::info!("Restarting after {:?} (seed {})", state.outcome, state.seed);
            state.restart();
            report.transition = Some(GameOutcome::Playing);
        } else {
            state.outcome_time += dt;
            state.hit_timer = (state.hit_timer - dt).max(0.0);
        }
        return report;
    }

    state.time += dt;
    state.time_ticks += 1;
    state.hit_timer = (state.hit_timer - dt).max(0.0);

    // Flight reads the flags from the previous collision pass
    state.jet.transform = flight::advance(
        &state.jet.transform,
        state.jet.speed,
        state.tuning.smoothing,
        input.intents(),
        dt,
        &state.contacts,
    );

    if state.missile.shown {
        missile::home(&mut state.missile, &state.jet.transform, state.tuning.smoothing);
    } else {
        report.missile_spawned = missile::try_spawn(
            &mut state.missile,
            &state.jet.transform,
            state.time,
            &state.tuning,
            &mut state.rng,
        );
    }

    let contacts = collision::detect(&state.jet, &state.missile, &state.tuning);
    state.contacts = contacts;

    apply_damage(state, &contacts, &mut report);

    if contacts.missile {
        state.missile.park();
        report.missile_retired = true;
        log::debug!("Missile impact, health {:.2}", state.jet.health);
    } else if state.missile.shown
        && missile::overshot(&state.missile, &state.jet.transform, state.tuning.retire_margin)
    {
        state.missile.shown = false;
        report.missile_retired = true;
        log::debug!("Missile overshot the jet at t={:.2}", state.time);
    }

    if state.jet.health <= 0.0 {
        state.jet.health = 0.0;
        enter_outcome(state, GameOutcome::Lost, &mut report);
    } else if contacts.goal {
        enter_outcome(state, GameOutcome::Won, &mut report);
    }

    report
}

/// Wall scrape, then missile impact, then the water override.
/// Wall and missile damage stack within a tick.
fn apply_damage(state: &mut GameState, contacts: &Contacts, report: &mut TickReport) {
    let tuning = &state.tuning;

    if contacts.left_wall || contacts.right_wall {
        state.jet.health -= tuning.wall_damage;
        report.damage.push(DamageEvent::Wall);
    }
    if contacts.missile {
        state.jet.health -= tuning.missile_damage;
        report.damage.push(DamageEvent::Missile);
    }
    if contacts.water {
        state.jet.health = 0.0;
        report.damage.push(DamageEvent::Water);
    }

    if !report.damage.is_empty() {
        state.hit_timer = tuning.hit_cooldown;
    }
}

fn enter_outcome(state: &mut GameState, outcome: GameOutcome, report: &mut TickReport) {
    state.outcome = outcome;
    state.outcome_time = 0.0;
    report.transition = Some(outcome);
    log::info!(
        "Run {:?} at t={:.2}s, distance {:.1}, health {:.2}",
        outcome,
        state.time,
        state.jet.position().z,
        state.jet.health
    );
}
