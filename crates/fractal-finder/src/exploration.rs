//! The game's state machine: camera control, target discovery and level
//! progression, advanced once per frame by [`ExplorationState::tick`].

use finder_engine::coords::ColorRgba;

use crate::config::{COUNTER_CEILING, FADE_STEP, TARGETS_PER_LEVEL};
use crate::input::TickInput;
use crate::levels::{LevelDescriptor, LevelTable};
use crate::viewport::{Camera, is_hit};

/// What a tick changed, for logging and tests.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TickOutcome {
    pub close_requested: bool,
    /// Targets discovered this tick, in index order.
    pub found: Vec<usize>,
    pub level_loaded: bool,
    /// Set on the single tick that wraps past the last level.
    pub just_won: bool,
}

#[derive(Debug, Clone)]
pub struct ExplorationState {
    level: usize,
    found: [bool; TARGETS_PER_LEVEL],
    markers: [ColorRgba; TARGETS_PER_LEVEL],
    counter: u32,
    camera: Camera,
    won: bool,
    /// Bumped on every level load; previews are keyed on it.
    generation: u64,
}

impl ExplorationState {
    /// Fresh game positioned on the first level of `table`.
    pub fn new(table: &LevelTable) -> Self {
        let mut state = Self {
            level: 0,
            found: [false; TARGETS_PER_LEVEL],
            markers: [ColorRgba::white(); TARGETS_PER_LEVEL],
            counter: 0,
            camera: Camera::default(),
            won: false,
            generation: 0,
        };
        state.load_level(table);
        state
    }

    pub fn level_index(&self) -> usize {
        self.level
    }

    pub fn level<'t>(&self, table: &'t LevelTable) -> &'t LevelDescriptor {
        &table[self.level]
    }

    pub fn found(&self) -> &[bool; TARGETS_PER_LEVEL] {
        &self.found
    }

    pub fn all_found(&self) -> bool {
        self.found.iter().all(|f| *f)
    }

    /// Tint applied to each preview.
    pub fn markers(&self) -> &[ColorRgba; TARGETS_PER_LEVEL] {
        &self.markers
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Escape-iteration depth for the live view; the counter doubles as it.
    pub fn iteration_depth(&self) -> u32 {
        self.counter
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Advances one frame.
    pub fn tick(&mut self, input: &TickInput, table: &LevelTable) -> TickOutcome {
        let mut outcome = TickOutcome {
            close_requested: input.escape_pressed,
            ..TickOutcome::default()
        };
        if self.won {
            return outcome;
        }

        self.camera.zoom_by_scroll(input.scroll_lines);

        if let Some(target) = input.jump_to.and_then(|i| self.level(table).targets.get(i)) {
            self.camera.pan = target.center;
        }

        if input.reset_held {
            self.camera.reset();
        }

        let view = input.view;
        if input.pan_held && !view.is_empty() {
            self.camera.pan_by_drag(input.pointer_delta, view.size);
        }

        if let Some(click) = input.click.filter(|p| !view.is_empty() && view.contains(*p)) {
            let world = self.camera.screen_to_world(view.to_local(click), view.size);
            let targets = &table[self.level].targets;
            for (i, target) in targets.iter().enumerate() {
                if !self.found[i] && is_hit(world, target) {
                    self.found[i] = true;
                    outcome.found.push(i);
                    log::info!("level {}: found target {}", self.level + 1, i + 1);
                }
            }
        }

        for (marker, found) in self.markers.iter_mut().zip(self.found) {
            if found {
                *marker = marker.faded(FADE_STEP);
            }
        }

        if self.all_found() {
            self.counter = self.counter.saturating_sub(1);
            if self.counter == 0 {
                self.advance(table);
                outcome.level_loaded = true;
                outcome.just_won = self.won;
            }
        } else if self.counter < COUNTER_CEILING {
            self.counter += 1;
        }

        outcome
    }

    fn advance(&mut self, table: &LevelTable) {
        log::info!("level {} cleared", self.level + 1);
        self.camera.reset();
        self.level += 1;
        if self.level >= table.len() {
            self.level = 0;
            self.won = true;
            log::info!("all {} levels cleared", table.len());
        }
        self.load_level(table);
    }

    fn load_level(&mut self, table: &LevelTable) {
        self.found = [false; TARGETS_PER_LEVEL];
        self.markers = [ColorRgba::white(); TARGETS_PER_LEVEL];
        self.generation += 1;
        log::info!("loaded level {} ({})", self.level + 1, table[self.level].kernel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finder_engine::coords::{Rect, Vec2};
    use proptest::prelude::*;

    use crate::levels::{Kernel, LevelDescriptor, Target};

    const VIEW: Rect = Rect::new(0.0, 0.0, 400.0, 400.0);

    fn table(levels: usize) -> LevelTable {
        let desc = LevelDescriptor {
            kernel: Kernel::Mandelbrot,
            targets: [
                Target::new(-1.0, -1.0, 0.2),
                Target::new(1.0, -1.0, 0.2),
                Target::new(-1.0, 1.0, 0.2),
                Target::new(1.0, 1.0, 0.2),
            ],
        };
        LevelTable::new(vec![desc; levels]).unwrap()
    }

    fn idle() -> TickInput {
        TickInput::idle(VIEW)
    }

    // Default camera spans [-2, 2] over 400 px, so plane (x, y) sits at
    // pixel (100 * (x + 2), 100 * (y + 2)).
    fn click_at(world: Vec2) -> TickInput {
        TickInput {
            click: Some(Vec2::new(100.0 * (world.x + 2.0), 100.0 * (world.y + 2.0))),
            ..idle()
        }
    }

    fn find_all(state: &mut ExplorationState, table: &LevelTable) {
        for t in table[state.level_index()].targets {
            state.tick(&click_at(t.center), table);
        }
    }

    fn tick_until_loaded(state: &mut ExplorationState, table: &LevelTable) -> TickOutcome {
        for _ in 0..=COUNTER_CEILING {
            let outcome = state.tick(&idle(), table);
            if outcome.level_loaded {
                return outcome;
            }
        }
        panic!("level never advanced");
    }

    #[test]
    fn new_game_starts_on_first_level() {
        let t = table(3);
        let state = ExplorationState::new(&t);
        assert_eq!(state.level_index(), 0);
        assert_eq!(state.found(), &[false; 4]);
        assert_eq!(state.markers(), &[ColorRgba::white(); 4]);
        assert_eq!(state.counter(), 0);
        assert!(!state.is_won());
        assert_eq!(state.generation(), 1);
    }

    #[test]
    fn counter_climbs_to_ceiling_and_stays() {
        let t = table(1);
        let mut state = ExplorationState::new(&t);
        for _ in 0..100 {
            state.tick(&idle(), &t);
        }
        assert_eq!(state.iteration_depth(), COUNTER_CEILING);
    }

    #[test]
    fn click_finds_target_and_marker_fades() {
        let t = table(1);
        let mut state = ExplorationState::new(&t);

        let outcome = state.tick(&click_at(Vec2::new(1.0, -1.0)), &t);
        assert_eq!(outcome.found, vec![1]);
        assert_eq!(state.found(), &[false, true, false, false]);

        let m = state.markers()[1];
        assert!((m.r - 0.95).abs() < 1e-6 && (m.a - 0.95).abs() < 1e-6);
        assert_eq!(state.markers()[0], ColorRgba::white());

        for _ in 0..40 {
            state.tick(&idle(), &t);
        }
        assert_eq!(state.markers()[1], ColorRgba::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn found_target_is_not_reported_twice() {
        let t = table(1);
        let mut state = ExplorationState::new(&t);
        state.tick(&click_at(Vec2::new(-1.0, 1.0)), &t);
        let again = state.tick(&click_at(Vec2::new(-1.0, 1.0)), &t);
        assert!(again.found.is_empty());
    }

    #[test]
    fn miss_changes_nothing() {
        let t = table(1);
        let mut state = ExplorationState::new(&t);
        let outcome = state.tick(&click_at(Vec2::new(0.0, 0.0)), &t);
        assert!(outcome.found.is_empty());
        assert_eq!(state.found(), &[false; 4]);
    }

    #[test]
    fn click_outside_view_is_ignored() {
        let t = table(1);
        let mut state = ExplorationState::new(&t);
        // Beyond the right edge of the view.
        let input = TickInput {
            click: Some(Vec2::new(450.0, 100.0)),
            ..idle()
        };
        assert!(state.tick(&input, &t).found.is_empty());
    }

    #[test]
    fn digit_jump_pans_to_target() {
        let t = table(1);
        let mut state = ExplorationState::new(&t);
        let input = TickInput { jump_to: Some(3), ..idle() };
        state.tick(&input, &t);
        assert_eq!(state.camera().pan, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn reset_overrides_jump_and_scroll() {
        let t = table(1);
        let mut state = ExplorationState::new(&t);
        let input = TickInput {
            jump_to: Some(0),
            scroll_lines: 3.0,
            reset_held: true,
            ..idle()
        };
        state.tick(&input, &t);
        assert_eq!(*state.camera(), Camera::default());
    }

    #[test]
    fn drag_pans_only_while_held() {
        let t = table(1);
        let mut state = ExplorationState::new(&t);
        let moved = TickInput { pointer_delta: Vec2::new(100.0, 0.0), ..idle() };
        state.tick(&moved, &t);
        assert_eq!(state.camera().pan, Vec2::zero());

        let dragged = TickInput { pan_held: true, ..moved };
        state.tick(&dragged, &t);
        assert!((state.camera().pan.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn clearing_a_level_counts_down_then_advances() {
        let t = table(3);
        let mut state = ExplorationState::new(&t);
        for _ in 0..10 {
            state.tick(&idle(), &t);
        }
        find_all(&mut state, &t);
        assert!(state.all_found());
        // Three clicks counted up, the fourth started the countdown.
        assert_eq!(state.counter(), 12);

        let outcome = tick_until_loaded(&mut state, &t);
        assert!(!outcome.just_won);
        assert_eq!(state.level_index(), 1);
        assert_eq!(state.found(), &[false; 4]);
        assert_eq!(state.markers(), &[ColorRgba::white(); 4]);
        assert_eq!(*state.camera(), Camera::default());
        assert_eq!(state.generation(), 2);
    }

    #[test]
    fn countdown_starts_from_current_counter() {
        let t = table(2);
        let mut state = ExplorationState::new(&t);
        let mut last = TickOutcome::default();
        for target in t[0].targets {
            // Each click tick also counts the counter up, except the last.
            last = state.tick(&click_at(target.center), &t);
        }
        assert_eq!(state.counter(), 2);
        assert!(!last.level_loaded);
        state.tick(&idle(), &t);
        assert!(state.tick(&idle(), &t).level_loaded);
    }

    #[test]
    fn last_level_wraps_and_wins_once() {
        let t = table(2);
        let mut state = ExplorationState::new(&t);

        state.tick(&idle(), &t);
        find_all(&mut state, &t);
        assert!(!tick_until_loaded(&mut state, &t).just_won);
        assert_eq!(state.level_index(), 1);

        state.tick(&idle(), &t);
        find_all(&mut state, &t);
        let outcome = tick_until_loaded(&mut state, &t);
        assert!(outcome.just_won);
        assert!(state.is_won());
        assert_eq!(state.level_index(), 0);
        let generation = state.generation();

        for _ in 0..200 {
            let outcome = state.tick(&click_at(Vec2::new(-1.0, -1.0)), &t);
            assert!(!outcome.level_loaded && outcome.found.is_empty());
        }
        assert_eq!(state.level_index(), 0);
        assert_eq!(state.generation(), generation);
    }

    #[test]
    fn escape_requests_close_even_after_winning() {
        let t = table(1);
        let mut state = ExplorationState::new(&t);
        let input = TickInput { escape_pressed: true, ..idle() };
        assert!(state.tick(&input, &t).close_requested);

        state.tick(&idle(), &t);
        find_all(&mut state, &t);
        tick_until_loaded(&mut state, &t);
        assert!(state.is_won());
        assert!(state.tick(&input, &t).close_requested);
    }

    #[test]
    fn authored_table_plays_through() {
        let t = LevelTable::authored().unwrap();
        let mut state = ExplorationState::new(&t);
        for level in 0..t.len() {
            assert_eq!(state.level_index(), level);
            state.tick(&idle(), &t);
            find_all(&mut state, &t);
            assert!(state.all_found(), "level {level} targets not reachable by click");
            tick_until_loaded(&mut state, &t);
        }
        assert!(state.is_won());
    }

    proptest! {
        #[test]
        fn counter_stays_in_range(clicks in proptest::collection::vec(
            proptest::option::of((0.0f32..400.0, 0.0f32..400.0)), 0..300)) {
            let t = table(2);
            let mut state = ExplorationState::new(&t);
            for click in clicks {
                let input = TickInput { click: click.map(|(x, y)| Vec2::new(x, y)), ..idle() };
                state.tick(&input, &t);
                prop_assert!(state.counter() <= COUNTER_CEILING);
                prop_assert!(state.level_index() < t.len());
                for m in state.markers() {
                    prop_assert!((0.0..=1.0).contains(&m.a));
                }
            }
        }

        #[test]
        fn markers_fade_only_once_found(picks in proptest::collection::vec(
            proptest::option::of(0usize..TARGETS_PER_LEVEL), 0..400)) {
            let t = table(2);
            let mut state = ExplorationState::new(&t);
            for pick in picks {
                let before = *state.markers();
                let was_won = state.is_won();
                let input = match pick {
                    Some(i) => click_at(t[state.level_index()].targets[i].center),
                    None => idle(),
                };
                let outcome = state.tick(&input, &t);

                if was_won {
                    prop_assert_eq!(*state.markers(), before);
                } else if outcome.level_loaded {
                    prop_assert!(state.markers().iter().all(|m| *m == ColorRgba::white()));
                } else {
                    for i in 0..TARGETS_PER_LEVEL {
                        let after = state.markers()[i];
                        if state.found()[i] {
                            prop_assert_eq!(after, before[i].faded(FADE_STEP));
                            prop_assert!(after.to_array().iter().all(|c| *c >= 0.0));
                        } else {
                            prop_assert_eq!(after, before[i]);
                        }
                    }
                }
            }
        }
    }
}
