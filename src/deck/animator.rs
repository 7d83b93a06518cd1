//! Shuffle animation sequence.
//!
//! After the deck is permuted and re-rendered, the cards gather at the center
//! of the container, play a staggered shuffle animation, then spread back to
//! their layout positions:
//!
//! ```text
//! start ─frame─▶ Gather ─400ms─▶ Shuffle ─2000ms─▶ Collect ─frame─▶ Spread ─400ms─▶ Settle ─▶ Idle
//! ```
//!
//! The first frame belongs to the response that carried the shuffled list, so
//! the gather step holds off until the rendered list reports the current
//! shuffle generation (or [`SWAP_WAIT_FRAMES`] frames have passed).
//!
//! The animator never touches a clock or the DOM itself. [`drive`] runs the
//! pending phase against a [`Surface`] and asks a [`Scheduler`] to call back
//! when the next phase is due. The browser backs these with
//! `requestAnimationFrame`/timers; tests use a virtual clock.

use crate::config::ShuffleTimings;
use crate::error::DeckError;

/// Frames the gather step waits for the shuffled list to reach the page.
pub const SWAP_WAIT_FRAMES: u32 = 30;

/// When the next phase should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// Next paint opportunity.
    NextFrame,
    /// After a fixed delay in milliseconds.
    After(u32),
}

/// The phase that will run on the next wake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Gather,
    Shuffle,
    Collect,
    Spread,
    Settle,
}

/// Visual change applied to one rendered card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Add `center-start` and translate by the offset, with no transition.
    Gather { dx: f64, dy: f64 },
    /// Clear the translation, swap `center-start` for `center-shuffle`, set the stagger.
    Shuffle { delay_ms: u32 },
    /// Remove `center-shuffle` and reset the stagger.
    Collect,
    /// Add `spread` and clear the transform.
    Spread,
    /// Remove `spread` and clear the transform.
    Settle,
}

/// The rendered card list the animation plays on.
pub trait Surface {
    /// Number of rendered cards.
    fn card_count(&self) -> usize;
    /// Offset from each card's center to the container's center, in render order.
    fn offsets_to_center(&self) -> Vec<(f64, f64)>;
    /// Shuffle generation the rendered list was produced for, if any.
    fn rendered_generation(&self) -> Option<u64>;
    fn apply(&mut self, index: usize, effect: Effect);
}

/// Arranges for [`drive`] to be called again at `wake`.
pub trait Scheduler {
    fn schedule(&mut self, wake: Wake);
}

#[derive(Debug, Clone, Default)]
pub struct ShuffleAnimator {
    timings: ShuffleTimings,
    phase: Phase,
    generation: u64,
    waited_frames: u32,
}

impl ShuffleAnimator {
    pub fn new(timings: ShuffleTimings) -> Self {
        Self {
            timings,
            phase: Phase::Idle,
            generation: 0,
            waited_frames: 0,
        }
    }

    pub fn timings(&self) -> &ShuffleTimings {
        &self.timings
    }

    pub fn set_timings(&mut self, timings: ShuffleTimings) {
        self.timings = timings;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Bumped by every `start`; the renderer stamps it on the shuffled list.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The re-entrancy guard: true from `start` until `Settle` has run.
    pub fn is_shuffling(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Begin a sequence. The deck must already be permuted and re-rendered.
    pub fn start(&mut self) -> Result<Wake, DeckError> {
        if self.is_shuffling() {
            return Err(DeckError::ShuffleInProgress);
        }
        self.phase = Phase::Gather;
        self.generation = self.generation.wrapping_add(1);
        self.waited_frames = 0;
        Ok(Wake::NextFrame)
    }

    /// Run the pending phase and return when the next one is due.
    /// `None` means the sequence finished (or was never started).
    pub fn advance(&mut self, surface: &mut dyn Surface) -> Option<Wake> {
        let (next, wake) = match self.phase {
            Phase::Idle => return None,
            Phase::Gather => {
                if surface.rendered_generation() != Some(self.generation) {
                    if self.waited_frames < SWAP_WAIT_FRAMES {
                        self.waited_frames += 1;
                        return Some(Wake::NextFrame);
                    }
                    log::warn!(
                        "shuffled list {} not on the page after {} frames; animating what is there",
                        self.generation,
                        SWAP_WAIT_FRAMES
                    );
                }
                for (i, (dx, dy)) in surface.offsets_to_center().into_iter().enumerate() {
                    surface.apply(i, Effect::Gather { dx, dy });
                }
                (Phase::Shuffle, Some(Wake::After(self.timings.gather_ms)))
            }
            Phase::Shuffle => {
                for i in 0..surface.card_count() {
                    let delay_ms = self.timings.stagger_for(i);
                    surface.apply(i, Effect::Shuffle { delay_ms });
                }
                (Phase::Collect, Some(Wake::After(self.timings.shuffle_ms)))
            }
            Phase::Collect => {
                apply_all(surface, Effect::Collect);
                (Phase::Spread, Some(Wake::NextFrame))
            }
            Phase::Spread => {
                apply_all(surface, Effect::Spread);
                (Phase::Settle, Some(Wake::After(self.timings.spread_ms)))
            }
            Phase::Settle => {
                apply_all(surface, Effect::Settle);
                (Phase::Idle, None)
            }
        };
        log::trace!("shuffle phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
        wake
    }
}

fn apply_all(surface: &mut dyn Surface, effect: Effect) {
    for i in 0..surface.card_count() {
        surface.apply(i, effect);
    }
}

/// Advance one phase and schedule the next. Returns false once the sequence is done.
pub fn drive(
    animator: &mut ShuffleAnimator,
    surface: &mut dyn Surface,
    scheduler: &mut dyn Scheduler,
) -> bool {
    match animator.advance(surface) {
        Some(wake) => {
            scheduler.schedule(wake);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Virtual clock: frames cost nothing, delays add to `elapsed_ms`.
    #[derive(Default)]
    struct ManualScheduler {
        pending: VecDeque<Wake>,
        elapsed_ms: u64,
        frames: u32,
    }

    impl Scheduler for ManualScheduler {
        fn schedule(&mut self, wake: Wake) {
            self.pending.push_back(wake);
        }
    }

    impl ManualScheduler {
        /// Fire the next pending wake, advancing virtual time.
        fn fire(&mut self) -> bool {
            match self.pending.pop_front() {
                Some(Wake::NextFrame) => {
                    self.frames += 1;
                    true
                }
                Some(Wake::After(ms)) => {
                    self.elapsed_ms += u64::from(ms);
                    true
                }
                None => false,
            }
        }
    }

    struct RecordingSurface {
        offsets: Vec<(f64, f64)>,
        rendered: Option<u64>,
        log: Vec<(usize, Effect)>,
    }

    impl RecordingSurface {
        fn with_cards(n: usize) -> Self {
            Self {
                offsets: (0..n).map(|i| (i as f64 * 10.0, -(i as f64))).collect(),
                rendered: None,
                log: Vec::new(),
            }
        }

        fn effects_for(&self, index: usize) -> Vec<Effect> {
            self.log
                .iter()
                .filter(|(i, _)| *i == index)
                .map(|(_, e)| *e)
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn card_count(&self) -> usize {
            self.offsets.len()
        }

        fn offsets_to_center(&self) -> Vec<(f64, f64)> {
            self.offsets.clone()
        }

        fn rendered_generation(&self) -> Option<u64> {
            self.rendered
        }

        fn apply(&mut self, index: usize, effect: Effect) {
            self.log.push((index, effect));
        }
    }

    fn run_to_end(
        animator: &mut ShuffleAnimator,
        surface: &mut RecordingSurface,
        scheduler: &mut ManualScheduler,
    ) {
        let first = animator.start().unwrap();
        surface.rendered = Some(animator.generation());
        scheduler.schedule(first);
        while scheduler.fire() {
            drive(animator, surface, scheduler);
        }
    }

    #[test]
    fn full_sequence_runs_in_order() {
        let mut animator = ShuffleAnimator::new(ShuffleTimings::default());
        let mut surface = RecordingSurface::with_cards(3);
        let mut scheduler = ManualScheduler::default();

        run_to_end(&mut animator, &mut surface, &mut scheduler);

        assert!(!animator.is_shuffling());
        assert_eq!(scheduler.elapsed_ms, 400 + 2000 + 400);
        assert_eq!(scheduler.frames, 2);
        assert_eq!(
            surface.effects_for(1),
            vec![
                Effect::Gather { dx: 10.0, dy: -1.0 },
                Effect::Shuffle { delay_ms: 100 },
                Effect::Collect,
                Effect::Spread,
                Effect::Settle,
            ]
        );
        assert_eq!(surface.log.len(), 3 * 5);
    }

    #[test]
    fn stagger_wraps_across_many_cards() {
        let mut animator = ShuffleAnimator::new(ShuffleTimings::default());
        let mut surface = RecordingSurface::with_cards(7);
        let mut scheduler = ManualScheduler::default();
        run_to_end(&mut animator, &mut surface, &mut scheduler);

        let delays: Vec<u32> = surface
            .log
            .iter()
            .filter_map(|(_, e)| match e {
                Effect::Shuffle { delay_ms } => Some(*delay_ms),
                _ => None,
            })
            .collect();
        assert_eq!(delays, vec![0, 100, 200, 300, 400, 0, 100]);
    }

    #[test]
    fn guard_blocks_reentry_until_settled() {
        let mut animator = ShuffleAnimator::default();
        let mut surface = RecordingSurface::with_cards(2);
        let mut scheduler = ManualScheduler::default();

        assert_eq!(animator.start(), Ok(Wake::NextFrame));
        assert_eq!(animator.start(), Err(DeckError::ShuffleInProgress));
        surface.rendered = Some(animator.generation());

        // Gather, Shuffle, Collect, Spread leave the guard set.
        for _ in 0..4 {
            assert!(drive(&mut animator, &mut surface, &mut scheduler));
            assert!(animator.is_shuffling());
        }
        // Settle releases it.
        assert!(!drive(&mut animator, &mut surface, &mut scheduler));
        assert!(!animator.is_shuffling());
        assert!(animator.start().is_ok());
    }

    #[test]
    fn gather_waits_for_the_shuffled_list() {
        let mut animator = ShuffleAnimator::default();
        let mut surface = RecordingSurface::with_cards(2);
        animator.start().unwrap();
        // the list from the previous shuffle is still on the page
        surface.rendered = Some(animator.generation() - 1);

        for _ in 0..3 {
            assert_eq!(animator.advance(&mut surface), Some(Wake::NextFrame));
            assert_eq!(animator.phase(), Phase::Gather);
        }
        assert!(surface.log.is_empty());

        surface.rendered = Some(animator.generation());
        assert_eq!(animator.advance(&mut surface), Some(Wake::After(400)));
        assert_eq!(animator.phase(), Phase::Shuffle);
        assert_eq!(surface.effects_for(0), vec![Effect::Gather { dx: 0.0, dy: 0.0 }]);
    }

    #[test]
    fn gather_gives_up_waiting_after_the_frame_budget() {
        let mut animator = ShuffleAnimator::default();
        let mut surface = RecordingSurface::with_cards(1);
        animator.start().unwrap();

        for _ in 0..SWAP_WAIT_FRAMES {
            assert_eq!(animator.advance(&mut surface), Some(Wake::NextFrame));
        }
        assert_eq!(animator.advance(&mut surface), Some(Wake::After(400)));
        assert_eq!(surface.log.len(), 1);
    }

    #[test]
    fn each_start_gets_a_new_generation() {
        let mut animator = ShuffleAnimator::default();
        let mut surface = RecordingSurface::with_cards(1);
        let mut scheduler = ManualScheduler::default();
        run_to_end(&mut animator, &mut surface, &mut scheduler);
        let first = animator.generation();
        run_to_end(&mut animator, &mut surface, &mut scheduler);
        assert_eq!(animator.generation(), first + 1);
        assert_eq!(scheduler.frames, 4);
    }

    #[test]
    fn advance_while_idle_does_nothing() {
        let mut animator = ShuffleAnimator::default();
        let mut surface = RecordingSurface::with_cards(2);
        assert_eq!(animator.advance(&mut surface), None);
        assert!(surface.log.is_empty());
    }

    #[test]
    fn configured_timings_drive_the_delays() {
        let timings = ShuffleTimings {
            gather_ms: 10,
            shuffle_ms: 20,
            spread_ms: 30,
            ..ShuffleTimings::default()
        };
        let mut animator = ShuffleAnimator::new(timings);
        let mut surface = RecordingSurface::with_cards(1);
        let mut scheduler = ManualScheduler::default();
        run_to_end(&mut animator, &mut surface, &mut scheduler);
        assert_eq!(scheduler.elapsed_ms, 60);
    }
}
