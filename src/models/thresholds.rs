//! Opponent-repeat threshold progression across phases of the event.

/// Fallback progression: strict while fresh opponents are plentiful, then
/// relaxed as the pool shrinks.
const DEFAULT_SCHEDULE: &[u32] = &[1, 2];

/// Ordered opponent-repeat limits, one per contiguous phase of rounds.
///
/// This is a policy seam: the round builder only ever asks for the active
/// value via [`ThresholdPolicy::active`], so alternative progressions can be
/// swapped in through [`ThresholdPolicy::from_schedule`] without touching it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ThresholdPolicy {
    schedule: Vec<u32>,
    phase_len: usize,
}

impl ThresholdPolicy {
    /// Progression for a round count: the hand-tuned table where one exists,
    /// otherwise the default with its final value repeated as a backstop when
    /// the round count is not an exact multiple of the progression length.
    pub fn for_rounds(nrounds: usize) -> Self {
        let schedule = match nrounds {
            6 => vec![1, 2, 2],
            8 => vec![1, 2, 2, 3],
            10 => vec![1, 1, 2, 2, 3],
            _ => {
                let mut schedule = DEFAULT_SCHEDULE.to_vec();
                if nrounds % schedule.len() != 0 {
                    if let Some(&last) = schedule.last() {
                        schedule.push(last);
                    }
                }
                schedule
            }
        };
        Self::from_schedule(schedule, nrounds)
    }

    /// Use a custom progression. Each of the `nrounds` rounds maps onto a
    /// contiguous phase of `nrounds / len` rounds; trailing rounds past the
    /// last full phase use the final value.
    pub fn from_schedule(schedule: Vec<u32>, nrounds: usize) -> Self {
        debug_assert!(!schedule.is_empty());
        let phase_len = (nrounds / schedule.len()).max(1);
        Self {
            schedule,
            phase_len,
        }
    }

    /// Max times an opponent may be faced, for the given round.
    pub fn active(&self, rnd: usize) -> u32 {
        let phase = (rnd / self.phase_len).min(self.schedule.len() - 1);
        self.schedule[phase]
    }

    pub fn schedule(&self) -> &[u32] {
        &self.schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_tuned_table_for_8_rounds() {
        let policy = ThresholdPolicy::for_rounds(8);
        assert_eq!(policy.schedule(), &[1, 2, 2, 3]);
        // 4 phases of 2 rounds each
        assert_eq!(policy.active(0), 1);
        assert_eq!(policy.active(1), 1);
        assert_eq!(policy.active(2), 2);
        assert_eq!(policy.active(5), 2);
        assert_eq!(policy.active(6), 3);
        assert_eq!(policy.active(7), 3);
    }

    #[test]
    fn default_fallback_for_even_multiple() {
        let policy = ThresholdPolicy::for_rounds(4);
        assert_eq!(policy.schedule(), &[1, 2]);
        assert_eq!(policy.active(0), 1);
        assert_eq!(policy.active(1), 1);
        assert_eq!(policy.active(2), 2);
        assert_eq!(policy.active(3), 2);
    }

    #[test]
    fn default_fallback_repeats_final_value_as_backstop() {
        // 5 rounds is not a multiple of the default length, so the final
        // value is appended and the trailing rounds clamp onto it
        let policy = ThresholdPolicy::for_rounds(5);
        assert_eq!(policy.schedule(), &[1, 2, 2]);
        assert_eq!(policy.active(0), 1);
        assert_eq!(policy.active(1), 2);
        assert_eq!(policy.active(4), 2);
    }

    #[test]
    fn custom_schedule_clamps_past_last_phase() {
        let policy = ThresholdPolicy::from_schedule(vec![1, 3], 7);
        assert_eq!(policy.active(0), 1);
        assert_eq!(policy.active(2), 1);
        assert_eq!(policy.active(3), 3);
        assert_eq!(policy.active(6), 3);
    }
}
