use std::time::Duration;

use deck_rs::animation::{CountUp, group_thousands};
use deck_rs::chart::{css_percent, scale_to_max};
use deck_rs::interaction::{Direction, PagerStep, ScenePager, VisibilityChange, VisibilityGate};
use proptest::prelude::*;

proptest! {
    #[test]
    fn count_up_is_monotone_and_ends_exactly(
        start in -10_000i64..10_000,
        span in 0i64..1_000_000,
        duration_ms in 1u64..5_000,
        samples in proptest::collection::vec(0u64..6_000, 1..40)
    ) {
        let end = start + span;
        let count = CountUp::new(start, end, Duration::from_millis(duration_ms));
        let mut samples = samples;
        samples.sort_unstable();

        let mut last = start;
        for sample in samples {
            let value = count.value_at(Duration::from_millis(sample));
            prop_assert!(value >= last);
            prop_assert!(value <= end);
            if sample < duration_ms {
                prop_assert!(value < end || span == 0);
            }
            last = value;
        }
        prop_assert_eq!(count.value_at(Duration::from_millis(duration_ms)), end);
    }

    #[test]
    fn grouped_text_parses_back_to_the_value(value in any::<i64>().prop_filter("not min", |v| *v != i64::MIN)) {
        let text = group_thousands(value);
        let parsed: i64 = text.replace(',', "").parse().expect("numeric");
        prop_assert_eq!(parsed, value);
        let digits = text.trim_start_matches('-');
        for group in digits.split(',').skip(1) {
            prop_assert_eq!(group.len(), 3);
        }
    }

    #[test]
    fn scaled_bars_stay_within_percent_range(values in proptest::collection::vec(0.0f64..1e6, 1..30)) {
        let scaled = scale_to_max(&values);
        prop_assert_eq!(scaled.len(), values.len());
        for percent in &scaled {
            prop_assert!((0.0..=100.0).contains(percent));
            prop_assert!(css_percent(*percent).ends_with('%'));
        }
        if values.iter().any(|value| *value > 0.0) {
            prop_assert!(scaled.iter().any(|percent| (*percent - 100.0).abs() < 1e-9));
        }
    }

    #[test]
    fn inputs_inside_cooldown_move_at_most_once(
        len in 2usize..10,
        cooldown_ms in 1u64..2_000,
        gaps in proptest::collection::vec(0u64..3_000, 1..30)
    ) {
        let cooldown = Duration::from_millis(cooldown_ms);
        let mut pager = ScenePager::new(len, cooldown);
        let mut now = Duration::ZERO;
        let mut last_move: Option<Duration> = None;
        for gap in gaps {
            now += Duration::from_millis(gap);
            let before = pager.index();
            match pager.step(Direction::Next, now) {
                PagerStep::Moved { from, to } => {
                    prop_assert_eq!(from, before);
                    prop_assert_eq!(to, before + 1);
                    if let Some(previous) = last_move {
                        prop_assert!(now >= previous + cooldown);
                    }
                    last_move = Some(now);
                }
                PagerStep::Throttled => {
                    prop_assert!(last_move.is_some_and(|previous| now < previous + cooldown));
                    prop_assert_eq!(pager.index(), before);
                }
                PagerStep::FallThrough => prop_assert_eq!(before, len - 1),
                PagerStep::Ignored => prop_assert!(false, "step never ignores"),
            }
        }
    }

    #[test]
    fn visibility_gate_reports_alternating_crossings(
        threshold in 0.05f64..1.0,
        ratios in proptest::collection::vec(0.0f64..=1.0, 1..50)
    ) {
        let mut gate = VisibilityGate::new(threshold).expect("valid threshold");
        let mut expected = VisibilityChange::Entered;
        for ratio in ratios {
            if let Some(change) = gate.observe(ratio) {
                prop_assert_eq!(change, expected);
                expected = match change {
                    VisibilityChange::Entered => VisibilityChange::Left,
                    VisibilityChange::Left => VisibilityChange::Entered,
                };
            }
            prop_assert_eq!(gate.is_visible(), ratio >= threshold);
        }
    }
}
