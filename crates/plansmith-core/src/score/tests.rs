use super::*;

#[test]
fn test_creation() {
    let score = HardSoftScore::of(-2, -100);
    assert_eq!(score.hard(), -2);
    assert_eq!(score.soft(), -100);
    assert_eq!(HardSoftScore::of_hard(3), HardSoftScore::of(3, 0));
    assert_eq!(HardSoftScore::of_soft(-7), HardSoftScore::of(0, -7));
}

#[test]
fn test_feasibility() {
    assert!(HardSoftScore::of(0, -1000).is_feasible());
    assert!(HardSoftScore::of(10, -50).is_feasible());
    assert!(!HardSoftScore::of(-1, 0).is_feasible());

    assert!(HardSoftScore::of(-2, 0).is_feasible_with(-2));
    assert!(!HardSoftScore::of(0, 0).is_feasible_with(1));
}

#[test]
fn test_lexicographic_dominance() {
    assert!(HardSoftScore::of(0, 5) > HardSoftScore::of(-1, 1000));
    assert!(HardSoftScore::of(-1, -1000) > HardSoftScore::of(-2, 0));
    assert!(HardSoftScore::of(0, -50).is_better_than(&HardSoftScore::of(0, -100)));
    assert!(HardSoftScore::of(-1, 0).is_worse_than(&HardSoftScore::of(0, -1)));
}

#[test]
fn test_arithmetic() {
    let s1 = HardSoftScore::of(-1, -100);
    let s2 = HardSoftScore::of(-1, -50);

    assert_eq!(s1 + s2, HardSoftScore::of(-2, -150));
    assert_eq!(s1 - s2, HardSoftScore::of(0, -50));
    assert_eq!(-s1, HardSoftScore::of(1, 100));

    let mut acc = HardSoftScore::ZERO;
    acc += s1;
    acc += HardSoftScore::ONE_SOFT;
    assert_eq!(acc, HardSoftScore::of(-1, -99));

    let total: HardSoftScore = [s1, s2, HardSoftScore::ONE_HARD].into_iter().sum();
    assert_eq!(total, HardSoftScore::of(-1, -150));
}

#[test]
fn test_scale() {
    assert_eq!(HardSoftScore::ONE_HARD.scale(3), HardSoftScore::of(3, 0));
    assert_eq!(HardSoftScore::of(2, -5).scale(-2), HardSoftScore::of(-4, 10));
    assert_eq!(HardSoftScore::of_hard(i64::MAX).scale(2).hard(), i64::MAX);
}

#[test]
fn test_parse() {
    assert_eq!(
        HardSoftScore::parse("0hard/-100soft").unwrap(),
        HardSoftScore::of(0, -100)
    );
    assert_eq!(
        HardSoftScore::parse(" -1hard/19soft ").unwrap(),
        HardSoftScore::of(-1, 19)
    );
    assert!(HardSoftScore::parse("0hard").is_err());
    assert!(HardSoftScore::parse("0/0").is_err());
    assert!(HardSoftScore::parse("xhard/0soft").is_err());
}

#[test]
fn test_display_round_trip() {
    let score = HardSoftScore::of(-1, -100);
    assert_eq!(format!("{}", score), "-1hard/-100soft");
    assert_eq!(score.to_string_repr(), "-1hard/-100soft");
    assert_eq!(format!("{:?}", score), "HardSoftScore(-1, -100)");
}

#[test]
fn test_level_numbers() {
    let score = HardSoftScore::of(-2, -50);
    assert_eq!(score.to_level_numbers(), vec![-2, -50]);
    assert_eq!(HardSoftScore::from_level_numbers(&[-2, -50]), score);
    assert_eq!(HardSoftScore::levels_count(), 2);
    assert_eq!(HardSoftScore::level_label(0), ScoreLevel::Hard);
    assert_eq!(HardSoftScore::level_label(1), ScoreLevel::Soft);
}
