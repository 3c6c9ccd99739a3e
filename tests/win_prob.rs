use chicago_sports::team::{Source, Sport, TeamRecord};
use chicago_sports::win_prob::{
    ProbabilityLabel, Standing, calculate_win_probability, probability_label,
};

fn s(wins: u32, losses: u32) -> Standing {
    Standing::new(wins, losses)
}

#[test]
fn no_games_played_is_coin_flip() {
    assert_eq!(calculate_win_probability(&s(0, 0), &s(9, 3), true), 50);
    assert_eq!(calculate_win_probability(&s(9, 3), &s(0, 0), false), 50);
    // Zero games beats the both-perfect rule.
    assert_eq!(calculate_win_probability(&s(0, 0), &s(0, 0), true), 50);
}

#[test]
fn both_undefeated_splits_on_home_field() {
    assert_eq!(calculate_win_probability(&s(10, 0), &s(10, 0), true), 53);
    assert_eq!(calculate_win_probability(&s(10, 0), &s(10, 0), false), 47);
}

#[test]
fn weaker_record_scores_lower_than_flipped_matchup() {
    let weak = calculate_win_probability(&s(4, 8), &s(9, 3), true);
    let strong = calculate_win_probability(&s(9, 3), &s(4, 8), true);
    assert!((5..=95).contains(&weak));
    assert!(weak < strong);
    assert_eq!(weak, 17);
    assert_eq!(strong, 89);
}

#[test]
fn every_output_is_within_bounds() {
    for tw in 0..12u32 {
        for tl in 0..12u32 {
            for ow in 0..12u32 {
                for ol in [0u32, 1, 5, 11] {
                    for home in [true, false] {
                        let p = calculate_win_probability(&s(tw, tl), &s(ow, ol), home);
                        assert!((5..=95).contains(&p), "{tw}-{tl} vs {ow}-{ol} home={home}: {p}");
                    }
                }
            }
        }
    }
}

#[test]
fn ties_do_not_feed_the_formula() {
    let hawks = TeamRecord::new("Blackhawks", Sport::Nhl, 6, 6, Some(10), "now", Source::Live);
    let other = TeamRecord::new("Other", Sport::Nhl, 6, 6, None, "now", Source::Live);
    assert_eq!(calculate_win_probability(&hawks, &other, true), 53);
    assert_eq!(calculate_win_probability(&hawks, &other, false), 47);
}

#[test]
fn label_bands() {
    assert_eq!(probability_label(80).as_str(), "Strong Favorite");
    assert_eq!(probability_label(75), ProbabilityLabel::StrongFavorite);
    assert_eq!(probability_label(74), ProbabilityLabel::Favored);
    assert_eq!(probability_label(60).to_string(), "Favored");
    assert_eq!(probability_label(45).as_str(), "Toss-up");
    assert_eq!(probability_label(30).as_str(), "Underdog");
    assert_eq!(probability_label(29).as_str(), "Heavy Underdog");
    assert_eq!(probability_label(10).as_str(), "Heavy Underdog");
}

#[test]
fn max_counts_do_not_overflow() {
    let huge: Standing = "4294967295-1".parse().expect("valid standing");
    assert_eq!(calculate_win_probability(&huge, &s(9, 3), true), 95);
    assert_eq!(calculate_win_probability(&s(9, 3), &huge, true), 5);
    assert_eq!(calculate_win_probability(&s(u32::MAX, u32::MAX), &s(u32::MAX, u32::MAX), true), 53);

    let rec = TeamRecord::new("X", Sport::Nhl, u32::MAX, u32::MAX, Some(u32::MAX), "", Source::Live);
    assert_eq!(rec.games_played(), 3 * u64::from(u32::MAX));
    assert_eq!(rec.win_pct(), Some(0.5));
}
