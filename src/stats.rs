//! Derived statistics over the full record list
//!
//! Everything here works on sessions (distinct calendar dates with at least
//! one non-goal record) or on raw set volume. None of it depends on chart
//! filters. Functions that need "now" take `today` explicitly.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::estimator::{try_estimate_e1rm, E1rmFormula};
use crate::models::{is_big_four, LiftRecord, UnitType};
use crate::records::lift_type_frequencies;

/// A week needs this many distinct session dates to count toward a streak
pub const MIN_SESSIONS_PER_WEEK: usize = 3;

/// Width of each momentum comparison window
pub const MOMENTUM_WINDOW_DAYS: i64 = 90;

/// Periods graded for consistency, as (label, days)
pub const CONSISTENCY_PERIODS: [(&str, i64); 6] = [
  ("1M", 30),
  ("3M", 91),
  ("6M", 182),
  ("1Y", 365),
  ("2Y", 730),
  ("5Y", 1826),
];

/// ---------------------------------------------------------------------------
/// Sessions & Tonnage
/// ---------------------------------------------------------------------------

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub start: NaiveDate,
  pub end: NaiveDate,
}

impl DateRange {
  pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
    Self { start, end }
  }

  pub fn year(year: i32) -> Option<Self> {
    Some(Self {
      start: NaiveDate::from_ymd_opt(year, 1, 1)?,
      end: NaiveDate::from_ymd_opt(year, 12, 31)?,
    })
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start <= date && date <= self.end
  }
}

fn in_range(record: &LiftRecord, range: Option<DateRange>) -> bool {
  !record.is_goal && range.map_or(true, |r| r.contains(record.date))
}

/// Total weight moved (weight x reps) in `unit`, unrounded
pub fn tonnage(records: &[LiftRecord], range: Option<DateRange>, unit: UnitType) -> f64 {
  records
    .iter()
    .filter(|r| in_range(r, range))
    .map(|r| r.tonnage_in(unit))
    .sum()
}

/// Distinct dates with at least one non-goal record
pub fn session_dates(records: &[LiftRecord]) -> BTreeSet<NaiveDate> {
  records.iter().filter(|r| !r.is_goal).map(|r| r.date).collect()
}

pub fn session_count(records: &[LiftRecord], range: Option<DateRange>) -> usize {
  records
    .iter()
    .filter(|r| in_range(r, range))
    .map(|r| r.date)
    .collect::<BTreeSet<_>>()
    .len()
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
  date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// ---------------------------------------------------------------------------
/// Weekly Consistency Streak
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStreak {
  /// Consecutive qualifying weeks ending at the current week
  pub current: u32,
  /// Longest run of consecutive qualifying weeks ever
  pub best: u32,
}

pub fn weekly_streak(records: &[LiftRecord], today: NaiveDate) -> WeeklyStreak {
  let mut sessions_per_week: BTreeMap<NaiveDate, usize> = BTreeMap::new();
  for date in session_dates(records) {
    *sessions_per_week.entry(week_start(date)).or_default() += 1;
  }
  let qualifies = |week: NaiveDate| {
    sessions_per_week
      .get(&week)
      .is_some_and(|count| *count >= MIN_SESSIONS_PER_WEEK)
  };

  let mut current = 0;
  let mut week = week_start(today);
  while qualifies(week) {
    current += 1;
    week -= Duration::weeks(1);
  }

  let (Some(&first), Some(&last)) = (
    sessions_per_week.keys().next(),
    sessions_per_week.keys().next_back(),
  ) else {
    return WeeklyStreak { current, best: 0 };
  };

  let mut best = 0;
  let mut run = 0;
  let mut week = first;
  while week <= last {
    if qualifies(week) {
      run += 1;
      best = best.max(run);
    } else {
      run = 0;
    }
    week += Duration::weeks(1);
  }

  WeeklyStreak { current, best }
}

/// ---------------------------------------------------------------------------
/// Session Momentum
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMomentum {
  /// Sessions in the trailing 90 days
  pub recent: usize,
  /// Sessions in the 90 days before that
  pub previous: usize,
  /// Rounded percentage change from previous to recent
  pub percent_change: i64,
}

pub fn session_momentum(records: &[LiftRecord], today: NaiveDate) -> SessionMomentum {
  let window = Duration::days(MOMENTUM_WINDOW_DAYS);
  let recent_start = today - window;
  let previous_start = recent_start - window;

  let sessions = session_dates(records);
  let recent = sessions.iter().filter(|d| recent_start < **d && **d <= today).count();
  let previous = sessions
    .iter()
    .filter(|d| previous_start < **d && **d <= recent_start)
    .count();

  let percent_change = match (previous, recent) {
    (0, 0) => 0,
    (0, _) => 100,
    _ => ((recent as f64 - previous as f64) / previous as f64 * 100.0).round() as i64,
  };

  SessionMomentum {
    recent,
    previous,
    percent_change,
  }
}

/// ---------------------------------------------------------------------------
/// Consistency Grades
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyGrade {
  pub label: String,
  pub days: i64,
  /// Share of weeks in the period with at least one session
  pub percentage: u32,
  pub grade: String,
}

fn letter_grade(percentage: u32) -> &'static str {
  match percentage {
    p if p >= 90 => "A+",
    p if p >= 80 => "A",
    p if p >= 70 => "A-",
    p if p >= 60 => "B+",
    p if p >= 50 => "B",
    p if p >= 40 => "B-",
    p if p >= 30 => "C+",
    p if p >= 20 => "C",
    _ => "C-",
  }
}

/// Grades for every period the history fully covers, shortest first
pub fn consistency_grades(records: &[LiftRecord], today: NaiveDate) -> Vec<ConsistencyGrade> {
  let sessions = session_dates(records);
  let Some(&first_session) = sessions.iter().next() else {
    return Vec::new();
  };

  CONSISTENCY_PERIODS
    .iter()
    .filter(|(_, days)| first_session <= today - Duration::days(*days))
    .map(|&(label, days)| {
      // 7-day buckets counted back from today
      let buckets = (days + 6) / 7;
      let active = (0..buckets)
        .filter(|i| {
          let end = today - Duration::weeks(*i);
          let start = end - Duration::days(7);
          sessions.range(start.succ_opt().unwrap_or(start)..=end).next().is_some()
        })
        .count();
      let percentage = (active as f64 / buckets as f64 * 100.0).round() as u32;
      ConsistencyGrade {
        label: label.to_string(),
        days,
        percentage,
        grade: letter_grade(percentage).to_string(),
      }
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Year Recap
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecap {
  pub year: i32,
  pub sessions: usize,
  pub total_sets: u64,
  pub total_reps: u64,
  pub tonnage: f64,
  pub unit: UnitType,
  pub most_frequent_lift: Option<String>,
  /// Best e1RM of the year for each Big Four lift trained, in `unit`
  pub big_four_best: BTreeMap<String, f64>,
}

pub fn year_recap(records: &[LiftRecord], year: i32, unit: UnitType, formula: E1rmFormula) -> YearRecap {
  // A year outside the calendar matches nothing
  let range = DateRange::year(year);
  let in_year: Vec<LiftRecord> = records
    .iter()
    .filter(|r| range.is_some_and(|range| in_range(r, Some(range))))
    .cloned()
    .collect();

  let mut big_four_best: BTreeMap<String, f64> = BTreeMap::new();
  for record in in_year.iter().filter(|r| is_big_four(&r.lift_type)) {
    let Some(e1rm) = try_estimate_e1rm(record.reps, record.weight_in(unit), formula) else {
      continue;
    };
    let best = big_four_best.entry(record.lift_type.clone()).or_insert(e1rm);
    *best = best.max(e1rm);
  }

  YearRecap {
    year,
    sessions: session_count(&in_year, None),
    total_sets: in_year.len() as u64,
    total_reps: in_year.iter().map(|r| r.reps as u64).sum(),
    tonnage: tonnage(&in_year, None, unit),
    unit,
    most_frequent_lift: lift_type_frequencies(&in_year)
      .into_iter()
      .next()
      .map(|f| f.lift_type),
    big_four_best,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{date, lift, lift_in, sessions_on};

  #[test]
  fn test_tonnage_converts_kg_to_lb_at_full_precision() {
    let records = vec![lift_in("2024-01-01", "Deadlift", 1, 100.0, UnitType::Kg)];
    let total = tonnage(&records, None, UnitType::Lb);
    assert!((total - 220.46).abs() < 1e-9);
  }

  #[test]
  fn test_tonnage_respects_range_and_goals() {
    let records = vec![
      lift("2024-01-01", "Back Squat", 5, 200.0),
      lift("2024-02-01", "Back Squat", 5, 220.0),
      lift("2024-02-02", "Back Squat", 1, 400.0).as_goal(),
    ];
    let february = DateRange::new(date("2024-02-01"), date("2024-02-29"));
    assert_eq!(tonnage(&records, Some(february), UnitType::Lb), 1100.0);
    assert_eq!(tonnage(&records, None, UnitType::Lb), 2100.0);
    let in_kg = tonnage(&records, None, UnitType::Kg);
    assert!((in_kg - 2100.0 / 2.2046).abs() < 1e-9);
  }

  #[test]
  fn test_many_sets_on_one_date_are_one_session() {
    let records = vec![
      lift("2024-01-01", "Back Squat", 5, 200.0),
      lift("2024-01-01", "Back Squat", 5, 200.0),
      lift("2024-01-01", "Bench Press", 5, 150.0),
      lift("2024-01-02", "Deadlift", 1, 300.0).as_goal(),
    ];
    assert_eq!(session_dates(&records).len(), 1);
    assert_eq!(session_count(&records, None), 1);
  }

  #[test]
  fn test_week_start_rolls_back_to_monday() {
    assert_eq!(week_start(date("2024-01-01")), date("2024-01-01"));
    assert_eq!(week_start(date("2024-01-03")), date("2024-01-01"));
    assert_eq!(week_start(date("2024-01-07")), date("2024-01-01"));
    assert_eq!(week_start(date("2024-01-08")), date("2024-01-08"));
  }

  #[test]
  fn test_streak_scenario_three_then_two_sessions() {
    let records = sessions_on(&["2024-01-01", "2024-01-03", "2024-01-05", "2024-01-08", "2024-01-10"]);
    let streak = weekly_streak(&records, date("2024-01-10"));
    assert_eq!(streak.best, 1);
    assert_eq!(streak.current, 0);
  }

  #[test]
  fn test_current_streak_includes_qualifying_current_week() {
    let records = sessions_on(&[
      "2024-01-01", "2024-01-03", "2024-01-05",
      "2024-01-08", "2024-01-10", "2024-01-12",
    ]);
    let streak = weekly_streak(&records, date("2024-01-13"));
    assert_eq!(streak.current, 2);
    assert_eq!(streak.best, 2);
  }

  #[test]
  fn test_best_streak_resets_on_gap_week() {
    let records = sessions_on(&[
      "2024-01-01", "2024-01-02", "2024-01-03",
      "2024-01-08", "2024-01-09", "2024-01-10",
      // week of 2024-01-15 skipped
      "2024-01-22", "2024-01-23", "2024-01-24",
      "2024-01-29", "2024-01-30", "2024-01-31",
      "2024-02-05", "2024-02-06", "2024-02-07",
    ]);
    let streak = weekly_streak(&records, date("2024-02-08"));
    assert_eq!(streak.best, 3);
    assert_eq!(streak.current, 3);

    let later = weekly_streak(&records, date("2024-03-01"));
    assert_eq!(later.current, 0);
    assert_eq!(later.best, 3);
  }

  #[test]
  fn test_streak_with_no_records() {
    assert_eq!(weekly_streak(&[], date("2024-01-01")), WeeklyStreak::default());
  }

  #[test]
  fn test_momentum_windows() {
    let today = date("2024-07-01");
    let recent_only = sessions_on(&["2024-06-01", "2024-06-15"]);
    let momentum = session_momentum(&recent_only, today);
    assert_eq!((momentum.recent, momentum.previous, momentum.percent_change), (2, 0, 100));

    let mixed = sessions_on(&[
      "2024-06-01", "2024-06-10", "2024-06-20",
      "2024-02-01", "2024-02-10", "2024-02-20", "2024-03-01",
      "2023-01-01",
    ]);
    let momentum = session_momentum(&mixed, today);
    assert_eq!(momentum.recent, 3);
    assert_eq!(momentum.previous, 4);
    assert_eq!(momentum.percent_change, -25);

    assert_eq!(session_momentum(&[], today), SessionMomentum::default());
  }

  #[test]
  fn test_consistency_grades() {
    let today = date("2024-12-31");
    // One session every Monday for two years
    let mut dates = Vec::new();
    let mut day = date("2023-01-02");
    while day <= today {
      dates.push(day);
      day += Duration::weeks(1);
    }
    let records: Vec<_> = dates
      .iter()
      .map(|d| LiftRecord::new(*d, "Back Squat", 5, 225.0, UnitType::Lb))
      .collect();

    let grades = consistency_grades(&records, today);
    let labels: Vec<_> = grades.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["1M", "3M", "6M", "1Y"]);
    assert!(grades.iter().all(|g| g.grade == "A+" && g.percentage == 100));

    assert!(consistency_grades(&[], today).is_empty());
  }

  #[test]
  fn test_letter_grade_thresholds() {
    assert_eq!(letter_grade(95), "A+");
    assert_eq!(letter_grade(80), "A");
    assert_eq!(letter_grade(55), "B");
    assert_eq!(letter_grade(20), "C");
    assert_eq!(letter_grade(5), "C-");
  }

  #[test]
  fn test_year_recap() {
    let records = vec![
      lift("2023-12-31", "Back Squat", 1, 400.0),
      lift("2024-01-01", "Back Squat", 5, 225.0),
      lift("2024-01-01", "Back Squat", 5, 235.0),
      lift("2024-03-01", "Curl", 10, 30.0),
      lift_in("2024-03-01", "Deadlift", 1, 200.0, UnitType::Kg),
      lift("2024-06-01", "Deadlift", 1, 500.0).as_goal(),
    ];
    let recap = year_recap(&records, 2024, UnitType::Lb, E1rmFormula::Brzycki);
    assert_eq!(recap.sessions, 2);
    assert_eq!(recap.total_sets, 4);
    assert_eq!(recap.total_reps, 21);
    assert_eq!(recap.most_frequent_lift.as_deref(), Some("Back Squat"));
    assert_eq!(recap.big_four_best["Back Squat"], 264.0);
    assert!((recap.big_four_best["Deadlift"] - 440.92).abs() < 1e-9);
    assert!(!recap.big_four_best.contains_key("Curl"));
    let expected_tonnage = 5.0 * 225.0 + 5.0 * 235.0 + 300.0 + 200.0 * 2.2046;
    assert!((recap.tonnage - expected_tonnage).abs() < 1e-9);
  }

  #[test]
  fn test_year_recap_for_year_outside_calendar_is_empty() {
    assert_eq!(DateRange::year(i32::MAX), None);
    let records = vec![lift("2024-01-01", "Back Squat", 5, 225.0)];
    let recap = year_recap(&records, i32::MAX, UnitType::Lb, E1rmFormula::Brzycki);
    assert_eq!(recap.sessions, 0);
    assert_eq!(recap.total_sets, 0);
    assert!(recap.big_four_best.is_empty());

    let range = DateRange::year(2024).unwrap();
    assert!(range.contains(date("2024-12-31")));
    assert!(!range.contains(date("2025-01-01")));
  }
}
