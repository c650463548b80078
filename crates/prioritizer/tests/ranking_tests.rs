//! Pipeline tests for the ranking domain.
//!
//! These exercise analyze/suggest end to end through the public API with a
//! pinned "today", covering urgency bounds, determinism, weights and cycles.

use chrono::{Duration, NaiveDate};
use prioritizer::payload::TaskBatch;
use prioritizer::{RankingDomain, RawTask, ScoredTask, ScoringConfig, WeightConfig};
use serde_json::json;

/// Monday 2026-10-19
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn domain() -> RankingDomain {
    RankingDomain::new(ScoringConfig::default()).unwrap()
}

fn analyze(tasks: &[RawTask], weights: &WeightConfig) -> Vec<ScoredTask> {
    domain().analyze(tasks, weights, today()).unwrap()
}

fn find<'a>(ranked: &'a [ScoredTask], title: &str) -> &'a ScoredTask {
    ranked
        .iter()
        .find(|t| t.title == title)
        .unwrap_or_else(|| panic!("task '{title}' missing from output"))
}

fn backlog() -> Vec<RawTask> {
    let base = today();
    vec![
        RawTask::new("Patch auth service", base - Duration::days(3), 5.0).with_importance(8.0),
        RawTask::new("Update changelog", base + Duration::days(1), 1.0).with_importance(2.0),
        RawTask::new("Design schema", base + Duration::days(8), 12.0)
            .with_importance(7.0)
            .with_id("schema"),
        RawTask::new("Build API", base + Duration::days(15), 6.0)
            .with_importance(6.0)
            .with_dependencies(&["schema"]),
        RawTask::new("Build UI", base + Duration::days(22), 6.0)
            .with_importance(6.0)
            .with_dependencies(&["Design Schema", "Build API"]),
        RawTask::new("Plan offsite", base + Duration::days(90), 3.0).with_importance(4.0),
    ]
}

#[test]
fn test_due_or_overdue_tasks_get_maximal_urgency() {
    let base = today();
    let tasks = vec![
        RawTask::new("Due today", base, 4.0),
        RawTask::new("Slightly late", base - Duration::days(1), 4.0),
        RawTask::new("Very late", base - Duration::days(400), 4.0),
    ];

    let ranked = analyze(&tasks, &WeightConfig::default());
    for task in &ranked {
        assert!((task.breakdown.urgency - 10.0).abs() < f64::EPSILON, "{}", task.title);
    }
    // Identical components, so input order is kept
    let titles: Vec<&str> = ranked.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Due today", "Slightly late", "Very late"]);

    assert_eq!(find(&ranked, "Very late").explanation, "Overdue by 400 days");
}

#[test]
fn test_far_future_tasks_get_zero_urgency() {
    let base = today();
    // 2026-11-18 (Wed) and 2026-12-18 (Fri): working days, no shift
    let tasks = vec![
        RawTask::new("At horizon", base + Duration::days(30), 5.0),
        RawTask::new("Beyond horizon", base + Duration::days(60), 5.0),
    ];

    let ranked = analyze(&tasks, &WeightConfig::default());
    for task in &ranked {
        assert!(task.breakdown.urgency.abs() < f64::EPSILON, "{}", task.title);
        assert!((task.score - 10.0).abs() < 1e-9);
        assert_eq!(
            task.explanation,
            "Balanced priority based on urgency and importance"
        );
    }
}

#[test]
fn test_analyze_is_deterministic() {
    let tasks = backlog();
    let weights = WeightConfig::new(1.5, 1.0, 0.5, 2.0);

    let first = serde_json::to_string(&analyze(&tasks, &weights)).unwrap();
    for _ in 0..5 {
        let again = serde_json::to_string(&analyze(&tasks, &weights)).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn test_suggest_is_prefix_of_analyze() {
    let tasks = backlog();
    for weights in [
        WeightConfig::default(),
        WeightConfig::new(0.0, 1.0, 1.0, 1.0),
        WeightConfig::new(3.0, 0.5, 0.0, 4.0),
    ] {
        let ranked = analyze(&tasks, &weights);
        let suggested = domain().suggest(&tasks, &weights, today(), None).unwrap();

        assert_eq!(suggested.len(), 3);
        assert_eq!(suggested.as_slice(), &ranked[..3]);
    }

    let two = domain()
        .suggest(&tasks[..2], &WeightConfig::default(), today(), None)
        .unwrap();
    assert_eq!(two.len(), 2);
}

#[test]
fn test_output_sorted_by_descending_score() {
    let ranked = analyze(&backlog(), &WeightConfig::default());
    assert_eq!(ranked.len(), 6);
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_zero_weight_removes_component() {
    let base = today();
    let make = |importance: f64, hours: f64| {
        vec![
            RawTask::new("Only task", base + Duration::days(2), hours).with_importance(importance),
        ]
    };

    let no_importance = WeightConfig::new(1.0, 0.0, 1.0, 1.0);
    let low = analyze(&make(2.0, 4.0), &no_importance);
    let high = analyze(&make(9.0, 4.0), &no_importance);
    assert!((low[0].score - high[0].score).abs() < f64::EPSILON);

    let no_effort = WeightConfig::new(1.0, 1.0, 0.0, 1.0);
    let quick = analyze(&make(5.0, 0.5), &no_effort);
    let slow = analyze(&make(5.0, 40.0), &no_effort);
    assert!((quick[0].score - slow[0].score).abs() < f64::EPSILON);
}

#[test]
fn test_weights_change_ranking() {
    let base = today();
    let tasks = vec![
        RawTask::new("Urgent chore", base, 8.0).with_importance(2.0),
        RawTask::new("Strategic work", base + Duration::days(24), 8.0).with_importance(10.0),
    ];

    let urgency_first = analyze(&tasks, &WeightConfig::new(3.0, 1.0, 1.0, 1.0));
    assert_eq!(urgency_first[0].title, "Urgent chore");

    let importance_first = analyze(&tasks, &WeightConfig::new(0.2, 3.0, 1.0, 1.0));
    assert_eq!(importance_first[0].title, "Strategic work");
}

#[test]
fn test_three_task_cycle_flagged() {
    let base = today();
    let tasks = vec![
        RawTask::new("A", base + Duration::days(1), 2.0).with_dependencies(&["B"]),
        RawTask::new("B", base + Duration::days(1), 2.0).with_dependencies(&["C"]),
        RawTask::new("C", base + Duration::days(1), 2.0).with_dependencies(&["A"]),
        RawTask::new("D", base + Duration::days(1), 2.0),
    ];

    let ranked = analyze(&tasks, &WeightConfig::default());
    assert_eq!(ranked.len(), 4);

    for title in ["A", "B", "C"] {
        let task = find(&ranked, title);
        assert!(task.circular, "{title} should be circular");
        let cycle = task.cycle.as_ref().unwrap();
        for member in ["A", "B", "C"] {
            assert!(cycle.path.iter().any(|p| p == member));
        }
        assert_eq!(cycle.path.first(), cycle.path.last());
        assert!(task
            .circular_message
            .as_deref()
            .unwrap()
            .starts_with("Circular dependency detected between "));
    }
    assert!(!find(&ranked, "D").circular);
}

#[test]
fn test_chain_without_return_edge_not_flagged() {
    let base = today();
    let tasks = vec![
        RawTask::new("A", base + Duration::days(1), 2.0).with_dependencies(&["B"]),
        RawTask::new("B", base + Duration::days(1), 2.0).with_dependencies(&["C"]),
        RawTask::new("C", base + Duration::days(1), 2.0),
    ];

    let ranked = analyze(&tasks, &WeightConfig::default());
    assert!(ranked.iter().all(|t| !t.circular && t.circular_message.is_none()));
    assert_eq!(find(&ranked, "C").breakdown.dependents, 1);
    assert_eq!(find(&ranked, "A").breakdown.dependents, 0);
}

#[test]
fn test_self_dependency_flagged() {
    let tasks = vec![RawTask::new("Loop", today(), 2.0).with_dependencies(&["loop"])];

    let ranked = analyze(&tasks, &WeightConfig::default());
    assert!(ranked[0].circular);
    assert_eq!(
        ranked[0].circular_message.as_deref(),
        Some("Circular dependency detected between Loop -> Loop")
    );
    assert_eq!(ranked[0].breakdown.dependents, 0);
}

#[test]
fn test_worked_example() {
    let base = today();
    let tasks = vec![
        RawTask::new("Later", base + Duration::days(60), 1.0).with_importance(8.0),
        RawTask::new("Now", base, 1.0).with_importance(8.0),
    ];

    let ranked = analyze(&tasks, &WeightConfig::default());
    let now = &ranked[0];
    assert_eq!(now.title, "Now");
    assert!((now.breakdown.urgency - 10.0).abs() < f64::EPSILON);
    assert!((now.breakdown.importance - 8.0).abs() < f64::EPSILON);
    assert!((now.breakdown.effort - 9.0).abs() < f64::EPSILON);
    assert!(now.breakdown.dependency.abs() < f64::EPSILON);
    assert!((now.score - 27.0).abs() < 1e-9);
    assert_eq!(now.explanation, "Due today; High importance; Quick win");

    assert!(ranked[1].score < now.score);
}

#[test]
fn test_dependents_raise_score() {
    let ranked = analyze(&backlog(), &WeightConfig::default());

    let schema = find(&ranked, "Design schema");
    assert_eq!(schema.breakdown.dependents, 2);
    assert!(schema.explanation.ends_with("Unblocks 2 other tasks"));

    let api = find(&ranked, "Build API");
    assert_eq!(api.breakdown.dependents, 1);
    assert_eq!(api.dependencies, vec!["schema".to_string()]);
}

#[test]
fn test_business_day_shift_only_for_future_dates() {
    // Saturday 2026-10-24 moves to Monday 2026-10-26; a past Saturday stays
    let tasks = vec![
        RawTask::new(
            "Weekend deadline",
            NaiveDate::from_ymd_opt(2026, 10, 24).unwrap(),
            3.0,
        ),
        RawTask::new(
            "Missed weekend deadline",
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            3.0,
        ),
    ];

    let ranked = analyze(&tasks, &WeightConfig::default());
    assert_eq!(
        find(&ranked, "Weekend deadline").due_date,
        NaiveDate::from_ymd_opt(2026, 10, 26).unwrap()
    );
    assert_eq!(
        find(&ranked, "Missed weekend deadline").due_date,
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    );
}

#[test]
fn test_malformed_task_fails_whole_batch() {
    let batch = TaskBatch::from_json(json!([
        { "title": "Fine", "due_date": "2026-10-20", "estimated_hours": 2 },
        { "title": "Broken", "due_date": "next week", "estimated_hours": 2 }
    ]))
    .unwrap();

    let err = domain()
        .analyze(&batch.tasks, &batch.weights, today())
        .unwrap_err();
    assert!(err.is_client_error());
    let message = err.to_string();
    assert!(message.contains("due_date"));
    assert!(message.contains("Broken"));
}

#[test]
fn test_loose_json_batch() {
    let batch = TaskBatch::from_json(json!({
        "tasks": [
            { "id": 1, "title": "Migrate DB", "due_date": "2026-10-21", "estimated_hours": "3", "importance": "11" },
            { "id": 2, "title": "Switch traffic", "due_date": "2026-10-22T09:00:00Z", "estimated_hours": 1, "dependencies": "1, external-42" }
        ],
        "weights": { "urgency_weight": "2", "dependency": -4 }
    }))
    .unwrap();

    let ranked = domain()
        .analyze(&batch.tasks, &batch.weights, today())
        .unwrap();

    let migrate = find(&ranked, "Migrate DB");
    assert!((migrate.importance - 10.0).abs() < f64::EPSILON);
    assert_eq!(migrate.breakdown.dependents, 1);

    let switch = find(&ranked, "Switch traffic");
    assert!((switch.importance - 5.0).abs() < f64::EPSILON);
    assert_eq!(switch.dependencies.len(), 2);
    assert!(!switch.circular);
}

#[test]
fn test_empty_batch_analyzes_to_empty_list() {
    assert!(analyze(&[], &WeightConfig::default()).is_empty());
}
