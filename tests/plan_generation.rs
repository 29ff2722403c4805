use chrono::{TimeZone, Utc};

use storefront_api::planner::{self, Complexity, PlanRequest, ProjectType};

fn request(project_type: &str, complexity: &str, weeks: u32) -> PlanRequest {
    PlanRequest {
        project_name: "Nordic Commerce".to_string(),
        project_type: project_type.to_string(),
        complexity: complexity.to_string(),
        tech_stack: "Rust + Postgres".to_string(),
        deadline_weeks: weeks,
    }
}

fn generated_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

#[test]
fn medium_twelve_weeks_hits_the_base_cost_exactly() {
    let range = planner::cost_range(Complexity::parse("medium"), 12);
    assert_eq!(range.min, 15_000);
    assert_eq!(range.max, 50_000);
    assert_eq!(range.currency, "USD");
}

#[test]
fn six_weeks_scales_both_bounds_by_the_clamped_minimum() {
    let range = planner::cost_range(Complexity::parse("medium"), 6);
    assert_eq!(range.min, 12_000);
    assert_eq!(range.max, 40_000);
}

#[test]
fn full_plan_for_known_inputs() {
    let plan = planner::collect_requirements(&request("webapp", "medium", 12), generated_at());

    assert_eq!(plan.estimated_cost_range.min, 15_000);
    assert_eq!(plan.estimated_cost_range.max, 50_000);
    assert_eq!(plan.phases.len(), 5);
    assert_eq!(
        plan.suggested_architecture,
        "SPA with component-based architecture and state management"
    );
    assert_eq!(
        plan.recommended_team_structure,
        &["Frontend Developer", "Backend Developer", "UI/UX Designer", "QA Tester"]
    );
    assert_eq!(plan.plan_filename, "Nordic_Commerce_Project_Plan.txt");

    // 12 weeks over 5 phases, rounded up
    assert!(plan.text_plan.contains("Duration: 3 weeks"));
    assert!(plan.text_plan.contains("Budget Range: $15,000 - $50,000 USD"));
    assert!(plan.text_plan.contains("Project Name: Nordic Commerce"));
    assert!(plan.text_plan.contains("Project Type: WEBAPP"));
}

#[test]
fn unknown_type_and_complexity_use_the_default_buckets() {
    let plan = planner::collect_requirements(&request("fintech", "extreme", 12), generated_at());

    assert_eq!(ProjectType::parse("fintech"), ProjectType::General);
    assert_eq!(plan.suggested_architecture, "General layered architecture");
    // general phases, medium team
    assert_eq!(plan.phases.len(), 4);
    assert_eq!(
        plan.recommended_team_structure,
        &["Frontend Developer", "Backend Developer", "Designer"]
    );
    assert_eq!(plan.estimated_cost_range.min, 15_000);
}

#[test]
fn generation_is_deterministic_for_identical_inputs() {
    let a = planner::collect_requirements(&request("api", "high", 20), generated_at());
    let b = planner::collect_requirements(&request("api", "high", 20), generated_at());
    assert_eq!(a.text_plan, b.text_plan);
    assert_eq!(a.estimated_cost_range, b.estimated_cost_range);
}

#[test]
fn long_deadlines_clamp_at_twice_the_base() {
    let range = planner::cost_range(Complexity::parse("high"), 100);
    assert_eq!(range.min, 100_000);
    assert_eq!(range.max, 300_000);
}
