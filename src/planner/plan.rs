use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;

use super::catalog::{
    self, architecture, complexity_details, cost_range, team_structure, Complexity,
    ComplexityDetails, CostRange, ProjectType,
};

/// Input parameter set for plan generation. The raw type/complexity strings
/// are kept for display; lookups go through the parsed enums.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub project_name: String,
    pub project_type: String,
    pub complexity: String,
    pub tech_stack: String,
    pub deadline_weeks: u32,
}

/// Full generator output: the parameter echo, the table-derived
/// recommendations and the rendered text plan.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectPlan {
    pub project_name: String,
    pub project_type: String,
    pub complexity: String,
    pub tech_stack: String,
    pub deadline_weeks: u32,
    pub suggested_architecture: &'static str,
    pub complexity_details: ComplexityDetails,
    pub phases: &'static [&'static str],
    pub risks: &'static [&'static str],
    pub estimated_cost_range: CostRange,
    pub recommended_team_structure: &'static [&'static str],
    pub text_plan: String,
    pub plan_filename: String,
}

/// Run the full lookup-and-render pipeline. Deterministic given its inputs;
/// the generation timestamp is a parameter, not read from a clock.
pub fn collect_requirements(request: &PlanRequest, generated_at: DateTime<Utc>) -> ProjectPlan {
    let project_type = ProjectType::parse(&request.project_type);
    let complexity = Complexity::parse(&request.complexity);

    let details = complexity_details(complexity);
    let phases = catalog::phases(project_type);
    let risks = catalog::risks(project_type);
    let cost = cost_range(complexity, request.deadline_weeks);
    let team = team_structure(project_type, complexity);
    let suggested_architecture = architecture(project_type);

    let text_plan = generate_text_plan(
        request,
        suggested_architecture,
        &details,
        phases,
        risks,
        &cost,
        team,
        generated_at,
    );

    ProjectPlan {
        project_name: request.project_name.clone(),
        project_type: request.project_type.clone(),
        complexity: request.complexity.clone(),
        tech_stack: request.tech_stack.clone(),
        deadline_weeks: request.deadline_weeks,
        suggested_architecture,
        complexity_details: details,
        phases,
        risks,
        estimated_cost_range: cost,
        recommended_team_structure: team,
        text_plan,
        plan_filename: plan_filename(&request.project_name),
    }
}

/// Download filename for a plan: non-alphanumeric characters become
/// underscores.
pub fn plan_filename(project_name: &str) -> String {
    let sanitized: String = project_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_Project_Plan.txt", sanitized)
}

fn ceil_div(value: u32, divisor: u32) -> u32 {
    if divisor == 0 {
        return value;
    }
    (value + divisor - 1) / divisor
}

fn ceil_fraction(weeks: u32, fraction: f64) -> u32 {
    (weeks as f64 * fraction).ceil() as u32
}

/// Thousands-separated integer for budget display.
fn group_thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn bullet_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("• {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[allow(clippy::too_many_arguments)]
fn generate_text_plan(
    request: &PlanRequest,
    suggested_architecture: &str,
    details: &ComplexityDetails,
    phases: &[&str],
    risks: &[&str],
    cost: &CostRange,
    team: &[&str],
    generated_at: DateTime<Utc>,
) -> String {
    let weeks = request.deadline_weeks;
    let phase_duration = ceil_div(weeks, phases.len() as u32);
    let core_end = ceil_fraction(weeks, 0.4);
    let feature_end = ceil_fraction(weeks, 0.8);

    let mut phase_sections = String::new();
    for (index, phase) in phases.iter().enumerate() {
        let _ = write!(
            phase_sections,
            "\nPHASE {}: {}\n{}\nDuration: {} weeks\nKey Activities:\n\
             • Detailed planning and requirement analysis\n\
             • Design and architecture documentation\n\
             • Implementation with code reviews\n\
             • Testing and quality assurance\n\
             • Documentation and knowledge transfer\n",
            index + 1,
            phase,
            "-".repeat(50),
            phase_duration
        );
    }

    format!(
        r#"                        PROJECT DEVELOPMENT PLAN & GUIDELINES

Project Name: {project_name}
Project Type: {project_type}
Complexity Level: {complexity}
Generated Date: {generated_date}
Estimated Timeline: {timeline}
Budget Range: ${cost_min} - ${cost_max} {currency}

                                EXECUTIVE SUMMARY

This document provides comprehensive guidelines and a detailed implementation plan
for the {project_name} project. The project is classified as a {complexity_raw}
complexity {project_type_raw} application using {tech_stack} technology stack.

Key Success Factors:
• Clear project scope and requirements definition
• Proper team structure and role allocation
• Risk mitigation strategies implementation
• Adherence to best practices and coding standards
• Regular progress monitoring and quality assurance

                              TECHNICAL ARCHITECTURE

Recommended Architecture:
{architecture}

Technology Stack:
{tech_stack}

Key Architectural Principles:
• Scalability: Design for future growth and increased load
• Maintainability: Write clean, documented, and testable code
• Security: Implement security best practices from day one
• Performance: Optimize for speed and efficiency
• Reliability: Build robust error handling and recovery mechanisms

Technical Requirements:
{technologies}

                              DEVELOPMENT PHASES
{phase_sections}
                                TEAM STRUCTURE

Recommended Team Size: {team_size}

Team Composition:
{team}

Team Responsibilities:
• Project Manager: Overall coordination, timeline management, stakeholder communication
• Lead Developer: Technical leadership, architecture decisions, code reviews
• Developers: Feature implementation, unit testing, documentation
• UI/UX Designer: User interface design, user experience optimization
• QA Tester: Test planning, execution, bug reporting and tracking
• DevOps Engineer: Infrastructure setup, deployment automation, monitoring

                                RISK ASSESSMENT

Identified Risks:
{risks}

Risk Mitigation Strategies:
• Conduct regular risk assessment meetings
• Implement comprehensive testing at all levels
• Maintain clear communication channels
• Create detailed documentation and knowledge sharing
• Establish backup plans for critical components
• Monitor project progress against milestones

                              QUALITY GUIDELINES

Code Quality Standards:
• Follow language-specific coding conventions
• Implement comprehensive unit and integration tests
• Maintain minimum 80% code coverage
• Conduct peer code reviews for all changes
• Use automated linting and formatting tools
• Document all public APIs and complex logic

Testing Strategy:
• Unit Testing: Test individual components and functions
• Integration Testing: Test component interactions
• System Testing: Test complete system functionality
• User Acceptance Testing: Validate against requirements
• Performance Testing: Ensure scalability and speed
• Security Testing: Identify and fix vulnerabilities

                              PROJECT MILESTONES

Week 1-2: Project Setup & Planning
• Team onboarding and role assignment
• Development environment setup
• Project structure and repository creation
• Initial architecture documentation

Week 3-{core_end}: Core Development
• Implement core functionality
• Set up basic infrastructure
• Create initial user interfaces
• Establish testing framework

Week {core_next}-{feature_end}: Feature Development
• Implement advanced features
• Integration with external services
• Performance optimization
• Security implementation

Week {feature_next}-{weeks}: Testing & Deployment
• Comprehensive testing and bug fixes
• Performance tuning and optimization
• Production deployment preparation
• Documentation completion and handover

                              SUCCESS METRICS

Technical Metrics:
• Code quality score (>8/10)
• Test coverage (>80%)
• Performance benchmarks met
• Security vulnerabilities (0 critical, <5 medium)
• Documentation completeness (100%)

Business Metrics:
• On-time delivery
• Budget adherence
• Stakeholder satisfaction
• User adoption rate
• System uptime and reliability

                              COMMUNICATION PLAN

Regular Meetings:
• Daily standups (15 minutes)
• Weekly progress reviews (1 hour)
• Bi-weekly stakeholder updates (30 minutes)
• Monthly retrospectives (1 hour)

Reporting:
• Weekly status reports
• Monthly budget and timeline updates
• Risk assessment reports
• Quality metrics dashboard

                              DEPLOYMENT STRATEGY

Environment Strategy:
• Development: Local development and unit testing
• Staging: Integration testing and user acceptance testing
• Production: Live system with monitoring and backup

Deployment Process:
• Automated CI/CD pipeline
• Blue-green deployment for zero downtime
• Rollback procedures for quick recovery
• Monitoring and alerting setup
• Performance and security monitoring

                              MAINTENANCE PLAN

Post-Launch Activities:
• Monitor system performance and user feedback
• Regular security updates and patches
• Feature enhancements based on user needs
• Performance optimization and scaling
• Documentation updates and team training

Long-term Support:
• Quarterly system health checks
• Annual technology stack reviews
• Continuous improvement implementation
• Knowledge transfer and team development

                                  CONCLUSION

This comprehensive plan provides the foundation for successful delivery of the
{project_name} project. Following these guidelines will ensure high-quality
deliverables, efficient team collaboration, and successful project outcomes.

Key Success Factors:
• Adherence to the defined timeline and milestones
• Consistent application of quality standards
• Proactive risk management and mitigation
• Regular communication and stakeholder engagement
• Continuous monitoring and improvement

For questions or clarifications, please contact the project team lead.

                              END OF DOCUMENT"#,
        project_name = request.project_name,
        project_type = request.project_type.to_uppercase(),
        complexity = request.complexity.to_uppercase(),
        generated_date = generated_at.format("%Y-%m-%d"),
        timeline = details.timeline,
        cost_min = group_thousands(cost.min),
        cost_max = group_thousands(cost.max),
        currency = cost.currency,
        complexity_raw = request.complexity,
        project_type_raw = request.project_type,
        architecture = suggested_architecture,
        tech_stack = request.tech_stack,
        technologies = bullet_list(details.technologies),
        phase_sections = phase_sections,
        team_size = details.team_size,
        team = bullet_list(team),
        risks = bullet_list(risks),
        core_end = core_end,
        core_next = core_end + 1,
        feature_end = feature_end,
        feature_next = feature_end + 1,
        weeks = weeks,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request() -> PlanRequest {
        PlanRequest {
            project_name: "Atlas Portal".to_string(),
            project_type: "webapp".to_string(),
            complexity: "medium".to_string(),
            tech_stack: "Rust + Postgres".to_string(),
            deadline_weeks: 10,
        }
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn plan_carries_tables_and_rendered_text() {
        let plan = collect_requirements(&request(), generated_at());
        assert_eq!(plan.phases.len(), 5);
        assert_eq!(plan.estimated_cost_range.min, 12_500);
        assert_eq!(plan.estimated_cost_range.max, 41_667);
        assert!(plan.text_plan.contains("PROJECT DEVELOPMENT PLAN & GUIDELINES"));
        assert!(plan.text_plan.contains("PHASE 5: Deployment & Optimization"));
        assert_eq!(plan.plan_filename, "Atlas_Portal_Project_Plan.txt");
    }

    #[test]
    fn phase_duration_rounds_up() {
        let plan = collect_requirements(&request(), generated_at());
        // 10 weeks across 5 phases
        assert!(plan.text_plan.contains("Duration: 2 weeks"));

        let mut short = request();
        short.deadline_weeks = 11;
        let plan = collect_requirements(&short, generated_at());
        // ceil(11 / 5) = 3
        assert!(plan.text_plan.contains("Duration: 3 weeks"));
    }

    #[test]
    fn milestones_split_at_40_and_80_percent() {
        let plan = collect_requirements(&request(), generated_at());
        assert!(plan.text_plan.contains("Week 3-4: Core Development"));
        assert!(plan.text_plan.contains("Week 5-8: Feature Development"));
        assert!(plan.text_plan.contains("Week 9-10: Testing & Deployment"));
    }

    #[test]
    fn budget_is_thousands_grouped() {
        let mut req = request();
        req.complexity = "enterprise".to_string();
        req.deadline_weeks = 12;
        let plan = collect_requirements(&req, generated_at());
        assert!(plan.text_plan.contains("Budget Range: $150,000 - $500,000 USD"));
    }

    #[test]
    fn filename_sanitizes_every_special_character() {
        assert_eq!(
            plan_filename("My App: v2 (beta)!"),
            "My_App__v2__beta___Project_Plan.txt"
        );
    }

    #[test]
    fn section_headers_are_all_present() {
        let plan = collect_requirements(&request(), generated_at());
        for header in [
            "EXECUTIVE SUMMARY",
            "TECHNICAL ARCHITECTURE",
            "DEVELOPMENT PHASES",
            "TEAM STRUCTURE",
            "RISK ASSESSMENT",
            "QUALITY GUIDELINES",
            "PROJECT MILESTONES",
            "SUCCESS METRICS",
            "COMMUNICATION PLAN",
            "DEPLOYMENT STRATEGY",
            "MAINTENANCE PLAN",
            "CONCLUSION",
            "END OF DOCUMENT",
        ] {
            assert!(plan.text_plan.contains(header), "missing section: {}", header);
        }
    }
}
