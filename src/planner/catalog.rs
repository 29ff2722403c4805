//! Finite lookup tables behind the plan generator. Unknown inputs never
//! fail: project types fall back to `General`, complexities to `Medium`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Webapp,
    Api,
    Mobile,
    Desktop,
    Ml,
    Cli,
    Service,
    Ecommerce,
    Cms,
    Dashboard,
    Game,
    Iot,
    Blockchain,
    Social,
    /// Explicit default bucket for anything unrecognized.
    General,
}

impl ProjectType {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "webapp" => Self::Webapp,
            "api" => Self::Api,
            "mobile" => Self::Mobile,
            "desktop" => Self::Desktop,
            "ml" => Self::Ml,
            "cli" => Self::Cli,
            "service" => Self::Service,
            "ecommerce" => Self::Ecommerce,
            "cms" => Self::Cms,
            "dashboard" => Self::Dashboard,
            "game" => Self::Game,
            "iot" => Self::Iot,
            "blockchain" => Self::Blockchain,
            "social" => Self::Social,
            _ => Self::General,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Simple,
    Medium,
    High,
    Enterprise,
}

impl Complexity {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "simple" => Self::Simple,
            "medium" => Self::Medium,
            "high" => Self::High,
            "enterprise" => Self::Enterprise,
            _ => Self::Medium,
        }
    }
}

pub fn architecture(project_type: ProjectType) -> &'static str {
    match project_type {
        ProjectType::Webapp => "SPA with component-based architecture and state management",
        ProjectType::Api => "REST or GraphQL service with modular monolith design",
        ProjectType::Mobile => "Cross-platform mobile app with native performance optimization",
        ProjectType::Desktop => "Electron or native desktop application with system integration",
        ProjectType::Ml => "ML pipeline with model registry, feature store, and MLOps",
        ProjectType::Cli => "Command-line tool with modular commands and plugin architecture",
        ProjectType::Service => {
            "Microservice or serverless function design with event-driven architecture"
        }
        ProjectType::Ecommerce => {
            "E-commerce platform with payment integration and inventory management"
        }
        ProjectType::Cms => "Content Management System with headless architecture",
        ProjectType::Dashboard => "Analytics dashboard with real-time data visualization",
        ProjectType::Game => "Game development with physics engine and multiplayer support",
        ProjectType::Iot => "IoT system with device management and real-time data processing",
        ProjectType::Blockchain => {
            "Blockchain application with smart contracts and DeFi integration"
        }
        ProjectType::Social => {
            "Social media platform with real-time messaging and content feeds"
        }
        ProjectType::General => "General layered architecture",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplexityDetails {
    pub timeline: &'static str,
    pub team_size: &'static str,
    pub features: &'static [&'static str],
    pub technologies: &'static [&'static str],
}

pub fn complexity_details(complexity: Complexity) -> ComplexityDetails {
    match complexity {
        Complexity::Simple => ComplexityDetails {
            timeline: "2-4 weeks",
            team_size: "1-2 developers",
            features: &["Basic CRUD operations", "Simple UI", "Basic authentication"],
            technologies: &["Single framework", "Simple database", "Basic deployment"],
        },
        Complexity::Medium => ComplexityDetails {
            timeline: "1-3 months",
            team_size: "2-4 developers",
            features: &[
                "Advanced features",
                "User management",
                "API integrations",
                "Responsive design",
            ],
            technologies: &["Multiple frameworks", "Database optimization", "CI/CD pipeline"],
        },
        Complexity::High => ComplexityDetails {
            timeline: "3-6 months",
            team_size: "4-8 developers",
            features: &[
                "Complex business logic",
                "Advanced security",
                "Performance optimization",
                "Analytics",
            ],
            technologies: &[
                "Microservices",
                "Multiple databases",
                "Advanced deployment",
                "Monitoring",
            ],
        },
        Complexity::Enterprise => ComplexityDetails {
            timeline: "6-12 months",
            team_size: "8+ developers",
            features: &[
                "Enterprise integrations",
                "Advanced security",
                "Scalability",
                "Compliance",
            ],
            technologies: &[
                "Distributed systems",
                "Enterprise tools",
                "Advanced monitoring",
                "Multi-region deployment",
            ],
        },
    }
}

pub fn phases(project_type: ProjectType) -> &'static [&'static str] {
    match project_type {
        ProjectType::Webapp => &[
            "Requirements & UX/UI Design",
            "Frontend Development",
            "Backend API Development",
            "Integration & Testing",
            "Deployment & Optimization",
        ],
        ProjectType::Mobile => &[
            "Platform Strategy & Design",
            "Native/Cross-platform Development",
            "API Integration",
            "Testing on Multiple Devices",
            "App Store Deployment",
        ],
        ProjectType::Api => &[
            "API Design & Documentation",
            "Core Development",
            "Security Implementation",
            "Performance Testing",
            "Production Deployment",
        ],
        ProjectType::Ml => &[
            "Data Collection & Preprocessing",
            "Model Development & Training",
            "Model Validation & Testing",
            "MLOps Pipeline Setup",
            "Production Deployment & Monitoring",
        ],
        _ => &[
            "Requirement gathering & scoping",
            "Architecture & design",
            "Implementation & testing",
            "Deployment & monitoring",
        ],
    }
}

pub fn risks(project_type: ProjectType) -> &'static [&'static str] {
    match project_type {
        ProjectType::Webapp => &[
            "Browser compatibility",
            "Performance bottlenecks",
            "Security vulnerabilities",
            "SEO challenges",
        ],
        ProjectType::Mobile => &[
            "Platform fragmentation",
            "App store approval",
            "Device compatibility",
            "Performance on older devices",
        ],
        ProjectType::Api => &[
            "Rate limiting issues",
            "Security breaches",
            "Scalability problems",
            "Breaking changes",
        ],
        ProjectType::Ml => &[
            "Data quality issues",
            "Model drift",
            "Computational costs",
            "Regulatory compliance",
        ],
        ProjectType::Ecommerce => &[
            "Payment security",
            "Inventory management",
            "Scalability during sales",
            "Fraud prevention",
        ],
        _ => &[
            "Scope creep",
            "Tight deadlines",
            "Integration challenges",
            "Resource constraints",
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostRange {
    pub min: i64,
    pub max: i64,
    pub currency: &'static str,
}

/// Base cost bounds per complexity tier, scaled by deadline length. Twelve
/// weeks is the neutral point; the multiplier is clamped to [0.8, 2.0].
pub fn cost_range(complexity: Complexity, weeks: u32) -> CostRange {
    let (min, max): (i64, i64) = match complexity {
        Complexity::Simple => (5_000, 15_000),
        Complexity::Medium => (15_000, 50_000),
        Complexity::High => (50_000, 150_000),
        Complexity::Enterprise => (150_000, 500_000),
    };
    let multiplier = (weeks as f64 / 12.0).clamp(0.8, 2.0);
    CostRange {
        min: (min as f64 * multiplier).round() as i64,
        max: (max as f64 * multiplier).round() as i64,
        currency: "USD",
    }
}

pub fn team_structure(project_type: ProjectType, complexity: Complexity) -> &'static [&'static str] {
    use Complexity::*;
    match project_type {
        ProjectType::Webapp => match complexity {
            Simple => &["Frontend Developer", "Backend Developer"],
            Medium => &[
                "Frontend Developer",
                "Backend Developer",
                "UI/UX Designer",
                "QA Tester",
            ],
            High => &[
                "Senior Frontend Developer",
                "Senior Backend Developer",
                "UI/UX Designer",
                "DevOps Engineer",
                "QA Tester",
                "Project Manager",
            ],
            Enterprise => &[
                "Lead Frontend Developer",
                "Senior Backend Developer",
                "UI/UX Designer",
                "DevOps Engineer",
                "Security Specialist",
                "QA Team Lead",
                "Project Manager",
                "Product Owner",
            ],
        },
        ProjectType::Mobile => match complexity {
            Simple => &["Mobile Developer"],
            Medium => &["iOS Developer", "Android Developer", "UI/UX Designer"],
            High => &[
                "Senior Mobile Developer",
                "Backend Developer",
                "UI/UX Designer",
                "QA Tester",
                "DevOps Engineer",
            ],
            Enterprise => &[
                "Lead Mobile Developer",
                "iOS Specialist",
                "Android Specialist",
                "Backend Team",
                "UI/UX Team",
                "QA Team",
                "DevOps Team",
                "Project Manager",
            ],
        },
        ProjectType::Api => match complexity {
            Simple => &["Backend Developer"],
            Medium => &["Senior Backend Developer", "Database Specialist"],
            High => &[
                "Lead Backend Developer",
                "Database Architect",
                "DevOps Engineer",
                "Security Specialist",
            ],
            Enterprise => &[
                "Backend Team Lead",
                "Microservices Architects",
                "Database Team",
                "DevOps Team",
                "Security Team",
                "API Documentation Specialist",
            ],
        },
        _ => match complexity {
            Simple => &["Full-stack Developer"],
            Medium => &["Frontend Developer", "Backend Developer", "Designer"],
            High => &["Senior Developers", "Architect", "DevOps Engineer", "QA Tester"],
            Enterprise => &[
                "Development Team",
                "Architecture Team",
                "DevOps Team",
                "QA Team",
                "Project Management",
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_and_complexity_fall_back() {
        assert_eq!(ProjectType::parse("fintech"), ProjectType::General);
        assert_eq!(Complexity::parse("extreme"), Complexity::Medium);
        assert_eq!(architecture(ProjectType::General), "General layered architecture");
    }

    #[test]
    fn medium_twelve_weeks_is_the_neutral_cost() {
        let range = cost_range(Complexity::Medium, 12);
        assert_eq!(range, CostRange { min: 15_000, max: 50_000, currency: "USD" });
    }

    #[test]
    fn short_deadline_clamps_multiplier_low() {
        let range = cost_range(Complexity::Medium, 6);
        assert_eq!(range.min, 12_000);
        assert_eq!(range.max, 40_000);
    }

    #[test]
    fn long_deadline_clamps_multiplier_high() {
        let range = cost_range(Complexity::Simple, 52);
        assert_eq!(range.min, 10_000);
        assert_eq!(range.max, 30_000);
    }

    #[test]
    fn team_falls_back_to_general_medium() {
        let team = team_structure(ProjectType::parse("fintech"), Complexity::parse("unknown"));
        assert_eq!(team, &["Frontend Developer", "Backend Developer", "Designer"]);
    }

    #[test]
    fn every_type_has_phases_and_risks() {
        for t in [
            ProjectType::Webapp,
            ProjectType::Mobile,
            ProjectType::Api,
            ProjectType::Ml,
            ProjectType::Game,
            ProjectType::General,
        ] {
            assert!(!phases(t).is_empty());
            assert!(!risks(t).is_empty());
        }
    }
}
