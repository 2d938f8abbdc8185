//! Canned job descriptions and the demo applications seeded for new users.

use chrono::{DateTime, Duration, Utc};

use crate::models::application::NewApplication;

pub const JD_001: &str = "Senior Backend Engineer role requires 5+ years experience in Python, \
FastAPI, and PostgreSQL. Must be proficient in REST/gRPC, Docker, and Kubernetes deployment. \
Deep understanding of cloud-native architecture (AWS) is crucial.";

pub const JD_002: &str = "Junior Data Scientist opening focusing on statistical modeling, \
predictive analysis using scikit-learn and pandas. Experience with data visualization \
(Matplotlib) is a plus. Basic SQL knowledge required.";

pub const JD_003: &str = "DevOps Associate opening for freshers. Focus on CI/CD pipelines, Git, \
and basic system administration on Linux. Cloud experience is not mandatory but highly preferred.";

pub const JD_004: &str = "SDE Intern requiring strong foundational knowledge in data structures \
and algorithms, primarily in Java or Python. Exposure to web development frameworks \
(like Streamlit!) is beneficial.";

/// All fixture JDs keyed by their catalogue id.
pub const MOCK_JDS: [(&str, &str); 4] = [
    ("JD-001", JD_001),
    ("JD-002", JD_002),
    ("JD-003", JD_003),
    ("JD-004", JD_004),
];

pub const CHECKER_COMPANIES: [&str; 3] = ["MegaCorp", "AlphaTech", "GlobalSoft"];
pub const CHECKER_ROLES: [&str; 3] = ["Software Engineer", "Data Analyst", "Intern"];

/// The three applications a user sees on first load of an empty dashboard.
pub fn demo_applications(user_id: &str, now: DateTime<Utc>) -> Vec<NewApplication> {
    let seed = |company: &str, role: &str, jd: &str, offset: Duration| NewApplication {
        user_id: user_id.to_string(),
        company: company.to_string(),
        role: role.to_string(),
        jd_text: jd.to_string(),
        date: now + offset,
    };

    vec![
        seed(
            "TechCorp Solutions",
            "Senior Backend Engineer",
            JD_001,
            Duration::days(2) + Duration::hours(3),
        ),
        seed(
            "Innovate Systems",
            "Junior Data Scientist",
            JD_002,
            Duration::days(5) + Duration::hours(1),
        ),
        seed(
            "Aurora Labs",
            "SDE Intern",
            JD_004,
            Duration::days(15) + Duration::hours(5),
        ),
    ]
}
