//! Portfolio input records and their defaults.
//!
//! Callers hand over a [`PortfolioData`] in which every field is optional. Before composition the
//! data is resolved into a [`PortfolioRecord`] with every gap filled from the fixed defaults, so
//! the composer never has to deal with missing values.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

pub const DEFAULT_PROJECT_TYPE: &str = "UX/UI Design";
pub const DEFAULT_DATE: &str = "September 2024";
pub const DEFAULT_CLIENT: &str = "DigitalCraft Solutions";
pub const DEFAULT_WEBSITE: &str = "projectwebsite.example.com";
pub const DEFAULT_TITLE: &str = "Innovative Financial Dashboard App";

pub const DEFAULT_OVERVIEW: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
Maecenas varius tortor nibh, sit amet tempor nibh finibus et. Aenean eu enim justo. \
Vestibulum aliquam hendrerit molestie. Cras ultricies ligula sed magna dictum porta. \
Nulla quis lorem ut libero malesuada feugiat.";

pub const DEFAULT_CHALLENGE: &str = "Mauris blandit aliquet elit, eget tincidunt nibh pulvinar \
a. Vivamus suscipit tortor eget felis porttitor volutpat. Curabitur aliquet quam id dui posuere \
blandit. Praesent sapien massa, convallis a pellentesque nec, egestas non nisi.";

pub const DEFAULT_SOLUTION: &str = "Donec sollicitudin molestie malesuada. Curabitur arcu erat, \
accumsan id imperdiet et, porttitor at sem. Vestibulum ante ipsum primis in faucibus orci luctus \
et ultrices posuere cubilia Curae; Donec velit neque, auctor sit amet aliquam vel, ullamcorper \
sit amet ligula.";

pub const DEFAULT_FEATURES: &[&str] = &[
    "Real-time Data Visualization",
    "User Role Management",
    "Secure Authentication",
    "Customizable Dashboards",
    "Data Export Options",
    "Multi-device Support",
];

pub const DEFAULT_TECH_STACK: &[&str] = &["Angular", "Express.js", "PostgreSQL", "GraphQL", "Firebase"];

// Texts of the built-in sample record; shorter than the composition defaults above.
const SAMPLE_OVERVIEW: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
Maecenas varius tortor nibh, sit amet tempor nibh finibus et. Aenean eu enim justo. \
Vestibulum aliquam hendrerit molestie.";
const SAMPLE_CHALLENGE: &str = "Mauris blandit aliquet elit, eget tincidunt nibh pulvinar a. \
Vivamus suscipit tortor eget felis porttitor volutpat.";
const SAMPLE_SOLUTION: &str = "Donec sollicitudin molestie malesuada. Curabitur arcu erat, \
accumsan id imperdiet et, porttitor at sem.";

/// Caller-supplied portfolio data. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PortfolioData {
    pub title: Option<String>,
    pub project_type: Option<String>,
    pub date: Option<String>,
    pub client: Option<String>,
    pub website: Option<String>,
    pub overview: Option<String>,
    pub challenge: Option<String>,
    pub solution: Option<String>,
    pub features: Option<Vec<String>>,
    pub tech_stack: Option<Vec<String>>,
}

impl PortfolioData {
    /// Parses portfolio data from a JSON object. Unknown keys are ignored.
    pub fn from_json(raw: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The fully populated record rendered when no data is supplied.
    pub fn sample() -> Self {
        Self {
            title: Some(DEFAULT_TITLE.to_owned()),
            project_type: Some(DEFAULT_PROJECT_TYPE.to_owned()),
            date: Some(DEFAULT_DATE.to_owned()),
            client: Some(DEFAULT_CLIENT.to_owned()),
            website: Some(DEFAULT_WEBSITE.to_owned()),
            overview: Some(SAMPLE_OVERVIEW.to_owned()),
            challenge: Some(SAMPLE_CHALLENGE.to_owned()),
            solution: Some(SAMPLE_SOLUTION.to_owned()),
            features: Some(owned(DEFAULT_FEATURES)),
            tech_stack: Some(owned(DEFAULT_TECH_STACK)),
        }
    }

    /// Fills every missing field with its default.
    ///
    /// An explicitly empty list stays empty; only an absent list falls back to the defaults.
    pub fn resolve(&self) -> PortfolioRecord {
        fn or_default(value: &Option<String>, default: &str) -> String {
            value.clone().unwrap_or_else(|| default.to_owned())
        }

        PortfolioRecord {
            title: or_default(&self.title, DEFAULT_TITLE),
            project_type: or_default(&self.project_type, DEFAULT_PROJECT_TYPE),
            date: or_default(&self.date, DEFAULT_DATE),
            client: or_default(&self.client, DEFAULT_CLIENT),
            website: or_default(&self.website, DEFAULT_WEBSITE),
            overview: or_default(&self.overview, DEFAULT_OVERVIEW),
            challenge: or_default(&self.challenge, DEFAULT_CHALLENGE),
            solution: or_default(&self.solution, DEFAULT_SOLUTION),
            features: self
                .features
                .clone()
                .unwrap_or_else(|| owned(DEFAULT_FEATURES)),
            tech_stack: self
                .tech_stack
                .clone()
                .unwrap_or_else(|| owned(DEFAULT_TECH_STACK)),
        }
    }
}

/// Portfolio content with every field populated, as consumed by the composer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortfolioRecord {
    pub title: String,
    pub project_type: String,
    pub date: String,
    pub client: String,
    pub website: String,
    pub overview: String,
    pub challenge: String,
    pub solution: String,
    pub features: Vec<String>,
    pub tech_stack: Vec<String>,
}

impl Default for PortfolioRecord {
    fn default() -> Self {
        PortfolioData::default().resolve()
    }
}

impl From<&PortfolioData> for PortfolioRecord {
    fn from(data: &PortfolioData) -> Self {
        data.resolve()
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}
