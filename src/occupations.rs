//! Occupation → essential skill records
//!
//! Input shape: `{occupation_id: {"_links": {"hasEssentialSkill": [{"title": ...}]}}}`.
//! Extra fields (hrefs, descriptions, optional skills) are ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Occupations keyed by id, in document order
pub type OccupationMap = IndexMap<String, Occupation>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Occupation {
    #[serde(rename = "_links", default)]
    pub links: OccupationLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OccupationLinks {
    #[serde(
        rename = "hasEssentialSkill",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub essential_skills: Option<Vec<SkillLink>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillLink {
    pub title: String,
}

impl Occupation {
    /// Occupation with the given essential skill titles
    pub fn with_skills<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Occupation {
            links: OccupationLinks {
                essential_skills: Some(
                    titles
                        .into_iter()
                        .map(|t| SkillLink { title: t.into() })
                        .collect(),
                ),
            },
        }
    }

    /// Essential skill titles, or `None` when the relation is missing
    pub fn essential_skill_titles(&self) -> Option<Vec<&str>> {
        self.links
            .essential_skills
            .as_ref()
            .map(|skills| skills.iter().map(|s| s.title.as_str()).collect())
    }
}

/// Parse an occupation document from JSON bytes
pub fn parse_occupations(bytes: &[u8]) -> serde_json::Result<OccupationMap> {
    serde_json::from_slice(bytes)
}
