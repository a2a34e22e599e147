use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a suggestion. Only unique within its bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuggestionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for SuggestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionId::Number(value) => write!(f, "{value}"),
            SuggestionId::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for SuggestionId {
    fn from(value: i64) -> Self {
        SuggestionId::Number(value)
    }
}

impl From<&str> for SuggestionId {
    fn from(value: &str) -> Self {
        SuggestionId::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Provider,
    Service,
    Category,
    Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: SuggestionId,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed: Option<bool>,
}

impl Suggestion {
    pub fn new(id: impl Into<SuggestionId>, kind: SuggestionKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            provider_name: None,
            category: None,
            city: None,
            state: None,
            verified: None,
            claimed: None,
        }
    }

    /// Secondary display line: owning provider, category, or "City, ST".
    pub fn detail(&self) -> Option<String> {
        if let Some(provider) = &self.provider_name {
            return Some(provider.clone());
        }
        match (&self.city, &self.state) {
            (Some(city), Some(state)) => Some(format!("{city}, {state}")),
            (Some(city), None) => Some(city.clone()),
            (None, Some(state)) => Some(state.clone()),
            (None, None) => self.category.clone(),
        }
    }
}

/// One of the four fixed buckets, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Providers,
    Services,
    Categories,
    Locations,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Providers,
        Section::Services,
        Section::Categories,
        Section::Locations,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Section::Providers => "providers",
            Section::Services => "services",
            Section::Categories => "categories",
            Section::Locations => "locations",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Providers => "Providers",
            Section::Services => "Services",
            Section::Categories => "Categories",
            Section::Locations => "Locations",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The categorized result set. Missing or `null` buckets deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorizedResults {
    #[serde(default, deserialize_with = "deserialize_bucket")]
    pub providers: Vec<Suggestion>,
    #[serde(default, deserialize_with = "deserialize_bucket")]
    pub services: Vec<Suggestion>,
    #[serde(default, deserialize_with = "deserialize_bucket")]
    pub categories: Vec<Suggestion>,
    #[serde(default, deserialize_with = "deserialize_bucket")]
    pub locations: Vec<Suggestion>,
}

impl CategorizedResults {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bucket(&self, section: Section) -> &[Suggestion] {
        match section {
            Section::Providers => &self.providers,
            Section::Services => &self.services,
            Section::Categories => &self.categories,
            Section::Locations => &self.locations,
        }
    }

    pub fn len(&self) -> usize {
        Section::ALL
            .iter()
            .map(|section| self.bucket(*section).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn flatten(&self) -> Vec<NavEntry> {
        Section::ALL
            .iter()
            .flat_map(|section| {
                self.bucket(*section).iter().map(|suggestion| NavEntry {
                    section: *section,
                    suggestion: suggestion.clone(),
                })
            })
            .collect()
    }
}

fn deserialize_bucket<'de, D>(deserializer: D) -> std::result::Result<Vec<Suggestion>, D::Error>
where
    D: Deserializer<'de>,
{
    let bucket = Option::<Vec<Suggestion>>::deserialize(deserializer)?;
    Ok(bucket.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionsPayload {
    #[serde(default, deserialize_with = "deserialize_results")]
    pub suggestions: CategorizedResults,
}

fn deserialize_results<'de, D>(deserializer: D) -> std::result::Result<CategorizedResults, D::Error>
where
    D: Deserializer<'de>,
{
    let results = Option::<CategorizedResults>::deserialize(deserializer)?;
    Ok(results.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavEntry {
    pub section: Section,
    pub suggestion: Suggestion,
}

impl NavEntry {
    pub fn matches(&self, section: Section, id: &SuggestionId) -> bool {
        self.section == section && &self.suggestion.id == id
    }
}

/// What the selection callback receives: the suggestion plus its section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedSuggestion {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    pub section: Section,
}

impl From<NavEntry> for SelectedSuggestion {
    fn from(entry: NavEntry) -> Self {
        Self {
            suggestion: entry.suggestion,
            section: entry.section,
        }
    }
}
