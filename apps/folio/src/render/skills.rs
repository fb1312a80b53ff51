//! Skill categorization for the Skills section.

use std::collections::HashSet;

/// Bucket for skills that match no category. Always emitted last.
pub const OTHER_CATEGORY: &str = "Other";

const LANGUAGES: &[&str] = &["JavaScript", "Python", "java", "HTML", "CSS", "SQL"];
const FRAMEWORKS: &[&str] = &["React.js", "Node.js", "Chart.js", "Tailwind CSS"];
const TOOLS: &[&str] = &["Git", "GitHub", "Firebase", "VS Code", "APIs"];
const CONCEPTS: &[&str] = &[
    "Responsive Design",
    "REST APIs",
    "UI/UX Principles",
    "Web Security Basics",
];

const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    ("Languages", LANGUAGES),
    ("Frameworks/Libraries", FRAMEWORKS),
    ("Tools", TOOLS),
    ("Concepts", CONCEPTS),
];

#[derive(Debug, Clone)]
struct Category {
    name: String,
    /// Lowercase-normalized members.
    members: HashSet<String>,
}

/// Ordered mapping from category name to its member skills.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    /// Builds a table from `(name, members)` pairs, keeping declaration order.
    pub fn from_entries(entries: &[(&str, &[&str])]) -> Self {
        let categories = entries
            .iter()
            .map(|(name, members)| Category {
                name: name.to_string(),
                members: members.iter().map(|m| m.to_lowercase()).collect(),
            })
            .collect();
        Self { categories }
    }

    /// Index of the first category (in declaration order) containing the
    /// skill, ignoring case.
    fn position_of(&self, skill: &str) -> Option<usize> {
        let needle = skill.to_lowercase();
        self.categories
            .iter()
            .position(|c| c.members.contains(&needle))
    }

    #[cfg(test)]
    pub fn category_of(&self, skill: &str) -> Option<&str> {
        self.position_of(skill)
            .map(|idx| self.categories[idx].name.as_str())
    }

    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::from_entries(DEFAULT_CATEGORIES)
    }
}

/// One rendered group of skills.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillBucket<'a> {
    pub category: &'a str,
    pub skills: Vec<&'a str>,
}

/// Partitions skills into the table's categories plus a trailing `Other`.
///
/// Buckets follow the table's order and skip empty categories; skills keep
/// their source order inside each bucket.
pub fn categorize<'a>(skills: &'a [String], table: &'a CategoryTable) -> Vec<SkillBucket<'a>> {
    let mut grouped: Vec<Vec<&'a str>> = vec![Vec::new(); table.categories.len()];
    let mut other: Vec<&'a str> = Vec::new();

    for skill in skills {
        match table.position_of(skill) {
            Some(idx) => grouped[idx].push(skill.as_str()),
            None => other.push(skill.as_str()),
        }
    }

    let mut buckets: Vec<SkillBucket<'a>> = table
        .categories
        .iter()
        .zip(grouped)
        .filter(|(_, skills)| !skills.is_empty())
        .map(|(c, skills)| SkillBucket {
            category: c.name.as_str(),
            skills,
        })
        .collect();

    if !other.is_empty() {
        buckets.push(SkillBucket {
            category: OTHER_CATEGORY,
            skills: other,
        });
    }
    buckets
}
