//! External reference links shown at the end of a report.

use serde::Serialize;
use std::collections::HashSet;

/// A titled reference URL and the symptoms it is relevant to.
///
/// A link with no symptoms is general and relevant to every analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceLink {
    pub title: String,
    pub url: String,
    #[serde(skip)]
    symptoms: Vec<String>,
}

impl ReferenceLink {
    pub fn general(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            symptoms: Vec::new(),
        }
    }

    pub fn for_symptoms<I, S>(title: impl Into<String>, url: impl Into<String>, symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            url: url.into(),
            symptoms: symptoms
                .into_iter()
                .map(|s| s.into().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn is_general(&self) -> bool {
        self.symptoms.is_empty()
    }

    pub fn is_relevant_to(&self, symptom: &str) -> bool {
        let symptom = symptom.trim().to_lowercase();
        self.is_general() || self.symptoms.iter().any(|s| *s == symptom)
    }
}

/// Ordered topic → URL table.
#[derive(Debug, Clone, Default)]
pub struct LinkTable {
    links: Vec<ReferenceLink>,
}

impl LinkTable {
    pub fn new(links: Vec<ReferenceLink>) -> Self {
        Self { links }
    }

    /// WHO resources shipped with the application.
    pub fn builtin() -> Self {
        Self::new(vec![
            ReferenceLink::general("General Health", "https://www.who.int/health-topics"),
            ReferenceLink::for_symptoms(
                "Headache Disorders",
                "https://www.who.int/news-room/fact-sheets/detail/headache-disorders",
                ["Headache", "Migraine"],
            ),
            ReferenceLink::for_symptoms(
                "Diabetes",
                "https://www.who.int/news-room/fact-sheets/detail/diabetes",
                ["Diabetes", "Excessive Thirst", "Frequent Urination"],
            ),
        ])
    }

    pub fn all(&self) -> &[ReferenceLink] {
        &self.links
    }

    /// Case-insensitive lookup by title.
    pub fn find(&self, title: &str) -> Option<&ReferenceLink> {
        let wanted = title.trim();
        self.links
            .iter()
            .find(|link| link.title.eq_ignore_ascii_case(wanted))
    }

    /// Links relevant to any of `symptoms`, in table order, one per title.
    pub fn relevant_to<S: AsRef<str>>(&self, symptoms: &[S]) -> Vec<ReferenceLink> {
        let mut seen = HashSet::new();
        self.links
            .iter()
            .filter(|link| symptoms.iter().any(|s| link.is_relevant_to(s.as_ref())))
            .filter(|link| seen.insert(link.title.clone()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_link_is_always_relevant() {
        let table = LinkTable::builtin();
        let links = table.relevant_to(&["Fever"]);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].title, "General Health");
    }

    #[test]
    fn test_topic_links_follow_table_order() {
        let table = LinkTable::builtin();
        let links = table.relevant_to(&["frequent urination", "HEADACHE"]);
        let titles: Vec<_> = links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["General Health", "Headache Disorders", "Diabetes"]);
    }

    #[test]
    fn test_duplicate_titles_are_collapsed() {
        let table = LinkTable::new(vec![
            ReferenceLink::general("General Health", "https://example.org/a"),
            ReferenceLink::for_symptoms("Fever", "https://example.org/fever", ["Fever"]),
            ReferenceLink::general("General Health", "https://example.org/b"),
        ]);
        let links = table.relevant_to(&["Fever", "Headache"]);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, "https://example.org/a");
        assert_eq!(links[1].title, "Fever");
    }

    #[test]
    fn test_find_by_title_ignores_case() {
        let table = LinkTable::builtin();
        let link = table.find(" headache disorders ").unwrap();
        assert_eq!(
            link.url,
            "https://www.who.int/news-room/fact-sheets/detail/headache-disorders"
        );
        assert!(table.find("Astrology").is_none());
    }

    #[test]
    fn test_no_symptoms_no_links() {
        let table = LinkTable::builtin();
        assert!(table.relevant_to::<&str>(&[]).is_empty());
    }
}
