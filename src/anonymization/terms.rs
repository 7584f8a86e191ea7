//! Custom term registry
//!
//! Operators register literal terms that are always treated as sensitive,
//! independent of automated detection. Matching is literal and
//! leftmost-longest, so a longer registered term always wins over a shorter
//! term it contains ("Bank of X Corp" is never split into "Bank of X" + " Corp").

use crate::anonymization::models::{DetectionSource, SensitiveSpan};
use crate::domain::{Category, Result, VeilError};
use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Serialized form of the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermsSnapshot {
    /// Snapshot format version
    pub version: u32,
    /// Terms per category
    pub terms: BTreeMap<Category, Vec<String>>,
    /// Owning category of each matched term, in registration order
    #[serde(default)]
    pub owners: Vec<(Category, String)>,
    /// When the snapshot was taken
    pub saved_at: DateTime<Utc>,
}

/// Compiled automaton over every registered term
struct TermMatcher {
    automaton: AhoCorasick,
    categories: Vec<Category>,
}

/// Category to literal-term registry
pub struct CustomTermRegistry {
    terms: BTreeMap<Category, BTreeSet<String>>,
    /// Category that owns each term for matching, keyed by the case-folded term
    owners: HashMap<String, (Category, String)>,
    /// Registration order of owned terms
    order: Vec<String>,
    case_sensitive: bool,
    matcher: Option<TermMatcher>,
}

impl CustomTermRegistry {
    /// Snapshot format version written by [`snapshot`](Self::snapshot)
    pub const SNAPSHOT_VERSION: u32 = 2;

    /// Create an empty registry
    ///
    /// Case-insensitive matching folds ASCII letters only.
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            terms: BTreeMap::new(),
            owners: HashMap::new(),
            order: Vec::new(),
            case_sensitive,
            matcher: None,
        }
    }

    /// Whether matching is case-sensitive
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn fold(&self, term: &str) -> String {
        if self.case_sensitive {
            term.to_string()
        } else {
            term.to_ascii_lowercase()
        }
    }

    /// Merge terms into a category
    ///
    /// Union semantics: terms already present are skipped and blank terms
    /// are ignored. Returns the number of newly added terms.
    pub fn add_terms<I, S>(&mut self, category: &Category, terms: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;

        for term in terms {
            let term = term.as_ref().trim();
            if term.is_empty() {
                continue;
            }

            let inserted = self
                .terms
                .entry(category.clone())
                .or_default()
                .insert(term.to_string());
            if !inserted {
                continue;
            }
            added += 1;

            let key = self.fold(term);
            if !self.owners.contains_key(&key) {
                self.owners
                    .insert(key.clone(), (category.clone(), term.to_string()));
                self.order.push(key);
            }
        }

        if added > 0 {
            self.rebuild()?;
            tracing::debug!(category = %category, added, "Custom terms registered");
        }

        Ok(added)
    }

    /// Register a single term
    ///
    /// Returns `true` if the term was new for that category.
    pub fn add_single_term(&mut self, category: &Category, term: &str) -> Result<bool> {
        if term.trim().is_empty() {
            return Err(VeilError::InvalidTerm(
                "custom term cannot be empty".to_string(),
            ));
        }
        Ok(self.add_terms(category, [term])? == 1)
    }

    /// Read-only snapshot of all terms, sorted by category then term
    pub fn list_terms(&self) -> BTreeMap<Category, Vec<String>> {
        self.terms
            .iter()
            .map(|(category, terms)| (category.clone(), terms.iter().cloned().collect()))
            .collect()
    }

    /// Total number of registered (category, term) pairs
    pub fn len(&self) -> usize {
        self.terms.values().map(BTreeSet::len).sum()
    }

    /// Check if no terms are registered
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Find every non-overlapping occurrence of a registered term
    pub fn find_matches(&self, text: &str) -> Vec<SensitiveSpan> {
        let Some(matcher) = &self.matcher else {
            return Vec::new();
        };

        matcher
            .automaton
            .find_iter(text)
            .filter_map(|m| {
                SensitiveSpan::from_range(
                    text,
                    m.start(),
                    m.end(),
                    matcher.categories[m.pattern().as_usize()].clone(),
                    DetectionSource::Custom,
                )
            })
            .collect()
    }

    fn rebuild(&mut self) -> Result<()> {
        let mut patterns = Vec::with_capacity(self.order.len());
        let mut categories = Vec::with_capacity(self.order.len());
        for key in &self.order {
            if let Some((category, term)) = self.owners.get(key) {
                patterns.push(term.as_str());
                categories.push(category.clone());
            }
        }

        let automaton = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostLongest)
            .ascii_case_insensitive(!self.case_sensitive)
            .build(patterns)
            .map_err(|e| VeilError::Pattern(format!("Failed to build term matcher: {e}")))?;

        self.matcher = Some(TermMatcher {
            automaton,
            categories,
        });
        Ok(())
    }

    /// Serialize the registry for persistence
    pub fn snapshot(&self) -> TermsSnapshot {
        TermsSnapshot {
            version: Self::SNAPSHOT_VERSION,
            terms: self.list_terms(),
            owners: self
                .order
                .iter()
                .filter_map(|key| self.owners.get(key).cloned())
                .collect(),
            saved_at: Utc::now(),
        }
    }

    /// Replace the registry contents with a snapshot
    ///
    /// Owned terms are replayed first, in their recorded order, so a term
    /// shared by two categories keeps the owner it had when saved.
    pub fn restore(&mut self, snapshot: TermsSnapshot) -> Result<()> {
        if snapshot.version > Self::SNAPSHOT_VERSION {
            return Err(VeilError::StoreCorrupt(format!(
                "unsupported terms snapshot version {}",
                snapshot.version
            )));
        }

        let case_sensitive = self.case_sensitive;
        *self = Self::new(case_sensitive);
        for (category, term) in snapshot.owners {
            self.add_terms(&category, [term])?;
        }
        for (category, terms) in snapshot.terms {
            self.add_terms(&category, terms)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> Category {
        Category::new(name).unwrap()
    }

    #[test]
    fn test_add_terms_union() {
        let mut registry = CustomTermRegistry::new(false);
        assert_eq!(
            registry
                .add_terms(&category("ORG"), ["Acme Corp", "Globex"])
                .unwrap(),
            2
        );
        assert_eq!(
            registry
                .add_terms(&category("ORG"), ["Acme Corp", "Initech", "  "])
                .unwrap(),
            1
        );
        assert!(!registry.add_single_term(&category("ORG"), "Globex").unwrap());
        assert_eq!(registry.len(), 3);

        let listed = registry.list_terms();
        assert_eq!(listed[&category("ORG")], vec!["Acme Corp", "Globex", "Initech"]);
    }

    #[test]
    fn test_add_single_term_rejects_blank() {
        let mut registry = CustomTermRegistry::new(false);
        assert!(matches!(
            registry.add_single_term(&category("ORG"), "   "),
            Err(VeilError::InvalidTerm(_))
        ));
    }

    #[test]
    fn test_longest_term_wins() {
        let mut registry = CustomTermRegistry::new(true);
        registry
            .add_terms(&category("ORG"), ["Bank of X", "Bank of X Corp"])
            .unwrap();

        let spans = registry.find_matches("Wire it to Bank of X Corp today, not Bank of X.");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Bank of X Corp");
        assert_eq!(spans[1].text, "Bank of X");
        assert!(spans.iter().all(|s| s.source == DetectionSource::Custom));
    }

    #[test]
    fn test_case_insensitive_matching_keeps_original_text() {
        let mut registry = CustomTermRegistry::new(false);
        registry.add_single_term(&category("PROJECT"), "Bluebird").unwrap();

        let spans = registry.find_matches("bluebird and BLUEBIRD");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "bluebird");
        assert_eq!(spans[1].text, "BLUEBIRD");
        assert_eq!(spans[0].category.as_str(), "PROJECT");
    }

    #[test]
    fn test_case_sensitive_matching() {
        let mut registry = CustomTermRegistry::new(true);
        registry.add_single_term(&category("PROJECT"), "Bluebird").unwrap();
        assert!(registry.find_matches("bluebird").is_empty());
        assert_eq!(registry.find_matches("Bluebird").len(), 1);
    }

    #[test]
    fn test_first_category_owns_shared_term() {
        let mut registry = CustomTermRegistry::new(false);
        registry.add_single_term(&category("ORG"), "Orion").unwrap();
        registry.add_single_term(&category("PROJECT"), "orion").unwrap();

        let spans = registry.find_matches("Orion");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].category.as_str(), "ORG");
        assert_eq!(registry.list_terms().len(), 2);
    }

    #[test]
    fn test_empty_registry_finds_nothing() {
        let registry = CustomTermRegistry::new(false);
        assert!(registry.find_matches("anything").is_empty());
    }

    #[test]
    fn test_snapshot_restore() {
        let mut registry = CustomTermRegistry::new(false);
        registry.add_terms(&category("ORG"), ["Acme Corp"]).unwrap();
        let snapshot = registry.snapshot();

        let mut restored = CustomTermRegistry::new(false);
        restored.restore(snapshot).unwrap();
        assert_eq!(restored.list_terms(), registry.list_terms());
        assert_eq!(restored.find_matches("acme corp").len(), 1);
    }

    #[test]
    fn test_restore_keeps_owner_of_shared_term() {
        let mut registry = CustomTermRegistry::new(false);
        registry.add_single_term(&category("PROJECT"), "Orion").unwrap();
        registry.add_single_term(&category("ORG"), "Orion").unwrap();
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.owners, vec![(category("PROJECT"), "Orion".to_string())]);

        let mut restored = CustomTermRegistry::new(false);
        restored.restore(snapshot).unwrap();

        let spans = restored.find_matches("Orion");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].category.as_str(), "PROJECT");
        assert_eq!(restored.list_terms(), registry.list_terms());
    }

    #[test]
    fn test_restore_version_one_snapshot() {
        let json = r#"{
            "version": 1,
            "terms": { "ORG": ["Globex"] },
            "saved_at": "2025-01-01T00:00:00Z"
        }"#;
        let snapshot: TermsSnapshot = serde_json::from_str(json).unwrap();

        let mut restored = CustomTermRegistry::new(false);
        restored.restore(snapshot).unwrap();
        assert_eq!(restored.find_matches("globex").len(), 1);
    }
}
