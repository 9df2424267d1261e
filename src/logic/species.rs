use crate::models::Tree;

/// Representative evergreen species found in the managed sites.
pub const DEFAULT_EVERGREEN_KEYWORDS: &[&str] = &["소나무", "회양목", "향나무", "측백", "주목"];

/// Infers whether a tree drops its leaves from its species name.
///
/// A species containing any evergreen keyword is evergreen; every other
/// species, including an unknown one, is treated as deciduous.
#[derive(Debug, Clone)]
pub struct DeciduousClassifier {
    evergreen_keywords: Vec<String>,
}

impl DeciduousClassifier {
    pub fn new() -> Self {
        Self {
            evergreen_keywords: DEFAULT_EVERGREEN_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for keyword in keywords {
            let keyword = keyword.into();
            let keyword = keyword.trim();
            if !keyword.is_empty() && !self.evergreen_keywords.iter().any(|k| k == keyword) {
                self.evergreen_keywords.push(keyword.to_string());
            }
        }
        self
    }

    pub fn keywords(&self) -> &[String] {
        &self.evergreen_keywords
    }

    pub fn infer(&self, species: &str) -> bool {
        !self
            .evergreen_keywords
            .iter()
            .any(|k| species.contains(k.as_str()))
    }

    /// An explicit `deciduous` flag on the record wins over inference.
    pub fn is_deciduous(&self, tree: &Tree) -> bool {
        tree.deciduous.unwrap_or_else(|| self.infer(&tree.species))
    }
}

impl Default for DeciduousClassifier {
    fn default() -> Self {
        Self::new()
    }
}
