use serde::{Deserialize, Serialize};

/// "Which rolled values match": strictly greater than, strictly less than, or one of
/// an exact list. Shared by cap, drop, replace and reroll.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greater_than: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub less_than: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exact: Vec<i64>,
}

impl ComparisonOptions {
    pub fn greater_than(value: i64) -> Self {
        Self {
            greater_than: Some(value),
            ..Default::default()
        }
    }

    pub fn less_than(value: i64) -> Self {
        Self {
            less_than: Some(value),
            ..Default::default()
        }
    }

    pub fn exact(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            exact: values.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn with_greater_than(mut self, value: i64) -> Self {
        self.greater_than = Some(value);
        self
    }

    pub fn with_less_than(mut self, value: i64) -> Self {
        self.less_than = Some(value);
        self
    }

    pub fn with_exact(mut self, value: i64) -> Self {
        self.exact.push(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.greater_than.is_none() && self.less_than.is_none() && self.exact.is_empty()
    }

    pub fn matches(&self, value: i64) -> bool {
        self.exact.contains(&value)
            || self.greater_than.is_some_and(|gt| value > gt)
            || self.less_than.is_some_and(|lt| value < lt)
    }

    /// Folds `other` into `self`. Bounds from `other` win, exact values accumulate.
    pub fn merge(&mut self, other: ComparisonOptions) {
        if other.greater_than.is_some() {
            self.greater_than = other.greater_than;
        }
        if other.less_than.is_some() {
            self.less_than = other.less_than;
        }
        for value in other.exact {
            if !self.exact.contains(&value) {
                self.exact.push(value);
            }
        }
    }

    /// Human readable fragments, e.g. `["[1] and [2]", "greater than [5]"]`.
    pub fn describe(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if !self.exact.is_empty() {
            parts.push(format_values(&self.exact));
        }
        if let Some(gt) = self.greater_than {
            parts.push(format!("greater than [{gt}]"));
        }
        if let Some(lt) = self.less_than {
            parts.push(format!("less than [{lt}]"));
        }
        parts
    }

    /// Comma-list terms as they appear between braces: exact values first, then `>n`, then `<n`.
    pub fn notation_terms(&self) -> Vec<String> {
        let mut terms: Vec<String> = self.exact.iter().map(|v| v.to_string()).collect();
        if let Some(gt) = self.greater_than {
            terms.push(format!(">{gt}"));
        }
        if let Some(lt) = self.less_than {
            terms.push(format!("<{lt}"));
        }
        terms
    }
}

/// `[1]`, `[1] and [2]`, `[1], [2] and [3]`.
pub fn format_values(values: &[i64]) -> String {
    let formatted: Vec<String> = values.iter().map(|v| format!("[{v}]")).collect();
    match formatted.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        let cmp = ComparisonOptions::exact([3]).with_greater_than(5).with_less_than(2);
        assert!(cmp.matches(1));
        assert!(!cmp.matches(2));
        assert!(cmp.matches(3));
        assert!(!cmp.matches(4));
        assert!(!cmp.matches(5));
        assert!(cmp.matches(6));
    }

    #[test]
    fn test_empty_matches_nothing() {
        let cmp = ComparisonOptions::default();
        assert!(cmp.is_empty());
        assert!((-10..10).all(|v| !cmp.matches(v)));
    }

    #[test]
    fn test_merge() {
        let mut cmp = ComparisonOptions::greater_than(5).with_exact(1);
        cmp.merge(ComparisonOptions::greater_than(4).with_exact(1).with_exact(2));
        assert_eq!(cmp.greater_than, Some(4));
        assert_eq!(cmp.less_than, None);
        assert_eq!(cmp.exact, vec![1, 2]);
    }

    #[test]
    fn test_format_values() {
        assert_eq!(format_values(&[]), "");
        assert_eq!(format_values(&[1]), "[1]");
        assert_eq!(format_values(&[1, 2]), "[1] and [2]");
        assert_eq!(format_values(&[1, 2, 3]), "[1], [2] and [3]");
    }

    #[test]
    fn test_describe_and_terms() {
        let cmp = ComparisonOptions::exact([1, 2]).with_greater_than(5);
        assert_eq!(cmp.describe(), vec!["[1] and [2]", "greater than [5]"]);
        assert_eq!(cmp.notation_terms(), vec!["1", "2", ">5"]);
    }

    #[test]
    fn test_serde_camel_case() -> anyhow::Result<()> {
        let cmp: ComparisonOptions =
            serde_json::from_str(r#"{"greaterThan": 4, "exact": [1]}"#)?;
        assert_eq!(cmp, ComparisonOptions::greater_than(4).with_exact(1));
        assert_eq!(serde_json::to_string(&cmp)?, r#"{"greaterThan":4,"exact":[1]}"#);
        Ok(())
    }
}
