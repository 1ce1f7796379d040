//! Accepted-prediction reports.

use serde::{Deserialize, Serialize};

use crate::hints::{HintCandidate, TypeSlot};

/// Which candidate a user picked for a slot, or that they dismissed all of
/// them (no annotation or no rank).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    /// 1-based rank of the accepted candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    pub slot: TypeSlot,
    pub identifier: String,
    /// 1-based line of the slot.
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AcceptedType {
    /// Report acceptance of `candidate`.
    pub fn accepted(candidate: &HintCandidate) -> Self {
        Self {
            annotation: Some(candidate.annotation.clone()),
            rank: Some(candidate.rank),
            slot: candidate.slot,
            identifier: candidate.identifier.clone(),
            line: candidate.line,
            session_id: None,
        }
    }

    /// Report that every candidate for the slot was dismissed.
    pub fn cancelled(slot: TypeSlot, identifier: impl Into<String>, line: u32) -> Self {
        Self {
            annotation: None,
            rank: None,
            slot,
            identifier: identifier.into(),
            line,
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Whether a candidate was actually picked.
    pub fn is_accepted(&self) -> bool {
        self.rank.is_some() && self.annotation.as_deref().is_some_and(|a| !a.is_empty())
    }

    /// Query parameters understood by the telemetry endpoint.
    ///
    /// `cp` flags a cancellation and `fp` whether predictions were filtered.
    pub fn to_query(&self, filter_predictions: bool) -> Vec<(String, String)> {
        let mut query = Vec::with_capacity(8);
        let accepted = self.is_accepted();

        if accepted {
            if let (Some(annotation), Some(rank)) = (&self.annotation, self.rank) {
                query.push(("at".to_string(), annotation.clone()));
                query.push(("r".to_string(), rank.to_string()));
            }
        }

        query.push(("ts".to_string(), self.slot.to_string()));
        query.push(("cp".to_string(), if accepted { "0" } else { "1" }.to_string()));
        query.push((
            "fp".to_string(),
            if filter_predictions { "1" } else { "0" }.to_string(),
        ));
        query.push(("idn".to_string(), self.identifier.clone()));
        query.push(("tsl".to_string(), self.line.to_string()));
        if let Some(session_id) = &self.session_id {
            query.push(("sid".to_string(), session_id.clone()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(query: &[(String, String)]) -> Vec<&str> {
        query.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn test_accepted_query() {
        let candidate = HintCandidate {
            annotation: "int".into(),
            rank: 2,
            slot: TypeSlot::Parameter,
            identifier: "x".into(),
            line: 4,
            sort_text: "1".into(),
        };
        let report = AcceptedType::accepted(&candidate).with_session("s-1");
        let query = report.to_query(true);

        assert_eq!(keys(&query), ["at", "r", "ts", "cp", "fp", "idn", "tsl", "sid"]);
        assert_eq!(query[0].1, "int");
        assert_eq!(query[1].1, "2");
        assert_eq!(query[2].1, "Parameter");
        assert_eq!(query[3].1, "0");
        assert_eq!(query[4].1, "1");
        assert_eq!(query[7].1, "s-1");
    }

    #[test]
    fn test_cancelled_query() {
        let report = AcceptedType::cancelled(TypeSlot::ReturnType, "f", 9);
        assert!(!report.is_accepted());

        let query = report.to_query(false);
        assert_eq!(keys(&query), ["ts", "cp", "fp", "idn", "tsl"]);
        assert_eq!(query[1].1, "1");
        assert_eq!(query[2].1, "0");
    }

    #[test]
    fn test_empty_annotation_counts_as_cancelled() {
        let mut report = AcceptedType::cancelled(TypeSlot::Variable, "v", 1);
        report.annotation = Some(String::new());
        report.rank = Some(1);
        assert!(!report.is_accepted());
    }
}
