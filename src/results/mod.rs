pub mod alignment;

use crate::models::{PollResponse, ResponseKind, SharedPoll};
use serde::Serialize;
use std::collections::HashSet;

/// Response counts for one statement or one cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tally {
    pub agree: usize,
    pub disagree: usize,
    pub skip: usize,
    pub total: usize,
}

impl Tally {
    fn add(&mut self, response: ResponseKind) {
        match response {
            ResponseKind::Agree => self.agree += 1,
            ResponseKind::Disagree => self.disagree += 1,
            ResponseKind::Skip => self.skip += 1,
        }
        self.total += 1;
    }

    /// Share of agree responses, percent to one decimal with exact ties rounded
    /// to even (6.25 -> 6.2); 0 when nothing was counted.
    pub fn agreement_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let percent = self.agree as f64 / self.total as f64 * 100.0;
        (percent * 10.0).round_ties_even() / 10.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatementSummary {
    pub statement_index: usize,
    pub text: String,
    pub expected_cluster: String,
    #[serde(flatten)]
    pub tally: Tally,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterSummary {
    pub cluster: String,
    pub description: String,
    pub statement_indices: Vec<usize>,
    #[serde(flatten)]
    pub tally: Tally,
    pub agreement_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PollResults {
    pub poll_id: String,
    pub total_participants: usize,
    pub response_summary: Vec<StatementSummary>,
    pub cluster_analysis: Vec<ClusterSummary>,
}

/// Folds every stored response for `poll` into per-statement and per-cluster counts.
pub fn calculate_results(poll: &SharedPoll, responses: &[PollResponse]) -> PollResults {
    let statements = &poll.topic.statements;

    // Count unique submissions
    let total_participants = responses
        .iter()
        .map(|r| r.participant_session_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let mut tallies = vec![Tally::default(); statements.len()];
    for response in responses {
        // Rows pointing past the statement list are ignored.
        if let Some(tally) = tallies.get_mut(response.statement_index) {
            tally.add(response.response);
        }
    }

    let cluster_analysis = poll
        .topic
        .expected_clusters
        .iter()
        .map(|cluster| {
            let statement_indices = poll.topic.statements_in_cluster(&cluster.name);
            let mut tally = Tally::default();
            for response in responses {
                if statement_indices.contains(&response.statement_index) {
                    tally.add(response.response);
                }
            }
            ClusterSummary {
                cluster: cluster.name.clone(),
                description: cluster.description.clone(),
                statement_indices,
                agreement_percentage: tally.agreement_percentage(),
                tally,
            }
        })
        .collect();

    let response_summary = statements
        .iter()
        .zip(tallies)
        .enumerate()
        .map(|(statement_index, (statement, tally))| StatementSummary {
            statement_index,
            text: statement.text.clone(),
            expected_cluster: statement.expected_cluster.clone(),
            tally,
        })
        .collect();

    PollResults {
        poll_id: poll.poll_id.clone(),
        total_participants,
        response_summary,
        cluster_analysis,
    }
}
