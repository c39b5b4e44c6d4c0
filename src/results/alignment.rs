use crate::models::{PollResponse, ResponseKind, SharedPoll};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ClusterAlignment {
    pub cluster: String,
    /// 0 to 100.
    pub alignment: u32,
    pub label: &'static str,
    pub votes: usize,
    pub matching_statements: Vec<usize>,
}

fn vote_value(response: ResponseKind) -> u32 {
    match response {
        ResponseKind::Agree => 2,
        ResponseKind::Skip => 1,
        ResponseKind::Disagree => 0,
    }
}

pub fn alignment_label(alignment: u32) -> &'static str {
    match alignment {
        80.. => "Strong Alignment",
        60..=79 => "Good Alignment",
        40..=59 => "Moderate Alignment",
        20..=39 => "Weak Alignment",
        _ => "No Alignment",
    }
}

/// How closely one participant's answers track each expected cluster,
/// strongest first.
pub fn cluster_alignments(poll: &SharedPoll, responses: &[PollResponse]) -> Vec<ClusterAlignment> {
    let mut alignments: Vec<ClusterAlignment> = poll
        .topic
        .expected_clusters
        .iter()
        .map(|cluster| {
            let matching_statements = poll.topic.statements_in_cluster(&cluster.name);
            let values: Vec<u32> = responses
                .iter()
                .filter(|r| matching_statements.contains(&r.statement_index))
                .map(|r| vote_value(r.response))
                .collect();

            let alignment = if values.is_empty() {
                0
            } else {
                let mean = values.iter().sum::<u32>() as f64 / values.len() as f64;
                (mean * 50.0).round() as u32
            };

            ClusterAlignment {
                cluster: cluster.name.clone(),
                alignment,
                label: alignment_label(alignment),
                votes: values.len(),
                matching_statements,
            }
        })
        .collect();

    alignments.sort_by(|a, b| b.alignment.cmp(&a.alignment));
    alignments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::tests::{response, two_cluster_poll};

    #[test]
    fn scores_and_orders_clusters() {
        let poll = two_cluster_poll();
        let responses = vec![
            response("s1", 0, ResponseKind::Disagree),
            response("s1", 1, ResponseKind::Agree),
        ];

        let alignments = cluster_alignments(&poll, &responses);
        assert_eq!(alignments[0].cluster, "B");
        assert_eq!(alignments[0].alignment, 100);
        assert_eq!(alignments[0].label, "Strong Alignment");
        assert_eq!(alignments[1].cluster, "A");
        assert_eq!(alignments[1].alignment, 0);
        assert_eq!(alignments[1].votes, 1);
    }

    #[test]
    fn skips_count_as_neutral() {
        let poll = two_cluster_poll();
        let alignments = cluster_alignments(&poll, &[response("s1", 0, ResponseKind::Skip)]);
        let a = alignments.iter().find(|c| c.cluster == "A").unwrap();
        assert_eq!(a.alignment, 50);
        assert_eq!(a.label, "Moderate Alignment");
    }

    #[test]
    fn clusters_without_votes_score_zero() {
        let alignments = cluster_alignments(&two_cluster_poll(), &[]);
        assert!(alignments.iter().all(|c| c.alignment == 0 && c.votes == 0));
        assert_eq!(alignments[0].cluster, "A");
    }

    #[test]
    fn label_bands() {
        assert_eq!(alignment_label(80), "Strong Alignment");
        assert_eq!(alignment_label(79), "Good Alignment");
        assert_eq!(alignment_label(40), "Moderate Alignment");
        assert_eq!(alignment_label(20), "Weak Alignment");
        assert_eq!(alignment_label(19), "No Alignment");
    }
}
