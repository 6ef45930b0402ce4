//! Similarity clustering.
//!
//! Questions are nodes of an undirected graph whose edges are the stored
//! `similar_to` links, symmetrised. Each connected component is one cluster.

use std::collections::HashMap;

use pms_core::artifacts::ClusterDescriptor;
use pms_core::entities::Question;
use rustworkx_core::petgraph::graph::{NodeIndex, UnGraph};
use rustworkx_core::petgraph::visit::{Dfs, VisitMap};

/// Connected components as indices into `questions`.
///
/// Components are ordered by their first question; members are in DFS
/// discovery order. Every index appears in exactly one component. Links to
/// ids outside `questions` and self-links are ignored.
#[must_use]
pub fn similarity_components(questions: &[Question]) -> Vec<Vec<usize>> {
    let mut graph: UnGraph<usize, ()> = UnGraph::with_capacity(questions.len(), questions.len());
    let mut id_to_index: HashMap<&str, NodeIndex> = HashMap::with_capacity(questions.len());

    for (i, question) in questions.iter().enumerate() {
        let node = graph.add_node(i);
        id_to_index.entry(question.id.as_str()).or_insert(node);
    }

    for (i, question) in questions.iter().enumerate() {
        let source = NodeIndex::new(i);
        for target in question.similar_ids() {
            match id_to_index.get(target) {
                Some(&node) if node != source => {
                    graph.update_edge(source, node, ());
                }
                Some(_) => {}
                None => tracing::warn!(
                    question_id = %question.id,
                    target,
                    "ignoring similarity link to a question outside the panel"
                ),
            }
        }
    }

    let mut dfs = Dfs::empty(&graph);
    let mut components = Vec::new();
    for start in graph.node_indices() {
        if dfs.discovered.is_visited(&start) {
            continue;
        }
        dfs.move_to(start);
        let mut members = Vec::new();
        while let Some(node) = dfs.next(&graph) {
            members.push(graph[node]);
        }
        components.push(members);
    }
    components
}

/// Rank the panel's clusters by net likes, descending.
///
/// Flagged questions are dropped from their cluster before the
/// representative and totals are computed; a cluster with no unflagged
/// member yields no descriptor. Equal net likes keep component order.
#[must_use]
pub fn build_clusters(questions: &[Question]) -> Vec<ClusterDescriptor> {
    let mut clusters: Vec<ClusterDescriptor> = similarity_components(questions)
        .iter()
        .filter_map(|members| describe(questions, members))
        .collect();
    clusters.sort_by(|a, b| b.net_likes.cmp(&a.net_likes));
    clusters
}

fn describe(questions: &[Question], members: &[usize]) -> Option<ClusterDescriptor> {
    let surviving: Vec<&Question> = members
        .iter()
        .map(|&i| &questions[i])
        .filter(|q| !q.is_flagged())
        .collect();

    let representative = surviving
        .iter()
        .copied()
        .reduce(|best, q| if q.likes() > best.likes() { q } else { best })?;

    let cluster_likes: i64 = surviving.iter().map(|q| q.likes()).sum();
    let cluster_dislikes: i64 = surviving.iter().map(|q| q.dislikes()).sum();

    Some(ClusterDescriptor {
        representative_id: representative.id.clone(),
        representative_text: representative.text.clone(),
        member_ids: surviving.iter().map(|q| q.id.clone()).collect(),
        cluster_likes,
        cluster_dislikes,
        net_likes: cluster_likes - cluster_dislikes,
    })
}
