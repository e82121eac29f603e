//! Bracket diagram: one node per match, an edge to the next match, fill by status.

use crate::models::{country_code, Bracket, LiveFeed, SlotStatus};
use serde::Serialize;
use std::fmt::Write;

/// Node outline shared by every match.
pub const STROKE_COLOR: &str = "#8E72D4";

/// Fill color for a status (the one place this mapping lives).
pub fn status_color(status: SlotStatus) -> &'static str {
    match status {
        SlotStatus::Correct => "#90EE90",
        SlotStatus::Incorrect => "#FF7377",
        SlotStatus::NotVoted => "#cfc9c4",
        SlotStatus::Empty => "#ECECFD",
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    /// HTML-ish label (bold/underlined predicted side, live score on a second line).
    pub label: String,
    pub fill: &'static str,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

/// Styled directed graph of a bracket, ready for a renderer.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct BracketGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

fn node_id(index: usize) -> String {
    format!("M{}", index)
}

/// Build the diagram for a bracket whose statuses are up to date.
pub fn bracket_graph(bracket: &Bracket, feed: &LiveFeed) -> BracketGraph {
    let mut graph = BracketGraph::default();
    for (index, slot) in bracket.slots().iter().enumerate() {
        let mut team_a = country_code(slot.team_a.as_deref());
        let mut team_b = country_code(slot.team_b.as_deref());
        if slot.prediction.is_some() && slot.prediction == slot.team_a {
            team_a = format!("<b><u>{}</u></b>", team_a);
        }
        if slot.prediction.is_some() && slot.prediction == slot.team_b {
            team_b = format!("<b><u>{}</u></b>", team_b);
        }

        let info = match feed.get(index) {
            Some(live) if slot.status != SlotStatus::Empty => format!(
                "<br>{} {} : {} {}",
                country_code(live.team_a.as_deref()),
                live.goals_a,
                live.goals_b,
                country_code(live.team_b.as_deref())
            ),
            Some(live) if live.team_a.is_some() || live.team_b.is_some() => format!(
                "<br>{} : {}",
                country_code(live.team_a.as_deref()),
                country_code(live.team_b.as_deref())
            ),
            _ => String::new(),
        };

        graph.nodes.push(GraphNode {
            id: node_id(index),
            label: format!("{} vs {}<small>{}</small>", team_a, team_b, info),
            fill: status_color(slot.status),
        });
        if let Some(next) = slot.next_match {
            graph.edges.push(GraphEdge {
                from: node_id(index),
                to: node_id(next),
            });
        }
    }
    graph
}

impl BracketGraph {
    /// Mermaid flowchart text (`graph TD`).
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph TD\n");
        for node in &self.nodes {
            let _ = writeln!(out, "{}[{}]", node.id, node.label);
        }
        for edge in &self.edges {
            let _ = writeln!(out, "{} --> {}", edge.from, edge.to);
        }
        for node in &self.nodes {
            let _ = writeln!(out, "style {} fill:{},stroke:{}", node.id, node.fill, STROKE_COLOR);
        }
        out
    }
}
