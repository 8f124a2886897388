// Colored terminal output for group descriptions, overlaps,
// identifiers, and match results. The main.rs display paths delegate
// here.

use std::collections::BTreeMap;

use colored::Colorize;

use crate::cluster::engine::UNCLUSTERED;
use crate::describe::ClusterDescription;
use crate::matching::{MatchOutcome, MatchScore};

/// Human name for a cluster id: "Group N", or "Outliers" for -1.
pub fn group_name(cluster_id: i64) -> String {
    if cluster_id == UNCLUSTERED {
        "Outliers".to_string()
    } else {
        format!("Group {cluster_id}")
    }
}

/// Display every group's density profile as a bar chart.
pub fn display_groups(descriptions: &BTreeMap<i64, ClusterDescription>) {
    println!(
        "\n{}",
        format!("=== Policy Groups ({}) ===", descriptions.len()).bold()
    );
    println!();

    let bar_width: usize = 20;

    for (cluster_id, description) in descriptions {
        println!(
            "  {} — {} members",
            group_name(*cluster_id).bold(),
            description.size
        );

        for (label, fraction) in &description.density {
            let filled = (fraction * bar_width as f64).round() as usize;
            let empty = bar_width.saturating_sub(filled);
            let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(empty));

            let colored_bar = if *fraction >= 0.5 {
                bar.bright_green()
            } else if *fraction >= 0.2 {
                bar.bright_yellow()
            } else {
                bar.bright_blue()
            };

            println!("    {:<32} {} {:.2}", label, colored_bar, fraction);
        }
        println!();
    }
}

/// Display items that belong to more than one group.
pub fn display_overlaps(overlaps: &BTreeMap<usize, Vec<i64>>) {
    if overlaps.is_empty() {
        println!("No items belong to more than one group.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Items in multiple groups ({}) ===", overlaps.len()).bold()
    );
    for (item, clusters) in overlaps {
        let names: Vec<String> = clusters.iter().map(|&c| group_name(c)).collect();
        println!("  item {:>6}: {}", item, names.join(", ").yellow());
    }
}

/// Display each group's statistically identifying columns.
pub fn display_identifiers(identifiers: &BTreeMap<i64, Vec<String>>) {
    println!("\n{}", "=== Identifying columns per group ===".bold());
    for (cluster_id, columns) in identifiers {
        if columns.is_empty() {
            println!("  {:<12} {}", group_name(*cluster_id), "(none)".dimmed());
        } else {
            println!(
                "  {:<12} {}",
                group_name(*cluster_id),
                columns.join(", ").bright_green()
            );
        }
    }
}

/// Display a match outcome: every cluster's score, best marked.
pub fn display_match(outcome: &MatchOutcome) {
    println!("\n{}", "=== Target matching ===".bold());
    for (cluster_id, score) in &outcome.scores {
        let rendered = match score {
            MatchScore::Finite(s) => format!("{s:.4}"),
            MatchScore::Unranked => "unranked".dimmed().to_string(),
        };
        let name = group_name(*cluster_id);
        if *cluster_id == outcome.best {
            println!(
                "  {:<12} {}  {}",
                name.bold(),
                rendered,
                "<- best".bright_green()
            );
        } else {
            println!("  {:<12} {}", name, rendered);
        }
    }
}
