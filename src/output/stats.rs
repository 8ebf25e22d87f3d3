//! Statistics over the stored bill records
//!
//! This module provides functionality for summarising what the store holds
//! and printing it.

use crate::bill::{BillRecord, TextSource};
use std::collections::HashMap;

/// Number of substantial bills listed by [`print_statistics`]
const SAMPLE_SIZE: usize = 5;

/// Longest title printed before truncation
const TITLE_WIDTH: usize = 70;

/// Store statistics summary
#[derive(Debug, Clone)]
pub struct HarvestStatistics {
    /// Total number of stored records
    pub total_bills: usize,

    /// Count of records by text source
    pub bills_by_source: HashMap<TextSource, usize>,

    /// Records whose text is longer than the substantial-text threshold
    pub substantial_bills: usize,

    /// Number, source and title of the first substantial records
    pub sample: Vec<(String, TextSource, String)>,
}

/// Computes statistics from stored records
///
/// # Arguments
///
/// * `records` - The stored records, in store order
/// * `substantial_length` - Texts strictly longer than this count as substantial
pub fn compute_statistics(records: &[BillRecord], substantial_length: usize) -> HarvestStatistics {
    let mut bills_by_source = HashMap::new();
    for record in records {
        *bills_by_source.entry(record.text_source).or_insert(0) += 1;
    }

    let substantial: Vec<&BillRecord> = records
        .iter()
        .filter(|r| r.full_text.chars().count() > substantial_length)
        .collect();

    let sample = substantial
        .iter()
        .take(SAMPLE_SIZE)
        .map(|r| {
            (
                r.number.clone(),
                r.text_source,
                r.title.clone().unwrap_or_default(),
            )
        })
        .collect();

    HarvestStatistics {
        total_bills: records.len(),
        bills_by_source,
        substantial_bills: substantial.len(),
        sample,
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Total bills stored: {}", stats.total_bills);
    println!("  Bills with substantial text: {}", stats.substantial_bills);
    println!();

    println!("Bills by Text Source:");
    let mut source_counts: Vec<_> = stats.bills_by_source.iter().collect();
    source_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

    for (source, count) in source_counts {
        let percentage = if stats.total_bills > 0 {
            (*count as f64 / stats.total_bills as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", source, count, percentage);
    }
    println!();

    if !stats.sample.is_empty() {
        println!("First {} Substantial Bills:", stats.sample.len());
        for (i, (number, source, title)) in stats.sample.iter().enumerate() {
            println!("  {}. {} ({}): {}", i + 1, number, source, truncate(title, TITLE_WIDTH));
        }
        println!();
    }
}

/// Shortens `text` to `width` characters, marking the cut with "..."
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(width).collect::<String>())
    }
}
