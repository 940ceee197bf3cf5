//! Terminal rendering of the analyser view model.

use analyser_core::{AppViewModel, SourceRegionView};
use chrono::{DateTime, Local};

pub fn region<'a>(view: &'a AppViewModel, source: &str) -> Option<&'a SourceRegionView> {
    view.sources.iter().find(|region| region.id == source)
}

/// Human-readable rendering of one region after its interaction finished.
pub fn print_region(region: &SourceRegionView, completed_at: DateTime<Local>) {
    println!(
        "[{}] {} ({})",
        completed_at.format("%Y-%m-%d %H:%M:%S"),
        region.label,
        region.id
    );
    println!("  control: {}", region.control.label);

    if let Some(outcome) = &region.outcome {
        println!(
            "  verdict: {} [{}]",
            outcome.verdict.label(),
            outcome.verdict.tone().css_class()
        );
        println!("  score: {:.3}", outcome.score);
        println!("  confidence: {}%", outcome.confidence);
        println!("  fragment:");
        for line in outcome.display_html.lines() {
            println!("    {line}");
        }
    }

    if let Some(failure) = &region.failure {
        println!("  analysis failed: {failure}");
    }
}
