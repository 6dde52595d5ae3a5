//! Report assembly.
//!
//! Research outputs are mapped onto a fixed set of canonical sections by
//! keyword, wrapped with a trip overview and practical notes, and rendered
//! as one Markdown document. Assembly degrades in stages: sections absent
//! from the results are enumerated in a trailing notice, and a run with no
//! results at all falls back to a generic template report.

mod writer;

pub use writer::{AggregationError, ReportWriter, DEFAULT_REPORTS_DIR};

use crate::coordinator::{TaskResult, TaskStatus};
use crate::trip::TripRequest;
use crate::utilities::string_utils::strip_code_fences;

/// Placeholder rendered for a task that completed with empty output.
pub const UNAVAILABLE_PLACEHOLDER: &str = "*Content unavailable for this section.*";

/// One canonical report section and the keywords that route results into it.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub heading: &'static str,
    pub keywords: &'static [&'static str],
}

/// Data-driven sections in render order. Overview and Practical
/// Information are not listed; they are always present.
pub const CANONICAL_SECTIONS: [SectionSpec; 5] = [
    SectionSpec {
        heading: "Transportation",
        keywords: &["transport", "flight"],
    },
    SectionSpec {
        heading: "Accommodation",
        keywords: &["accommodation", "hotel"],
    },
    SectionSpec {
        heading: "Destination Guide",
        keywords: &["local", "context", "guide"],
    },
    SectionSpec {
        heading: "Dining",
        keywords: &["dining", "food"],
    },
    SectionSpec {
        heading: "Weather & Packing",
        keywords: &["weather", "packing"],
    },
];

/// A populated report section.
#[derive(Debug, Clone)]
pub struct Section {
    pub heading: &'static str,
    pub content: String,
}

/// The assembled report before rendering.
#[derive(Debug, Clone)]
pub struct Report {
    sections: Vec<Section>,
    missing: Vec<&'static str>,
}

impl Report {
    /// Content of a section, if it was populated.
    pub fn section(&self, heading: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.heading == heading)
            .map(|s| s.content.as_str())
    }

    /// Canonical sections no result was found for, in canonical order.
    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }

    /// Render the report as a Markdown document.
    pub fn render(&self, trip: &TripRequest) -> String {
        let mut out = format!("# Your Travel Plan to {}\n\n", trip.destination);

        out.push_str("## Trip Overview\n");
        out.push_str(&format!("- **Destination**: {}\n", trip.destination));
        out.push_str(&format!(
            "- **Dates**: {} to {}\n",
            trip.start_date.format("%Y-%m-%d"),
            trip.end_date.format("%Y-%m-%d"),
        ));
        out.push_str(&format!("- **Starting Point**: {}\n", trip.starting_point));
        out.push_str(&format!("- **Travelers**: {}\n", trip.travelers));
        out.push_str(&format!("- **Budget**: {}\n", trip.budget.as_str()));
        if trip.interests.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&format!("- **Interests**: {}\n\n", trip.interests.join(", ")));
        }

        for section in &self.sections {
            out.push_str(&format!("## {}\n\n", section.heading));
            out.push_str(&section.content);
            out.push_str("\n\n");
        }

        out.push_str("## Practical Information\n\n");
        out.push_str("### Important Notes\n");
        out.push_str(
            "- This travel plan provides recommendations based on available information at the time of creation.\n",
        );
        out.push_str(
            "- Prices, availability, and schedules may change; always verify current information before booking.\n",
        );
        out.push_str(
            "- For real-time pricing and booking, please visit the official websites of the recommended services.\n\n",
        );

        if !self.missing.is_empty() {
            out.push_str(
                "\n\n---\n*Note: This report may be incomplete. The following sections are missing: ",
            );
            out.push_str(&self.missing.join(", "));
            out.push_str(".*");
        }

        out
    }
}

/// Map task results onto the canonical sections.
///
/// For each section the results are scanned in the order given (execution
/// order, which follows the canonical role order) and the first entry whose
/// role id or task id contains one of the section's keywords wins. Failed
/// results never populate a section; results that completed with empty
/// output render the unavailable placeholder. A result is not consumed by a
/// match, so one output may serve every section whose keywords it carries.
pub fn aggregate(results: &[TaskResult]) -> Report {
    let mut sections = Vec::new();
    let mut missing = Vec::new();

    for spec in CANONICAL_SECTIONS {
        let matched = results.iter().find(|result| {
            result.is_usable()
                && spec.keywords.iter().any(|kw| {
                    result.role_id.as_str().contains(kw)
                        || result.task_id.to_lowercase().contains(kw)
                })
        });
        match matched {
            Some(result) => {
                let content = match result.status {
                    TaskStatus::EmptyOutput => UNAVAILABLE_PLACEHOLDER.to_string(),
                    _ => strip_code_fences(&result.raw_text).trim().to_string(),
                };
                sections.push(Section {
                    heading: spec.heading,
                    content,
                });
            }
            None => missing.push(spec.heading),
        }
    }

    if !missing.is_empty() {
        log::warn!("Report is missing section(s): {}", missing.join(", "));
    }

    Report { sections, missing }
}

/// Generic template report used when a run produced no results at all.
pub fn fallback_report(trip: &TripRequest) -> String {
    let destination = &trip.destination;
    let starting_point = &trip.starting_point;
    let start_date = trip.start_date.format("%Y-%m-%d");
    let end_date = trip.end_date.format("%Y-%m-%d");

    format!(
        r#"# Your Travel Plan to {destination}

## Trip Overview
- **Destination**: {destination}
- **Dates**: {start_date} to {end_date}
- **Starting Point**: {starting_point}

## Getting There
For transportation options between {starting_point} and {destination}, we recommend checking:
- Major airlines for flights
- Public transportation websites specific to {destination}
- Ride-sharing and car rental services

## Where to Stay
When staying in {destination}, consider these popular areas:
- City center locations for convenience to attractions
- Authentic neighborhoods for local experience
- Accommodations with good public transport connections

## Local Attractions
{destination} is known for its unique attractions and experiences. Popular activities include:
- Visiting historical and cultural landmarks
- Exploring local cuisine and markets
- Taking guided tours to better understand the destination

## Eating Out
Sample the cuisine of {destination} across a mix of restaurants, markets, and street stalls. Ask your hosts for nearby favorites and try at least one regional specialty.

## Weather and Packing
Research the typical weather for {destination} during your travel dates ({start_date} to {end_date}) and pack accordingly.

*This is a basic travel plan. For a more detailed itinerary, please try again.*
"#
    )
}

/// Produce the final report text for a run.
///
/// An empty result set means the graph never ran any research tasks, so
/// the generic fallback is returned; otherwise results are aggregated,
/// failed tasks surfacing only through the missing-sections notice.
pub fn compose(trip: &TripRequest, results: &[TaskResult]) -> String {
    if results.is_empty() {
        log::warn!("No task results to aggregate, producing fallback report");
        return fallback_report(trip);
    }
    aggregate(results).render(trip)
}
