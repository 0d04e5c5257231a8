//! Export summary: per-category statistics and the plain-text notes report.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use notes_types::{Category, Note};
use std::fmt::{Display, Write};

pub const REPORT_TITLE: &str = "INSTALMENTS PLAYGROUND - NOTES SUMMARY";
pub const REPORT_FOOTER: &str = "Instalments Playground - Payment Models Analysis Tool";
pub const EMPTY_SUMMARY: &str = "No notes available for summary.";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub narrative: String,
    pub report: String,
    /// Number of active notes covered
    pub total: usize,
    /// Non-empty categories in enumeration order
    pub category_counts: Vec<(Category, usize)>,
    pub primary_focus: Option<(Category, usize)>,
}

/// Summarize the active notes in `notes`, stamped with the local time
pub fn summarize(notes: &[Note]) -> ExportSummary {
    summarize_at(notes, Local::now())
}

/// Summarize the active notes in `notes`. Note dates are rendered in the
/// time zone of `generated_at`.
pub fn summarize_at<Tz>(notes: &[Note], generated_at: DateTime<Tz>) -> ExportSummary
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let active: Vec<&Note> = notes.iter().filter(|n| !n.is_archived).collect();
    let counts = category_counts(notes);
    let primary = primary_focus(&counts);
    let narrative = narrative(active.len(), &counts, primary);

    let mut report = String::new();
    let _ = writeln!(report, "{}", REPORT_TITLE);
    let _ = writeln!(
        report,
        "Generated: {} at {}",
        generated_at.format("%Y-%m-%d"),
        generated_at.format("%H:%M:%S")
    );
    let _ = writeln!(report, "{}\n", "=".repeat(60));

    let _ = writeln!(report, "EXECUTIVE SUMMARY");
    let _ = writeln!(report, "{}", "-".repeat(20));
    let _ = writeln!(report, "{}\n", narrative);

    let _ = writeln!(report, "TOTAL NOTES: {}\n", active.len());

    let tz = generated_at.timezone();
    for (category, count) in &counts {
        let label = category.as_str();
        let _ = writeln!(report, "{} ({} notes)", label.to_uppercase(), count);
        let _ = writeln!(report, "{}", "=".repeat(label.len() + 10));

        for (index, note) in active.iter().filter(|n| n.category == *category).enumerate() {
            let _ = writeln!(report, "{}. {}", index + 1, note.content);
            let _ = write!(
                report,
                "   Date: {}",
                note.timestamp.with_timezone(&tz).format("%Y-%m-%d")
            );
            if let Some(model) = &note.model_type {
                let _ = write!(report, " | Model: {}", model);
            }
            report.push_str("\n\n");
        }
        report.push('\n');
    }

    let _ = writeln!(report, "{}", "=".repeat(60));
    let _ = writeln!(
        report,
        "Export completed on {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    report.push_str(REPORT_FOOTER);

    ExportSummary {
        narrative,
        report,
        total: active.len(),
        category_counts: counts,
        primary_focus: primary,
    }
}

/// Count non-archived notes per category, skipping empty categories
pub fn category_counts(notes: &[Note]) -> Vec<(Category, usize)> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let count = notes
                .iter()
                .filter(|n| !n.is_archived && n.category == category)
                .count();
            (category, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// Highest count wins; ties go to the later category
pub fn primary_focus(counts: &[(Category, usize)]) -> Option<(Category, usize)> {
    counts.iter().fold(None, |best, &(category, count)| match best {
        Some((_, best_count)) if best_count > count => best,
        _ => Some((category, count)),
    })
}

fn narrative(total: usize, counts: &[(Category, usize)], primary: Option<(Category, usize)>) -> String {
    let Some((category, count)) = primary else {
        return EMPTY_SUMMARY.to_string();
    };

    format!(
        "Analysis Summary: {} notes captured across {} categories. Primary focus area: {} ({} notes). \
         Key insights cover payment model comparisons, risk assessments, and implementation \
         considerations for various instalment solutions.",
        total,
        counts.len(),
        category,
        count
    )
}

/// File name the report is saved under, e.g. `Instalments-Notes-2024-05-01.txt`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("Instalments-Notes-{}.txt", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn note(id: &str, content: &str, category: Category, archived: bool) -> Note {
        Note {
            id: id.to_string(),
            content: content.to_string(),
            category,
            model_type: None,
            timestamp: "2024-05-01T10:00:00Z".parse().unwrap(),
            is_archived: archived,
        }
    }

    fn generated_at() -> DateTime<Utc> {
        "2024-05-02T08:30:00Z".parse().unwrap()
    }

    #[test]
    fn test_primary_focus_and_totals() {
        let notes = vec![
            note("3", "Issuer plans", Category::BankDriven, false),
            note("2", "General remark", Category::General, false),
            note("1", "Bank app flow", Category::BankDriven, false),
        ];

        let summary = summarize_at(&notes, generated_at());
        assert_eq!(summary.total, 3);
        assert_eq!(summary.primary_focus, Some((Category::BankDriven, 2)));
        assert_eq!(
            summary.category_counts,
            vec![(Category::General, 1), (Category::BankDriven, 2)]
        );
        assert!(summary.narrative.contains("3 notes captured across 2 categories"));
        assert!(summary.narrative.contains("Primary focus area: Bank-Driven (2 notes)"));
    }

    #[test]
    fn test_archived_notes_excluded() {
        let notes = vec![
            note("1", "Old deposit idea", Category::DepositFlexible, true),
            note("2", "Old deposit idea 2", Category::DepositFlexible, true),
            note("3", "Klarna", Category::PartnerFinanced, false),
        ];

        let summary = summarize_at(&notes, generated_at());
        assert_eq!(summary.total, 1);
        assert_eq!(summary.primary_focus, Some((Category::PartnerFinanced, 1)));
        assert!(!summary.report.contains("Old deposit idea"));
    }

    #[test]
    fn test_ties_go_to_later_category() {
        let counts = vec![(Category::PartnerFinanced, 2), (Category::SmartRouting, 2)];
        assert_eq!(primary_focus(&counts), Some((Category::SmartRouting, 2)));
        assert_eq!(primary_focus(&[]), None);

        let notes = vec![
            note("1", "Loose thought", Category::General, false),
            note("2", "Issuer plans", Category::BankDriven, false),
        ];
        let summary = summarize_at(&notes, generated_at());
        assert_eq!(summary.primary_focus, Some((Category::BankDriven, 1)));
        assert!(summary.narrative.contains("Primary focus area: Bank-Driven (1 notes)"));
    }

    #[test]
    fn test_empty_collection() {
        let summary = summarize_at(&[], generated_at());
        assert_eq!(summary.narrative, EMPTY_SUMMARY);
        assert_eq!(summary.total, 0);
        assert!(summary.report.contains("TOTAL NOTES: 0"));
    }

    #[test]
    fn test_report_layout() {
        let mut with_model = note("2", "Full auth before ticketing", Category::MerchantFinanced, false);
        with_model.model_type = Some("Merchant-Financed (MIT)".to_string());
        let notes = vec![
            note("3", "Smart retry", Category::SmartRouting, false),
            with_model,
            note("1", "Loose thought", Category::General, false),
        ];

        let report = summarize_at(&notes, generated_at()).report;

        assert!(report.starts_with(REPORT_TITLE));
        assert!(report.contains("Generated: 2024-05-02 at 08:30:00"));
        assert!(report.contains("TOTAL NOTES: 3"));
        assert!(report.contains("MERCHANT-FINANCED (1 notes)\n===========================\n"));
        assert!(report.contains(
            "1. Full auth before ticketing\n   Date: 2024-05-01 | Model: Merchant-Financed (MIT)\n"
        ));
        assert!(report.contains("1. Loose thought\n   Date: 2024-05-01\n"));
        assert!(report.ends_with(REPORT_FOOTER));

        // Sections follow category order, not creation order
        let general = report.find("GENERAL (1 notes)").unwrap();
        let merchant = report.find("MERCHANT-FINANCED").unwrap();
        let routing = report.find("SMART ROUTING").unwrap();
        assert!(general < merchant && merchant < routing);
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert_eq!(export_file_name(date), "Instalments-Notes-2024-05-02.txt");
    }
}
