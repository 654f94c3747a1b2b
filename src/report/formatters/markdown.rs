use crate::report::types::AnalysisReport;
use crate::warrants::WarrantResult;

/// Markdown formatter for analysis reports
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Format report as markdown: classification, summary table, notes
    pub fn format(report: &AnalysisReport) -> String {
        let mut md = String::with_capacity(4096);

        md.push_str("# Traffic Signal Warrant Analysis\n\n");
        md.push_str(&format!("**Standard:** {}  \n", report.edition));
        md.push_str(&format!(
            "**Major street:** {} ({} vehicles)  \n",
            report.assignment.major.name, report.assignment.major.total_volume
        ));
        md.push_str(&format!(
            "**Minor street:** {} ({} vehicles)  \n",
            report.assignment.minor.name, report.assignment.minor.total_volume
        ));
        md.push_str(&format!("**Lanes:** {}  \n", report.lanes));
        md.push_str(&format!(
            "**Thresholds:** {} (Warrant 4: {})\n\n",
            report.regimes.default, report.regimes.pedestrian
        ));

        md.push_str("## Warrant Analysis Summary\n\n");
        md.push_str(&format!("**{}**\n\n", report.summary.headline));

        md.push_str("| Warrant | Status | Data | Threshold |\n");
        md.push_str("|---|---|---|---|\n");
        for row in &report.summary.rows {
            md.push_str(&format!(
                "| {}. {} | {} | {} | {} |\n",
                row.warrant,
                short_name(&row.name),
                row.status,
                escape(&row.data),
                escape(&row.threshold)
            ));
        }
        md.push('\n');

        md.push_str("## Notes\n\n");
        for result in &report.results {
            Self::format_result(&mut md, result);
        }

        md.push_str(&format!("---\n\n*{}*\n", report.summary.disclaimer));
        md
    }

    fn format_result(md: &mut String, result: &WarrantResult) {
        md.push_str(&format!("- **{}:** {}", result.name, result.details));
        if !result.satisfied_by.is_empty() {
            let conditions: Vec<String> =
                result.satisfied_by.iter().map(|c| format!("{:?}", c)).collect();
            md.push_str(&format!(" (satisfied by {})", conditions.join(", ")));
        }
        md.push('\n');
    }
}

/// "Warrant 1, Eight-Hour Vehicular Volume" -> "Eight-Hour Vehicular Volume"
fn short_name(name: &str) -> &str {
    name.split_once(", ").map_or(name, |(_, rest)| rest)
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::engine::WarrantEngine;
    use crate::warrants::test_support::*;

    #[test]
    fn test_format_basic() {
        let engine = WarrantEngine::new(EngineConfig::default()).unwrap();
        let inputs = intersection_inputs(&uniform_hours(8, 600, 200), 30.0, 50_000, 1, 1);
        let md = MarkdownFormatter::format(&engine.evaluate(&inputs).unwrap());

        assert!(md.contains("# Traffic Signal Warrant Analysis"));
        assert!(md.contains("**Major street:** Main Street"));
        assert!(md.contains("| 1. Eight-Hour Vehicular Volume | MET |"));
        assert!(md.contains("| 7. Crash Experience | NOT EVALUATED |"));
        assert!(md.contains("3 warrant(s) satisfied"));
        assert!(md.contains("Professional Engineer"));
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("Warrant 3, Peak Hour"), "Peak Hour");
        assert_eq!(short_name("Peak Hour"), "Peak Hour");
    }
}
