use crate::fingerprint::{Bucket, Delta};
use colored::Colorize;

/// Substring that identifies the summary comment as ours on subsequent runs.
/// Must stay a substring of the report title below.
pub const COMMENT_MARKER: &str = "Asset Change Summary";

const REPORT_TITLE: &str = "Production Asset Change Summary";
const HELP_FOOTER: &str =
    "Does something not look right? [Check for open issues](https://github.com/asset-watch/asset-watch/issues)";

struct FileDelta {
    file: String,
    raw: i64,
    gzip: i64,
}

/// Render a delta as the markdown body of the summary comment.
///
/// Files are bucketed by raw-size change and each non-empty bucket becomes a
/// `File | raw | gzip` table; the unchanged bucket only renders when
/// `show_unchanged` is set. Returns the empty string when no section
/// renders, which tells the caller to delete the comment instead of posting
/// one.
pub fn build_output_text(delta: &Delta, show_unchanged: bool) -> String {
    let mut bigger = Vec::new();
    let mut smaller = Vec::new();
    let mut unchanged = Vec::new();

    for (file, entry) in delta {
        let row = FileDelta {
            file: file.clone(),
            raw: entry.raw,
            gzip: entry.gzip,
        };
        match Bucket::classify(entry.raw) {
            Bucket::Bigger => bigger.push(row),
            Bucket::Smaller => smaller.push(row),
            Bucket::Unchanged => unchanged.push(row),
        }
    }

    let mut text = String::new();
    if !bigger.is_empty() {
        text.push_str(&format!(
            "Files that got Bigger 🚨:\n\n{}\n",
            delta_table(&bigger)
        ));
    }
    if !smaller.is_empty() {
        text.push_str(&format!(
            "Files that got Smaller 🎉:\n\n{}\n\n",
            delta_table(&smaller)
        ));
    }
    if show_unchanged && !unchanged.is_empty() {
        text.push_str(&format!(
            "Files that stayed the same size 🤷:\n\n{}\n\n",
            delta_table(&unchanged)
        ));
    }

    if text.trim().is_empty() {
        return String::new();
    }

    format!("{REPORT_TITLE}\n\n{text}\n\n{HELP_FOOTER}")
        .trim()
        .to_string()
}

fn delta_table(rows: &[FileDelta]) -> String {
    let mut table = String::from("File | raw | gzip\n--- | --- | ---\n");
    for row in rows {
        table.push_str(&format!(
            "{}|{}|{}\n",
            row.file,
            format_bytes_signed(row.raw),
            format_bytes_signed(row.gzip)
        ));
    }
    table
}

/// Format a signed byte count with an explicit sign and an auto-scaled SI
/// unit, e.g. `+12.3 kB`, `-500 B`. Zero renders as `0 B`.
pub fn format_bytes_signed(bytes: i64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let sign = if bytes < 0 { '-' } else { '+' };
    let magnitude = bytes.unsigned_abs();
    if magnitude < 1000 {
        return format!("{sign}{magnitude} B");
    }

    const UNITS: [&str; 6] = ["kB", "MB", "GB", "TB", "PB", "EB"];
    let exponent = ((magnitude as f64).log10().floor() as usize / 3).min(UNITS.len());
    let scaled = magnitude as f64 / 1000f64.powi(exponent as i32);
    format!("{sign}{} {}", three_significant(scaled), UNITS[exponent - 1])
}

/// Render with three significant digits, trailing zeros trimmed.
fn three_significant(value: f64) -> String {
    let decimals = if value >= 100.0 {
        0
    } else if value >= 10.0 {
        1
    } else {
        2
    };
    let rendered = format!("{value:.decimals$}");
    if rendered.contains('.') {
        rendered
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        rendered
    }
}

/// Print the comment body to the terminal instead of posting it.
pub fn print_preview(body: &str) {
    if body.is_empty() {
        println!(
            "{}",
            "No size changes above the reporting threshold; an existing summary comment would be deleted."
                .yellow()
        );
        return;
    }
    println!("{}", "── comment preview ──".cyan().bold());
    println!("{body}");
    println!("{}", "── end preview ──".cyan().bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::SizeDelta;

    fn delta(entries: &[(&str, i64, i64)]) -> Delta {
        entries
            .iter()
            .map(|(file, raw, gzip)| {
                (file.to_string(), SizeDelta { raw: *raw, gzip: *gzip })
            })
            .collect()
    }

    #[test]
    fn test_empty_delta_renders_nothing() {
        assert_eq!(build_output_text(&Delta::new(), false), "");
    }

    #[test]
    fn test_all_unchanged_renders_nothing_when_suppressed() {
        let delta = delta(&[("a.js", 1500, 300), ("b.js", -2000, -100)]);
        assert_eq!(build_output_text(&delta, false), "");
    }

    #[test]
    fn test_bigger_file_renders_bigger_section_only() {
        let delta = delta(&[("dist/app.js", 5000, 1000)]);
        let text = build_output_text(&delta, false);
        assert!(text.contains("Files that got Bigger"));
        assert!(!text.contains("Files that got Smaller"));
        assert!(text.contains("dist/app.js|+5 kB|+1 kB"));
    }

    #[test]
    fn test_smaller_file_renders_smaller_section() {
        let delta = delta(&[("dist/app.js", -3000, -800)]);
        let text = build_output_text(&delta, false);
        assert!(text.contains("Files that got Smaller"));
        assert!(text.contains("dist/app.js|-3 kB|-800 B"));
    }

    #[test]
    fn test_unchanged_section_renders_only_on_request() {
        let delta = delta(&[("dist/app.js", 100, 50)]);
        assert_eq!(build_output_text(&delta, false), "");
        let text = build_output_text(&delta, true);
        assert!(text.contains("Files that stayed the same size"));
        assert!(text.contains("dist/app.js|+100 B|+50 B"));
    }

    #[test]
    fn test_report_carries_title_and_footer() {
        let delta = delta(&[("dist/app.js", 5000, 1000)]);
        let text = build_output_text(&delta, false);
        assert!(text.starts_with("Production Asset Change Summary"));
        assert!(text.contains(COMMENT_MARKER));
        assert!(text.contains("Check for open issues"));
        assert_eq!(text, text.trim());
    }

    #[test]
    fn test_sections_keep_fixed_order() {
        let delta = delta(&[
            ("shrunk.js", -9000, -2000),
            ("grown.js", 9000, 2000),
        ]);
        let text = build_output_text(&delta, false);
        let bigger_at = text.find("Files that got Bigger").unwrap();
        let smaller_at = text.find("Files that got Smaller").unwrap();
        assert!(bigger_at < smaller_at);
    }

    #[test]
    fn test_table_header_shape() {
        let delta = delta(&[("a.js", 5000, 1000)]);
        let text = build_output_text(&delta, false);
        assert!(text.contains("File | raw | gzip\n--- | --- | ---\n"));
    }

    #[test]
    fn test_format_bytes_signed_small_values() {
        assert_eq!(format_bytes_signed(0), "0 B");
        assert_eq!(format_bytes_signed(500), "+500 B");
        assert_eq!(format_bytes_signed(-500), "-500 B");
        assert_eq!(format_bytes_signed(999), "+999 B");
    }

    #[test]
    fn test_format_bytes_signed_scales_si_units() {
        assert_eq!(format_bytes_signed(1000), "+1 kB");
        assert_eq!(format_bytes_signed(1234), "+1.23 kB");
        assert_eq!(format_bytes_signed(12_300), "+12.3 kB");
        assert_eq!(format_bytes_signed(-12_300), "-12.3 kB");
        assert_eq!(format_bytes_signed(123_456), "+123 kB");
        assert_eq!(format_bytes_signed(1_000_000), "+1 MB");
        assert_eq!(format_bytes_signed(-2_500_000), "-2.5 MB");
    }

    #[test]
    fn test_print_preview_does_not_panic() {
        print_preview("");
        print_preview("Production Asset Change Summary\n\nbody");
    }
}
