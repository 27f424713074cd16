use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use super::theme::{bold, dim, paint_tier};
use crate::currency::format_amount;
use crate::dates::format_date;
use crate::matrix::{ContributionRow, MatrixOutcome};
use crate::orphans::OrphanEntry;
use crate::roster::RosterEntry;
use crate::stats::{AidEntry, AidStats, DonationStats, DonorTotal};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Left-align by character count. Pad before painting; colour codes count as width.
fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Format beneficiaries as a ranked table: index, score, name, city, income, dependents.
/// `offset` is the position of the first entry in the full listing (for paged output).
pub fn format_roster_table(entries: &[RosterEntry], offset: usize, use_colors: bool) -> String {
    if entries.is_empty() {
        return "No beneficiaries found.".to_string();
    }

    let term_width = get_terminal_width();
    let index_width = 4;
    let score_width = 4;
    let city_width = 14;
    let income_width = 12;
    let separator = "  ";
    let fixed_width = index_width + 1 + score_width + city_width + income_width + 4 + separator.len() * 4;

    let longest = entries
        .iter()
        .map(|e| e.beneficiary.full_name.chars().count())
        .max()
        .unwrap_or(0);
    let name_width = match term_width {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        Some(_) => longest.min(20),
        None => longest,
    };

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let index_str = format!("{:>3}.", offset + idx + 1);
            let score_str = format!("{:>width$}", entry.result.score, width = score_width);
            let name = pad_right(&truncate(&entry.beneficiary.full_name, name_width), name_width);
            let city = pad_right(
                &truncate(entry.beneficiary.city.as_deref().unwrap_or("-"), city_width),
                city_width,
            );
            let income = format!(
                "{:>width$}",
                format!("{:.0} DH", entry.beneficiary.monthly_income),
                width = income_width
            );

            format!(
                "{} {}{}{}{}{}{}{}{}{:>2}",
                dim(&index_str, use_colors),
                paint_tier(&score_str, entry.tier, use_colors),
                separator,
                bold(&name, use_colors),
                separator,
                city,
                separator,
                income,
                separator,
                entry.dependents
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format beneficiaries as tab-separated values for scripting
/// Columns: score, tier, name, city, income, dependents, id (no headers, no colors)
pub fn format_roster_tsv(entries: &[RosterEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                entry.result.score,
                entry.tier.label(),
                entry.beneficiary.full_name,
                entry.beneficiary.city.as_deref().unwrap_or(""),
                entry.beneficiary.monthly_income,
                entry.dependents,
                entry.beneficiary.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line score breakdown (for verbose mode)
pub fn format_breakdown(entry: &RosterEntry, use_colors: bool) -> String {
    let mut lines = vec![format!(
        "{}  {} ({})",
        bold(&entry.beneficiary.full_name, use_colors),
        paint_tier(&entry.result.score.to_string(), entry.tier, use_colors),
        entry.tier.label()
    )];
    for factor in &entry.result.breakdown {
        lines.push(format!(
            "  {:<15}{:>3}  {}",
            factor.label, factor.points, factor.description
        ));
    }
    lines.join("\n")
}

/// A month cell: blank when empty, whole numbers without decimals, else one decimal
pub fn format_month_amount(amount: f64) -> String {
    if amount == 0.0 {
        String::new()
    } else if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.1}", amount)
    }
}

/// A row total: whole numbers without decimals, else two decimals
pub fn format_total(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

pub fn format_no_data(year: i32) -> String {
    format!("No membership dues found for {}.", year)
}

/// Format the contribution matrix as a table with one column per month
pub fn format_matrix_table(outcome: &MatrixOutcome, use_colors: bool) -> String {
    let rows = match outcome {
        MatrixOutcome::NoData { year } => return format_no_data(*year),
        MatrixOutcome::Rows(rows) => rows,
    };

    let name_width = rows
        .iter()
        .map(|r| r.donor_name.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(5, 24);
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| r.months.iter().map(|c| format_month_amount(c.amount)).collect())
        .collect();
    let month_width = cells
        .iter()
        .flatten()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0)
        .max(3);
    let totals: Vec<String> = rows.iter().map(total_with_currency).collect();
    let total_width = totals.iter().map(|t| t.chars().count()).max().unwrap_or(0).max(5);

    let mut header = format!("{:>3}  {}", "#", pad_right("Donor", name_width));
    for label in MONTH_LABELS {
        header.push_str(&format!(" {:>width$}", label, width = month_width));
    }
    header.push_str(&format!("  {:>width$}", "Total", width = total_width));

    let mut lines = vec![bold(&header, use_colors)];
    for (i, row) in rows.iter().enumerate() {
        let name = pad_right(&truncate(&row.donor_name, name_width), name_width);
        let mut line = format!("{:>3}  {}", i + 1, name);
        for cell in &cells[i] {
            line.push_str(&format!(" {:>width$}", cell, width = month_width));
        }
        let total = format!("{:>width$}", totals[i], width = total_width);
        line.push_str(&format!("  {}", bold(&total, use_colors)));
        lines.push(line);
    }

    lines.join("\n")
}

fn total_with_currency(row: &ContributionRow) -> String {
    format!("{} {}", format_total(row.total), row.currency.symbol())
}

/// Format the contribution matrix as tab-separated values
/// Columns: donor, twelve months, total, currency (no headers, no colors)
pub fn format_matrix_tsv(outcome: &MatrixOutcome) -> String {
    outcome
        .rows()
        .iter()
        .map(|row| {
            let mut fields = vec![row.donor_name.clone()];
            fields.extend(row.months.iter().map(|c| c.amount.to_string()));
            fields.push(row.total.to_string());
            fields.push(row.currency.code().to_string());
            fields.join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Human-friendly elapsed days: "today", "1 day ago", "12 days ago"
pub fn format_days_ago(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "1 day ago".to_string(),
        n => format!("{} days ago", n),
    }
}

/// Dashboard block for the donations table, followed by the top donors
pub fn format_stats(stats: &DonationStats, top_donors: &[DonorTotal], use_colors: bool) -> String {
    let mut lines = Vec::new();

    let change = match stats.change_percent {
        Some(p) => format!(" ({:+}% vs {})", p, stats.year - 1),
        None => String::new(),
    };
    lines.push(format!(
        "Total {}: {}{}",
        stats.year,
        bold(&format_amount(stats.total_year, stats.currency), use_colors),
        change
    ));
    lines.push(format!(
        "Total {}: {}",
        stats.year - 1,
        format_amount(stats.total_last_year, stats.currency)
    ));
    lines.push(format!(
        "Active donors: {} (+{} this month)",
        stats.active_donors, stats.donors_this_month
    ));

    match &stats.last_donation {
        Some(last) => lines.push(format!(
            "Last donation: {} on {} ({})",
            format_amount(last.amount, last.currency),
            format_date(last.date),
            format_days_ago(last.days_ago)
        )),
        None => lines.push("Last donation: none".to_string()),
    }

    if !top_donors.is_empty() {
        lines.push(String::new());
        lines.push(bold("Top donors", use_colors));
        for (i, donor) in top_donors.iter().enumerate() {
            lines.push(format!(
                "{:>3}. {}  {}",
                i + 1,
                donor.donor_name,
                format_amount(donor.total, stats.currency)
            ));
        }
    }

    lines.join("\n")
}

/// Format dependents as a table: index, name, age, city, schooling, mother
pub fn format_orphan_table(entries: &[OrphanEntry], offset: usize, use_colors: bool) -> String {
    if entries.is_empty() {
        return "No orphans found.".to_string();
    }

    let name_width = entries
        .iter()
        .map(|e| e.dependent.full_name.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(4, 28);
    let city_width = 14;
    let schooling_width = 14;

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let d = &entry.dependent;
            let index_str = format!("{:>3}.", offset + idx + 1);
            let name = pad_right(&truncate(&d.full_name, name_width), name_width);
            let age = entry
                .age
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string());
            let city = pad_right(&truncate(d.city.as_deref().unwrap_or("-"), city_width), city_width);
            let schooling = pad_right(
                &truncate(d.schooling.as_deref().unwrap_or("-"), schooling_width),
                schooling_width,
            );
            format!(
                "{} {}  {:>3}  {}  {}  {}",
                dim(&index_str, use_colors),
                bold(&name, use_colors),
                age,
                city,
                schooling,
                entry.mother_name.as_deref().unwrap_or("-")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Dependents as tab-separated values
/// Columns: name, age, city, schooling, mother, id (no headers, no colors)
pub fn format_orphan_tsv(entries: &[OrphanEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let d = &entry.dependent;
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                d.full_name,
                entry.age.map(|a| a.to_string()).unwrap_or_default(),
                d.city.as_deref().unwrap_or(""),
                d.schooling.as_deref().unwrap_or(""),
                entry.mother_name.as_deref().unwrap_or(""),
                d.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Aid dashboard followed by the latest attributions
pub fn format_aid_stats(stats: &AidStats, recent: &[AidEntry], use_colors: bool) -> String {
    let mut lines = vec![
        format!(
            "Aid attributed {}: {}",
            stats.year,
            bold(&format_amount(stats.total_year, stats.currency), use_colors)
        ),
        format!("Active recipients: {}", stats.active_recipients),
    ];
    match &stats.last_aid {
        Some(last) => lines.push(format!(
            "Last aid: {} on {}",
            format_amount(last.amount, last.currency),
            format_date(last.date)
        )),
        None => lines.push("Last aid: none".to_string()),
    }

    if !recent.is_empty() {
        lines.push(String::new());
        lines.push(bold("Recent attributions", use_colors));
        for entry in recent {
            lines.push(format!(
                "  {}  {}  {} ({})  {}",
                entry
                    .aid
                    .date
                    .map(format_date)
                    .unwrap_or_else(|| "-".repeat(10)),
                entry.label,
                entry.recipient_name.as_deref().unwrap_or("-"),
                entry.recipient_kind.label(),
                format_amount(entry.aid.amount, entry.aid.currency)
            ));
        }
    }

    lines.join("\n")
}
