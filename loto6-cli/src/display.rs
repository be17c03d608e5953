use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use loto6_db::models::Draw;
use loto6_scoring::stats::{Distribution, StatisticsReport};
use loto6_scoring::PredictionResult;

use crate::import::ImportResult;

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn format_yen(amount: i64) -> String {
    if amount <= 0 {
        return "—".to_string();
    }
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    format!("{} ¥", grouped)
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["N°", "Date", "Numéros", "Bonus", "Gagnants R1", "Gains R1", "Report"]);

    for draw in draws {
        table.add_row(vec![
            draw.draw_number.to_string(),
            draw.date.format("%Y/%m/%d").to_string(),
            format_numbers(&draw.sorted_numbers()),
            format!("{:2}", draw.bonus),
            draw.prize_counts[0].to_string(),
            format_yen(draw.prize_amounts[0]),
            format_yen(draw.carryover),
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_prediction(result: &PredictionResult) {
    println!(
        "\n🎯 Analyse de {} tirages (fenêtre récente : {}), dernier tirage n°{} du {}\n",
        result.total_draws,
        result.recent_window,
        result.latest_draw_number,
        result.analysis_date.format("%Y/%m/%d"),
    );
    println!(
        "Dernier tirage : {}  bonus {:2}\n",
        format_numbers(&result.latest_numbers),
        result.latest_bonus
    );

    let mut table = new_table(vec![
        "Rang", "Numéro", "Fréquence", "Tendance", "Intervalle", "Équilibre", "Report", "Total",
    ]);

    for (rank, score) in result.scores.iter().enumerate() {
        let recommended = result.recommended.contains(&score.number);
        let number_cell = if recommended {
            Cell::new(format!("{:2} ★", score.number)).fg(Color::Green)
        } else {
            Cell::new(format!("{:2}", score.number))
        };
        let carry_cell = if score.carried_over {
            Cell::new(format!("{:.3}", score.carryover)).fg(Color::Yellow)
        } else {
            Cell::new(format!("{:.3}", score.carryover))
        };
        table.add_row(vec![
            Cell::new(rank + 1),
            number_cell,
            Cell::new(format!("{:.3}", score.frequency)),
            Cell::new(format!("{:.3}", score.trend)),
            Cell::new(format!("{:.3}", score.interval)),
            Cell::new(format!("{:.3}", score.balance)),
            carry_cell,
            Cell::new(format!("{:.4}", score.total)),
        ]);
    }
    println!("{table}");

    println!("\n🎲 Sélection recommandée : {}\n", format_numbers(&result.recommended));

    let mut table = new_table(vec!["Numéro", "Justification"]);
    for reason in &result.reasons {
        table.add_row(vec![format!("{:2}", reason.number), reason.text.clone()]);
    }
    println!("{table}");
}

fn display_distribution(title: &str, dist: &Distribution) {
    println!("\n── {} ──", title);
    let mut table = new_table(vec!["Classe", "Tirages", "%"]);
    for (i, bucket) in dist.buckets.iter().enumerate() {
        let label = if i == dist.modal_index {
            Cell::new(&bucket.label).fg(Color::Green)
        } else {
            Cell::new(&bucket.label)
        };
        table.add_row(vec![
            label,
            Cell::new(bucket.count),
            Cell::new(format!("{:.1}", bucket.percentage)),
        ]);
    }
    println!("{table}");
}

pub fn display_statistics(report: &StatisticsReport, total_draws: usize) {
    println!("\n📊 Statistiques sur {} tirages", total_draws);

    display_distribution("Pairs / Impairs", &report.parity);
    display_distribution("Bas (1-21) / Hauts (22-43)", &report.high_low);
    display_distribution("Somme des numéros", &report.sums.distribution);
    println!(
        "  Moyenne {:.1} · Médiane {:.1} · Min {} · Max {}",
        report.sums.average, report.sums.median, report.sums.min, report.sums.max
    );
    display_distribution("Numéros consécutifs", &report.consecutive);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_yen_groups_thousands() {
        assert_eq!(format_yen(200_000_000), "200 000 000 ¥");
        assert_eq!(format_yen(1_000), "1 000 ¥");
        assert_eq!(format_yen(999), "999 ¥");
        assert_eq!(format_yen(0), "—");
    }

    #[test]
    fn test_format_numbers() {
        assert_eq!(format_numbers(&[3, 12, 41]), " 3 - 12 - 41");
    }
}
