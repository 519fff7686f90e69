//! Chart datasets for the dashboard.
//!
//! Rendering is left to the front end. This module only derives labels,
//! values and colors from the recap figures.

use serde::Serialize;

use crate::api::models::{CategoryTotal, Rekap, Summary};

pub const PALETTE_CONTRAST: &[&str] = &[
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
    "#bcf60c", "#fabebe", "#008080", "#e6beff", "#9a6324", "#fffac8", "#800000",
];

pub const PALETTE_GREEN: &[&str] = &[
    "#4ade80", "#22c55e", "#15803d", "#86efac", "#16a34a", "#166534", "#bbf7d0", "#a7f3d0",
    "#6ee7b7", "#34d399", "#10b981", "#059669",
];

pub const PALETTE_RED: &[&str] = &[
    "#f87171", "#ef4444", "#dc2626", "#b91c1c", "#fca5a5", "#991b1b", "#fecaca", "#f87171",
    "#fb7185", "#f43f5e", "#e11d48", "#be123c",
];

/// Repeat `palette` until it covers `count` entries
pub fn cycle_colors(palette: &[&'static str], count: usize) -> Vec<&'static str> {
    palette.iter().copied().cycle().take(count).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<i64>,
    #[serde(rename = "backgroundColor")]
    pub background_color: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Category labels from both recaps, first occurrence wins
pub fn category_labels(rekap: &Rekap) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for item in rekap.rekap_pemasukan.iter().chain(&rekap.rekap_pengeluaran) {
        if !labels.contains(&item.kategori) {
            labels.push(item.kategori.clone());
        }
    }
    labels
}

/// Total for `kategori`, or 0 when the category is absent
pub fn total_by_kategori(items: &[CategoryTotal], kategori: &str) -> i64 {
    items
        .iter()
        .find(|item| item.kategori == kategori)
        .map(|item| item.total)
        .unwrap_or(0)
}

/// Grouped bar chart: income vs. expense per category
pub fn comparison_chart(rekap: &Rekap) -> ChartData {
    let labels = category_labels(rekap);
    let series = |label: &str, items: &[CategoryTotal], palette: &[&'static str]| Dataset {
        label: Some(label.to_string()),
        data: labels
            .iter()
            .map(|kategori| total_by_kategori(items, kategori))
            .collect(),
        background_color: cycle_colors(palette, labels.len()),
    };

    let datasets = vec![
        series("Pemasukan", &rekap.rekap_pemasukan, PALETTE_GREEN),
        series("Pengeluaran", &rekap.rekap_pengeluaran, PALETTE_RED),
    ];
    ChartData { labels, datasets }
}

/// Pie chart of one recap
pub fn pie_chart(items: &[CategoryTotal]) -> ChartData {
    ChartData {
        labels: items.iter().map(|item| item.kategori.clone()).collect(),
        datasets: vec![Dataset {
            label: None,
            data: items.iter().map(|item| item.total).collect(),
            background_color: cycle_colors(PALETTE_CONTRAST, items.len()),
        }],
    }
}

/// Doughnut of income vs. expense totals
pub fn summary_chart(summary: &Summary) -> ChartData {
    ChartData {
        labels: vec!["Pemasukan".to_string(), "Pengeluaran".to_string()],
        datasets: vec![Dataset {
            label: None,
            data: vec![summary.total_pemasukan, summary.total_pengeluaran],
            background_color: vec![PALETTE_GREEN[1], PALETTE_RED[1]],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(kategori: &str, total: i64) -> CategoryTotal {
        CategoryTotal {
            kategori: kategori.into(),
            total,
        }
    }

    fn rekap() -> Rekap {
        Rekap {
            rekap_pemasukan: vec![total("Iuran", 900_000), total("Donasi", 250_000)],
            rekap_pengeluaran: vec![total("Konsumsi", 400_000), total("Iuran", 10_000)],
        }
    }

    #[test]
    fn test_cycle_colors() {
        assert!(cycle_colors(PALETTE_GREEN, 0).is_empty());
        assert_eq!(cycle_colors(PALETTE_GREEN, 3), &PALETTE_GREEN[..3]);

        let long = cycle_colors(PALETTE_RED, 30);
        assert_eq!(long.len(), 30);
        assert_eq!(long[12], PALETTE_RED[0]);
        assert_eq!(long[29], PALETTE_RED[5]);
        assert!(cycle_colors(&[], 4).is_empty());
    }

    #[test]
    fn test_labels_union_in_order() {
        assert_eq!(category_labels(&rekap()), vec!["Iuran", "Donasi", "Konsumsi"]);
    }

    #[test]
    fn test_comparison_chart_fills_missing_with_zero() {
        let chart = comparison_chart(&rekap());
        assert_eq!(chart.datasets[0].data, vec![900_000, 250_000, 0]);
        assert_eq!(chart.datasets[1].data, vec![10_000, 0, 400_000]);
        assert_eq!(chart.datasets[1].background_color.len(), 3);

        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["datasets"][0]["label"], "Pemasukan");
        assert_eq!(json["datasets"][0]["backgroundColor"][0], "#4ade80");
    }

    #[test]
    fn test_pie_chart() {
        let chart = pie_chart(&rekap().rekap_pengeluaran);
        assert_eq!(chart.labels, vec!["Konsumsi", "Iuran"]);
        assert_eq!(chart.datasets[0].background_color, vec!["#e6194b", "#3cb44b"]);
        assert!(serde_json::to_value(&chart).unwrap()["datasets"][0]
            .get("label")
            .is_none());
    }
}
