//! Searchable, paginated tables for transactions and event registrations.

use serde::Serialize;

use crate::api::models::{Pemasukan, Pendaftaran, Pengeluaran};
use crate::report::format::{format_date, group_thousands, payment_label};

pub const ITEMS_PER_PAGE: usize = 5;

/// A record that can be listed in a table
pub trait TableRow {
    /// Column headers, without the running number
    fn headers() -> &'static [&'static str];

    /// Display cells, in header order
    fn cells(&self) -> Vec<String>;

    /// Raw values matched by the search box
    fn search_text(&self) -> String;

    /// Shown instead of the table when nothing is listed
    fn empty_text() -> &'static str {
        "Belum ada data."
    }
}

impl TableRow for Pemasukan {
    fn headers() -> &'static [&'static str] {
        &["Tanggal", "Sumber", "Kategori", "Jumlah (Rp)", "Metode Pembayaran"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format_date(&self.tanggal),
            self.sumber.clone(),
            self.kategori.clone(),
            group_thousands(self.jumlah),
            payment_label(&self.keterangan).to_string(),
        ]
    }

    fn search_text(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.id, self.tanggal, self.sumber, self.kategori, self.jumlah, self.keterangan
        )
    }
}

impl TableRow for Pengeluaran {
    fn headers() -> &'static [&'static str] {
        &["Tanggal", "Keperluan", "Kategori", "Jumlah (Rp)", "Metode Pembayaran"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format_date(&self.tanggal),
            self.keperluan.clone(),
            self.kategori.clone(),
            group_thousands(self.jumlah),
            payment_label(&self.keterangan).to_string(),
        ]
    }

    fn search_text(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.id, self.tanggal, self.keperluan, self.kategori, self.jumlah, self.keterangan
        )
    }
}

impl TableRow for Pendaftaran {
    fn headers() -> &'static [&'static str] {
        &["Nama", "Usia", "RT", "Lomba"]
    }

    fn cells(&self) -> Vec<String> {
        [&self.nama, &self.usia, &self.rt, &self.lomba]
            .into_iter()
            .map(|cell| cell.clone().unwrap_or_else(|| "-".to_string()))
            .collect()
    }

    fn search_text(&self) -> String {
        let known = [&self.id, &self.nama, &self.usia, &self.rt, &self.lomba]
            .into_iter()
            .flatten()
            .cloned();
        let extra = self.extra.values().filter_map(crate::api::models::text::from_value);
        known.chain(extra).collect::<Vec<_>>().join(" ")
    }

    fn empty_text() -> &'static str {
        "Tidak ada data pendaftar."
    }
}

/// One page of a filtered table
#[derive(Debug, Clone, Serialize)]
pub struct Page<'a, T> {
    pub items: Vec<&'a T>,
    /// 1-based, clamped into `1..=total_pages`
    pub page: usize,
    /// Never less than 1
    pub total_pages: usize,
    /// Rows that matched the search
    pub total_matches: usize,
}

impl<'a, T: TableRow> Page<'a, T> {
    /// Running number of the first row on this page (1-based)
    pub fn first_number(&self) -> usize {
        (self.page - 1) * ITEMS_PER_PAGE + 1
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn summary(&self) -> String {
        if self.items.is_empty() {
            return T::empty_text().to_string();
        }
        format!(
            "Menampilkan {}-{} dari {} data (halaman {}/{})",
            self.first_number(),
            self.first_number() + self.items.len() - 1,
            self.total_matches,
            self.page,
            self.total_pages
        )
    }
}

/// Case-insensitive substring search over each row's values
pub fn search<'a, T: TableRow>(rows: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    rows.iter()
        .filter(|row| needle.is_empty() || row.search_text().to_lowercase().contains(&needle))
        .collect()
}

/// Filter by `query`, then cut out `page`
pub fn paginate<'a, T: TableRow>(rows: &'a [T], query: &str, page: usize) -> Page<'a, T> {
    let matches = search(rows, query);
    let total_matches = matches.len();
    let total_pages = total_matches.div_ceil(ITEMS_PER_PAGE).max(1);
    let page = page.clamp(1, total_pages);

    let items = matches
        .into_iter()
        .skip((page - 1) * ITEMS_PER_PAGE)
        .take(ITEMS_PER_PAGE)
        .collect();

    Page {
        items,
        page,
        total_pages,
        total_matches,
    }
}
