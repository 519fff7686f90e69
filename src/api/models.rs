//! Wire types for the treasury backend.
//!
//! The backend is loose about numbers: amounts and totals arrive either as
//! JSON numbers or as numeric strings ("5000000", "5000000.00"). Every
//! amount field goes through the lenient deserializers in [`amount`].

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::User;
use crate::workflow::FundStatus;

/// Form validation failures, reported before anything is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Amount must be a non-negative whole number, got {0:?}")]
    InvalidAmount(String),

    #[error("Unknown division {0:?} (expected Acara, Konsumsi, Pubdok, Logistik or Sekretariat)")]
    UnknownDivisi(String),

    #[error("Unknown payment method {0:?} (expected TUNAI or NON_TUNAI)")]
    UnknownPaymentMethod(String),

    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

pub mod amount {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn to_i64(value: &Value) -> Result<i64, String> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(i)
                } else if let Some(f) = n.as_f64() {
                    Ok(f.trunc() as i64)
                } else {
                    Err(format!("amount out of range: {}", n))
                }
            }
            Value::String(s) => {
                let s = s.trim();
                let whole = s.split('.').next().unwrap_or(s);
                whole
                    .parse::<i64>()
                    .map_err(|_| format!("invalid amount: {:?}", s))
            }
            Value::Null => Ok(0),
            other => Err(format!("invalid amount: {}", other)),
        }
    }

    /// Non-negative amount (request totals, transaction amounts)
    pub fn unsigned<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let value = Value::deserialize(d)?;
        let n = to_i64(&value).map_err(D::Error::custom)?;
        u64::try_from(n).map_err(|_| D::Error::custom(format!("negative amount: {}", n)))
    }

    /// Signed figure (balances can go below zero)
    pub fn signed<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        let value = Value::deserialize(d)?;
        to_i64(&value).map_err(D::Error::custom)
    }

    /// Parse a form field the way a number input would be read
    pub fn parse_form(raw: &str) -> Option<u64> {
        let raw = raw.trim();
        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        raw.parse().ok()
    }
}

/// Lenient text fields: guest-facing endpoints send ids, ages and RT
/// numbers as strings or numbers depending on who entered them.
pub mod text {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Display form of a scalar; `None` for null, empty strings and nested values
    pub fn from_value(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn optional<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(from_value(&value))
    }
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: String,
    #[serde(default)]
    pub user: Option<User>,
}

// ============================================================================
// Fund requests (pengajuan)
// ============================================================================

/// Committee divisions that may request funds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Divisi {
    #[default]
    Acara,
    Konsumsi,
    Pubdok,
    Logistik,
    Sekretariat,
}

impl Divisi {
    pub const ALL: [Divisi; 5] = [
        Divisi::Acara,
        Divisi::Konsumsi,
        Divisi::Pubdok,
        Divisi::Logistik,
        Divisi::Sekretariat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Divisi::Acara => "Acara",
            Divisi::Konsumsi => "Konsumsi",
            Divisi::Pubdok => "Pubdok",
            Divisi::Logistik => "Logistik",
            Divisi::Sekretariat => "Sekretariat",
        }
    }
}

impl std::str::FromStr for Divisi {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Divisi::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownDivisi(s.to_string()))
    }
}

impl std::fmt::Display for Divisi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fund request as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundRequest {
    pub id: i64,
    pub judul: String,
    #[serde(default)]
    pub deskripsi: Option<String>,
    pub divisi: String,
    #[serde(deserialize_with = "amount::unsigned")]
    pub jumlah: u64,
    pub status: FundStatus,
    #[serde(rename = "dibuat_oleh", default)]
    pub created_by: Option<i64>,
    #[serde(rename = "tanggal_pengajuan", default)]
    pub created_at: Option<String>,
}

/// Payload for `POST /pengajuan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFundRequest {
    pub judul: String,
    pub deskripsi: String,
    pub divisi: Divisi,
    pub jumlah: u64,
    pub dibuat_oleh: Option<i64>,
}

impl NewFundRequest {
    /// Build from raw form input
    pub fn from_form(
        judul: &str,
        deskripsi: &str,
        divisi: &str,
        jumlah: &str,
        dibuat_oleh: Option<i64>,
    ) -> Result<Self, ValidationError> {
        let judul = judul.trim();
        if judul.is_empty() {
            return Err(ValidationError::Required("judul"));
        }
        let divisi: Divisi = divisi.parse()?;
        let jumlah = amount::parse_form(jumlah)
            .ok_or_else(|| ValidationError::InvalidAmount(jumlah.to_string()))?;

        Ok(Self {
            judul: judul.to_string(),
            deskripsi: deskripsi.trim().to_string(),
            divisi,
            jumlah,
            dibuat_oleh,
        })
    }
}

/// Body of `PATCH /pengajuan/approve/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalBody {
    pub action: ApprovalAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalAction {
    Approved,
    Rejected,
}

// ============================================================================
// Transactions
// ============================================================================

/// Payment method stored in `keterangan`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "TUNAI")]
    Tunai,
    #[serde(rename = "NON_TUNAI")]
    NonTunai,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Tunai => "TUNAI",
            PaymentMethod::NonTunai => "NON_TUNAI",
        }
    }

    /// Label shown in tables
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Tunai => "Tunai",
            PaymentMethod::NonTunai => "Non-Tunai",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "TUNAI" => Ok(PaymentMethod::Tunai),
            "NON_TUNAI" => Ok(PaymentMethod::NonTunai),
            _ => Err(ValidationError::UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// Income record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pemasukan {
    pub id: i64,
    pub tanggal: String,
    #[serde(default)]
    pub sumber: String,
    #[serde(default)]
    pub kategori: String,
    #[serde(deserialize_with = "amount::unsigned")]
    pub jumlah: u64,
    #[serde(default)]
    pub keterangan: String,
}

/// Expense record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pengeluaran {
    pub id: i64,
    pub tanggal: String,
    #[serde(default)]
    pub keperluan: String,
    #[serde(default)]
    pub kategori: String,
    #[serde(deserialize_with = "amount::unsigned")]
    pub jumlah: u64,
    #[serde(default)]
    pub keterangan: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPemasukan {
    pub tanggal: NaiveDate,
    pub sumber: String,
    pub kategori: String,
    pub jumlah: u64,
    pub keterangan: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPengeluaran {
    pub tanggal: NaiveDate,
    pub keperluan: String,
    pub kategori: String,
    pub jumlah: u64,
    pub keterangan: PaymentMethod,
}

/// Fields shared by both transaction forms
struct TransactionForm {
    tanggal: NaiveDate,
    label: String,
    kategori: String,
    jumlah: u64,
    keterangan: PaymentMethod,
}

fn parse_transaction_form(
    tanggal: &str,
    label_field: &'static str,
    label: &str,
    kategori: &str,
    jumlah: &str,
    keterangan: &str,
) -> Result<TransactionForm, ValidationError> {
    let tanggal = parse_date(tanggal)?;
    if label.trim().is_empty() {
        return Err(ValidationError::Required(label_field));
    }
    if kategori.trim().is_empty() {
        return Err(ValidationError::Required("kategori"));
    }
    let jumlah = amount::parse_form(jumlah)
        .ok_or_else(|| ValidationError::InvalidAmount(jumlah.to_string()))?;
    let keterangan = if keterangan.trim().is_empty() {
        PaymentMethod::default()
    } else {
        keterangan.parse()?
    };

    Ok(TransactionForm {
        tanggal,
        label: label.trim().to_string(),
        kategori: kategori.trim().to_string(),
        jumlah,
        keterangan,
    })
}

impl NewPemasukan {
    pub fn from_form(
        tanggal: &str,
        sumber: &str,
        kategori: &str,
        jumlah: &str,
        keterangan: &str,
    ) -> Result<Self, ValidationError> {
        let form = parse_transaction_form(tanggal, "sumber", sumber, kategori, jumlah, keterangan)?;
        Ok(Self {
            tanggal: form.tanggal,
            sumber: form.label,
            kategori: form.kategori,
            jumlah: form.jumlah,
            keterangan: form.keterangan,
        })
    }
}

impl NewPengeluaran {
    pub fn from_form(
        tanggal: &str,
        keperluan: &str,
        kategori: &str,
        jumlah: &str,
        keterangan: &str,
    ) -> Result<Self, ValidationError> {
        let form =
            parse_transaction_form(tanggal, "keperluan", keperluan, kategori, jumlah, keterangan)?;
        Ok(Self {
            tanggal: form.tanggal,
            keperluan: form.label,
            kategori: form.kategori,
            jumlah: form.jumlah,
            keterangan: form.keterangan,
        })
    }
}

// ============================================================================
// Reports
// ============================================================================

pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Inclusive report window sent as `start_date` / `end_date`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Today through today, the dashboard's initial filter
    pub fn today() -> Self {
        let today = Local::now().date_naive();
        Self {
            start: today,
            end: today,
        }
    }

    /// Parse optional CLI/query values, defaulting each side to today
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, ValidationError> {
        let today = Local::now().date_naive();
        let start = start.map(parse_date).transpose()?.unwrap_or(today);
        let end = end.map(parse_date).transpose()?.unwrap_or(today);
        Self::new(start, end)
    }

    pub fn query(&self) -> [(&'static str, String); 2] {
        [
            ("start_date", self.start.format("%Y-%m-%d").to_string()),
            ("end_date", self.end.format("%Y-%m-%d").to_string()),
        ]
    }
}

/// `GET /laporan/summary`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default, deserialize_with = "amount::signed")]
    pub total_pemasukan: i64,
    #[serde(default, deserialize_with = "amount::signed")]
    pub total_pengeluaran: i64,
    #[serde(default, deserialize_with = "amount::signed")]
    pub saldo: i64,
}

/// One category total in a recap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub kategori: String,
    #[serde(deserialize_with = "amount::signed")]
    pub total: i64,
}

/// `GET /laporan/rekap`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rekap {
    #[serde(default)]
    pub rekap_pemasukan: Vec<CategoryTotal>,
    #[serde(default)]
    pub rekap_pengeluaran: Vec<CategoryTotal>,
}

/// `GET /laporan/saldo`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Saldo {
    #[serde(default, deserialize_with = "amount::signed")]
    pub saldo: i64,
}

/// Running contribution total for one neighborhood unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveContribution {
    pub sumber: String,
    #[serde(deserialize_with = "amount::signed")]
    pub total: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveContributions {
    #[serde(default)]
    pub data: Vec<LiveContribution>,
}

// ============================================================================
// Gallery (foto) and registrations (pendaftaran)
// ============================================================================

/// Photo entry as the gallery backend stores it. Uploads from different
/// sources fill different link fields, so all of them are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    #[serde(default, deserialize_with = "text::optional")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text::optional")]
    pub thumbnail_link: Option<String>,
    #[serde(default, deserialize_with = "text::optional")]
    pub file_id: Option<String>,
    #[serde(default, deserialize_with = "text::optional")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "text::optional")]
    pub full_link: Option<String>,
    #[serde(default, deserialize_with = "text::optional")]
    pub original_url: Option<String>,
    #[serde(default, deserialize_with = "text::optional")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "text::optional")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text::optional")]
    pub caption: Option<String>,
    #[serde(default, deserialize_with = "text::optional")]
    pub description: Option<String>,
}

/// Gallery photo with its link fields settled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Photo {
    pub id: Option<String>,
    /// Grid source: `thumbnailLink`, else `fileId`, else `url`
    pub thumbnail: String,
    /// Lightbox/download source: `fullLink`, else `originalUrl`, else `url`, else `thumbnailLink`
    pub full: String,
    pub title: String,
    pub caption: String,
    pub category: String,
    pub year: String,
}

impl PhotoRecord {
    pub fn into_photo(self, year: &str, category: &str) -> Photo {
        let thumbnail = first_filled([&self.thumbnail_link, &self.file_id, &self.url]);
        let full = first_filled([
            &self.full_link,
            &self.original_url,
            &self.url,
            &self.thumbnail_link,
        ]);
        let title = first_filled([&self.title, &self.name]);
        let caption = match first_filled([&self.caption, &self.description]) {
            c if c.is_empty() => format!("{} {}", category, year),
            c => c,
        };

        Photo {
            id: self.id,
            thumbnail,
            full,
            title,
            caption,
            category: category.to_string(),
            year: year.to_string(),
        }
    }
}

fn first_filled<const N: usize>(candidates: [&Option<String>; N]) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Competition registration from `GET /pendaftaran/all`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pendaftaran {
    #[serde(default, deserialize_with = "text::optional")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text::optional")]
    pub nama: Option<String>,
    #[serde(default, deserialize_with = "text::optional")]
    pub usia: Option<String>,
    #[serde(default, deserialize_with = "text::optional")]
    pub rt: Option<String>,
    #[serde(default, deserialize_with = "text::optional")]
    pub lomba: Option<String>,
    /// Any further columns the event form collected
    #[serde(flatten)]
    pub extra: std::collections::BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fund_request_accepts_string_amount() {
        let record: FundRequest = serde_json::from_value(json!({
            "id": 3,
            "judul": "Panggung",
            "deskripsi": null,
            "divisi": "Acara",
            "jumlah": "5000000.00",
            "status": "checking",
            "dibuat_oleh": 7,
            "tanggal_pengajuan": "2025-08-01T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(record.jumlah, 5_000_000);
        assert_eq!(record.status, FundStatus::Checking);
        assert_eq!(record.created_by, Some(7));
        assert_eq!(record.deskripsi, None);
    }

    #[test]
    fn test_negative_request_amount_rejected() {
        let result: Result<FundRequest, _> = serde_json::from_value(json!({
            "id": 1, "judul": "x", "divisi": "Acara", "jumlah": -5, "status": "submitted"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_photo_link_precedence() {
        let record: PhotoRecord = serde_json::from_value(json!({
            "id": 12,
            "fileId": "1AbCdEfGh",
            "url": "/uploads/panggung.jpg",
            "originalUrl": "",
            "name": "Panggung",
        }))
        .unwrap();
        let photo = record.into_photo("2024", "Agustusan");

        assert_eq!(photo.id.as_deref(), Some("12"));
        assert_eq!(photo.thumbnail, "1AbCdEfGh");
        assert_eq!(photo.full, "/uploads/panggung.jpg");
        assert_eq!(photo.title, "Panggung");
        assert_eq!(photo.caption, "Agustusan 2024");

        let bare = PhotoRecord {
            thumbnail_link: Some("https://cdn.example/t.jpg".into()),
            description: Some("Lomba balap karung".into()),
            ..PhotoRecord::default()
        }
        .into_photo("2024", "Lomba");
        assert_eq!(bare.full, "https://cdn.example/t.jpg");
        assert_eq!(bare.caption, "Lomba balap karung");
        assert_eq!(bare.title, "");
    }

    #[test]
    fn test_pendaftaran_accepts_numbers_and_extra_columns() {
        let row: Pendaftaran = serde_json::from_value(json!({
            "id": 3,
            "nama": "Sari",
            "usia": 12,
            "rt": "04",
            "lomba": "Makan kerupuk",
            "no_hp": "0812"
        }))
        .unwrap();

        assert_eq!(row.usia.as_deref(), Some("12"));
        assert_eq!(row.rt.as_deref(), Some("04"));
        assert_eq!(row.extra.get("no_hp"), Some(&json!("0812")));

        let sparse: Pendaftaran = serde_json::from_value(json!({"nama": "Budi", "usia": null}))
            .unwrap();
        assert_eq!(sparse.usia, None);
        assert_eq!(sparse.lomba, None);
    }

    #[test]
    fn test_new_fund_request_serializes_integer_amount() {
        let req =
            NewFundRequest::from_form("Sound system", " rigging ", "logistik", "5000000", Some(7))
                .unwrap();
        assert_eq!(req.divisi, Divisi::Logistik);

        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["jumlah"], json!(5_000_000));
        assert_eq!(body["divisi"], json!("Logistik"));
        assert_eq!(body["deskripsi"], json!("rigging"));
        assert_eq!(body["dibuat_oleh"], json!(7));
    }

    #[test]
    fn test_new_fund_request_validation() {
        assert_eq!(
            NewFundRequest::from_form(" ", "", "Acara", "10", None),
            Err(ValidationError::Required("judul"))
        );
        assert!(matches!(
            NewFundRequest::from_form("a", "", "Humas", "10", None),
            Err(ValidationError::UnknownDivisi(_))
        ));
        assert!(matches!(
            NewFundRequest::from_form("a", "", "Acara", "-10", None),
            Err(ValidationError::InvalidAmount(_))
        ));
        assert!(matches!(
            NewFundRequest::from_form("a", "", "Acara", "1.5", None),
            Err(ValidationError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_transaction_forms() {
        let out =
            NewPengeluaran::from_form("2025-08-17", "Konsumsi rapat", "Konsumsi", "250000", "")
                .unwrap();
        assert_eq!(out.keterangan, PaymentMethod::Tunai);
        let body = serde_json::to_value(&out).unwrap();
        assert_eq!(body["tanggal"], json!("2025-08-17"));
        assert_eq!(body["keterangan"], json!("TUNAI"));

        let income =
            NewPemasukan::from_form("2025-08-17", "RT 04", "Sumbangan", "100000", "non-tunai")
                .unwrap();
        assert_eq!(income.keterangan, PaymentMethod::NonTunai);

        assert!(matches!(
            NewPemasukan::from_form("17-08-2025", "RT 04", "Sumbangan", "1", ""),
            Err(ValidationError::InvalidDate(_))
        ));
        assert_eq!(
            NewPemasukan::from_form("2025-08-17", "", "Sumbangan", "1", ""),
            Err(ValidationError::Required("sumber"))
        );
    }

    #[test]
    fn test_form_defaults() {
        assert_eq!(Divisi::default(), Divisi::Acara);
        assert_eq!(PaymentMethod::default(), PaymentMethod::Tunai);
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::parse(Some("2025-08-01"), Some("2025-08-31")).unwrap();
        assert_eq!(
            range.query(),
            [
                ("start_date", "2025-08-01".to_string()),
                ("end_date", "2025-08-31".to_string())
            ]
        );

        assert!(matches!(
            DateRange::parse(Some("2025-09-01"), Some("2025-08-01")),
            Err(ValidationError::InvertedRange { .. })
        ));

        let today = DateRange::today();
        assert_eq!(today.start, today.end);
    }

    #[test]
    fn test_report_figures_accept_strings() {
        let summary: Summary = serde_json::from_value(json!({
            "total_pemasukan": "1500000",
            "total_pengeluaran": 2000000,
            "saldo": "-500000"
        }))
        .unwrap();
        assert_eq!(summary.saldo, -500_000);

        let rekap: Rekap = serde_json::from_value(json!({
            "rekap_pemasukan": [{"kategori": "Sumbangan", "total": "750000"}]
        }))
        .unwrap();
        assert_eq!(rekap.rekap_pemasukan[0].total, 750_000);
        assert!(rekap.rekap_pengeluaran.is_empty());

        let empty: Summary = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, Summary::default());
    }

    #[test]
    fn test_login_response_with_and_without_user() {
        let legacy: LoginResponse =
            serde_json::from_value(json!({"token": "t", "role": "admin"})).unwrap();
        assert_eq!(legacy.user, None);

        let full: LoginResponse = serde_json::from_value(json!({
            "token": "t",
            "role": "wakil",
            "user": {"id": 2, "username": "sari", "displayName": "Sari"}
        }))
        .unwrap();
        assert_eq!(full.user.unwrap().display_name.as_deref(), Some("Sari"));
    }
}
