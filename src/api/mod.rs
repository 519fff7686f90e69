//! Backend access: client, wire models and errors.

pub mod client;
pub mod error;
pub mod models;

pub use client::ApiClient;
pub use error::ClientError;
pub use models::{
    ApprovalAction, DateRange, Divisi, FundRequest, NewFundRequest, NewPemasukan,
    NewPengeluaran, PaymentMethod, Pemasukan, Pendaftaran, Pengeluaran, Photo, PhotoRecord,
    ValidationError,
};
