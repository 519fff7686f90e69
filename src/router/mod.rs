//! View routing: which page a caller may open.
//!
//! Routing is a pure decision over (path, capability). Denial is never an
//! error: the caller is sent to the login page or to their own default view.

use serde::Serialize;

use crate::auth::Capability;
use crate::session::Session;

/// Top-level views of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    Dashboard,
    Pemasukan,
    Pengeluaran,
    Laporan,
    LaporanGuest,
    AcaraGuest,
    DokumentasiGuest,
    PengajuanMaker,
    PengajuanChecker,
    PengajuanApprover,
    PengajuanAdmin,
}

/// Who may open a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Anyone, logged in or not
    Public,
    /// Any of the four organizational capabilities
    Member,
    /// Exactly this capability
    Only(Capability),
}

impl View {
    pub const ALL: [View; 12] = [
        View::Login,
        View::Dashboard,
        View::Pemasukan,
        View::Pengeluaran,
        View::Laporan,
        View::LaporanGuest,
        View::AcaraGuest,
        View::DokumentasiGuest,
        View::PengajuanMaker,
        View::PengajuanChecker,
        View::PengajuanApprover,
        View::PengajuanAdmin,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            View::Login => "/login",
            View::Dashboard => "/",
            View::Pemasukan => "/pemasukan",
            View::Pengeluaran => "/pengeluaran",
            View::Laporan => "/laporan",
            View::LaporanGuest => "/laporan/guest",
            View::AcaraGuest => "/acara/guest",
            View::DokumentasiGuest => "/dokumentasi/guest",
            View::PengajuanMaker => "/pengajuan/maker",
            View::PengajuanChecker => "/pengajuan/checker",
            View::PengajuanApprover => "/pengajuan/approver",
            View::PengajuanAdmin => "/pengajuan/admin",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Login => "Login",
            View::Dashboard => "Dashboard",
            View::Pemasukan => "Pemasukan",
            View::Pengeluaran => "Pengeluaran",
            View::Laporan => "Laporan",
            View::LaporanGuest => "Keuangan",
            View::AcaraGuest => "Acara",
            View::DokumentasiGuest => "Dokumentasi",
            View::PengajuanMaker => "Form Pengajuan Dana",
            View::PengajuanChecker => "Pemeriksaan Pengajuan",
            View::PengajuanApprover => "Persetujuan Pengajuan",
            View::PengajuanAdmin => "Riwayat Pengajuan",
        }
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            View::Login | View::LaporanGuest | View::AcaraGuest | View::DokumentasiGuest => {
                Requirement::Public
            }
            View::Dashboard | View::Pemasukan | View::Pengeluaran | View::Laporan => {
                Requirement::Member
            }
            View::PengajuanMaker => Requirement::Only(Capability::Maker),
            View::PengajuanChecker => Requirement::Only(Capability::Checker),
            View::PengajuanApprover => Requirement::Only(Capability::Approver),
            View::PengajuanAdmin => Requirement::Only(Capability::Admin),
        }
    }

    /// Look up a view by path. Trailing slashes, query strings and
    /// fragments are ignored.
    pub fn from_path(path: &str) -> Option<View> {
        let path = path.split(['?', '#']).next().unwrap_or(path).trim();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        View::ALL.into_iter().find(|v| v.path() == normalized)
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl Requirement {
    pub fn is_met_by(&self, capability: Capability) -> bool {
        match self {
            Requirement::Public => true,
            Requirement::Member => capability.is_member(),
            Requirement::Only(required) => *required == capability,
        }
    }
}

/// Router verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Mount(View),
    Redirect(View),
}

impl RouteDecision {
    /// The view that ends up on screen
    pub fn view(&self) -> View {
        match self {
            RouteDecision::Mount(v) | RouteDecision::Redirect(v) => *v,
        }
    }
}

/// Landing view for a capability
pub fn default_view(capability: Capability) -> View {
    match capability {
        Capability::Admin => View::PengajuanAdmin,
        Capability::Maker => View::PengajuanMaker,
        Capability::Checker => View::PengajuanChecker,
        Capability::Approver => View::PengajuanApprover,
        Capability::Guest | Capability::Unknown => View::LaporanGuest,
    }
}

/// Decide what mounts for `path` given the session
pub fn resolve_route(path: &str, session: &Session) -> RouteDecision {
    let view = View::from_path(path);

    if !session.is_authenticated() {
        return match view {
            Some(v) if v.requirement() == Requirement::Public => RouteDecision::Mount(v),
            _ => RouteDecision::Redirect(View::Login),
        };
    }

    let capability = Capability::for_session(session);
    let fallback = default_view(capability);

    match view {
        Some(View::Login) | None => RouteDecision::Redirect(fallback),
        Some(v) if v.requirement().is_met_by(capability) => RouteDecision::Mount(v),
        Some(_) => RouteDecision::Redirect(fallback),
    }
}

/// Navigation entries for a capability, in menu order
pub fn menu_for(capability: Capability) -> Vec<View> {
    let mut menu = match capability {
        Capability::Guest | Capability::Unknown => {
            return vec![View::LaporanGuest, View::AcaraGuest, View::DokumentasiGuest]
        }
        Capability::Admin
        | Capability::Maker
        | Capability::Checker
        | Capability::Approver => vec![
            View::Dashboard,
            View::Pemasukan,
            View::Pengeluaran,
            View::Laporan,
        ],
    };
    menu.push(default_view(capability));
    menu
}
