//! Text rendering of the controller's view model.

use std::fmt::Write as _;

use directory_core::ViewModel;
use shared::{
    domain::{FilterOptions, OptionsStatus},
    error::{DirectoryError, ResponseError},
};

pub const EMPTY_STATE: &str = "No deputies found for the selected filters.";

pub fn describe_error(err: &DirectoryError) -> String {
    match err {
        DirectoryError::Network(detail) => {
            format!("Directory unreachable; check the API URL/network and retry ({detail}).")
        }
        DirectoryError::Response(ResponseError::Status { status }) => {
            format!("Directory API answered with status {status}; retry later.")
        }
        DirectoryError::Response(ResponseError::Malformed(detail)) => {
            format!("Directory API sent an unexpected payload ({detail}).")
        }
        DirectoryError::OptionsLoad(detail) => format!("Party list unavailable ({detail})."),
    }
}

pub fn render_view(view: &ViewModel) -> String {
    let mut out = String::new();

    if view.loading {
        out.push_str("Loading...\n");
        return out;
    }

    if let Some(err) = &view.error {
        let _ = writeln!(out, "error: {}", describe_error(err));
        if view.has_result {
            out.push_str("Showing the last page that loaded successfully.\n");
        }
    }

    if view.entities.is_empty() {
        let _ = writeln!(out, "{EMPTY_STATE}");
        return out;
    }

    let width = view
        .entities
        .iter()
        .map(|official| official.display_name.chars().count())
        .max()
        .unwrap_or_default();
    for official in &view.entities {
        let _ = writeln!(
            out,
            "{:<width$}  {:<12}  #{}",
            official.display_name,
            official.affiliation(),
            official.id.0,
        );
    }

    if view.shows_pagination() {
        let _ = writeln!(out, "\npage {} of {}", view.current_page, view.total_pages);
    }
    out
}

pub fn render_options(options: &FilterOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "regions: {}", options.region_codes.join(" "));
    match options.party_status {
        OptionsStatus::Ready => {
            let _ = writeln!(out, "parties: {}", options.party_codes.join(" "));
        }
        OptionsStatus::Pending => out.push_str("parties: (loading)\n"),
        OptionsStatus::Unavailable => out.push_str("parties: (no options available)\n"),
    }
    out
}
