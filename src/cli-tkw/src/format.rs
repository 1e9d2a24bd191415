//! Plain-text rendering of API answers for the terminal.

use data_model_tkw::models::{GenerationRequest, ProjectSummary, RequestState};

const COLUMN: usize = 48;

fn clip(s: &str, limit: usize) -> String {
    let one_line = s.replace(['\n', '\r'], " ");
    match one_line.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &one_line[..cut]),
        None => one_line,
    }
}

fn outcome(request: &GenerationRequest) -> String {
    match request.state() {
        RequestState::Pending => "-".to_string(),
        RequestState::Ready { output_link } => output_link,
        RequestState::Error { error_message } => format!("error: {}", error_message),
    }
}

/// One line per request: id, creation time, status, name, outcome.
pub fn history_line(request: &GenerationRequest) -> String {
    format!(
        "{}  {}  {:<7}  {}  {}",
        request.id,
        request.created_at.format("%Y-%m-%d %H:%M"),
        request.status,
        clip(&request.project_name, COLUMN),
        outcome(request)
    )
}

pub fn project_line(project: &ProjectSummary) -> String {
    format!(
        "{}  {}  {}",
        project.id,
        clip(&project.project_name, COLUMN),
        clip(&project.business_details, COLUMN)
    )
}

/// Every field of a request, one per line.
pub fn request_details(request: &GenerationRequest) -> String {
    let mut lines = vec![
        format!("id:                {}", request.id),
        format!("project name:      {}", request.project_name),
        format!("status:            {}", request.status),
        format!("created:           {}", request.created_at.to_rfc3339()),
        format!("updated:           {}", request.updated_at.to_rfc3339()),
    ];
    match request.state() {
        RequestState::Ready { output_link } => lines.push(format!("output link:       {}", output_link)),
        RequestState::Error { error_message } => lines.push(format!("error:             {}", error_message)),
        RequestState::Pending => {}
    }
    lines.push(format!("business details:\n{}", request.business_details));
    lines.push(format!("website structure:\n{}", request.website_structure));
    lines.join("\n")
}
