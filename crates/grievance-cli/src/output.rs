//! Plain-text rendering of requests, mails, users and analytics

use grievance_client::{Analytics, Breakdown};
use grievance_common::utils::{format_date, format_datetime, format_file_size, format_target_date, join_addresses};
use grievance_common::{Mail, Request, User};
use std::fmt::Write;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn user_line(user: &User) -> String {
    let company = user
        .company_name
        .clone()
        .or_else(|| user.company.as_ref().map(|c| c.company_name.clone()));
    match company {
        Some(company) => format!("{} <{}> [{}] {}", user.user_name, user.email, user.role, company),
        None => format!("{} <{}> [{}]", user.user_name, user.email, user.role),
    }
}

pub fn request_table(requests: &[Request]) -> String {
    if requests.is_empty() {
        return "No requests found\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<36}  {:<8}  {:<6}  {:<14}  {:<16}  {}",
        "ID", "SUBJECT", "STATUS", "PRIO", "TYPE", "CREATED BY", "CREATED"
    );
    for r in requests {
        let _ = writeln!(
            out,
            "{:>5}  {:<36}  {:<8}  {:<6}  {:<14}  {:<16}  {}",
            r.request_id,
            truncate(&r.subject, 36),
            r.status.status_name.as_str(),
            r.priority.priority_name.as_str(),
            truncate(r.request_type.as_str(), 14),
            truncate(&r.created_by.user_name, 16),
            format_date(&r.created_on),
        );
    }
    let _ = writeln!(out, "{} requests", requests.len());
    out
}

pub fn request_detail(request: &Request, mails: &[Mail]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", request.request_id, request.subject);
    let _ = writeln!(
        out,
        "Status: {}   Priority: {}   Type: {}",
        request.status.status_name.label(),
        request.priority.priority_name.as_str(),
        request.request_type.as_str()
    );
    let _ = writeln!(out, "Created by {} on {}", request.created_by.user_name, format_datetime(&request.created_on));
    if let Some(updated) = &request.updated_on {
        let by = request.updated_by.as_deref().unwrap_or("-");
        let _ = writeln!(out, "Updated by {} on {}", by, format_datetime(updated));
    }
    match &request.assigned_to {
        Some(assignee) => {
            let on = request.assigned_on.as_ref().map(format_date).unwrap_or_default();
            let _ = writeln!(out, "Assigned to {} {}", assignee.user_name, on);
        }
        None => {
            let _ = writeln!(out, "Unassigned");
        }
    }
    if let Some(remark) = &request.remark {
        let _ = writeln!(out, "Remark: {}", remark);
    }

    let _ = writeln!(out, "\n{}\n", request.message);

    for (label, plan) in request.phases() {
        let date = plan
            .target_date
            .as_ref()
            .map(format_target_date)
            .unwrap_or_else(|| "Not set".to_string());
        let _ = writeln!(out, "{:<12} {:<14} {}", label, date, plan.remark.as_deref().unwrap_or(""));
    }

    if !request.attachments.is_empty() {
        let _ = writeln!(out, "\nAttachments:");
        for a in &request.attachments {
            let size = a.file_size.map(format_file_size).unwrap_or_default();
            let _ = writeln!(out, "  {} {}", a.file_name, size);
        }
    }

    let _ = writeln!(out, "\nMessages ({}):", mails.len());
    for m in mails {
        let _ = writeln!(out, "  [{}] {} - {} ({})", m.mail_id, m.from_address, m.subject, format_datetime(&m.sent_on));
    }
    out
}

pub fn mail_table(mails: &[Mail]) -> String {
    if mails.is_empty() {
        return "No messages\n".to_string();
    }
    let mut out = String::new();
    for m in mails {
        let flags = format!(
            "{}{}{}",
            if m.is_read { ' ' } else { '*' },
            if m.is_starred { 'S' } else { ' ' },
            if m.is_archived { 'A' } else { ' ' },
        );
        let _ = writeln!(
            out,
            "{:>5} {} #{:<4} {:<24} {:<40} {}",
            m.mail_id,
            flags,
            m.request_id,
            truncate(&m.created_by.user_name, 24),
            truncate(&m.subject, 40),
            format_datetime(&m.sent_on),
        );
    }
    out
}

pub fn mail_thread(thread: &[Mail]) -> String {
    let mut out = String::new();
    for (i, m) in thread.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(out, "{}", "-".repeat(60));
        }
        let _ = writeln!(out, "[{}] {}", m.mail_id, m.subject);
        let _ = writeln!(out, "From: {}", m.from_address);
        let _ = writeln!(out, "To: {}", join_addresses(&m.to_addresses));
        if !m.cc_addresses.is_empty() {
            let _ = writeln!(out, "Cc: {}", join_addresses(&m.cc_addresses));
        }
        let _ = writeln!(out, "Date: {}\n", format_datetime(&m.sent_on));
        let _ = writeln!(out, "{}", m.body);
        for a in &m.attachments {
            let _ = writeln!(out, "  attachment: {}", a.file_name);
        }
    }
    out
}

pub fn user_table(users: &[User]) -> String {
    let mut out = String::new();
    for u in users {
        let active = if u.is_active { "" } else { " (inactive)" };
        let _ = writeln!(out, "{:>4}  {}{}", u.user_id.0, user_line(u), active);
    }
    out
}

fn breakdown(out: &mut String, title: &str, rows: &[Breakdown]) {
    let _ = writeln!(out, "\n{}", title);
    for row in rows {
        let bar = "#".repeat((row.percent / 5) as usize);
        let _ = writeln!(out, "  {:<16} {:>4} {:>4}% {}", row.label, row.count, row.percent, bar);
    }
}

pub fn analytics_report(analytics: &Analytics) -> String {
    let mut out = String::new();
    for card in analytics.stat_cards() {
        let _ = writeln!(out, "{:<16} {}", card.title, card.value);
    }
    breakdown(&mut out, "By request type", &analytics.by_type);
    breakdown(&mut out, "By priority", &analytics.by_priority);
    let _ = writeln!(out, "\nLast 7 days: {} requests", analytics.recent_count);
    for r in &analytics.recent {
        let _ = writeln!(out, "  #{} {} ({})", r.request_id, r.subject, format_date(&r.created_on));
    }
    out
}
