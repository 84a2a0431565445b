//! HTML dashboard.
//!
//! Every string that came from the mailbox or the model passes through
//! [`escape_html`] before it is placed into markup. Only integers and the
//! fixed template text are emitted unescaped.

pub mod style;
pub mod text;

use crate::domain::briefing::{Briefing, Traffic};

pub const RUN_BUTTON_LABEL: &str = "RUN DAILY ANALYSIS";
pub const DRAFT_PLACEHOLDER: &str = "Email Response";
pub const NO_EMAILS_MESSAGE: &str = "No emails found.";

/// What the page shows under the run button.
#[derive(Debug, Clone, Copy)]
pub enum Page<'a> {
    Idle,
    Info(&'a str),
    Error(&'a str),
    Dashboard { briefing: &'a Briefing, skipped: usize },
}

/// Escape HTML special characters to prevent markup injection
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_opt(s: Option<&str>) -> String {
    s.map(escape_html).unwrap_or_default()
}

pub fn schedule_html(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("• {}", escape_html(item)))
        .collect::<Vec<_>>()
        .join("<br><br>")
}

pub fn actions_html(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("☐ {}", escape_html(item)))
        .collect::<Vec<_>>()
        .join("<br><br>")
}

pub fn traffic_html(traffic: &Traffic) -> String {
    format!(
        "<b>Total:</b> {}<br><br><b>New Threads:</b> {}<br><br><b>Replies:</b> {}",
        traffic.total, traffic.new, traffic.continuing
    )
}

pub fn hot_takes_html(briefing: &Briefing) -> String {
    let mut out = String::new();
    for (i, item) in briefing.hot_takes.iter().enumerate() {
        out.push_str(&format!(
            "<div class=\"hot-take-item\">\n\
             <span class=\"hot-take-title\">🔥 {}. {}</span>\n\
             <span class=\"hot-take-meta\"><b>From:</b> {}</span>\n\
             <span class=\"hot-take-meta\">{}</span>\n\
             <span class=\"crucial-badge\">Crucial Note: {}</span>\n\
             </div>\n",
            i + 1,
            escape_opt(item.subject.as_deref()),
            escape_opt(item.sender.as_deref()),
            escape_opt(item.summary.as_deref()),
            escape_opt(item.crucial_note.as_deref()),
        ));
    }
    out
}

pub fn drafts_html(briefing: &Briefing) -> String {
    let mut out = String::new();
    for entry in briefing.drafts_with_subjects() {
        let label = escape_html(entry.subject.unwrap_or(DRAFT_PLACEHOLDER));
        out.push_str(&format!(
            "<div class=\"draft-wrapper\">\n\
             <span class=\"draft-label\">Draft for: &quot;{}&quot;</span>\n\
             <div class=\"draft-block\">{}</div>\n\
             </div>\n",
            label,
            escape_html(entry.body),
        ));
    }
    out
}

fn card(color: &str, header: &str, body: &str) -> String {
    format!(
        "<div class=\"metric-card {color}\"><div class=\"card-header\">{header}</div>{body}</div>"
    )
}

pub fn dashboard_html(briefing: &Briefing, skipped: usize) -> String {
    let mut out = String::new();

    if skipped > 0 {
        let noun = if skipped == 1 { "message" } else { "messages" };
        out.push_str(&format!(
            "<div class=\"notice notice-warn\">{skipped} {noun} could not be fetched and were left out.</div>\n"
        ));
    }

    out.push_str("<div class=\"columns\">\n");
    out.push_str(&card("card-blue", "📅 Schedule", &schedule_html(&briefing.schedule)));
    out.push('\n');
    out.push_str(&card("card-pink", "✅ Action Items", &actions_html(&briefing.actions)));
    out.push('\n');
    out.push_str(&card("card-blue", "📊 Traffic", &traffic_html(&briefing.traffic)));
    out.push_str("\n</div>\n");

    out.push_str("<div class=\"section-header\">Technological Onboarding Assistant</div>\n");
    out.push_str("<div class=\"section-content\">\n");
    out.push_str("<h3>🔥 Hot Take Emails (Top 5)</h3>\n");
    out.push_str(&hot_takes_html(briefing));
    out.push_str("<h3 class=\"drafts-heading\">✍️ Draft Responses</h3>\n");
    out.push_str(&drafts_html(briefing));
    out.push_str("</div>\n");

    out.push_str("<div class=\"footer\">© 2025 School Technology Department</div>\n");
    out
}

fn notice(kind: &str, message: &str) -> String {
    format!(
        "<div class=\"notice notice-{kind}\">{}</div>\n",
        escape_html(message)
    )
}

pub fn render_page(page: Page<'_>) -> String {
    let body = match page {
        Page::Idle => String::new(),
        Page::Info(msg) => notice("info", msg),
        Page::Error(msg) => notice("error", msg),
        Page::Dashboard { briefing, skipped } => dashboard_html(briefing, skipped),
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Teacher's Command Center</title>\n\
         <style>{css}</style>\n\
         </head>\n\
         <body>\n\
         <div class=\"page\">\n\
         <div class=\"banner-container\"><h1>🚀 Teacher's Command Center</h1><p>Daily Intelligence &amp; Action Plan</p></div>\n\
         <form class=\"run-form\" method=\"post\" action=\"/run\"><button type=\"submit\">{RUN_BUTTON_LABEL}</button></form>\n\
         {body}\
         </div>\n\
         </body>\n\
         </html>\n",
        css = style::STYLESHEET,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::briefing::HotTake;

    fn hot_take(subject: &str) -> HotTake {
        HotTake {
            subject: Some(subject.to_string()),
            sender: Some("Office".into()),
            summary: Some("Summary".into()),
            crucial_note: Some("Note".into()),
        }
    }

    #[test]
    fn escapes_markup_significant_characters() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn three_hot_takes_five_drafts() {
        let briefing = Briefing {
            hot_takes: vec![hot_take("Alpha"), hot_take("Beta"), hot_take("Gamma")],
            drafts: (1..=5).map(|i| format!("Dear Parent {i},")).collect(),
            ..Default::default()
        };

        let html = dashboard_html(&briefing, 0);

        assert_eq!(html.matches("class=\"hot-take-item\"").count(), 3);
        assert_eq!(html.matches("class=\"draft-wrapper\"").count(), 5);

        let labels: Vec<_> = html
            .lines()
            .filter(|l| l.contains("class=\"draft-label\""))
            .collect();
        assert_eq!(labels.len(), 5);
        assert!(labels[0].contains("&quot;Alpha&quot;"));
        assert!(labels[1].contains("&quot;Beta&quot;"));
        assert!(labels[2].contains("&quot;Gamma&quot;"));
        assert!(labels[3].contains("&quot;Email Response&quot;"));
        assert!(labels[4].contains("&quot;Email Response&quot;"));
    }

    #[test]
    fn hot_takes_are_numbered_from_one() {
        let briefing = Briefing {
            hot_takes: vec![hot_take("First"), hot_take("Second")],
            ..Default::default()
        };
        let html = hot_takes_html(&briefing);
        assert!(html.contains("🔥 1. First"));
        assert!(html.contains("🔥 2. Second"));
    }

    #[test]
    fn more_hot_takes_than_drafts() {
        let briefing = Briefing {
            hot_takes: vec![hot_take("A"), hot_take("B")],
            drafts: vec!["only one".into()],
            ..Default::default()
        };
        let html = dashboard_html(&briefing, 0);
        assert_eq!(html.matches("class=\"draft-wrapper\"").count(), 1);
        assert_eq!(html.matches("class=\"hot-take-item\"").count(), 2);
    }

    #[test]
    fn missing_traffic_counter_renders_zero() {
        let briefing = Briefing::from_json(r#"{"traffic": {"total": 9, "continuing": 2}}"#).unwrap();
        assert_eq!(
            traffic_html(&briefing.traffic),
            "<b>Total:</b> 9<br><br><b>New Threads:</b> 0<br><br><b>Replies:</b> 2"
        );
    }

    #[test]
    fn injected_subject_is_escaped_everywhere() {
        let briefing = Briefing {
            schedule: vec!["<img src=x onerror=alert(1)>".into()],
            actions: vec!["<script>steal()</script>".into()],
            hot_takes: vec![HotTake {
                subject: Some("<script>alert('x')</script>".into()),
                sender: Some("Eve <eve@evil.test>".into()),
                ..Default::default()
            }],
            drafts: vec!["</div><iframe src=evil>".into()],
            ..Default::default()
        };

        let html = render_page(Page::Dashboard {
            briefing: &briefing,
            skipped: 0,
        });

        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("<iframe"));
        assert!(!html.contains("<eve@evil.test>"));
        assert!(html.contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"));
        assert!(html.contains("Eve &lt;eve@evil.test&gt;"));
    }

    #[test]
    fn missing_hot_take_fields_render_empty() {
        let briefing = Briefing {
            hot_takes: vec![HotTake::default()],
            ..Default::default()
        };
        let html = hot_takes_html(&briefing);
        assert!(html.contains("🔥 1. </span>"));
        assert!(html.contains("Crucial Note: </span>"));
    }

    #[test]
    fn skipped_messages_are_reported() {
        let html = dashboard_html(&Briefing::default(), 2);
        assert!(html.contains("2 messages could not be fetched"));
        let none = dashboard_html(&Briefing::default(), 0);
        assert!(!none.contains("could not be fetched"));
    }

    #[test]
    fn page_states() {
        let idle = render_page(Page::Idle);
        assert!(idle.contains(RUN_BUTTON_LABEL));
        assert!(idle.contains("action=\"/run\""));
        assert!(!idle.contains("class=\"notice"));

        let info = render_page(Page::Info(NO_EMAILS_MESSAGE));
        assert!(info.contains("notice-info\">No emails found.</div>"));

        let err = render_page(Page::Error("Error connecting to OpenAI: <timeout>"));
        assert!(err.contains("notice-error\">Error connecting to OpenAI: &lt;timeout&gt;</div>"));
        assert!(!err.contains("Draft Responses"));
    }
}
