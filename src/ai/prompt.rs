use crate::domain::email::EmailSummary;

pub const SYSTEM_INSTRUCTION: &str = r#"You are an executive assistant. Analyze emails from the last 24h.
Return STRICT JSON with these 5 keys:

1. "schedule": Array of strings (Calendar events).
2. "actions": Array of strings (Top 5 tasks).
3. "traffic": Object {"total": int, "new": int, "continuing": int}.

4. "hot_takes": Array of objects (Top 5 urgent emails).
   Format: {"subject": "...", "sender": "...", "summary": "...", "crucial_note": "..."}

5. "drafts": Array of strings (5 full email drafts).
   IMPORTANT: Write the ACTUAL complete email response for each hot take.
   Start with "Dear [Name]," and end with "Best regards,".
   Do not describe the email; actually write it.

Anonymize student names.
"#;

/// All summaries flattened into one user message.
pub fn user_message(emails: &[EmailSummary]) -> String {
    let mut out = String::from("EMAILS:");
    for e in emails {
        out.push('\n');
        out.push_str(&e.to_string());
    }
    out
}
