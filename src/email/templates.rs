use askama::Template;

use crate::models::SubmissionRecord;

#[derive(Template)]
#[template(path = "email/new_lead.html")]
struct NewLeadTemplate<'a> {
    site_name: &'a str,
    name: &'a str,
    email: &'a str,
    submitted: String,
    message: &'a str,
    reply_href: String,
}

pub fn render_new_lead(site_name: &str, record: &SubmissionRecord) -> Result<String, askama::Error> {
    let subject = format!("Re: Your inquiry about {site_name} services");
    let subject: String = form_urlencoded::byte_serialize(subject.as_bytes())
        .collect::<String>()
        .replace('+', "%20");

    NewLeadTemplate {
        site_name,
        name: &record.name,
        email: &record.email,
        submitted: record
            .timestamp
            .format("%B %-d, %Y at %H:%M UTC")
            .to_string(),
        message: &record.message,
        reply_href: format!("mailto:{}?subject={subject}", record.email),
    }
    .render()
}
