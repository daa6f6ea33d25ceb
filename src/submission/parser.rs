use axum::http::HeaderMap;

use crate::models::SubmissionForm;

/// Parse a request body based on Content-Type header.
/// Multipart bodies need their boundary and go through [`parse_multipart`].
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<SubmissionForm, String> {
    let ct = content_type.unwrap_or("application/x-www-form-urlencoded");

    if ct.contains("application/json") {
        serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))
    } else if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else if ct.contains("multipart/form-data") {
        Err("Multipart body must be parsed with its boundary".to_string())
    } else {
        // Try JSON first, then form-urlencoded
        serde_json::from_slice(body)
            .or_else(|_| parse_form_urlencoded(body))
            .map_err(|e| format!("Unable to parse body: {e}"))
    }
}

fn parse_form_urlencoded(body: &[u8]) -> Result<SubmissionForm, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;
    let pairs = form_urlencoded::parse(body_str.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()));
    Ok(form_from_pairs(pairs))
}

/// Parse multipart form data using multer.
pub async fn parse_multipart(headers: &HeaderMap, body: bytes::Bytes) -> Result<SubmissionForm, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut pairs = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let name = field.name().unwrap_or("unknown").to_string();
        let value = field
            .text()
            .await
            .map_err(|e| format!("Field read error: {e}"))?;
        pairs.push((name, value));
    }

    Ok(form_from_pairs(pairs))
}

/// Unknown keys are ignored; a repeated key keeps its last value.
fn form_from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> SubmissionForm {
    let mut form = SubmissionForm::default();
    for (key, value) in pairs {
        match key.as_str() {
            "name" => form.name = value,
            "email" => form.email = value,
            "message" => form.message = value,
            "timestamp" => form.timestamp = Some(value),
            _ => {}
        }
    }
    form
}
