//! Parse HTTP response header lines into status code and reason phrase.

/// Status from the last `HTTP/...` status line. Header lines from every hop of
/// a redirect chain are collected, so the final response is the last one.
pub(crate) fn parse_status_line(lines: &[String]) -> Option<(u16, String)> {
    lines.iter().rev().find_map(|line| {
        let line = line.trim();
        let rest = line.strip_prefix("HTTP/")?;
        let mut parts = rest.splitn(3, ' ');
        let _version = parts.next()?;
        let code = parts.next()?.trim().parse::<u16>().ok()?;
        let reason = parts.next().map(str::trim).unwrap_or("").to_string();
        Some((code, reason))
    })
}

/// Reason phrase to use when the server sent none (HTTP/2 never does).
pub(crate) fn canonical_reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}
