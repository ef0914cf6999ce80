use serde_json::Value;

/// Monotonically increasing identifier for one user-initiated search.
///
/// The backend echoes no identifiers of its own, so the id is attached to
/// outbound requests and honored on inbound payloads only when present.
pub type SessionId = u64;

/// One search result streamed back by a single backend source.
///
/// Hits are immutable once received. Uniqueness is not enforced; the same
/// title may legitimately arrive from several sources, or twice from one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub poster: String,
    pub source: String,
}

/// An error reported over the channel, either transport-level (no source)
/// or scoped to one backend source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    pub source: Option<String>,
    pub message: String,
}

/// Outcome of classifying one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Hit {
        session: Option<SessionId>,
        hit: SearchHit,
    },
    Error {
        session: Option<SessionId>,
        error: SourceError,
    },
    /// Payload matched neither shape; callers drop it without failing.
    Unrecognized,
}

/// Encodes the single outbound request shape: `{"action":"search",...}`.
pub fn encode_search(term: &str, session: SessionId) -> String {
    serde_json::json!({
        "action": "search",
        "term": term,
        "session": session,
    })
    .to_string()
}

/// Classifies a raw inbound frame structurally.
///
/// A payload with an explicit `"error": true` flag is an error event; else
/// one carrying a string `"source"` field is a hit; everything else,
/// including unparseable text, is `Unrecognized`. Never panics or errors:
/// a malformed frame from one source must not disrupt the rest.
pub fn decode_inbound(raw: &str) -> Decoded {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => return Decoded::Unrecognized,
    };
    let session = value.get("session").and_then(Value::as_u64);

    if value.get("error").and_then(Value::as_bool) == Some(true) {
        return Decoded::Error {
            session,
            error: SourceError {
                source: string_field(&value, "source"),
                message: string_field(&value, "message").unwrap_or_default(),
            },
        };
    }

    match string_field(&value, "source") {
        Some(source) => Decoded::Hit {
            session,
            hit: SearchHit {
                title: string_field(&value, "title").unwrap_or_default(),
                link: string_field(&value, "link").unwrap_or_default(),
                poster: string_field(&value, "poster").unwrap_or_default(),
                source,
            },
        },
        None => Decoded::Unrecognized,
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}
