use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Rows per page for every keyset listing.
pub const PAGE_SIZE: usize = 20;

/// Composite sort key `(created_at, id)` of the last item on a page.
///
/// Ordering is `created_at` first and `id` second, which is the same
/// ordering the record store applies with `ORDER BY created_at DESC, id DESC`.
/// The derived `Ord` relies on field order, so keep `created_at` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageCursor {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

impl PageCursor {
    pub fn new(created_at: DateTime<Utc>, id: Uuid) -> Self {
        Self { created_at, id }
    }

    /// Encodes the cursor as unpadded base64url over `["<rfc3339>", "<uuid>"]`.
    pub fn encode(&self) -> String {
        let created_at = self
            .created_at
            .to_rfc3339_opts(SecondsFormat::AutoSi, true);
        let payload = serde_json::json!([created_at, self.id.to_string()]);
        URL_SAFE_NO_PAD.encode(payload.to_string())
    }

    /// Decodes a client-supplied cursor.
    ///
    /// Anything that does not round-trip yields `None`, which callers treat
    /// exactly like an absent cursor.
    pub fn decode(raw: &str) -> Option<Self> {
        let raw = raw.trim().trim_end_matches('=');
        if raw.is_empty() {
            return None;
        }
        let bytes = URL_SAFE_NO_PAD.decode(raw).ok()?;
        let (created_at, id): (String, String) = serde_json::from_slice(&bytes).ok()?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .ok()?
            .with_timezone(&Utc);
        let id = Uuid::parse_str(&id).ok()?;
        Some(Self { created_at, id })
    }

    /// Strict "comes after" test in descending `(created_at, id)` order.
    pub fn precedes(&self, key: &PageCursor) -> bool {
        key < self
    }
}

/// One page of a keyset listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

/// Builds a page from up to `page_size + 1` rows already sorted newest first.
///
/// The extra row only signals that more data exists. The emitted cursor is the
/// key of the last row that is actually returned, so the next request (which
/// filters strictly below the cursor) starts exactly at the dropped row.
pub fn build_page<T>(mut rows: Vec<T>, page_size: usize, key: impl Fn(&T) -> PageCursor) -> Page<T> {
    let has_more = rows.len() > page_size;
    rows.truncate(page_size);
    let next_cursor = if has_more {
        rows.last().map(|last| key(last).encode())
    } else {
        None
    };
    Page {
        items: rows,
        next_cursor,
    }
}
