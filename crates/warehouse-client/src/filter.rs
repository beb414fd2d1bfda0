//! Item search and history filter normalization.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::error::ValidationError;
use crate::models::{HistoryAction, Item};

/// Case-insensitive match on name and description. Borrows from the canonical
/// list, which is never reordered or reassigned.
pub fn filter_items<'a>(items: &'a [Item], term: &str) -> Vec<&'a Item> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| {
            item.name.to_lowercase().contains(&needle)
                || item
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .collect()
}

/// History filter fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilterForm {
    pub action: String,
    pub username: String,
    pub item_id: String,
    pub date_from: String,
    pub date_to: String,
}

impl HistoryFilterForm {
    /// Empty fields are dropped; dates are read in `tz` and converted to UTC.
    pub fn normalize<Tz: TimeZone>(&self, tz: &Tz) -> Result<HistoryQuery, ValidationError> {
        let action = match self.action.trim() {
            "" => None,
            raw => Some(
                raw.parse::<HistoryAction>()
                    .map_err(|_| ValidationError::InvalidAction(raw.to_string()))?,
            ),
        };

        let username = Some(self.username.trim())
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        let item_id = match self.item_id.trim() {
            "" => None,
            raw => match raw.parse::<i64>() {
                Ok(id) if id > 0 => Some(id),
                _ => return Err(ValidationError::InvalidItemId),
            },
        };

        Ok(HistoryQuery {
            action,
            username,
            item_id,
            date_from: parse_date_input(&self.date_from, tz)?,
            date_to: parse_date_input(&self.date_to, tz)?,
            limit: None,
            offset: None,
        })
    }
}

/// Normalized query of `GET /api/history`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub action: Option<HistoryAction>,
    pub username: Option<String>,
    pub item_id: Option<i64>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl HistoryQuery {
    pub fn page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// URL query without the leading `?`. Unset fields are omitted.
    pub fn to_query_string(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(action) = self.action {
            query.append_pair("action", action.as_str());
        }
        if let Some(username) = &self.username {
            query.append_pair("username", username);
        }
        if let Some(item_id) = self.item_id {
            query.append_pair("item_id", &item_id.to_string());
        }
        if let Some(date_from) = self.date_from {
            query.append_pair("date_from", &format_instant(date_from));
        }
        if let Some(date_to) = self.date_to {
            query.append_pair("date_to", &format_instant(date_to));
        }
        if let Some(limit) = self.limit {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = self.offset {
            query.append_pair("offset", &offset.to_string());
        }
        query.finish()
    }
}

/// `2024-03-01T07:00:00.000Z`
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts the values of `date` and `datetime-local` inputs, plus full RFC 3339.
pub fn parse_date_input<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(instant.with_timezone(&Utc)));
    }

    let naive = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| ValidationError::InvalidDate(raw.to_string()))?;

    // A skipped local time (DST gap) has no instant.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| Some(local.with_timezone(&Utc)))
        .ok_or_else(|| ValidationError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn item(id: i64, name: &str, description: Option<&str>) -> Item {
        Item {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            quantity: 1,
            price: 1.0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_filter_is_non_mutating() {
        let items = vec![item(1, "Widget", None), item(2, "Gadget", None)];

        let found = filter_items(&items, "widget");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);

        assert_eq!(filter_items(&items, "").len(), 2);
        let found = filter_items(&items, "GADGET");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_filter_matches_description() {
        let items = vec![item(1, "Box", Some("Steel bolts")), item(2, "Crate", Some(""))];
        let found = filter_items(&items, "bolt");
        assert_eq!(found.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_normalize_drops_empty_fields() {
        let form = HistoryFilterForm {
            username: "  ".into(),
            action: "update".into(),
            ..HistoryFilterForm::default()
        };
        let query = form.normalize(&Utc).unwrap();
        assert_eq!(query.action, Some(HistoryAction::Update));
        assert_eq!(query.username, None);
        assert_eq!(query.to_query_string(), "action=UPDATE");
    }

    #[test]
    fn test_local_dates_become_utc() {
        let moscow = FixedOffset::east_opt(3 * 3600).unwrap();
        let form = HistoryFilterForm {
            date_from: "2024-03-01".into(),
            date_to: "2024-03-01T18:30".into(),
            ..HistoryFilterForm::default()
        };
        let query = form.normalize(&moscow).unwrap();
        assert_eq!(format_instant(query.date_from.unwrap()), "2024-02-29T21:00:00.000Z");
        assert_eq!(format_instant(query.date_to.unwrap()), "2024-03-01T15:30:00.000Z");
    }

    #[test]
    fn test_rejects_bad_input() {
        let form = HistoryFilterForm { date_from: "yesterday".into(), ..HistoryFilterForm::default() };
        assert_eq!(form.normalize(&Utc), Err(ValidationError::InvalidDate("yesterday".into())));

        let form = HistoryFilterForm { action: "MOVE".into(), ..HistoryFilterForm::default() };
        assert_eq!(form.normalize(&Utc), Err(ValidationError::InvalidAction("MOVE".into())));

        let form = HistoryFilterForm { item_id: "0".into(), ..HistoryFilterForm::default() };
        assert_eq!(form.normalize(&Utc), Err(ValidationError::InvalidItemId));
    }

    #[test]
    fn test_query_string_encoding() {
        let query = HistoryQuery {
            username: Some("anna maria".into()),
            date_from: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            ..HistoryQuery::default()
        }
        .page(100, 200);
        assert_eq!(
            query.to_query_string(),
            "username=anna+maria&date_from=2024-03-01T00%3A00%3A00.000Z&limit=100&offset=200"
        );
    }
}
