//! View Renderer
//!
//! Data in, markup out. No state, no I/O. Every interpolated value goes
//! through maud's escaping, so user text can never become markup.
//!
//! Action controls carry `data-action` and `data-id`; the page wires one
//! delegated click listener per container.

use chrono::{DateTime, Local, TimeZone, Utc};
use maud::{html, Markup};

use crate::models::{HistoryAction, HistoryEntry, Item, Role};

pub const ACTION_EDIT: &str = "edit";
pub const ACTION_DELETE: &str = "delete";
pub const ACTION_HISTORY: &str = "history";

/// `12.50 ₽`
pub fn format_price(price: f64) -> String {
    format!("{price:.2} ₽")
}

/// Local wall-clock time, `dd.mm.yyyy, HH:MM:SS`.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    format_timestamp_in(instant, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant.with_timezone(tz).format("%d.%m.%Y, %H:%M:%S").to_string()
}

pub fn render_loading(message: &str) -> String {
    html! {
        div class="loading" { (message) }
    }
    .into_string()
}

pub fn render_error(message: &str) -> String {
    html! {
        div class="error-state" { (message) }
    }
    .into_string()
}

fn empty_state(title: &str, hint: &str) -> Markup {
    html! {
        div class="empty-state" {
            h3 { (title) }
            p { (hint) }
        }
    }
}

/// Edit is offered to admins and managers, delete to admins. The server
/// enforces the same rules independently.
pub fn render_item_table(items: &[&Item], role: Role) -> String {
    if items.is_empty() {
        return empty_state("No items", "Add the first item to the warehouse").into_string();
    }

    html! {
        table class="items-table" {
            thead {
                tr {
                    th { "ID" }
                    th { "Name" }
                    th { "Description" }
                    th { "Quantity" }
                    th { "Price" }
                    th { "Actions" }
                }
            }
            tbody {
                @for item in items {
                    tr data-id=(item.id) {
                        td { (item.id) }
                        td { (item.name) }
                        td { (item.description_text().unwrap_or("-")) }
                        td { (item.quantity) }
                        td { (format_price(item.price)) }
                        td {
                            div class="action-buttons" {
                                button type="button" class="btn btn-primary btn-sm"
                                    data-action=(ACTION_HISTORY) data-id=(item.id) { "History" }
                                @if role.can_update() {
                                    button type="button" class="btn btn-primary btn-sm"
                                        data-action=(ACTION_EDIT) data-id=(item.id) { "Edit" }
                                }
                                @if role.can_delete() {
                                    button type="button" class="btn btn-danger btn-sm"
                                        data-action=(ACTION_DELETE) data-id=(item.id) { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    .into_string()
}

pub fn render_history_list(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return empty_state("History is empty", "Item changes will appear here").into_string();
    }
    html! {
        @for entry in entries {
            (history_entry(entry, true))
        }
    }
    .into_string()
}

/// Same entries without the item id, which the modal title already shows.
pub fn render_item_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return empty_state("No history", "This item has no recorded changes").into_string();
    }
    html! {
        @for entry in entries {
            (history_entry(entry, false))
        }
    }
    .into_string()
}

fn history_entry(entry: &HistoryEntry, show_item: bool) -> Markup {
    html! {
        div class="history-item" {
            div class="history-header" {
                div {
                    span class={ "history-action action-" (entry.action.css_suffix()) }
                        title=(entry.action.as_str()) { (entry.action.label()) }
                    @if show_item {
                        strong { "Item #" (entry.item_id) }
                    }
                }
                small { (format_timestamp(entry.changed_at)) }
            }
            div class="history-changes" {
                div { strong { "User: " } (entry.username) }
                (change_summary(entry))
            }
        }
    }
}

pub fn render_change_summary(entry: &HistoryEntry) -> String {
    change_summary(entry).into_string()
}

fn change_summary(entry: &HistoryEntry) -> Markup {
    if !entry.is_consistent() {
        return html! {};
    }
    match (entry.action, &entry.old_data, &entry.new_data) {
        (HistoryAction::Insert, _, Some(item)) => snapshot("Created item:", item),
        (HistoryAction::Delete, Some(item), _) => snapshot("Deleted item:", item),
        (HistoryAction::Update, Some(old), Some(new)) => changes(old, new),
        _ => html! {},
    }
}

fn snapshot(title: &str, item: &Item) -> Markup {
    html! {
        div class="history-summary" {
            strong { (title) }
            ul {
                li { "Name: " (item.name) }
                li { "Quantity: " (item.quantity) }
                li { "Price: " (format_price(item.price)) }
            }
        }
    }
}

fn changes(old: &Item, new: &Item) -> Markup {
    let mut rows: Vec<(&str, String, String)> = Vec::new();
    if old.name != new.name {
        rows.push(("Name", old.name.clone(), new.name.clone()));
    }
    if old.description_text() != new.description_text() {
        rows.push((
            "Description",
            old.description_text().unwrap_or("-").to_string(),
            new.description_text().unwrap_or("-").to_string(),
        ));
    }
    if old.quantity != new.quantity {
        rows.push(("Quantity", old.quantity.to_string(), new.quantity.to_string()));
    }
    if old.price != new.price {
        rows.push(("Price", format_price(old.price), format_price(new.price)));
    }

    if rows.is_empty() {
        return html! {
            div class="history-summary" { em { "No field changes" } }
        };
    }

    html! {
        div class="history-summary" {
            strong { "Changes:" }
            ul {
                @for (field, before, after) in &rows {
                    li { (field) ": " s { (before) } " → " (after) }
                }
            }
        }
    }
}
