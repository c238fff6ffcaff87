//! In-memory filter, sort and pagination pipeline for inventory listings.
//!
//! The listing endpoint loads a user's items once and runs them through
//! [`InventoryFilter::apply`], [`sort`] and [`paginate`] in that order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::entities::InventoryItem;
use crate::domain::expiration::ExpirationStatus;

/// Criteria for narrowing a list of inventory items.
///
/// Every field is optional; an item is kept when it satisfies all supplied ones.
#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Exact location match.
    pub location: Option<String>,
    /// Case-insensitive substring of the item name.
    pub search: Option<String>,
    /// Expiration bucket the item must fall in.
    pub expiration: Option<ExpirationStatus>,
    /// Keep finished items as well. Hidden by default.
    pub include_finished: bool,
}

impl InventoryFilter {
    /// Returns whether `item` passes every supplied predicate.
    pub fn matches(
        &self,
        item: &InventoryItem,
        now: DateTime<Utc>,
        soon_within_days: i64,
    ) -> bool {
        if !self.include_finished && item.is_finished {
            return false;
        }
        if let Some(category) = &self.category
            && item.category != *category
        {
            return false;
        }
        if let Some(location) = &self.location
            && item.location != *location
        {
            return false;
        }
        if let Some(search) = &self.search
            && !item.name.to_lowercase().contains(&search.to_lowercase())
        {
            return false;
        }
        if let Some(status) = self.expiration
            && item.expiration_status(now, soon_within_days) != status
        {
            return false;
        }
        true
    }

    /// Keeps the items that match, preserving their order.
    pub fn apply(
        &self,
        items: Vec<InventoryItem>,
        now: DateTime<Utc>,
        soon_within_days: i64,
    ) -> Vec<InventoryItem> {
        items
            .into_iter()
            .filter(|item| self.matches(item, now, soon_within_days))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Name,
    ExpirationDate,
    Category,
    Location,
    Quantity,
    #[default]
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Case-insensitive comparison with the raw string as tiebreaker so the order is total.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Dated items come first in ascending order; undated items trail.
fn compare_optional_dates(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_by(key: SortKey, a: &InventoryItem, b: &InventoryItem) -> Ordering {
    match key {
        SortKey::Name => compare_text(&a.name, &b.name),
        SortKey::Category => compare_text(&a.category, &b.category),
        SortKey::Location => compare_text(&a.location, &b.location),
        SortKey::Quantity => a.quantity.total_cmp(&b.quantity),
        SortKey::ExpirationDate => compare_optional_dates(a.expiration_date, b.expiration_date),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

/// Stable sort by `key`.
///
/// Descending order reverses the comparison except for the placement of items
/// without an expiration date, which always sort last.
pub fn sort(items: &mut [InventoryItem], key: SortKey, order: SortOrder) {
    items.sort_by(|a, b| {
        if key == SortKey::ExpirationDate {
            match (a.expiration_date, b.expiration_date) {
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                _ => {}
            }
        }

        let ordering = compare_by(key, a, b);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Pagination metadata returned next to a page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

/// Slices `items` to the 1-based `page` of size `limit`.
///
/// Pages past the end are empty but still report the real totals.
/// `page` and `limit` are clamped to at least 1.
pub fn paginate<T>(items: Vec<T>, page: usize, limit: usize) -> Page<T> {
    let page = page.max(1);
    let limit = limit.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(limit);

    let items: Vec<T> = items
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .collect();

    Page {
        items,
        info: PageInfo {
            total_items,
            total_pages,
            current_page: page,
            page_size: limit,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        },
    }
}
