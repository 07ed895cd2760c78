// src/normalize.rs
//! Per-vendor rules that turn raw records into [`CatalogEntry`] rows.
//!
//! The vendors do not share a status vocabulary: Warung Klontong passes its
//! free-form stock text through (lower-cased, `"habis"` when missing) while
//! Distro Fashion and Resto Kuliner use `"Tersedia"` / `"Habis"`. Consumers
//! rely on that, so it is kept as is.

use crate::catalog::{CatalogEntry, DistroItem, RestoItem, SourceBatch, SourceKind, WarungItem};
use crate::error::CatalogError;

pub const STATUS_AVAILABLE: &str = "Tersedia";
pub const STATUS_SOLD_OUT: &str = "Habis";
pub const WARUNG_STATUS_MISSING: &str = "habis";
pub const WARUNG_DISCOUNT: f64 = 0.10;
pub const RESTO_KEY_PREFIX: &str = "RESTO-";
pub const RESTO_FOOD_CATEGORY: &str = "Food";
pub const RESTO_RECOMMENDED_SUFFIX: &str = " (Recommended)";

/// Integer-prefix parse: optional leading whitespace and sign, then digits.
/// Anything after the digits is ignored; no digits at all yields NaN.
pub fn parse_int_prefix(s: &str) -> f64 {
    let t = s.trim_start();
    let (sign, rest) = match t.as_bytes().first() {
        Some(b'-') => (-1.0, &t[1..]),
        Some(b'+') => (1.0, &t[1..]),
        _ => (1.0, t),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return f64::NAN;
    }
    rest[..end]
        .parse::<f64>()
        .map(|v| sign * v)
        .unwrap_or(f64::NAN)
}

pub fn warung_entry(item: WarungItem) -> CatalogEntry {
    let price = item.hrg.as_deref().map(parse_int_prefix).unwrap_or(f64::NAN);
    if price.is_nan() {
        tracing::debug!(key = %item.kd_produk, hrg = ?item.hrg, "warung price is not numeric");
    }
    let status = match item.ket_stok.as_deref() {
        Some(s) if !s.is_empty() => s.to_lowercase(),
        _ => WARUNG_STATUS_MISSING.to_string(),
    };
    CatalogEntry {
        source: SourceKind::WarungKlontong,
        key_id: item.kd_produk,
        name: item.nm_brg,
        final_price: price - price * WARUNG_DISCOUNT,
        status,
    }
}

pub fn distro_entry(item: DistroItem) -> CatalogEntry {
    CatalogEntry {
        source: SourceKind::DistroFashion,
        key_id: item.sku,
        name: item.product_name,
        final_price: item.price.unwrap_or(f64::NAN),
        status: availability(item.is_available).to_string(),
    }
}

/// Fails when the nested `details` or `pricing` object is missing.
pub fn resto_entry(item: RestoItem) -> Result<CatalogEntry, CatalogError> {
    let key_id = format!("{RESTO_KEY_PREFIX}{}", item.id);
    let Some(details) = item.details else {
        return Err(CatalogError::Normalize {
            vendor: SourceKind::RestoKuliner,
            key: key_id,
            reason: "missing details",
        });
    };
    let Some(pricing) = item.pricing else {
        return Err(CatalogError::Normalize {
            vendor: SourceKind::RestoKuliner,
            key: key_id,
            reason: "missing pricing",
        });
    };

    let mut name = details.name;
    if details.category.as_deref() == Some(RESTO_FOOD_CATEGORY) {
        name.push_str(RESTO_RECOMMENDED_SUFFIX);
    }
    let base = pricing.base_price.unwrap_or(f64::NAN);
    let tax = pricing.tax.unwrap_or(f64::NAN);
    let in_stock = item.stock.is_some_and(|s| s > 0.0);

    Ok(CatalogEntry {
        source: SourceKind::RestoKuliner,
        key_id,
        name,
        final_price: base + tax,
        status: availability(in_stock).to_string(),
    })
}

fn availability(available: bool) -> &'static str {
    if available {
        STATUS_AVAILABLE
    } else {
        STATUS_SOLD_OUT
    }
}

/// Normalize one vendor batch, appending to `out` in upstream order.
pub fn normalize_batch(batch: SourceBatch, out: &mut Vec<CatalogEntry>) -> Result<(), CatalogError> {
    match batch {
        SourceBatch::Warung(items) => out.extend(items.into_iter().map(warung_entry)),
        SourceBatch::Distro(items) => out.extend(items.into_iter().map(distro_entry)),
        SourceBatch::Resto(items) => {
            for it in items {
                out.push(resto_entry(it)?);
            }
        }
    }
    Ok(())
}
