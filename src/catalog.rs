// src/catalog.rs
//! Unified catalog shapes plus the raw record types each vendor serves.

use serde::{Deserialize, Deserializer, Serialize};

/// Vendors return `null` for unset fields; read it like a missing key.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Which upstream vendor produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    #[serde(rename = "Warung Klontong")]
    WarungKlontong,
    #[serde(rename = "Distro Fashion")]
    DistroFashion,
    #[serde(rename = "Resto Kuliner")]
    RestoKuliner,
}

impl SourceKind {
    /// Aggregation order: A, then B, then C.
    pub const ALL: [SourceKind; 3] = [
        SourceKind::WarungKlontong,
        SourceKind::DistroFashion,
        SourceKind::RestoKuliner,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::WarungKlontong => "Warung Klontong",
            SourceKind::DistroFashion => "Distro Fashion",
            SourceKind::RestoKuliner => "Resto Kuliner",
        }
    }

    /// Collection path on the vendor service.
    pub fn endpoint(self) -> &'static str {
        match self {
            SourceKind::WarungKlontong => "/api/produk",
            SourceKind::DistroFashion => "/api/products",
            SourceKind::RestoKuliner => "/api/menu",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One normalized catalog row. `final_price` may be NaN, which serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub source: SourceKind,
    pub key_id: String,
    pub name: String,
    pub final_price: f64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogResponse {
    pub total: usize,
    pub data: Vec<CatalogEntry>,
}

impl CatalogResponse {
    pub fn new(data: Vec<CatalogEntry>) -> Self {
        Self {
            total: data.len(),
            data,
        }
    }
}

/// Vendor A ("Warung Klontong") product as served by `GET /api/produk`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarungItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub kd_produk: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nm_brg: String,
    /// Numeric text, e.g. "10000".
    #[serde(default)]
    pub hrg: Option<String>,
    #[serde(default)]
    pub ket_stok: Option<String>,
}

/// Vendor B ("Distro Fashion") product as served by `GET /api/products`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistroItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sku: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_available: bool,
}

/// Vendor C ("Resto Kuliner") menu item as served by `GET /api/menu`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoItem {
    pub id: serde_json::Number,
    #[serde(default)]
    pub details: Option<RestoDetails>,
    #[serde(default)]
    pub pricing: Option<RestoPricing>,
    #[serde(default)]
    pub stock: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestoDetails {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestoPricing {
    #[serde(default)]
    pub base_price: Option<f64>,
    #[serde(default)]
    pub tax: Option<f64>,
}

/// Raw records fetched from one vendor, tagged by vendor.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceBatch {
    Warung(Vec<WarungItem>),
    Distro(Vec<DistroItem>),
    Resto(Vec<RestoItem>),
}

impl SourceBatch {
    /// The batch a failed source contributes.
    pub fn empty(kind: SourceKind) -> Self {
        match kind {
            SourceKind::WarungKlontong => SourceBatch::Warung(Vec::new()),
            SourceKind::DistroFashion => SourceBatch::Distro(Vec::new()),
            SourceKind::RestoKuliner => SourceBatch::Resto(Vec::new()),
        }
    }

    /// Decode a vendor's JSON array body into the matching variant.
    pub fn from_json(kind: SourceKind, body: &[u8]) -> serde_json::Result<Self> {
        Ok(match kind {
            SourceKind::WarungKlontong => SourceBatch::Warung(serde_json::from_slice(body)?),
            SourceKind::DistroFashion => SourceBatch::Distro(serde_json::from_slice(body)?),
            SourceKind::RestoKuliner => SourceBatch::Resto(serde_json::from_slice(body)?),
        })
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            SourceBatch::Warung(_) => SourceKind::WarungKlontong,
            SourceBatch::Distro(_) => SourceKind::DistroFashion,
            SourceBatch::Resto(_) => SourceKind::RestoKuliner,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SourceBatch::Warung(v) => v.len(),
            SourceBatch::Distro(v) => v.len(),
            SourceBatch::Resto(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
