use crate::error::FetchError;
use crate::models::{Page, Property};
use crate::normalize::normalize_value;
use crate::source::traits::PropertySource;
use crate::source::types::{Filter, SortDirection};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::cmp::Ordering;
use tracing::info;

/// Built-in listings served when the backend is unreachable outside production
#[derive(Debug, Clone)]
pub struct SampleSource {
    properties: Vec<Property>,
}

impl SampleSource {
    pub fn new() -> Self {
        let properties = sample_records()
            .iter()
            .filter_map(|record| normalize_value(record).ok())
            .collect();
        Self { properties }
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    fn select(&self, filter: &Filter) -> Result<Page<Property>, FetchError> {
        // same validation the backend query gets
        filter.query_pairs()?;

        let mut matched: Vec<Property> = self
            .properties
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        sort_properties(&mut matched, filter.sort_by.as_deref(), filter.sort_direction);

        if filter.page.is_none() && filter.page_size.is_none() {
            return Ok(Page::from_all(matched));
        }
        Ok(paginate(
            matched,
            filter.page.unwrap_or(1),
            filter.page_size.unwrap_or(Page::<Property>::DEFAULT_PAGE_SIZE),
        ))
    }
}

impl Default for SampleSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PropertySource for SampleSource {
    async fn fetch_properties(&self, filter: &Filter) -> Result<Page<Property>, FetchError> {
        let page = self.select(filter)?;
        info!("📋 Serving {} sample properties", page.properties.len());
        Ok(page)
    }

    async fn fetch_property(&self, id: &str) -> Result<Property, FetchError> {
        self.properties
            .iter()
            .find(|p| p.id == id.trim())
            .cloned()
            .ok_or_else(|| FetchError::Rejected(format!("Property {} not found", id)))
    }

    fn source_name(&self) -> &'static str {
        "Sample"
    }
}

fn sort_properties(properties: &mut [Property], sort_by: Option<&str>, direction: Option<SortDirection>) {
    let compare: fn(&Property, &Property) -> Ordering = match sort_by.map(str::trim) {
        Some("price") => |a, b| a.price.cmp(&b.price),
        Some("name") => |a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        Some("year") => |a, b| a.year.cmp(&b.year),
        _ => return,
    };

    properties.sort_by(|a, b| match direction {
        Some(SortDirection::Desc) => compare(b, a),
        _ => compare(a, b),
    });
}

fn paginate(items: Vec<Property>, page: u32, page_size: u32) -> Page<Property> {
    let total_count = items.len() as u64;
    let total_pages = total_count.div_ceil(page_size as u64) as u32;
    let start = (page as usize - 1).saturating_mul(page_size as usize);

    Page {
        properties: items.into_iter().skip(start).take(page_size as usize).collect(),
        total_count,
        page,
        page_size,
        total_pages,
        has_next_page: page < total_pages,
        has_previous_page: page > 1,
    }
}

/// Sample data in the record shapes the backend has used over time
fn sample_records() -> Vec<Value> {
    vec![
        json!({
            "id": "sample-1",
            "name": "Apartamento en Chicó",
            "address": "Calle 93 #11-20",
            "price": 450000000,
            "codigoInternal": "BOG-001",
            "year": 2018,
            "createdAt": "2023-01-01T00:00:00.000Z",
            "city": "Bogotá",
            "state": "Cundinamarca",
            "country": "Colombia",
            "images": [
                {
                    "idPropertyImage": "sample-1-a",
                    "file": "https://images.unsplash.com/photo-1502672260266-1c1ef2d93688.jpg",
                    "enabled": true,
                    "isMain": true,
                    "description": "Sala principal"
                },
                {
                    "idPropertyImage": "sample-1-b",
                    "file": "https://images.unsplash.com/photo-1484154218962-a197022b5858.jpg",
                    "enabled": true,
                    "isMain": false,
                    "description": "Cocina"
                }
            ],
            "owner": {
                "name": "María Rodríguez",
                "photo": "",
                "phone": "+57 300 123 4567",
                "email": "maria.rodriguez@example.com"
            },
            "traces": [
                { "dateSale": "2019-03-15", "name": "Compra inicial", "value": 380000000, "tax": 38000000 },
                { "dateSale": "2022-08-01", "name": "Avalúo", "value": 430000000, "tax": 0 }
            ]
        }),
        json!({
            "idProperty": "sample-2",
            "name": "Casa campestre en Chía",
            "address": "Vereda Fonquetá km 2",
            "price": 980000000,
            "codeInternal": "CHI-002",
            "year": 2012,
            "city": "Chía",
            "state": "Cundinamarca",
            "country": "Colombia",
            "idOwner": "owner-2",
            "ownerName": "Carlos Pérez",
            "ownerPhone": "+57 310 555 0101",
            "ownerEmail": "carlos.perez@example.com",
            "image": "https://images.unsplash.com/photo-1564013799919-ab600027ffc6.jpg"
        }),
        json!({
            "id": "sample-3",
            "name": "Penthouse en El Poblado",
            "address": "Carrera 43A #1-50",
            "price": 1250000000,
            "year": 2021,
            "city": "Medellín",
            "state": "Antioquia",
            "country": "Colombia",
            "images": [
                {
                    "id": "sample-3-a",
                    "url": "https://images.unsplash.com/photo-1512917774080-9991f1c4c750.jpg",
                    "enabled": false,
                    "isMain": true,
                    "description": "Fachada"
                },
                {
                    "id": "sample-3-b",
                    "url": "https://images.unsplash.com/photo-1600585154340-be6161a56a0c.jpg",
                    "enabled": true,
                    "isMain": false,
                    "description": "Terraza"
                }
            ],
            "owner": {
                "name": "Laura Gómez",
                "phone": "+57 320 444 1212",
                "email": "laura.gomez@example.com"
            },
            "traces": [
                { "date": "2021-11-30", "label": "Venta", "value": 1100000000, "tax": 110000000 }
            ]
        }),
        json!({
            "id": 4,
            "name": "Apartaestudio en Granada",
            "address": "Avenida 9N #15-30",
            "price": 210000000,
            "year": 2016,
            "city": "Cali",
            "state": "Valle del Cauca",
            "country": "Colombia",
            "images": [
                "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267.jpg"
            ],
            "owner": {
                "name": "Andrés Castillo",
                "phone": "+57 315 222 3344",
                "email": "andres.castillo@example.com"
            }
        }),
        json!({
            "id": "sample-5",
            "name": "Casa colonial en el Centro Histórico",
            "address": "Calle del Curato #38-12",
            "price": 2300000000u64,
            "year": 1890,
            "city": "Cartagena",
            "state": "Bolívar",
            "country": "Colombia",
            "images": [],
            "owner": {
                "name": "Isabel Martínez",
                "photo": "https://images.unsplash.com/photo-1494790108377-be9c29b29330.jpg",
                "phone": "+57 301 888 9900",
                "email": "isabel.martinez@example.com"
            },
            "traces": []
        }),
    ]
}
