//! Maps raw backend records onto the canonical [`Property`].

use crate::error::NormalizationError;
use crate::models::raw::{RawImage, RawOwner, RawProperty, RawTrace};
use crate::models::{Image, Owner, Property, Trace};
use serde_json::Value;

/// Normalize an arbitrary JSON value into a canonical property
pub fn normalize_value(value: &Value) -> Result<Property, NormalizationError> {
    if !value.is_object() {
        return Err(NormalizationError::NotAnObject);
    }
    let raw: RawProperty = serde_json::from_value(value.clone())
        .map_err(|e| NormalizationError::Malformed(e.to_string()))?;
    normalize(&raw)
}

/// Normalize a raw record, defaulting every optional field.
///
/// Only a record with none of `name`, `address` and `price` is rejected.
pub fn normalize(raw: &RawProperty) -> Result<Property, NormalizationError> {
    let price = raw.price.as_ref().and_then(value_to_i64);
    if raw.name.is_none() && raw.address.is_none() && price.is_none() {
        return Err(NormalizationError::MissingCoreFields);
    }

    let id = raw
        .id
        .as_ref()
        .and_then(value_to_string)
        .or_else(|| raw.id_property.as_ref().and_then(value_to_string))
        .unwrap_or_default();

    let images = normalize_images(&id, raw);
    let owner = normalize_owner(raw.owner.as_ref(), raw);
    let owner_id = raw
        .id_owner
        .as_ref()
        .or_else(|| raw.owner.as_ref().and_then(|o| o.id_owner.as_ref()))
        .and_then(value_to_string);

    let traces = raw
        .traces
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(normalize_trace)
        .collect();

    Ok(Property {
        id,
        name: raw.name.clone().unwrap_or_default(),
        address: raw.address.clone().unwrap_or_default(),
        price: price.unwrap_or(0),
        images,
        owner,
        traces,
        year: raw
            .year
            .as_ref()
            .and_then(value_to_i64)
            .and_then(|y| i32::try_from(y).ok()),
        city: raw.city.clone(),
        state: raw.state.clone(),
        country: raw.country.clone(),
        code_internal: raw.code_internal.clone().or_else(|| raw.codigo_internal.clone()),
        owner_id,
        created_at: raw.created_at.clone(),
    })
}

fn normalize_images(property_id: &str, raw: &RawProperty) -> Vec<Image> {
    if let Some(images) = &raw.images {
        return images
            .iter()
            .enumerate()
            .map(|(index, image)| normalize_image(property_id, index, image))
            .collect();
    }

    // legacy single-image shape
    match raw.image.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => vec![Image {
            id: format!("{}-main", property_id),
            url: url.to_string(),
            enabled: true,
            is_main: true,
            description: String::new(),
        }],
        _ => Vec::new(),
    }
}

fn normalize_image(property_id: &str, index: usize, image: &RawImage) -> Image {
    let fallback_id = || format!("{}-{}", property_id, index);

    match image {
        RawImage::Url(url) => Image {
            id: fallback_id(),
            url: url.clone(),
            enabled: true,
            is_main: false,
            description: String::new(),
        },
        RawImage::Record(record) => Image {
            id: record
                .id
                .as_ref()
                .or(record.id_property_image.as_ref())
                .and_then(value_to_string)
                .unwrap_or_else(fallback_id),
            url: record
                .url
                .clone()
                .or_else(|| record.file.clone())
                .unwrap_or_default(),
            enabled: record.enabled.unwrap_or(true),
            is_main: record.is_main.unwrap_or(false),
            description: record.description.clone().unwrap_or_default(),
        },
    }
}

/// Nested owner fields win; flat `owner*` fields fill the gaps
fn normalize_owner(nested: Option<&RawOwner>, raw: &RawProperty) -> Owner {
    let pick = |nested: Option<&String>, flat: &Option<String>| {
        nested.cloned().or_else(|| flat.clone())
    };

    let defaults = Owner::default();
    Owner {
        name: pick(nested.and_then(|o| o.name.as_ref()), &raw.owner_name)
            .unwrap_or(defaults.name),
        phone: pick(nested.and_then(|o| o.phone.as_ref()), &raw.owner_phone)
            .unwrap_or(defaults.phone),
        email: pick(nested.and_then(|o| o.email.as_ref()), &raw.owner_email)
            .unwrap_or(defaults.email),
        photo: pick(nested.and_then(|o| o.photo.as_ref()), &raw.owner_photo).or(defaults.photo),
    }
}

fn normalize_trace(trace: &RawTrace) -> Trace {
    Trace {
        date: trace
            .date
            .clone()
            .or_else(|| trace.date_sale.clone())
            .unwrap_or_default(),
        label: trace
            .label
            .clone()
            .or_else(|| trace.name.clone())
            .unwrap_or_default(),
        value: trace.value.as_ref().and_then(value_to_i64).unwrap_or(0),
        tax: trace.tax.as_ref().and_then(value_to_i64).unwrap_or(0),
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    }
}
