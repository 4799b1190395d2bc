use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Data for the generic "Documento Personalizado" (PDF and Word).
///
/// Keys outside the named fields are kept in `extra` and act as additional `{key}`
/// placeholders when a Word template is patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GenericRecord {
    pub nombre: Option<String>,
    pub apellidos: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub edad: Option<u32>,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub fecha: Option<String>,
    pub empresa: Option<String>,
    pub cargo: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub salario: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Accepts a JSON number or a numeric string; multipart text fields arrive as strings.
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString<T> {
        Number(T),
        String(String),
    }

    match Option::<NumberOrString<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::String(s)) => s.trim().parse().map(Some).map_err(de::Error::custom),
    }
}

/// Render a JSON value the way it should read inside a document.
fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string()),
        }),
        other => Some(other.to_string()),
    }
}

impl GenericRecord {
    /// True when no field at all was supplied.
    pub fn is_empty(&self) -> bool {
        self.placeholder_values().is_empty()
    }

    /// Fill `fecha` with today's date when the caller left it out.
    pub fn with_default_date(mut self) -> Self {
        if self.fecha.as_deref().map_or(true, str::is_empty) {
            self.fecha = Some(crate::locale::today_es());
        }
        self
    }

    /// `(key, value)` pairs for placeholder substitution.
    ///
    /// Named fields come first in declaration order, then extra keys in key order. Null and
    /// empty values are skipped; numbers and booleans are stringified.
    pub fn placeholder_values(&self) -> Vec<(String, String)> {
        let named: [(&str, Option<String>); 10] = [
            ("nombre", self.nombre.clone()),
            ("apellidos", self.apellidos.clone()),
            ("edad", self.edad.map(|e| e.to_string())),
            ("email", self.email.clone()),
            ("telefono", self.telefono.clone()),
            ("direccion", self.direccion.clone()),
            ("fecha", self.fecha.clone()),
            ("empresa", self.empresa.clone()),
            ("cargo", self.cargo.clone()),
            ("salario", self.salario.map(|s| s.to_string())),
        ];

        named
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .filter(|v| !v.is_empty())
                    .map(|v| (key.to_string(), v))
            })
            .chain(
                self.extra
                    .iter()
                    .filter_map(|(key, value)| value_to_text(value).map(|v| (key.clone(), v))),
            )
            .collect()
    }

    /// Fixed data used by the example endpoint.
    pub fn sample() -> Self {
        GenericRecord {
            nombre: Some("Juan".to_string()),
            apellidos: Some("García López".to_string()),
            edad: Some(35),
            email: Some("juan.garcia@ejemplo.com".to_string()),
            telefono: Some("+34 600 123 456".to_string()),
            direccion: Some("Calle Mayor 1, 28013 Madrid".to_string()),
            fecha: Some(crate::locale::today_es()),
            empresa: Some("EMPRESA EJEMPLO S.L.".to_string()),
            cargo: Some("Responsable de seguridad".to_string()),
            salario: Some(35000.0),
            extra: BTreeMap::new(),
        }
    }
}
